use once_cell::sync::Lazy;
use regex::Regex;

/// Phrase that ends the conversation and forgets the thread.
pub const END_OF_CONVERSATION: &str = "tạm biệt";

// File-search citations such as `【4:0†source】` or `[1†ref]`.
static CITATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[【\[][^【\[\]]*?†[^】\[\]]*?[】\]]").expect("citation pattern is valid")
});

pub fn sanitize_reply(text: &str) -> String {
    CITATION.replace_all(text, "").trim().to_string()
}

/// Case-insensitive match against [`END_OF_CONVERSATION`], ignoring
/// surrounding and repeated whitespace.
pub fn is_end_of_conversation(input: &str) -> bool {
    let normalized = input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    normalized == END_OF_CONVERSATION
}
