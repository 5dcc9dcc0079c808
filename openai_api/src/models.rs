use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;

#[derive(Serialize, Debug)]
pub struct OpenAIMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

impl<'a> OpenAIMessage<'a> {
    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<OpenAIMessage<'a>>,
}

#[derive(Serialize, Debug)]
pub struct AssistantRequest<'a> {
    pub name: &'a str,
    pub instructions: &'a str,
    pub model: &'a str,
}

#[derive(Serialize, Debug)]
pub struct RunRequest<'a> {
    pub assistant_id: &'a str,
}

/// Remote state of a run. Values the provider may add later land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Cancelling,
    Cancelled,
    Failed,
    Completed,
    Incomplete,
    Expired,
    Other(String),
}

impl From<&str> for RunStatus {
    fn from(status: &str) -> Self {
        match status {
            "queued" => RunStatus::Queued,
            "in_progress" => RunStatus::InProgress,
            "requires_action" => RunStatus::RequiresAction,
            "cancelling" => RunStatus::Cancelling,
            "cancelled" => RunStatus::Cancelled,
            "failed" => RunStatus::Failed,
            "completed" => RunStatus::Completed,
            "incomplete" => RunStatus::Incomplete,
            "expired" => RunStatus::Expired,
            other => RunStatus::Other(other.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct Created {
    #[serde(default)]
    id: Option<String>,
}

#[derive(Deserialize)]
struct Run {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Deserialize)]
struct MessageList {
    #[serde(default)]
    data: Option<Vec<ThreadMessage>>,
}

#[derive(Deserialize)]
struct ThreadMessage {
    #[serde(default)]
    content: Vec<MessageContent>,
}

#[derive(Deserialize)]
struct MessageContent {
    #[serde(default)]
    text: Option<TextContent>,
}

#[derive(Deserialize)]
struct TextContent {
    #[serde(default)]
    value: Option<String>,
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, DecodeError> {
    serde_json::from_str(body).map_err(|e| DecodeError::MalformedBody(e.to_string()))
}

/// Identifier of a created object (assistant, thread or run).
/// An empty or null `id` counts as missing.
pub fn decode_id(body: &str) -> Result<String, DecodeError> {
    let created: Created = parse(body)?;
    match created.id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(DecodeError::MissingField("id")),
    }
}

pub fn decode_run_status(body: &str) -> Result<RunStatus, DecodeError> {
    let run: Run = parse(body)?;
    run.status
        .as_deref()
        .map(RunStatus::from)
        .ok_or(DecodeError::MissingField("status"))
}

/// Text of the first content part of the newest message.
///
/// The provider lists messages newest first. `Ok(None)` means the listing is
/// well formed but carries no text to show.
pub fn decode_latest_text(body: &str) -> Result<Option<String>, DecodeError> {
    let list: MessageList = parse(body)?;
    let data = list.data.ok_or(DecodeError::MissingField("data"))?;
    Ok(data
        .into_iter()
        .next()
        .and_then(|message| message.content.into_iter().next())
        .and_then(|part| part.text)
        .and_then(|text| text.value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_id() {
        assert_eq!(decode_id(r#"{"id":"asst_123","object":"assistant"}"#), Ok("asst_123".to_string()));
    }

    #[test]
    fn test_decode_id_missing_or_empty() {
        assert_eq!(decode_id(r#"{"object":"thread"}"#), Err(DecodeError::MissingField("id")));
        assert_eq!(decode_id(r#"{"id":""}"#), Err(DecodeError::MissingField("id")));
        assert_eq!(decode_id(r#"{"id":null}"#), Err(DecodeError::MissingField("id")));
    }

    #[test]
    fn test_decode_id_provider_error_body() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(decode_id(body), Err(DecodeError::MissingField("id")));
    }

    #[test]
    fn test_decode_malformed() {
        assert!(matches!(decode_id("<html>502</html>"), Err(DecodeError::MalformedBody(_))));
        assert!(matches!(decode_run_status(""), Err(DecodeError::MalformedBody(_))));
        assert!(matches!(decode_latest_text("{"), Err(DecodeError::MalformedBody(_))));
    }

    #[test]
    fn test_decode_run_status() {
        assert_eq!(decode_run_status(r#"{"id":"run_1","status":"completed"}"#), Ok(RunStatus::Completed));
        assert_eq!(decode_run_status(r#"{"status":"in_progress"}"#), Ok(RunStatus::InProgress));
        assert_eq!(
            decode_run_status(r#"{"status":"paused"}"#),
            Ok(RunStatus::Other("paused".to_string()))
        );
        assert_eq!(decode_run_status(r#"{"id":"run_1"}"#), Err(DecodeError::MissingField("status")));
    }

    #[test]
    fn test_decode_latest_text_takes_first_entry() {
        let body = r#"{"object":"list","data":[
            {"id":"msg_2","role":"assistant","content":[{"type":"text","text":{"value":"newest","annotations":[]}}]},
            {"id":"msg_1","role":"user","content":[{"type":"text","text":{"value":"Hello","annotations":[]}}]}
        ]}"#;
        assert_eq!(decode_latest_text(body), Ok(Some("newest".to_string())));
    }

    #[test]
    fn test_decode_latest_text_absent_content() {
        assert_eq!(decode_latest_text(r#"{"data":[]}"#), Ok(None));
        assert_eq!(decode_latest_text(r#"{"data":[{"content":[]}]}"#), Ok(None));
        assert_eq!(
            decode_latest_text(r#"{"data":[{"content":[{"type":"image_file","image_file":{"file_id":"f"}}]}]}"#),
            Ok(None)
        );
        assert_eq!(decode_latest_text(r#"{"object":"list"}"#), Err(DecodeError::MissingField("data")));
    }

    #[test]
    fn test_request_bodies() {
        let body = serde_json::to_value(ChatCompletionRequest {
            model: "gpt-4-turbo",
            messages: vec![OpenAIMessage::user("Ping?")],
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"model":"gpt-4-turbo","messages":[{"role":"user","content":"Ping?"}]})
        );

        let body = serde_json::to_value(RunRequest { assistant_id: "asst_1" }).unwrap();
        assert_eq!(body, serde_json::json!({"assistant_id":"asst_1"}));
    }
}
