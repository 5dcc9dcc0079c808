//! An interface for answering chat requests
//!
//! This crate provides a `RequestHandler` trait so the HTTP surface does not
//! depend on the code that talks to the assistant provider.

use async_trait::async_trait;

#[async_trait]
pub trait RequestHandler {
    /// Sends the user message and returns the text to show back.
    ///
    /// Never fails: problems are reported inside the returned text.
    async fn answer_request(&self, request: &str) -> String;

    /// Raw provider answer to a minimal request, used to validate the key.
    async fn check_key(&self) -> String;
}
