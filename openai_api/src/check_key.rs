use tracing::*;

use crate::models::{ChatCompletionRequest, OpenAIMessage};
use crate::AssistantSessionClient;

const PING: &str = "Ping?";

impl AssistantSessionClient {
    /// Raw answer of the provider to a one-message completion, error bodies
    /// included. Only a transport failure is reported by us.
    pub async fn check_connectivity(&self) -> String {
        let request = ChatCompletionRequest {
            model: &self.config.model,
            messages: vec![OpenAIMessage::user(PING)],
        };

        match self.api.chat_completion(&request).await {
            Ok(body) => body,
            Err(e) => {
                warn!("check_connectivity failed: {}", e);
                format!("Lỗi khi kiểm tra key: {}", e)
            }
        }
    }
}
