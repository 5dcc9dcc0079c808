use tracing::*;

use crate::error::ApiError;
use crate::models::{decode_id, decode_latest_text, decode_run_status, OpenAIMessage, RunRequest, RunStatus};
use crate::sanitize::{is_end_of_conversation, sanitize_reply};
use crate::AssistantSessionClient;

pub const REPLY_TOO_SLOW: &str = "⚠️ Phản hồi quá chậm, vui lòng thử lại.";
pub const REPLY_EMPTY: &str = "⚠️ Không có nội dung phản hồi hợp lệ.";
pub const CONVERSATION_CLOSED: &str = "\n👋 Cuộc trò chuyện đã kết thúc.";

impl AssistantSessionClient {
    /// Posts `user_input` to the cached thread and waits for the assistant's
    /// answer. Failures are returned as readable text, never as errors.
    pub async fn send_message_and_await_reply(&self, user_input: &str) -> String {
        match self.run_completion(user_input).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!("run_completion failed: {}", e);
                format!("❌ Lỗi hệ thống: {}", e)
            }
        }
    }

    async fn run_completion(&self, user_input: &str) -> Result<String, ApiError> {
        trace!("run_completion prompt={}", user_input);

        let assistant_id = self.get_or_create_assistant().await?;
        let thread_id = self.get_or_create_thread().await?;

        // Step 1: Send the message to the thread
        self.api
            .create_message(&thread_id, &OpenAIMessage::user(user_input))
            .await?;

        // Step 2: Create a run
        let run_body = self
            .api
            .create_run(
                &thread_id,
                &RunRequest {
                    assistant_id: &assistant_id,
                },
            )
            .await?;
        let run_id = decode_id(&run_body).map_err(ApiError::invalid("run"))?;

        // Step 3: Wait for the run to complete
        if !self.wait_for_run(&thread_id, &run_id).await? {
            return Ok(REPLY_TOO_SLOW.to_string());
        }

        // Step 4: Read the newest message
        let messages = self.api.list_messages(&thread_id).await?;
        trace!("GET /threads/{}/messages {}", thread_id, messages);

        let text = match decode_latest_text(&messages) {
            Ok(text) => text,
            Err(e) => {
                warn!("Cannot read messages of thread {}: {}", thread_id, e);
                return Ok(format!("❌ Lỗi khi phân tích JSON phản hồi: {}", e));
            }
        };
        let Some(text) = text else {
            return Ok(REPLY_EMPTY.to_string());
        };

        let mut reply = sanitize_reply(&text);
        if is_end_of_conversation(user_input) {
            self.session.clear_thread().await?;
            info!("Conversation on thread {} closed by user", thread_id);
            reply.push_str(CONVERSATION_CLOSED);
        }

        debug!("run_completion prompt={} result={}", user_input, reply);
        Ok(reply)
    }

    /// `Ok(false)` when the retry budget runs out before the run completes.
    async fn wait_for_run(&self, thread_id: &str, run_id: &str) -> Result<bool, ApiError> {
        for attempt in 1..=self.retry.max_attempts {
            tokio::time::sleep(self.retry.interval).await;

            let body = self.api.retrieve_run(thread_id, run_id).await?;
            let status = decode_run_status(&body).map_err(ApiError::invalid("run status"))?;
            trace!("run {} attempt={} status={:?}", run_id, attempt, status);

            if status == RunStatus::Completed {
                return Ok(true);
            }
        }

        warn!(
            "run {} not completed after {} attempts ({:?})",
            run_id,
            self.retry.max_attempts,
            self.retry.budget()
        );
        Ok(false)
    }
}
