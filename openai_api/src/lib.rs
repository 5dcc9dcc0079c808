//! Session client for the OpenAI Assistants API.
//!
//! `AssistantSessionClient` keeps one assistant and one conversation thread
//! alive across requests, remembering their ids through a `SessionStore`, and
//! turns a user message into the assistant's reply.

mod api;
mod check_key;
mod error;
mod models;
mod retry;
mod run_completion;
mod sanitize;
mod session;
mod store;

pub use api::{AssistantApi, OpenAIApi, API_BASE};
pub use error::{ApiError, DecodeError, StoreError};
pub use models::{
    decode_id, decode_latest_text, decode_run_status, AssistantRequest, ChatCompletionRequest,
    OpenAIMessage, RunRequest, RunStatus,
};
pub use retry::RetryPolicy;
pub use run_completion::{CONVERSATION_CLOSED, REPLY_EMPTY, REPLY_TOO_SLOW};
pub use sanitize::{is_end_of_conversation, sanitize_reply, END_OF_CONVERSATION};
pub use session::{fingerprint, FingerprintMode, SessionState};
pub use store::{FileStore, MemoryStore, SessionStore, StateKey};

use async_trait::async_trait;
use std::sync::Arc;
use text_completion::RequestHandler;
use tracing::*;

/// What the assistant is created with, plus the credential.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub instructions: String,
    pub assistant_name: String,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: API_BASE.to_string(),
            model: "gpt-4-turbo".to_string(),
            instructions: "Bạn là trợ lý AI hữu ích.".to_string(),
            assistant_name: String::new(),
        }
    }
}

pub struct AssistantSessionClient {
    api: Arc<dyn AssistantApi>,
    session: SessionState,
    config: OpenAIConfig,
    retry: RetryPolicy,
}

impl AssistantSessionClient {
    /// Client talking HTTP to `config.base_url`.
    pub fn new(config: OpenAIConfig, session: SessionState, retry: RetryPolicy) -> Self {
        let api = Arc::new(OpenAIApi::new(&config.api_key, &config.base_url));
        Self::with_api(api, config, session, retry)
    }

    pub fn with_api(
        api: Arc<dyn AssistantApi>,
        config: OpenAIConfig,
        session: SessionState,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            api,
            session,
            config,
            retry,
        }
    }

    /// Forgets the cached assistant and thread if they were created with
    /// another API key, then records the current one. Call once at startup.
    pub async fn ensure_credential_consistency(&self) -> Result<bool, StoreError> {
        self.session.sync_credential(&self.config.api_key).await
    }

    pub async fn get_or_create_assistant(&self) -> Result<String, ApiError> {
        if let Some(assistant_id) = self.session.assistant_id().await? {
            return Ok(assistant_id);
        }

        let body = self
            .api
            .create_assistant(&AssistantRequest {
                name: &self.config.assistant_name,
                instructions: &self.config.instructions,
                model: &self.config.model,
            })
            .await?;
        let assistant_id = decode_id(&body).map_err(ApiError::invalid("assistant"))?;

        self.session.set_assistant_id(&assistant_id).await?;
        info!("Created assistant {}", assistant_id);
        Ok(assistant_id)
    }

    pub async fn get_or_create_thread(&self) -> Result<String, ApiError> {
        if let Some(thread_id) = self.session.thread_id().await? {
            return Ok(thread_id);
        }

        let body = self.api.create_thread().await?;
        let thread_id = decode_id(&body).map_err(ApiError::invalid("thread"))?;

        self.session.set_thread_id(&thread_id).await?;
        info!("Created thread {}", thread_id);
        Ok(thread_id)
    }
}

#[async_trait]
impl RequestHandler for AssistantSessionClient {
    async fn answer_request(&self, request: &str) -> String {
        self.send_message_and_await_reply(request).await
    }

    async fn check_key(&self) -> String {
        self.check_connectivity().await
    }
}
