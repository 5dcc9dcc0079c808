use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use tracing::*;

use crate::error::ApiError;
use crate::models::{AssistantRequest, ChatCompletionRequest, OpenAIMessage, RunRequest};

pub const API_BASE: &str = "https://api.openai.com/v1";
const OPENAI_BETA: &str = "OpenAI-Beta";
const ASSISTANTS_V2: &str = "assistants=v2";

/// The provider endpoints the session flow uses.
///
/// Every call returns the raw response body; decoding is left to the caller.
/// Apart from `chat_completion`, a non-success HTTP status is an error.
#[async_trait]
pub trait AssistantApi: Send + Sync {
    /// Body is returned whatever the HTTP status.
    async fn chat_completion(&self, request: &ChatCompletionRequest<'_>) -> Result<String, ApiError>;
    async fn create_assistant(&self, request: &AssistantRequest<'_>) -> Result<String, ApiError>;
    async fn create_thread(&self) -> Result<String, ApiError>;
    async fn create_message(&self, thread_id: &str, message: &OpenAIMessage<'_>) -> Result<String, ApiError>;
    async fn create_run(&self, thread_id: &str, request: &RunRequest<'_>) -> Result<String, ApiError>;
    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<String, ApiError>;
    async fn list_messages(&self, thread_id: &str) -> Result<String, ApiError>;
}

/// HTTP implementation against the OpenAI REST API.
pub struct OpenAIApi {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAIApi {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<T: serde::Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        self.client
            .post(self.url(path))
            .bearer_auth(&self.api_key)
            .header(OPENAI_BETA, ASSISTANTS_V2)
            .json(body)
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(self.url(path))
            .bearer_auth(&self.api_key)
            .header(OPENAI_BETA, ASSISTANTS_V2)
    }

    async fn read(&self, endpoint: String, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("{} {} {}", endpoint, status, body);

        if !status.is_success() {
            return Err(ApiError::Status {
                endpoint,
                status,
                body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl AssistantApi for OpenAIApi {
    async fn chat_completion(&self, request: &ChatCompletionRequest<'_>) -> Result<String, ApiError> {
        let response = self.post("/chat/completions", request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        trace!("POST /chat/completions {} {}", status, body);
        Ok(body)
    }

    async fn create_assistant(&self, request: &AssistantRequest<'_>) -> Result<String, ApiError> {
        self.read("POST /assistants".to_string(), self.post("/assistants", request))
            .await
    }

    async fn create_thread(&self) -> Result<String, ApiError> {
        let empty = serde_json::Map::new();
        self.read("POST /threads".to_string(), self.post("/threads", &empty))
            .await
    }

    async fn create_message(&self, thread_id: &str, message: &OpenAIMessage<'_>) -> Result<String, ApiError> {
        let path = format!("/threads/{}/messages", thread_id);
        self.read(format!("POST {}", path), self.post(&path, message))
            .await
    }

    async fn create_run(&self, thread_id: &str, request: &RunRequest<'_>) -> Result<String, ApiError> {
        let path = format!("/threads/{}/runs", thread_id);
        self.read(format!("POST {}", path), self.post(&path, request))
            .await
    }

    async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<String, ApiError> {
        let path = format!("/threads/{}/runs/{}", thread_id, run_id);
        self.read(format!("GET {}", path), self.get(&path)).await
    }

    async fn list_messages(&self, thread_id: &str) -> Result<String, ApiError> {
        let path = format!("/threads/{}/messages", thread_id);
        self.read(format!("GET {}", path), self.get(&path)).await
    }
}
