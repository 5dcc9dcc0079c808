use axum::{
    extract::{Json, State},
    response::Html,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use text_completion::RequestHandler;
use tower_http::trace::TraceLayer;
use tracing::*;

type Handler = Arc<dyn RequestHandler + Send + Sync>;

#[derive(Deserialize, Debug)]
pub struct ChatRequest {
    #[serde(alias = "Message")]
    pub message: String,
}

#[derive(Serialize, Debug)]
struct ChatReply {
    reply: String,
}

#[derive(Serialize, Debug)]
struct CheckResult {
    result: String,
}

pub fn router(handler: Handler) -> Router {
    Router::new()
        .route("/", get(hello_world))
        .route("/api/openai/ask", post(ask))
        .route("/api/openai/check", get(check))
        .layer(TraceLayer::new_for_http())
        .with_state(handler)
}

pub async fn serve(addr: SocketAddr, handler: Handler) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(async {
            let _signal_err = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C, shutting down.");
        })
        .await
}

async fn hello_world() -> Html<&'static str> {
    Html("Chatbot backend is running.")
}

async fn ask(State(handler): State<Handler>, Json(payload): Json<ChatRequest>) -> Json<ChatReply> {
    debug!("ask receive: {:?}", payload);
    let reply = handler.answer_request(&payload.message).await;
    Json(ChatReply { reply })
}

async fn check(State(handler): State<Handler>) -> Json<CheckResult> {
    let result = handler.check_key().await;
    Json(CheckResult { result })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    struct Echo;

    #[async_trait]
    impl RequestHandler for Echo {
        async fn answer_request(&self, request: &str) -> String {
            format!("echo: {}", request)
        }

        async fn check_key(&self) -> String {
            r#"{"id":"chatcmpl-1"}"#.to_string()
        }
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_ask() {
        let app = router(Arc::new(Echo));
        let response = app
            .oneshot(
                Request::post("/api/openai/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"message":"Hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, serde_json::json!({"reply": "echo: Hello"}));
    }

    #[tokio::test]
    async fn test_ask_accepts_capitalized_field() {
        let app = router(Arc::new(Echo));
        let response = app
            .oneshot(
                Request::post("/api/openai/ask")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"Message":"Xin chào"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(json_body(response).await, serde_json::json!({"reply": "echo: Xin chào"}));
    }

    #[tokio::test]
    async fn test_check() {
        let app = router(Arc::new(Echo));
        let response = app
            .oneshot(Request::get("/api/openai/check").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({"result": r#"{"id":"chatcmpl-1"}"#})
        );
    }
}
