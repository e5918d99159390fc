/// OpenRouter chat-completions backend
///
/// Sends each prompt as a single user message and returns the first choice's
/// content. Response bodies from failed calls are kept in the error
/// diagnostic for operators and never reach the caller's user-facing message.
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    error::{ErrorKind, PipelineError, PipelineResult},
    services::completion::{CompletionClient, CompletionOptions},
};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenRouterClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
    site_name: String,
    site_url: String,
}

impl OpenRouterClient {
    /// Builds a client from the startup configuration
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http_client,
            api_key: config.openrouter_api_key.clone(),
            api_url: config.api_base_url.clone(),
            model: config.model.clone(),
            site_name: config.site_name.clone(),
            site_url: config.site_url.clone(),
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a str, options: CompletionOptions) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        }
    }
}

/// Pulls `choices[0].message.content` out of a decoded envelope
fn first_choice_content(response: ChatResponse) -> PipelineResult<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|content| content.trim().to_string())
        .ok_or_else(|| {
            PipelineError::with_diagnostic(
                ErrorKind::ApiError,
                "completion response missing choices[0].message.content",
            )
        })
}

#[async_trait::async_trait]
impl CompletionClient for OpenRouterClient {
    async fn complete(&self, prompt: &str, options: CompletionOptions) -> PipelineResult<String> {
        tracing::debug!(
            model = %self.model,
            temperature = options.temperature,
            max_tokens = options.max_tokens,
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.site_url)
            .header("X-Title", &self.site_name)
            .json(&self.request_body(prompt, options))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %body,
                provider = self.name(),
                "Completion API request failed"
            );
            return Err(PipelineError::with_diagnostic(
                ErrorKind::ApiError,
                format!("completion API returned status {}: {}", status, body),
            ));
        }

        let response_text = response.text().await?;
        let envelope: ChatResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize completion response"
            );
            PipelineError::with_diagnostic(
                ErrorKind::ApiError,
                format!("malformed completion envelope: {}", e),
            )
        })?;

        let content = first_choice_content(envelope)?;

        tracing::debug!(
            provider = self.name(),
            content_len = content.len(),
            "Completion received"
        );

        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openrouter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    fn client_for(api_url: &str) -> OpenRouterClient {
        let vars = vec![
            ("OPENROUTER_API_KEY".to_string(), "sk-test".to_string()),
            ("API_BASE_URL".to_string(), api_url.to_string()),
            ("REQUEST_TIMEOUT_SECS".to_string(), "5".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        OpenRouterClient::new(&config).unwrap()
    }

    fn create_test_client() -> OpenRouterClient {
        client_for("http://test.local/chat")
    }

    /// Serves `router` on an ephemeral local port and returns its chat URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}/chat", address)
    }

    fn options() -> CompletionOptions {
        CompletionOptions::new(0.7, 10)
    }

    #[test]
    fn test_request_body_shape() {
        let client = create_test_client();
        let body = client.request_body("Recommend books", CompletionOptions::new(0.7, 1000));
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["model"], "openai/gpt-4o-mini");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Recommend books");
        assert_eq!(value["max_tokens"], 1000);
        assert!((value["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_first_choice_content_trims() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "  [] \n"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(first_choice_content(response).unwrap(), "[]");
    }

    #[test]
    fn test_missing_choices_is_api_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"id": "gen-1"}"#).unwrap();
        let err = first_choice_content(response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
    }

    #[test]
    fn test_missing_message_is_api_error() {
        let response: ChatResponse = serde_json::from_str(r#"{"choices": [{}]}"#).unwrap();
        let err = first_choice_content(response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let vars = vec![
            ("OPENROUTER_API_KEY".to_string(), "sk-test".to_string()),
            ("API_BASE_URL".to_string(), "http://127.0.0.1:1/chat".to_string()),
            ("REQUEST_TIMEOUT_SECS".to_string(), "2".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        let client = OpenRouterClient::new(&config).unwrap();

        let err = client
            .complete("hello", CompletionOptions::new(0.7, 10))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NetworkError);
    }

    #[tokio::test]
    async fn test_complete_sends_auth_and_returns_content() {
        let router = Router::new().route(
            "/chat",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let authorized = headers
                    .get("authorization")
                    .is_some_and(|v| v == "Bearer sk-test");
                let attributed = headers.get("x-title").is_some_and(|v| v == "BookPeckers");
                if !authorized || !attributed || body["messages"][0]["content"] != "hello" {
                    return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "bad request" })));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "choices": [{ "message": { "role": "assistant", "content": "  [] \n" } }]
                    })),
                )
            }),
        );
        let client = client_for(&serve(router).await);

        let content = client.complete("hello", options()).await.unwrap();
        assert_eq!(content, "[]");
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let router = Router::new().route(
            "/chat",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upstream exploded for key sk-or-secret",
                )
            }),
        );
        let client = client_for(&serve(router).await);

        let err = client.complete("hello", options()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert!(err.diagnostic.as_deref().unwrap().contains("500"));
        assert!(!err.user_message().contains("sk-or-secret"));
        assert!(!err.to_string().contains("sk-or-secret"));
    }

    #[tokio::test]
    async fn test_undecodable_envelope_is_api_error() {
        let router = Router::new().route("/chat", post(|| async { "not json" }));
        let client = client_for(&serve(router).await);

        let err = client.complete("hello", options()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert!(!err.user_message().contains("not json"));
    }
}
