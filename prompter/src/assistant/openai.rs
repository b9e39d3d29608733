use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::configuration::{ApiStyle, Configuration};

/// Anything that can turn a prompt into generated text.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    api_style: ApiStyle,
    client: Client,
}

impl OpenAiClient {
    pub fn new(config: &Configuration) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            base_url: config.base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_style: config.api_style,
            client: Client::new(),
        }
    }

    fn endpoint(&self) -> String {
        match self.api_style {
            ApiStyle::Chat => format!("{}/chat/completions", self.base_url),
            ApiStyle::Completion => format!("{}/completions", self.base_url),
        }
    }

    fn request_body(&self, prompt: &str) -> Value {
        match self.api_style {
            ApiStyle::Chat => json!({
                "model": self.model,
                "messages": [
                    {
                        "role": "user",
                        "content": prompt
                    }
                ],
                "max_tokens": self.max_tokens
            }),
            ApiStyle::Completion => json!({
                "model": self.model,
                "prompt": prompt,
                "max_tokens": self.max_tokens
            }),
        }
    }

    fn extract_text(&self, data: &Value) -> Option<String> {
        let choice = &data["choices"][0];
        let text = match self.api_style {
            ApiStyle::Chat => choice["message"]["content"].as_str(),
            ApiStyle::Completion => choice["text"].as_str(),
        }?;
        Some(text.trim().to_string())
    }
}

#[async_trait]
impl Completion for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.endpoint();
        tracing::debug!(%url, model = %self.model, "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("API error {}: {}", status, body));
        }

        let data = response.json::<Value>().await?;

        self.extract_text(&data)
            .ok_or_else(|| anyhow::anyhow!("Failed to get content from response"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(String, Value)>>>;

    // Serves a canned OpenAI-style reply and records what it was sent.
    async fn fake_openai(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let handler_state = (seen.clone(), status, reply);

        async fn handle(
            State((seen, status, reply)): State<(Seen, StatusCode, Value)>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> (StatusCode, Json<Value>) {
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_string();
            seen.lock().unwrap().push((auth, body));
            (status, Json(reply))
        }

        let app = Router::new()
            .route("/v1/chat/completions", post(handle))
            .route("/v1/completions", post(handle))
            .with_state(handler_state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/v1", addr), seen)
    }

    fn config(base_url: String, api_style: ApiStyle) -> Configuration {
        Configuration {
            openai_api_key: "sk-test".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_style,
            base_url,
            max_tokens: 200,
            audio_file_path: "generated_audio.wav".into(),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn chat_style_reads_message_content() {
        let reply = json!({"choices": [{"message": {"role": "assistant", "content": "  Warm jazz trio  \n"}}]});
        let (base_url, seen) = fake_openai(StatusCode::OK, reply).await;
        let client = OpenAiClient::new(&config(base_url, ApiStyle::Chat));

        let text = client.complete("describe jazz").await.unwrap();
        assert_eq!(text, "Warm jazz trio");

        let seen = seen.lock().unwrap();
        let (auth, body) = &seen[0];
        assert_eq!(auth, "Bearer sk-test");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "describe jazz");
        assert_eq!(body["max_tokens"], 200);
    }

    #[tokio::test]
    async fn completion_style_reads_text() {
        let reply = json!({"choices": [{"text": "\nBright synthwave, 120 bpm"}]});
        let (base_url, seen) = fake_openai(StatusCode::OK, reply).await;
        let client = OpenAiClient::new(&config(base_url, ApiStyle::Completion));

        let text = client.complete("synthwave").await.unwrap();
        assert_eq!(text, "Bright synthwave, 120 bpm");
        assert_eq!(seen.lock().unwrap()[0].1["prompt"], "synthwave");
    }

    #[tokio::test]
    async fn error_status_is_an_error() {
        let reply = json!({"error": {"message": "Incorrect API key provided"}});
        let (base_url, _) = fake_openai(StatusCode::UNAUTHORIZED, reply).await;
        let client = OpenAiClient::new(&config(base_url, ApiStyle::Chat));

        let err = client.complete("anything").await.unwrap_err();
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn missing_choices_is_an_error() {
        let (base_url, _) = fake_openai(StatusCode::OK, json!({"choices": []})).await;
        let client = OpenAiClient::new(&config(base_url, ApiStyle::Chat));

        assert!(client.complete("anything").await.is_err());
    }
}
