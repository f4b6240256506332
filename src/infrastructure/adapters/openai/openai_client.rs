//! OpenAI Client - 调用 OpenAI 文本补全与图像生成接口
//!
//! 实现 GenerationApiPort trait
//!
//! 上游 API:
//! POST {base_url}/chat/completions   Request: {model, messages, temperature, max_tokens}
//! POST {base_url}/images/generations Request: {model, prompt, n, size}
//! 错误响应: {"error": {"message": "..."}}

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ChatRequest, GenerationApiPort, ImageRequest, UpstreamError};

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct ImageGenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
}

#[derive(Debug, Deserialize)]
struct ImageGenerationResponse {
    #[serde(default)]
    data: Vec<ImageDatum>,
}

#[derive(Debug, Deserialize)]
struct ImageDatum {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// OpenAI 客户端配置
#[derive(Debug, Clone)]
pub struct OpenAiClientConfig {
    /// API 基础 URL
    pub base_url: String,
    /// API Key；未配置时所有生成请求被拒绝
    pub api_key: Option<String>,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
    /// 请求超时时间（秒）；未设置时使用 HTTP 客户端默认行为
    pub timeout_secs: Option<u64>,
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            chat_model: "gpt-3.5-turbo".to_string(),
            image_model: "dall-e-2".to_string(),
            image_size: "512x512".to_string(),
            timeout_secs: None,
        }
    }
}

impl OpenAiClientConfig {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            ..Default::default()
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// OpenAI 客户端
pub struct OpenAiClient {
    client: Client,
    config: OpenAiClientConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiClientConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn api_key(&self) -> Result<&str, UpstreamError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(UpstreamError::MissingCredential)
    }

    /// 发送 JSON POST 请求，非 2xx 转换为 UpstreamError::Status
    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, UpstreamError> {
        let api_key = self.api_key()?;
        let url = self.url(path);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout
                } else if e.is_connect() {
                    UpstreamError::NetworkError(format!("Cannot connect to OpenAI API: {}", e))
                } else {
                    UpstreamError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status, &body));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }
}

/// 从非 2xx 响应构造错误：原因短语取标准 reason phrase，消息取 error.message
fn status_error(status: StatusCode, body: &str) -> UpstreamError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Unknown error".to_string());

    UpstreamError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message,
    }
}

#[async_trait]
impl GenerationApiPort for OpenAiClient {
    fn has_credential(&self) -> bool {
        self.api_key().is_ok()
    }

    async fn complete_chat(&self, request: ChatRequest) -> Result<Option<String>, UpstreamError> {
        let body = ChatCompletionRequest {
            model: &self.config.chat_model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        tracing::debug!(
            model = %self.config.chat_model,
            prompt_len = request.user_prompt.len(),
            max_tokens = request.max_tokens,
            "Sending chat completion request"
        );

        let response: ChatCompletionResponse = self.post_json("chat/completions", &body).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .map(|c| c.trim().to_string());

        tracing::info!(
            model = %self.config.chat_model,
            content_len = content.as_ref().map(String::len).unwrap_or(0),
            "Chat completion finished"
        );

        Ok(content)
    }

    async fn generate_image(&self, request: ImageRequest) -> Result<Option<String>, UpstreamError> {
        let body = ImageGenerationRequest {
            model: &self.config.image_model,
            prompt: &request.prompt,
            n: 1,
            size: &self.config.image_size,
        };

        tracing::debug!(
            model = %self.config.image_model,
            prompt_len = request.prompt.len(),
            "Sending image generation request"
        );

        let response: ImageGenerationResponse =
            self.post_json("images/generations", &body).await?;

        Ok(response
            .data
            .into_iter()
            .next()
            .and_then(|d| d.url)
            .filter(|u| !u.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OpenAiClientConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.chat_model, "gpt-3.5-turbo");
        assert_eq!(config.image_model, "dall-e-2");
        assert_eq!(config.image_size, "512x512");
        assert!(config.api_key.is_none());
        assert!(config.timeout_secs.is_none());

        let config = config.with_timeout(30);
        assert_eq!(config.timeout_secs, Some(30));
        assert!(OpenAiClient::new(config).is_ok());
    }

    #[test]
    fn test_missing_or_blank_key_has_no_credential() {
        let client = OpenAiClient::new(OpenAiClientConfig::new(None)).unwrap();
        assert!(!client.has_credential());

        let client = OpenAiClient::new(OpenAiClientConfig::new(Some(String::new()))).unwrap();
        assert!(!client.has_credential());

        let client = OpenAiClient::new(OpenAiClientConfig::new(Some("sk-test".into()))).unwrap();
        assert!(client.has_credential());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = OpenAiClient::new(
            OpenAiClientConfig::default().with_base_url("http://localhost:9000/v1/"),
        )
        .unwrap();
        assert_eq!(client.url("chat/completions"), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_status_error_reads_upstream_message() {
        let err = status_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error": {"message": "Rate limit reached", "type": "requests"}}"#,
        );
        match err {
            UpstreamError::Status {
                status,
                reason,
                message,
            } => {
                assert_eq!(status, 429);
                assert_eq!(reason, "Too Many Requests");
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_status_error_without_body() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert!(matches!(
            err,
            UpstreamError::Status { status: 502, ref message, .. } if message == "Unknown error"
        ));
    }

    #[tokio::test]
    async fn test_requests_without_key_fail_before_network() {
        let client = OpenAiClient::new(
            OpenAiClientConfig::default().with_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let err = client
            .generate_image(ImageRequest {
                prompt: "a fox".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::MissingCredential));
    }
}
