//! HTTP Backend Client - 调用远端部署的透传端点
//!
//! POST {base_url}/api/generate-story  {"prompt", "storyLength"} -> {"storyText"}
//! POST {base_url}/api/generate-image  {"paragraphText"}         -> {"imageUrl"}
//! POST {base_url}/api/generate-audio  {"paragraphText"}         -> {"audioData"}
//! 失败响应: {"error": "..."}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{BackendError, StoryBackendPort};
use crate::domain::story::Narration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StoryRequest<'a> {
    prompt: &'a str,
    story_length: u32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ParagraphRequest<'a> {
    paragraph_text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoryResponse {
    story_text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AudioResponse {
    audio_data: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// HTTP 后端客户端配置
#[derive(Debug, Clone)]
pub struct HttpBackendClientConfig {
    /// 后端基础 URL
    pub base_url: String,
    /// 请求超时时间（秒）；未设置时使用 HTTP 客户端默认行为
    pub timeout_secs: Option<u64>,
}

impl Default for HttpBackendClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5070".to_string(),
            timeout_secs: None,
        }
    }
}

impl HttpBackendClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// HTTP 后端客户端
pub struct HttpBackendClient {
    client: Client,
    config: HttpBackendClientConfig,
}

impl HttpBackendClient {
    pub fn new(config: HttpBackendClientConfig) -> Result<Self, BackendError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| BackendError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, BackendError> {
        let url = self.url(path);
        tracing::debug!(url = %url, "Calling story backend");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BackendError::NetworkError(format!("Backend request timed out: {}", e))
                } else {
                    BackendError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(BackendError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<R>()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl StoryBackendPort for HttpBackendClient {
    async fn generate_story(&self, prompt: &str, story_length: u32) -> Result<String, BackendError> {
        let response: StoryResponse = self
            .post(
                "/api/generate-story",
                &StoryRequest {
                    prompt,
                    story_length,
                },
            )
            .await?;
        response
            .story_text
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| BackendError::InvalidResponse("Missing storyText".to_string()))
    }

    async fn generate_image(&self, paragraph_text: &str) -> Result<String, BackendError> {
        let response: ImageResponse = self
            .post("/api/generate-image", &ParagraphRequest { paragraph_text })
            .await?;
        response
            .image_url
            .filter(|u| !u.is_empty())
            .ok_or_else(|| BackendError::InvalidResponse("Missing imageUrl".to_string()))
    }

    async fn generate_audio(&self, paragraph_text: &str) -> Result<Option<Narration>, BackendError> {
        let response: AudioResponse = self
            .post("/api/generate-audio", &ParagraphRequest { paragraph_text })
            .await?;
        Ok(response.audio_data.as_deref().and_then(Narration::from_marker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpBackendClientConfig::new("http://stories.local:8080/").with_timeout(30);
        assert_eq!(config.timeout_secs, Some(30));

        let client = HttpBackendClient::new(config).unwrap();
        assert_eq!(
            client.url("/api/generate-story"),
            "http://stories.local:8080/api/generate-story"
        );
    }

    #[test]
    fn test_request_bodies_use_camel_case() {
        let body = serde_json::to_value(StoryRequest {
            prompt: "a fox",
            story_length: 5,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"prompt": "a fox", "storyLength": 5}));

        let body = serde_json::to_value(ParagraphRequest {
            paragraph_text: "a fox",
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"paragraphText": "a fox"}));
    }

    #[test]
    fn test_null_audio_data_parses() {
        let response: AudioResponse = serde_json::from_str(r#"{"audioData": null}"#).unwrap();
        assert!(response.audio_data.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let client = HttpBackendClient::new(HttpBackendClientConfig::new("http://127.0.0.1:1")).unwrap();
        let err = client.generate_story("a fox", 5).await.unwrap_err();
        assert!(matches!(err, BackendError::NetworkError(_)));
    }
}
