//! OpenAI Adapter - 上游文本/图像生成服务

mod fake_generation_api;
mod openai_client;

pub use fake_generation_api::FakeGenerationApi;
pub use openai_client::{OpenAiClient, OpenAiClientConfig};
