//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 上游 OpenAI 配置
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// 故事生成配置
    #[serde(default)]
    pub story: StoryConfig,

    /// 生成客户端配置
    #[serde(default)]
    pub client: ClientConfig,

    /// 故事库配置
    #[serde(default)]
    pub library: LibraryConfig,

    /// GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 公开访问的 Base URL
    /// 如果未设置，则使用 http://{host}:{port}
    #[serde(default)]
    pub base_url: Option<String>,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置（前端页面）
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default)]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            base_url: None,
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// 获取公开的 Base URL
    pub fn public_base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| {
            let host = if self.host == "0.0.0.0" {
                "localhost"
            } else {
                &self.host
            };
            format!("http://{}:{}", host, self.port)
        })
    }
}

/// OpenAI 配置
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API Key；未设置时回退到 OPENAI_API_KEY 环境变量
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_chat_model")]
    pub chat_model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_image_size")]
    pub image_size: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 请求超时时间（秒）；未设置时不限制
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_image_model() -> String {
    "dall-e-2".to_string()
}

fn default_image_size() -> String {
    "512x512".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_openai_base_url(),
            chat_model: default_chat_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: None,
        }
    }
}

impl OpenAiConfig {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// 故事生成配置
#[derive(Debug, Clone, Deserialize)]
pub struct StoryConfig {
    /// 每个故事的幻灯片数量
    #[serde(default = "default_slide_count")]
    pub slide_count: usize,

    /// 未提供提示词时的默认提示词
    #[serde(default = "default_prompt")]
    pub default_prompt: String,
}

fn default_slide_count() -> usize {
    5
}

fn default_prompt() -> String {
    "A gentle bedtime story about a sleepy animal".to_string()
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            slide_count: default_slide_count(),
            default_prompt: default_prompt(),
        }
    }
}

/// 生成客户端配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientConfig {
    /// 远端生成端点的 Base URL；未设置时在进程内调用
    #[serde(default)]
    pub backend_url: Option<String>,

    /// 远端调用超时时间（秒）；未设置时不限制
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// 故事库配置
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// 故事库目录
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("story_assets")
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
        }
    }
}

/// GC 配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用会话回收
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// 扫描间隔（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 会话空闲过期时间（秒）
    #[serde(default = "default_session_expire")]
    pub session_expire_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    300
}

fn default_session_expire() -> u64 {
    3600
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            session_expire_secs: default_session_expire(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
