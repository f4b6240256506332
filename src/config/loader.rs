//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 上游凭证的通用环境变量
const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `STORYTIME_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `STORYTIME_SERVER__PORT=8080`
/// - `STORYTIME_OPENAI__CHAT_MODEL=gpt-4o-mini`
/// - `STORYTIME_STORY__SLIDE_COUNT=6`
/// - `STORYTIME_CLIENT__BACKEND_URL=https://stories.example.com`
/// - `OPENAI_API_KEY=sk-...`（openai.api_key 未设置时使用）
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("openai.base_url", "https://api.openai.com/v1")?
        .set_default("openai.chat_model", "gpt-3.5-turbo")?
        .set_default("openai.image_model", "dall-e-2")?
        .set_default("openai.image_size", "512x512")?
        .set_default("openai.temperature", 0.7)?
        .set_default("openai.max_tokens", 500)?
        .set_default("story.slide_count", 5)?
        .set_default("library.assets_dir", "story_assets")?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 300)?
        .set_default("gc.session_expire_secs", 3600)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: STORYTIME_OPENAI__BASE_URL=http://localhost:9000/v1
    builder = builder.add_source(
        Environment::with_prefix("STORYTIME")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let mut app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    apply_credential_fallback(&mut app_config, std::env::var(OPENAI_API_KEY_VAR).ok());

    validate_config(&app_config)?;

    Ok(app_config)
}

/// openai.api_key 未设置时使用 OPENAI_API_KEY
fn apply_credential_fallback(config: &mut AppConfig, env_key: Option<String>) {
    if config.openai.has_api_key() {
        return;
    }
    config.openai.api_key = env_key.filter(|k| !k.trim().is_empty());
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    if config.story.slide_count == 0 {
        return Err(ConfigError::ValidationError(
            "Slide count must be at least 1".to_string(),
        ));
    }

    if config.openai.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "OpenAI base URL cannot be empty".to_string(),
        ));
    }

    if config
        .client
        .backend_url
        .as_deref()
        .is_some_and(|url| url.trim().is_empty())
    {
        return Err(ConfigError::ValidationError(
            "Backend URL cannot be blank when set".to_string(),
        ));
    }

    if config.gc.enabled && config.gc.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Public Base URL: {}", config.server.public_base_url());
    tracing::info!("OpenAI Base URL: {}", config.openai.base_url);
    tracing::info!(
        "OpenAI Models: chat={}, image={} ({})",
        config.openai.chat_model,
        config.openai.image_model,
        config.openai.image_size
    );
    tracing::info!(
        "OpenAI API Key: {}",
        if config.openai.has_api_key() { "configured" } else { "NOT configured" }
    );
    tracing::info!("Slides per Story: {}", config.story.slide_count);
    match &config.client.backend_url {
        Some(url) => tracing::info!("Generation Backend: {}", url),
        None => tracing::info!("Generation Backend: in-process"),
    }
    tracing::info!("Story Library: {:?}", config.library.assets_dir);
    if config.server.static_files.enabled {
        tracing::info!("Static Files: {:?}", config.server.static_files.dir);
    }
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Session Expire: {}s", config.gc.session_expire_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}
