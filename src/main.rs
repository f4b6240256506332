//! Storytime - 睡前故事幻灯片服务
//!
//! - Domain: story/, slideshow/
//! - Application: commands, queries, ports, services
//! - Infrastructure: http, memory, worker, adapters

use std::sync::Arc;

use storytime::application::ports::StoryBackendPort;
use storytime::application::services::{GenerationClient, PassthroughService, PassthroughSettings};
use storytime::config::{load_config, print_config, AppConfig};
use storytime::infrastructure::adapters::{
    FileStoryLibrary, HttpBackendClient, HttpBackendClientConfig, LocalBackend, OpenAiClient,
    OpenAiClientConfig,
};
use storytime::infrastructure::http::{AppState, HttpServer, ServerConfig, SlideshowSettings};
use storytime::infrastructure::memory::InMemorySessionManager;
use storytime::infrastructure::worker::{SessionGcConfig, SessionGcWorker};

fn init_tracing(config: &AppConfig) {
    let log_filter = format!(
        "{},storytime={},tower_http=debug",
        config.log.level, config.log.level
    );
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    if config.log.json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config);

    tracing::info!("Storytime - 睡前故事幻灯片服务");
    print_config(&config);

    // 确保故事库目录存在
    tokio::fs::create_dir_all(&config.library.assets_dir).await?;

    // 上游 OpenAI 客户端与透传服务
    let openai_config = OpenAiClientConfig {
        base_url: config.openai.base_url.clone(),
        api_key: config.openai.api_key.clone(),
        chat_model: config.openai.chat_model.clone(),
        image_model: config.openai.image_model.clone(),
        image_size: config.openai.image_size.clone(),
        timeout_secs: config.openai.timeout_secs,
    };
    let openai = Arc::new(OpenAiClient::new(openai_config)?);
    let passthrough = Arc::new(PassthroughService::new(
        openai,
        PassthroughSettings {
            temperature: config.openai.temperature,
            max_tokens: config.openai.max_tokens,
        },
    ));

    // 故事生成后端：配置了远端地址时走 HTTP，否则进程内调用
    let backend: Arc<dyn StoryBackendPort> = match &config.client.backend_url {
        Some(url) => Arc::new(HttpBackendClient::new(HttpBackendClientConfig {
            base_url: url.clone(),
            timeout_secs: config.client.timeout_secs,
        })?),
        None => Arc::new(LocalBackend::new(passthrough.clone())),
    };
    let generation_client = Arc::new(GenerationClient::new(backend, config.story.slide_count));

    // 会话与故事库
    let session_manager = Arc::new(InMemorySessionManager::new());
    let library = Arc::new(FileStoryLibrary::new(
        &config.library.assets_dir,
        config.story.slide_count,
    ));

    // 启动会话 GC
    if config.gc.enabled {
        let gc = SessionGcWorker::new(
            SessionGcConfig {
                interval_secs: config.gc.interval_secs,
                session_expire_secs: config.gc.session_expire_secs,
            },
            session_manager.clone(),
        );
        tokio::spawn(gc.run());
    }

    let state = AppState::new(
        session_manager,
        library,
        passthrough,
        generation_client,
        SlideshowSettings {
            slide_count: config.story.slide_count,
            default_prompt: config.story.default_prompt.clone(),
            asset_prefix: "/story_assets".to_string(),
        },
    );

    let static_dir = config
        .server
        .static_files
        .enabled
        .then(|| config.server.static_files.dir.clone());
    let server_config = ServerConfig::new(&config.server.host, config.server.port)
        .with_assets_dir(&config.library.assets_dir)
        .with_static_dir(static_dir);

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for ctrl-c");
                return;
            }
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
