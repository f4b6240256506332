//! HTTP Server
//!
//! Axum HTTP 服务器启动和配置

use std::path::PathBuf;
use std::sync::Arc;

use axum::middleware;
use axum::Router;
use http::header::CONTENT_TYPE;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::middleware::error_logging_middleware;
use super::routes::create_routes;
use super::state::AppState;

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// 故事库目录，挂载到 /story_assets
    pub assets_dir: PathBuf,
    /// 前端静态文件目录（可选），作为兜底服务
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5070,
            assets_dir: PathBuf::from("story_assets"),
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_assets_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.assets_dir = dir.into();
        self
    }

    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// HTTP 服务器
pub struct HttpServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl HttpServer {
    /// 创建新的 HTTP 服务器
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self {
            config,
            state: Arc::new(state),
        }
    }

    /// 构建 Router
    fn build_router(&self) -> Router {
        // CORS 配置 - 前端可能部署在其它域名
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers([CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600));

        let mut router = create_routes()
            .nest_service("/story_assets", ServeDir::new(&self.config.assets_dir));

        if let Some(static_dir) = &self.config.static_dir {
            router = router.fallback_service(ServeDir::new(static_dir));
        }

        router
            .layer(middleware::from_fn(error_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(cors)
            .with_state(self.state.clone())
    }

    /// 启动服务器（带优雅关闭）
    pub async fn run_with_shutdown<F>(self, shutdown_signal: F) -> Result<(), std::io::Error>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let router = self.build_router();
        let addr = self.config.addr();

        info!(
            assets_dir = %self.config.assets_dir.display(),
            "Starting HTTP server on {} (with graceful shutdown)",
            addr
        );

        let listener = TcpListener::bind(&addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await?;

        Ok(())
    }
}
