//! Session GC Worker - 定期关闭空闲会话

use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::SessionManagerPort;

/// GC 配置
#[derive(Debug, Clone)]
pub struct SessionGcConfig {
    /// 扫描间隔（秒）
    pub interval_secs: u64,
    /// 会话空闲超过该时间（秒）即关闭
    pub session_expire_secs: u64,
}

impl Default for SessionGcConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            session_expire_secs: 3600,
        }
    }
}

/// 会话 GC Worker
pub struct SessionGcWorker {
    config: SessionGcConfig,
    session_manager: Arc<dyn SessionManagerPort>,
}

impl SessionGcWorker {
    pub fn new(config: SessionGcConfig, session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self {
            config,
            session_manager,
        }
    }

    /// 启动 Worker，随进程退出
    pub async fn run(self) {
        tracing::info!(
            interval_secs = self.config.interval_secs,
            session_expire_secs = self.config.session_expire_secs,
            "SessionGcWorker started"
        );

        let mut ticker = tokio::time::interval(Duration::from_secs(self.config.interval_secs.max(1)));
        // 第一次 tick 立即返回
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep();
        }
    }

    /// 执行一次清理，返回关闭的会话数
    pub fn sweep(&self) -> usize {
        let expired = self
            .session_manager
            .get_expired_sessions(self.config.session_expire_secs);

        let mut closed = 0;
        for id in &expired {
            match self.session_manager.close(id) {
                Ok(()) => closed += 1,
                Err(e) => tracing::debug!(session_id = %id, error = %e, "Session already gone"),
            }
        }

        if closed > 0 {
            tracing::info!(
                closed,
                remaining = self.session_manager.list_all().len(),
                "Expired sessions closed"
            );
        }

        closed
    }
}
