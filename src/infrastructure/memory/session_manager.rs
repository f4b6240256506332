//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;

use crate::application::ports::{SessionError, SessionManagerPort, SlideshowSession};
use crate::domain::slideshow::{SlideView, SlideshowController};
use crate::domain::story::Story;

/// 内存会话管理器
///
/// 每个会话持有一个 SlideshowController；状态变更在分片锁内完成，不跨越 await
pub struct InMemorySessionManager {
    sessions: DashMap<String, SlideshowSession>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// 在会话的控制器上执行操作并刷新活动时间
    fn with_controller<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut SlideshowController) -> T,
    ) -> Result<T, SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        session.last_activity = Utc::now();
        Ok(f(&mut session.controller))
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: SlideshowSession) -> Result<String, SessionError> {
        let session_id = session.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(session_id.clone(), session);
        tracing::info!(session_id = %session_id, "Session created");
        Ok(session_id)
    }

    fn render(&self, id: &str) -> Result<SlideView, SessionError> {
        self.with_controller(id, |c| c.render())
    }

    fn next(&self, id: &str) -> Result<SlideView, SessionError> {
        self.with_controller(id, |c| c.next().map(|_| c.render()))?
            .map_err(SessionError::from)
    }

    fn previous(&self, id: &str) -> Result<SlideView, SessionError> {
        self.with_controller(id, |c| c.previous().map(|_| c.render()))?
            .map_err(SessionError::from)
    }

    fn load_story(&self, id: &str, story: Story) -> Result<SlideView, SessionError> {
        self.with_controller(id, |c| {
            c.load_story(story);
            c.render()
        })
    }

    fn begin_generation(&self, id: &str) -> Result<(), SessionError> {
        self.with_controller(id, |c| c.begin_generation())?
            .map_err(SessionError::from)
    }

    fn finish_generation(
        &self,
        id: &str,
        outcome: Result<Story, String>,
    ) -> Result<SlideView, SessionError> {
        self.with_controller(id, |c| {
            c.finish_generation(outcome);
            c.render()
        })
    }

    fn is_valid(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::info!(session_id = %id, "Session closed");
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(i64::try_from(idle_timeout_secs).unwrap_or(i64::MAX));

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn list_all(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::slideshow::{SlideshowError, ViewState};
    use crate::domain::story::{ImageRef, Slide};

    fn story(n: usize) -> Story {
        Story::new(
            (1..=n)
                .map(|i| Slide::new(format!("page {}", i), ImageRef::placeholder(), None))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_session_lifecycle() {
        let manager = InMemorySessionManager::new();
        let session_id = manager.create(SlideshowSession::new()).unwrap();

        // 新会话为空
        let view = manager.render(&session_id).unwrap();
        assert_eq!(view.state, ViewState::Empty);

        // 加载并翻页
        let view = manager.load_story(&session_id, story(3)).unwrap();
        assert_eq!(view.counter, "1 / 3");
        let view = manager.next(&session_id).unwrap();
        assert_eq!(view.index, 1);
        let view = manager.previous(&session_id).unwrap();
        assert_eq!(view.index, 0);

        assert!(manager.is_valid(&session_id));
        manager.close(&session_id).unwrap();
        assert!(!manager.is_valid(&session_id));
        assert!(matches!(
            manager.render(&session_id),
            Err(SessionError::NotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_session_rejected() {
        let manager = InMemorySessionManager::new();
        let session = SlideshowSession::new();
        manager.create(session.clone()).unwrap();
        assert!(matches!(
            manager.create(session),
            Err(SessionError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_generation_guard_per_session() {
        let manager = InMemorySessionManager::new();
        let a = manager.create(SlideshowSession::new()).unwrap();
        let b = manager.create(SlideshowSession::new()).unwrap();

        manager.begin_generation(&a).unwrap();
        assert!(matches!(
            manager.begin_generation(&a),
            Err(SessionError::Slideshow(SlideshowError::GenerationInProgress))
        ));
        // 其它会话不受影响
        manager.begin_generation(&b).unwrap();

        let view = manager.finish_generation(&a, Err("boom".to_string())).unwrap();
        assert_eq!(view.state, ViewState::Failed);
        assert!(view.can_generate);
        manager.begin_generation(&a).unwrap();
    }

    #[test]
    fn test_navigation_without_story() {
        let manager = InMemorySessionManager::new();
        let id = manager.create(SlideshowSession::new()).unwrap();
        assert!(matches!(
            manager.next(&id),
            Err(SessionError::Slideshow(SlideshowError::NoStory))
        ));
    }

    #[test]
    fn test_expired_sessions() {
        let manager = InMemorySessionManager::new();
        let mut stale = SlideshowSession::new();
        stale.last_activity = Utc::now() - chrono::Duration::seconds(600);
        let stale_id = manager.create(stale).unwrap();
        let fresh_id = manager.create(SlideshowSession::new()).unwrap();

        let expired = manager.get_expired_sessions(300);
        assert_eq!(expired, vec![stale_id.clone()]);

        // 访问会刷新活动时间
        manager.render(&stale_id).unwrap();
        assert!(manager.get_expired_sessions(300).is_empty());
        assert_eq!(manager.list_all().len(), 2);
        assert!(manager.is_valid(&fresh_id));
    }
}
