use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_name: Option<String>,
}

/// Session store shared by everything that talks to the API.
/// Cloning shares the same underlying session.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(Session {
                token: token.into(),
                user_name: None,
            }))),
        }
    }

    pub async fn get(&self) -> Option<Session> {
        self.inner.read().await.clone()
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.as_ref().map(|session| session.token.clone())
    }

    pub async fn set(&self, session: Session) {
        *self.inner.write().await = Some(session);
    }

    /// Forget the token and user name. Returns what was stored.
    pub async fn remove(&self) -> Option<Session> {
        self.inner.write().await.take()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_state() {
        let session = SessionContext::new();
        let shared = session.clone();
        assert!(!shared.is_authenticated().await);

        session
            .set(Session {
                token: "t0k3n".to_string(),
                user_name: Some("Ana".to_string()),
            })
            .await;
        assert_eq!(shared.token().await.as_deref(), Some("t0k3n"));

        let removed = shared.remove().await.unwrap();
        assert_eq!(removed.user_name.as_deref(), Some("Ana"));
        assert_eq!(session.get().await, None);
    }
}
