use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::entities::Session;
use crate::error::StoreError;
use crate::store::{TokenStore, SESSION_STORAGE_KEY};

/// Point-in-time view of the authentication state. Readers get a copy and
/// never hold the lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub is_loading: bool,
    pub session: Option<Session>,
}

impl AuthSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Process-wide session holder. `login` and `logout` are the only writers.
///
/// Cloning is cheap and every clone shares the same state and store, so the
/// context can be handed to whatever issues HTTP calls.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    state: Arc<RwLock<AuthSnapshot>>,
}

impl SessionContext {
    /// Starts in the loading state until [`SessionContext::hydrate`] completes.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            state: Arc::new(RwLock::new(AuthSnapshot {
                is_loading: true,
                session: None,
            })),
        }
    }

    /// Reads the persisted session once. An unreadable or corrupt record is
    /// logged and treated as logged out; loading always ends.
    pub async fn hydrate(&self) -> Option<Session> {
        let session = match self.read_stored().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "discarding unreadable stored session");
                None
            }
        };

        let mut state = self.state.write().await;
        state.session = session.clone();
        state.is_loading = false;
        if let Some(s) = &session {
            info!(user_id = %s.id, "session restored");
        }
        session
    }

    pub async fn login(&self, session: Session) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&session).map_err(|source| StoreError::Corrupt {
            key: SESSION_STORAGE_KEY.to_string(),
            source,
        })?;
        self.store.set_item(SESSION_STORAGE_KEY, &raw).await?;

        info!(user_id = %session.id, role = %session.role, "logged in");
        let mut state = self.state.write().await;
        state.session = Some(session);
        state.is_loading = false;
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), StoreError> {
        {
            let mut state = self.state.write().await;
            state.session = None;
            state.is_loading = false;
        }
        self.store.delete_item(SESSION_STORAGE_KEY).await?;
        info!("logged out");
        Ok(())
    }

    pub async fn snapshot(&self) -> AuthSnapshot {
        self.state.read().await.clone()
    }

    /// Bearer token read from the store at call time, not from memory, so a
    /// login or logout elsewhere is picked up by the next request.
    pub async fn bearer_token(&self) -> Result<Option<String>, StoreError> {
        Ok(self
            .read_stored()
            .await?
            .map(|s| s.access_token)
            .filter(|t| !t.is_empty()))
    }

    async fn read_stored(&self) -> Result<Option<Session>, StoreError> {
        match self.store.get_item(SESSION_STORAGE_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StoreError::Corrupt {
                    key: SESSION_STORAGE_KEY.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }
}
