//! Checkout session storage
//!
//! Persists checkout wizard sessions in Redis with a TTL so an abandoned
//! checkout disappears on its own without touching seat inventory.

use redis::AsyncCommands;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::RedisConfig;
use crate::utils::errors::Result;

use super::wizard::CheckoutSession;

/// Redis-backed store for checkout sessions
#[derive(Clone)]
pub struct SessionStore {
    connection_manager: redis::aio::ConnectionManager,
    config: RedisConfig,
    ttl_seconds: u64,
}

impl SessionStore {
    /// Create a new session store instance
    pub async fn new(config: RedisConfig, ttl_seconds: u64) -> Result<Self> {
        let client = redis::Client::open(config.url.as_str())?;
        let connection_manager = redis::aio::ConnectionManager::new(client).await?;

        Ok(Self {
            connection_manager,
            config,
            ttl_seconds,
        })
    }

    /// Save a checkout session, refreshing its TTL
    pub async fn save(&self, session: &CheckoutSession) -> Result<()> {
        let key = self.session_key(session.id);
        let serialized = match serde_json::to_string(session) {
            Ok(data) => data,
            Err(e) => {
                error!(session_id = %session.id, error = %e, "Failed to serialize checkout session");
                return Err(e.into());
            }
        };

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(&key, serialized, self.ttl_seconds)
            .await?;

        debug!(session_id = %session.id, step = %session.step, ttl = self.ttl_seconds,
               "Checkout session saved");
        Ok(())
    }

    /// Load a checkout session; expired sessions are removed and treated
    /// as absent
    pub async fn load(&self, session_id: Uuid) -> Result<Option<CheckoutSession>> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let serialized: Option<String> = conn.get(&key).await?;
        let Some(data) = serialized else {
            debug!(session_id = %session_id, "No checkout session found");
            return Ok(None);
        };

        let session: CheckoutSession = match serde_json::from_str(&data) {
            Ok(session) => session,
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to deserialize checkout session");
                return Err(e.into());
            }
        };

        if session.is_expired() {
            warn!(session_id = %session_id, expires_at = %session.expires_at,
                  "Checkout session has expired, removing");
            self.delete(session_id).await?;
            return Ok(None);
        }

        debug!(session_id = %session_id, step = %session.step, "Checkout session loaded");
        Ok(Some(session))
    }

    /// Delete a checkout session
    pub async fn delete(&self, session_id: Uuid) -> Result<()> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let deleted: u32 = conn.del(&key).await?;
        if deleted > 0 {
            debug!(session_id = %session_id, "Checkout session deleted");
        }

        Ok(())
    }

    /// Check whether a session exists without loading it
    pub async fn exists(&self, session_id: Uuid) -> Result<bool> {
        let key = self.session_key(session_id);
        let mut conn = self.connection_manager.clone();

        let exists: bool = conn.exists(&key).await?;
        Ok(exists)
    }

    fn session_key(&self, session_id: Uuid) -> String {
        format!("{}checkout:{}", self.config.prefix, session_id)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("config", &self.config)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}
