//! Cached lookup of the signed-in operator.
//!
//! [`SessionCache`] keeps the last answer of a [`SessionSource`] for a short
//! TTL. Concurrent callers that miss the cache share one fetch: the cache
//! lock is held while the source is queried.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::{OperatorConfig, SessionConfig};
use crate::error::EngineResult;

/// The operator using the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Operator identifier.
    pub id: String,
    /// Operator email.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    /// Role name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl From<OperatorConfig> for CurrentUser {
    fn from(operator: OperatorConfig) -> Self {
        CurrentUser {
            id: operator.id,
            email: operator.email,
            full_name: operator.full_name,
            role: operator.role,
        }
    }
}

/// Somewhere the current operator can be looked up.
#[async_trait]
pub trait SessionSource: Send + Sync {
    /// Returns the signed-in operator, or `None` when nobody is signed in.
    async fn fetch(&self) -> EngineResult<Option<CurrentUser>>;
}

/// A source that always answers with the operator from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSessionSource {
    operator: Option<CurrentUser>,
}

impl StaticSessionSource {
    /// Creates a source answering with `operator`.
    pub fn new(operator: Option<CurrentUser>) -> Self {
        Self { operator }
    }
}

#[async_trait]
impl SessionSource for StaticSessionSource {
    async fn fetch(&self) -> EngineResult<Option<CurrentUser>> {
        Ok(self.operator.clone())
    }
}

#[derive(Debug)]
struct CachedSession {
    user: Option<CurrentUser>,
    fetched_at: Instant,
}

/// A TTL cache in front of a [`SessionSource`].
pub struct SessionCache<S> {
    source: S,
    ttl: Duration,
    cached: Mutex<Option<CachedSession>>,
}

impl SessionCache<StaticSessionSource> {
    /// Builds a cache over the operator named in the session settings.
    pub fn from_config(config: &SessionConfig) -> Self {
        let source = StaticSessionSource::new(config.operator.clone().map(CurrentUser::from));
        SessionCache::new(source, Duration::from_millis(config.ttl_ms))
    }
}

impl<S: SessionSource> SessionCache<S> {
    /// Creates an empty cache over `source`.
    pub fn new(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Returns the current operator.
    ///
    /// A cached answer younger than the TTL is reused unless
    /// `force_refresh` is set. A failing source is logged and cached as
    /// nobody signed in.
    pub async fn current(&self, force_refresh: bool) -> Option<CurrentUser> {
        let mut cached = self.cached.lock().await;

        if !force_refresh {
            if let Some(entry) = cached.as_ref() {
                if entry.fetched_at.elapsed() < self.ttl {
                    return entry.user.clone();
                }
            }
        }

        let user = match self.source.fetch().await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Session lookup failed");
                None
            }
        };
        debug!(signed_in = user.is_some(), "Session refreshed");

        *cached = Some(CachedSession {
            user: user.clone(),
            fetched_at: Instant::now(),
        });
        user
    }

    /// Forgets the cached answer.
    pub async fn clear(&self) {
        *self.cached.lock().await = None;
    }
}
