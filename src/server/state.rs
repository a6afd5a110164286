//! Application state management.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{Instant, sleep};

use crate::service::UserService;
use crate::store::{StoreError, UserStore};

use super::config::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    service: UserService,
}

impl AppState {
    pub fn new(service: UserService) -> Self {
        Self { service }
    }

    /// Open the user store under the configured database directory.
    ///
    /// Returns the store handle too, so the caller can close it on shutdown.
    pub fn from_config(config: &Config) -> Result<(Self, Arc<UserStore>), StateError> {
        let path = config.users_db_path();
        let store = UserStore::open(&path).map_err(|source| StateError::OpenStore {
            path: path.display().to_string(),
            source,
        })?;
        let store = Arc::new(store);
        Ok((Self::new(UserService::new(Arc::clone(&store))), store))
    }

    pub fn service(&self) -> &UserService {
        &self.service
    }
}

/// Close `store` once every other handle is gone.
///
/// Blocking tasks detached by a failed fan-out may still hold a clone after
/// the server stops, so this polls for up to `grace`. Returns `false` when
/// the store was still shared at the deadline and only dropped.
pub async fn close_store(mut store: Arc<UserStore>, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    loop {
        match Arc::try_unwrap(store) {
            Ok(owned) => {
                owned.close();
                return true;
            }
            Err(shared) if Instant::now() < deadline => {
                store = shared;
                sleep(Duration::from_millis(20)).await;
            }
            Err(shared) => {
                tracing::warn!(
                    handles = Arc::strong_count(&shared),
                    "user store still referenced after {:?}, dropping without close",
                    grace
                );
                return false;
            }
        }
    }
}

/// Errors that can occur when setting up application state.
#[derive(Debug)]
pub enum StateError {
    /// Failed to open or create the user store.
    OpenStore { path: String, source: StoreError },
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::OpenStore { path, source } => {
                write!(f, "Failed to open user store at '{}': {}", path, source)
            }
        }
    }
}

impl std::error::Error for StateError {}
