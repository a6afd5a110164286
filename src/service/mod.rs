//! RPC handlers on top of the [`UserStore`].
//!
//! [`UserService`] is the facade a transport binds to. Handlers are async;
//! every store call runs on the blocking pool, and operations touching more
//! than one user record fan out into concurrent store calls.
//!
//! Handlers are grouped by concern:
//!
//! - account: login, registration, profile reads and updates
//! - social: following and followers listings, follow and unfollow
//! - activity: authored content references and saved threads
//! - notifs: the unread and read notification queues

mod account;
mod activity;
mod messages;
mod notifs;
mod social;
mod status;

use std::sync::Arc;

use tracing::error;

use crate::store::{Change, StoreError, User, UserStore};

pub use messages::{
    BasicDataUpdate, CreateThreadRequest, DashboardData, FollowRequest, LoginRequest,
    RegisterUserRequest, UserCard, UserHeaderData, UserIdResponse, UserView, ViewContext,
};
pub use status::{Code, Status};

/// Maximum number of users returned by one [`UserService::view_users`] page.
pub const VIEW_USERS_QUANTITY: usize = 10;

/// The user service.
///
/// Cheap to clone; clones share the store handle.
#[derive(Clone)]
pub struct UserService {
    store: Option<Arc<UserStore>>,
}

impl UserService {
    pub fn new(store: Arc<UserStore>) -> Self {
        Self { store: Some(store) }
    }

    /// A service without a store. Every handler fails with `Internal`.
    pub fn disconnected() -> Self {
        Self { store: None }
    }

    /// The store handle, or `Internal "No database connection"`.
    fn store(&self) -> Result<Arc<UserStore>, Status> {
        self.store
            .clone()
            .ok_or_else(|| Status::internal("No database connection"))
    }

    /// Run `op` against the store on the blocking pool.
    async fn run_blocking<T, F>(&self, op: F) -> Result<T, Status>
    where
        F: FnOnce(&UserStore) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store()?;
        run_on(store, op).await
    }

    async fn load(&self, uid: &str) -> Result<User, Status> {
        let uid = uid.to_string();
        self.run_blocking(move |store| store.user(&uid)).await
    }

    async fn update<F>(&self, uid: &str, transform: F) -> Result<Change, Status>
    where
        F: FnOnce(&mut User) -> Change + Send + 'static,
    {
        let uid = uid.to_string();
        self.run_blocking(move |store| store.update_user(&uid, transform))
            .await
    }
}

async fn run_on<T, F>(store: Arc<UserStore>, op: F) -> Result<T, Status>
where
    F: FnOnce(&UserStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|e| {
            error!(error = %e, "store task failed");
            Status::internal(format!("Store task failed: {}", e))
        })?
        .map_err(Status::from)
}
