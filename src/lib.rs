//! User accounts, follow graph and activity references.
//!
//! The crate keeps user profiles, credentials, followers and following lists,
//! notification queues and references to user-authored content in a single
//! redb file, and exposes them through an async service facade.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use users_service::prelude::*;
//!
//! let store = Arc::new(UserStore::open("data/users/users.db")?);
//! let service = UserService::new(store);
//!
//! let uid = service
//!     .register_user(RegisterUserRequest {
//!         email: "bob@example.com".into(),
//!         username: "bob".into(),
//!         password: "hunter2".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//! assert_eq!(service.login(LoginRequest {
//!     username: "BOB".into(),
//!     password: "hunter2".into(),
//! }).await?, uid);
//! ```
//!
//! # Modules
//!
//! - [`store`] - User records and their username and email indexes
//! - [`service`] - RPC handlers and status codes
//! - `server` - HTTP/JSON binding of the service (requires `server` feature)
//!
//! # Feature Flags
//!
//! - `server` - Enable the HTTP API server and the `users-server` binary (enabled by default)

pub mod prelude;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod store;

pub use service::{Code, Status, UserService};
pub use store::{StoreError, User, UserStore};
