//! Common test utilities and fixtures.
//!
//! Shared across the integration test binaries; not every binary uses every
//! helper.

#![allow(dead_code)]

use std::sync::Arc;

use tempfile::TempDir;
use users_service::service::{RegisterUserRequest, UserService};
use users_service::store::{CommentRef, Notif, SubcommentRef, ThreadRef, UserStore};

/// Password used by every fixture account.
pub const PASSWORD: &str = "1747018Lv/";

/// A service over a fresh store in a temporary directory.
pub struct TestService {
    pub service: UserService,
    pub store: Arc<UserStore>,
    _temp_dir: TempDir, // Keep alive for test duration
}

impl TestService {
    pub fn new() -> anyhow::Result<Self> {
        let temp_dir = TempDir::new()?;
        let store = Arc::new(UserStore::open(
            temp_dir.path().join("users").join("users.db"),
        )?);
        Ok(Self {
            service: UserService::new(Arc::clone(&store)),
            store,
            _temp_dir: temp_dir,
        })
    }

    /// Register `username` with a derived email and [`PASSWORD`].
    pub async fn register(&self, username: &str) -> anyhow::Result<String> {
        Ok(self.service.register_user(registration(username)).await?)
    }
}

pub fn registration(username: &str) -> RegisterUserRequest {
    RegisterUserRequest {
        email: format!("{}@example.com", username),
        name: format!("{} name", username),
        pic_url: String::new(),
        username: username.to_string(),
        alias: username.to_string(),
        about: String::new(),
        password: PASSWORD.to_string(),
    }
}

pub fn thread(section: &str, id: &str) -> ThreadRef {
    ThreadRef {
        section_id: section.to_string(),
        thread_id: id.to_string(),
    }
}

pub fn comment(section: &str, thread_id: &str, id: &str) -> CommentRef {
    CommentRef {
        thread: thread(section, thread_id),
        comment_id: id.to_string(),
    }
}

pub fn subcomment(section: &str, thread_id: &str, comment_id: &str, id: &str) -> SubcommentRef {
    SubcommentRef {
        comment: comment(section, thread_id, comment_id),
        subcomment_id: id.to_string(),
    }
}

pub fn notif(id: &str, message: &str) -> Notif {
    Notif {
        id: id.to_string(),
        message: message.to_string(),
        permalink: format!("/n/{}", id),
        timestamp: 1_700_000_000,
    }
}

#[cfg(feature = "server")]
pub mod http {
    use axum_test::TestServer;
    use tempfile::TempDir;
    use users_service::server::{AppState, Config, router};

    /// Test application wrapper that manages a temporary database.
    pub struct TestApp {
        pub server: TestServer,
        _temp_dir: TempDir, // Keep alive for test duration
    }

    impl TestApp {
        /// Create a new test application with a fresh temporary database.
        pub fn new() -> anyhow::Result<Self> {
            let temp_dir = TempDir::new()?;
            let config = Config::from_str(&format!(
                "db_dir = {:?}\nbind_address = \"127.0.0.1:0\"",
                temp_dir.path().display().to_string()
            ))?;
            let (state, _store) = AppState::from_config(&config)?;
            let server = TestServer::new(router(state))?;
            Ok(Self {
                server,
                _temp_dir: temp_dir,
            })
        }

        /// Register `username` through the API and return its user-id.
        pub async fn register(&self, username: &str) -> anyhow::Result<String> {
            let response = self
                .server
                .post("/api/v1/users")
                .json(&super::registration(username))
                .await;
            response.assert_status(axum::http::StatusCode::CREATED);
            let body: serde_json::Value = response.json();
            body["user_id"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("missing user_id in {}", body))
        }
    }
}
