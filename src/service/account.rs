//! Login, registration and profile handlers.

use tracing::{debug, info, warn};

use crate::store::{
    Activity, BasicUserData, Change, MAX_PASSWORD_BYTES, StoreError, ThreadRef, User,
    verify_password,
};

use super::messages::{
    BasicDataUpdate, DashboardData, LoginRequest, RegisterUserRequest, UserHeaderData, UserView,
};
use super::status::Status;
use super::UserService;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

impl UserService {
    /// Check credentials and return the user-id.
    ///
    /// Every failure past argument validation is reported the same way so
    /// callers cannot tell which step rejected them.
    pub async fn login(&self, req: LoginRequest) -> Result<String, Status> {
        let store = self.store()?;
        if req.username.is_empty() || req.password.is_empty() {
            return Err(Status::invalid_argument("Username and password are required"));
        }

        let LoginRequest { username, password } = req;
        let attempt = username.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            let uid = store.find_user_id_by_username(&username)?;
            let user = store.user(&uid)?;
            Ok::<_, StoreError>(verify_password(&password, &user.private.password).then_some(uid))
        })
        .await;

        match outcome {
            Ok(Ok(Some(uid))) => {
                info!(uid = %uid, "user logged in");
                Ok(uid)
            }
            Ok(Ok(None)) => {
                warn!(username = %attempt, "login rejected: password mismatch");
                Err(Status::permission_denied(INVALID_CREDENTIALS))
            }
            Ok(Err(e)) => {
                warn!(username = %attempt, error = %e, "login rejected");
                Err(Status::permission_denied(INVALID_CREDENTIALS))
            }
            Err(e) => {
                warn!(username = %attempt, error = %e, "login task failed");
                Err(Status::permission_denied(INVALID_CREDENTIALS))
            }
        }
    }

    /// Register a new account and return its user-id.
    pub async fn register_user(&self, req: RegisterUserRequest) -> Result<String, Status> {
        self.store()?;
        if req.email.is_empty() || req.username.is_empty() || req.password.is_empty() {
            return Err(Status::invalid_argument("Email, username and password are required"));
        }
        if req.password.len() > MAX_PASSWORD_BYTES {
            return Err(Status::invalid_argument(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        let uid = self
            .run_blocking(move |store| store.register_user(req.into()))
            .await?;
        info!(uid = %uid, "user registered");
        Ok(uid)
    }

    /// Apply the non-empty fields of `update` to the profile of `uid`.
    ///
    /// A username change and the field updates commit together.
    pub async fn update_basic_user_data(
        &self,
        uid: &str,
        update: BasicDataUpdate,
    ) -> Result<(), Status> {
        self.store()?;
        let update = update.normalized();
        if update.is_empty() {
            debug!(uid = uid, "empty profile update");
            return Ok(());
        }

        self.load(uid).await?;

        let BasicDataUpdate {
            pic_url,
            alias,
            about,
            username,
        } = update;
        let apply = move |user: &mut User| {
            let basic = &mut user.basic;
            let mut modified = false;
            for (field, value) in [
                (&mut basic.pic_url, pic_url),
                (&mut basic.alias, alias),
                (&mut basic.about, about),
            ] {
                if let Some(value) = value && *field != value {
                    *field = value;
                    modified = true;
                }
            }
            Change::from(modified)
        };

        let owned_uid = uid.to_string();
        let change = match username {
            Some(username) => {
                self.run_blocking(move |store| store.rename_user(&owned_uid, &username, apply))
                    .await?
            }
            None => self.update(uid, apply).await?,
        };
        debug!(uid = uid, change = ?change, "profile updated");
        Ok(())
    }

    pub async fn get_user_header_data(&self, uid: &str) -> Result<UserHeaderData, Status> {
        self.store()?;
        Ok(self.load(uid).await?.into())
    }

    pub async fn get_basic_user_data(&self, uid: &str) -> Result<BasicUserData, Status> {
        self.store()?;
        Ok(self.load(uid).await?.basic)
    }

    pub async fn get_user_following_ids(&self, uid: &str) -> Result<Vec<String>, Status> {
        self.store()?;
        Ok(self.load(uid).await?.following_ids)
    }

    pub async fn get_dashboard_data(&self, uid: &str) -> Result<DashboardData, Status> {
        self.store()?;
        Ok(self.load(uid).await?.into())
    }

    /// Recent activity of `uid`; empty when the user has none yet.
    pub async fn recent_activity(&self, uid: &str) -> Result<Activity, Status> {
        self.store()?;
        Ok(self.load(uid).await?.recent_activity.unwrap_or_default())
    }

    pub async fn saved_threads(&self, uid: &str) -> Result<Vec<ThreadRef>, Status> {
        self.store()?;
        Ok(self.load(uid).await?.saved_threads)
    }

    /// Public profile of the user registered as `username`, any casing.
    pub async fn view_user_by_username(&self, username: &str) -> Result<UserView, Status> {
        self.store()?;
        let username = username.to_string();
        let (uid, user) = self
            .run_blocking(move |store| {
                let uid = store.find_user_id_by_username(&username)?;
                let user = store.user(&uid)?;
                Ok((uid, user))
            })
            .await?;
        Ok(UserView::new(uid, user))
    }
}
