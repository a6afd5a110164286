//! Request and response types of the RPC surface.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::store::{Activity, BasicUserData, NewUser, Notif, ThreadRef, User};

use super::status::Status;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pic_url: String,
    pub username: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub about: String,
    pub password: String,
}

impl From<RegisterUserRequest> for NewUser {
    fn from(req: RegisterUserRequest) -> Self {
        NewUser {
            email: req.email,
            name: req.name,
            pic_url: req.pic_url,
            username: req.username,
            alias: req.alias,
            about: req.about,
            password: req.password,
        }
    }
}

/// Response of login and registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdResponse {
    pub user_id: String,
}

/// Optional profile changes. Absent and empty fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BasicDataUpdate {
    #[serde(default)]
    pub pic_url: Option<String>,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, alias = "description")]
    pub about: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl BasicDataUpdate {
    /// Drop fields holding empty strings.
    pub fn normalized(self) -> Self {
        fn keep(field: Option<String>) -> Option<String> {
            field.filter(|value| !value.is_empty())
        }
        Self {
            pic_url: keep(self.pic_url),
            alias: keep(self.alias),
            about: keep(self.about),
            username: keep(self.username),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pic_url.is_none()
            && self.alias.is_none()
            && self.about.is_none()
            && self.username.is_none()
    }
}

/// What the page header shows for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHeaderData {
    pub alias: String,
    pub username: String,
    pub pic_url: String,
    pub last_time_created: i64,
    pub unread_notifs: Vec<Notif>,
    pub read_notifs: Vec<Notif>,
}

impl From<User> for UserHeaderData {
    fn from(user: User) -> Self {
        Self {
            alias: user.basic.alias,
            username: user.basic.username,
            pic_url: user.basic.pic_url,
            last_time_created: user.last_time_created,
            unread_notifs: user.unread_notifs,
            read_notifs: user.read_notifs,
        }
    }
}

/// Everything a user sees on their own dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
    pub basic_data: BasicUserData,
    pub recent_activity: Activity,
    pub old_activity: Activity,
    pub saved_threads: Vec<ThreadRef>,
    pub following_ids: Vec<String>,
    pub followers_ids: Vec<String>,
}

impl From<User> for DashboardData {
    fn from(user: User) -> Self {
        Self {
            basic_data: user.basic,
            recent_activity: user.recent_activity.unwrap_or_default(),
            old_activity: user.old_activity.unwrap_or_default(),
            saved_threads: user.saved_threads,
            following_ids: user.following_ids,
            followers_ids: user.followers_ids,
        }
    }
}

/// Public profile of a user, as seen by others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub user_id: String,
    pub basic_data: BasicUserData,
    pub recent_activity: Activity,
    pub following_count: usize,
    pub followers_count: usize,
}

impl UserView {
    pub fn new(user_id: String, user: User) -> Self {
        Self {
            user_id,
            following_count: user.following_ids.len(),
            followers_count: user.followers_ids.len(),
            basic_data: user.basic,
            recent_activity: user.recent_activity.unwrap_or_default(),
        }
    }
}

/// One entry of a followers or following listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCard {
    pub user_id: String,
    pub basic_data: BasicUserData,
}

/// Which side of the social graph a listing walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewContext {
    Following,
    Followers,
}

impl ViewContext {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewContext::Following => "following",
            ViewContext::Followers => "followers",
        }
    }
}

impl FromStr for ViewContext {
    type Err = Status;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "following" => Ok(ViewContext::Following),
            "followers" => Ok(ViewContext::Followers),
            other => Err(Status::invalid_argument(format!(
                "Invalid context '{}': expected 'following' or 'followers'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FollowRequest {
    pub username: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateThreadRequest {
    pub thread: ThreadRef,
    pub publish_date: i64,
}
