//! User record and the content references it holds.

use serde::{Deserialize, Serialize};

/// Displayable profile of a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicUserData {
    pub name: String,
    pub pic_url: String,
    pub username: String,
    pub alias: String,
    pub about: String,
}

/// Credentials. `password` holds a bcrypt hash, never the plaintext.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateUserData {
    pub email: String,
    pub password: String,
}

/// Reference to a thread living in a section of the content service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ThreadRef {
    pub section_id: String,
    pub thread_id: String,
}

/// Reference to a comment, with its thread context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentRef {
    pub thread: ThreadRef,
    pub comment_id: String,
}

/// Reference to a subcomment, with its comment context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubcommentRef {
    pub comment: CommentRef,
    pub subcomment_id: String,
}

/// Content authored by a user, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub threads_created: Vec<ThreadRef>,
    pub comments: Vec<CommentRef>,
    pub subcomments: Vec<SubcommentRef>,
}

impl Activity {
    pub fn is_empty(&self) -> bool {
        self.threads_created.is_empty() && self.comments.is_empty() && self.subcomments.is_empty()
    }
}

/// A notification delivered to a user. `id` is unique per user; the other
/// fields are opaque to this service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notif {
    pub id: String,
    pub message: String,
    pub permalink: String,
    pub timestamp: i64,
}

/// The primary record stored under a user-id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub basic: BasicUserData,
    pub private: PrivateUserData,
    pub following_ids: Vec<String>,
    pub followers_ids: Vec<String>,
    pub recent_activity: Option<Activity>,
    pub old_activity: Option<Activity>,
    pub saved_threads: Vec<ThreadRef>,
    pub unread_notifs: Vec<Notif>,
    pub read_notifs: Vec<Notif>,
    /// Unix seconds of the latest thread creation, 0 if none.
    pub last_time_created: i64,
}

impl User {
    /// A fresh record with empty social, activity and notification state.
    pub fn new(basic: BasicUserData, private: PrivateUserData) -> Self {
        Self {
            basic,
            private,
            ..Self::default()
        }
    }

    /// Recent activity, created on first use.
    pub fn recent_activity_mut(&mut self) -> &mut Activity {
        self.recent_activity.get_or_insert_with(Activity::default)
    }

    /// Old activity, created on first use.
    pub fn old_activity_mut(&mut self) -> &mut Activity {
        self.old_activity.get_or_insert_with(Activity::default)
    }
}

/// Input for [`UserStore::register_user`](super::UserStore::register_user).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub pic_url: String,
    pub username: String,
    pub alias: String,
    pub about: String,
    pub password: String,
}

/// Outcome of an update transform.
///
/// `Unchanged` skips the write; the transaction still commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Modified,
    Unchanged,
}

impl From<bool> for Change {
    fn from(modified: bool) -> Self {
        if modified {
            Change::Modified
        } else {
            Change::Unchanged
        }
    }
}

/// A reference kind that lives in one of the [`Activity`] lists.
pub trait ContentRef: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {
    /// Name used in logs.
    const KIND: &'static str;

    /// The list of `activity` holding references of this kind.
    fn list(activity: &mut Activity) -> &mut Vec<Self>;
}

impl ContentRef for ThreadRef {
    const KIND: &'static str = "thread";

    fn list(activity: &mut Activity) -> &mut Vec<Self> {
        &mut activity.threads_created
    }
}

impl ContentRef for CommentRef {
    const KIND: &'static str = "comment";

    fn list(activity: &mut Activity) -> &mut Vec<Self> {
        &mut activity.comments
    }
}

impl ContentRef for SubcommentRef {
    const KIND: &'static str = "subcomment";

    fn list(activity: &mut Activity) -> &mut Vec<Self> {
        &mut activity.subcomments
    }
}

/// Append `item` unless an equal element is already present.
pub fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) -> bool {
    if items.contains(&item) {
        return false;
    }
    items.push(item);
    true
}

/// Remove the first element equal to `item` by swapping in the last element.
/// Does not preserve order.
pub fn swap_remove_item<T: PartialEq>(items: &mut Vec<T>, item: &T) -> bool {
    match items.iter().position(|x| x == item) {
        Some(pos) => {
            items.swap_remove(pos);
            true
        }
        None => false,
    }
}
