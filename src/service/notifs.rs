//! Notification queue handlers.
//!
//! A notification id lives in at most one of the unread and read lists.

use tracing::debug;

use crate::store::{Change, Notif};

use super::status::Status;
use super::UserService;

impl UserService {
    /// Deliver `notif` to `uid` as unread.
    ///
    /// An unread notif with the same id is replaced in place; a read one is
    /// removed so the id is unread again.
    pub async fn save_notif(&self, uid: &str, notif: Notif) -> Result<(), Status> {
        self.store()?;
        if notif.id.is_empty() {
            return Err(Status::invalid_argument("Notification id is required"));
        }

        let id = notif.id.clone();
        self.update(uid, move |user| {
            if let Some(pos) = user.read_notifs.iter().position(|n| n.id == notif.id) {
                user.read_notifs.swap_remove(pos);
            }
            match user.unread_notifs.iter_mut().find(|n| n.id == notif.id) {
                Some(existing) => *existing = notif,
                None => user.unread_notifs.push(notif),
            }
            Change::Modified
        })
        .await?;
        debug!(uid = uid, notif = %id, "notification saved");
        Ok(())
    }

    /// Move every unread notif to the head of the read list.
    pub async fn mark_all_as_read(&self, uid: &str) -> Result<(), Status> {
        self.store()?;
        let change = self
            .update(uid, |user| {
                if user.unread_notifs.is_empty() {
                    return Change::Unchanged;
                }
                let mut read = std::mem::take(&mut user.unread_notifs);
                read.append(&mut user.read_notifs);
                user.read_notifs = read;
                Change::Modified
            })
            .await?;
        debug!(uid = uid, change = ?change, "notifications marked as read");
        Ok(())
    }

    pub async fn clear_notifs(&self, uid: &str) -> Result<(), Status> {
        self.store()?;
        self.update(uid, |user| {
            let modified = !user.unread_notifs.is_empty() || !user.read_notifs.is_empty();
            user.unread_notifs.clear();
            user.read_notifs.clear();
            Change::from(modified)
        })
        .await?;
        debug!(uid = uid, "notifications cleared");
        Ok(())
    }
}
