//! Authored content and saved thread handlers.
//!
//! The content itself lives in other services; these handlers only keep the
//! references in the user record. Removals are swap-with-last and therefore
//! do not preserve order.

use tracing::{debug, warn};

use crate::store::{
    Activity, Change, CommentRef, ContentRef, SubcommentRef, ThreadRef, push_unique,
    swap_remove_item,
};

use super::status::Status;
use super::UserService;

impl UserService {
    /// Record a new thread by `uid` published at `publish_date`.
    pub async fn create_thread(
        &self,
        uid: &str,
        thread: ThreadRef,
        publish_date: i64,
    ) -> Result<(), Status> {
        self.store()?;
        self.update(uid, move |user| {
            user.recent_activity_mut().threads_created.push(thread);
            user.last_time_created = publish_date;
            Change::Modified
        })
        .await?;
        debug!(uid = uid, publish_date, "thread recorded");
        Ok(())
    }

    pub async fn comment(&self, uid: &str, comment: CommentRef) -> Result<(), Status> {
        self.record_content(uid, comment).await
    }

    pub async fn subcomment(&self, uid: &str, subcomment: SubcommentRef) -> Result<(), Status> {
        self.record_content(uid, subcomment).await
    }

    pub async fn delete_thread(&self, uid: &str, thread: ThreadRef) -> Result<(), Status> {
        self.delete_content(uid, thread).await
    }

    pub async fn delete_comment(&self, uid: &str, comment: CommentRef) -> Result<(), Status> {
        self.delete_content(uid, comment).await
    }

    pub async fn delete_subcomment(
        &self,
        uid: &str,
        subcomment: SubcommentRef,
    ) -> Result<(), Status> {
        self.delete_content(uid, subcomment).await
    }

    pub async fn old_thread(&self, uid: &str, thread: ThreadRef) -> Result<(), Status> {
        self.archive_content(uid, thread).await
    }

    pub async fn old_comment(&self, uid: &str, comment: CommentRef) -> Result<(), Status> {
        self.archive_content(uid, comment).await
    }

    pub async fn old_subcomment(&self, uid: &str, subcomment: SubcommentRef) -> Result<(), Status> {
        self.archive_content(uid, subcomment).await
    }

    /// Bookmark `thread` for `uid`. Saving it again is a no-op.
    pub async fn save_thread(&self, uid: &str, thread: ThreadRef) -> Result<(), Status> {
        self.store()?;
        let change = self
            .update(uid, move |user| {
                Change::from(push_unique(&mut user.saved_threads, thread))
            })
            .await?;
        debug!(uid = uid, change = ?change, "thread saved");
        Ok(())
    }

    pub async fn remove_saved(&self, uid: &str, thread: ThreadRef) -> Result<(), Status> {
        self.store()?;
        let key = thread.clone();
        let change = self
            .update(uid, move |user| {
                Change::from(swap_remove_item(&mut user.saved_threads, &key))
            })
            .await?;
        if change == Change::Unchanged {
            warn!(uid = uid, thread = ?thread, "saved thread not found");
        }
        Ok(())
    }

    async fn record_content<R: ContentRef>(&self, uid: &str, item: R) -> Result<(), Status> {
        self.store()?;
        self.update(uid, move |user| {
            R::list(user.recent_activity_mut()).push(item);
            Change::Modified
        })
        .await?;
        debug!(uid = uid, kind = R::KIND, "content recorded");
        Ok(())
    }

    /// Remove `item` from recent activity, or from old activity when it is
    /// not recent.
    async fn delete_content<R: ContentRef>(&self, uid: &str, item: R) -> Result<(), Status> {
        self.store()?;
        let key = item.clone();
        let change = self
            .update(uid, move |user| {
                let removed = remove_from(user.recent_activity.as_mut(), &key)
                    || remove_from(user.old_activity.as_mut(), &key);
                Change::from(removed)
            })
            .await?;
        match change {
            Change::Modified => debug!(uid = uid, kind = R::KIND, "content deleted"),
            Change::Unchanged => {
                warn!(uid = uid, kind = R::KIND, item = ?item, "content to delete not found")
            }
        }
        Ok(())
    }

    /// Move `item` from recent to old activity.
    async fn archive_content<R: ContentRef>(&self, uid: &str, item: R) -> Result<(), Status> {
        self.store()?;
        let key = item.clone();
        let change = self
            .update(uid, move |user| {
                if !remove_from(user.recent_activity.as_mut(), &key) {
                    return Change::Unchanged;
                }
                R::list(user.old_activity_mut()).push(key);
                Change::Modified
            })
            .await?;
        match change {
            Change::Modified => debug!(uid = uid, kind = R::KIND, "content archived"),
            Change::Unchanged => {
                warn!(uid = uid, kind = R::KIND, item = ?item, "content to archive not found")
            }
        }
        Ok(())
    }
}

fn remove_from<R: ContentRef>(activity: Option<&mut Activity>, item: &R) -> bool {
    activity.is_some_and(|activity| swap_remove_item(R::list(activity), item))
}
