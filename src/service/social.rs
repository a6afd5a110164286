//! Follow graph handlers.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::store::{Change, StoreError, push_unique, swap_remove_item};

use super::messages::{UserCard, ViewContext};
use super::status::Status;
use super::{UserService, VIEW_USERS_QUANTITY};

impl UserService {
    /// One page of the following or followers listing of `uid`.
    ///
    /// `context` is `"following"` or `"followers"`. Users are read
    /// concurrently, at most [`VIEW_USERS_QUANTITY`] per page, and returned in
    /// list order. The first failed read aborts the rest of the page.
    pub async fn view_users(
        &self,
        uid: &str,
        context: &str,
        offset: usize,
    ) -> Result<Vec<UserCard>, Status> {
        let store = self.store()?;
        let context: ViewContext = context.parse()?;
        let owner = self.load(uid).await?;

        let ids = match context {
            ViewContext::Following => owner.following_ids,
            ViewContext::Followers => owner.followers_ids,
        };
        if offset >= ids.len() {
            return Err(Status::out_of_range(format!(
                "Offset {} out of range for {} {} entries",
                offset,
                ids.len(),
                context.as_str()
            )));
        }

        let page: Vec<String> = ids
            .into_iter()
            .skip(offset)
            .take(VIEW_USERS_QUANTITY)
            .collect();
        let launched = page.len();
        debug!(uid = uid, context = context.as_str(), offset, launched, "viewing users");

        let mut readers = JoinSet::new();
        for (slot, id) in page.into_iter().enumerate() {
            let store = Arc::clone(&store);
            readers.spawn_blocking(move || {
                let user = store.user(&id)?;
                Ok::<_, StoreError>((
                    slot,
                    UserCard {
                        user_id: id,
                        basic_data: user.basic,
                    },
                ))
            });
        }

        let mut slots: Vec<Option<UserCard>> = (0..launched).map(|_| None).collect();
        while let Some(joined) = readers.join_next().await {
            match joined {
                Ok(Ok((slot, card))) => {
                    if let Some(entry) = slots.get_mut(slot) {
                        *entry = Some(card);
                    }
                }
                Ok(Err(e)) => {
                    readers.abort_all();
                    error!(uid = uid, error = %e, "failed to read user in listing");
                    return Err(Status::internal(format!("Failed to read user: {}", e)));
                }
                Err(e) => {
                    readers.abort_all();
                    error!(uid = uid, error = %e, "user reader task failed");
                    return Err(Status::internal(format!("User reader task failed: {}", e)));
                }
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    /// Make `uid` follow the user registered as `target_username`.
    ///
    /// Both sides are updated concurrently in separate transactions and only
    /// when the edge is missing, so following twice is harmless.
    pub async fn follow_user(&self, uid: &str, target_username: &str) -> Result<(), Status> {
        self.store()?;
        let target = self.resolve_other(uid, target_username).await?;

        let caller = uid.to_string();
        let followed = target.clone();
        let follower = caller.clone();
        tokio::try_join!(
            self.update(&caller, move |user| {
                Change::from(push_unique(&mut user.following_ids, followed))
            }),
            self.update(&target, move |user| {
                Change::from(push_unique(&mut user.followers_ids, follower))
            }),
        )?;

        info!(uid = uid, target = %target, "user followed");
        Ok(())
    }

    /// Inverse of [`follow_user`](Self::follow_user). Missing edges are
    /// ignored.
    pub async fn unfollow_user(&self, uid: &str, target_username: &str) -> Result<(), Status> {
        self.store()?;
        let target = self.resolve_other(uid, target_username).await?;

        let caller = uid.to_string();
        let followed = target.clone();
        let follower = caller.clone();
        tokio::try_join!(
            self.update(&caller, move |user| {
                Change::from(swap_remove_item(&mut user.following_ids, &followed))
            }),
            self.update(&target, move |user| {
                Change::from(swap_remove_item(&mut user.followers_ids, &follower))
            }),
        )?;

        info!(uid = uid, target = %target, "user unfollowed");
        Ok(())
    }

    /// User-id of `username`, rejecting the caller itself.
    async fn resolve_other(&self, uid: &str, username: &str) -> Result<String, Status> {
        let username = username.to_string();
        let target = self
            .run_blocking(move |store| store.find_user_id_by_username(&username))
            .await?;
        if target == uid {
            return Err(Status::invalid_argument("Users cannot follow themselves"));
        }
        Ok(target)
    }
}
