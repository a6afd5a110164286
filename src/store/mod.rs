//! Persistent user store.
//!
//! User records live in a single redb file together with the username and
//! email indexes that make them discoverable. Values are bincode-encoded
//! [`User`] records.

mod error;
mod password;
mod tables;
mod types;
mod users;

pub use error::StoreError;
pub use password::{MAX_PASSWORD_BYTES, PASSWORD_COST, hash_password, verify_password};
pub use types::{
    Activity, BasicUserData, Change, CommentRef, ContentRef, NewUser, Notif, PrivateUserData,
    SubcommentRef, ThreadRef, User, push_unique, swap_remove_item,
};
pub use users::UserStore;
