//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use users_service::prelude::*;
//! ```

pub use crate::service::{
    BasicDataUpdate, Code, CreateThreadRequest, DashboardData, FollowRequest, LoginRequest,
    RegisterUserRequest, Status, UserCard, UserHeaderData, UserService, UserView, ViewContext,
};
pub use crate::store::{
    Activity, BasicUserData, Change, CommentRef, NewUser, Notif, StoreError, SubcommentRef,
    ThreadRef, User, UserStore,
};
