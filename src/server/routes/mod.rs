//! API routes and handlers.

mod account;
mod activity;
mod notifs;
mod social;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let user_routes = Router::new()
        // Profile
        .route("/header", get(account::header))
        .route("/basic", get(account::basic).patch(account::update_basic))
        .route("/following-ids", get(account::following_ids))
        .route("/dashboard", get(account::dashboard))
        .route("/activity", get(account::recent_activity))
        // Follow graph
        .route("/view", get(social::view_users))
        .route("/follow", post(social::follow))
        .route("/unfollow", post(social::unfollow))
        // Saved threads
        .route("/saved", get(account::saved_threads).post(activity::save_thread))
        .route("/saved/remove", post(activity::remove_saved))
        // Authored content
        .route("/threads", post(activity::create_thread))
        .route("/threads/delete", post(activity::delete_thread))
        .route("/threads/old", post(activity::old_thread))
        .route("/comments", post(activity::comment))
        .route("/comments/delete", post(activity::delete_comment))
        .route("/comments/old", post(activity::old_comment))
        .route("/subcomments", post(activity::subcomment))
        .route("/subcomments/delete", post(activity::delete_subcomment))
        .route("/subcomments/old", post(activity::old_subcomment))
        // Notifications
        .route("/notifs", post(notifs::save_notif).delete(notifs::clear_notifs))
        .route("/notifs/read", post(notifs::mark_all_as_read));

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/login", post(account::login))
        .route("/api/v1/users", post(account::register))
        .route("/api/v1/usernames/{username}", get(social::view_user_by_username))
        .nest("/api/v1/users/{uid}", user_routes)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}
