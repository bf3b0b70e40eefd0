pub mod handlers;
pub mod validation;

use axum::routing::{get, patch, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(handlers::handle_signup))
        .route("/signin", post(handlers::handle_signin))
        .route("/signout", post(handlers::handle_signout))
        .route("/change-password", patch(handlers::handle_change_password))
        .route(
            "/request-password-reset",
            post(handlers::handle_request_password_reset),
        )
        .route("/verify-otp", post(handlers::handle_verify_otp))
        .route("/account", get(handlers::handle_get_by_recovery_email))
        .route(
            "/:id",
            get(handlers::handle_get_user)
                .put(handlers::handle_update_account)
                .delete(handlers::handle_delete_account),
        )
        .route("/:id/profile", get(handlers::handle_get_profile))
}
