pub mod handlers;
pub mod validation;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::handle_search_by_name).post(handlers::handle_add_company),
        )
        .route(
            "/:id",
            get(handlers::handle_get_company)
                .put(handlers::handle_update_company)
                .delete(handlers::handle_delete_company),
        )
}
