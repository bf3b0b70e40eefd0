pub mod filter;
pub mod handlers;
pub mod validation;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::handle_jobs_by_company_name).post(handlers::handle_add_job),
        )
        .route("/filter", get(handlers::handle_filter_jobs))
        .route(
            "/:id",
            get(handlers::handle_get_job)
                .put(handlers::handle_update_job)
                .delete(handlers::handle_delete_job),
        )
        .route("/:id/applications", get(handlers::handle_job_applications))
}
