use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/api/users", crate::user::routes())
        .nest("/api/companies", crate::company::routes())
        .nest("/api/jobs", crate::job::routes())
        .nest("/api/applications", crate::application::routes())
        .with_state(state)
}
