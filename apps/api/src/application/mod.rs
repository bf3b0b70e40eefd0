pub mod export;
pub mod handlers;
pub mod validation;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use mongodb::bson::{doc, oid::ObjectId};

use crate::db::Db;
use crate::errors::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/upload", post(handlers::handle_upload))
        .route(
            "/:id",
            put(handlers::handle_update_application).delete(handlers::handle_delete_application),
        )
        .route(
            "/export/:company_id/:date",
            get(handlers::handle_export_to_excel),
        )
        // Resume uploads exceed axum's default 2 MiB body cap.
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

/// Explicit cascade standing in for the original model's pre-delete hook:
/// a deleted job takes its applications with it.
pub async fn cascade_delete_for_job(db: &Db, job_id: &ObjectId) -> Result<(), AppError> {
    let result = db
        .applications()
        .delete_many(doc! { "jobId": job_id }, None)
        .await?;
    tracing::info!(
        "cascade deleted {} application(s) for job {}",
        result.deleted_count,
        job_id.to_hex()
    );
    Ok(())
}

/// Deleted users take their applications with them.
pub async fn cascade_delete_for_user(db: &Db, user_id: &ObjectId) -> Result<(), AppError> {
    let result = db
        .applications()
        .delete_many(doc! { "userId": user_id }, None)
        .await?;
    tracing::info!(
        "cascade deleted {} application(s) for user {}",
        result.deleted_count,
        user_id.to_hex()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::DateTime;

    use crate::models::application::Application;

    async fn test_db() -> Db {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        Db::connect(&uri, "jobboard_test").await.unwrap()
    }

    fn sample_application(job_id: ObjectId, user_id: ObjectId) -> Application {
        let now = DateTime::now();
        Application {
            id: Some(ObjectId::new()),
            job_id,
            user_id,
            user_technical_skills: vec!["rust".to_string()],
            user_soft_skills: vec!["communication".to_string()],
            resume: "https://storage.test/resumes/cv.pdf".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGODB_URI)"]
    async fn test_deleting_a_job_removes_its_applications() {
        let db = test_db().await;
        let job_id = ObjectId::new();
        let other_job_id = ObjectId::new();
        for _ in 0..2 {
            db.applications()
                .insert_one(&sample_application(job_id, ObjectId::new()), None)
                .await
                .unwrap();
        }
        db.applications()
            .insert_one(&sample_application(other_job_id, ObjectId::new()), None)
            .await
            .unwrap();

        cascade_delete_for_job(&db, &job_id).await.unwrap();

        let remaining = db
            .applications()
            .count_documents(doc! { "jobId": job_id }, None)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        let untouched = db
            .applications()
            .count_documents(doc! { "jobId": other_job_id }, None)
            .await
            .unwrap();
        assert_eq!(untouched, 1);
    }

    #[tokio::test]
    #[ignore = "needs a running MongoDB (set MONGODB_URI)"]
    async fn test_deleting_a_user_removes_their_applications() {
        let db = test_db().await;
        let user_id = ObjectId::new();
        let other_user_id = ObjectId::new();
        for _ in 0..2 {
            db.applications()
                .insert_one(&sample_application(ObjectId::new(), user_id), None)
                .await
                .unwrap();
        }
        db.applications()
            .insert_one(&sample_application(ObjectId::new(), other_user_id), None)
            .await
            .unwrap();

        cascade_delete_for_user(&db, &user_id).await.unwrap();

        let remaining = db
            .applications()
            .count_documents(doc! { "userId": user_id }, None)
            .await
            .unwrap();
        assert_eq!(remaining, 0);
        let untouched = db
            .applications()
            .count_documents(doc! { "userId": other_user_id }, None)
            .await
            .unwrap();
        assert_eq!(untouched, 1);
    }
}
