use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::Json;
use chrono::{Duration, NaiveTime};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime};
use serde::Serialize;

use crate::application::export::{build_workbook, flatten_rows};
use crate::application::validation::ApplicationForm;
use crate::auth::extract::AuthUser;
use crate::errors::AppError;
use crate::models::application::Application;
use crate::models::job::Job;
use crate::models::user::{Role, User};
use crate::services::storage::upload_resume;
use crate::state::AppState;
use crate::validation::check_object_id;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub message: String,
    pub application: Application,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_url: Option<String>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/applications/upload
pub async fn handle_upload(
    auth: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationResponse>), AppError> {
    auth.require_role(Role::User)?;

    let form = ApplicationForm::from_multipart(multipart).await?;
    form.require_complete()?;
    // Presence checked just above.
    let job_id = check_object_id("jobId", form.job_id.as_deref().unwrap_or_default())?;
    let resume = form
        .resume
        .ok_or_else(|| AppError::Validation("Please upload a resume file".to_string()))?;

    let job_exists = state
        .db
        .jobs()
        .find_one(doc! { "_id": job_id }, None)
        .await?
        .is_some();
    if !job_exists {
        return Err(AppError::NotFound("Job not found".to_string()));
    }

    let resume_url = upload_resume(
        &state.s3,
        &state.config.s3_endpoint,
        &state.config.s3_bucket,
        &resume.filename,
        resume.bytes,
    )
    .await?;

    let now = DateTime::now();
    let application = Application {
        id: Some(ObjectId::new()),
        job_id,
        user_id: auth.user_id,
        user_technical_skills: form.user_technical_skills.unwrap_or_default(),
        user_soft_skills: form.user_soft_skills.unwrap_or_default(),
        resume: resume_url.clone(),
        created_at: now,
        updated_at: now,
    };
    state.db.applications().insert_one(&application, None).await?;
    tracing::info!(
        "user {} applied to job {}",
        auth.user_id.to_hex(),
        job_id.to_hex()
    );

    Ok((
        StatusCode::CREATED,
        Json(ApplicationResponse {
            message: "Success".to_string(),
            application,
            resume_url: Some(resume_url),
        }),
    ))
}

/// PUT /api/applications/:id
pub async fn handle_update_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Result<Json<ApplicationResponse>, AppError> {
    auth.require_role(Role::User)?;
    let id = check_object_id("id", &id)?;

    let application = state
        .db
        .applications()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    auth.require_owner(&application.user_id)?;

    let form = ApplicationForm::from_multipart(multipart).await?;
    form.check_partial()?;

    let mut set = doc! { "updatedAt": DateTime::now() };
    if let Some(skills) = &form.user_technical_skills {
        set.insert(
            "userTechnicalSkills",
            to_bson(skills).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
        );
    }
    if let Some(skills) = &form.user_soft_skills {
        set.insert(
            "userSoftSkills",
            to_bson(skills).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
        );
    }
    if let Some(resume) = form.resume {
        let url = upload_resume(
            &state.s3,
            &state.config.s3_endpoint,
            &state.config.s3_bucket,
            &resume.filename,
            resume.bytes,
        )
        .await?;
        set.insert("resume", url);
    }

    state
        .db
        .applications()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    let updated = state
        .db
        .applications()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

    Ok(Json(ApplicationResponse {
        message: "Application updated successfully".to_string(),
        application: updated,
        resume_url: None,
    }))
}

/// DELETE /api/applications/:id
pub async fn handle_delete_application(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require_role(Role::User)?;
    let id = check_object_id("id", &id)?;

    let application = state
        .db
        .applications()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
    auth.require_owner(&application.user_id)?;

    state
        .db
        .applications()
        .delete_one(doc! { "_id": id }, None)
        .await?;

    Ok(Json(MessageResponse {
        message: "Application deleted successfully".to_string(),
    }))
}

/// GET /api/applications/export/:company_id/:date
///
/// Streams back an `.xlsx` of the company's applications created within the
/// given UTC calendar day (`YYYY-MM-DD`).
pub async fn handle_export_to_excel(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((company_id, date)): Path<(String, String)>,
) -> Result<([(header::HeaderName, String); 2], Vec<u8>), AppError> {
    auth.require_role(Role::CompanyHr)?;
    let company_oid = check_object_id("companyId", &company_id)?;
    let day = chrono::NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("date must be formatted as YYYY-MM-DD".to_string()))?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": company_oid }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    auth.require_owner(&company.company_hr)?;

    let jobs: Vec<Job> = state
        .db
        .jobs()
        .find(doc! { "companyId": company_oid }, None)
        .await?
        .try_collect()
        .await?;
    if jobs.is_empty() {
        return Err(AppError::NotFound(
            "No jobs found for this company".to_string(),
        ));
    }
    let job_ids: Vec<ObjectId> = jobs.iter().filter_map(|j| j.id).collect();

    let day_start = day.and_time(NaiveTime::MIN).and_utc();
    let day_end = day_start + Duration::days(1);
    let applications: Vec<Application> = state
        .db
        .applications()
        .find(
            doc! {
                "jobId": { "$in": job_ids },
                "createdAt": {
                    "$gte": DateTime::from_chrono(day_start),
                    "$lt": DateTime::from_chrono(day_end),
                },
            },
            None,
        )
        .await?
        .try_collect()
        .await?;
    if applications.is_empty() {
        return Err(AppError::NotFound(
            "No applications found for this date".to_string(),
        ));
    }

    let user_ids: Vec<ObjectId> = applications.iter().map(|a| a.user_id).collect();
    let users: Vec<User> = state
        .db
        .users()
        .find(doc! { "_id": { "$in": user_ids } }, None)
        .await?
        .try_collect()
        .await?;

    let jobs_by_id: HashMap<ObjectId, &Job> =
        jobs.iter().filter_map(|j| j.id.map(|id| (id, j))).collect();
    let users_by_id: HashMap<ObjectId, &User> =
        users.iter().filter_map(|u| u.id.map(|id| (id, u))).collect();

    let rows = flatten_rows(&applications, &jobs_by_id, &users_by_id);
    let buffer = build_workbook(&rows)?;
    tracing::info!(
        "exported {} application(s) for company {} on {date}",
        rows.len(),
        company_id
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=applications-{company_id}-{date}.xlsx"),
            ),
        ],
        buffer,
    ))
}
