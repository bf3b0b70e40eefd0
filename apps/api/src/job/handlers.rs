use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime};
use serde::Serialize;

use crate::application::cascade_delete_for_job;
use crate::auth::extract::AuthUser;
use crate::errors::AppError;
use crate::job::filter::JobFilter;
use crate::job::validation::{AddJobRequest, CompanyNameQuery, UpdateJobRequest};
use crate::models::application::Application;
use crate::models::company::PublicCompany;
use crate::models::job::Job;
use crate::models::user::{PublicUser, Role, User};
use crate::state::AppState;
use crate::validation::check_object_id;

#[derive(Serialize)]
pub struct JobResponse {
    pub message: String,
    pub job: Job,
}

#[derive(Serialize)]
pub struct JobsResponse {
    pub message: String,
    pub jobs: Vec<Job>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/jobs
pub async fn handle_add_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    auth.require_role(Role::CompanyHr)?;
    let company_id = req.validate()?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": company_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let now = DateTime::now();
    let job = Job {
        id: Some(ObjectId::new()),
        job_title: req.job_title,
        company_name: company.company_name,
        job_location: req.job_location,
        working_time: req.working_time,
        seniority_level: req.seniority_level,
        job_description: req.job_description,
        technical_skills: req.technical_skills,
        soft_skills: req.soft_skills,
        company_id,
        added_by: auth.user_id,
        created_at: now,
        updated_at: now,
    };
    state.db.jobs().insert_one(&job, None).await?;
    tracing::info!("job {} created for company {}", job.job_title, company_id.to_hex());

    Ok((
        StatusCode::CREATED,
        Json(JobResponse {
            message: "Success".to_string(),
            job,
        }),
    ))
}

/// PUT /api/jobs/:id
pub async fn handle_update_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateJobRequest>,
) -> Result<Json<JobResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    req.validate()?;
    let id = check_object_id("id", &id)?;

    let job = state
        .db
        .jobs()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    auth.require_owner(&job.added_by)?;

    let mut set = doc! { "updatedAt": DateTime::now() };
    if let Some(title) = &req.job_title {
        set.insert("jobTitle", title);
    }
    if let Some(location) = req.job_location {
        set.insert("jobLocation", location.as_str());
    }
    if let Some(time) = req.working_time {
        set.insert("workingTime", time.as_str());
    }
    if let Some(level) = req.seniority_level {
        set.insert("seniorityLevel", level.as_str());
    }
    if let Some(description) = &req.job_description {
        set.insert("jobDescription", description);
    }
    if let Some(skills) = &req.technical_skills {
        set.insert(
            "technicalSkills",
            to_bson(skills).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
        );
    }
    if let Some(skills) = &req.soft_skills {
        set.insert(
            "softSkills",
            to_bson(skills).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
        );
    }

    state
        .db
        .jobs()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    let updated = state
        .db
        .jobs()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    Ok(Json(JobResponse {
        message: "Job updated successfully".to_string(),
        job: updated,
    }))
}

/// DELETE /api/jobs/:id
pub async fn handle_delete_job(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    let id = check_object_id("id", &id)?;

    let job = state
        .db
        .jobs()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    auth.require_owner(&job.added_by)?;

    state.db.jobs().delete_one(doc! { "_id": id }, None).await?;
    cascade_delete_for_job(&state.db, &id).await?;
    tracing::info!("job {} deleted", id.to_hex());

    Ok(Json(MessageResponse {
        message: "Job deleted successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct JobWithCompanyResponse {
    pub message: String,
    pub job: Job,
    pub company: PublicCompany,
}

/// GET /api/jobs/:id
pub async fn handle_get_job(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobWithCompanyResponse>, AppError> {
    let id = check_object_id("id", &id)?;

    let job = state
        .db
        .jobs()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": job.company_id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(JobWithCompanyResponse {
        message: "Success".to_string(),
        job,
        company: company.public(),
    }))
}

/// GET /api/jobs?companyName=
pub async fn handle_jobs_by_company_name(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CompanyNameQuery>,
) -> Result<Json<JobsResponse>, AppError> {
    let company = state
        .db
        .companies()
        .find_one(doc! { "companyName": &query.company_name }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    let company_id = company
        .id
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let jobs: Vec<Job> = state
        .db
        .jobs()
        .find(doc! { "companyId": company_id }, None)
        .await?
        .try_collect()
        .await?;

    Ok(Json(JobsResponse {
        message: "Success".to_string(),
        jobs,
    }))
}

/// GET /api/jobs/filter
pub async fn handle_filter_jobs(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(filter): Query<JobFilter>,
) -> Result<Json<JobsResponse>, AppError> {
    let jobs: Vec<Job> = state
        .db
        .jobs()
        .find(filter.to_query(), None)
        .await?
        .try_collect()
        .await?;

    Ok(Json(JobsResponse {
        message: "Success".to_string(),
        jobs,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationWithApplicant {
    #[serde(flatten)]
    pub application: Application,
    pub user: Option<PublicUser>,
}

#[derive(Serialize)]
pub struct JobApplicationsResponse {
    pub message: String,
    pub applications: Vec<ApplicationWithApplicant>,
}

/// GET /api/jobs/:id/applications
pub async fn handle_job_applications(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobApplicationsResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    let id = check_object_id("id", &id)?;

    let job = state
        .db
        .jobs()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found".to_string()))?;
    auth.require_owner(&job.added_by)?;

    let applications: Vec<Application> = state
        .db
        .applications()
        .find(doc! { "jobId": id }, None)
        .await?
        .try_collect()
        .await?;

    let user_ids: Vec<ObjectId> = applications.iter().map(|a| a.user_id).collect();
    let users: Vec<User> = state
        .db
        .users()
        .find(doc! { "_id": { "$in": user_ids } }, None)
        .await?
        .try_collect()
        .await?;
    let users_by_id: HashMap<ObjectId, PublicUser> = users
        .iter()
        .filter_map(|u| u.id.map(|id| (id, u.public())))
        .collect();

    let applications = applications
        .into_iter()
        .map(|application| {
            let user = users_by_id.get(&application.user_id).cloned();
            ApplicationWithApplicant { application, user }
        })
        .collect();

    Ok(Json(JobApplicationsResponse {
        message: "Success".to_string(),
        applications,
    }))
}
