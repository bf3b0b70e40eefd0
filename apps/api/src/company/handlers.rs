use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, to_bson, DateTime};
use serde::Serialize;

use crate::auth::extract::AuthUser;
use crate::auth::password::hash_password;
use crate::company::validation::{AddCompanyRequest, CompanyNameQuery, UpdateCompanyRequest};
use crate::db::is_duplicate_key;
use crate::errors::AppError;
use crate::models::company::{Company, PublicCompany};
use crate::models::job::Job;
use crate::models::user::Role;
use crate::state::AppState;
use crate::validation::check_object_id;

#[derive(Serialize)]
pub struct CompanyResponse {
    pub message: String,
    pub company: PublicCompany,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /api/companies
pub async fn handle_add_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AddCompanyRequest>,
) -> Result<(StatusCode, Json<CompanyResponse>), AppError> {
    auth.require_role(Role::CompanyHr)?;
    req.validate()?;

    let existing = state
        .db
        .companies()
        .find_one(
            doc! { "$or": [
                { "companyName": &req.company_name },
                { "companyEmail": &req.company_email },
            ]},
            None,
        )
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict("Company already exists".to_string()));
    }

    let now = DateTime::now();
    let company = Company {
        id: Some(ObjectId::new()),
        company_name: req.company_name,
        description: req.description,
        industry: req.industry,
        address: req.address,
        number_of_employees: req.number_of_employees,
        company_email: req.company_email,
        password: hash_password(&req.password)?,
        company_hr: auth.user_id,
        created_at: now,
        updated_at: now,
    };

    state
        .db
        .companies()
        .insert_one(&company, None)
        .await
        .map_err(|e| {
            if is_duplicate_key(&e) {
                AppError::Conflict("Company already exists".to_string())
            } else {
                AppError::Database(e)
            }
        })?;
    tracing::info!("company {} created", company.company_name);

    Ok((
        StatusCode::CREATED,
        Json(CompanyResponse {
            message: "Success".to_string(),
            company: company.public(),
        }),
    ))
}

/// PUT /api/companies/:id
pub async fn handle_update_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCompanyRequest>,
) -> Result<Json<CompanyResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    req.validate()?;
    let id = check_object_id("id", &id)?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    auth.require_owner(&company.company_hr)?;

    let mut set = doc! { "updatedAt": DateTime::now() };
    if let Some(name) = &req.company_name {
        if name != &company.company_name {
            let taken = state
                .db
                .companies()
                .find_one(doc! { "companyName": name, "_id": { "$ne": id } }, None)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(
                    "Company name is already taken".to_string(),
                ));
            }
            set.insert("companyName", name);
        }
    }
    if let Some(email) = &req.company_email {
        if email != &company.company_email {
            let taken = state
                .db
                .companies()
                .find_one(doc! { "companyEmail": email, "_id": { "$ne": id } }, None)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(
                    "Company email is already taken".to_string(),
                ));
            }
            set.insert("companyEmail", email);
        }
    }
    if let Some(description) = &req.description {
        set.insert("description", description);
    }
    if let Some(industry) = &req.industry {
        set.insert("industry", industry);
    }
    if let Some(address) = &req.address {
        set.insert("address", address);
    }
    if let Some(range) = &req.number_of_employees {
        set.insert(
            "numberOfEmployees",
            to_bson(range).map_err(|e| AppError::Internal(anyhow::Error::new(e)))?,
        );
    }
    if let Some(password) = &req.password {
        set.insert("password", hash_password(password)?);
    }

    state
        .db
        .companies()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    let updated = state
        .db
        .companies()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    Ok(Json(CompanyResponse {
        message: "Company updated successfully".to_string(),
        company: updated.public(),
    }))
}

/// DELETE /api/companies/:id
pub async fn handle_delete_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    let id = check_object_id("id", &id)?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;
    auth.require_owner(&company.company_hr)?;

    state
        .db
        .companies()
        .delete_one(doc! { "_id": id }, None)
        .await?;
    tracing::info!("company {} deleted", id.to_hex());

    Ok(Json(MessageResponse {
        message: "Company deleted successfully".to_string(),
    }))
}

#[derive(Serialize)]
pub struct CompanyWithJobsResponse {
    pub message: String,
    pub company: PublicCompany,
    pub jobs: Vec<Job>,
}

/// GET /api/companies/:id
pub async fn handle_get_company(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CompanyWithJobsResponse>, AppError> {
    auth.require_role(Role::CompanyHr)?;
    let id = check_object_id("id", &id)?;

    let company = state
        .db
        .companies()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("Company not found".to_string()))?;

    let jobs: Vec<Job> = state
        .db
        .jobs()
        .find(doc! { "companyId": id }, None)
        .await?
        .try_collect()
        .await?;

    Ok(Json(CompanyWithJobsResponse {
        message: "Success".to_string(),
        company: company.public(),
        jobs,
    }))
}

#[derive(Serialize)]
pub struct CompanySearchResponse {
    pub message: String,
    pub data: Vec<PublicCompany>,
}

/// GET /api/companies?name=
pub async fn handle_search_by_name(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<CompanyNameQuery>,
) -> Result<Json<CompanySearchResponse>, AppError> {
    let companies: Vec<Company> = state
        .db
        .companies()
        .find(doc! { "companyName": &query.name }, None)
        .await?
        .try_collect()
        .await?;

    if companies.is_empty() {
        return Err(AppError::NotFound("Company not found".to_string()));
    }

    Ok(Json(CompanySearchResponse {
        message: "Success".to_string(),
        data: companies.iter().map(Company::public).collect(),
    }))
}
