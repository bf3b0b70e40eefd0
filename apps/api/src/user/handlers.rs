use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use serde::Serialize;

use crate::application::cascade_delete_for_user;
use crate::auth::claims::issue_token;
use crate::auth::extract::AuthUser;
use crate::auth::otp::{expiration_from, generate_otp, otp_is_valid};
use crate::auth::password::{hash_password, verify_password};
use crate::db::is_duplicate_key;
use crate::errors::AppError;
use crate::models::user::{AccountStatus, PublicUser, Role, User};
use crate::state::AppState;
use crate::validation::check_object_id;
use crate::user::validation::{
    ChangePasswordRequest, RecoveryEmailQuery, ResetRequest, SigninRequest, SignupRequest,
    UpdateUserRequest, VerifyOtpRequest,
};

#[derive(Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize)]
pub struct UserResponse {
    pub message: String,
    pub user: PublicUser,
}

/// POST /api/users/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let birth_date = req.validate()?;

    let username = User::derive_username(&req.first_name, &req.last_name);
    let existing = state
        .db
        .users()
        .find_one(
            doc! { "$or": [
                { "email": &req.email },
                { "username": &username },
                { "mobileNumber": &req.mobile_number },
            ]},
            None,
        )
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "A user with this email, username, or mobile number already exists".to_string(),
        ));
    }

    let now = DateTime::now();
    let user = User {
        id: Some(ObjectId::new()),
        first_name: req.first_name,
        last_name: req.last_name,
        username,
        email: req.email.clone(),
        password: hash_password(&req.password)?,
        recovery_email: req.recovery_email,
        password_changed_at: None,
        date_of_birth: DateTime::from_chrono(birth_date.and_time(NaiveTime::MIN).and_utc()),
        mobile_number: req.mobile_number,
        role: req.role.unwrap_or(Role::User),
        status: AccountStatus::Offline,
        reset_otp: None,
        reset_otp_expiration: None,
        created_at: now,
        updated_at: now,
    };

    state.db.users().insert_one(&user, None).await.map_err(|e| {
        if is_duplicate_key(&e) {
            AppError::Conflict(
                "A user with this email, username, or mobile number already exists".to_string(),
            )
        } else {
            AppError::Database(e)
        }
    })?;

    state.mailer.send_welcome(&req.email, &user.username);

    let user_id = user.id.ok_or_else(|| AppError::Internal(anyhow::anyhow!("missing user id")))?;
    let token = issue_token(&user_id, user.role, &state.config.jwt_secret)?;
    tracing::info!("user {} registered", user_id.to_hex());

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully".to_string(),
            token,
        }),
    ))
}

/// POST /api/users/signin
pub async fn handle_signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let user = state
        .db
        .users()
        .find_one(
            doc! { "$or": [
                { "email": &req.login_data },
                { "recoveryEmail": &req.login_data },
                { "mobileNumber": &req.login_data },
            ]},
            None,
        )
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !verify_password(&req.password, &user.password)? {
        return Err(AppError::Unauthorized);
    }

    let user_id = user.id.ok_or(AppError::Unauthorized)?;
    state
        .db
        .users()
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": { "status": "Online", "updatedAt": DateTime::now() } },
            None,
        )
        .await?;

    let token = issue_token(&user_id, user.role, &state.config.jwt_secret)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Login successful".to_string(),
            token,
        }),
    ))
}

/// POST /api/users/signout
pub async fn handle_signout(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .db
        .users()
        .update_one(
            doc! { "_id": auth.user_id },
            doc! { "$set": { "status": "Offline", "updatedAt": DateTime::now() } },
            None,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "User logged out successfully".to_string(),
    }))
}

/// PUT /api/users/:id
pub async fn handle_update_account(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let id = check_object_id("id", &id)?;
    auth.require_owner(&id)?;
    let birth_date = req.validate()?;

    let user = state
        .db
        .users()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let mut set = doc! { "updatedAt": DateTime::now() };

    if let Some(email) = &req.email {
        if email != &user.email {
            let taken = state
                .db
                .users()
                .find_one(doc! { "email": email, "_id": { "$ne": id } }, None)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Email is already taken".to_string()));
            }
            set.insert("email", email);
        }
    }
    if let Some(mobile) = &req.mobile_number {
        if mobile != &user.mobile_number {
            let taken = state
                .db
                .users()
                .find_one(doc! { "mobileNumber": mobile, "_id": { "$ne": id } }, None)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict(
                    "Mobile number is already taken".to_string(),
                ));
            }
            set.insert("mobileNumber", mobile);
        }
    }
    if let Some(recovery) = &req.recovery_email {
        set.insert("recoveryEmail", recovery);
    }
    if let Some(date) = birth_date {
        set.insert(
            "dateOfBirth",
            DateTime::from_chrono(date.and_time(NaiveTime::MIN).and_utc()),
        );
    }

    // Name changes re-derive the username, which must stay unique too.
    if req.first_name.is_some() || req.last_name.is_some() {
        let first = req.first_name.as_deref().unwrap_or(&user.first_name);
        let last = req.last_name.as_deref().unwrap_or(&user.last_name);
        let username = User::derive_username(first, last);
        if username != user.username {
            let taken = state
                .db
                .users()
                .find_one(doc! { "username": &username, "_id": { "$ne": id } }, None)
                .await?;
            if taken.is_some() {
                return Err(AppError::Conflict("Username is already taken".to_string()));
            }
            set.insert("username", username);
        }
        if let Some(first) = &req.first_name {
            set.insert("firstName", first);
        }
        if let Some(last) = &req.last_name {
            set.insert("lastName", last);
        }
    }

    state
        .db
        .users()
        .update_one(doc! { "_id": id }, doc! { "$set": set }, None)
        .await?;

    let updated = state
        .db
        .users()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        message: "Account updated successfully".to_string(),
        user: updated.public(),
    }))
}

/// GET /api/users/:id
pub async fn handle_get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let id = check_object_id("id", &id)?;
    auth.require_owner(&id)?;

    let user = state
        .db
        .users()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        message: "Success".to_string(),
        user: user.public(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub message: String,
    pub data: Profile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// GET /api/users/:id/profile
pub async fn handle_get_profile(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProfileResponse>, AppError> {
    let id = check_object_id("id", &id)?;

    let user = state
        .db
        .users()
        .find_one(doc! { "_id": id }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(Json(ProfileResponse {
        message: "Profile retrieved successfully".to_string(),
        data: Profile {
            id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        },
    }))
}

#[derive(Serialize)]
pub struct AccountsResponse {
    pub message: String,
    pub accounts: Vec<PublicUser>,
}

/// GET /api/users/account?recoveryEmail=
pub async fn handle_get_by_recovery_email(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<RecoveryEmailQuery>,
) -> Result<Json<AccountsResponse>, AppError> {
    let accounts: Vec<User> = state
        .db
        .users()
        .find(doc! { "recoveryEmail": &query.recovery_email }, None)
        .await?
        .try_collect()
        .await?;

    if accounts.is_empty() {
        return Err(AppError::NotFound(
            "No accounts with this recovery email".to_string(),
        ));
    }

    Ok(Json(AccountsResponse {
        message: "Accounts retrieved successfully".to_string(),
        accounts: accounts.iter().map(User::public).collect(),
    }))
}

/// PATCH /api/users/change-password
pub async fn handle_change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    req.validate()?;

    let user = state
        .db
        .users()
        .find_one(doc! { "email": &req.email }, None)
        .await?
        .ok_or(AppError::Unauthorized)?;
    let user_id = user.id.ok_or(AppError::Unauthorized)?;
    auth.require_owner(&user_id)?;

    if !verify_password(&req.old_password, &user.password)? {
        return Err(AppError::Unauthorized);
    }

    let now = DateTime::now();
    state
        .db
        .users()
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": {
                "password": hash_password(&req.new_password)?,
                "passwordChangedAt": now,
                "updatedAt": now,
            }},
            None,
        )
        .await?;

    let token = issue_token(&user_id, user.role, &state.config.jwt_secret)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Password changed successfully".to_string(),
            token,
        }),
    ))
}

/// POST /api/users/request-password-reset
pub async fn handle_request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<ResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    let user = state
        .db
        .users()
        .find_one(doc! { "email": &req.email }, None)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    let user_id = user.id.ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let otp = generate_otp();
    let expiration = expiration_from(Utc::now());
    state
        .db
        .users()
        .update_one(
            doc! { "_id": user_id },
            doc! { "$set": {
                "resetOtp": &otp,
                "resetOtpExpiration": DateTime::from_chrono(expiration),
                "updatedAt": DateTime::now(),
            }},
            None,
        )
        .await?;

    state.mailer.send_reset_otp(&req.email, &otp);

    Ok(Json(MessageResponse {
        message: "OTP sent to email".to_string(),
    }))
}

/// POST /api/users/verify-otp
pub async fn handle_verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    req.validate()?;

    let user = state
        .db
        .users()
        .find_one(doc! { "email": &req.email }, None)
        .await?;

    let valid = user.as_ref().is_some_and(|u| {
        otp_is_valid(
            u.reset_otp.as_deref(),
            u.reset_otp_expiration.map(|d| d.to_chrono()),
            &req.otp,
            Utc::now(),
        )
    });
    if !valid {
        return Err(AppError::Validation("Invalid OTP or OTP expired".to_string()));
    }
    // Presence established above.
    let user_id = user
        .and_then(|u| u.id)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let now = DateTime::now();
    state
        .db
        .users()
        .update_one(
            doc! { "_id": user_id },
            doc! {
                "$set": {
                    "password": hash_password(&req.new_password)?,
                    "passwordChangedAt": now,
                    "updatedAt": now,
                },
                // Single use: clearing these makes a second attempt fail.
                "$unset": { "resetOtp": "", "resetOtpExpiration": "" },
            },
            None,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Password reset successful".to_string(),
    }))
}

/// DELETE /api/users/:id
pub async fn handle_delete_account(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = check_object_id("id", &id)?;
    auth.require_owner(&id)?;

    let deleted = state.db.users().delete_one(doc! { "_id": id }, None).await?;
    if deleted.deleted_count == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    cascade_delete_for_user(&state.db, &id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}
