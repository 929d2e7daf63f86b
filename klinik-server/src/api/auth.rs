//! Login endpoint

use axum::{Json, extract::State};
use shared::error::{ApiResponse, AppError};
use shared::models::{LoginRequest, LoginResponse, Role};

use crate::auth::staff_auth::create_token;
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::util::verify_password;

/// `POST /api/auth/login`
///
/// Wrong email and wrong password produce the same error, so the endpoint
/// does not leak which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ServiceError> {
    let email = body.email.as_deref().map(str::trim).unwrap_or_default();
    let password = body.password.as_deref().unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::validation("Email dan password harus diisi").into());
    }

    let Some((id_user, hash, role)) = db::pengguna::find_credentials(&state.pool, email).await?
    else {
        return Err(AppError::invalid_credentials().into());
    };

    if !verify_password(password, &hash) {
        return Err(AppError::invalid_credentials().into());
    }

    let role: Role = role
        .parse()
        .map_err(|_| AppError::internal("Unknown role in storage"))?;

    let token = create_token(id_user, role, &state.jwt_secret)
        .map_err(|e| ServiceError::Db(e.into()))?;

    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        id_user,
        role,
    })))
}
