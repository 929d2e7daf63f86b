//! Role policy for route groups
//!
//! kasir runs the front desk (catalog, transactions, accounts);
//! bendahara reads the revenue reports. Listing endpoints stay open to any
//! authenticated staff member and are not gated here.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use super::staff_auth::Identity;

/// Check whether `actual` satisfies the `required` role
pub fn role_allows(required: Role, actual: Role) -> bool {
    required == actual
}

fn require_role(required: Role, request: &Request) -> Result<(), Response> {
    let identity = request
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| AppError::not_authenticated().into_response())?;

    if !role_allows(required, identity.role) {
        return Err(AppError::with_message(
            ErrorCode::RoleRequired,
            format!("{} role required", required),
        )
        .into_response());
    }
    Ok(())
}

/// Middleware gating the front-desk mutation routes
pub async fn require_kasir(request: Request, next: Next) -> Result<Response, Response> {
    require_role(Role::Kasir, &request)?;
    Ok(next.run(request).await)
}

/// Middleware gating the report routes
pub async fn require_bendahara(request: Request, next: Next) -> Result<Response, Response> {
    require_role(Role::Bendahara, &request)?;
    Ok(next.run(request).await)
}
