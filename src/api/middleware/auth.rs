use crate::AppState;
use crate::api::error::AppError;
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

/// Requires a valid session token in `Authorization: Bearer`.
///
/// File-access tokens are rejected here; they are only honoured by the content route.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = state
        .tokens
        .validate_session(token)
        .ok_or_else(|| AppError::Unauthorized("Invalid or expired session".to_string()))?;

    // Check if user still exists in DB
    if state.auth_service.get_by_id(&claims.sub).await?.is_none() {
        return Err(AppError::Unauthorized("Unknown user".to_string()));
    }

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
