use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use hbnb_core::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Identity of a request that presented a valid bearer token.
///
/// Inserted into request extensions by [`require_token`]; handlers read it
/// with `Extension<AuthUser>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
}

/// Extract the token from `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();

    (!token.is_empty()).then_some(token)
}

/// Middleware that rejects requests without a valid, unexpired bearer token.
///
/// Runs before the handler, so a rejected request never reaches storage.
pub async fn require_token<S>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request<axum::body::Body>,
    next: Next,
) -> Response
where
    S: Send + Sync + 'static,
{
    let verified = bearer_token(request.headers()).map(|token| state.tokens.verify(token));

    match verified {
        Some(Ok(claims)) => {
            request.extensions_mut().insert(AuthUser { id: claims.sub });
            next.run(request).await
        }
        Some(Err(err)) => ApiError(err).into_response(),
        None => ApiError(AppError::Unauthorized(
            "Missing or invalid Authorization header. Expected: Bearer <token>".into(),
        ))
        .into_response(),
    }
}
