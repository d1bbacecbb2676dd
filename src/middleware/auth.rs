use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use crate::auth::policy::{self, Access, Decision};
use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;

/// Route-level authorization.
///
/// Resolves the bearer token (if any) to an active user, checks the policy
/// table and stores the caller as an [`AuthUser`] request extension. On
/// public routes a bad token is ignored and the request runs anonymously.
pub async fn authorize(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let access = policy::required_access(request.method(), request.uri().path());

    let bearer = extract_bearer(request.headers()).map(|token| token.map(str::to_owned));
    let caller = match bearer {
        Ok(Some(token)) => resolve_caller(&state, &token).await.map(Some),
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };

    let caller = match (access, caller) {
        (Access::Public, Ok(caller)) => caller,
        (Access::Public, Err(e)) => {
            debug!(path = %request.uri().path(), error = %e, "Ignoring bad credentials on public route");
            None
        }
        (_, Ok(caller)) => caller,
        (_, Err(e)) => return e.into_response(),
    };

    match policy::decide(access, caller.map(|c| c.role)) {
        Decision::Allow => {}
        Decision::Unauthenticated => {
            debug!(method = %request.method(), path = %request.uri().path(), "Rejected anonymous request");
            return ApiError::unauthorized("Full authentication is required to access this resource").into_response();
        }
        Decision::Forbidden => {
            warn!(method = %request.method(), path = %request.uri().path(), "Rejected request for insufficient role");
            return ApiError::forbidden("Access denied").into_response();
        }
    }

    if let Some(caller) = caller {
        request.extensions_mut().insert(caller);
    }
    next.run(request).await
}

/// `Ok(None)` when no Authorization header is present.
fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, ApiError> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Invalid Authorization header format"))?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim())),
        Some(_) => Err(ApiError::unauthorized("Empty bearer token")),
        None => Err(ApiError::unauthorized("Authorization header must use Bearer token format")),
    }
}

async fn resolve_caller(state: &AppState, token: &str) -> Result<AuthUser, ApiError> {
    let claims = state.jwt().verify(token).map_err(|e| {
        warn!(error = %e, "Rejected bearer token");
        ApiError::unauthorized("Invalid or expired token")
    })?;

    let user = state.users().find_by_id(claims.sub).await?;
    match user {
        Some(user) if user.active => Ok(AuthUser { id: user.id, role: user.role }),
        Some(_) => {
            warn!(user_id = %claims.sub, "Token presented for inactive user");
            Err(ApiError::unauthorized("User account is disabled"))
        }
        None => {
            warn!(user_id = %claims.sub, "Token presented for unknown user");
            Err(ApiError::unauthorized("Invalid or expired token"))
        }
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or_else(|| ApiError::unauthorized("Full authentication is required to access this resource"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert!(matches!(extract_bearer(&headers), Ok(None)));

        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_bearer(&headers).unwrap(), Some("abc.def.ghi"));

        headers.insert("authorization", HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert!(extract_bearer(&headers).is_err());

        headers.insert("authorization", HeaderValue::from_static("Bearer   "));
        assert!(extract_bearer(&headers).is_err());
    }
}
