use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use crate::domain::identity::models::VerifiedSession;
use crate::inbound::http::router::AppState;

/// Extension type to store the verified session in request extensions
#[derive(Debug, Clone, Copy)]
pub struct AuthenticatedIdentity {
    pub session: VerifiedSession,
}

/// Middleware that verifies the bearer token and adds the session to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let session = state.auth_service.verify_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        ApiError::from(e)
    })?;

    req.extensions_mut()
        .insert(AuthenticatedIdentity { session });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".to_string()))?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ApiError::Unauthorized(
                "Invalid Authorization header format. Expected: Bearer <token>".to_string(),
            )
        })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;

    use super::*;

    fn request_with_header(value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = value {
            builder = builder.header(http::header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = request_with_header(Some("Bearer abc.def.ghi"));
        assert_eq!(extract_token_from_header(&req).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_missing_header_rejected() {
        let req = request_with_header(None);
        assert!(matches!(
            extract_token_from_header(&req),
            Err(ApiError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "bearer abc"] {
            let req = request_with_header(Some(value));
            assert!(
                extract_token_from_header(&req).is_err(),
                "accepted {value:?}"
            );
        }
    }
}
