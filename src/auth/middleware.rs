use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, ResponseError,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    web::Data,
};
use tracing::debug;

use crate::auth::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the bearer token and stores the requester in request extensions.
/// Every failure is answered with the same 401 body.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let state = req
        .app_data::<Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::Internal("App state missing".to_string()))?;

    let token = match bearer_token(&req) {
        Some(t) => t,
        None => {
            debug!("Missing or malformed Authorization header");
            let resp = AppError::Unauthorized.error_response();
            return Ok(req.into_response(resp));
        }
    };

    let user = match state.identity.resolve(&token).await {
        Ok(user) => user,
        Err(e) => {
            let resp = AppError::from(e).error_response();
            return Ok(req.into_response(resp));
        }
    };

    debug!(user_id = user.id, "Request authenticated");
    req.extensions_mut().insert(AuthUser::from(user));

    next.call(req).await
}

fn bearer_token(req: &ServiceRequest) -> Option<String> {
    let header = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    parse_bearer(header).map(str::to_string)
}

/// The scheme name is case-insensitive.
fn parse_bearer(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_matches_in_any_case() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("BEARER  abc.def.ghi "), Some("abc.def.ghi"));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_ignored() {
        assert_eq!(parse_bearer("Basic YWxpY2U6cHcx"), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer   "), None);
        assert_eq!(parse_bearer("Bearerabc"), None);
        assert_eq!(parse_bearer(""), None);
    }
}
