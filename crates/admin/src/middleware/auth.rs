//! Authentication extractor.
//!
//! Credentials are re-verified against the identity provider on every
//! request. There is no server-side session.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use secrecy::SecretString;

use crate::{error::AppError, error::set_sentry_user, services::Principal, state::AppState};

/// Cookie the auth provider's frontend SDK stores the session token in.
pub const SESSION_COOKIE: &str = "__session";

/// Extractor that requires a verified caller.
///
/// Rejects with 401 `Unauthenticated` when no credential is present or the
/// provider does not recognise it.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(principal): RequireUser) -> String {
///     principal.user_id.to_string()
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireUser(pub Principal);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = credential(&parts.headers).ok_or(AppError::Unauthenticated)?;

        let principal = state
            .identity()
            .verify(&token)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        set_sentry_user(principal.user_id.as_str());
        tracing::Span::current().record("user_id", principal.user_id.as_str());

        Ok(Self(principal))
    }
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
fn credential(headers: &HeaderMap) -> Option<SecretString> {
    bearer_token(headers)
        .or_else(|| session_cookie(headers))
        .map(SecretString::from)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then(|| token.to_owned())
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use secrecy::ExposeSecret;

    fn headers(pairs: &[(header::HeaderName, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_bearer_token() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer sess_abc")]);
        let token = credential(&map).map(|t| t.expose_secret().to_owned());
        assert_eq!(token.as_deref(), Some("sess_abc"));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let map = headers(&[(header::AUTHORIZATION, "bearer sess_abc")]);
        assert!(credential(&map).is_some());
    }

    #[test]
    fn test_non_bearer_scheme_ignored() {
        let map = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert!(credential(&map).is_none());
    }

    #[test]
    fn test_empty_bearer_ignored() {
        let map = headers(&[(header::AUTHORIZATION, "Bearer ")]);
        assert!(credential(&map).is_none());
    }

    #[test]
    fn test_session_cookie() {
        let map = headers(&[(header::COOKIE, "theme=dark; __session=sess_cookie; other=1")]);
        let token = credential(&map).map(|t| t.expose_secret().to_owned());
        assert_eq!(token.as_deref(), Some("sess_cookie"));
    }

    #[test]
    fn test_bearer_wins_over_cookie() {
        let map = headers(&[
            (header::AUTHORIZATION, "Bearer sess_header"),
            (header::COOKIE, "__session=sess_cookie"),
        ]);
        let token = credential(&map).map(|t| t.expose_secret().to_owned());
        assert_eq!(token.as_deref(), Some("sess_header"));
    }

    #[test]
    fn test_no_credential() {
        assert!(credential(&HeaderMap::new()).is_none());
    }
}
