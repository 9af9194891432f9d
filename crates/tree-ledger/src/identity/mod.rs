//! Bearer-token verification against the external identity provider.

mod toolkit;

use async_trait::async_trait;
use axum::http::{header, HeaderMap};

pub use toolkit::IdentityToolkitVerifier;

/// Identity attached to a request once its bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("No token provided")]
    MissingToken,
    #[error("Invalid token format")]
    MalformedToken,
    #[error("token rejected: {0}")]
    Rejected(String),
    #[error("identity service unavailable: {0}")]
    Unavailable(String),
}

/// Verifies ID tokens issued by the identity provider.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedUser, IdentityError>;
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, IdentityError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(IdentityError::MissingToken)?;
    let value = value.to_str().map_err(|_| IdentityError::MalformedToken)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(IdentityError::MalformedToken)
            } else {
                Ok(token)
            }
        }
        _ => Err(IdentityError::MalformedToken),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).expect("token"), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let headers = headers("bearer xyz");
        assert_eq!(bearer_token(&headers).expect("token"), "xyz");
    }

    #[test]
    fn missing_header_is_reported() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(IdentityError::MissingToken)
        ));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_malformed() {
        for value in ["Basic dXNlcjpwYXNz", "Bearer ", "Bearer", "token"] {
            assert!(
                matches!(bearer_token(&headers(value)), Err(IdentityError::MalformedToken)),
                "{value} should be malformed"
            );
        }
    }
}
