use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

/// Static API key that callers present as a bearer token.
///
/// Only the SHA-256 digest is kept. Comparison folds over every byte of both digests.
#[derive(Clone)]
pub struct ApiKey {
    digest: [u8; 32],
}

impl ApiKey {
    /// Returns `None` for an empty secret; an unset key must never match.
    pub fn new(secret: &str) -> Option<Self> {
        if secret.is_empty() {
            return None;
        }
        Some(Self { digest: digest(secret) })
    }

    pub fn matches(&self, presented: &str) -> bool {
        let other = digest(presented);
        self.digest
            .iter()
            .zip(other.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Check the `Authorization` header for `Bearer <key>`
    pub fn authorizes(&self, headers: &HeaderMap) -> bool {
        extract_bearer_token(headers)
            .map(|token| self.matches(token))
            .unwrap_or(false)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(..)")
    }
}

fn digest(value: &str) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(value.as_bytes()));
    out
}

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn empty_secret_is_not_a_key() {
        assert!(ApiKey::new("").is_none());
    }

    #[test]
    fn accepts_exact_bearer_token() {
        let key = ApiKey::new("s3cret").unwrap();
        assert!(key.authorizes(&headers("Bearer s3cret")));
    }

    #[test]
    fn rejects_wrong_or_malformed_tokens() {
        let key = ApiKey::new("s3cret").unwrap();
        assert!(!key.authorizes(&headers("Bearer s3cre")));
        assert!(!key.authorizes(&headers("Bearer s3cret ")));
        assert!(!key.authorizes(&headers("bearer s3cret")));
        assert!(!key.authorizes(&headers("s3cret")));
        assert!(!key.authorizes(&HeaderMap::new()));
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let key = ApiKey::new("s3cret").unwrap();
        assert_eq!(format!("{:?}", key), "ApiKey(..)");
    }
}
