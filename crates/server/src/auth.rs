use axum::http::HeaderMap;
use sha2::{Digest, Sha256};

use crate::routes::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

pub fn digest(key: &str) -> [u8; 32] {
    Sha256::digest(key.as_bytes()).into()
}

/// Shared-key check. Digests are compared instead of raw keys so the
/// comparison is fixed-length regardless of what the client sent.
///
/// `None` means auth is disabled (no key configured).
pub fn require_key(headers: &HeaderMap, expected: Option<&[u8; 32]>) -> Result<(), AppError> {
    let expected = match expected {
        Some(expected) => expected,
        None => return Ok(()),
    };
    let presented = headers
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(digest);
    match presented {
        Some(presented) if presented == *expected => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with_key(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, key.parse().unwrap());
        headers
    }

    #[test]
    fn disabled_auth_admits_everyone() {
        assert!(require_key(&HeaderMap::new(), None).is_ok());
    }

    #[test]
    fn matching_key_is_admitted() {
        let expected = digest("sekrit");
        assert!(require_key(&headers_with_key("sekrit"), Some(&expected)).is_ok());
    }

    #[test]
    fn wrong_or_absent_key_is_rejected() {
        let expected = digest("sekrit");
        assert!(require_key(&headers_with_key("guess"), Some(&expected)).is_err());
        assert!(require_key(&HeaderMap::new(), Some(&expected)).is_err());
    }
}
