//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Reject negative ledger quantities coming from callers or storage.
pub(crate) fn ensure_non_negative(value: i64, label: &str) -> ResultEngine<i64> {
    if value < 0 {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must be >= 0, got {value}"
        )));
    }
    Ok(value)
}

/// `a * b` for ledger quantities, reporting overflow as an invalid argument.
pub(crate) fn checked_product(a: i64, b: i64, label: &str) -> ResultEngine<i64> {
    a.checked_mul(b)
        .ok_or_else(|| EngineError::InvalidArgument(format!("{label} overflows")))
}

/// `a + b` for ledger quantities, reporting overflow as an invalid argument.
pub(crate) fn checked_sum(a: i64, b: i64, label: &str) -> ResultEngine<i64> {
    a.checked_add(b)
        .ok_or_else(|| EngineError::InvalidArgument(format!("{label} overflows")))
}

/// Lookup key for e-mail addresses: trimmed, NFKC-normalized and lowercased.
pub(crate) fn normalize_email(value: &str) -> String {
    value.trim().nfkc().flat_map(char::to_lowercase).collect()
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidArgument(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Hash a clear-text password into an Argon2 PHC string.
pub(crate) fn hash_password(password: &str) -> ResultEngine<String> {
    if password.is_empty() {
        return Err(EngineError::InvalidArgument(
            "password must not be empty".to_string(),
        ));
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| EngineError::InvalidArgument(format!("cannot hash password: {err}")))
}

/// Check a clear-text password against a stored PHC string.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("ｂｏｂ@example.com"), "bob@example.com");
    }

    #[test]
    fn password_round_trip() {
        let hash = hash_password("s3cret").unwrap();
        assert_ne!(hash, "s3cret");
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret", "not-a-phc-string"));
    }

    #[test]
    fn overflow_is_rejected() {
        assert_eq!(checked_product(20_000, 2, "cost").unwrap(), 40_000);
        assert!(matches!(
            checked_product(i64::MAX, 2, "cost"),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            ensure_non_negative(-1, "stock"),
            Err(EngineError::InvalidArgument(_))
        ));
    }
}
