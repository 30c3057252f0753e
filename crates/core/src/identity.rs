//! Identity rules: email handling, verification codes, and the login-step
//! decision.
//!
//! The HTTP handlers call these before touching the store so that malformed
//! input is rejected without a round trip.

use rand::Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use validator::ValidateEmail;

use crate::error::CoreError;

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Lifetime of a verification challenge.
pub const CHALLENGE_TTL_MINS: i64 = 15;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// Canonical form used for storage and comparison: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate that `email` is a syntactically valid address.
pub fn validate_email_format(email: &str) -> Result<(), CoreError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "'{email}' is not a valid email address"
        )))
    }
}

/// Whether `email` belongs to one of the institutional `domains`.
///
/// Matches the exact domain after the `@` or any subdomain of it, ignoring
/// case, so `a@babson.edu` and `a@alumni.babson.edu` both qualify but
/// `a@notbabson.edu` does not.
pub fn is_institutional_email<S: AsRef<str>>(email: &str, domains: &[S]) -> bool {
    let email = normalize_email(email);
    let Some((_, host)) = email.rsplit_once('@') else {
        return false;
    };
    domains.iter().any(|domain| {
        let domain = domain.as_ref().trim().trim_start_matches('@').to_lowercase();
        !domain.is_empty() && (host == domain || host.ends_with(&format!(".{domain}")))
    })
}

/// Fallback display name for identities that have no roster or profile data.
pub fn display_name_from_email(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

// ---------------------------------------------------------------------------
// Verification codes
// ---------------------------------------------------------------------------

/// Generate a random zero-padded six-digit code.
pub fn generate_verification_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Reject anything that is not exactly six ASCII digits.
pub fn validate_code_format(code: &str) -> Result<(), CoreError> {
    if code.len() == CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "Verification code must be {CODE_LENGTH} digits"
        )))
    }
}

/// Digest stored in place of the plaintext code.
///
/// The email is mixed in so identical codes for different addresses do not
/// share a digest.
pub fn hash_code(email: &str, code: &str) -> String {
    let digest = Sha256::new()
        .chain_update(normalize_email(email).as_bytes())
        .chain_update(b":")
        .chain_update(code.as_bytes())
        .finalize();
    format!("{digest:x}")
}

// ---------------------------------------------------------------------------
// Login step
// ---------------------------------------------------------------------------

/// Explicit credential state of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginState {
    /// An unexpired verification challenge exists for the email.
    pub has_challenge: bool,
    /// A password hash has been stored for the identity.
    pub has_password: bool,
}

/// What the client should prompt for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LoginStep {
    /// Offer the password field (a code may still be requested instead).
    EnterPassword,
    /// A code was already sent and is still valid.
    EnterCode,
    /// Nothing usable on file: a code must be requested first.
    RequestCode,
}

impl LoginState {
    pub fn next_step(self) -> LoginStep {
        match (self.has_password, self.has_challenge) {
            (true, _) => LoginStep::EnterPassword,
            (false, true) => LoginStep::EnterCode,
            (false, false) => LoginStep::RequestCode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_email("  Jane.Doe@Babson.EDU "), "jane.doe@babson.edu");
    }

    #[test]
    fn institutional_match_is_case_insensitive() {
        let domains = ["babson.edu"];
        assert!(is_institutional_email("Student@BABSON.edu", &domains));
        assert!(is_institutional_email("student@alumni.babson.edu", &domains));
    }

    #[test]
    fn institutional_match_rejects_lookalike_domains() {
        let domains = ["babson.edu"];
        assert!(!is_institutional_email("student@notbabson.edu", &domains));
        assert!(!is_institutional_email("student@babson.edu.evil.com", &domains));
        assert!(!is_institutional_email("no-at-sign", &domains));
    }

    #[test]
    fn institutional_match_with_empty_allow_list_is_false() {
        let domains: [&str; 0] = [];
        assert!(!is_institutional_email("student@babson.edu", &domains));
    }

    #[test]
    fn email_format_validation() {
        assert!(validate_email_format("owner@acme.com").is_ok());
        assert!(validate_email_format("not an email").is_err());
    }

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert!(validate_code_format(&code).is_ok(), "bad code {code}");
        }
    }

    #[test]
    fn code_format_rejects_letters_and_wrong_length() {
        assert!(validate_code_format("12345").is_err());
        assert!(validate_code_format("1234567").is_err());
        assert!(validate_code_format("12a456").is_err());
    }

    #[test]
    fn code_hash_is_bound_to_email() {
        let a = hash_code("a@babson.edu", "123456");
        let b = hash_code("b@babson.edu", "123456");
        assert_ne!(a, b);
        assert_eq!(a, hash_code("A@Babson.edu", "123456"));
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn password_takes_precedence_in_login_step() {
        let state = LoginState {
            has_challenge: true,
            has_password: true,
        };
        assert_eq!(state.next_step(), LoginStep::EnterPassword);
    }

    #[test]
    fn outstanding_challenge_without_password_asks_for_code() {
        let state = LoginState {
            has_challenge: true,
            has_password: false,
        };
        assert_eq!(state.next_step(), LoginStep::EnterCode);
    }

    #[test]
    fn no_credentials_requires_code_request() {
        let state = LoginState {
            has_challenge: false,
            has_password: false,
        };
        assert_eq!(state.next_step(), LoginStep::RequestCode);
    }

    #[test]
    fn display_name_falls_back_to_local_part() {
        assert_eq!(display_name_from_email("jane@acme.com"), "jane");
    }
}
