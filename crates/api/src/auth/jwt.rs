//! Session tokens.
//!
//! Sessions are HS256-signed JWTs carrying a [`Claims`] payload with the
//! identity id, email, and role. The TTL is fixed; there is no refresh.

use g1000_core::types::DbId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the identity's internal database id.
    pub sub: DbId,
    /// Normalized email of the identity.
    pub email: String,
    /// Role name (`"student"`, `"owner"`, `"admin"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for session token generation and validation.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Session lifetime in days (default: 7).
    pub session_ttl_days: i64,
}

const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Clock skew tolerated when checking `exp`.
const EXP_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `SESSION_TTL_DAYS` | no       | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let session_ttl_days: i64 = std::env::var("SESSION_TTL_DAYS")
            .unwrap_or_else(|_| DEFAULT_SESSION_TTL_DAYS.to_string())
            .parse()
            .expect("SESSION_TTL_DAYS must be a valid i64");

        Self {
            secret,
            session_ttl_days,
        }
    }

    pub fn session_ttl_secs(&self) -> i64 {
        self.session_ttl_days * 24 * 60 * 60
    }
}

/// Generate a signed session token for the given identity.
pub fn generate_session_token(
    user_id: DbId,
    email: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        role: role.to_string(),
        exp: now + config.session_ttl_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode a session token, returning the embedded [`Claims`].
///
/// Only HS256 is accepted; `exp` and `sub` must be present.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = EXP_LEEWAY_SECS;
    validation.set_required_spec_claims(&["exp", "sub"]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}
