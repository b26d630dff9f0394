/// Session token generation and validation module
///
/// This module provides the signed-token machinery behind login sessions.
/// Tokens are signed using HS256 (HMAC-SHA256) and carry the authenticated
/// user's identity; the server stores no session state.
///
/// # Security
///
/// - **Algorithm**: HS256 (HMAC with SHA-256)
/// - **Expiration**: 24 hours by default, 30 days for remembered sessions
/// - **Validation**: Signature, expiration, and issuer checks
/// - **Secret Management**: Secrets should be at least 32 bytes (256 bits)
///
/// # Lifetimes
///
/// - **Standard**: 24 hours, the default for a plain login
/// - **Remembered**: 30 days, issued when the user asks to stay signed in
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::session::{create_token, validate_token, Claims, SessionLifetime};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = 42;
///
/// // Create session token
/// let claims = Claims::new(user_id, SessionLifetime::Standard);
/// let token = create_token(&claims, "your-secret-key")?;
///
/// // Validate token
/// let validated_claims = validate_token(&token, "your-secret-key")?;
/// assert_eq!(validated_claims.sub, user_id);
/// # Ok(())
/// # }
/// ```

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Error type for session token operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Failed to create token
    #[error("Failed to create session token: {0}")]
    CreateError(String),

    /// Failed to validate token
    #[error("Failed to validate session token: {0}")]
    ValidationError(String),

    /// Token has expired
    #[error("Session has expired")]
    Expired,

    /// Invalid issuer
    #[error("Invalid issuer: expected {expected}")]
    InvalidIssuer { expected: String },
}

/// How long a session stays valid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifetime {
    /// Standard session (24 hours)
    Standard,

    /// Remembered session (30 days), for "keep me signed in"
    Remembered,
}

impl SessionLifetime {
    /// Gets the expiration duration for this lifetime
    pub fn duration(&self) -> Duration {
        match self {
            SessionLifetime::Standard => Duration::hours(24),
            SessionLifetime::Remembered => Duration::days(30),
        }
    }

    /// Picks the lifetime for a login request's remember flag
    pub fn from_remember(remember: bool) -> Self {
        if remember {
            SessionLifetime::Remembered
        } else {
            SessionLifetime::Standard
        }
    }
}

/// Session token claims structure
///
/// # Standard Claims
///
/// - `sub`: Subject (user ID)
/// - `iss`: Issuer (always "tasknest")
/// - `iat`: Issued at timestamp
/// - `exp`: Expiration timestamp
/// - `nbf`: Not before timestamp
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - User ID
    pub sub: i64,

    /// Issuer - Always "tasknest"
    pub iss: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Not before (Unix timestamp)
    pub nbf: i64,
}

impl Claims {
    /// Creates new claims for a user with the given session lifetime
    ///
    /// # Arguments
    ///
    /// * `user_id` - User ID (subject)
    /// * `lifetime` - Standard or remembered session
    ///
    /// # Example
    ///
    /// ```
    /// use tasknest_shared::auth::session::{Claims, SessionLifetime};
    ///
    /// let claims = Claims::new(42, SessionLifetime::Standard);
    /// assert_eq!(claims.sub, 42);
    /// ```
    pub fn new(user_id: i64, lifetime: SessionLifetime) -> Self {
        Self::with_expiration(user_id, lifetime.duration())
    }

    /// Creates claims with a custom expiration
    ///
    /// # Arguments
    ///
    /// * `user_id` - User ID
    /// * `expires_in` - Custom expiration duration
    ///
    /// # Example
    ///
    /// ```
    /// use tasknest_shared::auth::session::Claims;
    /// use chrono::Duration;
    ///
    /// let claims = Claims::with_expiration(42, Duration::hours(1));
    /// ```
    pub fn with_expiration(user_id: i64, expires_in: Duration) -> Self {
        let now = Utc::now();
        let expiration = now + expires_in;

        Self {
            sub: user_id,
            iss: "tasknest".to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            nbf: now.timestamp(),
        }
    }

    /// Checks if the session has expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets time until expiration
    pub fn time_until_expiration(&self) -> Option<Duration> {
        let now = Utc::now().timestamp();
        if self.exp > now {
            Some(Duration::seconds(self.exp - now))
        } else {
            None
        }
    }
}

/// Creates a session token from claims
///
/// Signs the token using HS256 (HMAC-SHA256) with the provided secret.
///
/// # Arguments
///
/// * `claims` - Session claims
/// * `secret` - Secret key for signing (should be at least 32 bytes)
///
/// # Returns
///
/// Base64-encoded signed token string
///
/// # Errors
///
/// Returns `SessionError::CreateError` if token creation fails
///
/// # Security
///
/// The secret should be:
/// - At least 32 bytes (256 bits) for HS256
/// - Randomly generated
/// - Stored securely (environment variable or secret manager)
/// - Rotated periodically
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::session::{create_token, Claims, SessionLifetime};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let claims = Claims::new(42, SessionLifetime::Standard);
///
/// let token = create_token(&claims, "your-secret-key-at-least-32-bytes")?;
/// assert!(!token.is_empty());
/// # Ok(())
/// # }
/// ```
pub fn create_token(claims: &Claims, secret: &str) -> Result<String, SessionError> {
    let header = Header::new(Algorithm::HS256);
    let key = EncodingKey::from_secret(secret.as_bytes());

    encode(&header, claims, &key)
        .map_err(|e| SessionError::CreateError(format!("Token encoding failed: {}", e)))
}

/// Validates a session token and extracts claims
///
/// Verifies:
/// - Signature is valid
/// - Token hasn't expired
/// - Issuer is "tasknest"
/// - Token is not used before nbf time
///
/// # Arguments
///
/// * `token` - Session token string
/// * `secret` - Secret key used for signing
///
/// # Returns
///
/// Validated claims if token is valid
///
/// # Errors
///
/// Returns error if:
/// - Signature is invalid
/// - Token has expired
/// - Issuer doesn't match
/// - Token format is invalid
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::session::{create_token, validate_token, Claims, SessionLifetime};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let user_id = 42;
/// let secret = "your-secret-key-at-least-32-bytes";
///
/// // Create token
/// let claims = Claims::new(user_id, SessionLifetime::Standard);
/// let token = create_token(&claims, secret)?;
///
/// // Validate token
/// let validated = validate_token(&token, secret)?;
/// assert_eq!(validated.sub, user_id);
/// # Ok(())
/// # }
/// ```
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, SessionError> {
    let key = DecodingKey::from_secret(secret.as_bytes());

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&["tasknest"]);
    validation.validate_exp = true;
    validation.validate_nbf = true;

    let token_data = decode::<Claims>(token, &key, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidIssuer => SessionError::InvalidIssuer {
                expected: "tasknest".to_string(),
            },
            _ => SessionError::ValidationError(format!("Token validation failed: {}", e)),
        }
    })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifetime_durations() {
        assert_eq!(SessionLifetime::Standard.duration(), Duration::hours(24));
        assert_eq!(SessionLifetime::Remembered.duration(), Duration::days(30));
    }

    #[test]
    fn test_lifetime_from_remember() {
        assert_eq!(
            SessionLifetime::from_remember(false),
            SessionLifetime::Standard
        );
        assert_eq!(
            SessionLifetime::from_remember(true),
            SessionLifetime::Remembered
        );
    }

    #[test]
    fn test_claims_creation() {
        let claims = Claims::new(42, SessionLifetime::Standard);

        assert_eq!(claims.sub, 42);
        assert_eq!(claims.iss, "tasknest");
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_with_custom_expiration() {
        let claims = Claims::with_expiration(42, Duration::hours(1));

        let time_left = claims.time_until_expiration().unwrap();
        assert!(time_left.num_seconds() > 3500); // ~1 hour minus a bit
        assert!(time_left.num_seconds() <= 3600); // <= 1 hour
    }

    #[test]
    fn test_remembered_session_outlives_standard() {
        let standard = Claims::new(7, SessionLifetime::Standard);
        let remembered = Claims::new(7, SessionLifetime::Remembered);

        assert!(remembered.exp > standard.exp);
    }

    #[test]
    fn test_create_and_validate_token() {
        let user_id = 42;
        let secret = "test-secret-key-at-least-32-bytes-long";

        let claims = Claims::new(user_id, SessionLifetime::Standard);
        let token = create_token(&claims, secret).expect("Should create token");

        let validated = validate_token(&token, secret).expect("Should validate token");
        assert_eq!(validated.sub, user_id);
        assert_eq!(validated.iss, "tasknest");
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let claims = Claims::new(42, SessionLifetime::Standard);
        let token = create_token(&claims, "secret1").expect("Should create token");

        let result = validate_token(&token, "wrong-secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_expired_token() {
        let secret = "test-secret";

        // Create token that expired 1 hour ago
        let claims = Claims::with_expiration(42, Duration::seconds(-3600));

        assert!(claims.is_expired());
        assert!(claims.time_until_expiration().is_none());

        let token = create_token(&claims, secret).expect("Should create token");
        let result = validate_token(&token, secret);

        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), SessionError::Expired));
    }

    #[test]
    fn test_validate_garbage_token() {
        let result = validate_token("not.a.token", "secret");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_wrong_issuer() {
        // Token signed with our secret but a foreign issuer claim
        let foreign = Claims {
            sub: 42,
            iss: "someone-else".to_string(),
            iat: Utc::now().timestamp(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            nbf: Utc::now().timestamp(),
        };

        let token = create_token(&foreign, "secret").expect("Should create token");
        let result = validate_token(&token, "secret");

        assert!(matches!(
            result.unwrap_err(),
            SessionError::InvalidIssuer { .. }
        ));
    }
}
