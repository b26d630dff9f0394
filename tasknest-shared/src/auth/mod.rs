/// Authentication utilities
///
/// This module provides secure authentication primitives for TaskNest:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`session`]: Signed session token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Session Tokens**: HS256 signing with standard and remembered lifetimes
/// - **Constant-time Comparison**: All verification uses constant-time operations
///
/// # Example
///
/// ```
/// use tasknest_shared::auth::password::{hash_password, verify_password};
/// use tasknest_shared::auth::session::{create_token, Claims, SessionLifetime};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash));
///
/// // Session token generation
/// let claims = Claims::new(42, SessionLifetime::Standard);
/// let token = create_token(&claims, "secret-key")?;
/// # Ok(())
/// # }
/// ```

pub mod password;
pub mod session;
