/// User model and database operations
///
/// This module provides the User model and the account operations behind
/// signup and login. Passwords are hashed here, at the model boundary, so a
/// plaintext password never reaches a query.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     name VARCHAR(120) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Email normalization
///
/// Emails are stored trimmed and lowercased, and every lookup normalizes its
/// argument the same way, so `A@B.com` and `a@b.com` are the same account.
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::user::{User, CreateUser};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// // Create a new user (password is hashed internally)
/// let new_user = CreateUser {
///     name: "John Doe".to_string(),
///     email: "user@example.com".to_string(),
///     password: "plaintext-password".to_string(),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// println!("Created user: {}", user.id);
///
/// // Find by email
/// let found = User::find_by_email(&pool, "USER@example.com").await?;
/// assert!(found.is_some());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use crate::auth::password::{hash_password, verify_password, PasswordError};

/// Error type for user account operations
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Password hashing failed
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database operation failed
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// User model representing an account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the hash
/// is excluded from serialization so it cannot leak into a response body.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID
    pub id: i64,

    /// Display name
    pub name: String,

    /// Email address, stored normalized (trimmed, lowercase)
    ///
    /// Must be unique across all users
    pub email: String,

    /// Argon2id password hash
    ///
    /// Never store plaintext passwords!
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Carries the plaintext password; [`User::create`] hashes it before the row
/// is written.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (normalized before storage)
    pub email: String,

    /// Plaintext password (hashed internally, never stored)
    pub password: String,
}

/// Normalizes an email address for storage and lookup
///
/// Trims surrounding whitespace and lowercases, so case and padding
/// variations of the same address resolve to one account.
///
/// # Example
///
/// ```
/// use tasknest_shared::models::user::normalize_email;
///
/// assert_eq!(normalize_email("  A@B.com "), "a@b.com");
/// ```
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl User {
    /// Creates a new user account
    ///
    /// Normalizes the email and hashes the password before inserting.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Account data with plaintext password
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Password hashing fails
    /// - Email already exists (unique constraint violation)
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::user::{User, CreateUser};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
    /// let new_user = CreateUser {
    ///     name: "John Doe".to_string(),
    ///     email: "user@example.com".to_string(),
    ///     password: "hunter2hunter2".to_string(),
    /// };
    ///
    /// let user = User::create(&pool, new_user).await?;
    /// println!("Created user: {}", user.id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, UserError> {
        let email = normalize_email(&data.email);
        let password_hash = hash_password(&data.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(data.name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `id` - User ID to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool, user_id: i64) -> Result<(), sqlx::Error> {
    /// if let Some(user) = User::find_by_id(&pool, user_id).await? {
    ///     println!("Found user: {}", user.email);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email address
    ///
    /// The argument is normalized before the query, so lookup is
    /// case-insensitive regardless of how the caller spells the address.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `email` - Email address to search for
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let user = User::find_by_email(&pool, "User@Example.com").await?;
    /// if let Some(u) = user {
    ///     println!("Found user: {}", u.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks an email/password pair against stored accounts
    ///
    /// Resolves the account by normalized email, then verifies the password
    /// against its stored hash. A missing account, a wrong password, and an
    /// unparseable stored hash all come back as `None`; the caller cannot
    /// tell which, which keeps the login error message uniform.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `email` - Email address as typed by the user
    /// * `password` - Plaintext password to verify
    ///
    /// # Returns
    ///
    /// The authenticated user, or None when the pair doesn't match
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::user::User;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// match User::verify_credentials(&pool, "user@example.com", "hunter2hunter2").await? {
    ///     Some(user) => println!("Welcome back, {}", user.name),
    ///     None => println!("Invalid email or password"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn verify_credentials(
        pool: &PgPool,
        email: &str,
        password: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let user = match Self::find_by_email(pool, email).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if verify_password(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email_lowercases() {
        assert_eq!(normalize_email("A@B.com"), "a@b.com");
        assert_eq!(normalize_email("USER@EXAMPLE.COM"), "user@example.com");
    }

    #[test]
    fn test_normalize_email_trims() {
        assert_eq!(normalize_email("  user@example.com  "), "user@example.com");
        assert_eq!(normalize_email("\tuser@example.com\n"), "user@example.com");
    }

    #[test]
    fn test_normalize_email_idempotent() {
        let once = normalize_email(" Mixed@Case.Org ");
        assert_eq!(normalize_email(&once), once);
    }

    #[test]
    fn test_create_user_struct() {
        let create_user = CreateUser {
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password: "plaintext".to_string(),
        };

        assert_eq!(create_user.name, "Test User");
        assert_eq!(create_user.email, "test@example.com");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }

    // Integration tests for database operations are in tests/user_store_tests.rs
}
