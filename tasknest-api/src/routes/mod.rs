/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, login, me)
/// - `tasks`: Task creation and public task pages

pub mod auth;
pub mod health;
pub mod tasks;
