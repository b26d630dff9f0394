/// Task model and database operations
///
/// This module provides the Task model, the core entity of TaskNest. Every
/// task belongs to a user and carries a unique slug that doubles as its
/// public URL segment; numeric ids never appear outside the store.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title VARCHAR(200) NOT NULL,
///     description TEXT,
///     due_date DATE,
///     priority INTEGER NOT NULL DEFAULT 3 CHECK (priority BETWEEN 1 AND 5),
///     completed BOOLEAN NOT NULL DEFAULT FALSE,
///     slug VARCHAR(255) NOT NULL UNIQUE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Slug assignment
///
/// [`Task::create`] derives the slug from the title at insert time. The
/// availability check in the generator is advisory; the UNIQUE constraint is
/// authoritative. When the insert loses a slug race to a concurrent writer,
/// the create path regenerates and retries exactly once, then propagates any
/// second failure.
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::task::{Task, CreateTask};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let task = Task::create(&pool, CreateTask {
///     user_id: 1,
///     title: "Buy milk".to_string(),
///     description: Some("Semi-skimmed".to_string()),
///     due_date: None,
///     priority: 3,
/// }).await?;
///
/// assert_eq!(task.slug, "buy-milk");
/// println!("Task lives at {}", task.public_path());
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;

use crate::slug::generate_unique_slug;

/// Task model representing a to-do item
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (internal, never exposed in URLs)
    pub id: i64,

    /// User who owns the task
    pub user_id: i64,

    /// Task title
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Priority from 1 (highest) to 5 (lowest)
    pub priority: i32,

    /// Whether the task is done
    pub completed: bool,

    /// URL-safe unique identifier derived from the title
    pub slug: String,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
///
/// The slug is not part of the input; it is derived from the title when the
/// row is inserted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Owning user ID
    pub user_id: i64,

    /// Task title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional due date
    pub due_date: Option<NaiveDate>,

    /// Priority from 1 (highest) to 5 (lowest), default 3
    #[serde(default = "default_priority")]
    pub priority: i32,
}

fn default_priority() -> i32 {
    3 // middle of the 1..=5 range
}

impl Task {
    /// Creates a new task with a freshly derived slug
    ///
    /// Generates a unique slug from the title and inserts the row. If the
    /// insert hits the slug UNIQUE constraint (a concurrent writer claimed
    /// the same candidate between check and insert), the slug is regenerated
    /// against current data and the insert retried exactly once. A second
    /// collision propagates as the underlying database error.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - Task creation data
    ///
    /// # Returns
    ///
    /// The newly created task with generated ID, slug, and timestamp
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The owning user does not exist (foreign key violation)
    /// - Both the initial insert and the single retry lose the slug race
    /// - Database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::task::{Task, CreateTask};
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let task = Task::create(&pool, CreateTask {
    ///     user_id: 1,
    ///     title: "Water the plants".to_string(),
    ///     description: None,
    ///     due_date: None,
    ///     priority: 2,
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let slug = generate_unique_slug(pool, &data.title, None).await?;

        match Self::insert(pool, &data, &slug).await {
            Ok(task) => Ok(task),
            Err(err) if is_slug_conflict(&err) => {
                // Lost the slug race; regenerate against current data and retry once
                debug!(slug = %slug, "Slug taken at insert time, regenerating");
                let slug = generate_unique_slug(pool, &data.title, None).await?;
                Self::insert(pool, &data, &slug).await
            }
            Err(err) => Err(err),
        }
    }

    /// Inserts a task row with an already-chosen slug
    async fn insert(pool: &PgPool, data: &CreateTask, slug: &str) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (user_id, title, description, due_date, priority, slug)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, description, due_date, priority,
                      completed, slug, created_at
            "#,
        )
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.due_date)
        .bind(data.priority)
        .bind(slug)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by its slug
    ///
    /// This is the public lookup path; task detail URLs carry the slug.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `slug` - Slug to search for (exact match)
    ///
    /// # Returns
    ///
    /// The task if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::task::Task;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// if let Some(task) = Task::find_by_slug(&pool, "buy-milk").await? {
    ///     println!("Found task: {}", task.title);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, priority,
                   completed, slug, created_at
            FROM tasks
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, priority,
                   completed, slug, created_at
            FROM tasks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Lists all tasks, newest first
    ///
    /// Ordered by creation timestamp descending, with id descending as the
    /// tie-break so rows created in the same instant keep insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if database connection fails
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use tasknest_shared::models::task::Task;
    /// # use sqlx::PgPool;
    /// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
    /// let tasks = Task::list_recent(&pool).await?;
    /// for task in &tasks {
    ///     println!("{} ({})", task.title, task.slug);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_recent(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, Task>(
            r#"
            SELECT id, user_id, title, description, due_date, priority,
                   completed, slug, created_at
            FROM tasks
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }

    /// The public URL path for this task
    ///
    /// Slugs are the only public identifier; the numeric id stays internal.
    ///
    /// # Example
    ///
    /// ```
    /// # use tasknest_shared::models::task::Task;
    /// # use chrono::Utc;
    /// # let task = Task {
    /// #     id: 1,
    /// #     user_id: 1,
    /// #     title: "Buy milk".to_string(),
    /// #     description: None,
    /// #     due_date: None,
    /// #     priority: 3,
    /// #     completed: false,
    /// #     slug: "buy-milk".to_string(),
    /// #     created_at: Utc::now(),
    /// # };
    /// assert_eq!(task.public_path(), "/v1/tasks/buy-milk");
    /// ```
    pub fn public_path(&self) -> String {
        format!("/v1/tasks/{}", self.slug)
    }
}

/// Checks whether a database error is a violation of the slug UNIQUE constraint
fn is_slug_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err
            .constraint()
            .map(|name| name.contains("slug"))
            .unwrap_or(false),
        _ => false,
    }
}
