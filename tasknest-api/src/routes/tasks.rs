/// Task endpoints
///
/// This module provides the task resource:
/// - Creating tasks (authenticated)
/// - Browsing all tasks, newest first (public)
/// - Fetching a single task by its slug (public)
///
/// Every task gets a URL-safe slug derived from its title, so tasks are
/// shareable at stable, human-readable links.
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create a task
/// - `GET /v1/tasks` - List all tasks, newest first
/// - `GET /v1/tasks/:slug` - Fetch one task by slug

use crate::{
    app::{AppState, CurrentUser},
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::models::task::{CreateTask, Task};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task title, also the source of the slug
    #[validate(length(min = 3, max = 200, message = "Title must be between 3 and 200 characters"))]
    pub title: String,

    /// Optional longer description
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,

    /// Optional due date (YYYY-MM-DD)
    pub due_date: Option<NaiveDate>,

    /// Priority from 1 (highest) to 5 (lowest)
    #[serde(default = "default_priority")]
    #[validate(range(min = 1, max = 5, message = "Priority must be between 1 and 5"))]
    pub priority: i32,
}

fn default_priority() -> i32 {
    3
}

/// A task as returned by the API
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Public path for this task, e.g. `/v1/tasks/buy-milk`
    pub url: String,

    /// URL-safe identifier derived from the title
    pub slug: String,

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

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            url: task.public_path(),
            slug: task.slug,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            priority: task.priority,
            completed: task.completed,
            created_at: task.created_at,
        }
    }
}

/// Task list response
#[derive(Debug, Serialize)]
pub struct TaskListResponse {
    /// All tasks, newest first
    pub tasks: Vec<TaskResponse>,
}

/// Create a new task
///
/// The task is owned by the logged-in user and receives a unique slug
/// derived from its title.
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Buy milk",
///   "description": "Two liters, whole",
///   "due_date": "2025-04-01",
///   "priority": 2
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "url": "/v1/tasks/buy-milk",
///   "slug": "buy-milk",
///   "title": "Buy milk",
///   "priority": 2,
///   "completed": false
/// }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid session token
/// - `422 Unprocessable Entity`: Validation failed
/// - `500 Internal Server Error`: Server error
pub async fn create_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<TaskResponse>)> {
    req.validate()?;

    let task = Task::create(
        &state.db,
        CreateTask {
            user_id: current_user.id,
            title: req.title,
            description: req.description,
            due_date: req.due_date,
            priority: req.priority,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, slug = %task.slug, "Task created");

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// List all tasks, newest first
///
/// Tasks created at the same instant keep their insertion order, newest
/// first.
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks
/// ```
///
/// # Response
///
/// ```json
/// {
///   "tasks": [
///     { "slug": "buy-milk", "title": "Buy milk" }
///   ]
/// }
/// ```
pub async fn list_tasks(State(state): State<AppState>) -> ApiResult<Json<TaskListResponse>> {
    let tasks = Task::list_recent(&state.db).await?;

    Ok(Json(TaskListResponse {
        tasks: tasks.into_iter().map(TaskResponse::from).collect(),
    }))
}

/// Fetch a single task by its slug
///
/// # Endpoint
///
/// ```text
/// GET /v1/tasks/buy-milk
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No task with this slug
pub async fn get_task(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    Ok(Json(task.into()))
}
