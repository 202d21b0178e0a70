//! Task operations, including the derived views (subtasks, inbox) that have
//! no dedicated remote endpoint.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::client::ApiClient;
use crate::error::TickTickResult;
use crate::models::{ChecklistItem, CompletedTask, DateValue, ProjectData, Task, User};
use crate::operations::decode;
use crate::operations::projects::get_project_with_data;
use crate::schema::entities::{self, PRIORITIES, date};
use crate::schema::{Field, Shape, ValidationError};

pub const DEFAULT_COMPLETED_LIMIT: u32 = 100;
const INBOX_PREFIX: &str = "inbox";

// =============================================================================
// Parameters
// =============================================================================

/// Identifies a task within its project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRefParams {
    pub task_id: String,
    pub project_id: String,
}

/// Optional task attributes shared by create, update and batch items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ChecklistItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskParams {
    pub title: String,
    pub project_id: String,
    #[serde(flatten)]
    pub fields: TaskFields,
}

/// The task id may arrive as `taskId` (path) or `id` (body); at least one is
/// required and `taskId` wins when both are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub fields: TaskFields,
}

impl UpdateTaskParams {
    /// Effective task id: path id first, then body id. Empty strings count
    /// as absent.
    pub fn resolved_id(&self) -> Option<&str> {
        [self.task_id.as_deref(), self.id.as_deref()]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTaskBody<'a> {
    id: &'a str,
    project_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(flatten)]
    fields: &'a TaskFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTasksParams {
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTaskCreate {
    pub title: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateValue>,
    #[serde(flatten)]
    pub fields: TaskFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchTaskUpdate {
    pub id: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateValue>,
    #[serde(flatten)]
    pub fields: TaskFields,
}

/// Independent add / update / delete lists sent in one remote call. Absent
/// or empty lists are left out of the request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchUpdateParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add: Option<Vec<BatchTaskCreate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<Vec<BatchTaskUpdate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<Vec<TaskRefParams>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubtasksParams {
    pub parent_id: String,
    pub project_id: String,
}

/// Task list of a project-with-data payload.
#[derive(Debug, Deserialize)]
struct ProjectTasks {
    tasks: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxTasksParams {
    #[serde(default)]
    pub include_completed: Option<bool>,
}

// =============================================================================
// Input shapes
// =============================================================================

const DATE_FORMAT_HINT: &str =
    "in \"yyyy-MM-dd'T'HH:mm:ssZ\" format or as epoch milliseconds";

pub fn task_ref_shape() -> Shape {
    Shape::object(vec![
        Field::required("taskId", Shape::String).describe("Task identifier"),
        Field::required("projectId", Shape::String).describe("Project identifier"),
    ])
}

fn checklist_item_input() -> Shape {
    Shape::object(vec![
        Field::optional("id", Shape::String).describe("Existing checklist item id (omit on create)"),
        Field::required("title", Shape::String).describe("Subtask item title"),
        Field::optional("startDate", date()).describe(DATE_FORMAT_HINT),
        Field::optional("isAllDay", Shape::Boolean).describe("Is all day subtask item"),
        Field::optional("sortOrder", Shape::Integer).describe("Subtask item sort order"),
        Field::optional("timeZone", Shape::String)
            .describe("Subtask item time zone. Example: \"America/Los_Angeles\""),
        Field::optional("status", Shape::Integer)
            .describe("The completion status of subtask. Normal: 0, Completed: 1"),
        Field::optional("completedTime", date()).describe(DATE_FORMAT_HINT),
    ])
}

fn task_field_shapes() -> Vec<Field> {
    vec![
        Field::optional("content", Shape::String).describe("Task content"),
        Field::optional("desc", Shape::String).describe("Task description"),
        Field::optional("isAllDay", Shape::Boolean).describe("Is all day task"),
        Field::optional("startDate", date()).describe(DATE_FORMAT_HINT),
        Field::optional("dueDate", date()).describe(DATE_FORMAT_HINT),
        Field::optional("timeZone", Shape::String)
            .describe("Task time zone. Example: \"America/Los_Angeles\""),
        Field::optional("reminders", Shape::array(Shape::String)).describe(
            "List of reminder triggers in iCalendar (RFC 5545) format. Example: [\"TRIGGER:P0DT9H0M0S\", \"TRIGGER:PT0S\"]",
        ),
        Field::optional("repeatFlag", Shape::String).describe(
            "Task repeat flag in iCalendar (RFC 5545) format. Example: RRULE:FREQ=DAILY;INTERVAL=1",
        ),
        Field::optional("priority", Shape::IntEnum(PRIORITIES))
            .describe("Task priority None: 0, Low: 1, Medium: 3, High: 5"),
        Field::optional("sortOrder", Shape::Integer).describe("Task sort order. Example: 12345"),
        Field::optional("items", Shape::array(checklist_item_input()))
            .describe("The list of checklist items"),
        Field::optional("parentId", Shape::String).describe("Parent task ID to nest this task under"),
    ]
}

fn with_fields(mut leading: Vec<Field>) -> Vec<Field> {
    leading.extend(task_field_shapes());
    leading
}

pub fn create_task_shape() -> Shape {
    Shape::object(with_fields(vec![
        Field::required("title", Shape::String).describe("Task title"),
        Field::required("projectId", Shape::String).describe("Project id"),
    ]))
}

pub fn update_task_shape() -> Shape {
    Shape::object(with_fields(vec![
        Field::optional("taskId", Shape::String).describe("Task identifier - Path"),
        Field::optional("id", Shape::String).describe("Task identifier - Body"),
        Field::required("projectId", Shape::String).describe("Project id"),
        Field::optional("title", Shape::String).describe("Task title"),
    ]))
    .with_rule("either taskId or id must be provided", |map| {
        has_text(map, "taskId") || has_text(map, "id")
    })
}

pub fn completed_tasks_shape() -> Shape {
    Shape::object(vec![
        Field::required("from", Shape::String)
            .describe("Start datetime string, e.g. \"2026-02-19T00:00:00.000+0000\""),
        Field::optional("to", Shape::String)
            .describe("End datetime string. Defaults to now if not provided"),
        Field::optional("limit", Shape::Integer)
            .describe("Max number of results to return (default 100)"),
    ])
}

pub fn batch_update_shape() -> Shape {
    let add_item = Shape::object(with_fields(vec![
        Field::required("title", Shape::String),
        Field::required("projectId", Shape::String),
        Field::optional("status", Shape::Integer),
        Field::optional("completedTime", date()),
    ]));
    let update_item = Shape::object(with_fields(vec![
        Field::required("id", Shape::String),
        Field::required("projectId", Shape::String),
        Field::optional("title", Shape::String),
        Field::optional("status", Shape::Integer),
        Field::optional("completedTime", date()),
    ]));

    Shape::object(vec![
        Field::optional("add", Shape::array(add_item)).describe("Array of task objects to create"),
        Field::optional("update", Shape::array(update_item))
            .describe("Array of task objects to update"),
        Field::optional("delete", Shape::array(task_ref_shape()))
            .describe("Array of { taskId, projectId } objects to delete"),
    ])
    .with_rule(
        "at least one of add, update, or delete must be provided",
        |map| ["add", "update", "delete"].iter().any(|key| has_items(map, key)),
    )
}

pub fn subtasks_shape() -> Shape {
    Shape::object(vec![
        Field::required("parentId", Shape::String).describe("Parent task ID to find subtasks for"),
        Field::required("projectId", Shape::String)
            .describe("Project ID containing the parent task"),
    ])
}

pub fn inbox_tasks_shape() -> Shape {
    Shape::object(vec![
        Field::optional("includeCompleted", Shape::Boolean)
            .describe("Include completed tasks (default false)"),
    ])
}

/// Subtask lookups read `tasks` only; the rest of the payload passes through.
fn project_tasks_shape() -> Shape {
    Shape::passthrough(vec![Field::required(
        "tasks",
        Shape::array(entities::task()),
    )])
}

fn has_text(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key)
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty())
}

fn has_items(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key)
        .and_then(Value::as_array)
        .is_some_and(|items| !items.is_empty())
}

// =============================================================================
// Operations
// =============================================================================

#[instrument(skip(client))]
pub async fn get_task_by_ids(client: &ApiClient, params: TaskRefParams) -> TickTickResult<Task> {
    let path = ["project", &params.project_id, "task", &params.task_id];
    let response = client.send_json(client.get(&path)).await?;
    decode(&entities::task(), response)
}

#[instrument(skip(client))]
pub async fn create_task(client: &ApiClient, params: CreateTaskParams) -> TickTickResult<Task> {
    let response = client.send_json(client.post(&["task"]).json(&params)).await?;
    decode(&entities::task(), response)
}

#[instrument(skip(client))]
pub async fn update_task(client: &ApiClient, params: UpdateTaskParams) -> TickTickResult<Task> {
    let id = params
        .resolved_id()
        .ok_or_else(|| ValidationError::single("taskId", "either taskId or id must be provided"))?;

    let body = UpdateTaskBody {
        id,
        project_id: &params.project_id,
        title: params.title.as_deref(),
        fields: &params.fields,
    };

    let response = client
        .send_json(client.post(&["task", id]).json(&body))
        .await?;
    decode(&entities::task(), response)
}

#[instrument(skip(client))]
pub async fn complete_task(client: &ApiClient, params: TaskRefParams) -> TickTickResult<()> {
    let path = [
        "project",
        &params.project_id,
        "task",
        &params.task_id,
        "complete",
    ];
    client.send(client.post(&path)).await?;
    Ok(())
}

#[instrument(skip(client))]
pub async fn delete_task(client: &ApiClient, params: TaskRefParams) -> TickTickResult<()> {
    let path = ["project", &params.project_id, "task", &params.task_id];
    client.send(client.delete(&path)).await?;
    Ok(())
}

/// Current instant as `yyyy-MM-ddTHH:mm:ss.SSSZ`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[instrument(skip(client))]
pub async fn get_completed_tasks(
    client: &ApiClient,
    params: CompletedTasksParams,
) -> TickTickResult<Vec<CompletedTask>> {
    // Blank `to` and zero `limit` mean "not given".
    let to = params
        .to
        .filter(|to| !to.trim().is_empty())
        .unwrap_or_else(now_timestamp);
    let limit = params
        .limit
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_COMPLETED_LIMIT);

    // Trailing empty segment keeps the slash the endpoint expects.
    let request = client
        .get_v2(&["project", "all", "completedInAll", ""])
        .query(&[("from", params.from), ("to", to), ("limit", limit.to_string())]);

    let response = client.send_json(request).await?;
    decode(&Shape::array(entities::completed_task()), response)
}

#[instrument(skip(client))]
pub async fn batch_update_tasks(
    client: &ApiClient,
    params: BatchUpdateParams,
) -> TickTickResult<Value> {
    let body = BatchUpdateParams {
        add: params.add.filter(|items| !items.is_empty()),
        update: params.update.filter(|items| !items.is_empty()),
        delete: params.delete.filter(|items| !items.is_empty()),
    };

    if body.add.is_none() && body.update.is_none() && body.delete.is_none() {
        return Err(ValidationError::single(
            "(root)",
            "at least one of add, update, or delete must be provided",
        )
        .into());
    }

    let response = client.send(client.post(&["batch", "task"]).json(&body)).await?;
    decode(&Shape::Any, response.unwrap_or(Value::Null))
}

/// Tasks of `project_id` whose parent is `parent_id`.
#[instrument(skip(client))]
pub async fn get_subtasks(client: &ApiClient, params: SubtasksParams) -> TickTickResult<Vec<Task>> {
    let response = client
        .send_json(client.get(&["project", &params.project_id, "data"]))
        .await?;
    // Only the task list matters here; the project entry is not checked.
    let data: ProjectTasks = decode(&project_tasks_shape(), response)?;

    let subtasks: Vec<Task> = data
        .tasks
        .into_iter()
        .filter(|task| task.parent_id.as_deref() == Some(params.parent_id.as_str()))
        .collect();

    debug!(count = subtasks.len(), "filtered subtasks");
    Ok(subtasks)
}

#[instrument(skip(client))]
pub async fn get_current_user(client: &ApiClient) -> TickTickResult<User> {
    let response = client.send_json(client.get(&["user"])).await?;
    decode(&entities::user(), response)
}

/// Inbox project id for a user.
pub fn inbox_project_id(user_id: &str) -> String {
    format!("{INBOX_PREFIX}{user_id}")
}

/// The user's inbox project with its tasks. Completed tasks are dropped
/// unless `include_completed` is set.
#[instrument(skip(client))]
pub async fn get_inbox_tasks(
    client: &ApiClient,
    params: InboxTasksParams,
) -> TickTickResult<ProjectData> {
    let user = get_current_user(client).await?;
    let inbox_id = inbox_project_id(&user.id);
    let mut data = get_project_with_data(client, &inbox_id).await?;

    if !params.include_completed.unwrap_or(false) {
        data.tasks.retain(|task| !task.is_completed());
    }

    Ok(data)
}
