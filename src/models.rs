//! Typed TickTick entities.
//!
//! These mirror the remote JSON (camelCase keys). Nothing here is cached or
//! persisted; values are decoded from a response, returned, and dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Task status observed for a completed task. Open tasks report 0; no other
/// values are assumed.
pub const TASK_STATUS_COMPLETED: i64 = 2;

/// A date either as formatted text (`yyyy-MM-dd'T'HH:mm:ssZ`) or as an epoch
/// number. Forwarded exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DateValue {
    Text(String),
    Epoch(Number),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Number>,
    /// `TASK` or `NOTE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    /// `list`, `kanban` or `timeline`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<String>,
}

/// A checklist line embedded in a task. Has no identity outside its task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Number>,
    /// 0 normal, 1 completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// iCalendar RRULE, e.g. `RRULE:FREQ=DAILY;INTERVAL=1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_flag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateValue>,
    /// iCalendar TRIGGER strings, e.g. `TRIGGER:PT0S`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminders: Option<Vec<String>>,
    /// 0 none, 1 low, 3 medium, 5 high.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Number>,
    pub status: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ChecklistItem>>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status.as_f64() == Some(TASK_STATUS_COMPLETED as f64)
    }
}

/// Kanban column of a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Number>,
}

/// A project together with its tasks and columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,
}

/// The authenticated user. Fields beyond `id` and `username` pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A task as returned by the completed-tasks query. Looser than [`Task`];
/// undeclared fields pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedTask {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub status: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_all_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_time: Option<DateValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
