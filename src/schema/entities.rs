//! Response shapes for TickTick entities.

use super::{Field, Shape};

pub const PRIORITIES: &[i64] = &[0, 1, 3, 5];
pub const VIEW_MODES: &[&str] = &["list", "kanban", "timeline"];
pub const PROJECT_KINDS: &[&str] = &["TASK", "NOTE"];

/// Date as formatted string or epoch number.
pub fn date() -> Shape {
    Shape::Union(vec![Shape::String, Shape::Number])
}

pub fn project() -> Shape {
    Shape::object(vec![
        Field::required("id", Shape::String),
        Field::required("name", Shape::String),
        Field::optional("color", Shape::String),
        Field::optional("sortOrder", Shape::Number),
        Field::optional("kind", Shape::String),
        Field::optional("closed", Shape::Boolean),
        Field::optional("groupId", Shape::String),
        Field::optional("viewMode", Shape::String),
        Field::optional("permission", Shape::String),
    ])
}

pub fn checklist_item() -> Shape {
    Shape::object(vec![
        Field::required("id", Shape::String),
        Field::required("title", Shape::String),
        Field::required("status", Shape::Number),
        Field::optional("sortOrder", Shape::Number),
        Field::optional("startDate", date()),
        Field::optional("isAllDay", Shape::Boolean),
        Field::optional("timeZone", Shape::String),
        Field::optional("completedTime", date()),
    ])
}

pub fn task() -> Shape {
    Shape::object(vec![
        Field::required("id", Shape::String),
        Field::required("projectId", Shape::String),
        Field::required("title", Shape::String),
        Field::required("status", Shape::Number),
        Field::optional("isAllDay", Shape::Boolean),
        Field::optional("content", Shape::String),
        Field::optional("desc", Shape::String),
        Field::optional("timeZone", Shape::String),
        Field::optional("repeatFlag", Shape::String),
        Field::optional("startDate", date()),
        Field::optional("dueDate", date()),
        Field::optional("reminders", Shape::array(Shape::String)),
        Field::optional("priority", Shape::Number),
        Field::optional("completedTime", date()),
        Field::optional("sortOrder", Shape::Number),
        Field::optional("parentId", Shape::String),
        Field::optional("items", Shape::array(checklist_item())),
    ])
}

pub fn column() -> Shape {
    Shape::object(vec![
        Field::optional("id", Shape::String),
        Field::optional("projectId", Shape::String),
        Field::optional("name", Shape::String),
        Field::optional("sortOrder", Shape::Number),
    ])
}

pub fn project_data() -> Shape {
    Shape::object(vec![
        Field::optional("project", project()),
        Field::required("tasks", Shape::array(task())),
        Field::optional("columns", Shape::array(column())),
    ])
}

pub fn user() -> Shape {
    Shape::passthrough(vec![
        Field::required("id", Shape::String),
        Field::optional("username", Shape::String),
    ])
}

pub fn completed_task() -> Shape {
    Shape::passthrough(vec![
        Field::required("id", Shape::String),
        Field::required("projectId", Shape::String),
        Field::required("title", Shape::String),
        Field::required("status", Shape::Number),
        Field::optional("content", Shape::String),
        Field::optional("desc", Shape::String),
        Field::optional("isAllDay", Shape::Boolean),
        Field::optional("timeZone", Shape::String),
        Field::optional("startDate", date()),
        Field::optional("dueDate", date()),
        Field::optional("priority", Shape::Number),
        Field::optional("completedTime", date()),
        Field::optional("sortOrder", Shape::Number),
        Field::optional("parentId", Shape::String),
    ])
}
