//! The fixed tool catalog: names, descriptions and input shapes.

use std::str::FromStr;
use std::sync::Arc;

use rmcp::model::Tool;
use serde_json::Value;

use crate::operations::{projects, tasks};
use crate::schema::Shape;

/// Every tool this server exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetUserProjects,
    GetProjectById,
    GetProjectWithData,
    CreateProject,
    UpdateProject,
    DeleteProject,
    GetTaskByIds,
    CreateTask,
    UpdateTask,
    CompleteTask,
    DeleteTask,
    GetCompletedTasks,
    BatchUpdateTasks,
    GetSubtasks,
    GetCurrentUser,
    GetInboxTasks,
}

impl ToolKind {
    /// Catalog order.
    pub const ALL: [ToolKind; 16] = [
        ToolKind::GetUserProjects,
        ToolKind::GetProjectById,
        ToolKind::GetProjectWithData,
        ToolKind::CreateProject,
        ToolKind::UpdateProject,
        ToolKind::DeleteProject,
        ToolKind::GetTaskByIds,
        ToolKind::CreateTask,
        ToolKind::UpdateTask,
        ToolKind::CompleteTask,
        ToolKind::DeleteTask,
        ToolKind::GetCompletedTasks,
        ToolKind::BatchUpdateTasks,
        ToolKind::GetSubtasks,
        ToolKind::GetCurrentUser,
        ToolKind::GetInboxTasks,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetUserProjects => "get_user_projects",
            ToolKind::GetProjectById => "get_project_by_id",
            ToolKind::GetProjectWithData => "get_project_with_data",
            ToolKind::CreateProject => "create_project",
            ToolKind::UpdateProject => "update_project",
            ToolKind::DeleteProject => "delete_project",
            ToolKind::GetTaskByIds => "get_task_by_ids",
            ToolKind::CreateTask => "create_task",
            ToolKind::UpdateTask => "update_task",
            ToolKind::CompleteTask => "complete_task",
            ToolKind::DeleteTask => "delete_task",
            ToolKind::GetCompletedTasks => "get_completed_tasks",
            ToolKind::BatchUpdateTasks => "batch_update_tasks",
            ToolKind::GetSubtasks => "get_subtasks",
            ToolKind::GetCurrentUser => "get_current_user",
            ToolKind::GetInboxTasks => "get_inbox_tasks",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::GetUserProjects => "Get all user projects",
            ToolKind::GetProjectById => "Get a project by ID",
            ToolKind::GetProjectWithData => "Get a project with its tasks and columns",
            ToolKind::CreateProject => "Create a new project",
            ToolKind::UpdateProject => "Update an existing project",
            ToolKind::DeleteProject => "Delete a project",
            ToolKind::GetTaskByIds => "Get a task by ProjectId and TaskId",
            ToolKind::CreateTask => "Create a new task",
            ToolKind::UpdateTask => "Update an existing task",
            ToolKind::CompleteTask => "Complete a task",
            ToolKind::DeleteTask => "Delete a task",
            ToolKind::GetCompletedTasks => {
                "Get completed tasks across all projects within a date range"
            }
            ToolKind::BatchUpdateTasks => {
                "Batch create, update, and/or delete multiple tasks in a single request"
            }
            ToolKind::GetSubtasks => {
                "Get all subtasks of a parent task by fetching project data and filtering by parentId"
            }
            ToolKind::GetCurrentUser => "Get the current authenticated user profile",
            ToolKind::GetInboxTasks => {
                "Get tasks from the inbox (resolves inbox project ID automatically from user profile)"
            }
        }
    }

    /// Tools that may be invoked without an arguments object.
    pub fn is_argument_free(self) -> bool {
        matches!(self, ToolKind::GetUserProjects | ToolKind::GetCurrentUser)
    }

    pub fn input_shape(self) -> Shape {
        match self {
            ToolKind::GetUserProjects | ToolKind::GetCurrentUser => Shape::object(Vec::new()),
            ToolKind::GetProjectById
            | ToolKind::GetProjectWithData
            | ToolKind::DeleteProject => projects::project_id_shape(),
            ToolKind::CreateProject => projects::create_project_shape(),
            ToolKind::UpdateProject => projects::update_project_shape(),
            ToolKind::GetTaskByIds | ToolKind::CompleteTask | ToolKind::DeleteTask => {
                tasks::task_ref_shape()
            }
            ToolKind::CreateTask => tasks::create_task_shape(),
            ToolKind::UpdateTask => tasks::update_task_shape(),
            ToolKind::GetCompletedTasks => tasks::completed_tasks_shape(),
            ToolKind::BatchUpdateTasks => tasks::batch_update_shape(),
            ToolKind::GetSubtasks => tasks::subtasks_shape(),
            ToolKind::GetInboxTasks => tasks::inbox_tasks_shape(),
        }
    }

    /// rmcp descriptor for discovery.
    pub fn to_tool(self) -> Tool {
        let schema = match self.input_shape().to_json_schema() {
            Value::Object(map) => map,
            _ => Default::default(),
        };
        Tool::new(self.name(), self.description(), Arc::new(schema))
    }
}

impl FromStr for ToolKind {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.name() == name)
            .ok_or(())
    }
}

/// Full catalog in a stable order.
pub fn tools() -> Vec<Tool> {
    ToolKind::ALL.into_iter().map(ToolKind::to_tool).collect()
}
