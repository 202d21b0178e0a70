//! Routes a `(tool name, arguments)` pair to its operation.
//!
//! Lookup and argument checks happen before any network traffic. Results are
//! rendered as indented JSON, or as a fixed confirmation for operations that
//! return nothing.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{info, instrument, warn};

use crate::client::ApiClient;
use crate::error::{TickTickError, TickTickResult};
use crate::operations::projects::{self, CreateProjectParams, ProjectIdParams, UpdateProjectParams};
use crate::operations::tasks::{
    self, BatchUpdateParams, CompletedTasksParams, CreateTaskParams, InboxTasksParams,
    SubtasksParams, TaskRefParams, UpdateTaskParams,
};
use crate::schema;

use super::catalog::ToolKind;

pub const PROJECT_DELETED: &str = "Project deleted successfully";
pub const TASK_COMPLETED: &str = "Task completed successfully";
pub const TASK_DELETED: &str = "Task deleted successfully";

#[derive(Clone)]
pub struct Dispatcher {
    client: ApiClient,
}

impl Dispatcher {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Run one tool call and return the text payload of the result.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> TickTickResult<String> {
        let kind: ToolKind = name.parse().map_err(|_| TickTickError::UnknownTool {
            name: name.to_string(),
        })?;

        let arguments = match arguments {
            Some(map) => Value::Object(map),
            None if kind.is_argument_free() => Value::Object(Map::new()),
            None => {
                return Err(TickTickError::MissingArguments {
                    tool: name.to_string(),
                });
            }
        };

        let result = self.run(kind, arguments).await;
        match &result {
            Ok(_) => info!(tool = name, "tool call succeeded"),
            Err(e) => warn!(tool = name, error = %e.describe(), "tool call failed"),
        }
        result
    }

    async fn run(&self, kind: ToolKind, arguments: Value) -> TickTickResult<String> {
        let client = &self.client;

        match kind {
            ToolKind::GetUserProjects => render(&projects::get_user_projects(client).await?),
            ToolKind::GetProjectById => {
                let params: ProjectIdParams = input(kind, arguments)?;
                render(&projects::get_project_by_id(client, &params.project_id).await?)
            }
            ToolKind::GetProjectWithData => {
                let params: ProjectIdParams = input(kind, arguments)?;
                render(&projects::get_project_with_data(client, &params.project_id).await?)
            }
            ToolKind::CreateProject => {
                let params: CreateProjectParams = input(kind, arguments)?;
                render(&projects::create_project(client, params).await?)
            }
            ToolKind::UpdateProject => {
                let params: UpdateProjectParams = input(kind, arguments)?;
                render(&projects::update_project(client, params).await?)
            }
            ToolKind::DeleteProject => {
                let params: ProjectIdParams = input(kind, arguments)?;
                projects::delete_project(client, &params.project_id).await?;
                Ok(PROJECT_DELETED.to_string())
            }
            ToolKind::GetTaskByIds => {
                let params: TaskRefParams = input(kind, arguments)?;
                render(&tasks::get_task_by_ids(client, params).await?)
            }
            ToolKind::CreateTask => {
                let params: CreateTaskParams = input(kind, arguments)?;
                render(&tasks::create_task(client, params).await?)
            }
            ToolKind::UpdateTask => {
                let params: UpdateTaskParams = input(kind, arguments)?;
                render(&tasks::update_task(client, params).await?)
            }
            ToolKind::CompleteTask => {
                let params: TaskRefParams = input(kind, arguments)?;
                tasks::complete_task(client, params).await?;
                Ok(TASK_COMPLETED.to_string())
            }
            ToolKind::DeleteTask => {
                let params: TaskRefParams = input(kind, arguments)?;
                tasks::delete_task(client, params).await?;
                Ok(TASK_DELETED.to_string())
            }
            ToolKind::GetCompletedTasks => {
                let params: CompletedTasksParams = input(kind, arguments)?;
                render(&tasks::get_completed_tasks(client, params).await?)
            }
            ToolKind::BatchUpdateTasks => {
                let params: BatchUpdateParams = input(kind, arguments)?;
                render(&tasks::batch_update_tasks(client, params).await?)
            }
            ToolKind::GetSubtasks => {
                let params: SubtasksParams = input(kind, arguments)?;
                render(&tasks::get_subtasks(client, params).await?)
            }
            ToolKind::GetCurrentUser => render(&tasks::get_current_user(client).await?),
            ToolKind::GetInboxTasks => {
                let params: InboxTasksParams = input(kind, arguments)?;
                render(&tasks::get_inbox_tasks(client, params).await?)
            }
        }
    }
}

fn input<T: DeserializeOwned>(kind: ToolKind, arguments: Value) -> TickTickResult<T> {
    Ok(schema::parse(&kind.input_shape(), arguments)?)
}

fn render<T: Serialize>(value: &T) -> TickTickResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
