//! Project operations.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use crate::client::ApiClient;
use crate::error::TickTickResult;
use crate::models::{Project, ProjectData};
use crate::operations::decode;
use crate::schema::entities::{self, PROJECT_KINDS, VIEW_MODES};
use crate::schema::{Field, Shape, ValidationError};

// =============================================================================
// Parameters
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectIdParams {
    pub project_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectParams {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectParams {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

/// Body sent on create and update. The project id travels in the path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProjectBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sort_order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    view_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
}

// =============================================================================
// Input shapes
// =============================================================================

/// Colors are normalized locally, so the schema says what is accepted.
pub const COLOR_DESCRIPTION: &str = "Project color as hex: #RRGGBB, #RGB, or the same without '#' \
     (e.g. \"#4772FA\"). Named colors such as \"red\" are rejected";

pub fn project_id_shape() -> Shape {
    Shape::object(vec![
        Field::required("projectId", Shape::String).describe("Project identifier"),
    ])
}

pub fn create_project_shape() -> Shape {
    Shape::object(vec![
        Field::required("name", Shape::String).describe("Project name"),
        Field::optional("color", Shape::String)
            .describe(COLOR_DESCRIPTION)
            .default_value(json!("#4772FA")),
        Field::optional("viewMode", Shape::Enum(VIEW_MODES))
            .describe("View mode")
            .default_value(json!("list")),
        Field::optional("kind", Shape::Enum(PROJECT_KINDS))
            .describe("Project kind")
            .default_value(json!("TASK")),
    ])
}

pub fn update_project_shape() -> Shape {
    Shape::object(vec![
        Field::required("projectId", Shape::String).describe("Project identifier"),
        Field::optional("name", Shape::String).describe("Project name"),
        Field::optional("color", Shape::String).describe(COLOR_DESCRIPTION),
        Field::optional("sortOrder", Shape::Integer).describe("Project sort order"),
        Field::optional("viewMode", Shape::Enum(VIEW_MODES)).describe("View mode"),
        Field::optional("kind", Shape::Enum(PROJECT_KINDS)).describe("Project kind"),
    ])
}

/// Normalize a user-supplied color to `#RRGGBB` upper-case hex.
///
/// Accepts an optional leading `#` and the 3-digit shorthand.
pub fn format_color(raw: &str) -> Result<String, ValidationError> {
    let hex = raw.trim().trim_start_matches('#');
    let is_hex = hex.chars().all(|c| c.is_ascii_hexdigit());

    let expanded = match hex.len() {
        6 if is_hex => hex.to_string(),
        3 if is_hex => hex.chars().flat_map(|c| [c, c]).collect(),
        _ => {
            return Err(ValidationError::single(
                "color",
                format!("expected a hex color such as #4772FA, received {raw:?}"),
            ));
        }
    };

    Ok(format!("#{}", expanded.to_ascii_uppercase()))
}

// =============================================================================
// Operations
// =============================================================================

#[instrument(skip(client))]
pub async fn get_user_projects(client: &ApiClient) -> TickTickResult<Vec<Project>> {
    let response = client.send_json(client.get(&["project"])).await?;
    decode(&Shape::array(entities::project()), response)
}

#[instrument(skip(client))]
pub async fn get_project_by_id(client: &ApiClient, project_id: &str) -> TickTickResult<Project> {
    let response = client
        .send_json(client.get(&["project", project_id]))
        .await?;
    decode(&entities::project(), response)
}

#[instrument(skip(client))]
pub async fn get_project_with_data(
    client: &ApiClient,
    project_id: &str,
) -> TickTickResult<ProjectData> {
    let response = client
        .send_json(client.get(&["project", project_id, "data"]))
        .await?;
    decode(&entities::project_data(), response)
}

#[instrument(skip(client))]
pub async fn create_project(
    client: &ApiClient,
    params: CreateProjectParams,
) -> TickTickResult<Project> {
    let body = ProjectBody {
        name: Some(params.name),
        color: params.color.as_deref().map(format_color).transpose()?,
        sort_order: None,
        view_mode: params.view_mode,
        kind: params.kind,
    };

    let response = client.send_json(client.post(&["project"]).json(&body)).await?;
    decode(&entities::project(), response)
}

#[instrument(skip(client))]
pub async fn update_project(
    client: &ApiClient,
    params: UpdateProjectParams,
) -> TickTickResult<Project> {
    let body = ProjectBody {
        name: params.name,
        color: params.color.as_deref().map(format_color).transpose()?,
        sort_order: params.sort_order,
        view_mode: params.view_mode,
        kind: params.kind,
    };

    let request = client.post(&["project", &params.project_id]).json(&body);
    let response = client.send_json(request).await?;
    decode(&entities::project(), response)
}

#[instrument(skip(client))]
pub async fn delete_project(client: &ApiClient, project_id: &str) -> TickTickResult<()> {
    client.send(client.delete(&["project", project_id])).await?;
    Ok(())
}
