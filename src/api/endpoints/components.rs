//! Handlers shared by the motor, finger, palm and split endpoints.

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, ApiResponse};
use crate::inspection;
use crate::models::{Component, ComponentKind, NewComponent};

/// `?task_id=` on the detection lists, `?taskId=` on the component lists;
/// both spellings are accepted everywhere.
#[derive(Debug, Deserialize)]
pub struct TaskQuery {
    #[serde(default, alias = "taskId")]
    pub task_id: String,
}

/// Body of every `UpdateQualify` call.
#[derive(Debug, Deserialize)]
pub struct UpdateQualifyRequest {
    #[serde(default)]
    pub id: String,
    #[serde(alias = "qualify")]
    pub if_qualified: bool,
}

/// Body of every `Add*` call; the id field is named after the kind
/// (`motor_id`, `finger_id`, ...).
#[derive(Debug, Deserialize)]
pub struct AddComponentRequest {
    #[serde(
        default,
        alias = "motor_id",
        alias = "finger_id",
        alias = "palm_id",
        alias = "split_id"
    )]
    pub component_id: String,
    #[serde(default, alias = "taskId")]
    pub task_id: String,
    pub remarks: Option<String>,
}

impl From<AddComponentRequest> for NewComponent {
    fn from(req: AddComponentRequest) -> Self {
        NewComponent {
            component_id: req.component_id,
            task_id: req.task_id,
            remarks: req.remarks,
        }
    }
}

/// Register a component. The payload carries the component under its kind
/// name (`{"motor": …}`) plus, for worm-inspected kinds, the detection
/// record opened with it under `detection_key`.
pub(crate) fn add(
    ctx: &ApiContext,
    kind: ComponentKind,
    req: AddComponentRequest,
    detection_key: Option<&str>,
) -> Result<ApiResponse<Value>, ApiError> {
    let conn = ctx.core.db()?;
    let registration = inspection::register_component(&conn, kind, &req.into())?;

    let mut data = Map::new();
    data.insert(kind.as_str().to_string(), json!(registration.component));
    if let Some(key) = detection_key {
        data.insert(key.to_string(), json!(registration.initial_detection));
    }
    Ok(ApiResponse::success_with(
        format!("{} registered", kind.label()),
        Value::Object(data),
    ))
}

pub(crate) fn get(
    ctx: &ApiContext,
    kind: ComponentKind,
    component_id: &str,
) -> Result<ApiResponse<Component>, ApiError> {
    let conn = ctx.core.db()?;
    Ok(match inspection::get_component(&conn, kind, component_id)? {
        Some(component) => ApiResponse::success(component),
        None => ApiResponse::not_found(format!("{} '{component_id}' not found", kind.label())),
    })
}

pub(crate) fn list(
    ctx: &ApiContext,
    kind: ComponentKind,
    task_id: &str,
) -> Result<ApiResponse<Vec<Component>>, ApiError> {
    let conn = ctx.core.db()?;
    let components = inspection::components_for_task(&conn, kind, task_id)?;
    Ok(ApiResponse::success(components))
}

pub(crate) fn bind(
    ctx: &ApiContext,
    kind: ComponentKind,
    component_id: &str,
    parent_id: &str,
) -> Result<ApiResponse<Value>, ApiError> {
    let conn = ctx.core.db()?;
    inspection::bind(&conn, kind, component_id, parent_id)?;
    let parent_field = kind.parent().map(|p| p.id_field()).unwrap_or("parent_id");
    Ok(ApiResponse::success_with(
        "Binding saved",
        json!({
            kind.id_field(): component_id,
            parent_field: parent_id,
        }),
    ))
}

pub(crate) fn update_qualify(
    ctx: &ApiContext,
    kind: ComponentKind,
    req: &UpdateQualifyRequest,
) -> Result<ApiResponse<Value>, ApiError> {
    let conn = ctx.core.db()?;
    inspection::set_qualified(&conn, kind, &req.id, req.if_qualified)?;
    Ok(ApiResponse::success_with(
        "Qualification updated",
        json!({ "id": req.id, "if_qualified": req.if_qualified }),
    ))
}
