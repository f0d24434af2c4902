//! Motor endpoints under `/api/Motor`.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use super::components::{self, AddComponentRequest, TaskQuery, UpdateQualifyRequest};
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{ApiContext, ApiResponse};
use crate::models::{Component, ComponentKind};

#[derive(Debug, Deserialize)]
pub struct MotorQuery {
    #[serde(default)]
    pub motor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MotorBindFingerRequest {
    #[serde(default)]
    pub motor_id: String,
    #[serde(default)]
    pub finger_id: String,
}

/// `GET /api/Motor/GetMotor?motor_id=`
pub async fn get(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<MotorQuery>,
) -> Result<Json<ApiResponse<Component>>, ApiError> {
    components::get(&ctx, ComponentKind::Motor, &query.motor_id).map(Json)
}

/// `GET /api/Motor/GetFinishedList?taskId=`
pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Result<Json<ApiResponse<Vec<Component>>>, ApiError> {
    components::list(&ctx, ComponentKind::Motor, &query.task_id).map(Json)
}

/// `POST /api/Motor/AddMotor`: also opens the motor's first worm
/// detection record, returned as `detect1`.
pub async fn add(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<AddComponentRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::add(&ctx, ComponentKind::Motor, req, Some("detect1")).map(Json)
}

/// `POST /api/Motor/MotorBindFinger`
pub async fn bind_finger(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<MotorBindFingerRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::bind(&ctx, ComponentKind::Motor, &req.motor_id, &req.finger_id).map(Json)
}

/// `PUT /api/Motor/UpdateQualify`
pub async fn update_qualify(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UpdateQualifyRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::update_qualify(&ctx, ComponentKind::Motor, &req).map(Json)
}
