//! Finger endpoints under `/api/Finger`.

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
pub struct FingerBindPalmRequest {
    #[serde(default)]
    pub finger_id: String,
    #[serde(default)]
    pub palm_id: String,
}

pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Result<Json<ApiResponse<Vec<Component>>>, ApiError> {
    components::list(&ctx, ComponentKind::Finger, &query.task_id).map(Json)
}

pub async fn add(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<AddComponentRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::add(&ctx, ComponentKind::Finger, req, None).map(Json)
}

pub async fn bind_palm(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<FingerBindPalmRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::bind(&ctx, ComponentKind::Finger, &req.finger_id, &req.palm_id).map(Json)
}

pub async fn update_qualify(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UpdateQualifyRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::update_qualify(&ctx, ComponentKind::Finger, &req).map(Json)
}
