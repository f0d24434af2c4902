//! Palm endpoints under `/api/Palm`. Palms are the top of the assembly
//! tree, so there is no bind route.

use axum::extract::State;
use axum::Json;
use serde_json::Value;

use super::components::{self, AddComponentRequest, TaskQuery, UpdateQualifyRequest};
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{ApiContext, ApiResponse};
use crate::models::{Component, ComponentKind};

pub async fn list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Result<Json<ApiResponse<Vec<Component>>>, ApiError> {
    components::list(&ctx, ComponentKind::Palm, &query.task_id).map(Json)
}

pub async fn add(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<AddComponentRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::add(&ctx, ComponentKind::Palm, req, None).map(Json)
}

pub async fn update_qualify(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UpdateQualifyRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    components::update_qualify(&ctx, ComponentKind::Palm, &req).map(Json)
}
