//! Worm detection endpoints.
//!
//! Motor worm records live under `/api/Detect1`, split mechanism records
//! under `/api/Detect2`:
//! - `GET  …/GetMotorWormDetect` / `GetSplitWormDetect`: latest record
//! - `GET  …/GetMotorWormDetectList` / `GetSplitWormDetectList`: by task
//! - `POST …/AddDetect1` / `AddDetect2`: open a record
//! - `PUT  …/UpdateLatestDetect`: merge measurements and settle qualification

use axum::extract::State;
use axum::Json;
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use serde_json::{json, Value};

use super::components::TaskQuery;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiQuery};
use crate::api::types::{ApiContext, ApiResponse};
use crate::inspection;
use crate::models::{timestamp, DetectionKind, DetectionRecord, DetectionUpdate, NewDetection};

#[derive(Debug, Deserialize)]
pub struct MotorQuery {
    #[serde(default)]
    pub motor_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SplitQuery {
    #[serde(default)]
    pub split_id: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMotorDetectRequest {
    #[serde(default)]
    pub motor_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub combine_time: Option<NaiveDateTime>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub if_qualified: bool,
}

#[derive(Debug, Deserialize)]
pub struct AddSplitDetectRequest {
    #[serde(default)]
    pub split_id: String,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub combine_time: Option<NaiveDateTime>,
    pub remarks: Option<String>,
    #[serde(default)]
    pub if_qualified: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMotorDetectRequest {
    #[serde(default)]
    pub motor_id: String,
    #[serde(flatten)]
    pub update: DetectionUpdate,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSplitDetectRequest {
    #[serde(default)]
    pub split_id: String,
    #[serde(flatten)]
    pub update: DetectionUpdate,
}

// ── shared handlers ─────────────────────────────────────

fn latest(
    ctx: &ApiContext,
    kind: DetectionKind,
    component_id: &str,
) -> Result<ApiResponse<DetectionRecord>, ApiError> {
    let conn = ctx.core.db()?;
    let response = match inspection::latest_detection(&conn, kind, component_id)? {
        Some(record) => {
            tracing::info!(component_id, detect_id = record.id, "Latest detection record fetched");
            ApiResponse::success(record)
        }
        None => {
            tracing::info!(component_id, kind = %kind, "No detection record");
            ApiResponse::not_found(format!(
                "No detection record for {} '{component_id}'",
                kind.component().label()
            ))
        }
    };
    Ok(response)
}

fn list(
    ctx: &ApiContext,
    kind: DetectionKind,
    task_id: &str,
) -> Result<ApiResponse<Vec<DetectionRecord>>, ApiError> {
    let conn = ctx.core.db()?;
    let records = inspection::detections_for_task(&conn, kind, task_id)?;
    Ok(ApiResponse::success(records))
}

fn add(
    ctx: &ApiContext,
    kind: DetectionKind,
    new: NewDetection,
) -> Result<ApiResponse<Value>, ApiError> {
    let conn = ctx.core.db()?;
    let record = inspection::add_detection(&conn, kind, &new)?;
    Ok(ApiResponse::success_with(
        "Detection record created",
        json!({
            "detect_id": record.id,
            kind.component().id_field(): record.component_id,
            "combine_time": record.combine_time,
        }),
    ))
}

fn update_latest(
    ctx: &ApiContext,
    kind: DetectionKind,
    component_id: &str,
    update: &DetectionUpdate,
) -> Result<ApiResponse<Value>, ApiError> {
    let mut conn = ctx.core.db()?;
    let outcome = inspection::update_latest_detection(&mut conn, kind, component_id, update)?;
    Ok(ApiResponse::success_with(
        "Detection record updated",
        json!({
            "detect_id": outcome.record.id,
            kind.component().id_field(): outcome.record.component_id,
            "updated_fields": outcome.updated_fields,
            "if_qualified": outcome.record.if_qualified,
        }),
    ))
}

/// Records opened without a bonding time are stamped with the current time.
fn opening(
    component_id: String,
    combine_time: Option<NaiveDateTime>,
    remarks: Option<String>,
    if_qualified: bool,
) -> NewDetection {
    NewDetection {
        component_id,
        combine_time: Some(combine_time.unwrap_or_else(|| Local::now().naive_local())),
        remarks,
        if_qualified,
    }
}

// ── motor worm (Detect1) ────────────────────────────────

/// `GET /api/Detect1/GetMotorWormDetect?motor_id=`
pub async fn motor_latest(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<MotorQuery>,
) -> Result<Json<ApiResponse<DetectionRecord>>, ApiError> {
    latest(&ctx, DetectionKind::MotorWorm, &query.motor_id).map(Json)
}

/// `GET /api/Detect1/GetMotorWormDetectList?task_id=`
pub async fn motor_list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Result<Json<ApiResponse<Vec<DetectionRecord>>>, ApiError> {
    list(&ctx, DetectionKind::MotorWorm, &query.task_id).map(Json)
}

/// `POST /api/Detect1/AddDetect1`
pub async fn motor_add(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<AddMotorDetectRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let new = opening(req.motor_id, req.combine_time, req.remarks, req.if_qualified);
    add(&ctx, DetectionKind::MotorWorm, new).map(Json)
}

/// `PUT /api/Detect1/UpdateLatestDetect`
pub async fn motor_update_latest(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UpdateMotorDetectRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    update_latest(&ctx, DetectionKind::MotorWorm, &req.motor_id, &req.update).map(Json)
}

// ── split worm (Detect2) ────────────────────────────────

/// `GET /api/Detect2/GetSplitWormDetect?split_id=`
pub async fn split_latest(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<SplitQuery>,
) -> Result<Json<ApiResponse<DetectionRecord>>, ApiError> {
    latest(&ctx, DetectionKind::SplitWorm, &query.split_id).map(Json)
}

/// `GET /api/Detect2/GetSplitWormDetectList?task_id=`
pub async fn split_list(
    State(ctx): State<ApiContext>,
    ApiQuery(query): ApiQuery<TaskQuery>,
) -> Result<Json<ApiResponse<Vec<DetectionRecord>>>, ApiError> {
    list(&ctx, DetectionKind::SplitWorm, &query.task_id).map(Json)
}

/// `POST /api/Detect2/AddDetect2`
pub async fn split_add(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<AddSplitDetectRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let new = opening(req.split_id, req.combine_time, req.remarks, req.if_qualified);
    add(&ctx, DetectionKind::SplitWorm, new).map(Json)
}

/// `PUT /api/Detect2/UpdateLatestDetect`
pub async fn split_update_latest(
    State(ctx): State<ApiContext>,
    ApiJson(req): ApiJson<UpdateSplitDetectRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    update_latest(&ctx, DetectionKind::SplitWorm, &req.split_id, &req.update).map(Json)
}
