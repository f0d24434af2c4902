//! Inspection API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`.
//! Paths keep the controller/action casing the PDA front-end already calls.

use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints::{detection, finger, health, motor, palm, split};
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the inspection API router.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(health::check))
        // Detect1: motor worm inspection
        .route("/Detect1/GetMotorWormDetect", get(detection::motor_latest))
        .route("/Detect1/GetMotorWormDetectList", get(detection::motor_list))
        .route("/Detect1/AddDetect1", post(detection::motor_add))
        .route("/Detect1/UpdateLatestDetect", put(detection::motor_update_latest))
        // Detect2: split mechanism worm inspection
        .route("/Detect2/GetSplitWormDetect", get(detection::split_latest))
        .route("/Detect2/GetSplitWormDetectList", get(detection::split_list))
        .route("/Detect2/AddDetect2", post(detection::split_add))
        .route("/Detect2/UpdateLatestDetect", put(detection::split_update_latest))
        .route("/Motor/GetMotor", get(motor::get))
        .route("/Motor/GetFinishedList", get(motor::list))
        .route("/Motor/AddMotor", post(motor::add))
        .route("/Motor/MotorBindFinger", post(motor::bind_finger))
        .route("/Motor/UpdateQualify", put(motor::update_qualify))
        .route("/Finger/GetFingerList", get(finger::list))
        .route("/Finger/AddFinger", post(finger::add))
        .route("/Finger/FingerBindPalm", post(finger::bind_palm))
        .route("/Finger/UpdateQualify", put(finger::update_qualify))
        .route("/Palm/GetPalmList", get(palm::list))
        .route("/Palm/AddPalm", post(palm::add))
        .route("/Palm/UpdateQualify", put(palm::update_qualify))
        .route("/Split/GetSplitList", get(split::list))
        .route("/Split/AddSplit", post(split::add))
        .route("/Split/SplitBindPalm", post(split::bind_palm))
        .route("/Split/UpdateQualify", put(split::update_qualify))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    // The PDA web front-end is served from a different origin.
    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}
