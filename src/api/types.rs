//! Shared types for the inspection API: request context and the response
//! envelope every endpoint returns.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core_state::CoreState;

/// `result_code` for a successful call.
pub const RESULT_SUCCESS: i32 = 1;
/// `result_code` for a lookup that matched nothing.
pub const RESULT_NOT_FOUND: i32 = 0;
/// `result_code` for a rejected or failed call.
pub const RESULT_FAILURE: i32 = -1;

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

/// Envelope around every API payload.
///
/// The front-end branches on `result_code` rather than the HTTP status, so
/// "not found" lookups are still delivered as `200 OK` with code 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = serde_json::Value> {
    pub result_code: i32,
    pub msg: String,
    #[serde(default = "Option::default")]
    pub result_data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with("Success", data)
    }

    pub fn success_with(msg: impl Into<String>, data: T) -> Self {
        Self {
            result_code: RESULT_SUCCESS,
            msg: msg.into(),
            result_data: Some(data),
        }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            result_code: RESULT_NOT_FOUND,
            msg: msg.into(),
            result_data: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            result_code: RESULT_FAILURE,
            msg: msg.into(),
            result_data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.result_code == RESULT_SUCCESS
    }
}
