//! API middleware.
//!
//! Execution order (outermost → innermost):
//! 1. CORS, for the browser front-end served from another origin
//! 2. Audit logger

pub mod audit;
