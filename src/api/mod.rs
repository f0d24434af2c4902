//! HTTP API for the inspection PDA.
//!
//! `api_router()` returns a composable `Router`; `start_api_server()` binds
//! it and runs it in the background until shut down.

pub mod endpoints;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_api_server, ApiServer, ServerSession};
pub use types::{ApiContext, ApiResponse};
