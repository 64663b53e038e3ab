//! HTTP API server for driving interviews
//!
//! This module provides a REST API for controlling interview sessions:
//! - POST /interviews/start - Start a new interview
//! - POST /interviews/stop/:id - Stop an interview (idempotent)
//! - POST /interviews/:id/mute - Mute or unmute the candidate
//! - POST /interviews/:id/events - Forward a relayed voice agent event
//! - GET /interviews/:id/agent - Relay directive for the browser client
//! - GET /interviews/:id/status - Query session status
//! - GET /interviews/:id/transcript - Get accumulated transcript
//! - GET /interviews/:id/report - Get the report status / analysis
//! - GET /health - Health check
//!
//! Settled interviews are evicted when new ones start, once they are older
//! than the configured retention.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::{AppState, DEFAULT_RETENTION};
