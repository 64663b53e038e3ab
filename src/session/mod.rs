//! Interview session management
//!
//! This module provides the `SessionController` that manages:
//! - Voice agent lifecycle (start, mute, exactly-once teardown)
//! - The session state machine driven by agent events
//! - Transcript collection from final transcript fragments
//! - The completion gate deciding completed vs errored calls

mod config;
mod controller;
mod gate;
mod state;
mod stats;
mod transcript;

pub use config::{ExperienceLevel, SessionConfig, SessionSettings};
pub use controller::{SessionController, SessionHandle};
pub use gate::{CompletionGate, CompletionPolicy, GateVerdict};
pub use state::{SessionState, Transition};
pub use stats::{SessionOutcome, SessionStatus};
pub use transcript::{Message, Role, Transcript, TranscriptAggregator};
