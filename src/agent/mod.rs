//! Voice agent adapters
//!
//! The voice agent is an external collaborator. This module defines the
//! `VoiceAgent` seam, the events it delivers, and two implementations:
//! a scripted mock interviewer and a relay for browser-hosted agents.

pub mod adapter;
pub mod events;
pub mod mock;
pub mod relay;

pub use adapter::{AgentOverrides, VoiceAgent};
pub use events::{AgentEvent, AgentMessage, TranscriptType};
pub use mock::{MockAgent, MockScript};
pub use relay::{RelayAgent, RelayDirective};
