pub mod agent;
pub mod coach;
pub mod config;
pub mod error;
pub mod http;
pub mod scoring;
pub mod session;

pub use agent::{
    AgentEvent, AgentMessage, AgentOverrides, MockAgent, MockScript, RelayAgent, VoiceAgent,
};
pub use coach::{AgentMode, Interview, InterviewCoach, ReportStatus};
pub use config::Config;
pub use error::{ScoringError, SessionError};
pub use http::{create_router, AppState};
pub use scoring::{AnalysisResult, ScoringRequester, ScoringService, TechScore};
pub use session::{
    CompletionGate, CompletionPolicy, ExperienceLevel, Message, Role, SessionConfig,
    SessionController, SessionHandle, SessionSettings, SessionState, SessionStatus, Transcript,
    TranscriptAggregator,
};
