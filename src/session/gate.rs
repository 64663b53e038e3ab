use std::time::Duration;
use tracing::{info, warn};

use super::transcript::Transcript;
use crate::error::SessionError;

/// Qualification policy applied when a call ends
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionPolicy {
    /// Fewest transcript messages for a call to count as an interview (default: 2)
    pub min_messages: usize,

    /// A call at least this long qualifies regardless of message count
    /// (default: unset, message count alone decides)
    pub min_duration: Option<Duration>,
}

impl Default for CompletionPolicy {
    fn default() -> Self {
        Self {
            min_messages: 2,
            min_duration: None,
        }
    }
}

/// Outcome of the completion gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateVerdict {
    Completed,
    Errored(SessionError),
}

/// Decides whether a finished call is a real interview or a dropped connection
#[derive(Debug, Clone, Default)]
pub struct CompletionGate {
    policy: CompletionPolicy,
}

impl CompletionGate {
    pub fn new(policy: CompletionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CompletionPolicy {
        &self.policy
    }

    pub fn evaluate(
        &self,
        transcript: &Transcript,
        elapsed: Option<Duration>,
        mock: bool,
    ) -> GateVerdict {
        let messages = transcript.len();

        if mock || messages >= self.policy.min_messages {
            info!("Call qualified as completed ({} messages, mock={})", messages, mock);
            return GateVerdict::Completed;
        }

        if let (Some(min), Some(elapsed)) = (self.policy.min_duration, elapsed) {
            if elapsed >= min {
                info!(
                    "Call qualified by duration ({:.1}s, {} messages)",
                    elapsed.as_secs_f64(),
                    messages
                );
                return GateVerdict::Completed;
            }
        }

        warn!(
            "Call ended before sufficient exchange: {} messages (need {})",
            messages, self.policy.min_messages
        );
        GateVerdict::Errored(SessionError::PrematureTermination { messages })
    }
}
