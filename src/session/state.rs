use serde::{Deserialize, Serialize};
use std::fmt;

use crate::agent::AgentEvent;

/// Lifecycle of an interview session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Initializing,
    AgentSpeaking,
    UserListening,
    Processing,
    Completed,
    Errored,
}

/// What the controller should do with an incoming agent event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move to a new non-terminal state
    Enter(SessionState),
    /// Hand a transcript fragment to the aggregator; state unchanged
    Record,
    /// Adapter failure: terminal
    Fail,
    /// Call ended: run the completion gate
    Finish,
    /// Event is not legal in the current state
    Ignore,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Completed | SessionState::Errored)
    }

    /// Connected and exchanging turns
    pub fn is_live(self) -> bool {
        matches!(
            self,
            SessionState::AgentSpeaking | SessionState::UserListening | SessionState::Processing
        )
    }

    /// Validate an agent event against the current state
    pub fn transition(self, event: &AgentEvent) -> Transition {
        if self.is_terminal() {
            return Transition::Ignore;
        }

        match event {
            AgentEvent::CallStart if self == SessionState::Initializing => {
                Transition::Enter(SessionState::AgentSpeaking)
            }
            AgentEvent::CallStart => Transition::Ignore,
            AgentEvent::SpeechStart if self.is_live() => {
                Transition::Enter(SessionState::UserListening)
            }
            AgentEvent::SpeechEnd if self.is_live() => Transition::Enter(SessionState::Processing),
            AgentEvent::SpeechStart | AgentEvent::SpeechEnd => Transition::Ignore,
            AgentEvent::Message(_) => Transition::Record,
            AgentEvent::Error(_) => Transition::Fail,
            AgentEvent::CallEnd => Transition::Finish,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Initializing => "initializing",
            SessionState::AgentSpeaking => "agent_speaking",
            SessionState::UserListening => "user_listening",
            SessionState::Processing => "processing",
            SessionState::Completed => "completed",
            SessionState::Errored => "errored",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_start_only_from_initializing() {
        assert_eq!(
            SessionState::Initializing.transition(&AgentEvent::CallStart),
            Transition::Enter(SessionState::AgentSpeaking)
        );
        assert_eq!(
            SessionState::Processing.transition(&AgentEvent::CallStart),
            Transition::Ignore
        );
    }

    #[test]
    fn test_speech_events_need_live_call() {
        assert_eq!(
            SessionState::Initializing.transition(&AgentEvent::SpeechStart),
            Transition::Ignore
        );
        assert_eq!(
            SessionState::AgentSpeaking.transition(&AgentEvent::SpeechStart),
            Transition::Enter(SessionState::UserListening)
        );
        assert_eq!(
            SessionState::UserListening.transition(&AgentEvent::SpeechEnd),
            Transition::Enter(SessionState::Processing)
        );
    }

    #[test]
    fn test_terminal_states_ignore_everything() {
        for state in [SessionState::Completed, SessionState::Errored] {
            assert_eq!(state.transition(&AgentEvent::CallEnd), Transition::Ignore);
            assert_eq!(
                state.transition(&AgentEvent::Error("late".into())),
                Transition::Ignore
            );
        }
    }

    #[test]
    fn test_error_and_call_end_from_any_open_state() {
        for state in [SessionState::Initializing, SessionState::UserListening] {
            assert_eq!(state.transition(&AgentEvent::Error("x".into())), Transition::Fail);
            assert_eq!(state.transition(&AgentEvent::CallEnd), Transition::Finish);
        }
    }
}
