use anyhow::{bail, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

use super::adapter::{AgentOverrides, VoiceAgent};
use super::events::AgentEvent;

/// Instructions for the out-of-process client that hosts the real agent
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelayDirective {
    /// Assistant the client should connect to
    pub identity: Option<String>,

    /// Public credential for the client SDK
    pub public_key: Option<String>,

    pub overrides: Option<AgentOverrides>,

    pub muted: bool,

    /// Set once the session wants the call torn down
    pub stop_requested: bool,
}

/// Voice agent hosted by the candidate's browser
///
/// The server side only publishes what the client should do; the client
/// forwards the agent's events back into the session's channel.
pub struct RelayAgent {
    directive: Arc<RwLock<RelayDirective>>,
}

impl RelayAgent {
    pub fn new(public_key: Option<String>) -> Self {
        let directive = RelayDirective {
            public_key,
            ..RelayDirective::default()
        };
        Self {
            directive: Arc::new(RwLock::new(directive)),
        }
    }

    /// Shared view of the directive for the client-facing API
    pub fn directive(&self) -> Arc<RwLock<RelayDirective>> {
        Arc::clone(&self.directive)
    }
}

#[async_trait::async_trait]
impl VoiceAgent for RelayAgent {
    async fn start(
        &mut self,
        identity: &str,
        overrides: AgentOverrides,
        _events: mpsc::Sender<AgentEvent>,
    ) -> Result<()> {
        let mut directive = self.directive.write().await;
        if directive.identity.is_some() {
            bail!("Relay agent already started");
        }

        info!("Relay agent waiting for client to connect to {}", identity);
        directive.identity = Some(identity.to_string());
        directive.overrides = Some(overrides);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        info!("Requesting client to end the call");
        self.directive.write().await.stop_requested = true;
        Ok(())
    }

    async fn set_muted(&mut self, muted: bool) -> Result<()> {
        self.directive.write().await.muted = muted;
        Ok(())
    }

    fn name(&self) -> &str {
        "relay"
    }
}
