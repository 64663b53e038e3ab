use crate::coach::{Interview, InterviewCoach};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::info;

/// How long a settled interview stays queryable unless configured otherwise
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(3600);

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Interviews started through the API (interview_id → interview)
    pub interviews: Arc<RwLock<HashMap<String, Arc<Interview>>>>,

    pub coach: Arc<InterviewCoach>,

    /// Settled interviews older than this are evicted
    pub retention: Duration,
}

impl AppState {
    pub fn new(coach: InterviewCoach) -> Self {
        Self {
            interviews: Arc::new(RwLock::new(HashMap::new())),
            coach: Arc::new(coach),
            retention: DEFAULT_RETENTION,
        }
    }

    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    pub async fn interview(&self, interview_id: &str) -> Option<Arc<Interview>> {
        self.interviews.read().await.get(interview_id).cloned()
    }

    /// Drop interviews whose report settled longer ago than `retention`
    ///
    /// Running interviews and pending reports are always kept.
    pub async fn evict_settled(&self) -> usize {
        let mut interviews = self.interviews.write().await;
        let before = interviews.len();
        interviews.retain(|_, interview| {
            interview
                .settled_for()
                .map_or(true, |age| age < self.retention)
        });

        let evicted = before - interviews.len();
        if evicted > 0 {
            info!("Evicted {} settled interview(s)", evicted);
        }
        evicted
    }
}
