use super::state::AppState;
use crate::agent::AgentEvent;
use crate::coach::ReportStatus;
use crate::error::SessionError;
use crate::session::{SessionConfig, SessionState, SessionStatus, Transcript};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StartInterviewResponse {
    pub interview_id: String,
    pub state: SessionState,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct InterviewStatusResponse {
    #[serde(flatten)]
    pub session: SessionStatus,
    pub report: ReportStatus,
}

#[derive(Debug, Serialize)]
pub struct TranscriptResponse {
    pub interview_id: String,
    pub messages: Transcript,
}

#[derive(Debug, Deserialize)]
pub struct MuteRequest {
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct MuteResponse {
    pub interview_id: String,
    pub muted: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn not_found(interview_id: &str) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("Interview {} not found", interview_id),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /interviews/start
/// Start a new interview session
pub async fn start_interview(
    State(state): State<AppState>,
    Json(config): Json<SessionConfig>,
) -> Response {
    if config.role.trim().is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "Target role is required");
    }

    // Fail fast before any agent is created
    let missing = state.coach.settings().missing_credentials();
    if !missing.is_empty() {
        let err = SessionError::Configuration(format!(
            "Missing required settings: {}",
            missing.join(", ")
        ));
        error!("Refusing to start interview: {}", err);
        return error_response(StatusCode::SERVICE_UNAVAILABLE, err.to_string());
    }

    info!("Starting interview for role: {}", config.role);

    let interview = state.coach.begin(config);
    let interview_id = interview.id().to_string();
    let session_state = interview.session().state();

    state.evict_settled().await;
    {
        let mut interviews = state.interviews.write().await;
        interviews.insert(interview_id.clone(), interview);
    }

    info!("Interview started: {}", interview_id);

    (
        StatusCode::OK,
        Json(StartInterviewResponse {
            interview_id: interview_id.clone(),
            state: session_state,
            message: format!("Interview {} started", interview_id),
        }),
    )
        .into_response()
}

/// POST /interviews/stop/:interview_id
/// Stop an interview; stopping a finished interview is a no-op
pub async fn stop_interview(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    let final_state = interview.session().stop().await;
    info!("Interview {} stopped in state {}", interview_id, final_state);

    (
        StatusCode::OK,
        Json(InterviewStatusResponse {
            session: interview.session().status(),
            report: interview.report(),
        }),
    )
        .into_response()
}

/// POST /interviews/:interview_id/mute
pub async fn set_muted(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Json(req): Json<MuteRequest>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    match interview.session().set_muted(req.muted).await {
        Some(muted) => (
            StatusCode::OK,
            Json(MuteResponse {
                interview_id,
                muted,
            }),
        )
            .into_response(),
        None => error_response(
            StatusCode::CONFLICT,
            format!("Interview {} has already ended", interview_id),
        ),
    }
}

/// POST /interviews/:interview_id/events
/// Forward an event from a browser-hosted voice agent
pub async fn forward_agent_event(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
    Json(event): Json<AgentEvent>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    match interview.session().forward(event).await {
        Ok(()) => StatusCode::ACCEPTED.into_response(),
        Err(e) => {
            warn!("Dropping agent event for {}: {}", interview_id, e);
            error_response(StatusCode::CONFLICT, e.to_string())
        }
    }
}

/// GET /interviews/:interview_id/agent
/// What the browser client should do with its voice agent
pub async fn get_agent_directive(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    match interview.relay_directive().await {
        Some(directive) => (StatusCode::OK, Json(directive)).into_response(),
        None => error_response(
            StatusCode::NOT_FOUND,
            format!("Interview {} does not use a relayed agent", interview_id),
        ),
    }
}

/// GET /interviews/:interview_id/status
pub async fn get_interview_status(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    (
        StatusCode::OK,
        Json(InterviewStatusResponse {
            session: interview.session().status(),
            report: interview.report(),
        }),
    )
        .into_response()
}

/// GET /interviews/:interview_id/transcript
/// Get transcript for an interview (accumulated so far)
pub async fn get_interview_transcript(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    (
        StatusCode::OK,
        Json(TranscriptResponse {
            messages: interview.session().transcript(),
            interview_id,
        }),
    )
        .into_response()
}

/// GET /interviews/:interview_id/report
pub async fn get_interview_report(
    State(state): State<AppState>,
    Path(interview_id): Path<String>,
) -> Response {
    let Some(interview) = state.interview(&interview_id).await else {
        return not_found(&interview_id);
    };

    (StatusCode::OK, Json(interview.report())).into_response()
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
