//! Endpoint handlers. Thin: parse, validate, delegate to storage
//! and the evaluator, shape the envelope. No domain logic lives here.

use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::api::dto::{
    AnalyzeRequest, CompleteSessionResponse, CreateSessionRequest, CreateSessionResponse,
    DebugSignalResponse, HealthResponse, IngestSignalsRequest, IngestSignalsResponse,
    ListSessionsQuery, SessionSummaryResponse,
};
use crate::api::envelope::{ApiResponse, RateLimitMeta, ResponseMeta};
use crate::api::state::AppState;
use crate::error::ApiError;
use crate::model::{FraudAnalysis, Signal};
use crate::validation::{self, RawSignal};

const DEBUG_SIGNAL_LIMIT: usize = 100;
const DEFAULT_LIST_SESSIONS_LIMIT: usize = 100;
const MAX_LIST_SESSIONS_LIMIT: usize = 500;

pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::ok(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreateSessionResponse>>), ApiError> {
    validation::validate_create_session(&request.client_id, &request.device_fingerprint)?;

    let session = state
        .sessions
        .create(request.client_id, request.device_fingerprint, request.metadata)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreateSessionResponse {
            session_id: session.id,
            created_at: session.created_at,
        })),
    ))
}

pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionSummaryResponse>>, ApiError> {
    let session = state
        .sessions
        .get(session_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    Ok(Json(ApiResponse::ok(session.into())))
}

pub async fn list_client_sessions(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    Query(query): Query<ListSessionsQuery>,
) -> Result<Json<ApiResponse<Vec<SessionSummaryResponse>>>, ApiError> {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_SESSIONS_LIMIT)
        .min(MAX_LIST_SESSIONS_LIMIT)
        .max(1);
    let sessions = state.sessions.list_by_client(&client_id, limit).await?;
    let summaries = sessions.into_iter().map(SessionSummaryResponse::from).collect();
    Ok(Json(ApiResponse::ok(summaries)))
}

pub async fn ingest_signals(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<IngestSignalsRequest>,
) -> Result<Json<ApiResponse<IngestSignalsResponse>>, ApiError> {
    if !state.sessions.exists(session_id).await? {
        return Err(ApiError::SessionNotFound(session_id));
    }

    let decision = if state.config.rate_limit.enabled {
        Some(state.rate_limiter.check(session_id))
    } else {
        None
    };
    if let Some(decision) = &decision {
        if !decision.allowed {
            return Err(ApiError::RateLimited {
                retry_after: decision.retry_after,
            });
        }
    }

    let raw: Vec<RawSignal> = request
        .signals
        .into_iter()
        .map(|s| RawSignal {
            signal_type: s.signal_type,
            timestamp_ms: s.timestamp,
            payload: s.payload,
        })
        .collect();
    let normalized = validation::validate_signal_batch(&raw)?;

    let signals_received = normalized.len();
    let signals: Vec<Signal> = normalized
        .into_iter()
        .map(|(signal_type, timestamp, payload)| Signal::new(session_id, signal_type, timestamp, payload))
        .collect();

    state.signals.append(session_id, signals).await?;
    let total_signals = state.signals.count_by_session(session_id).await?;

    let meta = decision
        .map(|d| ResponseMeta {
            request_id: None,
            timestamp: Utc::now(),
            rate_limit: Some(RateLimitMeta {
                limit: d.limit,
                remaining: d.remaining,
                reset_at: None,
            }),
        })
        .unwrap_or_default();

    Ok(Json(ApiResponse::ok_with_meta(
        IngestSignalsResponse {
            session_id,
            signals_received,
            total_signals,
        },
        meta,
    )))
}

pub async fn complete_session(
    State(state): State<AppState>,
    Extension(cancellation): Extension<CancellationToken>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<CompleteSessionResponse>>, ApiError> {
    let session = state
        .sessions
        .complete(session_id)
        .await?
        .ok_or(ApiError::SessionNotFound(session_id))?;

    let signals = state.signals.get_by_session(session_id).await?;
    let analysis = state
        .evaluator
        .evaluate(session_id, &signals, &cancellation)
        .await?;
    state.analyses.save(analysis).await?;

    Ok(Json(ApiResponse::ok(CompleteSessionResponse {
        session_id,
        completed_at: session.completed_at.unwrap_or_else(Utc::now),
        signal_count: signals.len(),
        analysis_available: true,
    })))
}

pub async fn get_analysis(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<FraudAnalysis>>, ApiError> {
    if !state.sessions.exists(session_id).await? {
        return Err(ApiError::SessionNotFound(session_id));
    }
    let analysis = state
        .analyses
        .get_by_session(session_id)
        .await?
        .ok_or(ApiError::AnalysisNotReady(session_id))?;

    Ok(Json(ApiResponse::ok(analysis)))
}

/// One-shot evaluation over an inline signal batch; bypasses storage entirely.
pub async fn analyze(
    State(state): State<AppState>,
    Extension(cancellation): Extension<CancellationToken>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<ApiResponse<FraudAnalysis>>, ApiError> {
    let raw: Vec<RawSignal> = request
        .signals
        .into_iter()
        .map(|s| RawSignal {
            signal_type: s.signal_type,
            timestamp_ms: s.timestamp,
            payload: s.payload,
        })
        .collect();
    let normalized = validation::validate_signal_batch(&raw)?;

    let signals: Vec<Signal> = normalized
        .into_iter()
        .map(|(signal_type, timestamp, payload)| {
            Signal::new(request.session_id, signal_type, timestamp, payload)
        })
        .collect();

    let analysis = state
        .evaluator
        .evaluate(request.session_id, &signals, &cancellation)
        .await?;

    Ok(Json(ApiResponse::ok(analysis)))
}

/// Development-only: dumps up to 100 raw signals for a session.
pub async fn debug_session_signals(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<DebugSignalResponse>>>, ApiError> {
    if !state.sessions.exists(session_id).await? {
        return Err(ApiError::SessionNotFound(session_id));
    }
    let signals = state.signals.get_by_session(session_id).await?;
    let limited = signals
        .into_iter()
        .take(DEBUG_SIGNAL_LIMIT)
        .map(DebugSignalResponse::from)
        .collect();

    Ok(Json(ApiResponse::ok(limited)))
}
