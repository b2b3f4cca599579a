//! Ties a per-request `CancellationToken` to the process-wide shutdown
//! token. axum/tower don't expose request cancellation directly, so
//! handlers read this from request extensions and check it between
//! suspension points, the same pattern the rules/engine/evaluator use
//! internally.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tokio_util::sync::CancellationToken;

use crate::api::state::AppState;

pub async fn inject_cancellation(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let token = state.shutdown.child_token();
    request.extensions_mut().insert(token);
    next.run(request).await
}
