use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use super::domain::PayrollReportPayload;
use super::report::{reconcile_and_summarize, PayrollSummary};
use crate::config::PayrollConfig;

/// Router builder exposing the payroll report summary endpoint.
pub fn payroll_router(config: Arc<PayrollConfig>) -> Router {
    Router::new()
        .route("/api/v1/payroll/summary", post(summary_handler))
        .with_state(config)
}

pub(crate) async fn summary_handler(
    State(config): State<Arc<PayrollConfig>>,
    Json(payload): Json<PayrollReportPayload>,
) -> (StatusCode, Json<PayrollSummary>) {
    let summary = reconcile_and_summarize(&payload, &config);
    (StatusCode::OK, Json(summary))
}
