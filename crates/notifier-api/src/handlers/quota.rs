//! Quota table handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{QuotaListResponse, QuotaResponse};
use crate::state::AppState;

/// GET /v1/quotas
pub async fn list_quotas(State(state): State<AppState>) -> Json<QuotaListResponse> {
    let quotas = state
        .admission
        .quotas()
        .entries()
        .into_iter()
        .map(|(category, rule)| QuotaResponse::new(category, rule))
        .collect();

    Json(QuotaListResponse {
        consistency: state.admission.consistency().to_string(),
        quotas,
    })
}
