//! Notification handlers.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use validator::Validate;

use notifier_core::error::AppError;
use notifier_entity::NotificationRequest;
use notifier_service::AdmissionDecision;

use crate::dto::request::SendNotificationRequest;
use crate::dto::response::{NotificationResponse, SendNotificationResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /v1/notifications/send
pub async fn send_notification(
    State(state): State<AppState>,
    payload: Result<Json<SendNotificationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SendNotificationResponse>), ApiError> {
    let Json(body) = payload?;
    body.validate()
        .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))?;

    let request = NotificationRequest::from(body);
    let decision = state
        .admission
        .decide_with_cancel(&request, &state.shutdown)
        .await;

    if let AdmissionDecision::FailedDispatch {
        notification,
        error,
    } = decision
    {
        let details = serde_json::json!({
            "notification": NotificationResponse::from(notification),
        });
        return Err(ApiError::with_details(error, details));
    }

    let notification = decision.into_result()?;
    Ok((
        StatusCode::CREATED,
        Json(SendNotificationResponse::sent(notification)),
    ))
}
