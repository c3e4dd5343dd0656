//! 联系表单 API handler

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use relay_core::{ContactForm, ContactSubmission, DeliveryOutcome};
use serde_json::{json, Value};
use tracing::instrument;

use super::super::error::ApiError;
use super::super::state::AppState;

/// POST /contact - 校验后转发给 Mailgun
///
/// 服务商返回非 200 时仍然响应 200，只是 `success` 为 false；
/// 校验失败或请求发送失败响应 400。
#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    payload: Result<Json<ContactForm>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(form) = payload?;
    let submission = ContactSubmission::try_from(form)?;
    tracing::info!(
        name_len = submission.name().chars().count(),
        message_len = submission.message().chars().count(),
        "forwarding contact submission"
    );

    let outcome = state.mailer.send(&submission).await?;
    if let DeliveryOutcome::Rejected(status) = outcome {
        tracing::info!(status = %status, "contact submission not accepted");
    }

    Ok(Json(json!({ "success": outcome.is_accepted() })))
}
