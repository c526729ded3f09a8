// HTTP request handlers
use crate::application::logs_volume_service::PanelListView;
use crate::domain::routing_policy::{validate_field, FieldSchema, RoutingPolicy, RoutingPolicyForm};
use crate::domain::telemetry::{LogsVolumeResponse, TimeRange};
use crate::presentation::app_state::AppState;
use crate::presentation::error::ApiError;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct PanelListRequest {
    #[serde(default)]
    pub response: LogsVolumeResponse,
    pub display_range: TimeRange,
}

#[derive(Deserialize)]
pub struct ReloadRequest {
    pub display_range: TimeRange,
}

#[derive(Deserialize)]
pub struct AddLabelRequest {
    pub form: RoutingPolicyForm,
    pub label: String,
}

#[derive(Deserialize)]
pub struct ValidateFieldRequest {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldValidation {
    pub field: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current default policy as an editable form
pub async fn get_policy_form(
    State(state): State<Arc<AppState>>,
) -> Result<Json<RoutingPolicyForm>, ApiError> {
    let form = state.policy_service.open_form().await?;
    Ok(Json(form))
}

/// Field definitions for form renderers
pub async fn get_policy_schema() -> Json<Vec<FieldSchema>> {
    Json(RoutingPolicyForm::schema())
}

/// Check one field value against its schema validator
pub async fn validate_policy_field(
    Json(request): Json<ValidateFieldRequest>,
) -> Result<Json<FieldValidation>, ApiError> {
    let result = validate_field(&request.field, &request.value)
        .ok_or_else(|| ApiError::Unprocessable(format!("Unknown field {}", request.field)))?;
    Ok(Json(FieldValidation {
        field: request.field,
        valid: result.is_ok(),
        message: result.err(),
    }))
}

/// Validate and store a submitted form
pub async fn submit_policy(
    State(state): State<Arc<AppState>>,
    Json(form): Json<RoutingPolicyForm>,
) -> Result<Json<RoutingPolicy>, ApiError> {
    let policy = state.policy_service.submit(&form).await?;
    Ok(Json(policy))
}

/// Select an ad hoc group-by label, keeping it in the form's catalog
pub async fn add_group_by_label(Json(request): Json<AddLabelRequest>) -> Json<RoutingPolicyForm> {
    let mut form = request.form;
    if form.add_custom_label(&request.label) {
        tracing::debug!(
            "Selected ad hoc label {}, catalog offers {} labels",
            request.label.trim(),
            form.catalog.labels().len()
        );
    }
    Json(form)
}

/// Build the panel list for an already loaded log-volume response
pub async fn logs_volume_panels(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PanelListRequest>,
) -> Result<Json<PanelListView>, ApiError> {
    let view = state
        .logs_volume_service
        .panel_list(request.response, request.display_range)?;
    Ok(Json(view))
}

/// Re-fetch log volume for the display range and build the panel list
pub async fn reload_logs_volume(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ReloadRequest>,
) -> Result<Json<PanelListView>, ApiError> {
    let view = state
        .logs_volume_service
        .reload(request.display_range)
        .await?;
    Ok(Json(view))
}
