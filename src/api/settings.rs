//! Settings pages: survey-level and global (plugin-level) settings.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::hooks::{SettingsDisplayEvent, SettingsSubmitEvent};
use crate::schema::{SettingsSection, SettingsSubmission, SubmitReport};
use crate::server::AppState;
use crate::store::Scope;

#[derive(Debug, Serialize)]
pub struct SettingsPageResponse {
    pub scope: String,
    pub sections: Vec<SettingsSection>,
}

#[derive(Debug, Serialize)]
pub struct SettingsSavedResponse {
    pub scope: String,
    pub reports: Vec<SubmitReport>,
}

async fn display(state: &AppState, scope: Scope) -> Result<Json<SettingsPageResponse>> {
    let mut event = SettingsDisplayEvent::new(scope);
    state.hooks.fire(&mut event).await?;

    Ok(Json(SettingsPageResponse {
        scope: event.scope.to_string(),
        sections: event.sections,
    }))
}

async fn submit(
    state: &AppState,
    scope: Scope,
    submission: SettingsSubmission,
) -> Result<Json<SettingsSavedResponse>> {
    let mut event = SettingsSubmitEvent::new(scope, submission.settings);
    state.hooks.fire(&mut event).await?;

    Ok(Json(SettingsSavedResponse {
        scope: event.scope.to_string(),
        reports: event.reports,
    }))
}

/// GET /api/v1/surveys/{survey_id}/settings
pub async fn get_survey_settings(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
) -> Result<Json<SettingsPageResponse>> {
    display(&state, Scope::survey(survey_id)).await
}

/// PUT /api/v1/surveys/{survey_id}/settings
pub async fn put_survey_settings(
    State(state): State<AppState>,
    Path(survey_id): Path<String>,
    Json(submission): Json<SettingsSubmission>,
) -> Result<Json<SettingsSavedResponse>> {
    submit(&state, Scope::survey(survey_id), submission).await
}

/// GET /api/v1/settings/global
pub async fn get_global_settings(
    State(state): State<AppState>,
) -> Result<Json<SettingsPageResponse>> {
    display(&state, Scope::Global).await
}

/// PUT /api/v1/settings/global
pub async fn put_global_settings(
    State(state): State<AppState>,
    Json(submission): Json<SettingsSubmission>,
) -> Result<Json<SettingsSavedResponse>> {
    submit(&state, Scope::Global, submission).await
}
