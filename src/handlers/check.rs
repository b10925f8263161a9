//! URL check handler
//!
//! Response field names follow the browser extension contract.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::logic::policy::{Label, VerdictSource};
use crate::logic::url::ParseStatus;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResponse {
    pub request_id: Uuid,
    pub url: String,
    pub hostname: String,
    pub status: ParseStatus,
    pub is_safe: bool,
    pub is_phishing: bool,
    pub label: Label,
    pub probability: f32,
    pub confidence: f32,
    pub risk_score: f32,
    pub source: VerdictSource,
}

/// Score one URL
pub async fn check(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> AppResult<Json<CheckResponse>> {
    let url = req.url.unwrap_or_default();
    let assessment = state.scoring.score(&url);

    if !assessment.has_input() {
        return Err(AppError::ValidationError("No URL provided".to_string()));
    }

    let verdict = assessment.verdict;
    let response = CheckResponse {
        request_id: Uuid::new_v4(),
        url,
        hostname: assessment.hostname,
        status: assessment.status,
        is_safe: verdict.is_safe(),
        is_phishing: verdict.label.is_phishing(),
        label: verdict.label,
        probability: verdict.probability,
        confidence: verdict.confidence,
        risk_score: verdict.risk_score,
        source: verdict.source,
    };

    tracing::info!(
        request_id = %response.request_id,
        host = %response.hostname,
        label = response.label.as_str(),
        confidence = response.confidence,
        "URL checked"
    );

    Ok(Json(response))
}
