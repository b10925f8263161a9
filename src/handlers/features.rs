//! Feature inspection handler

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use super::check::CheckRequest;
use crate::logic::url::ParseStatus;
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct FeaturesResponse {
    pub hostname: String,
    pub status: ParseStatus,
    pub truncated: bool,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub features: BTreeMap<&'static str, f32>,
    /// Leaf value of each tree under the serving model, in stored order
    pub tree_contributions: Vec<f32>,
}

/// Extracted features for a URL and per-tree leaf values, without the verdict
pub async fn extract(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> AppResult<Json<FeaturesResponse>> {
    let url = req.url.unwrap_or_default();
    let assessment = state.scoring.score(&url);

    if !assessment.has_input() {
        return Err(AppError::ValidationError("No URL provided".to_string()));
    }

    let tree_contributions = state.scoring.snapshot().model.model.contributions(&assessment.features);

    Ok(Json(FeaturesResponse {
        hostname: assessment.hostname,
        status: assessment.status,
        truncated: assessment.truncated,
        feature_version: assessment.features.version,
        layout_hash: assessment.features.layout_hash,
        features: assessment.features.named().into_iter().collect(),
        tree_contributions,
    }))
}
