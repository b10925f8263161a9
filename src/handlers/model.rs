//! Model admin handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::logic::features::LayoutInfo;
use crate::logic::scoring::Snapshot;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub source: String,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
    pub tree_count: usize,
    pub bias: f32,
    pub link: &'static str,
    pub max_depth: usize,
    pub split_features: Vec<&'static str>,
    pub feature_version: u8,
    pub feature_count: usize,
    pub layout_hash: u32,
    pub phishing_threshold: f32,
    pub overrides_enabled: bool,
    pub override_count: usize,
}

impl ModelInfo {
    fn new(snapshot: &Snapshot, phishing_threshold: f32) -> Self {
        let layout = LayoutInfo::current();
        let meta = &snapshot.model.metadata;
        let model = &snapshot.model.model;
        Self {
            name: meta.name.clone(),
            source: meta.source.clone(),
            sha256: meta.sha256.clone(),
            loaded_at: meta.loaded_at,
            tree_count: model.trees().len(),
            bias: model.bias(),
            link: model.link().as_str(),
            max_depth: model.max_depth(),
            split_features: model.split_feature_names(),
            feature_version: layout.version,
            feature_count: model.feature_count(),
            layout_hash: layout.hash,
            phishing_threshold,
            overrides_enabled: snapshot.overrides.enabled,
            override_count: snapshot.overrides.len(),
        }
    }
}

/// Currently serving model
pub async fn info(State(state): State<AppState>) -> Json<ModelInfo> {
    let threshold = state.scoring.config().policy.phishing_threshold;
    Json(ModelInfo::new(&state.scoring.snapshot(), threshold))
}

/// Re-read artifacts from disk and hot-swap them.
/// On failure the previous snapshot keeps serving.
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ModelInfo>> {
    let scoring = state.scoring.clone();
    let snapshot = tokio::task::spawn_blocking(move || scoring.reload())
        .await
        .map_err(|e| crate::AppError::InternalError(e.to_string()))??;

    let threshold = state.scoring.config().policy.phishing_threshold;
    Ok(Json(ModelInfo::new(&snapshot, threshold)))
}
