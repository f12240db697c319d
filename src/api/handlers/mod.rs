use axum::{response::IntoResponse, Json};
use serde_json::Value;

use super::AppState;
use crate::error::ArtifactError;
use crate::models::Artifact;
use crate::regenerator::regenerate_logged;

// ============================================================
// Artifacts
// ============================================================

/// Regenerate, then serve the artifact from disk.
///
/// The regeneration runs on its own task so a client that hangs up does not
/// cut it short. Its outcome is logged and otherwise ignored: a failed run
/// falls back to whatever the last successful run left behind.
pub async fn serve_artifact(state: AppState, artifact: Artifact) -> Result<Json<Value>, ArtifactError> {
    tracing::debug!("Regenerating before serving {}", artifact);
    let regenerator = state.regenerator.clone();
    let run = tokio::spawn(async move {
        let _ = regenerate_logged(regenerator.as_ref()).await;
    });
    if let Err(e) = run.await {
        tracing::error!("Regeneration task failed: {}", e);
    }

    state.store.read(artifact).await.map(Json)
}

// ============================================================
// Health
// ============================================================

pub async fn root() -> &'static str {
    "Backend is running!"
}

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
