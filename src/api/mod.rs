mod handlers;

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::models::Artifact;
use crate::regenerator::Regenerator;
use crate::store::ArtifactStore;

/// Shared handler state. Cloned per request; holds no per-request data.
#[derive(Clone)]
pub struct AppState {
    pub store: ArtifactStore,
    pub regenerator: Arc<dyn Regenerator>,
}

pub fn create_router(store: ArtifactStore, regenerator: Arc<dyn Regenerator>) -> Router {
    let mut router = Router::<AppState>::new()
        // Health
        .route("/", get(handlers::root))
        .route("/api/health", get(handlers::health));

    // Artifacts (regenerate, then read)
    for artifact in Artifact::ALL {
        router = router.route(
            &artifact.route(),
            get(move |State(state): State<AppState>| handlers::serve_artifact(state, artifact)),
        );
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(AppState { store, regenerator })
}
