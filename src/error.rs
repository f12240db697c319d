//! Error types.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a regeneration run did not succeed.
///
/// These never reach an HTTP client; the server logs them and serves
/// whatever is on disk.
#[derive(Debug, Error)]
pub enum RegenerationError {
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited unsuccessfully ({status})")]
    Unsuccessful { program: String, status: ExitStatus },

    #[error("`{program}` did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },
}

/// Failure to produce an artifact document from disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Error envelope returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ArtifactError {
    fn into_response(self) -> Response {
        tracing::error!("Artifact error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
