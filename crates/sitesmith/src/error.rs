//! Top-level error type and its exit codes.

use sitesmith_render::RenderError;
use sitesmith_watch::WatchError;

use crate::preflight::PreflightError;

/// Every way a run can fail. Each variant maps to one process exit code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Preflight(#[from] PreflightError),

    #[error("Error: failed to load config: {0:#}")]
    Config(anyhow::Error),

    #[error("Error: failed to prepare output directory: {0:#}")]
    Output(anyhow::Error),

    #[error("Error: {0}")]
    Render(#[from] RenderError),

    #[error("Error: failed to copy assets: {0:#}")]
    Assets(anyhow::Error),

    #[error("Error: {0}")]
    Watch(#[from] WatchError),
}

impl AppError {
    /// Process exit status for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Preflight(e) => e.exit_code(),
            Self::Config(_) => 5,
            Self::Output(_) => 6,
            Self::Render(_) => 7,
            Self::Assets(_) => 8,
            Self::Watch(_) => 9,
        }
    }
}
