//! Trait definitions for template renderers.

use std::path::{Path, PathBuf};

/// Result of a render pass.
#[derive(Debug, Clone, Default)]
pub struct RenderReport {
    /// Output files written during the pass
    pub rendered: Vec<PathBuf>,

    /// Total render time in milliseconds
    pub duration_ms: u64,
}

impl RenderReport {
    /// Number of files written.
    pub fn count(&self) -> usize {
        self.rendered.len()
    }
}

/// Errors that can occur during rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to read source directory: {0}")]
    ReadError(String),

    #[error("Invalid context pattern '{pattern}': {message}")]
    PatternError { pattern: String, message: String },

    #[error("Failed to render template {name}: {message}")]
    TemplateError { name: String, message: String },

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// A template engine that turns a source directory into an output directory.
///
/// The CLI and the watch loop only talk to this trait, so the concrete engine
/// can be swapped without touching either.
pub trait Renderer {
    /// Directory templates are read from.
    fn source_dir(&self) -> &Path;

    /// Directory rendered files are written to.
    fn output_dir(&self) -> &Path;

    /// Render every template once.
    fn render(&self) -> Result<RenderReport, RenderError>;

    /// Re-render after the given source paths changed.
    ///
    /// # Arguments
    /// * `changed` - Paths reported by the file watcher, absolute or relative
    ///   to the working directory
    fn rerender(&self, changed: &[PathBuf]) -> Result<RenderReport, RenderError>;
}
