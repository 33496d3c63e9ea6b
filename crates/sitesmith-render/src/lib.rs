//! Template rendering for sitesmith.
//!
//! Renders a directory of Jinja templates into an output directory, selecting
//! each template's variables through context rules.

pub mod context;
pub mod renderer;
pub mod site;

pub use context::{ContextFactory, ContextRule, RenderContext};
pub use renderer::{RenderError, RenderReport, Renderer};
pub use site::{is_ignored, is_partial, Site, SiteConfig};
