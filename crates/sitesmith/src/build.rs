//! The render pipeline behind the CLI.

use sitesmith_render::{Renderer, Site, SiteConfig};

use crate::assets;
use crate::config::load_config;
use crate::context::SiteContext;
use crate::error::AppError;
use crate::output;
use crate::preflight;
use crate::Cli;

/// Templates that receive the site context.
pub const TEMPLATE_PATTERN: &str = r".*\.html$";

/// Validate, render and copy assets; then watch if asked to.
pub async fn run(cli: &Cli) -> Result<(), AppError> {
    let templates = preflight::check(&cli.srcpath)?;
    tracing::debug!(
        "Found {} template(s) in {}",
        templates.len(),
        cli.srcpath.display()
    );

    let file_config = load_config(&cli.config).map_err(AppError::Config)?;
    let context = SiteContext::from_env(&file_config.context);
    tracing::debug!("Site title: {}", context.get("title").unwrap_or_default());

    output::prepare_output_dir(&cli.outpath, &cli.srcpath).map_err(AppError::Output)?;

    let site = Site::new(SiteConfig {
        source_dir: cli.srcpath.clone(),
        output_dir: cli.outpath.clone(),
    })
    .with_context(TEMPLATE_PATTERN, context.into_factory())?;

    let report = site.render()?;
    tracing::info!(
        "Rendered {} file(s) in {}ms",
        report.count(),
        report.duration_ms
    );

    let copied =
        assets::copy_assets(&file_config.assets, &cli.outpath).map_err(AppError::Assets)?;
    if copied.files == 0 && copied.script.is_none() {
        tracing::debug!("No assets to copy");
    }

    tracing::info!("Output: {}", site.output_dir().display());

    if cli.watch {
        let summary = sitesmith_watch::watch(&site, shutdown_signal()).await?;
        tracing::info!(
            "Watch finished: {} re-render(s), {} failure(s)",
            summary.passes,
            summary.failures
        );
    }

    Ok(())
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
