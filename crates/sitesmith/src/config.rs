//! Optional `sitesmith.toml` configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use sitesmith_render::RenderContext;

/// Configuration file structure (sitesmith.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Extra template variables
    #[serde(default)]
    pub context: RenderContext,
    #[serde(default)]
    pub assets: AssetsConfig,
}

/// Files copied verbatim next to the rendered site.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory copied to `<outpath>/assets`
    #[serde(default = "default_assets_dir")]
    pub dir: PathBuf,
    /// Script copied to the output root
    #[serde(default = "default_script")]
    pub script: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            dir: default_assets_dir(),
            script: default_script(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_script() -> PathBuf {
    PathBuf::from("app.js")
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
