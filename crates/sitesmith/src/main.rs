//! sitesmith CLI - render a directory of Jinja templates into a static site.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod assets;
mod build;
mod config;
mod context;
mod error;
mod output;
mod preflight;

#[derive(Parser, Debug)]
#[command(name = "sitesmith")]
#[command(about = "Render a directory of Jinja templates into a static site")]
#[command(version)]
pub struct Cli {
    /// Keep running and re-render templates when they change
    #[arg(short, long)]
    pub watch: bool,

    /// Directory containing the templates
    #[arg(long, default_value = "MyTemplates")]
    pub srcpath: PathBuf,

    /// Directory the site is rendered into; removed and recreated on every run
    #[arg(long, default_value = "MyAssembly")]
    pub outpath: PathBuf,

    /// Path to sitesmith.toml config file
    #[arg(short, long, default_value = "sitesmith.toml")]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match build::run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
