use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use wx_core::{Overrides, Settings, provider_from_settings};

use crate::logging;

/// Top-level CLI struct. With no flags it logs the reference location.
#[derive(Debug, Parser)]
#[command(
    name = "wx",
    version,
    about = "Append current weather conditions to a daily CSV file"
)]
pub struct Cli {
    /// Path to a TOML config file; defaults to the platform config directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Latitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees.
    #[arg(long, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Directory receiving the daily CSV and log files.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            latitude: self.latitude,
            longitude: self.longitude,
            output_dir: self.output_dir.clone(),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.run_with_key(Settings::api_key_from_env()).await
    }

    async fn run_with_key(self, api_key: Option<String>) -> anyhow::Result<()> {
        // Settings come first: a missing key aborts before any log file exists.
        let settings = Settings::load(api_key, self.config.as_deref(), self.overrides())
            .context("Failed to load configuration")?;

        let log_path = settings.log_path(settings.zone.today());
        let subscriber = logging::subscriber(&log_path, settings.zone, logging::default_filter())?;
        // The runtime is single-threaded, so a thread-local default covers the whole run.
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = provider_from_settings(&settings).context("Failed to build HTTP client")?;
        wx_core::run(&settings, &*provider).await?;

        Ok(())
    }
}
