use std::path::PathBuf;
use tracing::{error, info};

use crate::{
    appender,
    config::Settings,
    error::{Result, WxError},
    provider::WeatherProvider,
};

/// One complete logging run: fetch current conditions, then append them to
/// today's CSV file. Returns the file that was written.
///
/// A failing stage is logged here, once, and its error returned unchanged.
pub async fn run(settings: &Settings, provider: &dyn WeatherProvider) -> Result<PathBuf> {
    info!("Requesting weather data for {},{}", settings.latitude, settings.longitude);
    let observation = provider
        .current(settings.latitude, settings.longitude)
        .await
        .inspect_err(|e| log_failure("HTTP", e))?;

    info!("Writing data to CSV");
    let path = appender::append(settings, observation).inspect_err(|e| log_failure("CSV", e))?;

    info!("Done. Wrote {}", path.display());
    Ok(path)
}

fn log_failure(stage: &str, err: &WxError) {
    error!("Fatal error occurred during {stage} stage: {}", err.kind());
    match err {
        WxError::BadStatus { code, reason } => error!("Code: {code}, Mesg: {reason}"),
        other => error!("{other}"),
    }
}
