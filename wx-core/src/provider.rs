use async_trait::async_trait;
use std::fmt::Debug;

use crate::{config::Settings, error::Result, model::Observation};

pub mod darksky;

pub use darksky::DarkSkyProvider;

/// Source of current conditions for a point.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions at `latitude`,`longitude` (decimal degrees, not range-checked).
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Observation>;
}

/// Construct the provider described by `settings`.
pub fn provider_from_settings(settings: &Settings) -> Result<Box<dyn WeatherProvider>> {
    let provider = DarkSkyProvider::new(
        settings.api_base.clone(),
        settings.api_key.clone(),
        settings.request_timeout,
    )?;

    Ok(Box::new(provider))
}
