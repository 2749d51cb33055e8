use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::{fmt, time::Duration};
use tracing::debug;

use crate::{
    error::{Result, WxError},
    model::Observation,
};

use super::WeatherProvider;

/// Dark Sky style `/forecast/<key>/<lat>,<lon>` endpoint.
#[derive(Clone)]
pub struct DarkSkyProvider {
    base_url: String,
    api_key: String,
    http: Client,
}

impl DarkSkyProvider {
    pub fn new(base_url: String, api_key: String, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            http: builder.build()?,
        })
    }

    fn forecast_url(&self, latitude: f64, longitude: f64) -> String {
        format!("{}/forecast/{}/{},{}", self.base_url, self.api_key, latitude, longitude)
    }
}

impl fmt::Debug for DarkSkyProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DarkSkyProvider").field("base_url", &self.base_url).finish_non_exhaustive()
    }
}

#[async_trait]
impl WeatherProvider for DarkSkyProvider {
    async fn current(&self, latitude: f64, longitude: f64) -> Result<Observation> {
        debug!(latitude, longitude, base_url = %self.base_url, "requesting forecast");

        let res = self.http.get(self.forecast_url(latitude, longitude)).send().await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(WxError::BadStatus {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = res.bytes().await?;
        let parsed: Value = serde_json::from_slice(&body)?;

        Observation::from_response(parsed)
    }
}
