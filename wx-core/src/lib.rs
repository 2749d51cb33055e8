//! Core library for the `wx` current-conditions logger.
//!
//! This crate defines:
//! - Configuration (secret key from the environment, optional TOML file)
//! - The weather provider abstraction and its Dark Sky implementation
//! - The daily CSV appender
//! - [`run`], which ties one fetch and one append together
//!
//! It is used by `wx-cli`, but can also be driven directly, e.g. with a fake
//! [`WeatherProvider`] in tests.

pub mod appender;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod zone;

pub use config::{CSV_HEADERS, FileConfig, Overrides, Settings};
pub use error::{Result, WxError};
pub use model::Observation;
pub use pipeline::run;
pub use provider::{DarkSkyProvider, WeatherProvider, provider_from_settings};
pub use zone::Zone;
