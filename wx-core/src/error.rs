use std::io;
use thiserror::Error;

/// Every way a single logging run can fail.
#[derive(Error, Debug)]
pub enum WxError {
    /// The secret key environment variable is unset or empty.
    #[error("Environment variable not set: {0}")]
    MissingApiKey(&'static str),

    /// The configuration file could not be read or holds an invalid value.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Transport-level failure talking to the weather API.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The weather API answered with something other than 200 OK.
    #[error("Bad response from weather API. Code: {code}, Mesg: {reason}")]
    BadStatus { code: u16, reason: String },

    #[error("Failed to parse API response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API response has no \"currently\" object")]
    MissingCurrently,

    #[error("Observation has no \"time\" field")]
    MissingTime,

    #[error("Observation \"time\" is not an epoch timestamp: {0}")]
    InvalidTime(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl WxError {
    /// Short variant name, used when a stage failure is logged.
    pub fn kind(&self) -> &'static str {
        match self {
            WxError::MissingApiKey(_) => "MissingApiKey",
            WxError::Config(_) => "Config",
            WxError::Request(_) => "Request",
            WxError::BadStatus { .. } => "BadStatus",
            WxError::Json(_) => "Json",
            WxError::MissingCurrently => "MissingCurrently",
            WxError::MissingTime => "MissingTime",
            WxError::InvalidTime(_) => "InvalidTime",
            WxError::Csv(_) => "Csv",
            WxError::Io(_) => "Io",
        }
    }
}

pub type Result<T, E = WxError> = std::result::Result<T, E>;
