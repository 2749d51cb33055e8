use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{
    error::{Result, WxError},
    zone::Zone,
};

/// Environment variable holding the weather API secret key.
pub const API_KEY_VAR: &str = "DARK_SKY_SECRET_KEY";

pub const DEFAULT_LATITUDE: f64 = 37.8321;
pub const DEFAULT_LONGITUDE: f64 = -122.2626;
pub const DEFAULT_API_BASE: &str = "https://api.darksky.net";

/// Column order of every daily CSV file. Never derived from API responses.
pub const CSV_HEADERS: [&str; 21] = [
    "time",
    "summary",
    "icon",
    "nearestStormDistance",
    "nearestStormBearing",
    "precipIntensity",
    "precipIntensityError",
    "precipProbability",
    "precipType",
    "temperature",
    "apparentTemperature",
    "dewPoint",
    "humidity",
    "pressure",
    "windSpeed",
    "windGust",
    "windBearing",
    "cloudCover",
    "uvIndex",
    "visibility",
    "ozone",
];

/// Optional settings stored on disk.
///
/// Example TOML:
/// ```toml
/// latitude = 37.8321
/// longitude = -122.2626
/// output_dir = "/var/lib/wx"
/// timezone = "-07:00"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub api_base: Option<String>,
    /// `"local"` or a UTC offset such as `"-07:00"`.
    pub timezone: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load the config file.
    ///
    /// An explicit `path` must exist. Without one the platform default is
    /// tried, and a missing default file yields an empty config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = Self::default_path()?;
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let contents = fs::read_to_string(&path).map_err(|e| {
            WxError::Config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        Self::parse(&contents, &path)
    }

    pub fn parse(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|e| {
            WxError::Config(format!("Failed to parse config file {}: {e}", origin.display()))
        })
    }

    /// Path to the config file in the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "wx", "wx").ok_or_else(|| {
            WxError::Config("Could not determine platform config directory".into())
        })?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Values given on the command line; they win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub output_dir: Option<PathBuf>,
}

/// Everything a run needs, built once at process entry.
#[derive(Clone)]
pub struct Settings {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    pub output_dir: PathBuf,
    pub api_base: String,
    pub zone: Zone,
    pub request_timeout: Option<Duration>,
}

impl Settings {
    /// The secret key as found in the process environment.
    pub fn api_key_from_env() -> Option<String> {
        std::env::var(API_KEY_VAR).ok()
    }

    /// Merge the config file with `overrides`. `api_key` is checked first so a
    /// missing key fails before the file is even read.
    pub fn load(
        api_key: Option<String>,
        config_path: Option<&Path>,
        overrides: Overrides,
    ) -> Result<Self> {
        if api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
            return Err(WxError::MissingApiKey(API_KEY_VAR));
        }
        let file = FileConfig::load(config_path)?;

        Self::resolve(api_key, file, overrides)
    }

    pub fn resolve(
        api_key: Option<String>,
        file: FileConfig,
        overrides: Overrides,
    ) -> Result<Self> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(WxError::MissingApiKey(API_KEY_VAR))?;

        let zone = match file.timezone.as_deref() {
            Some(tz) => Zone::try_from(tz)?,
            None => Zone::Local,
        };

        let request_timeout = match file.request_timeout_secs {
            Some(0) => {
                return Err(WxError::Config(
                    "request_timeout_secs must be greater than zero".into(),
                ));
            }
            Some(secs) => Some(Duration::from_secs(secs)),
            None => None,
        };

        let api_base = file
            .api_base
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            latitude: overrides.latitude.or(file.latitude).unwrap_or(DEFAULT_LATITUDE),
            longitude: overrides.longitude.or(file.longitude).unwrap_or(DEFAULT_LONGITUDE),
            output_dir: overrides
                .output_dir
                .or(file.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
            api_base,
            zone,
            request_timeout,
        })
    }

    /// `wxYYYYMMDD.csv` inside the output directory.
    pub fn csv_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(date.format("wx%Y%m%d.csv").to_string())
    }

    /// `wxYYYYMMDD.log` inside the output directory.
    pub fn log_path(&self, date: NaiveDate) -> PathBuf {
        self.output_dir.join(date.format("wx%Y%m%d.log").to_string())
    }
}

// Keeps the secret out of logs and panic messages.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &"<redacted>")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("output_dir", &self.output_dir)
            .field("api_base", &self.api_base)
            .field("zone", &self.zone)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
