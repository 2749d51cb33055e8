use anyhow::Context;
use std::{
    fmt,
    fs::{self, OpenOptions},
    path::Path,
    sync::Mutex,
};
use tracing::{Event, Subscriber};
use tracing_subscriber::{
    EnvFilter,
    fmt::{FmtContext, FormatEvent, FormatFields, format::Writer},
    registry::LookupSpan,
};
use wx_core::Zone;

const LOG_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// `<timestamp> <LEVEL> <message>`, timestamp in the same zone as the CSV data.
struct LineFormat(Zone);

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} {} ",
            self.0.now().format(LOG_TIME_FORMAT),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// `info` unless `RUST_LOG` says otherwise.
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Subscriber appending to the daily log file at `path`.
///
/// Lines look like `2018/05/06 04:25:04 INFO Writing data to CSV`.
pub fn subscriber(
    path: &Path,
    zone: Zone,
    filter: EnvFilter,
) -> anyhow::Result<impl Subscriber + Send + Sync + 'static> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    Ok(tracing_subscriber::fmt()
        .with_ansi(false)
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .event_format(LineFormat(zone))
        .finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{FixedOffset, NaiveDateTime};
    use serde_json::json;
    use wx_core::{FileConfig, Observation, Overrides, Settings, WeatherProvider, WxError};

    /// Succeeds with a fixed observation, or fails with the given status code.
    #[derive(Debug)]
    struct Canned(Option<u16>);

    #[async_trait]
    impl WeatherProvider for Canned {
        async fn current(&self, _latitude: f64, _longitude: f64) -> wx_core::Result<Observation> {
            match self.0 {
                None => Observation::from_response(json!({
                    "currently": {"time": 1525595104, "summary": "Clear", "temperature": 60.1}
                })),
                Some(code) => Err(WxError::BadStatus {
                    code,
                    reason: "Internal Server Error".into(),
                }),
            }
        }
    }

    fn settings(output_dir: &Path) -> Settings {
        let file = FileConfig { timezone: Some("-04:00".into()), ..Default::default() };
        let overrides =
            Overrides { output_dir: Some(output_dir.to_path_buf()), ..Default::default() };
        Settings::resolve(Some("SECRET".into()), file, overrides).unwrap()
    }

    const STAMP_LEN: usize = "2018/05/06 04:25:04".len();

    /// Splits a log line into its level and message.
    fn parse_line(line: &str) -> (&str, &str) {
        let (stamp, rest) = line.split_at(STAMP_LEN);
        assert!(
            NaiveDateTime::parse_from_str(stamp, LOG_TIME_FORMAT).is_ok(),
            "bad timestamp in {line:?}"
        );
        rest.strip_prefix(' ')
            .and_then(|rest| rest.split_once(' '))
            .unwrap_or_else(|| panic!("malformed line {line:?}"))
    }

    #[tokio::test]
    async fn pipeline_messages_land_in_the_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let log_path = settings.log_path(settings.zone.today());

        {
            let subscriber =
                subscriber(&log_path, settings.zone, EnvFilter::new("info")).unwrap();
            let _guard = tracing::subscriber::set_default(subscriber);

            wx_core::run(&settings, &Canned(None)).await.unwrap();
            let err = wx_core::run(&settings, &Canned(Some(500))).await.unwrap_err();
            assert_eq!(err.kind(), "BadStatus");
        }

        let contents = fs::read_to_string(&log_path).unwrap();
        let lines: Vec<(&str, &str)> = contents.lines().map(parse_line).collect();

        let done = format!("Done. Wrote {}", settings.csv_path(settings.zone.today()).display());
        assert_eq!(
            lines,
            vec![
                ("INFO", "Requesting weather data for 37.8321,-122.2626"),
                ("INFO", "Writing data to CSV"),
                ("INFO", done.as_str()),
                ("INFO", "Requesting weather data for 37.8321,-122.2626"),
                ("ERROR", "Fatal error occurred during HTTP stage: BadStatus"),
                ("ERROR", "Code: 500, Mesg: Internal Server Error"),
            ]
        );
        assert!(!contents.contains("writing header"));
        assert!(!contents.contains("DEBUG"));
    }

    #[tokio::test]
    async fn debug_filter_lets_debug_events_through() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let log_path = dir.path().join("debug.log");

        {
            let subscriber =
                subscriber(&log_path, settings.zone, EnvFilter::new("debug")).unwrap();
            let _guard = tracing::subscriber::set_default(subscriber);
            wx_core::run(&settings, &Canned(None)).await.unwrap();
        }

        let contents = fs::read_to_string(&log_path).unwrap();
        assert!(
            contents.lines().any(|l| parse_line(l).0 == "DEBUG" && l.contains("writing header")),
            "{contents}"
        );
    }

    #[test]
    fn line_has_single_spaces_and_zone_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("wx.log");
        let zone = Zone::Fixed(FixedOffset::west_opt(7 * 3600).unwrap());

        let subscriber = subscriber(&path, zone, EnvFilter::new("info")).unwrap();
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Writing data to CSV");
            tracing::debug!("hidden");
        });

        let contents = fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();

        assert_eq!(contents.lines().count(), 1);
        assert_eq!(&line[STAMP_LEN..], " INFO Writing data to CSV");
        assert_eq!(line.as_bytes()[4], b'/');
        assert_eq!(line.as_bytes()[7], b'/');
    }
}
