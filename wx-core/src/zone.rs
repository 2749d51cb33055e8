use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};

use crate::error::WxError;

/// Output format of the normalized `time` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Time zone used for file dates, the `time` column and log timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Zone {
    /// Whatever the host is configured with.
    #[default]
    Local,
    Fixed(FixedOffset),
}

impl Zone {
    pub fn now(&self) -> DateTime<FixedOffset> {
        self.at(Utc::now())
    }

    /// Calendar date used to name the daily files.
    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    pub fn at(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Zone::Local => instant.with_timezone(&Local).fixed_offset(),
            Zone::Fixed(offset) => instant.with_timezone(offset),
        }
    }

    /// Render unix seconds as `YYYY-MM-DD HH:MM:SS` in this zone.
    /// `None` when the value is outside chrono's representable range.
    pub fn format_epoch(&self, secs: i64) -> Option<String> {
        DateTime::from_timestamp(secs, 0)
            .map(|instant| self.at(instant).format(TIMESTAMP_FORMAT).to_string())
    }
}

impl TryFrom<&str> for Zone {
    type Error = WxError;

    /// Accepts `local`, `utc`/`z`, or an offset like `-07:00`, `+0530`, `+09`.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        let lower = trimmed.to_lowercase();

        match lower.as_str() {
            "local" => return Ok(Zone::Local),
            "utc" | "z" => return Ok(Zone::Fixed(Utc.fix())),
            _ => {}
        }

        parse_offset(trimmed).map(Zone::Fixed).ok_or_else(|| {
            WxError::Config(format!(
                "Unknown timezone '{value}'. Use \"local\" or a UTC offset such as \"-07:00\"."
            ))
        })
    }
}

fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
