use serde_json::{Map, Value};

use crate::{
    config::CSV_HEADERS,
    error::{Result, WxError},
    zone::Zone,
};

/// One snapshot of current conditions, exactly as the API's `currently`
/// object delivered it. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Observation {
    fields: Map<String, Value>,
}

impl Observation {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Pull the `currently` object out of a full forecast response.
    pub fn from_response(mut body: Value) -> Result<Self> {
        match body.get_mut("currently").map(Value::take) {
            Some(Value::Object(fields)) => Ok(Self::new(fields)),
            _ => Err(WxError::MissingCurrently),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Replace the epoch-seconds `time` with `YYYY-MM-DD HH:MM:SS` in `zone`.
    pub fn normalize_time(&mut self, zone: Zone) -> Result<()> {
        let raw = self.fields.get("time").ok_or(WxError::MissingTime)?;
        let secs = epoch_seconds(raw).ok_or_else(|| WxError::InvalidTime(raw.to_string()))?;
        let formatted = zone
            .format_epoch(secs)
            .ok_or_else(|| WxError::InvalidTime(raw.to_string()))?;

        self.fields.insert("time".to_string(), Value::String(formatted));
        Ok(())
    }

    /// Cells in `CSV_HEADERS` order. Fields outside the header list are dropped.
    pub fn to_record(&self) -> Vec<String> {
        CSV_HEADERS.iter().map(|name| render_cell(self.fields.get(*name))).collect()
    }
}

// Integers as-is, floats truncated toward zero, numeric strings parsed.
fn epoch_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(truncate)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(truncate))
        }
        _ => None,
    }
}

fn truncate(f: f64) -> Option<i64> {
    f.is_finite().then(|| f.trunc() as i64)
}

fn render_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}
