use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    config::{CSV_HEADERS, Settings},
    error::Result,
    model::Observation,
    zone::Zone,
};

/// Append `observation` to today's CSV file and return that file's path.
pub fn append(settings: &Settings, observation: Observation) -> Result<PathBuf> {
    let path = settings.csv_path(settings.zone.today());
    append_to(&path, settings.zone, observation)?;
    Ok(path)
}

/// Append one row to `path`, writing the header first when the file is new.
///
/// The existence check and the open are not atomic; concurrent writers on
/// the same file are not supported.
pub fn append_to(path: &Path, zone: Zone, mut observation: Observation) -> Result<()> {
    let write_header = !path.exists();

    observation.normalize_time(zone)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(file);

    if write_header {
        debug!(path = %path.display(), "new daily file, writing header");
        writer.write_record(CSV_HEADERS)?;
    }
    writer.write_record(observation.to_record())?;
    writer.flush()?;

    Ok(())
}
