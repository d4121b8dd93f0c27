//! Normalized PV profile files.
//!
//! A profile file is a CSV with one value column: 8 760 hourly samples of
//! AC output per MW-DC installed, in site-local time from the start of the
//! calendar year. A single header line is tolerated; extra columns are not.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use helios_core::{HeliosError, HeliosResult, Site};
use helios_sim::{PvProfile, PvProfileSource};
use tracing::debug;

/// Read a normalized profile from a single-column CSV file.
pub fn load_profile_csv(path: &Path) -> HeliosResult<PvProfile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| {
            HeliosError::Weather(format!("opening profile '{}': {err}", path.display()))
        })?;

    let mut values = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|err| {
            HeliosError::Parse(format!(
                "reading profile '{}' line {}: {err}",
                path.display(),
                line + 1
            ))
        })?;
        if record.len() != 1 {
            return Err(HeliosError::Parse(format!(
                "profile '{}' line {} has {} columns, expected 1",
                path.display(),
                line + 1,
                record.len()
            )));
        }
        let field = record.get(0).unwrap_or("").trim();
        match field.parse::<f64>() {
            Ok(value) => values.push(value),
            // A lone header line is fine; anything later is not.
            Err(_) if line == 0 => continue,
            Err(err) => {
                return Err(HeliosError::Parse(format!(
                    "profile '{}' line {}: '{field}' is not a number: {err}",
                    path.display(),
                    line + 1
                )))
            }
        }
    }

    debug!(path = %path.display(), samples = values.len(), "loaded PV profile");
    PvProfile::new(values)
}

/// [`PvProfileSource`] backed by a profile file.
///
/// The file is read lazily on the first request and shared afterwards, so
/// an ensemble of cases at one site parses it once.
pub struct CsvProfileSource {
    path: PathBuf,
    cached: std::sync::OnceLock<HeliosResult<Arc<PvProfile>>>,
}

impl CsvProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: std::sync::OnceLock::new(),
        }
    }
}

impl PvProfileSource for CsvProfileSource {
    fn normalized_profile(&self, _site: &Site) -> HeliosResult<Arc<PvProfile>> {
        let result = self
            .cached
            .get_or_init(|| load_profile_csv(&self.path).map(Arc::new));
        match result {
            Ok(profile) => Ok(Arc::clone(profile)),
            Err(err) => Err(HeliosError::Weather(err.to_string())),
        }
    }
}
