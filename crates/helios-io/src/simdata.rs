//! Pre-baked simulation traces.
//!
//! An earlier power-flow export can stand in for the dispatch engine: a CSV
//! with one row per `(Location, System Spec, Operating Year)` carrying the
//! annual aggregates. Numeric cells may use thousands separators
//! (`"1,234,567"`), which spreadsheet-exported traces usually do.
//!
//! Looking up a case that is not in the file is a [`HeliosError::DataNotFound`],
//! surfaced before any financial work begins.

use std::collections::HashMap;
use std::path::Path;

use helios_core::units::MegawattHours;
use helios_core::{GeneratorKind, HeliosError, HeliosResult, SystemSizing, SYSTEM_LIFETIME_YEARS};
use helios_sim::AnnualAggregate;
use tracing::info;

const COL_LOCATION: &str = "Location";
const COL_SYSTEM_SPEC: &str = "System Spec";
const COL_OPERATING_YEAR: &str = "Operating Year";
const COL_SOLAR_NET: &str = "Solar Output - Net (MWh)";
const COL_BESS_CHARGED: &str = "BESS charged (MWh)";
const COL_BESS_DISCHARGED: &str = "BESS discharged (MWh)";
const COL_GENERATOR: &str = "Generator Output (MWh)";
const COL_LOAD_SERVED: &str = "Load Served (MWh)";
// Optional detail columns; absent in some exports.
const COL_SOLAR_RAW: &str = "Solar Output - Raw (MWh)";
const COL_SOLAR_CURTAILED: &str = "Solar Output - Curtailed (MWh)";

#[derive(Debug, Clone)]
struct TraceRow {
    operating_year: usize,
    solar_raw: f64,
    solar_curtailed: f64,
    solar_net: f64,
    bess_charged: f64,
    bess_discharged: f64,
    generator_output: f64,
    load_served: f64,
}

/// An in-memory simulation-trace file, indexed by `(location, system spec)`.
#[derive(Debug)]
pub struct SimulationData {
    rows: HashMap<(String, String), Vec<TraceRow>>,
}

impl SimulationData {
    pub fn load(path: &Path) -> HeliosResult<Self> {
        let mut reader = csv::ReaderBuilder::new().from_path(path).map_err(|err| {
            HeliosError::Parse(format!(
                "opening simulation data '{}': {err}",
                path.display()
            ))
        })?;

        let headers = reader
            .headers()
            .map_err(|err| HeliosError::Parse(format!("reading headers: {err}")))?
            .clone();
        let column = |name: &str| -> HeliosResult<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| {
                    HeliosError::Parse(format!(
                        "simulation data '{}' is missing column '{name}'",
                        path.display()
                    ))
                })
        };
        let optional_column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let col_location = column(COL_LOCATION)?;
        let col_spec = column(COL_SYSTEM_SPEC)?;
        let col_year = column(COL_OPERATING_YEAR)?;
        let col_net = column(COL_SOLAR_NET)?;
        let col_charged = column(COL_BESS_CHARGED)?;
        let col_discharged = column(COL_BESS_DISCHARGED)?;
        let col_generator = column(COL_GENERATOR)?;
        let col_load = column(COL_LOAD_SERVED)?;
        let col_raw = optional_column(COL_SOLAR_RAW);
        let col_curtailed = optional_column(COL_SOLAR_CURTAILED);

        let mut rows: HashMap<(String, String), Vec<TraceRow>> = HashMap::new();
        for (line, record) in reader.records().enumerate() {
            let record = record.map_err(|err| {
                HeliosError::Parse(format!(
                    "simulation data '{}' line {}: {err}",
                    path.display(),
                    line + 2
                ))
            })?;
            let cell = |index: usize| record.get(index).unwrap_or("").trim();
            let numeric = |index: usize| -> HeliosResult<f64> {
                parse_separated(cell(index)).ok_or_else(|| {
                    HeliosError::Parse(format!(
                        "simulation data '{}' line {}: '{}' is not numeric",
                        path.display(),
                        line + 2,
                        cell(index)
                    ))
                })
            };

            let solar_net = numeric(col_net)?;
            let solar_raw = match col_raw {
                Some(index) => numeric(index)?,
                None => solar_net,
            };
            let solar_curtailed = match col_curtailed {
                Some(index) => numeric(index)?,
                None => solar_raw - solar_net,
            };
            let row = TraceRow {
                operating_year: numeric(col_year)? as usize,
                solar_raw,
                solar_curtailed,
                solar_net,
                bess_charged: numeric(col_charged)?,
                bess_discharged: numeric(col_discharged)?,
                generator_output: numeric(col_generator)?,
                load_served: numeric(col_load)?,
            };
            rows.entry((cell(col_location).to_string(), cell(col_spec).to_string()))
                .or_default()
                .push(row);
        }

        info!(path = %path.display(), cases = rows.len(), "loaded simulation data");
        Ok(Self { rows })
    }

    /// Locations present in the file, sorted.
    pub fn locations(&self) -> Vec<&str> {
        let mut locations: Vec<&str> = self
            .rows
            .keys()
            .map(|(location, _)| location.as_str())
            .collect();
        locations.sort_unstable();
        locations.dedup();
        locations
    }

    /// Annual aggregates for one case, ordered by operating year. Unmet load
    /// is not exported by the trace format and is reported as zero; fuel is
    /// recomputed from the generator output at the technology's heat rate.
    pub fn aggregates_for(
        &self,
        location: &str,
        sizing: &SystemSizing,
        generator: GeneratorKind,
    ) -> HeliosResult<Vec<AnnualAggregate>> {
        let spec = sizing.system_spec();
        let rows = self
            .rows
            .get(&(location.trim().to_string(), spec.clone()))
            .ok_or_else(|| {
                HeliosError::DataNotFound(format!(
                    "location '{}', system spec '{spec}'",
                    location.trim()
                ))
            })?;

        let mut rows = rows.clone();
        rows.sort_by_key(|row| row.operating_year);
        if rows.len() != SYSTEM_LIFETIME_YEARS {
            return Err(HeliosError::Parse(format!(
                "case '{location}' / '{spec}' has {} operating years, expected {}",
                rows.len(),
                SYSTEM_LIFETIME_YEARS
            )));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let generator_output = MegawattHours(row.generator_output);
                AnnualAggregate {
                    operating_year: row.operating_year,
                    system_spec: spec.clone(),
                    solar_raw: MegawattHours(row.solar_raw),
                    solar_curtailed: MegawattHours(row.solar_curtailed),
                    solar_net: MegawattHours(row.solar_net),
                    bess_charged: MegawattHours(row.bess_charged),
                    bess_discharged: MegawattHours(row.bess_discharged),
                    generator_output,
                    unmet_load: MegawattHours(0.0),
                    load_served: MegawattHours(row.load_served),
                    generator_fuel: generator_output
                        .fuel_at_heat_rate(generator.heat_rate_btu_per_kwh()),
                }
            })
            .collect())
    }

    /// Whether the file holds the given case at all.
    pub fn contains(&self, location: &str, sizing: &SystemSizing) -> bool {
        self.rows
            .contains_key(&(location.trim().to_string(), sizing.system_spec()))
    }
}

/// Parse a number that may carry thousands separators.
fn parse_separated(field: &str) -> Option<f64> {
    if field.is_empty() {
        return None;
    }
    field.replace(',', "").parse::<f64>().ok()
}
