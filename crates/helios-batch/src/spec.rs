//! On-disk ensemble sweep specs.
//!
//! A sweep can be declared in a YAML (or JSON) file instead of command-line
//! lists, which keeps large grids reviewable and rerunnable:
//!
//! ```yaml
//! site: { latitude_deg: 31.76, longitude_deg: -106.49 }
//! load_mw: 100
//! generator_type: gas-engine
//! solar_mw: [0, 100, 200, 300]
//! bess_mw: [0, 100, 200]
//! generator_mw: [125]
//! threads: 10
//! ```

use anyhow::{anyhow, Context, Result};
use helios_core::{GeneratorKind, Site};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::case::{cases_from_grid, EnsembleCase};
use crate::runner::DEFAULT_CONCURRENCY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnsembleSpec {
    pub site: Site,
    #[serde(default = "default_load_mw")]
    pub load_mw: f64,
    #[serde(default)]
    pub generator_type: GeneratorKind,
    pub solar_mw: Vec<f64>,
    pub bess_mw: Vec<f64>,
    pub generator_mw: Vec<f64>,
    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_load_mw() -> f64 {
    100.0
}

fn default_threads() -> usize {
    DEFAULT_CONCURRENCY
}

impl EnsembleSpec {
    /// Expand the capacity sweeps into the case grid.
    pub fn cases(&self) -> Vec<EnsembleCase> {
        cases_from_grid(
            self.site,
            &self.solar_mw,
            &self.bess_mw,
            &self.generator_mw,
            self.load_mw,
            self.generator_type,
        )
    }

    pub fn validate(&self) -> Result<()> {
        for (name, sweep) in [
            ("solar_mw", &self.solar_mw),
            ("bess_mw", &self.bess_mw),
            ("generator_mw", &self.generator_mw),
        ] {
            if sweep.is_empty() {
                return Err(anyhow!("ensemble spec sweep '{name}' is empty"));
            }
        }
        Ok(())
    }
}

/// Load a spec from YAML or JSON, chosen by extension; unknown extensions
/// try YAML first.
pub fn load_spec_from_path(path: &Path) -> Result<EnsembleSpec> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading ensemble spec '{}'", path.display()))?;
    let spec: EnsembleSpec = match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
            serde_yaml::from_str(&data).context("parsing ensemble spec yaml")?
        }
        Some(ext) if ext.eq_ignore_ascii_case("json") => {
            serde_json::from_str(&data).context("parsing ensemble spec json")?
        }
        _ => serde_yaml::from_str(&data)
            .or_else(|_| serde_json::from_str(&data))
            .context("parsing ensemble spec")?,
    };
    spec.validate()?;
    Ok(spec)
}
