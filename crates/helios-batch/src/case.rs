//! Ensemble cases and their recorded outcomes.

use helios_core::{GeneratorKind, Site, SystemSizing};
use serde::{Deserialize, Serialize};

/// One configuration to evaluate: a site plus a sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleCase {
    pub site: Site,
    pub sizing: SystemSizing,
    pub generator: GeneratorKind,
}

impl EnsembleCase {
    /// Report label, e.g. `500MW_PV_100MW_BESS_125MW_GasEngine`.
    pub fn label(&self) -> String {
        let technology = match self.generator {
            GeneratorKind::GasEngine => "GasEngine",
            GeneratorKind::GasTurbine => "GasTurbine",
        };
        format!(
            "{:.0}MW_PV_{:.0}MW_BESS_{:.0}MW_{}",
            self.sizing.solar_dc.value(),
            self.sizing.bess_power.value(),
            self.sizing.generator.value(),
            technology
        )
    }
}

/// Cartesian product of capacity sweeps at a single site.
pub fn cases_from_grid(
    site: Site,
    solar_mw: &[f64],
    bess_mw: &[f64],
    generator_mw: &[f64],
    load_mw: f64,
    generator: GeneratorKind,
) -> Vec<EnsembleCase> {
    let mut cases =
        Vec::with_capacity(solar_mw.len() * bess_mw.len() * generator_mw.len());
    for &solar in solar_mw {
        for &bess in bess_mw {
            for &gen in generator_mw {
                cases.push(EnsembleCase {
                    site,
                    sizing: SystemSizing::new(solar, bess, gen, load_mw),
                    generator,
                });
            }
        }
    }
    cases
}

/// What one case produced: the solved LCOE and renewable share on success,
/// or the error text. Failures are data, not exceptions; the reducer and
/// the reports filter on `status`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseOutcome {
    pub case: EnsembleCase,
    pub system_spec: String,
    pub lcoe: Option<f64>,
    pub renewable_pct: Option<f64>,
    /// `"success"`, or `"error: …"`.
    pub status: String,
}

impl CaseOutcome {
    pub fn success(case: EnsembleCase, lcoe: f64, renewable_pct: f64) -> Self {
        let system_spec = case.label();
        Self {
            case,
            system_spec,
            lcoe: Some(lcoe),
            renewable_pct: Some(renewable_pct),
            status: "success".into(),
        }
    }

    pub fn failure(case: EnsembleCase, error: impl std::fmt::Display) -> Self {
        let system_spec = case.label();
        Self {
            case,
            system_spec,
            lcoe: None,
            renewable_pct: None,
            status: format!("error: {error}"),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}
