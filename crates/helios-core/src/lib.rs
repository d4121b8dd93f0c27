//! # helios-core: Off-grid Plant Modeling Core
//!
//! Provides the fundamental data structures shared by the dispatch engine,
//! the pro-forma builder, and the ensemble tooling: site coordinates, system
//! sizing, generator technology, plant-life constants, degradation models,
//! and the full run configuration with its documented defaults.
//!
//! ## Design Philosophy
//!
//! Everything here is a plain value type. A run owns one [`RunConfig`] and
//! passes it by reference; there is no process-wide configuration state.
//! Quantities that are easy to confuse (MW vs MWh vs MMBtu) use the newtype
//! wrappers from [`units`].
//!
//! ## Quick Start
//!
//! ```
//! use helios_core::{GeneratorKind, Site, SystemSizing};
//!
//! let site = Site::new(31.9, -106.2);
//! let sizing = SystemSizing::new(500.0, 100.0, 100.0, 100.0);
//!
//! assert_eq!(site.to_string(), "(31.9000, -106.2000)");
//! assert_eq!(sizing.bess_energy().value(), 400.0);
//! assert_eq!(sizing.system_spec(), "500MW | 100MW | 100MW");
//! assert_eq!(GeneratorKind::GasEngine.heat_rate_btu_per_kwh(), 8989.0);
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Rate tables, financial assumptions, and the aggregated
//!   [`RunConfig`] with validation
//! - [`degradation`] - Year-over-year solar and battery capacity fade
//! - [`error`] - Unified [`HeliosError`] / [`HeliosResult`]
//! - [`units`] - Typed physical and monetary quantities

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod config;
pub mod degradation;
pub mod error;
pub mod units;

pub use config::{
    BessCapexRates, DepreciationSchedule, FinancialAssumptions, GeneratorCapexRates, OmRates,
    RunConfig, SoftCostRates, SolarCapexRates, SystemIntegrationRates,
};
pub use degradation::{bess_usable_capacity_mwh, solar_ac_capacity_mw};
pub use error::{HeliosError, HeliosResult};
pub use units::{DollarsPerMwh, MegawattHours, Megawatts, MillionBtu};

/// Operating life of the plant in years.
pub const SYSTEM_LIFETIME_YEARS: usize = 20;

/// Hours in a (non-leap) simulation year.
pub const HOURS_PER_YEAR: usize = 8760;

/// Battery round-trip efficiency; one-way losses are applied as √η on each
/// of the charge and discharge legs.
pub const ROUND_TRIP_EFFICIENCY: f64 = 0.92;

/// Storage duration of the battery: energy capacity is power × 4 h.
pub const BESS_HOURS_STORAGE: f64 = 4.0;

/// Inverter loading ratio used to scale DC nameplate to AC-side output.
pub const DC_AC_RATIO: f64 = 1.2;

/// Linear PV output fade, fraction per operating year.
pub const SOLAR_DEGRADATION_PER_YEAR: f64 = 0.005;

/// Linear battery capacity fade, fraction per operating year
/// (0.35 % total over the 20-year life).
pub const BESS_DEGRADATION_PER_YEAR: f64 = 0.0035 / 20.0;

/// Geographic site of the plant, in decimal degrees.
///
/// Only used to key the PV-profile provider; the core itself never touches
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub latitude_deg: f64,
    pub longitude_deg: f64,
}

impl Site {
    pub fn new(latitude_deg: f64, longitude_deg: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude_deg, self.longitude_deg)
    }
}

/// Backup generator technology.
///
/// The variant carries the heat rate and the default cost tables; dispatch
/// and the pro-forma never branch on strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GeneratorKind {
    GasEngine,
    GasTurbine,
}

impl GeneratorKind {
    /// Fuel burned per unit of electricity generated, in BTU per kWh.
    pub fn heat_rate_btu_per_kwh(&self) -> f64 {
        match self {
            GeneratorKind::GasEngine => 8989.0,
            GeneratorKind::GasTurbine => 9630.0,
        }
    }

    /// Default installed-cost rates for this technology, $/kW.
    pub fn default_capex(&self) -> GeneratorCapexRates {
        match self {
            GeneratorKind::GasEngine => GeneratorCapexRates {
                gensets: 800.0,
                balance_of_system: 200.0,
                labor: 150.0,
            },
            GeneratorKind::GasTurbine => GeneratorCapexRates {
                gensets: 635.0,
                balance_of_system: 150.0,
                labor: 100.0,
            },
        }
    }

    /// Default fixed O&M, $/kW-year.
    pub fn default_fixed_om_dollar_per_kw(&self) -> f64 {
        match self {
            GeneratorKind::GasEngine => 10.0,
            GeneratorKind::GasTurbine => 15.0,
        }
    }

    /// Default variable O&M, $/kWh of generator output.
    pub fn default_variable_om_dollar_per_kwh(&self) -> f64 {
        match self {
            GeneratorKind::GasEngine => 0.025,
            GeneratorKind::GasTurbine => 0.005,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::GasEngine => "gas-engine",
            GeneratorKind::GasTurbine => "gas-turbine",
        }
    }
}

impl Default for GeneratorKind {
    fn default() -> Self {
        GeneratorKind::GasEngine
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = HeliosError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace([' ', '_'], "-");
        match normalized.as_str() {
            "gas-engine" | "gasengine" => Ok(GeneratorKind::GasEngine),
            "gas-turbine" | "gasturbine" => Ok(GeneratorKind::GasTurbine),
            _ => Err(HeliosError::Config(format!(
                "unknown generator type '{value}'; expected gas-engine or gas-turbine"
            ))),
        }
    }
}

/// Nameplate capacities of the four plant components.
///
/// The battery's energy capacity is implicit: power × storage hours
/// (4 h by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SystemSizing {
    /// Solar array nameplate, MW-DC.
    pub solar_dc: Megawatts,
    /// Battery power rating, MW-AC.
    pub bess_power: Megawatts,
    /// Battery storage duration, hours.
    pub bess_hours: f64,
    /// Backup generator rating, MW-AC.
    pub generator: Megawatts,
    /// Flat datacenter demand, MW.
    pub load: Megawatts,
}

impl SystemSizing {
    /// Sizing with the default 4-hour storage duration.
    pub fn new(solar_dc_mw: f64, bess_power_mw: f64, generator_mw: f64, load_mw: f64) -> Self {
        Self {
            solar_dc: Megawatts(solar_dc_mw),
            bess_power: Megawatts(bess_power_mw),
            bess_hours: BESS_HOURS_STORAGE,
            generator: Megawatts(generator_mw),
            load: Megawatts(load_mw),
        }
    }

    /// Undegraded battery energy capacity.
    pub fn bess_energy(&self) -> MegawattHours {
        self.bess_power.over_hours(self.bess_hours)
    }

    /// Canonical `"{solar}MW | {bess}MW | {gen}MW"` label used to key
    /// pre-baked simulation traces and ensemble reports.
    pub fn system_spec(&self) -> String {
        format!(
            "{:.0}MW | {:.0}MW | {:.0}MW",
            self.solar_dc.value(),
            self.bess_power.value(),
            self.generator.value()
        )
    }

    /// All capacities must be non-negative and finite.
    pub fn validate(&self) -> HeliosResult<()> {
        let fields = [
            ("solar-dc-mw", self.solar_dc.value()),
            ("bess-power-mw", self.bess_power.value()),
            ("bess-hours", self.bess_hours),
            ("generator-mw", self.generator.value()),
            ("load-mw", self.load.value()),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HeliosError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_spec_label() {
        let sizing = SystemSizing::new(1000.0, 500.0, 50.0, 100.0);
        assert_eq!(sizing.system_spec(), "1000MW | 500MW | 50MW");
    }

    #[test]
    fn test_bess_energy() {
        let sizing = SystemSizing::new(0.0, 250.0, 0.0, 100.0);
        assert_eq!(sizing.bess_energy().value(), 1000.0);
    }

    #[test]
    fn test_sizing_rejects_negative_capacity() {
        let sizing = SystemSizing::new(-1.0, 0.0, 0.0, 100.0);
        assert!(matches!(
            sizing.validate(),
            Err(HeliosError::Config(msg)) if msg.contains("solar-dc-mw")
        ));
    }

    #[test]
    fn test_generator_kind_round_trip() {
        for kind in [GeneratorKind::GasEngine, GeneratorKind::GasTurbine] {
            assert_eq!(kind.as_str().parse::<GeneratorKind>().unwrap(), kind);
        }
        assert_eq!(
            "Gas Engine".parse::<GeneratorKind>().unwrap(),
            GeneratorKind::GasEngine
        );
        assert!("diesel".parse::<GeneratorKind>().is_err());
    }

    #[test]
    fn test_heat_rates() {
        assert_eq!(GeneratorKind::GasEngine.heat_rate_btu_per_kwh(), 8989.0);
        assert_eq!(GeneratorKind::GasTurbine.heat_rate_btu_per_kwh(), 9630.0);
    }

    #[test]
    fn test_site_display() {
        assert_eq!(Site::new(31.9, -106.2).to_string(), "(31.9000, -106.2000)");
    }
}
