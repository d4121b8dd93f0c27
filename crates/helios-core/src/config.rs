//! Run configuration: cost rate tables, O&M, financial assumptions, and the
//! aggregated [`RunConfig`].
//!
//! Every field has a documented default matching the reference cost stack
//! for a US off-grid build. A [`RunConfig`] is assembled once, validated
//! once, and then passed by reference through dispatch, pro-forma, and the
//! solver; nothing here is global.

use serde::{Deserialize, Serialize};

use crate::error::{HeliosError, HeliosResult};
use crate::{GeneratorKind, Site, SystemSizing, SYSTEM_LIFETIME_YEARS};

/// Solar PV installed-cost rates, $/W-DC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolarCapexRates {
    pub modules: f64,
    pub inverters: f64,
    pub racking: f64,
    pub balance_of_system: f64,
    pub labor: f64,
}

impl SolarCapexRates {
    pub fn total_dollar_per_w(&self) -> f64 {
        self.modules + self.inverters + self.racking + self.balance_of_system + self.labor
    }
}

impl Default for SolarCapexRates {
    fn default() -> Self {
        Self {
            modules: 0.220,
            inverters: 0.050,
            racking: 0.180,
            balance_of_system: 0.120,
            labor: 0.200,
        }
    }
}

/// Battery installed-cost rates, $/kWh of storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BessCapexRates {
    pub units: f64,
    pub balance_of_system: f64,
    pub labor: f64,
}

impl BessCapexRates {
    pub fn total_dollar_per_kwh(&self) -> f64 {
        self.units + self.balance_of_system + self.labor
    }
}

impl Default for BessCapexRates {
    fn default() -> Self {
        Self {
            units: 200.0,
            balance_of_system: 40.0,
            labor: 20.0,
        }
    }
}

/// Generator installed-cost rates, $/kW. Defaults depend on the technology;
/// see [`GeneratorKind::default_capex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneratorCapexRates {
    pub gensets: f64,
    pub balance_of_system: f64,
    pub labor: f64,
}

impl GeneratorCapexRates {
    pub fn total_dollar_per_kw(&self) -> f64 {
        self.gensets + self.balance_of_system + self.labor
    }
}

impl Default for GeneratorCapexRates {
    fn default() -> Self {
        GeneratorKind::GasEngine.default_capex()
    }
}

/// Microgrid integration cost rates, $/kW of datacenter load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemIntegrationRates {
    pub microgrid: f64,
    pub controls: f64,
    pub labor: f64,
}

impl SystemIntegrationRates {
    pub fn total_dollar_per_kw(&self) -> f64 {
        self.microgrid + self.controls + self.labor
    }
}

impl Default for SystemIntegrationRates {
    fn default() -> Self {
        Self {
            microgrid: 300.0,
            controls: 50.0,
            labor: 60.0,
        }
    }
}

/// Soft costs applied as percentages of the hard CAPEX subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoftCostRates {
    pub general_conditions: f64,
    pub epc_overhead: f64,
    pub design_engineering: f64,
    pub permitting: f64,
    pub startup: f64,
    pub insurance: f64,
    pub taxes: f64,
}

impl SoftCostRates {
    pub fn total_pct(&self) -> f64 {
        self.general_conditions
            + self.epc_overhead
            + self.design_engineering
            + self.permitting
            + self.startup
            + self.insurance
            + self.taxes
    }
}

impl Default for SoftCostRates {
    fn default() -> Self {
        Self {
            general_conditions: 0.50,
            epc_overhead: 5.00,
            design_engineering: 0.50,
            permitting: 0.05,
            startup: 0.25,
            insurance: 0.50,
            taxes: 5.00,
        }
    }
}

/// Operations & maintenance rates and escalators.
///
/// Generator variable O&M is stored in $/kWh of generator output; reports
/// may display it as $/MWh but the stored unit is always $/kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmRates {
    pub fuel_price_dollar_per_mmbtu: f64,
    /// Fuel price escalation, % per year (year 1 is the base year).
    pub fuel_escalator_pct: f64,
    pub solar_fixed_dollar_per_kw: f64,
    pub bess_fixed_dollar_per_kw: f64,
    pub bos_fixed_dollar_per_kw_load: f64,
    pub generator_fixed_dollar_per_kw: f64,
    pub generator_variable_dollar_per_kwh: f64,
    /// Soft O&M as a percentage of hard CAPEX.
    pub soft_pct: f64,
    /// O&M escalation, % per year (year 1 is the base year).
    pub escalator_pct: f64,
}

impl OmRates {
    /// O&M defaults with the generator rates of the given technology.
    pub fn for_generator(kind: GeneratorKind) -> Self {
        Self {
            generator_fixed_dollar_per_kw: kind.default_fixed_om_dollar_per_kw(),
            generator_variable_dollar_per_kwh: kind.default_variable_om_dollar_per_kwh(),
            ..Self::default()
        }
    }
}

impl Default for OmRates {
    fn default() -> Self {
        Self {
            fuel_price_dollar_per_mmbtu: 5.00,
            fuel_escalator_pct: 3.00,
            solar_fixed_dollar_per_kw: 11.0,
            bess_fixed_dollar_per_kw: 2.5,
            bos_fixed_dollar_per_kw_load: 6.0,
            generator_fixed_dollar_per_kw: GeneratorKind::GasEngine
                .default_fixed_om_dollar_per_kw(),
            generator_variable_dollar_per_kwh: GeneratorKind::GasEngine
                .default_variable_om_dollar_per_kwh(),
            soft_pct: 0.25,
            escalator_pct: 2.50,
        }
    }
}

/// Tax depreciation schedule: 20 yearly percentages of the depreciable basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepreciationSchedule(pub Vec<f64>);

impl DepreciationSchedule {
    /// 5-year MACRS, right-padded with zeros to the 20-year plant life.
    pub fn macrs_5_year() -> Self {
        let mut schedule = vec![20.0, 32.0, 19.20, 11.52, 11.52, 5.76];
        schedule.resize(SYSTEM_LIFETIME_YEARS, 0.0);
        Self(schedule)
    }

    /// Percentage for a 1-based operating year; zero past the schedule.
    pub fn pct_for_year(&self, operating_year: usize) -> f64 {
        self.0.get(operating_year - 1).copied().unwrap_or(0.0)
    }

    pub fn validate(&self) -> HeliosResult<()> {
        if self.0.len() != SYSTEM_LIFETIME_YEARS {
            return Err(HeliosError::Config(format!(
                "depreciation schedule must have {} entries, got {}",
                SYSTEM_LIFETIME_YEARS,
                self.0.len()
            )));
        }
        if self.0.iter().any(|pct| !pct.is_finite() || *pct < 0.0) {
            return Err(HeliosError::Config(
                "depreciation schedule entries must be non-negative".into(),
            ));
        }
        let total: f64 = self.0.iter().sum();
        if total > 100.0001 {
            return Err(HeliosError::Config(format!(
                "depreciation schedule sums to {total:.4}%, which exceeds 100%"
            )));
        }
        Ok(())
    }
}

impl Default for DepreciationSchedule {
    fn default() -> Self {
        Self::macrs_5_year()
    }
}

/// Project financing and tax assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialAssumptions {
    pub cost_of_debt_pct: f64,
    pub cost_of_equity_pct: f64,
    /// Share of CAPEX funded by debt, 0-100.
    pub leverage_pct: f64,
    pub debt_term_years: usize,
    pub combined_tax_rate_pct: f64,
    pub investment_tax_credit_pct: f64,
    pub construction_time_years: usize,
    pub depreciation_schedule: DepreciationSchedule,
}

impl Default for FinancialAssumptions {
    fn default() -> Self {
        Self {
            cost_of_debt_pct: 7.5,
            cost_of_equity_pct: 11.0,
            leverage_pct: 70.0,
            debt_term_years: 20,
            combined_tax_rate_pct: 21.0,
            investment_tax_credit_pct: 30.0,
            construction_time_years: 2,
            depreciation_schedule: DepreciationSchedule::macrs_5_year(),
        }
    }
}

impl FinancialAssumptions {
    pub fn validate(&self) -> HeliosResult<()> {
        if !(0.0..=100.0).contains(&self.leverage_pct) {
            return Err(HeliosError::Config(format!(
                "leverage-pct must be between 0 and 100, got {}",
                self.leverage_pct
            )));
        }
        if self.debt_term_years == 0 {
            return Err(HeliosError::Config("debt-term-years must be at least 1".into()));
        }
        if self.construction_time_years == 0 {
            return Err(HeliosError::Config(
                "construction-time-years must be at least 1".into(),
            ));
        }
        let pct_fields = [
            ("cost-of-debt-pct", self.cost_of_debt_pct),
            ("cost-of-equity-pct", self.cost_of_equity_pct),
            ("combined-tax-rate-pct", self.combined_tax_rate_pct),
            ("investment-tax-credit-pct", self.investment_tax_credit_pct),
        ];
        for (name, value) in pct_fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HeliosError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        self.depreciation_schedule.validate()
    }
}

/// Everything a single LCOE run needs, by value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub site: Site,
    pub sizing: SystemSizing,
    pub generator: GeneratorKind,
    #[serde(default)]
    pub solar_capex: SolarCapexRates,
    #[serde(default)]
    pub bess_capex: BessCapexRates,
    #[serde(default)]
    pub generator_capex: GeneratorCapexRates,
    #[serde(default)]
    pub system_integration: SystemIntegrationRates,
    #[serde(default)]
    pub soft_costs: SoftCostRates,
    #[serde(default)]
    pub om: OmRates,
    #[serde(default)]
    pub financial: FinancialAssumptions,
}

impl RunConfig {
    /// Defaults for a site/sizing pair, with generator CAPEX and O&M rates
    /// taken from the technology's tables.
    pub fn defaults_for(site: Site, sizing: SystemSizing, generator: GeneratorKind) -> Self {
        Self {
            site,
            sizing,
            generator,
            solar_capex: SolarCapexRates::default(),
            bess_capex: BessCapexRates::default(),
            generator_capex: generator.default_capex(),
            system_integration: SystemIntegrationRates::default(),
            soft_costs: SoftCostRates::default(),
            om: OmRates::for_generator(generator),
            financial: FinancialAssumptions::default(),
        }
    }

    /// Reject nonsensical input before any simulation work.
    pub fn validate(&self) -> HeliosResult<()> {
        self.sizing.validate()?;
        self.financial.validate()?;

        let rate_fields = [
            ("solar capex $/W", self.solar_capex.total_dollar_per_w()),
            ("bess capex $/kWh", self.bess_capex.total_dollar_per_kwh()),
            (
                "generator capex $/kW",
                self.generator_capex.total_dollar_per_kw(),
            ),
            (
                "system integration capex $/kW",
                self.system_integration.total_dollar_per_kw(),
            ),
            ("soft cost %", self.soft_costs.total_pct()),
            ("fuel price $/MMBtu", self.om.fuel_price_dollar_per_mmbtu),
            ("fuel escalator %", self.om.fuel_escalator_pct),
            ("solar fixed O&M $/kW", self.om.solar_fixed_dollar_per_kw),
            ("bess fixed O&M $/kW", self.om.bess_fixed_dollar_per_kw),
            ("bos fixed O&M $/kW", self.om.bos_fixed_dollar_per_kw_load),
            (
                "generator fixed O&M $/kW",
                self.om.generator_fixed_dollar_per_kw,
            ),
            (
                "generator variable O&M $/kWh",
                self.om.generator_variable_dollar_per_kwh,
            ),
            ("soft O&M %", self.om.soft_pct),
            ("O&M escalator %", self.om.escalator_pct),
        ];
        for (name, value) in rate_fields {
            if !value.is_finite() || value < 0.0 {
                return Err(HeliosError::Config(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}
