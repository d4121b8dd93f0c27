//! CAPEX roll-up: per-bucket installed cost, soft costs, the Investment Tax
//! Credit, and the depreciable basis.
//!
//! All monetary figures are in $M. Bucket bases differ by technology:
//! solar is priced in $/W of DC nameplate, the battery in $/kWh of storage,
//! the generator and system integration in $/kW (the latter against the
//! datacenter load, not a generation capacity).

use helios_core::{HeliosError, HeliosResult, RunConfig};
use serde::{Deserialize, Serialize};

/// Installed-cost summary for one configuration, $M.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapexSummary {
    pub solar: f64,
    pub bess: f64,
    pub generator: f64,
    pub system_integration: f64,
    /// Sum of the four buckets above.
    pub hard_subtotal: f64,
    /// Percentage soft costs applied to the hard subtotal.
    pub soft_costs: f64,
    pub total: f64,
    /// Share of hard CAPEX in the ITC-eligible buckets (solar + BESS).
    pub renewable_proportion: f64,
    /// Federal ITC credited in operating year 1.
    pub tax_credit: f64,
    /// Total CAPEX less half the ITC (IRS basis-reduction rule).
    pub depreciable_basis: f64,
}

impl CapexSummary {
    pub fn build(config: &RunConfig) -> HeliosResult<Self> {
        let sizing = &config.sizing;

        // $/W × MW ≡ $M; the kW-based buckets divide their MW base by 10³.
        let solar = config.solar_capex.total_dollar_per_w() * sizing.solar_dc.value();
        let bess = config.bess_capex.total_dollar_per_kwh()
            * sizing.bess_power.value()
            * sizing.bess_hours
            / 1000.0;
        let generator =
            config.generator_capex.total_dollar_per_kw() * sizing.generator.value() / 1000.0;
        let system_integration =
            config.system_integration.total_dollar_per_kw() * sizing.load.value() / 1000.0;

        let hard_subtotal = solar + bess + generator + system_integration;
        let soft_costs = hard_subtotal * config.soft_costs.total_pct() / 100.0;
        let total = hard_subtotal + soft_costs;

        let itc_pct = config.financial.investment_tax_credit_pct;
        if hard_subtotal <= 0.0 && itc_pct > 0.0 {
            return Err(HeliosError::Config(
                "investment tax credit requires nonzero hard CAPEX".into(),
            ));
        }
        if total <= 0.0 {
            return Err(HeliosError::Config(format!(
                "total CAPEX must be positive, got {total} $M"
            )));
        }

        let renewable_proportion = (solar + bess) / hard_subtotal;
        let tax_credit = total * renewable_proportion * itc_pct / 100.0;

        Ok(Self {
            solar,
            bess,
            generator,
            system_integration,
            hard_subtotal,
            soft_costs,
            total,
            renewable_proportion,
            tax_credit,
            depreciable_basis: total - tax_credit / 2.0,
        })
    }
}
