use anyhow::{Context, Result};
use std::fs;
use tracing::{info, warn};

use helios_core::{GeneratorKind, RunConfig, Site, SystemSizing};
use helios_finance::solve_lcoe;
use helios_io::{CsvProfileSource, SimulationData};
use helios_sim::{
    lifetime_energy_mix, simulate_lifetime, AnnualAggregate, DispatchInputs, PvProfileSource,
};

use crate::cli::{ConfigOverrides, LcoeArgs};

pub fn handle(args: &LcoeArgs) -> Result<()> {
    let site = Site::new(args.lat, args.longitude);
    let generator: GeneratorKind = args.generator_type.parse()?;
    let mut sizing = SystemSizing::new(args.solar_mw, args.bess_mw, args.generator_mw, args.load_mw);
    sizing.bess_hours = args.bess_hrs_storage;

    let mut config = RunConfig::defaults_for(site, sizing, generator);
    apply_overrides(&mut config, &args.overrides);
    config.validate()?;

    let annual = load_aggregates(args, &config)?;
    let mix = lifetime_energy_mix(&annual)?;

    info!(spec = %sizing.system_spec(), %site, "solving LCOE");
    let solution = solve_lcoe(&config, &annual)?;
    if !solution.converged {
        warn!(
            iterations = solution.iterations,
            "solver did not converge; reporting the final guess"
        );
    }
    info!(
        renewable_pct = mix.renewable_pct,
        iterations = solution.iterations,
        "solved"
    );

    if let Some(path) = &args.proforma_out {
        let json = serde_json::to_string_pretty(&solution.proforma)
            .context("serializing pro-forma to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("writing pro-forma '{}'", path.display()))?;
        info!(path = %path.display(), "wrote pro-forma");
    }

    println!("LCOE: ${:.2}/MWh", solution.lcoe.value());
    Ok(())
}

/// Annual aggregates either from the hourly simulation or, when a pre-baked
/// trace is given, straight from the file.
fn load_aggregates(args: &LcoeArgs, config: &RunConfig) -> Result<Vec<AnnualAggregate>> {
    if let (Some(path), Some(location)) = (&args.simulation_data, &args.location) {
        let data = SimulationData::load(path)?;
        let annual = data.aggregates_for(location, &config.sizing, config.generator)?;
        return Ok(annual);
    }

    let path = args
        .pv_profile
        .as_ref()
        .expect("clap enforces a profile or a simulation trace");
    let source = CsvProfileSource::new(path);
    let profile = source.normalized_profile(&config.site)?;

    let mut inputs = DispatchInputs::new(config.sizing, config.generator);
    inputs.initial_soc_mwh = args.initial_soc_mwh;
    let simulation = simulate_lifetime(&profile, &inputs)?;
    Ok(simulation.annual)
}

fn apply_overrides(config: &mut RunConfig, overrides: &ConfigOverrides) {
    macro_rules! apply {
        ($($target:expr => $source:ident),+ $(,)?) => {
            $(if let Some(value) = overrides.$source {
                $target = value;
            })+
        };
    }

    apply! {
        config.solar_capex.modules => pv_modules,
        config.solar_capex.inverters => pv_inverters,
        config.solar_capex.racking => pv_racking,
        config.solar_capex.balance_of_system => pv_balance_of_system,
        config.solar_capex.labor => pv_labor,

        config.bess_capex.units => bess_units,
        config.bess_capex.balance_of_system => bess_balance_of_system,
        config.bess_capex.labor => bess_labor,

        config.generator_capex.gensets => gensets,
        config.generator_capex.balance_of_system => gen_balance_of_system,
        config.generator_capex.labor => gen_labor,

        config.system_integration.microgrid => si_microgrid,
        config.system_integration.controls => si_controls,
        config.system_integration.labor => si_labor,

        config.soft_costs.general_conditions => soft_costs_general_conditions,
        config.soft_costs.epc_overhead => soft_costs_epc_overhead,
        config.soft_costs.design_engineering => soft_costs_design_engineering,
        config.soft_costs.permitting => soft_costs_permitting,
        config.soft_costs.startup => soft_costs_startup,
        config.soft_costs.insurance => soft_costs_insurance,
        config.soft_costs.taxes => soft_costs_taxes,

        config.om.fuel_price_dollar_per_mmbtu => fuel_price_dollar_per_mmbtu,
        config.om.fuel_escalator_pct => fuel_escalator_pct,
        config.om.solar_fixed_dollar_per_kw => om_solar_fixed_dollar_per_kw,
        config.om.bess_fixed_dollar_per_kw => om_bess_fixed_dollar_per_kw,
        config.om.bos_fixed_dollar_per_kw_load => om_bos_fixed_dollar_per_kw_load,
        config.om.generator_fixed_dollar_per_kw => om_generator_fixed_dollar_per_kw,
        config.om.generator_variable_dollar_per_kwh => om_generator_variable_dollar_per_kwh,
        config.om.soft_pct => om_soft_pct,
        config.om.escalator_pct => om_escalator_pct,

        config.financial.cost_of_debt_pct => cost_of_debt_pct,
        config.financial.cost_of_equity_pct => cost_of_equity_pct,
        config.financial.leverage_pct => leverage_pct,
        config.financial.debt_term_years => debt_term_years,
        config.financial.combined_tax_rate_pct => combined_tax_rate_pct,
        config.financial.investment_tax_credit_pct => investment_tax_credit_pct,
        config.financial.construction_time_years => construction_time_years,
    }

    if let Some(schedule) = &overrides.depreciation_schedule {
        config.financial.depreciation_schedule =
            helios_core::DepreciationSchedule(schedule.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_only_when_set() {
        let mut config = RunConfig::defaults_for(
            Site::new(31.9, -106.2),
            SystemSizing::new(500.0, 100.0, 100.0, 100.0),
            GeneratorKind::GasEngine,
        );
        let overrides = ConfigOverrides {
            leverage_pct: Some(0.0),
            fuel_price_dollar_per_mmbtu: Some(7.5),
            ..ConfigOverrides::default()
        };
        apply_overrides(&mut config, &overrides);

        assert_eq!(config.financial.leverage_pct, 0.0);
        assert_eq!(config.om.fuel_price_dollar_per_mmbtu, 7.5);
        // Untouched fields keep their defaults.
        assert_eq!(config.financial.cost_of_debt_pct, 7.5);
        assert_eq!(config.solar_capex.modules, 0.220);
    }

    #[test]
    fn test_depreciation_override() {
        let mut config = RunConfig::defaults_for(
            Site::new(31.9, -106.2),
            SystemSizing::new(500.0, 100.0, 100.0, 100.0),
            GeneratorKind::GasEngine,
        );
        let mut schedule = vec![5.0; 20];
        schedule[19] = 5.0;
        let overrides = ConfigOverrides {
            depreciation_schedule: Some(schedule.clone()),
            ..ConfigOverrides::default()
        };
        apply_overrides(&mut config, &overrides);
        assert_eq!(config.financial.depreciation_schedule.0, schedule);
    }
}
