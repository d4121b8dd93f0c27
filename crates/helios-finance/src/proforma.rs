//! # Project Pro-Forma
//!
//! The pro-forma is the full financial statement of the plant: construction
//! years −(T−1)…0, operating years 1…20, and an NPV summary. It encodes
//! debt amortization, MACRS depreciation, the Investment Tax Credit, O&M
//! and fuel escalation, and after-tax equity cash flow.
//!
//! ## Representation
//!
//! One typed array per metric (a struct of arrays), split into
//! [`ConstructionColumns`] (length T) and [`OperatingColumns`] (fixed length
//! 20), with the NPV row as a sibling [`NpvSummary`] of optional scalars:
//! physical consumption metrics carry their lifetime sum, monetary metrics
//! their discounted sum at the cost of equity, and per-year rates, balances,
//! and schedules carry `None` (their NPV is undefined).
//!
//! ## Build order
//!
//! Two passes. Pass one fills every operating-year array straight from the
//! aggregates and the escalation curves (pure, no year-to-year state). Pass
//! two is the debt schedule, the only chained recurrence, delegated to
//! [`DebtSchedule`]. Nothing is grown or patched in place afterwards.
//!
//! ## Discounting
//!
//! Cash in year `y` (construction years have `y ≤ 0`) is discounted by
//! `(1 + cost_of_equity)^(y + T)`, anchoring the investment at time zero:
//! with T = 2, the year −1 spend is discounted one period, the year 0 spend
//! two, and the first revenue year three.

use helios_core::{HeliosError, HeliosResult, RunConfig, SYSTEM_LIFETIME_YEARS};
use helios_sim::AnnualAggregate;
use serde::{Deserialize, Serialize};

use crate::capex::CapexSummary;
use crate::debt::DebtSchedule;

const YEARS: usize = SYSTEM_LIFETIME_YEARS;

/// Per-construction-year cash flows, $M, one entry per year −(T−1)…0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstructionColumns {
    /// Total spend, negative.
    pub capital_expenditure: Vec<f64>,
    /// Debt draw, positive.
    pub debt_contribution: Vec<f64>,
    /// Equity share of the spend, negative.
    pub equity_capex: Vec<f64>,
    /// Equity cash flow during construction (equals `equity_capex`).
    pub equity_cash_flow: Vec<f64>,
}

/// Per-operating-year metric arrays, index 0 = operating year 1.
///
/// Unit-rate rows are escalated and sign-flipped exactly as the statement
/// presents them (costs negative); monetary rows are $M.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperatingColumns {
    // Physical flows from dispatch
    pub solar_net_mwh: [f64; YEARS],
    pub bess_charged_mwh: [f64; YEARS],
    pub bess_discharged_mwh: [f64; YEARS],
    pub generator_output_mwh: [f64; YEARS],
    pub generator_fuel_mmbtu: [f64; YEARS],
    pub load_served_mwh: [f64; YEARS],

    // Escalated unit rates (negative)
    pub fuel_unit_cost: [f64; YEARS],
    pub solar_fixed_om_rate: [f64; YEARS],
    pub bess_fixed_om_rate: [f64; YEARS],
    pub generator_fixed_om_rate: [f64; YEARS],
    pub generator_variable_om_rate: [f64; YEARS],
    pub bos_fixed_om_rate: [f64; YEARS],
    pub soft_om_rate: [f64; YEARS],

    // Operating P&L, $M
    pub fixed_om_cost: [f64; YEARS],
    pub fuel_cost: [f64; YEARS],
    pub variable_om_cost: [f64; YEARS],
    pub total_operating_costs: [f64; YEARS],
    pub lcoe: [f64; YEARS],
    pub revenue: [f64; YEARS],
    pub ebitda: [f64; YEARS],

    // Debt
    pub debt_outstanding_start: [f64; YEARS],
    pub interest_expense: [f64; YEARS],
    pub debt_service: [f64; YEARS],
    pub principal_payment: [f64; YEARS],

    // Tax
    pub depreciation_schedule_pct: [f64; YEARS],
    pub depreciation_macrs: [f64; YEARS],
    pub taxable_income: [f64; YEARS],
    pub federal_itc: [f64; YEARS],
    pub tax_benefit: [f64; YEARS],

    // Equity
    pub equity_cash_flow: [f64; YEARS],
}

/// The NPV row: lifetime sums for consumption metrics, discounted sums for
/// monetary metrics, `None` where an NPV is undefined (rates, balances,
/// the depreciation schedule, and the LCOE itself).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NpvSummary {
    // Lifetime sums
    pub solar_net_mwh: Option<f64>,
    pub bess_charged_mwh: Option<f64>,
    pub bess_discharged_mwh: Option<f64>,
    pub generator_output_mwh: Option<f64>,
    pub generator_fuel_mmbtu: Option<f64>,
    pub load_served_mwh: Option<f64>,

    // Undefined
    pub fuel_unit_cost: Option<f64>,
    pub solar_fixed_om_rate: Option<f64>,
    pub bess_fixed_om_rate: Option<f64>,
    pub generator_fixed_om_rate: Option<f64>,
    pub generator_variable_om_rate: Option<f64>,
    pub bos_fixed_om_rate: Option<f64>,
    pub soft_om_rate: Option<f64>,
    pub lcoe: Option<f64>,
    pub debt_outstanding_start: Option<f64>,
    pub depreciation_schedule_pct: Option<f64>,

    // Discounted at the cost of equity
    pub capital_expenditure: Option<f64>,
    pub debt_contribution: Option<f64>,
    pub equity_capex: Option<f64>,
    pub fixed_om_cost: Option<f64>,
    pub fuel_cost: Option<f64>,
    pub variable_om_cost: Option<f64>,
    pub total_operating_costs: Option<f64>,
    pub revenue: Option<f64>,
    pub ebitda: Option<f64>,
    pub interest_expense: Option<f64>,
    pub debt_service: Option<f64>,
    pub principal_payment: Option<f64>,
    pub depreciation_macrs: Option<f64>,
    pub taxable_income: Option<f64>,
    pub federal_itc: Option<f64>,
    pub tax_benefit: Option<f64>,
    pub after_tax_equity_cash_flow: Option<f64>,
}

/// A fully built pro-forma for one configuration at one trial LCOE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProForma {
    /// The trial energy price this table was built at, $/MWh.
    pub applied_lcoe: f64,
    pub capex: CapexSummary,
    /// Construction year indices, −(T−1)…0.
    pub construction_years: Vec<i32>,
    pub construction: ConstructionColumns,
    pub operating: OperatingColumns,
    pub npv: NpvSummary,
}

impl ProForma {
    /// Build the statement. Pure; safe to call in a tight solver loop.
    pub fn build(
        config: &RunConfig,
        annual: &[AnnualAggregate],
        lcoe: f64,
    ) -> HeliosResult<ProForma> {
        if annual.len() != YEARS {
            return Err(HeliosError::Config(format!(
                "pro-forma needs {YEARS} operating years of aggregates, got {}",
                annual.len()
            )));
        }
        for (index, aggregate) in annual.iter().enumerate() {
            if aggregate.operating_year != index + 1 {
                return Err(HeliosError::Config(format!(
                    "aggregates out of order: position {index} holds operating year {}",
                    aggregate.operating_year
                )));
            }
        }

        let capex = CapexSummary::build(config)?;
        let fin = &config.financial;
        let sizing = &config.sizing;
        let om = &config.om;

        let construction_time = fin.construction_time_years;
        let leverage = fin.leverage_pct / 100.0;
        let total_debt = capex.total * leverage;

        // Construction period: the spend lands in equal slices.
        let construction_years: Vec<i32> = (1 - construction_time as i32..=0).collect();
        let capex_per_year = capex.total / construction_time as f64;
        let construction = ConstructionColumns {
            capital_expenditure: vec![-capex_per_year; construction_time],
            debt_contribution: vec![capex_per_year * leverage; construction_time],
            equity_capex: vec![-capex_per_year * (1.0 - leverage); construction_time],
            equity_cash_flow: vec![-capex_per_year * (1.0 - leverage); construction_time],
        };

        // Pass one: operating-year arrays from aggregates and escalation.
        let mut op = OperatingColumns::default();
        let om_escalation = 1.0 + om.escalator_pct / 100.0;
        let fuel_escalation = 1.0 + om.fuel_escalator_pct / 100.0;
        for (i, aggregate) in annual.iter().enumerate() {
            op.solar_net_mwh[i] = aggregate.solar_net.value();
            op.bess_charged_mwh[i] = aggregate.bess_charged.value();
            op.bess_discharged_mwh[i] = aggregate.bess_discharged.value();
            op.generator_output_mwh[i] = aggregate.generator_output.value();
            op.generator_fuel_mmbtu[i] = aggregate.generator_fuel.value();
            op.load_served_mwh[i] = aggregate.load_served.value();

            // Year 1 is the base year for both escalators.
            let om_factor = om_escalation.powi(i as i32);
            let fuel_factor = fuel_escalation.powi(i as i32);
            op.fuel_unit_cost[i] = -om.fuel_price_dollar_per_mmbtu * fuel_factor;
            op.solar_fixed_om_rate[i] = -om.solar_fixed_dollar_per_kw * om_factor;
            op.bess_fixed_om_rate[i] = -om.bess_fixed_dollar_per_kw * om_factor;
            op.generator_fixed_om_rate[i] = -om.generator_fixed_dollar_per_kw * om_factor;
            op.generator_variable_om_rate[i] = -om.generator_variable_dollar_per_kwh * om_factor;
            op.bos_fixed_om_rate[i] = -om.bos_fixed_dollar_per_kw_load * om_factor;
            op.soft_om_rate[i] = -om.soft_pct * om_factor;

            op.fixed_om_cost[i] = (op.solar_fixed_om_rate[i] * sizing.solar_dc.value() * 1000.0
                + op.bess_fixed_om_rate[i] * sizing.bess_power.value() * 1000.0
                + op.generator_fixed_om_rate[i] * sizing.generator.value() * 1000.0
                + op.bos_fixed_om_rate[i] * sizing.load.value() * 1000.0)
                / 1_000_000.0
                + op.soft_om_rate[i] / 100.0 * capex.hard_subtotal;
            op.fuel_cost[i] = op.fuel_unit_cost[i] * op.generator_fuel_mmbtu[i] / 1_000_000.0;
            op.variable_om_cost[i] =
                op.generator_variable_om_rate[i] * op.generator_output_mwh[i] * 1000.0
                    / 1_000_000.0;
            op.total_operating_costs[i] =
                op.fixed_om_cost[i] + op.fuel_cost[i] + op.variable_om_cost[i];

            op.lcoe[i] = lcoe;
            op.revenue[i] = lcoe * op.load_served_mwh[i] / 1_000_000.0;
            op.ebitda[i] = op.revenue[i] + op.total_operating_costs[i];

            op.depreciation_schedule_pct[i] = fin.depreciation_schedule.pct_for_year(i + 1);
            op.depreciation_macrs[i] =
                -op.depreciation_schedule_pct[i] / 100.0 * capex.depreciable_basis;
        }
        op.federal_itc[0] = capex.tax_credit;

        // Pass two: the debt balance chain.
        let debt = DebtSchedule::build(total_debt, fin.cost_of_debt_pct / 100.0, fin.debt_term_years);
        op.debt_outstanding_start = debt.outstanding_start;
        op.interest_expense = debt.interest;
        op.debt_service = debt.service;
        op.principal_payment = debt.principal_payment;

        let tax_rate = fin.combined_tax_rate_pct / 100.0;
        for i in 0..YEARS {
            op.taxable_income[i] = op.ebitda[i] + op.depreciation_macrs[i] + op.interest_expense[i];
            op.tax_benefit[i] = -op.taxable_income[i] * tax_rate + op.federal_itc[i];
            op.equity_cash_flow[i] = op.ebitda[i] + op.debt_service[i] + op.tax_benefit[i];
        }

        let npv = Self::summarize(
            &construction_years,
            &construction,
            &op,
            fin.cost_of_equity_pct / 100.0,
            construction_time,
        );

        Ok(ProForma {
            applied_lcoe: lcoe,
            capex,
            construction_years,
            construction,
            operating: op,
            npv,
        })
    }

    fn summarize(
        construction_years: &[i32],
        construction: &ConstructionColumns,
        op: &OperatingColumns,
        equity_rate: f64,
        construction_time: usize,
    ) -> NpvSummary {
        let offset = construction_time as i32;
        let discount =
            |value: f64, year: i32| value / (1.0 + equity_rate).powi(year + offset);

        let discount_construction = |values: &[f64]| -> f64 {
            values
                .iter()
                .zip(construction_years)
                .map(|(value, year)| discount(*value, *year))
                .sum()
        };
        let discount_operating = |values: &[f64; YEARS]| -> f64 {
            values
                .iter()
                .enumerate()
                .map(|(i, value)| discount(*value, i as i32 + 1))
                .sum()
        };
        let sum = |values: &[f64; YEARS]| -> f64 { values.iter().sum() };

        NpvSummary {
            solar_net_mwh: Some(sum(&op.solar_net_mwh)),
            bess_charged_mwh: Some(sum(&op.bess_charged_mwh)),
            bess_discharged_mwh: Some(sum(&op.bess_discharged_mwh)),
            generator_output_mwh: Some(sum(&op.generator_output_mwh)),
            generator_fuel_mmbtu: Some(sum(&op.generator_fuel_mmbtu)),
            load_served_mwh: Some(sum(&op.load_served_mwh)),

            fuel_unit_cost: None,
            solar_fixed_om_rate: None,
            bess_fixed_om_rate: None,
            generator_fixed_om_rate: None,
            generator_variable_om_rate: None,
            bos_fixed_om_rate: None,
            soft_om_rate: None,
            lcoe: None,
            debt_outstanding_start: None,
            depreciation_schedule_pct: None,

            capital_expenditure: Some(discount_construction(&construction.capital_expenditure)),
            debt_contribution: Some(discount_construction(&construction.debt_contribution)),
            equity_capex: Some(discount_construction(&construction.equity_capex)),
            fixed_om_cost: Some(discount_operating(&op.fixed_om_cost)),
            fuel_cost: Some(discount_operating(&op.fuel_cost)),
            variable_om_cost: Some(discount_operating(&op.variable_om_cost)),
            total_operating_costs: Some(discount_operating(&op.total_operating_costs)),
            revenue: Some(discount_operating(&op.revenue)),
            ebitda: Some(discount_operating(&op.ebitda)),
            interest_expense: Some(discount_operating(&op.interest_expense)),
            debt_service: Some(discount_operating(&op.debt_service)),
            principal_payment: Some(discount_operating(&op.principal_payment)),
            depreciation_macrs: Some(discount_operating(&op.depreciation_macrs)),
            taxable_income: Some(discount_operating(&op.taxable_income)),
            federal_itc: Some(discount_operating(&op.federal_itc)),
            tax_benefit: Some(discount_operating(&op.tax_benefit)),
            after_tax_equity_cash_flow: Some(
                discount_construction(&construction.equity_cash_flow)
                    + discount_operating(&op.equity_cash_flow),
            ),
        }
    }

    /// NPV of after-tax equity cash flow, the quantity the LCOE solver
    /// drives to zero.
    pub fn equity_npv(&self) -> f64 {
        self.npv
            .after_tax_equity_cash_flow
            .expect("builder always prices equity cash flow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_core::units::MegawattHours;
    use helios_core::{GeneratorKind, Site, SystemSizing};

    fn config(solar: f64, bess: f64, generator: f64, load: f64) -> RunConfig {
        RunConfig::defaults_for(
            Site::new(31.9, -106.2),
            SystemSizing::new(solar, bess, generator, load),
            GeneratorKind::GasEngine,
        )
    }

    fn aggregates(generator_mwh: f64, load_served_mwh: f64) -> Vec<AnnualAggregate> {
        (1..=YEARS)
            .map(|year| {
                let generator_output = MegawattHours(generator_mwh);
                AnnualAggregate {
                    operating_year: year,
                    system_spec: "250MW | 100MW | 125MW".into(),
                    solar_raw: MegawattHours(400_000.0),
                    solar_curtailed: MegawattHours(20_000.0),
                    solar_net: MegawattHours(380_000.0),
                    bess_charged: MegawattHours(120_000.0),
                    bess_discharged: MegawattHours(110_400.0),
                    generator_output,
                    unmet_load: MegawattHours(0.0),
                    load_served: MegawattHours(load_served_mwh),
                    generator_fuel: generator_output.fuel_at_heat_rate(8989.0),
                }
            })
            .collect()
    }

    #[test]
    fn test_wrong_aggregate_count_rejected() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let annual = &aggregates(100_000.0, 876_000.0)[..5];
        assert!(ProForma::build(&config, annual, 100.0).is_err());
    }

    #[test]
    fn test_construction_period_slices() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();

        assert_eq!(pf.construction_years, vec![-1, 0]);
        let per_year = pf.capex.total / 2.0;
        for j in 0..2 {
            assert!((pf.construction.capital_expenditure[j] + per_year).abs() < 1e-9);
            assert!((pf.construction.debt_contribution[j] - per_year * 0.70).abs() < 1e-9);
            assert!((pf.construction.equity_capex[j] + per_year * 0.30).abs() < 1e-9);
            assert_eq!(
                pf.construction.equity_cash_flow[j],
                pf.construction.equity_capex[j]
            );
        }
    }

    #[test]
    fn test_itc_in_year_one_only() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();

        assert!((pf.operating.federal_itc[0] - pf.capex.tax_credit).abs() < 1e-9);
        for year in 1..YEARS {
            assert_eq!(pf.operating.federal_itc[year], 0.0);
        }
        // Year 1 tax benefit carries the credit on top of the income tax.
        let expected = -pf.operating.taxable_income[0] * 0.21 + pf.capex.tax_credit;
        assert!((pf.operating.tax_benefit[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_escalation_curves() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();

        // Year 1 is the base year.
        assert!((pf.operating.fuel_unit_cost[0] + 5.0).abs() < 1e-12);
        assert!((pf.operating.fuel_unit_cost[1] + 5.0 * 1.03).abs() < 1e-12);
        assert!((pf.operating.solar_fixed_om_rate[0] + 11.0).abs() < 1e-12);
        assert!((pf.operating.solar_fixed_om_rate[4] + 11.0 * 1.025_f64.powi(4)).abs() < 1e-12);
    }

    #[test]
    fn test_operating_pnl_composition() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let lcoe = 100.0;
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), lcoe).unwrap();
        let op = &pf.operating;

        for i in 0..YEARS {
            assert!((op.revenue[i] - lcoe * op.load_served_mwh[i] / 1e6).abs() < 1e-9);
            let costs = op.fixed_om_cost[i] + op.fuel_cost[i] + op.variable_om_cost[i];
            assert!((op.total_operating_costs[i] - costs).abs() < 1e-12);
            assert!((op.ebitda[i] - (op.revenue[i] + op.total_operating_costs[i])).abs() < 1e-12);
            assert!(
                (op.taxable_income[i]
                    - (op.ebitda[i] + op.depreciation_macrs[i] + op.interest_expense[i]))
                    .abs()
                    < 1e-12
            );
            assert!(
                (op.equity_cash_flow[i]
                    - (op.ebitda[i] + op.debt_service[i] + op.tax_benefit[i]))
                    .abs()
                    < 1e-12
            );
        }
    }

    #[test]
    fn test_depreciation_uses_reduced_basis() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();
        assert!(
            (pf.operating.depreciation_macrs[0] + 0.20 * pf.capex.depreciable_basis).abs() < 1e-9
        );
        // 5-year MACRS exhausts after year 6.
        assert_eq!(pf.operating.depreciation_macrs[7], 0.0);
    }

    #[test]
    fn test_zero_leverage_zeroes_debt_rows() {
        let mut config = config(250.0, 100.0, 125.0, 100.0);
        config.financial.leverage_pct = 0.0;
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();

        assert_eq!(pf.operating.debt_service, [0.0; YEARS]);
        assert_eq!(pf.operating.interest_expense, [0.0; YEARS]);
        assert_eq!(pf.operating.principal_payment, [0.0; YEARS]);
        let equity_total: f64 = pf.construction.equity_capex.iter().sum();
        assert!((equity_total + pf.capex.total).abs() < 1e-9);
        assert_eq!(pf.npv.debt_contribution, Some(0.0));
    }

    #[test]
    fn test_npv_classification() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();

        // Consumption rows are lifetime sums.
        assert_eq!(pf.npv.load_served_mwh, Some(876_000.0 * 20.0));
        assert_eq!(pf.npv.generator_output_mwh, Some(100_000.0 * 20.0));
        // Rates, balances, and the LCOE have no NPV.
        assert_eq!(pf.npv.fuel_unit_cost, None);
        assert_eq!(pf.npv.debt_outstanding_start, None);
        assert_eq!(pf.npv.lcoe, None);
        assert_eq!(pf.npv.depreciation_schedule_pct, None);
        // Monetary rows are discounted; revenue in year 1 at 11% over 3
        // periods is part of the total.
        let revenue_npv = pf.npv.revenue.unwrap();
        assert!(revenue_npv > 0.0);
        assert!(revenue_npv < pf.operating.revenue.iter().sum::<f64>());
    }

    #[test]
    fn test_discount_offset_anchors_at_time_zero() {
        // Single construction year keeps the arithmetic visible.
        let mut config = config(0.0, 0.0, 125.0, 100.0);
        config.financial.construction_time_years = 1;
        config.financial.leverage_pct = 0.0;
        config.financial.investment_tax_credit_pct = 0.0;
        let pf = ProForma::build(&config, &aggregates(876_000.0, 876_000.0), 100.0).unwrap();

        // Year 0 spend discounted one period at 11%.
        let expected = pf.construction.equity_capex[0] / 1.11;
        assert!((pf.npv.equity_capex.unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_npv_is_affine_in_lcoe() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let annual = aggregates(100_000.0, 876_000.0);

        let low = ProForma::build(&config, &annual, 60.0).unwrap().equity_npv();
        let high = ProForma::build(&config, &annual, 240.0).unwrap().equity_npv();
        let mid = ProForma::build(&config, &annual, 150.0).unwrap().equity_npv();

        assert!((mid - (low + high) / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_doubling_lcoe_scales_linearly() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let annual = aggregates(100_000.0, 876_000.0);

        let at_zero = ProForma::build(&config, &annual, 0.0).unwrap().equity_npv();
        let at_l = ProForma::build(&config, &annual, 110.0).unwrap().equity_npv();
        let at_2l = ProForma::build(&config, &annual, 220.0).unwrap().equity_npv();

        assert!((at_2l - (2.0 * at_l - at_zero)).abs() < 1e-6);
    }

    #[test]
    fn test_json_round_trip() {
        let config = config(250.0, 100.0, 125.0, 100.0);
        let pf = ProForma::build(&config, &aggregates(100_000.0, 876_000.0), 100.0).unwrap();
        let json = serde_json::to_string(&pf).unwrap();
        let parsed: ProForma = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, pf);
    }
}
