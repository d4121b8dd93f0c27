//! # Hourly Dispatch Engine
//!
//! Sequential, stateful simulation of battery state-of-charge, solar
//! curtailment, generator dispatch, and unmet load across 8 760 hours ×
//! 20 operating years, with linear degradation applied to PV output and
//! battery capacity each year.
//!
//! ## Dispatch policy
//!
//! The policy is fixed and greedy, evaluated once per hour with a 1 h step.
//! Let `g = solar_ac − load` (MW):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  g ≥ 0  (surplus)                                                    │
//! │    stored  = min(g, battery power, capacity − soc)                   │
//! │    curtail = g − stored                                              │
//! │    soc    += stored · √η                                             │
//! │                                                                      │
//! │  g < 0  (deficit d = −g)                                             │
//! │    draw      = min(battery power, d / √η, soc)                       │
//! │    discharge = draw · √η          (bus side)                         │
//! │    generator = min(d − discharge, generator capacity)                │
//! │    unmet     = d − discharge − generator                             │
//! │    soc      −= draw                                                  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Charging outranks curtailment; discharging outranks the generator, which
//! outranks shedding. Ties at the limits resolve in the `min`-clamp order
//! shown (battery power first, then SoC/headroom). The headroom clamp is
//! applied to the *pre-efficiency* energy drawn off the bus, so a battery
//! can never be charged completely full; that asymmetry is part of the
//! contract, not an accident.
//!
//! The round-trip efficiency η = 0.92 is split as √η on each leg: the
//! recorded `battery_charge_mwh` is bus-side energy in, the recorded
//! `battery_discharge_mwh` is bus-side energy out.
//!
//! ## Totality
//!
//! Dispatch never fails on valid inputs: `unmet_mwh` absorbs any shortfall.
//! The per-hour energy balance
//! `solar − curtailed − charge + discharge + generator + unmet = load`
//! is asserted in debug builds and re-checked in release builds, where a
//! violation aborts the run with [`HeliosError::Dispatch`]; it indicates a
//! bug, not a bad configuration.

use helios_core::units::{MegawattHours, MillionBtu};
use helios_core::{
    bess_usable_capacity_mwh, solar_ac_capacity_mw, GeneratorKind, HeliosError, HeliosResult,
    SystemSizing, HOURS_PER_YEAR, ROUND_TRIP_EFFICIENCY, SYSTEM_LIFETIME_YEARS,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// First hour (0-based, local time) of the displayed sample week:
/// days 182–188 of a 365-day year.
pub const SAMPLE_WEEK_START_HOUR: usize = (182 - 1) * 24;

/// Hours in the displayed sample week.
pub const SAMPLE_WEEK_HOURS: usize = 7 * 24;

const BALANCE_TOLERANCE_MW: f64 = 1e-9;

/// Sizing plus dispatch options for one run.
#[derive(Debug, Clone)]
pub struct DispatchInputs {
    pub sizing: SystemSizing,
    pub generator: GeneratorKind,
    /// Battery charge at the start of each operating year, MWh. Defaults to
    /// the year's full (degraded) capacity; values above it are clamped.
    pub initial_soc_mwh: Option<f64>,
}

impl DispatchInputs {
    pub fn new(sizing: SystemSizing, generator: GeneratorKind) -> Self {
        Self {
            sizing,
            generator,
            initial_soc_mwh: None,
        }
    }

    pub fn with_initial_soc(mut self, soc_mwh: f64) -> Self {
        self.initial_soc_mwh = Some(soc_mwh);
        self
    }
}

/// Resolved power flows for one simulated hour. All energy terms are MWh
/// over the 1 h step; `battery_soc_mwh` is the state at the hour's start.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct HourlyState {
    pub solar_ac_mw: f64,
    pub battery_soc_mwh: f64,
    pub battery_charge_mwh: f64,
    pub battery_discharge_mwh: f64,
    pub curtailed_mwh: f64,
    pub generator_mwh: f64,
    pub unmet_mwh: f64,
    pub load_served_mwh: f64,
}

/// Annual sums of the dispatch flows for one operating year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualAggregate {
    pub operating_year: usize,
    /// Canonical `"{solar}MW | {bess}MW | {gen}MW"` case label.
    pub system_spec: String,
    pub solar_raw: MegawattHours,
    pub solar_curtailed: MegawattHours,
    pub solar_net: MegawattHours,
    pub bess_charged: MegawattHours,
    pub bess_discharged: MegawattHours,
    pub generator_output: MegawattHours,
    pub unmet_load: MegawattHours,
    pub load_served: MegawattHours,
    pub generator_fuel: MillionBtu,
}

/// One simulated operating year: the full hourly trace and its sums.
#[derive(Debug, Clone)]
pub struct YearDispatch {
    pub hourly: Vec<HourlyState>,
    pub aggregate: AnnualAggregate,
}

/// The 20-year simulation output consumed by the pro-forma builder.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub annual: Vec<AnnualAggregate>,
    /// Year-1 hourly states for local days 182–188 (168 hours).
    pub sample_week: Vec<HourlyState>,
}

/// Simulate a single operating year (1-based) against the normalized
/// profile scaled to the year's degraded AC capacity.
pub fn simulate_year(
    profile: &crate::PvProfile,
    inputs: &DispatchInputs,
    operating_year: usize,
) -> HeliosResult<YearDispatch> {
    let sizing = &inputs.sizing;
    let ac_capacity_mw = solar_ac_capacity_mw(sizing.solar_dc, operating_year).value();
    let capacity_mwh =
        bess_usable_capacity_mwh(sizing.bess_power, sizing.bess_hours, operating_year).value();
    let battery_power_mw = sizing.bess_power.value();
    let generator_mw = sizing.generator.value();
    let load_mw = sizing.load.value();
    let one_way_efficiency = ROUND_TRIP_EFFICIENCY.sqrt();

    // SoC is the only state carried across hours.
    let mut soc = inputs
        .initial_soc_mwh
        .map(|s| s.clamp(0.0, capacity_mwh))
        .unwrap_or(capacity_mwh);

    let mut hourly = Vec::with_capacity(HOURS_PER_YEAR);
    for (hour, normalized) in profile.values().iter().enumerate() {
        let solar_ac_mw = normalized * ac_capacity_mw;
        let surplus = solar_ac_mw - load_mw;

        let mut state = HourlyState {
            solar_ac_mw,
            battery_soc_mwh: soc,
            ..HourlyState::default()
        };

        if surplus >= 0.0 {
            let headroom = capacity_mwh - soc;
            let stored = surplus.min(battery_power_mw).min(headroom);
            state.battery_charge_mwh = stored;
            state.curtailed_mwh = surplus - stored;
            soc += stored * one_way_efficiency;
        } else {
            let deficit = -surplus;
            let draw = battery_power_mw
                .min(deficit / one_way_efficiency)
                .min(soc);
            let discharge = draw * one_way_efficiency;
            let residual = deficit - discharge;
            state.battery_discharge_mwh = discharge;
            state.generator_mwh = residual.min(generator_mw);
            state.unmet_mwh = residual - state.generator_mwh;
            soc -= draw;
        }
        state.load_served_mwh = load_mw - state.unmet_mwh;

        check_hour(&state, soc, capacity_mwh, load_mw, operating_year, hour)?;
        hourly.push(state);
    }

    let aggregate = aggregate_year(&hourly, inputs, operating_year);
    Ok(YearDispatch { hourly, aggregate })
}

fn check_hour(
    state: &HourlyState,
    soc_after: f64,
    capacity_mwh: f64,
    load_mw: f64,
    operating_year: usize,
    hour: usize,
) -> HeliosResult<()> {
    let balance = state.solar_ac_mw - state.curtailed_mwh - state.battery_charge_mwh
        + state.battery_discharge_mwh
        + state.generator_mwh
        + state.unmet_mwh
        - load_mw;
    let flows_nonnegative = state.battery_charge_mwh >= 0.0
        && state.battery_discharge_mwh >= 0.0
        && state.curtailed_mwh >= 0.0
        && state.generator_mwh >= 0.0
        && state.unmet_mwh >= 0.0;
    let soc_in_bounds =
        soc_after >= -BALANCE_TOLERANCE_MW && soc_after <= capacity_mwh + BALANCE_TOLERANCE_MW;

    debug_assert!(
        balance.abs() <= BALANCE_TOLERANCE_MW,
        "energy balance off by {balance} MW at year {operating_year} hour {hour}"
    );
    debug_assert!(flows_nonnegative, "negative flow at year {operating_year} hour {hour}");
    debug_assert!(soc_in_bounds, "SoC {soc_after} outside [0, {capacity_mwh}]");

    if balance.abs() > BALANCE_TOLERANCE_MW || !flows_nonnegative || !soc_in_bounds {
        return Err(HeliosError::Dispatch(format!(
            "hourly invariant violated at operating year {operating_year}, hour {hour}"
        )));
    }
    Ok(())
}

fn aggregate_year(
    hourly: &[HourlyState],
    inputs: &DispatchInputs,
    operating_year: usize,
) -> AnnualAggregate {
    let mut solar_raw = 0.0;
    let mut curtailed = 0.0;
    let mut charged = 0.0;
    let mut discharged = 0.0;
    let mut generator = 0.0;
    let mut unmet = 0.0;
    for state in hourly {
        solar_raw += state.solar_ac_mw;
        curtailed += state.curtailed_mwh;
        charged += state.battery_charge_mwh;
        discharged += state.battery_discharge_mwh;
        generator += state.generator_mwh;
        unmet += state.unmet_mwh;
    }
    // Load served is derived from the unmet total rather than summed per
    // hour, so it cannot drift from `load · 8760` by accumulated rounding.
    let load_served = inputs.sizing.load.value() * HOURS_PER_YEAR as f64 - unmet;
    let generator_output = MegawattHours(generator);

    AnnualAggregate {
        operating_year,
        system_spec: inputs.sizing.system_spec(),
        solar_raw: MegawattHours(solar_raw),
        solar_curtailed: MegawattHours(curtailed),
        solar_net: MegawattHours(solar_raw - curtailed),
        bess_charged: MegawattHours(charged),
        bess_discharged: MegawattHours(discharged),
        generator_output,
        unmet_load: MegawattHours(unmet),
        load_served: MegawattHours(load_served),
        generator_fuel: generator_output
            .fuel_at_heat_rate(inputs.generator.heat_rate_btu_per_kwh()),
    }
}

/// Simulate all 20 operating years and keep the year-1 mid-summer week for
/// display.
pub fn simulate_lifetime(
    profile: &crate::PvProfile,
    inputs: &DispatchInputs,
) -> HeliosResult<SimulationResult> {
    info!(
        spec = %inputs.sizing.system_spec(),
        load_mw = inputs.sizing.load.value(),
        generator = %inputs.generator,
        "simulating plant lifetime"
    );

    let mut annual = Vec::with_capacity(SYSTEM_LIFETIME_YEARS);
    let mut sample_week = Vec::new();
    for operating_year in 1..=SYSTEM_LIFETIME_YEARS {
        debug!(operating_year, "simulating operating year");
        let year = simulate_year(profile, inputs, operating_year)?;
        if operating_year == 1 {
            sample_week = year.hourly
                [SAMPLE_WEEK_START_HOUR..SAMPLE_WEEK_START_HOUR + SAMPLE_WEEK_HOURS]
                .to_vec();
        }
        annual.push(year.aggregate);
    }

    Ok(SimulationResult {
        annual,
        sample_week,
    })
}
