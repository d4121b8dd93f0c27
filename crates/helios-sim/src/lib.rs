//! # helios-sim: Hourly Power-Flow Simulation
//!
//! Simulates an off-grid solar + storage + generator plant hour-by-hour over
//! its 20-year life. The engine consumes a normalized PV year (8 760 hourly
//! samples of AC output per MW-DC installed) and a sizing, and produces one
//! [`AnnualAggregate`] per operating year plus a mid-year sample week of
//! hourly states for display.
//!
//! The weather side lives behind the [`PvProfileSource`] trait: production
//! deployments plug in a TMY-backed provider, tests and the CLI use CSV
//! fixtures or [`FixedProfile`]. Given the same profile, the simulation is
//! deterministic byte-for-byte.

pub mod dispatch;
pub mod mix;
pub mod profile;

pub use dispatch::{
    simulate_lifetime, simulate_year, AnnualAggregate, DispatchInputs, HourlyState,
    SimulationResult, YearDispatch, SAMPLE_WEEK_HOURS, SAMPLE_WEEK_START_HOUR,
};
pub use mix::{lifetime_energy_mix, EnergyMix};
pub use profile::{FixedProfile, MemoizedProfiles, PvProfile, PvProfileSource};
