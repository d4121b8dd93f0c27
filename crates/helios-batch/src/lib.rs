//! # helios-batch: Ensemble Fan-out and Pareto Reduction
//!
//! Runs a grid of `(site, sizing)` cases through dispatch → pro-forma →
//! LCOE solve on a bounded thread pool, records `(LCOE, renewable %)` per
//! case, reduces the successes to the Pareto frontier, and writes the raw
//! and frontier CSV reports.
//!
//! Cases share nothing mutable except the memoized PV-profile cache, so
//! results are independent of scheduling order; a failed case is recorded
//! with its error and never takes the batch down.

pub mod case;
pub mod pareto;
pub mod report;
pub mod runner;
pub mod spec;

pub use case::{cases_from_grid, CaseOutcome, EnsembleCase};
pub use pareto::pareto_frontier;
pub use report::{write_reports, ReportPaths};
pub use runner::{run_ensemble, EnsembleRunnerConfig, EnsembleSummary, DEFAULT_CONCURRENCY};
pub use spec::{load_spec_from_path, EnsembleSpec};
