//! Parallel execution of an ensemble.
//!
//! Each case runs the full chain (lifetime dispatch, pro-forma, LCOE solve)
//! independently; the only shared resource is the read-mostly profile
//! cache. The pool is bounded so a large grid cannot saturate the upstream
//! weather provider.

use anyhow::{Context, Result};
use helios_core::RunConfig;
use helios_finance::solve_lcoe;
use helios_sim::{lifetime_energy_mix, simulate_lifetime, DispatchInputs, PvProfileSource};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use tracing::{error, info};

use crate::case::{CaseOutcome, EnsembleCase};

/// Default bound on concurrently running cases.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Ensemble settings: the case list and the concurrency bound.
#[derive(Debug, Clone)]
pub struct EnsembleRunnerConfig {
    pub cases: Vec<EnsembleCase>,
    /// Worker threads; 0 means one per CPU.
    pub threads: usize,
}

impl EnsembleRunnerConfig {
    pub fn new(cases: Vec<EnsembleCase>) -> Self {
        Self {
            cases,
            threads: DEFAULT_CONCURRENCY,
        }
    }
}

/// Outcomes in input order plus success/failure counts.
#[derive(Debug, Clone)]
pub struct EnsembleSummary {
    pub outcomes: Vec<CaseOutcome>,
    pub success: usize,
    pub failure: usize,
}

/// Run every case, in parallel, never failing the batch for a failing case.
pub fn run_ensemble<S: PvProfileSource>(
    config: &EnsembleRunnerConfig,
    profiles: &S,
) -> Result<EnsembleSummary> {
    let thread_count = if config.threads == 0 {
        num_cpus::get()
    } else {
        config.threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(thread_count)
        .build()
        .context("building thread pool for ensemble runs")?;

    let total = config.cases.len();
    info!(total, threads = thread_count, "starting ensemble");

    let outcomes: Vec<CaseOutcome> = pool.install(|| {
        config
            .cases
            .par_iter()
            .enumerate()
            .map(|(index, case)| {
                let outcome = run_case(case, profiles);
                match (outcome.lcoe, outcome.renewable_pct) {
                    (Some(lcoe), Some(renewable)) => info!(
                        case = index + 1,
                        total,
                        spec = %outcome.system_spec,
                        lcoe,
                        renewable,
                        "case complete"
                    ),
                    _ => error!(
                        case = index + 1,
                        total,
                        spec = %outcome.system_spec,
                        status = %outcome.status,
                        "case failed"
                    ),
                }
                outcome
            })
            .collect()
    });

    let success = outcomes.iter().filter(|o| o.is_success()).count();
    let failure = outcomes.len() - success;
    info!(success, failure, "ensemble finished");

    Ok(EnsembleSummary {
        outcomes,
        success,
        failure,
    })
}

fn run_case<S: PvProfileSource>(case: &EnsembleCase, profiles: &S) -> CaseOutcome {
    let attempt = || -> helios_core::HeliosResult<(f64, f64)> {
        let config = RunConfig::defaults_for(case.site, case.sizing, case.generator);
        config.validate()?;

        let profile = profiles.normalized_profile(&case.site)?;
        let inputs = DispatchInputs::new(case.sizing, case.generator);
        let simulation = simulate_lifetime(&profile, &inputs)?;
        let mix = lifetime_energy_mix(&simulation.annual)?;
        let solution = solve_lcoe(&config, &simulation.annual)?;
        Ok((solution.lcoe.value(), mix.renewable_pct))
    };

    match attempt() {
        Ok((lcoe, renewable_pct)) => CaseOutcome::success(case.clone(), lcoe, renewable_pct),
        Err(err) => CaseOutcome::failure(case.clone(), err),
    }
}
