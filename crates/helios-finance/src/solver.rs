//! Newton iteration for the levelized cost of electricity.
//!
//! The LCOE is the energy price at which the NPV of after-tax equity cash
//! flow is zero. `NPV(L)` is affine in `L` (revenue is linear in the price
//! and taxes are linear in revenue), so the guarded Newton below lands in
//! two or three iterations; the guards exist for the degenerate inputs, not
//! for convergence speed.

use helios_core::{DollarsPerMwh, HeliosError, HeliosResult, RunConfig};
use helios_sim::AnnualAggregate;
use tracing::{debug, warn};

use crate::proforma::ProForma;

/// Soft bracket used to seed the iteration, $/MWh.
const LCOE_LOWER_BOUND: f64 = 50.0;
const LCOE_UPPER_BOUND: f64 = 300.0;

/// Convergence tolerance on the equity NPV, $M.
const NPV_TOLERANCE: f64 = 1e-4;

const MAX_ITERATIONS: usize = 10_000;

/// Relative step for the finite-difference derivative.
const DERIVATIVE_STEP: f64 = 0.001;

/// A solved LCOE with the pro-forma built at that price.
#[derive(Debug, Clone)]
pub struct LcoeSolution {
    pub lcoe: DollarsPerMwh,
    pub iterations: usize,
    /// False when the iteration budget ran out; the LCOE is then the last
    /// guess rather than a root.
    pub converged: bool,
    pub proforma: ProForma,
}

/// Find the LCOE at which the equity NPV is zero.
///
/// Errors only when the problem cannot be posed: invalid aggregates, CAPEX
/// that fails validation, or an NPV that does not respond to the price at
/// all (a plant serving no load). Running out of iterations is *not* an
/// error; the solution comes back flagged `converged: false`.
pub fn solve_lcoe(config: &RunConfig, annual: &[AnnualAggregate]) -> HeliosResult<LcoeSolution> {
    let mut guess = (LCOE_LOWER_BOUND + LCOE_UPPER_BOUND) / 2.0;

    let mut proforma = ProForma::build(config, annual, guess)?;
    for iteration in 1..=MAX_ITERATIONS {
        let npv = proforma.equity_npv();
        debug!(iteration, lcoe = guess, npv, "lcoe newton step");

        if npv.abs() < NPV_TOLERANCE {
            return Ok(LcoeSolution {
                lcoe: DollarsPerMwh(guess),
                iterations: iteration,
                converged: true,
                proforma,
            });
        }

        let step = guess * DERIVATIVE_STEP;
        let shifted = ProForma::build(config, annual, guess + step)?.equity_npv();
        let derivative = (shifted - npv) / step;
        if derivative.abs() < f64::EPSILON {
            return Err(HeliosError::Solver(
                "equity NPV does not respond to the energy price; is any load served?".into(),
            ));
        }

        let proposed = guess - npv / derivative;
        // Halve instead of jumping below zero; the root is a price.
        guess = if proposed <= 0.0 { guess / 2.0 } else { proposed };
        proforma = ProForma::build(config, annual, guess)?;
    }

    warn!(
        lcoe = guess,
        "lcoe solver exhausted {MAX_ITERATIONS} iterations without converging"
    );
    Ok(LcoeSolution {
        lcoe: DollarsPerMwh(guess),
        iterations: MAX_ITERATIONS,
        converged: false,
        proforma,
    })
}
