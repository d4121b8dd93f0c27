//! Pareto frontier on (renewable %, LCOE).
//!
//! A configuration is on the frontier when no other evaluated configuration
//! beats it in both dimensions at once: cheaper *and* more renewable (right
//! of the cost minimum), or cheaper *and* less renewable (left of it).
//!
//! The sweep splits at the global LCOE minimum and walks outward on each
//! side, keeping a point only while its LCOE stays at or below the best
//! LCOE among the strictly more extreme renewable shares already seen.

use crate::case::CaseOutcome;

/// Reduce outcomes to the Pareto-optimal subset, sorted by renewable share.
/// Failed cases are ignored; fewer than two successes pass through as-is.
pub fn pareto_frontier(outcomes: &[CaseOutcome]) -> Vec<CaseOutcome> {
    let mut successes: Vec<&CaseOutcome> = outcomes
        .iter()
        .filter(|o| o.is_success() && o.lcoe.is_some() && o.renewable_pct.is_some())
        .collect();
    successes.sort_by(|a, b| {
        a.renewable_pct
            .partial_cmp(&b.renewable_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if successes.len() < 2 {
        return successes.into_iter().cloned().collect();
    }

    let lcoe = |outcome: &CaseOutcome| outcome.lcoe.unwrap_or(f64::INFINITY);
    let renewable = |outcome: &CaseOutcome| outcome.renewable_pct.unwrap_or(0.0);

    // Global cost minimum anchors the frontier.
    let min_index = successes
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            lcoe(a)
                .partial_cmp(&lcoe(b))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| index)
        .unwrap_or(0);
    let min_point = successes[min_index];

    // Right side: walk down from the most renewable point toward the
    // minimum, keeping points not undercut by anything more renewable.
    let mut right: Vec<&CaseOutcome> = Vec::new();
    let mut best_right = f64::INFINITY;
    for point in successes[min_index + 1..].iter().rev() {
        if renewable(point) <= renewable(min_point) {
            continue;
        }
        if lcoe(point) <= best_right {
            right.push(point);
        }
        best_right = best_right.min(lcoe(point));
    }
    right.reverse();

    // Left side, mirrored.
    let mut left: Vec<&CaseOutcome> = Vec::new();
    let mut best_left = f64::INFINITY;
    for point in successes[..min_index].iter() {
        if renewable(point) >= renewable(min_point) {
            continue;
        }
        if lcoe(point) <= best_left {
            left.push(point);
        }
        best_left = best_left.min(lcoe(point));
    }

    let mut frontier: Vec<CaseOutcome> = Vec::with_capacity(left.len() + right.len() + 1);
    frontier.extend(left.into_iter().cloned());
    frontier.push(min_point.clone());
    frontier.extend(right.into_iter().cloned());
    frontier
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::EnsembleCase;
    use helios_core::{GeneratorKind, Site, SystemSizing};

    fn outcome(renewable_pct: f64, lcoe: f64) -> CaseOutcome {
        let case = EnsembleCase {
            site: Site::new(31.9, -106.2),
            sizing: SystemSizing::new(renewable_pct, 0.0, 125.0, 100.0),
            generator: GeneratorKind::GasEngine,
        };
        CaseOutcome::success(case, lcoe, renewable_pct)
    }

    fn shares(frontier: &[CaseOutcome]) -> Vec<f64> {
        frontier.iter().map(|o| o.renewable_pct.unwrap()).collect()
    }

    #[test]
    fn test_dominated_points_dropped() {
        // (30%, 95) dominates (20%, 110): more renewable and cheaper.
        let outcomes = vec![
            outcome(10.0, 100.0),
            outcome(20.0, 110.0),
            outcome(30.0, 95.0),
            outcome(60.0, 120.0),
            outcome(90.0, 160.0),
        ];
        let frontier = pareto_frontier(&outcomes);
        assert_eq!(shares(&frontier), vec![10.0, 30.0, 60.0, 90.0]);
    }

    #[test]
    fn test_left_side_kept_when_cheaper_toward_less_renewable() {
        // Minimum sits mid-curve; left points only survive if nothing less
        // renewable is also cheaper.
        let outcomes = vec![
            outcome(5.0, 120.0),
            outcome(15.0, 105.0),
            outcome(25.0, 130.0), // dominated by (15, 105)
            outcome(40.0, 90.0),  // global minimum
            outcome(70.0, 110.0),
        ];
        let frontier = pareto_frontier(&outcomes);
        assert_eq!(shares(&frontier), vec![5.0, 15.0, 40.0, 70.0]);
    }

    #[test]
    fn test_monotone_curve_survives_whole() {
        let outcomes: Vec<CaseOutcome> = (0..6)
            .map(|i| outcome(i as f64 * 15.0, 90.0 + i as f64 * 10.0))
            .collect();
        let frontier = pareto_frontier(&outcomes);
        assert_eq!(frontier.len(), 6);
    }

    #[test]
    fn test_failures_excluded() {
        let case = EnsembleCase {
            site: Site::new(31.9, -106.2),
            sizing: SystemSizing::new(0.0, 0.0, 125.0, 100.0),
            generator: GeneratorKind::GasEngine,
        };
        let outcomes = vec![
            outcome(10.0, 100.0),
            CaseOutcome::failure(case, "weather"),
            outcome(50.0, 130.0),
        ];
        let frontier = pareto_frontier(&outcomes);
        assert_eq!(frontier.len(), 2);
        assert!(frontier.iter().all(|o| o.is_success()));
    }

    #[test]
    fn test_single_point_passthrough() {
        let outcomes = vec![outcome(42.0, 99.0)];
        let frontier = pareto_frontier(&outcomes);
        assert_eq!(frontier.len(), 1);
    }

    #[test]
    fn test_output_sorted_by_renewable_share() {
        let outcomes = vec![
            outcome(80.0, 150.0),
            outcome(10.0, 100.0),
            outcome(45.0, 95.0),
        ];
        let frontier = pareto_frontier(&outcomes);
        let ordered = shares(&frontier);
        let mut sorted = ordered.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(ordered, sorted);
    }
}
