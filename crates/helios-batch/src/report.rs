//! Timestamped ensemble reports.
//!
//! Two CSVs per run: `ensemble_results_raw_<ts>.csv` with every case
//! (including failures, so a rerun can see what broke) and
//! `ensemble_results_pareto_<ts>.csv` with the frontier only. A small JSON
//! summary sits next to them for downstream tooling.

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::case::CaseOutcome;
use crate::runner::EnsembleSummary;

/// Where one run's reports landed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportPaths {
    pub raw: PathBuf,
    pub pareto: PathBuf,
    pub summary: PathBuf,
}

#[derive(Debug, Serialize, Deserialize)]
struct SummaryFile {
    created_at: String,
    num_cases: usize,
    success: usize,
    failure: usize,
    pareto_points: usize,
}

/// Write raw, pareto, and summary files into `output_dir`, sharing one
/// timestamp so the three artifacts of a run sort together.
pub fn write_reports(
    output_dir: &Path,
    summary: &EnsembleSummary,
    frontier: &[CaseOutcome],
) -> Result<ReportPaths> {
    fs::create_dir_all(output_dir).with_context(|| {
        format!("creating report directory '{}'", output_dir.display())
    })?;

    let stamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let raw = output_dir.join(format!("ensemble_results_raw_{stamp}.csv"));
    let pareto = output_dir.join(format!("ensemble_results_pareto_{stamp}.csv"));
    let summary_path = output_dir.join(format!("ensemble_summary_{stamp}.json"));

    write_outcomes(&raw, &summary.outcomes, &stamp)?;
    write_outcomes(&pareto, frontier, &stamp)?;

    let summary_file = SummaryFile {
        created_at: stamp,
        num_cases: summary.outcomes.len(),
        success: summary.success,
        failure: summary.failure,
        pareto_points: frontier.len(),
    };
    let json = serde_json::to_string_pretty(&summary_file)
        .context("serializing ensemble summary to JSON")?;
    fs::write(&summary_path, json)
        .with_context(|| format!("writing ensemble summary '{}'", summary_path.display()))?;

    Ok(ReportPaths {
        raw,
        pareto,
        summary: summary_path,
    })
}

fn write_outcomes(path: &Path, outcomes: &[CaseOutcome], stamp: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating report '{}'", path.display()))?;

    writer
        .write_record([
            "timestamp",
            "lat",
            "long",
            "system_spec",
            "solar_pv_capacity_mw",
            "bess_max_power_mw",
            "generator_capacity_mw",
            "lcoe",
            "renewable_percentage",
            "status",
        ])
        .context("writing report header")?;

    for outcome in outcomes {
        let sizing = &outcome.case.sizing;
        writer
            .write_record([
                stamp.to_string(),
                format!("{}", outcome.case.site.latitude_deg),
                format!("{}", outcome.case.site.longitude_deg),
                outcome.system_spec.clone(),
                format!("{:.0}", sizing.solar_dc.value()),
                format!("{:.0}", sizing.bess_power.value()),
                format!("{:.0}", sizing.generator.value()),
                outcome.lcoe.map(|v| format!("{v:.4}")).unwrap_or_default(),
                outcome
                    .renewable_pct
                    .map(|v| format!("{v:.4}"))
                    .unwrap_or_default(),
                outcome.status.clone(),
            ])
            .with_context(|| format!("writing report row to '{}'", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flushing report '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::case::EnsembleCase;
    use helios_core::{GeneratorKind, Site, SystemSizing};
    use tempfile::tempdir;

    fn summary() -> EnsembleSummary {
        let case = |solar: f64, lcoe: Option<f64>| {
            let case = EnsembleCase {
                site: Site::new(31.76, -106.49),
                sizing: SystemSizing::new(solar, 100.0, 125.0, 100.0),
                generator: GeneratorKind::GasEngine,
            };
            match lcoe {
                Some(lcoe) => CaseOutcome::success(case, lcoe, 55.0),
                None => CaseOutcome::failure(case, "weather unavailable"),
            }
        };
        let outcomes = vec![case(100.0, Some(112.5)), case(200.0, None)];
        EnsembleSummary {
            success: 1,
            failure: 1,
            outcomes,
        }
    }

    #[test]
    fn test_reports_written_and_named() {
        let dir = tempdir().unwrap();
        let summary = summary();
        let frontier: Vec<CaseOutcome> = summary
            .outcomes
            .iter()
            .filter(|o| o.is_success())
            .cloned()
            .collect();

        let paths = write_reports(dir.path(), &summary, &frontier).unwrap();
        let raw_name = paths.raw.file_name().unwrap().to_string_lossy().to_string();
        assert!(raw_name.starts_with("ensemble_results_raw_"));
        assert!(raw_name.ends_with(".csv"));
        assert!(paths
            .pareto
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("ensemble_results_pareto_"));

        let raw_text = fs::read_to_string(&paths.raw).unwrap();
        assert!(raw_text.lines().count() == 3); // header + 2 cases
        assert!(raw_text.contains("112.5000"));
        assert!(raw_text.contains("error: weather unavailable"));

        let pareto_text = fs::read_to_string(&paths.pareto).unwrap();
        assert!(pareto_text.lines().count() == 2); // header + 1 point

        let summary_text = fs::read_to_string(&paths.summary).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&summary_text).unwrap();
        assert_eq!(parsed["success"], 1);
        assert_eq!(parsed["failure"], 1);
        assert_eq!(parsed["pareto_points"], 1);
    }
}
