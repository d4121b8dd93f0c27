use anyhow::{Context, Result};
use tracing::info;

use helios_batch::{
    cases_from_grid, load_spec_from_path, pareto_frontier, run_ensemble, write_reports,
    EnsembleCase, EnsembleRunnerConfig,
};
use helios_core::{GeneratorKind, Site};
use helios_io::CsvProfileSource;
use helios_sim::MemoizedProfiles;

use crate::cli::EnsembleArgs;

pub fn handle(args: &EnsembleArgs) -> Result<()> {
    let (cases, threads) = build_sweep(args)?;
    info!(cases = cases.len(), threads, "ensemble sweep");

    let profiles = MemoizedProfiles::new(CsvProfileSource::new(&args.pv_profile));
    let runner_config = EnsembleRunnerConfig { cases, threads };
    let summary = run_ensemble(&runner_config, &profiles)?;
    let frontier = pareto_frontier(&summary.outcomes);
    let paths = write_reports(&args.out, &summary, &frontier)?;

    println!(
        "Ensemble complete: {} succeeded, {} failed, {} Pareto-optimal",
        summary.success,
        summary.failure,
        frontier.len()
    );
    println!("Raw results: {}", paths.raw.display());
    println!("Pareto frontier: {}", paths.pareto.display());
    Ok(())
}

/// The case grid, from a spec file when given, otherwise from the flags.
fn build_sweep(args: &EnsembleArgs) -> Result<(Vec<EnsembleCase>, usize)> {
    if let Some(path) = &args.spec {
        let spec = load_spec_from_path(path)?;
        info!(path = %path.display(), site = %spec.site, "loaded ensemble spec");
        return Ok((spec.cases(), spec.threads));
    }

    let lat = args.lat.context("either --spec or --lat is required")?;
    let longitude = args
        .longitude
        .context("either --spec or --long is required")?;
    let site = Site::new(lat, longitude);
    let generator: GeneratorKind = args.generator_type.parse()?;
    let cases = cases_from_grid(
        site,
        &args.solar_mw,
        &args.bess_mw,
        &args.generator_mw,
        args.load_mw,
        generator,
    );
    Ok((cases, args.threads))
}
