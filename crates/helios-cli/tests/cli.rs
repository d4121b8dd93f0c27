use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const HOURS_PER_YEAR: usize = 8760;

/// A crude but valid normalized year: 12 daylight hours at the given level.
fn write_profile(day_level: f64) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for hour in 0..HOURS_PER_YEAR {
        let value = if hour % 24 < 12 { day_level } else { 0.0 };
        writeln!(file, "{value}").unwrap();
    }
    file.flush().unwrap();
    file
}

fn write_simulation_trace() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Location,System Spec,Operating Year,Solar Output - Net (MWh),BESS charged (MWh),BESS discharged (MWh),Generator Output (MWh),Load Served (MWh)"
    )
    .unwrap();
    for year in 1..=20 {
        writeln!(
            file,
            "El Paso,500MW | 100MW | 100MW,{year},\"950,000\",\"120,000\",\"110,400\",\"150,000\",\"876,000\""
        )
        .unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn lcoe_from_profile_prints_price() {
    let profile = write_profile(0.9);
    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "lcoe",
            "--lat",
            "31.9",
            "--long",
            "-106.2",
            "--solar-mw",
            "500",
            "--bess-mw",
            "100",
            "--generator-mw",
            "100",
            "--load-mw",
            "100",
        ])
        .arg("--pv-profile")
        .arg(profile.path())
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^LCOE: \$\d+\.\d{2}/MWh\n$").unwrap());
}

#[test]
fn lcoe_from_simulation_trace_bypasses_dispatch() {
    let trace = write_simulation_trace();
    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "lcoe",
            "--lat",
            "31.9",
            "--long",
            "-106.2",
            "--solar-mw",
            "500",
            "--bess-mw",
            "100",
            "--generator-mw",
            "100",
            "--location",
            "El Paso",
        ])
        .arg("--simulation-data")
        .arg(trace.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("LCOE: $"));
}

#[test]
fn unknown_trace_case_fails_before_solving() {
    let trace = write_simulation_trace();
    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "lcoe",
            "--lat",
            "31.9",
            "--long",
            "-106.2",
            "--solar-mw",
            "750",
            "--bess-mw",
            "100",
            "--generator-mw",
            "100",
            "--location",
            "El Paso",
        ])
        .arg("--simulation-data")
        .arg(trace.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching simulation data"));
}

#[test]
fn invalid_leverage_is_a_config_error() {
    let profile = write_profile(0.9);
    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "lcoe",
            "--lat",
            "31.9",
            "--long",
            "-106.2",
            "--solar-mw",
            "500",
            "--bess-mw",
            "100",
            "--generator-mw",
            "100",
            "--leverage-pct",
            "150",
        ])
        .arg("--pv-profile")
        .arg(profile.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("leverage"));
}

#[test]
fn deleveraging_raises_the_printed_price() {
    let profile = write_profile(0.9);
    let solve = |extra: &[&str]| -> f64 {
        let output = Command::cargo_bin("helios")
            .unwrap()
            .args([
                "lcoe",
                "--lat",
                "31.9",
                "--long",
                "-106.2",
                "--solar-mw",
                "250",
                "--bess-mw",
                "100",
                "--generator-mw",
                "125",
            ])
            .arg("--pv-profile")
            .arg(profile.path())
            .args(extra)
            .output()
            .unwrap();
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout).unwrap();
        stdout
            .trim()
            .strip_prefix("LCOE: $")
            .and_then(|rest| rest.strip_suffix("/MWh"))
            .unwrap()
            .parse()
            .unwrap()
    };

    let leveraged = solve(&[]);
    let unleveraged = solve(&["--leverage-pct", "0"]);
    assert!(unleveraged > leveraged);
}

#[test]
fn proforma_export_is_valid_json() {
    let profile = write_profile(0.9);
    let dir = tempdir().unwrap();
    let out = dir.path().join("proforma.json");

    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "lcoe",
            "--lat",
            "31.9",
            "--long",
            "-106.2",
            "--solar-mw",
            "500",
            "--bess-mw",
            "100",
            "--generator-mw",
            "100",
        ])
        .arg("--pv-profile")
        .arg(profile.path())
        .arg("--proforma-out")
        .arg(&out)
        .assert()
        .success();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(json["construction_years"], serde_json::json!([-1, 0]));
    assert!(json["npv"]["after_tax_equity_cash_flow"].is_number());
    // Rates have no NPV.
    assert!(json["npv"]["fuel_unit_cost"].is_null());
}

#[test]
fn ensemble_accepts_a_spec_file() {
    let profile = write_profile(0.9);
    let dir = tempdir().unwrap();
    let spec = dir.path().join("sweep.yaml");
    std::fs::write(
        &spec,
        "site: { latitude_deg: 31.76, longitude_deg: -106.49 }\n\
         solar_mw: [0, 400]\n\
         bess_mw: [0]\n\
         generator_mw: [125]\n\
         threads: 2\n",
    )
    .unwrap();

    Command::cargo_bin("helios")
        .unwrap()
        .arg("ensemble")
        .arg("--spec")
        .arg(&spec)
        .arg("--pv-profile")
        .arg(profile.path())
        .arg("--out")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("2 succeeded, 0 failed"));
}

#[test]
fn ensemble_writes_both_reports() {
    let profile = write_profile(0.9);
    let dir = tempdir().unwrap();

    Command::cargo_bin("helios")
        .unwrap()
        .args([
            "ensemble",
            "--lat",
            "31.76",
            "--long",
            "-106.49",
            "--solar-mw",
            "0,400",
            "--bess-mw",
            "0,100",
            "--generator-mw",
            "125",
            "--threads",
            "2",
        ])
        .arg("--pv-profile")
        .arg(profile.path())
        .arg("--out")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("4 succeeded, 0 failed"));

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert!(names
        .iter()
        .any(|name| name.starts_with("ensemble_results_raw_")));
    assert!(names
        .iter()
        .any(|name| name.starts_with("ensemble_results_pareto_")));
}
