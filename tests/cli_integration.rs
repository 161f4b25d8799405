//! End-to-end runs of the `wds-tariff-sim` binary.

use std::path::Path;
use std::process::{Command, Output};

fn run(args: &[&str], out: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wds-tariff-sim"))
        .args(args)
        .arg("--out")
        .arg(out)
        .output()
        .expect("wds-tariff-sim process should run")
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{what} failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn tariffs_command_exports_both_tariff_sets() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["tariffs", "--preset", "quick"], dir.path());
    assert_success(&output, "tariffs");

    let energy = std::fs::read_to_string(dir.path().join("energy_tariffs.csv")).unwrap();
    let header = energy.lines().next().unwrap();
    assert!(header.starts_with("hour,Flat,Symmetric,Opposite"), "{header}");
    assert_eq!(energy.lines().count(), 25);
    assert!(dir.path().join("water_tariffs.csv").exists());
    assert!(dir.path().join("original_demands.csv").exists());
}

#[test]
fn detail_command_prints_kpi_report() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(
        &[
            "detail",
            "--preset",
            "quick",
            "--mode",
            "elasticity",
            "--tariff",
            "Opposite",
            "--elasticity",
            "0.4",
        ],
        dir.path(),
    );
    assert_success(&output, "detail");

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- KPI Report (E=0.4) ---"), "{stdout}");
    for name in ["hourly", "summary", "response", "sorted_hours", "new_demands"] {
        let path = dir.path().join(format!("detail_{name}.csv"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(dir.path().join("detail_summary.json").exists());
}

#[test]
fn fixed_command_writes_sweep_tables() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["fixed", "--preset", "quick"], dir.path());
    assert_success(&output, "fixed");

    let savings =
        std::fs::read_to_string(dir.path().join("fixed_cost_savings_percentage.csv")).unwrap();
    let mut lines = savings.lines();
    assert!(lines.next().unwrap().starts_with("scenario,Flat"));
    // quick preset: 3 settings x 4 uptakes
    assert_eq!(lines.count(), 12);
    assert!(dir.path().join("fixed_detail_hourly.csv").exists());
}

#[test]
fn all_command_counts_signs_over_three_programmes() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["all", "--preset", "quick"], dir.path());
    assert_success(&output, "all");

    for prefix in ["fixed", "same_tariff", "elasticity"] {
        let path = dir.path().join(format!("{prefix}_net_increase_percentage.csv"));
        assert_eq!(path.exists(), prefix != "fixed", "{}", path.display());
        let path = dir.path().join(format!("{prefix}_cost_savings_percentage.csv"));
        assert!(path.exists(), "missing {}", path.display());
    }
    assert!(dir.path().join("discussion_same_tariff_by_elasticity.csv").exists());

    let counts =
        std::fs::read_to_string(dir.path().join("discussion_sign_counts.csv")).unwrap();
    let programmes: Vec<&str> = counts
        .lines()
        .skip(1)
        .filter_map(|l| l.split(',').next())
        .collect();
    assert_eq!(programmes, ["fixed", "same_tariff", "elasticity", "total"]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Same tariff:"), "{stdout}");
}

#[test]
fn unknown_preset_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["tariffs", "--preset", "nope"], dir.path());
    assert!(!output.status.success());
}

#[test]
fn invalid_scenario_file_fails_with_field_errors() {
    let dir = tempfile::tempdir().unwrap();
    let scenario = dir.path().join("bad.toml");
    std::fs::write(&scenario, "[fixed]\nsettings = [13]\nuptake_step = 0.0\n").unwrap();

    let output = run(&["fixed", "--scenario", scenario.to_str().unwrap()], dir.path());
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fixed.settings"), "{stderr}");
    assert!(stderr.contains("fixed.uptake_step"), "{stderr}");
}

#[test]
fn exported_tariffs_can_be_read_back() {
    let dir = tempfile::tempdir().unwrap();
    assert_success(&run(&["tariffs", "--preset", "quick"], dir.path()), "tariffs");

    let csv = dir.path().join("energy_tariffs.csv");
    let detail_dir = dir.path().join("detail");
    let output = run(
        &[
            "detail",
            "--preset",
            "quick",
            "--energy-tariffs",
            csv.to_str().unwrap(),
            "--tariff",
            "Random 2",
            "--setting",
            "3",
            "--uptake",
            "0.4",
        ],
        &detail_dir,
    );
    assert_success(&output, "detail with imported tariffs");
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("--- KPI Report (S=3 X=0.4) ---"), "{stdout}");
}

/// Writes a two-tariff CSV (`Flat`, `Peaky`) and a small scenario whose
/// detail runs use `detail_tariff`.
fn imported_tariff_scenario(dir: &Path, detail_tariff: &str) -> (String, String) {
    let mut csv = String::from("hour,Flat,Peaky\n");
    for hour in 0..24 {
        let peaky = if (8..20).contains(&hour) { 1.5 } else { 0.5 };
        csv.push_str(&format!("{hour},1.0,{peaky}\n"));
    }
    let tariffs = dir.join("tariffs.csv");
    std::fs::write(&tariffs, csv).unwrap();

    let scenario = dir.join("imported.toml");
    std::fs::write(
        &scenario,
        format!(
            "[fixed]\nsettings = [2]\nuptake_step = 0.5\ndetail_tariff = \"{detail_tariff}\"\n\
             detail_setting = 2\n\n[elasticity]\nstep = 0.5\nmax = 0.5\n\
             detail_tariff = \"{detail_tariff}\"\n"
        ),
    )
    .unwrap();
    (
        scenario.to_str().unwrap().to_string(),
        tariffs.to_str().unwrap().to_string(),
    )
}

#[test]
fn imported_tariff_can_be_the_detail_tariff() {
    let dir = tempfile::tempdir().unwrap();
    let (scenario, tariffs) = imported_tariff_scenario(dir.path(), "Peaky");
    let out = dir.path().join("out");

    for command in ["fixed", "elasticity"] {
        let output = run(
            &[command, "--scenario", &scenario, "--energy-tariffs", &tariffs],
            &out,
        );
        assert_success(&output, command);
    }
    let savings =
        std::fs::read_to_string(out.join("fixed_cost_savings_percentage.csv")).unwrap();
    assert!(savings.starts_with("scenario,Flat,Peaky"), "{savings}");
    assert!(out.join("elasticity_detail_summary.csv").exists());
}

#[test]
fn unknown_detail_tariff_fails_before_sweeping() {
    let dir = tempfile::tempdir().unwrap();
    let (scenario, tariffs) = imported_tariff_scenario(dir.path(), "Symmetric");
    let out = dir.path().join("out");

    let output = run(
        &["fixed", "--scenario", &scenario, "--energy-tariffs", &tariffs],
        &out,
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("fixed.detail_tariff"), "{stderr}");
    assert!(!out.join("fixed_cost_savings_percentage.csv").exists());
}
