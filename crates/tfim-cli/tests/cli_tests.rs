//! End-to-end tests for the `tfim` binary.
//!
//! Each test runs the compiled binary and checks its exit status and output.

use std::io::Write;
use std::process::{Command, Output};

const TFIM_VARS: [&str; 14] = [
    "TFIM_CONFIG",
    "TFIM_NUM_QUBITS",
    "TFIM_COUPLING",
    "TFIM_H_MIN",
    "TFIM_H_MAX",
    "TFIM_H_STEPS",
    "TFIM_RESTARTS",
    "TFIM_MAX_ITERATIONS",
    "TFIM_TOLERANCE",
    "TFIM_INITIAL_STEP",
    "TFIM_SHOTS",
    "TFIM_SAMPLING_MODE",
    "TFIM_SAMPLING_SEED",
    "TFIM_SEED",
];

fn tfim() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tfim"));
    for var in TFIM_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn run_ok(cmd: &mut Command) -> String {
    let out = cmd.output().unwrap();
    assert!(
        out.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8(out.stdout).unwrap()
}

fn run_err(cmd: &mut Command) -> Output {
    let out = cmd.output().unwrap();
    assert!(!out.status.success());
    out
}

// ============================================================================
// energy
// ============================================================================

mod energy {
    use super::*;

    #[test]
    fn test_ghz_energy_json() {
        let stdout = run_ok(tfim().args([
            "energy",
            "--theta",
            "1.5707963267948966,0,0",
            "--field",
            "0",
            "-n",
            "3",
            "--format",
            "json",
        ]));
        let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(v["num_qubits"], 3);
        assert!((v["energy"].as_f64().unwrap() + 0.75).abs() < 1e-9);
        assert!((v["zz"].as_f64().unwrap() - 3.0).abs() < 1e-9);
        assert!((v["reference_per_site"].as_f64().unwrap() + 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_negative_theta_accepted() {
        let stdout = run_ok(tfim().args(["energy", "--theta", "-0.5,1,-2", "-f", "json"]));
        let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(v["theta"][0], -0.5);
    }

    #[test]
    fn test_table_output() {
        let stdout = run_ok(tfim().args(["energy", "--theta", "0,0,0", "--field", "1"]));
        assert!(stdout.contains("4-site ring"));
        assert!(stdout.contains("E/n"));
    }

    #[test]
    fn test_wrong_theta_length() {
        let out = run_err(tfim().args(["energy", "--theta", "0.1,0.2"]));
        assert_eq!(out.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&out.stderr);
        assert!(stderr.contains("Error:"));
        assert!(stderr.contains("expected 3, got 2"));
    }

    #[test]
    fn test_zero_qubits_rejected() {
        let out = run_err(tfim().args(["energy", "--theta", "0,0,0", "-n", "0"]));
        assert!(String::from_utf8_lossy(&out.stderr).contains("num_qubits"));
    }
}

// ============================================================================
// reference / scan
// ============================================================================

mod scan {
    use super::*;

    #[test]
    fn test_reference_curve() {
        let stdout = run_ok(tfim().args([
            "reference",
            "--h-min",
            "0",
            "--h-max",
            "1",
            "--h-steps",
            "3",
            "-f",
            "json",
        ]));
        let v: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(v[1]["field"], 0.5);
        // J' = h' = 1/4 at h = 0.5 gives -1/π
        let e = v[1]["energy_per_site"].as_f64().unwrap();
        assert!((e + std::f64::consts::FRAC_1_PI).abs() < 1e-6);
    }

    #[test]
    fn test_small_scan_json_and_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let report_path = dir.path().join("scan.json");
        let stdout = run_ok(tfim().args([
            "scan",
            "-n",
            "2",
            "--h-steps",
            "2",
            "--restarts",
            "2",
            "--max-iterations",
            "40",
            "--no-progress",
            "-f",
            "json",
            "-o",
            report_path.to_str().unwrap(),
        ]));
        let v: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let points = v["points"].as_array().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1]["field"], 2.0);
        assert_eq!(points[0]["restarts"], 2);
        assert!(points[0]["reference_per_site"].is_f64());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(written["points"], v["points"]);
    }

    #[test]
    fn test_bad_field_range() {
        let out = run_err(tfim().args(["scan", "--h-min", "2", "--h-max", "1", "--no-progress"]));
        assert!(String::from_utf8_lossy(&out.stderr).contains("h_max"));
    }
}

// ============================================================================
// config precedence
// ============================================================================

mod config {
    use super::*;

    fn effective(cmd: &mut Command) -> serde_yaml_ng::Value {
        serde_yaml_ng::from_str(&run_ok(cmd)).unwrap()
    }

    #[test]
    fn test_defaults() {
        let v = effective(tfim().arg("config"));
        assert_eq!(v["model"]["num_qubits"], 4);
        assert_eq!(v["sampling"]["mode"], "expected");
        assert_eq!(v["seed"], 42);
    }

    #[test]
    fn test_file_env_flag_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "model:\n  num_qubits: 6\n  coupling: 2.0\nscan:\n  h_steps: 5").unwrap();
        let path = file.path().to_str().unwrap();

        // file only
        let v = effective(tfim().args(["--config", path, "config"]));
        assert_eq!(v["model"]["num_qubits"], 6);
        assert_eq!(v["scan"]["h_steps"], 5);

        // env beats file
        let v = effective(
            tfim()
                .args(["--config", path, "config"])
                .env("TFIM_NUM_QUBITS", "5")
                .env("TFIM_SAMPLING_MODE", "multinomial"),
        );
        assert_eq!(v["model"]["num_qubits"], 5);
        assert_eq!(v["model"]["coupling"], 2.0);
        assert_eq!(v["sampling"]["mode"], "multinomial");

        // flag beats env
        let v = effective(
            tfim()
                .args(["--config", path, "config", "-n", "3"])
                .env("TFIM_NUM_QUBITS", "5"),
        );
        assert_eq!(v["model"]["num_qubits"], 3);
    }

    #[test]
    fn test_unparsable_env_value() {
        let out = run_err(tfim().arg("config").env("TFIM_SHOTS", "lots"));
        assert!(String::from_utf8_lossy(&out.stderr).contains("TFIM_SHOTS"));
    }

    #[test]
    fn test_missing_config_file() {
        let out = run_err(tfim().args(["--config", "/nonexistent/tfim.yaml", "config"]));
        assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load config"));
    }
}
