//! CLI tests.
//!
//! Drive the `ising` binary end to end and check its JSON output, config
//! layering, and error paths.

use std::io::Write;
use std::process::{Command, Output};

fn ising(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ising"))
        .args(args)
        .env_remove("ISING_SEED")
        .output()
        .expect("failed to run ising binary")
}

fn json_stdout(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

// ============================================================================
// build
// ============================================================================

mod build {
    use super::*;

    #[test]
    fn test_build_json_short_sweep() {
        let out = ising(&[
            "build", "-n", "4", "--j", "0.1", "--steps", "200", "--time", "20.1", "-f", "json",
        ]);
        let report = json_stdout(&out);
        assert_eq!(report["num_qubits"], 3);
        assert_eq!(report["step_count"], 10);
        assert_eq!(report["op_counts"]["mc_unitary"], 10);
        assert!(report["op_counts"].get("measure").is_none());
    }

    #[test]
    fn test_build_defaults_to_half_sweep() {
        let report = json_stdout(&ising(&["build", "--format", "json"]));
        assert_eq!(report["step_count"], 1200);
        assert_eq!(report["params"]["total_time"], 240.1);
    }

    #[test]
    fn test_build_largest_schedule_without_coupling() {
        let report = json_stdout(&ising(&[
            "build", "--j", "0", "--steps", "18446744073709551615", "-f", "json",
        ]));
        assert_eq!(report["step_count"], 0);
        assert!(report["dt"].as_f64().unwrap() > 0.0);
    }

    #[test]
    fn test_build_with_measurement() {
        let report = json_stdout(&ising(&[
            "build", "--steps", "20", "--time", "2.1", "--measure", "x", "-f", "json",
        ]));
        assert_eq!(report["op_counts"]["measure"], 1);
        let ops = report["sequence"]["ops"].as_array().unwrap();
        assert_eq!(ops.last().unwrap()["label"], "x");
    }

    #[test]
    fn test_build_table_lists_ops() {
        let out = ising(&["build", "-n", "2", "--steps", "4", "--time", "0.5", "--list"]);
        assert!(out.status.success());
        let text = String::from_utf8_lossy(&out.stdout);
        assert!(text.contains("shiftu q0, q1"));
        assert!(text.contains("mc_unitary"));
    }
}

// ============================================================================
// Config files
// ============================================================================

mod config {
    use super::*;

    #[test]
    fn test_yaml_config_with_flag_override() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "n: 16\nj: 0.5\nsteps: 100\ntotal_time: 10.1").unwrap();
        let path = file.path().to_str().unwrap();

        let report = json_stdout(&ising(&["build", "-c", path, "--j", "1.0", "-f", "json"]));
        assert_eq!(report["params"]["n"], 16);
        assert_eq!(report["num_qubits"], 5);
        assert_eq!(report["step_count"], 50);
    }

    #[test]
    fn test_json_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"n": 1, "steps": 10, "total_time": 1.1}}"#).unwrap();
        let path = file.path().to_str().unwrap();

        let report = json_stdout(&ising(&["build", "--config", path, "-f", "json"]));
        assert_eq!(report["num_qubits"], 1);
        assert_eq!(report["step_count"], 5);
    }

    #[test]
    fn test_unknown_config_key_fails() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        writeln!(file, "spins: 4").unwrap();
        let out = ising(&["build", "-c", file.path().to_str().unwrap()]);
        assert!(!out.status.success());
    }
}

// ============================================================================
// simulate and sweep
// ============================================================================

mod execution {
    use super::*;

    #[test]
    fn test_simulate_seeded_is_reproducible() {
        let args = [
            "simulate", "--steps", "200", "--time", "20.1", "--j", "0.1", "-t", "2", "--seed",
            "5", "-f", "json",
        ];
        let a = json_stdout(&ising(&args));
        let b = json_stdout(&ising(&args));
        assert_eq!(a, b);
        assert_eq!(a["mode"], "magnetization");
    }

    #[test]
    fn test_simulate_shots() {
        let report = json_stdout(&ising(&[
            "simulate", "--steps", "200", "--time", "20.1", "--j", "0.1", "-s", "40", "--seed",
            "1", "-f", "json",
        ]));
        assert_eq!(report["mode"], "shots");
        let total: u64 = report["counts"]
            .as_object()
            .unwrap()
            .values()
            .map(|v| v.as_u64().unwrap())
            .sum();
        assert_eq!(total, 40);
    }

    #[test]
    fn test_seed_from_environment() {
        let run = || {
            Command::new(env!("CARGO_BIN_EXE_ising"))
                .args(["simulate", "--steps", "50", "--time", "5.1", "-s", "10", "-f", "json"])
                .env("ISING_SEED", "17")
                .output()
                .unwrap()
        };
        assert_eq!(json_stdout(&run()), json_stdout(&run()));
    }

    #[test]
    fn test_sweep_json_is_sorted_by_j() {
        let points = json_stdout(&ising(&[
            "sweep", "--steps", "100", "--time", "10.1", "--points", "3", "-t", "1", "--seed",
            "2", "-f", "json",
        ]));
        let points = points.as_array().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0]["j"], 0.0);
        assert_eq!(points[0]["step_count"], 0);
        assert_eq!(points[2]["j"], 2.0);
        assert_eq!(points[2]["step_count"], 100);
    }
}

// ============================================================================
// Errors
// ============================================================================

mod errors {
    use super::*;

    #[test]
    fn test_zero_field_max_fails() {
        let out = ising(&["build", "--j-max", "0"]);
        assert_eq!(out.status.code(), Some(1));
        assert!(String::from_utf8_lossy(&out.stderr).contains("Jmax"));
    }

    #[test]
    fn test_unclamped_step_count_fails() {
        let out = ising(&["build", "--j", "3", "--j-max", "2"]);
        assert!(!out.status.success());
    }

    #[test]
    fn test_missing_config_file() {
        let out = ising(&["build", "-c", "/nonexistent/params.yaml"]);
        assert!(!out.status.success());
        assert!(String::from_utf8_lossy(&out.stderr).contains("File not found"));
    }

    #[test]
    fn test_no_subcommand() {
        assert!(!ising(&[]).status.success());
    }
}
