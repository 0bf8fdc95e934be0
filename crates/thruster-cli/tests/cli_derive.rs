use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_thruster-calc"))
        .args(args)
        .env_remove("THRUSTER_GAS_TABLE")
        .env_remove("THRUSTER_LOG")
        .output()
        .expect("binary should run")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("parent dir should be created");
    }
    fs::write(path, content).expect("file should be written");
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_str(&stdout(output)).expect("stdout should be JSON")
}

fn assert_json_close(value: &Value, expected: f64, tolerance: f64) {
    let actual = value.as_f64().expect("value should be a number");
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}

const HELIUM_SCENARIO: [&str; 13] = [
    "derive",
    "--gas",
    "helium",
    "--gas-flow",
    "1.0",
    "--gas-usage",
    "90",
    "--thrust",
    "20",
    "--power-hfg",
    "0.5",
    "--particle-energy",
    "50",
];

#[test]
fn derive_renders_reference_scenario_as_table() {
    let mut args = HELIUM_SCENARIO.to_vec();
    args.extend(["--edited", "flow"]);
    let output = run_cli(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("Gas: Helium (helium)"));
    assert!(text.contains("2038.74 s"));
    assert!(text.contains("0.2000 kW"));
    assert!(text.contains("40.00 %"));
    assert!(text.contains("21.709200 A"));
    assert!(!text.contains("undefined"));
}

#[test]
fn derive_json_reports_reconciled_inputs() {
    let mut args = HELIUM_SCENARIO.to_vec();
    args.extend(["--edited", "flow", "--format", "json"]);
    let output = run_cli(&args);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = json_stdout(&output);
    assert_eq!(report["gas"]["id"], "helium");
    assert_json_close(&report["inputs"]["equivalentCurrent"], 24.121_332_82, 1.0e-6);
    assert_json_close(&report["outputs"]["jetPower"], 0.2, 1.0e-12);
    assert_json_close(&report["outputs"]["thrustEfficiency"], 40.0, 1.0e-9);
    assert_eq!(report["undefined"], Value::Array(Vec::new()));
}

#[test]
fn undefined_outputs_are_null_in_json_and_fail_in_strict_mode() {
    let output = run_cli(&["derive", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = json_stdout(&output);
    assert!(report["outputs"]["neutralEnergy"].is_null());
    assert_eq!(report["outputs"]["specificImpulse"], 0.0);
    assert!(
        report["undefined"]
            .as_array()
            .expect("undefined should be an array")
            .contains(&Value::from("neutralEnergy"))
    );

    let strict = run_cli(&["derive", "--strict"]);
    assert_eq!(strict.status.code(), Some(4), "stderr: {}", stderr(&strict));
    assert!(stdout(&strict).contains("undefined"));
    assert!(stderr(&strict).contains("ERROR: [RUN.INVALID_RESULT]"));
    assert!(stderr(&strict).contains("FATAL EXIT CODE: 4"));
}

#[test]
fn input_file_is_merged_with_flag_overrides() {
    let temp = TempDir::new().expect("tempdir should be created");
    let input_path = temp.path().join("inputs.json");
    write_file(
        &input_path,
        r#"{ "selectedGas": "argon", "equivalentCurrent": 4.824266564010515, "gasUsage": 60, "particleEnergy": 30, "thrust": 5, "powerHFG": 1.0 }"#,
    );

    let output = run_cli(&[
        "derive",
        "--input",
        input_path.to_str().expect("utf-8 path"),
        "--thrust",
        "40",
        "--edited",
        "current",
        "--format",
        "json",
    ]);

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = json_stdout(&output);
    assert_eq!(report["inputs"]["selectedGas"], "argon");
    assert_json_close(&report["inputs"]["gasFlow"], 2.0, 1.0e-9);
    assert_json_close(&report["inputs"]["thrust"], 40.0, 0.0);
    assert_json_close(&report["outputs"]["jetPower"], 0.4, 1.0e-12);
}

#[test]
fn unparsable_flag_values_are_coerced_to_zero() {
    let output = run_cli(&[
        "derive",
        "--gas-flow",
        "abc",
        "--thrust",
        "20",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let report = json_stdout(&output);
    assert_eq!(report["inputs"]["gasFlow"], 0.0);
    assert_eq!(report["outputs"]["specificImpulse"], 0.0);
}

#[test]
fn negative_inputs_are_rejected_with_input_exit_code() {
    let output = run_cli(&["derive", "--thrust", "-3"]);
    assert_eq!(output.status.code(), Some(2), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("ERROR: [INPUT.NEGATIVE_FIELD]"));
}

#[test]
fn unknown_gas_is_a_configuration_failure() {
    let output = run_cli(&["derive", "--gas", "xenon"]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("ERROR: [CONFIG.UNKNOWN_GAS] unknown gas 'xenon'"));
    assert!(stderr(&output).contains("FATAL EXIT CODE: 3"));
}

#[test]
fn gas_table_extension_adds_selectable_gases() {
    let temp = TempDir::new().expect("tempdir should be created");
    let table_path = temp.path().join("gases.json");
    write_file(
        &table_path,
        r#"{ "gases": [ { "id": "xenon", "displayName": "Xenon", "atomicMassGramsPerMole": 131.293, "ionizationEnergyEv": 12.13 } ] }"#,
    );
    let table = table_path.to_str().expect("utf-8 path");

    let gases = run_cli(&["--gas-table", table, "gases", "--format", "json"]);
    assert!(gases.status.success(), "stderr: {}", stderr(&gases));
    let listed = json_stdout(&gases);
    let ids: Vec<&str> = listed
        .as_array()
        .expect("gas list should be an array")
        .iter()
        .filter_map(|gas| gas["id"].as_str())
        .collect();
    assert_eq!(ids, ["helium", "neon", "argon", "xenon"]);

    let output = Command::new(env!("CARGO_BIN_EXE_thruster-calc"))
        .args(["derive", "--gas", "xenon", "--gas-flow", "1", "--thrust", "10"])
        .env("THRUSTER_GAS_TABLE", table)
        .env_remove("THRUSTER_LOG")
        .output()
        .expect("binary should run");
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).starts_with("Gas: Xenon (xenon)"));
}

#[test]
fn broken_gas_table_exits_with_configuration_code() {
    let temp = TempDir::new().expect("tempdir should be created");
    let table_path = temp.path().join("gases.json");
    write_file(
        &table_path,
        r#"{ "gases": [ { "id": "lead", "atomicMassGramsPerMole": -1, "ionizationEnergyEv": 7.4 } ] }"#,
    );

    let output = run_cli(&[
        "--gas-table",
        table_path.to_str().expect("utf-8 path"),
        "gases",
    ]);
    assert_eq!(output.status.code(), Some(3), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("ERROR: [CONFIG.GAS_TABLE]"));
}

#[test]
fn reconcile_prints_paired_field_at_reference_precision() {
    let output = run_cli(&["reconcile", "--edited", "flow", "--value", "1.0"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "equivalentCurrent 24.121333 A");

    let output = run_cli(&[
        "reconcile",
        "--edited",
        "current",
        "--value",
        "24.121333",
        "--gas",
        "helium",
    ]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "gasFlow 1.0000 mg/s");

    let output = run_cli(&["reconcile", "--edited", "current", "--value", "-2"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "gasFlow 0.0000 mg/s");
}

#[test]
fn derive_output_file_matches_stdout() {
    let temp = TempDir::new().expect("tempdir should be created");
    let report_path = temp.path().join("reports/derive.txt");
    let mut args = HELIUM_SCENARIO.to_vec();
    let report = report_path.to_str().expect("utf-8 path");
    args.extend(["--edited", "flow", "--output", report]);

    let output = run_cli(&args);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let written = fs::read_to_string(&report_path).expect("report should be written");
    assert_eq!(written, stdout(&output));
}

#[test]
fn usage_errors_exit_with_input_code_and_help_succeeds() {
    let output = run_cli(&["derive", "--edited", "thrust"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [INPUT.EDITED_FIELD]"));

    let output = run_cli(&["launch"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("ERROR: [INPUT.CLI_USAGE]"));

    let output = run_cli(&["--help"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("derive"));
}
