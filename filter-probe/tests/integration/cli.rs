//! Runs the built `filter-probe` binary.

use std::process::Command;
use std::process::Output;

fn probe(vars: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_filter-probe"));
    command.env("RUST_LOG", "off");
    for (key, value) in vars {
        command.env(key, value);
    }
    command.output().expect("failed to run filter-probe")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn minimal_table_prints_three_rows_and_succeeds() {
    let output = probe(&[("PROBE_EXTENDED_TABLE", "false")]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout(&output);
    let lines: Vec<&str> = report.lines().collect();
    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with("libpng version "));
    assert_eq!(lines[1], "input  expect actual");
    assert!(lines[2].starts_with("0x0008 0x0008 "));
    assert!(lines[3].starts_with("0x0010 0x0010 "));
    assert!(lines[4].starts_with("0x0000 0x0008 "));
}

#[test]
fn repeated_runs_print_identical_reports() {
    let vars = [("PROBE_EXTENDED_TABLE", "true")];
    let first = probe(&vars);
    let second = probe(&vars);

    assert_eq!(first.status.code(), Some(0));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn context_reuse_is_transparent() {
    let reused = probe(&[("PROBE_EXTENDED_TABLE", "true"), ("PROBE_REUSE_CONTEXT", "true")]);
    let fresh = probe(&[("PROBE_EXTENDED_TABLE", "true"), ("PROBE_REUSE_CONTEXT", "false")]);

    assert_eq!(reused.status.code(), Some(0));
    assert_eq!(fresh.status.code(), Some(0));
    assert_eq!(reused.stdout, fresh.stdout);
}

#[test]
fn invalid_settings_exit_with_generic_failure() {
    let output = probe(&[("PROBE_REUSE_CONTEXT", "sometimes")]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[cfg(not(feature = "libpng"))]
#[test]
fn model_runs_are_labelled_self_tests() {
    let output = probe(&[("PROBE_EXTENDED_TABLE", "false")]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout(&output);
    let banner = report.lines().next().unwrap();
    assert_eq!(banner, "libpng version none (self-test against the in-process 1.6 model)");
}

/// The in-process model aborts on application errors unless they are
/// relaxed, so the first undocumented selector ends the run.
#[cfg(not(feature = "libpng"))]
#[test]
fn library_errors_end_the_run_with_exit_code_four() {
    let output = probe(&[
        ("PROBE_EXTENDED_TABLE", "true"),
        ("PROBE_RELAX_APP_ERRORS", "false"),
    ]);

    assert_eq!(output.status.code(), Some(4));
    let report = stdout(&output);
    assert_eq!(
        report.lines().last(),
        Some("0x0005: error: Unknown row filter for method 0")
    );
    assert!(!report.contains("0x0006"));
}

#[cfg(not(feature = "libpng"))]
#[test]
fn model_matches_every_recorded_value() {
    let output = probe(&[("PROBE_EXTENDED_TABLE", "true")]);

    assert_eq!(output.status.code(), Some(0));
    assert!(!stdout(&output).contains(" !="));
}

#[cfg(feature = "libpng")]
#[test]
fn banner_names_the_linked_libpng() {
    let output = probe(&[("PROBE_EXTENDED_TABLE", "false")]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout(&output);
    let banner = report.lines().next().unwrap();
    assert!(banner.starts_with("libpng version 1."), "unexpected banner {banner}");
    assert!(!banner.contains("self-test"));
}

#[cfg(feature = "libpng")]
#[test]
fn libpng_16_matches_every_recorded_value() {
    let output = probe(&[("PROBE_EXTENDED_TABLE", "true"), ("PROBE_REUSE_CONTEXT", "false")]);

    assert_eq!(output.status.code(), Some(0));
    let report = stdout(&output);
    assert!(!report.contains(" !="), "{report}");
    for input in ["0x0005", "0x0006", "0x0007", "0x0105"] {
        let warning = format!("{input}: warning: Unknown row filter for method 0");
        assert!(report.lines().any(|line| line == warning), "{report}");
    }
}

/// Without the benign-error relaxation libpng raises the undocumented
/// selector as an error, which ends the run.
#[cfg(feature = "libpng")]
#[test]
fn libpng_errors_end_the_run_with_exit_code_four() {
    let output = probe(&[
        ("PROBE_EXTENDED_TABLE", "true"),
        ("PROBE_RELAX_APP_ERRORS", "false"),
    ]);

    assert_eq!(output.status.code(), Some(4));
    let report = stdout(&output);
    let last = report.lines().last().unwrap();
    assert!(last.starts_with("0x0005: error: "), "{report}");
    assert!(!report.contains("0x0006"));
}
