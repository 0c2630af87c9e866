//! End-to-end CLI tests: spawn the sib binary and check output, exit
//! codes, and the JSON contract on every headless command.

mod common;

use serde_json::Value;

fn json_lines(stdout: &str) -> Vec<Value> {
    stdout
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("bad JSON {line:?}: {e}")))
        .collect()
}

#[test]
fn help_prints_usage() {
    let result = common::run_cli_case("help_prints_usage", &["--help"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("Usage: sib [OPTIONS] <COMMAND>"),
        "missing help banner; log: {}",
        result.log_path.display()
    );
}

#[test]
fn version_prints_the_binary_name() {
    let result = common::run_cli_case("version_prints_the_binary_name", &["--version"]);
    assert!(
        result.status.success(),
        "expected success; log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("sib"),
        "missing version output; log: {}",
        result.log_path.display()
    );
}

#[test]
fn bare_invocation_shows_help_and_fails() {
    let result = common::run_cli_case("bare_invocation_shows_help_and_fails", &[]);
    assert_eq!(
        result.status.code(),
        Some(2),
        "clap usage errors exit 2; log: {}",
        result.log_path.display()
    );
    let combined = format!("{}{}", result.stdout, result.stderr);
    assert!(
        combined.contains("Usage"),
        "missing usage; log: {}",
        result.log_path.display()
    );
}

#[test]
fn every_subcommand_answers_help() {
    let subcommands = ["browse", "list", "check", "catalog", "config", "completions"];
    for subcmd in subcommands {
        let case_name = format!("subcommand_{subcmd}_help");
        let result = common::run_cli_case(&case_name, &[subcmd, "--help"]);
        assert!(
            result.status.success(),
            "subcommand '{subcmd} --help' failed; log: {}",
            result.log_path.display()
        );
        assert!(
            result.stdout.contains("Usage"),
            "subcommand '{subcmd} --help' missing usage; log: {}",
            result.log_path.display()
        );
    }
}

// ──────────────────── list ────────────────────

#[test]
fn list_emits_json_lines_when_piped() {
    let result = common::run_cli_case("list_emits_json_lines_when_piped", &["list"]);
    assert!(
        result.status.success(),
        "list failed; log: {}",
        result.log_path.display()
    );
    let lines = json_lines(&result.stdout);
    // Six sample vehicles plus the trailing summary.
    assert_eq!(lines.len(), 7, "log: {}", result.log_path.display());
    let summary = lines.last().unwrap();
    assert_eq!(summary["total"], 6);
    assert_eq!(summary["visible"], 6);
    assert_eq!(summary["sort"], "none");
}

#[test]
fn list_filter_narrows_to_the_category() {
    let result = common::run_cli_case(
        "list_filter_narrows_to_the_category",
        &["list", "--filter", "sedan"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    let summary = lines.last().unwrap();
    assert_eq!(summary["visible"], 2);
    for vehicle in &lines[..lines.len() - 1] {
        assert_eq!(vehicle["category"], "sedan", "{vehicle}");
    }
}

#[test]
fn list_filter_and_search_are_conjunctive() {
    let result = common::run_cli_case(
        "list_filter_and_search_are_conjunctive",
        &["list", "--filter", "suv", "--search", "explorer"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    assert_eq!(lines.last().unwrap()["visible"], 1);
    assert!(
        lines[0]["label"].as_str().unwrap().contains("Explorer"),
        "{}",
        lines[0]
    );
}

#[test]
fn list_sort_orders_prices_ascending() {
    let result = common::run_cli_case(
        "list_sort_orders_prices_ascending",
        &["list", "--sort", "price-low"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    let prices: Vec<u64> = lines[..lines.len() - 1]
        .iter()
        .map(|v| v["price"].as_u64().unwrap())
        .collect();
    let mut sorted = prices.clone();
    sorted.sort_unstable();
    assert_eq!(prices, sorted, "log: {}", result.log_path.display());
}

#[test]
fn list_rejects_unknown_sort_tokens() {
    let result = common::run_cli_case(
        "list_rejects_unknown_sort_tokens",
        &["list", "--sort", "mileage"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("unknown sort criterion"),
        "stderr: {}; log: {}",
        result.stderr,
        result.log_path.display()
    );
}

#[test]
fn list_human_mode_prints_a_table() {
    let result = common::run_cli_case_env(
        "list_human_mode_prints_a_table",
        &["list"],
        &[("SIB_OUTPUT_FORMAT", "human")],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(
        result.stdout.contains("2020 Honda Accord LX"),
        "log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("$20,000"),
        "log: {}",
        result.log_path.display()
    );
    assert!(
        result.stdout.contains("6 of 6 vehicles shown"),
        "log: {}",
        result.log_path.display()
    );
}

#[test]
fn quiet_suppresses_the_human_summary() {
    let result = common::run_cli_case_env(
        "quiet_suppresses_the_human_summary",
        &["list", "--quiet"],
        &[("SIB_OUTPUT_FORMAT", "human")],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(
        !result.stdout.contains("vehicles shown"),
        "log: {}",
        result.log_path.display()
    );
}

// ──────────────────── check ────────────────────

#[test]
fn check_accepts_a_complete_message() {
    let result = common::run_cli_case(
        "check_accepts_a_complete_message",
        &[
            "check",
            "--name",
            "Dana Whitfield",
            "--email",
            "dana@example.com",
            "--message",
            "Is the Outback still on the lot?",
        ],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    assert_eq!(lines[0]["valid"], true);
    assert_eq!(lines[0]["record"]["name"], "Dana Whitfield");
}

#[test]
fn check_rejects_missing_required_fields() {
    let result = common::run_cli_case(
        "check_rejects_missing_required_fields",
        &["check", "--email", "not-an-address"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "log: {}",
        result.log_path.display()
    );
    let lines = json_lines(&result.stdout);
    assert_eq!(lines[0]["valid"], false);
    let fields: Vec<&str> = lines[0]["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"name"), "{fields:?}");
    assert!(fields.contains(&"email"), "{fields:?}");
    assert!(fields.contains(&"message"), "{fields:?}");
    assert!(!fields.contains(&"phone"), "phone is optional: {fields:?}");
}

// ──────────────────── catalog ────────────────────

#[test]
fn catalog_show_summarizes_the_sample_stock() {
    let result = common::run_cli_case("catalog_show_summarizes_the_sample_stock", &["catalog", "show"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    assert_eq!(lines[0]["vehicles"], 6);
    assert_eq!(lines[0]["categories"]["sedan"], 2);
}

#[test]
fn catalog_seed_writes_a_loadable_catalog() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("stock.json");
    let path_str = path.to_str().unwrap();

    let result = common::run_cli_case(
        "catalog_seed_writes_a_loadable_catalog",
        &["catalog", "seed", "--count", "5", "--seed", "7", "--output", path_str],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    assert!(path.exists());

    let listed = common::run_cli_case(
        "catalog_seed_writes_a_loadable_catalog_list",
        &["list", "--catalog", path_str],
    );
    assert!(listed.status.success(), "log: {}", listed.log_path.display());
    let lines = json_lines(&listed.stdout);
    assert_eq!(lines.last().unwrap()["total"], 5);
}

#[test]
fn catalog_seed_is_deterministic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let first = dir.path().join("a.json");
    let second = dir.path().join("b.json");

    for (case, path) in [
        ("catalog_seed_is_deterministic_a", &first),
        ("catalog_seed_is_deterministic_b", &second),
    ] {
        let result = common::run_cli_case(
            case,
            &["catalog", "seed", "--seed", "99", "--output", path.to_str().unwrap()],
        );
        assert!(result.status.success(), "log: {}", result.log_path.display());
    }

    let a = std::fs::read_to_string(&first).unwrap();
    let b = std::fs::read_to_string(&second).unwrap();
    assert_eq!(a, b, "same seed must yield the same stock");
}

#[test]
fn missing_explicit_catalog_is_a_usage_error() {
    let result = common::run_cli_case(
        "missing_explicit_catalog_is_a_usage_error",
        &["list", "--catalog", "/nonexistent/stock.json"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("SIB-2001"),
        "stderr: {}; log: {}",
        result.stderr,
        result.log_path.display()
    );
}

// ──────────────────── config ────────────────────

#[test]
fn config_init_validate_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let init = common::run_cli_case(
        "config_init_validate_round_trip_init",
        &["--config", path_str, "config", "init"],
    );
    assert!(init.status.success(), "log: {}", init.log_path.display());
    assert!(path.exists());

    let validate = common::run_cli_case(
        "config_init_validate_round_trip_validate",
        &["--config", path_str, "config", "validate"],
    );
    assert!(validate.status.success(), "log: {}", validate.log_path.display());
    let lines = json_lines(&validate.stdout);
    assert_eq!(lines[0]["status"], "ok");
    assert_eq!(lines[0]["hash"].as_str().unwrap().len(), 16);
}

#[test]
fn config_init_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let first = common::run_cli_case(
        "config_init_refuses_to_overwrite_first",
        &["--config", path_str, "config", "init"],
    );
    assert!(first.status.success(), "log: {}", first.log_path.display());

    let second = common::run_cli_case(
        "config_init_refuses_to_overwrite_second",
        &["--config", path_str, "config", "init"],
    );
    assert_eq!(
        second.status.code(),
        Some(1),
        "log: {}",
        second.log_path.display()
    );
    assert!(
        second.stderr.contains("already exists"),
        "stderr: {}; log: {}",
        second.stderr,
        second.log_path.display()
    );

    let forced = common::run_cli_case(
        "config_init_refuses_to_overwrite_forced",
        &["--config", path_str, "config", "init", "--force"],
    );
    assert!(forced.status.success(), "log: {}", forced.log_path.display());
}

#[test]
fn config_path_honors_the_flag() {
    let result = common::run_cli_case(
        "config_path_honors_the_flag",
        &["--config", "/tmp/sib-test-config.toml", "config", "path"],
    );
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let lines = json_lines(&result.stdout);
    assert_eq!(lines[0]["path"], "/tmp/sib-test-config.toml");
}

#[test]
fn config_show_emits_the_effective_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    let path_str = path.to_str().unwrap();

    let init = common::run_cli_case(
        "config_show_emits_the_effective_config_init",
        &["--config", path_str, "config", "init"],
    );
    assert!(init.status.success(), "log: {}", init.log_path.display());

    let show = common::run_cli_case(
        "config_show_emits_the_effective_config_show",
        &["--config", path_str, "config", "show"],
    );
    assert!(show.status.success(), "log: {}", show.log_path.display());
    let lines = json_lines(&show.stdout);
    assert_eq!(lines[0]["view"]["debounce_ms"], 300);
}

#[test]
fn missing_explicit_config_is_a_usage_error() {
    let result = common::run_cli_case(
        "missing_explicit_config_is_a_usage_error",
        &["--config", "/nonexistent/sib.toml", "config", "show"],
    );
    assert_eq!(
        result.status.code(),
        Some(1),
        "log: {}",
        result.log_path.display()
    );
    assert!(
        result.stderr.contains("SIB-1002"),
        "stderr: {}; log: {}",
        result.stderr,
        result.log_path.display()
    );
}

// ──────────────────── completions ────────────────────

#[test]
fn completions_cover_the_major_shells() {
    for shell in ["bash", "zsh", "fish"] {
        let case_name = format!("completions_{shell}");
        let result = common::run_cli_case(&case_name, &["completions", shell]);
        assert!(
            result.status.success(),
            "completions {shell} failed; log: {}",
            result.log_path.display()
        );
        assert!(
            result.stdout.contains("sib"),
            "completions {shell} missing binary name; log: {}",
            result.log_path.display()
        );
    }
}
