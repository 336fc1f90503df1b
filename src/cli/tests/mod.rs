//! Unit tests for CLI module
//!
//! Tests operation parsing, argument handling and evaluation against an
//! in-memory bus. No settings files are read.

use clap::Parser;

use crate::{
    cli::{Cli, CliError, Commands, Evaluator, Operation, execute, formatting::format_parameter},
    config::BusSettings,
    config_bus::Environment,
};

#[test]
fn parses_set_operation() {
    let operation: Operation = "theme=dark".parse().unwrap();
    assert_eq!(
        operation,
        Operation::Set {
            key: "theme".to_string(),
            value: "dark".to_string()
        }
    );
}

#[test]
fn set_operation_keeps_equals_in_value() {
    let operation: Operation = "query=a=b".parse().unwrap();
    assert_eq!(
        operation,
        Operation::Set {
            key: "query".to_string(),
            value: "a=b".to_string()
        }
    );
}

#[test]
fn parses_get_remove_and_get_all() {
    assert_eq!(
        "theme".parse::<Operation>().unwrap(),
        Operation::Get {
            key: "theme".to_string()
        }
    );
    assert_eq!(
        "!theme".parse::<Operation>().unwrap(),
        Operation::Remove {
            key: "theme".to_string()
        }
    );
    assert_eq!("*".parse::<Operation>().unwrap(), Operation::GetAll);
}

#[test]
fn rejects_empty_keys() {
    for input in ["", "=value", "!"] {
        let result = input.parse::<Operation>();
        assert!(
            matches!(result, Err(CliError::InvalidArguments(_))),
            "input {input:?} should be rejected"
        );
    }
}

#[test]
fn operation_display_matches_syntax() {
    for input in ["a=1", "a", "!a", "*"] {
        let operation: Operation = input.parse().unwrap();
        assert_eq!(operation.to_string(), input);
    }
}

#[test]
fn cli_parses_eval_operations() {
    let cli = Cli::try_parse_from(["figura", "eval", "a=1", "a", "!a"]).unwrap();

    let Commands::Eval {
        environment,
        operations,
    } = cli.command
    else {
        unreachable!("expected eval command");
    };

    assert_eq!(environment, "cli");
    assert_eq!(operations.len(), 3);
}

#[test]
fn cli_eval_requires_operations() {
    assert!(Cli::try_parse_from(["figura", "eval"]).is_err());
}

#[test]
fn evaluator_reports_values_and_events() {
    let mut evaluator = Evaluator::new("test-env", &BusSettings::default());
    let operations: Vec<Operation> = ["theme=dark", "theme", "!theme", "theme"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    let output = evaluator.run(&operations).unwrap();

    assert!(output.contains("environment: test-env"));
    assert!(output.contains("write theme (previous: <unset>)"));
    assert!(output.contains("read theme (previous: dark)"));
    assert!(output.contains("write theme (previous: dark)"));
    assert!(output.contains(&format!("removed {}", format_parameter("theme", Some("dark")))));
    assert!(output.contains(&format_parameter("theme", None)));
    assert!(evaluator.environment().is_live());
    assert_eq!(evaluator.environment().name(), "test-env");
}

#[test]
fn evaluator_lists_all_parameters_sorted() {
    let mut evaluator = Evaluator::new("test-env", &BusSettings::default());
    let operations: Vec<Operation> = ["b=2", "a=1", "*"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();

    let output = evaluator.run(&operations).unwrap();

    let a = output.find(&format_parameter("a", Some("1"))).unwrap();
    let b = output.find(&format_parameter("b", Some("2"))).unwrap();
    assert!(a < b);
}

#[test]
fn execute_prints_settings_as_toml_and_json() {
    let settings = BusSettings::default();

    let toml_output = execute(&Commands::Settings { json: false }, &settings).unwrap();
    assert!(toml_output.contains("[dispatch]"));

    let json_output = execute(&Commands::Settings { json: true }, &settings).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json_output).unwrap();
    assert_eq!(value["dispatch"]["max_depth"], 64);
}

#[test]
fn execute_prints_schema() {
    let output = execute(&Commands::Schema, &BusSettings::default()).unwrap();

    assert!(output.contains("max_depth"));
    assert!(output.contains("log_level"));
}
