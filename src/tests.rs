//! CLI parsing and command tests

use std::io::Write;

use clap::Parser;
use financing_engine::{AmortizationMethod, EarlyPaymentPreference};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::cli::{Cli, Commands};
use crate::commands;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("financing").chain(args.iter().copied())).unwrap()
}

fn money(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[test]
fn test_schedule_args_default_to_sac() {
    let cli = parse(&["schedule", "--principal", "12000", "--rate", "0.12", "--months", "12"]);
    match cli.command {
        Commands::Schedule { loan } => {
            assert_eq!(loan.principal, dec!(12000));
            assert_eq!(loan.rate, dec!(0.12));
            assert_eq!(loan.months, 12);
            assert_eq!(loan.method, AmortizationMethod::Sac);
            assert!(loan.start.is_none());
        }
        _ => panic!("expected schedule command"),
    }
}

#[test]
fn test_simulate_args() {
    let cli = parse(&[
        "--compact",
        "simulate",
        "--principal",
        "11000",
        "--rate",
        "0.12",
        "--months",
        "11",
        "--method",
        "price",
        "--amount",
        "5000",
        "--preference",
        "reducao_prazo",
    ]);
    assert!(cli.compact);
    match cli.command {
        Commands::Simulate {
            method, preference, ..
        } => {
            assert_eq!(method, AmortizationMethod::Price);
            assert_eq!(preference, EarlyPaymentPreference::ReduceTerm);
        }
        _ => panic!("expected simulate command"),
    }
}

#[test]
fn test_unknown_method_is_rejected_by_parser() {
    let result = Cli::try_parse_from([
        "financing",
        "schedule",
        "--principal",
        "1000",
        "--rate",
        "0.1",
        "--months",
        "10",
        "--method",
        "bullet",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_schedule_command_outputs_rows() {
    let cli = parse(&[
        "schedule",
        "--principal",
        "12000",
        "--rate",
        "0.12",
        "--months",
        "12",
        "--start",
        "2024-01-01",
    ]);
    let output = commands::run(&cli.command).unwrap();

    let rows = output["installments"].as_array().unwrap();
    assert_eq!(rows.len(), 12);
    assert_eq!(rows[0]["dueDate"], "2024-01-01");
    assert_eq!(money(&rows[0]["paymentAmount"]), dec!(1120));
    assert_eq!(output["method"], "SAC");
}

#[test]
fn test_schedule_command_surfaces_validation_errors() {
    let cli = parse(&["schedule", "--principal", "0", "--rate", "0.12", "--months", "12"]);
    let err = commands::run(&cli.command).unwrap_err();
    assert!(err.to_string().contains("principal must be greater than zero"));
}

#[test]
fn test_balance_command_reads_payments_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"[{{"installmentNumber": 1, "paymentAmount": "1120.00", "principalAmount": "1000.00", "interestAmount": "120.00"}}]"#
    )
    .unwrap();

    let path = file.path().to_str().unwrap().to_string();
    let cli = parse(&[
        "balance",
        "--principal",
        "12000",
        "--rate",
        "0.12",
        "--months",
        "12",
        "--start",
        "2024-01-01",
        "--payments",
        &path,
    ]);
    let output = commands::run(&cli.command).unwrap();

    assert_eq!(output["paidInstallments"], 1);
    assert_eq!(output["remainingInstallments"], 11);
    assert_eq!(money(&output["currentBalance"]), dec!(11000));
    assert_eq!(output["nextInstallment"]["installmentNumber"], 2);
}

#[test]
fn test_balance_command_reports_missing_file() {
    let cli = parse(&[
        "balance",
        "--principal",
        "12000",
        "--rate",
        "0.12",
        "--months",
        "12",
        "--payments",
        "/nonexistent/payments.json",
    ]);
    let err = commands::run(&cli.command).unwrap_err();
    assert!(err.to_string().contains("Failed to read payments file"));
}

#[test]
fn test_compare_command() {
    let cli = parse(&["compare", "--principal", "12000", "--rate", "0.12", "--months", "12"]);
    let output = commands::run(&cli.command).unwrap();
    assert_eq!(money(&output["sac"]["summary"]["totalInterest"]), dec!(780));
    assert_eq!(output["price"]["method"], "Price");
}

#[test]
fn test_simulate_command() {
    let cli = parse(&[
        "simulate",
        "--principal",
        "11000",
        "--rate",
        "0.12",
        "--months",
        "11",
        "--amount",
        "5000",
        "--preference",
        "reducao_parcela",
    ]);
    let output = commands::run(&cli.command).unwrap();
    assert_eq!(money(&output["newPrincipal"]), dec!(6000));
    assert_eq!(output["newTerm"], 11);
    assert_eq!(money(&output["interestSaved"]), dec!(300));
}

#[test]
fn test_oversized_term_is_rejected_before_generation() {
    let cli = parse(&[
        "schedule",
        "--principal",
        "1000",
        "--rate",
        "0.12",
        "--months",
        "4294967295",
    ]);
    let err = commands::run(&cli.command).unwrap_err();
    assert!(err.to_string().contains("exceeds the maximum of 1200 months"));
}
