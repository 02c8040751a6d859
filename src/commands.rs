//! Command implementations
//!
//! Each command calls one engine operation and returns its result as JSON.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use financing_engine::{
    LoanTerms, RecordedPayment, calculate_updated_balance, compare_methods,
    generate_amortization_table, simulate_early_payment,
};
use serde_json::Value;
use tracing::info;

use crate::cli::{Commands, LoanArgs};

pub fn run(command: &Commands) -> Result<Value> {
    match command {
        Commands::Schedule { loan } => cmd_schedule(loan),
        Commands::Compare {
            principal,
            rate,
            months,
            start,
        } => {
            let comparison = compare_methods(*principal, *rate, *months, start_or_today(*start))?;
            info!(
                interest_difference = %comparison.interest_difference,
                "compared SAC and Price"
            );
            Ok(serde_json::to_value(comparison)?)
        }
        Commands::Balance { loan, payments } => cmd_balance(loan, payments),
        Commands::Simulate {
            principal,
            rate,
            months,
            method,
            amount,
            preference,
        } => {
            let result =
                simulate_early_payment(*principal, *rate, *months, *method, *amount, *preference)?;
            info!(
                new_term = result.new_term,
                interest_saved = %result.interest_saved,
                "simulated early payment"
            );
            Ok(serde_json::to_value(result)?)
        }
    }
}

pub fn cmd_schedule(loan: &LoanArgs) -> Result<Value> {
    let terms = loan_terms(loan);
    let schedule = generate_amortization_table(&terms)?;
    info!(
        method = %terms.method,
        installments = schedule.installments.len(),
        "generated amortization schedule"
    );
    Ok(serde_json::to_value(schedule)?)
}

pub fn cmd_balance(loan: &LoanArgs, payments_path: &Path) -> Result<Value> {
    let payments = read_payments(payments_path)?;
    let report = calculate_updated_balance(&loan_terms(loan), &payments)?;
    info!(
        payments = payments.len(),
        paid_installments = report.paid_installments,
        "reconciled balance"
    );
    Ok(serde_json::to_value(report)?)
}

fn read_payments(path: &Path) -> Result<Vec<RecordedPayment>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payments file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid payments JSON in {}", path.display()))
}

fn loan_terms(loan: &LoanArgs) -> LoanTerms {
    LoanTerms::new(
        loan.principal,
        loan.rate,
        loan.months,
        loan.method,
        start_or_today(loan.start),
    )
}

fn start_or_today(start: Option<NaiveDate>) -> NaiveDate {
    start.unwrap_or_else(|| Local::now().date_naive())
}
