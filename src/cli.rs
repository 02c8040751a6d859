//! CLI argument definitions using clap
//!
//! The command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use financing_engine::{AmortizationMethod, EarlyPaymentPreference};
use rust_decimal::Decimal;

/// Financing calculator for SAC and Price amortization
#[derive(Parser)]
#[command(name = "financing")]
#[command(about = "Amortization schedules, balance reconciliation and early payment simulation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print single-line JSON instead of pretty-printed output
    #[arg(long, global = true)]
    pub compact: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Terms of the financing being calculated
#[derive(Args, Debug, Clone)]
pub struct LoanArgs {
    /// Amount borrowed
    #[arg(long)]
    pub principal: Decimal,

    /// Annual interest rate as a fraction (0.12 for 12%)
    #[arg(long)]
    pub rate: Decimal,

    /// Number of monthly installments
    #[arg(long)]
    pub months: u32,

    /// Amortization method (SAC or Price)
    #[arg(long, default_value = "SAC")]
    pub method: AmortizationMethod,

    /// Due date of the first installment (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    pub start: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the month-by-month amortization table
    Schedule {
        #[command(flatten)]
        loan: LoanArgs,
    },

    /// Generate SAC and Price tables for the same terms
    Compare {
        /// Amount borrowed
        #[arg(long)]
        principal: Decimal,

        /// Annual interest rate as a fraction (0.12 for 12%)
        #[arg(long)]
        rate: Decimal,

        /// Number of monthly installments
        #[arg(long)]
        months: u32,

        /// Due date of the first installment (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<NaiveDate>,
    },

    /// Reconcile the schedule with the payments recorded so far
    Balance {
        #[command(flatten)]
        loan: LoanArgs,

        /// JSON file with an array of recorded payments
        #[arg(long)]
        payments: PathBuf,
    },

    /// Simulate an extra payment applied to the outstanding principal
    Simulate {
        /// Outstanding principal
        #[arg(long)]
        principal: Decimal,

        /// Annual interest rate as a fraction (0.12 for 12%)
        #[arg(long)]
        rate: Decimal,

        /// Remaining monthly installments
        #[arg(long)]
        months: u32,

        /// Amortization method (SAC or Price)
        #[arg(long, default_value = "SAC")]
        method: AmortizationMethod,

        /// Extra amount paid now
        #[arg(long)]
        amount: Decimal,

        /// reducao_prazo (shorter term) or reducao_parcela (smaller installment)
        #[arg(long)]
        preference: EarlyPaymentPreference,
    },
}
