//! `financing_engine` computes the repayment side of a financing.
//!
//! It covers the two amortization systems used for Brazilian financings:
//! - **SAC (Sistema de Amortização Constante)**: Characterized by fixed amortization payments,
//!   leading to decreasing total payments over time.
//! - **Price (Sistema Francês de Amortização)**: Characterized by fixed total payments
//!   throughout the financing period.
//!
//! Three operations are provided, all pure functions over `Decimal` values:
//! - [`generate_amortization_table`] builds the month-by-month schedule.
//! - [`calculate_updated_balance`] reconciles that schedule with the payments
//!   actually recorded.
//! - [`simulate_early_payment`] shows the effect of an extra payment, either
//!   shortening the term or lowering the installment.
//!
//! Rates are annual fractions (`0.12` is 12% a year) divided flat by twelve.
//! Every monetary field comes back rounded to cents.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use financing_engine::{generate_amortization_table, AmortizationMethod, LoanTerms};
//! use rust_decimal_macros::dec;
//!
//! fn main() {
//!     let terms = LoanTerms::new(
//!         dec!(12000),
//!         dec!(0.12),
//!         12,
//!         AmortizationMethod::Sac,
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     );
//!
//!     match generate_amortization_table(&terms) {
//!         Ok(schedule) => {
//!             let first = &schedule.installments[0];
//!             println!("First Payment:  {}", first.payment_amount);
//!             println!("Total Interest: {}", schedule.summary.total_interest);
//!         }
//!         Err(e) => {
//!             eprintln!("Error generating schedule: {}", e);
//!         }
//!     }
//! }
//! ```

pub mod early_payment;
pub mod error;
pub mod installment;
pub mod reconcile;
pub mod schedule;
pub mod terms;

pub use early_payment::{EarlyPaymentPreference, EarlyPaymentResult, simulate_early_payment};
pub use error::{ArithmeticError, Error, Result, ValidationError};
pub use reconcile::{BalanceReport, RecordedPayment, calculate_updated_balance};
pub use schedule::{
    AmortizationSchedule, InstallmentRow, MethodComparison, ScheduleSummary, compare_methods,
    generate_amortization_table,
};
pub use terms::{AmortizationMethod, LoanTerms, MAX_TERM_MONTHS};
