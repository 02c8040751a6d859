//! Error types for the financing engine

use rust_decimal::Decimal;
use thiserror::Error;

/// Root error type returned by every engine operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

/// Rejected inputs. Raised before any computation starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("principal must be greater than zero, got {0}")]
    NonPositivePrincipal(Decimal),

    #[error("annual interest rate must be greater than zero, got {0}")]
    NonPositiveRate(Decimal),

    #[error("annual interest rate cannot be negative, got {0}")]
    NegativeRate(Decimal),

    #[error("term must be at least one month")]
    ZeroTerm,

    #[error("term of {months} months exceeds the maximum of {max} months")]
    TermTooLong { months: u32, max: u32 },

    #[error("unknown amortization method '{0}' (expected SAC or Price)")]
    UnknownMethod(String),

    #[error("unknown early payment preference '{0}' (expected reducao_prazo or reducao_parcela)")]
    UnknownPreference(String),

    #[error("early payment must be greater than zero, got {0}")]
    NonPositiveEarlyPayment(Decimal),

    #[error("early payment of {amount} cannot be greater than or equal to the outstanding balance of {balance}")]
    EarlyPaymentExceedsBalance { amount: Decimal, balance: Decimal },
}

/// Computations whose result cannot be represented as a `Decimal` or a date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("decimal overflow while computing {0}")]
    Overflow(&'static str),

    #[error("division by zero while computing {0}")]
    DivisionByZero(&'static str),

    #[error("logarithm of a non-positive value while computing {0}")]
    LogDomain(&'static str),

    #[error("due date of installment {0} is outside the supported calendar range")]
    DateOutOfRange(u32),
}

pub type Result<T> = std::result::Result<T, Error>;
