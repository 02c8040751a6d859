use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::installment::monthly_rate;

/// Longest financing accepted, in months (100 years).
pub const MAX_TERM_MONTHS: u32 = 1200;

/// The two amortization systems used for Brazilian financings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmortizationMethod {
    /// Sistema de Amortização Constante: fixed principal, declining installments.
    #[serde(rename = "SAC", alias = "sac")]
    Sac,
    /// Tabela Price (French system): fixed installment.
    #[serde(rename = "Price", alias = "price", alias = "PRICE")]
    Price,
}

impl fmt::Display for AmortizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmortizationMethod::Sac => write!(f, "SAC"),
            AmortizationMethod::Price => write!(f, "Price"),
        }
    }
}

impl FromStr for AmortizationMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sac" => Ok(AmortizationMethod::Sac),
            "price" | "french" => Ok(AmortizationMethod::Price),
            _ => Err(ValidationError::UnknownMethod(s.to_string())),
        }
    }
}

/// Input parameters of a financing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    /// The amount borrowed.
    pub principal: Decimal,
    /// The annual interest rate as a fraction (e.g., 0.12 for 12%).
    pub annual_interest_rate: Decimal,
    /// The number of monthly installments.
    pub term_months: u32,
    pub method: AmortizationMethod,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
}

impl LoanTerms {
    /// Builds the terms without checking them; see [`LoanTerms::validate`].
    pub fn new(
        principal: Decimal,
        annual_interest_rate: Decimal,
        term_months: u32,
        method: AmortizationMethod,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            annual_interest_rate,
            term_months,
            method,
            start_date,
        }
    }

    /// Checks the bounds required before a schedule can be generated.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.principal <= Decimal::ZERO {
            return Err(ValidationError::NonPositivePrincipal(self.principal));
        }
        if self.annual_interest_rate <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveRate(self.annual_interest_rate));
        }
        if self.term_months == 0 {
            return Err(ValidationError::ZeroTerm);
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(ValidationError::TermTooLong {
                months: self.term_months,
                max: MAX_TERM_MONTHS,
            });
        }
        Ok(())
    }

    /// The annual rate divided flat by twelve.
    pub fn monthly_rate(&self) -> Decimal {
        monthly_rate(self.annual_interest_rate)
    }
}
