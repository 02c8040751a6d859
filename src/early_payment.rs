use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArithmeticError, Result, ValidationError};
use crate::installment::{
    first_installment, monthly_rate, round_money, sac_amortization, total_interest,
};
use crate::terms::{AmortizationMethod, MAX_TERM_MONTHS};

/// What the borrower wants the extra payment to shrink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EarlyPaymentPreference {
    /// Keep the installment, pay off sooner.
    #[serde(rename = "reducao_prazo", alias = "reduce_term")]
    ReduceTerm,
    /// Keep the term, pay less each month.
    #[serde(rename = "reducao_parcela", alias = "reduce_installment")]
    ReduceInstallment,
}

impl fmt::Display for EarlyPaymentPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EarlyPaymentPreference::ReduceTerm => write!(f, "reducao_prazo"),
            EarlyPaymentPreference::ReduceInstallment => write!(f, "reducao_parcela"),
        }
    }
}

impl FromStr for EarlyPaymentPreference {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reducao_prazo" | "reduce_term" => Ok(EarlyPaymentPreference::ReduceTerm),
            "reducao_parcela" | "reduce_installment" => {
                Ok(EarlyPaymentPreference::ReduceInstallment)
            }
            _ => Err(ValidationError::UnknownPreference(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarlyPaymentResult {
    pub original_principal: Decimal,
    pub original_payment: Decimal,
    pub original_term: u32,
    pub early_payment_amount: Decimal,
    /// Always `original_principal - early_payment_amount`.
    pub new_principal: Decimal,
    pub new_payment: Decimal,
    pub new_term: u32,
    /// Interest over the original scenario minus interest over the new one,
    /// each taken as `payment * term - principal`.
    pub interest_saved: Decimal,
    /// Same as `interest_saved`, except that a Price term reduction charges
    /// its last month only the leftover balance plus interest.
    pub interest_saved_with_partial_last_month: Decimal,
}

/// Simulates applying `early_payment_amount` straight to the principal.
///
/// With [`EarlyPaymentPreference::ReduceInstallment`] the remaining term is
/// kept and the installment is recomputed for the new principal. With
/// [`EarlyPaymentPreference::ReduceTerm`] the installment is kept: Price
/// solves `n = ln(PMT / (PMT - P * i)) / ln(1 + i)` and rounds up to whole
/// months, SAC keeps its monthly amortization and pays the smaller principal
/// off in fewer months. A zero rate falls back to linear division.
///
/// For SAC the reported payment is the first (largest) installment of the
/// scenario. `interest_saved` counts a full installment in every month of the
/// new term; a shortened Price financing really pays only the leftover
/// balance in its last month, which
/// [`EarlyPaymentResult::interest_saved_with_partial_last_month`] reflects.
///
/// # Errors
///
/// Returns a validation error when the early payment is not positive or is not
/// strictly below `principal`, and for a non-positive principal, a negative
/// rate or a zero term.
pub fn simulate_early_payment(
    principal: Decimal,
    annual_interest_rate: Decimal,
    remaining_months: u32,
    method: AmortizationMethod,
    early_payment_amount: Decimal,
    preference: EarlyPaymentPreference,
) -> Result<EarlyPaymentResult> {
    if principal <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrincipal(principal).into());
    }
    if annual_interest_rate < Decimal::ZERO {
        return Err(ValidationError::NegativeRate(annual_interest_rate).into());
    }
    if remaining_months == 0 {
        return Err(ValidationError::ZeroTerm.into());
    }
    if remaining_months > MAX_TERM_MONTHS {
        return Err(ValidationError::TermTooLong {
            months: remaining_months,
            max: MAX_TERM_MONTHS,
        }
        .into());
    }
    if early_payment_amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveEarlyPayment(early_payment_amount).into());
    }
    if early_payment_amount >= principal {
        return Err(ValidationError::EarlyPaymentExceedsBalance {
            amount: early_payment_amount,
            balance: principal,
        }
        .into());
    }

    let rate = monthly_rate(annual_interest_rate);
    let new_principal = principal - early_payment_amount;
    let original_payment = first_installment(method, principal, rate, remaining_months)?;

    let original_interest = total_interest(method, principal, rate, remaining_months)?;

    let (new_payment, new_term, new_interest, partial_interest) = match preference {
        EarlyPaymentPreference::ReduceInstallment => {
            let new_payment = first_installment(method, new_principal, rate, remaining_months)?;
            let new_interest = total_interest(method, new_principal, rate, remaining_months)?;
            (new_payment, remaining_months, new_interest, new_interest)
        }
        EarlyPaymentPreference::ReduceTerm => match method {
            AmortizationMethod::Price => {
                let new_term = price_term_for_payment(new_principal, rate, original_payment)?
                    .min(remaining_months);
                let paid = original_payment
                    .checked_mul(Decimal::from(new_term))
                    .ok_or(ArithmeticError::Overflow("total paid"))?;
                let partial_interest =
                    shortened_price_interest(new_principal, rate, new_term, original_payment)?;
                (original_payment, new_term, paid - new_principal, partial_interest)
            }
            AmortizationMethod::Sac => {
                let amortization = sac_amortization(principal, remaining_months)?;
                let new_term = months_to_repay(new_principal, amortization)?.min(remaining_months);
                let new_payment = first_installment(method, new_principal, rate, new_term)?;
                let new_interest = total_interest(method, new_principal, rate, new_term)?;
                (new_payment, new_term, new_interest, new_interest)
            }
        },
    };

    let result = EarlyPaymentResult {
        original_principal: principal,
        original_payment,
        original_term: remaining_months,
        early_payment_amount,
        new_principal,
        new_payment,
        new_term,
        interest_saved: round_money(original_interest - new_interest),
        interest_saved_with_partial_last_month: round_money(original_interest - partial_interest),
    };

    debug!(
        %method,
        %preference,
        new_term = result.new_term,
        interest_saved = %result.interest_saved,
        "simulated early payment"
    );

    Ok(result)
}

/// Interest of a Price financing kept at `payment` and cut to `months`.
///
/// The last month only pays what is left: the balance after `months - 1`
/// installments plus one month of interest.
fn shortened_price_interest(
    principal: Decimal,
    rate: Decimal,
    months: u32,
    payment: Decimal,
) -> Result<Decimal> {
    let full_months = months.saturating_sub(1);
    let paid_in_full = payment
        .checked_mul(Decimal::from(full_months))
        .ok_or(ArithmeticError::Overflow("total paid"))?;

    let balance_before_last = if rate.is_zero() {
        principal - paid_in_full
    } else {
        let growth = (Decimal::ONE + rate)
            .checked_powu(full_months.into())
            .ok_or(ArithmeticError::Overflow("(1 + i)^n"))?;
        let grown_principal = principal
            .checked_mul(growth)
            .ok_or(ArithmeticError::Overflow("balance before last installment"))?;
        grown_principal - payment * (growth - Decimal::ONE) / rate
    };
    let last_payment = round_money(balance_before_last.max(Decimal::ZERO) * (Decimal::ONE + rate));

    Ok(paid_in_full + last_payment - principal)
}

/// Whole months a Price installment of `payment` needs to repay `principal`.
fn price_term_for_payment(principal: Decimal, rate: Decimal, payment: Decimal) -> Result<u32> {
    if rate.is_zero() {
        return months_to_repay(principal, payment);
    }

    let remaining = payment - principal * rate;
    if remaining <= Decimal::ZERO || payment <= Decimal::ZERO {
        return Err(ArithmeticError::LogDomain("reduced term").into());
    }
    let numerator = (payment / remaining)
        .checked_ln()
        .ok_or(ArithmeticError::LogDomain("reduced term"))?;
    let denominator = (Decimal::ONE + rate)
        .checked_ln()
        .ok_or(ArithmeticError::LogDomain("reduced term"))?;
    if denominator <= Decimal::ZERO {
        return Err(ArithmeticError::LogDomain("reduced term").into());
    }

    // Absorb the approximation error of ln before rounding up.
    let months = (numerator / denominator).round_dp(6).ceil();
    to_months(months)
}

/// Whole months needed to repay `principal` at `per_month`, rounded up.
fn months_to_repay(principal: Decimal, per_month: Decimal) -> Result<u32> {
    if per_month <= Decimal::ZERO {
        return Err(ArithmeticError::DivisionByZero("reduced term").into());
    }
    to_months((principal / per_month).round_dp(6).ceil())
}

fn to_months(months: Decimal) -> Result<u32> {
    months
        .to_u32()
        .map(|months| months.max(1))
        .ok_or_else(|| ArithmeticError::Overflow("reduced term").into())
}
