//! Per-installment math shared by the schedule generator, the balance
//! reconciler and the early payment simulator.
//!
//! Every function here is pure and works on `Decimal`, so two calls with
//! the same inputs always produce the same cents.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::error::{ArithmeticError, Result, ValidationError};
use crate::terms::AmortizationMethod;

/// Decimal places kept for every monetary value.
pub const MONEY_DP: u32 = 2;

/// Rounds a monetary value to cents.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp(MONEY_DP)
}

/// Converts an annual rate fraction into the monthly rate by flat division.
///
/// 12% a year is exactly 1% a month here; there is no compounding conversion.
pub fn monthly_rate(annual_interest_rate: Decimal) -> Decimal {
    annual_interest_rate / dec!(12)
}

/// Interest accrued in one month over `balance`, rounded to cents.
pub fn interest_for(balance: Decimal, monthly_rate: Decimal) -> Decimal {
    round_money(balance * monthly_rate)
}

/// Fixed installment of the Price table, rounded to cents.
pub fn price_payment(principal: Decimal, monthly_rate: Decimal, months: u32) -> Result<Decimal> {
    price_payment_exact(principal, monthly_rate, months).map(round_money)
}

/// Fixed installment of the Price table at full `Decimal` precision.
///
/// PMT = P * [i(1 + i)^n] / [(1 + i)^n – 1], degenerating to P / n when i is zero.
pub fn price_payment_exact(
    principal: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Decimal> {
    if months == 0 {
        return Err(ValidationError::ZeroTerm.into());
    }
    if monthly_rate.is_zero() {
        return Ok(principal / Decimal::from(months));
    }

    let i_plus_1_pow_n = (Decimal::ONE + monthly_rate)
        .checked_powu(months.into())
        .ok_or(ArithmeticError::Overflow("(1 + i)^n"))?;
    let numerator = principal
        .checked_mul(monthly_rate)
        .and_then(|value| value.checked_mul(i_plus_1_pow_n))
        .ok_or(ArithmeticError::Overflow("Price installment"))?;
    let denominator = i_plus_1_pow_n - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return Err(ArithmeticError::Overflow("Price installment").into());
    }

    Ok(numerator / denominator)
}

/// Constant principal portion of a SAC installment, rounded to cents.
pub fn sac_amortization(principal: Decimal, months: u32) -> Result<Decimal> {
    if months == 0 {
        return Err(ValidationError::ZeroTerm.into());
    }
    Ok(round_money(principal / Decimal::from(months)))
}

/// The first installment a borrower pays under `method`.
///
/// For Price this is the fixed installment; for SAC it is the largest one
/// (constant amortization plus interest on the full principal).
pub fn first_installment(
    method: AmortizationMethod,
    principal: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Decimal> {
    match method {
        AmortizationMethod::Price => price_payment(principal, monthly_rate, months),
        AmortizationMethod::Sac => {
            Ok(sac_amortization(principal, months)? + interest_for(principal, monthly_rate))
        }
    }
}

/// Total interest paid over the whole term: everything paid minus the principal.
///
/// Price pays `PMT * n`. SAC pays interest on a balance falling linearly
/// from P to P / n, which sums to `i * P * (n + 1) / 2`.
pub fn total_interest(
    method: AmortizationMethod,
    principal: Decimal,
    monthly_rate: Decimal,
    months: u32,
) -> Result<Decimal> {
    match method {
        AmortizationMethod::Price => {
            let payment = price_payment(principal, monthly_rate, months)?;
            let total_paid = payment
                .checked_mul(Decimal::from(months))
                .ok_or(ArithmeticError::Overflow("total paid"))?;
            Ok(round_money(total_paid - principal))
        }
        AmortizationMethod::Sac => {
            if months == 0 {
                return Err(ValidationError::ZeroTerm.into());
            }
            let interest = principal
                .checked_mul(monthly_rate)
                .and_then(|value| value.checked_mul(Decimal::from(months) + Decimal::ONE))
                .ok_or(ArithmeticError::Overflow("total interest"))?;
            Ok(round_money(interest / dec!(2)))
        }
    }
}
