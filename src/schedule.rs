use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ArithmeticError, Result};
use crate::installment::{price_payment_exact, round_money};
use crate::terms::{AmortizationMethod, LoanTerms};

/// Represents the payment details for a single month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRow {
    /// 1-based position in the schedule.
    pub installment_number: u32,
    pub due_date: NaiveDate,
    /// Total due this month: `principal_amount + interest_amount`.
    pub payment_amount: Decimal,
    /// The portion of the payment that goes towards reducing the principal.
    pub principal_amount: Decimal,
    /// The portion of the payment that covers interest.
    pub interest_amount: Decimal,
    /// The balance left after this installment is paid.
    pub remaining_balance: Decimal,
}

/// Aggregates of a schedule, summed from the already rounded rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_payments: Decimal,
    pub total_principal: Decimal,
    pub total_interest: Decimal,
    pub principal: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationSchedule {
    pub method: AmortizationMethod,
    pub installments: Vec<InstallmentRow>,
    pub summary: ScheduleSummary,
}

impl AmortizationSchedule {
    /// Looks up an installment by its 1-based number.
    pub fn installment(&self, installment_number: u32) -> Option<&InstallmentRow> {
        let index = installment_number.checked_sub(1)?;
        self.installments.get(index as usize)
    }
}

/// Both amortization systems computed over the same terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodComparison {
    pub principal: Decimal,
    pub sac: AmortizationSchedule,
    pub price: AmortizationSchedule,
    /// How much more interest the Price table charges than SAC.
    pub interest_difference: Decimal,
}

/// Generates the month-by-month schedule for `terms`.
///
/// Interest accrues on the balance before the month's amortization. SAC
/// amortizes `principal / n` every month; Price keeps the installment fixed
/// and amortizes whatever the interest leaves. The last row always amortizes
/// the exact remaining balance, so the schedule ends at zero.
///
/// The balance and the installment are carried at full `Decimal` precision;
/// only the fields of each emitted row are rounded to cents.
///
/// # Errors
///
/// Returns a validation error for a non-positive principal or rate or a zero
/// or oversized term, and an arithmetic error when the installment or a due
/// date cannot be represented.
pub fn generate_amortization_table(terms: &LoanTerms) -> Result<AmortizationSchedule> {
    terms.validate()?;

    let rate = terms.monthly_rate();
    let total_months = terms.term_months;
    let exact_payment = match terms.method {
        AmortizationMethod::Price => price_payment_exact(terms.principal, rate, total_months)?,
        AmortizationMethod::Sac => Decimal::ZERO,
    };
    let exact_amortization = terms.principal / Decimal::from(total_months);

    let mut current_balance = terms.principal;
    let mut installments = Vec::with_capacity(total_months as usize);

    for installment_number in 1..=total_months {
        let exact_interest = current_balance * rate;
        let interest = round_money(exact_interest);

        let (amortization, principal_amount) = if installment_number == total_months {
            (current_balance, round_money(current_balance))
        } else {
            match terms.method {
                AmortizationMethod::Sac => (exact_amortization, round_money(exact_amortization)),
                AmortizationMethod::Price => (
                    exact_payment - exact_interest,
                    round_money(exact_payment) - interest,
                ),
            }
        };
        current_balance -= amortization;

        let due_date = terms
            .start_date
            .checked_add_months(Months::new(installment_number - 1))
            .ok_or(ArithmeticError::DateOutOfRange(installment_number))?;

        installments.push(InstallmentRow {
            installment_number,
            due_date,
            payment_amount: principal_amount + interest,
            principal_amount,
            interest_amount: interest,
            remaining_balance: round_money(current_balance.max(Decimal::ZERO)),
        });
    }

    let summary = ScheduleSummary {
        total_payments: installments.iter().map(|row| row.payment_amount).sum(),
        total_principal: installments.iter().map(|row| row.principal_amount).sum(),
        total_interest: installments.iter().map(|row| row.interest_amount).sum(),
        principal: terms.principal,
    };

    debug!(
        method = %terms.method,
        term_months = total_months,
        total_interest = %summary.total_interest,
        "generated amortization schedule"
    );

    Ok(AmortizationSchedule {
        method: terms.method,
        installments,
        summary,
    })
}

/// Calculates both amortization systems for the same loan so they can be
/// compared side by side.
pub fn compare_methods(
    principal: Decimal,
    annual_interest_rate: Decimal,
    term_months: u32,
    start_date: NaiveDate,
) -> Result<MethodComparison> {
    let sac = generate_amortization_table(&LoanTerms::new(
        principal,
        annual_interest_rate,
        term_months,
        AmortizationMethod::Sac,
        start_date,
    ))?;
    let price = generate_amortization_table(&LoanTerms::new(
        principal,
        annual_interest_rate,
        term_months,
        AmortizationMethod::Price,
        start_date,
    ))?;

    Ok(MethodComparison {
        principal,
        interest_difference: price.summary.total_interest - sac.summary.total_interest,
        sac,
        price,
    })
}
