use std::collections::BTreeSet;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ArithmeticError, Result};
use crate::installment::round_money;
use crate::schedule::{InstallmentRow, generate_amortization_table};
use crate::terms::LoanTerms;

/// Money actually paid against one installment, as recorded by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedPayment {
    pub installment_number: u32,
    pub payment_amount: Decimal,
    pub principal_amount: Decimal,
    pub interest_amount: Decimal,
}

/// Live state of a financing after reconciling its schedule with the
/// payments recorded so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceReport {
    /// Principal minus the principal portions actually recorded.
    pub current_balance: Decimal,
    /// Scheduled amortization of the installments no payment covers.
    pub remaining_balance: Decimal,
    pub total_paid: Decimal,
    pub total_interest_paid: Decimal,
    pub paid_installments: u32,
    pub remaining_installments: u32,
    /// Share of the scheduled total (principal plus interest) already paid, 0 to 100.
    pub percentage_paid: Decimal,
    /// The earliest scheduled installment no payment covers.
    pub next_installment: Option<InstallmentRow>,
}

/// Reconciles the schedule generated from `terms` with the payments made.
///
/// Payments referencing an installment outside the schedule are ignored.
/// Several payments against the same installment all add to the totals but
/// count it as paid once. The result does not depend on the order of
/// `payments`.
pub fn calculate_updated_balance(
    terms: &LoanTerms,
    payments: &[RecordedPayment],
) -> Result<BalanceReport> {
    let schedule = generate_amortization_table(terms)?;

    let mut current_balance = terms.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest_paid = Decimal::ZERO;
    let mut paid = BTreeSet::new();

    for payment in payments {
        if schedule.installment(payment.installment_number).is_none() {
            warn!(
                installment_number = payment.installment_number,
                term_months = terms.term_months,
                "ignoring payment for an installment outside the schedule"
            );
            continue;
        }
        total_paid = total_paid
            .checked_add(payment.payment_amount)
            .ok_or(ArithmeticError::Overflow("total paid"))?;
        total_interest_paid = total_interest_paid
            .checked_add(payment.interest_amount)
            .ok_or(ArithmeticError::Overflow("total interest paid"))?;
        current_balance = current_balance
            .checked_sub(payment.principal_amount)
            .ok_or(ArithmeticError::Overflow("current balance"))?;
        paid.insert(payment.installment_number);
    }

    let (matched, unmatched): (Vec<&InstallmentRow>, Vec<&InstallmentRow>) = schedule
        .installments
        .iter()
        .partition(|row| paid.contains(&row.installment_number));

    let remaining_balance: Decimal = unmatched.iter().map(|row| row.principal_amount).sum();
    let paid_installments = matched.len() as u32;

    let scheduled_total = terms.principal + schedule.summary.total_interest;
    let percentage_paid = (total_paid / scheduled_total * dec!(100))
        .round_dp(2)
        .clamp(Decimal::ZERO, dec!(100));

    let report = BalanceReport {
        current_balance: round_money(current_balance.max(Decimal::ZERO)),
        remaining_balance: round_money(remaining_balance.max(Decimal::ZERO)),
        total_paid: round_money(total_paid),
        total_interest_paid: round_money(total_interest_paid),
        paid_installments,
        remaining_installments: terms.term_months - paid_installments,
        percentage_paid,
        next_installment: unmatched.first().map(|row| (*row).clone()),
    };

    debug!(
        paid_installments = report.paid_installments,
        remaining_balance = %report.remaining_balance,
        current_balance = %report.current_balance,
        "reconciled financing balance"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::terms::AmortizationMethod;
    use chrono::NaiveDate;

    fn fixture() -> LoanTerms {
        LoanTerms::new(
            dec!(12000),
            dec!(0.12),
            12,
            AmortizationMethod::Sac,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )
    }

    fn scheduled_payment(row: &InstallmentRow) -> RecordedPayment {
        RecordedPayment {
            installment_number: row.installment_number,
            payment_amount: row.payment_amount,
            principal_amount: row.principal_amount,
            interest_amount: row.interest_amount,
        }
    }

    #[test]
    fn test_no_payments() {
        let report = calculate_updated_balance(&fixture(), &[]).unwrap();
        assert_eq!(report.current_balance, dec!(12000));
        assert_eq!(report.remaining_balance, dec!(12000));
        assert_eq!(report.total_paid, dec!(0));
        assert_eq!(report.paid_installments, 0);
        assert_eq!(report.remaining_installments, 12);
        assert_eq!(report.percentage_paid, dec!(0));
        assert_eq!(report.next_installment.unwrap().installment_number, 1);
    }

    #[test]
    fn test_scheduled_payments_keep_both_balances_in_agreement() {
        let terms = fixture();
        let schedule = generate_amortization_table(&terms).unwrap();
        let payments: Vec<_> = schedule.installments[..3].iter().map(scheduled_payment).collect();

        let report = calculate_updated_balance(&terms, &payments).unwrap();
        assert_eq!(report.current_balance, dec!(9000.00));
        assert_eq!(report.remaining_balance, dec!(9000.00));
        assert_eq!(report.total_paid, dec!(3330.00));
        assert_eq!(report.total_interest_paid, dec!(330.00));
        assert_eq!(report.paid_installments, 3);
        assert_eq!(report.remaining_installments, 9);
        // 3330 / 12780 * 100
        assert_eq!(report.percentage_paid, dec!(26.06));
        assert_eq!(report.next_installment.unwrap().installment_number, 4);
    }

    #[test]
    fn test_skipped_installment_is_next_due() {
        let terms = fixture();
        let schedule = generate_amortization_table(&terms).unwrap();
        let payments = vec![
            scheduled_payment(&schedule.installments[0]),
            scheduled_payment(&schedule.installments[2]),
        ];

        let report = calculate_updated_balance(&terms, &payments).unwrap();
        assert_eq!(report.paid_installments, 2);
        assert_eq!(report.next_installment.unwrap().installment_number, 2);
        assert_eq!(report.remaining_balance, dec!(10000.00));
    }

    #[test]
    fn test_partial_payment_splits_the_two_balance_views() {
        let terms = fixture();
        let payments = vec![RecordedPayment {
            installment_number: 1,
            payment_amount: dec!(620.00),
            principal_amount: dec!(500.00),
            interest_amount: dec!(120.00),
        }];

        let report = calculate_updated_balance(&terms, &payments).unwrap();
        assert_eq!(report.current_balance, dec!(11500.00));
        assert_eq!(report.remaining_balance, dec!(11000.00));
    }

    #[test]
    fn test_unknown_installments_are_ignored() {
        let payments = vec![
            RecordedPayment {
                installment_number: 0,
                payment_amount: dec!(100),
                principal_amount: dec!(100),
                interest_amount: dec!(0),
            },
            RecordedPayment {
                installment_number: 99,
                payment_amount: dec!(100),
                principal_amount: dec!(100),
                interest_amount: dec!(0),
            },
        ];

        let report = calculate_updated_balance(&fixture(), &payments).unwrap();
        assert_eq!(report, calculate_updated_balance(&fixture(), &[]).unwrap());
    }

    #[test]
    fn test_duplicate_payments_count_installment_once() {
        let payments = vec![
            RecordedPayment {
                installment_number: 1,
                payment_amount: dec!(560),
                principal_amount: dec!(500),
                interest_amount: dec!(60),
            },
            RecordedPayment {
                installment_number: 1,
                payment_amount: dec!(560),
                principal_amount: dec!(500),
                interest_amount: dec!(60),
            },
        ];

        let report = calculate_updated_balance(&fixture(), &payments).unwrap();
        assert_eq!(report.paid_installments, 1);
        assert_eq!(report.remaining_installments, 11);
        assert_eq!(report.total_paid, dec!(1120));
        assert_eq!(report.current_balance, dec!(11000));
    }

    #[test]
    fn test_overflowing_payment_amounts_are_reported() {
        let payments = vec![
            RecordedPayment {
                installment_number: 1,
                payment_amount: Decimal::MAX,
                principal_amount: dec!(1000),
                interest_amount: dec!(120),
            },
            RecordedPayment {
                installment_number: 2,
                payment_amount: Decimal::MAX,
                principal_amount: dec!(1000),
                interest_amount: dec!(110),
            },
        ];

        let err = calculate_updated_balance(&fixture(), &payments).unwrap_err();
        assert_eq!(err, Error::Arithmetic(ArithmeticError::Overflow("total paid")));
    }

    #[test]
    fn test_fully_paid_financing() {
        let terms = fixture();
        let schedule = generate_amortization_table(&terms).unwrap();
        let payments: Vec<_> = schedule.installments.iter().map(scheduled_payment).collect();

        let report = calculate_updated_balance(&terms, &payments).unwrap();
        assert_eq!(report.current_balance, dec!(0));
        assert_eq!(report.remaining_balance, dec!(0));
        assert_eq!(report.remaining_installments, 0);
        assert_eq!(report.percentage_paid, dec!(100));
        assert!(report.next_installment.is_none());
    }
}
