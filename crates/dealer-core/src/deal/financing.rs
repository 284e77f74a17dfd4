use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::input::FinancingInput;
use crate::types::{percent_of, round_unit, saturating_sum, Money, Percent};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Financing cost of the deal. Every line is in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancingCosts {
    pub down_payment: Money,
    /// Acquisition cost + expenses − down payment; the base every fee is
    /// computed on
    pub base_amount: Money,
    pub borrowed_amount: Money,
    pub application_fee: Money,
    pub loan_interest: Money,
    pub commitment_fees: Money,
    pub mortgage_fees: Money,
    pub total_financing: Money,
}

/// Down payment on the funded amount. No rate means no down payment.
pub fn down_payment(funded: Money, rate_percent: Percent) -> Money {
    if rate_percent.is_zero() {
        return Decimal::ZERO;
    }
    round_unit(percent_of(funded, rate_percent))
}

/// Simple, non-compounding interest pro-rated over `months`.
pub fn pro_rated_cost(base: Money, rate_percent: Percent, months: Decimal) -> Money {
    if base <= Decimal::ZERO || rate_percent.is_zero() || months.is_zero() {
        return Decimal::ZERO;
    }
    round_unit(percent_of(base, rate_percent).saturating_mul(months) / MONTHS_PER_YEAR)
}

/// Flat percentage of the base, independent of duration.
pub fn flat_cost(base: Money, rate_percent: Percent) -> Money {
    if base <= Decimal::ZERO || rate_percent.is_zero() {
        return Decimal::ZERO;
    }
    round_unit(percent_of(base, rate_percent))
}

/// Compute the financing lines from the acquisition and expense totals.
///
/// The down payment and base amount are settled first; the three fee lines
/// only read the base and are independent of one another. A base of zero or
/// less (self-funded deal) carries no rate-dependent fee.
pub fn compute_financing(
    financing: &FinancingInput,
    acquisition_cost_total: Money,
    total_expense_cost: Money,
) -> FinancingCosts {
    let funded = acquisition_cost_total.saturating_add(total_expense_cost);
    let down_payment = down_payment(funded, financing.down_payment_rate_percent.value());
    let base_amount = funded.saturating_sub(down_payment);
    if base_amount <= Decimal::ZERO {
        debug!(%funded, %down_payment, "nothing borrowed, rate-dependent fees skipped");
    }

    let loan_interest = pro_rated_cost(
        base_amount,
        financing.loan_interest_rate_percent.value(),
        financing.loan_duration_months.value(),
    );
    let commitment_fees = pro_rated_cost(
        base_amount,
        financing.commission_rate_percent.value(),
        financing.commission_duration_months.value(),
    );
    let mortgage_fees = flat_cost(base_amount, financing.mortgage_rate_percent.value());

    let application_fee = financing.application_fee.value();
    let total_financing = round_unit(saturating_sum([
        application_fee,
        loan_interest,
        commitment_fees,
        mortgage_fees,
    ]));

    FinancingCosts {
        down_payment,
        base_amount,
        borrowed_amount: base_amount.max(Decimal::ZERO),
        application_fee,
        loan_interest,
        commitment_fees,
        mortgage_fees,
        total_financing,
    }
}
