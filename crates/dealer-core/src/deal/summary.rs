use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, trace, warn};

use super::acquisition::compute_acquisition;
use super::expenses::{aggregate_expenses, ExpenseLine};
use super::financing::compute_financing;
use super::input::DealInput;
use super::lots::{aggregate_lots, balance_is_complete, LotLine};
use super::vat::{lot_vat_position, VatAccumulators};
use crate::error::DealerError;
use crate::normalize::NumericField;
use crate::types::{
    percent_of, saturating_sum, with_metadata, ComputationOutput, Money, Percent,
};
use crate::DealerResult;

/// Profitability at or below this percentage is flagged on the report.
pub const LOW_PROFITABILITY_THRESHOLD: Percent = dec!(20);

/// Largest amount (or area) [`analyse_deal`] accepts in a single field.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Longest loan or commission term [`analyse_deal`] accepts, in months.
pub const MAX_DURATION_MONTHS: Decimal = dec!(1200);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every report metric of a deal.
///
/// A pure function of the [`DealInput`] it was built from; recompute it
/// whenever the input changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealSummary {
    // --- Acquisition ---
    pub purchase_total: Money,
    pub notary_fees: Money,
    pub acquisition_cost_total: Money,
    pub application_cost: Money,

    // --- Lots ---
    pub lots: Vec<LotLine>,
    pub total_resale: Money,
    pub lots_total_revenue: Money,
    pub total_lot_balance: Percent,

    // --- Expenses ---
    pub expenses: Vec<ExpenseLine>,
    pub total_expense_vat: Money,
    pub total_expense_cost: Money,

    // --- Financing ---
    pub down_payment: Money,
    pub base_amount: Money,
    pub borrowed_amount: Money,
    pub application_fee: Money,
    pub loan_interest: Money,
    pub commitment_fees: Money,
    pub mortgage_fees: Money,
    pub total_financing: Money,

    // --- Deal ---
    pub total_project_cost: Money,
    pub turn_over: Money,
    pub margin: Money,
    pub full_vat_total: Money,
    pub vat_on_margin_total: Money,
    pub recoverable_vat_total: Money,
    pub total_vat: Money,
    pub margin_net_vat: Money,
    pub profitability_percent: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitabilityBand {
    /// At or below [`LOW_PROFITABILITY_THRESHOLD`]
    Low,
    Healthy,
}

impl DealSummary {
    pub fn profitability_band(&self) -> ProfitabilityBand {
        if self.profitability_percent <= LOW_PROFITABILITY_THRESHOLD {
            ProfitabilityBand::Low
        } else {
            ProfitabilityBand::Healthy
        }
    }

    pub fn vat_accumulators(&self) -> VatAccumulators {
        VatAccumulators {
            full_vat_total: self.full_vat_total,
            vat_on_margin_total: self.vat_on_margin_total,
            recoverable_vat_total: self.recoverable_vat_total,
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the full set of report metrics from a deal.
///
/// Pure and deterministic: the same input always yields the same summary.
/// Partially filled inputs are fine, empty fields count as zero.
pub fn build(input: &DealInput) -> DealSummary {
    let acquisition = compute_acquisition(&input.purchase, &input.acquisition);
    let mut lots = aggregate_lots(&input.lots);
    let expenses = aggregate_expenses(&input.expenses);
    let financing = compute_financing(
        &input.financing,
        acquisition.acquisition_cost_total,
        expenses.total_expense_cost,
    );

    let total_project_cost = saturating_sum([
        acquisition.purchase_total,
        acquisition.acquisition_cost_total,
        expenses.total_expense_cost,
    ]);
    let turn_over = lots.total_resale;
    let margin = turn_over
        .saturating_sub(total_project_cost)
        .saturating_sub(financing.total_financing);

    // Costs are spread over the lots by their balance share; each lot then
    // books its VAT position into the accumulator of its regime.
    let all_in_cost = total_project_cost.saturating_add(financing.total_financing);
    let mut vat = VatAccumulators::default();
    for line in lots.lines.iter_mut() {
        line.lot_margin = line
            .resale_price
            .saturating_sub(percent_of(all_in_cost, line.balance_percent));
        line.vat_contribution = lot_vat_position(
            line.vat_regime,
            line.vat_amount,
            line.lot_margin,
            expenses.vat_share(line.balance_percent),
        );
        vat.record(line.vat_regime, line.vat_contribution);
        trace!(
            lot = line.id,
            regime = line.vat_regime.label(),
            lot_margin = %line.lot_margin,
            vat = %line.vat_contribution,
            "lot VAT position"
        );
    }

    let total_vat = vat.total_vat();
    let margin_net_vat = margin.saturating_sub(total_vat);

    DealSummary {
        purchase_total: acquisition.purchase_total,
        notary_fees: acquisition.notary_fees,
        acquisition_cost_total: acquisition.acquisition_cost_total,
        application_cost: acquisition.application_cost,

        total_resale: lots.total_resale,
        lots_total_revenue: lots.lots_total_revenue,
        total_lot_balance: lots.total_balance,
        lots: lots.lines,

        total_expense_vat: expenses.total_expense_vat,
        total_expense_cost: expenses.total_expense_cost,
        expenses: expenses.lines,

        down_payment: financing.down_payment,
        base_amount: financing.base_amount,
        borrowed_amount: financing.borrowed_amount,
        application_fee: financing.application_fee,
        loan_interest: financing.loan_interest,
        commitment_fees: financing.commitment_fees,
        mortgage_fees: financing.mortgage_fees,
        total_financing: financing.total_financing,

        total_project_cost,
        turn_over,
        margin,
        full_vat_total: vat.full_vat_total,
        vat_on_margin_total: vat.vat_on_margin_total,
        recoverable_vat_total: vat.recoverable_vat_total,
        total_vat,
        margin_net_vat,
        profitability_percent: profitability_percent(margin_net_vat, total_project_cost),
    }
}

/// Analyse a deal: check the input contract, build the summary and wrap it
/// in the standard computation envelope with warnings for unusual figures.
pub fn analyse_deal(input: &DealInput) -> DealerResult<ComputationOutput<DealSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let summary = build(input);

    if summary.total_project_cost.is_zero() {
        warnings.push("Total project cost is zero; profitability is reported as 0%.".into());
    }
    if summary.margin < Decimal::ZERO {
        warnings.push(format!(
            "Negative margin of {} before VAT.",
            summary.margin
        ));
    }
    if summary.base_amount <= Decimal::ZERO && has_financing_rates(input) {
        warnings.push(
            "Down payment covers the whole funded amount; financing rates were ignored.".into(),
        );
    }

    for w in &warnings {
        warn!(warning = %w, "deal analysis");
    }
    debug!(
        total_project_cost = %summary.total_project_cost,
        margin_net_vat = %summary.margin_net_vat,
        profitability_percent = %summary.profitability_percent,
        "deal summary built"
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Property Dealer Deal Profitability (margin net of VAT over total project cost)",
        input,
        warnings,
        elapsed,
        summary,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn profitability_percent(margin_net_vat: Money, total_project_cost: Money) -> Percent {
    if total_project_cost <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let ratio = match margin_net_vat.checked_div(total_project_cost) {
        Some(ratio) => ratio.saturating_mul(dec!(100)),
        None if margin_net_vat.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    };
    ratio.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn has_financing_rates(input: &DealInput) -> bool {
    let f = &input.financing;
    [
        &f.loan_interest_rate_percent,
        &f.commission_rate_percent,
        &f.mortgage_rate_percent,
    ]
    .iter()
    .any(|field| !field.value().is_zero())
}

fn validate_input(input: &DealInput, warnings: &mut Vec<String>) -> DealerResult<()> {
    check_amount("purchase.faiPrice", &input.purchase.fai_price)?;
    check_amount("purchase.agencyFees", &input.purchase.agency_fees)?;
    check_percent(
        "acquisition.acquisitionPercentage",
        &input.acquisition.acquisition_percentage,
    )?;

    for (i, lot) in input.lots.iter().enumerate() {
        check_amount(&format!("lots[{i}].resalePrice"), &lot.resale_price)?;
        check_amount(&format!("lots[{i}].areaM2"), &lot.area_m2)?;
        check_percent(&format!("lots[{i}].balancePercent"), &lot.balance_percent)?;

        if lot.area_m2.value().is_zero() {
            warnings.push(format!(
                "Lot {} ('{}') has no area; price per m² is not applicable.",
                i + 1,
                lot.name
            ));
        }
    }

    for (i, expense) in input.expenses.iter().enumerate() {
        check_amount(&format!("expenses[{i}].priceExclTax"), &expense.price_excl_tax)?;
        check_percent(
            &format!("expenses[{i}].vatRatePercent"),
            &expense.vat_rate_percent,
        )?;
    }

    let f = &input.financing;
    check_amount("financing.applicationFee", &f.application_fee)?;
    check_duration("financing.loanDurationMonths", &f.loan_duration_months)?;
    check_duration(
        "financing.commissionDurationMonths",
        &f.commission_duration_months,
    )?;
    for (field, rate) in f.rates() {
        check_percent(field, rate)?;
    }

    if input.lots.is_empty() {
        warnings.push("No lots entered; turnover is zero.".into());
    } else {
        let total_balance = saturating_sum(input.lots.iter().map(|l| l.balance_percent.value()));
        if !balance_is_complete(total_balance) {
            warnings.push(format!(
                "Lot balances total {total_balance}%, expected 100%; the deal cannot be submitted."
            ));
        }
    }

    Ok(())
}

fn check_range(
    field: &str,
    value: &NumericField,
    max: Decimal,
    reason: &str,
) -> DealerResult<()> {
    if let NumericField::Value(v) = value {
        if *v < Decimal::ZERO {
            return Err(DealerError::InvalidInput {
                field: field.into(),
                reason: "Value must not be negative".into(),
            });
        }
        if *v > max {
            return Err(DealerError::InvalidInput {
                field: field.into(),
                reason: reason.into(),
            });
        }
    }
    Ok(())
}

fn check_amount(field: &str, value: &NumericField) -> DealerResult<()> {
    check_range(field, value, MAX_AMOUNT, "Amount exceeds 1 000 000 000 000")
}

fn check_percent(field: &str, value: &NumericField) -> DealerResult<()> {
    check_range(
        field,
        value,
        Decimal::ONE_HUNDRED,
        "Percentage must be between 0 and 100",
    )
}

fn check_duration(field: &str, value: &NumericField) -> DealerResult<()> {
    check_range(
        field,
        value,
        MAX_DURATION_MONTHS,
        "Duration must not exceed 1200 months",
    )
}
