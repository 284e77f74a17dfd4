use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::input::Lot;
use super::vat::{self, VatRegime};
use crate::types::{round_unit, saturating_sum, Money, Percent};

/// Allowed drift of the lot balance total around 100 %.
pub const BALANCE_TOLERANCE: Percent = dec!(0.0001);

/// Derived figures of one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotLine {
    pub id: u64,
    pub name: String,
    pub resale_price: Money,
    pub area_m2: Decimal,
    /// `None` when the area is zero: there is no price to show, not a zero price.
    pub price_per_m2: Option<Money>,
    /// Missing regimes are treated as exempt.
    pub vat_regime: VatRegime,
    pub vat_amount: Money,
    pub total_with_vat: Money,
    pub balance_percent: Percent,
    /// The lot's share of the deal margin (set once deal totals are known)
    pub lot_margin: Money,
    /// What this lot books into its regime's VAT accumulator
    pub vat_contribution: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotsBreakdown {
    pub lines: Vec<LotLine>,
    pub total_resale: Money,
    pub lots_total_revenue: Money,
    pub total_balance: Percent,
}

/// `None` without an area, or when the ratio is beyond the decimal range.
pub fn price_per_m2(resale_price: Money, area_m2: Decimal) -> Option<Money> {
    if area_m2 > Decimal::ZERO {
        resale_price.checked_div(area_m2).map(round_unit)
    } else {
        None
    }
}

/// Whether a balance total is 100 % within [`BALANCE_TOLERANCE`].
pub fn balance_is_complete(total_balance: Percent) -> bool {
    (total_balance - dec!(100)).abs() <= BALANCE_TOLERANCE
}

pub fn aggregate_lots(lots: &[Lot]) -> LotsBreakdown {
    let lines: Vec<LotLine> = lots.iter().map(lot_line).collect();

    let total_resale = saturating_sum(lines.iter().map(|l| l.resale_price));
    let lots_total_revenue = saturating_sum(lines.iter().map(|l| l.total_with_vat));
    let total_balance = saturating_sum(lines.iter().map(|l| l.balance_percent));

    LotsBreakdown {
        lines,
        total_resale,
        lots_total_revenue,
        total_balance,
    }
}

fn lot_line(lot: &Lot) -> LotLine {
    let resale_price = lot.resale_price.value();
    let area_m2 = lot.area_m2.value();
    let vat_regime = lot.vat_regime.unwrap_or(VatRegime::Exempt);
    let vat_amount = vat::vat_amount(resale_price, vat_regime);

    LotLine {
        id: lot.id,
        name: lot.name.clone(),
        resale_price,
        area_m2,
        price_per_m2: price_per_m2(resale_price, area_m2),
        vat_regime,
        vat_amount,
        total_with_vat: vat::price_with_vat(resale_price, vat_amount),
        balance_percent: lot.balance_percent.value(),
        lot_margin: Decimal::ZERO,
        vat_contribution: Decimal::ZERO,
    }
}
