use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{percent_of, round_unit, Money, Percent};

/// Standard French VAT rate, in percent.
pub const STANDARD_VAT_RATE: Percent = dec!(20);

/// VAT treatment of a resold lot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VatRegime {
    /// No VAT collected on the sale
    #[serde(alias = "Exonéré de TVA")]
    Exempt,
    /// VAT at the standard rate on the whole resale price
    #[serde(alias = "TVA Intégrale")]
    Full,
    /// VAT on the dealer's margin only, settled at deal level
    #[serde(alias = "TVA sur Marge")]
    OnMargin,
}

impl VatRegime {
    /// Label used on the French report.
    pub fn label(&self) -> &'static str {
        match self {
            VatRegime::Exempt => "Exonéré de TVA",
            VatRegime::Full => "TVA Intégrale",
            VatRegime::OnMargin => "TVA sur Marge",
        }
    }
}

/// Per-lot VAT on the resale price.
///
/// Margin VAT is not a per-lot figure: it depends on the deal margin and is
/// settled by [`margin_vat`] once the deal totals are known.
pub fn vat_amount(base: Money, regime: VatRegime) -> Money {
    match regime {
        VatRegime::Exempt | VatRegime::OnMargin => Decimal::ZERO,
        VatRegime::Full => percent_of(base, STANDARD_VAT_RATE),
    }
}

pub fn price_with_vat(base: Money, vat: Money) -> Money {
    base.saturating_add(vat)
}

/// Flat-rate VAT on an expense line. There is no exemption for expenses.
pub fn flat_vat(price: Money, rate_percent: Percent) -> Money {
    percent_of(price, rate_percent)
}

/// VAT due on a VAT-inclusive margin. A loss carries no margin VAT.
pub fn margin_vat(margin: Money) -> Money {
    if margin <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let rate = STANDARD_VAT_RATE;
    round_unit(margin.saturating_mul(rate) / (dec!(100) + rate))
}

/// The three deal-level VAT accumulators, keyed by regime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VatAccumulators {
    pub full_vat_total: Money,
    pub vat_on_margin_total: Money,
    pub recoverable_vat_total: Money,
}

impl VatAccumulators {
    /// Book a lot's VAT position into the accumulator of its regime.
    pub fn record(&mut self, regime: VatRegime, amount: Money) {
        match regime {
            VatRegime::Full => {
                self.full_vat_total = self.full_vat_total.saturating_add(amount)
            }
            VatRegime::OnMargin => {
                self.vat_on_margin_total = self.vat_on_margin_total.saturating_add(amount)
            }
            VatRegime::Exempt => {
                self.recoverable_vat_total = self.recoverable_vat_total.saturating_add(amount)
            }
        }
    }

    /// Net VAT payable: collected VAT less the recoverable credit.
    pub fn total_vat(&self) -> Money {
        self.full_vat_total
            .saturating_add(self.vat_on_margin_total)
            .saturating_sub(self.recoverable_vat_total)
    }
}

/// VAT position of a single lot, given its share of the deal's input VAT.
///
/// `lot_margin` only matters under [`VatRegime::OnMargin`].
pub fn lot_vat_position(
    regime: VatRegime,
    resale_vat: Money,
    lot_margin: Money,
    input_vat_share: Money,
) -> Money {
    match regime {
        VatRegime::Full => resale_vat.saturating_sub(input_vat_share),
        VatRegime::OnMargin => margin_vat(lot_margin).saturating_sub(input_vat_share),
        VatRegime::Exempt => input_vat_share,
    }
}
