use serde::{Deserialize, Serialize};

use super::vat::VatRegime;
use crate::normalize::{text_or_empty, NumericField};
use crate::DealerResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw figures of one deal, as captured by the edit form.
///
/// Every numeric slot is a [`NumericField`] so a half-filled draft can be
/// carried around and recomputed without losing what the user typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredDealInput")]
pub struct DealInput {
    pub purchase: PurchaseInput,
    pub acquisition: AcquisitionInput,
    pub lots: Vec<Lot>,
    pub expenses: Vec<Expense>,
    pub financing: FinancingInput,
}

impl DealInput {
    /// Parse a deal from the JSON the edit form posts.
    pub fn from_json(json: &str) -> DealerResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Wire shape of a deal. Stored projects carry the notary fee rate as
/// `purchase.acquisitionCostPercentage` rather than under `acquisition`.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredDealInput {
    purchase: StoredPurchase,
    acquisition: AcquisitionInput,
    lots: Vec<Lot>,
    expenses: Vec<Expense>,
    financing: FinancingInput,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StoredPurchase {
    fai_price: NumericField,
    agency_fees: NumericField,
    acquisition_cost_percentage: NumericField,
}

impl From<StoredDealInput> for DealInput {
    fn from(stored: StoredDealInput) -> Self {
        let StoredPurchase {
            fai_price,
            agency_fees,
            acquisition_cost_percentage,
        } = stored.purchase;

        let mut acquisition = stored.acquisition;
        if acquisition.acquisition_percentage.is_empty() {
            acquisition.acquisition_percentage = acquisition_cost_percentage;
        }

        DealInput {
            purchase: PurchaseInput {
                fai_price,
                agency_fees,
            },
            acquisition,
            lots: stored.lots,
            expenses: stored.expenses,
            financing: stored.financing,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseInput {
    /// Purchase price, agency commission included
    pub fai_price: NumericField,
    pub agency_fees: NumericField,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcquisitionInput {
    /// Notary fee rate applied to the FAI price, in percent
    pub acquisition_percentage: NumericField,
}

/// One resalable unit of the deal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lot {
    pub id: u64,
    #[serde(deserialize_with = "text_or_empty")]
    pub name: String,
    #[serde(alias = "resale")]
    pub resale_price: NumericField,
    #[serde(alias = "area")]
    pub area_m2: NumericField,
    #[serde(alias = "vat", alias = "vatType")]
    pub vat_regime: Option<VatRegime>,
    /// Share of the deal attributed to this lot, in percent
    #[serde(alias = "balance")]
    pub balance_percent: NumericField,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub id: u64,
    #[serde(deserialize_with = "text_or_empty")]
    pub label: String,
    #[serde(alias = "price")]
    pub price_excl_tax: NumericField,
    #[serde(alias = "vatRate")]
    pub vat_rate_percent: NumericField,
}

/// Financing parameters. Rates are percentages, durations are months.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancingInput {
    pub application_fee: NumericField,
    #[serde(alias = "downPaymentRate", alias = "contributionPercentage")]
    pub down_payment_rate_percent: NumericField,
    #[serde(alias = "loanInterestRate", alias = "interestRate")]
    pub loan_interest_rate_percent: NumericField,
    #[serde(alias = "loanDuration", alias = "durationMonths")]
    pub loan_duration_months: NumericField,
    #[serde(alias = "commissionRate")]
    pub commission_rate_percent: NumericField,
    #[serde(alias = "commissionDuration")]
    pub commission_duration_months: NumericField,
    #[serde(alias = "mortgageRate", alias = "montageRate")]
    pub mortgage_rate_percent: NumericField,
}

impl FinancingInput {
    /// All rate-type fields, used when checking the percentage contract.
    pub(crate) fn rates(&self) -> [(&'static str, &NumericField); 4] {
        [
            ("financing.downPaymentRatePercent", &self.down_payment_rate_percent),
            ("financing.loanInterestRatePercent", &self.loan_interest_rate_percent),
            ("financing.commissionRatePercent", &self.commission_rate_percent),
            ("financing.mortgageRatePercent", &self.mortgage_rate_percent),
        ]
    }
}
