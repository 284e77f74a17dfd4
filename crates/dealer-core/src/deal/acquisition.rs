use serde::{Deserialize, Serialize};

use super::input::{AcquisitionInput, PurchaseInput};
use crate::types::{percent_of, round_unit, Money};

/// Acquisition-stage figures. Notary fees and the acquisition total are whole
/// currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquisitionCosts {
    /// FAI price + agency fees
    pub purchase_total: Money,
    pub notary_fees: Money,
    /// FAI price + notary fees
    pub acquisition_cost_total: Money,
    /// FAI price + agency fees + notary fees
    pub application_cost: Money,
}

pub fn compute_acquisition(
    purchase: &PurchaseInput,
    acquisition: &AcquisitionInput,
) -> AcquisitionCosts {
    let fai_price = purchase.fai_price.value();
    let agency_fees = purchase.agency_fees.value();
    let rate = acquisition.acquisition_percentage.value();

    let notary_fees = round_unit(percent_of(fai_price, rate));
    let acquisition_cost_total = round_unit(fai_price.saturating_add(notary_fees));
    let purchase_total = fai_price.saturating_add(agency_fees);

    AcquisitionCosts {
        purchase_total,
        notary_fees,
        acquisition_cost_total,
        application_cost: purchase_total.saturating_add(notary_fees),
    }
}
