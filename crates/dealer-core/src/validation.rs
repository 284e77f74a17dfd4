//! Submission rule sets.
//!
//! A project can be submitted as a purchase only when every figure is
//! filled in and the lot balances add up to 100 %. A draft only needs a name
//! and labelled expenses. Both checks stop at the first violation and return
//! the French message shown to the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deal::lots::balance_is_complete;
use crate::normalize::NumericField;
use crate::project::Project;
use crate::types::saturating_sum;

/// The first rule a project broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationFailure {
    /// Path of the offending field, e.g. `lots[1].areaM2`
    pub field: String,
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type ValidationResult = Result<(), ValidationFailure>;

/// Full validation, required before a project is stored as a purchase.
pub fn validate_submit(project: &Project) -> ValidationResult {
    require_text("name", &project.name, "Le nom du projet est obligatoire.")?;
    require_text(
        "address",
        &project.address,
        "L'adresse du projet est obligatoire.",
    )?;

    let deal = &project.deal;

    // Purchase
    require(
        "purchase.faiPrice",
        &deal.purchase.fai_price,
        "Le prix FAI est requis.",
    )?;
    require(
        "purchase.agencyFees",
        &deal.purchase.agency_fees,
        "Des frais d'agence sont requis.",
    )?;
    require(
        "acquisition.acquisitionPercentage",
        &deal.acquisition.acquisition_percentage,
        "Le pourcentage d'acquisition est requis.",
    )?;

    // Lots
    if deal.lots.is_empty() {
        return Err(ValidationFailure::new(
            "lots",
            "Au moins un lot est requis.",
        ));
    }
    for (i, lot) in deal.lots.iter().enumerate() {
        let n = i + 1;
        require_text(
            format!("lots[{i}].name"),
            &lot.name,
            format!("Lot {n}: nom est obligatoire."),
        )?;
        require(
            format!("lots[{i}].resalePrice"),
            &lot.resale_price,
            format!("Lot {n}: prix de revente est obligatoire."),
        )?;
        require(
            format!("lots[{i}].areaM2"),
            &lot.area_m2,
            format!("Lot {n}: surface est requise."),
        )?;
        if lot.vat_regime.is_none() {
            return Err(ValidationFailure::new(
                format!("lots[{i}].vatRegime"),
                format!("Lot {n}: TVA est obligatoire."),
            ));
        }
        require(
            format!("lots[{i}].balancePercent"),
            &lot.balance_percent,
            format!("Lot {n}: Équilibre est requis"),
        )?;
    }

    let total_balance = saturating_sum(deal.lots.iter().map(|l| l.balance_percent.value()));
    if !balance_is_complete(total_balance) {
        return Err(ValidationFailure::new(
            "lots.balancePercent",
            format!(
                "Les lots Équilibre doivent totaliser 100 %. Le total actuel est {}%",
                total_balance.normalize()
            ),
        ));
    }

    // Expenses
    for (i, expense) in deal.expenses.iter().enumerate() {
        let n = i + 1;
        require_label(i, &expense.label)?;
        require(
            format!("expenses[{i}].priceExclTax"),
            &expense.price_excl_tax,
            format!("Dépenses {n}: prix HT est requis"),
        )?;
        require(
            format!("expenses[{i}].vatRatePercent"),
            &expense.vat_rate_percent,
            format!("Dépenses {n}: taux de TVA est requis"),
        )?;
    }

    // Financing
    let f = &deal.financing;
    let financing_fields: [(&str, &NumericField, &str); 7] = [
        (
            "financing.applicationFee",
            &f.application_fee,
            "Frais de dossier est requis",
        ),
        (
            "financing.downPaymentRatePercent",
            &f.down_payment_rate_percent,
            "Taux d'apport est requis",
        ),
        (
            "financing.loanInterestRatePercent",
            &f.loan_interest_rate_percent,
            "Taux d'intérêt est requis",
        ),
        (
            "financing.loanDurationMonths",
            &f.loan_duration_months,
            "Durée du prêt est requis",
        ),
        (
            "financing.commissionRatePercent",
            &f.commission_rate_percent,
            "Taux de commission est requis",
        ),
        (
            "financing.commissionDurationMonths",
            &f.commission_duration_months,
            "Durée de commission est requis",
        ),
        (
            "financing.mortgageRatePercent",
            &f.mortgage_rate_percent,
            "Taux de montage est requis",
        ),
    ];
    for (field, value, message) in financing_fields {
        require(field, value, message)?;
    }

    Ok(())
}

/// Minimal validation for saving a draft. Numbers may be missing or partial.
pub fn validate_draft(project: &Project) -> ValidationResult {
    require_text("name", &project.name, "Le nom du projet est obligatoire")?;

    for (i, expense) in project.deal.expenses.iter().enumerate() {
        require_label(i, &expense.label)?;
    }

    Ok(())
}

fn require(
    field: impl Into<String>,
    value: &NumericField,
    message: impl Into<String>,
) -> ValidationResult {
    if value.is_present() {
        Ok(())
    } else {
        Err(ValidationFailure::new(field, message))
    }
}

fn require_text(
    field: impl Into<String>,
    value: &str,
    message: impl Into<String>,
) -> ValidationResult {
    if value.trim().is_empty() {
        Err(ValidationFailure::new(field, message))
    } else {
        Ok(())
    }
}

fn require_label(index: usize, label: &str) -> ValidationResult {
    require_text(
        format!("expenses[{index}].label"),
        label,
        format!("Dépenses {}: Intitulé est requis", index + 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{
        AcquisitionInput, DealInput, Expense, FinancingInput, Lot, PurchaseInput, VatRegime,
    };
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn lot(id: u64, balance: Decimal) -> Lot {
        Lot {
            id,
            name: format!("Lot {id}"),
            resale_price: dec!(150000).into(),
            area_m2: dec!(40).into(),
            vat_regime: Some(VatRegime::OnMargin),
            balance_percent: balance.into(),
        }
    }

    fn complete_project() -> Project {
        Project {
            name: "Rue des Lilas".into(),
            address: "12 rue des Lilas, Lyon".into(),
            deal: DealInput {
                purchase: PurchaseInput {
                    fai_price: dec!(250000).into(),
                    agency_fees: dec!(10000).into(),
                },
                acquisition: AcquisitionInput {
                    acquisition_percentage: dec!(7.5).into(),
                },
                lots: vec![lot(1, dec!(60)), lot(2, dec!(40))],
                expenses: vec![Expense {
                    id: 1,
                    label: "Travaux".into(),
                    price_excl_tax: dec!(20000).into(),
                    vat_rate_percent: dec!(0).into(),
                }],
                financing: FinancingInput {
                    application_fee: dec!(1000).into(),
                    down_payment_rate_percent: dec!(20).into(),
                    loan_interest_rate_percent: dec!(4.5).into(),
                    loan_duration_months: dec!(18).into(),
                    commission_rate_percent: dec!(1).into(),
                    commission_duration_months: dec!(18).into(),
                    mortgage_rate_percent: dec!(0.5).into(),
                },
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_project_passes_both_rule_sets() {
        let project = complete_project();
        assert_eq!(validate_submit(&project), Ok(()));
        assert_eq!(validate_draft(&project), Ok(()));
    }

    #[test]
    fn test_explicit_zero_counts_as_present() {
        // the expense VAT rate above is an explicit 0
        let project = complete_project();
        assert!(project.deal.expenses[0].vat_rate_percent.is_present());
        assert!(validate_submit(&project).is_ok());
    }

    #[test]
    fn test_submit_requires_address() {
        let mut project = complete_project();
        project.address = "   ".into();
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "address");
    }

    #[test]
    fn test_submit_reports_first_violation_only() {
        let mut project = complete_project();
        project.deal.purchase.fai_price = NumericField::Empty;
        project.deal.lots.clear();
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "purchase.faiPrice");
        assert_eq!(failure.message, "Le prix FAI est requis.");
    }

    #[test]
    fn test_submit_requires_a_lot() {
        let mut project = complete_project();
        project.deal.lots.clear();
        assert_eq!(validate_submit(&project).unwrap_err().field, "lots");
    }

    #[test]
    fn test_submit_rejects_incomplete_token() {
        let mut project = complete_project();
        project.deal.lots[1].area_m2 = NumericField::Incomplete("40,".into());
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "lots[1].areaM2");
        assert_eq!(failure.message, "Lot 2: surface est requise.");
    }

    #[test]
    fn test_submit_requires_regime() {
        let mut project = complete_project();
        project.deal.lots[0].vat_regime = None;
        assert_eq!(
            validate_submit(&project).unwrap_err().field,
            "lots[0].vatRegime"
        );
    }

    #[test]
    fn test_balance_must_total_100() {
        let mut project = complete_project();
        project.deal.lots[1].balance_percent = dec!(39.5).into();
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "lots.balancePercent");
        assert!(failure.message.contains("99.5%"));
    }

    #[test]
    fn test_huge_balances_fail_without_overflow() {
        let mut project = complete_project();
        project.deal.lots[0].balance_percent = Decimal::MAX.into();
        project.deal.lots[1].balance_percent = Decimal::MAX.into();
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "lots.balancePercent");
    }

    #[test]
    fn test_balance_within_tolerance_passes() {
        let mut project = complete_project();
        project.deal.lots = vec![
            lot(1, dec!(33.33333)),
            lot(2, dec!(33.33333)),
            lot(3, dec!(33.33334)),
        ];
        assert!(validate_submit(&project).is_ok());
    }

    #[test]
    fn test_submit_requires_every_financing_field() {
        let mut project = complete_project();
        project.deal.financing.mortgage_rate_percent = NumericField::Empty;
        let failure = validate_submit(&project).unwrap_err();
        assert_eq!(failure.field, "financing.mortgageRatePercent");
        assert_eq!(failure.message, "Taux de montage est requis");
    }

    #[test]
    fn test_draft_tolerates_empty_numbers() {
        let project = Project {
            name: "Brouillon".into(),
            deal: DealInput {
                lots: vec![Lot::default()],
                expenses: vec![Expense {
                    label: "Diagnostics".into(),
                    ..Default::default()
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(validate_draft(&project), Ok(()));
        assert!(validate_submit(&project).is_err());
    }

    #[test]
    fn test_draft_requires_name_and_expense_labels() {
        let mut project = Project::default();
        assert_eq!(validate_draft(&project).unwrap_err().field, "name");

        project.name = "Projet".into();
        project.deal.expenses = vec![
            Expense {
                label: "Plomberie".into(),
                ..Default::default()
            },
            Expense::default(),
        ];
        let failure = validate_draft(&project).unwrap_err();
        assert_eq!(failure.field, "expenses[1].label");
        assert_eq!(failure.message, "Dépenses 2: Intitulé est requis");
    }

    #[test]
    fn test_failure_display() {
        let failure = ValidationFailure::new("name", "Le nom du projet est obligatoire.");
        assert_eq!(failure.to_string(), "name: Le nom du projet est obligatoire.");
    }
}
