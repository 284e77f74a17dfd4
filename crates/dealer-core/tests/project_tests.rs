use dealer_core::deal::{
    AcquisitionInput, DealInput, Expense, FinancingInput, Lot, PurchaseInput, VatRegime,
};
use dealer_core::{
    prepare_submission, validate_draft, validate_submit, NumericField, Project, ProjectType,
    SubmitMode,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn lot(id: u64, balance: Decimal) -> Lot {
    Lot {
        id,
        name: format!("Lot {id}"),
        resale_price: dec!(120000).into(),
        area_m2: dec!(35).into(),
        vat_regime: Some(VatRegime::Exempt),
        balance_percent: balance.into(),
    }
}

fn submittable(balances: &[Decimal]) -> Project {
    Project::new(
        "Corps de ferme",
        "Route de Vienne, Chasse-sur-Rhône",
        DealInput {
            purchase: PurchaseInput {
                fai_price: dec!(320000).into(),
                agency_fees: dec!(12000).into(),
            },
            acquisition: AcquisitionInput {
                acquisition_percentage: dec!(8).into(),
            },
            lots: balances
                .iter()
                .enumerate()
                .map(|(i, b)| lot(i as u64 + 1, *b))
                .collect(),
            expenses: vec![Expense {
                id: 1,
                label: "Division parcellaire".into(),
                price_excl_tax: dec!(4500).into(),
                vat_rate_percent: dec!(20).into(),
            }],
            financing: FinancingInput {
                application_fee: dec!(800).into(),
                down_payment_rate_percent: dec!(15).into(),
                loan_interest_rate_percent: dec!(4).into(),
                loan_duration_months: dec!(24).into(),
                commission_rate_percent: dec!(1).into(),
                commission_duration_months: dec!(24).into(),
                mortgage_rate_percent: dec!(1.2).into(),
            },
        },
    )
}

#[test]
fn test_balance_invariant_decides_submission() {
    let cases = [
        (vec![dec!(100)], true),
        (vec![dec!(50), dec!(50)], true),
        (vec![dec!(50), dec!(49.9999)], true),
        (vec![dec!(50), dec!(50.0001)], true),
        (vec![dec!(50), dec!(49.9998)], false),
        (vec![dec!(50), dec!(50.0002)], false),
        (vec![dec!(60), dec!(60)], false),
        (vec![dec!(0)], false),
    ];

    for (balances, expected) in cases {
        let result = validate_submit(&submittable(&balances));
        assert_eq!(result.is_ok(), expected, "balances {balances:?}: {result:?}");
        if let Err(failure) = result {
            assert_eq!(failure.field, "lots.balancePercent");
        }
    }
}

#[test]
fn test_draft_laxity() {
    let project = Project::new(
        "Idée d'achat",
        "",
        DealInput {
            lots: vec![Lot::default(), Lot::default()],
            expenses: vec![Expense {
                label: "Géomètre".into(),
                price_excl_tax: NumericField::Empty,
                vat_rate_percent: NumericField::Empty,
                ..Default::default()
            }],
            ..Default::default()
        },
    );

    assert!(validate_draft(&project).is_ok());
    assert!(validate_submit(&project).is_err());
}

#[test]
fn test_submit_payload_is_typed_purchase() {
    let project = submittable(&[dec!(70), dec!(30)]);
    let submission = prepare_submission(&project, SubmitMode::Submit).unwrap();

    assert_eq!(submission.project.project_type, ProjectType::Purchase);
    assert!(submission.project.can_generate_report());
    assert_eq!(submission.result, dealer_core::build(&project.deal));
    // the caller's project is untouched
    assert_eq!(project.project_type, ProjectType::Draft);
}

#[test]
fn test_draft_payload_keeps_partial_values() {
    let mut project = submittable(&[dec!(70)]);
    project.deal.purchase.fai_price = NumericField::Incomplete("320.".into());

    assert!(prepare_submission(&project, SubmitMode::Submit).is_err());

    let submission = prepare_submission(&project, SubmitMode::Draft).unwrap();
    assert_eq!(submission.project.project_type, ProjectType::Draft);
    assert_eq!(
        submission.project.deal.purchase.fai_price,
        NumericField::Incomplete("320.".into())
    );
    assert_eq!(submission.result.notary_fees, Decimal::ZERO);

    let json = serde_json::to_value(&submission).unwrap();
    assert_eq!(json["project"]["type"], "draft");
    assert_eq!(json["project"]["purchase"]["faiPrice"], "320.");
}

const STORED_DRAFT: &str = r#"{
    "_id": "6650b1",
    "type": "draft",
    "name": "Projet",
    "address": null,
    "purchase": {
        "faiPrice": 200000,
        "agencyFees": 0,
        "acquisitionCost": 16000,
        "totalAcquisitionCost": 216000,
        "acquisitionCostPercentage": 8
    },
    "lots": [
        { "id": 1717000000000, "name": null, "resalePrice": 260000, "area": 0,
          "pricePerM2": 0, "vatType": null, "vatAmount": 0, "totalWithVat": 260000,
          "balance": 0 }
    ],
    "expenses": [
        { "id": 1717000000001, "label": "Cuisine", "priceExclTax": 8000, "vatRate": 10 }
    ],
    "financing": {
        "applicationFee": 0, "contributionPercentage": 0, "contribution": 0,
        "interestRate": 0, "durationMonths": 0, "loanInterest": 0,
        "commissionRate": 0, "commissionDurationMonths": 0, "commitmentFees": 0,
        "montageRate": 0, "mortgageFees": 0, "totalFinancing": 0
    }
}"#;

#[test]
fn test_stored_draft_loads_and_resaves() {
    let project: Project = serde_json::from_str(STORED_DRAFT).unwrap();
    assert_eq!(project.id.as_deref(), Some("6650b1"));
    assert_eq!(project.address, "");
    assert_eq!(project.deal.lots[0].name, "");
    assert_eq!(
        project.deal.acquisition.acquisition_percentage,
        NumericField::Value(dec!(8))
    );

    let submission = prepare_submission(&project, SubmitMode::Draft).unwrap();
    assert_eq!(submission.result.notary_fees, dec!(16000));
    assert_eq!(submission.result.total_expense_cost, dec!(8800));

    let failure = prepare_submission(&project, SubmitMode::Submit).unwrap_err();
    assert_eq!(failure.field, "address");
}

#[test]
fn test_stored_drafts_feed_the_history() {
    let projects: Vec<Project> = serde_json::from_str(&format!("[{STORED_DRAFT}]")).unwrap();
    let entry = dealer_core::project::HistoryEntry::from_project(&projects[0]);
    assert_eq!(entry.title, "Projet");
    assert_eq!(entry.status, ProjectType::Draft);
    assert_eq!(entry.expense_vat, dec!(800));
    assert_eq!(entry.gross_resale, dec!(260000));
    assert!(!entry.can_download);
}
