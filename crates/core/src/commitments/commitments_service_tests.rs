use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

use super::*;
use crate::errors::{Error, ValidationError};
use crate::positions::AssetClass;
use crate::test_support::{
    date, fx_service, position, settings_service, transaction, InMemoryCommitments,
    InMemoryFxRates, InMemoryPositions, InMemoryTransactions,
};
use crate::transactions::TransactionType;

fn service() -> (Arc<InMemoryCommitments>, CommitmentService) {
    let commitments = Arc::new(InMemoryCommitments::default());
    let positions = InMemoryPositions::with(vec![
        position("fund", "e1", AssetClass::Fund, "CAD", dec!(1), dec!(400000), dec!(480000)),
        position("stock", "e1", AssetClass::PublicEquities, "CAD", dec!(10), dec!(100), dec!(120)),
    ]);
    let transactions = InMemoryTransactions::with(vec![
        transaction("t1", "fund", TransactionType::CapitalCall, date(2022, 3, 1), dec!(1), dec!(250000)),
        transaction("t2", "fund", TransactionType::CapitalCall, date(2023, 3, 1), dec!(0), dec!(150000)),
    ]);
    let service = CommitmentService::new(
        commitments.clone(),
        positions,
        transactions,
        fx_service(Arc::new(InMemoryFxRates::default())),
        settings_service(),
    );
    (commitments, service)
}

fn new_commitment(position_id: &str) -> NewCommitment {
    NewCommitment {
        id: Some("c1".to_string()),
        position_id: position_id.to_string(),
        fund_name: "Northern Growth III".to_string(),
        vintage_year: Some(2022),
        total_commitment: dec!(1000000),
        capital_called: dec!(400000),
        unfunded_commitment: None,
        distributions_received: dec!(100000),
        commitment_date: Some(date(2022, 1, 15)),
        currency: "CAD".to_string(),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_derives_unfunded_and_links_one_fund() {
    let (_, service) = service();
    let created = service.create_commitment(new_commitment("fund")).await.unwrap();
    assert_eq!(created.unfunded_commitment, dec!(600000));

    let duplicate = service
        .create_commitment(NewCommitment {
            id: Some("c2".to_string()),
            ..new_commitment("fund")
        })
        .await;
    assert!(matches!(duplicate, Err(Error::ConstraintViolation(_))));

    let wrong_class = service.create_commitment(new_commitment("stock")).await;
    assert!(matches!(
        wrong_class,
        Err(Error::Validation(ValidationError::InvalidInput(_)))
    ));
}

#[tokio::test]
async fn test_capital_call_and_distribution() {
    let (_, service) = service();
    service.create_commitment(new_commitment("fund")).await.unwrap();

    let called = service.record_capital_call("c1", dec!(200000)).await.unwrap();
    assert_eq!(called.capital_called, dec!(600000));
    assert_eq!(called.unfunded_commitment, dec!(400000));

    let too_much = service.record_capital_call("c1", dec!(400001)).await;
    assert!(too_much.is_err());
    assert_eq!(service.get_commitment("c1").unwrap().capital_called, dec!(600000));

    let paid = service.record_distribution("c1", dec!(50000)).await.unwrap();
    assert_eq!(paid.distributions_received, dec!(150000));
}

#[tokio::test]
async fn test_imported_discrepancy_is_flagged_not_fixed() {
    let (commitments, service) = service();
    service
        .create_commitment(NewCommitment {
            unfunded_commitment: Some(dec!(550000)),
            ..new_commitment("fund")
        })
        .await
        .unwrap();

    let discrepancies = service.check_all().unwrap();
    assert_eq!(discrepancies.len(), 1);
    assert_eq!(discrepancies[0].difference, dec!(-50000));
    assert_eq!(
        commitments.rows.lock().unwrap()[0].unfunded_commitment,
        dec!(550000)
    );

    let restated = service.restate("c1", dec!(1000000), dec!(400000)).await.unwrap();
    assert_eq!(restated.unfunded_commitment, dec!(600000));
    assert!(service.check_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_multiples_use_position_nav() {
    let (_, service) = service();
    service.create_commitment(new_commitment("fund")).await.unwrap();

    let multiples = service.fund_multiples("c1").unwrap();
    assert_eq!(multiples.dpi, dec!(0.25));
    assert_eq!(multiples.rvpi, dec!(1.2));
    assert_eq!(multiples.tvpi, dec!(1.45));
    assert_eq!(multiples.called_pct, dec!(40));
}

#[tokio::test]
async fn test_reconcile_with_ledger() {
    let (_, service) = service();
    service.create_commitment(new_commitment("fund")).await.unwrap();
    let result = service.reconcile("c1").unwrap();
    assert!(result.is_reconciled);
    assert_eq!(result.capital_call_count, 2);

    service.record_capital_call("c1", dec!(100000)).await.unwrap();
    let result = service.reconcile("c1").unwrap();
    assert!(!result.is_reconciled);
    assert_eq!(result.difference, dec!(100000));
    assert!(result.transactions_called > Decimal::ZERO);
}
