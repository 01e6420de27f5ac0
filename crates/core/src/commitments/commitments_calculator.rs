use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::commitments_model::{
    Commitment, CommitmentBalances, CommitmentDiscrepancy, CommitmentReconciliation,
    FundMultiples,
};
use crate::constants::ONE_HUNDRED;
use crate::errors::ValidationError;
use crate::transactions::{Transaction, TransactionType};

/// Amounts closer than this are treated as equal.
pub const BALANCE_TOLERANCE: Decimal = dec!(0.01);

pub fn check_consistency(commitment: &Commitment) -> Option<CommitmentDiscrepancy> {
    let difference =
        commitment.capital_called + commitment.unfunded_commitment - commitment.total_commitment;
    if difference.abs() < BALANCE_TOLERANCE {
        return None;
    }
    Some(CommitmentDiscrepancy {
        commitment_id: commitment.id.clone(),
        fund_name: commitment.fund_name.clone(),
        total_commitment: commitment.total_commitment,
        capital_called: commitment.capital_called,
        unfunded_commitment: commitment.unfunded_commitment,
        difference,
    })
}

/// Moves `amount` from unfunded to called. Requires `0 < amount <= unfunded`.
pub fn apply_capital_call(
    commitment: &Commitment,
    amount: Decimal,
) -> Result<CommitmentBalances, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(
            "Capital call amount must be positive".to_string(),
        ));
    }
    if amount > commitment.unfunded_commitment {
        return Err(ValidationError::OutOfRange {
            field: "capital call".to_string(),
            value: amount,
            min: Decimal::ZERO,
            max: commitment.unfunded_commitment,
        });
    }
    Ok(CommitmentBalances {
        capital_called: commitment.capital_called + amount,
        unfunded_commitment: commitment.unfunded_commitment - amount,
        ..commitment.balances()
    })
}

pub fn apply_distribution(
    commitment: &Commitment,
    amount: Decimal,
) -> Result<CommitmentBalances, ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(
            "Distribution amount must be positive".to_string(),
        ));
    }
    Ok(CommitmentBalances {
        distributions_received: commitment.distributions_received + amount,
        ..commitment.balances()
    })
}

/// New balances for an explicit restatement: `unfunded = total - called`.
pub fn restated_balances(
    commitment: &Commitment,
    total_commitment: Decimal,
    capital_called: Decimal,
) -> Result<CommitmentBalances, ValidationError> {
    if total_commitment <= Decimal::ZERO {
        return Err(ValidationError::InvalidInput(
            "Total commitment must be positive".to_string(),
        ));
    }
    if capital_called < Decimal::ZERO || capital_called > total_commitment {
        return Err(ValidationError::OutOfRange {
            field: "capital called".to_string(),
            value: capital_called,
            min: Decimal::ZERO,
            max: total_commitment,
        });
    }
    Ok(CommitmentBalances {
        total_commitment,
        capital_called,
        unfunded_commitment: total_commitment - capital_called,
        distributions_received: commitment.distributions_received,
    })
}

/// DPI, RVPI and TVPI against called capital. All are 0 before the first call.
pub fn fund_multiples(commitment: &Commitment, current_nav: Decimal) -> FundMultiples {
    let called = commitment.capital_called;
    let called_pct = if commitment.total_commitment.is_zero() {
        Decimal::ZERO
    } else {
        called / commitment.total_commitment * ONE_HUNDRED
    };
    if called <= Decimal::ZERO {
        return FundMultiples {
            called_pct,
            ..FundMultiples::default()
        };
    }
    FundMultiples {
        dpi: commitment.distributions_received / called,
        rvpi: current_nav / called,
        tvpi: (commitment.distributions_received + current_nav) / called,
        called_pct,
    }
}

/// Compares recorded called capital with the position's capital call ledger.
pub fn reconcile(commitment: &Commitment, transactions: &[Transaction]) -> CommitmentReconciliation {
    let calls: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| {
            t.position_id == commitment.position_id
                && t.transaction_type == TransactionType::CapitalCall
        })
        .collect();
    let transactions_called: Decimal = calls.iter().map(|t| t.total_amount).sum();
    let difference = commitment.capital_called - transactions_called;
    CommitmentReconciliation {
        commitment_id: commitment.id.clone(),
        recorded_called: commitment.capital_called,
        transactions_called,
        capital_call_count: calls.len(),
        difference,
        is_reconciled: difference.abs() < BALANCE_TOLERANCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{date, timestamp, transaction};

    fn commitment(total: Decimal, called: Decimal, unfunded: Decimal) -> Commitment {
        Commitment {
            id: "c1".to_string(),
            position_id: "p1".to_string(),
            fund_name: "Northern Growth III".to_string(),
            vintage_year: Some(2021),
            total_commitment: total,
            capital_called: called,
            unfunded_commitment: unfunded,
            distributions_received: Decimal::ZERO,
            commitment_date: None,
            currency: "CAD".to_string(),
            notes: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    #[test]
    fn test_consistency_flags_mismatch() {
        assert!(check_consistency(&commitment(dec!(1000), dec!(400), dec!(600))).is_none());

        let discrepancy = check_consistency(&commitment(dec!(1000), dec!(400), dec!(500))).unwrap();
        assert_eq!(discrepancy.difference, dec!(-100));
        assert_eq!(discrepancy.unfunded_commitment, dec!(500));
    }

    #[test]
    fn test_capital_call_moves_unfunded() {
        let c = commitment(dec!(1000), dec!(400), dec!(600));
        let balances = apply_capital_call(&c, dec!(250)).unwrap();
        assert_eq!(balances.capital_called, dec!(650));
        assert_eq!(balances.unfunded_commitment, dec!(350));
        assert_eq!(balances.total_commitment, dec!(1000));

        assert!(apply_capital_call(&c, dec!(600)).is_ok());
        assert!(matches!(
            apply_capital_call(&c, dec!(600.01)),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(apply_capital_call(&c, Decimal::ZERO).is_err());
    }

    #[test]
    fn test_distribution_and_restatement() {
        let c = commitment(dec!(1000), dec!(400), dec!(600));
        let after = apply_distribution(&c, dec!(120)).unwrap();
        assert_eq!(after.distributions_received, dec!(120));
        assert_eq!(after.unfunded_commitment, dec!(600));
        assert!(apply_distribution(&c, dec!(-5)).is_err());

        let restated = restated_balances(&c, dec!(1500), dec!(400)).unwrap();
        assert_eq!(restated.unfunded_commitment, dec!(1100));
        assert!(restated_balances(&c, dec!(300), dec!(400)).is_err());
    }

    #[test]
    fn test_multiples() {
        let mut c = commitment(dec!(1000), dec!(500), dec!(500));
        c.distributions_received = dec!(200);
        let multiples = fund_multiples(&c, dec!(600));
        assert_eq!(multiples.dpi, dec!(0.4));
        assert_eq!(multiples.rvpi, dec!(1.2));
        assert_eq!(multiples.tvpi, dec!(1.6));
        assert_eq!(multiples.called_pct, dec!(50));

        let uncalled = fund_multiples(&commitment(dec!(1000), dec!(0), dec!(1000)), dec!(0));
        assert_eq!(uncalled.tvpi, Decimal::ZERO);
        assert_eq!(uncalled.dpi, Decimal::ZERO);
    }

    #[test]
    fn test_reconcile_against_capital_calls() {
        let c = commitment(dec!(1000), dec!(400), dec!(600));
        let ledger = vec![
            transaction("t1", "p1", TransactionType::CapitalCall, date(2022, 1, 1), dec!(1), dec!(250)),
            transaction("t2", "p1", TransactionType::CapitalCall, date(2022, 7, 1), dec!(1), dec!(150)),
            transaction("t3", "p1", TransactionType::Distribution, date(2023, 1, 1), dec!(0), dec!(90)),
            transaction("t4", "p9", TransactionType::CapitalCall, date(2023, 1, 1), dec!(1), dec!(999)),
        ];
        let result = reconcile(&c, &ledger);
        assert!(result.is_reconciled);
        assert_eq!(result.capital_call_count, 2);

        let short = reconcile(&c, &ledger[..1]);
        assert!(!short.is_reconciled);
        assert_eq!(short.difference, dec!(150));
    }
}
