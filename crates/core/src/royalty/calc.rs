//! Snapshot arithmetic.
//!
//! All amounts are `Decimal`; the share percent is a plain percentage
//! (20 means 20%), not a fraction.

use rust_decimal::Decimal;

use super::types::{FinancialSnapshot, SnapshotInputs};

/// The client's portion of gross revenue.
#[must_use]
pub fn net_revenue(gross: Decimal, share_percent: Decimal) -> Decimal {
    gross * share_percent / Decimal::ONE_HUNDRED
}

/// The label's retained portion.
#[must_use]
pub fn deductions(gross: Decimal, net: Decimal) -> Decimal {
    gross - net
}

/// The spendable amount. Not clamped; overdrawn accounts go negative and
/// are reconciled administratively.
#[must_use]
pub fn available_balance(net: Decimal, withdrawn: Decimal, pending: Decimal) -> Decimal {
    net - withdrawn - pending
}

/// Combines the aggregate reads into a client's financial snapshot.
///
/// Deterministic given its inputs; absence of data at any stage arrives
/// here as zero and yields zero contributions, never an error.
#[must_use]
pub fn compute_snapshot(inputs: SnapshotInputs) -> FinancialSnapshot {
    let total_net = net_revenue(inputs.total_gross, inputs.share.share_percent);
    let total_deductions = deductions(inputs.total_gross, total_net);
    let balance = available_balance(total_net, inputs.total_withdrawn, inputs.pending_amount);

    FinancialSnapshot {
        total_gross: inputs.total_gross,
        total_net,
        total_deductions,
        total_withdrawn: inputs.total_withdrawn,
        pending_amount: inputs.pending_amount,
        balance,
        share_percent: inputs.share.share_percent,
        label_name: inputs.share.label_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::royalty::types::{ResolvedShare, ShareResolution};
    use rust_decimal_macros::dec;

    fn share(percent: Decimal) -> ResolvedShare {
        ResolvedShare {
            share_percent: percent,
            label_name: Some("Test Label".to_string()),
            resolution: ShareResolution::ById,
        }
    }

    #[test]
    fn test_net_revenue_is_percentage_of_gross() {
        assert_eq!(net_revenue(dec!(10000), dec!(20)), dec!(2000));
        assert_eq!(net_revenue(dec!(100), dec!(0)), dec!(0));
        assert_eq!(net_revenue(dec!(100), dec!(100)), dec!(100));
        assert_eq!(net_revenue(dec!(0), dec!(50)), dec!(0));
    }

    #[test]
    fn test_deductions_complement_net() {
        let gross = dec!(10000);
        let net = net_revenue(gross, dec!(20));
        assert_eq!(deductions(gross, net), dec!(8000));
        assert_eq!(net + deductions(gross, net), gross);
    }

    #[test]
    fn test_worked_example() {
        // share 20%, gross 10,000, approved 1,000, pending 500
        let snapshot = compute_snapshot(SnapshotInputs {
            total_gross: dec!(10000),
            share: share(dec!(20)),
            total_withdrawn: dec!(1000),
            pending_amount: dec!(500),
        });

        assert_eq!(snapshot.total_gross, dec!(10000));
        assert_eq!(snapshot.total_net, dec!(2000));
        assert_eq!(snapshot.total_deductions, dec!(8000));
        assert_eq!(snapshot.total_withdrawn, dec!(1000));
        assert_eq!(snapshot.pending_amount, dec!(500));
        assert_eq!(snapshot.balance, dec!(500));
        assert_eq!(snapshot.share_percent, dec!(20));
        assert_eq!(snapshot.label_name.as_deref(), Some("Test Label"));
    }

    #[test]
    fn test_zero_activity_snapshot() {
        let snapshot = compute_snapshot(SnapshotInputs {
            total_gross: Decimal::ZERO,
            share: ResolvedShare::unresolved(),
            total_withdrawn: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
        });

        assert_eq!(snapshot, FinancialSnapshot::zeroed());
    }

    #[test]
    fn test_balance_may_go_negative() {
        let snapshot = compute_snapshot(SnapshotInputs {
            total_gross: dec!(1000),
            share: share(dec!(10)),
            total_withdrawn: dec!(150),
            pending_amount: dec!(25),
        });

        // net 100, withdrawn 150, pending 25
        assert_eq!(snapshot.balance, dec!(-75));
    }

    #[test]
    fn test_fractional_share_is_exact() {
        // 12.5% of 999.99 must not drift
        assert_eq!(net_revenue(dec!(999.99), dec!(12.5)), dec!(124.99875));
    }

    #[test]
    fn test_unresolved_share_degrades_to_zero() {
        let snapshot = compute_snapshot(SnapshotInputs {
            total_gross: dec!(5000),
            share: ResolvedShare::unresolved(),
            total_withdrawn: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
        });

        assert_eq!(snapshot.total_net, Decimal::ZERO);
        assert_eq!(snapshot.total_deductions, dec!(5000));
        assert_eq!(snapshot.share_percent, Decimal::ZERO);
        assert!(snapshot.label_name.is_none());
    }
}
