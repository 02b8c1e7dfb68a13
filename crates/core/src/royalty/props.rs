//! Property-based tests for the reconciliation engine.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::calc::{available_balance, compute_snapshot, deductions, net_revenue};
use super::series::{MonthKey, synthesize_series};
use super::types::{ChartView, MonthlyRevenue, ResolvedShare, ShareResolution, SnapshotInputs};

fn cents(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

proptest! {
    /// For all gross >= 0 and share in [0, 100]:
    /// net + deductions == gross, exactly, under Decimal.
    #[test]
    fn prop_net_and_deductions_partition_gross(
        gross_cents in 0i64..1_000_000_000_000,
        share_percent in 0i64..=100,
    ) {
        let gross = cents(gross_cents);
        let share = Decimal::from(share_percent);

        let net = net_revenue(gross, share);
        let kept = deductions(gross, net);

        prop_assert_eq!(net + kept, gross);
        prop_assert!(net >= Decimal::ZERO);
        prop_assert!(kept >= Decimal::ZERO);
    }

    /// balance == net - withdrawn - pending, and is allowed to be negative.
    #[test]
    fn prop_balance_identity(
        gross_cents in 0i64..1_000_000_000_000,
        share_percent in 0i64..=100,
        withdrawn_cents in 0i64..1_000_000_000_000,
        pending_cents in 0i64..1_000_000_000_000,
    ) {
        let inputs = SnapshotInputs {
            total_gross: cents(gross_cents),
            share: ResolvedShare {
                share_percent: Decimal::from(share_percent),
                label_name: None,
                resolution: ShareResolution::ById,
            },
            total_withdrawn: cents(withdrawn_cents),
            pending_amount: cents(pending_cents),
        };

        let snapshot = compute_snapshot(inputs.clone());

        prop_assert_eq!(
            snapshot.balance,
            available_balance(snapshot.total_net, inputs.total_withdrawn, inputs.pending_amount)
        );
        prop_assert_eq!(snapshot.total_net + snapshot.total_deductions, snapshot.total_gross);
    }

    /// Snapshot computation is deterministic: same inputs, same snapshot.
    #[test]
    fn prop_snapshot_is_deterministic(
        gross_cents in 0i64..1_000_000_000_000,
        share_percent in 0i64..=100,
        withdrawn_cents in 0i64..1_000_000_000,
        pending_cents in 0i64..1_000_000_000,
    ) {
        let inputs = SnapshotInputs {
            total_gross: cents(gross_cents),
            share: ResolvedShare {
                share_percent: Decimal::from(share_percent),
                label_name: Some("Label".to_string()),
                resolution: ShareResolution::ByEmail,
            },
            total_withdrawn: cents(withdrawn_cents),
            pending_amount: cents(pending_cents),
        };

        prop_assert_eq!(compute_snapshot(inputs.clone()), compute_snapshot(inputs));
    }

    /// The chart window always has exactly its view's bucket count,
    /// regardless of how many real months exist, and labels ascend.
    #[test]
    fn prop_series_width_and_order(
        months in prop::collection::vec((2000i32..2100, 1u32..=12, 0i64..1_000_000_000), 0..24),
        yearly in any::<bool>(),
        today_year in 2000i32..2100,
        today_month in 1u32..=12,
    ) {
        let real: Vec<MonthlyRevenue> = months
            .into_iter()
            .map(|(year, month, revenue_cents)| MonthlyRevenue {
                month: MonthKey::new(year, month),
                revenue: cents(revenue_cents),
            })
            .collect();
        let view = if yearly { ChartView::Yearly } else { ChartView::Monthly };
        let today = NaiveDate::from_ymd_opt(today_year, today_month, 1).unwrap();

        let series = synthesize_series(&real, view, today);

        prop_assert_eq!(series.len() as u32, view.bucket_count());
        for pair in series.windows(2) {
            prop_assert!(pair[0].period < pair[1].period);
        }
    }

    /// The last bucket is never earlier than either "now" or the latest
    /// real month.
    #[test]
    fn prop_series_anchor_is_max_of_now_and_latest(
        months in prop::collection::vec((2000i32..2100, 1u32..=12), 0..12),
        today_year in 2000i32..2100,
        today_month in 1u32..=12,
    ) {
        let real: Vec<MonthlyRevenue> = months
            .into_iter()
            .map(|(year, month)| MonthlyRevenue {
                month: MonthKey::new(year, month),
                revenue: Decimal::ONE,
            })
            .collect();
        let today = NaiveDate::from_ymd_opt(today_year, today_month, 1).unwrap();

        let series = synthesize_series(&real, ChartView::Monthly, today);
        let last_label = series.last().unwrap().period.clone();

        prop_assert!(last_label >= MonthKey::new(today_year, today_month).label());
        if let Some(latest) = real.iter().map(|m| m.month).max() {
            prop_assert!(last_label >= latest.label());
        }
    }
}
