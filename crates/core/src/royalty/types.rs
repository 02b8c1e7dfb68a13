//! Reconciliation data types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::series::MonthKey;

/// How a client's revenue share was resolved.
///
/// The lookup tries an exact owner-id match first, then falls back to a
/// case-insensitive match on the label's contact email. A client with no
/// matching label is a valid transient state during onboarding, so
/// `Unresolved` carries an effective share of zero rather than being an
/// error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareResolution {
    /// Label matched the client's id exactly.
    ById,
    /// Label matched the client's email case-insensitively.
    ByEmail,
    /// No label matched; effective share is zero.
    Unresolved,
}

/// A resolved revenue share for a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedShare {
    /// Share percentage in [0, 100].
    pub share_percent: Decimal,
    /// Label display name, when a label matched.
    pub label_name: Option<String>,
    /// Which branch of the lookup matched.
    pub resolution: ShareResolution,
}

impl ResolvedShare {
    /// The zero-share result for a client with no label.
    #[must_use]
    pub const fn unresolved() -> Self {
        Self {
            share_percent: Decimal::ZERO,
            label_name: None,
            resolution: ShareResolution::Unresolved,
        }
    }
}

/// Aggregates feeding one snapshot computation.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotInputs {
    /// Sum of gross totals across the client's revenue reports.
    pub total_gross: Decimal,
    /// The client's resolved share.
    pub share: ResolvedShare,
    /// Sum of approved withdrawal amounts.
    pub total_withdrawn: Decimal,
    /// Sum of pending withdrawal amounts.
    pub pending_amount: Decimal,
}

/// A client's derived financial snapshot. Recomputed on every request,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSnapshot {
    /// Total reported revenue before the share split.
    pub total_gross: Decimal,
    /// The client's portion of gross revenue.
    pub total_net: Decimal,
    /// The label's retained portion (gross - net).
    pub total_deductions: Decimal,
    /// Sum of approved withdrawals.
    pub total_withdrawn: Decimal,
    /// Sum of pending withdrawals.
    pub pending_amount: Decimal,
    /// Spendable amount: net - withdrawn - pending. May be negative.
    pub balance: Decimal,
    /// Share percentage used for the split.
    pub share_percent: Decimal,
    /// Label display name for UI labeling, when resolved.
    pub label_name: Option<String>,
}

impl FinancialSnapshot {
    /// The all-zero snapshot served when reads degrade.
    #[must_use]
    pub const fn zeroed() -> Self {
        Self {
            total_gross: Decimal::ZERO,
            total_net: Decimal::ZERO,
            total_deductions: Decimal::ZERO,
            total_withdrawn: Decimal::ZERO,
            pending_amount: Decimal::ZERO,
            balance: Decimal::ZERO,
            share_percent: Decimal::ZERO,
            label_name: None,
        }
    }
}

/// Chart granularity selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartView {
    /// Trailing 4-month window.
    #[default]
    Monthly,
    /// Trailing 12-month window.
    Yearly,
}

impl ChartView {
    /// Number of month buckets in this view's window.
    #[must_use]
    pub const fn bucket_count(self) -> u32 {
        match self {
            Self::Monthly => 4,
            Self::Yearly => 12,
        }
    }
}

/// One month of summed report gross revenue (the sparse "real" series).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyRevenue {
    /// Calendar month of the reports' period start.
    pub month: MonthKey,
    /// Summed gross revenue for that month.
    pub revenue: Decimal,
}

/// One gap-filled chart bucket, ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Period label, ISO style (`YYYY-MM`).
    pub period: String,
    /// Gross revenue for the bucket; zero when no report covers it.
    pub revenue: Decimal,
}
