//! Royalty reconciliation engine.
//!
//! Pure, deterministic computation that turns report totals, a share
//! percentage, and withdrawal sums into a client's financial snapshot, and
//! sparse per-month report totals into a gap-filled chart series. No side
//! effects; the db layer feeds it and the api layer serves it.

pub mod calc;
pub mod series;
pub mod types;

pub use calc::{available_balance, compute_snapshot, deductions, net_revenue};
pub use series::{MonthKey, synthesize_series};
pub use types::{
    ChartPoint, ChartView, FinancialSnapshot, MonthlyRevenue, ResolvedShare, ShareResolution,
    SnapshotInputs,
};

#[cfg(test)]
mod props;
