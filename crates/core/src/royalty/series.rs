//! Chart time-series synthesis.
//!
//! Turns the sparse per-month report totals into a fixed-width,
//! chronologically ascending, gap-filled window that the chart can render
//! directly. The window is anchored at the later of "now" and the latest
//! reported month, so back-dated or forward-dated uploads still produce a
//! sensible trailing window.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{ChartPoint, ChartView, MonthlyRevenue};

/// A calendar month, independent of any day-of-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month of year, 1-12.
    pub month: u32,
}

impl MonthKey {
    /// Creates a month key. `month` is expected in 1-12.
    #[must_use]
    pub const fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The calendar month a date falls in.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month `back` months before this one.
    #[must_use]
    pub fn minus_months(self, back: u32) -> Self {
        let index = i64::from(self.year) * 12 + i64::from(self.month) - 1 - i64::from(back);
        Self {
            year: i32::try_from(index.div_euclid(12)).unwrap_or(self.year),
            month: u32::try_from(index.rem_euclid(12) + 1).unwrap_or(1),
        }
    }

    /// ISO-style period label (`YYYY-MM`).
    #[must_use]
    pub fn label(self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Builds the gap-filled chart window for a client.
///
/// - `Monthly` yields exactly 4 buckets, `Yearly` exactly 12.
/// - The last bucket is the later of `today`'s month and the latest month
///   in `real`.
/// - Buckets with no matching real month carry zero revenue; a client with
///   no reports gets a full zero window, never an empty vector.
///
/// Values are gross; scaling by the client's share is a display concern.
#[must_use]
pub fn synthesize_series(
    real: &[MonthlyRevenue],
    view: ChartView,
    today: NaiveDate,
) -> Vec<ChartPoint> {
    let today_month = MonthKey::from_date(today);
    let anchor = real
        .iter()
        .map(|m| m.month)
        .max()
        .map_or(today_month, |latest| latest.max(today_month));

    (0..view.bucket_count())
        .rev()
        .map(|back| {
            let key = anchor.minus_months(back);
            let revenue = real
                .iter()
                .find(|m| m.month == key)
                .map_or(Decimal::ZERO, |m| m.revenue);
            ChartPoint {
                period: key.label(),
                revenue,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn month(year: i32, month: u32, revenue: Decimal) -> MonthlyRevenue {
        MonthlyRevenue {
            month: MonthKey::new(year, month),
            revenue,
        }
    }

    #[test]
    fn test_month_key_minus_within_year() {
        assert_eq!(MonthKey::new(2026, 8).minus_months(3), MonthKey::new(2026, 5));
        assert_eq!(MonthKey::new(2026, 8).minus_months(0), MonthKey::new(2026, 8));
    }

    #[test]
    fn test_month_key_minus_across_year_boundary() {
        assert_eq!(MonthKey::new(2026, 2).minus_months(3), MonthKey::new(2025, 11));
        assert_eq!(MonthKey::new(2026, 1).minus_months(12), MonthKey::new(2025, 1));
        assert_eq!(MonthKey::new(2026, 1).minus_months(1), MonthKey::new(2025, 12));
    }

    #[test]
    fn test_month_key_label() {
        assert_eq!(MonthKey::new(2026, 3).label(), "2026-03");
        assert_eq!(MonthKey::new(987, 12).label(), "0987-12");
    }

    #[test]
    fn test_monthly_view_has_four_buckets() {
        let series = synthesize_series(&[], ChartView::Monthly, date(2026, 8, 30));
        assert_eq!(series.len(), 4);
        let labels: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2026-05", "2026-06", "2026-07", "2026-08"]);
        assert!(series.iter().all(|p| p.revenue == Decimal::ZERO));
    }

    #[test]
    fn test_yearly_view_has_twelve_buckets() {
        let series = synthesize_series(&[], ChartView::Yearly, date(2026, 8, 30));
        assert_eq!(series.len(), 12);
        assert_eq!(series.first().unwrap().period, "2025-09");
        assert_eq!(series.last().unwrap().period, "2026-08");
    }

    #[test]
    fn test_real_months_fill_their_buckets() {
        let real = vec![
            month(2026, 6, dec!(1200)),
            month(2026, 8, dec!(900.50)),
        ];
        let series = synthesize_series(&real, ChartView::Monthly, date(2026, 8, 15));

        assert_eq!(series[0].revenue, Decimal::ZERO); // 2026-05
        assert_eq!(series[1].revenue, dec!(1200)); // 2026-06
        assert_eq!(series[2].revenue, Decimal::ZERO); // 2026-07
        assert_eq!(series[3].revenue, dec!(900.50)); // 2026-08
    }

    #[test]
    fn test_future_report_moves_the_anchor() {
        // Latest report is two months ahead of the wall clock; the window
        // must end at the report's month, not at "now".
        let real = vec![month(2026, 10, dec!(500))];
        let series = synthesize_series(&real, ChartView::Monthly, date(2026, 8, 30));

        let labels: Vec<&str> = series.iter().map(|p| p.period.as_str()).collect();
        assert_eq!(labels, vec!["2026-07", "2026-08", "2026-09", "2026-10"]);
        assert_eq!(series[3].revenue, dec!(500));
    }

    #[test]
    fn test_old_reports_fall_out_of_the_window() {
        let real = vec![month(2024, 1, dec!(9999)), month(2026, 7, dec!(100))];
        let series = synthesize_series(&real, ChartView::Monthly, date(2026, 8, 30));

        assert_eq!(series.len(), 4);
        assert!(series.iter().all(|p| p.revenue != dec!(9999)));
        assert_eq!(series[2].revenue, dec!(100)); // 2026-07
    }

    #[test]
    fn test_buckets_are_chronologically_ascending() {
        let real = vec![month(2025, 12, dec!(10)), month(2026, 4, dec!(20))];
        let series = synthesize_series(&real, ChartView::Yearly, date(2026, 4, 1));

        let mut sorted = series.clone();
        sorted.sort_by(|a, b| a.period.cmp(&b.period));
        assert_eq!(series, sorted);
    }
}
