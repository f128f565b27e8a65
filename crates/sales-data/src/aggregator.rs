//! Revenue aggregation over weekly, monthly and yearly windows.

use chrono::NaiveDate;
use sales_core::models::{sum_figures, Category, Figure, SalesRecord};
use sales_core::time_utils::{self, Period, WeekStart};
use serde::Serialize;
use tracing::debug;

// ── RevenueStats ──────────────────────────────────────────────────────────────

/// Revenue and unit totals over a set of daily records.
///
/// Every figure is `None` if any record feeding it had an unparseable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevenueStats {
    pub days: usize,
    /// Days with at least one unparseable or missing value.
    pub corrupted_days: usize,
    pub total_revenue: Figure,
    pub basic_units: Figure,
    pub basic_revenue: Figure,
    pub deluxe_units: Figure,
    pub deluxe_revenue: Figure,
    pub other_revenue: Figure,
}

impl Default for RevenueStats {
    fn default() -> Self {
        Self {
            days: 0,
            corrupted_days: 0,
            total_revenue: Some(0),
            basic_units: Some(0),
            basic_revenue: Some(0),
            deluxe_units: Some(0),
            deluxe_revenue: Some(0),
            other_revenue: Some(0),
        }
    }
}

impl RevenueStats {
    pub fn from_records(records: &[SalesRecord]) -> Self {
        let revenue = |category: Category| {
            sum_figures(records.iter().map(|r| r.category_revenue(category)))
        };
        let units = |category: Category| sum_figures(records.iter().map(|r| r.units_sold(category)));

        Self {
            days: records.len(),
            corrupted_days: records.iter().filter(|r| r.is_corrupted()).count(),
            total_revenue: sum_figures(records.iter().map(|r| r.total_sales)),
            basic_units: units(Category::Basic),
            basic_revenue: revenue(Category::Basic),
            deluxe_units: units(Category::Deluxe),
            deluxe_revenue: revenue(Category::Deluxe),
            other_revenue: sum_figures(records.iter().map(SalesRecord::other_revenue)),
        }
    }

    /// Fold `other` into the running totals.
    pub fn add(&mut self, other: &RevenueStats) {
        self.days += other.days;
        self.corrupted_days += other.corrupted_days;
        self.total_revenue = sum_figures([self.total_revenue, other.total_revenue]);
        self.basic_units = sum_figures([self.basic_units, other.basic_units]);
        self.basic_revenue = sum_figures([self.basic_revenue, other.basic_revenue]);
        self.deluxe_units = sum_figures([self.deluxe_units, other.deluxe_units]);
        self.deluxe_revenue = sum_figures([self.deluxe_revenue, other.deluxe_revenue]);
        self.other_revenue = sum_figures([self.other_revenue, other.other_revenue]);
    }

    /// Units sold for a known category; `Other` has none.
    pub fn units(&self, category: Category) -> Figure {
        match category {
            Category::Basic => self.basic_units,
            Category::Deluxe => self.deluxe_units,
            Category::Other => None,
        }
    }

    pub fn revenue(&self, category: Category) -> Figure {
        match category {
            Category::Basic => self.basic_revenue,
            Category::Deluxe => self.deluxe_revenue,
            Category::Other => self.other_revenue,
        }
    }
}

// ── RevenueBucket ─────────────────────────────────────────────────────────────

/// The records falling inside one calendar week, month or year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevenueBucket {
    pub period: Period,
    /// Date the backwards walk was at when this bucket was collected.
    pub anchor: NaiveDate,
    pub period_start: NaiveDate,
    /// Inclusive.
    pub period_end: NaiveDate,
    pub records: Vec<SalesRecord>,
}

impl RevenueBucket {
    pub fn label(&self) -> String {
        time_utils::period_label(self.period, self.period_start)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        time_utils::is_between_inclusive(date, self.period_start, self.period_end)
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn total_revenue(&self) -> Figure {
        sum_figures(self.records.iter().map(|r| r.total_sales))
    }

    pub fn units_sold(&self, category: Category) -> Figure {
        sum_figures(self.records.iter().map(|r| r.units_sold(category)))
    }

    pub fn category_revenue(&self, category: Category) -> Figure {
        sum_figures(self.records.iter().map(|r| r.category_revenue(category)))
    }

    pub fn stats(&self) -> RevenueStats {
        RevenueStats::from_records(&self.records)
    }
}

// ── RevenueAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that groups daily records by calendar period.
pub struct RevenueAggregator;

impl RevenueAggregator {
    pub fn weekly(records: &[SalesRecord], today: NaiveDate, week_start: WeekStart) -> Vec<RevenueBucket> {
        Self::aggregate(records, Period::Week, today, week_start)
    }

    pub fn monthly(records: &[SalesRecord], today: NaiveDate) -> Vec<RevenueBucket> {
        Self::aggregate(records, Period::Month, today, WeekStart::default())
    }

    pub fn yearly(records: &[SalesRecord], today: NaiveDate) -> Vec<RevenueBucket> {
        Self::aggregate(records, Period::Year, today, WeekStart::default())
    }

    /// Walk backwards from `today` one `period` at a time, collecting the
    /// records inside each period.
    ///
    /// The walk stops at the first period with no records, so data older than
    /// a completely empty period is never reached. Buckets come out newest
    /// first and never overlap.
    pub fn aggregate(
        records: &[SalesRecord],
        period: Period,
        today: NaiveDate,
        week_start: WeekStart,
    ) -> Vec<RevenueBucket> {
        let mut buckets = Vec::new();
        let mut anchor = today;

        loop {
            let period_start = time_utils::start_of(anchor, period, week_start);
            let period_end = time_utils::end_of(anchor, period, week_start);
            let members: Vec<SalesRecord> = records
                .iter()
                .filter(|r| time_utils::is_between_inclusive(r.date, period_start, period_end))
                .copied()
                .collect();

            if members.is_empty() {
                debug!(
                    "no {} records in {}..={}; stopping after {} buckets",
                    period,
                    period_start,
                    period_end,
                    buckets.len()
                );
                break;
            }

            buckets.push(RevenueBucket {
                period,
                anchor,
                period_start,
                period_end,
                records: members,
            });

            match time_utils::step_back(anchor, period) {
                Some(previous) => anchor = previous,
                None => break,
            }
        }

        buckets
    }

    /// Sum the stats of every bucket.
    pub fn calculate_totals(buckets: &[RevenueBucket]) -> RevenueStats {
        let mut totals = RevenueStats::default();
        for bucket in buckets {
            totals.add(&bucket.stats());
        }
        totals
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn record(date: NaiveDate, total: i64, basic: i64, deluxe: i64) -> SalesRecord {
        SalesRecord::new(date, Some(total), Some(basic), Some(deluxe))
    }

    /// One record per day for `days` days ending at `today`.
    fn daily_run(today: NaiveDate, days: u64) -> Vec<SalesRecord> {
        (0..days)
            .map(|i| record(today - Days::new(i), 20, 2, 1))
            .collect()
    }

    // 2024-03-14 is a Thursday; with Sunday-start weeks its week is 10..=16.
    fn today() -> NaiveDate {
        d(2024, 3, 14)
    }

    // ── weekly ────────────────────────────────────────────────────────────────

    #[test]
    fn test_weekly_buckets_newest_first() {
        let records = daily_run(today(), 14);
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);

        let starts: Vec<NaiveDate> = buckets.iter().map(|b| b.period_start).collect();
        assert_eq!(starts, vec![d(2024, 3, 10), d(2024, 3, 3), d(2024, 2, 25)]);
        assert_eq!(buckets[0].record_count(), 5);
        assert_eq!(buckets[1].record_count(), 7);
        assert_eq!(buckets[2].record_count(), 2);
    }

    #[test]
    fn test_weekly_monday_start() {
        let records = daily_run(today(), 4);
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Monday);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period_start, d(2024, 3, 11));
        assert_eq!(buckets[0].record_count(), 4);
    }

    #[test]
    fn test_gap_week_stops_aggregation() {
        let records = vec![record(today(), 20, 2, 1), record(today() - Days::new(21), 30, 3, 1)];
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].records, vec![records[0]]);
    }

    #[test]
    fn test_no_record_this_period_yields_nothing() {
        let records = vec![record(d(2024, 1, 2), 20, 2, 1)];
        assert!(RevenueAggregator::weekly(&records, today(), WeekStart::Sunday).is_empty());
        assert!(RevenueAggregator::monthly(&records, today()).is_empty());
        assert_eq!(RevenueAggregator::yearly(&records, today()).len(), 1);
    }

    #[test]
    fn test_empty_records() {
        assert!(RevenueAggregator::aggregate(&[], Period::Year, today(), WeekStart::Sunday).is_empty());
    }

    // ── monthly / yearly ──────────────────────────────────────────────────────

    #[test]
    fn test_monthly_spans_month_boundary() {
        let records = daily_run(today(), 20);
        let buckets = RevenueAggregator::monthly(&records, today());
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].label(), "03/2024");
        assert_eq!(buckets[0].record_count(), 14);
        assert_eq!(buckets[1].label(), "02/2024");
        assert_eq!(buckets[1].record_count(), 6);
        assert_eq!(buckets[1].period_end, d(2024, 2, 29));
    }

    #[test]
    fn test_monthly_from_month_end_anchor() {
        // Stepping back from 31 March lands on 29 February, still February.
        let end_of_march = d(2024, 3, 31);
        let records = vec![record(end_of_march, 10, 1, 0), record(d(2024, 2, 1), 10, 1, 0)];
        let buckets = RevenueAggregator::monthly(&records, end_of_march);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[1].period_start, d(2024, 2, 1));
    }

    #[test]
    fn test_yearly_buckets() {
        let today = d(2024, 1, 3);
        let records = daily_run(today, 5);
        let buckets = RevenueAggregator::yearly(&records, today);
        let labels: Vec<String> = buckets.iter().map(|b| b.label()).collect();
        assert_eq!(labels, vec!["2024", "2023"]);
        assert_eq!(buckets[0].record_count(), 3);
        assert_eq!(buckets[1].record_count(), 2);
    }

    // ── invariants ────────────────────────────────────────────────────────────

    #[test]
    fn test_buckets_never_hold_outside_records() {
        let records = daily_run(today(), 120);
        for period in Period::ALL {
            for week_start in [WeekStart::Sunday, WeekStart::Monday] {
                let buckets = RevenueAggregator::aggregate(&records, period, today(), week_start);
                for bucket in &buckets {
                    assert!(bucket.records.iter().all(|r| bucket.contains(r.date)));
                }
                let held: usize = buckets.iter().map(|b| b.record_count()).sum();
                assert_eq!(held, records.len(), "{period} / {week_start}");
                for pair in buckets.windows(2) {
                    assert!(pair[0].period_start > pair[1].period_end);
                }
            }
        }
    }

    // ── sums ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_bucket_sums() {
        let records = vec![record(today(), 20, 3, 1), record(today() - Days::new(1), 15, 2, 0)];
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);
        let bucket = &buckets[0];
        assert_eq!(bucket.total_revenue(), Some(35));
        assert_eq!(bucket.units_sold(Category::Basic), Some(5));
        assert_eq!(bucket.units_sold(Category::Deluxe), Some(1));
        assert_eq!(bucket.category_revenue(Category::Basic), Some(25));
        assert_eq!(bucket.category_revenue(Category::Deluxe), Some(6));
        assert_eq!(bucket.category_revenue(Category::Other), Some(4));

        let stats = bucket.stats();
        assert_eq!(stats.days, 2);
        assert_eq!(stats.revenue(Category::Other), Some(4));
        assert_eq!(stats.units(Category::Basic), Some(5));
    }

    #[test]
    fn test_corrupt_record_poisons_bucket() {
        let records = vec![
            record(today(), 20, 3, 1),
            SalesRecord::new(today() - Days::new(1), None, Some(2), Some(0)),
        ];
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);
        assert_eq!(buckets[0].total_revenue(), None);
        assert_eq!(buckets[0].category_revenue(Category::Basic), Some(25));
        assert_eq!(buckets[0].category_revenue(Category::Other), None);
    }

    #[test]
    fn test_stats_count_corrupted_days() {
        let records = vec![
            record(today(), 20, 3, 1),
            SalesRecord::new(today() - Days::new(1), Some(15), None, Some(0)),
            record(today() - Days::new(7), 10, 1, 0),
        ];
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].stats().corrupted_days, 1);
        assert_eq!(buckets[0].stats().other_revenue, None);
        assert_eq!(buckets[1].stats().corrupted_days, 0);

        let totals = RevenueAggregator::calculate_totals(&buckets);
        assert_eq!(totals.days, 3);
        assert_eq!(totals.corrupted_days, 1);
    }

    #[test]
    fn test_calculate_totals() {
        let records = daily_run(today(), 14);
        let buckets = RevenueAggregator::weekly(&records, today(), WeekStart::Sunday);
        let totals = RevenueAggregator::calculate_totals(&buckets);
        assert_eq!(totals.days, 14);
        assert_eq!(totals.total_revenue, Some(280));
        assert_eq!(totals.basic_revenue, Some(140));
        assert_eq!(totals.deluxe_revenue, Some(84));
        assert_eq!(totals.other_revenue, Some(56));
    }

    #[test]
    fn test_calculate_totals_empty() {
        let totals = RevenueAggregator::calculate_totals(&[]);
        assert_eq!(totals, RevenueStats::default());
        assert_eq!(totals.total_revenue, Some(0));
    }
}
