//! Presentation-ready shapes built from revenue buckets: table rows, chart
//! series and the serialisable report.

use chrono::NaiveDate;
use sales_core::models::{Category, Figure, SalesRecord};
use sales_core::time_utils::{Period, WeekStart};
use serde::Serialize;

use crate::aggregator::{RevenueAggregator, RevenueBucket, RevenueStats};
use crate::parser::Diagnostic;

/// One table row: a period's label, span and sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    /// Date the backwards walk stood on for this row: today, then one period
    /// earlier per row.
    pub anchor: NaiveDate,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    #[serde(flatten)]
    pub stats: RevenueStats,
}

impl From<&RevenueBucket> for PeriodSummary {
    fn from(bucket: &RevenueBucket) -> Self {
        Self {
            label: bucket.label(),
            anchor: bucket.anchor,
            period_start: bucket.period_start,
            period_end: bucket.period_end,
            stats: bucket.stats(),
        }
    }
}

/// Bar-chart data: one label and three values per bucket, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub total: Vec<Figure>,
    pub basic: Vec<Figure>,
    pub deluxe: Vec<Figure>,
}

impl ChartSeries {
    pub fn from_buckets(buckets: &[RevenueBucket]) -> Self {
        Self {
            labels: buckets.iter().map(RevenueBucket::label).collect(),
            total: buckets.iter().map(RevenueBucket::total_revenue).collect(),
            basic: buckets
                .iter()
                .map(|b| b.category_revenue(Category::Basic))
                .collect(),
            deluxe: buckets
                .iter()
                .map(|b| b.category_revenue(Category::Deluxe))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Everything shown for one granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodReport {
    pub period: Period,
    pub rows: Vec<PeriodSummary>,
    pub totals: RevenueStats,
    pub chart: ChartSeries,
}

impl PeriodReport {
    pub fn from_buckets(period: Period, buckets: &[RevenueBucket]) -> Self {
        Self {
            period,
            rows: buckets.iter().map(PeriodSummary::from).collect(),
            totals: RevenueAggregator::calculate_totals(buckets),
            chart: ChartSeries::from_buckets(buckets),
        }
    }
}

/// Full report over a session's records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SalesReport {
    pub today: NaiveDate,
    pub week_start: WeekStart,
    pub days: usize,
    pub diagnostics: Vec<Diagnostic>,
    pub periods: Vec<PeriodReport>,
}

impl SalesReport {
    /// Aggregate `records` for each of `periods`, in the order given.
    pub fn build(
        records: &[SalesRecord],
        diagnostics: &[Diagnostic],
        periods: &[Period],
        today: NaiveDate,
        week_start: WeekStart,
    ) -> Self {
        let periods = periods
            .iter()
            .map(|&period| {
                let buckets = RevenueAggregator::aggregate(records, period, today, week_start);
                PeriodReport::from_buckets(period, &buckets)
            })
            .collect();

        Self {
            today,
            week_start,
            days: records.len(),
            diagnostics: diagnostics.to_vec(),
            periods,
        }
    }

    pub fn period(&self, period: Period) -> Option<&PeriodReport> {
        self.periods.iter().find(|p| p.period == period)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
