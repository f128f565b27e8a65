//! In-memory sales session: the records of the most recent upload.

use std::path::PathBuf;

use chrono::NaiveDate;
use sales_core::models::SalesRecord;
use sales_core::time_utils::{Period, WeekStart};
use tracing::{debug, info};

use crate::aggregator::{RevenueAggregator, RevenueBucket};
use crate::parser::{Diagnostic, SectionAccumulator};
use crate::reader;

/// What happened to the most recent load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was selected.
    Empty,
    /// At least one section never received a value; nothing was built.
    Incomplete {
        basic: usize,
        deluxe: usize,
        totals: usize,
    },
    /// Records were built.
    Loaded { records: usize, diagnostics: usize },
}

/// Holds the parsed records for one upload. Every load starts from scratch.
#[derive(Debug, Default)]
pub struct SalesSession {
    records: Vec<SalesRecord>,
    diagnostics: Vec<Diagnostic>,
}

impl SalesSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.diagnostics.clear();
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Replace the session contents with the records parsed from `texts`,
    /// one text per selected file, in selection order.
    pub fn load_texts<I, S>(&mut self, texts: I, today: NaiveDate) -> LoadStatus
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.clear();

        let mut acc = SectionAccumulator::new();
        let mut files = 0usize;
        for text in texts {
            acc.ingest_text(text.as_ref());
            files += 1;
        }

        if files == 0 {
            debug!("No files selected");
            return LoadStatus::Empty;
        }

        let (basic, deluxe, totals) = acc.lengths();
        match acc.finish(today) {
            Some(outcome) => {
                self.records = outcome.records;
                self.diagnostics = outcome.diagnostics;
                info!(
                    "Loaded {} daily records from {} files",
                    self.records.len(),
                    files
                );
                LoadStatus::Loaded {
                    records: self.records.len(),
                    diagnostics: self.diagnostics.len(),
                }
            }
            None => LoadStatus::Incomplete {
                basic,
                deluxe,
                totals,
            },
        }
    }

    /// Read the selected files (directories expand to their `.txt` exports)
    /// and load them once every read has finished.
    pub async fn load_files(&mut self, paths: &[PathBuf], today: NaiveDate) -> LoadStatus {
        self.clear();
        if paths.is_empty() {
            debug!("No files selected");
            return LoadStatus::Empty;
        }

        let files = reader::collect_input_files(paths);
        let loaded = reader::read_batch(&files).await;
        let texts: Vec<&str> = loaded.iter().filter_map(|f| f.contents()).collect();

        if texts.is_empty() {
            // Selection was non-empty but nothing could be read.
            return LoadStatus::Incomplete {
                basic: 0,
                deluxe: 0,
                totals: 0,
            };
        }
        self.load_texts(texts, today)
    }

    /// Buckets for `period`, newest first.
    pub fn revenues(&self, period: Period, today: NaiveDate, week_start: WeekStart) -> Vec<RevenueBucket> {
        RevenueAggregator::aggregate(&self.records, period, today, week_start)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "Basic Cupcake:\n3\n2\nDelux Cupcakes:\n1\n0\nTotal:\n20\n15\n";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn test_load_texts_builds_records() {
        let mut session = SalesSession::new();
        let status = session.load_texts([SAMPLE], today());
        assert_eq!(
            status,
            LoadStatus::Loaded {
                records: 2,
                diagnostics: 0
            }
        );
        assert_eq!(session.records().len(), 2);
        assert!(!session.is_empty());
    }

    #[test]
    fn test_new_load_discards_previous_records() {
        let mut session = SalesSession::new();
        session.load_texts([SAMPLE], today());
        let single = "Basic Cupcake:\n9\nDelux Cupcakes:\n9\nTotal:\n99\n";
        session.load_texts([single], today());
        assert_eq!(session.records().len(), 1);
        assert_eq!(session.records()[0].basic_sold, Some(9));
    }

    #[test]
    fn test_incomplete_load_leaves_session_empty() {
        let mut session = SalesSession::new();
        session.load_texts([SAMPLE], today());
        let status = session.load_texts(["Basic Cupcake:\n1\nTotal:\n5\n"], today());
        assert_eq!(
            status,
            LoadStatus::Incomplete {
                basic: 1,
                deluxe: 0,
                totals: 1
            }
        );
        assert!(session.is_empty());
    }

    #[test]
    fn test_empty_selection_is_noop() {
        let mut session = SalesSession::new();
        assert_eq!(session.load_texts(Vec::<String>::new(), today()), LoadStatus::Empty);
        assert!(session.is_empty());
    }

    #[test]
    fn test_diagnostics_kept_with_records() {
        let mut session = SalesSession::new();
        let text = "Basic Cupcake:\n1\n2\nDelux Cupcakes:\nx\nTotal:\n10\n";
        session.load_texts([text], today());
        assert_eq!(session.records().len(), 2);
        // One malformed deluxe value, then deluxe and total run out on day 1.
        assert_eq!(session.diagnostics().len(), 3);
    }

    #[test]
    fn test_revenues_delegates_to_aggregator() {
        let mut session = SalesSession::new();
        session.load_texts([SAMPLE], today());
        let buckets = session.revenues(Period::Week, today(), WeekStart::Sunday);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].total_revenue(), Some(35));
    }

    #[tokio::test]
    async fn test_load_files_reads_in_selection_order() {
        let tmp = TempDir::new().unwrap();
        let newest = tmp.path().join("newest.txt");
        let older = tmp.path().join("older.txt");
        std::fs::write(&newest, "Basic Cupcake:\n3\nDelux Cupcakes:\n1\nTotal:\n20\n").unwrap();
        std::fs::write(&older, "Basic Cupcake:\n2\nDelux Cupcakes:\n0\nTotal:\n15\n").unwrap();

        let mut session = SalesSession::new();
        let status = session.load_files(&[newest, older], today()).await;
        assert!(matches!(status, LoadStatus::Loaded { records: 2, .. }));
        assert_eq!(session.records()[0].total_sales, Some(20));
        assert_eq!(session.records()[1].total_sales, Some(15));
    }

    #[tokio::test]
    async fn test_load_files_all_unreadable() {
        let tmp = TempDir::new().unwrap();
        let mut session = SalesSession::new();
        let status = session
            .load_files(&[tmp.path().join("missing.txt")], today())
            .await;
        assert!(matches!(status, LoadStatus::Incomplete { .. }));
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn test_load_files_no_selection() {
        let mut session = SalesSession::new();
        assert_eq!(session.load_files(&[], today()).await, LoadStatus::Empty);
    }
}
