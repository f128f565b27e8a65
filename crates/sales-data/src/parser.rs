//! Section-based parsing of point-of-sale text exports.
//!
//! An export lists one value per line under three headers:
//!
//! ```text
//! Basic Cupcake:
//! 3
//! 2
//! Delux Cupcakes:
//! 1
//! 0
//! Total:
//! 20
//! 15
//! ```
//!
//! Values are newest first: the first value under each header is today's
//! figure, the second yesterday's, and so on.

use std::sync::OnceLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use sales_core::models::{Figure, SalesRecord};
use serde::Serialize;
use tracing::{debug, warn};

pub const BASIC_HEADER: &str = "Basic Cupcake:";
pub const DELUXE_HEADER: &str = "Delux Cupcakes:";
pub const TOTAL_HEADER: &str = "Total:";

// ── Section ───────────────────────────────────────────────────────────────────

/// One of the three value lists in an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Basic,
    Deluxe,
    Total,
}

impl Section {
    /// Match a header line exactly (surrounding whitespace ignored).
    pub fn from_header(line: &str) -> Option<Self> {
        match line.trim() {
            BASIC_HEADER => Some(Section::Basic),
            DELUXE_HEADER => Some(Section::Deluxe),
            TOTAL_HEADER => Some(Section::Total),
            _ => None,
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Section::Basic => BASIC_HEADER,
            Section::Deluxe => DELUXE_HEADER,
            Section::Total => TOTAL_HEADER,
        }
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Something questionable noticed while building records. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Deluxe or total values outnumber basic ones; only the first `kept`
    /// days (the basic count) were used.
    Truncated {
        basic: usize,
        deluxe: usize,
        totals: usize,
        kept: usize,
    },
    /// A value line was not an integer and became the non-numeric sentinel.
    Malformed {
        section: Section,
        /// Day offset from today of the affected record.
        index: usize,
        line: String,
    },
    /// A section ran out of values before the basic list did; the figure
    /// became the non-numeric sentinel.
    Missing { section: Section, index: usize },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::Truncated {
                basic,
                deluxe,
                totals,
                kept,
            } => write!(
                f,
                "section lengths differ (basic {}, deluxe {}, totals {}); kept {} days",
                basic, deluxe, totals, kept
            ),
            Diagnostic::Malformed {
                section,
                index,
                line,
            } => write!(
                f,
                "non-numeric value {:?} under \"{}\" for day {}",
                line,
                section.header(),
                index
            ),
            Diagnostic::Missing { section, index } => write!(
                f,
                "no value under \"{}\" for day {}",
                section.header(),
                index
            ),
        }
    }
}

/// Records built from a complete batch, plus anything worth reporting.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub records: Vec<SalesRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

// ── SectionAccumulator ────────────────────────────────────────────────────────

/// Collects section values across every file of one batch.
#[derive(Debug, Default)]
pub struct SectionAccumulator {
    basic: Vec<String>,
    deluxe: Vec<String>,
    totals: Vec<String>,
}

impl SectionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the full text of one file. Returns the number of value lines
    /// accepted.
    ///
    /// The active section starts unset for every file, so values before the
    /// first header are dropped.
    pub fn ingest_text(&mut self, text: &str) -> usize {
        let mut current: Option<Section> = None;
        let mut accepted = 0;

        for line in text.lines() {
            if let Some(section) = Section::from_header(line) {
                current = Some(section);
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match current {
                Some(section) => {
                    self.section_mut(section).push(line.trim().to_string());
                    accepted += 1;
                }
                None => debug!("ignoring line before any section header: {:?}", line),
            }
        }

        accepted
    }

    /// `(basic, deluxe, totals)` value counts so far.
    pub fn lengths(&self) -> (usize, usize, usize) {
        (self.basic.len(), self.deluxe.len(), self.totals.len())
    }

    /// `true` once every section holds at least one value.
    pub fn is_complete(&self) -> bool {
        !self.basic.is_empty() && !self.deluxe.is_empty() && !self.totals.is_empty()
    }

    /// Turn the accumulated values into dated records.
    ///
    /// Returns `None` when any section is empty. Otherwise one record is built
    /// per basic value, index `i` dated `today - i` days. Deluxe or total
    /// values past the basic count are dropped; days where those sections
    /// have run out get the non-numeric sentinel.
    pub fn finish(self, today: NaiveDate) -> Option<ParseOutcome> {
        if !self.is_complete() {
            let (basic, deluxe, totals) = self.lengths();
            debug!(
                "incomplete section set (basic {}, deluxe {}, totals {}); no records built",
                basic, deluxe, totals
            );
            return None;
        }

        let mut diagnostics = Vec::new();
        let (basic_len, deluxe_len, totals_len) = self.lengths();
        let kept = basic_len;
        if deluxe_len > kept || totals_len > kept {
            diagnostics.push(Diagnostic::Truncated {
                basic: basic_len,
                deluxe: deluxe_len,
                totals: totals_len,
                kept,
            });
        }

        let mut records = Vec::with_capacity(kept);
        for index in 0..kept {
            let Some(date) = today.checked_sub_days(Days::new(index as u64)) else {
                warn!("ran out of representable dates after {} records", index);
                break;
            };

            let mut field = |section: Section, raw: Option<&String>| -> Figure {
                let Some(raw) = raw else {
                    diagnostics.push(Diagnostic::Missing { section, index });
                    return None;
                };
                let figure = parse_figure(raw);
                if figure.is_none() {
                    diagnostics.push(Diagnostic::Malformed {
                        section,
                        index,
                        line: raw.to_string(),
                    });
                }
                figure
            };

            let basic_sold = field(Section::Basic, self.basic.get(index));
            let deluxe_sold = field(Section::Deluxe, self.deluxe.get(index));
            let total_sales = field(Section::Total, self.totals.get(index));
            records.push(SalesRecord::new(date, total_sales, basic_sold, deluxe_sold));
        }

        for diagnostic in &diagnostics {
            warn!("{}", diagnostic);
        }
        debug!("built {} records ending {}", records.len(), today);

        Some(ParseOutcome {
            records,
            diagnostics,
        })
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Basic => &mut self.basic,
            Section::Deluxe => &mut self.deluxe,
            Section::Total => &mut self.totals,
        }
    }
}

// ── Free functions ────────────────────────────────────────────────────────────

/// Best-effort integer parse of one value line.
///
/// Leading whitespace and an optional sign are accepted, then the longest
/// run of digits is used and anything after it ignored (`"12 cupcakes"` is
/// 12). A line with no leading digits, or one that overflows, is `None`.
pub fn parse_figure(raw: &str) -> Figure {
    static LEADING_INT: OnceLock<Regex> = OnceLock::new();
    let re = LEADING_INT.get_or_init(|| Regex::new(r"^\s*([+-]?\d+)").expect("regex is valid"));
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Parse every text of a batch, in order, into records ending at `today`.
pub fn parse_batch<I, S>(texts: I, today: NaiveDate) -> Option<ParseOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut acc = SectionAccumulator::new();
    for text in texts {
        acc.ingest_text(text.as_ref());
    }
    acc.finish(today)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
