//! Non-interactive report: the same tables the TUI shows, as aligned plain
//! text.

use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use sales_data::report::{PeriodReport, SalesReport};

use crate::table_view::{headers, stats_cells};

/// Pad `s` with spaces to `width` display columns.
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(UnicodeWidthStr::width(s));
    format!("{}{}", s, " ".repeat(fill))
}

fn table_lines(report: &PeriodReport) -> Vec<[String; 6]> {
    let mut lines: Vec<[String; 6]> = Vec::with_capacity(report.rows.len() + 2);
    lines.push(headers().map(String::from));
    for row in &report.rows {
        let [days, total, basic, deluxe, other] = stats_cells(&row.stats);
        lines.push([row.label.clone(), days, total, basic, deluxe, other]);
    }
    let [days, total, basic, deluxe, other] = stats_cells(&report.totals);
    lines.push(["TOTAL".to_string(), days, total, basic, deluxe, other]);
    lines
}

/// Write one period's table.
pub fn write_period_report<W: Write>(out: &mut W, report: &PeriodReport) -> io::Result<()> {
    writeln!(out, "{} revenue", report.period.title())?;

    if report.rows.is_empty() {
        writeln!(out, "  (no sales in the current {})", report.period)?;
        return Ok(());
    }

    let lines = table_lines(report);
    let mut widths = [0usize; 6];
    for line in &lines {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(UnicodeWidthStr::width(cell.as_str()));
        }
    }

    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");

    let last = lines.len() - 1;
    for (i, line) in lines.iter().enumerate() {
        if i == last {
            writeln!(out, "  {}", rule)?;
        }
        let cells: Vec<String> = line
            .iter()
            .zip(widths)
            .map(|(cell, width)| pad(cell, width))
            .collect();
        writeln!(out, "  {}", cells.join(" | ").trim_end())?;
        if i == 0 {
            writeln!(out, "  {}", rule)?;
        }
    }
    Ok(())
}

/// Write every period in `report`, followed by any parse diagnostics.
pub fn write_sales_report<W: Write>(out: &mut W, report: &SalesReport) -> io::Result<()> {
    writeln!(
        out,
        "Cupcake sales: {} days up to {} (weeks start on {})",
        report.days, report.today, report.week_start
    )?;

    for period in &report.periods {
        writeln!(out)?;
        write_period_report(out, period)?;
    }

    if !report.diagnostics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings")?;
        for diagnostic in &report.diagnostics {
            writeln!(out, "  - {}", diagnostic)?;
        }
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
