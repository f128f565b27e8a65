//! Revenue table for one period granularity.
//!
//! Renders a bordered [`ratatui::widgets::Table`] with one row per bucket,
//! newest first, plus a highlighted totals row at the bottom.

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use sales_core::formatting;
use sales_core::models::{Category, Figure};
use sales_data::aggregator::RevenueStats;
use sales_data::report::PeriodReport;

use crate::themes::Theme;

/// Column titles; the category columns follow [`Category::ALL`].
pub fn headers() -> [&'static str; 6] {
    let [basic, deluxe, other] = Category::ALL.map(Category::label);
    ["Period", "Days", "Total", basic, deluxe, other]
}

/// Cell texts for one stats line, in [`headers`] order after the label.
pub fn stats_cells(stats: &RevenueStats) -> [String; 5] {
    [
        stats.days.to_string(),
        formatting::format_amount(stats.total_revenue),
        formatting::format_units_and_revenue(stats.basic_units, stats.basic_revenue),
        formatting::format_units_and_revenue(stats.deluxe_units, stats.deluxe_revenue),
        formatting::format_amount(stats.other_revenue),
    ]
}

/// Render the table for `report` into `area`.
pub fn render_table_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    report: &PeriodReport,
    theme: &Theme,
) {
    let header = Row::new(headers().map(|h| Cell::from(h).style(theme.table_header))).height(1);

    let data_rows: Vec<Row> = report
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let style = if i % 2 == 0 {
                theme.table_row
            } else {
                theme.table_row_alt
            };
            let [days, total, basic, deluxe, other] = stats_cells(&row.stats);
            Row::new(vec![
                Cell::from(row.label.clone()).style(label_style(&row.stats, theme)),
                Cell::from(days),
                amount_cell(total, row.stats.total_revenue, theme),
                Cell::from(basic),
                Cell::from(deluxe),
                amount_cell(other, row.stats.other_revenue, theme),
            ])
            .style(style)
        })
        .collect();

    let [days, total, basic, deluxe, other] = stats_cells(&report.totals);
    let total_row = Row::new(vec![
        Cell::from("TOTAL"),
        Cell::from(days),
        Cell::from(total),
        Cell::from(basic),
        Cell::from(deluxe),
        Cell::from(other),
    ])
    .style(theme.table_total);

    let mut all_rows = data_rows;
    all_rows.push(total_row);

    let widths = [
        Constraint::Length(12),
        Constraint::Length(6),
        Constraint::Length(12),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(10),
    ];

    let table = Table::new(all_rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        )
        .style(theme.text);

    frame.render_widget(table, area);
}

/// Render a placeholder when there is nothing to show.
pub fn render_no_data(frame: &mut Frame, area: Rect, theme: &Theme) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No sales data loaded", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Pass export files containing Basic Cupcake:, Delux Cupcakes: and Total: sections.",
            theme.dim,
        )),
        Line::from(Span::styled("Press 'q' or Ctrl+C to exit", theme.dim)),
    ];
    frame.render_widget(
        Paragraph::new(ratatui::text::Text::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Cupcake Sales "),
        ),
        area,
    );
}

/// Periods holding a corrupted day are flagged on their label.
fn label_style(stats: &RevenueStats, theme: &Theme) -> Style {
    if stats.corrupted_days > 0 {
        theme.anomaly
    } else {
        Style::default()
    }
}

/// Negative or missing amounts stand out.
fn amount_cell(text: String, figure: Figure, theme: &Theme) -> Cell<'static> {
    let style = match figure {
        Some(v) if v >= 0 => Style::default(),
        _ => theme.anomaly,
    };
    Cell::from(text).style(style)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
