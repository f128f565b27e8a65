//! Grouped revenue bar chart: one group per bucket with Total, Basic and
//! Deluxe bars.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use sales_core::formatting;
use sales_core::models::{Category, Figure};
use sales_data::report::ChartSeries;

use crate::themes::Theme;

const BAR_WIDTH: u16 = 5;

/// Height of a bar for `figure`. The axis starts at zero, so negative and
/// unparseable amounts draw as empty bars.
pub fn bar_value(figure: Figure) -> u64 {
    figure.map(|v| v.max(0) as u64).unwrap_or(0)
}

/// Render `chart` into `area` with a one-line colour legend on top.
pub fn render_chart_view(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    chart: &ChartSeries,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [legend_area, bars_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);

    let legend = Line::from(vec![
        Span::styled("■ Total  ", theme.series_total),
        Span::styled(
            format!("■ {}  ", Category::Basic.label()),
            theme.category_style(Category::Basic),
        ),
        Span::styled(
            format!("■ {}", Category::Deluxe.label()),
            theme.category_style(Category::Deluxe),
        ),
    ]);
    frame.render_widget(Paragraph::new(legend), legend_area);

    let mut bar_chart = BarChart::default()
        .bar_width(BAR_WIDTH)
        .bar_gap(0)
        .group_gap(3)
        .label_style(theme.text)
        .value_style(theme.text);

    for (i, label) in chart.labels.iter().enumerate() {
        let series = [
            (chart.total.get(i).copied().flatten(), theme.series_total),
            (
                chart.basic.get(i).copied().flatten(),
                theme.category_style(Category::Basic),
            ),
            (
                chart.deluxe.get(i).copied().flatten(),
                theme.category_style(Category::Deluxe),
            ),
        ];
        let bars: Vec<Bar> = series
            .iter()
            .map(|&(figure, style)| {
                Bar::default()
                    .value(bar_value(figure))
                    .text_value(formatting::format_amount(figure))
                    .style(style)
            })
            .collect();
        bar_chart = bar_chart.data(
            BarGroup::default()
                .label(Line::from(label.clone()))
                .bars(&bars),
        );
    }

    frame.render_widget(bar_chart, bars_area);
}

// ── Tests ──────────────────────────────────────────────────────────────────────
