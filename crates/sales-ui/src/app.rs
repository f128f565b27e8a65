//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, the prepared report and the selected tab. Each tab
//! shows the table and bar chart for one period granularity.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};

use sales_core::time_utils::Period;
use sales_data::report::{PeriodReport, SalesReport};

use crate::chart_view;
use crate::table_view;
use crate::themes::Theme;

/// Root application state for the sales TUI.
pub struct App {
    pub theme: Theme,
    pub report: SalesReport,
    /// Index into `report.periods` of the visible tab.
    pub selected: usize,
    pub should_quit: bool,
}

impl App {
    /// Build the app, opening on `initial` when the report has that period.
    pub fn new(theme_name: &str, report: SalesReport, initial: Option<Period>) -> Self {
        let selected = initial
            .and_then(|p| report.periods.iter().position(|r| r.period == p))
            .unwrap_or(0);
        Self {
            theme: Theme::from_name(theme_name),
            report,
            selected,
            should_quit: false,
        }
    }

    pub fn selected_report(&self) -> Option<&PeriodReport> {
        self.report.periods.get(self.selected)
    }

    pub fn next_tab(&mut self) {
        let count = self.report.periods.len();
        if count > 0 {
            self.selected = (self.selected + 1) % count;
        }
    }

    pub fn previous_tab(&mut self) {
        let count = self.report.periods.len();
        if count > 0 {
            self.selected = (self.selected + count - 1) % count;
        }
    }

    /// Apply one key press. Tab switching changes only what is displayed.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.next_tab(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.previous_tab(),
            KeyCode::Char(c @ '1'..='9') => {
                let index = (c as usize) - ('1' as usize);
                if index < self.report.periods.len() {
                    self.selected = index;
                }
            }
            _ => {}
        }
    }

    /// Run the tabbed report until `q` / `Esc` / `Ctrl+C`.
    pub async fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.report.days == 0 {
            table_view::render_no_data(frame, area, &self.theme);
            return;
        }

        let [tabs_area, table_area, chart_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Percentage(40),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(area);

        let titles: Vec<Line> = self
            .report
            .periods
            .iter()
            .enumerate()
            .map(|(i, p)| Line::from(format!("{} {}", i + 1, p.period.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.selected)
            .style(self.theme.tab)
            .highlight_style(self.theme.tab_selected)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Cupcake Sales · {} ", self.report.today))
                    .title_style(self.theme.title),
            );
        frame.render_widget(tabs, tabs_area);

        if let Some(report) = self.selected_report() {
            let title = format!("{} Revenue", report.period.title());
            table_view::render_table_view(frame, table_area, &title, report, &self.theme);
            chart_view::render_chart_view(frame, chart_area, &title, &report.chart, &self.theme);
        }

        let help = if self.report.diagnostics.is_empty() {
            Line::styled("Tab/←/→ switch period · q quit", self.theme.dim)
        } else {
            Line::styled(
                format!(
                    "{} parse warnings (see log) · Tab/←/→ switch period · q quit",
                    self.report.diagnostics.len()
                ),
                self.theme.warning,
            )
        };
        frame.render_widget(help, help_area);
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
