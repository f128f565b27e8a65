mod bootstrap;

use anyhow::Result;
use chrono::NaiveDate;
use sales_core::settings::Settings;
use sales_core::time_utils::Period;
use sales_data::report::SalesReport;
use sales_data::session::{LoadStatus, SalesSession};
use sales_ui::app::App;
use sales_ui::text_report;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| (settings.view == "tui").then(bootstrap::default_log_file));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Cupcake Sales v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "View: {}, Timezone: {}, Week start: {}, Theme: {}",
        settings.view,
        settings.timezone,
        settings.week_start,
        settings.theme
    );

    let today = settings.resolve_today()?;
    let (_, report) = load_report(&settings, today).await;

    match settings.view.as_str() {
        "report" => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            text_report::write_sales_report(&mut out, &report)?;
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            let app = App::new(&settings.theme, report, settings.period);
            app.run().await?;
        }
    }

    Ok(())
}

/// Periods to aggregate: the TUI always has every tab; the printed views
/// honour `--period`.
fn periods_for(settings: &Settings) -> Vec<Period> {
    match (settings.view.as_str(), settings.period) {
        ("tui", _) | (_, None) => Period::ALL.to_vec(),
        (_, Some(period)) => vec![period],
    }
}

/// Load the selected files into a fresh session and aggregate them.
async fn load_report(settings: &Settings, today: NaiveDate) -> (LoadStatus, SalesReport) {
    let mut session = SalesSession::new();
    let status = session.load_files(&settings.paths, today).await;

    match &status {
        LoadStatus::Empty => tracing::info!("No files selected; nothing to report"),
        LoadStatus::Incomplete {
            basic,
            deluxe,
            totals,
        } => tracing::warn!(
            "Exports did not contain all three sections (basic {}, deluxe {}, totals {}); nothing to report",
            basic,
            deluxe,
            totals
        ),
        LoadStatus::Loaded {
            records,
            diagnostics,
        } => tracing::info!("{} daily records, {} warnings", records, diagnostics),
    }

    let report = SalesReport::build(
        session.records(),
        session.diagnostics(),
        &periods_for(settings),
        today,
        settings.week_start,
    );
    (status, report)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
