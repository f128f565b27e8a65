use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::time_utils::{self, Period, WeekStart};

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Weekly, monthly and yearly revenue reports from cupcake shop sales exports
#[derive(Parser, Debug, Clone)]
#[command(
    name = "cupcake-sales",
    about = "Weekly, monthly and yearly revenue reports from cupcake shop sales exports",
    version
)]
pub struct Settings {
    /// Sales export files, or directories containing .txt exports
    #[arg(value_name = "PATHS")]
    pub paths: Vec<PathBuf>,

    /// Output mode
    #[arg(long, default_value = "tui", value_parser = ["tui", "report", "json"])]
    pub view: String,

    /// Period shown first (tui) or the only period printed (report, json)
    #[arg(long, value_enum)]
    pub period: Option<Period>,

    /// Treat this date (YYYY-MM-DD) as today instead of the current date
    #[arg(long)]
    pub today: Option<String>,

    /// Timezone used to work out today's date (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// First day of the week for weekly buckets
    #[arg(long, value_enum, default_value_t = WeekStart::Sunday)]
    pub week_start: WeekStart,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Logging level
    #[arg(long, default_value = "WARNING", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

impl Settings {
    /// The date every record offset and period walk is measured from.
    ///
    /// `--today` wins; otherwise the current date in the configured timezone,
    /// which must be a known IANA name.
    pub fn resolve_today(&self) -> Result<NaiveDate> {
        match &self.today {
            Some(raw) => time_utils::parse_date(raw),
            None => Ok(time_utils::today_in(time_utils::parse_timezone(&self.timezone)?)),
        }
    }

    /// Parse the process arguments, merge persisted preferences and save the
    /// result for next time.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(std::env::args_os().collect(), &LastUsedParams::config_path())
    }

    /// Full implementation – accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(args: Vec<std::ffi::OsString>, config_path: &Path) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        if settings.clear {
            let _ = LastUsedParams::clear_at(config_path);
            return Self::resolve_auto_values(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "timezone") {
            if let Some(v) = last.timezone {
                settings.timezone = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "week_start") {
            if let Some(v) = last.week_start {
                settings.week_start = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "theme") {
            if let Some(v) = last.theme {
                settings.theme = v;
            }
        }

        settings = Self::resolve_auto_values(settings);

        let params = LastUsedParams::from(&settings);
        if let Err(e) = params.save_to(config_path) {
            tracing::debug!("could not persist preferences: {}", e);
        }

        settings
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = time_utils::get_system_timezone();
        }
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted preferences saved to `~/.cupcake-sales/last_used.json`.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_start: Option<WeekStart>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
}

impl LastUsedParams {
    /// `~/.cupcake-sales/last_used.json`.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir`.
    pub fn config_path_in(base_dir: &Path) -> PathBuf {
        base_dir.join(".cupcake-sales").join("last_used.json")
    }

    /// Load persisted params from an explicit path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to `path`, creating parent directories if
    /// needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at `path` if it exists.
    pub fn clear_at(path: &Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            theme: Some(s.theme.clone()),
            timezone: Some(s.timezone.clone()),
            week_start: Some(s.week_start),
            view: Some(s.view.clone()),
        }
    }
}

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SalesError;
    use tempfile::TempDir;

    fn tmp_config_path(tmp: &TempDir) -> PathBuf {
        LastUsedParams::config_path_in(tmp.path())
    }

    fn args(list: &[&str]) -> Vec<std::ffi::OsString> {
        list.iter().map(|s| s.into()).collect()
    }

    // ── LastUsedParams ────────────────────────────────────────────────────────

    #[test]
    fn test_last_used_params_save_load() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        let params = LastUsedParams {
            theme: Some("dark".to_string()),
            timezone: Some("Europe/Berlin".to_string()),
            week_start: Some(WeekStart::Monday),
            view: Some("report".to_string()),
        };
        params.save_to(&path).expect("save");

        let loaded = LastUsedParams::load_from(&path);
        assert_eq!(loaded.theme, Some("dark".to_string()));
        assert_eq!(loaded.timezone, Some("Europe/Berlin".to_string()));
        assert_eq!(loaded.week_start, Some(WeekStart::Monday));
        assert_eq!(loaded.view, Some("report".to_string()));
    }

    #[test]
    fn test_last_used_params_default_when_missing() {
        let tmp = TempDir::new().expect("tempdir");
        let loaded = LastUsedParams::load_from(&tmp_config_path(&tmp));
        assert!(loaded.theme.is_none());
        assert!(loaded.week_start.is_none());
    }

    #[test]
    fn test_last_used_params_default_when_corrupt() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{ not json").unwrap();
        assert!(LastUsedParams::load_from(&path).view.is_none());
    }

    #[test]
    fn test_last_used_params_clear() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&path).expect("save");
        assert!(path.exists());
        LastUsedParams::clear_at(&path).expect("clear");
        assert!(!path.exists());
    }

    // ── CLI parsing ───────────────────────────────────────────────────────────

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::parse_from(["cupcake-sales"]);
        assert!(settings.paths.is_empty());
        assert_eq!(settings.view, "tui");
        assert!(settings.period.is_none());
        assert!(settings.today.is_none());
        assert_eq!(settings.timezone, "auto");
        assert_eq!(settings.week_start, WeekStart::Sunday);
        assert_eq!(settings.theme, "auto");
        assert_eq!(settings.log_level, "WARNING");
        assert!(!settings.debug);
        assert!(!settings.clear);
    }

    #[test]
    fn test_settings_paths_and_period() {
        let settings = Settings::parse_from([
            "cupcake-sales",
            "--period",
            "month",
            "a.txt",
            "exports/",
        ]);
        assert_eq!(settings.period, Some(Period::Month));
        assert_eq!(
            settings.paths,
            vec![PathBuf::from("a.txt"), PathBuf::from("exports/")]
        );
    }

    #[test]
    fn test_settings_rejects_unknown_view() {
        assert!(Settings::try_parse_from(["cupcake-sales", "--view", "html"]).is_err());
    }

    #[test]
    fn test_resolve_today_override() {
        let settings = Settings::parse_from(["cupcake-sales", "--today", "2024-03-14"]);
        assert_eq!(
            settings.resolve_today().unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
    }

    #[test]
    fn test_resolve_today_rejects_unknown_timezone() {
        let settings = Settings::parse_from(["cupcake-sales", "--timezone", "Mars/Olympus"]);
        assert!(matches!(
            settings.resolve_today(),
            Err(SalesError::InvalidTimezone(name)) if name == "Mars/Olympus"
        ));
    }

    #[test]
    fn test_resolve_today_in_named_timezone() {
        let settings = Settings::parse_from(["cupcake-sales", "--timezone", "Asia/Tokyo"]);
        let today = settings.resolve_today().unwrap();
        let utc_today = chrono::Utc::now().date_naive();
        assert!((today - utc_today).num_days().abs() <= 1);
    }

    #[test]
    fn test_resolve_today_invalid_override() {
        let settings = Settings::parse_from(["cupcake-sales", "--today", "yesterday"]);
        assert!(settings.resolve_today().is_err());
    }

    // ── load_with_last_used ───────────────────────────────────────────────────

    #[test]
    fn test_load_with_last_used_merges_persisted_values() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            timezone: Some("UTC".to_string()),
            week_start: Some(WeekStart::Monday),
            view: Some("report".to_string()),
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(args(&["cupcake-sales"]), &config_path);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.timezone, "UTC");
        assert_eq!(settings.week_start, WeekStart::Monday);
        assert_eq!(settings.view, "report");
    }

    #[test]
    fn test_load_with_last_used_cli_overrides_persisted() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams {
            theme: Some("dark".to_string()),
            timezone: Some("UTC".to_string()),
            ..Default::default()
        }
        .save_to(&config_path)
        .expect("save");

        let settings = Settings::load_with_last_used_impl(
            args(&["cupcake-sales", "--theme", "light", "--week-start", "sunday"]),
            &config_path,
        );
        assert_eq!(settings.theme, "light");
        assert_eq!(settings.week_start, WeekStart::Sunday);
    }

    #[test]
    fn test_load_with_last_used_clear_removes_file() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        LastUsedParams::default().save_to(&config_path).expect("save");

        Settings::load_with_last_used_impl(args(&["cupcake-sales", "--clear"]), &config_path);
        assert!(!config_path.exists());
    }

    #[test]
    fn test_load_with_last_used_debug_overrides_log_level() {
        let tmp = TempDir::new().expect("tempdir");
        let settings = Settings::load_with_last_used_impl(
            args(&["cupcake-sales", "--debug", "--timezone", "UTC"]),
            &tmp_config_path(&tmp),
        );
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_load_with_last_used_persists_after_run() {
        let tmp = TempDir::new().expect("tempdir");
        let config_path = tmp_config_path(&tmp);
        Settings::load_with_last_used_impl(
            args(&["cupcake-sales", "--theme", "classic", "--timezone", "UTC"]),
            &config_path,
        );
        let loaded = LastUsedParams::load_from(&config_path);
        assert_eq!(loaded.theme, Some("classic".to_string()));
        assert_eq!(loaded.timezone, Some("UTC".to_string()));
    }
}
