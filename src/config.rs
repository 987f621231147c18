use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::reminder::TimeOfDay;
use crate::ui::theme::{parse_hex_color, Theme};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub reminder: ReminderConfig,
    pub report: ReportConfig,
    pub appearance: AppearanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Notification title
    pub title: String,
    /// Notification body
    pub body: String,
    /// Picker starting time; current time when unset
    pub default_hour: Option<u8>,
    pub default_minute: Option<u8>,
    /// Answer to the startup permission prompt
    pub notifications_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Where rendered reports are written
    pub export_dir: PathBuf,
    /// strftime format for the date column
    pub timestamp_format: String,
    /// Opener run on each report; `{file}` is replaced by the path, empty disables
    pub share_command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Preset name: "hydrogel", "nord", "gruvbox"
    pub theme: String,
    /// Optional accent override, e.g. "#fb8c00"
    pub accent: Option<String>,
    /// Number of alerts kept in the feed
    pub alert_history: usize,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            title: "Alarm Plester".to_string(),
            body: "Sudahkah Anda mengganti plester?".to_string(),
            default_hour: None,
            default_minute: None,
            notifications_enabled: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            export_dir: base.join("plester-hydrogel"),
            timestamp_format: "%d/%m/%Y %H:%M:%S".to_string(),
            share_command: "xdg-open {file}".to_string(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            theme: "hydrogel".to_string(),
            accent: None,
            alert_history: 5,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(path);
        let path = Path::new(expanded.as_ref());

        let mut config: Self = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            tracing::info!("Config file not found, using defaults");
            Self::default()
        };

        let export_dir = config.report.export_dir.to_string_lossy().into_owned();
        config.report.export_dir = PathBuf::from(shellexpand::tilde(&export_dir).as_ref());

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(hour) = self.reminder.default_hour {
            TimeOfDay::new(hour, 0).context("Invalid reminder.default_hour")?;
        }
        if let Some(minute) = self.reminder.default_minute {
            TimeOfDay::new(0, minute).context("Invalid reminder.default_minute")?;
        }

        let bad_format = chrono::format::StrftimeItems::new(&self.report.timestamp_format)
            .any(|item| matches!(item, chrono::format::Item::Error));
        if bad_format {
            anyhow::bail!(
                "Invalid report.timestamp_format: {}",
                self.report.timestamp_format
            );
        }

        if let Some(ref accent) = self.appearance.accent {
            parse_hex_color(accent)
                .with_context(|| format!("Invalid appearance.accent: {}", accent))?;
        }
        Ok(())
    }

    /// Starting time for the alarm picker
    pub fn initial_alarm_time(&self) -> TimeOfDay {
        let now = TimeOfDay::now();
        TimeOfDay::new(
            self.reminder.default_hour.unwrap_or(now.hour()),
            self.reminder.default_minute.unwrap_or(now.minute()),
        )
        .unwrap_or(now)
    }

    /// Resolve the theme preset plus any accent override
    pub fn resolve_theme(&self) -> Theme {
        let theme = Theme::from_preset(&self.appearance.theme).unwrap_or_else(|| {
            tracing::warn!("Unknown theme '{}', using default", self.appearance.theme);
            Theme::default()
        });
        self.apply_accent(theme)
    }

    /// Layer the configured accent over any preset
    pub fn apply_accent(&self, mut theme: Theme) -> Theme {
        if let Some(color) = self.appearance.accent.as_deref().and_then(|s| parse_hex_color(s).ok()) {
            theme.accent = color;
        }
        theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.reminder.title, "Alarm Plester");
        assert!(config.reminder.notifications_enabled);
        assert_eq!(config.report.share_command, "xdg-open {file}");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r##"
            [reminder]
            default_hour = 20
            default_minute = 15

            [appearance]
            theme = "nord"
            accent = "#ff0000"
            "##,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.initial_alarm_time(), TimeOfDay::new(20, 15).unwrap());
        assert_eq!(config.report.timestamp_format, "%d/%m/%Y %H:%M:%S");
        assert_eq!(config.resolve_theme().accent, Color::Rgb(255, 0, 0));
    }

    #[test]
    fn test_accent_survives_preset_override() {
        let mut config = Config::default();
        config.appearance.accent = Some("#00ff00".to_string());

        let theme = config.apply_accent(Theme::gruvbox());
        assert_eq!(theme.accent, Color::Rgb(0, 255, 0));
        assert_eq!(theme.background, Theme::gruvbox().background);

        config.appearance.accent = None;
        assert_eq!(config.apply_accent(Theme::nord()).accent, Theme::nord().accent);
    }

    #[test]
    fn test_rejects_bad_values() {
        let mut config = Config::default();
        config.reminder.default_hour = Some(25);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.timestamp_format = "%Q%".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.appearance.accent = Some("orange".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.appearance.theme, "hydrogel");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[report]\nshare_command = \"\"\nexport_dir = \"/tmp/wounds\"\n").unwrap();

        let config = Config::load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.report.share_command, "");
        assert_eq!(config.report.export_dir, PathBuf::from("/tmp/wounds"));
    }
}
