use anyhow::{Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use hundred_days_domain::notification::ReminderTime;
use hundred_days_domain::subscription::DEFAULT_PRODUCT_ID;

const CONFIG_FILE: &str = "app_config.json";

/// Log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
    Debug = 4,
    Trace = 5,
}

impl LogLevel {
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            4 => LogLevel::Debug,
            5 => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Persistent configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub reminders_enabled: bool,
    /// Local time of the daily check-in nudge
    pub daily_reminder: ReminderTime,
    /// Local time of the evening "streak at risk" warning
    pub streak_risk_reminder: ReminderTime,
    pub product_id: String,
    pub backend_url: String,
    /// Push gateway for reminder delivery; reminders stay local when unset
    pub push_gateway_url: Option<String>,
    /// Device token the gateway addresses notifications to
    pub push_device_token: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            reminders_enabled: true,
            daily_reminder: ReminderTime { hour: 9, minute: 0 },
            streak_risk_reminder: ReminderTime {
                hour: 20,
                minute: 0,
            },
            product_id: DEFAULT_PRODUCT_ID.to_string(),
            backend_url: "https://api.hundreddays.app/".to_string(),
            push_gateway_url: None,
            push_device_token: None,
        }
    }
}

impl AppConfig {
    /// Reject values a hand-edited file could carry
    fn validate(&self) -> Result<()> {
        for time in [self.daily_reminder, self.streak_risk_reminder] {
            ReminderTime::new(time.hour, time.minute)
                .map_err(|e| anyhow::anyhow!("Invalid reminder time: {}", e))?;
        }
        if self.product_id.trim().is_empty() {
            anyhow::bail!("Product id cannot be empty");
        }
        Ok(())
    }
}

/// Application configuration service
pub struct ConfigService {
    config: RwLock<AppConfig>,
    config_path: PathBuf,
}

impl ConfigService {
    /// Load `app_config.json` from `config_dir`, creating the directory if needed.
    /// A missing, unreadable or invalid file falls back to defaults.
    pub fn new(config_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(config_dir)
            .with_context(|| format!("Failed to create config dir {:?}", config_dir))?;

        let config_path = config_dir.join(CONFIG_FILE);
        let config = Self::load(&config_path);

        info!("📁 Config loaded from: {:?}", config_path);
        info!("🔧 Initial log level: {}", config.log_level.as_str());

        Ok(Self {
            config: RwLock::new(config),
            config_path,
        })
    }

    fn load(path: &Path) -> AppConfig {
        if !path.exists() {
            return AppConfig::default();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<AppConfig>(&content)?))
            .and_then(|config| config.validate().map(|_| config));

        match parsed {
            Ok(config) => config,
            Err(e) => {
                warn!("⚠️  Ignoring config at {:?}: {}", path, e);
                AppConfig::default()
            }
        }
    }

    /// Default location under the platform config directory
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("hundred-days"))
    }

    pub fn config(&self) -> AppConfig {
        self.config
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get_log_level(&self) -> LogLevel {
        self.config().log_level
    }

    /// Set log level and persist to disk
    pub fn set_log_level(&self, level: LogLevel) -> Result<()> {
        info!("🔧 Changing log level to: {}", level.as_str());
        self.update(|config| config.log_level = level)?;
        info!("⚠️  Log level will take effect on next app restart");
        Ok(())
    }

    pub fn set_reminder_times(&self, daily: ReminderTime, streak_risk: ReminderTime) -> Result<()> {
        self.update(|config| {
            config.daily_reminder = daily;
            config.streak_risk_reminder = streak_risk;
        })
    }

    /// Apply `change`, validate and persist. The in-memory copy is only
    /// replaced once the file is written.
    pub fn update(&self, change: impl FnOnce(&mut AppConfig)) -> Result<()> {
        let mut next = self.config();
        change(&mut next);
        next.validate()?;

        let content = serde_json::to_string_pretty(&next)?;
        std::fs::write(&self.config_path, content)
            .with_context(|| format!("Failed to write {:?}", self.config_path))?;

        *self
            .config
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = next;

        info!("💾 Config saved to: {:?}", self.config_path);
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}
