//! User settings for the wizard
//!
//! Holds the acting user, currency display, warning thresholds and ledger
//! behaviour. Missing fields fall back to defaults so older files keep
//! loading.

use serde::{Deserialize, Serialize};

use super::paths::WizardPaths;
use crate::error::WizardError;
use crate::models::UserId;

/// User settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// The signed-in user; `None` until `init` runs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<UserId>,

    /// Currency symbol used in messages
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Utilization fraction at which the threshold warning fires
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold: f64,

    /// Days before a budget ends at which the expiry notice appears
    #[serde(default = "default_expiry_window_days")]
    pub expiry_window_days: i64,

    /// Whether the ledger offers atomic balance/goal adjustments; when off,
    /// every update takes the read-modify-write fallback
    #[serde(default = "default_atomic_updates")]
    pub atomic_updates: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_warning_threshold() -> f64 {
    0.8
}

fn default_expiry_window_days() -> i64 {
    7
}

fn default_atomic_updates() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            user_id: None,
            currency_symbol: default_currency(),
            warning_threshold: default_warning_threshold(),
            expiry_window_days: default_expiry_window_days(),
            atomic_updates: default_atomic_updates(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &WizardPaths) -> Result<Self, WizardError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                WizardError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                WizardError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &WizardPaths) -> Result<(), WizardError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            WizardError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            WizardError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert!(settings.user_id.is_none());
        assert_eq!(settings.warning_threshold, 0.8);
        assert_eq!(settings.expiry_window_days, 7);
        assert!(settings.atomic_updates);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        let user = UserId::new();
        settings.user_id = Some(user);
        settings.currency_symbol = "R$".into();
        settings.atomic_updates = false;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.user_id, Some(user));
        assert_eq!(loaded.currency_symbol, "R$");
        assert!(!loaded.atomic_updates);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"currency_symbol":"€"}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency_symbol, "€");
        assert_eq!(loaded.expiry_window_days, 7);
    }

    #[test]
    fn test_corrupt_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let paths = WizardPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "not json").unwrap();

        let err = Settings::load_or_create(&paths).unwrap_err();
        assert!(matches!(err, WizardError::Config(_)));
    }
}
