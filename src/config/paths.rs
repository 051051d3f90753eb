//! Path management for the wizard
//!
//! Provides XDG-compliant path resolution for configuration, ledger data,
//! the draft store, and the audit log.
//!
//! ## Path Resolution Order
//!
//! 1. `ENVELOPE_WIZARD_DATA_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/envelope-wizard` or `~/.config/envelope-wizard`
//! 3. Windows: `%APPDATA%\envelope-wizard`

use std::path::PathBuf;

use crate::error::WizardError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "ENVELOPE_WIZARD_DATA_DIR";

/// Manages all paths used by the wizard
#[derive(Debug, Clone)]
pub struct WizardPaths {
    base_dir: PathBuf,
}

impl WizardPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> Result<Self, WizardError> {
        let base_dir = if let Ok(custom) = std::env::var(DATA_DIR_ENV) {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create paths rooted at a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Ledger data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// In-progress wizard state
    pub fn drafts_file(&self) -> PathBuf {
        self.base_dir.join("drafts.json")
    }

    pub fn accounts_file(&self) -> PathBuf {
        self.data_dir().join("accounts.json")
    }

    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    pub fn categories_file(&self) -> PathBuf {
        self.data_dir().join("categories.json")
    }

    pub fn goals_file(&self) -> PathBuf {
        self.data_dir().join("goals.json")
    }

    pub fn transactions_file(&self) -> PathBuf {
        self.data_dir().join("transactions.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), WizardError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| WizardError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| WizardError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, WizardError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => {
            let home = std::env::var("HOME")
                .map_err(|_| WizardError::Config("HOME environment variable not set".into()))?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join("envelope-wizard"))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, WizardError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| WizardError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join("envelope-wizard"))
}
