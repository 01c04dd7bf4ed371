//! Printer settings document.
//!
//! Printer settings live in a single JSON file rather than the database. The
//! file is replaced wholesale on every save; a missing file reads as the
//! default settings.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use weigh_types::PrinterSettings;

use crate::error::{Error, Result};

/// File-backed store for [`PrinterSettings`].
#[derive(Debug, Clone)]
pub struct PrinterSettingsStore {
    path: PathBuf,
}

impl PrinterSettingsStore {
    /// Create a store backed by the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create a store at the default location.
    pub fn open_default() -> Self {
        Self::new(crate::default_printer_settings_path())
    }

    /// Path of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the settings, or the defaults if none were saved yet.
    pub fn load(&self) -> Result<PrinterSettings> {
        if !self.path.exists() {
            debug!("No printer settings at {}, using defaults", self.path.display());
            return Ok(PrinterSettings::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Replace the stored settings.
    pub fn save(&self, settings: &PrinterSettings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)?;

        info!(
            "Saved printer settings for '{}' to {}",
            settings.printer_name,
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use weigh_types::Margins;

    fn sample() -> PrinterSettings {
        PrinterSettings {
            printer_name: "X".to_string(),
            margins: Margins {
                top: 1.0,
                bottom: 2.0,
                left: 3.0,
                right: 4.0,
            },
        }
    }

    #[test]
    fn test_load_missing_returns_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PrinterSettingsStore::new(temp_dir.path().join("printer.json"));

        assert_eq!(store.load().unwrap(), PrinterSettings::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PrinterSettingsStore::new(temp_dir.path().join("nested").join("printer.json"));

        store.save(&sample()).unwrap();
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_save_overwrites_wholesale() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = PrinterSettingsStore::new(temp_dir.path().join("printer.json"));

        store.save(&sample()).unwrap();
        let replacement = PrinterSettings {
            printer_name: "Y".to_string(),
            margins: Margins::default(),
        };
        store.save(&replacement).unwrap();

        assert_eq!(store.load().unwrap(), replacement);
    }

    #[test]
    fn test_corrupt_document_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("printer.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = PrinterSettingsStore::new(&path);
        assert!(matches!(store.load(), Err(Error::Serialization(_))));
    }
}
