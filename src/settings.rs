//! Engine settings loaded from a JSON file.
//!
//! Every field has a default so a missing or partial settings file still
//! yields a working engine. Load failures fall back to defaults with a
//! warning; a present-but-broken file is surfaced to the binary as an error
//! so typos do not silently vanish.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{FmError, Result};
use crate::menu::{Platform, DEFAULT_MAX_SECTIONS};

/// Lines rendered per pager page.
pub const DEFAULT_PAGE_LINES: usize = 36;
/// Pager confirmation threshold.
pub const DEFAULT_LARGE_FILE_BYTES: u64 = 1024 * 1024;
/// Minimum viewport the pager will start on.
pub const DEFAULT_MIN_SCREEN_WIDTH: u32 = 1024;
pub const DEFAULT_MIN_SCREEN_HEIGHT: u32 = 768;

fn default_root() -> String {
    "hd0,1".to_string()
}

fn default_max_sections() -> usize {
    DEFAULT_MAX_SECTIONS
}

fn default_page_lines() -> usize {
    DEFAULT_PAGE_LINES
}

fn default_large_file_bytes() -> u64 {
    DEFAULT_LARGE_FILE_BYTES
}

fn default_min_width() -> u32 {
    DEFAULT_MIN_SCREEN_WIDTH
}

fn default_min_height() -> u32 {
    DEFAULT_MIN_SCREEN_HEIGHT
}

/// Pager geometry and thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagerSettings {
    #[serde(default = "default_page_lines")]
    pub page_lines: usize,
    #[serde(default = "default_large_file_bytes")]
    pub large_file_bytes: u64,
    #[serde(default = "default_min_width")]
    pub min_width: u32,
    #[serde(default = "default_min_height")]
    pub min_height: u32,
}

impl Default for PagerSettings {
    fn default() -> Self {
        PagerSettings {
            page_lines: DEFAULT_PAGE_LINES,
            large_file_bytes: DEFAULT_LARGE_FILE_BYTES,
            min_width: DEFAULT_MIN_SCREEN_WIDTH,
            min_height: DEFAULT_MIN_SCREEN_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Device label the rule paths are rooted at, e.g. `hd0,1`.
    #[serde(default = "default_root")]
    pub root: String,
    /// When set, a classified file's `[type] boot` script runs automatically
    /// during resolution.
    #[serde(default)]
    pub auto_boot: bool,
    /// Section-iteration cap for the menu builder.
    #[serde(default = "default_max_sections")]
    pub max_sections: usize,
    /// Platform override ("efi" / "bios"); absent means unknown platform.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub pager: PagerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            root: default_root(),
            auto_boot: false,
            max_sections: DEFAULT_MAX_SECTIONS,
            platform: None,
            pager: PagerSettings::default(),
        }
    }
}

impl Settings {
    /// Resolved platform tag for the menu builder.
    pub fn platform(&self) -> Platform {
        self.platform
            .as_deref()
            .map(Platform::from_label)
            .unwrap_or(Platform::Unknown)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Settings> {
        let text = std::fs::read_to_string(path).map_err(|source| FmError::SettingsRead {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&text)?;
        info!(path = %path.display(), root = %settings.root, "Settings loaded");
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is absent.
    /// A file that exists but does not parse is still an error.
    pub fn load_or_default(path: &Path) -> Result<Settings> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "No settings file, using defaults");
            Ok(Settings::default())
        }
    }

    /// Default settings file location (~/.bootfm/settings.json).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".bootfm").join("settings.json"))
            .unwrap_or_else(|| PathBuf::from("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.root, "hd0,1");
        assert!(!s.auto_boot);
        assert_eq!(s.max_sections, 100);
        assert_eq!(s.platform(), Platform::Unknown);
        assert_eq!(s.pager.page_lines, 36);
        assert_eq!(s.pager.large_file_bytes, 1024 * 1024);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let mut f = std::fs::File::create(&path).unwrap();
        write!(f, r#"{{"root":"hd1,2","platform":"efi"}}"#).unwrap();

        let s = Settings::load(&path).unwrap();
        assert_eq!(s.root, "hd1,2");
        assert_eq!(s.platform(), Platform::Efi);
        assert_eq!(s.max_sections, 100);
        assert_eq!(s.pager.min_width, 1024);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let s = Settings::load_or_default(&dir.path().join("absent.json")).unwrap();
        assert_eq!(s.root, "hd0,1");
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(Settings::load_or_default(&path).is_err());
    }

    #[test]
    fn test_platform_labels() {
        assert_eq!(Platform::from_label("efi"), Platform::Efi);
        assert_eq!(Platform::from_label("bios"), Platform::Bios);
        assert_eq!(Platform::from_label("mips"), Platform::Unknown);
    }
}
