//! Menu entries and the section walker that produces them.
//!
//! Rule configs describe menu entries in numbered sections "0", "1", ...;
//! the walker visits them strictly in order, applies the platform and
//! condition filters, and emits one [`MenuEntry`] per surviving section.
//! The first section without a `menu` key terminates the walk. Sparse
//! numbering is unsupported by design: a gap hides every later section,
//! and that compatibility behavior is load-bearing for existing rule packs.

use tracing::{debug, trace};

use crate::ini::IniConfig;
use crate::rules::RuleEvaluator;

/// Default section-iteration cap. A bounded-iteration safety limit, not a
/// semantic one; configurable through [`crate::settings::Settings`].
pub const DEFAULT_MAX_SECTIONS: usize = 100;

/// A user-selectable row handed to the menu surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub title: String,
    pub icon: String,
    /// Hotkey hint, carried verbatim from the section data.
    pub hotkey: Option<String>,
    /// Action command in the `cmd "arg"` wire convention.
    pub command: String,
    pub hidden: bool,
}

impl MenuEntry {
    pub fn new(
        title: impl Into<String>,
        icon: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        MenuEntry {
            title: title.into(),
            icon: icon.into(),
            hotkey: None,
            command: command.into(),
            hidden: false,
        }
    }

    pub fn with_hotkey(mut self, hotkey: impl Into<String>) -> Self {
        self.hotkey = Some(hotkey.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// Platform class the engine runs on, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Efi,
    Bios,
    Unknown,
}

impl Platform {
    /// One-character tag matched against a section's `enable` value.
    pub fn tag(self) -> char {
        match self {
            Platform::Efi => 'e',
            Platform::Bios => 'b',
            Platform::Unknown => 'u',
        }
    }

    /// Parse a settings/CLI value. Unrecognized input maps to `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "efi" => Platform::Efi,
            "bios" => Platform::Bios,
            _ => Platform::Unknown,
        }
    }
}

/// Walks numbered config sections and emits menu entries.
pub struct SectionMenuBuilder<'a> {
    root: &'a str,
    platform: Platform,
    rules: &'a RuleEvaluator,
    max_sections: usize,
}

impl<'a> SectionMenuBuilder<'a> {
    pub fn new(root: &'a str, platform: Platform, rules: &'a RuleEvaluator) -> Self {
        Self {
            root,
            platform,
            rules,
            max_sections: DEFAULT_MAX_SECTIONS,
        }
    }

    pub fn with_max_sections(mut self, max_sections: usize) -> Self {
        self.max_sections = max_sections;
        self
    }

    /// Emit entries for every surviving section, in ascending section order.
    pub fn build(&self, ini: &IniConfig) -> Vec<MenuEntry> {
        let mut entries = Vec::new();
        for i in 0..self.max_sections {
            let num = i.to_string();

            // The first section without a menu key terminates the walk.
            let Some(script) = ini.get(&num, "menu") else {
                break;
            };

            // enable = all | efi | bios; compared by first character.
            if let Some(enable) = ini.get(&num, "enable") {
                let first = enable.chars().next();
                if first != Some('a') && first != Some(self.platform.tag()) {
                    trace!(section = %num, enable, "section disabled for platform");
                    continue;
                }
            }

            if let Some(condition) = ini.get(&num, "condition") {
                if !self.rules.evaluate(condition) {
                    trace!(section = %num, condition, "condition rejected section");
                    continue;
                }
            }

            let icon = ini.get(&num, "icon").unwrap_or("file");
            let title = ini.get(&num, "title").unwrap_or("MENU");
            let command = format!(
                "configfile \"({})/boot/grub/rules/{}\"",
                self.root, script
            );

            let mut entry = MenuEntry::new(title, icon, command)
                .with_hidden(ini.get(&num, "hidden").is_some());
            if let Some(hotkey) = ini.get(&num, "hotkey") {
                entry = entry.with_hotkey(hotkey);
            }
            entries.push(entry);
        }
        debug!(count = entries.len(), "section walk complete");
        entries
    }
}
