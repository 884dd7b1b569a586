//! Minimal INI-style configuration parser.
//!
//! Menu rules ship as small INI blobs: numbered sections ("0", "1", ...)
//! describing one potential menu entry each, plus a `type` section on
//! extension-table configs. The parser is intentionally tolerant: unknown
//! lines are skipped, duplicate keys within a section take the last value,
//! and lookups on missing sections or keys simply return `None`.
//!
//! ```text
//! [0]
//! menu=boot_iso
//! title=Boot ISO
//! [type]
//! boot=autoboot_iso
//! ```

use std::collections::HashMap;
use tracing::debug;

/// Parsed configuration handle supporting `(section, key)` lookups.
#[derive(Debug, Clone, Default)]
pub struct IniConfig {
    sections: HashMap<String, HashMap<String, String>>,
}

impl IniConfig {
    /// Parse an INI blob. Never fails: malformed lines are skipped.
    pub fn parse(input: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for raw in input.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_string();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                debug!(line = raw, "Skipping malformed config line");
                continue;
            };
            let Some(section) = &current else {
                debug!(line = raw, "Skipping key outside any section");
                continue;
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_string(), value.trim().to_string());
        }

        IniConfig { sections }
    }

    /// Look up a value by section and key.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)
            .and_then(|s| s.get(key))
            .map(String::as_str)
    }

    /// Whether the blob contained the named section at all.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_section_lookup() {
        let ini = IniConfig::parse("[0]\nmenu=boot_iso\ntitle=Boot ISO\n");
        assert_eq!(ini.get("0", "menu"), Some("boot_iso"));
        assert_eq!(ini.get("0", "title"), Some("Boot ISO"));
    }

    #[test]
    fn test_missing_section_and_key() {
        let ini = IniConfig::parse("[0]\nmenu=a\n");
        assert_eq!(ini.get("1", "menu"), None);
        assert_eq!(ini.get("0", "nope"), None);
    }

    #[test]
    fn test_numeric_string_sections_are_plain_names() {
        let ini = IniConfig::parse("[0]\nmenu=a\n[1]\nmenu=b\n[type]\nboot=c\n");
        assert_eq!(ini.get("1", "menu"), Some("b"));
        assert_eq!(ini.get("type", "boot"), Some("c"));
    }

    #[test]
    fn test_comments_and_blank_lines_skipped() {
        let ini = IniConfig::parse("# header\n\n[0]\n; note\nmenu=a\n");
        assert_eq!(ini.get("0", "menu"), Some("a"));
    }

    #[test]
    fn test_whitespace_trimmed_around_key_and_value() {
        let ini = IniConfig::parse("[0]\n  menu = boot_iso  \n");
        assert_eq!(ini.get("0", "menu"), Some("boot_iso"));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let ini = IniConfig::parse("[0]\nmenu=a\nmenu=b\n");
        assert_eq!(ini.get("0", "menu"), Some("b"));
    }

    #[test]
    fn test_malformed_lines_ignored() {
        let ini = IniConfig::parse("garbage\n[0]\nthis has no equals\nmenu=a\n");
        assert_eq!(ini.get("0", "menu"), Some("a"));
    }

    #[test]
    fn test_has_section() {
        let ini = IniConfig::parse("[0]\nmenu=a\n[empty]\n");
        assert!(ini.has_section("0"));
        assert!(ini.has_section("empty"));
        assert!(!ini.has_section("2"));
    }
}
