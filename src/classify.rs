//! File type classification.
//!
//! The extension table maps file-name suffixes to a type-specific rule
//! config and an icon. It is populated once at startup and never mutated
//! during resolution. Classification is a plain suffix match, first entry
//! wins; "no match" is a normal outcome, not an error.

use crate::ini::IniConfig;
use crate::util::human_size;
use crate::vfs::FileHandle;

/// Icon used when no extension entry matches.
pub const DEFAULT_ICON: &str = "file";

/// One extension-table row: a suffix pattern, the parsed rule config for
/// that type, and its display icon.
#[derive(Debug, Clone)]
pub struct ExtensionEntry {
    pub pattern: String,
    pub config: IniConfig,
    pub icon: String,
}

/// Ordered suffix-match classifier. Owned for the process lifetime.
#[derive(Debug, Clone, Default)]
pub struct ExtensionTable {
    entries: Vec<ExtensionEntry>,
}

impl ExtensionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        pattern: impl Into<String>,
        config: IniConfig,
        icon: impl Into<String>,
    ) {
        self.entries.push(ExtensionEntry {
            pattern: pattern.into(),
            config,
            icon: icon.into(),
        });
    }

    pub fn entry(&self, index: usize) -> Option<&ExtensionEntry> {
        self.entries.get(index)
    }

    /// Index of the first entry whose pattern is a suffix of `name`.
    pub fn classify(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| name.ends_with(&e.pattern))
    }
}

/// Metadata snapshot for one opened file, created per resolution and
/// discarded when it returns.
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    /// Human-readable size, e.g. `1.5M`.
    pub size: String,
    /// Extension-table index; `None` means unclassified.
    pub ext: Option<usize>,
    pub icon: String,
}

impl FileInfo {
    /// Build from an open handle plus the classifier.
    pub fn from_handle(handle: &dyn FileHandle, table: &ExtensionTable) -> Self {
        let name = handle.name().to_string();
        let ext = table.classify(&name);
        let icon = ext
            .and_then(|i| table.entry(i))
            .map(|e| e.icon.clone())
            .unwrap_or_else(|| DEFAULT_ICON.to_string());
        FileInfo {
            size: human_size(handle.size()),
            name,
            ext,
            icon,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::{FileSource, MemFileSource, OpenFlags};

    fn table() -> ExtensionTable {
        let mut t = ExtensionTable::new();
        t.add(".iso", IniConfig::parse("[0]\nmenu=boot_iso\n"), "optical");
        t.add(".img", IniConfig::parse("[0]\nmenu=boot_img\n"), "disk");
        t.add(".tar.gz", IniConfig::parse("[0]\nmenu=extract\n"), "archive");
        t
    }

    #[test]
    fn test_suffix_match() {
        let t = table();
        assert_eq!(t.classify("ubuntu.iso"), Some(0));
        assert_eq!(t.classify("rescue.img"), Some(1));
        assert_eq!(t.classify("bundle.tar.gz"), Some(2));
    }

    #[test]
    fn test_no_match_is_unclassified() {
        let t = table();
        assert_eq!(t.classify("notes.txt"), None);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let t = table();
        assert_eq!(t.classify("UBUNTU.ISO"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let mut t = ExtensionTable::new();
        t.add(".gz", IniConfig::default(), "first");
        t.add(".tar.gz", IniConfig::default(), "second");
        assert_eq!(t.classify("x.tar.gz"), Some(0));
    }

    #[test]
    fn test_file_info_from_handle() {
        let mut files = MemFileSource::new();
        files.insert("/a/b/ubuntu.iso", vec![0u8; 2048]);
        let src = files;
        let handle = src.open("/a/b/ubuntu.iso", OpenFlags::GET_SIZE).unwrap();

        let info = FileInfo::from_handle(handle.as_ref(), &table());
        assert_eq!(info.name, "ubuntu.iso");
        assert_eq!(info.size, "2.0K");
        assert_eq!(info.ext, Some(0));
        assert_eq!(info.icon, "optical");
    }

    #[test]
    fn test_file_info_unclassified_gets_default_icon() {
        let mut files = MemFileSource::new();
        files.insert("/readme.md", "hi");
        let handle = files.open("/readme.md", OpenFlags::GET_SIZE).unwrap();

        let info = FileInfo::from_handle(handle.as_ref(), &table());
        assert_eq!(info.ext, None);
        assert_eq!(info.icon, DEFAULT_ICON);
    }
}
