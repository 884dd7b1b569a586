//! Action resolution: path in, ordered menu out.
//!
//! `resolve` is the engine's entry point. It opens the file for metadata,
//! classifies it, optionally fires the type's auto-boot hook, then builds
//! the menu: a synthetic "Back" entry first, the type-specific sections
//! next, the global sections last. Open failures are swallowed; a browse
//! that cannot inspect the file still offers the way back.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::classify::{ExtensionTable, FileInfo};
use crate::error::{FmError, Result};
use crate::ini::IniConfig;
use crate::menu::{MenuEntry, Platform, SectionMenuBuilder};
use crate::rules::RuleEvaluator;
use crate::script::{EnvStore, ScriptEngine};
use crate::settings::Settings;
use crate::util::parent_dir;
use crate::vfs::{FileSource, OpenFlags};

/// Resolves a file path into an ordered action menu.
///
/// Constructed once at startup from the composition root; the global config
/// handle and extension table are set here and never mutated during
/// resolution.
pub struct ActionResolver {
    root: String,
    platform: Platform,
    auto_boot: bool,
    max_sections: usize,
    files: Arc<dyn FileSource>,
    table: Arc<ExtensionTable>,
    global_config: Arc<IniConfig>,
    engine: Arc<dyn ScriptEngine>,
    rules: RuleEvaluator,
}

impl ActionResolver {
    pub fn new(
        settings: &Settings,
        files: Arc<dyn FileSource>,
        table: Arc<ExtensionTable>,
        global_config: Arc<IniConfig>,
        env: Arc<EnvStore>,
        engine: Arc<dyn ScriptEngine>,
    ) -> Self {
        let rules = RuleEvaluator::new(settings.root.clone(), env, engine.clone());
        ActionResolver {
            root: settings.root.clone(),
            platform: settings.platform(),
            auto_boot: settings.auto_boot,
            max_sections: settings.max_sections,
            files,
            table,
            global_config,
            engine,
            rules,
        }
    }

    /// Build the ordered menu for `path`.
    ///
    /// The caller guarantees `path` contains a separator; a bare name is a
    /// precondition violation and yields [`FmError::InvalidPath`]. Every
    /// other failure degrades: an unopenable file produces just the back
    /// entry.
    #[instrument(skip(self))]
    pub fn resolve(&self, path: &str) -> Result<Vec<MenuEntry>> {
        let parent =
            parent_dir(path).ok_or_else(|| FmError::InvalidPath(path.to_string()))?;
        let mut entries = vec![MenuEntry::new(
            "Back",
            "go-previous",
            format!("grubfm \"{}/\"", parent),
        )];

        let Some(handle) = self
            .files
            .open(path, OpenFlags::GET_SIZE | OpenFlags::NO_DECOMPRESS)
        else {
            debug!(path, "open failed, back entry only");
            return Ok(entries);
        };

        let info = FileInfo::from_handle(handle.as_ref(), &self.table);
        debug!(name = %info.name, size = %info.size, ext = ?info.ext, "classified");

        if self.auto_boot {
            self.run_boot_hook(&info);
        }

        let builder = SectionMenuBuilder::new(&self.root, self.platform, &self.rules)
            .with_max_sections(self.max_sections);

        if let Some(ext) = info.ext {
            if let Some(entry) = self.table.entry(ext) {
                entries.extend(builder.build(&entry.config));
            }
        }
        entries.extend(builder.build(&self.global_config));

        info!(path, count = entries.len(), "menu resolved");
        Ok(entries)
    }

    /// Fire-and-forget `[type] boot` hook for classified files.
    fn run_boot_hook(&self, info: &FileInfo) {
        let Some(ext) = info.ext else {
            return;
        };
        let Some(boot) = self
            .table
            .entry(ext)
            .and_then(|e| e.config.get("type", "boot"))
        else {
            return;
        };
        let src = format!("source \"({})/boot/grub/rules/{}\"\n", self.root, boot);
        debug!(boot, "running auto-boot hook");
        self.engine.execute_sourcecode(&src);
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod tests;
