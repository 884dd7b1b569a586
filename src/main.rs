//! bootfm CLI.
//!
//! `resolve <path>` prints the action menu the engine builds for a file;
//! `cat <path>` views it in the pager. A directory passed with `--root-dir`
//! is mounted as the settings' root device label so `(label)/...` rule
//! paths resolve against it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

use bootfm::classify::ExtensionTable;
use bootfm::ini::IniConfig;
use bootfm::logging;
use bootfm::pager::TextPager;
use bootfm::resolver::ActionResolver;
use bootfm::screen::StdioScreen;
use bootfm::script::{EnvStore, RuleScriptEngine};
use bootfm::settings::Settings;
use bootfm::vfs::{DiskFileSource, FileSource};

#[derive(Parser)]
#[command(name = "bootfm", about = "Rule-driven file-action menu engine")]
struct Cli {
    /// Settings file (defaults to ~/.bootfm/settings.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory to mount as the root device label
    #[arg(long)]
    root_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a file path into its action menu and print it
    Resolve { path: String },
    /// View a text file in the pager
    Cat { path: String },
}

fn main() -> Result<()> {
    let _guard = logging::init();
    let cli = Cli::parse();

    let settings = Settings::load_or_default(
        &cli.config.clone().unwrap_or_else(Settings::default_path),
    )?;

    let mut disk = DiskFileSource::new();
    if let Some(dir) = &cli.root_dir {
        disk.mount(settings.root.clone(), dir.clone());
    }
    let files: Arc<dyn FileSource> = Arc::new(disk);

    match cli.command {
        Command::Resolve { path } => {
            let env = Arc::new(EnvStore::new());
            let engine = Arc::new(RuleScriptEngine::new(env.clone(), files.clone()));
            let table = Arc::new(load_extension_table(files.as_ref(), &settings));
            let global = Arc::new(load_global_config(files.as_ref(), &settings));

            let resolver =
                ActionResolver::new(&settings, files, table, global, env, engine);
            let entries = resolver.resolve(&path)?;
            for entry in &entries {
                let hotkey = entry.hotkey.as_deref().unwrap_or(" ");
                let hidden = if entry.hidden { " (hidden)" } else { "" };
                println!(
                    "[{}] {:<12} {:<24} {}{}",
                    hotkey, entry.icon, entry.title, entry.command, hidden
                );
            }
        }
        Command::Cat { path } => {
            let mut screen =
                StdioScreen::new(settings.pager.min_width, settings.pager.min_height);
            TextPager::new(settings.pager.clone()).view(files.as_ref(), &path, &mut screen);
        }
    }
    Ok(())
}

/// Load the global rule config, `(ROOT)/boot/grub/grubfm.ini`. Absence is
/// fine: resolution then only ever yields type-specific entries.
fn load_global_config(files: &dyn FileSource, settings: &Settings) -> IniConfig {
    let path = format!("({})/boot/grub/grubfm.ini", settings.root);
    match files.read_to_string(&path) {
        Some(blob) => IniConfig::parse(&blob),
        None => {
            warn!(path, "no global config found");
            IniConfig::default()
        }
    }
}

/// Build the extension table from `(ROOT)/boot/grub/types.ini`, an index
/// whose numbered sections carry `ext`, `icon`, and a `config` path to the
/// type's own rule file.
fn load_extension_table(files: &dyn FileSource, settings: &Settings) -> ExtensionTable {
    let mut table = ExtensionTable::new();
    let index_path = format!("({})/boot/grub/types.ini", settings.root);
    let Some(blob) = files.read_to_string(&index_path) else {
        warn!(path = index_path, "no extension table found");
        return table;
    };
    let index = IniConfig::parse(&blob);
    for i in 0..settings.max_sections {
        let num = i.to_string();
        let Some(ext) = index.get(&num, "ext") else {
            break;
        };
        let icon = index.get(&num, "icon").unwrap_or("file").to_string();
        let config = index
            .get(&num, "config")
            .and_then(|p| files.read_to_string(&format!("({})/{}", settings.root, p)))
            .map(|b| IniConfig::parse(&b))
            .unwrap_or_default();
        table.add(ext.to_string(), config, icon);
    }
    table
}
