//! bootfm - rule-driven file-action resolution and menu construction.
//!
//! Given a filesystem path, the engine classifies the file by extension,
//! walks layered rule configs to find the actions that apply, filters them
//! through scripted conditions, and produces an ordered, navigable menu.
//! A paginated text viewer covers the one action with real state of its own.

pub mod classify;
pub mod error;
pub mod ini;
pub mod logging;
pub mod menu;
pub mod pager;
pub mod resolver;
pub mod rules;
pub mod screen;
pub mod script;
pub mod settings;
pub mod util;
pub mod vfs;
