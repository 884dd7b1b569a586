//! Scripting seam: shared environment store plus a tiny script interpreter.
//!
//! Rule files and auto-boot hooks are executed through [`ScriptEngine`].
//! The engine bundled here, [`RuleScriptEngine`], understands exactly the
//! handful of statements rule files actually use:
//!
//! - `set NAME=VALUE`
//! - `unset NAME`
//! - `source <path>` (reads the file through the VFS and runs it)
//!
//! Anything else is ignored, matching the best-effort policy of the rest of
//! the engine. Scripts communicate results back through the environment
//! store; the condition protocol in [`crate::rules`] is built on exactly
//! that.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::vfs::FileSource;

/// Process-wide environment variable store.
///
/// Single logical thread of control in practice; the mutex is what makes the
/// sentinel-variable protocol safe to port to a concurrent embedding later.
#[derive(Debug, Default)]
pub struct EnvStore {
    vars: Mutex<HashMap<String, String>>,
}

impl EnvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.vars.lock().get(name).cloned()
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.lock().insert(name.into(), value.into());
    }

    pub fn unset(&self, name: &str) {
        self.vars.lock().remove(name);
    }
}

/// Executes a short script fragment against the shared environment.
pub trait ScriptEngine {
    /// Fire-and-forget execution: failures inside the script are not
    /// reported, only whatever it left in the environment is observable.
    fn execute_sourcecode(&self, src: &str);
}

/// Nested `source` depth limit; rule files do not legitimately nest deeper.
const MAX_SOURCE_DEPTH: usize = 8;

/// The minimal line interpreter used for rule files and boot hooks.
pub struct RuleScriptEngine {
    env: Arc<EnvStore>,
    files: Arc<dyn FileSource>,
}

impl RuleScriptEngine {
    pub fn new(env: Arc<EnvStore>, files: Arc<dyn FileSource>) -> Self {
        Self { env, files }
    }

    fn run(&self, src: &str, depth: usize) {
        for raw in src.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(rest) = line.strip_prefix("set ") {
                if let Some((name, value)) = rest.split_once('=') {
                    trace!(name = name.trim(), "set");
                    self.env.set(name.trim(), value.trim());
                }
                continue;
            }
            if let Some(name) = line.strip_prefix("unset ") {
                self.env.unset(name.trim());
                continue;
            }
            if let Some(path) = line.strip_prefix("source ") {
                let path = path.trim().trim_matches('"');
                if depth >= MAX_SOURCE_DEPTH {
                    debug!(path, "source nesting too deep, skipping");
                    continue;
                }
                match self.files.read_to_string(path) {
                    Some(body) => self.run(&body, depth + 1),
                    None => debug!(path, "source target not found"),
                }
                continue;
            }
            trace!(line, "ignoring unknown statement");
        }
    }
}

impl ScriptEngine for RuleScriptEngine {
    fn execute_sourcecode(&self, src: &str) {
        self.run(src, 0);
    }
}
