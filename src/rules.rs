//! Condition rule evaluation.
//!
//! A condition is a named boolean predicate. Evaluating it means sourcing
//! `(ROOT)/boot/grub/rules/<name>` through the script engine and reading the
//! sentinel variable the rule file is expected to set. The sentinel protocol
//! is part of the rule-file contract: a rule signals "true" by setting
//! `grubfm_test` to anything other than `"0"`.
//!
//! Callers never see the sentinel, but evaluation does leave it set in the
//! shared environment afterwards. That pollution is documented source
//! behavior, not an accident; rule files must not rely on its prior value.

use std::sync::Arc;

use tracing::debug;

use crate::script::{EnvStore, ScriptEngine};

/// Sentinel variable rule files write their verdict into.
pub const TEST_VARIABLE: &str = "grubfm_test";

/// Evaluates named condition rules against the shared environment.
pub struct RuleEvaluator {
    root: String,
    env: Arc<EnvStore>,
    engine: Arc<dyn ScriptEngine>,
}

impl RuleEvaluator {
    pub fn new(root: impl Into<String>, env: Arc<EnvStore>, engine: Arc<dyn ScriptEngine>) -> Self {
        Self {
            root: root.into(),
            env,
            engine,
        }
    }

    /// Run the named rule and report its verdict.
    ///
    /// Absent sentinel or the literal `"0"` means false; any other value,
    /// boolean-looking or not, means true.
    pub fn evaluate(&self, condition: &str) -> bool {
        let src = format!(
            "unset {}\nsource ({})/boot/grub/rules/{}\n",
            TEST_VARIABLE, self.root, condition
        );
        self.engine.execute_sourcecode(&src);
        let verdict = match self.env.get(TEST_VARIABLE) {
            None => false,
            Some(value) => value != "0",
        };
        debug!(condition, verdict, "rule evaluated");
        verdict
    }
}
