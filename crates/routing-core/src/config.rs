//! Validator settings

use serde::{Deserialize, Serialize};

/// How many violations a validation run reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Stop at the first violation
    #[default]
    FailFast,
    /// Keep going and report every violation found
    Collect,
}

/// Settings for a validation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub error_mode: ErrorMode,
    /// Maximum expression nesting; `None` means unbounded
    pub max_expression_depth: Option<usize>,
}

impl ValidatorConfig {
    pub const fn new() -> Self {
        Self {
            error_mode: ErrorMode::FailFast,
            max_expression_depth: None,
        }
    }

    /// Report every violation instead of stopping at the first
    pub fn collect_all(mut self) -> Self {
        self.error_mode = ErrorMode::Collect;
        self
    }

    pub fn with_max_expression_depth(mut self, depth: usize) -> Self {
        self.max_expression_depth = Some(depth);
        self
    }

    pub fn is_fail_fast(&self) -> bool {
        self.error_mode == ErrorMode::FailFast
    }
}
