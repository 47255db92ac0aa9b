//! Runtime configuration, read once from the environment.
//!
//! | variable                     | values                 | default  |
//! |------------------------------|------------------------|----------|
//! | `OPTISTOCK_COMPLETION_RULE`  | `legacy` / `explicit`  | `legacy` |
//! | `OPTISTOCK_STRICT_COUNTS`    | `true` / `false`       | `false`  |
//! | `OPTISTOCK_UNIT_VALUE`       | whole euros            | `100`    |
//!
//! Invalid values fall back to the default with a warning.

use optistock_inventory::CompletionRule;

pub const COMPLETION_RULE_VAR: &str = "OPTISTOCK_COMPLETION_RULE";
pub const STRICT_COUNTS_VAR: &str = "OPTISTOCK_STRICT_COUNTS";
pub const UNIT_VALUE_VAR: &str = "OPTISTOCK_UNIT_VALUE";

/// Estimated value of one unit when no price is known.
pub const DEFAULT_UNIT_VALUE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountConfig {
    pub completion_rule: CompletionRule,
    /// Refuse unparsable or negative counts instead of coercing them to 0.
    pub strict_counts: bool,
    pub unit_value: u64,
}

impl Default for CountConfig {
    fn default() -> Self {
        Self {
            completion_rule: CompletionRule::Legacy,
            strict_counts: false,
            unit_value: DEFAULT_UNIT_VALUE,
        }
    }
}

impl CountConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let completion_rule = match lookup(COMPLETION_RULE_VAR) {
            None => defaults.completion_rule,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "legacy" => CompletionRule::Legacy,
                "explicit" | "explicit_count" => CompletionRule::ExplicitCount,
                other => {
                    tracing::warn!(value = other, "{COMPLETION_RULE_VAR} not recognized; using legacy");
                    defaults.completion_rule
                }
            },
        };

        let strict_counts = match lookup(STRICT_COUNTS_VAR) {
            None => defaults.strict_counts,
            Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    tracing::warn!(value = other, "{STRICT_COUNTS_VAR} not recognized; using false");
                    defaults.strict_counts
                }
            },
        };

        let unit_value = match lookup(UNIT_VALUE_VAR) {
            None => defaults.unit_value,
            Some(raw) => raw.trim().parse::<u64>().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "{UNIT_VALUE_VAR} not a whole number; using {DEFAULT_UNIT_VALUE}");
                defaults.unit_value
            }),
        };

        Self {
            completion_rule,
            strict_counts,
            unit_value,
        }
    }
}
