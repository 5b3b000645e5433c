//! Compiler configuration.

use serde::Deserialize;

/// Default limit on plan nesting.
pub const DEFAULT_MAX_PLAN_DEPTH: usize = 256;

/// Plan compiler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether selections may push conditions into table scans.
    pub enable_pushdown: bool,

    /// Deepest plan the compiler will recurse into.
    pub max_plan_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_pushdown: true,
            max_plan_depth: DEFAULT_MAX_PLAN_DEPTH,
        }
    }
}

impl Config {
    /// Enables or disables predicate push-down.
    #[must_use]
    pub fn with_pushdown(mut self, enabled: bool) -> Self {
        self.enable_pushdown = enabled;
        self
    }

    /// Sets the maximum plan depth.
    #[must_use]
    pub fn with_max_plan_depth(mut self, depth: usize) -> Self {
        self.max_plan_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.enable_pushdown);
        assert_eq!(config.max_plan_depth, DEFAULT_MAX_PLAN_DEPTH);
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"enable_pushdown": false}"#).unwrap();
        assert_eq!(config, Config::default().with_pushdown(false));
    }
}
