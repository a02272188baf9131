//! Session configuration.

use serde::{Deserialize, Serialize};

/// Settings of a [`Plate`](crate::Plate).
///
/// # Example
///
/// ```
/// use pancake::PlateConfig;
///
/// let config = PlateConfig::default()
///     .with_title("Greedy")
///     .with_default_page("Waffle")
///     .with_log_filter("warn,pancake_ui=debug");
///
/// assert_eq!(config.title, "Greedy");
/// assert!(!config.profiling);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlateConfig {
    /// Document title shown by the hosting page.
    pub title: String,
    /// `tracing` filter directive used by [`Plate::init_logging`](crate::Plate::init_logging).
    /// `None` falls back to `RUST_LOG`.
    pub log_filter: Option<String>,
    /// Start the puffin HTTP server in [`Plate::init_logging`](crate::Plate::init_logging).
    pub profiling: bool,
    /// Page shown first. `None` shows the first page added.
    pub default_page: Option<String>,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            title: "Pancake".to_string(),
            log_filter: None,
            profiling: false,
            default_page: None,
        }
    }
}

impl PlateConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_log_filter(mut self, directive: impl Into<String>) -> Self {
        self.log_filter = Some(directive.into());
        self
    }

    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profiling = enabled;
        self
    }

    pub fn with_default_page(mut self, name: impl Into<String>) -> Self {
        self.default_page = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: PlateConfig = serde_json::from_str(r#"{"profiling": true}"#).unwrap();
        assert!(config.profiling);
        assert_eq!(config.title, "Pancake");
        assert_eq!(config.default_page, None);
    }
}
