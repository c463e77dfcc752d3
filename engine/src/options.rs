//! Per-call configuration.

use serde::{Deserialize, Serialize};

/// Tag namespace used when none is configured.
pub const DEFAULT_TAG: &str = "json";

/// Options for [`diff_with`](crate::diff_with) and [`merge_with`](crate::merge_with).
///
/// Serializable so it can sit inside an application's own config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Tag namespace field keys are read from
    pub tag: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            tag: DEFAULT_TAG.to_string(),
        }
    }
}

impl Options {
    /// Create options with the default tag namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style method to read keys from another tag namespace.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    /// The tag namespace in effect. An empty tag falls back to [`DEFAULT_TAG`].
    pub fn effective_tag(&self) -> &str {
        if self.tag.is_empty() {
            DEFAULT_TAG
        } else {
            &self.tag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tag_is_json() {
        assert_eq!(Options::new().effective_tag(), "json");
        assert_eq!(Options::new().with_tag("db").effective_tag(), "db");
        assert_eq!(Options::new().with_tag("").effective_tag(), "json");
    }

    #[test]
    fn deserialize_with_defaults() {
        let options: Options = serde_json::from_str("{}").unwrap();
        assert_eq!(options, Options::default());

        let options: Options = serde_json::from_str(r#"{"tag": "yaml"}"#).unwrap();
        assert_eq!(options.tag, "yaml");
    }
}
