//! Configuration loader
//!
//! `defaults/jsonfold.default.toml` is embedded into the binary so the
//! documented defaults and runtime behavior stay in sync. Callers layer user
//! files and single-key overrides on top via [`Loader`] before deserializing
//! into [`JsonfoldConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

use crate::grammar::DEFAULT_MAX_DEPTH;

const DEFAULT_TOML: &str = include_str!("../defaults/jsonfold.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct JsonfoldConfig {
    pub parser: ParserConfig,
    pub writer: WriterConfig,
}

/// Knobs for [`crate::json::JsonParser`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    pub entry_rule: String,
    pub max_depth: usize,
    pub unquoted_keys: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            entry_rule: "Object".to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            unquoted_keys: true,
        }
    }
}

/// Knobs for [`crate::writer::Writer`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WriterConfig {
    pub compacted: bool,
    pub indent: String,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            compacted: false,
            indent: "  ".to_string(),
        }
    }
}

/// Builds a [`JsonfoldConfig`] from the embedded defaults, TOML files and
/// single-key overrides, later layers winning.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file that must exist.
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a TOML file, skipping it when absent.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Shorthand for overriding `parser.entry_rule`
    pub fn entry_rule(self, rule: &str) -> Result<Self, ConfigError> {
        self.set_override("parser.entry_rule", rule)
    }

    /// Shorthand for overriding `writer.compacted`
    pub fn compacted(self, compacted: bool) -> Result<Self, ConfigError> {
        self.set_override("writer.compacted", compacted)
    }

    /// Deserialize the layers and check values serde cannot.
    pub fn build(self) -> Result<JsonfoldConfig, ConfigError> {
        let config: JsonfoldConfig = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonfoldConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.parser.max_depth == 0 {
            return Err(ConfigError::Message(
                "parser.max_depth must be at least 1".to_string(),
            ));
        }
        if self.parser.entry_rule.is_empty() {
            return Err(ConfigError::Message(
                "parser.entry_rule must name a rule".to_string(),
            ));
        }
        if !self.writer.indent.chars().all(|c| c == ' ' || c == '\t') {
            return Err(ConfigError::Message(format!(
                "writer.indent must be spaces or tabs, got {:?}",
                self.writer.indent
            )));
        }
        Ok(())
    }
}

pub fn load_defaults() -> Result<JsonfoldConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_match_default_impls() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config, JsonfoldConfig::default());
    }

    #[test]
    fn test_override_single_key() {
        let config = Loader::new()
            .compacted(true)
            .expect("override to apply")
            .entry_rule("Array")
            .expect("override to apply")
            .build()
            .expect("config to build");

        assert!(config.writer.compacted);
        assert_eq!(config.parser.entry_rule, "Array");
        assert_eq!(config.parser.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_user_file_is_layered() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[parser]\nunquoted_keys = false\nmax_depth = 8").expect("write");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");

        assert!(!config.parser.unquoted_keys);
        assert_eq!(config.parser.max_depth, 8);
        assert_eq!(config.parser.entry_rule, "Object");
        assert_eq!(config.writer.indent, "  ");
    }

    #[test]
    fn test_generic_override() {
        let config = Loader::new()
            .set_override("writer.indent", "\t")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.writer.indent, "\t");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let zero_depth = Loader::new().set_override("parser.max_depth", 0i64).unwrap().build();
        assert!(zero_depth.unwrap_err().to_string().contains("parser.max_depth"));

        let bad_indent = Loader::new().set_override("writer.indent", "->").unwrap().build();
        assert!(bad_indent.unwrap_err().to_string().contains("writer.indent"));

        let no_entry = Loader::new().entry_rule("").unwrap().build();
        assert!(no_entry.is_err());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/nonexistent/jsonfold.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/jsonfold.toml")
            .build()
            .expect("config to build");
        assert_eq!(config, JsonfoldConfig::default());
    }
}
