//! Comparison settings.
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides:
//!
//! ```toml
//! context_lines = 3
//! section_titles = "raw"
//! ```

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// How non-empty section titles are written into the `sectionTitle` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionTitlePolicy {
    /// Run the title through the same escaper as the line text.
    #[default]
    Escaped,
    /// Embed the title verbatim; the caller guarantees it is JSON-safe.
    Raw,
}

/// Configuration for the line-alignment engine and the renderers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Unchanged lines shown around each change
    pub context_lines: usize,
    /// Upper bound on `src_words * dst_words` for one word-level diff
    pub max_word_level_diff_complexity: usize,
    /// Move detection is skipped when either side has more candidate lines
    pub moved_paragraph_detection_cutoff: usize,
    /// Minimum word similarity for a deleted/added pair to count as a move
    pub move_similarity_threshold: f32,
    /// Minimum word similarity for an in-place pair to render as a word diff
    pub change_threshold: f32,
    /// Largest combined input accepted by a comparison
    pub max_input_bytes: usize,
    /// Section title escaping
    pub section_titles: SectionTitlePolicy,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            context_lines: 2,
            max_word_level_diff_complexity: 40_000_000,
            moved_paragraph_detection_cutoff: 100,
            move_similarity_threshold: 0.4,
            change_threshold: 0.2,
            max_input_bytes: 64 * 1024 * 1024,
            section_titles: SectionTitlePolicy::Escaped,
        }
    }
}

impl DiffConfig {
    /// Parses a TOML document. `origin` names the source in error messages.
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: DiffConfig =
            toml::from_str(content).map_err(|e| ConfigError::toml_error(origin, e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::read_error(path.display().to_string(), e))?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    /// Checks that the similarity thresholds are ratios.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("move_similarity_threshold", self.move_similarity_threshold),
            ("change_threshold", self.change_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::invalid(format!(
                    "{} must be within 0.0..=1.0, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiffConfig::default();
        assert_eq!(config.context_lines, 2);
        assert_eq!(config.max_word_level_diff_complexity, 40_000_000);
        assert_eq!(config.section_titles, SectionTitlePolicy::Escaped);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = DiffConfig::from_toml_str("context_lines = 5\n", "inline").unwrap();
        assert_eq!(config.context_lines, 5);
        assert_eq!(config.moved_paragraph_detection_cutoff, 100);
    }

    #[test]
    fn test_section_title_policy_from_toml() {
        let config = DiffConfig::from_toml_str("section_titles = \"raw\"\n", "inline").unwrap();
        assert_eq!(config.section_titles, SectionTitlePolicy::Raw);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = DiffConfig::from_toml_str("colour = true\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::TomlError { .. }));
    }

    #[test]
    fn test_threshold_out_of_range_rejected() {
        let err = DiffConfig::from_toml_str("change_threshold = 1.5\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        assert!(err.to_string().contains("change_threshold"));
    }
}
