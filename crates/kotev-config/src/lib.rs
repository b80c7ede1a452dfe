//! Configuration management for Kotev.
//!
//! Parses `kotev.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [render]
//! italic_lang = "he"
//! smart_punctuation = true
//! max_depth = 8
//! orphan_attributes = "parent"   # or "drop"
//! ```

use std::path::{Path, PathBuf};

use kotev_renderer::{OrphanPolicy, RenderOptions};
use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the language of `/italic/` text.
    pub italic_lang: Option<String>,
    /// Override smart punctuation.
    pub smart_punctuation: Option<bool>,
    /// Override the nesting limit for `markdown`-flagged elements.
    pub max_depth: Option<usize>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "kotev.toml";

/// Highest accepted `render.max_depth`.
const MAX_DEPTH_LIMIT: usize = 64;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// `lang` attribute of `/italic/` text.
    pub italic_lang: String,
    /// Whether quotes, dashes and ellipses are made typographic.
    pub smart_punctuation: bool,
    /// Deepest nesting of `markdown`-flagged elements that is rendered.
    pub max_depth: usize,
    /// Where attributes of a marker with nothing after it go.
    pub orphan_attributes: OrphanPolicy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        let options = RenderOptions::default();
        Self {
            italic_lang: options.italic_lang,
            smart_punctuation: options.smart_punctuation,
            max_depth: options.max_depth,
            orphan_attributes: options.orphan_policy,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `kotev.toml` in current directory and parents,
    /// falling back to defaults.
    ///
    /// CLI settings are applied after loading and take precedence over config
    /// file values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails or
    /// a value is out of range.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed or validated.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(lang) = &settings.italic_lang {
            self.render.italic_lang.clone_from(lang);
        }
        if let Some(smart_punctuation) = settings.smart_punctuation {
            self.render.smart_punctuation = smart_punctuation;
        }
        if let Some(max_depth) = settings.max_depth {
            self.render.max_depth = max_depth;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        discover_from(&cwd)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_render()
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let lang = &self.render.italic_lang;
        if lang.is_empty() {
            return Err(ConfigError::Validation(
                "render.italic_lang cannot be empty".to_owned(),
            ));
        }
        if !is_language_tag(lang) {
            return Err(ConfigError::Validation(format!(
                "render.italic_lang is not a language tag: {lang}"
            )));
        }

        let depth = self.render.max_depth;
        if depth == 0 {
            return Err(ConfigError::Validation(
                "render.max_depth must be greater than 0".to_owned(),
            ));
        }
        if depth > MAX_DEPTH_LIMIT {
            return Err(ConfigError::Validation(format!(
                "render.max_depth cannot exceed {MAX_DEPTH_LIMIT}"
            )));
        }

        Ok(())
    }

    /// Renderer options for this configuration.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default()
            .with_italic_lang(self.render.italic_lang.clone())
            .with_smart_punctuation(self.render.smart_punctuation)
            .with_max_depth(self.render.max_depth)
            .with_orphan_policy(self.render.orphan_attributes)
    }
}

/// Search for the config file in `start` and its parents.
fn discover_from(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILENAME);
        if candidate.exists() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Letters, optionally followed by `-` separated letter or digit subtags.
fn is_language_tag(value: &str) -> bool {
    let mut parts = value.split('-');
    let primary = parts.next().unwrap_or_default();
    !primary.is_empty()
        && primary.chars().all(|c| c.is_ascii_alphabetic())
        && parts.all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.render.italic_lang, "he");
        assert!(config.render.smart_punctuation);
        assert_eq!(config.render.max_depth, 8);
        assert_eq!(config.render.orphan_attributes, OrphanPolicy::Parent);
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.render.italic_lang, "he");
        assert_eq!(config.render.max_depth, 8);
    }

    #[test]
    fn test_parse_render_config() {
        let toml = r#"
[render]
italic_lang = "yi"
smart_punctuation = false
max_depth = 3
orphan_attributes = "drop"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.italic_lang, "yi");
        assert!(!config.render.smart_punctuation);
        assert_eq!(config.render.max_depth, 3);
        assert_eq!(config.render.orphan_attributes, OrphanPolicy::Drop);
    }

    #[test]
    fn test_parse_partial_render_config() {
        let toml = r"
[render]
max_depth = 2
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.render.max_depth, 2);
        assert_eq!(config.render.italic_lang, "he");
        assert!(config.render.smart_punctuation);
    }

    #[test]
    fn test_parse_unknown_orphan_policy_fails() {
        let toml = r#"
[render]
orphan_attributes = "sibling"
"#;
        assert!(toml::from_str::<Config>(toml).is_err());
    }

    #[test]
    fn test_render_options() {
        let mut config = Config::default();
        config.render.italic_lang = "ar".to_owned();
        config.render.orphan_attributes = OrphanPolicy::Drop;

        let options = config.render_options();
        assert_eq!(options.italic_lang, "ar");
        assert_eq!(options.orphan_policy, OrphanPolicy::Drop);
        assert_eq!(options.max_depth, 8);
        assert!(options.smart_punctuation);
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings {
            italic_lang: Some("arc".to_owned()),
            smart_punctuation: Some(false),
            max_depth: Some(4),
        });
        assert_eq!(config.render.italic_lang, "arc");
        assert!(!config.render.smart_punctuation);
        assert_eq!(config.render.max_depth, 4);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.render.italic_lang, "he");
        assert!(config.render.smart_punctuation);
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_italic_lang() {
        let mut config = Config::default();
        config.render.italic_lang = String::new();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.render.italic_lang = "he il".to_owned();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.render.italic_lang = "he-IL".to_owned();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_depth() {
        let mut config = Config::default();
        config.render.max_depth = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));

        config.render.max_depth = MAX_DEPTH_LIMIT + 1;
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: render.max_depth cannot exceed 64");

        config.render.max_depth = MAX_DEPTH_LIMIT;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render]\nitalic_lang = \"yi\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.render.italic_lang, "yi");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render]\nmax_depth = 100\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path), None),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_load_cli_settings_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "[render]\nsmart_punctuation = true\nmax_depth = 2\n").unwrap();

        let settings = CliSettings {
            smart_punctuation: Some(false),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&settings)).unwrap();
        assert!(!config.render.smart_punctuation);
        assert_eq!(config.render.max_depth, 2);
    }

    #[test]
    fn test_load_validates_cli_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        let settings = CliSettings {
            max_depth: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            Config::load(Some(&path), Some(&settings)),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_discover_in_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("notes").join("2024");
        fs::create_dir_all(&nested).unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "").unwrap();

        assert_eq!(discover_from(&nested), Some(path.clone()));
        assert_eq!(discover_from(dir.path()), Some(path));
    }

    #[test]
    fn test_discover_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("book");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let near = nested.join(CONFIG_FILENAME);
        fs::write(&near, "").unwrap();

        assert_eq!(discover_from(&nested), Some(near));
    }
}
