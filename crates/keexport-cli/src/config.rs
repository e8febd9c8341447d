//! Configuration file handling.
//!
//! Reads from `~/.config/keexport/keexport.toml`

use anyhow::{Context, Result};
use keexport_core::{Label, Labels};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Label overrides as written in the config file's `[labels]` table,
/// keyed by label name (`user`, `created`, `exported_on`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelOverrides(BTreeMap<String, String>);

impl LabelOverrides {
    /// Apply the overrides on top of a built-in label table.
    pub fn apply(&self, mut labels: Labels) -> Labels {
        for (key, text) in &self.0 {
            match Label::from_key(key) {
                Some(label) => labels.set(label, text.clone()),
                None => tracing::warn!("Ignoring unknown label '{}' in config", key),
            }
        }
        labels
    }
}

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Render entry notes as markdown.
    #[serde(default = "default_use_markdown")]
    pub use_markdown: bool,
    /// Language for labels and dates. Taken from the environment when unset.
    #[serde(default)]
    pub language: Option<String>,
    /// Custom labels for the standard fields.
    #[serde(default)]
    pub labels: LabelOverrides,
}

fn default_use_markdown() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_markdown: default_use_markdown(),
            language: None,
            labels: LabelOverrides::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path and fail when it
    /// is missing. Otherwise use the default XDG location, creating a
    /// default file there on first run.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        match custom_path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::read(&path)
            }
            None => {
                let path = Self::config_path()?;
                if !path.exists() {
                    let config = Config::default();
                    config.save_to(&path)?;
                    tracing::info!("Created default config at {}", path.display());
                    return Ok(config);
                }
                Self::read(&path)
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Built-in labels for `language` with the config overrides applied.
    pub fn labels(&self, language: &str) -> Labels {
        self.labels.apply(Labels::for_language(language))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("keexport").join("keexport.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_use_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.use_markdown);
        assert!(config.language.is_none());
    }

    #[test]
    fn partial_label_override_keeps_other_labels() {
        let config: Config = toml::from_str(
            r#"
            use_markdown = false
            language = "de"

            [labels]
            user = "Login"
            "#,
        )
        .unwrap();

        assert!(!config.use_markdown);
        let labels = config.labels("de");
        assert_eq!(labels.user, "Login");
        assert_eq!(labels.password, "Passwort");
    }

    #[test]
    fn row_and_footer_labels_can_be_overridden() {
        let config: Config = toml::from_str(
            r#"
            [labels]
            created = "angelegt"
            exported_on = "Erzeugt am"
            colour = "blau"
            "#,
        )
        .unwrap();

        let labels = config.labels("de");
        assert_eq!(labels.created, "angelegt");
        assert_eq!(labels.exported_on, "Erzeugt am");
        assert_eq!(labels.modified, "geändert");
    }

    #[test]
    fn custom_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(missing)).is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("keexport.toml");

        let config = Config {
            use_markdown: false,
            language: Some("fr".into()),
            labels: LabelOverrides(BTreeMap::from([
                (Label::Notes.key().to_string(), "Remarques".to_string()),
                (Label::ExportedOn.key().to_string(), "Sauvegardé le".to_string()),
            ])),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load(Some(path)).unwrap();
        assert!(!loaded.use_markdown);
        assert_eq!(loaded.language.as_deref(), Some("fr"));
        assert_eq!(loaded.labels("fr").notes, "Remarques");
        assert_eq!(loaded.labels("fr").exported_on, "Sauvegardé le");
        assert_eq!(loaded.labels("fr").user, "utilisateur");
    }
}
