//! Application configuration loading and validation
//!
//! The page ships with an embedded `spatial.toml` holding the preset catalog,
//! the initial viewer settings and the embedded component settings.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::source::Source;

/// Configuration compiled into the page
pub const BUILTIN_CONFIG: &str = include_str!("../assets/spatial.toml");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Preset '{0}' has an empty url")]
    EmptyPresetUrl(String),
    #[error("Duplicate preset label: {0}")]
    DuplicatePreset(String),
    #[error("Initial preset '{0}' is not in the catalog")]
    UnknownInitialPreset(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSection,
    #[serde(default)]
    pub viewer: ViewerDefaults,
    #[serde(default)]
    pub component: ComponentSettings,
    #[serde(default, rename = "preset")]
    pub presets: Vec<Source>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSection {
    /// Max tracing level for the browser console
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Label of the preset selected on page load. Defaults to the first preset.
    #[serde(default)]
    pub initial_preset: Option<String>,
}

impl Default for AppSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            initial_preset: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Viewer settings applied when the page loads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerDefaults {
    #[serde(default = "default_ar_modes")]
    pub ar_modes: String,
    #[serde(default = "default_true")]
    pub camera_controls: bool,
    #[serde(default = "default_true")]
    pub auto_rotate: bool,
    #[serde(default = "default_one")]
    pub exposure: f64,
    #[serde(default = "default_one")]
    pub shadow_intensity: f64,
}

impl Default for ViewerDefaults {
    fn default() -> Self {
        Self {
            ar_modes: default_ar_modes(),
            camera_controls: true,
            auto_rotate: true,
            exposure: default_one(),
            shadow_intensity: default_one(),
        }
    }
}

fn default_ar_modes() -> String {
    "webxr scene-viewer quick-look".to_string()
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

/// Static attributes and script location of the embedded `<model-viewer>`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentSettings {
    /// ES module that defines the custom element
    #[serde(default = "default_script_url")]
    pub script_url: String,
    #[serde(default = "default_rotation_per_second")]
    pub rotation_per_second: String,
    /// Milliseconds of inactivity before the interaction prompt shows
    #[serde(default = "default_prompt_threshold")]
    pub interaction_prompt_threshold: u32,
    /// Poster image shown while the model loads
    #[serde(default)]
    pub poster: Option<String>,
}

impl Default for ComponentSettings {
    fn default() -> Self {
        Self {
            script_url: default_script_url(),
            rotation_per_second: default_rotation_per_second(),
            interaction_prompt_threshold: default_prompt_threshold(),
            poster: None,
        }
    }
}

fn default_script_url() -> String {
    "https://ajax.googleapis.com/ajax/libs/model-viewer/4.0.0/model-viewer.min.js".to_string()
}

fn default_rotation_per_second() -> String {
    "180deg".to_string()
}

fn default_prompt_threshold() -> u32 {
    2500
}

impl AppConfig {
    /// Parse and validate configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the embedded configuration, falling back to defaults if it is invalid
    pub fn builtin() -> Self {
        match Self::from_toml(BUILTIN_CONFIG) {
            Ok(config) => {
                tracing::info!(presets = config.presets.len(), "Loaded configuration");
                config
            }
            Err(e) => {
                tracing::warn!(error = %e, "Invalid embedded configuration, using defaults");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut labels = HashSet::new();
        for preset in &self.presets {
            if preset.url().trim().is_empty() {
                return Err(ConfigError::EmptyPresetUrl(preset.label().to_string()));
            }
            if !labels.insert(preset.label()) {
                return Err(ConfigError::DuplicatePreset(preset.label().to_string()));
            }
        }
        if let Some(initial) = &self.app.initial_preset {
            if !labels.contains(initial.as_str()) {
                return Err(ConfigError::UnknownInitialPreset(initial.clone()));
            }
        }
        Ok(())
    }

    /// Preset selected on page load
    pub fn initial_preset(&self) -> Option<&Source> {
        match &self.app.initial_preset {
            Some(label) => self.presets.iter().find(|p| p.label() == label),
            None => self.presets.first(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_parses() {
        let config = AppConfig::from_toml(BUILTIN_CONFIG).unwrap();
        let labels: Vec<_> = config.presets.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["Astronaut", "Vintage Camera", "Terrarium"]);
        assert_eq!(config.initial_preset().unwrap().label(), "Astronaut");
        assert_eq!(config.component.interaction_prompt_threshold, 2500);
        assert_eq!(config.component.rotation_per_second, "180deg");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert!(config.presets.is_empty());
        assert!(config.initial_preset().is_none());
        assert_eq!(config.viewer.ar_modes, "webxr scene-viewer quick-look");
        assert_eq!(config.app.log_level, "info");
        assert!(config.component.poster.is_none());
    }

    #[test]
    fn test_explicit_initial_preset() {
        let toml = r#"
[app]
initial_preset = "B"

[[preset]]
label = "A"
url = "a.glb"

[[preset]]
label = "B"
url = "b.glb"
ios_url = "b.usdz"
"#;
        let config = AppConfig::from_toml(toml).unwrap();
        let initial = config.initial_preset().unwrap();
        assert_eq!(initial.label(), "B");
        assert_eq!(initial.ios_url(), Some("b.usdz"));
    }

    #[test]
    fn test_rejects_duplicate_labels() {
        let toml = r#"
[[preset]]
label = "A"
url = "a.glb"

[[preset]]
label = "A"
url = "other.glb"
"#;
        assert!(matches!(
            AppConfig::from_toml(toml),
            Err(ConfigError::DuplicatePreset(label)) if label == "A"
        ));
    }

    #[test]
    fn test_rejects_empty_url() {
        let toml = r#"
[[preset]]
label = "Blank"
url = "  "
"#;
        assert!(matches!(
            AppConfig::from_toml(toml),
            Err(ConfigError::EmptyPresetUrl(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_initial_preset() {
        let toml = r#"
[app]
initial_preset = "Missing"
"#;
        assert!(matches!(
            AppConfig::from_toml(toml),
            Err(ConfigError::UnknownInitialPreset(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_toml("[viewer\nexposure = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
