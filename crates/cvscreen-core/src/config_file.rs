use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub model: Option<ModelConfig>,
    pub screening: Option<ScreeningConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the pipeline artifact (JSON).
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Seed for comment randomization. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/cvscreen/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cvscreen").join("config.toml"))
}

/// Load config by cascading CWD `.cvscreen.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".cvscreen.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        model: Some(ModelConfig {
            path: overlay
                .model
                .as_ref()
                .and_then(|m| m.path.clone())
                .or_else(|| base.model.as_ref().and_then(|m| m.path.clone())),
        }),
        screening: Some(ScreeningConfig {
            seed: overlay
                .screening
                .as_ref()
                .and_then(|s| s.seed)
                .or_else(|| base.screening.as_ref().and_then(|s| s.seed)),
        }),
        display: Some(DisplayConfig {
            color: overlay
                .display
                .as_ref()
                .and_then(|d| d.color)
                .or_else(|| base.display.as_ref().and_then(|d| d.color)),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_path_round_trip_toml() {
        let config = ConfigFile {
            model: Some(ModelConfig {
                path: Some("/models/resume_classifier.json".to_string()),
            }),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: ConfigFile = toml::from_str(&toml_str).unwrap();
        assert_eq!(
            parsed.model.unwrap().path.unwrap(),
            "/models/resume_classifier.json"
        );
    }

    #[test]
    fn absent_sections_deserialize_as_none() {
        let parsed: ConfigFile = toml::from_str("[screening]\nseed = 7\n").unwrap();
        assert!(parsed.model.is_none());
        assert_eq!(parsed.screening.unwrap().seed, Some(7));
    }

    #[test]
    fn merge_overlay_wins() {
        let base = ConfigFile {
            model: Some(ModelConfig {
                path: Some("/base/model.json".to_string()),
            }),
            screening: Some(ScreeningConfig { seed: Some(1) }),
            ..Default::default()
        };
        let overlay = ConfigFile {
            model: Some(ModelConfig {
                path: Some("/overlay/model.json".to_string()),
            }),
            ..Default::default()
        };
        let merged = merge(base, overlay);
        assert_eq!(merged.model.unwrap().path.unwrap(), "/overlay/model.json");
        // Base value preserved where the overlay is silent
        assert_eq!(merged.screening.unwrap().seed, Some(1));
    }
}
