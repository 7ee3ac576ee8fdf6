use crate::error::Error;
use crate::settings::{RenderSettings, SamplerSettings, SimulationSettings};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Complete run configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// Side length of the square field
    pub size: usize,
    /// Random seed; None draws one from the OS
    pub seed: Option<u64>,
    pub simulation: SimulationSettings,
    pub sampler: SamplerSettings,
    pub render: RenderSettings,
}

impl AppConfig {
    /// `<config dir>/dla-generator/config.json`, if the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dla-generator").join("config.json"))
    }

    /// Export config to a JSON file, creating parent directories as needed
    pub fn save_to_file(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.simulation.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default path if it exists, else defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_from_file(&path),
                None => Ok(Self::default()),
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            size: 100,
            seed: None,
            simulation: SimulationSettings::default(),
            sampler: SamplerSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AppConfig {
            version: 1,
            size: 64,
            seed: Some(99),
            simulation: SimulationSettings {
                initial_radius: 6.5,
                max_walk_steps: 350,
                max_particle_attempts: Some(10_000),
            },
            sampler: SamplerSettings {
                alpha: 0.4,
                burn: 50,
            },
            render: RenderSettings {
                foreground: 200,
                background: 20,
                frame_stride: 5,
                frame_delay: 8,
            },
        };

        // Serialize to JSON
        let json = serde_json::to_string_pretty(&config).unwrap();

        // Deserialize back
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig::default();

        // Create temp file
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        // Save
        config.save_to_file(&path).unwrap();

        // Load
        let loaded = AppConfig::load_from_file(&path).unwrap();

        assert_eq!(loaded.version, config.version);
        assert_eq!(loaded.size, config.size);
        assert_eq!(loaded.simulation, config.simulation);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("config.json");
        AppConfig::default().save_to_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{"size": 80, "render": {"foreground": 600}}"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.size, 80);
        assert_eq!(loaded.seed, None);
        assert_eq!(loaded.render.foreground, 255);
        assert_eq!(loaded.simulation, SimulationSettings::default());
    }

    #[test]
    fn test_invalid_settings_in_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"simulation": {"max_walk_steps": 0}}"#).unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(Error::InvalidSettings(_))));
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_explicit_path_wins() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), r#"{"size": 33}"#).unwrap();
        let loaded = AppConfig::load_or_default(Some(temp_file.path())).unwrap();
        assert_eq!(loaded.size, 33);
    }
}
