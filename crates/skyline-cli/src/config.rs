//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use skyline::{
    SkylineError,
    config::{AppConfig, Dimensions},
};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for SkylineError {
    fn from(err: ConfigError) -> Self {
        SkylineError::Io(io::Error::other(err.to_string()))
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (skyline/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
/// - Config file holds dimensions the layout cannot work with
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SkylineError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("skyline/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "skyline", "skyline") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SkylineError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate_dimensions(config.layout().dimensions())?;
    Ok(config)
}

/// Rejects dimensions that would produce degenerate or inverted boxes.
fn validate_dimensions(dimensions: &Dimensions) -> Result<(), ConfigError> {
    let fields = [
        ("class_width", dimensions.class_width),
        ("class_height_default", dimensions.class_height_default),
        ("class_height_step", dimensions.class_height_step),
        ("floor_height", dimensions.floor_height),
        ("container_height_margin", dimensions.container_height_margin),
        ("inset_space", dimensions.inset_space),
        ("opened_component_height", dimensions.opened_component_height),
        ("scale", dimensions.scale),
    ];

    for (name, value) in fields {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::Validation(format!(
                "`{name}` must be a non-negative number, got {value}"
            )));
        }
    }

    for (name, value) in [
        ("class_width", dimensions.class_width),
        ("scale", dimensions.scale),
    ] {
        if value == 0.0 {
            return Err(ConfigError::Validation(format!(
                "`{name}` must be greater than zero"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use skyline::CategoryStrategy;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_explicit_path_is_loaded() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout]\ncategory_strategy = \"linear\"\n\n[layout.dimensions]\nscale = 1.0\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.layout().category_strategy(), CategoryStrategy::Linear);
        assert_eq!(config.layout().dimensions().scale, 1.0);
        assert_eq!(config.layout().dimensions().inset_space, 4.0);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempdir().unwrap();
        let result = load_config(Some(dir.path().join("absent.toml")));
        assert!(matches!(result, Err(SkylineError::Io(_))));
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"), "{err}");
    }

    #[test]
    fn test_negative_dimension_is_rejected() {
        let dimensions = Dimensions {
            inset_space: -1.0,
            ..Dimensions::default()
        };
        let err = validate_dimensions(&dimensions).unwrap_err();
        assert!(err.to_string().contains("inset_space"), "{err}");
    }

    #[test]
    fn test_zero_scale_is_rejected() {
        let dimensions = Dimensions {
            scale: 0.0,
            ..Dimensions::default()
        };
        assert!(validate_dimensions(&dimensions).is_err());
        assert!(validate_dimensions(&Dimensions::default()).is_ok());
    }
}
