pub mod storefront;

pub use storefront::Config;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("Failed to get config directory")?
        .join("tienda");

    // Create config directory if it doesn't exist
    fs::create_dir_all(&config_dir)
        .context("Failed to create config directory")?;

    Ok(config_dir.join("config.toml"))
}

/// Load configuration from the default location, or create it if missing
pub fn load_or_create_config() -> Result<Config> {
    let path = config_path()?;
    let mut config = load_or_create_at(&path)?;
    config.apply_env_overrides();
    Ok(config)
}

/// Load configuration from `path`, writing the defaults there first if it does not exist
pub fn load_or_create_at(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    } else {
        let config = Config::default();
        save_config_at(&config, path)?;

        println!("Created default config at: {}", path.display());
        println!("Edit api_base_url and site_base_url to point at your storefront.");

        Ok(config)
    }
}

/// Save configuration to `path`
pub fn save_config_at(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }
    let content = toml::to_string_pretty(config)
        .context("Failed to serialize config")?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = load_or_create_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.confirm_delay_ms, 1500);

        let reloaded = load_or_create_at(&path).unwrap();
        assert_eq!(reloaded.api_base_url, config.api_base_url);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "confirm_delay_ms = \"soon\"").unwrap();

        let err = load_or_create_at(&path).unwrap_err();
        assert!(format!("{err:#}").contains("config.toml"));
    }
}
