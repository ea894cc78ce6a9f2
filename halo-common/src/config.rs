//! Configuration loading and data directory resolution

use std::path::PathBuf;

use crate::{Error, Result};

/// Environment variable naming the data directory
pub const DATA_DIR_ENV: &str = "HALO_DATA_DIR";

/// Environment variable holding the ESV API key
pub const ESV_API_KEY_ENV: &str = "ESV_API_KEY";

/// Data directory resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. `HALO_DATA_DIR` environment variable
/// 3. `data_dir` key in the TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_dir(cli_arg: Option<&str>) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = config_file_path() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(data_dir) = config.get("data_dir").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(data_dir));
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    Ok(default_data_dir())
}

/// Ensure the data directory exists, creating it if necessary
pub fn ensure_data_dir(path: &PathBuf) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
        tracing::info!("Created data directory: {}", path.display());
    }
    Ok(())
}

/// ESV API key from the environment, if configured
///
/// Whitespace-only values count as absent.
pub fn esv_api_key() -> Option<String> {
    std::env::var(ESV_API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}

/// Locate the platform config file (`halo/config.toml` under the user
/// config directory, with `/etc/halo/config.toml` as a Linux fallback)
fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("halo").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }
    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/halo/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }
    Err(Error::Config("No config file found".to_string()))
}

/// OS-dependent default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("halo"))
        .unwrap_or_else(|| PathBuf::from("./halo-data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_arg_wins() {
        let dir = resolve_data_dir(Some("/tmp/halo-test")).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/halo-test"));
    }

    #[test]
    fn test_default_is_nonempty() {
        let dir = resolve_data_dir(None).unwrap();
        assert!(!dir.as_os_str().is_empty());
    }

    #[test]
    fn test_ensure_data_dir_creates() {
        let tmp = tempfile::tempdir().unwrap();
        let nested = tmp.path().join("a").join("b");
        ensure_data_dir(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
