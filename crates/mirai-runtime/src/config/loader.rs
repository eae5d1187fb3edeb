//! Configuration loader using figment.
//!
//! # Feature Flags
//!
//! - `toml-config` *(default)*: enables `mirai.toml`
//! - `yaml-config`: enables `mirai.yaml` / `mirai.yml`
//!
//! # Configuration Priority (lowest to highest)
//!
//! 1. Built-in defaults
//! 2. Programmatic merges ([`ConfigLoader::merge`])
//! 3. Config file (explicit, or the first found in the search paths)
//! 4. Environment variables (`MIRAI_*`)
//!
//! # Environment Variable Mapping
//!
//! Environment variables use the `MIRAI_` prefix with `__` as separator:
//!
//! - `MIRAI_LOGGING__LEVEL=debug` → `logging.level = "debug"`
//! - `MIRAI_SESSION__CACHE_SIZE=1024` → `session.cache_size = 1024`
//! - `MIRAI_DISPATCH__EXECUTION=thread_pool` → `dispatch.execution = "thread_pool"`
//!
//! # Example
//!
//! ```rust,ignore
//! use mirai_runtime::config::ConfigLoader;
//!
//! let config = ConfigLoader::new()
//!     .file("./config/mirai.toml")
//!     .load()?;
//! ```

use std::path::{Path, PathBuf};

use figment::Figment;
#[cfg(any(feature = "yaml-config", feature = "toml-config"))]
use figment::providers::Format;
#[cfg(feature = "toml-config")]
use figment::providers::Toml;
#[cfg(feature = "yaml-config")]
use figment::providers::Yaml;
use figment::providers::{Env, Serialized};
use tracing::{debug, info, trace, warn};

use super::error::{ConfigError, ConfigResult};
use super::schema::MiraiConfig;

/// Prefix of environment variables read by the loader.
pub const ENV_PREFIX: &str = "MIRAI_";

/// File names probed in each search path, in order.
const FILE_NAMES: &[&str] = &[
    #[cfg(feature = "toml-config")]
    "mirai.toml",
    #[cfg(feature = "yaml-config")]
    "mirai.yaml",
    #[cfg(feature = "yaml-config")]
    "mirai.yml",
];

/// Loads the configuration from the default locations.
pub fn load_config() -> ConfigResult<MiraiConfig> {
    ConfigLoader::new().load()
}

/// Loads the configuration from `path`, with environment overrides.
pub fn load_config_from_file(path: impl AsRef<Path>) -> ConfigResult<MiraiConfig> {
    ConfigLoader::new().file(path).load()
}

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    /// Programmatic layers merged over the defaults.
    figment: Figment,
    search_paths: Vec<PathBuf>,
    load_env: bool,
    /// Specific config file to load (overrides search).
    config_file: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            figment: Figment::new(),
            search_paths: Vec::new(),
            load_env: true,
            config_file: None,
        }
    }

    /// Adds a search path for configuration files.
    ///
    /// When no path is added, the working directory and the user config
    /// directory (`<config_dir>/mirai`) are searched.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.search_paths.push(path.as_ref().to_path_buf());
        self
    }

    /// Sets a specific configuration file to load.
    pub fn file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enables loading environment variables (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Merges additional configuration programmatically.
    ///
    /// Files and environment variables still take precedence.
    pub fn merge(mut self, config: MiraiConfig) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(config));
        self
    }

    /// Loads, validates and returns the configuration.
    pub fn load(self) -> ConfigResult<MiraiConfig> {
        let figment = self.build_figment()?;

        let config: MiraiConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;

        debug!(
            execution = %config.dispatch.execution,
            logging_level = %config.logging.level,
            "Configuration loaded successfully"
        );

        Ok(config)
    }

    fn build_figment(mut self) -> ConfigResult<Figment> {
        let mut figment = Figment::from(Serialized::defaults(MiraiConfig::default()));
        figment = figment.merge(std::mem::take(&mut self.figment));

        if let Some(path) = &self.config_file {
            if !path.exists() {
                return Err(ConfigError::FileNotFound(path.clone()));
            }
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, path)?;
        } else if let Some(path) = self.find_config_file() {
            info!(path = %path.display(), "Loading configuration file");
            figment = Self::merge_config_file(figment, &path)?;
        } else {
            warn!("No configuration file found, using defaults");
        }

        if self.load_env {
            trace!("Loading environment variables with {ENV_PREFIX} prefix");
            figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));
        }

        Ok(figment)
    }

    /// Merges a single config file, dispatching on its extension.
    fn merge_config_file(figment: Figment, path: &Path) -> ConfigResult<Figment> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            #[cfg(feature = "toml-config")]
            "toml" => Ok(figment.merge(Toml::file(path))),
            #[cfg(feature = "yaml-config")]
            "yaml" | "yml" => Ok(figment.merge(Yaml::file(path))),
            _ => Err(ConfigError::UnsupportedFormat(ext.to_owned())),
        }
    }

    fn resolve_search_paths(&self) -> Vec<PathBuf> {
        if !self.search_paths.is_empty() {
            return self.search_paths.clone();
        }
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd);
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mirai"));
        }
        paths
    }

    /// First existing file across `search_paths × FILE_NAMES`.
    fn find_config_file(&self) -> Option<PathBuf> {
        self.resolve_search_paths()
            .into_iter()
            .flat_map(|dir| FILE_NAMES.iter().map(move |name| dir.join(name)))
            .find(|path| path.exists())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExecutionPolicy, LogLevel};
    use figment::Jail;

    #[test]
    fn test_default_config() {
        Jail::expect_with(|jail| {
            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.logging.level.as_str(), "info");
            assert_eq!(config.session.cache_size, 4096);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mirai.toml",
                r#"
                    [session]
                    cache_size = 512

                    [dispatch]
                    execution = "thread_pool"

                    [logging]
                    level = "debug"
                "#,
            )?;
            jail.set_env("MIRAI_LOGGING__LEVEL", "warn");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.session.cache_size, 512);
            assert_eq!(config.dispatch.execution, ExecutionPolicy::ThreadPool);
            assert_eq!(config.logging.level, LogLevel::Warn);
            Ok(())
        });
    }

    #[test]
    fn test_merge_is_overridden_by_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[session]\nenable_websocket = true\n")?;

            let mut base = MiraiConfig::default();
            base.session.cache_size = 64;
            base.session.enable_websocket = false;

            let config = ConfigLoader::new()
                .merge(base)
                .file(jail.directory().join("custom.toml"))
                .without_env()
                .load()
                .map_err(|e| e.to_string())?;

            assert_eq!(config.session.cache_size, 64);
            assert!(config.session.enable_websocket);
            Ok(())
        });
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let err = ConfigLoader::new()
            .file("/definitely/not/here/mirai.toml")
            .without_env()
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));

        Jail::expect_with(|jail| {
            jail.create_file("mirai.ini", "x = 1")?;
            let err = ConfigLoader::new()
                .file(jail.directory().join("mirai.ini"))
                .without_env()
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));

            jail.set_env("MIRAI_SESSION__CACHE_SIZE", "0");
            let err = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap_err();
            assert!(matches!(err, ConfigError::ValidationError { .. }));
            Ok(())
        });
    }
}
