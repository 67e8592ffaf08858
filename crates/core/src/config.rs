//! Application configuration: catalog file locations and logging.
//!
//! Precedence is env > file > default. The file is `panelquote.toml` at the
//! working directory (or `config/panelquote.toml`), overridable per field by
//! `PANELQUOTE_*` environment variables.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogPaths;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct CatalogConfig {
    pub span_table: PathBuf,
    pub price_table: PathBuf,
    pub defaults: PathBuf,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub span_table: Option<PathBuf>,
    pub price_table: Option<PathBuf>,
    pub defaults: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig {
                span_table: PathBuf::from("data/span_table.toml"),
                price_table: PathBuf::from("data/price_table.toml"),
                defaults: PathBuf::from("data/defaults.toml"),
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("panelquote.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn catalog_paths(&self) -> CatalogPaths {
        CatalogPaths {
            span_table: self.catalog.span_table.clone(),
            price_table: self.catalog.price_table.clone(),
            defaults: self.catalog.defaults.clone(),
        }
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(catalog) = patch.catalog {
            if let Some(span_table) = catalog.span_table {
                self.catalog.span_table = span_table;
            }
            if let Some(price_table) = catalog.price_table {
                self.catalog.price_table = price_table;
            }
            if let Some(defaults) = catalog.defaults {
                self.catalog.defaults = defaults;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("PANELQUOTE_CATALOG_SPAN_TABLE") {
            self.catalog.span_table = PathBuf::from(value);
        }
        if let Some(value) = read_env("PANELQUOTE_CATALOG_PRICE_TABLE") {
            self.catalog.price_table = PathBuf::from(value);
        }
        if let Some(value) = read_env("PANELQUOTE_CATALOG_DEFAULTS") {
            self.catalog.defaults = PathBuf::from(value);
        }

        let log_level =
            read_env("PANELQUOTE_LOGGING_LEVEL").or_else(|| read_env("PANELQUOTE_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("PANELQUOTE_LOGGING_FORMAT").or_else(|| read_env("PANELQUOTE_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(span_table) = overrides.span_table {
            self.catalog.span_table = span_table;
        }
        if let Some(price_table) = overrides.price_table {
            self.catalog.price_table = price_table;
        }
        if let Some(defaults) = overrides.defaults {
            self.catalog.defaults = defaults;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, path) in [
            ("catalog.span_table", &self.catalog.span_table),
            ("catalog.price_table", &self.catalog.price_table),
            ("catalog.defaults", &self.catalog.defaults),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Validation(format!("`{name}` must not be empty")));
            }
        }

        match self.logging.level.trim().to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::Validation(format!(
                "unsupported log level `{other}` (expected trace|debug|info|warn|error)"
            ))),
        }
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("panelquote.toml"), PathBuf::from("config/panelquote.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;
    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().map(|value| value.trim().to_string()).filter(|value| !value.is_empty())
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    catalog: Option<CatalogPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogPatch {
    span_table: Option<PathBuf>,
    price_table: Option<PathBuf>,
    defaults: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    #[test]
    fn defaults_point_at_the_data_directory() {
        let config = AppConfig::default();
        assert_eq!(config.catalog.span_table, PathBuf::from("data/span_table.toml"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn file_patch_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        writeln!(
            file,
            "[catalog]\nspan_table = \"tables/spans.toml\"\n\n[logging]\nformat = \"json\"\n"
        )
        .expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides::default(),
        })
        .expect("load config");

        assert_eq!(config.catalog.span_table, PathBuf::from("tables/spans.toml"));
        // Untouched fields keep their defaults.
        assert_eq!(config.catalog.price_table, PathBuf::from("data/price_table.toml"));
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn explicit_overrides_win_over_the_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp config file");
        writeln!(file, "[logging]\nlevel = \"debug\"\n").expect("write config");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(file.path().to_path_buf()),
            require_file: true,
            overrides: ConfigOverrides {
                log_level: Some("warn".to_string()),
                ..ConfigOverrides::default()
            },
        })
        .expect("load config");

        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = AppConfig::load(LoadOptions {
            config_path: Some(PathBuf::from("/nonexistent/panelquote.toml")),
            require_file: true,
            overrides: ConfigOverrides::default(),
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn invalid_log_level_fails_validation() {
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                log_level: Some("verbose".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
