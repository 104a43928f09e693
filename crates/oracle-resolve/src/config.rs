use std::path::Path;
use std::sync::Once;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::diagnostics::LOG_TARGET;

static TRACING_INIT: Once = Once::new();

const FALLBACK_DIRECTIVES: &str = "warn";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Toml(err.message().to_owned())
    }
}

/// Switches that change how signatures are checked and which collaborators are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveOptions {
    /// Cross-check resolved types against the erased descriptors recorded in bytecode.
    #[serde(default = "default_true")]
    pub verify_erased_descriptors: bool,

    /// Ask the [`Resolver`](crate::Resolver) to resolve unresolved classes a signature mentions.
    #[serde(default = "default_true")]
    pub resolve_referenced_classes: bool,

    /// Warn when a generic class is applied to the wrong number of type arguments.
    #[serde(default = "default_true")]
    pub warn_on_type_argument_arity: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            verify_erased_descriptors: true,
            resolve_referenced_classes: true,
            warn_on_type_argument_arity: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// Filter directives for this config, with `rust_log` appended when present.
    ///
    /// A bare level applies to the `oracle.resolve` target only; every other target stays
    /// at `warn`. Anything else is taken as a full directive string.
    pub fn directives(&self, rust_log: Option<&str>) -> String {
        let level = self.level.trim();
        let mut directives = match level.to_ascii_lowercase().as_str() {
            "" => format!("{FALLBACK_DIRECTIVES},{LOG_TARGET}=info"),
            "warning" => format!("{FALLBACK_DIRECTIVES},{LOG_TARGET}=warn"),
            bare @ ("trace" | "debug" | "info" | "warn" | "error") => {
                format!("{FALLBACK_DIRECTIVES},{LOG_TARGET}={bare}")
            }
            _ => level.to_owned(),
        };
        if let Some(extra) = rust_log.map(str::trim).filter(|extra| !extra.is_empty()) {
            directives.push(',');
            directives.push_str(extra);
        }
        directives
    }

    /// The effective filter: the configured level, merged with `RUST_LOG` when it is set.
    /// Directives that fail to parse fall back to the configured level alone, then to
    /// `warn`.
    pub fn env_filter(&self) -> EnvFilter {
        let rust_log = std::env::var("RUST_LOG").ok();
        EnvFilter::try_new(self.directives(rust_log.as_deref()))
            .or_else(|_| EnvFilter::try_new(self.directives(None)))
            .unwrap_or_else(|_| EnvFilter::new(FALLBACK_DIRECTIVES))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolveConfig {
    #[serde(default)]
    pub resolve: ResolveOptions,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ResolveConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

/// Installs a global fmt subscriber writing to stderr.
///
/// Only the first call has an effect. If another global subscriber is already installed the
/// call is ignored.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let installed = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };
        if installed.is_err() {
            tracing::debug!(target: LOG_TARGET, "global tracing subscriber already set");
        }
    });
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::{
        init_tracing, ConfigError, LoggingConfig, ResolveConfig, ResolveOptions, TRACING_INIT,
    };

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn empty_config_uses_defaults() {
        let config = ResolveConfig::from_toml_str("").unwrap();
        assert_eq!(config, ResolveConfig::default());
        assert!(config.resolve.verify_erased_descriptors);
        assert!(config.resolve.resolve_referenced_classes);
        assert!(config.resolve.warn_on_type_argument_arity);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn sections_override_individual_keys() {
        let config = ResolveConfig::from_toml_str(
            r#"
            [resolve]
            verify_erased_descriptors = false

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.resolve,
            ResolveOptions {
                verify_erased_descriptors: false,
                ..ResolveOptions::default()
            }
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = ResolveConfig::from_toml_str("[resolve]\nstrict = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");

        let err = ResolveConfig::from_toml_str("[cache]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
    }

    #[test]
    fn load_from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\njson = true").unwrap();

        let config = ResolveConfig::load_from_path(file.path()).unwrap();
        assert!(config.logging.json);
        assert_eq!(config.resolve, ResolveOptions::default());
    }

    #[test]
    fn load_from_missing_path_reports_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = ResolveConfig::load_from_path(&path).unwrap_err();
        match err {
            ConfigError::Io { path: reported, .. } => {
                assert_eq!(reported, path.display().to_string())
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn bare_levels_scope_to_the_resolver_target() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.directives(None), "warn,oracle.resolve=info");

        config.level = " WARNING ".to_owned();
        assert_eq!(config.directives(None), "warn,oracle.resolve=warn");

        config.level = "oracle.resolve=trace,oracle_types=debug".to_owned();
        assert_eq!(
            config.directives(Some("  ")),
            "oracle.resolve=trace,oracle_types=debug"
        );
    }

    #[test]
    fn rust_log_directives_are_appended() {
        let config = LoggingConfig {
            level: "debug".to_owned(),
            json: false,
        };
        assert_eq!(
            config.directives(Some("oracle_types=trace")),
            "warn,oracle.resolve=debug,oracle_types=trace"
        );
    }

    #[test]
    fn env_filter_merges_rust_log() {
        let _lock = ENV_LOCK.lock().unwrap();
        let previous = std::env::var("RUST_LOG").ok();
        let config = LoggingConfig {
            level: "debug".to_owned(),
            json: false,
        };

        std::env::remove_var("RUST_LOG");
        let filter = config.env_filter().to_string().to_ascii_lowercase();
        assert!(filter.contains("oracle.resolve=debug"), "{filter}");
        assert!(!filter.contains("oracle_types"), "{filter}");

        std::env::set_var("RUST_LOG", "oracle_types=trace");
        let filter = config.env_filter().to_string().to_ascii_lowercase();
        assert!(filter.contains("oracle.resolve=debug"), "{filter}");
        assert!(filter.contains("oracle_types=trace"), "{filter}");

        std::env::set_var("RUST_LOG", "oracle_types=[");
        let filter = config.env_filter().to_string().to_ascii_lowercase();
        assert!(filter.contains("oracle.resolve=debug"), "{filter}");
        assert!(!filter.contains("oracle_types"), "{filter}");

        match previous {
            Some(value) => std::env::set_var("RUST_LOG", value),
            None => std::env::remove_var("RUST_LOG"),
        }
    }

    #[test]
    fn init_tracing_only_installs_once() {
        let _lock = ENV_LOCK.lock().unwrap();
        init_tracing(&LoggingConfig::default());
        assert!(tracing::dispatcher::has_been_set());

        init_tracing(&LoggingConfig {
            level: "trace".to_owned(),
            json: true,
        });
        assert!(tracing::dispatcher::has_been_set());
        assert!(TRACING_INIT.is_completed());
    }
}
