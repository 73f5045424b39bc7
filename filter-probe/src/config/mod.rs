//! Configuration management for the probe
use std::path::Path;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Prefix of the environment variables that override the settings.
pub const ENV_PREFIX: &str = "PROBE";

/// Which cases to run and how the write context is managed.
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Keep one write context for the whole run. When false, a fresh
    /// context is created for every case and dropped after it.
    pub reuse_context: bool,
    /// Run the edge-case table instead of just the named filters.
    pub extended_table: bool,
    /// Ask the library to report application errors as warnings so the run
    /// can continue past undocumented selectors.
    pub relax_app_errors: bool,
}

impl Default for Settings {
    /// The defaults chosen at build time through the `reuse-context` and
    /// `extended-table` cargo features.
    fn default() -> Self {
        Settings {
            reuse_context: cfg!(feature = "reuse-context"),
            extended_table: cfg!(feature = "extended-table"),
            relax_app_errors: true,
        }
    }
}

impl Settings {
    /// Build the settings from the build-time defaults, then the optional
    /// TOML file, then environment variables. Later sources win.
    ///
    /// The environment variables are prefixed with `PROBE_`, so
    /// `reuse_context` is overridden by `PROBE_REUSE_CONTEXT`.
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .try_parsing(true);

        Self::build(config_path, env)
    }

    fn build(
        config_path: Option<impl AsRef<Path>>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let defaults = Settings::default();

        let mut cfg_builder = Config::builder()
            .set_default("reuse_context", defaults.reuse_context)?
            .set_default("extended_table", defaults.extended_table)?
            .set_default("relax_app_errors", defaults.relax_app_errors)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        cfg_builder.build()?.try_deserialize()
    }
}
