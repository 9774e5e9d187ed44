//! CLI configuration

use serde::{Deserialize, Serialize};
use upkeep_engine::EngineConfig;

use crate::error::CliResult;

/// Everything the `upkeep` binary can be configured with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging defaults, overridden by `--log-level` and `--json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CliConfig {
    /// Load configuration: defaults, then the optional file, then
    /// `UPKEEP_`-prefixed environment variables (`__` between sections, e.g.
    /// `UPKEEP_ENGINE__ANOMALY__Z_THRESHOLD=2.5`).
    ///
    /// The result is validated before it is returned.
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CliConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("UPKEEP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: CliConfig = builder.build()?.try_deserialize()?;
        config.engine.validate()?;
        Ok(config)
    }
}
