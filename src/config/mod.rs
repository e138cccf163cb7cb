// Configuration module entry point
// Typed configuration plus the immutable per-process serving context

mod state;
mod types;

pub use state::ServeContext;
pub use types::{Config, HttpConfig, LoggingConfig};

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};

impl Config {
    /// Load the configuration the binary runs with.
    ///
    /// Only built-in defaults are consulted: the server reads no
    /// configuration file and no environment variables. The shipped binary
    /// therefore always runs without an access log, without log files and
    /// without index files. Those settings are reachable only through
    /// [`Config::from_toml`], for embedders and tests.
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?.build()?.try_deserialize()
    }

    /// Layer a TOML document over the built-in defaults
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("logging.access_log", false)?
        .set_default("logging.access_log_format", "common")?
        .set_default("http.server_name", types::default_server_name())?
        .set_default("http.index_files", Vec::<String>::new())
}
