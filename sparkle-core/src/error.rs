/// Error type for loading and validating a [`crate::config::Config`].
///
/// The simulation itself never fails; only configuration input can.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Reading the config file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML or does not match the config layout
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// A palette entry is not a `#rrggbb` / `#rrggbbaa` hex string
    #[error("invalid color {0:?}: expected #rrggbb or #rrggbbaa")]
    InvalidColor(String),

    /// A value is outside the range the simulation accepts
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Result type for config operations
pub type Result<T> = std::result::Result<T, ConfigError>;
