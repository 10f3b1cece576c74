mod config;
mod error;

pub use config::{ShellConfig, ShellConfigExt};
pub use error::ConfigError;
