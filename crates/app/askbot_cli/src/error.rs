use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{}", .0)]
    Custom(String),

    #[error("IO::{:?}: {}", .0, .0)]
    Io(#[from] std::io::Error),

    #[error("FlexiLogger::{:?}: {}", .0, .0)]
    FlexiLogger(#[from] flexi_logger::FlexiLoggerError),

    #[error("Config: {}", .0)]
    Config(#[from] askbot_core::config::ConfigError),

    #[error("Relay: {}", .0)]
    Relay(#[from] askbot_core::RelayError),

    #[error("Preferences: {}", .0)]
    Preference(#[from] askbot_core::preferences::PreferenceError),
}
