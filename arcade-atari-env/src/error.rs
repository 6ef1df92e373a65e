//! Errors of the Atari environment.
use thiserror::Error;

/// Errors of the Atari environment.
#[derive(Error, Debug, PartialEq)]
pub enum AtariEnvError {
    /// A raw frame has an unexpected layout. This is a broken simulator
    /// or adapter, not a recoverable condition.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// The action index is out of the action space.
    #[error("Invalid action {action}: the action space has {n_actions} actions")]
    InvalidAction {
        /// Requested action.
        action: usize,

        /// Size of the action space.
        n_actions: usize,
    },

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The simulator failed.
    #[error("Simulator error: {0}")]
    Simulator(String),
}
