//! Error types reported by the graphics driver.

use thiserror::Error;

/// Errors produced by context acquisition and the driver's state stacks.
///
/// None of these are fatal: stack errors are reported through the log and
/// drawing continues with the last valid state.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("cannot create a surface for {target}: {reason}")]
    SurfaceCreation { target: String, reason: String },

    #[error("matrix stack overflow (depth limit {limit})")]
    MatrixStackOverflow { limit: usize },

    #[error("matrix stack underflow")]
    MatrixStackUnderflow,

    #[error("cairo error: {0}")]
    Cairo(#[from] cairo::Error),
}

impl DriverError {
    pub(crate) fn surface(target: impl Into<String>, reason: impl Into<String>) -> Self {
        DriverError::SurfaceCreation {
            target: target.into(),
            reason: reason.into(),
        }
    }
}

/// Lookup failures in the theme registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ThemeError {
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("unknown color scheme '{0}'")]
    UnknownScheme(String),
}
