//! Custom error types for the application.
//!
//! `RadarError` is the single error type surfaced by the library. Using the
//! `thiserror` crate it covers the few things that can actually go wrong:
//!
//! - **`Config`**: wraps errors from `figment`, typically a malformed TOML file or
//!   a value with the wrong type.
//! - **`Configuration`**: semantic errors in an otherwise well-formed
//!   configuration (zero baud rate, negative fade time, unknown log level).
//!   Produced by `RadarConfig::validate`.
//! - **`SerialOpen`**: the serial device could not be opened. The reader thread
//!   logs this and exits; the display keeps running with an empty history.
//! - **`Io`**: wraps `std::io::Error` from reads on the transport.
//! - **`Gui`**: the native window could not be created.
//! - **`Tracing`**: the global subscriber could not be installed.
//!
//! Malformed input lines are deliberately absent: the line parser returns
//! `Option` and only logs the reason.

use thiserror::Error;

/// Convenience alias for results using the application error type.
pub type RadarResult<T> = std::result::Result<T, RadarError>;

/// Errors surfaced by the radar library.
#[derive(Error, Debug)]
pub enum RadarError {
    /// The configuration could not be loaded or extracted.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// The configuration loaded but holds an invalid value.
    #[error("Configuration validation error: {0}")]
    Configuration(String),

    /// The serial device could not be opened.
    #[error("Could not open serial port '{port}': {source}")]
    SerialOpen {
        /// Port name as configured.
        port: String,
        /// Underlying serialport error.
        #[source]
        source: serialport::Error,
    },

    /// A read on the transport failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The native window could not be created.
    #[error("GUI error: {0}")]
    Gui(String),

    /// The global tracing subscriber could not be installed.
    #[error("Tracing initialization error: {0}")]
    Tracing(String),
}

impl From<figment::Error> for RadarError {
    fn from(value: figment::Error) -> Self {
        RadarError::Config(Box::new(value))
    }
}

impl From<eframe::Error> for RadarError {
    fn from(value: eframe::Error) -> Self {
        RadarError::Gui(value.to_string())
    }
}
