//! # Radar Sweep Library
//!
//! Reads `A<angle>,D<distance>` lines from a serial sensor and shows them as a
//! fading polar radar sweep. The binary (`main.rs`) only wires these pieces
//! together, so everything here can be driven from tests without hardware or a
//! window.
//!
//! ## Crate Structure
//!
//! - **`config`**: `RadarConfig`, loaded with `figment` from defaults and an optional
//!   TOML file.
//! - **`error`**: the `RadarError` enum used across the crate.
//! - **`parser`**: turns one text line into an `(angle, distance)` pair.
//! - **`history`**: the mutex-guarded sample history shared by the reader and the display.
//! - **`reader`**: the background thread that owns the serial port.
//! - **`gui`**: the eframe/egui display that prunes, fades and draws the history.
//! - **`tracing_setup`**: `tracing-subscriber` initialisation.

pub mod config;
pub mod error;
pub mod gui;
pub mod history;
pub mod parser;
pub mod reader;
pub mod tracing_setup;

pub use config::RadarConfig;
pub use error::{RadarError, RadarResult};
pub use history::{HistorySnapshot, HistoryStore, Sample};
pub use parser::parse_line;
pub use reader::SampleReader;
