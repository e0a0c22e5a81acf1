//! Whitelight Core - Konfiguration und Platform-agnostic Logic
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert das Konfigurations-Set des Lichts (Parser, Builder,
//! Validierung) und die Logik, die über `embedded-hal` Traits auf
//! Hardware zugreift.

#![no_std]

pub mod board;
pub mod config;
pub mod driver;
pub mod error;
pub mod logic;
pub mod parser;
pub mod types;

// Re-exports für einfachen Zugriff
pub use board::Board;
pub use config::{Advisory, ConfigBuilder, Configuration, Timings, Topics};
pub use driver::WhiteLed;
pub use error::{CommandError, ConfigError, ParseError, ParseErrorKind};
pub use logic::{MAX_BRIGHTNESS, Payloads, duty_level, power_brightness};
pub use types::{Key, LedBuiltinMode, Power, Value, ValueKind};
