//! Fehler-Typen für Parser, Validierung und Kommandos

use thiserror::Error;

use crate::board::Board;
use crate::types::{Key, ValueKind};

/// Was in einer Zeile der Konfigurations-Datei falsch ist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    #[error("expected `KEY = VALUE` or `#define KEY VALUE`")]
    MalformedLine,
    #[error("missing value")]
    MissingValue,
    #[error("unknown key")]
    UnknownKey,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unexpected characters after value")]
    TrailingCharacters,
    #[error("invalid literal, expected a quoted string, an integer, `true` or `false`")]
    InvalidLiteral,
    #[error("`{key}` expects a {expected} value")]
    WrongType { key: Key, expected: ValueKind },
}

/// Parser-Fehler mit Zeilennummer (1-basiert)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[error("line {line}: {kind}")]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

/// Fataler Konfigurations-Fehler
///
/// Es gibt zur Laufzeit keinen Weg die Konfiguration neu zu laden,
/// daher bricht jeder dieser Fehler Build bzw. Boot ab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("`{0}` is required")]
    Missing(Key),
    #[error("`{0}` must not be empty")]
    Empty(Key),
    #[error("`{key}` is longer than {max} bytes")]
    TooLong { key: Key, max: usize },
    #[error("wifi_password must be empty or 8 to 63 bytes long, got {0} bytes")]
    InvalidPasswordLength(usize),
    #[error("mqtt_port {0} is outside 1..=65535")]
    InvalidPort(i64),
    #[error("`{key}` value {value} is out of range")]
    OutOfRange { key: Key, value: i64 },
    #[error("led_builtin_mode must be -1, 0 or 1, got {0}")]
    InvalidBuiltinMode(i64),
    #[error("GPIO{pin} is not a PWM capable output on {board}")]
    InvalidPin { pin: i64, board: Board },
    #[error("colorfade_time_slow ({slow}s) must be >= colorfade_time_fast ({fast}s) > 0")]
    ColorfadeOrder { slow: u32, fast: u32 },
    #[error("led_topic_state and led_topic_set must differ")]
    DuplicateTopics,
    #[error("mqtt_payload_on and mqtt_payload_off must differ")]
    DuplicatePayloads,
    #[error("`{0}` is not a valid publish topic")]
    InvalidTopic(Key),
    #[error("`{0}` contains characters that cannot be written to the config file")]
    UnrepresentableValue(Key),
}

/// Fehler beim Dekodieren eines MQTT-Payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    #[error("payload matches neither the ON nor the OFF payload")]
    UnknownPayload,
}
