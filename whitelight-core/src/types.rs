//! Core Types für die Konfiguration
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use crate::error::ConfigError;

/// Name eines Konfigurations-Parameters
///
/// Jeder Parameter hat einen kanonischen Namen (`led_pin`, `mqtt_port`, ...)
/// und optional Aliase aus dem alten `config.h` Format (`PIN_WHITE`, `DEBUG`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    LedPin,
    WifiSsid,
    WifiPassword,
    MqttHost,
    MqttPort,
    MqttUser,
    MqttPass,
    MqttClientId,
    DefaultTransitionTime,
    LedTopicState,
    LedTopicSet,
    MqttPayloadOn,
    MqttPayloadOff,
    DefaultFlashLength,
    ColorfadeTimeSlow,
    ColorfadeTimeFast,
    InvertLedLogic,
    LedBuiltinMode,
    DebugEnabled,
}

impl Key {
    /// Anzahl aller Keys
    pub const COUNT: usize = 19;

    /// Alle Keys in der Reihenfolge, in der sie gerendert werden
    pub const ALL: [Key; Self::COUNT] = [
        Key::LedPin,
        Key::WifiSsid,
        Key::WifiPassword,
        Key::MqttHost,
        Key::MqttPort,
        Key::MqttUser,
        Key::MqttPass,
        Key::MqttClientId,
        Key::DefaultTransitionTime,
        Key::LedTopicState,
        Key::LedTopicSet,
        Key::MqttPayloadOn,
        Key::MqttPayloadOff,
        Key::DefaultFlashLength,
        Key::ColorfadeTimeSlow,
        Key::ColorfadeTimeFast,
        Key::InvertLedLogic,
        Key::LedBuiltinMode,
        Key::DebugEnabled,
    ];

    /// Kanonischer Name (snake_case)
    pub const fn name(self) -> &'static str {
        match self {
            Key::LedPin => "led_pin",
            Key::WifiSsid => "wifi_ssid",
            Key::WifiPassword => "wifi_password",
            Key::MqttHost => "mqtt_host",
            Key::MqttPort => "mqtt_port",
            Key::MqttUser => "mqtt_user",
            Key::MqttPass => "mqtt_pass",
            Key::MqttClientId => "mqtt_client_id",
            Key::DefaultTransitionTime => "default_transition_time",
            Key::LedTopicState => "led_topic_state",
            Key::LedTopicSet => "led_topic_set",
            Key::MqttPayloadOn => "mqtt_payload_on",
            Key::MqttPayloadOff => "mqtt_payload_off",
            Key::DefaultFlashLength => "default_flash_length",
            Key::ColorfadeTimeSlow => "colorfade_time_slow",
            Key::ColorfadeTimeFast => "colorfade_time_fast",
            Key::InvertLedLogic => "invert_led_logic",
            Key::LedBuiltinMode => "led_builtin_mode",
            Key::DebugEnabled => "debug_enabled",
        }
    }

    /// Erwarteter Werte-Typ
    pub const fn kind(self) -> ValueKind {
        match self {
            Key::LedPin
            | Key::MqttPort
            | Key::DefaultTransitionTime
            | Key::DefaultFlashLength
            | Key::ColorfadeTimeSlow
            | Key::ColorfadeTimeFast
            | Key::LedBuiltinMode => ValueKind::Integer,
            Key::InvertLedLogic | Key::DebugEnabled => ValueKind::Boolean,
            _ => ValueKind::String,
        }
    }

    /// Index in Tabellen der Länge [`Key::COUNT`]
    pub const fn index(self) -> usize {
        self as usize
    }

    // Namen aus dem alten Header-Format
    const fn alias(self) -> Option<&'static str> {
        match self {
            Key::LedPin => Some("pin_white"),
            Key::WifiPassword => Some("wifi_pass"),
            Key::MqttPass => Some("mqtt_password"),
            Key::DebugEnabled => Some("debug"),
            _ => None,
        }
    }

    /// Sucht den Key zu einem Namen
    ///
    /// Groß-/Kleinschreibung wird ignoriert, ebenso ein `CONFIG_` Präfix.
    ///
    /// ```
    /// # use whitelight_core::Key;
    /// assert_eq!(Key::from_name("CONFIG_MQTT_PORT"), Some(Key::MqttPort));
    /// assert_eq!(Key::from_name("pin_white"), Some(Key::LedPin));
    /// assert_eq!(Key::from_name("brightness"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Self> {
        let name = strip_prefix_ignore_case(name, "CONFIG_");
        Self::ALL.into_iter().find(|key| {
            name.eq_ignore_ascii_case(key.name())
                || key.alias().is_some_and(|alias| name.eq_ignore_ascii_case(alias))
        })
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> &'a str {
    match name.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &name[prefix.len()..],
        _ => name,
    }
}

/// Typ eines Konfigurations-Werts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueKind {
    String,
    Integer,
    Boolean,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::Boolean => "boolean",
        })
    }
}

/// Roher Wert aus der Konfigurations-Datei
///
/// Strings werden nicht kopiert, sie zeigen in den Quelltext.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Bool(bool),
}

impl Value<'_> {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::String,
            Value::Int(_) => ValueKind::Integer,
            Value::Bool(_) => ValueKind::Boolean,
        }
    }
}

/// Schreibt den Wert im Datei-Format (Strings in Anführungszeichen)
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "\"{}\"", s),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// Verhalten der eingebauten LED beim Booten
///
/// Auf manchen Boards (z.B. Wemos D1 Mini) leuchtet die eingebaute LED,
/// solange der Pin LOW ist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedBuiltinMode {
    /// `-1`: Pin bleibt im Reset-Zustand
    Untouched,
    /// `0`: Pin explizit auf LOW
    Low,
    /// `1`: Pin explizit auf HIGH
    High,
}

impl LedBuiltinMode {
    /// Wert wie er in der Konfigurations-Datei steht
    pub const fn as_raw(self) -> i64 {
        match self {
            LedBuiltinMode::Untouched => -1,
            LedBuiltinMode::Low => 0,
            LedBuiltinMode::High => 1,
        }
    }
}

impl TryFrom<i64> for LedBuiltinMode {
    type Error = ConfigError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            -1 => Ok(LedBuiltinMode::Untouched),
            0 => Ok(LedBuiltinMode::Low),
            1 => Ok(LedBuiltinMode::High),
            other => Err(ConfigError::InvalidBuiltinMode(other)),
        }
    }
}

/// Schaltzustand des Lichts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Power {
    On,
    Off,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_index_matches_all_order() {
        for (i, key) in Key::ALL.into_iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_key_from_name_header_style() {
        assert_eq!(Key::from_name("CONFIG_PIN_WHITE"), Some(Key::LedPin));
        assert_eq!(Key::from_name("CONFIG_WIFI_PASS"), Some(Key::WifiPassword));
        assert_eq!(Key::from_name("CONFIG_DEBUG"), Some(Key::DebugEnabled));
        assert_eq!(Key::from_name("config_mqtt_client_id"), Some(Key::MqttClientId));
    }

    #[test]
    fn test_key_from_name_unknown() {
        assert_eq!(Key::from_name("CONFIG_"), None);
        assert_eq!(Key::from_name(""), None);
        assert_eq!(Key::from_name("CONFIG_PIN_RED"), None);
    }

    #[test]
    fn test_builtin_mode_raw_values() {
        for raw in [-1i64, 0, 1] {
            let mode = LedBuiltinMode::try_from(raw).unwrap();
            assert_eq!(mode.as_raw(), raw);
        }
        assert_eq!(
            LedBuiltinMode::try_from(2i64),
            Err(ConfigError::InvalidBuiltinMode(2))
        );
    }
}
