//! Konfigurations-Set des Lichts
//!
//! Eine [`Configuration`] wird genau einmal gebaut (Build-Zeit bzw. Boot)
//! und danach nur noch gelesen. Alle Consumer bekommen eine Referenz darauf.
//!
//! Aufbau in zwei Schritten:
//! 1. [`ConfigBuilder`] sammelt rohe Werte (Datei, danach Provisioning-Overrides)
//! 2. [`ConfigBuilder::build`] setzt Defaults ein und validiert

use core::fmt;
use core::time::Duration;

use crate::board::Board;
use crate::error::{ConfigError, ParseError, ParseErrorKind};
use crate::logic::Payloads;
use crate::parser;
use crate::types::{Key, LedBuiltinMode, Value, ValueKind};

// ============================================================================
// Defaults und Grenzen
// ============================================================================

pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_TRANSITION_TIME_SECS: u32 = 1;
pub const DEFAULT_FLASH_LENGTH_SECS: u32 = 2;
pub const DEFAULT_COLORFADE_TIME_SLOW_SECS: u32 = 10;
pub const DEFAULT_COLORFADE_TIME_FAST_SECS: u32 = 3;
pub const DEFAULT_PAYLOAD_ON: &str = "ON";
pub const DEFAULT_PAYLOAD_OFF: &str = "OFF";

/// Maximale SSID-Länge laut 802.11
pub const MAX_SSID_LEN: usize = 32;

/// WPA2-PSK Passphrase: 8 bis 63 Zeichen
pub const WPA2_PASSWORD_MIN_LEN: usize = 8;
pub const WPA2_PASSWORD_MAX_LEN: usize = 63;

// ============================================================================
// Configuration
// ============================================================================

/// Validierte, unveränderliche Konfiguration
///
/// Strings zeigen in den Quelltext aus dem sie geparst wurden. Im Firmware-Binary
/// ist das ein `&'static str` aus `include_str!`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration<'a> {
    board: Board,
    led_pin: u8,
    wifi_ssid: &'a str,
    wifi_password: &'a str,
    mqtt_host: &'a str,
    mqtt_port: u16,
    mqtt_user: &'a str,
    mqtt_pass: &'a str,
    mqtt_client_id: &'a str,
    default_transition_time: u32,
    led_topic_state: &'a str,
    led_topic_set: &'a str,
    mqtt_payload_on: &'a str,
    mqtt_payload_off: &'a str,
    default_flash_length: u32,
    colorfade_time_slow: u32,
    colorfade_time_fast: u32,
    invert_led_logic: bool,
    led_builtin_mode: LedBuiltinMode,
    debug_enabled: bool,
}

impl<'a> Configuration<'a> {
    /// Parst und validiert eine Konfigurations-Datei
    ///
    /// ```
    /// # use whitelight_core::{Board, Configuration};
    /// let source = r#"
    ///     led_pin = 2
    ///     wifi_ssid = "home"
    ///     mqtt_host = "10.0.0.2"
    ///     mqtt_client_id = "ESP_WHITE_LED"
    ///     led_topic_state = "home/led"
    ///     led_topic_set = "home/led/set"
    /// "#;
    /// let config = Configuration::parse(source, Board::Esp8266).unwrap();
    /// assert_eq!(config.mqtt_port(), 1883);
    /// assert_eq!(config.mqtt_payload_on(), "ON");
    /// ```
    pub fn parse(source: &'a str, board: Board) -> Result<Self, ConfigError> {
        ConfigBuilder::new(board).load(source)?.build()
    }

    pub const fn board(&self) -> Board {
        self.board
    }

    pub const fn led_pin(&self) -> u8 {
        self.led_pin
    }

    pub const fn wifi_ssid(&self) -> &'a str {
        self.wifi_ssid
    }

    pub const fn wifi_password(&self) -> &'a str {
        self.wifi_password
    }

    pub const fn mqtt_host(&self) -> &'a str {
        self.mqtt_host
    }

    pub const fn mqtt_port(&self) -> u16 {
        self.mqtt_port
    }

    pub const fn mqtt_user(&self) -> &'a str {
        self.mqtt_user
    }

    pub const fn mqtt_pass(&self) -> &'a str {
        self.mqtt_pass
    }

    pub const fn mqtt_client_id(&self) -> &'a str {
        self.mqtt_client_id
    }

    /// Default-Übergangszeit in Sekunden
    pub const fn default_transition_time(&self) -> u32 {
        self.default_transition_time
    }

    pub const fn led_topic_state(&self) -> &'a str {
        self.led_topic_state
    }

    pub const fn led_topic_set(&self) -> &'a str {
        self.led_topic_set
    }

    pub const fn mqtt_payload_on(&self) -> &'a str {
        self.mqtt_payload_on
    }

    pub const fn mqtt_payload_off(&self) -> &'a str {
        self.mqtt_payload_off
    }

    /// Default-Blinkdauer in Sekunden
    pub const fn default_flash_length(&self) -> u32 {
        self.default_flash_length
    }

    pub const fn colorfade_time_slow(&self) -> u32 {
        self.colorfade_time_slow
    }

    pub const fn colorfade_time_fast(&self) -> u32 {
        self.colorfade_time_fast
    }

    pub const fn invert_led_logic(&self) -> bool {
        self.invert_led_logic
    }

    pub const fn led_builtin_mode(&self) -> LedBuiltinMode {
        self.led_builtin_mode
    }

    pub const fn debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// MQTT Zugangsdaten, `None` bei leerem `mqtt_user` (keine Authentifizierung)
    pub fn mqtt_credentials(&self) -> Option<(&'a str, &'a str)> {
        (!self.mqtt_user.is_empty()).then_some((self.mqtt_user, self.mqtt_pass))
    }

    pub const fn topics(&self) -> Topics<'a> {
        Topics {
            state: self.led_topic_state,
            set: self.led_topic_set,
        }
    }

    pub const fn payloads(&self) -> Payloads<'a> {
        Payloads {
            on: self.mqtt_payload_on,
            off: self.mqtt_payload_off,
        }
    }

    pub const fn timings(&self) -> Timings {
        Timings {
            transition: secs(self.default_transition_time),
            flash_length: secs(self.default_flash_length),
            colorfade_slow: secs(self.colorfade_time_slow),
            colorfade_fast: secs(self.colorfade_time_fast),
        }
    }

    /// Wert eines Parameters im Datei-Format
    pub fn value(&self, key: Key) -> Value<'a> {
        match key {
            Key::LedPin => Value::Int(i64::from(self.led_pin)),
            Key::WifiSsid => Value::Str(self.wifi_ssid),
            Key::WifiPassword => Value::Str(self.wifi_password),
            Key::MqttHost => Value::Str(self.mqtt_host),
            Key::MqttPort => Value::Int(i64::from(self.mqtt_port)),
            Key::MqttUser => Value::Str(self.mqtt_user),
            Key::MqttPass => Value::Str(self.mqtt_pass),
            Key::MqttClientId => Value::Str(self.mqtt_client_id),
            Key::DefaultTransitionTime => Value::Int(i64::from(self.default_transition_time)),
            Key::LedTopicState => Value::Str(self.led_topic_state),
            Key::LedTopicSet => Value::Str(self.led_topic_set),
            Key::MqttPayloadOn => Value::Str(self.mqtt_payload_on),
            Key::MqttPayloadOff => Value::Str(self.mqtt_payload_off),
            Key::DefaultFlashLength => Value::Int(i64::from(self.default_flash_length)),
            Key::ColorfadeTimeSlow => Value::Int(i64::from(self.colorfade_time_slow)),
            Key::ColorfadeTimeFast => Value::Int(i64::from(self.colorfade_time_fast)),
            Key::InvertLedLogic => Value::Bool(self.invert_led_logic),
            Key::LedBuiltinMode => Value::Int(self.led_builtin_mode.as_raw()),
            Key::DebugEnabled => Value::Bool(self.debug_enabled),
        }
    }

    /// Nicht-fatale Hinweise zur Konfiguration
    pub fn advisories(&self) -> impl Iterator<Item = Advisory> {
        let no_auth = self.mqtt_user.is_empty();
        [
            self.wifi_password.is_empty().then_some(Advisory::OpenWifi),
            no_auth.then_some(Advisory::NoMqttAuth),
            (no_auth && !self.mqtt_pass.is_empty()).then_some(Advisory::MqttPasswordWithoutUser),
        ]
        .into_iter()
        .flatten()
    }

    /// Schreibt die Konfiguration im kanonischen `key = value` Format
    ///
    /// Das Ergebnis lässt sich mit [`Configuration::parse`] wieder einlesen.
    pub fn render<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        for key in Key::ALL {
            writeln!(out, "{} = {}", key, self.value(key))?;
        }
        Ok(())
    }

    /// Prüft alle Invarianten
    ///
    /// Wird von [`ConfigBuilder::build`] aufgerufen, eine gebaute
    /// Configuration ist also immer gültig.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.board.is_pwm_capable(self.led_pin) {
            return Err(ConfigError::InvalidPin {
                pin: i64::from(self.led_pin),
                board: self.board,
            });
        }

        if self.mqtt_port == 0 {
            return Err(ConfigError::InvalidPort(0));
        }

        for key in [
            Key::WifiSsid,
            Key::MqttHost,
            Key::MqttClientId,
            Key::LedTopicState,
            Key::LedTopicSet,
            Key::MqttPayloadOn,
            Key::MqttPayloadOff,
        ] {
            if self.str_field(key).is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }

        for key in Key::ALL {
            if key.kind() == ValueKind::String
                && self.str_field(key).contains(['"', '\n', '\r'])
            {
                return Err(ConfigError::UnrepresentableValue(key));
            }
        }

        if self.wifi_ssid.len() > MAX_SSID_LEN {
            return Err(ConfigError::TooLong {
                key: Key::WifiSsid,
                max: MAX_SSID_LEN,
            });
        }

        let password_len = self.wifi_password.len();
        if password_len != 0
            && !(WPA2_PASSWORD_MIN_LEN..=WPA2_PASSWORD_MAX_LEN).contains(&password_len)
        {
            return Err(ConfigError::InvalidPasswordLength(password_len));
        }

        for key in [Key::LedTopicState, Key::LedTopicSet] {
            if self.str_field(key).contains(['+', '#', '\0']) {
                return Err(ConfigError::InvalidTopic(key));
            }
        }
        if self.led_topic_state == self.led_topic_set {
            return Err(ConfigError::DuplicateTopics);
        }

        if self.mqtt_payload_on == self.mqtt_payload_off {
            return Err(ConfigError::DuplicatePayloads);
        }

        if self.colorfade_time_fast == 0 || self.colorfade_time_slow < self.colorfade_time_fast {
            return Err(ConfigError::ColorfadeOrder {
                slow: self.colorfade_time_slow,
                fast: self.colorfade_time_fast,
            });
        }

        Ok(())
    }

    fn str_field(&self, key: Key) -> &'a str {
        match self.value(key) {
            Value::Str(s) => s,
            _ => "",
        }
    }
}

const fn secs(value: u32) -> Duration {
    Duration::from_secs(value as u64)
}

/// MQTT Topics des Lichts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Topics<'a> {
    /// Hier wird der Zustand published
    pub state: &'a str,
    /// Hier kommen Kommandos an
    pub set: &'a str,
}

/// Zeitvorgaben als [`Duration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    pub transition: Duration,
    pub flash_length: Duration,
    pub colorfade_slow: Duration,
    pub colorfade_fast: Duration,
}

/// Nicht-fatale Auffälligkeiten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advisory {
    /// Leeres WiFi-Passwort: offenes Netz
    OpenWifi,
    /// Leerer `mqtt_user`: Verbindung ohne Authentifizierung
    NoMqttAuth,
    /// `mqtt_pass` gesetzt aber kein `mqtt_user`, Passwort wird ignoriert
    MqttPasswordWithoutUser,
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Advisory::OpenWifi => "wifi_password is empty, joining an open network",
            Advisory::NoMqttAuth => "mqtt_user is empty, connecting without authentication",
            Advisory::MqttPasswordWithoutUser => "mqtt_pass is set without mqtt_user and is ignored",
        })
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Sammelt rohe Werte und baut daraus eine [`Configuration`]
///
/// Späteres Setzen überschreibt frühere Werte. So werden Provisioning-Overrides
/// (z.B. WiFi-Passwort aus `.env`) über die Datei gelegt.
#[derive(Debug, Clone)]
pub struct ConfigBuilder<'a> {
    board: Board,
    values: [Option<Value<'a>>; Key::COUNT],
}

impl<'a> ConfigBuilder<'a> {
    pub const fn new(board: Board) -> Self {
        Self {
            board,
            values: [None; Key::COUNT],
        }
    }

    /// Setzt einen Wert, der Typ muss zum Key passen
    pub fn set(&mut self, key: Key, value: Value<'a>) -> Result<&mut Self, ParseErrorKind> {
        if value.kind() != key.kind() {
            return Err(ParseErrorKind::WrongType {
                key,
                expected: key.kind(),
            });
        }
        self.values[key.index()] = Some(value);
        Ok(self)
    }

    /// Setzt einen Wert aus Text (z.B. einer Environment-Variable)
    ///
    /// Für String-Keys wird der Text unverändert übernommen, sonst als
    /// Literal geparst.
    pub fn set_raw(&mut self, key: Key, text: &'a str) -> Result<&mut Self, ParseErrorKind> {
        let value = match key.kind() {
            ValueKind::String => Value::Str(text),
            ValueKind::Integer | ValueKind::Boolean => parser::parse_literal(text.trim())?,
        };
        self.set(key, value)
    }

    /// Übernimmt alle Einträge einer Konfigurations-Datei
    pub fn load(&mut self, source: &'a str) -> Result<&mut Self, ParseError> {
        for entry in parser::entries(source) {
            let entry = entry?;
            self.set(entry.key, entry.value).map_err(|kind| ParseError {
                line: entry.line,
                kind,
            })?;
        }
        Ok(self)
    }

    /// Aktuell gesetzter Wert (ohne Defaults)
    pub fn get(&self, key: Key) -> Option<Value<'a>> {
        self.values[key.index()]
    }

    /// Setzt Defaults ein und validiert
    pub fn build(&self) -> Result<Configuration<'a>, ConfigError> {
        let config = Configuration {
            board: self.board,
            led_pin: self.pin()?,
            wifi_ssid: self.required_str(Key::WifiSsid)?,
            wifi_password: self.str_or(Key::WifiPassword, ""),
            mqtt_host: self.required_str(Key::MqttHost)?,
            mqtt_port: self.port()?,
            mqtt_user: self.str_or(Key::MqttUser, ""),
            mqtt_pass: self.str_or(Key::MqttPass, ""),
            mqtt_client_id: self.required_str(Key::MqttClientId)?,
            default_transition_time: self
                .seconds(Key::DefaultTransitionTime, DEFAULT_TRANSITION_TIME_SECS)?,
            led_topic_state: self.required_str(Key::LedTopicState)?,
            led_topic_set: self.required_str(Key::LedTopicSet)?,
            mqtt_payload_on: self.str_or(Key::MqttPayloadOn, DEFAULT_PAYLOAD_ON),
            mqtt_payload_off: self.str_or(Key::MqttPayloadOff, DEFAULT_PAYLOAD_OFF),
            default_flash_length: self.seconds(Key::DefaultFlashLength, DEFAULT_FLASH_LENGTH_SECS)?,
            colorfade_time_slow: self
                .seconds(Key::ColorfadeTimeSlow, DEFAULT_COLORFADE_TIME_SLOW_SECS)?,
            colorfade_time_fast: self
                .seconds(Key::ColorfadeTimeFast, DEFAULT_COLORFADE_TIME_FAST_SECS)?,
            invert_led_logic: self.bool_or(Key::InvertLedLogic, false),
            led_builtin_mode: LedBuiltinMode::try_from(
                self.int(Key::LedBuiltinMode)
                    .unwrap_or(LedBuiltinMode::Untouched.as_raw()),
            )?,
            debug_enabled: self.bool_or(Key::DebugEnabled, false),
        };
        config.validate()?;
        Ok(config)
    }

    fn str_value(&self, key: Key) -> Option<&'a str> {
        match self.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    fn int(&self, key: Key) -> Option<i64> {
        match self.get(key) {
            Some(Value::Int(v)) => Some(v),
            _ => None,
        }
    }

    fn required_str(&self, key: Key) -> Result<&'a str, ConfigError> {
        self.str_value(key).ok_or(ConfigError::Missing(key))
    }

    fn str_or(&self, key: Key, default: &'a str) -> &'a str {
        self.str_value(key).unwrap_or(default)
    }

    fn bool_or(&self, key: Key, default: bool) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => b,
            _ => default,
        }
    }

    fn seconds(&self, key: Key, default: u32) -> Result<u32, ConfigError> {
        let Some(value) = self.int(key) else {
            return Ok(default);
        };
        u32::try_from(value).map_err(|_| ConfigError::OutOfRange { key, value })
    }

    fn port(&self) -> Result<u16, ConfigError> {
        let Some(value) = self.int(Key::MqttPort) else {
            return Ok(DEFAULT_MQTT_PORT);
        };
        u16::try_from(value)
            .ok()
            .filter(|port| *port != 0)
            .ok_or(ConfigError::InvalidPort(value))
    }

    fn pin(&self) -> Result<u8, ConfigError> {
        let value = self.int(Key::LedPin).ok_or(ConfigError::Missing(Key::LedPin))?;
        u8::try_from(value)
            .ok()
            .filter(|pin| self.board.is_pwm_capable(*pin))
            .ok_or(ConfigError::InvalidPin {
                pin: value,
                board: self.board,
            })
    }
}
