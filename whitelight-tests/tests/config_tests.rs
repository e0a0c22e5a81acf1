//! Integration Tests für Konfigurations-Parser und Validierung
//!
//! Diese Tests laufen auf dem Host (x86_64) gegen die Beispiel-Dateien in `tests/data/`

use whitelight_core::{
    Advisory, Board, ConfigBuilder, ConfigError, Configuration, Key, LedBuiltinMode, ParseError,
    ParseErrorKind, Power, Value,
};

const SAMPLE_HEADER: &str = include_str!("data/config_sample.h");
const SAMPLE_CONF: &str = include_str!("data/light.conf");

/// Minimale gültige Konfiguration, Tests ändern einzelne Zeilen
const BASE: &str = r#"
led_pin = 2
wifi_ssid = "home"
mqtt_host = "broker.local"
mqtt_client_id = "ESP_WHITE_LED"
led_topic_state = "home/led"
led_topic_set = "home/led/set"
"#;

fn build_with(extra: &str) -> Result<Configuration<'static>, ConfigError> {
    // Überschreibungen hängen hinten an, spätere Werte gewinnen
    let source: &'static str = Box::leak(format!("{BASE}{extra}\n").into_boxed_str());
    Configuration::parse(source, Board::Esp8266)
}

// ============================================================================
// Tests: Beispiel-Dateien
// ============================================================================

#[test]
fn test_sample_header_round_trip() {
    let config = Configuration::parse(SAMPLE_HEADER, Board::Esp8266).unwrap();

    assert_eq!(config.led_pin(), 2);
    assert_eq!(config.wifi_ssid(), "{Wifi-SSID}}");
    assert_eq!(config.wifi_password(), "{Wifi-Password}");
    assert_eq!(config.mqtt_host(), "{mqtt-ip}");
    assert_eq!(config.mqtt_port(), 1883);
    assert_eq!(config.mqtt_user(), "{user}");
    assert_eq!(config.mqtt_pass(), "{password}");
    assert_eq!(config.mqtt_client_id(), "ESP_WHITE_LED");
    assert_eq!(config.default_transition_time(), 1);
    assert_eq!(config.led_topic_state(), "home/pokoj/postel/led");
    assert_eq!(config.led_topic_set(), "home/pokoj/postel/led/set");
    assert_eq!(config.mqtt_payload_on(), "ON");
    assert_eq!(config.mqtt_payload_off(), "OFF");
    assert_eq!(config.default_flash_length(), 2);
    assert_eq!(config.colorfade_time_slow(), 10);
    assert_eq!(config.colorfade_time_fast(), 3);
    assert!(!config.invert_led_logic());
    assert_eq!(config.led_builtin_mode(), LedBuiltinMode::High);
    assert!(!config.debug_enabled());
}

#[test]
fn test_sample_conf_canonical_format() {
    let config = Configuration::parse(SAMPLE_CONF, Board::Esp32c6).unwrap();

    assert_eq!(config.led_pin(), 4);
    assert_eq!(config.mqtt_port(), 8883);
    assert_eq!(config.payloads().encode(Power::On), "an");
    assert_eq!(config.payloads().decode(b"aus"), Ok(Power::Off));
    assert!(config.invert_led_logic());
    assert_eq!(config.led_builtin_mode(), LedBuiltinMode::Untouched);
    assert!(config.debug_enabled());
    // Nicht gesetzt: Defaults
    assert_eq!(config.default_transition_time(), 1);
    assert_eq!(config.mqtt_credentials(), None);
}

#[test]
fn test_render_reparses_to_same_configuration() {
    let config = Configuration::parse(SAMPLE_HEADER, Board::Esp8266).unwrap();

    let mut rendered = String::new();
    config.render(&mut rendered).unwrap();
    assert!(rendered.contains("mqtt_port = 1883\n"));
    assert!(rendered.contains("led_builtin_mode = 1\n"));
    assert!(rendered.contains("wifi_ssid = \"{Wifi-SSID}}\"\n"));

    let reparsed = Configuration::parse(&rendered, Board::Esp8266).unwrap();
    assert_eq!(reparsed, config);
}

#[test]
fn test_value_accessor_matches_fields() {
    let config = Configuration::parse(SAMPLE_HEADER, Board::Esp8266).unwrap();
    assert_eq!(config.value(Key::MqttPort), Value::Int(1883));
    assert_eq!(config.value(Key::InvertLedLogic), Value::Bool(false));
    assert_eq!(config.value(Key::LedTopicSet), Value::Str("home/pokoj/postel/led/set"));
    assert_eq!(config.value(Key::LedBuiltinMode), Value::Int(1));
}

#[test]
fn test_topics_and_credentials() {
    let config = Configuration::parse(SAMPLE_HEADER, Board::Esp8266).unwrap();
    let topics = config.topics();
    assert_eq!(topics.state, "home/pokoj/postel/led");
    assert_eq!(topics.set, "home/pokoj/postel/led/set");
    assert_eq!(config.mqtt_credentials(), Some(("{user}", "{password}")));
    assert_eq!(config.advisories().count(), 0);
}

// ============================================================================
// Tests: Provisioning-Overrides
// ============================================================================

#[test]
fn test_overrides_replace_file_values() {
    let mut builder = ConfigBuilder::new(Board::Esp8266);
    builder.load(SAMPLE_HEADER).unwrap();
    builder
        .set_raw(Key::WifiSsid, "Gartenhaus")
        .unwrap()
        .set_raw(Key::MqttPort, " 1884 ")
        .unwrap()
        .set_raw(Key::DebugEnabled, "true")
        .unwrap();

    let config = builder.build().unwrap();
    assert_eq!(config.wifi_ssid(), "Gartenhaus");
    assert_eq!(config.mqtt_port(), 1884);
    assert!(config.debug_enabled());
    // Rest bleibt aus der Datei
    assert_eq!(config.mqtt_client_id(), "ESP_WHITE_LED");
}

#[test]
fn test_override_with_invalid_literal() {
    let mut builder = ConfigBuilder::new(Board::Esp8266);
    assert_eq!(
        builder.set_raw(Key::MqttPort, "eighteen").unwrap_err(),
        ParseErrorKind::InvalidLiteral
    );
    assert_eq!(builder.get(Key::MqttPort), None);
}

#[test]
fn test_override_with_quote_is_rejected() {
    let mut builder = ConfigBuilder::new(Board::Esp8266);
    builder.load(BASE).unwrap();
    builder.set_raw(Key::WifiPassword, "pass\"word1").unwrap();
    assert_eq!(
        builder.build(),
        Err(ConfigError::UnrepresentableValue(Key::WifiPassword))
    );
}

// ============================================================================
// Tests: Validierung
// ============================================================================

#[test]
fn test_base_is_valid() {
    let config = build_with("").unwrap();
    assert_eq!(
        config.advisories().collect::<Vec<_>>(),
        vec![Advisory::OpenWifi, Advisory::NoMqttAuth]
    );
}

#[test]
fn test_empty_required_strings() {
    for (line, key) in [
        ("wifi_ssid = \"\"", Key::WifiSsid),
        ("mqtt_host = \"\"", Key::MqttHost),
        ("mqtt_client_id = \"\"", Key::MqttClientId),
        ("led_topic_state = \"\"", Key::LedTopicState),
        ("led_topic_set = \"\"", Key::LedTopicSet),
        ("mqtt_payload_on = \"\"", Key::MqttPayloadOn),
    ] {
        assert_eq!(build_with(line), Err(ConfigError::Empty(key)), "{line}");
    }
}

#[test]
fn test_missing_led_pin() {
    let source = "wifi_ssid = \"x\"";
    assert_eq!(
        Configuration::parse(source, Board::Esp8266),
        Err(ConfigError::Missing(Key::LedPin))
    );
}

#[test]
fn test_ssid_length_limit() {
    let ok = format!("wifi_ssid = \"{}\"", "a".repeat(32));
    assert!(build_with(&ok).is_ok());

    let too_long = format!("wifi_ssid = \"{}\"", "a".repeat(33));
    assert_eq!(
        build_with(&too_long),
        Err(ConfigError::TooLong {
            key: Key::WifiSsid,
            max: 32
        })
    );
}

#[test]
fn test_wpa2_password_length() {
    assert!(build_with("wifi_password = \"\"").is_ok());
    assert!(build_with("wifi_password = \"12345678\"").is_ok());
    assert!(build_with(&format!("wifi_password = \"{}\"", "p".repeat(63))).is_ok());

    assert_eq!(
        build_with("wifi_password = \"1234567\""),
        Err(ConfigError::InvalidPasswordLength(7))
    );
    assert_eq!(
        build_with(&format!("wifi_password = \"{}\"", "p".repeat(64))),
        Err(ConfigError::InvalidPasswordLength(64))
    );
}

#[test]
fn test_port_out_of_range() {
    assert_eq!(build_with("mqtt_port = 0"), Err(ConfigError::InvalidPort(0)));
    assert_eq!(
        build_with("mqtt_port = 70000"),
        Err(ConfigError::InvalidPort(70000))
    );
}

#[test]
fn test_builtin_mode_rejects_other_values() {
    assert!(build_with("led_builtin_mode = -1").is_ok());
    assert!(build_with("led_builtin_mode = 0").is_ok());
    assert_eq!(
        build_with("led_builtin_mode = 2"),
        Err(ConfigError::InvalidBuiltinMode(2))
    );
    assert_eq!(
        build_with("led_builtin_mode = -2"),
        Err(ConfigError::InvalidBuiltinMode(-2))
    );
}

#[test]
fn test_pin_must_be_pwm_capable() {
    assert_eq!(
        build_with("led_pin = 16"),
        Err(ConfigError::InvalidPin {
            pin: 16,
            board: Board::Esp8266
        })
    );
    assert_eq!(
        build_with("led_pin = 300"),
        Err(ConfigError::InvalidPin {
            pin: 300,
            board: Board::Esp8266
        })
    );

    // GPIO16 ist auf dem ESP32-C6 ein normaler LEDC-Ausgang
    let source: &'static str = Box::leak(format!("{BASE}led_pin = 16\n").into_boxed_str());
    assert_eq!(
        Configuration::parse(source, Board::Esp32c6).unwrap().led_pin(),
        16
    );
}

#[test]
fn test_esp32c6_rejects_usb_jtag_pins() {
    for pin in [12, 13] {
        let source: &'static str =
            Box::leak(format!("{BASE}led_pin = {pin}\n").into_boxed_str());
        assert_eq!(
            Configuration::parse(source, Board::Esp32c6),
            Err(ConfigError::InvalidPin {
                pin,
                board: Board::Esp32c6
            })
        );
    }
}

#[test]
fn test_colorfade_order() {
    assert!(build_with("colorfade_time_slow = 3\ncolorfade_time_fast = 3").is_ok());
    assert_eq!(
        build_with("colorfade_time_slow = 2\ncolorfade_time_fast = 3"),
        Err(ConfigError::ColorfadeOrder { slow: 2, fast: 3 })
    );
    assert_eq!(
        build_with("colorfade_time_fast = 0"),
        Err(ConfigError::ColorfadeOrder { slow: 10, fast: 0 })
    );
}

#[test]
fn test_topics_must_differ_and_have_no_wildcards() {
    assert_eq!(
        build_with("led_topic_set = \"home/led\""),
        Err(ConfigError::DuplicateTopics)
    );
    assert_eq!(
        build_with("led_topic_set = \"home/+/set\""),
        Err(ConfigError::InvalidTopic(Key::LedTopicSet))
    );
    assert_eq!(
        build_with("led_topic_state = \"home/#\""),
        Err(ConfigError::InvalidTopic(Key::LedTopicState))
    );
}

#[test]
fn test_payloads_must_differ() {
    assert_eq!(
        build_with("mqtt_payload_off = \"ON\""),
        Err(ConfigError::DuplicatePayloads)
    );
}

#[test]
fn test_parse_errors_are_wrapped() {
    assert_eq!(
        build_with("brightness = 255"),
        Err(ConfigError::Parse(ParseError {
            line: 8,
            kind: ParseErrorKind::UnknownKey
        }))
    );
}

#[test]
fn test_error_messages() {
    assert_eq!(
        ConfigError::InvalidPort(0).to_string(),
        "mqtt_port 0 is outside 1..=65535"
    );
    assert_eq!(
        ConfigError::Empty(Key::MqttHost).to_string(),
        "`mqtt_host` must not be empty"
    );
    let parse = ConfigError::Parse(ParseError {
        line: 3,
        kind: ParseErrorKind::UnterminatedString,
    });
    assert_eq!(parse.to_string(), "line 3: unterminated string literal");
}
