// Projekt-Konfiguration: Konstanten und eingebettete Licht-Konfiguration

use whitelight_core::{Board, ConfigError, Configuration};

// ============================================================================
// Licht-Konfiguration (Build-Zeit)
// ============================================================================

/// Ziel-Board, muss zu `BOARD` in build.rs passen
pub const BOARD: Board = Board::Esp32c6;

/// Von build.rs validierte Konfiguration im kanonischen `key = value` Format
/// Quelle: light.conf (bzw. LIGHT_CONFIG) plus Overrides aus .env
pub const LIGHT_CONFIG_SOURCE: &str = include_str!(concat!(env!("OUT_DIR"), "/light.conf"));

/// Parst die eingebettete Konfiguration
///
/// Wird genau einmal beim Boot aufgerufen. build.rs hat die Datei bereits
/// geprüft, ein Fehler hier heißt: Binary und Build-Script passen nicht zusammen.
pub fn load() -> Result<Configuration<'static>, ConfigError> {
    Configuration::parse(LIGHT_CONFIG_SOURCE, BOARD)
}

// ============================================================================
// LED / PWM
// ============================================================================

/// LEDC PWM-Frequenz in kHz
/// 1 kHz flimmert nicht sichtbar und erlaubt 8 Bit Auflösung
pub const PWM_FREQUENCY_KHZ: u32 = 1;

/// Kapazität des Kommando-Channels (MQTT → Light Task)
pub const LIGHT_COMMAND_CAPACITY: usize = 4;

/// Maximale Anzahl Receiver für den Schaltzustand (nur MQTT)
pub const LIGHT_STATE_RECEIVERS: usize = 1;

// ============================================================================
// WiFi
// ============================================================================

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

/// Wartezeit nach WiFi-Fehler in Sekunden
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

// ============================================================================
// MQTT
// ============================================================================

/// MQTT Reconnect Delay in Sekunden
pub const MQTT_RECONNECT_DELAY_SECS: u64 = 5;

/// MQTT Keep-Alive in Sekunden
/// Ping wird nach der Hälfte der Zeit ohne Nachricht gesendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// MQTT Buffer-Größe in Bytes
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP Buffer-Größe (RX und TX) für die Broker-Verbindung
pub const MQTT_SOCKET_BUFFER_SIZE: usize = 4096;

/// DNS Query Timeout in Sekunden
pub const DNS_TIMEOUT_SECS: u64 = 10;
