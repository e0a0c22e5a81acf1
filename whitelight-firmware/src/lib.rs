// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod diag;
pub mod hal;
pub mod tasks;

// Re-exports von whitelight-core
pub use whitelight_core::{Configuration, LedBuiltinMode, Power, WhiteLed};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::watch;

use crate::config::{LIGHT_COMMAND_CAPACITY, LIGHT_STATE_RECEIVERS};

/// Geteilte, unveränderliche Konfiguration
/// Liegt in einer StaticCell und wird per Referenz an alle Tasks übergeben
pub type SharedConfig = &'static Configuration<'static>;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================

/// Channel für Schalt-Kommandos (MQTT → Light Task)
pub type LightCommandChannel = Channel<NoopRawMutex, Power, LIGHT_COMMAND_CAPACITY>;

/// Sender für Schalt-Kommandos
pub type LightCommandSender = Sender<'static, NoopRawMutex, Power, LIGHT_COMMAND_CAPACITY>;

/// Receiver für Schalt-Kommandos (Light Task empfängt)
pub type LightCommandReceiver = Receiver<'static, NoopRawMutex, Power, LIGHT_COMMAND_CAPACITY>;

/// Aktueller Schaltzustand (Light Task → MQTT)
/// Watch statt Channel: der MQTT Task braucht nach jedem Reconnect den letzten Wert
pub type LightStateWatch = watch::Watch<NoopRawMutex, Power, LIGHT_STATE_RECEIVERS>;

/// Sender für den Schaltzustand (Light Task sendet)
pub type LightStateSender = watch::Sender<'static, NoopRawMutex, Power, LIGHT_STATE_RECEIVERS>;

/// Receiver für den Schaltzustand
pub type LightStateReceiver = watch::Receiver<'static, NoopRawMutex, Power, LIGHT_STATE_RECEIVERS>;
