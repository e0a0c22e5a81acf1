// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (MQTT → Light, Light → MQTT).

pub mod light;
pub mod mqtt;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use light::{light_logic, light_task};
pub use mqtt::mqtt_task;
pub use wifi::{connection_task, dhcp_task, net_task};
