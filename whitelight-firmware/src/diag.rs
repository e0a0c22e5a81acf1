// Diagnose-Ausgaben, geschaltet über `debug_enabled`

/// Wie `defmt::debug!`, aber nur wenn `debug_enabled` in der Konfiguration gesetzt ist
///
/// ```ignore
/// diag!(config, "MQTT: payload {} bytes", payload.len());
/// ```
#[macro_export]
macro_rules! diag {
    ($config:expr, $($arg:tt)+) => {
        if $config.debug_enabled() {
            defmt::debug!($($arg)+);
        }
    };
}
