// Build-Script: Wird vor dem Kompilieren ausgeführt
// Validiert die Licht-Konfiguration und konfiguriert den Linker für ESP32-C6

use std::{env, fs, path::PathBuf};

use whitelight_core::{Board, ConfigBuilder, Key};

/// Ziel-Board der Firmware (Pin-Prüfung)
const BOARD: Board = Board::Esp32c6;

/// Environment-Variablen, die einzelne Werte der Datei überschreiben
/// So müssen Secrets nicht in der Konfigurations-Datei stehen
const OVERRIDES: [(&str, Key); 7] = [
    ("WIFI_SSID", Key::WifiSsid),
    ("WIFI_PASSWORD", Key::WifiPassword),
    ("MQTT_HOST", Key::MqttHost),
    ("MQTT_PORT", Key::MqttPort),
    ("MQTT_USER", Key::MqttUser),
    ("MQTT_PASSWORD", Key::MqttPass),
    ("MQTT_CLIENT_ID", Key::MqttClientId),
];

fn main() {
    // Lade .env file für Provisioning-Overrides
    // Fehler ignorieren wenn .env nicht existiert (Datei allein reicht)
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=.env file not loaded ({}), using light config only", e);
    }

    bake_light_config();

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // 1. defmt.x - defmt Logging-Support
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Liest die Konfigurations-Datei, legt Overrides darüber, validiert und
/// schreibt das Ergebnis im kanonischen Format nach `$OUT_DIR/light.conf`
///
/// Die Firmware bindet diese Datei mit `include_str!` ein. Eine ungültige
/// Konfiguration bricht den Build ab.
fn bake_light_config() {
    let path = env::var("LIGHT_CONFIG").unwrap_or_else(|_| "light.conf".to_string());
    println!("cargo:rerun-if-env-changed=LIGHT_CONFIG");
    println!("cargo:rerun-if-changed={}", path);
    println!("cargo:rerun-if-changed=.env");

    let source = fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Light config '{}' not readable: {}\n\
             Copy light.conf.example to light.conf (or set LIGHT_CONFIG)",
            path, e
        )
    });

    // Werte zuerst einsammeln, der Builder leiht sie sich
    let overrides: Vec<(&str, Key, String)> = OVERRIDES
        .iter()
        .filter_map(|&(var, key)| {
            println!("cargo:rerun-if-env-changed={}", var);
            env::var(var).ok().map(|value| (var, key, value))
        })
        .collect();

    let mut builder = ConfigBuilder::new(BOARD);
    if let Err(e) = builder.load(&source) {
        panic!("{}: {}", path, e);
    }
    for (var, key, value) in &overrides {
        if let Err(e) = builder.set_raw(*key, value) {
            panic!("{} (override for `{}`): {}", var, key, e);
        }
    }

    let config = builder
        .build()
        .unwrap_or_else(|e| panic!("Invalid light config '{}': {}", path, e));

    for advisory in config.advisories() {
        println!("cargo:warning={}", advisory);
    }

    let mut rendered = String::new();
    config
        .render(&mut rendered)
        .expect("rendering into a String cannot fail");

    let out = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    fs::write(out.join("light.conf"), rendered).expect("failed to write light.conf to OUT_DIR");
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = env::args().collect();

    if args.len() > 2 {
        let kind = &args[1];
        let what = &args[2];

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                what if what.starts_with("_defmt_") => {
                    eprintln!();
                    eprintln!("💡 `defmt` not found - make sure `defmt.x` is added as a linker script");
                    eprintln!();
                }
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                what if what.starts_with("esp_rtos_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `esp-radio` has no scheduler enabled. Make sure you have initialized `esp-rtos`."
                    );
                    eprintln!();
                }
                "free" | "malloc" | "calloc" | "realloc_internal" | "free_internal" => {
                    eprintln!();
                    eprintln!("💡 Did you forget the `esp-alloc` dependency?");
                    eprintln!();
                }
                _ => (),
            },
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        env::current_exe()
            .expect("build script path is known")
            .display()
    );
}
