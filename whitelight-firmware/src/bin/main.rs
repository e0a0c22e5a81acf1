// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Logging
use defmt::{Display2Format, error, info, warn};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use whitelight_firmware::config::{self, EXTRA_HEAP_SIZE, WIFI_HEAP_SIZE};
use whitelight_firmware::hal::{BuiltinLed, init_builtin_led, init_led_pwm};
use whitelight_firmware::tasks::{connection_task, dhcp_task, light_task, mqtt_task, net_task};
use whitelight_firmware::{Configuration, LightCommandChannel, LightStateWatch, diag};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Lädt die Licht-Konfiguration, initialisiert Hardware und WiFi,
/// startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let hal_config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(hal_config);

    // Licht-Konfiguration parsen, bei Fehler sofort abbrechen
    // Liegt in einer StaticCell, alle Tasks bekommen &'static Configuration
    static LIGHT_CONFIG: static_cell::StaticCell<Configuration<'static>> =
        static_cell::StaticCell::new();
    let light_config = match config::load() {
        Ok(light_config) => &*LIGHT_CONFIG.init(light_config),
        Err(e) => {
            error!("Config: invalid light configuration: {}", e);
            panic!("invalid light configuration");
        }
    };
    info!(
        "Config: client '{}', LED on GPIO{}, broker {}:{}",
        light_config.mqtt_client_id(),
        light_config.led_pin(),
        light_config.mqtt_host(),
        light_config.mqtt_port()
    );
    for advisory in light_config.advisories() {
        warn!("Config: {}", Display2Format(&advisory));
    }
    diag!(
        light_config,
        "Config: topics state='{}' set='{}'",
        light_config.led_topic_state(),
        light_config.led_topic_set()
    );

    // Eingebaute LED zuerst setzen, der Ausgang muss bis zum Ende leben
    static BUILTIN_LED: static_cell::StaticCell<Option<BuiltinLed>> =
        static_cell::StaticCell::new();
    BUILTIN_LED.init(init_builtin_led(light_config));

    // LEDC PWM für die weiße LED
    let pwm = match init_led_pwm(peripherals.LEDC, light_config) {
        Ok(pwm) => pwm,
        Err(e) => {
            error!("LED: PWM setup failed: {}", e);
            panic!("PWM setup failed");
        }
    };

    // Heap Allocator initialisieren (WiFi braucht dynamischen Speicher!)
    // Zwei Bereiche: reclaimed RAM (64 KB) + extra (36 KB) = 100 KB total
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // WiFi Hardware initialisieren
    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init =
        RADIO_INIT.init(esp_radio::init().expect("Failed to initialize Wi-Fi/BLE controller"));

    let (wifi_controller, wifi_interface) =
        esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default())
            .expect("Failed to initialize Wi-Fi");

    // Netzwerk-Stack erstellen
    // Random seed für TCP/IP Stack (von Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    // Static resources für embassy-net
    // 3 Sockets: MQTT (1) + DNS (1) + DHCP (1)
    static RESOURCES: static_cell::StaticCell<StackResources<3>> = static_cell::StaticCell::new();
    let resources = RESOURCES.init(StackResources::new());

    // embassy-net erstellt Stack + Runner (nutzt STA interface für Client-Modus)
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        resources,
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    // Kommando-Channel erstellen (MQTT → Light)
    static COMMAND_CHANNEL: static_cell::StaticCell<LightCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = &*COMMAND_CHANNEL.init(LightCommandChannel::new());

    // Zustands-Watch erstellen (Light → MQTT)
    static STATE_WATCH: static_cell::StaticCell<LightStateWatch> = static_cell::StaticCell::new();
    let state_watch = &*STATE_WATCH.init(LightStateWatch::new());
    let state_receiver = state_watch
        .receiver()
        .expect("state watch has a receiver slot for MQTT");

    // Spawn Light Task
    spawner
        .spawn(light_task(
            pwm,
            light_config,
            command_channel.receiver(),
            state_watch.sender(),
        ))
        .unwrap();

    // Spawn WiFi Tasks
    spawner
        .spawn(connection_task(wifi_controller, light_config))
        .unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    // Spawn MQTT Task
    spawner
        .spawn(mqtt_task(
            stack,
            light_config,
            command_channel.sender(),
            state_receiver,
        ))
        .unwrap();

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
