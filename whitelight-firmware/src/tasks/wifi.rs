// WiFi Task - Verbindet mit WLAN und managed Connection
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{
    AuthMethod, ClientConfig, ModeConfig, ScanConfig, WifiController, WifiDevice, WifiEvent,
};

use crate::config::WIFI_RETRY_DELAY_SECS;
use crate::{SharedConfig, diag};

/// WiFi Connection Task
///
/// Managed die WiFi-Verbindung:
/// - Verbindet mit Access Point
/// - Holt IP-Adresse via DHCP
/// - Überwacht Verbindung und reconnected bei Bedarf
///
/// Ein leeres `wifi_password` verbindet ohne Verschlüsselung.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>, config: SharedConfig) {
    info!("WiFi: Starting connection task");
    let ssid = config.wifi_ssid();

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            info!("WiFi: Configuring and starting...");

            // Configure WiFi station mode
            let client = ClientConfig::default().with_ssid(ssid.into());
            let client = if config.wifi_password().is_empty() {
                client.with_auth_method(AuthMethod::None)
            } else {
                client.with_password(config.wifi_password().into())
            };
            let client_config = ModeConfig::Client(client);

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }

            info!("WiFi: Started successfully");
        }

        // Scan for networks (nur mit debug_enabled, kostet einige Sekunden)
        if config.debug_enabled() {
            scan_for_target(&mut controller, config).await;
        }

        // Connect to AP
        info!("WiFi: Connecting to '{}'...", ssid);
        match controller.connect_async().await {
            Ok(_) => {
                info!("WiFi: Connected successfully!");
            }
            Err(e) => {
                error!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
                continue;
            }
        }

        // Wait for disconnect
        info!("WiFi: Waiting for disconnect event...");
        controller
            .wait_for_event(WifiEvent::StaDisconnected)
            .await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Sucht Access Points und meldet, ob die konfigurierte SSID dabei ist
async fn scan_for_target(controller: &mut WifiController<'static>, config: SharedConfig) {
    match controller
        .scan_with_config_async(ScanConfig::default())
        .await
    {
        Ok(ap_infos) => {
            diag!(config, "WiFi: Found {} access points", ap_infos.len());
            match ap_infos
                .iter()
                .find(|ap| ap.ssid.as_str() == config.wifi_ssid())
            {
                Some(ap) => diag!(
                    config,
                    "WiFi: Target AP found - SSID: {}, Signal: {} dBm",
                    config.wifi_ssid(),
                    ap.signal_strength
                ),
                None => warn!("WiFi: '{}' not found in scan", config.wifi_ssid()),
            }
        }
        Err(e) => {
            warn!("WiFi: Scan failed: {}", Debug2Format(&e));
        }
    }
}

/// Network Task
///
/// Überwacht den Netzwerk-Stack:
/// - Prozessiert Netzwerk-Pakete
/// - Managed TCP/IP Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// DHCP Monitor Task
///
/// Wartet bis eine IP-Adresse vom DHCP-Server erhalten wurde
/// und loggt dann die Netzwerk-Konfiguration
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }

    info!("WiFi: Link is up, waiting for IP address...");

    loop {
        if let Some(config) = stack.config_v4() {
            info!("WiFi: Got IP address!");
            info!("  IP:      {}", Debug2Format(&config.address.address()));
            info!("  Gateway: {}", Debug2Format(&config.gateway));
            info!("  DNS:     {}", Debug2Format(&config.dns_servers));
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}
