// MQTT Task - Empfängt Schalt-Kommandos und published den Zustand
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{IpAddress, Ipv4Address, Stack, dns::DnsQueryType, tcp::TcpSocket};
use embassy_time::{Duration, Timer, with_timeout};

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;

use whitelight_core::{Payloads, Power};

use crate::config::*;
use crate::{LightCommandSender, LightStateReceiver, SharedConfig, diag};

/// Maximale Anzahl MQTT Properties pro Paket
const MAX_PROPERTIES: usize = 5;

type Client<'a> = MqttClient<'a, TcpSocket<'a>, MAX_PROPERTIES, CountingRng>;

/// MQTT Task - läuft parallel zu anderen Tasks
///
/// Dieser Task übernimmt die komplette MQTT-Anbindung:
/// - Wartet auf Netzwerk-Verbindung
/// - Verbindet sich mit dem Broker (optional mit Benutzer/Passwort)
/// - Abonniert `led_topic_set`
/// - Leitet ON/OFF an den Light Task weiter
/// - Published den Zustand retained auf `led_topic_state`
/// - Automatisches Reconnect bei Fehlern
///
/// # Parameter
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `config`: geteilte Konfiguration
/// - `commands`: Channel Sender für Schalt-Kommandos
/// - `state`: Watch Receiver für den Schaltzustand
#[embassy_executor::task]
pub async fn mqtt_task(
    stack: &'static Stack<'static>,
    config: SharedConfig,
    commands: LightCommandSender,
    mut state: LightStateReceiver,
) {
    info!("MQTT: Task started, waiting for network...");
    wait_for_network(stack).await;
    info!("MQTT: Network ready");

    loop {
        match mqtt_session(stack, config, commands, &mut state).await {
            Ok(_) => warn!("MQTT: Connection closed normally"),
            Err(e) => error!("MQTT: Error: {}", e),
        }
        info!("MQTT: Reconnecting in {}s...", MQTT_RECONNECT_DELAY_SECS);
        Timer::after(Duration::from_secs(MQTT_RECONNECT_DELAY_SECS)).await;
    }
}

/// Wartet bis Netzwerk-Verbindung verfügbar ist
///
/// Prüft kontinuierlich Link-Status und DHCP-Konfiguration.
async fn wait_for_network(stack: &'static Stack<'static>) {
    loop {
        if stack.is_link_up() && stack.config_v4().is_some() {
            break;
        }
        Timer::after(Duration::from_millis(500)).await;
    }
}

/// Eine komplette Broker-Sitzung
///
/// 1. DNS-Auflösung von `mqtt_host`
/// 2. TCP-Verbindung auf `mqtt_port`
/// 3. MQTT CONNECT (mit Credentials, falls `mqtt_user` gesetzt)
/// 4. SUBSCRIBE auf `led_topic_set`, aktuellen Zustand publishen
/// 5. Kommandos empfangen, bei Leerlauf Pings senden
///
/// Bei jedem Fehler wird die Funktion beendet und der Haupt-Loop
/// startet automatisch einen Reconnect-Versuch.
async fn mqtt_session(
    stack: &'static Stack<'static>,
    config: SharedConfig,
    commands: LightCommandSender,
    state: &mut LightStateReceiver,
) -> Result<(), MqttError> {
    let topics = config.topics();
    let payloads = config.payloads();

    // DNS Lookup
    info!("MQTT: Resolving '{}'...", config.mqtt_host());
    let broker_ip = resolve_hostname(stack, config.mqtt_host()).await?;
    info!("MQTT: Resolved to {}", Debug2Format(&broker_ip));

    // TCP Connect
    let mut rx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut tx_buffer = [0u8; MQTT_SOCKET_BUFFER_SIZE];
    let mut socket = TcpSocket::new(*stack, &mut rx_buffer, &mut tx_buffer);
    socket.set_timeout(Some(Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS) * 2)));

    socket
        .connect((broker_ip, config.mqtt_port()))
        .await
        .map_err(|_| MqttError::ConnectionFailed)?;
    info!("MQTT: TCP connected to port {}", config.mqtt_port());

    // MQTT Client Configuration
    let rng = CountingRng(20000);
    let mut client_config = ClientConfig::<MAX_PROPERTIES, _>::new(MqttVersion::MQTTv5, rng);
    client_config.add_client_id(config.mqtt_client_id());
    if let Some((user, pass)) = config.mqtt_credentials() {
        client_config.add_username(user);
        client_config.add_password(pass);
    } else {
        diag!(config, "MQTT: connecting without authentication");
    }
    client_config.keep_alive = MQTT_KEEP_ALIVE_SECS;
    client_config.max_packet_size = MQTT_BUFFER_SIZE as u32;

    // MQTT Buffer
    let mut send_buffer = [0u8; MQTT_BUFFER_SIZE];
    let mut recv_buffer = [0u8; MQTT_BUFFER_SIZE];

    let mut client: Client<'_> = MqttClient::new(
        socket,
        &mut send_buffer,
        MQTT_BUFFER_SIZE,
        &mut recv_buffer,
        MQTT_BUFFER_SIZE,
        client_config,
    );

    // MQTT CONNECT
    client
        .connect_to_broker()
        .await
        .map_err(MqttError::Connect)?;
    info!("MQTT: Connected to broker as '{}'", config.mqtt_client_id());

    client
        .subscribe_to_topic(topics.set)
        .await
        .map_err(MqttError::Subscribe)?;
    info!("MQTT: Subscribed to '{}'", topics.set);

    // Zustand nach jedem Connect publishen (retained)
    let current = state.get().await;
    publish_state(&mut client, config, payloads, current).await?;

    // Ohne eingehende Nachricht nach halber Keep-Alive-Zeit pingen.
    // `receive_message` ist nicht cancel-safe: läuft der Timeout mitten in ein
    // Paket, ist der Stream danach kaputt. Der folgende Fehler beendet die
    // Sitzung und der Reconnect in `mqtt_task` stellt den Zustand wieder her
    // (retained State wird nach dem Connect erneut gepublisht).
    let idle = Duration::from_secs(u64::from(MQTT_KEEP_ALIVE_SECS) / 2);

    loop {
        let received = with_timeout(idle, client.receive_message()).await;

        let command = match received {
            Err(_) => {
                diag!(config, "MQTT: idle, sending ping");
                client.send_ping().await.map_err(MqttError::Ping)?;
                continue;
            }
            Ok(Err(code)) => return Err(MqttError::Receive(code)),
            Ok(Ok((topic, payload))) => {
                diag!(config, "MQTT: {} bytes on '{}'", payload.len(), topic);
                if topic != topics.set {
                    continue;
                }
                match payloads.decode(payload) {
                    Ok(power) => power,
                    Err(e) => {
                        warn!("MQTT: ignoring payload on '{}': {}", topics.set, e);
                        continue;
                    }
                }
            }
        };

        info!("MQTT: command {}", command);
        commands.send(command).await;

        // Light Task meldet den Zustand nach dem Schalten
        let power = state.changed().await;
        publish_state(&mut client, config, payloads, power).await?;
    }
}

/// Published den Zustand retained auf `led_topic_state`
async fn publish_state(
    client: &mut Client<'_>,
    config: SharedConfig,
    payloads: Payloads<'static>,
    power: Power,
) -> Result<(), MqttError> {
    let payload = payloads.encode(power);
    client
        .send_message(
            config.led_topic_state(),
            payload.as_bytes(),
            QualityOfService::QoS0,
            true,
        )
        .await
        .map_err(MqttError::Publish)?;

    info!("MQTT: Published '{}' to '{}'", payload, config.led_topic_state());
    Ok(())
}

/// Löst Hostname zu IPv4-Adresse auf
///
/// Nutzt embassy-net DNS-Stack mit konfigurierbarem Timeout.
/// IPv4-Literale (z.B. "192.168.1.10") werden direkt übernommen.
async fn resolve_hostname(
    stack: &'static Stack<'static>,
    hostname: &str,
) -> Result<Ipv4Address, MqttError> {
    if let Ok(ip) = hostname.parse::<Ipv4Address>() {
        return Ok(ip);
    }

    let result = with_timeout(
        Duration::from_secs(DNS_TIMEOUT_SECS),
        stack.dns_query(hostname, DnsQueryType::A),
    )
    .await;

    match result {
        Ok(Ok(addrs)) => addrs
            .iter()
            .find_map(|addr| match addr {
                IpAddress::Ipv4(ipv4) => Some(*ipv4),
                #[allow(unreachable_patterns)]
                _ => None,
            })
            .ok_or(MqttError::DnsResolutionFailed),
        Ok(Err(_)) => Err(MqttError::DnsResolutionFailed),
        Err(_) => Err(MqttError::DnsTimeout),
    }
}

/// MQTT Fehler-Typen
///
/// Alle möglichen Fehler die während einer Broker-Sitzung auftreten können.
/// Protokoll-Fehler tragen den Reason Code des Brokers bzw. der Library.
#[derive(Debug)]
enum MqttError {
    DnsResolutionFailed,
    DnsTimeout,
    ConnectionFailed,
    Connect(ReasonCode),
    Subscribe(ReasonCode),
    Receive(ReasonCode),
    Publish(ReasonCode),
    Ping(ReasonCode),
}

impl defmt::Format for MqttError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MqttError::DnsResolutionFailed => defmt::write!(fmt, "DNS failed"),
            MqttError::DnsTimeout => defmt::write!(fmt, "DNS timeout"),
            MqttError::ConnectionFailed => defmt::write!(fmt, "Connection failed"),
            MqttError::Connect(code) => {
                defmt::write!(fmt, "CONNECT rejected: {}", Debug2Format(code))
            }
            MqttError::Subscribe(code) => {
                defmt::write!(fmt, "SUBSCRIBE failed: {}", Debug2Format(code))
            }
            MqttError::Receive(code) => {
                defmt::write!(fmt, "Receive failed: {}", Debug2Format(code))
            }
            MqttError::Publish(code) => {
                defmt::write!(fmt, "Publish failed: {}", Debug2Format(code))
            }
            MqttError::Ping(code) => defmt::write!(fmt, "Ping failed: {}", Debug2Format(code)),
        }
    }
}
