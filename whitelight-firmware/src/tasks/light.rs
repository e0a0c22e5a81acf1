// Light Task - Schaltet die weiße LED über LEDC PWM
use defmt::{error, info};
use embedded_hal::pwm::SetDutyCycle;

use whitelight_core::WhiteLed;

use crate::hal::LedPwm;
use crate::{LightCommandReceiver, LightStateSender, SharedConfig, diag};

/// Light Logic - Testbare Logik ohne esp-hal Abhängigkeit
///
/// Wartet auf Schalt-Kommandos, setzt die Helligkeit und meldet danach den
/// tatsächlichen Zustand. Der Zustand wird auch gemeldet, wenn das Schreiben
/// fehlschlägt, damit der MQTT Task nicht auf eine Antwort wartet, die nie kommt.
///
/// # Parameter
/// - `led`: Treiber über einem beliebigen `SetDutyCycle` Kanal
/// - `config`: geteilte Konfiguration (nur für Diagnose-Ausgaben)
/// - `commands`: Channel Receiver für Kommandos vom MQTT Task
/// - `state`: Watch Sender für den Schaltzustand
pub async fn light_logic<P: SetDutyCycle>(
    mut led: WhiteLed<P>,
    config: SharedConfig,
    commands: LightCommandReceiver,
    state: LightStateSender,
) -> ! {
    // Startzustand melden (LED ist nach `WhiteLed::new` aus)
    state.send(led.power());

    loop {
        let power = commands.receive().await;
        diag!(config, "Light: command {}", power);

        if led.set_power(power).is_err() {
            error!("Light: failed to write PWM duty");
        } else {
            info!("Light: switched {}", power);
        }

        state.send(led.power());
    }
}

/// Light Task - Embassy Task für parallele Ausführung
///
/// Erstellt den Treiber auf dem bereits konfigurierten LEDC Kanal und ruft
/// dann `light_logic()` auf. Schlägt das erste Schreiben fehl, gibt es
/// keinen gültigen Zustand und die Firmware hält an (panic).
#[embassy_executor::task]
pub async fn light_task(
    pwm: LedPwm,
    config: SharedConfig,
    commands: LightCommandReceiver,
    state: LightStateSender,
) {
    let led = match WhiteLed::from_config(pwm, config) {
        Ok(led) => led,
        Err(_) => {
            // Ohne Zustand wartet der MQTT Task ewig, also wie bei der PWM-Einrichtung abbrechen
            error!("Light: failed to initialise LED");
            panic!("LED initialisation failed");
        }
    };

    let timings = config.timings();
    diag!(
        config,
        "Light: transition {} ms, flash {} ms, colorfade {}/{} ms (not used by ON/OFF commands)",
        timings.transition.as_millis() as u64,
        timings.flash_length.as_millis() as u64,
        timings.colorfade_slow.as_millis() as u64,
        timings.colorfade_fast.as_millis() as u64
    );

    light_logic(led, config, commands, state).await
}

