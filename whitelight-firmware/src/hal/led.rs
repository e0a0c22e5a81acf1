// LED Peripherie: LEDC PWM-Kanal für die weiße LED und GPIO der eingebauten LED

use defmt::{info, warn};
use esp_hal::gpio::{AnyPin, Level, Output, OutputConfig};
use esp_hal::ledc::channel::{self, ChannelIFace};
use esp_hal::ledc::timer::{self, TimerIFace};
use esp_hal::ledc::{LSGlobalClkSource, Ledc, LowSpeed};
use esp_hal::peripherals::LEDC;
use esp_hal::time::Rate;
use static_cell::StaticCell;

use whitelight_core::{Configuration, LedBuiltinMode};

use crate::config::{BOARD, PWM_FREQUENCY_KHZ};

/// LEDC Kanal der weißen LED, implementiert `embedded_hal::pwm::SetDutyCycle`
pub type LedPwm = channel::Channel<'static, LowSpeed>;

/// GPIO der eingebauten LED, solange sie gesetzt bleiben soll
pub type BuiltinLed = Output<'static>;

/// Fehler bei der LEDC-Initialisierung
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum PwmInitError {
    Timer,
    Channel,
}

/// Konfiguriert LEDC Timer0 (8 Bit) und Channel0 auf `led_pin`
///
/// Der Kanal startet mit 0 % Duty. Die Invertierung rechnet erst
/// `WhiteLed` ein, der beim Erstellen sofort den Aus-Zustand schreibt.
pub fn init_led_pwm(
    ledc_peripheral: LEDC<'static>,
    config: &Configuration<'_>,
) -> Result<LedPwm, PwmInitError> {
    // Ledc und Timer müssen 'static sein, der Kanal hält eine Referenz auf den Timer
    static LEDC_CELL: StaticCell<Ledc<'static>> = StaticCell::new();
    static TIMER_CELL: StaticCell<timer::Timer<'static, LowSpeed>> = StaticCell::new();

    let ledc = LEDC_CELL.init(Ledc::new(ledc_peripheral));
    ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

    let lstimer = TIMER_CELL.init(ledc.timer::<LowSpeed>(timer::Number::Timer0));
    lstimer
        .configure(timer::config::Config {
            duty: timer::config::Duty::Duty8Bit,
            clock_source: timer::LSClockSource::APBClk,
            frequency: Rate::from_khz(PWM_FREQUENCY_KHZ),
        })
        .map_err(|_| PwmInitError::Timer)?;

    // SAFETY: Der Pin wurde zur Build-Zeit gegen `BOARD` geprüft (PWM-fähig,
    // kein Flash-Pin) und wird nirgends sonst als Peripherie verwendet.
    let pin = unsafe { AnyPin::steal(config.led_pin()) };

    let mut pwm = ledc.channel(channel::Number::Channel0, pin);
    pwm.configure(channel::config::Config {
        timer: &*lstimer,
        duty_pct: 0,
        pin_config: channel::config::PinConfig::PushPull,
    })
    .map_err(|_| PwmInitError::Channel)?;

    info!(
        "LED: PWM on GPIO{} at {} kHz (inverted: {})",
        config.led_pin(),
        PWM_FREQUENCY_KHZ,
        config.invert_led_logic()
    );
    Ok(pwm)
}

/// Setzt die eingebaute LED gemäß `led_builtin_mode`
///
/// Bei `Untouched` wird der Pin gar nicht erst als Ausgang konfiguriert.
/// Der zurückgegebene Ausgang muss am Leben bleiben, sonst fällt der Pin
/// beim Drop in den Reset-Zustand zurück.
pub fn init_builtin_led(config: &Configuration<'_>) -> Option<BuiltinLed> {
    let mode = config.led_builtin_mode();
    if mode == LedBuiltinMode::Untouched {
        return None;
    }

    let builtin_pin = BOARD.builtin_led_pin();
    if builtin_pin == config.led_pin() {
        warn!(
            "LED: builtin LED GPIO{} is the PWM pin, ignoring led_builtin_mode",
            builtin_pin
        );
        return None;
    }

    // SAFETY: Der Pin ist fest der eingebauten LED zugeordnet und nicht der PWM-Pin
    let pin = unsafe { AnyPin::steal(builtin_pin) };
    // Startpegel gleich dem Zielpegel, sonst flackert die LED kurz
    let initial = if mode == LedBuiltinMode::High {
        Level::High
    } else {
        Level::Low
    };
    let mut output = Output::new(pin, initial, OutputConfig::default());
    mode.apply(&mut output).unwrap_or_else(|e| match e {});

    info!("LED: builtin LED GPIO{} set to {}", builtin_pin, mode);
    Some(output)
}
