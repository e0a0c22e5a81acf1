//! Hardware-nahe Logik über `embedded-hal` Traits
//!
//! Die Funktionen hier kennen keine konkrete HAL. Auf dem Target stecken
//! esp-hal Typen dahinter, in den Tests Mocks.
//!
//! - Helligkeit: [`SetDutyCycle`] (LEDC Kanal auf dem ESP32-C6)
//! - eingebaute LED: [`OutputPin`]

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::config::Configuration;
use crate::logic::{MAX_BRIGHTNESS, duty_level, power_brightness};
use crate::types::{LedBuiltinMode, Power};

impl LedBuiltinMode {
    /// Setzt den Pin der eingebauten LED gemäß Modus
    ///
    /// `Low`/`High` schreiben genau einmal, `Untouched` schreibt nie.
    /// Danach wird der Pin von der Firmware nicht mehr angefasst.
    pub fn apply<P: OutputPin>(self, pin: &mut P) -> Result<(), P::Error> {
        match self {
            LedBuiltinMode::Untouched => Ok(()),
            LedBuiltinMode::Low => pin.set_low(),
            LedBuiltinMode::High => pin.set_high(),
        }
    }
}

/// Einkanalige weiße LED an einem PWM-Ausgang
///
/// Hält die logische Helligkeit (0-255) und rechnet beim Schreiben die
/// Invertierung ein.
pub struct WhiteLed<P> {
    pwm: P,
    invert: bool,
    brightness: u8,
}

impl<P: SetDutyCycle> WhiteLed<P> {
    /// Erstellt den Treiber und schaltet die LED aus
    pub fn new(pwm: P, invert: bool) -> Result<Self, P::Error> {
        let mut led = Self {
            pwm,
            invert,
            brightness: 0,
        };
        led.set_brightness(0)?;
        Ok(led)
    }

    /// Erstellt den Treiber mit `invert_led_logic` aus der Konfiguration
    pub fn from_config(pwm: P, config: &Configuration<'_>) -> Result<Self, P::Error> {
        Self::new(pwm, config.invert_led_logic())
    }

    /// Setzt die logische Helligkeit (0 = aus, 255 = maximal)
    pub fn set_brightness(&mut self, brightness: u8) -> Result<(), P::Error> {
        let duty = duty_level(brightness, self.invert);
        self.pwm
            .set_duty_cycle_fraction(u16::from(duty), u16::from(MAX_BRIGHTNESS))?;
        self.brightness = brightness;
        Ok(())
    }

    /// Schaltet ein (volle Helligkeit) oder aus
    pub fn set_power(&mut self, power: Power) -> Result<(), P::Error> {
        self.set_brightness(power_brightness(power))
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn power(&self) -> Power {
        if self.brightness > 0 {
            Power::On
        } else {
            Power::Off
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    /// Gibt den PWM-Kanal zurück
    pub fn into_inner(self) -> P {
        self.pwm
    }
}
