//! Board-Beschreibung: welche GPIOs PWM können

use core::fmt;

/// Unterstützte Ziel-Boards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Board {
    /// ESP8266 (z.B. Wemos D1 Mini)
    Esp8266,
    /// ESP32-C6 (DevKitC-1)
    Esp32c6,
}

impl Board {
    pub const fn name(self) -> &'static str {
        match self {
            Board::Esp8266 => "ESP8266",
            Board::Esp32c6 => "ESP32-C6",
        }
    }

    /// Prüft ob ein GPIO als PWM-Ausgang nutzbar ist
    ///
    /// - ESP8266: GPIO6-11 hängen am SPI-Flash, GPIO16 hat kein PWM
    /// - ESP32-C6: GPIO24-30 hängen am SPI-Flash, GPIO12/13 sind USB-Serial-JTAG
    ///   (Log-Ausgabe und Flashen), LEDC geht auf allen anderen
    pub const fn is_pwm_capable(self, pin: u8) -> bool {
        match self {
            Board::Esp8266 => matches!(pin, 0..=5 | 12..=15),
            Board::Esp32c6 => matches!(pin, 0..=11 | 14..=23),
        }
    }

    /// GPIO der eingebauten LED
    pub const fn builtin_led_pin(self) -> u8 {
        match self {
            Board::Esp8266 => 2,
            Board::Esp32c6 => 8,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_esp8266_flash_pins_rejected() {
        for pin in 6..=11 {
            assert!(!Board::Esp8266.is_pwm_capable(pin));
        }
        assert!(!Board::Esp8266.is_pwm_capable(16));
        assert!(Board::Esp8266.is_pwm_capable(2));
        assert!(Board::Esp8266.is_pwm_capable(15));
    }

    #[test]
    fn test_esp32c6_usb_jtag_pins_rejected() {
        assert!(!Board::Esp32c6.is_pwm_capable(12));
        assert!(!Board::Esp32c6.is_pwm_capable(13));
    }

    #[test]
    fn test_esp32c6_pins() {
        assert!(Board::Esp32c6.is_pwm_capable(0));
        assert!(Board::Esp32c6.is_pwm_capable(23));
        assert!(!Board::Esp32c6.is_pwm_capable(24));
        assert!(Board::Esp32c6.is_pwm_capable(11));
        assert!(Board::Esp32c6.is_pwm_capable(14));
        assert!(!Board::Esp32c6.is_pwm_capable(200));
    }
}
