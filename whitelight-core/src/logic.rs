//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::error::CommandError;
use crate::types::Power;

/// Maximale logische Helligkeit
pub const MAX_BRIGHTNESS: u8 = 255;

/// Rechnet logische Helligkeit in physikalischen Duty-Cycle um
///
/// Bei invertierter LED-Logik (z.B. LED gegen VCC geschaltet) bedeutet
/// Duty 0 maximale Helligkeit.
///
/// # Beispiele
///
/// ```
/// # use whitelight_core::duty_level;
/// assert_eq!(duty_level(255, false), 255);
/// assert_eq!(duty_level(255, true), 0);   // invertiert: volle Helligkeit = Duty 0
/// assert_eq!(duty_level(0, true), 255);
/// ```
pub const fn duty_level(brightness: u8, invert: bool) -> u8 {
    if invert {
        MAX_BRIGHTNESS - brightness
    } else {
        brightness
    }
}

/// Helligkeit für einen Schaltzustand
pub const fn power_brightness(power: Power) -> u8 {
    match power {
        Power::On => MAX_BRIGHTNESS,
        Power::Off => 0,
    }
}

/// ON/OFF Payload-Vokabular für Set- und State-Topic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Payloads<'a> {
    pub on: &'a str,
    pub off: &'a str,
}

impl<'a> Payloads<'a> {
    /// Dekodiert ein empfangenes Payload
    ///
    /// Führende und folgende ASCII-Whitespaces werden ignoriert,
    /// sonst muss das Payload exakt passen.
    pub fn decode(&self, payload: &[u8]) -> Result<Power, CommandError> {
        let payload = payload.trim_ascii();
        if payload == self.on.as_bytes() {
            Ok(Power::On)
        } else if payload == self.off.as_bytes() {
            Ok(Power::Off)
        } else {
            Err(CommandError::UnknownPayload)
        }
    }

    /// Payload zum Publishen eines Zustands
    pub const fn encode(&self, power: Power) -> &'a str {
        match power {
            Power::On => self.on,
            Power::Off => self.off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOADS: Payloads<'static> = Payloads { on: "ON", off: "OFF" };

    #[test]
    fn test_duty_level_normal() {
        assert_eq!(duty_level(0, false), 0);
        assert_eq!(duty_level(128, false), 128);
        assert_eq!(duty_level(255, false), 255);
    }

    #[test]
    fn test_duty_level_inverted() {
        assert_eq!(duty_level(0, true), 255);
        assert_eq!(duty_level(128, true), 127);
        assert_eq!(duty_level(255, true), 0);
    }

    #[test]
    fn test_power_brightness() {
        assert_eq!(power_brightness(Power::On), 255);
        assert_eq!(power_brightness(Power::Off), 0);
    }

    #[test]
    fn test_decode_exact_and_trimmed() {
        assert_eq!(PAYLOADS.decode(b"ON"), Ok(Power::On));
        assert_eq!(PAYLOADS.decode(b"OFF\n"), Ok(Power::Off));
        assert_eq!(PAYLOADS.decode(b" ON "), Ok(Power::On));
    }

    #[test]
    fn test_decode_rejects_other_payloads() {
        assert_eq!(PAYLOADS.decode(b"on"), Err(CommandError::UnknownPayload));
        assert_eq!(PAYLOADS.decode(b""), Err(CommandError::UnknownPayload));
        assert_eq!(
            PAYLOADS.decode(br#"{"state":"ON"}"#),
            Err(CommandError::UnknownPayload)
        );
    }

    #[test]
    fn test_encode_decode_cycle() {
        for power in [Power::On, Power::Off] {
            let payload = PAYLOADS.encode(power);
            assert_eq!(PAYLOADS.decode(payload.as_bytes()), Ok(power));
        }
    }
}
