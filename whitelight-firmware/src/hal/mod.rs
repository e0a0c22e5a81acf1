// Hardware Abstraction Layer (HAL) Module
//
// Initialisiert die esp-hal Peripherie. Die Ansteuerung selbst läuft über
// embedded-hal Traits (whitelight-core), damit sie auf dem Host testbar bleibt.

pub mod led;

pub use led::{BuiltinLed, LedPwm, PwmInitError, init_builtin_led, init_led_pwm};
