//! Gate output over an ESP-IDF pin driver.

use esp_idf_svc::hal::gpio::{AnyOutputPin, Output, OutputPin, PinDriver};
use esp_idf_svc::sys::EspError;
use log::error;
use mosfet_core::{DigitalOutput, Level};

/// The GPIO wired to the MOSFET gate. High is asserted.
pub struct GatePin {
    driver: PinDriver<'static, AnyOutputPin, Output>,
}

impl GatePin {
    /// Configure `pin` as a push-pull output.
    pub fn new(pin: impl OutputPin) -> Result<Self, EspError> {
        Ok(Self {
            driver: PinDriver::output(pin.downgrade_output())?,
        })
    }
}

impl DigitalOutput for GatePin {
    fn write(&mut self, level: Level) {
        let result = match level {
            Level::Asserted => self.driver.set_high(),
            Level::Deasserted => self.driver.set_low(),
        };
        if let Err(e) = result {
            error!("Failed to drive gate {}: {}", level, e);
        }
    }
}
