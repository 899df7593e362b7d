//! ADS1115 microphone channel on the Linux I2C bus.

use anyhow::Context;
use linux_embedded_hal::{Delay, I2cdev};
use log::info;
use noise_common::ads1115::{Ads1115, Channel, DEFAULT_ADDRESS};

/// I2C bus the ADC is wired to (header pins SDA/SCL on a Raspberry Pi).
const I2C_BUS: &str = "/dev/i2c-1";

pub type Microphone = Ads1115<I2cdev, Delay>;

/// Open the bus and return the ADC reading input A0.
pub fn open_microphone() -> anyhow::Result<Microphone> {
    let i2c = I2cdev::new(I2C_BUS).with_context(|| format!("failed to open {I2C_BUS}"))?;
    info!("ADS1115 on {I2C_BUS} at {DEFAULT_ADDRESS:#04x}, channel A0");
    Ok(Ads1115::new(i2c, Delay, DEFAULT_ADDRESS, Channel::A0))
}
