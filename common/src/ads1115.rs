//! Minimal blocking ADS1115 driver for the microphone channel.
//!
//! Only what the noise monitor needs: single-shot conversions on one
//! single-ended input at the ±6.144 V range (the ADS1x15 power-on default of
//! "gain 2/3"), 128 samples per second, comparator disabled.
//!
//! # Conversion
//!
//! 1. Write the config register with OS=1 to start a conversion.
//! 2. Poll the config register until OS reads back as 1 (idle).
//! 3. Read the signed 16-bit conversion register and scale by the range.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use thiserror::Error;

use crate::sampler::VoltageSource;

/// Default I2C address (ADDR pin tied to GND).
pub const DEFAULT_ADDRESS: u8 = 0x48;

// Register pointers
const REG_CONVERSION: u8 = 0x00;
const REG_CONFIG: u8 = 0x01;

// Config register fields
const OS_START: u16 = 0x8000; // Write: start single conversion / Read: 1 = idle
const MUX_SINGLE_BASE: u16 = 0x4000; // AINx vs GND, channel in bits 13:12
const PGA_6_144V: u16 = 0x0000;
const MODE_SINGLE_SHOT: u16 = 0x0100;
const DR_128_SPS: u16 = 0x0080;
const COMP_QUEUE_DISABLE: u16 = 0x0003;

/// Full-scale voltage for `PGA_6_144V`.
const FULL_SCALE_VOLTS: f32 = 6.144;

/// One conversion at 128 SPS takes ~7.8ms; poll in 1ms steps up to 4x that.
const POLL_INTERVAL_US: u32 = 1_000;
const MAX_POLLS: u32 = 32;

/// Single-ended input pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    A0,
    A1,
    A2,
    A3,
}

impl Channel {
    const fn mux_bits(self) -> u16 { MUX_SINGLE_BASE | ((self as u16) << 12) }
}

#[derive(Debug, Error)]
pub enum Ads1115Error<E> {
    #[error("I2C transfer failed: {0:?}")]
    I2c(E),
    #[error("conversion did not complete")]
    ConversionTimeout,
}

/// ADS1115 reading one channel.
pub struct Ads1115<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
    channel: Channel,
}

impl<I2C, D> Ads1115<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub const fn new(
        i2c: I2C,
        delay: D,
        address: u8,
        channel: Channel,
    ) -> Self {
        Self {
            i2c,
            delay,
            address,
            channel,
        }
    }

    /// Config word that starts a single-shot conversion on the channel.
    pub const fn config_word(&self) -> u16 {
        OS_START | self.channel.mux_bits() | PGA_6_144V | MODE_SINGLE_SHOT | DR_128_SPS | COMP_QUEUE_DISABLE
    }

    /// Run one conversion and return the raw signed result.
    pub fn read_raw(&mut self) -> Result<i16, Ads1115Error<I2C::Error>> {
        let config = self.config_word().to_be_bytes();
        self.i2c
            .write(self.address, &[REG_CONFIG, config[0], config[1]])
            .map_err(Ads1115Error::I2c)?;

        let mut ready = false;
        for _ in 0..MAX_POLLS {
            self.delay.delay_us(POLL_INTERVAL_US);
            if self.read_register(REG_CONFIG)? & OS_START != 0 {
                ready = true;
                break;
            }
        }
        if !ready {
            return Err(Ads1115Error::ConversionTimeout);
        }

        Ok(self.read_register(REG_CONVERSION)? as i16)
    }

    fn read_register(
        &mut self,
        register: u8,
    ) -> Result<u16, Ads1115Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(Ads1115Error::I2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Release the bus and delay.
    pub fn release(self) -> (I2C, D) { (self.i2c, self.delay) }
}

/// Convert a raw conversion result to volts at the ±6.144 V range.
#[inline]
pub fn raw_to_volts(raw: i16) -> f32 { f32::from(raw) * FULL_SCALE_VOLTS / 32768.0 }

impl<I2C, D> VoltageSource for Ads1115<I2C, D>
where
    I2C: I2c,
    I2C::Error: Send + Sync + 'static,
    D: DelayNs,
{
    type Error = Ads1115Error<I2C::Error>;

    fn read_voltage(&mut self) -> Result<f32, Self::Error> { self.read_raw().map(raw_to_volts) }
}
