//! Status register diagnostics and temperature readout.

use crate::{BitFlags, Ds3231, Error, Register};

impl<I2C> Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Oscillator-stop latch: true when the oscillator halted (power loss)
    /// since the flag was last cleared, meaning the stored time may be
    /// stale.
    ///
    /// With `clear` the latch is acknowledged in the same transaction after
    /// being read; callers that need idempotent polling pass `false`.
    pub fn check_stop_flag(&mut self, clear: bool) -> Result<bool, Error> {
        let status = self.read_register(Register::STATUS)?;
        let stopped = status & BitFlags::OSC_STOP != 0;
        if stopped && clear {
            self.write_register(Register::STATUS, status & !BitFlags::OSC_STOP)?;
        }
        Ok(stopped)
    }

    /// Whether a temperature conversion is executing.
    pub fn busy(&mut self) -> Result<bool, Error> {
        let status = self.read_register(Register::STATUS)?;
        Ok(status & BitFlags::BUSY != 0)
    }

    /// Temperature in Celsius, 0.25 degree resolution.
    pub fn temperature_c(&mut self) -> Result<f32, Error> {
        let mut data = [0u8; 3];
        data[0] = Register::TEMP_MSB;
        self.read_data(&mut data)?;
        let raw = (i16::from(data[1] as i8) << 2) | i16::from(data[2] >> 6);
        Ok(f32::from(raw) * 0.25)
    }

    /// Temperature in Fahrenheit.
    ///
    /// Reads the registers itself rather than converting a cached Celsius
    /// value.
    pub fn temperature_f(&mut self) -> Result<f32, Error> {
        Ok(self.temperature_c()? * 1.8 + 32.0)
    }
}
