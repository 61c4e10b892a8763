//! Oscillator and output configuration.
//!
//! Every mutation here is a read-modify-write of the control register, so
//! bits owned by other operations survive.

use crate::{BitFlags, Ds3231, Error, Register, SqWFreq};

impl<I2C> Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Start the oscillator (set the clock running) (default).
    pub fn enable(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control & !BitFlags::EOSC)
    }

    /// Stop the oscillator. Timekeeping halts until re-enabled.
    pub fn disable(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control | BitFlags::EOSC)
    }

    /// Force a temperature conversion and time compensation with the TCXO
    /// algorithm.
    ///
    /// The *busy* status should be checked before doing this. See
    /// [`busy()`](Ds3231::busy)
    pub fn convert_temperature(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        // do not overwrite if a conversion is in progress
        if (control & BitFlags::TEMP_CONV) == 0 {
            self.write_register(Register::CONTROL, control | BitFlags::TEMP_CONV)?;
        }
        Ok(())
    }

    /// Set the interrupt/square-wave output to be used as interrupt output.
    pub fn use_int_sqw_output_as_interrupt(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control | BitFlags::INTCN)
    }

    /// Set the interrupt/square-wave output to be used as square-wave
    /// output. (default)
    pub fn use_int_sqw_output_as_square_wave(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control & !BitFlags::INTCN)
    }

    /// Set the square-wave output frequency.
    pub fn set_square_wave_frequency(&mut self, freq: SqWFreq) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        let control = match freq {
            SqWFreq::_1Hz => control & !BitFlags::RS2 & !BitFlags::RS1,
            SqWFreq::_1_024Hz => control & !BitFlags::RS2 | BitFlags::RS1,
            SqWFreq::_4_096Hz => (control | BitFlags::RS2) & !BitFlags::RS1,
            SqWFreq::_8_192Hz => control | BitFlags::RS2 | BitFlags::RS1,
        };
        self.write_register(Register::CONTROL, control)
    }

    /// Set the aging offset.
    pub fn set_aging_offset(&mut self, offset: i8) -> Result<(), Error> {
        self.write_register(Register::AGING_OFFSET, offset as u8)
    }

    /// Read the aging offset.
    pub fn aging_offset(&mut self) -> Result<i8, Error> {
        Ok(self.read_register(Register::AGING_OFFSET)? as i8)
    }
}
