//! Device lifecycle and raw register access.

use crate::{DateTime, Ds3231, Error, Register};

impl<I2C> Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a new driver instance bound to `address` on the given bus.
    ///
    /// No bus traffic happens here; [`init`](Ds3231::init) performs the
    /// first access.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Ds3231 {
            i2c,
            address,
            snapshot: DateTime::default(),
            alarm1: None,
            alarm2: None,
        }
    }

    /// Probe the device and bring it to a known state: oscillator running,
    /// INT/SQW output quiet and both alarm slots disarmed.
    ///
    /// The first access doubles as the probe; a missing acknowledgment at
    /// the configured address fails with [`Error::DeviceNotFound`]. The
    /// oscillator-stop flag stays latched so that
    /// [`check_stop_flag`](Ds3231::check_stop_flag) can still report a power
    /// loss that predates `init`.
    pub fn init(&mut self) -> Result<(), Error> {
        self.read_register(Register::STATUS)
            .map_err(|_| Error::DeviceNotFound)?;
        self.write_register(Register::CONTROL, 0x00)?;
        self.disable_alarms()
    }

    /// Release the bus binding.
    ///
    /// Any borrowed snapshot views ended with the last read; the returned
    /// bus value is all that remains of the device handle.
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    pub(crate) fn write_register(&mut self, register: u8, data: u8) -> Result<(), Error> {
        let payload: [u8; 2] = [register, data];
        self.i2c
            .write(self.address, &payload)
            .map_err(|_| Error::BusWrite)
    }

    pub(crate) fn read_register(&mut self, register: u8) -> Result<u8, Error> {
        let mut data = [0];
        self.i2c
            .write_read(self.address, &[register], &mut data)
            .map_err(|_| Error::BusRead)?;
        Ok(data[0])
    }

    /// Block write; `payload[0]` is the start register.
    pub(crate) fn write_data(&mut self, payload: &[u8]) -> Result<(), Error> {
        self.i2c
            .write(self.address, payload)
            .map_err(|_| Error::BusWrite)
    }

    /// Block read into `payload[1..]`, starting at register `payload[0]`.
    pub(crate) fn read_data(&mut self, payload: &mut [u8]) -> Result<(), Error> {
        let len = payload.len();
        let register = payload[0];
        self.i2c
            .write_read(self.address, &[register], &mut payload[1..len])
            .map_err(|_| Error::BusRead)
    }
}
