#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

//! Driver for the DS3231 battery-backed real-time clock, generic over the
//! [`embedded_hal::i2c::I2c`] bus traits.
//!
//! Supports date/time read/write with unix timestamp conversion, the two
//! alarm slots, temperature readout and oscillator diagnostics.

pub use rtcc::{DateTimeAccess, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// All possible errors in this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// No acknowledgment from a device at the configured bus address
    DeviceNotFound,
    /// I²C read transaction failed or timed out
    BusRead,
    /// I²C write transaction failed or timed out
    BusWrite,
    /// Value outside the range the device registers can represent
    OutOfRange,
    /// Alarm mode code does not belong to a recognized alarm family
    InvalidAlarmMode,
    /// Internal device state is invalid.
    ///
    /// It was not possible to read a valid date and/or time.
    /// The device is probably missing initialization.
    InvalidDeviceState,
}

/// Square-wave output frequency
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SqWFreq {
    /// 1 Hz (default)
    _1Hz,
    /// 1.024 kHz
    _1_024Hz,
    /// 4.096 kHz
    _4_096Hz,
    /// 8.192 kHz
    _8_192Hz,
}

struct Register;

impl Register {
    const SECONDS: u8 = 0x00;
    const ALARM1_SECONDS: u8 = 0x07;
    const ALARM2_MINUTES: u8 = 0x0B;
    const CONTROL: u8 = 0x0E;
    const STATUS: u8 = 0x0F;
    const AGING_OFFSET: u8 = 0x10;
    const TEMP_MSB: u8 = 0x11;
}

struct BitFlags;

impl BitFlags {
    const H24_H12: u8 = 0b0100_0000;
    const AM_PM: u8 = 0b0010_0000;
    const CENTURY: u8 = 0b1000_0000;
    const EOSC: u8 = 0b1000_0000;
    const TEMP_CONV: u8 = 0b0010_0000;
    const RS2: u8 = 0b0001_0000;
    const RS1: u8 = 0b0000_1000;
    const INTCN: u8 = 0b0000_0100;
    const ALARM2_INT_EN: u8 = 0b0000_0010;
    const ALARM1_INT_EN: u8 = 0b0000_0001;
    const OSC_STOP: u8 = 0b1000_0000;
    const BUSY: u8 = 0b0000_0100;
    const ALARM2F: u8 = 0b0000_0010;
    const ALARM1F: u8 = 0b0000_0001;
    const ALARM_MATCH: u8 = 0b1000_0000;
    const WEEKDAY: u8 = 0b0100_0000;
}

/// Factory-default 7-bit bus address of the DS3231.
pub const DEVICE_ADDRESS: u8 = 0b110_1000;

/// First calendar year representable by the year register.
///
/// The century bit in the month register extends the two-digit year to an
/// offset of 0-199, so the chip covers 2000 through 2199.
pub const BASE_YEAR: u16 = 2000;

/// Host wall-clock sink fed by [`Ds3231::set_time_of_day`].
///
/// The driver only supplies the timestamp; clock policy stays with the host.
pub trait TimeSink {
    /// Synchronize the host clock to `unixtime` seconds since the epoch.
    fn set_system_time(&mut self, unixtime: i64);
}

/// DS3231 RTC driver bound to one device address.
///
/// All operations are blocking bus transactions on `&mut self`; a device
/// instance needs one exclusive owner, and sharing one chip between several
/// consumers requires external serialization.
#[derive(Debug)]
pub struct Ds3231<I2C> {
    i2c: I2C,
    address: u8,
    snapshot: DateTime,
    alarm1: Option<Alarm1Mode>,
    alarm2: Option<Alarm2Mode>,
}

impl<I2C> Ds3231<I2C> {
    /// Bus address this driver is bound to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Mode most recently written to alarm slot 1, if armed.
    ///
    /// The slot configuration is write-only on the device; this reflects
    /// what the driver last wrote, not a register readback.
    pub fn alarm1_mode(&self) -> Option<Alarm1Mode> {
        self.alarm1
    }

    /// Mode most recently written to alarm slot 2, if armed.
    pub fn alarm2_mode(&self) -> Option<Alarm2Mode> {
        self.alarm2
    }
}

mod alarms;
mod configuration;
mod datetime;
mod ds3231;
mod status;

pub use crate::alarms::{Alarm1Mode, Alarm2Mode};
pub use crate::datetime::DateTime;
