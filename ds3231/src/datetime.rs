//! Calendar record, register codec and clock read/write.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rtcc::DateTimeAccess;

use crate::{BitFlags, Ds3231, Error, Register, TimeSink, BASE_YEAR};

/// One point in calendar time, as kept by the seven timekeeping registers.
///
/// Fields hold plain binary values; the BCD register layout only appears in
/// [`from_registers`](DateTime::from_registers) and
/// [`to_registers`](DateTime::to_registers). A record used for alarm
/// configuration only needs valid values in the fields the alarm mode
/// matches on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DateTime {
    /// Seconds, 0-59
    pub second: u8,
    /// Minutes, 0-59
    pub minute: u8,
    /// Hours, 0-23
    pub hour: u8,
    /// Day of week, 1 (Monday) through 7 (Sunday)
    pub dow: u8,
    /// Day of month, 1-31
    pub day: u8,
    /// Month, 1-12
    pub month: u8,
    /// Years since [`BASE_YEAR`], 0-199
    pub year: u8,
}

impl DateTime {
    /// Set the date part. Computes the day of week.
    ///
    /// `year` is the full calendar year; anything the year register cannot
    /// hold, or a day that does not exist in the given month, fails with
    /// [`Error::OutOfRange`] and leaves the record untouched.
    pub fn set_date(&mut self, year: u16, month: u8, day: u8) -> Result<(), Error> {
        if !(BASE_YEAR..=BASE_YEAR + 199).contains(&year) {
            return Err(Error::OutOfRange);
        }
        let date = NaiveDate::from_ymd_opt(i32::from(year), u32::from(month), u32::from(day))
            .ok_or(Error::OutOfRange)?;
        self.year = (year - BASE_YEAR) as u8;
        self.month = month;
        self.day = day;
        self.dow = date.weekday().number_from_monday() as u8;
        Ok(())
    }

    /// Set the time part, 24-hour convention.
    pub fn set_time(&mut self, hour: u8, minute: u8, second: u8) -> Result<(), Error> {
        if hour > 23 || minute > 59 || second > 59 {
            return Err(Error::OutOfRange);
        }
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        Ok(())
    }

    /// Populate every calendar field (including the day of week) from a unix
    /// timestamp, interpreted as UTC.
    pub fn set_unixtime(&mut self, unixtime: i64) -> Result<(), Error> {
        let utc = chrono::DateTime::from_timestamp(unixtime, 0).ok_or(Error::OutOfRange)?;
        let year = utc.year();
        if !(i32::from(BASE_YEAR)..=i32::from(BASE_YEAR) + 199).contains(&year) {
            return Err(Error::OutOfRange);
        }
        self.year = (year - i32::from(BASE_YEAR)) as u8;
        self.month = utc.month() as u8;
        self.day = utc.day() as u8;
        self.dow = utc.weekday().number_from_monday() as u8;
        self.hour = utc.hour() as u8;
        self.minute = utc.minute() as u8;
        self.second = utc.second() as u8;
        Ok(())
    }

    /// Unix timestamp for the current calendar fields, recomputed on every
    /// call; the calendar fields stay authoritative.
    ///
    /// Fails with [`Error::InvalidDeviceState`] if the fields do not form a
    /// real calendar date.
    pub fn unixtime(&self) -> Result<i64, Error> {
        let date = NaiveDate::from_ymd_opt(
            i32::from(self.year()),
            u32::from(self.month),
            u32::from(self.day),
        )
        .ok_or(Error::InvalidDeviceState)?;
        let datetime = date
            .and_hms_opt(
                u32::from(self.hour),
                u32::from(self.minute),
                u32::from(self.second),
            )
            .ok_or(Error::InvalidDeviceState)?;
        Ok(datetime.and_utc().timestamp())
    }

    /// Full calendar year ([`BASE_YEAR`] plus the stored offset).
    pub fn year(&self) -> u16 {
        BASE_YEAR + u16::from(self.year)
    }

    /// Decode a raw seven-byte register snapshot.
    ///
    /// Handles a chip left in 12-hour mode and folds the century bit into
    /// the year offset. The chip validates its own ranges, so no validation
    /// happens here.
    pub fn from_registers(regs: &[u8; 7]) -> Self {
        let hour_reg = regs[2];
        let hour = if hour_reg & BitFlags::H24_H12 != 0 {
            let hour = bcd2bin(hour_reg & 0x1F) % 12;
            if hour_reg & BitFlags::AM_PM != 0 {
                hour + 12
            } else {
                hour
            }
        } else {
            bcd2bin(hour_reg & 0x3F)
        };
        let century = regs[5] & BitFlags::CENTURY != 0;
        DateTime {
            second: bcd2bin(regs[0] & 0x7F),
            minute: bcd2bin(regs[1] & 0x7F),
            hour,
            dow: bcd2bin(regs[3] & 0x07),
            day: bcd2bin(regs[4] & 0x3F),
            month: bcd2bin(regs[5] & 0x1F),
            year: bcd2bin(regs[6]) + if century { 100 } else { 0 },
        }
    }

    /// Encode into the seven-byte register layout, 24-hour mode.
    ///
    /// A zero day of week is written as 1 so the chip's 1-7 counter stays
    /// valid even when the caller never set it.
    pub fn to_registers(&self) -> [u8; 7] {
        let century = if self.year >= 100 { BitFlags::CENTURY } else { 0 };
        [
            bin2bcd(self.second),
            bin2bcd(self.minute),
            bin2bcd(self.hour),
            bin2bcd(if self.dow == 0 { 1 } else { self.dow }),
            bin2bcd(self.day),
            bin2bcd(self.month) | century,
            bin2bcd(self.year % 100),
        ]
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.second > 59
            || self.minute > 59
            || self.hour > 23
            || self.dow > 7
            || self.day == 0
            || self.day > 31
            || self.month == 0
            || self.month > 12
            || self.year > 199
        {
            return Err(Error::OutOfRange);
        }
        Ok(())
    }
}

pub(crate) fn bin2bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

pub(crate) fn bcd2bin(value: u8) -> u8 {
    ((value >> 4) * 10) + (value & 0x0F)
}

impl<I2C> Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Read the current date and time.
    ///
    /// Returns a view of the driver-held snapshot; the borrow ends before
    /// the next call on this driver can supersede it. A failed read leaves
    /// the previous snapshot unchanged.
    pub fn read(&mut self) -> Result<&DateTime, Error> {
        let mut data = [0u8; 8];
        data[0] = Register::SECONDS;
        self.read_data(&mut data)?;
        let mut regs = [0u8; 7];
        regs.copy_from_slice(&data[1..]);
        self.snapshot = DateTime::from_registers(&regs);
        Ok(&self.snapshot)
    }

    /// Set the date and time from the given record.
    ///
    /// Every field is range-checked against its register width before any
    /// bus traffic, then the seven registers go out in one block write.
    pub fn write(&mut self, datetime: &DateTime) -> Result<(), Error> {
        datetime.validate()?;
        let mut payload = [0u8; 8];
        payload[0] = Register::SECONDS;
        payload[1..].copy_from_slice(&datetime.to_registers());
        self.write_data(&payload)
    }

    /// Set the date and time from a unix timestamp.
    pub fn write_unixtime(&mut self, unixtime: i64) -> Result<(), Error> {
        let mut record = DateTime::default();
        record.set_unixtime(unixtime)?;
        self.write(&record)
    }

    /// Read the device and hand its unix timestamp to the host clock sink.
    ///
    /// Returns the timestamp that was delivered. Fails only if the read
    /// itself fails.
    pub fn set_time_of_day<S: TimeSink>(&mut self, sink: &mut S) -> Result<i64, Error> {
        let now = self.read()?.unixtime()?;
        sink.set_system_time(now);
        Ok(now)
    }
}

impl<I2C> DateTimeAccess for Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = Error;

    fn datetime(&mut self) -> Result<NaiveDateTime, Self::Error> {
        let record = self.read()?;
        let date = NaiveDate::from_ymd_opt(
            i32::from(record.year()),
            u32::from(record.month),
            u32::from(record.day),
        )
        .ok_or(Error::InvalidDeviceState)?;
        date.and_hms_opt(
            u32::from(record.hour),
            u32::from(record.minute),
            u32::from(record.second),
        )
        .ok_or(Error::InvalidDeviceState)
    }

    fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Self::Error> {
        let year = datetime.year();
        if !(i32::from(BASE_YEAR)..=i32::from(BASE_YEAR) + 199).contains(&year) {
            return Err(Error::OutOfRange);
        }
        let mut record = DateTime::default();
        record.set_date(year as u16, datetime.month() as u8, datetime.day() as u8)?;
        record.set_time(
            datetime.hour() as u8,
            datetime.minute() as u8,
            datetime.second() as u8,
        )?;
        self.write(&record)
    }
}
