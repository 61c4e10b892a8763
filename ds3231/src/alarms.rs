//! Alarm slots: mode codes, arming, flag inspection.

use crate::datetime::{bin2bcd, DateTime};
use crate::{BitFlags, Ds3231, Error, Register};

// Low-nibble layout of a mode code: family bits plus the day/weekday
// selector. The high nibble is the per-field ignore mask.
const CODE_ALARM1: u8 = 0x01;
const CODE_ALARM2: u8 = 0x02;
const CODE_DOW: u8 = 0x08;

/// Alarm-1 mode codes (seconds resolution).
///
/// Each variant carries its canonical hardware code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Alarm1Mode {
    /// Trigger once per second.
    EverySecond = 0xF1,
    /// Trigger when the seconds match.
    MatchSecond = 0x71,
    /// Trigger when seconds and minutes match.
    MatchSecondMinute = 0x31,
    /// Trigger when seconds, minutes and hours match.
    MatchSecondMinuteHour = 0x11,
    /// Trigger when seconds, minutes, hours and day of month match.
    MatchSecondMinuteHourDate = 0x01,
    /// Trigger when seconds, minutes, hours and day of week match.
    MatchSecondMinuteHourDow = 0x09,
}

/// Alarm-2 mode codes (minutes resolution), including the repeat cadences.
///
/// The cadence variants keep their canonical code bytes and collapse onto
/// the equivalent plain match encoding when written out: hourly matches the
/// minutes, daily matches minutes and hours, weekly adds the day of week and
/// monthly the day of month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Alarm2Mode {
    /// Trigger once per minute, at second zero.
    EveryMinute = 0x72,
    /// Trigger when the minutes match.
    MatchMinute = 0x32,
    /// Trigger when minutes and hours match.
    MatchMinuteHour = 0x12,
    /// Trigger when minutes, hours and day of month match.
    MatchMinuteHourDate = 0x02,
    /// Trigger when minutes, hours and day of week match.
    MatchMinuteHourDow = 0x0A,
    /// Once per hour.
    Hourly = 0x33,
    /// Once per day.
    Daily = 0x13,
    /// Once per week.
    Weekly = 0x0B,
    /// Once per month.
    Monthly = 0x03,
}

impl Alarm1Mode {
    pub(crate) fn code(self) -> u8 {
        self as u8
    }
}

impl Alarm2Mode {
    pub(crate) fn code(self) -> u8 {
        let code = self as u8;
        if code & (CODE_ALARM1 | CODE_ALARM2) == CODE_ALARM1 | CODE_ALARM2 {
            code & !CODE_ALARM1
        } else {
            code
        }
    }
}

impl TryFrom<u8> for Alarm1Mode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        match code {
            0xF1 => Ok(Alarm1Mode::EverySecond),
            0x71 => Ok(Alarm1Mode::MatchSecond),
            0x31 => Ok(Alarm1Mode::MatchSecondMinute),
            0x11 => Ok(Alarm1Mode::MatchSecondMinuteHour),
            0x01 => Ok(Alarm1Mode::MatchSecondMinuteHourDate),
            0x09 => Ok(Alarm1Mode::MatchSecondMinuteHourDow),
            _ => Err(Error::InvalidAlarmMode),
        }
    }
}

impl TryFrom<u8> for Alarm2Mode {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Error> {
        match code {
            0x72 => Ok(Alarm2Mode::EveryMinute),
            0x32 => Ok(Alarm2Mode::MatchMinute),
            0x12 => Ok(Alarm2Mode::MatchMinuteHour),
            0x02 => Ok(Alarm2Mode::MatchMinuteHourDate),
            0x0A => Ok(Alarm2Mode::MatchMinuteHourDow),
            0x33 => Ok(Alarm2Mode::Hourly),
            0x13 => Ok(Alarm2Mode::Daily),
            0x0B => Ok(Alarm2Mode::Weekly),
            0x03 => Ok(Alarm2Mode::Monthly),
            _ => Err(Error::InvalidAlarmMode),
        }
    }
}

// Per-field ignore bit, shifted out of the code's high nibble. Position 0
// is the seconds byte, 3 the day/weekday byte.
fn mask_bit(code: u8, position: u8) -> u8 {
    (code << position) & BitFlags::ALARM_MATCH
}

fn day_byte(when: &DateTime, code: u8) -> u8 {
    let mask = mask_bit(code, 3);
    if code & CODE_DOW != 0 {
        bin2bcd(when.dow) | mask | BitFlags::WEEKDAY
    } else {
        bin2bcd(when.day) | mask
    }
}

// Range-check only the fields the mode actually matches on; wildcarded
// fields never reach the chip's comparison logic.
fn validate_fields(when: &DateTime, code: u8, with_seconds: bool) -> Result<(), Error> {
    if with_seconds && mask_bit(code, 0) == 0 && when.second > 59 {
        return Err(Error::OutOfRange);
    }
    if mask_bit(code, 1) == 0 && when.minute > 59 {
        return Err(Error::OutOfRange);
    }
    if mask_bit(code, 2) == 0 && when.hour > 23 {
        return Err(Error::OutOfRange);
    }
    if mask_bit(code, 3) == 0 {
        if code & CODE_DOW != 0 {
            if when.dow == 0 || when.dow > 7 {
                return Err(Error::OutOfRange);
            }
        } else if when.day == 0 || when.day > 31 {
            return Err(Error::OutOfRange);
        }
    }
    Ok(())
}

impl<I2C> Ds3231<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Arm alarm slot 1.
    ///
    /// Only the fields `mode` matches on are validated and used; the rest of
    /// `when` may stay unset. The alarm registers are written before the
    /// enable bit so a half-written configuration can never be armed.
    pub fn set_alarm1(&mut self, when: &DateTime, mode: Alarm1Mode) -> Result<(), Error> {
        let code = mode.code();
        validate_fields(when, code, true)?;
        let payload = [
            Register::ALARM1_SECONDS,
            bin2bcd(when.second) | mask_bit(code, 0),
            bin2bcd(when.minute) | mask_bit(code, 1),
            bin2bcd(when.hour) | mask_bit(code, 2),
            day_byte(when, code),
        ];
        self.write_data(&payload)?;
        self.enable_alarm_output(BitFlags::ALARM1_INT_EN)?;
        self.alarm1 = Some(mode);
        Ok(())
    }

    /// Arm alarm slot 2.
    pub fn set_alarm2(&mut self, when: &DateTime, mode: Alarm2Mode) -> Result<(), Error> {
        let code = mode.code();
        validate_fields(when, code, false)?;
        let payload = [
            Register::ALARM2_MINUTES,
            bin2bcd(when.minute) | mask_bit(code, 1),
            bin2bcd(when.hour) | mask_bit(code, 2),
            day_byte(when, code),
        ];
        self.write_data(&payload)?;
        self.enable_alarm_output(BitFlags::ALARM2_INT_EN)?;
        self.alarm2 = Some(mode);
        Ok(())
    }

    /// Arm whichever alarm slot a raw mode code belongs to.
    ///
    /// The slot is implied by the code's family nibble; a code from no
    /// recognized family fails with [`Error::InvalidAlarmMode`] before any
    /// bus traffic.
    pub fn set_alarm(&mut self, when: &DateTime, code: u8) -> Result<(), Error> {
        if code & (CODE_ALARM1 | CODE_ALARM2) == CODE_ALARM1 {
            self.set_alarm1(when, Alarm1Mode::try_from(code)?)
        } else {
            self.set_alarm2(when, Alarm2Mode::try_from(code)?)
        }
    }

    /// Disarm both alarm slots and clear their trigger flags.
    ///
    /// Afterwards [`check_alarms`](Ds3231::check_alarms) reports 0 whatever
    /// the slots held before.
    pub fn disable_alarms(&mut self) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(
            Register::CONTROL,
            control & !(BitFlags::ALARM1_INT_EN | BitFlags::ALARM2_INT_EN),
        )?;
        let status = self.read_register(Register::STATUS)?;
        self.write_register(
            Register::STATUS,
            status & !(BitFlags::ALARM1F | BitFlags::ALARM2F),
        )?;
        self.alarm1 = None;
        self.alarm2 = None;
        Ok(())
    }

    /// Which alarms have triggered: bit 0 for slot 1, bit 1 for slot 2,
    /// 0 when neither fired.
    ///
    /// Non-destructive: the flags stay latched until acknowledged through
    /// [`check_alarms_with_clear`](Ds3231::check_alarms_with_clear) or
    /// [`disable_alarms`](Ds3231::disable_alarms).
    pub fn check_alarms(&mut self) -> Result<u8, Error> {
        self.check_alarms_with_clear(false)
    }

    /// Read the alarm trigger flags, optionally clearing them in the same
    /// transaction.
    pub fn check_alarms_with_clear(&mut self, clear: bool) -> Result<u8, Error> {
        let status = self.read_register(Register::STATUS)?;
        let triggered = status & (BitFlags::ALARM1F | BitFlags::ALARM2F);
        if clear && triggered != 0 {
            self.write_register(Register::STATUS, status & !triggered)?;
        }
        Ok(triggered)
    }

    // Alarm registers first, then the enable bit plus INTCN in one
    // read-modify-write of the control register.
    fn enable_alarm_output(&mut self, enable: u8) -> Result<(), Error> {
        let control = self.read_register(Register::CONTROL)?;
        self.write_register(Register::CONTROL, control | enable | BitFlags::INTCN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEVICE_ADDRESS;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    fn at(hour: u8, minute: u8, second: u8) -> DateTime {
        let mut when = DateTime::default();
        when.set_time(hour, minute, second).unwrap();
        when
    }

    #[test]
    fn every_second_masks_all_fields() {
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x07, 0x80, 0x80, 0x80, 0x80]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x00]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x05]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.set_alarm1(&DateTime::default(), Alarm1Mode::EverySecond)
            .unwrap();
        assert_eq!(rtc.alarm1_mode(), Some(Alarm1Mode::EverySecond));
        rtc.destroy().done();
    }

    #[test]
    fn alarm1_dow_match_sets_the_weekday_bit() {
        let mut when = DateTime::default();
        when.set_date(2023, 11, 14).unwrap(); // a Tuesday
        when.set_time(6, 15, 30).unwrap();
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x07, 0x30, 0x15, 0x06, 0x42]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x00]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x05]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.set_alarm1(&when, Alarm1Mode::MatchSecondMinuteHourDow)
            .unwrap();
        rtc.destroy().done();
    }

    #[test]
    fn daily_cadence_programs_slot_two() {
        // daily collapses to match-minute-hour on the alarm-2 registers
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0B, 0x30, 0x07, 0x80]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x00]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x06]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.set_alarm2(&at(7, 30, 0), Alarm2Mode::Daily).unwrap();
        assert_eq!(rtc.alarm2_mode(), Some(Alarm2Mode::Daily));
        rtc.destroy().done();
    }

    #[test]
    fn weekly_cadence_matches_the_weekday() {
        let mut when = DateTime::default();
        when.set_date(2023, 11, 14).unwrap(); // a Tuesday
        when.set_time(6, 15, 0).unwrap();
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0B, 0x15, 0x06, 0x42]),
            // other control bits survive the read-modify-write
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x1C]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x1E]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.set_alarm2(&when, Alarm2Mode::Weekly).unwrap();
        rtc.destroy().done();
    }

    #[test]
    fn match_modes_reject_invalid_fields_before_bus_traffic() {
        let mut rtc = Ds3231::new(I2cMock::new(&[]), DEVICE_ADDRESS);
        let bogus = DateTime {
            minute: 60,
            ..DateTime::default()
        };
        assert_eq!(
            rtc.set_alarm2(&bogus, Alarm2Mode::MatchMinute),
            Err(Error::OutOfRange)
        );
        // a weekly alarm needs a day of week
        assert_eq!(
            rtc.set_alarm2(&DateTime::default(), Alarm2Mode::Weekly),
            Err(Error::OutOfRange)
        );
        rtc.destroy().done();
    }

    #[test]
    fn foreign_family_codes_are_rejected() {
        assert_eq!(Alarm1Mode::try_from(0x72), Err(Error::InvalidAlarmMode));
        assert_eq!(Alarm2Mode::try_from(0xF1), Err(Error::InvalidAlarmMode));
        assert_eq!(Alarm2Mode::try_from(0x13), Ok(Alarm2Mode::Daily));
        assert_eq!(Alarm1Mode::try_from(0x09), Ok(Alarm1Mode::MatchSecondMinuteHourDow));
    }

    #[test]
    fn unified_entry_dispatches_on_the_family_nibble() {
        let expectations = [
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0B, 0x80, 0x80, 0x80]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x00]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x06]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.set_alarm(&DateTime::default(), 0x72).unwrap(); // every minute
        assert_eq!(
            rtc.set_alarm(&DateTime::default(), 0x00),
            Err(Error::InvalidAlarmMode)
        );
        assert_eq!(
            rtc.set_alarm(&DateTime::default(), 0xFF),
            Err(Error::InvalidAlarmMode)
        );
        rtc.destroy().done();
    }

    #[test]
    fn disable_alarms_clears_enables_and_flags() {
        let expectations = [
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0E], vec![0x1F]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0E, 0x1C]),
            // the stop flag survives, only the alarm flags are dropped
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x83]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0F, 0x80]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x80]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        rtc.disable_alarms().unwrap();
        assert_eq!(rtc.check_alarms().unwrap(), 0);
        assert_eq!(rtc.alarm1_mode(), None);
        assert_eq!(rtc.alarm2_mode(), None);
        rtc.destroy().done();
    }

    #[test]
    fn check_alarms_is_non_destructive_by_default() {
        let expectations = [
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x03]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x03]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        assert_eq!(rtc.check_alarms().unwrap(), 3);
        assert_eq!(rtc.check_alarms().unwrap(), 3);
        rtc.destroy().done();
    }

    #[test]
    fn clearing_read_acknowledges_the_flags() {
        let expectations = [
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x81]),
            I2cTransaction::write(DEVICE_ADDRESS, vec![0x0F, 0x80]),
            I2cTransaction::write_read(DEVICE_ADDRESS, vec![0x0F], vec![0x80]),
        ];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        assert_eq!(rtc.check_alarms_with_clear(true).unwrap(), 1);
        assert_eq!(rtc.check_alarms().unwrap(), 0);
        rtc.destroy().done();
    }

    #[test]
    fn clearing_read_skips_the_write_when_idle() {
        let expectations = [I2cTransaction::write_read(
            DEVICE_ADDRESS,
            vec![0x0F],
            vec![0x00],
        )];
        let mut rtc = Ds3231::new(I2cMock::new(&expectations), DEVICE_ADDRESS);
        assert_eq!(rtc.check_alarms_with_clear(true).unwrap(), 0);
        rtc.destroy().done();
    }
}
