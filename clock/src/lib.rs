pub mod clock {
    use chrono::{Datelike, NaiveDateTime, Timelike};
    use ds3231::{Alarm2Mode, DateTime, DateTimeAccess, Ds3231, Error, TimeSink};
    use log::info;

    /// Calendar-facing wrapper around a [`Ds3231`] device.
    pub struct Clock<I2C> {
        rtc: Ds3231<I2C>,
    }

    impl<I2C> Clock<I2C>
    where
        I2C: embedded_hal::i2c::I2c,
    {
        // Constructor for Clock
        pub fn new(i2c: I2C, address: u8) -> Clock<I2C> {
            Clock {
                rtc: Ds3231::new(i2c, address),
            }
        }

        /// Probe the device and bring it to a known, disarmed state.
        pub fn init(&mut self) -> Result<(), Error> {
            self.rtc.init()
        }

        /// Release the underlying bus.
        pub fn destroy(self) -> I2C {
            self.rtc.destroy()
        }

        /// Method to get the hours
        pub fn get_hour(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.datetime()?.hour() as u8)
        }

        /// Method to get the minutes
        pub fn get_minutes(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.datetime()?.minute() as u8)
        }

        /// Method to get the seconds
        pub fn get_seconds(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.datetime()?.second() as u8)
        }

        /// Method to get the day of month
        pub fn get_day(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.datetime()?.day() as u8)
        }

        /// Method to get the month
        pub fn get_month(&mut self) -> Result<u8, Error> {
            Ok(self.rtc.datetime()?.month() as u8)
        }

        /// Method to get the year
        pub fn get_year(&mut self) -> Result<u16, Error> {
            Ok(self.rtc.datetime()?.year() as u16)
        }

        /// Method for setting a datetime
        pub fn set_date_time(&mut self, date_time: &NaiveDateTime) -> Result<(), Error> {
            self.rtc.set_datetime(date_time)
        }

        /// Method for returning a datetime
        pub fn get_date_time(&mut self) -> Result<NaiveDateTime, Error> {
            self.rtc.datetime()
        }

        /// Returns a unix timestamp based on the current date time
        pub fn unix_timestamp(&mut self) -> Result<i64, Error> {
            self.rtc.read()?.unixtime()
        }

        /// Set the chip from a unix timestamp
        pub fn set_unix_timestamp(&mut self, unixtime: i64) -> Result<(), Error> {
            self.rtc.write_unixtime(unixtime)
        }

        /// Push the chip's time into the host wall clock.
        pub fn sync_system_time<S: TimeSink>(&mut self, sink: &mut S) -> Result<i64, Error> {
            let unixtime = self.rtc.set_time_of_day(sink)?;
            info!("host clock synchronized to {unixtime}");
            Ok(unixtime)
        }

        /// Arm a daily alarm at the given hour and minute.
        pub fn daily_alarm(&mut self, hour: u8, minute: u8) -> Result<(), Error> {
            let mut when = DateTime::default();
            when.set_time(hour, minute, 0)?;
            self.rtc.set_alarm2(&when, Alarm2Mode::Daily)
        }

        /// Arm an hourly alarm at the given minute.
        pub fn hourly_alarm(&mut self, minute: u8) -> Result<(), Error> {
            let mut when = DateTime::default();
            when.set_time(0, minute, 0)?;
            self.rtc.set_alarm2(&when, Alarm2Mode::Hourly)
        }

        /// Which alarms have fired since the last clear (bit 0 / bit 1).
        pub fn alarm_fired(&mut self) -> Result<u8, Error> {
            self.rtc.check_alarms()
        }

        /// Acknowledge any fired alarms, returning what had fired.
        pub fn clear_alarms(&mut self) -> Result<u8, Error> {
            self.rtc.check_alarms_with_clear(true)
        }

        /// Disarm both alarm slots.
        pub fn disable_alarms(&mut self) -> Result<(), Error> {
            self.rtc.disable_alarms()
        }

        /// Whether the chip lost power since the flag was last cleared.
        pub fn time_is_stale(&mut self) -> Result<bool, Error> {
            self.rtc.check_stop_flag(false)
        }

        /// Board temperature in Celsius.
        pub fn temperature(&mut self) -> Result<f32, Error> {
            self.rtc.temperature_c()
        }
    }
}

pub use clock::Clock;
