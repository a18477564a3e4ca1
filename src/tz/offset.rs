use crate::{
    civil::{Date, DateTime, Time},
    error::Error,
    util::itime::{IEpochDay, SECONDS_PER_DAY},
    Timestamp,
};

/// An enum indicating whether a particular instant is in DST or not.
///
/// DST stands for "daylight saving time." It is a label used to apply to
/// points in time as a way to contrast it with "standard time." DST is
/// usually, but not always, one hour ahead of standard time.
///
/// Time zone names come in a standard and a daylight saving flavor (for
/// example, `EST` and `EDT`). When such a name is parsed, the flavor is
/// remembered and, under strict leniency, checked against the instant that
/// was eventually constructed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Dst {
    /// DST is not in effect. In other words, standard time is in effect.
    No,
    /// DST is in effect.
    Yes,
}

impl Dst {
    /// Returns true when this value is equal to `Dst::Yes`.
    pub fn is_dst(self) -> bool {
        matches!(self, Dst::Yes)
    }
}

impl From<bool> for Dst {
    fn from(is_dst: bool) -> Dst {
        if is_dst {
            Dst::Yes
        } else {
            Dst::No
        }
    }
}

/// Represents a fixed time zone offset.
///
/// Negative offsets correspond to time zones west of the prime meridian,
/// while positive offsets correspond to time zones east of the prime
/// meridian. Equivalently, in all cases, `civil-time - offset = UTC`.
///
/// # Display format
///
/// This type implements `Display` in the form `{sign}{hours}:{minutes}`,
/// with `:{seconds}` appended only when the seconds are non-zero:
///
/// ```
/// use chronofmt::tz::Offset;
///
/// assert_eq!(Offset::constant(-5).to_string(), "-05:00");
/// assert_eq!(Offset::constant_seconds(19_800).to_string(), "+05:30");
/// assert_eq!(Offset::constant_seconds(-18_062).to_string(), "-05:01:02");
/// assert_eq!(Offset::UTC.to_string(), "+00:00");
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Offset {
    seconds: i32,
}

impl Offset {
    /// The minimum possible time zone offset.
    ///
    /// This corresponds to the offset `-25:59:59`.
    pub const MIN: Offset = Offset { seconds: -93_599 };

    /// The maximum possible time zone offset.
    ///
    /// This corresponds to the offset `25:59:59`.
    pub const MAX: Offset = Offset { seconds: 93_599 };

    /// The offset corresponding to UTC. That is, no offset at all.
    pub const UTC: Offset = Offset { seconds: 0 };

    /// Creates a new time zone offset in a `const` context from a given
    /// number of hours.
    ///
    /// # Panics
    ///
    /// This panics when the number of hours is not in the range `-25..=25`.
    pub const fn constant(hours: i8) -> Offset {
        if hours < -25 || hours > 25 {
            panic!("offset hours out of range");
        }
        Offset { seconds: hours as i32 * 3_600 }
    }

    /// Creates a new time zone offset in a `const` context from a given
    /// number of seconds.
    ///
    /// # Panics
    ///
    /// This panics when the number of seconds is not in the range
    /// `-93_599..=93_599`.
    pub const fn constant_seconds(seconds: i32) -> Offset {
        if seconds < Offset::MIN.seconds || seconds > Offset::MAX.seconds {
            panic!("offset seconds out of range");
        }
        Offset { seconds }
    }

    /// Creates a new time zone offset from a given number of hours.
    ///
    /// # Errors
    ///
    /// This returns an error when the number of hours is not in the range
    /// `-25..=25`.
    pub fn new(hours: i8) -> Result<Offset, Error> {
        if !(-25..=25).contains(&hours) {
            return Err(Error::range("offset-hours", hours, -25, 25));
        }
        Ok(Offset { seconds: i32::from(hours) * 3_600 })
    }

    /// Creates a new time zone offset from a given number of seconds.
    ///
    /// # Errors
    ///
    /// This returns an error when the number of seconds is not in the range
    /// `-93_599..=93_599`.
    pub fn new_seconds(seconds: i32) -> Result<Offset, Error> {
        if !(Offset::MIN.seconds..=Offset::MAX.seconds).contains(&seconds) {
            return Err(Error::range(
                "offset-seconds",
                seconds,
                Offset::MIN.seconds,
                Offset::MAX.seconds,
            ));
        }
        Ok(Offset { seconds })
    }

    /// Returns the total number of seconds in this offset.
    #[inline]
    pub fn seconds(self) -> i32 {
        self.seconds
    }

    /// Returns true if and only if this offset is less than zero.
    pub fn is_negative(self) -> bool {
        self.seconds < 0
    }

    /// Returns the absolute hour component of this offset.
    pub(crate) fn part_hours(self) -> i32 {
        self.seconds.abs() / 3_600
    }

    /// Returns the absolute minute component of this offset.
    pub(crate) fn part_minutes(self) -> i32 {
        (self.seconds.abs() / 60) % 60
    }

    /// Returns the absolute second component of this offset.
    pub(crate) fn part_seconds(self) -> i32 {
        self.seconds.abs() % 60
    }

    /// Converts the given timestamp to a civil datetime using this offset.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{civil::datetime, tz::Offset, Timestamp};
    ///
    /// let ts = Timestamp::from_second(0)?;
    /// assert_eq!(
    ///     Offset::constant(-5).to_datetime(ts),
    ///     datetime(1969, 12, 31, 19, 0, 0, 0),
    /// );
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn to_datetime(self, timestamp: Timestamp) -> DateTime {
        let local = timestamp.as_second() + i64::from(self.seconds);
        let day = local.div_euclid(SECONDS_PER_DAY);
        let second = local.rem_euclid(SECONDS_PER_DAY);
        let idate = IEpochDay { epoch_day: day as i32 }.to_date();
        let date = Date::from_idate(idate);
        let nanos = second * 1_000_000_000
            + i64::from(timestamp.subsec_nanosecond());
        // Both conversions stay in range because timestamps are bounded by
        // the civil date range minus the largest offset.
        let time = Time::from_nanosecond_of_day(nanos).unwrap_or(Time::MIN);
        DateTime::from_parts(date, time)
    }

    /// Converts the given civil datetime to a timestamp using this offset.
    ///
    /// # Errors
    ///
    /// This returns an error when the result would be outside the supported
    /// range of timestamps.
    pub fn to_timestamp(self, dt: DateTime) -> Result<Timestamp, Error> {
        dt.to_timestamp(self)
    }
}

impl core::fmt::Debug for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "" };
        write!(
            f,
            "Offset({sign}{:02}:{:02}:{:02})",
            self.part_hours(),
            self.part_minutes(),
            self.part_seconds(),
        )
    }
}

impl core::fmt::Display for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.seconds < 0 { "-" } else { "+" };
        let hours = self.part_hours();
        let minutes = self.part_minutes();
        let seconds = self.part_seconds();
        if seconds == 0 {
            write!(f, "{sign}{hours:02}:{minutes:02}")
        } else {
            write!(f, "{sign}{hours:02}:{minutes:02}:{seconds:02}")
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::datetime;

    use super::*;

    #[test]
    fn range() {
        assert!(Offset::new_seconds(93_599).is_ok());
        insta::assert_snapshot!(
            Offset::new_seconds(93_600).unwrap_err(),
            @"parameter 'offset-seconds' with value 93600 is not in the required range of -93599..=93599",
        );
    }

    #[test]
    fn datetime_conversions() {
        let offset = Offset::constant_seconds(5 * 3_600 + 30 * 60);
        let dt = datetime(2024, 1, 1, 5, 30, 0, 0);
        let ts = offset.to_timestamp(dt).unwrap();
        assert_eq!(ts.as_second(), 1_704_067_200);
        assert_eq!(offset.to_datetime(ts), dt);
        assert_eq!(format!("{offset:?}"), "Offset(05:30:00)");
    }
}
