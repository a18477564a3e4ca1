use crate::{
    civil::{Date, Time},
    error::{civil::Error as E, Error},
    tz::Offset,
    util::itime::SECONDS_PER_DAY,
    Timestamp,
};

/// A representation of a civil datetime in the proleptic Gregorian
/// calendar.
///
/// A `DateTime` value corresponds to a pair of a [`Date`] and a [`Time`].
/// That is, a datetime contains a year, month, day, hour, minute, second and
/// the fractional number of nanoseconds.
///
/// # Example
///
/// ```
/// use chronofmt::civil::DateTime;
///
/// let dt = DateTime::new(2024, 7, 11, 1, 14, 0, 0)?;
/// assert_eq!(dt.to_string(), "2024-07-11T01:14:00");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct DateTime {
    date: Date,
    time: Time,
}

impl DateTime {
    /// Creates a new `DateTime` value from its components.
    ///
    /// # Errors
    ///
    /// This returns an error when [`Date::new`] or [`Time::new`] would.
    pub fn new(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Result<DateTime, Error> {
        let date = Date::new(year, month, day)?;
        let time = Time::new(hour, minute, second, subsec_nanosecond)?;
        Ok(DateTime { date, time })
    }

    /// Creates a new `DateTime` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics when [`DateTime::new`] would return an error.
    pub const fn constant(
        year: i16,
        month: i8,
        day: i8,
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> DateTime {
        let date = Date::constant(year, month, day);
        let time = Time::constant(hour, minute, second, subsec_nanosecond);
        DateTime { date, time }
    }

    /// Creates a `DateTime` from its date and time parts.
    #[inline]
    pub const fn from_parts(date: Date, time: Time) -> DateTime {
        DateTime { date, time }
    }

    /// Returns the date part.
    #[inline]
    pub fn date(self) -> Date {
        self.date
    }

    /// Returns the time part.
    #[inline]
    pub fn time(self) -> Time {
        self.time
    }

    /// Interprets this datetime as local time at the given offset and
    /// returns the corresponding instant.
    ///
    /// # Errors
    ///
    /// This returns an error when the instant is outside the supported
    /// range of timestamps.
    pub fn to_timestamp(self, offset: Offset) -> Result<Timestamp, Error> {
        let day = self.date.to_epoch_day();
        let nanos = self.time.to_nanosecond_of_day();
        let second = day * SECONDS_PER_DAY + nanos / 1_000_000_000
            - i64::from(offset.seconds());
        let nanosecond = (nanos % 1_000_000_000) as i32;
        Timestamp::new(second, nanosecond)
            .map_err(|_| Error::from(E::TimestampFromDateTime))
    }
}

impl core::fmt::Display for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}T{}", self.date, self.time)
    }
}

impl core::fmt::Debug for DateTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// Creates a new `DateTime` value in a `const` context.
///
/// This is a convenience free function for [`DateTime::constant`].
///
/// # Panics
///
/// This panics when the given values do not correspond to a valid datetime.
pub const fn datetime(
    year: i16,
    month: i8,
    day: i8,
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
) -> DateTime {
    DateTime::constant(
        year,
        month,
        day,
        hour,
        minute,
        second,
        subsec_nanosecond,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_timestamp() {
        let dt = datetime(1970, 1, 1, 1, 0, 0, 0);
        let ts = dt.to_timestamp(Offset::constant(1)).unwrap();
        assert_eq!(ts.as_second(), 0);

        let dt = datetime(1969, 12, 31, 23, 59, 59, 500_000_000);
        let ts = dt.to_timestamp(Offset::UTC).unwrap();
        assert_eq!(ts.as_second(), -1);
        assert_eq!(ts.subsec_nanosecond(), 500_000_000);
    }

    #[test]
    fn display() {
        let dt = datetime(1582, 10, 15, 0, 0, 0, 0);
        assert_eq!(dt.to_string(), "1582-10-15T00:00:00");
    }
}
