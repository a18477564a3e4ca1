use crate::{
    error::Error,
    util::itime::{ITime, NANOS_PER_DAY},
};

/// A representation of civil "wall clock" time.
///
/// Conceptually, a `Time` value corresponds to the typical hours and minutes
/// that you might see on a clock. This type also contains the second and
/// fractional subsecond (to nanosecond precision) associated with a time.
///
/// Leap seconds are not supported: the second is always in the range
/// `0..=59`.
///
/// # Example
///
/// ```
/// use chronofmt::civil::Time;
///
/// let t = Time::new(13, 5, 0, 500_000_000)?;
/// assert_eq!(t.to_string(), "13:05:00.5");
/// assert_eq!(t.millisecond(), 500);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Time {
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
}

impl Time {
    /// The minimum representable time value: midnight.
    pub const MIN: Time = Time::midnight();

    /// The maximum representable time value: the last nanosecond of a day.
    pub const MAX: Time = Time::constant(23, 59, 59, 999_999_999);

    /// Creates a new `Time` value from its component hour, minute, second
    /// and fractional subsecond (up to nanosecond precision) values.
    ///
    /// # Errors
    ///
    /// This returns an error when any of the components is out of range:
    /// hour `0..=23`, minute `0..=59`, second `0..=59` and subsecond
    /// nanosecond `0..=999_999_999`.
    pub fn new(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Result<Time, Error> {
        if !(0..=23).contains(&hour) {
            return Err(Error::range("hour", hour, 0, 23));
        }
        if !(0..=59).contains(&minute) {
            return Err(Error::range("minute", minute, 0, 59));
        }
        if !(0..=59).contains(&second) {
            return Err(Error::range("second", second, 0, 59));
        }
        if !(0..=999_999_999).contains(&subsec_nanosecond) {
            return Err(Error::range(
                "subsec-nanosecond",
                subsec_nanosecond,
                0,
                999_999_999,
            ));
        }
        Ok(Time { hour, minute, second, subsec_nanosecond })
    }

    /// Creates a new `Time` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This panics when [`Time::new`] would return an error.
    pub const fn constant(
        hour: i8,
        minute: i8,
        second: i8,
        subsec_nanosecond: i32,
    ) -> Time {
        if hour < 0 || hour > 23 {
            panic!("invalid hour");
        }
        if minute < 0 || minute > 59 {
            panic!("invalid minute");
        }
        if second < 0 || second > 59 {
            panic!("invalid second");
        }
        if subsec_nanosecond < 0 || subsec_nanosecond > 999_999_999 {
            panic!("invalid nanosecond");
        }
        Time { hour, minute, second, subsec_nanosecond }
    }

    /// Returns the first moment of the day.
    pub const fn midnight() -> Time {
        Time { hour: 0, minute: 0, second: 0, subsec_nanosecond: 0 }
    }

    /// Creates a time from the number of nanoseconds since midnight.
    ///
    /// # Errors
    ///
    /// This returns an error when the value is negative or not less than
    /// the number of nanoseconds in a day.
    pub fn from_nanosecond_of_day(nanos: i64) -> Result<Time, Error> {
        if !(0..NANOS_PER_DAY).contains(&nanos) {
            return Err(Error::range(
                "nanosecond-of-day",
                nanos,
                0,
                NANOS_PER_DAY - 1,
            ));
        }
        let ITime { hour, minute, second, subsec_nanosecond } =
            ITime::from_nanosecond(nanos);
        Ok(Time { hour, minute, second, subsec_nanosecond })
    }

    /// Returns the number of nanoseconds since midnight.
    pub fn to_nanosecond_of_day(self) -> i64 {
        self.to_itime().to_nanosecond()
    }

    /// Returns the hour, in the range `0..=23`.
    #[inline]
    pub fn hour(self) -> i8 {
        self.hour
    }

    /// Returns the minute, in the range `0..=59`.
    #[inline]
    pub fn minute(self) -> i8 {
        self.minute
    }

    /// Returns the second, in the range `0..=59`.
    #[inline]
    pub fn second(self) -> i8 {
        self.second
    }

    /// Returns the millisecond component, in the range `0..=999`.
    #[inline]
    pub fn millisecond(self) -> i16 {
        (self.subsec_nanosecond / 1_000_000) as i16
    }

    /// Returns the microsecond component (excluding milliseconds), in the
    /// range `0..=999`.
    #[inline]
    pub fn microsecond(self) -> i16 {
        ((self.subsec_nanosecond / 1_000) % 1_000) as i16
    }

    /// Returns the nanosecond component (excluding milliseconds and
    /// microseconds), in the range `0..=999`.
    #[inline]
    pub fn nanosecond(self) -> i16 {
        (self.subsec_nanosecond % 1_000) as i16
    }

    /// Returns the fractional part of the second in units of nanoseconds,
    /// in the range `0..=999_999_999`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.subsec_nanosecond
    }

    /// Returns this time with the given fractional second.
    ///
    /// # Errors
    ///
    /// This returns an error when the value is out of range.
    pub fn with_subsec_nanosecond(self, nanos: i32) -> Result<Time, Error> {
        Time::new(self.hour, self.minute, self.second, nanos)
    }

    fn to_itime(self) -> ITime {
        ITime {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
            subsec_nanosecond: self.subsec_nanosecond,
        }
    }
}

impl Default for Time {
    fn default() -> Time {
        Time::midnight()
    }
}

impl core::fmt::Display for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour, self.minute, self.second)?;
        if self.subsec_nanosecond != 0 {
            let mut digits = format!("{:09}", self.subsec_nanosecond);
            while digits.ends_with('0') {
                digits.pop();
            }
            write!(f, ".{digits}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Time {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// Creates a new `Time` value in a `const` context.
///
/// This is a convenience free function for [`Time::constant`].
///
/// # Panics
///
/// This panics when the given values do not correspond to a valid time.
pub const fn time(
    hour: i8,
    minute: i8,
    second: i8,
    subsec_nanosecond: i32,
) -> Time {
    Time::constant(hour, minute, second, subsec_nanosecond)
}

#[cfg(test)]
impl quickcheck::Arbitrary for Time {
    fn arbitrary(g: &mut quickcheck::Gen) -> Time {
        let nanos = i64::arbitrary(g).rem_euclid(NANOS_PER_DAY);
        Time::from_nanosecond_of_day(nanos).unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Time>> {
        let nanos = self.to_nanosecond_of_day();
        Box::new(
            nanos
                .shrink()
                .filter_map(|n| Time::from_nanosecond_of_day(n).ok()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates() {
        assert!(Time::new(23, 59, 59, 999_999_999).is_ok());
        insta::assert_snapshot!(
            Time::new(24, 0, 0, 0).unwrap_err(),
            @"parameter 'hour' with value 24 is not in the required range of 0..=23",
        );
        insta::assert_snapshot!(
            Time::new(0, 0, 60, 0).unwrap_err(),
            @"parameter 'second' with value 60 is not in the required range of 0..=59",
        );
    }

    #[test]
    fn subsecond_components() {
        let t = time(1, 2, 3, 123_456_789);
        assert_eq!(t.millisecond(), 123);
        assert_eq!(t.microsecond(), 456);
        assert_eq!(t.nanosecond(), 789);
        assert_eq!(t.to_string(), "01:02:03.123456789");
        assert_eq!(time(1, 2, 3, 0).to_string(), "01:02:03");
    }

    quickcheck::quickcheck! {
        fn prop_nanosecond_of_day_roundtrip(t: Time) -> bool {
            Time::from_nanosecond_of_day(t.to_nanosecond_of_day()).unwrap()
                == t
        }
    }
}
