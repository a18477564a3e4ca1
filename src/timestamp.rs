use crate::{
    civil::DateTime,
    error::Error,
    tz::{Offset, TimeZone},
    Zoned,
};

/// An instant in time represented as the number of seconds and nanoseconds
/// since the Unix epoch, `1970-01-01T00:00:00Z`.
///
/// A timestamp has no calendar or time zone of its own. Printing one with a
/// [`Formatter`](crate::fmt::Formatter) therefore requires a time zone
/// attribute, which is used to compute the civil fields that are printed.
///
/// The range of a timestamp is chosen such that converting it to a civil
/// datetime at any valid [`Offset`] always succeeds.
///
/// # Example
///
/// ```
/// use chronofmt::Timestamp;
///
/// let ts = Timestamp::new(1_700_000_000, 500_000_000)?;
/// assert_eq!(ts.to_string(), "2023-11-14T22:13:20.5Z");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Timestamp {
    second: i64,
    nanosecond: i32,
}

impl Timestamp {
    /// The minimum representable timestamp.
    ///
    /// This is `-9999-01-01T00:00:00` at the minimum offset.
    pub const MIN: Timestamp =
        Timestamp { second: -377_705_109_601, nanosecond: 0 };

    /// The maximum representable timestamp.
    ///
    /// This is `9999-12-31T23:59:59.999999999` at the maximum offset.
    pub const MAX: Timestamp =
        Timestamp { second: 253_402_207_200, nanosecond: 999_999_999 };

    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    pub const UNIX_EPOCH: Timestamp = Timestamp { second: 0, nanosecond: 0 };

    /// Creates a new timestamp from seconds since the Unix epoch and a
    /// non-negative nanosecond fraction. Instants before the epoch have a
    /// negative second and count their fraction forwards, so
    /// `Timestamp::new(-1, 500_000_000)` is half a second before the epoch.
    ///
    /// # Errors
    ///
    /// This returns an error when the second is outside the supported range
    /// or when the nanosecond is not in `0..=999_999_999`.
    pub fn new(second: i64, nanosecond: i32) -> Result<Timestamp, Error> {
        let (min, max) = (Timestamp::MIN.second, Timestamp::MAX.second);
        if !(min..=max).contains(&second) {
            return Err(Error::range("unix-seconds", second, min, max));
        }
        if !(0..=999_999_999).contains(&nanosecond) {
            return Err(Error::range(
                "nanosecond",
                nanosecond,
                0,
                999_999_999,
            ));
        }
        Ok(Timestamp { second, nanosecond })
    }

    /// Creates a new timestamp from a whole number of seconds since the
    /// Unix epoch.
    pub fn from_second(second: i64) -> Result<Timestamp, Error> {
        Timestamp::new(second, 0)
    }

    /// Creates a new timestamp from a number of milliseconds since the Unix
    /// epoch.
    pub fn from_millisecond(millisecond: i64) -> Result<Timestamp, Error> {
        let second = millisecond.div_euclid(1_000);
        let nanosecond = (millisecond.rem_euclid(1_000) * 1_000_000) as i32;
        Timestamp::new(second, nanosecond)
    }

    /// Returns the current system time as a timestamp.
    ///
    /// # Panics
    ///
    /// This panics if the system clock is set to a time outside the
    /// supported range of timestamps.
    #[cfg(feature = "std")]
    pub fn now() -> Timestamp {
        let (second, nanosecond) = match std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
        {
            Ok(dur) => (dur.as_secs() as i64, dur.subsec_nanos() as i32),
            Err(err) => {
                let dur = err.duration();
                let mut second = -(dur.as_secs() as i64);
                let mut nanosecond = dur.subsec_nanos() as i32;
                if nanosecond > 0 {
                    second -= 1;
                    nanosecond = 1_000_000_000 - nanosecond;
                }
                (second, nanosecond)
            }
        };
        Timestamp::new(second, nanosecond)
            .expect("system time is within the supported range")
    }

    /// Returns the number of whole seconds since the Unix epoch, rounding
    /// towards negative infinity.
    #[inline]
    pub fn as_second(self) -> i64 {
        self.second
    }

    /// Returns the number of milliseconds since the Unix epoch, rounding
    /// towards negative infinity.
    pub fn as_millisecond(self) -> i64 {
        self.second * 1_000 + i64::from(self.nanosecond / 1_000_000)
    }

    /// Returns the fractional second in nanoseconds, always in the range
    /// `0..=999_999_999`.
    #[inline]
    pub fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Returns this timestamp moved by the given number of seconds, clamped
    /// to the supported range.
    pub(crate) fn saturating_add_seconds(self, seconds: i64) -> Timestamp {
        let second = self
            .second
            .saturating_add(seconds)
            .clamp(Timestamp::MIN.second, Timestamp::MAX.second);
        Timestamp { second, ..self }
    }

    /// Returns the civil datetime of this timestamp at the given offset.
    pub fn to_datetime(self, offset: Offset) -> DateTime {
        offset.to_datetime(self)
    }

    /// Converts this timestamp to a zoned datetime in the given time zone,
    /// using the built-in time zone provider.
    ///
    /// # Errors
    ///
    /// This returns an error when the time zone identifier is unknown.
    pub fn to_zoned(self, tz: TimeZone) -> Result<Zoned, Error> {
        Zoned::new(self, tz)
    }
}

impl core::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}Z", Offset::UTC.to_datetime(*self))
    }
}

impl core::fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Timestamp {
    fn arbitrary(g: &mut quickcheck::Gen) -> Timestamp {
        let (min, max) = (Timestamp::MIN.second, Timestamp::MAX.second);
        let second = min + i64::arbitrary(g).rem_euclid(max - min + 1);
        let nanosecond = i32::arbitrary(g).rem_euclid(1_000_000_000);
        Timestamp::new(second, nanosecond).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::datetime;

    use super::*;

    #[test]
    fn negative_millisecond() {
        let ts = Timestamp::from_millisecond(-1).unwrap();
        assert_eq!(ts.as_second(), -1);
        assert_eq!(ts.subsec_nanosecond(), 999_000_000);
        assert_eq!(ts.as_millisecond(), -1);
        assert_eq!(ts.to_string(), "1969-12-31T23:59:59.999Z");
    }

    #[test]
    fn range() {
        insta::assert_snapshot!(
            Timestamp::from_second(i64::MAX).unwrap_err(),
            @"parameter 'unix-seconds' with value 9223372036854775807 is not in the required range of -377705109601..=253402207200",
        );
        assert_eq!(
            Timestamp::MIN.to_datetime(Offset::MIN),
            datetime(-9999, 1, 1, 0, 0, 0, 0),
        );
        assert_eq!(
            Timestamp::MAX.to_datetime(Offset::MAX),
            datetime(9999, 12, 31, 23, 59, 59, 999_999_999),
        );
    }

    quickcheck::quickcheck! {
        fn prop_datetime_roundtrip(ts: Timestamp) -> bool {
            let offset = Offset::constant(-7);
            offset.to_timestamp(offset.to_datetime(ts)).unwrap() == ts
        }
    }
}
