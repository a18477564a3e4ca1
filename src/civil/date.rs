use crate::{
    civil::{DateTime, Time, Weekday},
    error::{civil::Error as E, Error},
    util::itime::{self, IDate, IEpochDay},
};

/// A representation of a civil date in the proleptic Gregorian calendar.
///
/// A `Date` value corresponds to a triple of year, month and day. Every
/// `Date` value is guaranteed to be a valid Gregorian calendar date. For
/// example, both `2023-02-29` and `2023-11-31` are invalid and cannot be
/// represented by a `Date`.
///
/// Years are proleptic and may be zero or negative: year `0` is 1 BC. To
/// deal with the Julian calendar or with the switch from the Julian to the
/// Gregorian calendar, use a [`ChronoHistory`](crate::history::ChronoHistory).
///
/// # Example
///
/// ```
/// use chronofmt::civil::Date;
///
/// let d = Date::new(2024, 3, 11)?;
/// assert_eq!(d.to_string(), "2024-03-11");
/// assert_eq!(d.day_of_year(), 71);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Date {
    year: i16,
    month: i8,
    day: i8,
}

impl Date {
    /// The minimum representable Gregorian date.
    pub const MIN: Date = Date::constant(-9999, 1, 1);

    /// The maximum representable Gregorian date.
    pub const MAX: Date = Date::constant(9999, 12, 31);

    /// Creates a new `Date` value from its component year, month and day
    /// values.
    ///
    /// # Errors
    ///
    /// This returns an error when the given year-month-day does not
    /// correspond to a valid date. Namely, all of the following must be
    /// true:
    ///
    /// * The year must be in the range `-9999..=9999`.
    /// * The month must be in the range `1..=12`.
    /// * The day must be at least `1` and must be at most the number of days
    /// in the corresponding month.
    pub fn new(year: i16, month: i8, day: i8) -> Result<Date, Error> {
        if !(-9999..=9999).contains(&year) {
            return Err(Error::range("year", year, -9999, 9999));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("month", month, 1, 12));
        }
        let max_day = itime::days_in_month(year, month);
        if !(1..=max_day).contains(&day) {
            return Err(Error::range("day", day, 1, max_day));
        }
        Ok(Date { year, month, day })
    }

    /// Creates a new `Date` value in a `const` context.
    ///
    /// # Panics
    ///
    /// This routine panics when [`Date::new`] would return an error.
    pub const fn constant(year: i16, month: i8, day: i8) -> Date {
        if year < -9999 || year > 9999 {
            panic!("invalid year");
        }
        if month < 1 || month > 12 {
            panic!("invalid month");
        }
        if day < 1 || day > itime::days_in_month(year, month) {
            panic!("invalid day");
        }
        Date { year, month, day }
    }

    /// Creates a date from a year and an ordinal day of that year, starting
    /// at `1`.
    ///
    /// # Errors
    ///
    /// This returns an error when the year is out of range or when the day
    /// exceeds the number of days in the year.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::civil::{date, Date};
    ///
    /// assert_eq!(Date::from_day_of_year(2024, 60)?, date(2024, 2, 29));
    /// assert!(Date::from_day_of_year(2023, 366).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_day_of_year(year: i16, day: i16) -> Result<Date, Error> {
        let start = Date::new(year, 1, 1)?;
        let max = if itime::is_leap_year(year) { 366 } else { 365 };
        if !(1..=max).contains(&day) {
            return Err(Error::range("day-of-year", day, 1, max));
        }
        Date::from_epoch_day(start.to_epoch_day() + i64::from(day) - 1)
    }

    /// Creates a date from the number of days since 1970-01-01.
    ///
    /// # Errors
    ///
    /// This returns an error when the resulting date would be outside the
    /// range of [`Date::MIN`] to [`Date::MAX`].
    pub fn from_epoch_day(epoch_day: i64) -> Result<Date, Error> {
        let min = Date::MIN.to_epoch_day();
        let max = Date::MAX.to_epoch_day();
        if !(min..=max).contains(&epoch_day) {
            return Err(E::EpochDayRange { epoch_day }.into());
        }
        let idate = IEpochDay { epoch_day: epoch_day as i32 }.to_date();
        Ok(Date::from_idate(idate))
    }

    /// Returns the number of days since 1970-01-01. Dates before the Unix
    /// epoch have a negative count.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::civil::date;
    ///
    /// assert_eq!(date(1970, 1, 2).to_epoch_day(), 1);
    /// assert_eq!(date(1582, 10, 15).to_epoch_day(), -141_427);
    /// ```
    pub fn to_epoch_day(self) -> i64 {
        i64::from(self.to_idate().to_epoch_day().epoch_day)
    }

    /// Returns the year of this date. Year `0` is 1 BC.
    #[inline]
    pub fn year(self) -> i16 {
        self.year
    }

    /// Returns the month of this date, in the range `1..=12`.
    #[inline]
    pub fn month(self) -> i8 {
        self.month
    }

    /// Returns the day of this date, starting at `1`.
    #[inline]
    pub fn day(self) -> i8 {
        self.day
    }

    /// Returns the weekday of this date.
    pub fn weekday(self) -> Weekday {
        let offset = self.to_idate().to_epoch_day().weekday_monday_one();
        Weekday::ALL[usize::from(offset.unsigned_abs() - 1)]
    }

    /// Returns the ordinal day of the year, starting at `1`.
    pub fn day_of_year(self) -> i16 {
        self.to_idate().day_of_year()
    }

    /// Returns the number of days in this date's month.
    pub fn days_in_month(self) -> i8 {
        itime::days_in_month(self.year, self.month)
    }

    /// Returns true when this date's year is a leap year.
    pub fn in_leap_year(self) -> bool {
        itime::is_leap_year(self.year)
    }

    /// Combines this date with the given time.
    pub fn to_datetime(self, time: Time) -> DateTime {
        DateTime::from_parts(self, time)
    }

    pub(crate) fn to_idate(self) -> IDate {
        IDate { year: self.year, month: self.month, day: self.day }
    }

    /// Converts an internal date that is already known to be within
    /// `Date::MIN..=Date::MAX`.
    pub(crate) fn from_idate(idate: IDate) -> Date {
        let IDate { year, month, day } = idate;
        Date { year, month, day }
    }
}

impl core::fmt::Display for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.year < 0 {
            write!(f, "-{:04}", -i32::from(self.year))?;
        } else {
            write!(f, "{:04}", self.year)?;
        }
        write!(f, "-{:02}-{:02}", self.month, self.day)
    }
}

impl core::fmt::Debug for Date {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

/// Creates a new `Date` value in a `const` context.
///
/// This is a convenience free function for [`Date::constant`].
///
/// # Panics
///
/// This panics when the given year-month-day is not a valid date.
///
/// # Example
///
/// ```
/// use chronofmt::civil::date;
///
/// let d = date(2024, 2, 29);
/// assert_eq!(d.to_string(), "2024-02-29");
/// ```
pub const fn date(year: i16, month: i8, day: i8) -> Date {
    Date::constant(year, month, day)
}

#[cfg(test)]
impl quickcheck::Arbitrary for Date {
    fn arbitrary(g: &mut quickcheck::Gen) -> Date {
        let min = Date::MIN.to_epoch_day();
        let max = Date::MAX.to_epoch_day();
        let span = max - min + 1;
        let day = min + i64::arbitrary(g).rem_euclid(span);
        Date::from_epoch_day(day).unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Date>> {
        let day = self.to_epoch_day();
        Box::new(day.shrink().filter_map(|d| Date::from_epoch_day(d).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_validates() {
        assert!(Date::new(2024, 2, 29).is_ok());
        insta::assert_snapshot!(
            Date::new(2023, 2, 29).unwrap_err(),
            @"parameter 'day' with value 29 is not in the required range of 1..=28",
        );
        insta::assert_snapshot!(
            Date::new(2023, 13, 1).unwrap_err(),
            @"parameter 'month' with value 13 is not in the required range of 1..=12",
        );
        insta::assert_snapshot!(
            Date::new(10000, 1, 1).unwrap_err(),
            @"parameter 'year' with value 10000 is not in the required range of -9999..=9999",
        );
    }

    #[test]
    fn epoch_days() {
        assert_eq!(date(1970, 1, 1).to_epoch_day(), 0);
        assert_eq!(date(1712, 3, 11).to_epoch_day(), -94_163);
        assert_eq!(Date::from_epoch_day(-79_367).unwrap(), date(1752, 9, 13));
        insta::assert_snapshot!(
            Date::from_epoch_day(i64::MAX).unwrap_err(),
            @"day 9223372036854775807 since the Unix epoch is outside the supported range of civil dates",
        );
    }

    #[test]
    fn weekdays() {
        assert_eq!(date(1970, 1, 1).weekday(), Weekday::Thursday);
        assert_eq!(date(2024, 3, 11).weekday(), Weekday::Monday);
        assert_eq!(date(1582, 10, 15).weekday(), Weekday::Friday);
    }

    #[test]
    fn display() {
        assert_eq!(date(2024, 3, 1).to_string(), "2024-03-01");
        assert_eq!(date(-44, 3, 15).to_string(), "-0044-03-15");
        assert_eq!(date(0, 1, 1).to_string(), "0000-01-01");
    }

    quickcheck::quickcheck! {
        fn prop_epoch_day_roundtrip(d: Date) -> bool {
            Date::from_epoch_day(d.to_epoch_day()).unwrap() == d
        }

        fn prop_day_of_year_roundtrip(d: Date) -> bool {
            Date::from_day_of_year(d.year(), d.day_of_year()).unwrap() == d
        }
    }
}
