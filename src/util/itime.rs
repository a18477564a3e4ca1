/*!
This module defines the internal core calendar and clock arithmetic.

These routines work on simple primitive integer types and implicitly assume
that the inputs are valid (i.e., within the crate's minimum and maximum
ranges). Callers are responsible for validation.

Two calendars are supported: the proleptic Gregorian calendar (via the
Neri-Schneider algorithms) and the proleptic Julian calendar (via Julian day
numbers). Both count days relative to the Unix epoch, 1970-01-01 in the
Gregorian calendar.

# Naming

The types in this module are prefixed with letter `I` to make it clear that
they are internal types. For example, `Date` versus `IDate`.
*/

/// The Julian day number of the Unix epoch.
const UNIX_EPOCH_JDN: i64 = 2_440_588;

/// The number of seconds in a civil day.
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// The number of nanoseconds in a civil day.
pub(crate) const NANOS_PER_DAY: i64 = 86_400_000_000_000;

/// The difference between a modified Julian day number and a Unix epoch day.
pub(crate) const MJD_UNIX_EPOCH: i64 = 40_587;

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IEpochDay {
    pub(crate) epoch_day: i32,
}

impl IEpochDay {
    /// Converts days since the Unix epoch to a Gregorian date.
    ///
    /// This is Neri-Schneider. There's no branching or divisions.
    ///
    /// Ref: <https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L40C3-L40C34>
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_date(&self) -> IDate {
        const s: u32 = 82;
        const K: u32 = 719468 + 146097 * s;
        const L: u32 = 400 * s;

        let N_U = self.epoch_day as u32;
        let N = N_U.wrapping_add(K);

        let N_1 = 4 * N + 3;
        let C = N_1 / 146097;
        let N_C = (N_1 % 146097) / 4;

        let N_2 = 4 * N_C + 3;
        let P_2 = 2939745 * (N_2 as u64);
        let Z = (P_2 / 4294967296) as u32;
        let N_Y = (P_2 % 4294967296) as u32 / 2939745 / 4;
        let Y = 100 * C + Z;

        let N_3 = 2141 * N_Y + 197913;
        let M = N_3 / 65536;
        let D = (N_3 % 65536) / 2141;

        let J = N_Y >= 306;
        let year = Y.wrapping_sub(L).wrapping_add(J as u32) as i16;
        let month = (if J { M - 12 } else { M }) as i8;
        let day = (D + 1) as i8;
        IDate { year, month, day }
    }

    /// Converts days since the Unix epoch to a date in the proleptic Julian
    /// calendar.
    ///
    /// The year returned is proleptic, i.e., `0` is 1 BC and `-1` is 2 BC.
    #[inline]
    pub(crate) const fn to_julian(&self) -> (i32, i8, i8) {
        let c = self.epoch_day as i64 + UNIX_EPOCH_JDN + 32_082;
        let d = (4 * c + 3).div_euclid(1461);
        let e = c - (1461 * d).div_euclid(4);
        let m = (5 * e + 2).div_euclid(153);
        let day = e - (153 * m + 2).div_euclid(5) + 1;
        let month = m + 3 - 12 * m.div_euclid(10);
        let year = d - 4800 + m.div_euclid(10);
        (year as i32, month as i8, day as i8)
    }

    /// Returns the weekday of this epoch day, where Monday is `1` and Sunday
    /// is `7`.
    #[inline]
    pub(crate) const fn weekday_monday_one(&self) -> i8 {
        // 1970-01-01 was a Thursday.
        ((self.epoch_day as i64 + 3).rem_euclid(7) + 1) as i8
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct IDate {
    pub(crate) year: i16,
    pub(crate) month: i8,
    pub(crate) day: i8,
}

impl IDate {
    /// Converts a Gregorian date to days since the Unix epoch.
    ///
    /// This is Neri-Schneider. There's no branching or divisions.
    ///
    /// Ref: https://github.com/cassioneri/eaf/blob/684d3cc32d14eee371d0abe4f683d6d6a49ed5c1/algorithms/neri_schneider.hpp#L83
    #[inline(always)]
    #[allow(non_upper_case_globals, non_snake_case)] // to mimic source
    pub(crate) const fn to_epoch_day(&self) -> IEpochDay {
        const s: u32 = 82;
        const K: u32 = 719468 + 146097 * s;
        const L: u32 = 400 * s;

        let year = self.year as u32;
        let month = self.month as u32;
        let day = self.day as u32;

        let J = month <= 2;
        let Y = year.wrapping_add(L).wrapping_sub(J as u32);
        let M = if J { month + 12 } else { month };
        let D = day - 1;
        let C = Y / 100;

        let y_star = 1461 * Y / 4 - C + C / 4;
        let m_star = (979 * M - 2919) / 32;
        let N = y_star + m_star + D;

        let N_U = N.wrapping_sub(K);
        let epoch_day = N_U as i32;
        IEpochDay { epoch_day }
    }

    /// Returns the ordinal day of this date within its year, starting at
    /// `1`.
    #[inline]
    pub(crate) const fn day_of_year(&self) -> i16 {
        let start = IDate { year: self.year, month: 1, day: 1 };
        let days =
            self.to_epoch_day().epoch_day - start.to_epoch_day().epoch_day;
        (days + 1) as i16
    }
}

/// Converts a date in the proleptic Julian calendar to days since the Unix
/// epoch.
///
/// The year given is proleptic, i.e., `0` is 1 BC and `-1` is 2 BC.
#[inline]
pub(crate) const fn julian_to_epoch_day(year: i32, month: i8, day: i8) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month).div_euclid(12);
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    let jdn = day + (153 * m + 2).div_euclid(5) + 365 * y + y.div_euclid(4)
        - 32_083;
    jdn - UNIX_EPOCH_JDN
}

/// Represents a clock time.
///
/// This uses units of hours, minutes, seconds and fractional seconds (to
/// nanosecond precision).
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
pub(crate) struct ITime {
    pub(crate) hour: i8,
    pub(crate) minute: i8,
    pub(crate) second: i8,
    pub(crate) subsec_nanosecond: i32,
}

impl ITime {
    pub(crate) const ZERO: ITime =
        ITime { hour: 0, minute: 0, second: 0, subsec_nanosecond: 0 };

    #[inline(always)]
    pub(crate) const fn to_nanosecond(&self) -> i64 {
        let mut nanosecond: i64 = 0;
        nanosecond += (self.hour as i64) * 3_600_000_000_000;
        nanosecond += (self.minute as i64) * 60_000_000_000;
        nanosecond += (self.second as i64) * 1_000_000_000;
        nanosecond += self.subsec_nanosecond as i64;
        nanosecond
    }

    /// Converts nanoseconds since midnight to a clock time.
    ///
    /// The value given must be in the range `0..NANOS_PER_DAY`.
    #[inline(always)]
    pub(crate) const fn from_nanosecond(mut nanosecond: i64) -> ITime {
        let mut time = ITime::ZERO;
        time.hour = (nanosecond / 3_600_000_000_000) as i8;
        nanosecond %= 3_600_000_000_000;
        time.minute = (nanosecond / 60_000_000_000) as i8;
        nanosecond %= 60_000_000_000;
        time.second = (nanosecond / 1_000_000_000) as i8;
        time.subsec_nanosecond = (nanosecond % 1_000_000_000) as i32;
        time
    }
}

/// Returns true if and only if the given year is a leap year in the
/// Gregorian calendar.
///
/// A leap year is a year with 366 days. Typical years have 365 days.
#[inline]
pub(crate) const fn is_leap_year(year: i16) -> bool {
    let d = if year % 25 != 0 { 4 } else { 16 };
    (year % d) == 0
}

/// Returns true if and only if the given proleptic year is a leap year in
/// the Julian calendar.
#[inline]
pub(crate) const fn is_julian_leap_year(year: i32) -> bool {
    year.rem_euclid(4) == 0
}

/// Return the number of days in the given Gregorian month.
#[inline]
pub(crate) const fn days_in_month(year: i16, month: i8) -> i8 {
    if month == 2 {
        if is_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

/// Return the number of days in the given Julian month.
#[inline]
pub(crate) const fn julian_days_in_month(year: i32, month: i8) -> i8 {
    if month == 2 {
        if is_julian_leap_year(year) {
            29
        } else {
            28
        }
    } else {
        30 | (month ^ month >> 3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_epochday_date() {
        for year in -9999..=9999 {
            for month in 1..=12 {
                for day in 1..=days_in_month(year, month) {
                    let date = IDate { year, month, day };
                    let epoch_day = date.to_epoch_day();
                    let date_roundtrip = epoch_day.to_date();
                    assert_eq!(date, date_roundtrip);
                }
            }
        }
    }

    #[test]
    fn roundtrip_julian() {
        for year in -5000..=9999 {
            for month in 1..=12 {
                for day in 1..=julian_days_in_month(year, month) {
                    let epoch_day = julian_to_epoch_day(year, month, day);
                    let got = IEpochDay { epoch_day: epoch_day as i32 }
                        .to_julian();
                    assert_eq!((year, month, day), got);
                }
            }
        }
    }

    #[test]
    fn julian_known_days() {
        // The Julian calendar was 13 days behind in 1970.
        assert_eq!(julian_to_epoch_day(1969, 12, 19), 0);
        // Last Julian day before the first Gregorian reform.
        let before = julian_to_epoch_day(1582, 10, 4);
        let after = IDate { year: 1582, month: 10, day: 15 }.to_epoch_day();
        assert_eq!(before + 1, i64::from(after.epoch_day));
        assert_eq!(before, -141_428);
    }

    #[test]
    fn weekday_of_epoch_days() {
        assert_eq!(IEpochDay { epoch_day: 0 }.weekday_monday_one(), 4);
        assert_eq!(IEpochDay { epoch_day: -1 }.weekday_monday_one(), 3);
        assert_eq!(IEpochDay { epoch_day: 4 }.weekday_monday_one(), 1);
    }

    #[test]
    fn ordinal_days() {
        assert_eq!(IDate { year: 2024, month: 1, day: 1 }.day_of_year(), 1);
        assert_eq!(IDate { year: 2024, month: 3, day: 1 }.day_of_year(), 61);
        let last = IDate { year: 2023, month: 12, day: 31 };
        assert_eq!(last.day_of_year(), 365);
    }

    #[test]
    fn roundtrip_nanosecond_time() {
        for second in 0..=86_399 {
            for nanosecond in
                [0, 250_000_000, 500_000_000, 750_000_000, 900_000_000]
            {
                let nanosecond = second * 1_000_000_000 + nanosecond;
                let time = ITime::from_nanosecond(nanosecond);
                assert_eq!(nanosecond, time.to_nanosecond());
            }
        }
    }

    #[test]
    fn leap_year() {
        assert!(!is_leap_year(1900));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(2001));
        assert!(is_leap_year(2004));
        assert!(is_julian_leap_year(1900));
        assert!(is_julian_leap_year(1700));
        assert!(is_julian_leap_year(0));
        assert!(is_julian_leap_year(-4));
        assert!(!is_julian_leap_year(-1));
    }

    #[test]
    fn number_of_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2025, 2), 28);
        assert_eq!(days_in_month(2025, 4), 30);
        assert_eq!(days_in_month(2025, 12), 31);
        assert_eq!(julian_days_in_month(1900, 2), 29);
        assert_eq!(julian_days_in_month(1901, 2), 28);
        assert_eq!(julian_days_in_month(1901, 7), 31);
    }
}
