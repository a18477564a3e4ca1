use crate::{
    history::{HistoricDate, HistoricEra},
    util::itime::{self, IDate, IEpochDay},
};

/// The unique day count of the Swedish `AD-1712-02-30`.
const SWEDISH_LEAP_DAY: i64 = -94_163;

/// A calendar algorithm converting between historic dates and a continuous
/// count of days since 1970-01-01 (Gregorian).
///
/// Algorithms are stateless. Which algorithm applies to a date is decided
/// by a [`ChronoHistory`](crate::history::ChronoHistory).
///
/// # Example
///
/// ```
/// use chronofmt::history::{CalendarAlgorithm, HistoricDate, HistoricEra};
///
/// let date = HistoricDate::new(HistoricEra::Ad, 1582, 10, 4)?;
/// let day = CalendarAlgorithm::Julian.to_epoch_day(date);
/// let greg = CalendarAlgorithm::Gregorian.from_epoch_day(day);
/// assert_eq!(greg.to_string(), "AD-1582-10-14");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum CalendarAlgorithm {
    /// The proleptic Gregorian calendar.
    Gregorian,
    /// The proleptic Julian calendar.
    Julian,
    /// The Swedish calendar in effect from `AD-1700-03-01` to
    /// `AD-1712-02-30`.
    ///
    /// Sweden skipped the Julian leap day of 1700 and so ran one day ahead
    /// of the Julian calendar, until it returned to it by inserting a
    /// thirtieth of February in 1712.
    Swedish,
}

impl CalendarAlgorithm {
    /// Converts a historic date to a count of days since 1970-01-01.
    ///
    /// The date is assumed to be valid for this algorithm.
    pub fn to_epoch_day(self, date: HistoricDate) -> i64 {
        let year = date.proleptic_year();
        match self {
            CalendarAlgorithm::Gregorian => {
                let idate = IDate {
                    year: year as i16,
                    month: date.month(),
                    day: date.day(),
                };
                i64::from(idate.to_epoch_day().epoch_day)
            }
            CalendarAlgorithm::Julian => {
                itime::julian_to_epoch_day(year, date.month(), date.day())
            }
            CalendarAlgorithm::Swedish => {
                if is_swedish_leap_day(&date) {
                    return SWEDISH_LEAP_DAY;
                }
                itime::julian_to_epoch_day(year, date.month(), date.day()) - 1
            }
        }
    }

    /// Converts a count of days since 1970-01-01 to a historic date.
    pub fn from_epoch_day(self, epoch_day: i64) -> HistoricDate {
        match self {
            CalendarAlgorithm::Gregorian => {
                let IDate { year, month, day } =
                    IEpochDay { epoch_day: epoch_day as i32 }.to_date();
                HistoricDate::from_proleptic(i32::from(year), month, day)
            }
            CalendarAlgorithm::Julian => {
                let (year, month, day) =
                    IEpochDay { epoch_day: epoch_day as i32 }.to_julian();
                HistoricDate::from_proleptic(year, month, day)
            }
            CalendarAlgorithm::Swedish => {
                if epoch_day == SWEDISH_LEAP_DAY {
                    return HistoricDate::from_proleptic(1712, 2, 30);
                }
                CalendarAlgorithm::Julian.from_epoch_day(epoch_day + 1)
            }
        }
    }

    /// Returns true when the date exists in this calendar.
    pub fn is_valid(self, date: HistoricDate) -> bool {
        (1..=self.max_day_of_month(date)).contains(&date.day())
    }

    /// Returns the number of days in the month of the given date.
    pub fn max_day_of_month(self, date: HistoricDate) -> i8 {
        let year = date.proleptic_year();
        match self {
            CalendarAlgorithm::Gregorian => {
                itime::days_in_month(year as i16, date.month())
            }
            CalendarAlgorithm::Julian => {
                itime::julian_days_in_month(year, date.month())
            }
            CalendarAlgorithm::Swedish => {
                if date.era() == HistoricEra::Ad
                    && date.year_of_era() == 1712
                    && date.month() == 2
                {
                    return 30;
                }
                itime::julian_days_in_month(year, date.month())
            }
        }
    }
}

fn is_swedish_leap_day(date: &HistoricDate) -> bool {
    date.era() == HistoricEra::Ad
        && date.year_of_era() == 1712
        && date.month() == 2
        && date.day() == 30
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ad(year: i32, month: i8, day: i8) -> HistoricDate {
        HistoricDate::new(HistoricEra::Ad, year, month, day).unwrap()
    }

    #[test]
    fn julian_and_gregorian() {
        let julian = CalendarAlgorithm::Julian;
        let gregorian = CalendarAlgorithm::Gregorian;
        assert_eq!(julian.to_epoch_day(ad(1582, 10, 4)), -141_428);
        assert_eq!(gregorian.to_epoch_day(ad(1582, 10, 14)), -141_428);
        assert_eq!(julian.to_epoch_day(ad(1970, 1, 1)), 13);
        assert_eq!(julian.from_epoch_day(0), ad(1969, 12, 19));
        assert!(julian.is_valid(ad(1700, 2, 29)));
        assert!(!gregorian.is_valid(ad(1700, 2, 29)));
    }

    #[test]
    fn swedish_anomaly() {
        let swedish = CalendarAlgorithm::Swedish;
        let leap = ad(1712, 2, 30);
        assert!(swedish.is_valid(leap));
        assert_eq!(swedish.to_epoch_day(leap), -94_163);
        assert_eq!(swedish.from_epoch_day(-94_163), leap);
        assert_eq!(swedish.max_day_of_month(ad(1712, 2, 1)), 30);
        assert_eq!(swedish.max_day_of_month(ad(1704, 2, 1)), 29);
        // Julian 1 March 1712 is the day after.
        let march = CalendarAlgorithm::Julian.to_epoch_day(ad(1712, 3, 1));
        assert_eq!(march, -94_162);
        assert_eq!(swedish.to_epoch_day(ad(1700, 3, 1)), -98_546);
        assert_eq!(swedish.from_epoch_day(-98_546), ad(1700, 3, 1));
    }

    #[test]
    fn before_christ() {
        let bc = HistoricDate::new(HistoricEra::Bc, 45, 1, 1).unwrap();
        let day = CalendarAlgorithm::Julian.to_epoch_day(bc);
        assert_eq!(CalendarAlgorithm::Julian.from_epoch_day(day), bc);
    }
}
