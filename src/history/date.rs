use crate::{error::Error, history::HistoricEra};

/// A date in a historic calendar: era, year of era, month and day of month.
///
/// A `HistoricDate` is only checked for plausible ranges on construction.
/// Whether it actually exists depends on the calendar in effect, which is
/// decided by a [`ChronoHistory`](crate::history::ChronoHistory). For
/// example, `AD-1712-02-30` exists in Sweden but nowhere else.
///
/// Historic dates are ordered by proleptic year, then month, then day.
///
/// # Example
///
/// ```
/// use chronofmt::history::{HistoricDate, HistoricEra};
///
/// let date = HistoricDate::new(HistoricEra::Ad, 1712, 2, 30)?;
/// assert_eq!(date.to_string(), "AD-1712-02-30");
/// assert_eq!(date.proleptic_year(), 1712);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
pub struct HistoricDate {
    era: HistoricEra,
    year_of_era: i32,
    month: i8,
    day: i8,
}

impl HistoricDate {
    /// Creates a historic date.
    ///
    /// # Errors
    ///
    /// This returns an error when the year of era is not in `1..=10_000`,
    /// the month is not in `1..=12` or the day is not in `1..=31`.
    pub fn new(
        era: HistoricEra,
        year_of_era: i32,
        month: i8,
        day: i8,
    ) -> Result<HistoricDate, Error> {
        if !(1..=10_000).contains(&year_of_era) {
            return Err(Error::range("year-of-era", year_of_era, 1, 10_000));
        }
        if !(1..=12).contains(&month) {
            return Err(Error::range("historic-month", month, 1, 12));
        }
        if !(1..=31).contains(&day) {
            return Err(Error::range("historic-day-of-month", day, 1, 31));
        }
        Ok(HistoricDate { era, year_of_era, month, day })
    }

    /// Creates a historic date from a proleptic year without validation.
    pub(crate) fn from_proleptic(
        year: i32,
        month: i8,
        day: i8,
    ) -> HistoricDate {
        let (era, year_of_era) = HistoricEra::split(year);
        HistoricDate { era, year_of_era, month, day }
    }

    /// Returns the era.
    pub fn era(&self) -> HistoricEra {
        self.era
    }

    /// Returns the year of the era, starting at `1`.
    pub fn year_of_era(&self) -> i32 {
        self.year_of_era
    }

    /// Returns the month, in the range `1..=12`.
    pub fn month(&self) -> i8 {
        self.month
    }

    /// Returns the day of the month.
    pub fn day(&self) -> i8 {
        self.day
    }

    /// Returns the proleptic year, where `0` is 1 BC.
    pub fn proleptic_year(&self) -> i32 {
        self.era.annotate(self.year_of_era)
    }

    /// Returns this date with another day of month, without validation.
    pub(crate) fn with_day(self, day: i8) -> HistoricDate {
        HistoricDate { day, ..self }
    }

    fn key(&self) -> (i32, i8, i8) {
        (self.proleptic_year(), self.month, self.day)
    }
}

impl PartialOrd for HistoricDate {
    fn partial_cmp(
        &self,
        other: &HistoricDate,
    ) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HistoricDate {
    fn cmp(&self, other: &HistoricDate) -> core::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

impl core::fmt::Display for HistoricDate {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "{}-{:04}-{:02}-{:02}",
            self.era, self.year_of_era, self.month, self.day,
        )
    }
}

impl core::fmt::Debug for HistoricDate {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering() {
        let bc = HistoricDate::new(HistoricEra::Bc, 1, 12, 31).unwrap();
        let ad = HistoricDate::new(HistoricEra::Ad, 1, 1, 1).unwrap();
        let late_bc = HistoricDate::new(HistoricEra::Bc, 2, 1, 1).unwrap();
        assert!(bc < ad);
        assert!(late_bc < bc);
        assert_eq!(bc.proleptic_year(), 0);
    }

    #[test]
    fn invalid() {
        insta::assert_snapshot!(
            HistoricDate::new(HistoricEra::Ad, 0, 1, 1).unwrap_err(),
            @"parameter 'year-of-era' with value 0 is not in the required range of 1..=10000",
        );
        insta::assert_snapshot!(
            HistoricDate::new(HistoricEra::Ad, 1, 2, 32).unwrap_err(),
            @"parameter 'historic-day-of-month' with value 32 is not in the required range of 1..=31",
        );
    }
}
