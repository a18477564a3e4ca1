/*!
Historic calendars and the cutovers between them.

A [`ChronoHistory`] describes which [`CalendarAlgorithm`] is in effect at
any given day for some political entity. It starts with an initial
algorithm and switches to other algorithms at a list of cutover days. The
most common history has a single cutover from the Julian to the Gregorian
calendar, but the resolver also supports regional anomalies such as the
Swedish calendar of 1700 to 1712.

When a formatter pattern contains an era symbol, or when a history is
configured explicitly, the year, month and day of a pattern are interpreted
in the historic calendar of the formatter's history.

# Example

```
use chronofmt::{
    civil::date,
    history::{ChronoHistory, HistoricDate, HistoricEra},
};

let sweden = ChronoHistory::of_sweden();
let leap = HistoricDate::new(HistoricEra::Ad, 1712, 2, 30)?;
assert_eq!(sweden.to_date(leap)?, date(1712, 3, 11));
assert_eq!(sweden.convert(date(1712, 3, 11)), leap);

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use std::sync::Arc;

use crate::{
    civil::Date,
    error::{history::Error as E, Error},
    Locale,
};

pub use self::{
    algorithm::CalendarAlgorithm, date::HistoricDate, era::HistoricEra,
};

mod algorithm;
mod date;
mod era;

/// The first day of the Gregorian calendar, 1582-10-15.
const FIRST_GREGORIAN_REFORM: Date = Date::constant(1582, 10, 15);

/// A switch to another calendar algorithm, starting at a given day.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct CutoverEvent {
    /// The first day (since 1970-01-01) on which `algorithm` applies.
    start: i64,
    algorithm: CalendarAlgorithm,
}

/// The chronological history of calendar reforms for a region.
///
/// A history converts between historic dates and civil (proleptic
/// Gregorian) dates by selecting the calendar algorithm in effect for a
/// date. Dates skipped by a cutover fall into a gap and are rejected.
///
/// Histories are cheap to clone and compare equal when they have the same
/// initial algorithm and cutovers.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ChronoHistory {
    initial: CalendarAlgorithm,
    events: Arc<[CutoverEvent]>,
}

impl ChronoHistory {
    /// A history that always uses the Gregorian calendar.
    pub fn proleptic_gregorian() -> ChronoHistory {
        ChronoHistory {
            initial: CalendarAlgorithm::Gregorian,
            events: Arc::from(vec![]),
        }
    }

    /// A history that always uses the Julian calendar.
    pub fn proleptic_julian() -> ChronoHistory {
        ChronoHistory {
            initial: CalendarAlgorithm::Julian,
            events: Arc::from(vec![]),
        }
    }

    /// The history of the first Gregorian reform: the Julian calendar until
    /// 1582-10-04, followed directly by the Gregorian 1582-10-15.
    pub fn of_first_gregorian_reform() -> ChronoHistory {
        ChronoHistory::reform(FIRST_GREGORIAN_REFORM)
    }

    /// The history of a Gregorian reform starting at the given Gregorian
    /// date, with the Julian calendar before it.
    ///
    /// # Errors
    ///
    /// This returns an error when the date is before the first Gregorian
    /// reform of 1582-10-15.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{civil::date, history::ChronoHistory};
    ///
    /// let britain = ChronoHistory::of_gregorian_reform(date(1752, 9, 14))?;
    /// let day = britain.convert(date(1752, 9, 13));
    /// assert_eq!(day.to_string(), "AD-1752-09-02");
    /// assert!(ChronoHistory::of_gregorian_reform(date(1500, 1, 1)).is_err());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn of_gregorian_reform(start: Date) -> Result<ChronoHistory, Error> {
        if start < FIRST_GREGORIAN_REFORM {
            return Err(Error::from(E::ReformTooEarly { date: start }));
        }
        Ok(ChronoHistory::reform(start))
    }

    /// The history of Sweden: the Julian calendar until 1700-02-28, the
    /// Swedish calendar until 1712-02-30, the Julian calendar again until
    /// 1753-02-17 and the Gregorian calendar from 1753-03-01.
    pub fn of_sweden() -> ChronoHistory {
        let events = vec![
            CutoverEvent {
                start: -98_546,
                algorithm: CalendarAlgorithm::Swedish,
            },
            CutoverEvent {
                start: -94_162,
                algorithm: CalendarAlgorithm::Julian,
            },
            CutoverEvent {
                start: Date::constant(1753, 3, 1).to_epoch_day(),
                algorithm: CalendarAlgorithm::Gregorian,
            },
        ];
        ChronoHistory {
            initial: CalendarAlgorithm::Julian,
            events: Arc::from(events),
        }
    }

    /// Returns the history of the given locale's country.
    ///
    /// Sweden has its own history. The British Empire (including its former
    /// colonies in North America) switched in 1752 and Russia in 1918. All
    /// other countries use the first Gregorian reform.
    pub fn for_locale(locale: Locale) -> ChronoHistory {
        match locale.country() {
            Some("SE") => ChronoHistory::of_sweden(),
            Some("GB" | "US" | "CA" | "IE") => {
                ChronoHistory::reform(Date::constant(1752, 9, 14))
            }
            Some("RU") => ChronoHistory::reform(Date::constant(1918, 2, 14)),
            _ => ChronoHistory::of_first_gregorian_reform(),
        }
    }

    fn reform(start: Date) -> ChronoHistory {
        let event = CutoverEvent {
            start: start.to_epoch_day(),
            algorithm: CalendarAlgorithm::Gregorian,
        };
        ChronoHistory {
            initial: CalendarAlgorithm::Julian,
            events: Arc::from(vec![event]),
        }
    }

    /// Returns the first day of the Gregorian calendar in this history, if
    /// it ends in the Gregorian calendar after a cutover.
    pub fn gregorian_cutover_date(&self) -> Option<Date> {
        let last = self.events.last()?;
        if last.algorithm != CalendarAlgorithm::Gregorian {
            return None;
        }
        Date::from_epoch_day(last.start).ok()
    }

    /// Returns the algorithm in effect on the given day since 1970-01-01.
    pub fn algorithm_at(&self, epoch_day: i64) -> CalendarAlgorithm {
        self.events
            .iter()
            .rev()
            .find(|event| event.start <= epoch_day)
            .map_or(self.initial, |event| event.algorithm)
    }

    /// Converts a civil date to the historic date of this history.
    pub fn convert(&self, date: Date) -> HistoricDate {
        let day = date.to_epoch_day();
        self.algorithm_at(day).from_epoch_day(day)
    }

    /// Converts a historic date of this history to a count of days since
    /// 1970-01-01.
    ///
    /// # Errors
    ///
    /// This returns an error when the date does not exist in this history,
    /// either because it is invalid in the calendar in effect or because it
    /// falls into a gap left by a cutover.
    pub fn to_epoch_day(&self, date: HistoricDate) -> Result<i64, Error> {
        let algorithm = self.algorithm_of(date)?;
        if !algorithm.is_valid(date) {
            return Err(Error::from(E::Invalid { date }));
        }
        Ok(algorithm.to_epoch_day(date))
    }

    /// Converts a historic date of this history to a civil date.
    ///
    /// # Errors
    ///
    /// This returns an error when the date does not exist in this history
    /// or when the corresponding civil date is out of range.
    pub fn to_date(&self, date: HistoricDate) -> Result<Date, Error> {
        let day = self.to_epoch_day(date)?;
        Date::from_epoch_day(day)
            .map_err(|_| Error::from(E::Unrepresentable { date }))
    }

    /// Returns true when the historic date exists in this history.
    pub fn is_valid(&self, date: HistoricDate) -> bool {
        self.to_epoch_day(date).is_ok()
    }

    /// Returns the largest valid day of the month of the given date.
    ///
    /// # Errors
    ///
    /// This returns an error when the whole month falls into a gap.
    pub fn max_day_of_month(&self, date: HistoricDate) -> Result<i8, Error> {
        let mut day = 31;
        loop {
            let candidate = date.with_day(day);
            if self.is_valid(candidate) {
                return Ok(day);
            }
            if day == 1 {
                return Err(Error::from(E::Invalid { date }));
            }
            day -= 1;
        }
    }

    /// Returns the number of days in the month of the given date, taking
    /// gaps into account. October 1582 has 21 days in the first Gregorian
    /// reform.
    pub fn length_of_month(&self, date: HistoricDate) -> i8 {
        (1..=31).filter(|&day| self.is_valid(date.with_day(day))).count()
            as i8
    }

    /// Finds the algorithm that applies to the given historic date.
    ///
    /// Events are checked from the latest to the earliest. A date on or
    /// after the first date of an event uses its algorithm. A date after
    /// the last date before the event, but before its first date, is in a
    /// gap.
    fn algorithm_of(
        &self,
        date: HistoricDate,
    ) -> Result<CalendarAlgorithm, Error> {
        for (i, event) in self.events.iter().enumerate().rev() {
            let previous = match i {
                0 => self.initial,
                _ => self.events[i - 1].algorithm,
            };
            let at = event.algorithm.from_epoch_day(event.start);
            if date >= at {
                return Ok(event.algorithm);
            }
            let before = previous.from_epoch_day(event.start - 1);
            if date > before {
                return Err(Error::from(E::Gap { date }));
            }
        }
        Ok(self.initial)
    }
}

impl Default for ChronoHistory {
    fn default() -> ChronoHistory {
        ChronoHistory::of_first_gregorian_reform()
    }
}
