use crate::{
    civil::{Date, Weekday},
    error::Error,
    util::itime::{IDate, IEpochDay},
    Locale,
};

/// Countries whose weekend does not start on Saturday, with the weekday the
/// weekend starts on.
static START_OF_WEEKEND: &[(&str, Weekday)] = &[
    ("AE", Weekday::Friday),
    ("AF", Weekday::Thursday),
    ("BH", Weekday::Friday),
    ("DZ", Weekday::Thursday),
    ("EG", Weekday::Friday),
    ("IL", Weekday::Friday),
    ("IN", Weekday::Sunday),
    ("IQ", Weekday::Friday),
    ("IR", Weekday::Thursday),
    ("JO", Weekday::Friday),
    ("KW", Weekday::Friday),
    ("LY", Weekday::Friday),
    ("MA", Weekday::Friday),
    ("OM", Weekday::Thursday),
    ("QA", Weekday::Friday),
    ("SA", Weekday::Thursday),
    ("SD", Weekday::Friday),
    ("SY", Weekday::Friday),
    ("TN", Weekday::Friday),
    ("YE", Weekday::Thursday),
];

/// Countries whose weekend does not end on Sunday, with the weekday the
/// weekend ends on.
static END_OF_WEEKEND: &[(&str, Weekday)] = &[
    ("AE", Weekday::Saturday),
    ("AF", Weekday::Friday),
    ("BH", Weekday::Saturday),
    ("DZ", Weekday::Friday),
    ("EG", Weekday::Saturday),
    ("IL", Weekday::Saturday),
    ("IQ", Weekday::Saturday),
    ("IR", Weekday::Friday),
    ("JO", Weekday::Saturday),
    ("KW", Weekday::Saturday),
    ("LY", Weekday::Saturday),
    ("MA", Weekday::Saturday),
    ("OM", Weekday::Friday),
    ("QA", Weekday::Saturday),
    ("SA", Weekday::Friday),
    ("SD", Weekday::Saturday),
    ("SY", Weekday::Saturday),
    ("TN", Weekday::Saturday),
    ("YE", Weekday::Friday),
];

/// Countries whose week starts on Sunday.
static SUNDAY_FIRST: &[&str] = &[
    "AG", "AS", "AU", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM",
    "DO", "ET", "GT", "GU", "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE",
    "KH", "KR", "LA", "MH", "MM", "MO", "MT", "MX", "MZ", "NI", "NP", "PA",
    "PE", "PH", "PK", "PR", "PT", "PY", "SA", "SG", "SV", "TH", "TT", "TW",
    "UM", "US", "VE", "VI", "WS", "YE", "ZA", "ZW",
];

/// Locale dependent rules for weeks.
///
/// A week model determines the first day of a week, how many days the first
/// week of a year (or month) must have at minimum, and which days form the
/// weekend. It drives the localized week elements of a formatter: week of
/// year, week of month, week based year and the local day of week.
///
/// # Example
///
/// ```
/// use chronofmt::{civil::{date, Weekday}, Locale, WeekModel};
///
/// let iso = WeekModel::ISO;
/// assert_eq!(iso.week_of_year(date(2021, 1, 3)), (2020, 53));
///
/// let us = WeekModel::of(Locale::US);
/// assert_eq!(us.first_day_of_week(), Weekday::Sunday);
/// assert_eq!(us.week_of_year(date(2021, 1, 3)), (2021, 2));
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct WeekModel {
    first_day_of_week: Weekday,
    minimal_days_in_first_week: i8,
    start_of_weekend: Weekday,
    end_of_weekend: Weekday,
}

impl WeekModel {
    /// The ISO-8601 week model: weeks start on Monday and the first week of
    /// a year has at least four days.
    pub const ISO: WeekModel = WeekModel {
        first_day_of_week: Weekday::Monday,
        minimal_days_in_first_week: 4,
        start_of_weekend: Weekday::Saturday,
        end_of_weekend: Weekday::Sunday,
    };

    /// Creates a week model with a Saturday and Sunday weekend.
    ///
    /// # Errors
    ///
    /// This returns an error when the minimal number of days is not in the
    /// range `1..=7`.
    pub fn new(
        first_day_of_week: Weekday,
        minimal_days_in_first_week: i8,
    ) -> Result<WeekModel, Error> {
        if !(1..=7).contains(&minimal_days_in_first_week) {
            return Err(Error::range(
                "minimal-days-in-first-week",
                minimal_days_in_first_week,
                1,
                7,
            ));
        }
        Ok(WeekModel {
            first_day_of_week,
            minimal_days_in_first_week,
            ..WeekModel::ISO
        })
    }

    /// Returns the week model of the given locale's country.
    ///
    /// Countries whose weeks start on Sunday count every week containing
    /// January 1st as the first week. All other countries follow ISO-8601.
    pub fn of(locale: Locale) -> WeekModel {
        let Some(country) = locale.country() else {
            return WeekModel::ISO;
        };
        let mut model = WeekModel::ISO;
        if SUNDAY_FIRST.contains(&country) {
            model.first_day_of_week = Weekday::Sunday;
            model.minimal_days_in_first_week = 1;
        }
        if let Some(&(_, wd)) =
            START_OF_WEEKEND.iter().find(|(c, _)| *c == country)
        {
            model.start_of_weekend = wd;
        }
        if let Some(&(_, wd)) =
            END_OF_WEEKEND.iter().find(|(c, _)| *c == country)
        {
            model.end_of_weekend = wd;
        }
        model
    }

    /// Returns the first day of a week.
    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Returns the minimal number of days in the first week of a year or
    /// month.
    pub fn minimal_days_in_first_week(&self) -> i8 {
        self.minimal_days_in_first_week
    }

    /// Returns the first day of the weekend.
    pub fn start_of_weekend(&self) -> Weekday {
        self.start_of_weekend
    }

    /// Returns the last day of the weekend.
    pub fn end_of_weekend(&self) -> Weekday {
        self.end_of_weekend
    }

    /// Returns true if the given weekday falls on the weekend.
    pub fn is_weekend(&self, weekday: Weekday) -> bool {
        let len = self.end_of_weekend.since(self.start_of_weekend);
        weekday.since(self.start_of_weekend) <= len
    }

    /// Returns the position of the weekday within a local week, in the range
    /// `1..=7`.
    pub fn local_day_of_week(&self, weekday: Weekday) -> i8 {
        weekday.since(self.first_day_of_week) + 1
    }

    /// Returns the weekday at the given position within a local week.
    ///
    /// # Errors
    ///
    /// This returns an error when the position is not in the range `1..=7`.
    pub fn weekday_from_local(&self, local: i8) -> Result<Weekday, Error> {
        if !(1..=7).contains(&local) {
            return Err(Error::range("local-day-of-week", local, 1, 7));
        }
        Ok(self.first_day_of_week.wrapping_add(i64::from(local - 1)))
    }

    /// Returns the week based year and the week of that year for the given
    /// date.
    pub fn week_of_year(&self, date: Date) -> (i16, i8) {
        let day = date.to_epoch_day();
        let mut year = date.year();
        if day < self.week_one_start(year, 1) {
            year -= 1;
        } else if day >= self.week_one_start(year + 1, 1) {
            year += 1;
        }
        let week = (day - self.week_one_start(year, 1)) / 7 + 1;
        (year, week as i8)
    }

    /// Returns the week of the month for the given date. Days before the
    /// first week of a month are in week `0`.
    pub fn week_of_month(&self, date: Date) -> i8 {
        let day = date.to_epoch_day();
        let start = self.week_one_start(date.year(), date.month());
        (day - start).div_euclid(7) as i8 + 1
    }

    /// Returns the number of weeks in the given week based year.
    pub fn weeks_in_year(&self, year: i16) -> i8 {
        let days =
            self.week_one_start(year + 1, 1) - self.week_one_start(year, 1);
        (days / 7) as i8
    }

    /// Returns the date of the given local day in the given week of a week
    /// based year.
    ///
    /// # Errors
    ///
    /// This returns an error when the week or the day is out of range, or
    /// when the resulting date is not representable.
    pub fn date_of_week(
        &self,
        year: i16,
        week: i8,
        local_day: i8,
    ) -> Result<Date, Error> {
        if !(-9999..=9999).contains(&year) {
            return Err(Error::range("week-based-year", year, -9999, 9999));
        }
        let max = self.weeks_in_year(year);
        if !(1..=max).contains(&week) {
            return Err(Error::range("week-of-year", week, 1, max));
        }
        if !(1..=7).contains(&local_day) {
            return Err(Error::range("local-day-of-week", local_day, 1, 7));
        }
        let day = self.week_one_start(year, 1)
            + 7 * i64::from(week - 1)
            + i64::from(local_day - 1);
        Date::from_epoch_day(day)
    }

    /// Returns the epoch day starting the first week of the given month.
    ///
    /// This works on internal dates, so the year may be one beyond the
    /// range of civil dates.
    fn week_one_start(&self, year: i16, month: i8) -> i64 {
        let first = IDate { year, month, day: 1 }.to_epoch_day();
        let weekday = weekday_of(first);
        let before = i64::from(weekday.since(self.first_day_of_week));
        let start = i64::from(first.epoch_day) - before;
        if 7 - before >= i64::from(self.minimal_days_in_first_week) {
            start
        } else {
            start + 7
        }
    }
}

impl Default for WeekModel {
    fn default() -> WeekModel {
        WeekModel::ISO
    }
}

fn weekday_of(day: IEpochDay) -> Weekday {
    let offset = day.weekday_monday_one();
    Weekday::ALL[usize::from(offset.unsigned_abs() - 1)]
}

#[cfg(test)]
mod tests {
    use crate::civil::date;

    use super::*;

    #[test]
    fn iso_weeks() {
        let iso = WeekModel::ISO;
        assert_eq!(iso.week_of_year(date(2020, 12, 31)), (2020, 53));
        assert_eq!(iso.week_of_year(date(2024, 12, 30)), (2025, 1));
        assert_eq!(iso.week_of_year(date(2024, 3, 11)), (2024, 11));
        assert_eq!(iso.weeks_in_year(2020), 53);
        assert_eq!(iso.weeks_in_year(2021), 52);
        assert_eq!(iso.date_of_week(2025, 1, 1).unwrap(), date(2024, 12, 30));
    }

    #[test]
    fn us_weeks() {
        let us = WeekModel::of(Locale::US);
        assert_eq!(us.minimal_days_in_first_week(), 1);
        assert_eq!(us.local_day_of_week(Weekday::Sunday), 1);
        assert_eq!(us.local_day_of_week(Weekday::Saturday), 7);
        assert_eq!(us.weekday_from_local(2).unwrap(), Weekday::Monday);
        assert_eq!(us.week_of_year(date(2022, 12, 31)), (2022, 53));
        assert_eq!(us.week_of_month(date(2024, 3, 1)), 1);
        assert_eq!(us.week_of_month(date(2024, 3, 3)), 2);
    }

    #[test]
    fn weekends() {
        let de = WeekModel::of(Locale::GERMANY);
        assert!(de.is_weekend(Weekday::Sunday));
        assert!(!de.is_weekend(Weekday::Friday));
        let eg = WeekModel::of(Locale::new("ar", Some("EG")).unwrap());
        assert!(eg.is_weekend(Weekday::Friday));
        assert!(eg.is_weekend(Weekday::Saturday));
        assert!(!eg.is_weekend(Weekday::Sunday));
    }

    quickcheck::quickcheck! {
        fn prop_week_date_roundtrip(d: Date) -> bool {
            let iso = WeekModel::ISO;
            let (year, week) = iso.week_of_year(d);
            let local = iso.local_day_of_week(d.weekday());
            // Week based years at the edges of the civil range may begin or
            // end outside of it.
            match iso.date_of_week(year, week, local) {
                Ok(got) => got == d,
                Err(_) => !(-9998..=9998).contains(&d.year()),
            }
        }
    }
}
