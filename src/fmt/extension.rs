use crate::{
    error::Error,
    fmt::{
        chronology::{get, weekday_of},
        AttributeQuery, Element, ParsedValues,
    },
    history::{HistoricDate, HistoricEra},
};

/// A derivation of elements from other parsed elements.
///
/// Extensions run after parsing and before a
/// [`Chronology`](crate::fmt::Chronology) constructs its value. They let a
/// chronology accept elements it cannot construct values from directly,
/// such as historic or week based elements, by translating them into
/// elements it can.
pub trait Extension: core::fmt::Debug + Send + Sync {
    /// Adds the elements derived from `values` to `values`.
    ///
    /// An extension that finds nothing to derive leaves the values alone.
    fn resolve(
        &self,
        values: &mut ParsedValues,
        query: &AttributeQuery<'_>,
    ) -> Result<(), Error>;
}

/// Derives the proleptic date from a historic era, year of era, month and
/// day of month, using the history of the query.
///
/// The era is required. Formatters whose pattern has no era can supply one
/// with [`Formatter::with_default`](crate::fmt::Formatter::with_default).
#[derive(Debug)]
pub(crate) struct HistoryExtension;

impl Extension for HistoryExtension {
    fn resolve(
        &self,
        values: &mut ParsedValues,
        query: &AttributeQuery<'_>,
    ) -> Result<(), Error> {
        let (Some(era), Some(year), Some(month), Some(day)) = (
            get::<i64>(values, Element::Era)?,
            get::<i32>(values, Element::YearOfEra)?,
            get::<i8>(values, Element::HistoricMonth)?,
            get::<i8>(values, Element::HistoricDayOfMonth)?,
        ) else {
            return Ok(());
        };
        let era = HistoricEra::from_value(era)?;
        let historic = HistoricDate::new(era, year, month, day)?;
        let date = query.history().to_date(historic)?;
        trace!("resolved historic date {historic} to {date}");
        values.put(Element::Year, i64::from(date.year()))?;
        values.put(Element::Month, i64::from(date.month()))?;
        values.put(Element::DayOfMonth, i64::from(date.day()))?;
        Ok(())
    }
}

/// Derives the calendar date from a week based year, a week of year and a
/// day of week, using the week model of the query.
#[derive(Debug)]
pub(crate) struct WeekExtension;

impl Extension for WeekExtension {
    fn resolve(
        &self,
        values: &mut ParsedValues,
        query: &AttributeQuery<'_>,
    ) -> Result<(), Error> {
        let (Some(year), Some(week)) = (
            get::<i16>(values, Element::YearOfWeekdate)?,
            get::<i8>(values, Element::WeekOfYear)?,
        ) else {
            return Ok(());
        };
        let Some(weekday) = weekday_of(values, query)? else {
            return Ok(());
        };
        let model = query.week_model();
        let local = model.local_day_of_week(weekday);
        let date = model.date_of_week(year, week, local)?;
        values.put(Element::Year, i64::from(date.year()))?;
        values.put(Element::Month, i64::from(date.month()))?;
        values.put(Element::DayOfMonth, i64::from(date.day()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::date,
        fmt::{Attributes, Chronology},
        history::ChronoHistory,
        Locale,
    };

    use super::*;

    #[test]
    fn historic() {
        let _ = env_logger::try_init();

        let history = ChronoHistory::of_first_gregorian_reform();
        let attrs = Attributes::new().history(history);
        let query = AttributeQuery::of(&attrs);
        let mut values = ParsedValues::new();
        values.set(Element::Era, 1);
        values.set(Element::YearOfEra, 1582);
        values.set(Element::HistoricMonth, 10);
        values.set(Element::HistoricDayOfMonth, 4);
        HistoryExtension.resolve(&mut values, &query).unwrap();
        // The last Julian day before the reform.
        assert_eq!(
            crate::civil::Date::create_from(&values, &query, false).unwrap(),
            Some(date(1582, 10, 14)),
        );

        // Days skipped by the reform do not exist.
        let mut values = ParsedValues::new();
        values.set(Element::Era, 1);
        values.set(Element::YearOfEra, 1582);
        values.set(Element::HistoricMonth, 10);
        values.set(Element::HistoricDayOfMonth, 10);
        assert!(HistoryExtension.resolve(&mut values, &query).is_err());

        // Without an era nothing is derived.
        let mut values = ParsedValues::new();
        values.set(Element::YearOfEra, 1582);
        values.set(Element::HistoricMonth, 10);
        values.set(Element::HistoricDayOfMonth, 4);
        HistoryExtension.resolve(&mut values, &query).unwrap();
        assert!(!values.contains(Element::Year));
    }

    #[test]
    fn weeks() {
        let iso = Attributes::new().locale(Locale::GERMANY);
        let mut values = ParsedValues::new();
        values.set(Element::YearOfWeekdate, 2025);
        values.set(Element::WeekOfYear, 1);
        values.set(Element::DayOfWeek, 1);
        WeekExtension.resolve(&mut values, &AttributeQuery::of(&iso)).unwrap();
        assert_eq!(values.get_int(Element::Year), Some(2024));
        assert_eq!(values.get_int(Element::Month), Some(12));
        assert_eq!(values.get_int(Element::DayOfMonth), Some(30));

        // A conflicting calendar year is ambivalent.
        let mut values = ParsedValues::new();
        values.set(Element::Year, 2025);
        values.set(Element::YearOfWeekdate, 2025);
        values.set(Element::WeekOfYear, 1);
        values.set(Element::DayOfWeek, 1);
        let err = WeekExtension
            .resolve(&mut values, &AttributeQuery::of(&iso))
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"ambivalent value for element YEAR: parsed 2024 but already found 2025",
        );
    }
}
