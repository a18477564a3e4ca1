use crate::{
    civil::{Date, Time},
    error::{fmt::FormatError as FE, Error},
    fmt::{AttributeQuery, Decimal, Element, Value},
    tz::{Offset, TimeZone},
    util::itime::MJD_UNIX_EPOCH,
    Timestamp,
};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// The parts of a temporal value that a formatter prints from.
///
/// A [`Chronology`](crate::fmt::Chronology) produces a snapshot of a value
/// with those parts it has. Printing an element whose part is absent
/// fails.
///
/// # Example
///
/// ```
/// use chronofmt::{civil::date, fmt::Snapshot};
///
/// let snapshot = Snapshot::new().date(date(2024, 7, 9));
/// assert_eq!(snapshot.get_date(), Some(date(2024, 7, 9)));
/// assert_eq!(snapshot.get_time(), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    date: Option<Date>,
    time: Option<Time>,
    zone: Option<(TimeZone, Offset, Timestamp)>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Snapshot {
        Snapshot::default()
    }

    /// Sets the calendar date.
    pub fn date(self, date: Date) -> Snapshot {
        Snapshot { date: Some(date), ..self }
    }

    /// Sets the time of day.
    pub fn time(self, time: Time) -> Snapshot {
        Snapshot { time: Some(time), ..self }
    }

    /// Sets the time zone along with its offset at the given instant.
    pub fn zone(
        self,
        tz: TimeZone,
        offset: Offset,
        timestamp: Timestamp,
    ) -> Snapshot {
        Snapshot { zone: Some((tz, offset, timestamp)), ..self }
    }

    /// Returns the calendar date, if any.
    pub fn get_date(&self) -> Option<Date> {
        self.date
    }

    /// Returns the time of day, if any.
    pub fn get_time(&self) -> Option<Time> {
        self.time
    }

    /// Returns the time zone, if any.
    pub fn get_zone(&self) -> Option<&TimeZone> {
        self.zone.as_ref().map(|(tz, _, _)| tz)
    }

    /// Returns the offset, if any.
    pub fn get_offset(&self) -> Option<Offset> {
        self.zone.as_ref().map(|&(_, offset, _)| offset)
    }

    /// Returns the instant, if any.
    pub fn get_instant(&self) -> Option<Timestamp> {
        self.zone.as_ref().map(|&(_, _, ts)| ts)
    }
}

/// Returns the value of an element in a snapshot.
///
/// Historic and week elements are derived with the history and week model
/// resolved by the query.
pub(crate) fn value_of(
    element: Element,
    snapshot: &Snapshot,
    query: &AttributeQuery<'_>,
) -> Result<Value, Error> {
    use self::Element::*;

    let absent = || Error::from(FE::ElementAbsent { element });
    if element.is_zone() {
        return match element {
            TimeZoneId => snapshot.get_zone().cloned().map(Value::Zone),
            _ => snapshot.get_offset().map(Value::Offset),
        }
        .ok_or_else(absent);
    }
    if element.is_date() {
        let date = snapshot.date.ok_or_else(absent)?;
        let value = match element {
            Era | YearOfEra | HistoricMonth | HistoricDayOfMonth => {
                let historic = query.history().convert(date);
                match element {
                    Era => historic.era().value(),
                    YearOfEra => i64::from(historic.year_of_era()),
                    HistoricMonth => i64::from(historic.month()),
                    _ => i64::from(historic.day()),
                }
            }
            Year => i64::from(date.year()),
            YearOfWeekdate => {
                i64::from(query.week_model().week_of_year(date).0)
            }
            Quarter => i64::from((date.month() - 1) / 3 + 1),
            Month => i64::from(date.month()),
            WeekOfYear => i64::from(query.week_model().week_of_year(date).1),
            WeekOfMonth => i64::from(query.week_model().week_of_month(date)),
            DayOfMonth => i64::from(date.day()),
            DayOfYear => i64::from(date.day_of_year()),
            DayOfWeek => i64::from(date.weekday().to_monday_one_offset()),
            LocalDayOfWeek => {
                let model = query.week_model();
                i64::from(model.local_day_of_week(date.weekday()))
            }
            WeekdayInMonth => i64::from((date.day() - 1) / 7 + 1),
            ModifiedJulianDay => date.to_epoch_day() + MJD_UNIX_EPOCH,
            _ => unreachable!("{element} is not a date element"),
        };
        return Ok(Value::Int(value));
    }

    let time = snapshot.time.ok_or_else(absent)?;
    let hour = i64::from(time.hour());
    let nanos = i64::from(time.subsec_nanosecond());
    let of_day = time.to_nanosecond_of_day();
    let value = match element {
        AmPm => i64::from(hour >= 12),
        ClockHourOfAmPm => match hour % 12 {
            0 => 12,
            h => h,
        },
        DigitalHourOfAmPm => hour % 12,
        ClockHourOfDay => match hour {
            0 => 24,
            h => h,
        },
        DigitalHourOfDay => hour,
        Minute => i64::from(time.minute()),
        Second => i64::from(time.second()),
        MilliOfSecond => nanos / 1_000_000,
        MicroOfSecond => nanos / 1_000,
        NanoOfSecond => nanos,
        MilliOfDay => of_day / 1_000_000,
        NanoOfDay => of_day,
        DecimalHour => {
            return Ok(Value::Decimal(decimal(of_day, NANOS_PER_HOUR)))
        }
        DecimalMinute => {
            let of_hour = of_day % NANOS_PER_HOUR;
            return Ok(Value::Decimal(decimal(of_hour, NANOS_PER_MINUTE)));
        }
        DecimalSecond => {
            let of_minute = of_day % NANOS_PER_MINUTE;
            return Ok(Value::Decimal(decimal(of_minute, NANOS_PER_SECOND)));
        }
        _ => unreachable!("{element} is not a time element"),
    };
    Ok(Value::Int(value))
}

/// Returns `nanos / unit` as a decimal with the maximum scale.
fn decimal(nanos: i64, unit: i64) -> Decimal {
    let scale = 10i128.pow(u32::from(Decimal::MAX_SCALE));
    let units = i128::from(nanos) * scale / i128::from(unit);
    // At most 24 * 10^15, which fits.
    Decimal::new(units as i64, Decimal::MAX_SCALE)
}

/// Returns the integer value of an element in a snapshot.
pub(crate) fn int_of(
    element: Element,
    snapshot: &Snapshot,
    query: &AttributeQuery<'_>,
) -> Result<i64, Error> {
    value_of(element, snapshot, query)?
        .as_int()
        .ok_or_else(|| FE::UnexpectedValue { element }.into())
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::{date, time},
        fmt::Attributes,
        history::ChronoHistory,
        Locale,
    };

    use super::*;

    #[test]
    fn date_values() {
        let attrs = Attributes::new().locale(Locale::US);
        let query = AttributeQuery::of(&attrs);
        let snapshot = Snapshot::new().date(date(2024, 7, 9));
        let get = |e| int_of(e, &snapshot, &query).unwrap();
        assert_eq!(get(Element::Quarter), 3);
        assert_eq!(get(Element::DayOfWeek), 2);
        // Sunday starts the week in the US.
        assert_eq!(get(Element::LocalDayOfWeek), 3);
        assert_eq!(get(Element::WeekdayInMonth), 2);
        assert_eq!(get(Element::DayOfYear), 191);
        assert_eq!(get(Element::ModifiedJulianDay), 60_500);
        assert_eq!(get(Element::Era), 1);
        insta::assert_snapshot!(
            int_of(Element::Minute, &snapshot, &query).unwrap_err(),
            @"element MINUTE_OF_HOUR cannot be printed because the value has no such element",
        );
    }

    #[test]
    fn historic_values() {
        let attrs = Attributes::new().history(ChronoHistory::of_sweden());
        let query = AttributeQuery::of(&attrs);
        let snapshot = Snapshot::new().date(date(1712, 3, 11));
        let get = |e| int_of(e, &snapshot, &query).unwrap();
        assert_eq!(get(Element::YearOfEra), 1712);
        assert_eq!(get(Element::HistoricMonth), 2);
        assert_eq!(get(Element::HistoricDayOfMonth), 30);
        assert_eq!(get(Element::Year), 1712);
        assert_eq!(get(Element::Month), 3);
    }

    #[test]
    fn time_values() {
        let attrs = Attributes::new();
        let query = AttributeQuery::of(&attrs);
        let snapshot = Snapshot::new().time(time(0, 30, 15, 250_000_000));
        let get = |e| int_of(e, &snapshot, &query).unwrap();
        assert_eq!(get(Element::ClockHourOfDay), 24);
        assert_eq!(get(Element::ClockHourOfAmPm), 12);
        assert_eq!(get(Element::AmPm), 0);
        assert_eq!(get(Element::MilliOfSecond), 250);
        assert_eq!(get(Element::MilliOfDay), 1_815_250);

        let value = value_of(Element::DecimalHour, &snapshot, &query);
        insta::assert_snapshot!(value.unwrap(), @"0.504236111111111");
        let value = value_of(Element::DecimalSecond, &snapshot, &query);
        insta::assert_snapshot!(value.unwrap(), @"15.25");
    }
}
