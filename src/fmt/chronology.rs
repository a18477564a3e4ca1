use crate::{
    civil::{Date, DateTime, Time, Weekday},
    error::{fmt::FormatError as FE, Error},
    fmt::{
        extension::{Extension, HistoryExtension, WeekExtension},
        AttributeQuery, Element, ParsedValues, Snapshot,
    },
    tz::TimeZone,
    util::itime::MJD_UNIX_EPOCH,
    Timestamp, Zoned,
};

const NANOS_PER_SECOND: i64 = 1_000_000_000;
const NANOS_PER_MINUTE: i64 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i64 = 60 * NANOS_PER_MINUTE;

/// A temporal type that a [`Formatter`](crate::fmt::Formatter) can print
/// and parse.
///
/// A chronology declares which elements its values have, produces a
/// [`Snapshot`] of a value for printing and constructs a value from the
/// elements parsed from text.
///
/// This crate implements the trait for [`Date`], [`Time`], [`DateTime`],
/// [`Timestamp`] and [`Zoned`].
pub trait Chronology:
    Sized + Clone + core::fmt::Debug + Send + Sync + 'static
{
    /// A short name of the type, used in error messages.
    const NAME: &'static str;

    /// Returns whether values of this type have the given element.
    ///
    /// A formatter refuses to build when it contains an element that is
    /// not supported by its chronology.
    fn is_supported(element: Element) -> bool;

    /// Returns the parts of this value that elements are printed from.
    fn snapshot(&self, query: &AttributeQuery<'_>) -> Result<Snapshot, Error>;

    /// Constructs a value from parsed elements.
    ///
    /// This returns `Ok(None)` when the parsed elements are insufficient
    /// to determine a value, and an error when they are present but
    /// invalid. When `partial` is true, elements of lesser significance
    /// that are missing take their smallest value. Formatters request
    /// partial construction only under lax leniency.
    fn create_from(
        values: &ParsedValues,
        query: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<Self>, Error>;

    /// Returns the extensions that derive the elements of this type from
    /// other parsed elements before construction.
    fn extensions() -> &'static [&'static dyn Extension] {
        &[]
    }

    /// Replaces the fraction of the second with the given nanoseconds.
    ///
    /// This is called after construction when a fraction was parsed with
    /// more precision than the fraction elements carry.
    fn with_fraction(self, _nanos: i32) -> Result<Self, Error> {
        Ok(self)
    }

    /// Returns the instant of this value, if it denotes one.
    fn timestamp(&self) -> Option<Timestamp> {
        None
    }
}

static DATE_EXTENSIONS: [&'static dyn Extension; 2] =
    [&HistoryExtension, &WeekExtension];

impl Chronology for Date {
    const NAME: &'static str = "Date";

    fn is_supported(element: Element) -> bool {
        element.is_date()
    }

    fn snapshot(&self, _: &AttributeQuery<'_>) -> Result<Snapshot, Error> {
        Ok(Snapshot::new().date(*self))
    }

    fn create_from(
        values: &ParsedValues,
        query: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<Date>, Error> {
        create_date(values, query, partial)
    }

    fn extensions() -> &'static [&'static dyn Extension] {
        &DATE_EXTENSIONS
    }
}

impl Chronology for Time {
    const NAME: &'static str = "Time";

    fn is_supported(element: Element) -> bool {
        element.is_time()
    }

    fn snapshot(&self, _: &AttributeQuery<'_>) -> Result<Snapshot, Error> {
        Ok(Snapshot::new().time(*self))
    }

    fn create_from(
        values: &ParsedValues,
        _: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<Time>, Error> {
        create_time(values, partial)
    }

    fn with_fraction(self, nanos: i32) -> Result<Time, Error> {
        self.with_subsec_nanosecond(nanos)
    }
}

impl Chronology for DateTime {
    const NAME: &'static str = "DateTime";

    fn is_supported(element: Element) -> bool {
        !element.is_zone()
    }

    fn snapshot(&self, _: &AttributeQuery<'_>) -> Result<Snapshot, Error> {
        Ok(Snapshot::new().date(self.date()).time(self.time()))
    }

    fn create_from(
        values: &ParsedValues,
        query: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<DateTime>, Error> {
        let Some(date) = create_date(values, query, partial)? else {
            return Ok(None);
        };
        let Some(time) = create_time(values, partial)? else {
            return Ok(None);
        };
        Ok(Some(date.to_datetime(time)))
    }

    fn extensions() -> &'static [&'static dyn Extension] {
        &DATE_EXTENSIONS
    }

    fn with_fraction(self, nanos: i32) -> Result<DateTime, Error> {
        let time = self.time().with_subsec_nanosecond(nanos)?;
        Ok(self.date().to_datetime(time))
    }
}

impl Chronology for Timestamp {
    const NAME: &'static str = "Timestamp";

    fn is_supported(_: Element) -> bool {
        true
    }

    fn snapshot(&self, query: &AttributeQuery<'_>) -> Result<Snapshot, Error> {
        let tz = query.time_zone().ok_or(FE::TimeZoneRequired)?;
        let offset = tz.to_offset_with(*self, query.zone_provider())?;
        let dt = offset.to_datetime(*self);
        Ok(Snapshot::new().date(dt.date()).time(dt.time()).zone(
            tz.clone(),
            offset,
            *self,
        ))
    }

    fn create_from(
        values: &ParsedValues,
        query: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<Timestamp>, Error> {
        let Some(dt) = DateTime::create_from(values, query, partial)? else {
            return Ok(None);
        };
        // A parsed offset pins the instant exactly, even when a zone
        // identifier was parsed as well.
        let zone = match values.get(Element::Offset) {
            Some(value) => value.as_offset().map(TimeZone::fixed),
            None => zone_of(values, query),
        };
        let Some(tz) = zone else { return Ok(None) };
        let ts = tz.to_timestamp_with(
            dt,
            query.disambiguation(),
            query.zone_provider(),
        )?;
        Ok(Some(ts))
    }

    fn extensions() -> &'static [&'static dyn Extension] {
        &DATE_EXTENSIONS
    }

    fn with_fraction(self, nanos: i32) -> Result<Timestamp, Error> {
        Timestamp::new(self.as_second(), nanos)
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(*self)
    }
}

impl Chronology for Zoned {
    const NAME: &'static str = "Zoned";

    fn is_supported(_: Element) -> bool {
        true
    }

    fn snapshot(&self, _: &AttributeQuery<'_>) -> Result<Snapshot, Error> {
        Ok(Snapshot::new().date(self.date()).time(self.time()).zone(
            self.time_zone().clone(),
            self.offset(),
            self.timestamp(),
        ))
    }

    fn create_from(
        values: &ParsedValues,
        query: &AttributeQuery<'_>,
        partial: bool,
    ) -> Result<Option<Zoned>, Error> {
        let Some(ts) = Timestamp::create_from(values, query, partial)? else {
            return Ok(None);
        };
        let offset = values.get(Element::Offset).and_then(|v| v.as_offset());
        let Some(tz) = zone_of(values, query).or(offset.map(TimeZone::fixed))
        else {
            return Ok(None);
        };
        Zoned::with_provider(ts, tz, query.zone_provider()).map(Some)
    }

    fn extensions() -> &'static [&'static dyn Extension] {
        &DATE_EXTENSIONS
    }

    fn with_fraction(self, nanos: i32) -> Result<Zoned, Error> {
        self.with_subsec_nanosecond(nanos)
    }

    fn timestamp(&self) -> Option<Timestamp> {
        Some(Zoned::timestamp(self))
    }
}

/// Returns the parsed zone identifier, or else the time zone attribute.
fn zone_of(
    values: &ParsedValues,
    query: &AttributeQuery<'_>,
) -> Option<TimeZone> {
    values
        .get(Element::TimeZoneId)
        .and_then(|v| v.as_zone())
        .or(query.time_zone())
        .cloned()
}

/// Returns the parsed integer value of an element, checked against the
/// element's range and converted to `T`.
pub(crate) fn get<T: TryFrom<i64>>(
    values: &ParsedValues,
    element: Element,
) -> Result<Option<T>, Error> {
    let Some(n) = values.get_int(element) else { return Ok(None) };
    let (min, max) = element.range().unwrap_or((i64::MIN, i64::MAX));
    if !(min..=max).contains(&n) {
        return Err(Error::range(element.name(), n, min, max));
    }
    T::try_from(n)
        .map(Some)
        .map_err(|_| Error::range(element.name(), n, min, max))
}

/// Returns the parsed value of a decimal element in nanoseconds of the
/// given unit.
fn decimal_nanos(
    values: &ParsedValues,
    element: Element,
    unit: i64,
) -> Result<Option<i64>, Error> {
    let Some(d) = values.get(element).and_then(|v| v.as_decimal()) else {
        return Ok(None);
    };
    let (min, max) = element.range().unwrap_or((0, 0));
    let integer = d.integer();
    if !(min..=max).contains(&integer) {
        return Err(Error::range(element.name(), integer, min, max));
    }
    // Bounded by one day in nanoseconds.
    Ok(Some(d.mul_trunc(unit) as i64))
}

fn create_date(
    values: &ParsedValues,
    query: &AttributeQuery<'_>,
    partial: bool,
) -> Result<Option<Date>, Error> {
    use self::Element::*;

    if let Some(mjd) = get::<i64>(values, ModifiedJulianDay)? {
        return Date::from_epoch_day(mjd - MJD_UNIX_EPOCH).map(Some);
    }
    let Some(year) = get::<i16>(values, Year)? else { return Ok(None) };
    if let Some(month) = get::<i8>(values, Month)? {
        if let Some(day) = get::<i8>(values, DayOfMonth)? {
            return Date::new(year, month, day).map(Some);
        }
        if let Some(nth) = get::<i8>(values, WeekdayInMonth)? {
            let Some(weekday) = weekday_of(values, query)? else {
                return Ok(None);
            };
            let first = Date::new(year, month, 1)?;
            let day = 1 + weekday.since(first.weekday()) + 7 * (nth - 1);
            let max = first.days_in_month();
            if day > max {
                return Err(Error::range(DayOfMonth.name(), day, 1, max));
            }
            return Date::new(year, month, day).map(Some);
        }
        if partial {
            return Date::new(year, month, 1).map(Some);
        }
        return Ok(None);
    }
    if let Some(day) = get::<i16>(values, DayOfYear)? {
        return Date::from_day_of_year(year, day).map(Some);
    }
    if partial {
        return Date::new(year, 1, 1).map(Some);
    }
    Ok(None)
}

/// Returns the parsed weekday, from either the ISO or the localized day of
/// week.
pub(crate) fn weekday_of(
    values: &ParsedValues,
    query: &AttributeQuery<'_>,
) -> Result<Option<Weekday>, Error> {
    if let Some(n) = get::<i8>(values, Element::DayOfWeek)? {
        return Weekday::from_monday_one_offset(n).map(Some);
    }
    if let Some(n) = get::<i8>(values, Element::LocalDayOfWeek)? {
        return query.week_model().weekday_from_local(n).map(Some);
    }
    Ok(None)
}

fn create_time(
    values: &ParsedValues,
    partial: bool,
) -> Result<Option<Time>, Error> {
    use self::Element::*;

    if let Some(nanos) = get::<i64>(values, NanoOfDay)? {
        return Time::from_nanosecond_of_day(nanos).map(Some);
    }
    if let Some(millis) = get::<i64>(values, MilliOfDay)? {
        return Time::from_nanosecond_of_day(millis * 1_000_000).map(Some);
    }
    if let Some(nanos) = decimal_nanos(values, DecimalHour, NANOS_PER_HOUR)? {
        return Time::from_nanosecond_of_day(nanos).map(Some);
    }
    let hour = match hour_of(values)? {
        Some(hour) => hour,
        None if partial => 0,
        None => return Ok(None),
    };
    let mut nanos = hour * NANOS_PER_HOUR;
    if let Some(n) = decimal_nanos(values, DecimalMinute, NANOS_PER_MINUTE)? {
        nanos += n;
    } else {
        nanos += get::<i64>(values, Minute)?.unwrap_or(0) * NANOS_PER_MINUTE;
        if let Some(n) =
            decimal_nanos(values, DecimalSecond, NANOS_PER_SECOND)?
        {
            nanos += n;
        } else {
            let second = get::<i64>(values, Second)?.unwrap_or(0);
            nanos += second * NANOS_PER_SECOND + fraction_of(values)?;
        }
    }
    Time::from_nanosecond_of_day(nanos).map(Some)
}

/// Returns the hour of day from whichever hour elements were parsed.
fn hour_of(values: &ParsedValues) -> Result<Option<i64>, Error> {
    use self::Element::*;

    if let Some(hour) = get::<i64>(values, DigitalHourOfDay)? {
        return Ok(Some(hour));
    }
    if let Some(hour) = get::<i64>(values, ClockHourOfDay)? {
        return Ok(Some(hour % 24));
    }
    let Some(pm) = get::<i64>(values, AmPm)? else { return Ok(None) };
    let hour = match get::<i64>(values, DigitalHourOfAmPm)? {
        Some(hour) => hour,
        None => match get::<i64>(values, ClockHourOfAmPm)? {
            Some(hour) => hour % 12,
            None => return Ok(None),
        },
    };
    Ok(Some(12 * pm + hour))
}

/// Returns the fraction of the second in nanoseconds.
fn fraction_of(values: &ParsedValues) -> Result<i64, Error> {
    use self::Element::*;

    if let Some(nanos) = get::<i64>(values, NanoOfSecond)? {
        return Ok(nanos);
    }
    if let Some(micros) = get::<i64>(values, MicroOfSecond)? {
        return Ok(micros * 1_000);
    }
    Ok(get::<i64>(values, MilliOfSecond)?.unwrap_or(0) * 1_000_000)
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::{date, datetime, time},
        fmt::{Attributes, Decimal},
        tz::Offset,
        Locale,
    };

    use super::*;

    fn values(pairs: &[(Element, i64)]) -> ParsedValues {
        let mut values = ParsedValues::new();
        for &(element, n) in pairs {
            values.set(element, n);
        }
        values
    }

    #[test]
    fn date_sources() {
        use crate::fmt::Element::*;

        let attrs = Attributes::new().locale(Locale::US);
        let query = AttributeQuery::of(&attrs);
        let create = |pairs: &[(Element, i64)]| {
            Date::create_from(&values(pairs), &query, false).unwrap()
        };
        assert_eq!(
            create(&[(Year, 2024), (Month, 7), (DayOfMonth, 9)]),
            Some(date(2024, 7, 9)),
        );
        assert_eq!(
            create(&[(ModifiedJulianDay, 60_500)]),
            Some(date(2024, 7, 9)),
        );
        assert_eq!(
            create(&[(Year, 2024), (DayOfYear, 191)]),
            Some(date(2024, 7, 9)),
        );
        // The second Tuesday of July 2024.
        assert_eq!(
            create(&[
                (Year, 2024),
                (Month, 7),
                (WeekdayInMonth, 2),
                (DayOfWeek, 2),
            ]),
            Some(date(2024, 7, 9)),
        );
        // Tuesday is the third day of the week in the US.
        assert_eq!(
            create(&[
                (Year, 2024),
                (Month, 7),
                (WeekdayInMonth, 2),
                (LocalDayOfWeek, 3),
            ]),
            Some(date(2024, 7, 9)),
        );
        assert_eq!(create(&[(Year, 2024), (Month, 7)]), None);

        let partial = Date::create_from(
            &values(&[(Year, 2024), (Month, 7)]),
            &query,
            true,
        );
        assert_eq!(partial.unwrap(), Some(date(2024, 7, 1)));

        let err = Date::create_from(
            &values(&[(Year, 2024), (Month, 2), (DayOfMonth, 30)]),
            &query,
            false,
        )
        .unwrap_err();
        assert!(err.is_range());
        let err = Date::create_from(
            &values(&[
                (Year, 2024),
                (Month, 7),
                (WeekdayInMonth, 5),
                (DayOfWeek, 7),
            ]),
            &query,
            false,
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"parameter 'DAY_OF_MONTH' with value 35 is not in the required range of 1..=31",
        );
    }

    #[test]
    fn time_sources() {
        use crate::fmt::Element::*;

        let attrs = Attributes::new();
        let query = AttributeQuery::of(&attrs);
        let create = |values: &ParsedValues| {
            Time::create_from(values, &query, false).unwrap()
        };
        assert_eq!(
            create(&values(&[(ClockHourOfDay, 24), (Minute, 5)])),
            Some(time(0, 5, 0, 0)),
        );
        assert_eq!(
            create(&values(&[(AmPm, 1), (ClockHourOfAmPm, 12)])),
            Some(time(12, 0, 0, 0)),
        );
        assert_eq!(
            create(&values(&[(AmPm, 0), (ClockHourOfAmPm, 12)])),
            Some(time(0, 0, 0, 0)),
        );
        assert_eq!(
            create(&values(&[
                (DigitalHourOfDay, 17),
                (Minute, 30),
                (Second, 15),
                (MilliOfSecond, 250),
            ])),
            Some(time(17, 30, 15, 250_000_000)),
        );
        assert_eq!(create(&values(&[(ClockHourOfAmPm, 5)])), None);

        let mut decimal = ParsedValues::new();
        decimal.set(DecimalHour, Decimal::new(125, 1));
        assert_eq!(create(&decimal), Some(time(12, 30, 0, 0)));
    }

    #[test]
    fn instants() {
        let mut parsed = values(&[
            (Element::Year, 2024),
            (Element::Month, 7),
            (Element::DayOfMonth, 9),
            (Element::DigitalHourOfDay, 17),
        ]);
        let attrs = Attributes::new();
        let query = AttributeQuery::of(&attrs);
        assert_eq!(
            Timestamp::create_from(&parsed, &query, false).unwrap(),
            None,
        );

        parsed.set(Element::Offset, Offset::constant(2));
        let ts = Timestamp::create_from(&parsed, &query, false).unwrap();
        assert_eq!(
            ts.map(|ts| ts.to_datetime(Offset::UTC)),
            Some(datetime(2024, 7, 9, 15, 0, 0, 0)),
        );

        parsed.remove(Element::Offset);
        let berlin = TimeZone::get("Europe/Berlin").unwrap();
        let attrs = Attributes::new().time_zone(berlin.clone());
        let query = AttributeQuery::of(&attrs);
        let zdt = Zoned::create_from(&parsed, &query, false).unwrap().unwrap();
        assert_eq!(zdt.time_zone(), &berlin);
        assert_eq!(zdt.offset(), Offset::constant(2));
        assert_eq!(zdt.datetime(), datetime(2024, 7, 9, 17, 0, 0, 0));
    }

    #[test]
    fn timestamp_requires_zone() {
        let ts = Timestamp::from_second(0).unwrap();
        let attrs = Attributes::new();
        let err = ts.snapshot(&AttributeQuery::of(&attrs)).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"a time zone attribute is required to print a timestamp",
        );
    }
}
