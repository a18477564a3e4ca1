use crate::{
    fmt::catalog::TextKind,
    tz::{Offset, TimeZone},
};

/// A formattable and parseable element of a temporal value.
///
/// The set of elements is closed. Each element has a stable upper case
/// name (used in error messages and in the `Display` impl of
/// [`ParsedValues`](crate::fmt::ParsedValues)), a numerical range (if it is
/// numerical) and a magnitude class which limits the number of digits a
/// formatter may use for it.
///
/// The historic elements ([`Element::Era`], [`Element::YearOfEra`],
/// [`Element::HistoricMonth`] and [`Element::HistoricDayOfMonth`]) are views
/// of a date through a [`ChronoHistory`](crate::history::ChronoHistory).
/// They are computed with the history configured on a formatter.
///
/// # Example
///
/// ```
/// use chronofmt::fmt::Element;
///
/// assert_eq!(Element::DayOfMonth.name(), "DAY_OF_MONTH");
/// assert_eq!(Element::DayOfMonth.range(), Some((1, 31)));
/// assert!(Element::YearOfEra.is_historic());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[non_exhaustive]
pub enum Element {
    /// The historic era, `0` for BC and `1` for AD.
    Era,
    /// The year of the historic era, always positive.
    YearOfEra,
    /// The month in the historic calendar.
    HistoricMonth,
    /// The day of month in the historic calendar.
    HistoricDayOfMonth,
    /// The proleptic ISO year.
    Year,
    /// The year of a week based date, per the configured week model.
    YearOfWeekdate,
    /// The quarter of the year, `1` through `4`.
    Quarter,
    /// The ISO month, `1` through `12`.
    Month,
    /// The week of the week based year, per the configured week model.
    WeekOfYear,
    /// The week of the month, per the configured week model.
    WeekOfMonth,
    /// The ISO day of month.
    DayOfMonth,
    /// The ISO day of year.
    DayOfYear,
    /// The ISO weekday, Monday is `1` and Sunday is `7`.
    DayOfWeek,
    /// The weekday counted from the first day of week of the configured week
    /// model, starting at `1`.
    LocalDayOfWeek,
    /// The ordinal of the weekday within its month, starting at `1`.
    WeekdayInMonth,
    /// The modified Julian day number, a day count starting at
    /// 1858-11-17.
    ModifiedJulianDay,
    /// `0` for AM and `1` for PM.
    AmPm,
    /// The hour of the half day on a clock, `1` through `12`.
    ClockHourOfAmPm,
    /// The hour of the half day, `0` through `11`.
    DigitalHourOfAmPm,
    /// The hour of the day on a clock, `1` through `24`.
    ClockHourOfDay,
    /// The hour of the day, `0` through `23`.
    DigitalHourOfDay,
    Minute,
    Second,
    MilliOfSecond,
    MicroOfSecond,
    NanoOfSecond,
    MilliOfDay,
    NanoOfDay,
    /// The hour of the day with minutes and seconds as a decimal fraction.
    DecimalHour,
    /// The minute of the hour with seconds as a decimal fraction.
    DecimalMinute,
    /// The second of the minute with its fraction.
    DecimalSecond,
    /// The time zone, as an identifier or a name.
    TimeZoneId,
    /// The offset from UTC.
    Offset,
}

impl Element {
    /// Returns the stable upper case name of this element.
    pub fn name(self) -> &'static str {
        use self::Element::*;

        match self {
            Era => "ERA",
            YearOfEra => "YEAR_OF_ERA",
            HistoricMonth => "HISTORIC_MONTH",
            HistoricDayOfMonth => "HISTORIC_DAY_OF_MONTH",
            Year => "YEAR",
            YearOfWeekdate => "YEAR_OF_WEEKDATE",
            Quarter => "QUARTER_OF_YEAR",
            Month => "MONTH_OF_YEAR",
            WeekOfYear => "WEEK_OF_YEAR",
            WeekOfMonth => "WEEK_OF_MONTH",
            DayOfMonth => "DAY_OF_MONTH",
            DayOfYear => "DAY_OF_YEAR",
            DayOfWeek => "DAY_OF_WEEK",
            LocalDayOfWeek => "LOCAL_DAY_OF_WEEK",
            WeekdayInMonth => "WEEKDAY_IN_MONTH",
            ModifiedJulianDay => "MODIFIED_JULIAN_DAY",
            AmPm => "AM_PM_OF_DAY",
            ClockHourOfAmPm => "CLOCK_HOUR_OF_AMPM",
            DigitalHourOfAmPm => "DIGITAL_HOUR_OF_AMPM",
            ClockHourOfDay => "CLOCK_HOUR_OF_DAY",
            DigitalHourOfDay => "DIGITAL_HOUR_OF_DAY",
            Minute => "MINUTE_OF_HOUR",
            Second => "SECOND_OF_MINUTE",
            MilliOfSecond => "MILLI_OF_SECOND",
            MicroOfSecond => "MICRO_OF_SECOND",
            NanoOfSecond => "NANO_OF_SECOND",
            MilliOfDay => "MILLI_OF_DAY",
            NanoOfDay => "NANO_OF_DAY",
            DecimalHour => "DECIMAL_HOUR",
            DecimalMinute => "DECIMAL_MINUTE",
            DecimalSecond => "DECIMAL_SECOND",
            TimeZoneId => "TIMEZONE_ID",
            Offset => "TIMEZONE_OFFSET",
        }
    }

    /// Returns the inclusive range of integer values of this element.
    ///
    /// Decimal elements report the range of their integral part. Zone
    /// elements have no range.
    pub fn range(self) -> Option<(i64, i64)> {
        use self::Element::*;

        let range = match self {
            Era | AmPm => (0, 1),
            YearOfEra => (1, 10_000),
            HistoricMonth | Month => (1, 12),
            HistoricDayOfMonth | DayOfMonth => (1, 31),
            Year | YearOfWeekdate => (-9999, 9999),
            Quarter => (1, 4),
            WeekOfYear => (1, 53),
            WeekOfMonth => (0, 6),
            DayOfYear => (1, 366),
            DayOfWeek | LocalDayOfWeek => (1, 7),
            WeekdayInMonth => (1, 5),
            ModifiedJulianDay => (-4_331_001, 2_973_483),
            ClockHourOfAmPm => (1, 12),
            DigitalHourOfAmPm => (0, 11),
            ClockHourOfDay => (1, 24),
            DigitalHourOfDay | DecimalHour => (0, 23),
            Minute | Second | DecimalMinute | DecimalSecond => (0, 59),
            MilliOfSecond => (0, 999),
            MicroOfSecond => (0, 999_999),
            NanoOfSecond => (0, 999_999_999),
            MilliOfDay => (0, 86_399_999),
            NanoOfDay => (0, 86_399_999_999_999),
            TimeZoneId | Offset => return None,
        };
        Some(range)
    }

    /// Returns true if values of this element are integers printed with
    /// digits.
    ///
    /// Text elements such as the era or the weekday are numerical too, since
    /// their values are integers that may also be printed as digits.
    pub fn is_numerical(self) -> bool {
        !matches!(
            self,
            Element::DecimalHour
                | Element::DecimalMinute
                | Element::DecimalSecond
                | Element::TimeZoneId
                | Element::Offset
        )
    }

    /// Returns true if this element has a decimal value.
    pub fn is_decimal(self) -> bool {
        matches!(
            self,
            Element::DecimalHour
                | Element::DecimalMinute
                | Element::DecimalSecond
        )
    }

    /// Returns true if this element is a view through a calendar history.
    pub fn is_historic(self) -> bool {
        matches!(
            self,
            Element::Era
                | Element::YearOfEra
                | Element::HistoricMonth
                | Element::HistoricDayOfMonth
        )
    }

    /// Returns true if this element belongs to the date part of a value.
    pub fn is_date(self) -> bool {
        use self::Element::*;

        matches!(
            self,
            Era | YearOfEra
                | HistoricMonth
                | HistoricDayOfMonth
                | Year
                | YearOfWeekdate
                | Quarter
                | Month
                | WeekOfYear
                | WeekOfMonth
                | DayOfMonth
                | DayOfYear
                | DayOfWeek
                | LocalDayOfWeek
                | WeekdayInMonth
                | ModifiedJulianDay
        )
    }

    /// Returns true if this element belongs to the time of day part of a
    /// value.
    pub fn is_time(self) -> bool {
        !self.is_date() && !self.is_zone()
    }

    /// Returns true if this element describes a time zone or an offset.
    pub fn is_zone(self) -> bool {
        matches!(self, Element::TimeZoneId | Element::Offset)
    }

    /// Returns the maximum number of digits this element may be printed
    /// with. This is 18 for elements with 64-bit values and 9 otherwise.
    pub(crate) fn scale(self) -> u8 {
        match self {
            Element::NanoOfDay => 18,
            _ => 9,
        }
    }

    /// Returns the catalog kind of this element, if it can be printed as
    /// text.
    pub(crate) fn text_kind(self) -> Option<TextKind> {
        use self::Element::*;

        let kind = match self {
            Era => TextKind::Era,
            HistoricMonth | Month => TextKind::Month,
            Quarter => TextKind::Quarter,
            DayOfWeek | LocalDayOfWeek => TextKind::Weekday,
            AmPm => TextKind::AmPm,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns the element this one is replaced with once an era appears in
    /// a pattern.
    pub(crate) fn historic_counterpart(self) -> Option<Element> {
        match self {
            Element::Year => Some(Element::YearOfEra),
            Element::Month => Some(Element::HistoricMonth),
            Element::DayOfMonth => Some(Element::HistoricDayOfMonth),
            _ => None,
        }
    }
}

impl core::fmt::Display for Element {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The value of an element.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Value {
    /// The value of a numerical element.
    Int(i64),
    /// The value of a decimal element.
    Decimal(Decimal),
    /// The value of [`Element::TimeZoneId`].
    Zone(TimeZone),
    /// The value of [`Element::Offset`].
    Offset(Offset),
}

impl Value {
    /// Returns the integer in this value, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the decimal in this value, if it is one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match *self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the time zone in this value, if it is one.
    pub fn as_zone(&self) -> Option<&TimeZone> {
        match *self {
            Value::Zone(ref tz) => Some(tz),
            _ => None,
        }
    }

    /// Returns the offset in this value, if it is one.
    pub fn as_offset(&self) -> Option<Offset> {
        match *self {
            Value::Offset(offset) => Some(offset),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Int(i64::from(n))
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Value {
        Value::Decimal(d)
    }
}

impl From<TimeZone> for Value {
    fn from(tz: TimeZone) -> Value {
        Value::Zone(tz)
    }
}

impl From<Offset> for Value {
    fn from(offset: Offset) -> Value {
        Value::Offset(offset)
    }
}

impl core::fmt::Display for Value {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            Value::Int(n) => core::fmt::Display::fmt(&n, f),
            Value::Decimal(ref d) => core::fmt::Display::fmt(d, f),
            Value::Zone(ref tz) => core::fmt::Display::fmt(tz, f),
            Value::Offset(ref offset) => core::fmt::Display::fmt(offset, f),
        }
    }
}

/// A non-negative fixed point decimal number.
///
/// The number is `units / 10^scale`. Decimals are kept normalized, without
/// trailing zeros in the fraction, so that equal numbers compare equal
/// regardless of the scale they were written with.
///
/// # Example
///
/// ```
/// use chronofmt::fmt::Decimal;
///
/// let d = Decimal::new(1250, 2);
/// assert_eq!(d, Decimal::new(125, 1));
/// assert_eq!(d.to_string(), "12.5");
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Decimal {
    units: i64,
    scale: u8,
}

impl Decimal {
    /// The maximum scale of a decimal.
    pub const MAX_SCALE: u8 = 15;

    /// Creates a decimal of `units / 10^scale`.
    ///
    /// The scale is clamped to [`Decimal::MAX_SCALE`], discarding the
    /// truncated digits.
    pub fn new(units: i64, scale: u8) -> Decimal {
        let (mut units, mut scale) = if scale > Decimal::MAX_SCALE {
            let cut = u32::from(scale - Decimal::MAX_SCALE);
            (units / 10i64.pow(cut), Decimal::MAX_SCALE)
        } else {
            (units, scale)
        };
        while scale > 0 && units % 10 == 0 {
            units /= 10;
            scale -= 1;
        }
        Decimal { units, scale }
    }

    /// Returns the units of this decimal at the given scale, truncating any
    /// digits beyond it.
    pub fn units_at(self, scale: u8) -> i128 {
        let units = i128::from(self.units);
        if scale >= self.scale {
            units * 10i128.pow(u32::from(scale - self.scale))
        } else {
            units / 10i128.pow(u32::from(self.scale - scale))
        }
    }

    /// Returns the integral part of this decimal.
    pub fn integer(self) -> i64 {
        self.units / 10i64.pow(u32::from(self.scale))
    }

    /// Returns this decimal multiplied by `factor`, truncated towards zero.
    pub(crate) fn mul_trunc(self, factor: i64) -> i128 {
        i128::from(self.units) * i128::from(factor)
            / 10i128.pow(u32::from(self.scale))
    }
}

impl core::fmt::Display for Decimal {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let pow = 10i64.pow(u32::from(self.scale));
        write!(f, "{}", self.units / pow)?;
        if self.scale > 0 {
            write!(
                f,
                ".{:0width$}",
                self.units % pow,
                width = usize::from(self.scale),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        use self::Element::*;

        let all = [
            Era,
            YearOfEra,
            HistoricMonth,
            HistoricDayOfMonth,
            Year,
            YearOfWeekdate,
            Quarter,
            Month,
            WeekOfYear,
            WeekOfMonth,
            DayOfMonth,
            DayOfYear,
            DayOfWeek,
            LocalDayOfWeek,
            WeekdayInMonth,
            ModifiedJulianDay,
            AmPm,
            ClockHourOfAmPm,
            DigitalHourOfAmPm,
            ClockHourOfDay,
            DigitalHourOfDay,
            Minute,
            Second,
            MilliOfSecond,
            MicroOfSecond,
            NanoOfSecond,
            MilliOfDay,
            NanoOfDay,
            DecimalHour,
            DecimalMinute,
            DecimalSecond,
            TimeZoneId,
            Offset,
        ];
        let mut names: Vec<&str> = all.iter().map(|e| e.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), all.len());
        for e in all {
            assert_eq!(
                e.is_date() as u8 + e.is_time() as u8 + e.is_zone() as u8,
                1,
                "{e} must be in exactly one group",
            );
        }
    }

    #[test]
    fn decimal_normalizes() {
        assert_eq!(Decimal::new(1200, 3), Decimal::new(12, 1));
        assert_eq!(Decimal::new(1200, 3).to_string(), "1.2");
        assert_eq!(Decimal::new(5, 0).to_string(), "5");
        assert_eq!(Decimal::new(105, 2).to_string(), "1.05");
        assert_eq!(Decimal::new(105, 2).units_at(4), 10500);
        assert_eq!(Decimal::new(10599, 4).units_at(2), 105);
        assert_eq!(Decimal::new(125, 1).integer(), 12);
        assert_eq!(Decimal::new(125, 1).mul_trunc(60), 750);
    }

    #[test]
    fn value_display() {
        insta::assert_snapshot!(Value::Int(-5), @"-5");
        insta::assert_snapshot!(Value::Decimal(Decimal::new(75, 1)), @"7.5");
        insta::assert_snapshot!(
            Value::Offset(crate::tz::Offset::constant(2)),
            @"+02:00",
        );
    }
}
