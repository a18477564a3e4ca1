/*!
Pattern driven printing and parsing of temporal values.

The central type of this module is [`Formatter`]. A formatter is an
immutable sequence of steps, each of which prints and parses one element
such as a month, a literal or an offset. Formatters are created either from
a pattern string with [`Formatter::of_pattern`] or step by step with a
[`Builder`]. Every formatter is tied to one [`Chronology`], i.e., to one of
[`Date`](crate::civil::Date), [`Time`](crate::civil::Time),
[`DateTime`](crate::civil::DateTime), [`Timestamp`](crate::Timestamp) or
[`Zoned`](crate::Zoned).

# Attributes

How elements are printed and parsed is controlled by [`Attributes`], such
as the locale, the leniency, the text width or the time zone. Attributes
are looked up in three places, in order: the section of the builder a step
was added in, the attributes passed to a single print or parse call, and
the global attributes of the formatter.

# Leniency

Parsing is strict, smart (the default) or lax. Strict parsing requires
exact widths and checks that every parsed element agrees with the value
constructed from the parsed elements. Lax parsing accepts out of range
values where possible and constructs values from incomplete elements.

# Optional sections

Steps enclosed in an optional section, `[...]` in a pattern, are skipped
when any of them fails to parse. Values parsed in a skipped section are
discarded, and parsing continues after the section at the position the
section started at.

# Historic calendars

A pattern with an era symbol prints and parses dates in the historic
calendar given by a [`ChronoHistory`](crate::history::ChronoHistory), which
switches from the Julian to the Gregorian calendar at a cutover date.

# Example

```
use chronofmt::{
    civil::date,
    fmt::{Formatter, PatternType},
    history::ChronoHistory,
    Locale,
};

let f = Formatter::of_pattern("G yyyy-MM-dd", PatternType::Cldr, Locale::US)?
    .with_history(ChronoHistory::of_first_gregorian_reform());
// The day after the last Julian day is the first Gregorian day.
assert_eq!(f.format(&date(1582, 10, 14))?, "AD 1582-10-04");
assert_eq!(f.format(&date(1582, 10, 15))?, "AD 1582-10-15");
assert_eq!(f.parse("AD 1582-10-04")?, date(1582, 10, 14));

# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

use std::{marker::PhantomData, sync::Arc};

use crate::{
    error::{fmt::BuildError as BE, Error},
    history::ChronoHistory,
    tz::TimeZone,
    Locale,
};

use self::step::Step;

pub use self::{
    attrs::{
        AttributeQuery, Attributes, EraStyle, Leniency, OutputContext,
        SignPolicy, TextWidth,
    },
    builder::Builder,
    catalog::{
        BuiltinTextProvider, OrdinalSuffixes, PluralCategory, TextKind,
        TextProvider,
    },
    chronology::Chronology,
    element::{Decimal, Element, Value},
    extension::Extension,
    pattern::PatternType,
    print::Snapshot,
    processor::{Delegate, OffsetPrecision},
    step::ElementPosition,
    values::ParsedValues,
};

mod attrs;
mod builder;
mod catalog;
mod chronology;
mod consistency;
mod element;
mod extension;
mod parse;
mod pattern;
mod print;
mod processor;
mod step;
mod values;

/// A printer and parser of values of one chronology.
///
/// Formatters are immutable and cheap to clone. The `with_*` methods
/// return adjusted copies.
///
/// # Example
///
/// ```
/// use chronofmt::{
///     civil::{date, Date},
///     fmt::{Formatter, Leniency, PatternType},
///     Locale,
/// };
///
/// let f = Formatter::<Date>::of_pattern(
///     "d. MMMM uuuu",
///     PatternType::Cldr,
///     Locale::GERMANY,
/// )?;
/// assert_eq!(f.format(&date(2024, 3, 1))?, "1. März 2024");
/// assert_eq!(f.parse("1. März 2024")?, date(2024, 3, 1));
///
/// let f = f.with_leniency(Leniency::Strict);
/// assert!(f.parse("31. Februar 2024").is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct Formatter<T> {
    inner: Arc<Inner>,
    _chronology: PhantomData<fn() -> T>,
}

#[derive(Debug)]
struct Inner {
    steps: Arc<[Step]>,
    globals: Attributes,
    /// Values used for elements that are neither parsed nor derived.
    defaults: Vec<(Element, Value)>,
}

impl<T> Clone for Formatter<T> {
    fn clone(&self) -> Formatter<T> {
        Formatter { inner: Arc::clone(&self.inner), _chronology: PhantomData }
    }
}

impl<T: Chronology> core::fmt::Debug for Formatter<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Formatter")
            .field("chronology", &T::NAME)
            .field("steps", &self.inner.steps)
            .field("globals", &self.inner.globals)
            .field("defaults", &self.inner.defaults)
            .finish()
    }
}

impl<T: Chronology> Formatter<T> {
    pub(crate) fn new(
        steps: Arc<[Step]>,
        globals: Attributes,
    ) -> Formatter<T> {
        let inner = Inner { steps, globals, defaults: vec![] };
        Formatter { inner: Arc::new(inner), _chronology: PhantomData }
    }

    /// Returns a builder for a formatter with the given locale.
    pub fn builder(locale: Locale) -> Builder<T> {
        Builder::new(locale)
    }

    /// Creates a formatter from a pattern string.
    ///
    /// See [`Builder::add_pattern`] for the errors this may return.
    pub fn of_pattern(
        pattern: &str,
        kind: PatternType,
        locale: Locale,
    ) -> Result<Formatter<T>, Error> {
        let mut builder = Formatter::builder(locale);
        builder.add_pattern(pattern, kind)?;
        builder.build()
    }

    /// Returns the global attributes of this formatter.
    pub fn attributes(&self) -> &Attributes {
        &self.inner.globals
    }

    /// Returns the locale of this formatter.
    pub fn locale(&self) -> Locale {
        self.inner.globals.get_locale().unwrap_or(Locale::ROOT)
    }

    /// Prints a value to a new string.
    pub fn format(&self, value: &T) -> Result<String, Error> {
        let mut out = String::new();
        self.print_into(value, &mut out)?;
        Ok(out)
    }

    /// Appends a value to `out` using the global attributes of this
    /// formatter.
    pub fn print_into(
        &self,
        value: &T,
        out: &mut String,
    ) -> Result<(), Error> {
        self.print(value, out, &Attributes::new())?;
        Ok(())
    }

    /// Prints a value to `out` with attributes that override the global
    /// attributes of this formatter for this call only.
    ///
    /// This returns the position of every printed element in `out`.
    ///
    /// # Errors
    ///
    /// This fails when the value lacks a printed element or when an element
    /// cannot be printed as configured. The content of `out` is
    /// unspecified in that case.
    pub fn print(
        &self,
        value: &T,
        out: &mut String,
        attrs: &Attributes,
    ) -> Result<Vec<ElementPosition>, Error> {
        let query = AttributeQuery::new(attrs, &self.inner.globals);
        let snapshot = value.snapshot(&query)?;
        let mut positions = vec![];
        for step in self.inner.steps.iter() {
            step.print(&snapshot, &query, out, &mut positions)?;
        }
        Ok(positions)
    }

    /// Parses the whole of `text`.
    pub fn parse(&self, text: &str) -> Result<T, Error> {
        let (value, _) = self.parse_at(text, 0, &Attributes::new())?;
        Ok(value)
    }

    /// Parses `text` beginning at the byte offset `start`, with attributes
    /// that override the global attributes of this formatter for this call
    /// only.
    ///
    /// This returns the parsed value along with the byte offset after the
    /// last character consumed. Unless the trailing characters attribute is
    /// set, that is always the length of `text`.
    ///
    /// # Errors
    ///
    /// This fails when `start` is not within `text`, when the text does not
    /// match the steps of this formatter, when no value can be constructed
    /// from the parsed elements, and under strict leniency when a parsed
    /// element does not agree with the constructed value. Errors from
    /// parsing carry the position at which parsing failed, see
    /// [`Error::parse_position`].
    pub fn parse_at(
        &self,
        text: &str,
        start: usize,
        attrs: &Attributes,
    ) -> Result<(T, usize), Error> {
        let query = AttributeQuery::new(attrs, &self.inner.globals);
        parse::parse_value(
            &self.inner.steps,
            &self.inner.defaults,
            text,
            start,
            &query,
        )
    }

    /// Parses the raw elements of `text` beginning at `start` without
    /// constructing a value.
    ///
    /// Defaults are not applied and no extension runs. This returns the
    /// parsed elements along with the byte offset after the last character
    /// consumed. Trailing characters are never an error.
    pub fn parse_raw(
        &self,
        text: &str,
        start: usize,
    ) -> Result<(ParsedValues, usize), Error> {
        let query = AttributeQuery::of(&self.inner.globals);
        self.parse_values(text, start, &query)
    }

    fn parse_values(
        &self,
        text: &str,
        start: usize,
        query: &AttributeQuery<'_>,
    ) -> Result<(ParsedValues, usize), Error> {
        parse::check_bounds(text, start)?;
        let (values, log) =
            parse::parse_values(&self.inner.steps, &[], text, start, query)?;
        Ok((values, log.position))
    }

    /// Returns a copy of this formatter with the given attributes merged
    /// into its global attributes.
    pub fn with_attributes(&self, attrs: &Attributes) -> Formatter<T> {
        self.with_globals(self.inner.globals.merge(attrs))
    }

    /// Returns a copy of this formatter with another locale.
    pub fn with_locale(&self, locale: Locale) -> Formatter<T> {
        self.with_attributes(&Attributes::new().locale(locale))
    }

    /// Returns a copy of this formatter with another leniency.
    pub fn with_leniency(&self, leniency: Leniency) -> Formatter<T> {
        self.with_attributes(&Attributes::new().leniency(leniency))
    }

    /// Returns a copy of this formatter with another time zone.
    ///
    /// The time zone is needed to print a [`Timestamp`](crate::Timestamp)
    /// and to parse instants from text without an offset or zone.
    pub fn with_time_zone(&self, tz: TimeZone) -> Formatter<T> {
        self.with_attributes(&Attributes::new().time_zone(tz))
    }

    /// Returns a copy of this formatter that prints and parses dates in the
    /// given historic calendar.
    ///
    /// Besides setting the history attribute, this replaces the year, month
    /// and day of month elements by their historic counterparts. Years
    /// added as proleptic years keep their meaning.
    pub fn with_history(&self, history: ChronoHistory) -> Formatter<T> {
        let globals =
            self.inner.globals.merge(&Attributes::new().history(history));
        let steps: Arc<[Step]> = self
            .inner
            .steps
            .iter()
            .map(|step| {
                let historic =
                    step.element().and_then(Element::historic_counterpart);
                let processor =
                    historic.and_then(|e| step.processor.with_element(e));
                match processor {
                    Some(processor) => Step { processor, ..step.clone() },
                    None => step.clone(),
                }
            })
            .collect();
        let inner = Inner {
            steps,
            globals,
            defaults: self.inner.defaults.clone(),
        };
        Formatter { inner: Arc::new(inner), _chronology: PhantomData }
    }

    /// Returns a copy of this formatter that uses `value` for `element`
    /// when the element is not parsed, e.g., because its optional section
    /// was skipped or the text ended.
    ///
    /// # Errors
    ///
    /// This fails when the chronology of this formatter does not support
    /// the element.
    pub fn with_default(
        &self,
        element: Element,
        value: impl Into<Value>,
    ) -> Result<Formatter<T>, Error> {
        if !T::is_supported(element) {
            return Err(Error::from(BE::ElementNotSupported {
                element,
                chronology: T::NAME,
            }));
        }
        let mut defaults = self.inner.defaults.clone();
        defaults.retain(|&(e, _)| e != element);
        defaults.push((element, value.into()));
        let inner = Inner {
            steps: Arc::clone(&self.inner.steps),
            globals: self.inner.globals.clone(),
            defaults,
        };
        Ok(Formatter { inner: Arc::new(inner), _chronology: PhantomData })
    }

    fn with_globals(&self, globals: Attributes) -> Formatter<T> {
        let inner = Inner {
            steps: Arc::clone(&self.inner.steps),
            globals,
            defaults: self.inner.defaults.clone(),
        };
        Formatter { inner: Arc::new(inner), _chronology: PhantomData }
    }
}

impl<T: Chronology> Delegate for Formatter<T> {
    fn print(
        &self,
        snapshot: &Snapshot,
        out: &mut String,
    ) -> Result<(), Error> {
        let query = AttributeQuery::of(&self.inner.globals);
        let mut positions = vec![];
        for step in self.inner.steps.iter() {
            step.print(snapshot, &query, out, &mut positions)?;
        }
        Ok(())
    }

    fn parse(
        &self,
        text: &str,
        start: usize,
    ) -> Result<(ParsedValues, usize), Error> {
        let query = AttributeQuery::of(&self.inner.globals);
        self.parse_values(text, start, &query)
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::{date, time, Date, DateTime, Time};

    use super::{processor::Processor, *};

    #[test]
    fn defaults() {
        let f = Formatter::<Date>::of_pattern(
            "uuuu[-MM[-dd]]",
            PatternType::Cldr,
            Locale::ROOT,
        )
        .unwrap()
        .with_default(Element::Month, 1)
        .unwrap()
        .with_default(Element::DayOfMonth, 1)
        .unwrap();
        assert_eq!(f.parse("2024").unwrap(), date(2024, 1, 1));
        assert_eq!(f.parse("2024-07").unwrap(), date(2024, 7, 1));
        assert_eq!(f.parse("2024-07-09").unwrap(), date(2024, 7, 9));

        let err = f.with_default(Element::Minute, 0).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"element MINUTE_OF_HOUR is not supported by `Date`",
        );
    }

    #[test]
    fn positions() {
        let f = Formatter::<Time>::of_pattern(
            "HH:mm",
            PatternType::Cldr,
            Locale::ROOT,
        )
        .unwrap();
        let mut out = String::from(">");
        let positions =
            f.print(&time(9, 5, 0, 0), &mut out, &Attributes::new()).unwrap();
        assert_eq!(out, ">09:05");
        let spans: Vec<(Element, usize, usize)> = positions
            .iter()
            .map(|p| (p.element(), p.start(), p.end()))
            .collect();
        assert_eq!(
            spans,
            vec![(Element::DigitalHourOfDay, 1, 3), (Element::Minute, 4, 6)],
        );
        let literals = f
            .inner
            .steps
            .iter()
            .filter(|s| matches!(s.processor, Processor::Literal(_)))
            .count();
        assert_eq!(literals, 1);
    }

    #[test]
    fn bounds() {
        let f = Formatter::<Time>::of_pattern(
            "HH:mm",
            PatternType::Cldr,
            Locale::ROOT,
        )
        .unwrap();
        let err = f.parse("").unwrap_err();
        assert!(err.is_bounds());
        let err = f.parse_at("09:05", 5, &Attributes::new()).unwrap_err();
        assert!(err.is_bounds());
        let err = f.parse_at("é09:05", 1, &Attributes::new()).unwrap_err();
        assert!(err.is_bounds());
        insta::assert_snapshot!(
            err,
            @"parse position 1 is inside a multi-byte character",
        );
        assert!(f.parse_raw("é09:05", 1).unwrap_err().is_bounds());
        let (value, end) =
            f.parse_at("é09:05", 2, &Attributes::new()).unwrap();
        assert_eq!((value, end), (time(9, 5, 0, 0), 7));

        let (values, end) = f.parse_raw("at 09:05", 3).unwrap();
        assert_eq!(end, 8);
        assert_eq!(values.get_int(Element::DigitalHourOfDay), Some(9));
        assert_eq!(values.get_int(Element::Minute), Some(5));
    }

    #[test]
    fn trailing() {
        let f = Formatter::<DateTime>::of_pattern(
            "uuuu-MM-dd HH:mm",
            PatternType::Cldr,
            Locale::ROOT,
        )
        .unwrap();
        let err = f.parse("2024-07-09 17:30xyz").unwrap_err();
        assert_eq!(err.parse_position(), Some(16));
        insta::assert_snapshot!(
            err,
            @"failed to parse at position 16: unparsed trailing characters: `xyz`",
        );

        let attrs = Attributes::new().trailing_characters(true);
        let (dt, end) = f.parse_at("2024-07-09 17:30xyz", 0, &attrs).unwrap();
        assert_eq!(dt, date(2024, 7, 9).to_datetime(time(17, 30, 0, 0)));
        assert_eq!(end, 16);
    }

    quickcheck::quickcheck! {
        fn prop_date_round_trip(day: Date) -> bool {
            if day.year() < 1 {
                return true;
            }
            let f = Formatter::<Date>::of_pattern(
                "uuuu-MM-dd",
                PatternType::Cldr,
                Locale::ROOT,
            )
            .unwrap()
            .with_leniency(Leniency::Strict);
            f.parse(&f.format(&day).unwrap()).unwrap() == day
        }

        fn prop_time_round_trip(t: Time) -> bool {
            let f = Formatter::<Time>::of_pattern(
                "HH:mm:ss.SSSSSSSSS",
                PatternType::Cldr,
                Locale::ROOT,
            )
            .unwrap()
            .with_leniency(Leniency::Strict);
            f.parse(&f.format(&t).unwrap()).unwrap() == t
        }

        fn prop_historic_round_trip(day: Date) -> bool {
            if day.year() < -9000 {
                return true;
            }
            let f = Formatter::<Date>::of_pattern(
                "G yyyy-MM-dd",
                PatternType::Cldr,
                Locale::SWEDEN,
            )
            .unwrap()
            .with_leniency(Leniency::Strict);
            f.parse(&f.format(&day).unwrap()).unwrap() == day
        }
    }
}
