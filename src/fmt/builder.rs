use std::{marker::PhantomData, sync::Arc};

use crate::{
    error::{fmt::BuildError as BE, Error},
    fmt::{
        catalog::OrdinalSuffixes,
        processor::{
            Custom, Decimal, Delegate, Fraction, Literal, LocalizedOffset,
            Number, OffsetFormat, Ordinal, Processor, Text, TwoDigitYear,
            ZoneName,
        },
        step::Step,
        Attributes, Chronology, Element, Formatter, Leniency, OffsetPrecision,
        SignPolicy,
    },
    Locale,
};

/// A section opened with [`Builder::start_section`] or
/// [`Builder::start_optional_section`].
#[derive(Clone, Debug)]
struct OpenSection {
    /// The identifier of an optional section.
    optional: Option<usize>,
    attrs: Option<Arc<Attributes>>,
}

/// A builder for a [`Formatter`].
///
/// Steps are added in print order. Every method that adds a step checks it
/// against the steps added before, and fails when the combination could not
/// be parsed unambiguously. For example, a number of variable width cannot
/// directly follow another number, since the boundary between their digits
/// would be unknown.
///
/// A number of fixed width that follows a number of variable width in the
/// same section reserves its digits in the preceding number. This makes
/// adjacent digits parseable, e.g., `Hmm` parses `1230` as `12:30`.
///
/// # Example
///
/// ```
/// use chronofmt::{
///     civil::{date, Date},
///     fmt::{Element, Formatter},
///     Locale,
/// };
///
/// let mut builder = Formatter::<Date>::builder(Locale::ROOT);
/// builder
///     .add_integer(Element::Year, 4, 9)?
///     .add_literal("/")?
///     .add_fixed_integer(Element::Month, 2)?
///     .start_optional_section()?
///     .add_literal("/")?
///     .add_fixed_integer(Element::DayOfMonth, 2)?
///     .end_section()?;
/// let f = builder.build()?.with_default(Element::DayOfMonth, 1)?;
///
/// assert_eq!(f.format(&date(2024, 7, 9))?, "2024/07/09");
/// assert_eq!(f.parse("2024/07")?, date(2024, 7, 1));
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Builder<T> {
    globals: Attributes,
    steps: Vec<Step>,
    /// Open sections, innermost last.
    stack: Vec<OpenSection>,
    /// The number of optional sections opened so far. Zero is the root.
    sections: usize,
    /// The index of the variable width number that following fixed width
    /// numbers reserve digits in.
    reserved: Option<usize>,
    pad_next: usize,
    _chronology: PhantomData<fn() -> T>,
}

impl<T: Chronology> Builder<T> {
    pub(crate) fn new(locale: Locale) -> Builder<T> {
        Builder {
            globals: Attributes::new().locale(locale),
            steps: vec![],
            stack: vec![],
            sections: 0,
            reserved: None,
            pad_next: 0,
            _chronology: PhantomData,
        }
    }

    /// Returns the locale of the formatter being built.
    pub fn locale(&self) -> Locale {
        self.globals.get_locale().unwrap_or(Locale::ROOT)
    }

    /// Adds literal text.
    ///
    /// Empty text adds nothing.
    pub fn add_literal(&mut self, text: &str) -> Result<&mut Self, Error> {
        if !text.is_empty() {
            self.push(Processor::Literal(Literal { text: text.into() }));
        }
        Ok(self)
    }

    /// Adds a number of variable width with `min..=max` digits, signed only
    /// when negative.
    ///
    /// # Errors
    ///
    /// This fails when the element is not numerical or not supported, when
    /// the widths are invalid, and when the previous step is numerical.
    pub fn add_integer(
        &mut self,
        element: Element,
        min: u8,
        max: u8,
    ) -> Result<&mut Self, Error> {
        self.add_number(element, min, max, SignPolicy::WhenNegative)
    }

    /// Adds a number of variable width with `min..=max` digits and the
    /// given sign policy.
    pub fn add_number(
        &mut self,
        element: Element,
        min: u8,
        max: u8,
        sign: SignPolicy,
    ) -> Result<&mut Self, Error> {
        let number = Number::new(element, min, max, sign, false)?;
        self.add_number_processor(number)
    }

    /// Adds a number of exactly `width` digits without a sign.
    ///
    /// When the previous number in the same section has a variable width,
    /// the digits of this number are reserved in it.
    pub fn add_fixed_integer(
        &mut self,
        element: Element,
        width: u8,
    ) -> Result<&mut Self, Error> {
        let number =
            Number::new(element, width, width, SignPolicy::Never, true)?;
        self.add_number_processor(number)
    }

    /// Adds the proleptic ISO year, which keeps its meaning when the other
    /// date elements are replaced by their historic counterparts.
    pub(crate) fn add_proleptic_year(
        &mut self,
        min: u8,
        sign: SignPolicy,
    ) -> Result<&mut Self, Error> {
        let number = Number::new(Element::Year, min, 9, sign, false)?;
        self.add_number_processor(number.protect())
    }

    fn add_number_processor(
        &mut self,
        number: Number,
    ) -> Result<&mut Self, Error> {
        let element = number.element;
        self.check(element)?;
        let last_numerical = self.check_after_decimal()?;
        if number.fixed {
            let width = usize::from(number.min);
            let reserved = self.reserved;
            let index = self.push(Processor::Number(number));
            self.reserve(reserved, index, width);
        } else if last_numerical {
            return Err(Error::from(BE::VariableWidthAfterNumerical {
                element,
            }));
        } else {
            let index = self.push(Processor::Number(number));
            self.reserved = Some(index);
        }
        Ok(self)
    }

    /// Adds the fraction of a second with `min..=max` digits, optionally
    /// preceded by a decimal separator.
    ///
    /// The element must be [`Element::MilliOfSecond`],
    /// [`Element::MicroOfSecond`] or [`Element::NanoOfSecond`]. The digits
    /// are those of a fraction of a second, so `5` means half a second
    /// regardless of the element. When parsing, all digits are kept even
    /// if the element cannot represent them.
    ///
    /// # Errors
    ///
    /// This fails when a fraction or decimal was added already, or when a
    /// fraction of variable width without separator follows a number of
    /// variable width.
    pub fn add_fraction(
        &mut self,
        element: Element,
        min: u8,
        max: u8,
        separator: bool,
    ) -> Result<&mut Self, Error> {
        let fraction = Fraction::new(element, min, max, separator)?;
        self.check(element)?;
        self.ensure_no_decimal()?;
        let fixed = !separator && fraction.is_fixed();
        if !fixed && !separator && self.reserved.is_some() {
            return Err(Error::from(BE::FractionAfterVariableWidth {
                element,
            }));
        }
        let reserved = self.reserved;
        let index = self.push(Processor::Fraction(fraction));
        if fixed {
            self.reserve(reserved, index, usize::from(min));
        }
        Ok(self)
    }

    /// Adds a decimal element with `precision` digits, `scale` of which
    /// follow the decimal separator.
    pub fn add_decimal(
        &mut self,
        element: Element,
        precision: u8,
        scale: u8,
    ) -> Result<&mut Self, Error> {
        let decimal = Decimal::new(element, precision, scale)?;
        self.check(element)?;
        self.ensure_no_decimal()?;
        let reserved = self.reserved;
        let index = self.push(Processor::Decimal(decimal));
        self.reserve(reserved, index, usize::from(precision - scale));
        Ok(self)
    }

    /// Adds a number followed by an ordinal suffix such as `2nd`.
    ///
    /// Without explicit suffixes, those of the locale are used.
    pub fn add_ordinal(
        &mut self,
        element: Element,
        suffixes: Option<OrdinalSuffixes>,
    ) -> Result<&mut Self, Error> {
        let ordinal = Ordinal::new(element, suffixes)?;
        self.check(element)?;
        if self.check_after_decimal()? {
            return Err(Error::from(BE::VariableWidthAfterNumerical {
                element,
            }));
        }
        self.push(Processor::Ordinal(ordinal));
        Ok(self)
    }

    /// Adds the localized text of an element, such as a month name.
    ///
    /// The width and output context of the text are attributes, which can
    /// be set for this step alone with [`Builder::start_section`].
    pub fn add_text(&mut self, element: Element) -> Result<&mut Self, Error> {
        if element.text_kind().is_none() {
            return Err(Error::from(BE::NotTextElement { element }));
        }
        self.check(element)?;
        self.push(Processor::Text(Text { element }));
        Ok(self)
    }

    /// Adds a year with two digits.
    ///
    /// When parsing, the century is chosen such that the year falls into
    /// the hundred years before the pivot year attribute.
    pub fn add_two_digit_year(
        &mut self,
        element: Element,
    ) -> Result<&mut Self, Error> {
        let year = TwoDigitYear::new(element)?;
        self.add_two_digit_year_processor(year)
    }

    pub(crate) fn add_two_digit_year_processor(
        &mut self,
        year: TwoDigitYear,
    ) -> Result<&mut Self, Error> {
        self.check(year.element)?;
        self.check_after_decimal()?;
        match self.reserved {
            None => {
                let index = self.push(Processor::TwoDigitYear(year));
                self.reserved = Some(index);
            }
            Some(reserved) => {
                // Exactly two digits are parsed after a variable number.
                self.start_section(
                    Attributes::new().leniency(Leniency::Strict),
                )?;
                let index = self.push(Processor::TwoDigitYear(year));
                self.end_section()?;
                self.reserve(Some(reserved), index, 2);
            }
        }
        Ok(self)
    }

    /// Adds a time zone identifier such as `Europe/Berlin`.
    pub fn add_zone_id(&mut self) -> Result<&mut Self, Error> {
        self.check(Element::TimeZoneId)?;
        self.push(Processor::ZoneId);
        Ok(self)
    }

    /// Adds a localized time zone name, either short like `CET` or long
    /// like `Central European Time`.
    pub fn add_zone_name(&mut self, long: bool) -> Result<&mut Self, Error> {
        self.check(Element::TimeZoneId)?;
        self.push(Processor::ZoneName(ZoneName { long }));
        Ok(self)
    }

    /// Adds an offset printed with digits.
    ///
    /// `extended` separates hours, minutes and seconds with colons, and
    /// `zero` is printed instead of digits for a zero offset. When `zero`
    /// is empty, a zero offset is printed with digits.
    pub fn add_offset(
        &mut self,
        precision: OffsetPrecision,
        extended: bool,
        zero: &str,
    ) -> Result<&mut Self, Error> {
        self.check(Element::Offset)?;
        self.push(Processor::Offset(OffsetFormat {
            precision,
            extended,
            zero: zero.into(),
        }));
        Ok(self)
    }

    /// Adds an offset in the localized GMT format, e.g., `GMT+1` or, when
    /// `long`, `GMT+01:00`.
    pub fn add_localized_offset(
        &mut self,
        long: bool,
    ) -> Result<&mut Self, Error> {
        self.check(Element::Offset)?;
        self.push(Processor::LocalizedOffset(LocalizedOffset { long }));
        Ok(self)
    }

    /// Adds a step that prints nothing and skips any whitespace when
    /// parsing.
    pub fn skip_whitespace(&mut self) -> Result<&mut Self, Error> {
        self.push(Processor::Whitespace);
        Ok(self)
    }

    /// Adds a delegate, usually another [`Formatter`], that prints from the
    /// same value and whose parsed elements are merged into those of this
    /// formatter.
    pub fn add_customized<D: Delegate + 'static>(
        &mut self,
        delegate: D,
    ) -> Result<&mut Self, Error> {
        self.push(Processor::Custom(Custom { delegate: Arc::new(delegate) }));
        Ok(self)
    }

    /// Pads the next step on the left to `width` characters with the pad
    /// character attribute.
    pub fn pad_next(&mut self, width: usize) -> Result<&mut Self, Error> {
        if width == 0 {
            return Err(Error::from(BE::InvalidPad { width }));
        }
        self.pad_next = width;
        Ok(self)
    }

    /// Pads the previous step on the right to `width` characters with the
    /// pad character attribute.
    pub fn pad_previous(&mut self, width: usize) -> Result<&mut Self, Error> {
        let Some(last) = self.steps.last_mut().filter(|_| width > 0) else {
            return Err(Error::from(BE::InvalidPad { width }));
        };
        last.pad_right = width;
        Ok(self)
    }

    /// Opens a section whose steps use the given attributes on top of the
    /// attributes of the enclosing section.
    pub fn start_section(
        &mut self,
        attrs: Attributes,
    ) -> Result<&mut Self, Error> {
        let attrs = match self.current_attrs() {
            Some(outer) => outer.merge(&attrs),
            None => attrs,
        };
        let attrs = Some(Arc::new(attrs));
        self.stack.push(OpenSection { optional: None, attrs });
        self.reserved = None;
        Ok(self)
    }

    /// Opens an optional section.
    ///
    /// When any step of an optional section fails to parse, the whole
    /// section is skipped: its parsed values are discarded and parsing
    /// resumes after the section at the position where it started.
    pub fn start_optional_section(&mut self) -> Result<&mut Self, Error> {
        self.sections += 1;
        self.stack.push(OpenSection {
            optional: Some(self.sections),
            attrs: self.current_attrs(),
        });
        self.reserved = None;
        Ok(self)
    }

    /// Closes the innermost open section.
    pub fn end_section(&mut self) -> Result<&mut Self, Error> {
        if self.stack.pop().is_none() {
            return Err(Error::from(BE::NoOpenSection));
        }
        self.reserved = None;
        self.pad_next = 0;
        Ok(self)
    }

    /// Builds the formatter.
    ///
    /// # Errors
    ///
    /// This fails when sections are still open or when no step was added.
    pub fn build(&self) -> Result<Formatter<T>, Error> {
        if !self.stack.is_empty() {
            return Err(Error::from(BE::UnclosedSection {
                open: self.stack.len(),
            }));
        }
        if self.steps.is_empty() {
            return Err(Error::from(BE::Empty));
        }
        debug!(
            "built formatter for `{}` with {} steps",
            T::NAME,
            self.steps.len(),
        );
        Ok(Formatter::new(self.steps.clone().into(), self.globals.clone()))
    }

    /// Sets global attributes of the formatter being built.
    pub(crate) fn set_globals(&mut self, attrs: &Attributes) {
        self.globals = self.globals.merge(attrs);
    }

    /// Returns the number of steps added so far.
    pub(crate) fn len(&self) -> usize {
        self.steps.len()
    }

    /// Replaces the elements of the steps from `start` onwards by their
    /// historic counterparts. Protected steps are left alone.
    pub(crate) fn substitute_historic(&mut self, start: usize) {
        for step in &mut self.steps[start..] {
            let Some(historic) =
                step.element().and_then(Element::historic_counterpart)
            else {
                continue;
            };
            if let Some(processor) = step.processor.with_element(historic) {
                trace!("substituting {historic} in step {:?}", step.element());
                step.processor = processor;
            }
        }
    }

    /// Fails when the chronology does not support the element.
    fn check(&self, element: Element) -> Result<(), Error> {
        if !T::is_supported(element) {
            return Err(Error::from(BE::ElementNotSupported {
                element,
                chronology: T::NAME,
            }));
        }
        Ok(())
    }

    /// Fails when the last step has decimal digits, and otherwise returns
    /// whether it is numerical.
    fn check_after_decimal(&self) -> Result<bool, Error> {
        let Some(last) = self.steps.last() else { return Ok(false) };
        if last.processor.is_fractional() {
            return Err(Error::from(BE::AfterDecimal));
        }
        Ok(last.processor.is_numerical())
    }

    fn ensure_no_decimal(&self) -> Result<(), Error> {
        if self.steps.iter().any(|step| step.processor.is_fractional()) {
            return Err(Error::from(BE::DecimalOnlyOnce));
        }
        Ok(())
    }

    /// Reserves `digits` in the step at `reserved` for the step at `index`
    /// if both are in the same section.
    fn reserve(
        &mut self,
        reserved: Option<usize>,
        index: usize,
        digits: usize,
    ) {
        let Some(ri) = reserved else { return };
        if self.steps[ri].section() != self.steps[index].section()
            || !self.steps[ri].processor.is_reservable()
        {
            return;
        }
        self.steps[ri].processor.reserve(digits);
        self.reserved = Some(ri);
    }

    /// Returns the identifiers of the open optional sections, outermost
    /// first.
    fn optional_sections(&self) -> Arc<[usize]> {
        self.stack.iter().filter_map(|open| open.optional).collect()
    }

    fn current_attrs(&self) -> Option<Arc<Attributes>> {
        self.stack.last().and_then(|open| open.attrs.clone())
    }

    fn push(&mut self, processor: Processor) -> usize {
        let mut step = Step::new(
            processor,
            self.optional_sections(),
            self.current_attrs(),
        );
        step.pad_left = core::mem::take(&mut self.pad_next);
        self.steps.push(step);
        self.reserved = None;
        self.steps.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::{Date, DateTime, Time};

    use super::*;

    #[test]
    fn rejections() {
        let mut b = Formatter::<Time>::builder(Locale::ROOT);
        let err = b.add_fixed_integer(Element::Year, 4).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"element YEAR is not supported by `Time`",
        );

        let mut b = Formatter::<Time>::builder(Locale::ROOT);
        b.add_integer(Element::DigitalHourOfDay, 1, 2).unwrap();
        let err = b.add_integer(Element::Minute, 1, 2).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"variable width numerical element MINUTE_OF_HOUR cannot follow another numerical element",
        );
        let err =
            b.add_fraction(Element::NanoOfSecond, 1, 9, false).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"fraction element NANO_OF_SECOND without decimal separator cannot follow a variable width numerical element",
        );

        let mut b = Formatter::<Time>::builder(Locale::ROOT);
        let err = Number::new(
            Element::Minute,
            2,
            2,
            SignPolicy::Always,
            true,
        )
        .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"fixed width element MINUTE_OF_HOUR cannot use sign policy Always",
        );
        b.add_decimal(Element::DecimalHour, 4, 2).unwrap();
        let err = b.add_fixed_integer(Element::Minute, 2).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"no numerical element may follow an element with decimal digits",
        );
        b.add_literal(":").unwrap();
        let err =
            b.add_fraction(Element::NanoOfSecond, 3, 3, true).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"at most one element with decimal digits is allowed in a formatter",
        );

        let mut b = Formatter::<Date>::builder(Locale::ROOT);
        assert!(b.end_section().is_err());
        b.start_optional_section().unwrap();
        b.add_fixed_integer(Element::Month, 2).unwrap();
        insta::assert_snapshot!(
            b.build().unwrap_err(),
            @"formatter cannot be built with 1 section(s) still open",
        );
        let b = Formatter::<DateTime>::builder(Locale::ROOT);
        insta::assert_snapshot!(
            b.build().unwrap_err(),
            @"formatter has no steps",
        );
    }

    #[test]
    fn reservations() {
        let mut b = Formatter::<Date>::builder(Locale::ROOT);
        b.add_integer(Element::Year, 4, 9)
            .unwrap()
            .add_fixed_integer(Element::Month, 2)
            .unwrap()
            .add_fixed_integer(Element::DayOfMonth, 2)
            .unwrap();
        let Processor::Number(ref year) = b.steps[0].processor else {
            panic!("expected a number")
        };
        assert_eq!(year.reserved, 4);

        // A literal ends the run of adjacent digits.
        let mut b = Formatter::<Date>::builder(Locale::ROOT);
        b.add_integer(Element::Year, 4, 9)
            .unwrap()
            .add_literal("-")
            .unwrap()
            .add_fixed_integer(Element::Month, 2)
            .unwrap();
        let Processor::Number(ref year) = b.steps[0].processor else {
            panic!("expected a number")
        };
        assert_eq!(year.reserved, 0);
    }

    #[test]
    fn sections() {
        let mut b = Formatter::<Date>::builder(Locale::ROOT);
        b.add_fixed_integer(Element::Year, 4)
            .unwrap()
            .start_optional_section()
            .unwrap()
            .start_section(Attributes::new().pad_char('*'))
            .unwrap()
            .add_fixed_integer(Element::Month, 2)
            .unwrap()
            .end_section()
            .unwrap()
            .start_optional_section()
            .unwrap()
            .add_fixed_integer(Element::DayOfMonth, 2)
            .unwrap()
            .end_section()
            .unwrap()
            .end_section()
            .unwrap()
            .start_optional_section()
            .unwrap()
            .add_fixed_integer(Element::DayOfYear, 3)
            .unwrap();
        let layout: Vec<(Vec<usize>, usize, bool)> = b
            .steps
            .iter()
            .map(|s| (s.sections().to_vec(), s.section(), s.attrs.is_some()))
            .collect();
        assert_eq!(
            layout,
            vec![
                (vec![], 0, false),
                (vec![1], 1, true),
                (vec![1, 2], 2, false),
                (vec![3], 3, false),
            ],
        );
    }
}
