use crate::{
    error::{
        fmt::{BuildError as BE, FormatError as FE, ParseError as PE},
        Error,
    },
    fmt::{
        parse::ParseLog,
        print::{int_of, value_of},
        processor::{
            count_digits, digit_char, fail, protected_end, push_digits,
            read_digits,
        },
        AttributeQuery, Decimal as DecimalValue, Element, OrdinalSuffixes,
        ParsedValues, SignPolicy, Snapshot,
    },
    util::prefix,
};

/// An integer printed with a minimum and maximum number of digits.
#[derive(Clone, Debug)]
pub(crate) struct Number {
    pub(crate) element: Element,
    pub(crate) min: u8,
    pub(crate) max: u8,
    pub(crate) sign: SignPolicy,
    pub(crate) fixed: bool,
    /// The number of trailing digits left to following fixed width steps
    /// when parsing adjacent numbers.
    pub(crate) reserved: usize,
    /// Protected numbers are never replaced by their historic counterpart.
    pub(crate) protected: bool,
}

impl Number {
    pub(crate) fn new(
        element: Element,
        min: u8,
        max: u8,
        sign: SignPolicy,
        fixed: bool,
    ) -> Result<Number, Error> {
        if !element.is_numerical() {
            return Err(Error::from(BE::NotNumericalElement { element }));
        }
        if min < 1 {
            return Err(Error::from(BE::MinDigits { element, min }));
        }
        if min > max {
            return Err(Error::from(BE::MinGreaterThanMax {
                element,
                min,
                max,
            }));
        }
        if fixed && min != max {
            return Err(Error::from(BE::FixedWidthMismatch {
                element,
                min,
                max,
            }));
        }
        if fixed && sign != SignPolicy::Never {
            return Err(Error::from(BE::FixedWidthSign { element, sign }));
        }
        if max > element.scale() {
            return Err(Error::from(BE::MaxDigits {
                element,
                max,
                scale: element.scale(),
            }));
        }
        Ok(Number {
            element,
            min,
            max,
            sign,
            fixed,
            reserved: 0,
            protected: false,
        })
    }

    pub(crate) fn protect(self) -> Number {
        Number { protected: true, ..self }
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let value = int_of(self.element, snapshot, query)?;
        let abs = value.unsigned_abs();
        let digits = abs.checked_ilog10().map_or(1, |n| n + 1) as u8;
        if digits > self.max {
            return Err(Error::from(FE::MaxWidthExceeded {
                element: self.element,
                value,
                max: self.max,
            }));
        }
        if value < 0 {
            if self.sign == SignPolicy::Never {
                return Err(Error::from(FE::NegativeNotAllowed {
                    element: self.element,
                    value,
                }));
            }
            out.push('-');
        } else if self.sign == SignPolicy::Always
            || (self.sign == SignPolicy::WhenBigNumber && digits > self.min)
        {
            out.push('+');
        }
        push_digits(out, abs, usize::from(self.min), query.zero_digit());
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let element = self.element;
        let leniency = query.leniency();
        let zero = query.zero_digit();
        let protected = query.protected_characters();
        let end = protected_end(text, protected).max(log.position);
        let start = log.position;
        if start >= end {
            log.warning = true;
            return Err(fail(start, PE::MissingDigits { element }));
        }

        let mut min = usize::from(self.min);
        let mut max = usize::from(self.max);
        if !self.fixed && !leniency.is_strict() {
            min = 1;
        }
        if !self.fixed && leniency.is_lax() {
            max = usize::from(element.scale());
        }

        let mut pos = start;
        let (mut negative, mut plus) = (false, false);
        match text[start..].chars().next() {
            Some(ch @ ('+' | '-')) => {
                if self.sign == SignPolicy::Never
                    && (self.fixed || leniency.is_strict())
                {
                    return Err(fail(start, PE::SignNotAllowed { element }));
                }
                if ch == '+'
                    && self.sign == SignPolicy::WhenNegative
                    && leniency.is_strict()
                {
                    return Err(fail(
                        start,
                        PE::PositiveSignNotAllowed { element },
                    ));
                }
                negative = ch == '-';
                plus = ch == '+';
                pos += 1;
            }
            _ => {
                if self.sign == SignPolicy::Always && leniency.is_strict() {
                    return Err(fail(start, PE::SignExpected { element }));
                }
            }
        }

        if !self.fixed && self.reserved > 0 && protected == 0 {
            let available = count_digits(text, pos, end, zero);
            max = max.min(available.saturating_sub(self.reserved)).max(1);
        }
        let (total, count, next) = read_digits(text, pos, end, max, zero);
        if count == 0 {
            return Err(fail(pos, PE::DigitExpected { element }));
        }
        if count < min {
            return Err(fail(
                pos,
                PE::NotEnoughDigits { element, min, got: count },
            ));
        }
        if negative && total == 0 && leniency.is_strict() {
            return Err(fail(start, PE::NegativeZero { element }));
        }
        if self.sign == SignPolicy::WhenBigNumber
            && leniency.is_strict()
            && !negative
        {
            if count > usize::from(self.min) && !plus {
                return Err(fail(
                    start,
                    PE::PositiveSignExpected { element },
                ));
            }
            if count <= usize::from(self.min) && plus {
                return Err(fail(
                    start,
                    PE::PositiveSignNotAllowed { element },
                ));
            }
        }
        let value = if negative { -total } else { total };
        check_enum(element, value).map_err(|err| fail(start, err))?;
        values.put(element, value).map_err(|err| fail(start, err))?;
        log.position = next;
        Ok(())
    }
}

/// Rejects values of enumerated elements outside of their range, so that
/// a number is never mistaken for a valid era or weekday.
fn check_enum(element: Element, value: i64) -> Result<(), Error> {
    let enumerated = matches!(
        element,
        Element::Era
            | Element::AmPm
            | Element::Quarter
            | Element::DayOfWeek
            | Element::LocalDayOfWeek
    );
    match element.range() {
        Some((min, max)) if enumerated && !(min..=max).contains(&value) => {
            Err(Error::from(PE::EnumValue { element, value }))
        }
        _ => Ok(()),
    }
}

/// The digits after the decimal point of a second, printed as a fraction.
#[derive(Clone, Debug)]
pub(crate) struct Fraction {
    pub(crate) element: Element,
    pub(crate) min: u8,
    pub(crate) max: u8,
    pub(crate) separator: bool,
}

impl Fraction {
    pub(crate) fn new(
        element: Element,
        min: u8,
        max: u8,
        separator: bool,
    ) -> Result<Fraction, Error> {
        let valid = matches!(
            element,
            Element::MilliOfSecond
                | Element::MicroOfSecond
                | Element::NanoOfSecond
        );
        if !valid || min > max || max == 0 || max > 9 {
            return Err(Error::from(BE::InvalidFraction { element, min, max }));
        }
        Ok(Fraction { element, min, max, separator })
    }

    /// Returns the number of digits of the element's values.
    fn base(&self) -> u32 {
        match self.element {
            Element::MilliOfSecond => 3,
            Element::MicroOfSecond => 6,
            _ => 9,
        }
    }

    pub(crate) fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let value = int_of(self.element, snapshot, query)?;
        let nanos = value * 10i64.pow(9 - self.base());
        let all = format!("{nanos:09}");
        let mut digits = &all[..usize::from(self.max)];
        while digits.len() > usize::from(self.min) && digits.ends_with('0') {
            digits = &digits[..digits.len() - 1];
        }
        if digits.is_empty() {
            return Ok(());
        }
        if self.separator {
            out.push(query.decimal_separator());
        }
        let zero = query.zero_digit();
        out.extend(digits.bytes().map(|b| {
            digit_char(u32::from(b - b'0'), zero)
        }));
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let element = self.element;
        let leniency = query.leniency();
        let end = protected_end(text, query.protected_characters())
            .max(log.position);
        let mut pos = log.position;
        if self.separator {
            match text[pos..end].chars().next() {
                Some(ch) if is_separator(ch, query) => pos += ch.len_utf8(),
                _ if self.min == 0 => return Ok(()),
                _ => {
                    return Err(fail(
                        pos,
                        PE::DecimalSeparatorExpected { element },
                    ))
                }
            }
        }
        let max = if leniency.is_lax() { 9 } else { usize::from(self.max) };
        let (total, count, next) =
            read_digits(text, pos, end, max, query.zero_digit());
        let min = usize::from(self.min);
        if count < min {
            return Err(fail(
                pos,
                PE::NotEnoughDigits { element, min, got: count },
            ));
        }
        if count == 0 {
            log.position = pos;
            return Ok(());
        }
        let nanos = total * 10i64.pow(9 - count as u32);
        let value = nanos / 10i64.pow(9 - self.base());
        values.put(element, value).map_err(|err| fail(pos, err))?;
        // Infallible, since `nanos` has at most nine digits.
        values.set_fraction(nanos as i32);
        log.position = next;
        Ok(())
    }
}

fn is_separator(ch: char, query: &AttributeQuery<'_>) -> bool {
    ch == query.decimal_separator()
        || (!query.leniency().is_strict() && (ch == '.' || ch == ','))
}

/// A decimal number such as a decimal hour, printed with a fixed number
/// of integer and fraction digits.
#[derive(Clone, Debug)]
pub(crate) struct Decimal {
    pub(crate) element: Element,
    pub(crate) precision: u8,
    pub(crate) scale: u8,
}

impl Decimal {
    pub(crate) fn new(
        element: Element,
        precision: u8,
        scale: u8,
    ) -> Result<Decimal, Error> {
        if !element.is_decimal() {
            return Err(Error::from(BE::NotDecimalElement { element }));
        }
        if scale == 0
            || scale >= precision
            || scale > DecimalValue::MAX_SCALE
            || precision - scale > 2
        {
            return Err(Error::from(BE::InvalidDecimal {
                element,
                precision,
                scale,
            }));
        }
        Ok(Decimal { element, precision, scale })
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let element = self.element;
        let value = value_of(element, snapshot, query)?
            .as_decimal()
            .ok_or(FE::UnexpectedValue { element })?;
        let zero = query.zero_digit();
        let integer = value.integer();
        let units = value.units_at(self.scale)
            - i128::from(integer) * 10i128.pow(u32::from(self.scale));
        let width = usize::from(self.precision - self.scale);
        push_digits(out, integer.unsigned_abs(), width, zero);
        out.push(query.decimal_separator());
        push_digits(
            out,
            units.unsigned_abs() as u64,
            usize::from(self.scale),
            zero,
        );
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let element = self.element;
        let strict = query.leniency().is_strict();
        let zero = query.zero_digit();
        let end = protected_end(text, query.protected_characters())
            .max(log.position);
        let start = log.position;
        let width = usize::from(self.precision - self.scale);
        let (integer, count, mut pos) =
            read_digits(text, start, end, width, zero);
        if count == 0 {
            return Err(fail(start, PE::DigitExpected { element }));
        }
        if strict && count < width {
            return Err(fail(
                start,
                PE::NotEnoughDigits { element, min: width, got: count },
            ));
        }
        match text[pos..end].chars().next() {
            Some(ch) if is_separator(ch, query) => pos += ch.len_utf8(),
            _ => {
                return Err(fail(
                    pos,
                    PE::DecimalSeparatorExpected { element },
                ))
            }
        }
        let scale = usize::from(self.scale);
        let max = if strict { scale } else { 15 };
        let (fraction, digits, next) = read_digits(text, pos, end, max, zero);
        let min = if strict { scale } else { 1 };
        if digits < min {
            return Err(fail(
                pos,
                PE::NotEnoughDigits { element, min, got: digits },
            ));
        }
        let units = integer * 10i64.pow(digits as u32) + fraction;
        let value = DecimalValue::new(units, digits as u8);
        values.put(element, value).map_err(|err| fail(start, err))?;
        log.position = next;
        Ok(())
    }
}

/// An integer followed by an ordinal suffix, such as `2nd`.
#[derive(Clone, Debug)]
pub(crate) struct Ordinal {
    pub(crate) element: Element,
    /// Suffixes of the locale are used when absent.
    pub(crate) suffixes: Option<OrdinalSuffixes>,
}

impl Ordinal {
    pub(crate) fn new(
        element: Element,
        suffixes: Option<OrdinalSuffixes>,
    ) -> Result<Ordinal, Error> {
        if !element.is_numerical() {
            return Err(Error::from(BE::NotNumericalElement { element }));
        }
        Ok(Ordinal { element, suffixes })
    }

    fn suffixes(&self, query: &AttributeQuery<'_>) -> OrdinalSuffixes {
        self.suffixes
            .clone()
            .unwrap_or_else(|| OrdinalSuffixes::for_locale(query.locale()))
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let value = int_of(self.element, snapshot, query)?;
        if value < 0 {
            return Err(Error::from(FE::NegativeNotAllowed {
                element: self.element,
                value,
            }));
        }
        push_digits(out, value.unsigned_abs(), 1, query.zero_digit());
        out.push_str(self.suffixes(query).suffix(value));
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let element = self.element;
        let leniency = query.leniency();
        let end = protected_end(text, query.protected_characters())
            .max(log.position);
        let start = log.position;
        if start >= end {
            log.warning = true;
            return Err(fail(start, PE::MissingDigits { element }));
        }
        let (value, count, mut pos) =
            read_digits(text, start, end, 9, query.zero_digit());
        if count == 0 {
            return Err(fail(start, PE::DigitExpected { element }));
        }

        let suffixes = self.suffixes(query);
        let rest = &text[pos..end];
        let ignore_case = query.case_insensitive();
        let matched = if leniency.is_strict() {
            prefix::match_len(rest, suffixes.suffix(value), false, false)
        } else {
            suffixes.all().into_iter().find_map(|suffix| {
                prefix::match_len(rest, suffix, ignore_case, false)
            })
        };
        match matched {
            Some(len) => pos += len,
            None if leniency.is_lax() => {}
            None => {
                return Err(fail(
                    pos,
                    PE::OrdinalSuffixExpected { element },
                ))
            }
        }
        values.put(element, value).map_err(|err| fail(start, err))?;
        log.position = pos;
        Ok(())
    }
}

/// A year printed with two digits, interpreted relative to a pivot year
/// when parsed.
#[derive(Clone, Debug)]
pub(crate) struct TwoDigitYear {
    pub(crate) element: Element,
    pub(crate) reserved: usize,
    pub(crate) protected: bool,
}

impl TwoDigitYear {
    pub(crate) fn new(element: Element) -> Result<TwoDigitYear, Error> {
        let valid = matches!(
            element,
            Element::Year | Element::YearOfEra | Element::YearOfWeekdate
        );
        if !valid {
            return Err(Error::from(BE::NotNumericalElement { element }));
        }
        Ok(TwoDigitYear { element, reserved: 0, protected: false })
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let year = int_of(self.element, snapshot, query)?;
        let yy = year.rem_euclid(100).unsigned_abs();
        push_digits(out, yy, 2, query.zero_digit());
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let element = self.element;
        let leniency = query.leniency();
        let zero = query.zero_digit();
        let protected = query.protected_characters();
        let end = protected_end(text, protected).max(log.position);
        let start = log.position;
        if start >= end {
            log.warning = true;
            return Err(fail(start, PE::MissingDigits { element }));
        }
        let mut max = if leniency.is_strict() { 2 } else { 9 };
        if self.reserved > 0 && protected == 0 {
            let available = count_digits(text, start, end, zero);
            max = max.min(available.saturating_sub(self.reserved)).max(1);
        }
        let (value, count, next) = read_digits(text, start, end, max, zero);
        if count == 0 {
            return Err(fail(start, PE::DigitExpected { element }));
        }
        let year = match count {
            2 => expand(value, query.pivot_year()),
            1 if leniency.is_lax() => expand(value, query.pivot_year()),
            n if n > 2 && !leniency.is_strict() => value,
            _ => {
                return Err(fail(start, PE::TwoDigitYearExpected { element }))
            }
        };
        values.put(element, year).map_err(|err| fail(start, err))?;
        log.position = next;
        Ok(())
    }
}

/// Maps a two digit year into the hundred years before the pivot year.
fn expand(yy: i64, pivot: i16) -> i64 {
    let pivot = i64::from(pivot);
    let year = pivot.div_euclid(100) * 100 + yy;
    if year >= pivot {
        year - 100
    } else {
        year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_construction() {
        let never = SignPolicy::Never;
        assert!(Number::new(Element::Month, 0, 2, never, false).is_err());
        assert!(Number::new(Element::Month, 3, 2, never, false).is_err());
        assert!(Number::new(Element::Month, 1, 2, never, true).is_err());
        insta::assert_snapshot!(
            Number::new(Element::Month, 2, 2, SignPolicy::Always, true)
                .unwrap_err(),
            @"fixed width element MONTH_OF_YEAR cannot use sign policy Always",
        );
        assert!(Number::new(Element::Year, 4, 10, never, false).is_err());
        assert!(Number::new(Element::NanoOfDay, 1, 18, never, false).is_ok());
        assert!(Number::new(Element::Offset, 1, 2, never, false).is_err());
    }

    #[test]
    fn pivot() {
        assert_eq!(expand(44, 2044), 1944);
        assert_eq!(expand(43, 2044), 2043);
        assert_eq!(expand(0, 2044), 2000);
        assert_eq!(expand(99, 2100), 2099);
        assert_eq!(expand(0, 2100), 2000);
    }

    #[test]
    fn enum_values() {
        assert!(check_enum(Element::Era, 1).is_ok());
        assert!(check_enum(Element::Era, 2).is_err());
        assert!(check_enum(Element::DayOfWeek, 0).is_err());
        assert!(check_enum(Element::DayOfMonth, 40).is_ok());
    }

    #[test]
    fn fraction_construction() {
        assert!(Fraction::new(Element::NanoOfSecond, 0, 9, true).is_ok());
        assert!(Fraction::new(Element::NanoOfSecond, 3, 10, true).is_err());
        assert!(Fraction::new(Element::Second, 1, 3, true).is_err());
        assert!(Decimal::new(Element::DecimalHour, 4, 2).is_ok());
        assert!(Decimal::new(Element::DecimalHour, 2, 2).is_err());
        assert!(Decimal::new(Element::Minute, 4, 2).is_err());
    }
}
