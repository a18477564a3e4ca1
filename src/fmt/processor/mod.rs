/*!
The processors that print and parse a single step of a formatter.

A processor is one arm of the closed [`Processor`] enum. Each arm knows how
to print its element from a [`Snapshot`] and how to parse its element into
the current frame of [`ParsedValues`]. Section levels, sectional attributes
and padding are not handled here but by the [`Step`](super::step::Step)
wrapping a processor.
*/

use crate::{
    error::{fmt::ParseError as PE, Error, IntoError},
    fmt::{
        parse::ParseLog, AttributeQuery, Element, ParsedValues, Snapshot,
    },
};

pub(crate) use self::{
    custom::Custom,
    number::{Decimal, Fraction, Number, Ordinal, TwoDigitYear},
    text::{Literal, Text},
    zone::{LocalizedOffset, OffsetFormat, ZoneName},
};

pub use self::{custom::Delegate, zone::OffsetPrecision};

mod custom;
mod number;
mod text;
mod zone;

#[derive(Clone, Debug)]
pub(crate) enum Processor {
    Literal(Literal),
    Number(Number),
    Fraction(Fraction),
    Decimal(Decimal),
    Ordinal(Ordinal),
    Text(Text),
    TwoDigitYear(TwoDigitYear),
    ZoneId,
    ZoneName(ZoneName),
    Offset(OffsetFormat),
    LocalizedOffset(LocalizedOffset),
    Whitespace,
    Custom(Custom),
}

impl Processor {
    /// Returns the element printed and parsed by this processor.
    pub(crate) fn element(&self) -> Option<Element> {
        match *self {
            Processor::Literal(_)
            | Processor::Whitespace
            | Processor::Custom(_) => None,
            Processor::Number(ref p) => Some(p.element),
            Processor::Fraction(ref p) => Some(p.element),
            Processor::Decimal(ref p) => Some(p.element),
            Processor::Ordinal(ref p) => Some(p.element),
            Processor::Text(ref p) => Some(p.element),
            Processor::TwoDigitYear(ref p) => Some(p.element),
            Processor::ZoneId | Processor::ZoneName(_) => {
                Some(Element::TimeZoneId)
            }
            Processor::Offset(_) | Processor::LocalizedOffset(_) => {
                Some(Element::Offset)
            }
        }
    }

    /// Returns true if this processor prints digits whose boundary to an
    /// adjacent number could be ambiguous.
    pub(crate) fn is_numerical(&self) -> bool {
        matches!(
            *self,
            Processor::Number(_)
                | Processor::Fraction(_)
                | Processor::Decimal(_)
                | Processor::Ordinal(_)
                | Processor::TwoDigitYear(_)
        )
    }

    /// Returns true if this processor prints decimal digits after a
    /// (possibly implied) decimal separator.
    pub(crate) fn is_fractional(&self) -> bool {
        matches!(*self, Processor::Decimal(_) | Processor::Fraction(_))
    }

    /// Returns true if this processor may absorb digits reserved for a
    /// following fixed width number.
    pub(crate) fn is_reservable(&self) -> bool {
        match *self {
            Processor::Number(ref p) => !p.fixed,
            Processor::TwoDigitYear(_) => true,
            _ => false,
        }
    }

    /// Reserves `digits` more trailing digits for following fixed width
    /// numbers.
    pub(crate) fn reserve(&mut self, digits: usize) {
        match *self {
            Processor::Number(ref mut p) => p.reserved += digits,
            Processor::TwoDigitYear(ref mut p) => p.reserved += digits,
            _ => {}
        }
    }

    /// Returns a copy of this processor for another element, or `None` if
    /// this processor cannot be moved to another element.
    pub(crate) fn with_element(&self, element: Element) -> Option<Processor> {
        match *self {
            Processor::Number(ref p) if !p.protected => {
                Some(Processor::Number(Number { element, ..p.clone() }))
            }
            Processor::TwoDigitYear(ref p) if !p.protected => {
                Some(Processor::TwoDigitYear(TwoDigitYear {
                    element,
                    ..p.clone()
                }))
            }
            Processor::Ordinal(ref p) => {
                Some(Processor::Ordinal(Ordinal { element, ..p.clone() }))
            }
            Processor::Text(ref p) => {
                Some(Processor::Text(Text { element, ..p.clone() }))
            }
            _ => None,
        }
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        match *self {
            Processor::Literal(ref p) => {
                p.print(out);
                Ok(())
            }
            Processor::Number(ref p) => p.print(snapshot, query, out),
            Processor::Fraction(ref p) => p.print(snapshot, query, out),
            Processor::Decimal(ref p) => p.print(snapshot, query, out),
            Processor::Ordinal(ref p) => p.print(snapshot, query, out),
            Processor::Text(ref p) => p.print(snapshot, query, out),
            Processor::TwoDigitYear(ref p) => p.print(snapshot, query, out),
            Processor::ZoneId => zone::print_id(snapshot, out),
            Processor::ZoneName(ref p) => p.print(snapshot, query, out),
            Processor::Offset(ref p) => p.print(snapshot, out),
            Processor::LocalizedOffset(ref p) => p.print(snapshot, out),
            Processor::Whitespace => Ok(()),
            Processor::Custom(ref p) => p.print(snapshot, out),
        }
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        match *self {
            Processor::Literal(ref p) => p.parse(text, log, query),
            Processor::Number(ref p) => p.parse(text, log, query, values),
            Processor::Fraction(ref p) => p.parse(text, log, query, values),
            Processor::Decimal(ref p) => p.parse(text, log, query, values),
            Processor::Ordinal(ref p) => p.parse(text, log, query, values),
            Processor::Text(ref p) => p.parse(text, log, query, values),
            Processor::TwoDigitYear(ref p) => {
                p.parse(text, log, query, values)
            }
            Processor::ZoneId => zone::parse_id(text, log, query, values),
            Processor::ZoneName(ref p) => p.parse(text, log, query, values),
            Processor::Offset(ref p) => p.parse(text, log, query, values),
            Processor::LocalizedOffset(ref p) => {
                p.parse(text, log, query, values)
            }
            Processor::Whitespace => {
                let rest = &text[log.position..];
                let trimmed = rest.trim_start();
                log.position += rest.len() - trimmed.len();
                Ok(())
            }
            Processor::Custom(ref p) => p.parse(text, log, values),
        }
    }
}

/// Returns a parse error located at the given byte offset.
pub(crate) fn fail(index: usize, err: impl IntoError) -> Error {
    err.into_error().context(PE::at(index))
}

/// Returns the value of `ch` as a digit relative to `zero`.
pub(crate) fn digit(ch: char, zero: char) -> Option<u32> {
    u32::from(ch).checked_sub(u32::from(zero)).filter(|&d| d <= 9)
}

/// Returns the character representing digit `d` relative to `zero`.
pub(crate) fn digit_char(d: u32, zero: char) -> char {
    char::from_u32(u32::from(zero) + d).unwrap_or('?')
}

/// Appends `n` with at least `min` digits, padded with zeros.
pub(crate) fn push_digits(out: &mut String, n: u64, min: usize, zero: char) {
    let digits = n.to_string();
    for _ in digits.len()..min {
        out.push(zero);
    }
    for b in digits.bytes() {
        out.push(digit_char(u32::from(b - b'0'), zero));
    }
}

/// Reads at most `max` digits starting at byte offset `at`.
///
/// Returns the value, the number of digits read and the byte offset after
/// the last digit. The caller must keep `max` at 18 or below.
pub(crate) fn read_digits(
    text: &str,
    at: usize,
    end: usize,
    max: usize,
    zero: char,
) -> (i64, usize, usize) {
    let (mut total, mut count, mut pos) = (0i64, 0, at);
    for ch in text[at..end].chars().take(max) {
        let Some(d) = digit(ch, zero) else { break };
        total = total * 10 + i64::from(d);
        count += 1;
        pos += ch.len_utf8();
    }
    (total, count, pos)
}

/// Counts the consecutive digits starting at byte offset `at`.
pub(crate) fn count_digits(
    text: &str,
    at: usize,
    end: usize,
    zero: char,
) -> usize {
    text[at..end].chars().take_while(|&ch| digit(ch, zero).is_some()).count()
}

/// Returns the byte offset before the last `protected` characters of
/// `text`.
pub(crate) fn protected_end(text: &str, protected: usize) -> usize {
    if protected == 0 {
        return text.len();
    }
    text.char_indices()
        .rev()
        .nth(protected - 1)
        .map(|(i, _)| i)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits() {
        let mut out = String::new();
        push_digits(&mut out, 7, 3, '0');
        push_digits(&mut out, 42, 1, '٠');
        assert_eq!(out, "007٤٢");
        assert_eq!(digit('٣', '٠'), Some(3));
        assert_eq!(digit('a', '0'), None);

        let text = "12٣4x";
        assert_eq!(read_digits(text, 0, text.len(), 9, '0'), (12, 2, 2));
        assert_eq!(count_digits(text, 0, text.len(), '0'), 2);
        assert_eq!(protected_end("2024-05", 3), 4);
        assert_eq!(protected_end("ab", 5), 0);
    }
}
