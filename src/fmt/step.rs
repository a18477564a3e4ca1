use std::sync::Arc;

use crate::{
    error::{
        fmt::{FormatError as FE, ParseError as PE},
        Error,
    },
    fmt::{
        parse::ParseLog,
        processor::{fail, Processor},
        AttributeQuery, Attributes, Element, ParsedValues, Snapshot,
    },
};

/// The position of a printed element in the output of a formatter.
///
/// Positions are byte offsets into the output. They are returned by
/// [`Formatter::print`](crate::fmt::Formatter::print).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ElementPosition {
    element: Element,
    start: usize,
    end: usize,
}

impl ElementPosition {
    /// Returns the element that was printed.
    pub fn element(&self) -> Element {
        self.element
    }

    /// Returns the byte offset at which the element's text starts.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the byte offset after the last byte of the element's text.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// A processor placed in a formatter, along with its section and padding.
#[derive(Clone, Debug)]
pub(crate) struct Step {
    pub(crate) processor: Processor,
    /// The identifiers of the optional sections this step is in, outermost
    /// first. Empty at the root.
    pub(crate) sections: Arc<[usize]>,
    pub(crate) attrs: Option<Arc<Attributes>>,
    pub(crate) pad_left: usize,
    pub(crate) pad_right: usize,
}

impl Step {
    pub(crate) fn new(
        processor: Processor,
        sections: Arc<[usize]>,
        attrs: Option<Arc<Attributes>>,
    ) -> Step {
        Step { processor, sections, attrs, pad_left: 0, pad_right: 0 }
    }

    pub(crate) fn sections(&self) -> &[usize] {
        &self.sections
    }

    /// The identifier of the innermost optional section this step is in.
    /// Zero is the root.
    pub(crate) fn section(&self) -> usize {
        self.sections.last().copied().unwrap_or(0)
    }

    pub(crate) fn element(&self) -> Option<Element> {
        self.processor.element()
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
        positions: &mut Vec<ElementPosition>,
    ) -> Result<(), Error> {
        let query = query.with_section(self.attrs.as_deref());
        let start = out.len();
        if self.pad_left == 0 && self.pad_right == 0 {
            self.processor.print(snapshot, &query, out)?;
        } else {
            let mut buf = String::new();
            self.processor.print(snapshot, &query, &mut buf)?;
            let len = buf.chars().count();
            let pad = query.pad_char();
            for width in [self.pad_left, self.pad_right] {
                if width > 0 && len > width {
                    return Err(Error::from(FE::PadWidthExceeded {
                        width,
                        len,
                    }));
                }
            }
            let repeat = |width: usize| {
                core::iter::repeat(pad).take(width.saturating_sub(len))
            };
            out.extend(repeat(self.pad_left));
            out.push_str(&buf);
            out.extend(repeat(self.pad_right));
        }
        if let Some(element) = self.element() {
            positions.push(ElementPosition { element, start, end: out.len() });
        }
        Ok(())
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let query = query.with_section(self.attrs.as_deref());
        if self.pad_left == 0 && self.pad_right == 0 {
            return self.processor.parse(text, log, &query, values);
        }
        let pad = query.pad_char();
        let strict = query.leniency().is_strict();
        let start = log.position;
        if self.pad_left > 0 {
            log.position += skip_pad(&text[start..], pad, self.pad_left - 1);
        }
        self.processor.parse(text, log, &query, values)?;
        if self.pad_left > 0 && strict {
            let got = text[start..log.position].chars().count();
            if got != self.pad_left {
                return Err(fail(
                    start,
                    PE::PadMismatch { width: self.pad_left, got },
                ));
            }
        }
        if self.pad_right > 0 {
            let len = text[start..log.position].chars().count();
            let missing = self.pad_right.saturating_sub(len);
            log.position += skip_pad(&text[log.position..], pad, missing);
            let got = text[start..log.position].chars().count();
            if strict && got != self.pad_right {
                return Err(fail(
                    start,
                    PE::PadMismatch { width: self.pad_right, got },
                ));
            }
        }
        Ok(())
    }
}

/// Returns the number of bytes covered by at most `max` leading pad
/// characters.
fn skip_pad(text: &str, pad: char, max: usize) -> usize {
    text.chars()
        .take(max)
        .take_while(|&ch| ch == pad)
        .map(char::len_utf8)
        .sum()
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::date,
        fmt::{processor::Number, Leniency, SignPolicy},
    };

    use super::*;

    fn day_step(pad_left: usize, pad_right: usize) -> Step {
        let number = Number::new(
            Element::DayOfMonth,
            1,
            2,
            SignPolicy::Never,
            false,
        )
        .unwrap();
        let step =
            Step::new(Processor::Number(number), Arc::from(vec![]), None);
        Step { pad_left, pad_right, ..step }
    }

    #[test]
    fn print_padded() {
        let attrs = Attributes::new().pad_char('*');
        let query = AttributeQuery::of(&attrs);
        let snapshot = Snapshot::new().date(date(2024, 7, 9));
        let mut out = String::new();
        let mut positions = vec![];
        day_step(3, 0)
            .print(&snapshot, &query, &mut out, &mut positions)
            .unwrap();
        day_step(0, 2)
            .print(&snapshot, &query, &mut out, &mut positions)
            .unwrap();
        assert_eq!(out, "**99*");
        assert_eq!(positions[0].start(), 0);
        assert_eq!(positions[0].end(), 3);
        assert_eq!(positions[1].start(), 3);

        let err = day_step(0, 1)
            .print(
                &Snapshot::new().date(date(2024, 7, 19)),
                &query,
                &mut out,
                &mut positions,
            )
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"printed text has 2 characters which exceeds the pad width of 1",
        );
    }

    #[test]
    fn parse_padded() {
        let parse = |step: Step, text: &str, attrs: &Attributes| {
            let mut log = ParseLog::new(0);
            let mut values = ParsedValues::new();
            let query = AttributeQuery::of(attrs);
            step.parse(text, &mut log, &query, &mut values)
                .map(|()| (values.get_int(Element::DayOfMonth), log.position))
        };
        let attrs = Attributes::new();
        let ok = |step, text| parse(step, text, &attrs).unwrap();
        assert_eq!(ok(day_step(3, 0), "  9"), (Some(9), 3));
        assert_eq!(ok(day_step(0, 3), "9  x"), (Some(9), 3));
        assert_eq!(ok(day_step(3, 0), " 9"), (Some(9), 2));

        let strict = Attributes::new().leniency(Leniency::Strict);
        insta::assert_snapshot!(
            parse(day_step(3, 0), " 9", &strict).unwrap_err(),
            @"failed to parse at position 0: expected padded width of 3, but found 2",
        );
    }
}
