use crate::{
    civil::Weekday,
    error::{
        fmt::{FormatError as FE, ParseError as PE},
        Error,
    },
    fmt::{
        parse::ParseLog, print::int_of, processor::fail, AttributeQuery,
        Element, EraStyle, OutputContext, ParsedValues, Snapshot, TextKind,
    },
    util::prefix,
};

/// Fixed text that is printed as is and must be matched when parsing.
#[derive(Clone, Debug)]
pub(crate) struct Literal {
    pub(crate) text: Box<str>,
}

impl Literal {
    pub(crate) fn print(&self, out: &mut String) {
        out.push_str(&self.text);
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
    ) -> Result<(), Error> {
        let ignore_case = query.case_insensitive();
        let mut pos = log.position;
        let mut got = text[pos..].chars();
        for expected in self.text.chars() {
            let Some(ch) = got.next() else {
                log.warning = true;
                return Err(fail(pos, PE::LiteralEndOfInput { expected }));
            };
            let same = ch == expected
                || (ignore_case
                    && ch.to_lowercase().eq(expected.to_lowercase()));
            if !same {
                let err = PE::LiteralMismatch { expected, got: ch };
                return Err(fail(pos, err));
            }
            pos += ch.len_utf8();
        }
        log.position = pos;
        Ok(())
    }
}

/// An enumerated element printed with its localized text, e.g., a month
/// name.
#[derive(Clone, Debug)]
pub(crate) struct Text {
    pub(crate) element: Element,
}

impl Text {
    fn kind(&self, query: &AttributeQuery<'_>) -> Result<TextKind, Error> {
        let element = self.element;
        let kind = element
            .text_kind()
            .ok_or(FE::NoText { element, value: 0 })?;
        if kind != TextKind::Era {
            return Ok(kind);
        }
        Ok(match query.era_style() {
            EraStyle::Standard => TextKind::Era,
            EraStyle::Alternative => TextKind::EraAlternative,
            EraStyle::Latin => TextKind::EraLatin,
        })
    }

    fn texts(
        &self,
        query: &AttributeQuery<'_>,
        context: OutputContext,
    ) -> Result<Vec<(i64, String)>, Error> {
        let kind = self.kind(query)?;
        Ok(query
            .text_provider()
            .texts(kind, query.text_width(), context, query.locale())
            .unwrap_or_default())
    }

    /// Converts an element value to the value used by the text catalog.
    fn to_catalog(
        &self,
        value: i64,
        query: &AttributeQuery<'_>,
    ) -> Result<i64, Error> {
        if self.element != Element::LocalDayOfWeek {
            return Ok(value);
        }
        let local = i8::try_from(value).map_err(|_| FE::ValueRange {
            element: self.element,
            value,
        })?;
        let weekday = query.week_model().weekday_from_local(local)?;
        Ok(i64::from(weekday.to_monday_one_offset()))
    }

    /// Converts a catalog value back to the element value.
    fn from_catalog(
        &self,
        value: i64,
        query: &AttributeQuery<'_>,
    ) -> Result<i64, Error> {
        if self.element != Element::LocalDayOfWeek {
            return Ok(value);
        }
        let offset = i8::try_from(value).map_err(|_| PE::EnumValue {
            element: self.element,
            value,
        })?;
        let weekday = Weekday::from_monday_one_offset(offset)?;
        Ok(i64::from(query.week_model().local_day_of_week(weekday)))
    }

    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let element = self.element;
        let value = int_of(element, snapshot, query)?;
        let key = self.to_catalog(value, query)?;
        let texts = self.texts(query, query.output_context())?;
        let (_, text) = texts
            .iter()
            .find(|(v, _)| *v == key)
            .ok_or(FE::NoText { element, value })?;
        out.push_str(text);
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
        let start = log.position;
        let rest = &text[start..];
        if rest.is_empty() {
            log.warning = true;
            return Err(fail(start, PE::TextNotFound { element }));
        }
        let ignore_case = query.case_insensitive();
        let partial = query.partial_compare();
        let context = query.output_context();
        let mut contexts = vec![context];
        if query.multiple_contexts() {
            contexts.push(context.other());
        }

        let mut best: Option<(i64, usize)> = None;
        for context in contexts {
            for (value, candidate) in self.texts(query, context)? {
                let Some(len) =
                    prefix::match_len(rest, &candidate, ignore_case, partial)
                else {
                    continue;
                };
                if best.map_or(true, |(_, longest)| len > longest) {
                    best = Some((value, len));
                }
            }
            if best.is_some() {
                break;
            }
        }
        let Some((key, len)) = best else {
            return Err(fail(start, PE::TextNotFound { element }));
        };
        trace!(
            "matched {len} bytes of text for element {element} at {start}",
        );
        let value =
            self.from_catalog(key, query).map_err(|err| fail(start, err))?;
        values.put(element, value).map_err(|err| fail(start, err))?;
        log.position = start + len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::date,
        fmt::{Attributes, TextWidth},
        Locale,
    };

    use super::*;

    fn parse_text(
        element: Element,
        text: &str,
        attrs: &Attributes,
    ) -> Result<(i64, usize), Error> {
        let mut log = ParseLog::new(0);
        let mut values = ParsedValues::new();
        let query = AttributeQuery::of(attrs);
        Text { element }.parse(text, &mut log, &query, &mut values)?;
        Ok((values.get_int(element).unwrap(), log.position))
    }

    #[test]
    fn month_names() {
        let attrs = Attributes::new().locale(Locale::GERMANY);
        let snapshot = Snapshot::new().date(date(2024, 3, 1));
        let mut out = String::new();
        Text { element: Element::Month }
            .print(&snapshot, &AttributeQuery::of(&attrs), &mut out)
            .unwrap();
        assert_eq!(out, "März");

        assert_eq!(
            parse_text(Element::Month, "märz 2024", &attrs).unwrap(),
            (3, 5),
        );
        let strict = attrs.clone().leniency(crate::fmt::Leniency::Strict);
        assert!(parse_text(Element::Month, "märz", &strict).is_err());
    }

    #[test]
    fn standalone_fallback() {
        let attrs = Attributes::new()
            .locale(Locale::GERMANY)
            .text_width(TextWidth::Abbreviated);
        // "Mär" is only known in the standalone context.
        let parsed = parse_text(Element::Month, "Mär", &attrs).unwrap();
        assert_eq!(parsed, (3, 4));
        let single = attrs.multiple_contexts(false);
        insta::assert_snapshot!(
            parse_text(Element::Month, "Mär", &single).unwrap_err(),
            @"failed to parse at position 0: no suitable text found for element MONTH_OF_YEAR",
        );
    }

    #[test]
    fn literal() {
        let lit = Literal { text: "T".into() };
        let attrs = Attributes::new();
        let query = AttributeQuery::of(&attrs);
        let mut log = ParseLog::new(1);
        lit.parse("1T2", &mut log, &query).unwrap();
        assert_eq!(log.position, 2);
        let mut log = ParseLog::new(0);
        insta::assert_snapshot!(
            lit.parse("x", &mut log, &query).unwrap_err(),
            @"failed to parse at position 0: expected literal `T`, but found `x`",
        );
    }
}
