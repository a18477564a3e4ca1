use crate::{
    error::{
        fmt::{FormatError as FE, ParseError as PE},
        Error,
    },
    fmt::{
        parse::ParseLog,
        processor::{fail, push_digits, read_digits},
        AttributeQuery, Element, ParsedValues, Snapshot,
    },
    tz::{self, Dst, NameStyle, Offset, TimeZone},
    util::prefix,
};

/// Identifiers that are always understood, in addition to those of the
/// zone provider.
const UNIVERSAL: &[&str] = &["UTC", "GMT", "Z"];

fn offset_of(snapshot: &Snapshot) -> Result<Offset, Error> {
    snapshot
        .get_offset()
        .ok_or_else(|| FE::ElementAbsent { element: Element::Offset }.into())
}

pub(crate) fn print_id(
    snapshot: &Snapshot,
    out: &mut String,
) -> Result<(), Error> {
    let tz = snapshot
        .get_zone()
        .ok_or(FE::ElementAbsent { element: Element::TimeZoneId })?;
    out.push_str(&tz.to_string());
    Ok(())
}

/// Parses a zone identifier such as `Europe/Berlin`, `UTC` or `+02:00`.
pub(crate) fn parse_id(
    text: &str,
    log: &mut ParseLog,
    query: &AttributeQuery<'_>,
    values: &mut ParsedValues,
) -> Result<(), Error> {
    let start = log.position;
    let rest = &text[start..];
    if rest.starts_with(['+', '-']) {
        let flexible = !query.leniency().is_strict();
        let (offset, len) = parse_signed(rest, true, flexible)
            .ok_or_else(|| fail(start, PE::OffsetInvalid))?;
        let tz = TimeZone::fixed(offset);
        values
            .put(Element::TimeZoneId, tz)
            .map_err(|err| fail(start, err))?;
        log.position = start + len;
        return Ok(());
    }

    let ignore_case = query.case_insensitive();
    let ids = query.zone_provider().available_ids();
    let best = ids
        .iter()
        .map(String::as_str)
        .chain(UNIVERSAL.iter().copied())
        .filter_map(|id| {
            let len = prefix::match_len(rest, id, ignore_case, false)?;
            Some((id, len))
        })
        .max_by_key(|&(_, len)| len);
    let Some((id, len)) = best else {
        let token: String = rest
            .chars()
            .take_while(|ch| ch.is_alphanumeric() || "/_-+".contains(*ch))
            .collect();
        if token.is_empty() {
            return Err(fail(start, PE::ZoneIdExpected));
        }
        return Err(fail(start, PE::ZoneIdUnknown { id: token.into() }));
    };
    let (tz, len) = if UNIVERSAL.contains(&id) {
        // `UTC+01:00` and the like denote fixed offsets.
        match parse_signed(&rest[len..], true, true) {
            Some((offset, more)) => (TimeZone::fixed(offset), len + more),
            None => (TimeZone::UTC, len),
        }
    } else {
        (TimeZone::named(id), len)
    };
    values.put(Element::TimeZoneId, tz).map_err(|err| fail(start, err))?;
    log.position = start + len;
    Ok(())
}

/// Parses `±HH`, optionally followed by minutes and seconds, each preceded
/// by a colon when `extended` is set. With `flexible`, the colon is
/// optional either way.
fn parse_signed(
    text: &str,
    extended: bool,
    flexible: bool,
) -> Option<(Offset, usize)> {
    let negative = match text.chars().next()? {
        '+' => false,
        '-' => true,
        _ => return None,
    };
    let (hours, n, mut pos) = read_digits(text, 1, text.len(), 2, '0');
    if n != 2 {
        return None;
    }
    let mut seconds = hours * 3_600;
    if let Some(minutes) = part(text, &mut pos, extended, flexible) {
        seconds += minutes * 60;
        if let Some(secs) = part(text, &mut pos, extended, flexible) {
            seconds += secs;
        }
    }
    let seconds = if negative { -seconds } else { seconds };
    let offset = Offset::new_seconds(i32::try_from(seconds).ok()?).ok()?;
    Some((offset, pos))
}

/// Parses a two digit minute or second part of an offset.
fn part(
    text: &str,
    pos: &mut usize,
    extended: bool,
    flexible: bool,
) -> Option<i64> {
    let mut at = *pos;
    if text[at..].starts_with(':') {
        if !extended && !flexible {
            return None;
        }
        at += 1;
    } else if extended && !flexible {
        return None;
    }
    let (value, n, next) = read_digits(text, at, text.len(), 2, '0');
    if n != 2 || value > 59 {
        return None;
    }
    *pos = next;
    Some(value)
}

/// How many parts of an offset are printed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OffsetPrecision {
    /// Hours, and minutes only if they are not zero.
    Short,
    /// Hours and minutes.
    Medium,
    /// Hours, minutes, and seconds only if they are not zero.
    Long,
}

/// An offset printed with digits, e.g., `+05:30` or `Z`.
#[derive(Clone, Debug)]
pub(crate) struct OffsetFormat {
    pub(crate) precision: OffsetPrecision,
    pub(crate) extended: bool,
    /// Printed instead of a zero offset. Empty means digits are printed.
    pub(crate) zero: Box<str>,
}

impl OffsetFormat {
    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        out: &mut String,
    ) -> Result<(), Error> {
        let offset = offset_of(snapshot)?;
        if offset == Offset::UTC && !self.zero.is_empty() {
            out.push_str(&self.zero);
            return Ok(());
        }
        let sep = if self.extended { ":" } else { "" };
        out.push(if offset.is_negative() { '-' } else { '+' });
        push_digits(out, offset.part_hours().unsigned_abs().into(), 2, '0');
        let minutes = offset.part_minutes();
        let seconds = offset.part_seconds();
        if self.precision != OffsetPrecision::Short || minutes != 0 {
            out.push_str(sep);
            push_digits(out, minutes.unsigned_abs().into(), 2, '0');
        }
        if self.precision == OffsetPrecision::Long && seconds != 0 {
            out.push_str(sep);
            push_digits(out, seconds.unsigned_abs().into(), 2, '0');
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
        let start = log.position;
        let rest = &text[start..];
        if rest.is_empty() {
            log.warning = true;
            return Err(fail(start, PE::OffsetExpected));
        }
        let leniency = query.leniency();
        if !self.zero.is_empty() {
            let ignore_case = query.case_insensitive();
            if let Some(len) =
                prefix::match_len(rest, &self.zero, ignore_case, false)
            {
                values
                    .put(Element::Offset, Offset::UTC)
                    .map_err(|err| fail(start, err))?;
                log.position = start + len;
                return Ok(());
            }
        }
        if !rest.starts_with(['+', '-']) {
            return Err(fail(start, PE::OffsetExpected));
        }
        let flexible = !leniency.is_strict();
        let (offset, len) = parse_signed(rest, self.extended, flexible)
            .ok_or_else(|| fail(start, PE::OffsetInvalid))?;
        // Hours alone only suffice for short offsets, unless lax.
        let hours_only = len == 3;
        if hours_only
            && self.precision != OffsetPrecision::Short
            && !leniency.is_lax()
        {
            return Err(fail(start + len, PE::OffsetInvalid));
        }
        values.put(Element::Offset, offset).map_err(|err| fail(start, err))?;
        log.position = start + len;
        Ok(())
    }
}

/// An offset printed in the localized GMT format, e.g., `GMT+1` or
/// `GMT+01:00`.
#[derive(Clone, Debug)]
pub(crate) struct LocalizedOffset {
    pub(crate) long: bool,
}

impl LocalizedOffset {
    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        out: &mut String,
    ) -> Result<(), Error> {
        self.print_offset(offset_of(snapshot)?, out);
        Ok(())
    }

    fn print_offset(&self, offset: Offset, out: &mut String) {
        out.push_str("GMT");
        if offset == Offset::UTC {
            return;
        }
        out.push(if offset.is_negative() { '-' } else { '+' });
        let hours = offset.part_hours().unsigned_abs().into();
        let minutes = offset.part_minutes();
        let seconds = offset.part_seconds();
        if self.long {
            push_digits(out, hours, 2, '0');
            out.push(':');
            push_digits(out, minutes.unsigned_abs().into(), 2, '0');
        } else {
            push_digits(out, hours, 1, '0');
            if minutes != 0 || seconds != 0 {
                out.push(':');
                push_digits(out, minutes.unsigned_abs().into(), 2, '0');
            }
        }
        if seconds != 0 {
            out.push(':');
            push_digits(out, seconds.unsigned_abs().into(), 2, '0');
        }
    }

    /// Parses a localized offset and returns it with the number of bytes
    /// read.
    fn parse_offset(
        &self,
        text: &str,
        query: &AttributeQuery<'_>,
    ) -> Option<(Offset, usize)> {
        let strict = query.leniency().is_strict();
        let ignore_case = query.case_insensitive();
        let prefixes: &[&str] =
            if strict { &["GMT"] } else { &["GMT", "UTC", "UT"] };
        let mut pos = prefixes
            .iter()
            .find_map(|p| prefix::match_len(text, p, ignore_case, false))?;
        let negative = match text[pos..].chars().next() {
            Some('+') => false,
            Some('-') => true,
            _ => return Some((Offset::UTC, pos)),
        };
        pos += 1;
        let (hours, n, next) = read_digits(text, pos, text.len(), 2, '0');
        if n == 0 || (self.long && strict && n != 2) {
            return None;
        }
        pos = next;
        let mut seconds = hours * 3_600;
        let minutes = part(text, &mut pos, true, false);
        match minutes {
            Some(minutes) => {
                seconds += minutes * 60;
                if let Some(secs) = part(text, &mut pos, true, false) {
                    seconds += secs;
                }
            }
            None if self.long && strict => return None,
            None => {}
        }
        let seconds = if negative { -seconds } else { seconds };
        let offset = Offset::new_seconds(i32::try_from(seconds).ok()?).ok()?;
        Some((offset, pos))
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        query: &AttributeQuery<'_>,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let start = log.position;
        if start >= text.len() {
            log.warning = true;
            return Err(fail(start, PE::OffsetExpected));
        }
        let (offset, len) = self
            .parse_offset(&text[start..], query)
            .ok_or_else(|| fail(start, PE::OffsetExpected))?;
        values.put(Element::Offset, offset).map_err(|err| fail(start, err))?;
        log.position = start + len;
        Ok(())
    }
}

/// A localized zone name such as `CET` or `Eastern Standard Time`.
#[derive(Clone, Debug)]
pub(crate) struct ZoneName {
    pub(crate) long: bool,
}

impl ZoneName {
    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        query: &AttributeQuery<'_>,
        out: &mut String,
    ) -> Result<(), Error> {
        let tz = snapshot
            .get_zone()
            .ok_or(FE::ElementAbsent { element: Element::TimeZoneId })?;
        let Some(id) = tz.iana_name() else {
            // Fixed offsets have no names.
            let offset = offset_of(snapshot)?;
            LocalizedOffset { long: self.long }.print_offset(offset, out);
            return Ok(());
        };
        let provider = query.zone_provider();
        let daylight = match snapshot.get_instant() {
            Some(ts) => provider.is_daylight_saving(id, ts)?,
            None => false,
        };
        let style = NameStyle::new(self.long, daylight);
        match provider.display_name(id, style, query.locale()) {
            Some(name) => out.push_str(&name),
            None => out.push_str(id),
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
        let start = log.position;
        let rest = &text[start..];
        if !rest.starts_with(char::is_alphabetic) {
            if rest.is_empty() {
                log.warning = true;
            }
            return Err(fail(start, PE::ZoneNameExpected));
        }
        if rest.starts_with("GMT") || rest.starts_with("UT") {
            let localized = LocalizedOffset { long: self.long };
            return localized.parse(text, log, query, values);
        }

        let locale = query.locale();
        let lax = query.leniency().is_lax();
        let provider = query.zone_provider();
        let names = tz::zone_names(provider, locale, self.long);
        let Some((entry, len)) =
            names.longest_match(rest, query.case_insensitive())
        else {
            let name: String =
                rest.chars().take_while(|ch| ch.is_alphabetic()).collect();
            return Err(fail(start, PE::ZoneNameUnknown { name: name.into() }));
        };

        let (mut std, mut dst): (Vec<&str>, Vec<&str>) = (vec![], vec![]);
        for (id, flavor) in entry.zones.iter() {
            match flavor {
                Dst::No => std.push(id),
                Dst::Yes => dst.push(id),
            }
        }
        if std.len() + dst.len() > 1 && !lax {
            let preferred = provider.preferred_ids(locale);
            let keep = |id: &&str| preferred.iter().any(|p| p == id);
            std.retain(keep);
            dst.retain(keep);
            if std.is_empty() && dst.is_empty() {
                return Err(fail(
                    start,
                    PE::ZoneNameNotPreferred {
                        name: entry.name.as_str().into(),
                        locale,
                    },
                ));
            }
        }
        let mut collapsed = false;
        let (zones, daylight) = if !std.is_empty() {
            if std.len() == 1 && dst.len() == 1 && std[0] == dst[0] {
                collapsed = true;
            } else {
                std.extend(dst);
            }
            (std, false)
        } else {
            (dst, true)
        };
        if zones.len() != 1 && !lax {
            return Err(fail(
                start,
                PE::ZoneNameNotUnique { name: entry.name.as_str().into() },
            ));
        }
        trace!(
            "zone name {:?} resolved to {} (daylight: {daylight})",
            entry.name,
            zones[0],
        );
        values
            .put(Element::TimeZoneId, TimeZone::named(zones[0]))
            .map_err(|err| fail(start, err))?;
        if names.daylight_sensitive() && !collapsed {
            log.daylight = Some(daylight);
        }
        log.position = start + len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        fmt::{Attributes, Leniency},
        Locale,
    };

    use super::*;

    #[test]
    fn print_offsets() {
        let print = |precision, extended, zero: &str, secs: i32| {
            let format =
                OffsetFormat { precision, extended, zero: zero.into() };
            let offset = Offset::new_seconds(secs).unwrap();
            let ts = crate::Timestamp::from_second(0).unwrap();
            let snapshot =
                Snapshot::new().zone(TimeZone::fixed(offset), offset, ts);
            let mut out = String::new();
            format.print(&snapshot, &mut out).unwrap();
            out
        };
        use OffsetPrecision::*;

        assert_eq!(print(Short, false, "Z", 0), "Z");
        assert_eq!(print(Short, false, "Z", 3_600), "+01");
        assert_eq!(print(Short, false, "Z", 19_800), "+0530");
        assert_eq!(print(Medium, true, "Z", -12_600), "-03:30");
        assert_eq!(print(Medium, false, "+0000", 0), "+0000");
        assert_eq!(print(Long, true, "", 3_723), "+01:02:03");
        assert_eq!(print(Long, false, "", 3_600), "+0100");
    }

    #[test]
    fn localized() {
        let mut out = String::new();
        let short = LocalizedOffset { long: false };
        short.print_offset(Offset::UTC, &mut out);
        out.push(' ');
        short.print_offset(Offset::constant(1), &mut out);
        out.push(' ');
        short.print_offset(Offset::new_seconds(-12_600).unwrap(), &mut out);
        out.push(' ');
        LocalizedOffset { long: true }
            .print_offset(Offset::constant(1), &mut out);
        assert_eq!(out, "GMT GMT+1 GMT-3:30 GMT+01:00");

        let attrs = Attributes::new();
        let query = AttributeQuery::of(&attrs);
        assert_eq!(
            short.parse_offset("GMT-3:30", &query),
            Some((Offset::new_seconds(-12_600).unwrap(), 8)),
        );
        assert_eq!(short.parse_offset("GMT", &query), Some((Offset::UTC, 3)));
        assert_eq!(short.parse_offset("XMT", &query), None);
    }

    #[test]
    fn zone_names() {
        let parse = |text: &str, attrs: &Attributes| {
            let mut log = ParseLog::new(0);
            let mut values = ParsedValues::new();
            let query = AttributeQuery::of(attrs);
            ZoneName { long: false }
                .parse(text, &mut log, &query, &mut values)
                .map(|()| (values, log))
        };

        let en_de = Locale::new("en", Some("DE")).unwrap();
        let attrs = Attributes::new().locale(en_de);
        let (values, log) = parse("CEST", &attrs).unwrap();
        assert_eq!(
            values.get(Element::TimeZoneId),
            Some(&TimeZone::named("Europe/Berlin").into()),
        );
        assert_eq!(log.daylight, Some(true));
        assert_eq!(log.position, 4);

        let us = Attributes::new().locale(Locale::US);
        insta::assert_snapshot!(
            parse("CET", &us).unwrap_err(),
            @"failed to parse at position 0: time zone name `CET` matches no preferred zone of locale en-US",
        );
        let lax = us.leniency(Leniency::Lax);
        assert!(parse("CET", &lax).is_ok());

        let (values, _) = parse("GMT+2", &attrs).unwrap();
        assert_eq!(
            values.get(Element::Offset),
            Some(&Offset::constant(2).into()),
        );
    }

    #[test]
    fn zone_ids() {
        let parse = |text: &str| {
            let attrs = Attributes::new();
            let mut log = ParseLog::new(0);
            let mut values = ParsedValues::new();
            parse_id(text, &mut log, &AttributeQuery::of(&attrs), &mut values)
                .map(|()| values.get(Element::TimeZoneId).cloned())
        };
        assert_eq!(
            parse("Europe/Berlin]").unwrap(),
            Some(TimeZone::named("Europe/Berlin").into()),
        );
        assert_eq!(
            parse("UTC+01:00").unwrap(),
            Some(TimeZone::fixed(Offset::constant(1)).into()),
        );
        assert_eq!(
            parse("-05:00").unwrap(),
            Some(TimeZone::fixed(Offset::constant(-5)).into()),
        );
        insta::assert_snapshot!(
            parse("Mars/Olympus").unwrap_err(),
            @"failed to parse at position 0: unknown time zone identifier `Mars/Olympus`",
        );
    }
}
