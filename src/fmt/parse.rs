/*!
The backtracking parse loop shared by all formatters.

Steps are parsed in order. Each optional section gets a frame of parsed
values along with the position it started at. When a step in an optional
section fails, its frame is discarded, the position is reset to where the
section started and parsing continues after the section. A failure outside
of any optional section fails the parse.
*/

use crate::{
    error::{
        fmt::{BoundsError, ParseError as PE},
        Error, ErrorContext,
    },
    fmt::{
        consistency, processor::fail, step::Step, AttributeQuery, Chronology,
        Element, ParsedValues, Value,
    },
};

/// The mutable state of a parse in progress.
#[derive(Clone, Debug)]
pub(crate) struct ParseLog {
    /// The byte offset of the next character to parse.
    pub(crate) position: usize,
    /// Set by a step that failed only because the input ended. A default
    /// value of the step's element then stands in for the missing text.
    pub(crate) warning: bool,
    /// Whether a parsed zone name denotes daylight saving time.
    pub(crate) daylight: Option<bool>,
}

impl ParseLog {
    pub(crate) fn new(position: usize) -> ParseLog {
        ParseLog { position, warning: false, daylight: None }
    }
}

/// The values parsed within one optional section.
#[derive(Debug)]
struct Frame {
    section: usize,
    values: ParsedValues,
    start: usize,
    daylight: Option<bool>,
}

/// Parses raw values from `text` beginning at `start`.
pub(crate) fn parse_values(
    steps: &[Step],
    defaults: &[(Element, Value)],
    text: &str,
    start: usize,
    query: &AttributeQuery<'_>,
) -> Result<(ParsedValues, ParseLog), Error> {
    let mut log = ParseLog::new(start);
    let mut root = ParsedValues::new();
    // One frame per open optional section, innermost last.
    let mut frames: Vec<Frame> = vec![];
    let mut index = 0;
    while index < steps.len() {
        let step = &steps[index];
        let sections = step.sections();
        let common = frames
            .iter()
            .zip(sections)
            .take_while(|&(frame, &section)| frame.section == section)
            .count();
        while frames.len() > common {
            close(&mut root, &mut frames, log.position)?;
        }
        for &section in &sections[common..] {
            frames.push(Frame {
                section,
                values: ParsedValues::new(),
                start: log.position,
                daylight: log.daylight,
            });
        }

        log.warning = false;
        let values = match frames.last_mut() {
            Some(frame) => &mut frame.values,
            None => &mut root,
        };
        let Err(err) = step.parse(text, &mut log, query, values) else {
            index += 1;
            continue;
        };
        let default = step.element().and_then(|element| {
            defaults.iter().find(|&&(e, _)| e == element)
        });
        if let (true, Some((element, value))) = (log.warning, default) {
            trace!("using default {value} for {element} at {}", log.position);
            values
                .put(*element, value.clone())
                .map_err(|err| fail(log.position, err))?;
            index += 1;
            continue;
        }
        let Some(frame) = frames.pop() else {
            return Err(err);
        };

        trace!(
            "optional section {} failed, backtracking to {}: {err}",
            frame.section,
            frame.start,
        );
        // Skip the rest of the failed section, including nested sections.
        let depth = frames.len();
        index += 1;
        while index < steps.len()
            && steps[index].sections().get(depth) == Some(&frame.section)
        {
            index += 1;
        }
        log.position = frame.start;
        log.daylight = frame.daylight;
    }
    while !frames.is_empty() {
        close(&mut root, &mut frames, log.position)?;
    }
    Ok((root, log))
}

/// Merges the innermost frame into its parent.
fn close(
    root: &mut ParsedValues,
    frames: &mut Vec<Frame>,
    position: usize,
) -> Result<(), Error> {
    let Some(frame) = frames.pop() else { return Ok(()) };
    let parent = match frames.last_mut() {
        Some(parent) => &mut parent.values,
        None => root,
    };
    parent.merge(frame.values).map_err(|err| fail(position, err))
}

/// Returns an error when `start` is not a position in `text` at which
/// parsing can begin.
pub(crate) fn check_bounds(text: &str, start: usize) -> Result<(), Error> {
    if start >= text.len() || !text.is_char_boundary(start) {
        return Err(Error::from(BoundsError { start, len: text.len() }));
    }
    Ok(())
}

/// Parses a value of type `T` from `text` beginning at `start`.
///
/// This runs the parse loop and then, in order, fills in defaults, applies
/// the chronology's extensions, constructs the value, adjusts its second
/// fraction, checks it against the parsed values (only under strict
/// leniency) and finally rejects unparsed trailing text.
pub(crate) fn parse_value<T: Chronology>(
    steps: &[Step],
    defaults: &[(Element, Value)],
    text: &str,
    start: usize,
    query: &AttributeQuery<'_>,
) -> Result<(T, usize), Error> {
    check_bounds(text, start)?;
    let (mut values, log) = parse_values(steps, defaults, text, start, query)?;
    for (element, value) in defaults {
        if !values.contains(*element) {
            values.set(*element, value.clone());
        }
    }
    for extension in T::extensions() {
        extension.resolve(&mut values, query)?;
    }
    let parsed = || values.to_string().into_boxed_str();
    let partial = query.leniency().is_lax();
    let value = T::create_from(&values, query, partial)
        .with_context(|| PE::Construction {
            chronology: T::NAME,
            parsed: parsed(),
        })?
        .ok_or_else(|| {
            Error::from(PE::InsufficientData {
                chronology: T::NAME,
                parsed: parsed(),
            })
        })?;
    let value = match values.fraction() {
        Some(nanos) => value.with_fraction(nanos)?,
        None => value,
    };
    if query.leniency().is_strict() {
        let consumed = &text[start..log.position];
        consistency::check(&value, &values, log.daylight, consumed, query)?;
    }
    if log.position < text.len() && !query.trailing_characters() {
        let remaining = &text[log.position..];
        return Err(fail(log.position, PE::trailing(remaining)));
    }
    debug!(
        "parsed `{}` from {start} to {} as {}",
        T::NAME,
        log.position,
        values,
    );
    Ok((value, log.position))
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::Time,
        fmt::{Formatter, PatternType},
        Locale,
    };

    use super::*;

    fn clock(pattern: &str) -> Formatter<Time> {
        Formatter::of_pattern(pattern, PatternType::Cldr, Locale::ROOT)
            .unwrap()
    }

    #[test]
    fn failed_sibling_keeps_earlier_sections() {
        let _ = env_logger::try_init();

        let f = clock("HH[:mm[:ss]][ 'h']");
        let (values, end) = f.parse_raw("09:30:15 x", 0).unwrap();
        assert_eq!(values.get_int(Element::DigitalHourOfDay), Some(9));
        assert_eq!(values.get_int(Element::Minute), Some(30));
        assert_eq!(values.get_int(Element::Second), Some(15));
        assert_eq!(end, 8);
    }

    #[test]
    fn failed_nested_section_keeps_outer_section() {
        let _ = env_logger::try_init();

        let f = clock("HH[:mm[:ss]][ 'h']");
        let (values, end) = f.parse_raw("09:30 h", 0).unwrap();
        assert_eq!(values.get_int(Element::Minute), Some(30));
        assert!(!values.contains(Element::Second));
        assert_eq!(end, 7);

        let (values, end) = f.parse_raw("09:30:x h", 0).unwrap();
        assert_eq!(values.get_int(Element::Minute), Some(30));
        assert!(!values.contains(Element::Second));
        assert_eq!(end, 5);

        // A failed outer section drops its nested section too.
        let (values, end) = f.parse_raw("09:x h", 0).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(end, 2);
    }

    #[test]
    fn bounds() {
        assert!(check_bounds("09:30", 0).is_ok());
        assert!(check_bounds("09:30", 4).is_ok());
        assert!(check_bounds("09:30", 5).unwrap_err().is_bounds());
        assert!(check_bounds("", 0).unwrap_err().is_bounds());
        assert!(check_bounds("ä1", 1).unwrap_err().is_bounds());
        assert!(check_bounds("ä1", 2).is_ok());
    }
}
