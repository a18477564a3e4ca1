/*!
The check that a strictly parsed value agrees with the text it came from.

Construction of a value may silently drop parsed elements that it does not
need, for example a day of week next to a complete calendar date. Under
strict leniency every parsed element is therefore compared with the same
element read back from the constructed value, and any difference fails the
parse. For instants, a parsed zone name must also agree with whether
daylight saving time is in effect.
*/

use crate::{
    error::{fmt::ConsistencyError, Error},
    fmt::{print::value_of, AttributeQuery, Chronology, ParsedValues},
    util::escape,
};

/// Checks `value` against the parsed `values`.
///
/// `daylight` is the daylight saving flag of a parsed zone name, if the
/// name implies one. `text` is the consumed input, used in error messages.
pub(crate) fn check<T: Chronology>(
    value: &T,
    values: &ParsedValues,
    daylight: Option<bool>,
    text: &str,
    query: &AttributeQuery<'_>,
) -> Result<(), Error> {
    let excerpt = || escape::Excerpt(text).to_string().into_boxed_str();
    if let Some(ts) = value.timestamp() {
        let Some(expected) = daylight else { return Ok(()) };
        let snapshot = value.snapshot(query)?;
        let Some(id) = snapshot.get_zone().and_then(|tz| tz.iana_name())
        else {
            return Ok(());
        };
        let actual = query.zone_provider().is_daylight_saving(id, ts)?;
        if actual != expected {
            return Err(Error::from(ConsistencyError::Daylight {
                daylight: actual,
                text: excerpt(),
            }));
        }
        return Ok(());
    }

    let snapshot = value.snapshot(query)?;
    for (element, raw) in values.iter() {
        if !T::is_supported(element) || element.is_decimal() {
            continue;
        }
        // Elements that cannot be read back are not checked.
        let Ok(result) = value_of(element, &snapshot, query) else {
            continue;
        };
        if *raw != result {
            trace!("strict check failed: {element} is {raw}, not {result}");
            return Err(Error::from(ConsistencyError::Element {
                element,
                raw: raw.clone(),
                result,
                text: excerpt(),
            }));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::{date, Date},
        fmt::{Attributes, Element},
        tz::TimeZone,
        Locale, Timestamp,
    };

    use super::*;

    #[test]
    fn elements() {
        let attrs = Attributes::new().locale(Locale::US);
        let query = AttributeQuery::of(&attrs);
        let mut values = ParsedValues::new();
        values.set(Element::Year, 2024);
        values.set(Element::Month, 7);
        values.set(Element::DayOfMonth, 9);
        values.set(Element::DayOfWeek, 2);
        let day = date(2024, 7, 9);
        check::<Date>(&day, &values, None, "Tue, 2024-07-09", &query)
            .unwrap();

        values.set(Element::DayOfWeek, 3);
        let err = check::<Date>(&day, &values, None, "Wed, 2024-07-09", &query)
            .unwrap_err();
        insta::assert_snapshot!(
            err,
            @"conflict found: text `Wed, 2024-...` with element DAY_OF_WEEK 3, but parsed value has element value 2",
        );
    }

    #[test]
    fn daylight() {
        let berlin = TimeZone::get("Europe/Berlin").unwrap();
        let attrs = Attributes::new().time_zone(berlin);
        let query = AttributeQuery::of(&attrs);
        // 2024-01-15T12:00:00Z, in winter.
        let ts = Timestamp::from_second(1_705_320_000).unwrap();
        let values = ParsedValues::new();
        check(&ts, &values, Some(false), "12:00 CET", &query).unwrap();
        check(&ts, &values, None, "12:00", &query).unwrap();
        let err =
            check(&ts, &values, Some(true), "12:00 CEST", &query).unwrap_err();
        insta::assert_snapshot!(
            err,
            @"conflict found: parsed value is not daylight saving, but time zone name has not the appropriate form in `12:00 CEST`",
        );
    }
}
