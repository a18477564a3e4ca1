/*!
A pattern driven format and parse engine for dates, times and zoned
datetimes.

The heart of this crate is [`fmt::Formatter`], which prints values to text
and parses them back, following either a pattern string such as
`uuuu-MM-dd HH:mm` or a sequence of steps assembled with a
[`fmt::Builder`]. Formatters support:

* Localized texts for months, weekdays, eras and day periods.
* Optional sections that are skipped as a whole when they fail to parse.
* Adjacent numbers without separators, such as `uuuuMMdd`.
* Strict, smart and lax parsing, where strict parsing also checks that all
parsed elements agree with each other.
* Historic calendars, in which the Julian calendar is replaced by the
Gregorian calendar at a cutover date that depends on the region. See the
[`history`] module.
* Time zone identifiers, names and offsets.

The temporal types themselves are deliberately small. [`civil::Date`],
[`civil::Time`] and [`civil::DateTime`] are proleptic Gregorian values
without a time zone, [`Timestamp`] is an instant and [`Zoned`] is an
instant in a time zone.

# Example

```
use chronofmt::{
    civil::date,
    fmt::{Formatter, PatternType},
    Locale,
};

let f = Formatter::of_pattern(
    "EEEE, d. MMMM uuuu",
    PatternType::Cldr,
    Locale::GERMANY,
)?;
let day = date(2024, 7, 9);
assert_eq!(f.format(&day)?, "Dienstag, 9. Juli 2024");
assert_eq!(f.parse("Dienstag, 9. Juli 2024")?, day);

# Ok::<(), Box<dyn std::error::Error>>(())
```

# Crate features

* **logging** - When enabled, the `log` crate is used to emit messages
about how patterns are compiled and how parses walk their optional
sections. This is mostly useful for debugging.
*/

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
// We generally want all types to impl Debug.
#![warn(missing_debug_implementations)]

pub use crate::{
    error::Error,
    locale::Locale,
    timestamp::Timestamp,
    week::WeekModel,
    zoned::Zoned,
};

#[macro_use]
mod logging;

pub mod civil;
mod error;
pub mod fmt;
pub mod history;
mod locale;
mod timestamp;
pub mod tz;
mod util;
mod week;
mod zoned;
