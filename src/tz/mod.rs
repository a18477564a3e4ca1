/*!
Time zone offsets, time zones and the time zone data collaborators used by
the formatter.

A [`TimeZone`] is either a fixed [`Offset`] or a named zone identifier. Named
zones are resolved through a [`TimeZoneProvider`], which supplies offsets,
daylight saving status, identifiers and display names. The
[`BuiltinProvider`] covers a small set of zones with simplified rules and
is used whenever no other provider is configured.

When a local datetime is combined with a named zone, it may fall into a gap
or a fold. How this is resolved is determined by [`Disambiguation`].
*/

pub use self::{
    ambiguous::{AmbiguousOffset, Disambiguation},
    offset::{Dst, Offset},
    provider::{BuiltinProvider, NameStyle, TimeZoneProvider},
    timezone::TimeZone,
};

pub(crate) use self::names::zone_names;

mod ambiguous;
mod names;
mod offset;
mod provider;
mod timezone;
