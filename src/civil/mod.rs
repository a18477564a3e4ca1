/*!
Facilities for dealing with inexact dates and times.

These types are "civil" in the sense that they correspond to what humans
read on a calendar or a clock, without any reference to a time zone. All
civil dates use the proleptic Gregorian calendar (as in ISO 8601). Dates in
historic calendars are provided by the [`history`](crate::history) module
and convert to and from civil dates.

The types in this module are also the building blocks of the
[`Chronology`](crate::fmt::Chronology) implementations used by the
formatter in [`fmt`](crate::fmt).
*/

pub use self::{
    date::{date, Date},
    datetime::{datetime, DateTime},
    time::{time, Time},
    weekday::Weekday,
};

mod date;
mod datetime;
mod time;
mod weekday;
