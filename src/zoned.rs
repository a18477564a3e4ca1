use crate::{
    civil::{Date, DateTime, Time},
    error::Error,
    tz::{BuiltinProvider, Disambiguation, Offset, TimeZone, TimeZoneProvider},
    Timestamp,
};

/// An instant in a particular time zone.
///
/// A `Zoned` value pairs a [`Timestamp`] with a [`TimeZone`]. The offset of
/// the zone at that instant and the resulting civil datetime are resolved
/// once, when the value is created, using a [`TimeZoneProvider`].
///
/// # Example
///
/// ```
/// use chronofmt::{civil::datetime, tz::TimeZone, Timestamp, Zoned};
///
/// let ts = Timestamp::from_second(1_704_067_200)?;
/// let zdt = Zoned::new(ts, TimeZone::get("America/New_York")?)?;
/// assert_eq!(zdt.datetime(), datetime(2023, 12, 31, 19, 0, 0, 0));
/// assert_eq!(
///     zdt.to_string(),
///     "2023-12-31T19:00:00-05:00[America/New_York]",
/// );
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Eq, PartialEq)]
pub struct Zoned {
    timestamp: Timestamp,
    time_zone: TimeZone,
    offset: Offset,
    datetime: DateTime,
}

impl Zoned {
    /// Creates a zoned datetime from an instant and a time zone, using the
    /// built-in provider.
    ///
    /// # Errors
    ///
    /// This returns an error when the time zone is unknown.
    pub fn new(
        timestamp: Timestamp,
        time_zone: TimeZone,
    ) -> Result<Zoned, Error> {
        Zoned::with_provider(timestamp, time_zone, &BuiltinProvider)
    }

    /// Creates a zoned datetime from an instant and a time zone, using the
    /// given provider to look up the offset.
    ///
    /// # Errors
    ///
    /// This returns an error when the provider does not know the time zone.
    pub fn with_provider(
        timestamp: Timestamp,
        time_zone: TimeZone,
        provider: &dyn TimeZoneProvider,
    ) -> Result<Zoned, Error> {
        let offset = time_zone.to_offset_with(timestamp, provider)?;
        let datetime = offset.to_datetime(timestamp);
        Ok(Zoned { timestamp, time_zone, offset, datetime })
    }

    /// Creates a zoned datetime from a civil datetime in a time zone.
    ///
    /// # Errors
    ///
    /// This returns an error when the time zone is unknown, or when the
    /// datetime is ambiguous and the disambiguation strategy rejects it.
    pub fn from_datetime(
        datetime: DateTime,
        time_zone: TimeZone,
        disambiguation: Disambiguation,
        provider: &dyn TimeZoneProvider,
    ) -> Result<Zoned, Error> {
        let timestamp =
            time_zone.to_timestamp_with(datetime, disambiguation, provider)?;
        Zoned::with_provider(timestamp, time_zone, provider)
    }

    /// Returns this zoned datetime with its fraction of the second
    /// replaced. The offset is kept, since zone transitions happen on whole
    /// seconds.
    pub(crate) fn with_subsec_nanosecond(
        &self,
        nanos: i32,
    ) -> Result<Zoned, Error> {
        let timestamp = Timestamp::new(self.timestamp.as_second(), nanos)?;
        let datetime = self.offset.to_datetime(timestamp);
        Ok(Zoned { timestamp, datetime, ..self.clone() })
    }

    /// Returns the instant of this zoned datetime.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Returns the time zone of this zoned datetime.
    pub fn time_zone(&self) -> &TimeZone {
        &self.time_zone
    }

    /// Returns the offset in effect at this instant.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    /// Returns the civil datetime on the clocks of the zone.
    pub fn datetime(&self) -> DateTime {
        self.datetime
    }

    /// Returns the civil date on the clocks of the zone.
    pub fn date(&self) -> Date {
        self.datetime.date()
    }

    /// Returns the civil time on the clocks of the zone.
    pub fn time(&self) -> Time {
        self.datetime.time()
    }
}

impl core::fmt::Display for Zoned {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}{}", self.datetime, self.offset)?;
        if let Some(id) = self.time_zone.iana_name() {
            write!(f, "[{id}]")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Zoned {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}
