use std::sync::Arc;

use crate::{
    civil::DateTime,
    error::{tz::Error as E, Error},
    tz::{
        AmbiguousOffset, BuiltinProvider, Disambiguation, Dst, Offset,
        TimeZoneProvider,
    },
    Timestamp,
};

/// A time zone: either a fixed offset from UTC or a named zone.
///
/// Named zones are plain identifiers such as `America/New_York`. They carry
/// no rules of their own. Instead, offsets and daylight saving status are
/// looked up through a [`TimeZoneProvider`]. Methods that do not take a
/// provider use the [`BuiltinProvider`].
///
/// Two time zones are equal when they are the same fixed offset or have the
/// same identifier.
///
/// # Example
///
/// ```
/// use chronofmt::{tz::{Offset, TimeZone}, Timestamp};
///
/// let tz = TimeZone::get("Europe/London")?;
/// let ts = Timestamp::from_second(1_720_000_000)?;
/// assert_eq!(tz.to_offset(ts)?, Offset::constant(1));
/// assert_eq!(tz.iana_name(), Some("Europe/London"));
///
/// let fixed = TimeZone::fixed(Offset::constant(-3));
/// assert_eq!(fixed.to_string(), "-03:00");
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Eq, Hash, PartialEq)]
pub struct TimeZone {
    kind: TimeZoneKind,
}

#[derive(Clone, Eq, Hash, PartialEq)]
enum TimeZoneKind {
    Fixed(Offset),
    Named(Arc<str>),
}

impl TimeZone {
    /// The UTC time zone, as a fixed offset of zero.
    pub const UTC: TimeZone =
        TimeZone { kind: TimeZoneKind::Fixed(Offset::UTC) };

    /// Creates a time zone with a fixed offset.
    pub fn fixed(offset: Offset) -> TimeZone {
        TimeZone { kind: TimeZoneKind::Fixed(offset) }
    }

    /// Returns the named time zone known to the built-in provider.
    ///
    /// # Errors
    ///
    /// This returns an error when the identifier is unknown.
    pub fn get(id: &str) -> Result<TimeZone, Error> {
        TimeZone::get_with(id, &BuiltinProvider)
    }

    /// Returns the named time zone known to the given provider.
    ///
    /// # Errors
    ///
    /// This returns an error when the identifier is unknown to the provider.
    pub fn get_with(
        id: &str,
        provider: &dyn TimeZoneProvider,
    ) -> Result<TimeZone, Error> {
        if !provider.available_ids().iter().any(|known| known == id) {
            return Err(Error::from(E::unknown(id)));
        }
        Ok(TimeZone::named(id))
    }

    /// Creates a named time zone without checking that any provider knows
    /// it. Lookups fail later if the identifier is unknown.
    pub fn named(id: &str) -> TimeZone {
        TimeZone { kind: TimeZoneKind::Named(Arc::from(id)) }
    }

    /// Returns the identifier of a named time zone.
    pub fn iana_name(&self) -> Option<&str> {
        match self.kind {
            TimeZoneKind::Fixed(_) => None,
            TimeZoneKind::Named(ref id) => Some(id),
        }
    }

    /// Returns the offset of a fixed offset time zone.
    pub fn to_fixed_offset(&self) -> Option<Offset> {
        match self.kind {
            TimeZoneKind::Fixed(offset) => Some(offset),
            TimeZoneKind::Named(_) => None,
        }
    }

    /// Returns the offset of this time zone at the given instant.
    pub fn to_offset(&self, timestamp: Timestamp) -> Result<Offset, Error> {
        self.to_offset_with(timestamp, &BuiltinProvider)
    }

    /// Returns the offset of this time zone at the given instant, using the
    /// given provider for named zones.
    pub fn to_offset_with(
        &self,
        timestamp: Timestamp,
        provider: &dyn TimeZoneProvider,
    ) -> Result<Offset, Error> {
        match self.kind {
            TimeZoneKind::Fixed(offset) => Ok(offset),
            TimeZoneKind::Named(ref id) => provider.offset_at(id, timestamp),
        }
    }

    /// Returns whether daylight saving time is in effect at the given
    /// instant, using the given provider for named zones. Fixed offsets are
    /// never in daylight saving time.
    pub fn to_dst_with(
        &self,
        timestamp: Timestamp,
        provider: &dyn TimeZoneProvider,
    ) -> Result<Dst, Error> {
        match self.kind {
            TimeZoneKind::Fixed(_) => Ok(Dst::No),
            TimeZoneKind::Named(ref id) => {
                provider.is_daylight_saving(id, timestamp).map(Dst::from)
            }
        }
    }

    /// Returns the possible offsets of the given civil datetime in this
    /// time zone.
    pub fn to_ambiguous_offset(
        &self,
        dt: DateTime,
    ) -> Result<AmbiguousOffset, Error> {
        self.to_ambiguous_offset_with(dt, &BuiltinProvider)
    }

    /// Like `to_ambiguous_offset`, but with an explicit provider.
    ///
    /// This assumes that a zone has at most one transition within a day of
    /// the given datetime.
    pub fn to_ambiguous_offset_with(
        &self,
        dt: DateTime,
        provider: &dyn TimeZoneProvider,
    ) -> Result<AmbiguousOffset, Error> {
        if let TimeZoneKind::Fixed(offset) = self.kind {
            return Ok(AmbiguousOffset::Unambiguous { offset });
        }
        let probe = dt.to_timestamp(Offset::UTC)?;
        let before = self.to_offset_with(
            probe.saturating_add_seconds(-86_400),
            provider,
        )?;
        let later = probe.saturating_add_seconds(86_400);
        let after = self.to_offset_with(later, provider)?;
        if before == after {
            return Ok(AmbiguousOffset::Unambiguous { offset: before });
        }
        let valid = |offset: Offset| -> Result<bool, Error> {
            let ts = dt.to_timestamp(offset)?;
            Ok(self.to_offset_with(ts, provider)? == offset)
        };
        Ok(match (valid(before)?, valid(after)?) {
            (true, true) => AmbiguousOffset::Fold { before, after },
            (true, false) => AmbiguousOffset::Unambiguous { offset: before },
            (false, true) => AmbiguousOffset::Unambiguous { offset: after },
            (false, false) => AmbiguousOffset::Gap { before, after },
        })
    }

    /// Converts a civil datetime in this time zone to an instant.
    ///
    /// # Errors
    ///
    /// This returns an error when the zone is unknown, when the datetime is
    /// ambiguous and `disambiguation` is [`Disambiguation::Reject`], or when
    /// the instant is out of range.
    pub fn to_timestamp(
        &self,
        dt: DateTime,
        disambiguation: Disambiguation,
    ) -> Result<Timestamp, Error> {
        self.to_timestamp_with(dt, disambiguation, &BuiltinProvider)
    }

    /// Like `to_timestamp`, but with an explicit provider.
    pub fn to_timestamp_with(
        &self,
        dt: DateTime,
        disambiguation: Disambiguation,
        provider: &dyn TimeZoneProvider,
    ) -> Result<Timestamp, Error> {
        let ambiguous = self.to_ambiguous_offset_with(dt, provider)?;
        disambiguation.resolve(self, dt, ambiguous)
    }
}

impl core::fmt::Display for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.kind {
            TimeZoneKind::Fixed(offset) => core::fmt::Display::fmt(&offset, f),
            TimeZoneKind::Named(ref id) => f.write_str(id),
        }
    }
}

impl core::fmt::Debug for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "TimeZone({self})")
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::datetime;

    use super::*;

    #[test]
    fn unknown() {
        insta::assert_snapshot!(
            TimeZone::get("Mars/Olympus_Mons").unwrap_err(),
            @"unknown time zone identifier `Mars/Olympus_Mons`",
        );
        let tz = TimeZone::named("Mars/Olympus_Mons");
        assert!(tz.to_offset(Timestamp::UNIX_EPOCH).is_err());
    }

    #[test]
    fn daylight() {
        let tz = TimeZone::get("America/New_York").unwrap();
        let winter = datetime(2024, 1, 15, 12, 0, 0, 0);
        let summer = datetime(2024, 7, 15, 12, 0, 0, 0);
        let ts = tz.to_timestamp(winter, Disambiguation::Reject).unwrap();
        assert_eq!(tz.to_dst_with(ts, &BuiltinProvider).unwrap(), Dst::No);
        let ts = tz.to_timestamp(summer, Disambiguation::Reject).unwrap();
        assert_eq!(tz.to_dst_with(ts, &BuiltinProvider).unwrap(), Dst::Yes);
        assert_eq!(tz.to_offset(ts).unwrap(), Offset::constant(-4));
    }
}
