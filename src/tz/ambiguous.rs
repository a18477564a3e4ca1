use crate::{
    civil::DateTime,
    error::{tz::Error as E, Error},
    tz::{Offset, TimeZone},
    Timestamp,
};

/// Configures how a civil datetime is resolved to an instant in a time zone
/// when the datetime is ambiguous.
///
/// A civil datetime is ambiguous when it falls into a gap (it never appears
/// on the clocks of the zone, typically at the start of daylight saving
/// time) or into a fold (it appears twice, typically at the end of daylight
/// saving time).
///
/// # Example
///
/// ```
/// use chronofmt::{civil::datetime, tz::{Disambiguation, TimeZone}};
///
/// let tz = TimeZone::get("America/New_York")?;
/// // 2024-03-10T02:30 does not exist in New York.
/// let dt = datetime(2024, 3, 10, 2, 30, 0, 0);
/// let ts = tz.to_timestamp(dt, Disambiguation::Compatible)?;
/// assert_eq!(ts.to_string(), "2024-03-10T07:30:00Z");
/// let ts = tz.to_timestamp(dt, Disambiguation::Earlier)?;
/// assert_eq!(ts.to_string(), "2024-03-10T06:30:00Z");
/// assert!(tz.to_timestamp(dt, Disambiguation::Reject).is_err());
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Disambiguation {
    /// Gaps resolve to the later instant and folds to the earlier one.
    ///
    /// This moves a datetime in a gap forward by the length of the gap,
    /// which matches how most software behaves.
    #[default]
    Compatible,
    /// Always pick the earlier of the two possible instants.
    Earlier,
    /// Always pick the later of the two possible instants.
    Later,
    /// Fail when the datetime is in a gap or a fold.
    Reject,
}

/// The possible offsets of a civil datetime in a time zone.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AmbiguousOffset {
    /// The datetime has exactly one offset.
    Unambiguous {
        /// The offset.
        offset: Offset,
    },
    /// The datetime falls into a gap between two offsets.
    Gap {
        /// The offset in effect before the gap.
        before: Offset,
        /// The offset in effect after the gap.
        after: Offset,
    },
    /// The datetime falls into a fold and may use either offset.
    Fold {
        /// The offset in effect before the fold.
        before: Offset,
        /// The offset in effect after the fold.
        after: Offset,
    },
}

impl Disambiguation {
    /// Resolves a civil datetime with the given possible offsets to an
    /// instant.
    pub(crate) fn resolve(
        self,
        tz: &TimeZone,
        dt: DateTime,
        ambiguous: AmbiguousOffset,
    ) -> Result<Timestamp, Error> {
        use self::Disambiguation::*;

        let offset = match ambiguous {
            AmbiguousOffset::Unambiguous { offset } => offset,
            AmbiguousOffset::Gap { before, after } => match self {
                Compatible | Later => before,
                Earlier => after,
                Reject => {
                    return Err(Error::from(E::GapRejected {
                        datetime: dt,
                        zone: tz.to_string().into(),
                    }))
                }
            },
            AmbiguousOffset::Fold { before, after } => match self {
                Compatible | Earlier => before,
                Later => after,
                Reject => {
                    return Err(Error::from(E::AmbiguousRejected {
                        datetime: dt,
                        zone: tz.to_string().into(),
                    }))
                }
            },
        };
        trace!("resolved {dt} in {tz} to offset {offset} via {self:?}");
        dt.to_timestamp(offset)
    }
}

#[cfg(test)]
mod tests {
    use crate::civil::datetime;

    use super::*;

    #[test]
    fn fold() {
        let tz = TimeZone::get("Europe/Berlin").unwrap();
        let dt = datetime(2024, 10, 27, 2, 30, 0, 0);
        let amb = tz.to_ambiguous_offset(dt).unwrap();
        assert_eq!(
            amb,
            AmbiguousOffset::Fold {
                before: Offset::constant(2),
                after: Offset::constant(1),
            },
        );
        let earlier = tz.to_timestamp(dt, Disambiguation::Compatible).unwrap();
        let later = tz.to_timestamp(dt, Disambiguation::Later).unwrap();
        assert_eq!(later.as_second() - earlier.as_second(), 3_600);
        insta::assert_snapshot!(
            tz.to_timestamp(dt, Disambiguation::Reject).unwrap_err(),
            @"datetime `2024-10-27T02:30:00` is ambiguous in time zone `Europe/Berlin` (it falls into a fold) and disambiguation is set to reject",
        );
    }

    #[test]
    fn gap() {
        let tz = TimeZone::get("Europe/Berlin").unwrap();
        let dt = datetime(2024, 3, 31, 2, 30, 0, 0);
        let amb = tz.to_ambiguous_offset(dt).unwrap();
        assert_eq!(
            amb,
            AmbiguousOffset::Gap {
                before: Offset::constant(1),
                after: Offset::constant(2),
            },
        );
        insta::assert_snapshot!(
            tz.to_timestamp(dt, Disambiguation::Reject).unwrap_err(),
            @"datetime `2024-03-31T02:30:00` does not exist in time zone `Europe/Berlin` (it falls into a gap) and disambiguation is set to reject",
        );
    }
}
