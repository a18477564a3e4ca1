use crate::Error;

/// A representation for the day of the week.
///
/// The default representation follows ISO 8601. That is, the week starts
/// with Monday and numbering starts at `1`. However, the various
/// constructors and accessors support using other schemes in wide use:
///
/// * [`Weekday::from_monday_one_offset`] builds a weekday from
/// a scheme that starts the week on Monday at offset `1`.
/// * [`Weekday::from_sunday_zero_offset`] builds a weekday from
/// a scheme that starts the week on Sunday at offset `0`.
///
/// Locale dependent week numbering is provided by
/// [`WeekModel`](crate::WeekModel).
///
/// # Example
///
/// ```
/// use chronofmt::civil::{date, Weekday};
///
/// let wd = date(2024, 3, 11).weekday();
/// assert_eq!(wd, Weekday::Monday);
/// assert_eq!(wd.to_monday_one_offset(), 1);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// Convert an offset to a structured `Weekday`.
    ///
    /// The offset should be from a scheme where the first day of the week
    /// is Monday and starts numbering at `1`.
    ///
    /// # Errors
    ///
    /// This returns an error when the given offset is not in the range
    /// `1..=7`.
    pub fn from_monday_one_offset(offset: i8) -> Result<Weekday, Error> {
        match offset {
            1 => Ok(Weekday::Monday),
            2 => Ok(Weekday::Tuesday),
            3 => Ok(Weekday::Wednesday),
            4 => Ok(Weekday::Thursday),
            5 => Ok(Weekday::Friday),
            6 => Ok(Weekday::Saturday),
            7 => Ok(Weekday::Sunday),
            _ => Err(Error::range("weekday", offset, 1, 7)),
        }
    }

    /// Convert an offset to a structured `Weekday`.
    ///
    /// The offset should be from a scheme where the first day of the week
    /// is Sunday and starts numbering at `0`.
    ///
    /// # Errors
    ///
    /// This returns an error when the given offset is not in the range
    /// `0..=6`.
    pub fn from_sunday_zero_offset(offset: i8) -> Result<Weekday, Error> {
        if !(0..=6).contains(&offset) {
            return Err(Error::range("weekday", offset, 0, 6));
        }
        Weekday::from_monday_one_offset(if offset == 0 { 7 } else { offset })
    }

    /// Returns this weekday as an offset in the range `1..=7` where Monday
    /// is `1`.
    pub fn to_monday_one_offset(self) -> i8 {
        self as i8 + 1
    }

    /// Returns this weekday as an offset in the range `0..=6` where Sunday
    /// is `0`.
    pub fn to_sunday_zero_offset(self) -> i8 {
        (self as i8 + 1) % 7
    }

    /// Returns the weekday `days` after this one, wrapping around the end
    /// of the week. Negative values go backwards.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::civil::Weekday;
    ///
    /// assert_eq!(Weekday::Sunday.wrapping_add(1), Weekday::Monday);
    /// assert_eq!(Weekday::Monday.wrapping_add(-1), Weekday::Sunday);
    /// assert_eq!(Weekday::Friday.wrapping_add(14), Weekday::Friday);
    /// ```
    pub fn wrapping_add(self, days: i64) -> Weekday {
        let offset = (i64::from(self as i8) + days).rem_euclid(7);
        Weekday::ALL[offset as usize]
    }

    /// Returns the number of days from `start` forward to this weekday, in
    /// the range `0..=6`.
    pub fn since(self, start: Weekday) -> i8 {
        (self as i8 - start as i8).rem_euclid(7)
    }

    pub(crate) const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];
}

#[cfg(test)]
impl quickcheck::Arbitrary for Weekday {
    fn arbitrary(g: &mut quickcheck::Gen) -> Weekday {
        *g.choose(&Weekday::ALL).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets() {
        for wd in Weekday::ALL {
            let one = wd.to_monday_one_offset();
            assert_eq!(Weekday::from_monday_one_offset(one).unwrap(), wd);
            let zero = wd.to_sunday_zero_offset();
            assert_eq!(Weekday::from_sunday_zero_offset(zero).unwrap(), wd);
        }
        assert_eq!(Weekday::Sunday.to_sunday_zero_offset(), 0);
        assert_eq!(Weekday::Sunday.to_monday_one_offset(), 7);
        insta::assert_snapshot!(
            Weekday::from_monday_one_offset(0).unwrap_err(),
            @"parameter 'weekday' with value 0 is not in the required range of 1..=7",
        );
    }

    #[test]
    fn since() {
        assert_eq!(Weekday::Monday.since(Weekday::Sunday), 1);
        assert_eq!(Weekday::Sunday.since(Weekday::Monday), 6);
        assert_eq!(Weekday::Friday.since(Weekday::Friday), 0);
    }

    quickcheck::quickcheck! {
        fn prop_wrapping_add_since(start: Weekday, days: i16) -> bool {
            let end = start.wrapping_add(i64::from(days));
            i64::from(end.since(start)) == i64::from(days).rem_euclid(7)
        }
    }
}
