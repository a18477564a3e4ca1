use crate::error::Error;

/// The era of a historic date.
///
/// Historic dates count years from one in each era. There is no year zero:
/// the year before `AD 1` is `BC 1`.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum HistoricEra {
    /// Before Christ.
    Bc,
    /// Anno Domini.
    Ad,
}

impl HistoricEra {
    /// Returns the era with the given numeric value, where `0` is BC and
    /// `1` is AD.
    ///
    /// # Errors
    ///
    /// This returns an error for any other value.
    pub fn from_value(value: i64) -> Result<HistoricEra, Error> {
        match value {
            0 => Ok(HistoricEra::Bc),
            1 => Ok(HistoricEra::Ad),
            _ => Err(Error::range("era", value, 0, 1)),
        }
    }

    /// Returns the numeric value of this era, `0` for BC and `1` for AD.
    pub fn value(self) -> i64 {
        match self {
            HistoricEra::Bc => 0,
            HistoricEra::Ad => 1,
        }
    }

    /// Returns the proleptic year of the given year of this era.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::history::HistoricEra;
    ///
    /// assert_eq!(HistoricEra::Ad.annotate(1582), 1582);
    /// assert_eq!(HistoricEra::Bc.annotate(1), 0);
    /// assert_eq!(HistoricEra::Bc.annotate(45), -44);
    /// ```
    pub fn annotate(self, year_of_era: i32) -> i32 {
        match self {
            HistoricEra::Bc => 1 - year_of_era,
            HistoricEra::Ad => year_of_era,
        }
    }

    /// Splits a proleptic year into an era and a year of that era.
    pub(crate) fn split(proleptic_year: i32) -> (HistoricEra, i32) {
        if proleptic_year <= 0 {
            (HistoricEra::Bc, 1 - proleptic_year)
        } else {
            (HistoricEra::Ad, proleptic_year)
        }
    }
}

impl core::fmt::Display for HistoricEra {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            HistoricEra::Bc => f.write_str("BC"),
            HistoricEra::Ad => f.write_str("AD"),
        }
    }
}
