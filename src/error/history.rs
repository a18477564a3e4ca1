use crate::{civil::Date, error, history::HistoricDate};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    Gap { date: HistoricDate },
    Invalid { date: HistoricDate },
    ReformTooEarly { date: Date },
    Unrepresentable { date: HistoricDate },
}

impl error::IntoError for Error {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<Error> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: Error) -> error::Error {
        error::ErrorKind::History(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            Gap { date } => write!(
                f,
                "historic date `{date}` falls into a gap \
                 left by a calendar cutover",
            ),
            Invalid { date } => {
                write!(f, "historic date `{date}` is not a valid date")
            }
            ReformTooEarly { date } => write!(
                f,
                "Gregorian reform at `{date}` is before the first \
                 Gregorian reform at 1582-10-15",
            ),
            Unrepresentable { date } => write!(
                f,
                "historic date `{date}` is outside the supported range \
                 of civil dates",
            ),
        }
    }
}
