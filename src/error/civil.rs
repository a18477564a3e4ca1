use crate::error;

#[derive(Clone, Debug)]
pub(crate) enum Error {
    EpochDayRange { epoch_day: i64 },
    TimestampFromDateTime,
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
        error::ErrorKind::Civil(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            EpochDayRange { epoch_day } => write!(
                f,
                "day {epoch_day} since the Unix epoch is outside the \
                 supported range of civil dates",
            ),
            TimestampFromDateTime => f.write_str(
                "converting civil datetime with offset to timestamp \
                 overflowed the supported range",
            ),
        }
    }
}
