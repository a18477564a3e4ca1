use crate::{civil::DateTime, error};

#[derive(Clone, Debug)]
pub(crate) enum Error {
    AmbiguousRejected { datetime: DateTime, zone: Box<str> },
    GapRejected { datetime: DateTime, zone: Box<str> },
    UnknownZone { id: Box<str> },
}

impl Error {
    pub(crate) fn unknown(id: &str) -> Error {
        Error::UnknownZone { id: id.into() }
    }
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
        error::ErrorKind::Tz(err).into()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::Error::*;

        match *self {
            AmbiguousRejected { datetime, ref zone } => write!(
                f,
                "datetime `{datetime}` is ambiguous in time zone `{zone}` \
                 (it falls into a fold) and disambiguation is set to reject",
            ),
            GapRejected { datetime, ref zone } => write!(
                f,
                "datetime `{datetime}` does not exist in time zone \
                 `{zone}` (it falls into a gap) and disambiguation \
                 is set to reject",
            ),
            UnknownZone { ref id } => {
                write!(f, "unknown time zone identifier `{id}`")
            }
        }
    }
}
