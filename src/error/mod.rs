use std::sync::Arc;

pub(crate) mod civil;
pub(crate) mod fmt;
pub(crate) mod history;
pub(crate) mod tz;

/// An error that can occur in this crate.
///
/// Errors fall into a handful of categories, each of which can be queried
/// with a predicate:
///
/// * Compiling a pattern or a sequence of builder directives was rejected.
/// See [`Error::is_build`].
/// * A value could not be represented by a formatting step. See
/// [`Error::is_format`].
/// * Input text did not match a formatter. See [`Error::is_parse`] and
/// [`Error::parse_position`].
/// * Parsed values contradict the value constructed from them under strict
/// leniency. See [`Error::is_consistency`].
/// * A parse was started at or beyond the end of its input. See
/// [`Error::is_bounds`].
/// * A value is out of range. See [`Error::is_range`].
///
/// The predicates are not exhaustive. That is, there exist some errors (for
/// example, time zone lookup failures) that do not return `true` for any of
/// the `Error::is_*` predicates.
///
/// # Design
///
/// This crate follows the "One True God Error Type Pattern," where only one
/// error type exists for a variety of different operations. Errors are
/// chained: higher level operations attach context to lower level failures,
/// and the `Display` impl shows the whole chain separated by `: `.
#[derive(Clone)]
pub struct Error {
    /// The internal representation of an error.
    ///
    /// This is in an `Arc` to make an `Error` cloneable and cheap to move
    /// around. It also makes the size of an error equal to one word.
    inner: Option<Arc<ErrorInner>>,
}

#[derive(Debug)]
struct ErrorInner {
    kind: ErrorKind,
    cause: Option<Error>,
}

impl Error {
    /// Creates a new error value from `core::fmt::Arguments`.
    ///
    /// It is expected to use [`format_args!`](format_args) from
    /// Rust's standard library (available in `core`) to create a
    /// `core::fmt::Arguments`.
    ///
    /// This is useful for implementors of
    /// [`Chronology`](crate::fmt::Chronology),
    /// [`Extension`](crate::fmt::Extension) or the provider traits that
    /// need to report their own failures.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::Error;
    ///
    /// let err = Error::from_args(format_args!("something failed"));
    /// assert_eq!(err.to_string(), "something failed");
    /// ```
    pub fn from_args<'a>(message: core::fmt::Arguments<'a>) -> Error {
        Error::from(ErrorKind::Adhoc(AdhocError::from_args(message)))
    }

    /// Returns true when this error originated as a result of a value being
    /// out of its supported range.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::civil::Date;
    ///
    /// assert!(Date::new(2025, 2, 29).unwrap_err().is_range());
    /// ```
    pub fn is_range(&self) -> bool {
        matches!(*self.root().kind(), ErrorKind::Range(_))
    }

    /// Returns true when this error was produced while compiling a
    /// formatter.
    ///
    /// Build errors are always fatal and are reported synchronously by the
    /// builder method that caused them.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{civil::Date, fmt::{Formatter, PatternType}, Locale};
    ///
    /// let err = Formatter::<Date>::of_pattern(
    ///     "yyyy-MM-dd'T",
    ///     PatternType::Cldr,
    ///     Locale::US,
    /// ).unwrap_err();
    /// assert!(err.is_build());
    /// ```
    pub fn is_build(&self) -> bool {
        self.chain().any(|err| matches!(*err.kind(), ErrorKind::FmtBuild(_)))
    }

    /// Returns true when this error was produced because a formatting step
    /// could not represent its source value.
    pub fn is_format(&self) -> bool {
        self.chain()
            .any(|err| matches!(*err.kind(), ErrorKind::FmtFormat(_)))
    }

    /// Returns true when this error was produced because input text did not
    /// match a formatter, or because the values parsed from it could not be
    /// turned into a typed value.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{civil::Date, fmt::{Formatter, PatternType}, Locale};
    ///
    /// let f = Formatter::<Date>::of_pattern(
    ///     "yyyy-MM-dd",
    ///     PatternType::Cldr,
    ///     Locale::US,
    /// )?;
    /// let err = f.parse("2024-0x-01").unwrap_err();
    /// assert!(err.is_parse());
    /// assert_eq!(err.parse_position(), Some(5));
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn is_parse(&self) -> bool {
        self.chain().any(|err| matches!(*err.kind(), ErrorKind::FmtParse(_)))
    }

    /// Returns true when this error was produced by the strict consistency
    /// check that runs after a typed value was constructed from parsed
    /// values.
    pub fn is_consistency(&self) -> bool {
        self.chain()
            .any(|err| matches!(*err.kind(), ErrorKind::FmtConsistency(_)))
    }

    /// Returns true when a parse was started at a position at or beyond the
    /// end of its input.
    ///
    /// This signals misuse by the caller, as opposed to malformed input.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{
    ///     civil::Date,
    ///     fmt::{Attributes, Formatter, PatternType},
    ///     Locale,
    /// };
    ///
    /// let f = Formatter::<Date>::of_pattern(
    ///     "yyyy-MM-dd",
    ///     PatternType::Cldr,
    ///     Locale::US,
    /// )?;
    /// let err =
    ///     f.parse_at("2024-01-01", 10, &Attributes::new()).unwrap_err();
    /// assert!(err.is_bounds());
    /// assert!(!err.is_parse());
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn is_bounds(&self) -> bool {
        self.chain()
            .any(|err| matches!(*err.kind(), ErrorKind::FmtBounds(_)))
    }

    /// Returns the character offset (in bytes) at which parsing failed, if
    /// this error is a parse error that carries a position.
    pub fn parse_position(&self) -> Option<usize> {
        self.chain().find_map(|err| match *err.kind() {
            ErrorKind::FmtParse(ref err) => err.position(),
            _ => None,
        })
    }
}

impl Error {
    /// Creates a new error indicating that a `given` value is out of the
    /// specified `min..=max` range. The given `what` label is used in the
    /// error message as a human readable description of what exactly is out
    /// of range. (e.g., "month")
    #[inline(never)]
    #[cold]
    pub(crate) fn range(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> Error {
        Error::from(ErrorKind::Range(RangeError::new(what, given, min, max)))
    }

    pub(crate) fn context(self, consequent: impl IntoError) -> Error {
        self.context_impl(consequent.into_error())
    }

    #[inline(never)]
    #[cold]
    fn context_impl(self, consequent: Error) -> Error {
        let mut err = consequent;
        if err.inner.is_none() {
            err = Error::from(ErrorKind::Unknown);
        }
        // A consequent must be uniquely owned and have no cause yet. If it
        // doesn't, the consequent is dropped and the cause is kept.
        let Some(inner) = err.inner.as_mut().and_then(Arc::get_mut) else {
            return self;
        };
        if inner.cause.is_some() {
            return self;
        }
        inner.cause = Some(self);
        err
    }

    /// Returns the root error in this chain.
    fn root(&self) -> &Error {
        let mut err = self;
        while let Some(cause) =
            err.inner.as_ref().and_then(|inner| inner.cause.as_ref())
        {
            err = cause;
        }
        err
    }

    /// Returns a chain of error values.
    ///
    /// This starts with the most recent error added to the chain. That is,
    /// the highest level context. The last error in the chain is always the
    /// "root" cause. That is, the error closest to the point where something
    /// has gone wrong.
    ///
    /// The iterator returned is guaranteed to yield at least one error.
    fn chain(&self) -> impl Iterator<Item = &Error> {
        let mut err = self;
        core::iter::once(err).chain(core::iter::from_fn(move || {
            err = err.inner.as_ref().and_then(|inner| inner.cause.as_ref())?;
            Some(err)
        }))
    }

    /// Returns the kind of this error.
    fn kind(&self) -> &ErrorKind {
        self.inner
            .as_ref()
            .map(|inner| &inner.kind)
            .unwrap_or(&ErrorKind::Unknown)
    }
}

impl std::error::Error for Error {}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut it = self.chain().peekable();
        while let Some(err) = it.next() {
            core::fmt::Display::fmt(err.kind(), f)?;
            if it.peek().is_some() {
                f.write_str(": ")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if !f.alternate() {
            core::fmt::Display::fmt(self, f)
        } else {
            let Some(ref inner) = self.inner else {
                return f
                    .debug_struct("Error")
                    .field("kind", &"None")
                    .finish();
            };
            f.debug_struct("Error")
                .field("kind", &inner.kind)
                .field("cause", &inner.cause)
                .finish()
        }
    }
}

/// The underlying kind of a [`Error`].
#[derive(Debug)]
enum ErrorKind {
    Adhoc(AdhocError),
    Civil(self::civil::Error),
    FmtBounds(self::fmt::BoundsError),
    FmtBuild(self::fmt::BuildError),
    FmtConsistency(self::fmt::ConsistencyError),
    FmtFormat(self::fmt::FormatError),
    FmtParse(self::fmt::ParseError),
    History(self::history::Error),
    Range(RangeError),
    Tz(self::tz::Error),
    Unknown,
}

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ErrorKind::*;

        match *self {
            Adhoc(ref msg) => msg.fmt(f),
            Civil(ref err) => err.fmt(f),
            FmtBounds(ref err) => err.fmt(f),
            FmtBuild(ref err) => err.fmt(f),
            FmtConsistency(ref err) => err.fmt(f),
            FmtFormat(ref err) => err.fmt(f),
            FmtParse(ref err) => err.fmt(f),
            History(ref err) => err.fmt(f),
            Range(ref err) => err.fmt(f),
            Tz(ref err) => err.fmt(f),
            Unknown => f.write_str("unknown chronofmt error"),
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Error {
        Error { inner: Some(Arc::new(ErrorInner { kind, cause: None })) }
    }
}

/// A generic error message.
///
/// This supports the `Error::from_args` public API, which permits
/// implementors of this crate's traits to manifest their own `Error` values
/// from an arbitrary message.
struct AdhocError {
    message: Box<str>,
}

impl AdhocError {
    fn from_args<'a>(message: core::fmt::Arguments<'a>) -> AdhocError {
        let message = message.to_string().into_boxed_str();
        AdhocError { message }
    }
}

impl std::error::Error for AdhocError {}

impl core::fmt::Display for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.message, f)
    }
}

impl core::fmt::Debug for AdhocError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Debug::fmt(&self.message, f)
    }
}

/// An error that occurs when an input value is out of bounds.
///
/// The error message produced by this type will include a name describing
/// which input was out of bounds, the value given and its minimum and maximum
/// allowed values.
#[derive(Debug)]
struct RangeError {
    what: &'static str,
    given: i128,
    min: i128,
    max: i128,
}

impl RangeError {
    fn new(
        what: &'static str,
        given: impl Into<i128>,
        min: impl Into<i128>,
        max: impl Into<i128>,
    ) -> RangeError {
        RangeError {
            what,
            given: given.into(),
            min: min.into(),
            max: max.into(),
        }
    }
}

impl std::error::Error for RangeError {}

impl core::fmt::Display for RangeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let RangeError { what, given, min, max } = *self;
        write!(
            f,
            "parameter '{what}' with value {given} \
             is not in the required range of {min}..={max}",
        )
    }
}

/// A simple trait to encapsulate automatic conversion to `Error`.
///
/// This trait basically exists to make `Error::context` work without needing
/// to rely on public `From` impls.
pub(crate) trait IntoError {
    fn into_error(self) -> Error;
}

impl IntoError for Error {
    #[inline(always)]
    fn into_error(self) -> Error {
        self
    }
}

/// A trait for contextualizing error values.
///
/// This makes it easy to contextualize either `Error` or `Result<T, Error>`.
/// Specifically, in the latter case, it absolves one of the need to call
/// `map_err` everywhere one wants to add context to an error.
///
/// This trick was borrowed from `anyhow`.
pub(crate) trait ErrorContext<T, E> {
    /// Contextualize the consequent error returned by the closure with this
    /// (`self`) error as the cause.
    ///
    /// This is equivalent to saying that "consequent is caused by self."
    ///
    /// This is useful if the creation of the consequent error is not otherwise
    /// guarded and when error construction is potentially "costly" (i.e., it
    /// allocates). The closure avoids paying the cost of contextual error
    /// creation in the happy path.
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error>;
}

impl<T, E> ErrorContext<T, E> for Result<T, E>
where
    E: IntoError,
{
    fn with_context<C: IntoError>(
        self,
        consequent: impl FnOnce() -> C,
    ) -> Result<T, Error> {
        self.map_err(|err| {
            err.into_error().context_impl(consequent().into_error())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // We test that our 'Error' type is the size we expect. This isn't an API
    // guarantee, but if the size increases, we really want to make sure we
    // decide to do that intentionally.
    #[test]
    fn error_size() {
        let expected_size = core::mem::size_of::<usize>();
        assert_eq!(expected_size, core::mem::size_of::<Error>());
    }

    #[test]
    fn context_chain_display() {
        let root = Error::range("month", 13, 1, 12);
        let err = root.context(Error::from_args(format_args!("bad date")));
        insta::assert_snapshot!(
            err,
            @"bad date: parameter 'month' with value 13 is not in the required range of 1..=12",
        );
        assert!(err.is_range());
        assert!(!err.is_parse());
    }

    #[test]
    fn with_context_is_lazy() {
        let ok: Result<i32, Error> = Ok(5);
        let got = ok.with_context(|| -> Error { unreachable!() }).unwrap();
        assert_eq!(got, 5);
    }
}
