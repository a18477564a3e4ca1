use std::sync::Arc;

use crate::{
    error::{fmt::ParseError as PE, Error},
    fmt::{parse::ParseLog, processor::fail, ParsedValues, Snapshot},
};

/// A printer and parser that a formatter delegates a step to.
///
/// Every [`Formatter`](crate::fmt::Formatter) implements this trait, which
/// makes it possible to embed one formatter into another with
/// [`Builder::add_customized`](crate::fmt::Builder::add_customized). The
/// embedded formatter prints from the snapshot of the outer value and its
/// parsed values are merged into those of the outer formatter.
///
/// # Example
///
/// ```
/// use chronofmt::{
///     civil::{date, time, Date, DateTime},
///     fmt::{Formatter, PatternType},
///     Locale,
/// };
///
/// let day = Formatter::<Date>::of_pattern(
///     "yyyy-MM-dd",
///     PatternType::Cldr,
///     Locale::ROOT,
/// )?;
/// let mut builder = Formatter::<DateTime>::builder(Locale::ROOT);
/// builder
///     .add_customized(day)?
///     .add_pattern("' 'HH:mm", PatternType::Cldr)?;
/// let f = builder.build()?;
///
/// let dt = date(2024, 7, 9).to_datetime(time(17, 30, 0, 0));
/// assert_eq!(f.format(&dt)?, "2024-07-09 17:30");
/// assert_eq!(f.parse("2024-07-09 17:30")?, dt);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait Delegate: core::fmt::Debug + Send + Sync {
    /// Prints from the given snapshot.
    fn print(
        &self,
        snapshot: &Snapshot,
        out: &mut String,
    ) -> Result<(), Error>;

    /// Parses `text` starting at byte offset `start`, and returns the values
    /// read along with the offset after the last byte consumed.
    fn parse(
        &self,
        text: &str,
        start: usize,
    ) -> Result<(ParsedValues, usize), Error>;
}

#[derive(Clone, Debug)]
pub(crate) struct Custom {
    pub(crate) delegate: Arc<dyn Delegate>,
}

impl Custom {
    pub(crate) fn print(
        &self,
        snapshot: &Snapshot,
        out: &mut String,
    ) -> Result<(), Error> {
        self.delegate.print(snapshot, out)
    }

    pub(crate) fn parse(
        &self,
        text: &str,
        log: &mut ParseLog,
        values: &mut ParsedValues,
    ) -> Result<(), Error> {
        let start = log.position;
        let (parsed, end) = self
            .delegate
            .parse(text, start)
            .map_err(|err| fail(start, err.context(PE::Delegate)))?;
        values.merge(parsed).map_err(|err| fail(start, err))?;
        log.position = end;
        Ok(())
    }
}
