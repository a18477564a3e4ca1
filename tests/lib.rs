mod historic;
mod parse;
mod print;

/// A type alias we use for tests.
///
/// Most integration tests construct formatters before asserting anything,
/// and the `?` operator keeps that readable.
type Result = std::result::Result<(), chronofmt::Error>;
