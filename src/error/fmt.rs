use crate::{
    error,
    fmt::{Element, SignPolicy, Value},
    util::escape,
    Locale,
};

/// An error produced while compiling a pattern or builder directives.
#[derive(Clone, Debug)]
pub(crate) enum BuildError {
    AfterDecimal,
    DecimalOnlyOnce,
    ElementNotSupported { element: Element, chronology: &'static str },
    Empty,
    FixedWidthMismatch { element: Element, min: u8, max: u8 },
    FixedWidthSign { element: Element, sign: SignPolicy },
    FractionAfterVariableWidth { element: Element },
    InvalidDecimal { element: Element, precision: u8, scale: u8 },
    InvalidFraction { element: Element, min: u8, max: u8 },
    InvalidPad { width: usize },
    MaxDigits { element: Element, max: u8, scale: u8 },
    MinDigits { element: Element, min: u8 },
    MinGreaterThanMax { element: Element, min: u8, max: u8 },
    NoOpenSection,
    NotDecimalElement { element: Element },
    NotNumericalElement { element: Element },
    NotTextElement { element: Element },
    ReservedCharacter { ch: char },
    SymbolNotInDialect { symbol: char, dialect: &'static str },
    TooManyLetters { symbol: char, count: usize },
    UnbalancedBracket,
    UnclosedBracket,
    UnclosedLiteral,
    UnclosedSection { open: usize },
    UnsupportedSymbol { symbol: char },
    VariableWidthAfterNumerical { element: Element },
}

impl error::IntoError for BuildError {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<BuildError> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: BuildError) -> error::Error {
        error::ErrorKind::FmtBuild(err).into()
    }
}

impl core::fmt::Display for BuildError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::BuildError::*;

        match *self {
            AfterDecimal => f.write_str(
                "no numerical element may follow an element \
                 with decimal digits",
            ),
            DecimalOnlyOnce => f.write_str(
                "at most one element with decimal digits is \
                 allowed in a formatter",
            ),
            ElementNotSupported { element, chronology } => write!(
                f,
                "element {element} is not supported by `{chronology}`",
            ),
            Empty => f.write_str("formatter has no steps"),
            FixedWidthMismatch { element, min, max } => write!(
                f,
                "fixed width element {element} requires equal minimum \
                 and maximum digits, but got {min} and {max}",
            ),
            FixedWidthSign { element, sign } => write!(
                f,
                "fixed width element {element} cannot use \
                 sign policy {sign:?}",
            ),
            FractionAfterVariableWidth { element } => write!(
                f,
                "fraction element {element} without decimal separator \
                 cannot follow a variable width numerical element",
            ),
            InvalidDecimal { element, precision, scale } => write!(
                f,
                "invalid precision {precision} and scale {scale} \
                 for decimal element {element}",
            ),
            InvalidFraction { element, min, max } => write!(
                f,
                "invalid digit range {min}..={max} \
                 for fraction element {element}",
            ),
            InvalidPad { width } => {
                write!(f, "pad width {width} is not allowed")
            }
            MaxDigits { element, max, scale } => write!(
                f,
                "element {element} cannot have more than {scale} digits, \
                 but {max} were requested",
            ),
            MinDigits { element, min } => write!(
                f,
                "element {element} needs at least one digit, \
                 but {min} were requested",
            ),
            MinGreaterThanMax { element, min, max } => write!(
                f,
                "element {element} has more minimum digits ({min}) \
                 than maximum digits ({max})",
            ),
            NoOpenSection => {
                f.write_str("cannot end a section when none is open")
            }
            NotDecimalElement { element } => {
                write!(f, "element {element} has no decimal representation")
            }
            NotNumericalElement { element } => {
                write!(f, "element {element} is not numerical")
            }
            NotTextElement { element } => {
                write!(f, "element {element} has no text representation")
            }
            ReservedCharacter { ch } => write!(
                f,
                "pattern contains reserved character `{ch}`",
                ch = escape::Char(ch),
            ),
            SymbolNotInDialect { symbol, dialect } => write!(
                f,
                "pattern symbol `{symbol}` is not supported \
                 in {dialect} patterns",
                symbol = escape::Char(symbol),
            ),
            TooManyLetters { symbol, count } => write!(
                f,
                "too many pattern letters for `{symbol}`: {count}",
                symbol = escape::Char(symbol),
            ),
            UnbalancedBracket => f.write_str(
                "pattern closes an optional section with `]` \
                 that was never opened",
            ),
            UnclosedBracket => f.write_str(
                "pattern opens an optional section with `[` \
                 that is never closed",
            ),
            UnclosedLiteral => {
                f.write_str("string literal in pattern is not closed")
            }
            UnclosedSection { open } => write!(
                f,
                "formatter cannot be built with {open} section(s) \
                 still open",
            ),
            UnsupportedSymbol { symbol } => write!(
                f,
                "unsupported pattern symbol `{symbol}`",
                symbol = escape::Char(symbol),
            ),
            VariableWidthAfterNumerical { element } => write!(
                f,
                "variable width numerical element {element} cannot \
                 follow another numerical element",
            ),
        }
    }
}

/// An error produced when a step cannot represent its source value.
#[derive(Clone, Debug)]
pub(crate) enum FormatError {
    ElementAbsent { element: Element },
    MaxWidthExceeded { element: Element, value: i64, max: u8 },
    NegativeNotAllowed { element: Element, value: i64 },
    NoText { element: Element, value: i64 },
    PadWidthExceeded { width: usize, len: usize },
    TimeZoneRequired,
    UnexpectedValue { element: Element },
    ValueRange { element: Element, value: i64 },
}

impl error::IntoError for FormatError {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<FormatError> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: FormatError) -> error::Error {
        error::ErrorKind::FmtFormat(err).into()
    }
}

impl core::fmt::Display for FormatError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::FormatError::*;

        match *self {
            ElementAbsent { element } => write!(
                f,
                "element {element} cannot be printed because \
                 the value has no such element",
            ),
            MaxWidthExceeded { element, value, max } => write!(
                f,
                "element {element} cannot be printed as the value \
                 {value} exceeds the maximum width of {max}",
            ),
            NegativeNotAllowed { element, value } => write!(
                f,
                "element {element} cannot be printed as the value \
                 {value} is negative and no sign is allowed",
            ),
            NoText { element, value } => write!(
                f,
                "no text found for element {element} with value {value}",
            ),
            PadWidthExceeded { width, len } => write!(
                f,
                "printed text has {len} characters \
                 which exceeds the pad width of {width}",
            ),
            TimeZoneRequired => f.write_str(
                "a time zone attribute is required to print a timestamp",
            ),
            UnexpectedValue { element } => write!(
                f,
                "element {element} has a value of an unexpected kind",
            ),
            ValueRange { element, value } => write!(
                f,
                "value {value} of element {element} is out of range",
            ),
        }
    }
}

/// An error produced when input text does not match a formatter, or when
/// the values parsed from it cannot be turned into a typed value.
#[derive(Clone, Debug)]
pub(crate) enum ParseError {
    Ambivalent { element: Element, old: Value, new: Value },
    Construction { chronology: &'static str, parsed: Box<str> },
    DecimalSeparatorExpected { element: Element },
    Delegate,
    DigitExpected { element: Element },
    EnumValue { element: Element, value: i64 },
    InsufficientData { chronology: &'static str, parsed: Box<str> },
    LiteralEndOfInput { expected: char },
    LiteralMismatch { expected: char, got: char },
    MissingDigits { element: Element },
    NegativeZero { element: Element },
    NotEnoughDigits { element: Element, min: usize, got: usize },
    OffsetExpected,
    OffsetInvalid,
    OrdinalSuffixExpected { element: Element },
    PadMismatch { width: usize, got: usize },
    PositionAt { index: usize },
    PositiveSignExpected { element: Element },
    PositiveSignNotAllowed { element: Element },
    SignExpected { element: Element },
    SignNotAllowed { element: Element },
    TextNotFound { element: Element },
    TrailingCharacters { remaining: Box<str> },
    TwoDigitYearExpected { element: Element },
    ZoneIdExpected,
    ZoneIdUnknown { id: Box<str> },
    ZoneNameExpected,
    ZoneNameNotPreferred { name: Box<str>, locale: Locale },
    ZoneNameNotUnique { name: Box<str> },
    ZoneNameUnknown { name: Box<str> },
}

impl ParseError {
    pub(crate) fn at(index: usize) -> ParseError {
        ParseError::PositionAt { index }
    }

    pub(crate) fn trailing(remaining: &str) -> ParseError {
        let remaining = escape::Excerpt(remaining).to_string().into();
        ParseError::TrailingCharacters { remaining }
    }

    pub(crate) fn position(&self) -> Option<usize> {
        match *self {
            ParseError::PositionAt { index } => Some(index),
            _ => None,
        }
    }
}

impl error::IntoError for ParseError {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<ParseError> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: ParseError) -> error::Error {
        error::ErrorKind::FmtParse(err).into()
    }
}

impl core::fmt::Display for ParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ParseError::*;

        match *self {
            Ambivalent { element, ref old, ref new } => write!(
                f,
                "ambivalent value for element {element}: \
                 parsed {new} but already found {old}",
            ),
            Construction { chronology, ref parsed } => write!(
                f,
                "cannot create `{chronology}` from parsed values {parsed}",
            ),
            DecimalSeparatorExpected { element } => write!(
                f,
                "expected decimal separator for element {element}",
            ),
            Delegate => f.write_str("customized sub-formatter failed"),
            DigitExpected { element } => {
                write!(f, "expected digit for element {element}")
            }
            EnumValue { element, value } => {
                write!(f, "element {element} has no value {value}")
            }
            InsufficientData { chronology, ref parsed } => write!(
                f,
                "insufficient data to create `{chronology}` \
                 from parsed values {parsed}",
            ),
            LiteralEndOfInput { expected } => write!(
                f,
                "expected literal `{expected}`, but found end of input",
                expected = escape::Char(expected),
            ),
            LiteralMismatch { expected, got } => write!(
                f,
                "expected literal `{expected}`, but found `{got}`",
                expected = escape::Char(expected),
                got = escape::Char(got),
            ),
            MissingDigits { element } => write!(
                f,
                "expected digits for element {element}, \
                 but found end of input",
            ),
            NegativeZero { element } => write!(
                f,
                "negative zero is not allowed for element {element}",
            ),
            NotEnoughDigits { element, min, got } => write!(
                f,
                "expected at least {min} digit(s) for element {element}, \
                 but found {got}",
            ),
            OffsetExpected => f.write_str("expected time zone offset"),
            OffsetInvalid => f.write_str("invalid time zone offset"),
            OrdinalSuffixExpected { element } => write!(
                f,
                "expected ordinal suffix for element {element}",
            ),
            PadMismatch { width, got } => write!(
                f,
                "expected padded width of {width}, but found {got}",
            ),
            PositionAt { index } => {
                write!(f, "failed to parse at position {index}")
            }
            PositiveSignExpected { element } => write!(
                f,
                "expected positive sign for element {element}",
            ),
            PositiveSignNotAllowed { element } => write!(
                f,
                "positive sign is not allowed for element {element}",
            ),
            SignExpected { element } => {
                write!(f, "expected sign for element {element}")
            }
            SignNotAllowed { element } => {
                write!(f, "sign is not allowed for element {element}")
            }
            TextNotFound { element } => {
                write!(f, "no suitable text found for element {element}")
            }
            TrailingCharacters { ref remaining } => {
                write!(f, "unparsed trailing characters: `{remaining}`")
            }
            TwoDigitYearExpected { element } => write!(
                f,
                "expected exactly two digits for element {element}",
            ),
            ZoneIdExpected => f.write_str("expected time zone identifier"),
            ZoneIdUnknown { ref id } => {
                write!(f, "unknown time zone identifier `{id}`")
            }
            ZoneNameExpected => f.write_str("expected time zone name"),
            ZoneNameNotPreferred { ref name, locale } => write!(
                f,
                "time zone name `{name}` matches no preferred zone \
                 of locale {locale}",
            ),
            ZoneNameNotUnique { ref name } => {
                write!(f, "time zone name `{name}` is not unique")
            }
            ZoneNameUnknown { ref name } => {
                write!(f, "unknown time zone name `{name}`")
            }
        }
    }
}

/// An error produced by the strict consistency check.
#[derive(Clone, Debug)]
pub(crate) enum ConsistencyError {
    Daylight { daylight: bool, text: Box<str> },
    Element { element: Element, raw: Value, result: Value, text: Box<str> },
}

impl error::IntoError for ConsistencyError {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<ConsistencyError> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: ConsistencyError) -> error::Error {
        error::ErrorKind::FmtConsistency(err).into()
    }
}

impl core::fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        use self::ConsistencyError::*;

        match *self {
            Daylight { daylight, ref text } => write!(
                f,
                "conflict found: parsed value is {not}daylight saving, \
                 but time zone name has not the appropriate form \
                 in `{text}`",
                not = if daylight { "" } else { "not " },
            ),
            Element { element, ref raw, ref result, ref text } => write!(
                f,
                "conflict found: text `{text}` with element {element} \
                 {raw}, but parsed value has element value {result}",
            ),
        }
    }
}

/// An error produced when a parse starts at or beyond the end of input.
#[derive(Clone, Debug)]
pub(crate) struct BoundsError {
    pub(crate) start: usize,
    pub(crate) len: usize,
}

impl error::IntoError for BoundsError {
    fn into_error(self) -> error::Error {
        self.into()
    }
}

impl From<BoundsError> for error::Error {
    #[cold]
    #[inline(never)]
    fn from(err: BoundsError) -> error::Error {
        error::ErrorKind::FmtBounds(err).into()
    }
}

impl core::fmt::Display for BoundsError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let BoundsError { start, len } = *self;
        if start < len {
            return write!(
                f,
                "parse position {start} is inside a multi-byte character",
            );
        }
        write!(
            f,
            "parse position {start} is out of bounds \
             for input of length {len}",
        )
    }
}
