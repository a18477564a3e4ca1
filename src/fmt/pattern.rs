/*!
Compilation of pattern strings into formatter steps.

A pattern is a sequence of symbol runs and literals. A run of the same
ASCII letter is a symbol, with the number of repetitions selecting a
variant such as the width of a text or the number of digits. Text in single
quotes is literal, with two single quotes standing for one. Square brackets
enclose optional sections, which may be nested. The characters `#`, `{` and
`}` are reserved. Every other character is literal.

Three dialects of pattern symbols are supported, see [`PatternType`]. They
agree on the meaning of most symbols and differ in the details.

When a pattern contains an era symbol (`G`), the calendar elements of the
whole pattern refer to the historic calendar given by the history
attribute: years become years of era, months and days of month become
historic months and days of month. The proleptic year symbol `u` is never
affected.
*/

use crate::{
    error::{fmt::BuildError as BE, Error},
    fmt::{
        processor::TwoDigitYear, Attributes, Builder, Chronology, Element,
        OffsetPrecision, OutputContext, SignPolicy, TextWidth,
    },
    history::ChronoHistory,
};

/// The dialect of a pattern string.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PatternType {
    /// The symbols of the Unicode locale data markup language.
    #[default]
    Cldr,
    /// The symbols of the classic `SimpleDateFormat`. Repeated symbols
    /// generally mean more digits, and there are no narrow or standalone
    /// texts.
    SimpleDateFormat,
    /// The symbols of the `threeten` formatter. This adds `n` and `N` for
    /// nanoseconds and `p` for padding, and parses two digit years into
    /// the range `2000..=2099`.
    ThreeTen,
}

impl PatternType {
    fn name(self) -> &'static str {
        match self {
            PatternType::Cldr => "CLDR",
            PatternType::SimpleDateFormat => "SimpleDateFormat",
            PatternType::ThreeTen => "ThreeTen",
        }
    }
}

impl<T: Chronology> Builder<T> {
    /// Adds the steps described by a pattern string.
    ///
    /// # Errors
    ///
    /// This fails for unknown symbols, symbols repeated too often,
    /// unbalanced brackets or quotes, reserved characters, and whenever
    /// adding one of the resulting steps fails.
    ///
    /// # Example
    ///
    /// ```
    /// use chronofmt::{
    ///     civil::{date, Date},
    ///     fmt::{Formatter, PatternType},
    ///     Locale,
    /// };
    ///
    /// let mut builder = Formatter::<Date>::builder(Locale::US);
    /// builder.add_pattern("EEEE, MMMM d, uuuu", PatternType::Cldr)?;
    /// let f = builder.build()?;
    /// assert_eq!(f.format(&date(2024, 7, 9))?, "Tuesday, July 9, 2024");
    ///
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn add_pattern(
        &mut self,
        pattern: &str,
        kind: PatternType,
    ) -> Result<&mut Self, Error> {
        let start = self.len();
        let mut compiler = Compiler { kind, era: false };
        let mut literal = String::new();
        let mut depth = 0usize;
        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            match ch {
                'a'..='z' | 'A'..='Z' => {
                    self.add_literal(&core::mem::take(&mut literal))?;
                    let mut count = 1;
                    while chars.next_if_eq(&ch).is_some() {
                        count += 1;
                    }
                    compiler.symbol(self, ch, count)?;
                }
                '\'' => {
                    if chars.next_if_eq(&'\'').is_some() {
                        literal.push('\'');
                        continue;
                    }
                    loop {
                        match chars.next() {
                            None => {
                                return Err(Error::from(BE::UnclosedLiteral))
                            }
                            Some('\'') => {
                                if chars.next_if_eq(&'\'').is_none() {
                                    break;
                                }
                                literal.push('\'');
                            }
                            Some(ch) => literal.push(ch),
                        }
                    }
                }
                '[' => {
                    self.add_literal(&core::mem::take(&mut literal))?;
                    self.start_optional_section()?;
                    depth += 1;
                }
                ']' => {
                    if depth == 0 {
                        return Err(Error::from(BE::UnbalancedBracket));
                    }
                    self.add_literal(&core::mem::take(&mut literal))?;
                    self.end_section()?;
                    depth -= 1;
                }
                '#' | '{' | '}' => {
                    return Err(Error::from(BE::ReservedCharacter { ch }));
                }
                _ => literal.push(ch),
            }
        }
        if depth > 0 {
            return Err(Error::from(BE::UnclosedBracket));
        }
        self.add_literal(&literal)?;
        if compiler.era {
            debug!("pattern `{pattern}` has an era, using historic elements");
            self.substitute_historic(start);
        }
        Ok(self)
    }
}

/// The state of a single pattern compilation.
#[derive(Debug)]
struct Compiler {
    kind: PatternType,
    /// Set once an era symbol is seen.
    era: bool,
}

impl Compiler {
    fn symbol<T: Chronology>(
        &mut self,
        b: &mut Builder<T>,
        symbol: char,
        count: usize,
    ) -> Result<(), Error> {
        match self.kind {
            PatternType::Cldr => self.cldr(b, symbol, count, false),
            PatternType::SimpleDateFormat => self.sdf(b, symbol, count),
            PatternType::ThreeTen => self.threeten(b, symbol, count),
        }
    }

    fn cldr<T: Chronology>(
        &mut self,
        b: &mut Builder<T>,
        symbol: char,
        count: usize,
        sdf: bool,
    ) -> Result<(), Error> {
        let many = || Error::from(BE::TooManyLetters { symbol, count });
        match symbol {
            'G' => {
                let width = match count {
                    1..=3 => TextWidth::Abbreviated,
                    4 => TextWidth::Wide,
                    5 if !sdf => TextWidth::Narrow,
                    _ if sdf => TextWidth::Wide,
                    _ => return Err(many()),
                };
                text(b, Element::Era, width, None)?;
                self.era = true;
            }
            'y' => year(b, Element::Year, count)?,
            'Y' => year(b, Element::YearOfWeekdate, count)?,
            'u' => {
                b.add_proleptic_year(count_u8(count), year_sign(count))?;
            }
            'Q' | 'q' => {
                let context =
                    (symbol == 'q').then_some(OutputContext::Standalone);
                let width = match count {
                    1 | 2 => {
                        let width = count_u8(count);
                        b.add_fixed_integer(Element::Quarter, width)?;
                        return Ok(());
                    }
                    3 => TextWidth::Abbreviated,
                    4 => TextWidth::Wide,
                    5 => TextWidth::Narrow,
                    _ => return Err(many()),
                };
                text(b, Element::Quarter, width, context)?;
            }
            'M' | 'L' => {
                let context =
                    (symbol == 'L').then_some(OutputContext::Standalone);
                let width = match count {
                    1 => {
                        b.add_integer(Element::Month, 1, 2)?;
                        return Ok(());
                    }
                    2 => {
                        b.add_fixed_integer(Element::Month, 2)?;
                        return Ok(());
                    }
                    3 => TextWidth::Abbreviated,
                    4 => TextWidth::Wide,
                    _ if sdf => TextWidth::Wide,
                    5 => TextWidth::Narrow,
                    _ => return Err(many()),
                };
                text(b, Element::Month, width, context)?;
            }
            'w' => number(b, Element::WeekOfYear, symbol, count, sdf)?,
            'W' => match count {
                1 => {
                    b.add_fixed_integer(Element::WeekOfMonth, 1)?;
                }
                _ if sdf => {
                    let width = count_u8(count);
                    b.add_fixed_integer(Element::WeekOfMonth, width)?;
                }
                _ => return Err(many()),
            },
            'd' => number(b, Element::DayOfMonth, symbol, count, sdf)?,
            'h' => number(b, Element::ClockHourOfAmPm, symbol, count, sdf)?,
            'H' => number(b, Element::DigitalHourOfDay, symbol, count, sdf)?,
            'K' => number(b, Element::DigitalHourOfAmPm, symbol, count, sdf)?,
            'k' => number(b, Element::ClockHourOfDay, symbol, count, sdf)?,
            'm' => number(b, Element::Minute, symbol, count, sdf)?,
            's' => number(b, Element::Second, symbol, count, sdf)?,
            'D' => match count {
                1 | 2 => {
                    b.add_integer(Element::DayOfYear, count_u8(count), 3)?;
                }
                3 => {
                    b.add_fixed_integer(Element::DayOfYear, 3)?;
                }
                _ if sdf => {
                    b.add_fixed_integer(Element::DayOfYear, count_u8(count))?;
                }
                _ => return Err(many()),
            },
            'F' => match count {
                1 => {
                    b.add_fixed_integer(Element::WeekdayInMonth, 1)?;
                }
                _ if sdf => {
                    let width = count_u8(count);
                    b.add_fixed_integer(Element::WeekdayInMonth, width)?;
                }
                _ => return Err(many()),
            },
            'g' => {
                b.add_number(
                    Element::ModifiedJulianDay,
                    count_u8(count),
                    9,
                    SignPolicy::WhenNegative,
                )?;
            }
            'E' => weekday(b, symbol, count, None, sdf)?,
            'e' => match count {
                1 | 2 => {
                    let width = count_u8(count);
                    b.add_fixed_integer(Element::LocalDayOfWeek, width)?;
                }
                _ => weekday(b, symbol, count, None, sdf)?,
            },
            'c' => match count {
                1 => {
                    b.add_fixed_integer(Element::LocalDayOfWeek, 1)?;
                }
                2 => return Err(many()),
                _ => weekday(
                    b,
                    symbol,
                    count,
                    Some(OutputContext::Standalone),
                    sdf,
                )?,
            },
            'a' => {
                if count > 1 && !sdf {
                    return Err(many());
                }
                b.add_text(Element::AmPm)?;
            }
            'S' => {
                let digits = count_u8(count);
                b.add_fraction(Element::NanoOfSecond, digits, digits, false)?;
            }
            'A' => {
                b.add_integer(Element::MilliOfDay, count_u8(count), 9)?;
            }
            'z' => match count {
                1..=3 => {
                    b.add_zone_name(false)?;
                }
                4 => {
                    b.add_zone_name(true)?;
                }
                _ if sdf => {
                    b.add_zone_name(true)?;
                }
                _ => return Err(many()),
            },
            'Z' => match count {
                1..=3 => {
                    b.add_offset(OffsetPrecision::Long, false, "+0000")?;
                }
                4 => {
                    b.add_localized_offset(true)?;
                }
                5 => {
                    b.add_offset(OffsetPrecision::Long, true, "Z")?;
                }
                _ => return Err(many()),
            },
            'O' => match count {
                1 => {
                    b.add_localized_offset(false)?;
                }
                4 => {
                    b.add_localized_offset(true)?;
                }
                _ => return Err(many()),
            },
            'V' => match count {
                2 => {
                    b.add_zone_id()?;
                }
                _ => return Err(many()),
            },
            'X' | 'x' => {
                let (precision, extended) = match count {
                    1 => (OffsetPrecision::Short, false),
                    2 => (OffsetPrecision::Medium, false),
                    3 => (OffsetPrecision::Medium, true),
                    4 => (OffsetPrecision::Long, false),
                    5 => (OffsetPrecision::Long, true),
                    _ => return Err(many()),
                };
                let zero = match (symbol, count) {
                    ('X', _) => "Z",
                    (_, 1) => "+00",
                    (_, 2 | 4) => "+0000",
                    _ => "+00:00",
                };
                b.add_offset(precision, extended, zero)?;
            }
            _ => return Err(Error::from(BE::UnsupportedSymbol { symbol })),
        }
        Ok(())
    }

    fn sdf<T: Chronology>(
        &mut self,
        b: &mut Builder<T>,
        symbol: char,
        count: usize,
    ) -> Result<(), Error> {
        match symbol {
            'u' => {
                b.add_fixed_integer(Element::DayOfWeek, count_u8(count))?;
            }
            'S' => {
                b.add_fixed_integer(Element::MilliOfSecond, count_u8(count))?;
            }
            'Z' => {
                b.add_offset(OffsetPrecision::Medium, false, "+0000")?;
            }
            'X' if count >= 4 => {
                return Err(Error::from(BE::TooManyLetters { symbol, count }));
            }
            'Q' | 'q' | 'L' | 'g' | 'e' | 'c' | 'O' | 'V' | 'x' => {
                return Err(Error::from(BE::SymbolNotInDialect {
                    symbol,
                    dialect: self.kind.name(),
                }));
            }
            _ => self.cldr(b, symbol, count, true)?,
        }
        Ok(())
    }

    fn threeten<T: Chronology>(
        &mut self,
        b: &mut Builder<T>,
        symbol: char,
        count: usize,
    ) -> Result<(), Error> {
        let many = || Error::from(BE::TooManyLetters { symbol, count });
        match symbol {
            'G' => {
                // Eras of this dialect are those of the ISO calendar.
                let history = ChronoHistory::proleptic_gregorian();
                let iso = Attributes::new().history(history);
                b.set_globals(&iso);
                self.cldr(b, symbol, count, false)?;
            }
            'y' | 'Y' | 'u' if count == 2 => {
                let element = match symbol {
                    'Y' => Element::YearOfWeekdate,
                    _ => Element::Year,
                };
                let mut year = TwoDigitYear::new(element)?;
                year.protected = symbol == 'u';
                b.start_section(Attributes::new().pivot_year(2100))?;
                b.add_two_digit_year_processor(year)?;
                b.end_section()?;
            }
            'W' => match count {
                1 => {
                    b.add_fixed_integer(Element::WeekOfMonth, 1)?;
                }
                _ => return Err(many()),
            },
            'E' if count > 5 => return Err(many()),
            'n' => {
                b.add_integer(Element::NanoOfSecond, count_u8(count), 9)?;
            }
            'N' => {
                b.add_number(
                    Element::NanoOfDay,
                    count_u8(count),
                    18,
                    SignPolicy::Never,
                )?;
            }
            'Z' if count < 4 => {
                b.add_offset(OffsetPrecision::Medium, false, "+0000")?;
            }
            'p' => {
                b.pad_next(count)?;
            }
            _ => self.cldr(b, symbol, count, false)?,
        }
        Ok(())
    }
}

/// Adds the text of `element` with the given width and, optionally, output
/// context.
fn text<T: Chronology>(
    b: &mut Builder<T>,
    element: Element,
    width: TextWidth,
    context: Option<OutputContext>,
) -> Result<(), Error> {
    let mut attrs = Attributes::new().text_width(width);
    if let Some(context) = context {
        attrs = attrs.output_context(context);
    }
    b.start_section(attrs)?.add_text(element)?.end_section()?;
    Ok(())
}

fn weekday<T: Chronology>(
    b: &mut Builder<T>,
    symbol: char,
    count: usize,
    context: Option<OutputContext>,
    sdf: bool,
) -> Result<(), Error> {
    let width = match count {
        1..=3 => TextWidth::Abbreviated,
        4 => TextWidth::Wide,
        _ if sdf => TextWidth::Wide,
        5 => TextWidth::Narrow,
        6 => TextWidth::Short,
        _ => return Err(Error::from(BE::TooManyLetters { symbol, count })),
    };
    text(b, Element::DayOfWeek, width, context)
}

/// Adds a one or two digit number. Longer variants are fixed width in
/// `SimpleDateFormat` patterns and invalid otherwise.
fn number<T: Chronology>(
    b: &mut Builder<T>,
    element: Element,
    symbol: char,
    count: usize,
    sdf: bool,
) -> Result<(), Error> {
    match count {
        1 => b.add_integer(element, 1, 2)?,
        2 => b.add_fixed_integer(element, 2)?,
        _ if sdf => b.add_fixed_integer(element, count_u8(count))?,
        _ => return Err(Error::from(BE::TooManyLetters { symbol, count })),
    };
    Ok(())
}

fn year<T: Chronology>(
    b: &mut Builder<T>,
    element: Element,
    count: usize,
) -> Result<(), Error> {
    if count == 2 {
        b.add_two_digit_year(element)?;
    } else {
        b.add_number(element, count_u8(count), 9, year_sign(count))?;
    }
    Ok(())
}

/// Years with four or more digits carry a sign once they exceed their
/// minimum width.
fn year_sign(count: usize) -> SignPolicy {
    if count < 4 {
        SignPolicy::WhenNegative
    } else {
        SignPolicy::WhenBigNumber
    }
}

/// Saturates symbol counts, which the digit checks of the builder then
/// reject.
fn count_u8(count: usize) -> u8 {
    u8::try_from(count).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use crate::{
        civil::{date, time, Date, DateTime, Time},
        fmt::Formatter,
        Locale,
    };

    use super::*;

    fn compile<T: Chronology>(
        pattern: &str,
        kind: PatternType,
    ) -> Result<Formatter<T>, Error> {
        let mut b = Formatter::<T>::builder(Locale::US);
        b.add_pattern(pattern, kind)?;
        b.build()
    }

    #[test]
    fn literals() {
        let f = compile::<Time>("HH 'o''clock' mm''", PatternType::Cldr)
            .unwrap();
        assert_eq!(f.format(&time(9, 5, 0, 0)).unwrap(), "09 o'clock 05'");

        let f = compile::<Date>("uuuu-MM[-dd]", PatternType::Cldr).unwrap();
        assert_eq!(f.format(&date(2024, 7, 9)).unwrap(), "2024-07-09");
    }

    #[test]
    fn errors() {
        let err = |pattern: &str, kind| {
            compile::<DateTime>(pattern, kind).unwrap_err().to_string()
        };
        insta::assert_snapshot!(
            err("uuuu-MM-dd'T", PatternType::Cldr),
            @"string literal in pattern is not closed",
        );
        insta::assert_snapshot!(
            err("uuuu]", PatternType::Cldr),
            @"pattern closes an optional section with `]` that was never opened",
        );
        insta::assert_snapshot!(
            err("uuuu[MM", PatternType::Cldr),
            @"pattern opens an optional section with `[` that is never closed",
        );
        insta::assert_snapshot!(
            err("uuuu#MM", PatternType::Cldr),
            @"pattern contains reserved character `#`",
        );
        insta::assert_snapshot!(
            err("ddd", PatternType::Cldr),
            @"too many pattern letters for `d`: 3",
        );
        insta::assert_snapshot!(
            err("uuuu-MM-dd b", PatternType::Cldr),
            @"unsupported pattern symbol `b`",
        );
        insta::assert_snapshot!(
            err("LLLL", PatternType::SimpleDateFormat),
            @"pattern symbol `L` is not supported in SimpleDateFormat patterns",
        );
        insta::assert_snapshot!(
            err("EEEEEE", PatternType::ThreeTen),
            @"too many pattern letters for `E`: 6",
        );
    }

    #[test]
    fn dialects() {
        let t = time(17, 45, 30, 123_000_000);
        let f = compile::<Time>("h:mm:ss.SSS a", PatternType::Cldr).unwrap();
        assert_eq!(f.format(&t).unwrap(), "5:45:30.123 PM");

        let sdf = PatternType::SimpleDateFormat;
        let f = compile::<Time>("hh:mm:ss.SSS a", sdf).unwrap();
        assert_eq!(f.format(&t).unwrap(), "05:45:30.123 PM");

        let f = compile::<Time>("HH:mm:ss.n", PatternType::ThreeTen).unwrap();
        assert_eq!(f.format(&t).unwrap(), "17:45:30.123000000");

        let f = compile::<Date>("ppd.M.", PatternType::ThreeTen).unwrap();
        assert_eq!(f.format(&date(2024, 7, 9)).unwrap(), " 9.7.");

        let f = compile::<Date>("dd.MM.yy", PatternType::ThreeTen).unwrap();
        assert_eq!(f.parse("09.07.99").unwrap(), date(2099, 7, 9));
    }

    #[test]
    fn adjacent() {
        let f = compile::<Date>("uuuuMMdd", PatternType::Cldr).unwrap();
        assert_eq!(f.parse("20240709").unwrap(), date(2024, 7, 9));
        assert!(f.parse("2024079").is_err());
    }
}
