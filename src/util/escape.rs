/*!
Provides convenience routines for quoting input text in error messages.

Parse errors frequently need to show a piece of the input that could not be
handled. Since input can be arbitrarily long, the helpers here truncate what
they show.
*/

/// The maximum number of characters shown by [`Excerpt`] before it
/// truncates its output with `...`.
const EXCERPT_LIMIT: usize = 10;

/// Provides a convenient `Display` implementation for a `char`.
///
/// Control characters and whitespace other than a plain space are escaped.
#[derive(Clone, Copy)]
pub(crate) struct Char(pub(crate) char);

impl core::fmt::Display for Char {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.0 == ' ' {
            return f.write_str(" ");
        }
        write!(f, "{}", self.0.escape_debug())
    }
}

impl core::fmt::Debug for Char {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "`")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "`")
    }
}

/// Shows at most ten characters of the given text, followed by `...` if the
/// text was cut short.
///
/// Control characters are escaped.
pub(crate) struct Excerpt<'a>(pub(crate) &'a str);

impl<'a> core::fmt::Display for Excerpt<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let mut chars = self.0.chars();
        for ch in chars.by_ref().take(EXCERPT_LIMIT) {
            match ch {
                '\0' => f.write_str("\\0")?,
                '\x01'..='\x08'
                | '\x0b'
                | '\x0c'
                | '\x0e'..='\x19'
                | '\x7f' => {
                    write!(f, "\\x{:02x}", u32::from(ch))?;
                }
                _ => write!(f, "{}", ch.escape_debug())?,
            }
        }
        if chars.next().is_some() {
            f.write_str("...")?;
        }
        Ok(())
    }
}

impl<'a> core::fmt::Debug for Excerpt<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "\"")?;
        core::fmt::Display::fmt(self, f)?;
        write!(f, "\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates() {
        insta::assert_snapshot!(Excerpt("abc"), @"abc");
        insta::assert_snapshot!(Excerpt("0123456789"), @"0123456789");
        insta::assert_snapshot!(Excerpt("0123456789x"), @"0123456789...");
        insta::assert_snapshot!(Excerpt("a\tb"), @r"a\tb");
    }

    #[test]
    fn char_escapes() {
        insta::assert_snapshot!(Char('a'), @"a");
        insta::assert_snapshot!(Char(' '), @" ");
        insta::assert_snapshot!(format!("{:?}", Char('\n')), @r"`\n`");
    }
}
