use crate::{error::Error, util::escape};

/// A language and optional country, used to select localized texts, week
/// rules, calendar histories and time zone names.
///
/// A `Locale` is a small `Copy` value. Languages are two or three lowercase
/// ASCII letters and countries are two uppercase ASCII letters. The root
/// locale has neither and selects locale neutral behavior.
///
/// # Example
///
/// ```
/// use chronofmt::Locale;
///
/// let locale: Locale = "de-DE".parse()?;
/// assert_eq!(locale, Locale::GERMANY);
/// assert_eq!(locale.language(), "de");
/// assert_eq!(locale.country(), Some("DE"));
/// assert_eq!("sv_SE".parse::<Locale>()?, Locale::SWEDEN);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Locale {
    language: [u8; 3],
    country: [u8; 2],
}

impl Locale {
    /// The root locale, with neither language nor country.
    pub const ROOT: Locale = Locale::constant("", "");
    /// English without a country.
    pub const ENGLISH: Locale = Locale::constant("en", "");
    /// English as used in the United States.
    pub const US: Locale = Locale::constant("en", "US");
    /// English as used in the United Kingdom.
    pub const UK: Locale = Locale::constant("en", "GB");
    /// English as used in Canada.
    pub const CANADA: Locale = Locale::constant("en", "CA");
    /// German without a country.
    pub const GERMAN: Locale = Locale::constant("de", "");
    /// German as used in Germany.
    pub const GERMANY: Locale = Locale::constant("de", "DE");
    /// Swedish without a country.
    pub const SWEDISH: Locale = Locale::constant("sv", "");
    /// Swedish as used in Sweden.
    pub const SWEDEN: Locale = Locale::constant("sv", "SE");
    /// French as used in France.
    pub const FRANCE: Locale = Locale::constant("fr", "FR");
    /// Chinese as used in China.
    pub const CHINA: Locale = Locale::constant("zh", "CN");
    /// Japanese as used in Japan.
    pub const JAPAN: Locale = Locale::constant("ja", "JP");
    /// Russian as used in Russia.
    pub const RUSSIA: Locale = Locale::constant("ru", "RU");

    /// Creates a locale from a language and an optional country.
    ///
    /// The language is lowercased and the country is uppercased.
    ///
    /// # Errors
    ///
    /// This returns an error when the language is not empty and not two or
    /// three ASCII letters, or when the country is not two ASCII letters.
    pub fn new(
        language: &str,
        country: Option<&str>,
    ) -> Result<Locale, Error> {
        let bad = |what: &str, text: &str| {
            Error::from_args(format_args!(
                "invalid locale {what} `{text}`",
                text = escape::Excerpt(text),
            ))
        };
        let mut locale = Locale::ROOT;
        if !language.is_empty() {
            if !(2..=3).contains(&language.len())
                || !language.bytes().all(|b| b.is_ascii_alphabetic())
            {
                return Err(bad("language", language));
            }
            for (i, b) in language.bytes().enumerate() {
                locale.language[i] = b.to_ascii_lowercase();
            }
        }
        if let Some(country) = country {
            if country.len() != 2
                || !country.bytes().all(|b| b.is_ascii_alphabetic())
            {
                return Err(bad("country", country));
            }
            for (i, b) in country.bytes().enumerate() {
                locale.country[i] = b.to_ascii_uppercase();
            }
        }
        Ok(locale)
    }

    const fn constant(language: &str, country: &str) -> Locale {
        let mut locale = Locale { language: [0; 3], country: [0; 2] };
        let (lang, ctry) = (language.as_bytes(), country.as_bytes());
        let mut i = 0;
        while i < lang.len() {
            locale.language[i] = lang[i];
            i += 1;
        }
        i = 0;
        while i < ctry.len() {
            locale.country[i] = ctry[i];
            i += 1;
        }
        locale
    }

    /// Returns the language of this locale, or an empty string for the root
    /// locale.
    pub fn language(&self) -> &str {
        let len = self.language.iter().position(|&b| b == 0).unwrap_or(3);
        core::str::from_utf8(&self.language[..len]).unwrap_or("")
    }

    /// Returns the country of this locale, if any.
    pub fn country(&self) -> Option<&str> {
        if self.country[0] == 0 {
            return None;
        }
        core::str::from_utf8(&self.country).ok()
    }

    /// Returns this locale without its country.
    pub fn language_only(self) -> Locale {
        Locale { country: [0; 2], ..self }
    }

    /// Returns true if this is the root locale.
    pub fn is_root(&self) -> bool {
        *self == Locale::ROOT
    }
}

impl Default for Locale {
    fn default() -> Locale {
        Locale::ROOT
    }
}

impl core::str::FromStr for Locale {
    type Err = Error;

    fn from_str(tag: &str) -> Result<Locale, Error> {
        if tag.is_empty() || tag == "und" || tag == "root" {
            return Ok(Locale::ROOT);
        }
        let mut parts = tag.split(|c| c == '-' || c == '_');
        let language = parts.next().unwrap_or("");
        let country = parts.next();
        if parts.next().is_some() {
            return Err(Error::from_args(format_args!(
                "unsupported locale tag `{tag}`",
                tag = escape::Excerpt(tag),
            )));
        }
        Locale::new(language, country)
    }
}

impl core::fmt::Display for Locale {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        if self.is_root() {
            return f.write_str("und");
        }
        f.write_str(self.language())?;
        if let Some(country) = self.country() {
            write!(f, "-{country}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Locale {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "Locale({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tags() {
        assert_eq!("en-US".parse::<Locale>().unwrap(), Locale::US);
        assert_eq!("EN_us".parse::<Locale>().unwrap(), Locale::US);
        assert_eq!("de".parse::<Locale>().unwrap(), Locale::GERMAN);
        assert_eq!("".parse::<Locale>().unwrap(), Locale::ROOT);
        assert_eq!(Locale::US.to_string(), "en-US");
        assert_eq!(Locale::ROOT.to_string(), "und");
        assert_eq!(Locale::SWEDEN.language_only(), Locale::SWEDISH);
    }

    #[test]
    fn invalid_tags() {
        insta::assert_snapshot!(
            "english-US".parse::<Locale>().unwrap_err(),
            @"invalid locale language `english`",
        );
        insta::assert_snapshot!(
            "en-USA".parse::<Locale>().unwrap_err(),
            @"invalid locale country `USA`",
        );
        insta::assert_snapshot!(
            "en-US-x".parse::<Locale>().unwrap_err(),
            @"unsupported locale tag `en-US-x`",
        );
    }
}
