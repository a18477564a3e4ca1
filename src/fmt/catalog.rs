use crate::{
    fmt::{OutputContext, TextWidth},
    Locale,
};

/// The kind of text a [`TextProvider`] is asked for.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TextKind {
    /// Era names, `0` is BC and `1` is AD.
    Era,
    /// Era names of the "common era" style, such as `BCE` and `CE`.
    EraAlternative,
    /// Latin era names, independent of the locale.
    EraLatin,
    /// Month names, `1` through `12`.
    Month,
    /// Quarter names, `1` through `4`.
    Quarter,
    /// Weekday names, Monday is `1` and Sunday is `7`.
    Weekday,
    /// `0` for AM and `1` for PM.
    AmPm,
}

/// A source of localized texts for enumerated element values.
///
/// An implementation returns every value of the requested kind paired with
/// its text, or `None` when it has no texts for the requested kind at all.
/// Formatters print the text paired with a value and parse by finding the
/// longest text matching the input.
pub trait TextProvider: core::fmt::Debug + Send + Sync {
    /// Returns the texts of all values of `kind`.
    fn texts(
        &self,
        kind: TextKind,
        width: TextWidth,
        context: OutputContext,
        locale: Locale,
    ) -> Option<Vec<(i64, String)>>;
}

/// The default text provider.
///
/// It has texts in English, German and Swedish. Other languages fall back to
/// English.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinTextProvider;

impl TextProvider for BuiltinTextProvider {
    fn texts(
        &self,
        kind: TextKind,
        width: TextWidth,
        context: OutputContext,
        locale: Locale,
    ) -> Option<Vec<(i64, String)>> {
        let lang = Lang::of(locale);
        let texts = match kind {
            TextKind::Era => era(lang, width),
            TextKind::EraAlternative => era_alternative(lang, width),
            TextKind::EraLatin => match width {
                TextWidth::Wide => &["Ante Christum", "Anno Domini"][..],
                _ => &["BC", "AD"][..],
            },
            TextKind::Month => month(lang, width, context),
            TextKind::Quarter => quarter(lang, width),
            TextKind::Weekday => weekday(lang, width, context),
            TextKind::AmPm => match (lang, width) {
                (Lang::Sv, _) => &["fm", "em"][..],
                (_, TextWidth::Narrow) => &["a", "p"][..],
                _ => &["AM", "PM"][..],
            },
        };
        let first = match kind {
            TextKind::Era
            | TextKind::EraAlternative
            | TextKind::EraLatin
            | TextKind::AmPm => 0,
            _ => 1,
        };
        Some(
            texts
                .iter()
                .zip(first..)
                .map(|(text, value)| (value, text.to_string()))
                .collect(),
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Lang {
    En,
    De,
    Sv,
}

impl Lang {
    fn of(locale: Locale) -> Lang {
        match locale.language() {
            "de" => Lang::De,
            "sv" => Lang::Sv,
            _ => Lang::En,
        }
    }
}

fn era(lang: Lang, width: TextWidth) -> &'static [&'static str] {
    match (lang, width) {
        (Lang::En, TextWidth::Wide) => &["Before Christ", "Anno Domini"],
        (Lang::En, TextWidth::Narrow) => &["B", "A"],
        (Lang::En, _) => &["BC", "AD"],
        (Lang::De, TextWidth::Wide) => {
            &["vor Christi Geburt", "nach Christi Geburt"]
        }
        (Lang::De, _) => &["v. Chr.", "n. Chr."],
        (Lang::Sv, TextWidth::Wide) => &["före Kristus", "efter Kristus"],
        (Lang::Sv, _) => &["f.Kr.", "e.Kr."],
    }
}

fn era_alternative(lang: Lang, width: TextWidth) -> &'static [&'static str] {
    match (lang, width) {
        (Lang::En, TextWidth::Wide) => &["Before Common Era", "Common Era"],
        (Lang::En, _) => &["BCE", "CE"],
        (Lang::De, TextWidth::Wide) => {
            &["vor unserer Zeitrechnung", "unserer Zeitrechnung"]
        }
        (Lang::De, _) => &["v. u. Z.", "u. Z."],
        (Lang::Sv, TextWidth::Wide) => {
            &[
                "före västerländsk tideräkning",
                "västerländsk tideräkning",
            ]
        }
        (Lang::Sv, _) => &["f.v.t.", "v.t."],
    }
}

fn month(
    lang: Lang,
    width: TextWidth,
    context: OutputContext,
) -> &'static [&'static str] {
    const NARROW: &[&str] =
        &["J", "F", "M", "A", "M", "J", "J", "A", "S", "O", "N", "D"];
    match (lang, width, context) {
        (_, TextWidth::Narrow, _) => NARROW,
        (Lang::En, TextWidth::Wide, _) => &[
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ],
        (Lang::En, _, _) => &[
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep",
            "Oct", "Nov", "Dec",
        ],
        (Lang::De, TextWidth::Wide, _) => &[
            "Januar",
            "Februar",
            "März",
            "April",
            "Mai",
            "Juni",
            "Juli",
            "August",
            "September",
            "Oktober",
            "November",
            "Dezember",
        ],
        (Lang::De, _, OutputContext::Format) => &[
            "Jan.", "Feb.", "März", "Apr.", "Mai", "Juni", "Juli", "Aug.",
            "Sept.", "Okt.", "Nov.", "Dez.",
        ],
        (Lang::De, _, OutputContext::Standalone) => &[
            "Jan", "Feb", "Mär", "Apr", "Mai", "Jun", "Jul", "Aug", "Sep",
            "Okt", "Nov", "Dez",
        ],
        (Lang::Sv, TextWidth::Wide, _) => &[
            "januari",
            "februari",
            "mars",
            "april",
            "maj",
            "juni",
            "juli",
            "augusti",
            "september",
            "oktober",
            "november",
            "december",
        ],
        (Lang::Sv, _, _) => &[
            "jan.", "feb.", "mars", "apr.", "maj", "juni", "juli", "aug.",
            "sep.", "okt.", "nov.", "dec.",
        ],
    }
}

fn quarter(lang: Lang, width: TextWidth) -> &'static [&'static str] {
    match (lang, width) {
        (_, TextWidth::Narrow) => &["1", "2", "3", "4"],
        (Lang::En, TextWidth::Wide) => {
            &["1st quarter", "2nd quarter", "3rd quarter", "4th quarter"]
        }
        (Lang::De, TextWidth::Wide) => {
            &["1. Quartal", "2. Quartal", "3. Quartal", "4. Quartal"]
        }
        (Lang::Sv, TextWidth::Wide) => &[
            "1:a kvartalet",
            "2:a kvartalet",
            "3:e kvartalet",
            "4:e kvartalet",
        ],
        (Lang::Sv, _) => &["K1", "K2", "K3", "K4"],
        (_, _) => &["Q1", "Q2", "Q3", "Q4"],
    }
}

fn weekday(
    lang: Lang,
    width: TextWidth,
    context: OutputContext,
) -> &'static [&'static str] {
    match (lang, width, context) {
        (Lang::En, TextWidth::Wide, _) => &[
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
        (Lang::En, TextWidth::Abbreviated, _) => {
            &["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]
        }
        (Lang::En, TextWidth::Short, _) => {
            &["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"]
        }
        (Lang::En, TextWidth::Narrow, _) => {
            &["M", "T", "W", "T", "F", "S", "S"]
        }
        (Lang::De, TextWidth::Wide, _) => &[
            "Montag",
            "Dienstag",
            "Mittwoch",
            "Donnerstag",
            "Freitag",
            "Samstag",
            "Sonntag",
        ],
        (Lang::De, TextWidth::Narrow, _) => {
            &["M", "D", "M", "D", "F", "S", "S"]
        }
        (Lang::De, _, OutputContext::Format) => {
            &["Mo.", "Di.", "Mi.", "Do.", "Fr.", "Sa.", "So."]
        }
        (Lang::De, _, OutputContext::Standalone) => {
            &["Mo", "Di", "Mi", "Do", "Fr", "Sa", "So"]
        }
        (Lang::Sv, TextWidth::Wide, _) => &[
            "måndag", "tisdag", "onsdag", "torsdag", "fredag", "lördag",
            "söndag",
        ],
        (Lang::Sv, TextWidth::Narrow, _) => {
            &["M", "T", "O", "T", "F", "L", "S"]
        }
        (Lang::Sv, _, _) => {
            &["mån", "tis", "ons", "tors", "fre", "lör", "sön"]
        }
    }
}

/// The plural category of an ordinal number.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PluralCategory {
    One,
    Two,
    Few,
    Other,
}

/// The rule assigning plural categories to ordinal numbers.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
enum OrdinalRule {
    /// `1st`, `2nd`, `3rd`, `4th`, `11th`, `21st`.
    English,
    /// `1:a`, `2:a`, `3:e`, `11:e`, `21:a`.
    Swedish,
    /// Every number has the same suffix.
    Uniform,
}

/// Suffixes appended to numbers printed as ordinals.
///
/// # Example
///
/// ```
/// use chronofmt::fmt::OrdinalSuffixes;
///
/// let en = OrdinalSuffixes::english();
/// assert_eq!(en.suffix(1), "st");
/// assert_eq!(en.suffix(12), "th");
/// assert_eq!(en.suffix(23), "rd");
/// ```
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct OrdinalSuffixes {
    rule: OrdinalRule,
    one: String,
    two: String,
    few: String,
    other: String,
}

impl OrdinalSuffixes {
    /// Returns the English suffixes `st`, `nd`, `rd` and `th`.
    pub fn english() -> OrdinalSuffixes {
        OrdinalSuffixes::new("st", "nd", "rd", "th")
    }

    /// Creates suffixes for numbers following the English ordinal plural
    /// rule.
    pub fn new(
        one: &str,
        two: &str,
        few: &str,
        other: &str,
    ) -> OrdinalSuffixes {
        OrdinalSuffixes {
            rule: OrdinalRule::English,
            one: one.to_string(),
            two: two.to_string(),
            few: few.to_string(),
            other: other.to_string(),
        }
    }

    /// Creates suffixes that are the same for every number, e.g., `.` as
    /// used in German.
    pub fn uniform(suffix: &str) -> OrdinalSuffixes {
        OrdinalSuffixes {
            rule: OrdinalRule::Uniform,
            one: suffix.to_string(),
            two: suffix.to_string(),
            few: suffix.to_string(),
            other: suffix.to_string(),
        }
    }

    /// Returns the suffixes used in the given locale. Languages other than
    /// English, German and Swedish use the English suffixes.
    pub fn for_locale(locale: Locale) -> OrdinalSuffixes {
        match Lang::of(locale) {
            Lang::En => OrdinalSuffixes::english(),
            Lang::De => OrdinalSuffixes::uniform("."),
            Lang::Sv => OrdinalSuffixes {
                rule: OrdinalRule::Swedish,
                one: ":a".to_string(),
                two: ":a".to_string(),
                few: ":e".to_string(),
                other: ":e".to_string(),
            },
        }
    }

    /// Returns the plural category of `n`.
    pub fn category(&self, n: i64) -> PluralCategory {
        let (m10, m100) = (n.rem_euclid(10), n.rem_euclid(100));
        match self.rule {
            OrdinalRule::Uniform => PluralCategory::Other,
            OrdinalRule::Swedish => {
                if (m10 == 1 || m10 == 2) && m100 != 11 && m100 != 12 {
                    PluralCategory::One
                } else {
                    PluralCategory::Other
                }
            }
            OrdinalRule::English => {
                if m10 == 1 && m100 != 11 {
                    PluralCategory::One
                } else if m10 == 2 && m100 != 12 {
                    PluralCategory::Two
                } else if m10 == 3 && m100 != 13 {
                    PluralCategory::Few
                } else {
                    PluralCategory::Other
                }
            }
        }
    }

    /// Returns the suffix of `n`.
    pub fn suffix(&self, n: i64) -> &str {
        match self.category(n) {
            PluralCategory::One => &self.one,
            PluralCategory::Two => &self.two,
            PluralCategory::Few => &self.few,
            PluralCategory::Other => &self.other,
        }
    }

    /// Returns the distinct suffixes, longest first.
    pub(crate) fn all(&self) -> Vec<&str> {
        let mut all = vec![
            self.one.as_str(),
            self.two.as_str(),
            self.few.as_str(),
            self.other.as_str(),
        ];
        all.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
        all.dedup();
        all
    }
}

impl Default for OrdinalSuffixes {
    fn default() -> OrdinalSuffixes {
        OrdinalSuffixes::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(
        kind: TextKind,
        width: TextWidth,
        context: OutputContext,
        locale: Locale,
        value: i64,
    ) -> String {
        BuiltinTextProvider
            .texts(kind, width, context, locale)
            .unwrap()
            .into_iter()
            .find(|&(v, _)| v == value)
            .unwrap()
            .1
    }

    #[test]
    fn german_month_contexts() {
        let f = OutputContext::Format;
        let s = OutputContext::Standalone;
        let a = TextWidth::Abbreviated;
        let de = Locale::GERMANY;
        assert_eq!(text(TextKind::Month, a, f, de, 3), "März");
        assert_eq!(text(TextKind::Month, a, s, de, 3), "Mär");
        assert_eq!(text(TextKind::Month, a, f, de, 9), "Sept.");
        assert_eq!(
            text(TextKind::Month, TextWidth::Wide, f, de, 10),
            "Oktober",
        );
    }

    #[test]
    fn eras() {
        let f = OutputContext::Format;
        let w = TextWidth::Wide;
        assert_eq!(
            text(TextKind::Era, w, f, Locale::GERMANY, 1),
            "nach Christi Geburt",
        );
        assert_eq!(
            text(TextKind::Era, w, f, Locale::SWEDEN, 1),
            "efter Kristus",
        );
        assert_eq!(
            text(
                TextKind::EraAlternative,
                TextWidth::Abbreviated,
                f,
                Locale::GERMANY,
                1,
            ),
            "u. Z.",
        );
        assert_eq!(
            text(TextKind::EraLatin, w, f, Locale::SWEDEN, 1),
            "Anno Domini",
        );
        // Unknown languages fall back to English.
        assert_eq!(
            text(TextKind::Era, w, f, Locale::JAPAN, 0),
            "Before Christ",
        );
    }

    #[test]
    fn ordinals() {
        let en = OrdinalSuffixes::english();
        let got: Vec<String> =
            [1, 2, 3, 4, 11, 12, 13, 21, 22, 30, 101, 111]
                .iter()
                .map(|&n| format!("{n}{}", en.suffix(n)))
                .collect();
        insta::assert_snapshot!(
            got.join(" "),
            @"1st 2nd 3rd 4th 11th 12th 13th 21st 22nd 30th 101st 111th",
        );

        let sv = OrdinalSuffixes::for_locale(Locale::SWEDEN);
        assert_eq!(sv.suffix(2), ":a");
        assert_eq!(sv.suffix(12), ":e");
        assert_eq!(sv.all(), vec![":a", ":e"]);

        let de = OrdinalSuffixes::for_locale(Locale::GERMANY);
        assert_eq!(de.suffix(30), ".");
        assert_eq!(de.all(), vec!["."]);
    }
}
