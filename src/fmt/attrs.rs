use std::sync::Arc;

use crate::{
    fmt::catalog::{BuiltinTextProvider, TextProvider},
    history::ChronoHistory,
    tz::{BuiltinProvider, Disambiguation, TimeZone, TimeZoneProvider},
    Locale, WeekModel,
};

/// How much deviation from a formatter's expectations a parser tolerates.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Leniency {
    /// Input must match exactly, and parsed values must be consistent with
    /// the value constructed from them.
    Strict,
    /// Small deviations such as case differences are tolerated.
    #[default]
    Smart,
    /// Numbers may have any number of digits and texts may be abbreviated.
    Lax,
}

impl Leniency {
    pub fn is_strict(self) -> bool {
        self == Leniency::Strict
    }

    pub fn is_smart(self) -> bool {
        self == Leniency::Smart
    }

    pub fn is_lax(self) -> bool {
        self == Leniency::Lax
    }
}

/// The width of texts such as month or weekday names.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TextWidth {
    /// Usually one letter, e.g., `M` for Monday.
    Narrow,
    /// Usually two letters, e.g., `Mo` for Monday.
    Short,
    /// Usually three letters, e.g., `Mon` for Monday.
    Abbreviated,
    /// The full name, e.g., `Monday`.
    #[default]
    Wide,
}

/// Whether a text stands within a formatted sentence or on its own.
///
/// Some languages inflect month or weekday names differently in these
/// contexts.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum OutputContext {
    #[default]
    Format,
    Standalone,
}

impl OutputContext {
    pub(crate) fn other(self) -> OutputContext {
        match self {
            OutputContext::Format => OutputContext::Standalone,
            OutputContext::Standalone => OutputContext::Format,
        }
    }
}

/// When a number is printed with a sign.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SignPolicy {
    /// Never print a sign. Negative numbers cannot be printed.
    Never,
    /// Print `-` for negative numbers only.
    #[default]
    WhenNegative,
    /// Print `-` for negative numbers and `+` for positive numbers with more
    /// than the minimum number of digits.
    WhenBigNumber,
    /// Always print `+` or `-`.
    Always,
}

/// The style of era names.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum EraStyle {
    /// The names of the locale, e.g., `AD`.
    #[default]
    Standard,
    /// The "common era" names of the locale, e.g., `CE`.
    Alternative,
    /// Latin names, e.g., `Anno Domini`.
    Latin,
}

/// A set of formatting attributes.
///
/// Each attribute is optional. Attributes are layered: a formatter has
/// global attributes, a builder section may overlay its own, and each call
/// to print or parse may pass more. An attribute is looked up in the
/// section first, then in the call, then in the formatter, and falls back to
/// a default that may depend on other attributes (see [`AttributeQuery`]).
///
/// # Example
///
/// ```
/// use chronofmt::{
///     civil::Date,
///     fmt::{Attributes, Formatter, Leniency, PatternType},
///     Locale,
/// };
///
/// let f = Formatter::<Date>::of_pattern(
///     "d. MMMM yyyy",
///     PatternType::Cldr,
///     Locale::GERMANY,
/// )?;
/// let attrs = Attributes::new().leniency(Leniency::Lax);
/// let (date, end) = f.parse_at("9. okt 2024", 0, &attrs)?;
/// assert_eq!(date, Date::constant(2024, 10, 9));
/// assert_eq!(end, 11);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Attributes {
    locale: Option<Locale>,
    leniency: Option<Leniency>,
    text_width: Option<TextWidth>,
    output_context: Option<OutputContext>,
    pad_char: Option<char>,
    zero_digit: Option<char>,
    decimal_separator: Option<char>,
    protected_characters: Option<usize>,
    pivot_year: Option<i16>,
    trailing_characters: Option<bool>,
    case_insensitive: Option<bool>,
    partial_compare: Option<bool>,
    multiple_contexts: Option<bool>,
    time_zone: Option<TimeZone>,
    disambiguation: Option<Disambiguation>,
    history: Option<ChronoHistory>,
    week_model: Option<WeekModel>,
    era_style: Option<EraStyle>,
    text_provider: Option<Arc<dyn TextProvider>>,
    zone_provider: Option<Arc<dyn TimeZoneProvider>>,
}

impl Attributes {
    /// Creates an empty set of attributes.
    pub fn new() -> Attributes {
        Attributes::default()
    }

    /// Sets the locale used for texts, week rules and the default history.
    pub fn locale(self, locale: Locale) -> Attributes {
        Attributes { locale: Some(locale), ..self }
    }

    pub fn leniency(self, leniency: Leniency) -> Attributes {
        Attributes { leniency: Some(leniency), ..self }
    }

    pub fn text_width(self, width: TextWidth) -> Attributes {
        Attributes { text_width: Some(width), ..self }
    }

    pub fn output_context(self, context: OutputContext) -> Attributes {
        Attributes { output_context: Some(context), ..self }
    }

    /// Sets the character used to pad steps to their pad width.
    pub fn pad_char(self, ch: char) -> Attributes {
        Attributes { pad_char: Some(ch), ..self }
    }

    /// Sets the character representing the digit zero. The other digits
    /// follow it in Unicode order.
    pub fn zero_digit(self, ch: char) -> Attributes {
        Attributes { zero_digit: Some(ch), ..self }
    }

    pub fn decimal_separator(self, ch: char) -> Attributes {
        Attributes { decimal_separator: Some(ch), ..self }
    }

    /// Sets the number of characters at the end of the input that numbers
    /// must not consume.
    pub fn protected_characters(self, count: usize) -> Attributes {
        Attributes { protected_characters: Some(count), ..self }
    }

    /// Sets the pivot year of two digit years. A two digit year is mapped
    /// to the century before the pivot year unless that is at or after the
    /// pivot year.
    pub fn pivot_year(self, year: i16) -> Attributes {
        Attributes { pivot_year: Some(year), ..self }
    }

    /// Sets whether input may have characters after the parsed text.
    pub fn trailing_characters(self, yes: bool) -> Attributes {
        Attributes { trailing_characters: Some(yes), ..self }
    }

    pub fn case_insensitive(self, yes: bool) -> Attributes {
        Attributes { case_insensitive: Some(yes), ..self }
    }

    /// Sets whether a text may be matched by a prefix of itself.
    pub fn partial_compare(self, yes: bool) -> Attributes {
        Attributes { partial_compare: Some(yes), ..self }
    }

    /// Sets whether a text not found in its output context is searched in
    /// the other one.
    pub fn multiple_contexts(self, yes: bool) -> Attributes {
        Attributes { multiple_contexts: Some(yes), ..self }
    }

    /// Sets the time zone used to print timestamps and to resolve parsed
    /// values without a zone.
    pub fn time_zone(self, tz: TimeZone) -> Attributes {
        Attributes { time_zone: Some(tz), ..self }
    }

    pub fn disambiguation(self, disambiguation: Disambiguation) -> Attributes {
        Attributes { disambiguation: Some(disambiguation), ..self }
    }

    /// Sets the calendar history used by historic elements.
    pub fn history(self, history: ChronoHistory) -> Attributes {
        Attributes { history: Some(history), ..self }
    }

    pub fn week_model(self, model: WeekModel) -> Attributes {
        Attributes { week_model: Some(model), ..self }
    }

    pub fn era_style(self, style: EraStyle) -> Attributes {
        Attributes { era_style: Some(style), ..self }
    }

    pub fn text_provider(self, provider: Arc<dyn TextProvider>) -> Attributes {
        Attributes { text_provider: Some(provider), ..self }
    }

    pub fn zone_provider(
        self,
        provider: Arc<dyn TimeZoneProvider>,
    ) -> Attributes {
        Attributes { zone_provider: Some(provider), ..self }
    }

    /// Returns the locale, if set.
    pub fn get_locale(&self) -> Option<Locale> {
        self.locale
    }

    /// Returns the leniency, if set.
    pub fn get_leniency(&self) -> Option<Leniency> {
        self.leniency
    }

    /// Returns the time zone, if set.
    pub fn get_time_zone(&self) -> Option<&TimeZone> {
        self.time_zone.as_ref()
    }

    /// Returns the calendar history, if set.
    pub fn get_history(&self) -> Option<&ChronoHistory> {
        self.history.as_ref()
    }

    /// Returns a copy of these attributes where every attribute set in
    /// `over` replaces the one in `self`.
    pub fn merge(&self, over: &Attributes) -> Attributes {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }
        Attributes {
            locale: pick(&self.locale, &over.locale),
            leniency: pick(&self.leniency, &over.leniency),
            text_width: pick(&self.text_width, &over.text_width),
            output_context: pick(&self.output_context, &over.output_context),
            pad_char: pick(&self.pad_char, &over.pad_char),
            zero_digit: pick(&self.zero_digit, &over.zero_digit),
            decimal_separator: pick(
                &self.decimal_separator,
                &over.decimal_separator,
            ),
            protected_characters: pick(
                &self.protected_characters,
                &over.protected_characters,
            ),
            pivot_year: pick(&self.pivot_year, &over.pivot_year),
            trailing_characters: pick(
                &self.trailing_characters,
                &over.trailing_characters,
            ),
            case_insensitive: pick(
                &self.case_insensitive,
                &over.case_insensitive,
            ),
            partial_compare: pick(
                &self.partial_compare,
                &over.partial_compare,
            ),
            multiple_contexts: pick(
                &self.multiple_contexts,
                &over.multiple_contexts,
            ),
            time_zone: pick(&self.time_zone, &over.time_zone),
            disambiguation: pick(&self.disambiguation, &over.disambiguation),
            history: pick(&self.history, &over.history),
            week_model: pick(&self.week_model, &over.week_model),
            era_style: pick(&self.era_style, &over.era_style),
            text_provider: pick(&self.text_provider, &over.text_provider),
            zone_provider: pick(&self.zone_provider, &over.zone_provider),
        }
    }
}

/// Resolves attributes through their layers.
///
/// The layers are searched in this order: the attributes of the current
/// builder section, the attributes passed to the current call and the
/// global attributes of the formatter. An attribute set in none of them has
/// a default, which is documented on each method.
#[derive(Clone, Copy, Debug)]
pub struct AttributeQuery<'a> {
    sectional: Option<&'a Attributes>,
    call: Option<&'a Attributes>,
    global: Option<&'a Attributes>,
}

impl<'a> AttributeQuery<'a> {
    /// Creates a query over call-site and global attributes.
    pub fn new(
        call: &'a Attributes,
        global: &'a Attributes,
    ) -> AttributeQuery<'a> {
        AttributeQuery {
            sectional: None,
            call: Some(call),
            global: Some(global),
        }
    }

    /// Creates a query over a single set of attributes.
    pub fn of(attrs: &'a Attributes) -> AttributeQuery<'a> {
        AttributeQuery { sectional: None, call: None, global: Some(attrs) }
    }

    /// Returns this query with the given sectional attributes on top.
    pub(crate) fn with_section(
        self,
        sectional: Option<&'a Attributes>,
    ) -> AttributeQuery<'a> {
        AttributeQuery { sectional, ..self }
    }

    fn pick<T>(&self, get: impl Fn(&'a Attributes) -> Option<T>) -> Option<T> {
        [self.sectional, self.call, self.global]
            .into_iter()
            .flatten()
            .find_map(get)
    }

    /// The locale. Defaults to [`Locale::ROOT`].
    pub fn locale(&self) -> Locale {
        self.pick(|a| a.locale).unwrap_or(Locale::ROOT)
    }

    /// The leniency. Defaults to [`Leniency::Smart`].
    pub fn leniency(&self) -> Leniency {
        self.pick(|a| a.leniency).unwrap_or_default()
    }

    /// The text width. Defaults to [`TextWidth::Wide`].
    pub fn text_width(&self) -> TextWidth {
        self.pick(|a| a.text_width).unwrap_or_default()
    }

    /// The output context. Defaults to [`OutputContext::Format`].
    pub fn output_context(&self) -> OutputContext {
        self.pick(|a| a.output_context).unwrap_or_default()
    }

    /// The pad character. Defaults to a space.
    pub fn pad_char(&self) -> char {
        self.pick(|a| a.pad_char).unwrap_or(' ')
    }

    /// The zero digit. Defaults to `0`.
    pub fn zero_digit(&self) -> char {
        self.pick(|a| a.zero_digit).unwrap_or('0')
    }

    /// The decimal separator. Defaults to `,` in languages writing decimal
    /// commas, and to `.` otherwise.
    pub fn decimal_separator(&self) -> char {
        self.pick(|a| a.decimal_separator).unwrap_or_else(|| {
            match self.locale().language() {
                "de" | "sv" | "fr" | "ru" => ',',
                _ => '.',
            }
        })
    }

    /// The number of protected characters. Defaults to zero.
    pub fn protected_characters(&self) -> usize {
        self.pick(|a| a.protected_characters).unwrap_or(0)
    }

    /// The pivot year of two digit years. Defaults to twenty years after the
    /// current year, or to 2100 without the `std` feature.
    pub fn pivot_year(&self) -> i16 {
        self.pick(|a| a.pivot_year).unwrap_or_else(default_pivot_year)
    }

    /// Whether trailing characters are allowed. Defaults to `false`.
    pub fn trailing_characters(&self) -> bool {
        self.pick(|a| a.trailing_characters).unwrap_or(false)
    }

    /// Whether texts are compared without regard to case. Defaults to
    /// `true` unless the leniency is strict.
    pub fn case_insensitive(&self) -> bool {
        self.pick(|a| a.case_insensitive)
            .unwrap_or_else(|| !self.leniency().is_strict())
    }

    /// Whether texts may be matched by a prefix. Defaults to `true` only
    /// under lax leniency.
    pub fn partial_compare(&self) -> bool {
        self.pick(|a| a.partial_compare)
            .unwrap_or_else(|| self.leniency().is_lax())
    }

    /// Whether the other output context is searched as well. Defaults to
    /// `true` unless the leniency is strict.
    pub fn multiple_contexts(&self) -> bool {
        self.pick(|a| a.multiple_contexts)
            .unwrap_or_else(|| !self.leniency().is_strict())
    }

    /// The time zone, if any.
    pub fn time_zone(&self) -> Option<&'a TimeZone> {
        self.pick(|a| a.time_zone.as_ref())
    }

    /// How local datetimes in gaps and folds are resolved. Defaults to
    /// [`Disambiguation::Compatible`].
    pub fn disambiguation(&self) -> Disambiguation {
        self.pick(|a| a.disambiguation).unwrap_or_default()
    }

    /// The calendar history. Defaults to the history of the locale.
    pub fn history(&self) -> ChronoHistory {
        self.pick(|a| a.history.clone())
            .unwrap_or_else(|| ChronoHistory::for_locale(self.locale()))
    }

    /// The week model. Defaults to the week model of the locale.
    pub fn week_model(&self) -> WeekModel {
        self.pick(|a| a.week_model)
            .unwrap_or_else(|| WeekModel::of(self.locale()))
    }

    /// The era style. Defaults to [`EraStyle::Standard`].
    pub fn era_style(&self) -> EraStyle {
        self.pick(|a| a.era_style).unwrap_or_default()
    }

    /// The text provider. Defaults to [`BuiltinTextProvider`].
    pub fn text_provider(&self) -> &'a dyn TextProvider {
        self.pick(|a| a.text_provider.as_deref())
            .unwrap_or(&BuiltinTextProvider)
    }

    /// The time zone provider. Defaults to [`BuiltinProvider`].
    pub fn zone_provider(&self) -> &'a dyn TimeZoneProvider {
        self.pick(|a| a.zone_provider.as_deref())
            .unwrap_or(&BuiltinProvider)
    }
}

#[cfg(feature = "std")]
fn default_pivot_year() -> i16 {
    let now = crate::Timestamp::now().to_datetime(crate::tz::Offset::UTC);
    now.date().year().saturating_add(20)
}

#[cfg(not(feature = "std"))]
fn default_pivot_year() -> i16 {
    2100
}

#[cfg(test)]
mod tests {
    use crate::history::ChronoHistory;

    use super::*;

    #[test]
    fn priority() {
        let global = Attributes::new()
            .locale(Locale::GERMANY)
            .leniency(Leniency::Strict)
            .pad_char('*');
        let call = Attributes::new().leniency(Leniency::Lax).pad_char('_');
        let section = Attributes::new().pad_char('#');

        let q = AttributeQuery::new(&call, &global);
        assert_eq!(q.locale(), Locale::GERMANY);
        assert_eq!(q.leniency(), Leniency::Lax);
        assert_eq!(q.pad_char(), '_');
        assert_eq!(q.with_section(Some(&section)).pad_char(), '#');
        assert_eq!(q.with_section(Some(&section)).leniency(), Leniency::Lax);
    }

    #[test]
    fn derived_defaults() {
        let strict = Attributes::new().leniency(Leniency::Strict);
        let q = AttributeQuery::of(&strict);
        assert!(!q.case_insensitive());
        assert!(!q.partial_compare());
        assert!(!q.multiple_contexts());

        let lax = Attributes::new().leniency(Leniency::Lax);
        let q = AttributeQuery::of(&lax);
        assert!(q.case_insensitive());
        assert!(q.partial_compare());

        let sweden = Attributes::new().locale(Locale::SWEDEN);
        let q = AttributeQuery::of(&sweden);
        assert_eq!(q.history(), ChronoHistory::of_sweden());
        assert_eq!(q.decimal_separator(), ',');
        assert_eq!(q.zero_digit(), '0');
        assert!(q.pivot_year() > 2000);
    }

    #[test]
    fn merge() {
        let base = Attributes::new().locale(Locale::US).pad_char('*');
        let over = Attributes::new().pad_char('-');
        let merged = base.merge(&over);
        let q = AttributeQuery::of(&merged);
        assert_eq!(q.locale(), Locale::US);
        assert_eq!(q.pad_char(), '-');
    }
}
