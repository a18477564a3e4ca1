use crate::{
    civil::Weekday,
    error::{tz::Error as E, Error},
    tz::Offset,
    util::itime::{self, IDate, IEpochDay, SECONDS_PER_DAY},
    Locale, Timestamp,
};

/// The style of a time zone display name.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum NameStyle {
    /// An abbreviation for standard time, e.g., `EST`.
    ShortStandard,
    /// An abbreviation for daylight saving time, e.g., `EDT`.
    ShortDaylight,
    /// A full name for standard time, e.g., `Eastern Standard Time`.
    LongStandard,
    /// A full name for daylight saving time, e.g., `Eastern Daylight Time`.
    LongDaylight,
}

impl NameStyle {
    /// Returns the style with the given length and daylight flavor.
    pub fn new(long: bool, daylight: bool) -> NameStyle {
        match (long, daylight) {
            (false, false) => NameStyle::ShortStandard,
            (false, true) => NameStyle::ShortDaylight,
            (true, false) => NameStyle::LongStandard,
            (true, true) => NameStyle::LongDaylight,
        }
    }

    /// Returns true for the daylight saving flavors.
    pub fn is_daylight(self) -> bool {
        matches!(self, NameStyle::ShortDaylight | NameStyle::LongDaylight)
    }
}

/// A source of time zone data.
///
/// Implementations supply offsets and daylight saving status of named zones
/// along with their identifiers and localized display names. Formatters use
/// a provider to print and parse zone names and to resolve parsed local
/// datetimes in named zones.
///
/// Display names are cached per locale and provider [`name`]. A provider's
/// names should therefore not change over its lifetime.
///
/// [`name`]: TimeZoneProvider::name
pub trait TimeZoneProvider: core::fmt::Debug + Send + Sync {
    /// A name identifying this provider.
    fn name(&self) -> &'static str;

    /// All zone identifiers this provider knows.
    fn available_ids(&self) -> Vec<String>;

    /// The offset of the named zone at the given instant.
    fn offset_at(&self, id: &str, timestamp: Timestamp)
        -> Result<Offset, Error>;

    /// Whether the named zone observes daylight saving time at the given
    /// instant.
    fn is_daylight_saving(
        &self,
        id: &str,
        timestamp: Timestamp,
    ) -> Result<bool, Error>;

    /// A localized display name of the named zone, if there is one.
    fn display_name(
        &self,
        id: &str,
        style: NameStyle,
        locale: Locale,
    ) -> Option<String>;

    /// The identifiers preferred in the given locale when a display name is
    /// shared by several zones.
    fn preferred_ids(&self, locale: Locale) -> Vec<String>;
}

/// The default time zone provider.
///
/// It knows UTC and a handful of named zones with fixed standard offsets.
/// European zones observe daylight saving time from the last Sunday of
/// March to the last Sunday of October (at 01:00 UTC) since 1981. North
/// American zones observe it from the second Sunday of March to the first
/// Sunday of November since 2007, and from the first Sunday of April to the
/// last Sunday of October from 1987 to 2006. Earlier years have no daylight
/// saving time.
///
/// Display names are available in English, German and Swedish. Other
/// languages fall back to English.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinProvider;

#[derive(Clone, Copy, Debug)]
enum Rule {
    Fixed,
    Europe,
    America,
}

#[derive(Debug)]
struct Zone {
    id: &'static str,
    standard: i32,
    rule: Rule,
    /// Names per language, ordered short standard, short daylight, long
    /// standard and long daylight. Empty names are absent.
    names: &'static [(&'static str, [&'static str; 4])],
}

const CET_NAMES: &[(&str, [&str; 4])] = &[
    (
        "en",
        [
            "CET",
            "CEST",
            "Central European Standard Time",
            "Central European Summer Time",
        ],
    ),
    (
        "de",
        [
            "MEZ",
            "MESZ",
            "Mitteleuropäische Normalzeit",
            "Mitteleuropäische Sommerzeit",
        ],
    ),
    (
        "sv",
        [
            "CET",
            "CEST",
            "centraleuropeisk normaltid",
            "centraleuropeisk sommartid",
        ],
    ),
];

static ZONES: &[Zone] = &[
    Zone {
        id: "UTC",
        standard: 0,
        rule: Rule::Fixed,
        names: &[
            ("en", ["UTC", "", "Coordinated Universal Time", ""]),
            ("de", ["UTC", "", "Koordinierte Weltzeit", ""]),
        ],
    },
    Zone {
        id: "Europe/London",
        standard: 0,
        rule: Rule::Europe,
        names: &[(
            "en",
            ["GMT", "BST", "Greenwich Mean Time", "British Summer Time"],
        )],
    },
    Zone {
        id: "Europe/Berlin",
        standard: 3_600,
        rule: Rule::Europe,
        names: CET_NAMES,
    },
    Zone {
        id: "Europe/Paris",
        standard: 3_600,
        rule: Rule::Europe,
        names: CET_NAMES,
    },
    Zone {
        id: "Europe/Stockholm",
        standard: 3_600,
        rule: Rule::Europe,
        names: CET_NAMES,
    },
    Zone {
        id: "America/New_York",
        standard: -5 * 3_600,
        rule: Rule::America,
        names: &[(
            "en",
            [
                "EST",
                "EDT",
                "Eastern Standard Time",
                "Eastern Daylight Time",
            ],
        )],
    },
    Zone {
        id: "America/Chicago",
        standard: -6 * 3_600,
        rule: Rule::America,
        names: &[(
            "en",
            [
                "CST",
                "CDT",
                "Central Standard Time",
                "Central Daylight Time",
            ],
        )],
    },
    Zone {
        id: "America/Denver",
        standard: -7 * 3_600,
        rule: Rule::America,
        names: &[(
            "en",
            [
                "MST",
                "MDT",
                "Mountain Standard Time",
                "Mountain Daylight Time",
            ],
        )],
    },
    Zone {
        id: "America/Phoenix",
        standard: -7 * 3_600,
        rule: Rule::Fixed,
        names: &[("en", ["MST", "", "Mountain Standard Time", ""])],
    },
    Zone {
        id: "America/Los_Angeles",
        standard: -8 * 3_600,
        rule: Rule::America,
        names: &[(
            "en",
            [
                "PST",
                "PDT",
                "Pacific Standard Time",
                "Pacific Daylight Time",
            ],
        )],
    },
    Zone {
        id: "Asia/Kolkata",
        standard: 5 * 3_600 + 30 * 60,
        rule: Rule::Fixed,
        names: &[("en", ["IST", "", "India Standard Time", ""])],
    },
    Zone {
        id: "Asia/Shanghai",
        standard: 8 * 3_600,
        rule: Rule::Fixed,
        names: &[("en", ["CST", "", "China Standard Time", ""])],
    },
    Zone {
        id: "Asia/Tokyo",
        standard: 9 * 3_600,
        rule: Rule::Fixed,
        names: &[("en", ["JST", "", "Japan Standard Time", ""])],
    },
];

/// Preferred zones per country, consulted when a name is shared.
static PREFERRED: &[(&str, &[&str])] = &[
    ("CN", &["Asia/Shanghai"]),
    ("DE", &["Europe/Berlin"]),
    ("FR", &["Europe/Paris"]),
    ("GB", &["Europe/London"]),
    ("IN", &["Asia/Kolkata"]),
    ("JP", &["Asia/Tokyo"]),
    ("SE", &["Europe/Stockholm"]),
    (
        "US",
        &[
            "America/New_York",
            "America/Chicago",
            "America/Denver",
            "America/Los_Angeles",
        ],
    ),
];

impl BuiltinProvider {
    fn zone(&self, id: &str) -> Result<&'static Zone, Error> {
        ZONES
            .iter()
            .find(|zone| zone.id == id)
            .ok_or_else(|| Error::from(E::unknown(id)))
    }
}

impl TimeZoneProvider for BuiltinProvider {
    fn name(&self) -> &'static str {
        "builtin"
    }

    fn available_ids(&self) -> Vec<String> {
        ZONES.iter().map(|zone| zone.id.to_string()).collect()
    }

    fn offset_at(
        &self,
        id: &str,
        timestamp: Timestamp,
    ) -> Result<Offset, Error> {
        let zone = self.zone(id)?;
        let dst = if zone.rule.is_dst(zone.standard, timestamp) {
            3_600
        } else {
            0
        };
        Offset::new_seconds(zone.standard + dst)
    }

    fn is_daylight_saving(
        &self,
        id: &str,
        timestamp: Timestamp,
    ) -> Result<bool, Error> {
        let zone = self.zone(id)?;
        Ok(zone.rule.is_dst(zone.standard, timestamp))
    }

    fn display_name(
        &self,
        id: &str,
        style: NameStyle,
        locale: Locale,
    ) -> Option<String> {
        let zone = self.zone(id).ok()?;
        let (_, names) = zone
            .names
            .iter()
            .find(|(lang, _)| *lang == locale.language())
            .or_else(|| zone.names.iter().find(|(lang, _)| *lang == "en"))?;
        let name = match style {
            NameStyle::ShortStandard => names[0],
            NameStyle::ShortDaylight => names[1],
            NameStyle::LongStandard => names[2],
            NameStyle::LongDaylight => names[3],
        };
        (!name.is_empty()).then(|| name.to_string())
    }

    fn preferred_ids(&self, locale: Locale) -> Vec<String> {
        let Some(country) = locale.country() else { return vec![] };
        PREFERRED
            .iter()
            .find(|(c, _)| *c == country)
            .map(|(_, ids)| ids.iter().map(|id| id.to_string()).collect())
            .unwrap_or_default()
    }
}

impl Rule {
    fn is_dst(self, standard: i32, timestamp: Timestamp) -> bool {
        let second = timestamp.as_second();
        let year = Offset::UTC.to_datetime(timestamp).date().year();
        let (start, end) = match self {
            Rule::Fixed => return false,
            Rule::Europe if year >= 1981 => {
                let start = last_weekday(year, 3, Weekday::Sunday);
                let end = last_weekday(year, 10, Weekday::Sunday);
                let (start, end) =
                    (start * SECONDS_PER_DAY, end * SECONDS_PER_DAY);
                (start + 3_600, end + 3_600)
            }
            Rule::America if year >= 1987 => {
                let (start, end) = if year >= 2007 {
                    (
                        nth_weekday(year, 3, Weekday::Sunday, 2),
                        nth_weekday(year, 11, Weekday::Sunday, 1),
                    )
                } else {
                    (
                        nth_weekday(year, 4, Weekday::Sunday, 1),
                        last_weekday(year, 10, Weekday::Sunday),
                    )
                };
                // Both transitions happen at 02:00 local clock time.
                let standard = i64::from(standard);
                (
                    start * SECONDS_PER_DAY + 7_200 - standard,
                    end * SECONDS_PER_DAY + 7_200 - (standard + 3_600),
                )
            }
            Rule::Europe | Rule::America => return false,
        };
        start <= second && second < end
    }
}

/// Returns the epoch day of the `n`th given weekday in a month.
fn nth_weekday(year: i16, month: i8, weekday: Weekday, n: i64) -> i64 {
    let first = IDate { year, month, day: 1 }.to_epoch_day();
    let delta = weekday.since(weekday_of(first));
    i64::from(first.epoch_day) + i64::from(delta) + 7 * (n - 1)
}

/// Returns the epoch day of the last given weekday in a month.
fn last_weekday(year: i16, month: i8, weekday: Weekday) -> i64 {
    let day = itime::days_in_month(year, month);
    let last = IDate { year, month, day }.to_epoch_day();
    let delta = weekday_of(last).since(weekday);
    i64::from(last.epoch_day) - i64::from(delta)
}

fn weekday_of(day: IEpochDay) -> Weekday {
    let offset = day.weekday_monday_one();
    Weekday::ALL[usize::from(offset.unsigned_abs() - 1)]
}

#[cfg(test)]
mod tests {
    use crate::civil::{date, datetime};

    use super::*;

    #[test]
    fn transitions() {
        assert_eq!(
            last_weekday(2024, 3, Weekday::Sunday),
            date(2024, 3, 31).to_epoch_day(),
        );
        assert_eq!(
            nth_weekday(2024, 3, Weekday::Sunday, 2),
            date(2024, 3, 10).to_epoch_day(),
        );
        assert_eq!(
            nth_weekday(2024, 11, Weekday::Sunday, 1),
            date(2024, 11, 3).to_epoch_day(),
        );
        let p = BuiltinProvider;
        let before = datetime(2024, 3, 10, 6, 59, 59, 0)
            .to_timestamp(Offset::UTC)
            .unwrap();
        let after = datetime(2024, 3, 10, 7, 0, 0, 0)
            .to_timestamp(Offset::UTC)
            .unwrap();
        assert!(!p.is_daylight_saving("America/New_York", before).unwrap());
        assert!(p.is_daylight_saving("America/New_York", after).unwrap());
    }

    #[test]
    fn names() {
        let p = BuiltinProvider;
        let name = |id, style, locale| p.display_name(id, style, locale);
        assert_eq!(
            name("Europe/Berlin", NameStyle::ShortDaylight, Locale::GERMANY),
            Some("MESZ".to_string()),
        );
        assert_eq!(
            name("Europe/Berlin", NameStyle::ShortDaylight, Locale::FRANCE),
            Some("CEST".to_string()),
        );
        assert_eq!(
            name("Asia/Tokyo", NameStyle::LongDaylight, Locale::US),
            None,
        );
        assert_eq!(p.preferred_ids(Locale::CHINA), vec!["Asia/Shanghai"]);
        assert!(p.preferred_ids(Locale::ENGLISH).is_empty());
    }
}
