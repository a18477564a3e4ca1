use std::{
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use crate::{
    tz::{Dst, NameStyle, TimeZoneProvider},
    util::prefix,
    Locale,
};

/// The maximum number of name catalogs kept in the cache. Catalogs built
/// once the cache is full are used but not kept.
const CAPACITY: usize = 25;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct Key {
    locale: Locale,
    long: bool,
    provider: &'static str,
}

static CACHE: OnceLock<RwLock<HashMap<Key, Arc<ZoneNames>>>> = OnceLock::new();

/// Returns the catalog of short or long zone names for a locale.
///
/// Catalogs are memoized per locale, length and provider name. Concurrent
/// callers may build the same catalog twice, in which case the first one
/// inserted wins.
pub(crate) fn zone_names(
    provider: &dyn TimeZoneProvider,
    locale: Locale,
    long: bool,
) -> Arc<ZoneNames> {
    let key = Key { locale, long, provider: provider.name() };
    let cache = CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    {
        let map = cache.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(names) = map.get(&key) {
            return Arc::clone(names);
        }
    }
    let names = Arc::new(ZoneNames::build(provider, locale, long));
    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(existing) = map.get(&key) {
        return Arc::clone(existing);
    }
    if map.len() >= CAPACITY {
        warn!(
            "zone name cache is full ({CAPACITY} entries), \
             not caching names for {locale}",
        );
        return names;
    }
    debug!(
        "caching {} zone names for {locale} from {} provider",
        names.entries.len(),
        provider.name(),
    );
    map.insert(key, Arc::clone(&names));
    names
}

/// A catalog mapping localized zone names to the zones using them.
#[derive(Debug)]
pub(crate) struct ZoneNames {
    /// Sorted by descending name length, so the first match is the longest.
    entries: Vec<NameEntry>,
    /// Whether standard and daylight names differ, so that a name tells
    /// whether daylight saving time is in effect.
    daylight_sensitive: bool,
}

/// A zone name and every zone (with its daylight flavor) that uses it.
#[derive(Debug)]
pub(crate) struct NameEntry {
    pub(crate) name: String,
    pub(crate) zones: Vec<(String, Dst)>,
}

impl ZoneNames {
    fn build(
        provider: &dyn TimeZoneProvider,
        locale: Locale,
        long: bool,
    ) -> ZoneNames {
        let mut entries: Vec<NameEntry> = vec![];
        for id in provider.available_ids() {
            for dst in [Dst::No, Dst::Yes] {
                let style = NameStyle::new(long, dst.is_dst());
                let Some(name) = provider.display_name(&id, style, locale)
                else {
                    continue;
                };
                match entries.iter_mut().find(|e| e.name == name) {
                    Some(entry) => entry.zones.push((id.clone(), dst)),
                    None => entries.push(NameEntry {
                        name,
                        zones: vec![(id.clone(), dst)],
                    }),
                }
            }
        }
        entries.sort_by(|a, b| {
            b.name.chars().count().cmp(&a.name.chars().count())
        });
        // Sensitive when the set of standard names differs from the set of
        // daylight names, i.e., when some name is used for only one of them.
        let daylight_sensitive = entries.iter().any(|entry| {
            let dst = entry.zones.iter().filter(|(_, d)| d.is_dst()).count();
            dst == 0 || dst == entry.zones.len()
        });
        ZoneNames { entries, daylight_sensitive }
    }

    /// Returns true if a name tells whether daylight saving time is in
    /// effect.
    pub(crate) fn daylight_sensitive(&self) -> bool {
        self.daylight_sensitive
    }

    /// Returns the longest name at the start of `text` along with the
    /// number of bytes it covers.
    pub(crate) fn longest_match(
        &self,
        text: &str,
        ignore_case: bool,
    ) -> Option<(&NameEntry, usize)> {
        self.entries.iter().find_map(|entry| {
            let len =
                prefix::match_len(text, &entry.name, ignore_case, false)?;
            Some((entry, len))
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::tz::BuiltinProvider;

    use super::*;

    #[test]
    fn shared_names() {
        let _ = env_logger::try_init();

        let names = zone_names(&BuiltinProvider, Locale::US, false);
        let (entry, len) = names.longest_match("CST 2024", false).unwrap();
        assert_eq!(len, 3);
        let ids: Vec<&str> =
            entry.zones.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["America/Chicago", "Asia/Shanghai"]);

        let (entry, _) = names.longest_match("cest", true).unwrap();
        assert_eq!(entry.name, "CEST");
        assert!(entry.zones.iter().all(|&(_, dst)| dst.is_dst()));
        assert!(names.daylight_sensitive());

        let again = zone_names(&BuiltinProvider, Locale::US, false);
        assert!(Arc::ptr_eq(&names, &again));
    }

    #[test]
    fn long_names() {
        let names = zone_names(&BuiltinProvider, Locale::GERMANY, true);
        let text = "Mitteleuropäische Sommerzeit!";
        let (entry, len) = names.longest_match(text, false).unwrap();
        assert_eq!(&text[len..], "!");
        assert_eq!(entry.zones.len(), 3);
        let (entry, _) =
            names.longest_match("Eastern Standard Time", false).unwrap();
        assert_eq!(entry.name, "Eastern Standard Time");
    }
}
