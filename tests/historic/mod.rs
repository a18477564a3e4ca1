use chronofmt::{
    civil::{date, Date},
    fmt::{Element, Formatter, Leniency, PatternType},
    history::ChronoHistory,
    Locale,
};

use crate::Result;

#[test]
fn era_substitution() -> Result {
    let f = Formatter::<Date>::of_pattern(
        "GGGG yyyy MM dd",
        PatternType::Cldr,
        Locale::US,
    )?
    .with_history(ChronoHistory::of_first_gregorian_reform());

    // The last Julian day and the first Gregorian day are adjacent.
    assert_eq!(f.parse("Anno Domini 1582 10 04")?, date(1582, 10, 14));
    assert_eq!(f.parse("Anno Domini 1582 10 15")?, date(1582, 10, 15));
    assert_eq!(f.format(&date(1582, 10, 14))?, "Anno Domini 1582 10 04");

    // The ten days in between never existed.
    assert!(f.parse("Anno Domini 1582 10 10").is_err());

    // A proleptic pattern reads the same text as a Gregorian date.
    let iso = Formatter::<Date>::of_pattern(
        "uuuu MM dd",
        PatternType::Cldr,
        Locale::US,
    )?;
    assert_eq!(iso.parse("1582 10 04")?, date(1582, 10, 4));
    Ok(())
}

#[test]
fn era_round_trip_before_christ() -> Result {
    let f = Formatter::<Date>::of_pattern(
        "G yyyy-MM-dd",
        PatternType::Cldr,
        Locale::UK,
    )?
    .with_leniency(Leniency::Strict);
    for day in [date(-43, 3, 13), date(1, 1, 3), date(0, 12, 31)] {
        let text = f.format(&day)?;
        assert_eq!(f.parse(&text)?, day, "round trip of {text}");
    }
    assert!(f.format(&date(0, 12, 31))?.starts_with("BC 0001-"));
    Ok(())
}

#[test]
fn swedish_leap_day() -> Result {
    let f = Formatter::<Date>::of_pattern(
        "d MMMM yyyy",
        PatternType::Cldr,
        Locale::SWEDEN,
    )?
    .with_history(ChronoHistory::of_sweden())
    .with_default(Element::Era, 1)?;

    let leap = f.parse("30 februari 1712")?;
    assert_eq!(leap, date(1712, 3, 11));
    assert_eq!(f.format(&leap)?, "30 februari 1712");
    // Julian 1 March 1712 follows right after.
    assert_eq!(f.parse("1 mars 1712")?, date(1712, 3, 12));
    assert_eq!(f.format(&date(1712, 3, 10))?, "29 februari 1712");

    // Outside of 1712 the thirtieth of February does not exist.
    assert!(f.parse("30 februari 1711").is_err());
    Ok(())
}

#[test]
fn red_october() -> Result {
    let en_ru = Locale::new("en", Some("RU"))?;
    let f = Formatter::<Date>::of_pattern(
        "MMMM d, yyyy G",
        PatternType::Cldr,
        en_ru,
    )?;
    // Russia used the Julian calendar until 1918.
    assert_eq!(f.format(&date(1917, 11, 7))?, "October 25, 1917 AD");
    assert_eq!(f.parse("October 25, 1917 AD")?, date(1917, 11, 7));

    let f = f.with_locale(Locale::US);
    assert_eq!(f.format(&date(1917, 11, 7))?, "November 7, 1917 AD");
    Ok(())
}
