use chronofmt::{
    civil::{date, time, Date, DateTime, Time},
    fmt::{Attributes, Element, Formatter, Leniency, PatternType},
    tz::TimeZone,
    Locale, Zoned,
};

use crate::Result;

#[test]
fn optional_section_isolation() -> Result {
    let _ = env_logger::try_init();

    let mut builder = Formatter::<Date>::builder(Locale::ROOT);
    builder
        .add_literal("a")?
        .start_optional_section()?
        .add_literal("b")?
        .add_fixed_integer(Element::Month, 2)?
        .end_section()?
        .add_literal("c")?;
    let f = builder.build()?;

    let (values, end) = f.parse_raw("ab07c", 0)?;
    assert_eq!(values.get_int(Element::Month), Some(7));
    assert_eq!(end, 5);

    // The section matched its literal before failing. Nothing it parsed
    // survives, and parsing resumes where the section started.
    assert!(f.parse_raw("ab0c", 0).is_err());
    let (values, end) = f.parse_raw("ac", 0)?;
    assert!(!values.contains(Element::Month));
    assert_eq!(end, 2);
    Ok(())
}

#[test]
fn sibling_sections() -> Result {
    let f = Formatter::<Time>::of_pattern(
        "HH[:mm][:ss]",
        PatternType::Cldr,
        Locale::ROOT,
    )?
    .with_default(Element::Minute, 0)?
    .with_default(Element::Second, 0)?;
    assert_eq!(f.parse("09")?, time(9, 0, 0, 0));
    assert_eq!(f.parse("09:30")?, time(9, 30, 0, 0));
    assert_eq!(f.parse("09:30:15")?, time(9, 30, 15, 0));
    Ok(())
}

#[test]
fn sibling_sections_without_defaults() -> Result {
    let _ = env_logger::try_init();

    let f = Formatter::<Time>::of_pattern(
        "HH[:mm][.ss]",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    // The second section fails at the end of input.
    let (values, end) = f.parse_raw("09:30", 0)?;
    assert_eq!(values.get_int(Element::DigitalHourOfDay), Some(9));
    assert_eq!(values.get_int(Element::Minute), Some(30));
    assert!(!values.contains(Element::Second));
    assert_eq!(end, 5);

    // The second section fails after matching its literal.
    let (values, end) = f.parse_raw("09:30.x", 0)?;
    assert_eq!(values.get_int(Element::Minute), Some(30));
    assert!(!values.contains(Element::Second));
    assert_eq!(end, 5);

    let lenient = f
        .with_attributes(&Attributes::new().trailing_characters(true))
        .with_default(Element::Second, 0)?;
    let (value, end) = lenient.parse_at("09:30.x", 0, &Attributes::new())?;
    assert_eq!(value, time(9, 30, 0, 0));
    assert_eq!(end, 5);

    let (values, end) = f.parse_raw("09:30.15", 0)?;
    assert_eq!(values.get_int(Element::Second), Some(15));
    assert_eq!(end, 8);
    Ok(())
}

#[test]
fn adjacent_digits() -> Result {
    let f =
        Formatter::<Time>::of_pattern("Hmm", PatternType::Cldr, Locale::ROOT)?
            .with_default(Element::Second, 0)?;
    assert_eq!(f.parse("1230")?, time(12, 30, 0, 0));
    assert_eq!(f.parse("930")?, time(9, 30, 0, 0));

    let f = Formatter::<DateTime>::of_pattern(
        "uuuuMMddHHmmss",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    assert_eq!(
        f.parse("20240709173005")?,
        date(2024, 7, 9).to_datetime(time(17, 30, 5, 0)),
    );
    Ok(())
}

#[test]
fn build_rejections() {
    let mut builder = Formatter::<Time>::builder(Locale::ROOT);
    builder.add_integer(Element::Second, 1, 2).unwrap();
    let err = builder
        .add_fraction(Element::NanoOfSecond, 1, 9, false)
        .unwrap_err();
    assert!(err.is_build());

    let err = Formatter::<Date>::of_pattern(
        "uuuu-MMMMMM",
        PatternType::Cldr,
        Locale::ROOT,
    )
    .unwrap_err();
    insta::assert_snapshot!(err, @"too many pattern letters for `M`: 6");
}

#[test]
fn strict_daylight_conflict() -> Result {
    let en_de = Locale::new("en", Some("DE"))?;
    let f = Formatter::<Zoned>::of_pattern(
        "uuuu-MM-dd HH:mm z",
        PatternType::Cldr,
        en_de,
    )?;
    // CEST is the summer name of Berlin, but January is winter there.
    let text = "2024-01-15 13:00 CEST";

    let err = f.with_leniency(Leniency::Strict).parse(text).unwrap_err();
    assert!(err.is_consistency());
    insta::assert_snapshot!(
        err,
        @"conflict found: parsed value is not daylight saving, but time zone name has not the appropriate form in `2024-01-15 13:00 CEST`",
    );

    let berlin = TimeZone::get("Europe/Berlin")?;
    for leniency in [Leniency::Smart, Leniency::Lax] {
        let zdt = f.with_leniency(leniency).parse(text)?;
        assert_eq!(zdt.time_zone(), &berlin);
        let dt = date(2024, 1, 15).to_datetime(time(13, 0, 0, 0));
        assert_eq!(zdt.datetime(), dt);
    }

    let strict = f.with_leniency(Leniency::Strict);
    let zdt = strict.parse("2024-01-15 13:00 CET")?;
    assert_eq!(zdt.timestamp().as_second(), 1_705_320_000);
    Ok(())
}

#[test]
fn strict_element_conflict() -> Result {
    let f = Formatter::<Date>::of_pattern(
        "EEE, uuuu-MM-dd",
        PatternType::Cldr,
        Locale::US,
    )?;
    // 2024-07-09 was a Tuesday.
    assert_eq!(f.parse("Wed, 2024-07-09")?, date(2024, 7, 9));
    let err = f
        .with_leniency(Leniency::Strict)
        .parse("Wed, 2024-07-09")
        .unwrap_err();
    assert!(err.is_consistency());
    assert_eq!(
        f.with_leniency(Leniency::Strict).parse("Tue, 2024-07-09")?,
        date(2024, 7, 9),
    );
    Ok(())
}

#[test]
fn parse_positions() {
    let f = Formatter::<Date>::of_pattern(
        "uuuu-MM-dd",
        PatternType::Cldr,
        Locale::ROOT,
    )
    .unwrap();
    let err = f.parse("2024-07x09").unwrap_err();
    assert!(err.is_parse());
    assert_eq!(err.parse_position(), Some(7));

    let err = f.parse_at("2024-07-09", 10, &Attributes::new()).unwrap_err();
    assert!(err.is_bounds());
    assert_eq!(err.parse_position(), None);
}
