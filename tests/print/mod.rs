use chronofmt::{
    civil::{date, time, Date, DateTime, Time},
    fmt::{
        Attributes, Element, Formatter, OrdinalSuffixes, PatternType,
        TextWidth,
    },
    tz::TimeZone,
    Locale, Timestamp, Zoned,
};

use crate::Result;

#[test]
fn zoned_round_trip() -> Result {
    let f = Formatter::<Zoned>::of_pattern(
        "uuuu-MM-dd'T'HH:mm:ssXXX'['VV']'",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    let ts = Timestamp::from_second(1_720_560_600)?;
    let zdt = Zoned::new(ts, TimeZone::get("America/New_York")?)?;
    let text = f.format(&zdt)?;
    assert_eq!(text, "2024-07-09T17:30:00-04:00[America/New_York]");
    assert_eq!(f.parse(&text)?, zdt);

    let utc = Zoned::new(ts, TimeZone::UTC)?;
    let f = Formatter::<Zoned>::of_pattern(
        "uuuu-MM-dd'T'HH:mm:ssX",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    assert_eq!(f.format(&utc)?, "2024-07-09T21:30:00Z");
    Ok(())
}

#[test]
fn timestamps_need_zone() -> Result {
    let f = Formatter::<Timestamp>::of_pattern(
        "uuuu-MM-dd HH:mm xxx",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    let ts = Timestamp::from_second(1_720_560_600)?;
    let err = f.format(&ts).unwrap_err();
    assert!(err.is_format());

    let f = f.with_time_zone(TimeZone::get("Europe/Berlin")?);
    assert_eq!(f.format(&ts)?, "2024-07-09 23:30 +02:00");
    assert_eq!(f.parse("2024-07-09 23:30 +02:00")?, ts);
    assert_eq!(f.parse("2024-07-09 21:30 +00:00")?, ts);
    Ok(())
}

#[test]
fn texts_and_ordinals() -> Result {
    let mut builder = Formatter::<Date>::builder(Locale::US);
    builder
        .start_section(Attributes::new().text_width(TextWidth::Abbreviated))?
        .add_text(Element::DayOfWeek)?
        .end_section()?
        .add_literal(", the ")?
        .add_ordinal(Element::DayOfMonth, None)?
        .add_literal(" of ")?
        .add_text(Element::Month)?
        .add_literal(" ")?
        .add_integer(Element::Year, 4, 9)?;
    let f = builder.build()?;
    for (day, text) in [
        (date(2024, 7, 1), "Mon, the 1st of July 2024"),
        (date(2024, 7, 2), "Tue, the 2nd of July 2024"),
        (date(2024, 7, 13), "Sat, the 13th of July 2024"),
        (date(2024, 7, 23), "Tue, the 23rd of July 2024"),
    ] {
        assert_eq!(f.format(&day)?, text);
        assert_eq!(f.parse(text)?, day);
    }

    let mut builder = Formatter::<Date>::builder(Locale::ROOT);
    builder
        .add_ordinal(Element::DayOfMonth, Some(OrdinalSuffixes::uniform(".")))?
        .add_literal(" ")?
        .add_fixed_integer(Element::Month, 2)?
        .add_literal(" ")?
        .add_integer(Element::Year, 4, 9)?;
    assert_eq!(builder.build()?.format(&date(2024, 7, 9))?, "9. 07 2024");
    Ok(())
}

#[test]
fn padding() -> Result {
    let mut builder = Formatter::<Time>::builder(Locale::ROOT);
    builder
        .pad_next(3)?
        .add_integer(Element::DigitalHourOfDay, 1, 2)?
        .add_literal("|")?
        .add_integer(Element::Minute, 1, 2)?
        .pad_previous(3)?
        .add_literal("|")?;
    let f = builder
        .build()?
        .with_attributes(&Attributes::new().pad_char('_'))
        .with_default(Element::Second, 0)?;
    assert_eq!(f.format(&time(9, 5, 0, 0))?, "__9|5__|");
    assert_eq!(f.parse("__9|5__|")?, time(9, 5, 0, 0));

    let err = Formatter::<Time>::builder(Locale::ROOT)
        .pad_next(0)
        .map(|_| ())
        .unwrap_err();
    insta::assert_snapshot!(err, @"pad width 0 is not allowed");
    Ok(())
}

#[test]
fn embedded_formatter() -> Result {
    let day = Formatter::<Date>::of_pattern(
        "dd.MM.uuuu",
        PatternType::Cldr,
        Locale::ROOT,
    )?;
    let mut builder = Formatter::<DateTime>::builder(Locale::ROOT);
    builder
        .add_customized(day)?
        .add_literal(" ")?
        .add_pattern("HH:mm", PatternType::Cldr)?;
    let f = builder.build()?;
    let dt = date(2024, 7, 9).to_datetime(time(17, 30, 0, 0));
    assert_eq!(f.format(&dt)?, "09.07.2024 17:30");
    assert_eq!(f.parse("09.07.2024 17:30")?, dt);
    Ok(())
}
