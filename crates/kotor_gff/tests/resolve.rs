use std::collections::HashMap;

use kotor_common::{Gender, Language, StrRef};
use kotor_gff::error::Result;
use kotor_gff::{Gff, LocalizedString, ResolveOptions, Resolved};
use pretty_assertions::assert_eq;

fn talk_table() -> HashMap<(StrRef, Gender), String> {
    HashMap::from([
        ((StrRef::new(42), Gender::Male), "Talk table text".to_owned()),
        ((StrRef::new(42), Gender::Female), "Talk table text, female".to_owned()),
        ((StrRef::new(7), Gender::Male), String::new()),
    ])
}

/// Every string goes through the wire format before it is resolved
fn decoded() -> Result<Gff> {
    let mut gff = Gff::default();
    let root = &mut gff.root;
    root.set_field(
        "Exact",
        LocalizedString::from_strref(StrRef::new(42))
            .with_substring(Language::English, Gender::Male, "Embedded"),
    );
    root.set_field("Blank", LocalizedString::new().with_substring(Language::French, Gender::Male, ""));
    root.set_field("TalkOnly", LocalizedString::from_strref(StrRef::new(42)));
    root.set_field("EmptyTalk", LocalizedString::from_strref(StrRef::new(7)));
    root.set_field(
        "Fallback",
        LocalizedString::from_strref(StrRef::new(99))
            .with_substring(Language::Italian, Gender::Male, "Italiano")
            .with_substring(Language::German, Gender::Male, "Deutsch")
            .with_substring(Language::English, Gender::Female, "English, female"),
    );
    root.set_field("Nothing", LocalizedString::new());

    Gff::decode(&gff.encode()?)
}

fn resolve(gff: &Gff, label: &str, language: Language, gender: Gender, fallback: bool) -> Result<Resolved> {
    let options = ResolveOptions::builder().fallback(fallback).build();
    Ok(gff
        .root
        .get_locstring(label)?
        .resolve(language, gender, &talk_table(), options))
}

#[test]
fn requested_substring_wins_over_talk_table() -> Result<()> {
    let gff = decoded()?;

    let resolved = resolve(&gff, "Exact", Language::English, Gender::Male, true)?;
    assert_eq!(resolved.text, "Embedded");
    assert!(resolved.found);

    Ok(())
}

#[test]
fn blank_substring_is_found() -> Result<()> {
    let gff = decoded()?;

    let resolved = resolve(&gff, "Blank", Language::French, Gender::Male, true)?;
    assert_eq!(resolved.text, "");
    assert!(resolved.found);

    Ok(())
}

#[test]
fn talk_table_by_gender() -> Result<()> {
    let gff = decoded()?;

    let male = resolve(&gff, "TalkOnly", Language::English, Gender::Male, false)?;
    let female = resolve(&gff, "TalkOnly", Language::English, Gender::Female, false)?;
    let empty = resolve(&gff, "EmptyTalk", Language::Spanish, Gender::Male, false)?;
    assert_eq!(male.text, "Talk table text");
    assert_eq!(female.text, "Talk table text, female");
    assert!(empty.found);
    assert_eq!(empty.text, "");

    Ok(())
}

#[test]
fn fallback_follows_language_order() -> Result<()> {
    let gff = decoded()?;

    // strref 99 misses the talk table; German comes before Italian
    let resolved = resolve(&gff, "Fallback", Language::Polish, Gender::Male, true)?;
    assert_eq!(resolved.text, "Deutsch");
    assert!(resolved.found);

    let female = resolve(&gff, "Fallback", Language::Polish, Gender::Female, true)?;
    assert_eq!(female.text, "English, female");

    Ok(())
}

#[test]
fn fallback_can_be_disabled() -> Result<()> {
    let gff = decoded()?;

    let resolved = resolve(&gff, "Fallback", Language::Polish, Gender::Male, false)?;
    assert_eq!(resolved.text, "");
    assert!(!resolved.found);

    Ok(())
}

#[test]
fn nothing_to_find() -> Result<()> {
    let gff = decoded()?;

    let resolved = resolve(&gff, "Nothing", Language::English, Gender::Male, true)?;
    assert_eq!(resolved, Resolved::default());
    assert!(!resolved.found);

    Ok(())
}
