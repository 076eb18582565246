use lenient_bibtex::{Delimiter, ErrorCode, Value, ValuePart, parse, parse_with_macros};

fn read(fname: &str) -> String {
    std::fs::read_to_string(fname).unwrap()
}

#[test]
fn test_default_strings() {
    let doc = parse(&read("assets/strings.bib")).unwrap();

    for month in [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ] {
        assert!(doc.macros.contains(month), "{month}");
    }
}

#[test]
fn test_defined_strings() {
    let doc = parse(&read("assets/strings.bib")).unwrap();
    assert_eq!(doc.macros.len(), 12 + 5);

    let magritte = doc.macros.get("magritte").unwrap();
    assert_eq!(magritte.len(), 1);
    assert_eq!(magritte, &Value(vec![ValuePart::quoted(r"Ren{\'e} Magritte")]));

    let pratchett = doc.macros.get("pratchett").unwrap();
    assert_eq!(pratchett.len(), 2);
    assert_eq!(
        pratchett,
        &Value(vec![ValuePart::quoted("Terry "), ValuePart::braced("Pratchett")])
    );

    let olivier = doc.macros.get("olivier").unwrap();
    assert_eq!(olivier.len(), 4);
    assert!(matches!(
        olivier.parts()[1],
        ValuePart::MacroRef { ref name } if name == "first"
    ));

    assert_eq!(
        doc.macros.resolve_by_name("OLIVIER"),
        Ok("Olivier, Laurence Kerr".to_string())
    );
}

#[test]
fn test_entries_use_strings() {
    let doc = parse(&read("assets/strings.bib")).unwrap();
    assert_eq!(doc.entries.len(), 2);

    let entry = doc.entry("Pratchett1983").unwrap();
    assert_eq!(
        doc.resolve_tag(entry, "author").unwrap(),
        Ok("Terry Pratchett".to_string())
    );
    assert_eq!(
        doc.resolve_tag(entry, "month").unwrap(),
        Ok("January".to_string())
    );
    assert_eq!(
        entry.get("year"),
        Some(&Value(vec![ValuePart::Text {
            delimiter: Delimiter::Bare,
            content: "1983".into()
        }]))
    );

    let entry = doc.entry("magritte1929").unwrap();
    assert_eq!(
        doc.resolve_tag(entry, "author").unwrap(),
        Ok(r"Ren{\'e} Magritte".to_string())
    );
    assert!(doc.resolve_tag(entry, "month").is_none());
}

#[test]
fn test_strings_across_files() {
    let strings = parse(&read("assets/strings.bib")).unwrap();
    let input = "@string{jan = {Janvier}}\n@book{k, author = olivier, month = jan}";

    // without the shared table, `olivier` is unknown
    let doc = parse(input).unwrap();
    let entry = doc.entry("k").unwrap();
    assert_eq!(
        doc.resolve_tag(entry, "author").unwrap().unwrap_err().code(),
        &ErrorCode::UndefinedMacro("olivier".to_string())
    );

    let doc = parse_with_macros(input, strings.macros).unwrap();
    let entry = doc.entry("k").unwrap();
    assert_eq!(
        doc.resolve_tag(entry, "author").unwrap(),
        Ok("Olivier, Laurence Kerr".to_string())
    );
    assert_eq!(
        doc.resolve_tag(entry, "month").unwrap(),
        Ok("Janvier".to_string())
    );
}
