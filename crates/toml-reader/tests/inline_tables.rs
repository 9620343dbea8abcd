use toml_reader::{ErrorKind, Value};

#[test]
fn inline_tables_nest_and_use_dotted_keys() -> Result<(), Box<dyn std::error::Error>> {
    let src = "name = { first = \"Tom\", last = \"Preston-Werner\" }\n\
               animal = { type.name = \"pug\", size = { h = 1 } }\n\
               empty = {}\n";
    let root = toml_reader::parse(src)?;
    assert_eq!(root["name"].get("last").and_then(Value::as_str), Some("Preston-Werner"));
    let animal = root["animal"].as_table().ok_or("animal is not a table")?;
    assert_eq!(animal["type"].get("name").and_then(Value::as_str), Some("pug"));
    assert_eq!(animal["size"].get("h"), Some(&Value::Integer(1)));
    assert_eq!(root["empty"].as_table().map(|t| t.len()), Some(0));
    Ok(())
}

#[test]
fn newline_inside_inline_table_is_rejected() {
    let err = toml_reader::parse("t = { a = 1,\n b = 2 }").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLineBreak);
    assert_eq!((err.line, err.column), (1, 13));

    let ok = toml_reader::parse("[t]\na = 1\nb = 2\n").unwrap();
    assert_eq!(ok["t"].as_table().map(|t| t.len()), Some(2));
}

#[test]
fn multiline_string_inside_inline_table_is_allowed() {
    let root = toml_reader::parse("t = { s = '''\nx''' }").unwrap();
    assert_eq!(root["t"].get("s").and_then(Value::as_str), Some("x"));
}

#[test]
fn inline_table_errors() {
    for (src, kind) in [
        ("t = { a = 1, }", ErrorKind::InvalidLiteral),
        ("t = { a = 1 b = 2 }", ErrorKind::InvalidLiteral),
        ("t = { a = [1,\n2] }", ErrorKind::InvalidLineBreak),
        ("t = { a = 1, a = 2 }", ErrorKind::DuplicateKey),
        ("t = { a = 1, a.b = 2 }", ErrorKind::StructuralConflict),
        ("t = { a = 1", ErrorKind::UnexpectedEndOfInput),
        ("t = { = 1 }", ErrorKind::InvalidLiteral),
    ] {
        assert_eq!(toml_reader::parse(src).unwrap_err().kind, kind, "{}", src);
    }
}
