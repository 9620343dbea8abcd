use std::io::{self, Read};

use toml_reader::{Error, ErrorKind, Options};

fn fail(src: &str) -> (ErrorKind, usize, usize) {
    let err = toml_reader::parse(src).unwrap_err();
    (err.kind, err.line, err.column)
}

#[test]
fn every_kind_carries_a_position() {
    assert_eq!(fail("a = \"open"), (ErrorKind::UnexpectedEndOfInput, 1, 10));
    assert_eq!(fail("x = 1\na = \"bad \\q\""), (ErrorKind::InvalidEscapeSequence, 2, 10));
    assert_eq!(fail("a = \"abc\ndef\""), (ErrorKind::InvalidLineBreak, 1, 9));
    assert_eq!(fail("a = 05"), (ErrorKind::InvalidLiteral, 1, 5));
    assert_eq!(fail("\n\n[a.]"), (ErrorKind::MalformedHeader, 3, 4));
    assert_eq!(fail("a = [1, 'x']"), (ErrorKind::TypeMismatchInArray, 1, 9));
    assert_eq!(fail("[a]\n[a]"), (ErrorKind::DuplicateTable, 2, 1));
    assert_eq!(fail("a = 1\na.b = 2"), (ErrorKind::StructuralConflict, 2, 1));
    assert_eq!(fail("a = 1\na = 2"), (ErrorKind::DuplicateKey, 2, 1));
}

#[test]
fn columns_count_characters_not_bytes() {
    let err = toml_reader::parse("\"ключ\" = \"é\" x").unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidLiteral);
    assert_eq!((err.line, err.column), (1, 14));
}

#[test]
fn invalid_values() {
    for src in [
        "a = ",
        "a = tru",
        "a = trueish",
        "a = nan",
        "a = 1__000",
        "a = 1.",
        "a = .5",
        "a = 1979-13-01",
        "a = 1979-05-27T25:00:00",
        "a = 9223372036854775808",
        "a = 0x1F",
        "= 1",
    ] {
        let err = toml_reader::parse(src).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::InvalidLiteral | ErrorKind::UnexpectedEndOfInput),
            "{} gave {:?}",
            src,
            err
        );
    }
}

#[test]
fn display_includes_kind_and_position() {
    let err = toml_reader::parse("a = [1, 'x']").unwrap_err();
    let msg = err.to_string();
    assert!(msg.starts_with("type mismatch in array at line 1, column 9: "), "{}", msg);
}

#[test]
fn nesting_limit_is_configurable() {
    let deep = format!("a = {}1{}", "[".repeat(200), "]".repeat(200));
    let err = toml_reader::parse(&deep).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NestingTooDeep);

    let opts = Options {
        max_depth: 256,
        ..Options::default()
    };
    assert!(toml_reader::parse_with_options(&deep, &opts).is_ok());
}

struct Broken;

impl Read for Broken {
    fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
        Err(io::Error::other("disk on fire"))
    }
}

#[test]
fn reader_errors_are_wrapped() {
    let err = toml_reader::from_reader(Broken, &Options::default()).unwrap_err();
    assert!(matches!(err, Error::Io(_)));

    let err = toml_reader::from_reader("a = ".as_bytes(), &Options::default()).unwrap_err();
    match err {
        Error::Parse(e) => assert_eq!(e.kind, ErrorKind::UnexpectedEndOfInput),
        other => panic!("unexpected error {:?}", other),
    }

    let root = toml_reader::from_reader("a = 1\n".as_bytes(), &Options::default()).unwrap();
    assert_eq!(root.len(), 1);
}
