#![no_main]
use libfuzzer_sys::fuzz_target;
use toml_reader::{Options, parse_with_options, to_json_value};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let strict = Options::default();
        let lenient = Options { strict_tables: false, ..Options::default() };

        match parse_with_options(s, &strict) {
            Ok(root) => {
                let _ = to_json_value(&root);
                // Anything strict accepts, lenient accepts identically.
                assert_eq!(parse_with_options(s, &lenient).ok(), Some(root));
            }
            Err(e) => {
                assert!(e.line >= 1 && e.column >= 1, "bad position: {:?}", e);
                let _ = parse_with_options(s, &lenient);
            }
        }
    }
});
