#![cfg(feature = "json")]
use serde_json::json;

#[test]
fn document_to_json() -> Result<(), Box<dyn std::error::Error>> {
    let src = "\
name = \"demo\"
when = 1979-05-27
ratio = 0.25
tags = ['a', 'b']

[limits]
max = 10

[[item]]
id = 1
[[item]]
id = 2
";
    let root = toml_reader::parse(src)?;
    let v = toml_reader::to_json_value(&root);
    assert_eq!(
        v,
        json!({
            "name": "demo",
            "when": "1979-05-27",
            "ratio": 0.25,
            "tags": ["a", "b"],
            "limits": {"max": 10},
            "item": [{"id": 1}, {"id": 2}]
        })
    );
    let keys: Vec<&String> = v.as_object().map(|o| o.keys().collect()).unwrap_or_default();
    assert_eq!(keys, ["name", "when", "ratio", "tags", "limits", "item"]);
    Ok(())
}

#[test]
fn json_value_through_serde() -> Result<(), Box<dyn std::error::Error>> {
    let v: serde_json::Value =
        toml_reader::from_str("a.b = [1, 2]\nc = true\n", &toml_reader::Options::default())?;
    assert_eq!(v, json!({"a": {"b": [1, 2]}, "c": true}));
    Ok(())
}
