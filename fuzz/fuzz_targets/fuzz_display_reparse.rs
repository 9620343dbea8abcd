#![no_main]
use libfuzzer_sys::{arbitrary, fuzz_target};
use arbitrary::{Arbitrary, Unstructured};
use toml_reader::{Table, Value};

const MAX_DEPTH: usize = 6;
const MAX_ARRAY_SIZE: usize = 8;
const MAX_TABLE_SIZE: usize = 8;

#[derive(Arbitrary, Debug)]
struct FuzzValue {
    choice: u8,
}

impl FuzzValue {
    fn to_value(&self, u: &mut Unstructured, depth: usize) -> arbitrary::Result<Value> {
        let choice = if depth >= MAX_DEPTH { self.choice % 4 } else { self.choice % 6 };
        Ok(match choice {
            0 => Value::Boolean(u.arbitrary()?),
            1 => Value::Integer(u.arbitrary()?),
            2 => {
                let f: f64 = u.arbitrary()?;
                Value::Float(if f.is_finite() { f } else { 0.5 })
            }
            3 => Value::String(u.arbitrary()?),
            4 => {
                // Arrays stay homogeneous: every element reuses the first choice.
                let size = u.int_in_range(0..=MAX_ARRAY_SIZE)?;
                let kind = FuzzValue { choice: u.arbitrary()? };
                let mut items = Vec::with_capacity(size);
                for _ in 0..size {
                    items.push(kind.to_value(u, depth + 1)?);
                }
                if items.windows(2).any(|w| w[0].family() != w[1].family()) {
                    items.truncate(1);
                }
                Value::Array(items)
            }
            _ => {
                let size = u.int_in_range(0..=MAX_TABLE_SIZE)?;
                let mut table = Table::new();
                for _ in 0..size {
                    let key: String = u.arbitrary()?;
                    let fv: FuzzValue = u.arbitrary()?;
                    table.insert(key, fv.to_value(u, depth + 1)?);
                }
                Value::Table(table)
            }
        })
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(fv) = FuzzValue::arbitrary(&mut u) else { return };
    let Ok(value) = fv.to_value(&mut u, 0) else { return };

    let src = format!("v = {}\n", value);
    let root = match toml_reader::parse(&src) {
        Ok(root) => root,
        Err(e) => panic!("display output failed to parse: {}\n{}", e, src),
    };
    assert_eq!(root.get("v"), Some(&value), "\n{}", src);
});
