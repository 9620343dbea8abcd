//! Integers, floats and datetimes, told apart by a single forward scan.

use crate::datetime::Datetime;
use crate::decode::scanner::Scanner;
use crate::decode::{Fault, Parsed};
use crate::error::ErrorKind;
use crate::number::has_forbidden_leading_zeros;
use crate::value::Value;

/// Characters that end a bare numeric or datetime token. They are not consumed.
const TERMINATORS: &[char] = &[',', ']', '}', ' ', '\t', '\n', '\r', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Candidate {
    Integer,
    Float,
    Datetime,
}

/// Reads the token under the cursor as an integer, a float or a datetime.
pub fn read_number_or_datetime(sc: &mut Scanner<'_>) -> Parsed<Value> {
    let start = sc.offset();
    let text = sc.consume_until(TERMINATORS);
    let invalid = |why: &str| {
        Fault::new(
            ErrorKind::InvalidLiteral,
            start,
            format!("invalid value `{}`: {}", text, why),
        )
    };
    match classify(text) {
        Some(Candidate::Integer) => parse_integer(text).map(Value::Integer).map_err(invalid),
        Some(Candidate::Float) => parse_float(text).map(Value::Float).map_err(invalid),
        Some(Candidate::Datetime) => Datetime::parse(text)
            .map(Value::Datetime)
            .ok_or_else(|| invalid("not a valid date or date-time")),
        None => Err(invalid("not a number or a date")),
    }
}

fn classify(text: &str) -> Option<Candidate> {
    let (mut integer, mut float, mut datetime) = (true, true, true);
    let mut seen_colon = false;
    let mut prev = None;
    for (i, c) in text.char_indices() {
        match c {
            ':' | 'T' | 'Z' => {
                integer = false;
                float = false;
                seen_colon |= c == ':';
            }
            '.' => {
                integer = false;
                if !seen_colon {
                    datetime = false;
                }
            }
            'e' | 'E' => {
                integer = false;
                datetime = false;
            }
            '_' => datetime = false,
            // A sign past the first character is only numeric right after an exponent.
            '-' | '+' if i > 0 && !matches!(prev, Some('e' | 'E')) => {
                integer = false;
                float = false;
            }
            _ => {}
        }
        prev = Some(c);
    }
    if integer {
        Some(Candidate::Integer)
    } else if float {
        Some(Candidate::Float)
    } else if datetime {
        Some(Candidate::Datetime)
    } else {
        None
    }
}

fn parse_integer(text: &str) -> Result<i64, &'static str> {
    check_digit_groups(text)?;
    let digits = text.replace('_', "");
    let unsigned = digits.strip_prefix(['+', '-']).unwrap_or(&digits);
    if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
        return Err("not a decimal integer");
    }
    digits
        .parse::<i64>()
        .map_err(|_| "integer does not fit in 64 bits")
}

fn parse_float(text: &str) -> Result<f64, &'static str> {
    check_digit_groups(text)?;
    let digits = text.replace('_', "");
    if !is_float_literal(&digits) {
        return Err("malformed float");
    }
    match digits.parse::<f64>() {
        Ok(f) if f.is_finite() => Ok(f),
        Ok(_) => Err("float is out of range"),
        Err(_) => Err("malformed float"),
    }
}

fn check_digit_groups(text: &str) -> Result<(), &'static str> {
    if has_forbidden_leading_zeros(text) {
        return Err("leading zeros are not allowed");
    }
    let b = text.as_bytes();
    for (i, &byte) in b.iter().enumerate() {
        if byte == b'_' {
            let before = i > 0 && b[i - 1].is_ascii_digit();
            let after = b.get(i + 1).is_some_and(u8::is_ascii_digit);
            if !(before && after) {
                return Err("underscores must sit between digits");
            }
        }
    }
    Ok(())
}

/// `[+-] digits [. digits] [(e|E) [+-] digits]`, with a fraction or an exponent.
fn is_float_literal(s: &str) -> bool {
    let b = s.strip_prefix(['+', '-']).unwrap_or(s).as_bytes();
    let count_digits = |from: usize| b[from..].iter().take_while(|c| c.is_ascii_digit()).count();

    let mut i = count_digits(0);
    if i == 0 {
        return false;
    }
    let mut has_fraction_or_exponent = false;
    if b.get(i) == Some(&b'.') {
        let n = count_digits(i + 1);
        if n == 0 {
            return false;
        }
        i += 1 + n;
        has_fraction_or_exponent = true;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let n = count_digits(i);
        if n == 0 {
            return false;
        }
        i += n;
        has_fraction_or_exponent = true;
    }
    has_fraction_or_exponent && i == b.len()
}
