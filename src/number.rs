//! Hjson number recognition.
//!
//! Hjson numbers follow the JSON grammar: an optional minus, an integer
//! part without leading zeros, an optional fraction, an optional
//! exponent. Anything else (including `0123` or a trailing `.`) is not a
//! number and falls back to a quoteless string in the decoder.

use crate::value::Value;

/// Attempts to parse `text` (already trimmed) as an Hjson number.
///
/// Returns an `Int` value when the text has no fraction or exponent and
/// fits `i64`, otherwise a `Double`. With `stop_at_next`, trailing
/// whitespace followed by a `,`, `]`, `}` or a comment opener is
/// tolerated after the number; this is how the encoder probes whether a
/// string would re-parse as a number.
pub(crate) fn try_parse(text: &[u8], stop_at_next: bool) -> Option<Value> {
    let at = |i: usize| -> u8 { text.get(i).copied().unwrap_or(0) };
    let mut i = 0;
    let mut is_double = false;

    if at(i) == b'-' {
        i += 1;
    }

    if at(i) == b'0' {
        i += 1;
    } else if at(i).is_ascii_digit() {
        while at(i).is_ascii_digit() {
            i += 1;
        }
    } else {
        return None;
    }

    if at(i) == b'.' {
        is_double = true;
        i += 1;
        if !at(i).is_ascii_digit() {
            return None;
        }
        while at(i).is_ascii_digit() {
            i += 1;
        }
    }

    if at(i) == b'e' || at(i) == b'E' {
        is_double = true;
        i += 1;
        if at(i) == b'+' || at(i) == b'-' {
            i += 1;
        }
        if !at(i).is_ascii_digit() {
            return None;
        }
        while at(i).is_ascii_digit() {
            i += 1;
        }
    }

    let end = i;
    while at(i) > 0 && at(i) <= b' ' {
        i += 1;
    }

    if stop_at_next && i < text.len() {
        let c = at(i);
        if c == b','
            || c == b'}'
            || c == b']'
            || c == b'#'
            || (c == b'/' && (at(i + 1) == b'/' || at(i + 1) == b'*'))
        {
            i = text.len();
        }
    }

    if i < text.len() {
        return None;
    }

    let digits = std::str::from_utf8(&text[..end]).ok()?;
    if is_double {
        digits.parse::<f64>().ok().map(Value::from)
    } else {
        match digits.parse::<i64>() {
            Ok(n) => Some(Value::from(n)),
            // out of i64 range, keep the value as a double
            Err(_) => digits.parse::<f64>().ok().map(Value::from),
        }
    }
}

/// Returns `true` if `text` begins with something that parses as a
/// number, possibly followed by a separator or comment. Such strings
/// must be quoted by the encoder.
pub(crate) fn starts_with_number(text: &[u8]) -> bool {
    try_parse(text, true).is_some()
}
