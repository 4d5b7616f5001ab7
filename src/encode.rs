//! Hjson encoder.
//!
//! Serializes a [`Value`] tree, choosing for every string the safest of
//! three renderings: bare (quoteless), double-quoted (with escape
//! substitution when needed), or triple-quoted multiline. The choice
//! inverts the decoder's context-termination rules: a string must be
//! quoted whenever emitting it bare would make it re-parse as something
//! else (a number, a keyword, a comment, a punctuator) or swallow its
//! surroundings.
//!
//! With `comments` enabled, the comment strings stored on each node are
//! written back out in place of the encoder's own line breaks.

use crate::number;
use crate::options::EncoderOptions;
use crate::utf8;
use crate::value::{Repr, Value};

/// Encode a value tree.
pub(crate) fn encode_value(value: &Value, options: &EncoderOptions) -> String {
    let mut opt = options.clone();
    if opt.separator {
        opt.quote_always = true;
    }

    let mut e = Encoder {
        opt,
        out: String::new(),
        indent: 0,
    };
    e.write_value(value, true, "", true, false);
    e.out
}

struct Encoder {
    opt: EncoderOptions,
    out: String,
    indent: usize,
}

impl Encoder {
    fn write_indent(&mut self, indent: usize) {
        self.out.push_str(&self.opt.eol);
        for _ in 0..indent {
            self.out.push_str(&self.opt.indent_by);
        }
    }

    /// Emits one value, with its comments when enabled.
    ///
    /// `no_indent` is set for the first thing on a fresh line (the
    /// container already placed the newline); `separator` is the space
    /// between a key's colon and its value.
    fn write_value(
        &mut self,
        value: &Value,
        no_indent: bool,
        separator: &str,
        is_root_object: bool,
        is_obj_element: bool,
    ) {
        if self.opt.comments {
            let lead = if is_obj_element {
                value.comment_key()
            } else {
                value.comment_before()
            };
            self.out.push_str(lead);
        }

        match &value.repr {
            Repr::Null => {
                self.out.push_str(separator);
                self.out.push_str("null");
            }
            Repr::Bool(b) => {
                self.out.push_str(separator);
                self.out.push_str(if *b { "true" } else { "false" });
            }
            Repr::Int(n) => {
                self.out.push_str(separator);
                self.out.push_str(&n.to_string());
            }
            Repr::Double(d) => {
                self.out.push_str(separator);
                if d.is_nan() || d.is_infinite() {
                    self.out.push_str("null");
                } else if !self.opt.allow_minus_zero && *d == 0.0 && d.is_sign_negative() {
                    self.out.push('0');
                } else {
                    self.out.push_str(&format_double(*d));
                }
            }
            Repr::String(s) => {
                let has_comment_after = self.opt.comments && !value.comment_after().is_empty();
                self.quote(s, separator, is_root_object, has_comment_after);
            }
            Repr::Vector(arr) if arr.is_empty() => {
                self.out.push_str(separator);
                if self.opt.comments {
                    self.out.push('[');
                    self.out.push_str(value.comment_inside());
                    self.out.push(']');
                } else {
                    self.out.push_str("[]");
                }
            }
            Repr::Vector(arr) => {
                let indent1 = self.indent;
                self.indent += 1;

                if !no_indent
                    && !self.opt.braces_same_line
                    && (!self.opt.comments || value.comment_before().is_empty())
                {
                    self.write_indent(indent1);
                } else {
                    self.out.push_str(separator);
                }
                self.out.push('[');

                let mut is_first = true;
                for elem in arr {
                    if is_first {
                        is_first = false;
                    } else if self.opt.separator {
                        self.out.push(',');
                    }
                    if !self.opt.comments || elem.comment_before().is_empty() {
                        self.write_indent(self.indent);
                    }
                    self.write_value(elem, true, "", false, false);
                }

                if !self.opt.comments || arr.last().map_or(true, |l| l.comment_after().is_empty())
                {
                    self.write_indent(indent1);
                }
                self.out.push(']');
                self.indent = indent1;
            }
            Repr::Map(m) if m.is_empty() => {
                self.out.push_str(separator);
                if self.opt.comments {
                    self.out.push('{');
                    self.out.push_str(value.comment_inside());
                    self.out.push('}');
                } else {
                    self.out.push_str("{}");
                }
            }
            Repr::Map(m) => {
                let indent1 = self.indent;
                let braced = !self.opt.omit_root_braces || !is_root_object;
                if braced {
                    self.indent += 1;
                    if !no_indent && !self.opt.braces_same_line {
                        self.write_indent(indent1);
                    } else {
                        self.out.push_str(separator);
                    }
                    self.out.push('{');
                }

                let mut is_first = true;
                if self.opt.preserve_insertion_order {
                    for (key, elem) in m {
                        self.obj_elem(key, elem, &mut is_first, is_root_object);
                    }
                } else {
                    let mut members: Vec<(&String, &Value)> = m.iter().collect();
                    members.sort_by_key(|&(key, _)| key);
                    for (key, elem) in members {
                        self.obj_elem(key, elem, &mut is_first, is_root_object);
                    }
                }

                if braced {
                    self.write_indent(indent1);
                    self.out.push('}');
                }
                self.indent = indent1;
            }
        }

        if self.opt.comments {
            self.out.push_str(value.comment_after());
        }
    }

    /// Emits one map member: key, colon, value.
    fn obj_elem(&mut self, key: &str, value: &Value, is_first: &mut bool, is_root_object: bool) {
        let has_comment = self.opt.comments && !value.comment_before().is_empty();

        if *is_first {
            *is_first = false;
            if (!self.opt.omit_root_braces || !is_root_object) && !has_comment {
                self.write_indent(self.indent);
            }
        } else if !has_comment {
            if self.opt.separator {
                self.out.push(',');
            }
            self.write_indent(self.indent);
        }

        if has_comment {
            self.out.push_str(value.comment_before());
        }

        self.quote_name(key);
        self.out.push(':');
        let separator = if self.opt.comments && !value.comment_key().is_empty() {
            ""
        } else {
            " "
        };
        self.write_value(value, false, separator, false, true);
    }

    /// Emits a string in the safest of the three renderings. A string
    /// that would re-parse as a number, keyword, comment or punctuator,
    /// or that has leading/trailing whitespace, must be quoted.
    fn quote(&mut self, value: &str, separator: &str, is_root_object: bool, has_comment_after: bool) {
        if value.is_empty() {
            self.out.push_str(separator);
            self.out.push_str("\"\"");
        } else if self.opt.quote_always
            || needs_quotes(value)
            || number::starts_with_number(value.as_bytes())
            || starts_with_keyword(value)
            || has_comment_after
        {
            // No control characters, quotes or backslashes: plain quotes
            // suffice. Otherwise prefer the multiline format over escape
            // sequences where it is allowed.
            if !needs_escape(value) {
                self.out.push_str(separator);
                self.out.push('"');
                self.out.push_str(value);
                self.out.push('"');
            } else if !self.opt.quote_always && !needs_escape_ml(value) && !is_root_object {
                self.ml_string(value, separator);
            } else {
                self.out.push_str(separator);
                self.out.push('"');
                self.quote_replace(value);
                self.out.push('"');
            }
        } else {
            // quoteless
            self.out.push_str(separator);
            self.out.push_str(value);
        }
    }

    /// Emits a key, quoting when it contains characters the key grammar
    /// reserves.
    fn quote_name(&mut self, name: &str) {
        if name.is_empty() {
            self.out.push_str("\"\"");
        } else if self.opt.quote_keys || needs_escape_name(name) {
            self.out.push('"');
            if needs_escape(name) {
                self.quote_replace(name);
            } else {
                self.out.push_str(name);
            }
            self.out.push('"');
        } else {
            self.out.push_str(name);
        }
    }

    /// Emits `text` with every offending byte replaced: the short
    /// escapes where one exists, `\uXXXX` otherwise.
    fn quote_replace(&mut self, text: &str) {
        let bytes = text.as_bytes();
        let mut start = 0;
        let mut i = 0;

        while i < bytes.len() {
            let match_len = match bytes[i] {
                b'\\' | b'"' | 0x00..=0x1f => 1,
                _ => format_control_len(&bytes[i..]),
            };
            if match_len == 0 {
                i += 1;
                continue;
            }

            self.out.push_str(&text[start..i]);
            match meta(bytes[i]) {
                Some(replacement) => self.out.push_str(replacement),
                None => {
                    let mut rest = &bytes[i..i + match_len];
                    while !rest.is_empty() {
                        match utf8::decode(rest) {
                            Some((cp, n)) => {
                                self.out.push_str(&format!("\\u{:04x}", cp));
                                rest = &rest[n..];
                            }
                            None => {
                                // not UTF-8, just dump it
                                self.out.push_str(&String::from_utf8_lossy(rest));
                                break;
                            }
                        }
                    }
                }
            }

            i += match_len;
            start = i;
        }

        self.out.push_str(&text[start..]);
    }

    /// Wraps a string in the `'''` multiline format.
    fn ml_string(&mut self, value: &str, separator: &str) {
        let breaks: Vec<usize> = value
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n' || b == b'\r')
            .map(|(i, _)| i)
            .collect();

        if breaks.is_empty() {
            // A single line. The multiline format still pays off: no
            // backslash escaping (e.g. for regexes).
            self.out.push_str(separator);
            self.out.push_str("'''");
            self.out.push_str(value);
        } else {
            let indent1 = self.indent + 1;
            self.write_indent(indent1);
            self.out.push_str("'''");

            let mut start = 0;
            for &pos in &breaks {
                let line_indent = if pos == start { 0 } else { indent1 };
                self.write_indent(line_indent);
                if pos > start {
                    self.out.push_str(&value[start..pos]);
                }
                start = pos + 1;
            }

            if start < value.len() {
                self.write_indent(indent1);
                self.out.push_str(&value[start..]);
            } else {
                // trailing line feed
                self.write_indent(0);
            }

            self.write_indent(indent1);
        }

        self.out.push_str("'''");
    }
}

fn format_double(d: f64) -> String {
    let mut s = format!("{}", d);
    // keep the value a double on re-parse
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        s.push_str(".0");
    }
    s
}

// table of character substitutions
fn meta(c: u8) -> Option<&'static str> {
    match c {
        0x08 => Some("\\b"),
        b'\t' => Some("\\t"),
        b'\n' => Some("\\n"),
        0x0c => Some("\\f"),
        b'\r' => Some("\\r"),
        b'"' => Some("\\\""),
        b'\\' => Some("\\\\"),
        _ => None,
    }
}

fn is_space_byte(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

/// Length of the format-control UTF-8 sequence at the start of `bytes`,
/// or 0. These code points must be escaped even though they render as
/// printable (or invisible) text.
fn format_control_len(bytes: &[u8]) -> usize {
    match bytes {
        // U+00AD soft hyphen
        [0xc2, 0xad, ..] => 2,
        // U+0600..U+0604
        [0xd8, 0x80..=0x84, ..] => 2,
        // U+070F
        [0xdc, 0x8f, ..] => 2,
        // U+17B4..U+17B5
        [0xe1, 0x9e, 0xb4..=0xb5, ..] => 3,
        // U+200C..U+200F
        [0xe2, 0x80, 0x8c..=0x8f, ..] => 3,
        // U+2028..U+202F
        [0xe2, 0x80, 0xa8..=0xaf, ..] => 3,
        // U+2060..U+206F
        [0xe2, 0x81, 0xa0..=0xaf, ..] => 3,
        // U+FEFF byte order mark
        [0xef, 0xbb, 0xbf, ..] => 3,
        // U+FFF0..U+FFFF
        [0xef, 0xbf, 0xb0..=0xbf, ..] => 3,
        _ => 0,
    }
}

/// Tests if the string can be written without escapes.
fn needs_escape(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' | b'"' | 0x00..=0x1f => return true,
            _ => {
                if format_control_len(&bytes[i..]) > 0 {
                    return true;
                }
            }
        }
        i += 1;
    }
    false
}

/// Tests if the string cannot be written as a quoteless string.
fn needs_quotes(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.first().copied() {
        Some(c) if is_space_byte(c) => return true,
        Some(b'"' | b'\'' | b'#' | b'{' | b'}' | b'[' | b']' | b':' | b',') => return true,
        _ => {}
    }
    if bytes.starts_with(b"/*") || bytes.starts_with(b"//") {
        return true;
    }
    if bytes.last().map_or(false, |&c| is_space_byte(c)) {
        return true;
    }

    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] <= 0x1f || format_control_len(&bytes[i..]) > 0 {
            return true;
        }
        i += 1;
    }
    false
}

/// Tests if the string cannot be written in the multiline format.
fn needs_escape_ml(s: &str) -> bool {
    if s.contains("'''") {
        return true;
    }
    let bytes = s.as_bytes();
    if bytes.iter().all(|&c| is_space_byte(c)) {
        return true;
    }

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x00..=0x08 | 0x0b | 0x0c | 0x0e..=0x1f => return true,
            _ => {
                if format_control_len(&bytes[i..]) > 0 {
                    return true;
                }
            }
        }
        i += 1;
    }
    false
}

/// Tests if the string starts with `true`, `false` or `null`, optionally
/// followed by a separator or comment. Emitted bare it would re-parse as
/// the keyword.
fn starts_with_keyword(s: &str) -> bool {
    let rest = if let Some(rest) = s.strip_prefix("true") {
        rest
    } else if let Some(rest) = s.strip_prefix("false") {
        rest
    } else if let Some(rest) = s.strip_prefix("null") {
        rest
    } else {
        return false;
    };

    let bytes = rest.as_bytes();
    let mut i = 0;
    while i < bytes.len() && is_space_byte(bytes[i]) {
        i += 1;
    }
    if i == bytes.len() {
        return true;
    }
    matches!(bytes[i], b',' | b']' | b'}' | b'#')
        || bytes[i..].starts_with(b"//")
        || bytes[i..].starts_with(b"/*")
}

/// Tests if a key needs quotes.
fn needs_escape_name(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b',' | b'{' | b'[' | b'}' | b']' | b':' | b'#' | b'"' | b'\'' => return true,
            b'/' => {
                if bytes.get(i + 1) == Some(&b'/') || bytes.get(i + 1) == Some(&b'*') {
                    return true;
                }
            }
            c if is_space_byte(c) => return true,
            _ => {}
        }
        i += 1;
    }
    false
}
