//! Hjson decoder.
//!
//! A single recursive-descent pass over the input bytes. Hjson strings
//! are context-terminated (a quoteless string runs to the end of its
//! line), so there is no separate lexing phase: the parser reads
//! characters through a one-byte cursor and decides at each position
//! what it is looking at.
//!
//! Comments are captured as byte spans by the whitespace scanner and
//! copied onto the surrounding [`Value`] nodes: the span before a value
//! becomes its `before` comment, a same-line trailing comment its
//! `after`, the span between a key's colon and its value the `key`
//! comment, and the contents of an empty `{}` or `[]` its `inside`.

use crate::error::Result;
use crate::number;
use crate::options::DecoderOptions;
use crate::utf8;
use crate::value::{CommentSlot, Map, Value};
use crate::Error;

/// Parse an Hjson document.
pub(crate) fn parse_str(input: &str, options: &DecoderOptions) -> Result<Value> {
    let mut p = Parser {
        data: input.as_bytes(),
        at: 0,
        ch: b' ',
        opt: options.clone(),
    };
    p.reset_at();
    p.root_value()
}

/// A comment span: a byte range of the source covering whitespace and
/// comments, flagged when it actually contains a comment.
#[derive(Clone, Copy, Default)]
struct CommentInfo {
    has_comment: bool,
    start: usize,
    end: usize,
}

struct Parser<'a> {
    data: &'a [u8],
    /// Index one past the current byte.
    at: usize,
    /// Current byte, 0 at end of input.
    ch: u8,
    opt: DecoderOptions,
}

fn is_punctuator_char(c: u8) -> bool {
    matches!(c, b'{' | b'}' | b'[' | b']' | b',' | b':')
}

fn is_white(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|&c| !is_white(c))
        .unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|&c| !is_white(c)).map_or(0, |i| i + 1);
    &bytes[start.min(end)..end]
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

impl<'a> Parser<'a> {
    // ========================================================================
    // Cursor
    // ========================================================================

    /// Advances to the next byte. Returns `false` at end of input, where
    /// `ch` becomes 0 but `at` still advances so that `at - 1` keeps
    /// pointing at the error position.
    fn next(&mut self) -> bool {
        if self.at < self.data.len() {
            self.ch = self.data[self.at];
            self.at += 1;
            true
        } else {
            self.ch = 0;
            self.at += 1;
            false
        }
    }

    /// Steps back one byte.
    fn prev(&mut self) -> bool {
        if self.at > 1 {
            self.at -= 1;
            self.ch = self.data.get(self.at - 1).copied().unwrap_or(0);
            true
        } else {
            false
        }
    }

    /// Returns the byte at `at + offset` without moving, 0 out of range.
    fn peek(&self, offset: isize) -> u8 {
        let pos = self.at as isize + offset;
        if pos >= 0 && (pos as usize) < self.data.len() {
            self.data[pos as usize]
        } else {
            0
        }
    }

    fn reset_at(&mut self) {
        self.at = 0;
        self.next();
    }

    /// Builds a syntax error pointing at the current position, with the
    /// 1-based line and column and the start of the offending line as
    /// context.
    fn err_at(&self, message: &str) -> Error {
        let pos = self.at.saturating_sub(1).min(self.data.len());
        let mut line_start = pos;
        while line_start > 0 && self.data[line_start - 1] != b'\n' {
            line_start -= 1;
        }
        let line = 1 + self.data[..line_start]
            .iter()
            .filter(|&&c| c == b'\n')
            .count();
        let sample_end = (line_start + 20).min(self.data.len());
        Error::Syntax {
            message: message.to_string(),
            line,
            column: pos - line_start + 1,
            context: lossy(&self.data[line_start..sample_end]),
        }
    }

    // ========================================================================
    // Whitespace and comments
    // ========================================================================

    /// Consumes whitespace, line comments (`#`, `//`) and block comments
    /// (`/* */`), returning the covered span.
    fn white(&mut self) -> CommentInfo {
        let mut ci = CommentInfo {
            has_comment: false,
            start: self.at - 1,
            end: 0,
        };

        while self.ch > 0 {
            while self.ch > 0 && self.ch <= b' ' {
                self.next();
            }
            if self.ch == b'#' || (self.ch == b'/' && self.peek(0) == b'/') {
                if self.opt.comments {
                    ci.has_comment = true;
                }
                while self.ch > 0 && self.ch != b'\n' {
                    self.next();
                }
            } else if self.ch == b'/' && self.peek(0) == b'*' {
                if self.opt.comments {
                    ci.has_comment = true;
                }
                self.next();
                self.next();
                while self.ch > 0 && !(self.ch == b'*' && self.peek(0) == b'/') {
                    self.next();
                }
                if self.ch > 0 {
                    self.next();
                    self.next();
                }
            } else {
                break;
            }
        }

        ci.end = self.at - 1;
        ci
    }

    /// Like [`white`](Self::white), but whitespace skipping stops at a
    /// newline. Captures a trailing comment on the same source line as
    /// the value that precedes it.
    fn get_comment_after(&mut self) -> CommentInfo {
        let mut ci = CommentInfo {
            has_comment: false,
            start: self.at - 1,
            end: 0,
        };

        while self.ch > 0 {
            while self.ch > 0 && self.ch <= b' ' && self.ch != b'\n' {
                self.next();
            }
            if self.ch == b'#' || (self.ch == b'/' && self.peek(0) == b'/') {
                if self.opt.comments {
                    ci.has_comment = true;
                }
                while self.ch > 0 && self.ch != b'\n' {
                    self.next();
                }
            } else if self.ch == b'/' && self.peek(0) == b'*' {
                if self.opt.comments {
                    ci.has_comment = true;
                }
                self.next();
                self.next();
                while self.ch > 0 && !(self.ch == b'*' && self.peek(0) == b'/') {
                    self.next();
                }
                if self.ch > 0 {
                    self.next();
                    self.next();
                }
            } else {
                break;
            }
        }

        ci.end = self.at - 1;
        ci
    }

    // ========================================================================
    // Comment attachment
    // ========================================================================

    fn span_text(&self, ci: &CommentInfo) -> String {
        let len = self.data.len();
        let start = ci.start.min(len);
        let end = ci.end.min(len).max(start);
        lossy(&self.data[start..end])
    }

    /// Copies a flagged span into a comment slot; unflagged spans attach
    /// nothing.
    fn set_comment(&self, node: &mut Value, slot: CommentSlot, ci: &CommentInfo) {
        if ci.has_comment {
            node.set_comment(slot, self.span_text(ci));
        }
    }

    /// Merges two adjacent spans: both flagged concatenate, one flagged
    /// wins alone, neither yields nothing.
    fn merged_span(&self, a: &CommentInfo, b: &CommentInfo) -> Option<String> {
        match (a.has_comment, b.has_comment) {
            (true, true) => Some(format!("{}{}", self.span_text(a), self.span_text(b))),
            (true, false) => Some(self.span_text(a)),
            (false, true) => Some(self.span_text(b)),
            (false, false) => None,
        }
    }

    fn set_comment2(&self, node: &mut Value, slot: CommentSlot, a: &CommentInfo, b: &CommentInfo) {
        if let Some(text) = self.merged_span(a, b) {
            node.set_comment(slot, text);
        }
    }

    /// Appends merged span text to the node's `after` comment, keeping
    /// whatever the node already collected there.
    fn append_comment_after(&self, node: &mut Value, a: &CommentInfo, b: &CommentInfo) {
        if let Some(text) = self.merged_span(a, b) {
            let existing = node.comment_after();
            if existing.is_empty() {
                node.set_comment_after(text);
            } else {
                let merged = format!("{}{}", existing, text);
                node.set_comment_after(merged);
            }
        }
    }

    // ========================================================================
    // Strings
    // ========================================================================

    /// Reads a quoted string. The cursor is on the opening `"` or `'`;
    /// an empty `''` followed by a third `'` switches to the multiline
    /// form when `allow_ml` is set.
    fn read_string(&mut self, allow_ml: bool) -> Result<String> {
        let mut res: Vec<u8> = Vec::new();
        let exit_ch = self.ch;

        while self.next() {
            if self.ch == exit_ch {
                self.next();
                if allow_ml && exit_ch == b'\'' && self.ch == b'\'' && res.is_empty() {
                    // ''' indicates a multiline string
                    self.next();
                    return self.read_ml_string();
                }
                return Ok(lossy(&res));
            }
            if self.ch == b'\\' {
                self.next();
                if self.ch == b'u' {
                    let cp = self.read_hex4()?;
                    // pair an adjacent surrogate escape, if any
                    let cp = if (0xd800..=0xdbff).contains(&cp)
                        && self.peek(0) == b'\\'
                        && self.peek(1) == b'u'
                    {
                        self.next();
                        self.next();
                        let lo = self.read_hex4()?;
                        if (0xdc00..=0xdfff).contains(&lo) {
                            0x1_0000 + ((cp - 0xd800) << 10) + (lo - 0xdc00)
                        } else {
                            utf8::encode(&mut res, cp)?;
                            lo
                        }
                    } else {
                        cp
                    };
                    utf8::encode(&mut res, cp)?;
                } else if let Some(ech) = escapee(self.ch) {
                    res.push(ech);
                } else {
                    return Err(self.err_at(&format!("Bad escape \\{}", self.ch as char)));
                }
            } else if self.ch == b'\n' || self.ch == b'\r' {
                return Err(self.err_at("Bad string containing newline"));
            } else {
                res.push(self.ch);
            }
        }

        Err(self.err_at("Bad string"))
    }

    /// Reads four hex digits of a `\u` escape.
    fn read_hex4(&mut self) -> Result<u32> {
        let mut cp = 0u32;
        for _ in 0..4 {
            self.next();
            let hex = match self.ch {
                b'0'..=b'9' => self.ch - b'0',
                b'a'..=b'f' => self.ch - b'a' + 0xa,
                b'A'..=b'F' => self.ch - b'A' + 0xa,
                _ => return Err(self.err_at(&format!("Bad \\u char {}", self.ch as char))),
            };
            cp = cp * 16 + hex as u32;
        }
        Ok(cp)
    }

    /// Reads a multiline string. The cursor is just past the opening
    /// `'''`; the opener's column sets the indentation stripped from
    /// every following line.
    fn read_ml_string(&mut self) -> Result<String> {
        let mut res: Vec<u8> = Vec::new();
        let mut triple = 0;

        let mut indent: usize = 0;
        loop {
            let c = self.peek(-(indent as isize) - 5);
            if c == 0 || c == b'\n' {
                break;
            }
            indent += 1;
        }

        // skip white up to the end of the opener's line
        while self.ch > 0 && self.ch <= b' ' && self.ch != b'\n' {
            self.next();
        }
        if self.ch == b'\n' {
            self.next();
            self.skip_indent(indent);
        }

        let mut last_lf = false;
        loop {
            if self.ch == 0 {
                return Err(self.err_at("Bad multiline string"));
            } else if self.ch == b'\'' {
                triple += 1;
                self.next();
                if triple == 3 {
                    if last_lf {
                        // the trailing line only positions the closer
                        res.pop();
                    }
                    return Ok(lossy(&res));
                }
                continue;
            }
            while triple > 0 {
                res.push(b'\'');
                triple -= 1;
                last_lf = false;
            }
            if self.ch == b'\n' {
                res.push(b'\n');
                last_lf = true;
                self.next();
                self.skip_indent(indent);
            } else {
                if self.ch != b'\r' {
                    res.push(self.ch);
                    last_lf = false;
                }
                self.next();
            }
        }
    }

    /// Skips up to `indent` whitespace bytes on the current line.
    fn skip_indent(&mut self, indent: usize) {
        let mut skip = indent;
        while self.ch > 0 && self.ch <= b' ' && self.ch != b'\n' && skip > 0 {
            skip -= 1;
            self.next();
        }
    }

    /// Reads a key name. Quotes are optional unless the key contains
    /// `{}[],:` or whitespace.
    fn read_keyname(&mut self) -> Result<String> {
        if self.ch == b'"' || self.ch == b'\'' {
            return self.read_string(false);
        }

        let mut name: Vec<u8> = Vec::new();
        let start = self.at;
        let mut space: Option<usize> = None;
        loop {
            if self.ch == b':' {
                if name.is_empty() {
                    return Err(
                        self.err_at("Found ':' but no key name (for an empty key name use quotes)")
                    );
                }
                if let Some(space) = space {
                    if space != name.len() {
                        self.at = start + space;
                        return Err(
                            self.err_at("Found whitespace in your key name (use quotes to include)")
                        );
                    }
                }
                return Ok(lossy(&name));
            } else if self.ch <= b' ' {
                if self.ch == 0 {
                    return Err(
                        self.err_at("Found EOF while looking for a key name (check your syntax)")
                    );
                }
                if space.is_none() {
                    space = Some(name.len());
                }
            } else {
                if is_punctuator_char(self.ch) {
                    return Err(self.err_at(&format!(
                        "Found '{}' where a key name was expected (check your syntax or use quotes if the key name includes {{}}[],: or whitespace)",
                        self.ch as char
                    )));
                }
                name.push(self.ch);
            }
            self.next();
        }
    }

    /// Reads a quoteless token: a string running to the end of the line,
    /// or one of `true`/`false`/`null`/number when the token up to a
    /// terminator spells exactly that.
    fn read_tfnns(&mut self) -> Result<Value> {
        if is_punctuator_char(self.ch) {
            return Err(self.err_at(&format!(
                "Found a punctuator character '{}' when expecting a quoteless string (check your syntax)",
                self.ch as char
            )));
        }
        let chf = self.ch;
        let mut value: Vec<u8> = vec![self.ch];

        loop {
            self.next();
            let is_eol = self.ch == b'\r' || self.ch == b'\n' || self.ch == 0;
            if is_eol
                || self.ch == b','
                || self.ch == b'}'
                || self.ch == b']'
                || self.ch == b'#'
                || (self.ch == b'/' && (self.peek(0) == b'/' || self.peek(0) == b'*'))
            {
                let trimmed = trim(&value);
                match chf {
                    b'f' if trimmed == b"false" => return Ok(Value::from(false)),
                    b'n' if trimmed == b"null" => return Ok(Value::null()),
                    b't' if trimmed == b"true" => return Ok(Value::from(true)),
                    _ => {
                        if chf == b'-' || chf.is_ascii_digit() {
                            if let Some(n) = number::try_parse(trimmed, false) {
                                return Ok(n);
                            }
                        }
                    }
                }
                if is_eol {
                    return Ok(Value::from(lossy(trimmed)));
                }
            }
            value.push(self.ch);
        }
    }

    // ========================================================================
    // Containers
    // ========================================================================

    /// Reads an array. The cursor is on the `[`.
    fn read_array(&mut self) -> Result<Value> {
        let mut array: Vec<Value> = Vec::new();

        self.next();
        let ci_initial = self.white();

        if self.ch == b']' {
            let mut empty = Value::from(array);
            self.set_comment(&mut empty, CommentSlot::Inside, &ci_initial);
            self.next();
            return Ok(empty);
        }

        let mut ci_before = ci_initial;
        let mut ci_extra = CommentInfo::default();
        while self.ch > 0 {
            let mut elem = self.read_value()?;
            self.set_comment2(&mut elem, CommentSlot::Before, &ci_before, &ci_extra);
            let ci_after = self.white();
            // the comma is optional and trailing commas are allowed
            if self.ch == b',' {
                self.next();
                // a comment between the value and its comma still counts
                // as the value's trailing comment
                ci_extra = self.white();
            } else {
                ci_extra = CommentInfo::default();
            }
            if self.ch == b']' {
                self.append_comment_after(&mut elem, &ci_after, &ci_extra);
                array.push(elem);
                self.next();
                return Ok(Value::from(array));
            }
            array.push(elem);
            ci_before = ci_after;
        }

        Err(self.err_at("End of input while parsing an array (did you forget a closing ']'?)"))
    }

    /// Reads an object. With `without_braces`, members run to the end of
    /// the input instead of a closing `}`.
    fn read_object(&mut self, without_braces: bool) -> Result<Value> {
        let mut object = Map::new();

        if !without_braces {
            // cursor is on the '{'
            self.next();
        }

        let ci_initial = self.white();

        if self.ch == b'}' && !without_braces {
            let mut empty = Value::from(object);
            self.set_comment(&mut empty, CommentSlot::Inside, &ci_initial);
            self.next();
            return Ok(empty);
        }

        let mut ci_before = ci_initial;
        let mut ci_extra = CommentInfo::default();
        while self.ch > 0 {
            let key = self.read_keyname()?;
            let ci_key = self.white();
            if self.ch != b':' {
                return Err(self.err_at(&format!("Expected ':' instead of '{}'", self.ch as char)));
            }
            self.next();

            let mut elem = self.read_value()?;
            self.set_comment(&mut elem, CommentSlot::Key, &ci_key);
            if !elem.comment_before().is_empty() {
                // comments between the colon and the value belong to the
                // key slot
                let moved = format!("{}{}", elem.comment_key(), elem.comment_before());
                elem.set_comment_key(moved);
                elem.set_comment_before(String::new());
            }
            self.set_comment2(&mut elem, CommentSlot::Before, &ci_before, &ci_extra);

            let ci_after = self.white();
            // the comma is optional and trailing commas are allowed
            if self.ch == b',' {
                self.next();
                ci_extra = self.white();
            } else {
                ci_extra = CommentInfo::default();
            }
            if self.ch == b'}' && !without_braces {
                self.append_comment_after(&mut elem, &ci_after, &ci_extra);
                // duplicate keys overwrite the previous value
                object.insert(key, elem);
                self.next();
                return Ok(Value::from(object));
            }
            object.insert(key, elem);
            ci_before = ci_after;
        }

        if without_braces {
            if object.is_empty() {
                let mut empty = Value::from(object);
                self.set_comment(&mut empty, CommentSlot::Inside, &ci_before);
                return Ok(empty);
            }
            // trailing comments belong to the last member
            let last = object.len() - 1;
            if let Some((_, elem)) = object.get_index_mut(last) {
                self.append_comment_after(elem, &ci_before, &ci_extra);
            }
            return Ok(Value::from(object));
        }
        Err(self.err_at("End of input while parsing an object (did you forget a closing '}'?)"))
    }

    // ========================================================================
    // Values
    // ========================================================================

    /// Reads any Hjson value: object, array, string, number or word.
    fn read_value(&mut self) -> Result<Value> {
        let ci_before = self.white();

        let mut ret = match self.ch {
            b'{' => self.read_object(false)?,
            b'[' => self.read_array()?,
            b'"' | b'\'' => Value::from(self.read_string(true)?),
            _ => {
                let v = self.read_tfnns()?;
                // back up over the whitespace before a same-line comment
                // so it groups with this value, not the container
                if self.ch == b'#' || self.ch == b'/' {
                    while self.prev() && is_white(self.ch) {}
                    self.next();
                }
                v
            }
        };

        let ci_after = self.get_comment_after();
        self.set_comment(&mut ret, CommentSlot::Before, &ci_before);
        self.set_comment(&mut ret, CommentSlot::After, &ci_after);

        Ok(ret)
    }

    /// Consumes trailing whitespace and comments; anything left is
    /// trailing garbage.
    fn has_trailing(&mut self) -> (bool, CommentInfo) {
        let ci = self.white();
        (self.ch > 0, ci)
    }

    /// Parses the document root. Braces for a root object are optional,
    /// and a document may also be a single value of any kind.
    fn root_value(&mut self) -> Result<Value> {
        let ci_before = self.white();
        let mut ci_extra = CommentInfo::default();
        let mut ret: Option<Value> = None;
        let mut held_err: Option<Error> = None;

        match self.ch {
            b'{' => {
                let v = self.read_object(false)?;
                let (trailing, ci) = self.has_trailing();
                if trailing {
                    return Err(self.err_at("Syntax error, found trailing characters"));
                }
                ci_extra = ci;
                ret = Some(v);
            }
            b'[' => {
                let v = self.read_array()?;
                let (trailing, ci) = self.has_trailing();
                if trailing {
                    return Err(self.err_at("Syntax error, found trailing characters"));
                }
                ci_extra = ci;
                ret = Some(v);
            }
            _ => {}
        }

        if ret.is_none() {
            // assume a root object without braces
            match self.read_object(true) {
                Ok(v) => {
                    let (trailing, ci) = self.has_trailing();
                    if !trailing {
                        if v.as_map().map_or(false, |m| m.is_empty()) {
                            // nothing but whitespace and comments
                            return Err(self.err_at("Syntax error, found no value"));
                        }
                        ci_extra = ci;
                        ret = Some(v);
                    }
                }
                Err(e) => held_err = Some(e),
            }
        }

        if ret.is_none() {
            // maybe a single value instead (true/false/null/number/string)
            self.reset_at();
            let v = self.read_value()?;
            let (trailing, ci) = self.has_trailing();
            if !trailing {
                ci_extra = ci;
                ret = Some(v);
            }
        }

        match ret {
            Some(mut ret) => {
                self.set_comment(&mut ret, CommentSlot::Before, &ci_before);
                if ci_extra.has_comment {
                    let merged = format!("{}{}", ret.comment_after(), self.span_text(&ci_extra));
                    ret.set_comment_after(merged);
                }
                Ok(ret)
            }
            None => match held_err {
                Some(e) => Err(e),
                None => Err(self.err_at("Syntax error, found trailing characters")),
            },
        }
    }
}

fn escapee(c: u8) -> Option<u8> {
    match c {
        b'"' | b'\'' | b'\\' | b'/' => Some(c),
        b'b' => Some(0x08),
        b'f' => Some(0x0c),
        b'n' => Some(b'\n'),
        b'r' => Some(b'\r'),
        b't' => Some(b'\t'),
        _ => None,
    }
}
