//! Hjson parser and encoder.
//!
//! Hjson is a human-oriented superset of JSON: keys and strings may be
//! written without quotes, commas are optional, comments are allowed,
//! and the braces around a root object may be omitted. This crate reads
//! Hjson into a [`Value`] tree and writes a tree back out as Hjson (or
//! strict JSON via [`encode_json`]).
//!
//! # Pipeline
//!
//! Decoding is a single recursive-descent pass: Hjson strings terminate
//! on context (an unquoted string runs to the end of its line), so the
//! lexer cannot be separated from the grammar. Encoding walks the tree
//! and decides per string among three renderings: bare, quoted, or
//! triple-quoted multiline.
//!
//! Comments survive a round trip. The decoder attaches the text around
//! each value to the produced node (see [`Value::comment_before`] and
//! friends) and the encoder writes it back when
//! [`EncoderOptions::comments`] is set.
//!
//! # Example
//!
//! ```
//! let value = libhjson::parse("rate: 1000 # per second").unwrap();
//! assert_eq!(value.as_map().unwrap()["rate"], libhjson::Value::from(1000i64));
//!
//! let text = libhjson::encode(&value);
//! assert_eq!(text, "{\n  rate: 1000\n}");
//! ```

mod encode;
mod error;
mod number;
mod options;
mod parser;
mod utf8;
mod value;

pub use error::{Error, Result};
pub use options::{DecoderOptions, EncoderOptions};
pub use value::{Map, Value};

use std::fs;
use std::path::Path;

/// Parse an Hjson document.
///
/// Comments are kept on the produced nodes; use [`parse_with_options`]
/// to discard them.
pub fn parse(input: &str) -> Result<Value> {
    parser::parse_str(input, &DecoderOptions::default())
}

/// Parse an Hjson document with explicit decoder options.
pub fn parse_with_options(input: &str, options: &DecoderOptions) -> Result<Value> {
    parser::parse_str(input, options)
}

/// Read a file into memory and parse it as Hjson.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    parse_file_with_options(path, &DecoderOptions::default())
}

/// Read a file into memory and parse it as Hjson with explicit decoder
/// options.
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: &DecoderOptions) -> Result<Value> {
    let input = fs::read_to_string(path)?;
    parser::parse_str(&input, options)
}

/// Encode a value tree as Hjson with default options.
pub fn encode(value: &Value) -> String {
    encode::encode_value(value, &EncoderOptions::default())
}

/// Encode a value tree as Hjson.
pub fn encode_with_options(value: &Value, options: &EncoderOptions) -> String {
    encode::encode_value(value, options)
}

/// Encode a value tree as strict JSON: quoted strings and keys, comma
/// separators, no comments.
pub fn encode_json(value: &Value) -> String {
    encode::encode_value(value, &EncoderOptions::json())
}

/// Encode a value tree and write it to a file, followed by one line
/// ending.
pub fn encode_to_file<P: AsRef<Path>>(
    path: P,
    value: &Value,
    options: &EncoderOptions,
) -> Result<()> {
    let mut text = encode::encode_value(value, options);
    text.push_str(&options.eol);
    fs::write(path, text)?;
    Ok(())
}
