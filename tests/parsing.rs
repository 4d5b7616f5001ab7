//! Decoder tests: scalars, strings, containers, the braceless root and
//! the error cases.

use libhjson::{parse, parse_with_options, DecoderOptions, Map, Value};

fn as_map(value: &Value) -> &Map {
    value.as_map().expect("expected a map")
}

// ============================================================================
// Roots
// ============================================================================

#[test]
fn braceless_object_single_key() {
    let value = parse("a: 1").unwrap();
    let map = as_map(&value);
    assert_eq!(map.len(), 1);
    assert_eq!(map["a"], Value::from(1i64));
}

#[test]
fn braced_json_object() {
    let value = parse(r#"{"x":[1,2,3]}"#).unwrap();
    let arr = as_map(&value)["x"].as_vector().unwrap();
    assert_eq!(arr.len(), 3);
    assert_eq!(arr[0], Value::from(1i64));
    assert_eq!(arr[1], Value::from(2i64));
    assert_eq!(arr[2], Value::from(3i64));
}

#[test]
fn root_array() {
    let value = parse("[1, 2]").unwrap();
    let arr = value.as_vector().unwrap();
    assert_eq!(arr.len(), 2);
}

#[test]
fn root_scalar_fallbacks() {
    assert_eq!(parse("42").unwrap(), Value::from(42i64));
    assert_eq!(parse("true").unwrap(), Value::from(true));
    assert_eq!(parse("null").unwrap(), Value::null());
    assert_eq!(parse("\"quoted\"").unwrap(), Value::from("quoted"));
    assert_eq!(parse("hello world").unwrap(), Value::from("hello world"));
}

#[test]
fn braceless_object_multiple_keys() {
    let value = parse("a: 1\nb: two\nc: [3]").unwrap();
    let map = as_map(&value);
    assert_eq!(map.len(), 3);
    assert_eq!(map["a"], Value::from(1i64));
    assert_eq!(map["b"], Value::from("two"));
    assert_eq!(map["c"].as_vector().unwrap()[0], Value::from(3i64));
}

// ============================================================================
// Scalars
// ============================================================================

#[test]
fn keywords() {
    let value = parse("t: true\nf: false\nn: null").unwrap();
    let map = as_map(&value);
    assert_eq!(map["t"], Value::from(true));
    assert_eq!(map["f"], Value::from(false));
    assert!(map["n"].is_null());
}

#[test]
fn integers() {
    let value = parse("a: 0\nb: -5\nc: 9223372036854775807").unwrap();
    let map = as_map(&value);
    assert_eq!(map["a"], Value::from(0i64));
    assert_eq!(map["b"], Value::from(-5i64));
    assert_eq!(map["c"], Value::from(i64::MAX));
}

#[test]
fn integer_overflow_becomes_double() {
    let value = parse("n: 9223372036854775808").unwrap();
    assert!(as_map(&value)["n"].as_f64().is_some());
}

#[test]
fn doubles() {
    let value = parse("a: 3.14\nb: -0.5\nc: 1.5e2\nd: 2E-1").unwrap();
    let map = as_map(&value);
    assert_eq!(map["a"], Value::from(3.14));
    assert_eq!(map["b"], Value::from(-0.5));
    assert_eq!(map["c"], Value::from(150.0));
    assert_eq!(map["d"], Value::from(0.2));
}

#[test]
fn not_quite_numbers_are_strings() {
    let value = parse("a: 0123\nb: .5\nc: 5.\nd: -\ne: 1f").unwrap();
    let map = as_map(&value);
    assert_eq!(map["a"], Value::from("0123"));
    assert_eq!(map["b"], Value::from(".5"));
    assert_eq!(map["c"], Value::from("5."));
    assert_eq!(map["d"], Value::from("-"));
    assert_eq!(map["e"], Value::from("1f"));
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn quoteless_string_runs_to_end_of_line() {
    let value = parse("k: true false").unwrap();
    assert_eq!(as_map(&value)["k"], Value::from("true false"));
}

#[test]
fn quoteless_string_absorbs_punctuation() {
    // commas and brackets do not terminate a quoteless string
    let value = parse("k: a, b] c").unwrap();
    assert_eq!(as_map(&value)["k"], Value::from("a, b] c"));
}

#[test]
fn quoteless_string_absorbs_comment_openers() {
    // only numbers and keywords return at a '#'; a quoteless string
    // keeps going to the end of the line
    let value = parse("s: hello # not a comment\nn: 5 # a comment").unwrap();
    let map = as_map(&value);
    assert_eq!(map["s"], Value::from("hello # not a comment"));
    assert_eq!(map["n"], Value::from(5i64));
}

#[test]
fn quoted_strings() {
    let value = parse("a: \"double\"\nb: 'single'\nc: \"say \\\"hi\\\"\"").unwrap();
    let map = as_map(&value);
    assert_eq!(map["a"], Value::from("double"));
    assert_eq!(map["b"], Value::from("single"));
    assert_eq!(map["c"], Value::from("say \"hi\""));
}

#[test]
fn string_escapes() {
    let value = parse(r#"s: "\b\f\n\r\t\\\/\"""#).unwrap();
    assert_eq!(
        as_map(&value)["s"],
        Value::from("\u{8}\u{c}\n\r\t\\/\"")
    );
}

#[test]
fn unicode_escapes() {
    let value = parse(r#"s: "\u00e9\u0041""#).unwrap();
    assert_eq!(as_map(&value)["s"], Value::from("\u{e9}A"));
}

#[test]
fn surrogate_pair_escapes() {
    let value = parse(r#""\ud83d\ude00""#).unwrap();
    assert_eq!(value, Value::from("\u{1f600}"));
}

#[test]
fn multiline_string_strips_common_indent() {
    let value = parse("s: '''\n  hello\n  world\n  '''").unwrap();
    assert_eq!(as_map(&value)["s"], Value::from("hello\nworld"));
}

#[test]
fn multiline_string_keeps_deeper_indent() {
    let value = parse("s:\n  '''\n  one\n    two\n  '''").unwrap();
    assert_eq!(as_map(&value)["s"], Value::from("one\n  two"));
}

#[test]
fn multiline_string_single_quotes_inside() {
    let value = parse("s: '''it's a''b'''").unwrap();
    assert_eq!(as_map(&value)["s"], Value::from("it's a''b"));
}

#[test]
fn multiline_string_drops_carriage_returns() {
    let value = parse("s: '''\r\n  a\r\n  b\r\n  '''").unwrap();
    assert_eq!(as_map(&value)["s"], Value::from("a\nb"));
}

// ============================================================================
// Containers
// ============================================================================

#[test]
fn commas_are_optional() {
    let with = parse("[\n  1,\n  2,\n]").unwrap();
    let without = parse("[\n  1\n  2\n]").unwrap();
    assert_eq!(with, without);
    assert_eq!(with.as_vector().unwrap().len(), 2);
}

#[test]
fn trailing_comma_in_object() {
    let value = parse("{a: 1, b: 2,}").unwrap();
    assert_eq!(as_map(&value).len(), 2);
}

#[test]
fn empty_containers() {
    assert!(parse("{}").unwrap().as_map().unwrap().is_empty());
    assert!(parse("[]").unwrap().as_vector().unwrap().is_empty());
    let value = parse("a: {}\nb: []").unwrap();
    assert!(as_map(&value)["a"].as_map().unwrap().is_empty());
    assert!(as_map(&value)["b"].as_vector().unwrap().is_empty());
}

#[test]
fn nested_containers() {
    // the quoteless string needs its own line: a '}' on the same line
    // would become part of the string
    let value = parse("obj: {x: 1\ny: hello\n}\narr: [\n  a\n  b\n]").unwrap();
    let map = as_map(&value);
    let obj = map["obj"].as_map().unwrap();
    assert_eq!(obj["x"], Value::from(1i64));
    assert_eq!(obj["y"], Value::from("hello"));
    let arr = map["arr"].as_vector().unwrap();
    assert_eq!(arr[0], Value::from("a"));
    assert_eq!(arr[1], Value::from("b"));
}

#[test]
fn duplicate_keys_last_wins() {
    let value = parse("a: 1\nb: 2\na: 3").unwrap();
    let map = as_map(&value);
    assert_eq!(map.len(), 2);
    assert_eq!(map["a"], Value::from(3i64));
}

#[test]
fn insertion_order_is_preserved() {
    let value = parse("b: 1\na: 2\nc: 3").unwrap();
    let keys: Vec<&String> = as_map(&value).keys().collect();
    assert_eq!(keys, ["b", "a", "c"]);
}

#[test]
fn quoted_keys() {
    let value = parse("\"key name\": 1\n'other key': 2").unwrap();
    let map = as_map(&value);
    assert_eq!(map["key name"], Value::from(1i64));
    assert_eq!(map["other key"], Value::from(2i64));
}

#[test]
fn crlf_input() {
    let value = parse("a: 1\r\nb: 2\r\n").unwrap();
    let map = as_map(&value);
    assert_eq!(map["a"], Value::from(1i64));
    assert_eq!(map["b"], Value::from(2i64));
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn empty_input_is_an_error() {
    assert!(parse("").unwrap_err().is_syntax());
    assert!(parse("   \n\n").unwrap_err().is_syntax());
}

#[test]
fn comment_only_input_is_an_error() {
    assert!(parse("# just a comment").unwrap_err().is_syntax());
    assert!(parse("/* block */\n// line").unwrap_err().is_syntax());
    let no_comments = DecoderOptions { comments: false };
    assert!(parse_with_options("# x", &no_comments).unwrap_err().is_syntax());
}

#[test]
fn unterminated_containers() {
    assert!(parse("[1").unwrap_err().is_syntax());
    assert!(parse("[").unwrap_err().is_syntax());
    assert!(parse("{a: 1").unwrap_err().is_syntax());
    assert!(parse("{").unwrap_err().is_syntax());
}

#[test]
fn trailing_characters() {
    assert!(parse("{a: 1} extra").unwrap_err().is_syntax());
    assert!(parse("[1] extra").unwrap_err().is_syntax());
}

#[test]
fn bad_keys() {
    // whitespace inside a bare key
    assert!(parse("{a b: 1}").unwrap_err().is_syntax());
    // empty key
    assert!(parse("{: 1}").unwrap_err().is_syntax());
    // punctuator where a key should be
    assert!(parse("{,: 1}").unwrap_err().is_syntax());
}

#[test]
fn bad_key_on_later_line_surfaces_the_object_error() {
    let err = parse("a: 1\nb b: 2").unwrap_err();
    assert!(err.to_string().contains("whitespace in your key name"));
}

#[test]
fn bad_strings() {
    // unknown escape
    assert!(parse(r#"{s: "a\x"}"#).unwrap_err().is_syntax());
    // literal newline inside a quoted string
    assert!(parse("{s: \"a\nb\"}").unwrap_err().is_syntax());
    // unterminated
    assert!(parse("{s: \"abc}").unwrap_err().is_syntax());
    // bad \u digits
    assert!(parse(r#"{s: "\u12x4"}"#).unwrap_err().is_syntax());
}

#[test]
fn unterminated_multiline_string() {
    assert!(parse("s: '''\n  never closed").unwrap_err().is_syntax());
}

#[test]
fn error_carries_line_and_column() {
    let err = parse("{\n  a: \"x\nmore").unwrap_err();
    match err {
        libhjson::Error::Syntax { line, column, .. } => {
            assert_eq!(line, 2);
            assert!(column > 1);
        }
        other => panic!("expected a syntax error, got {}", other),
    }
}

#[test]
fn error_message_format() {
    let message = parse("[1").unwrap_err().to_string();
    assert!(message.contains("at line 1,"), "unexpected: {}", message);
    assert!(message.contains(">>>"), "unexpected: {}", message);
}
