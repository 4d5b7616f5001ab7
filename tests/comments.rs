//! Comment attachment and comment-preserving round-trips.
//!
//! The decoder stores the text surrounding each value; encoding with
//! comments enabled writes it back, and re-decoding the result must
//! yield the same values carrying the same comment strings.

use libhjson::{encode, encode_with_options, parse, parse_with_options, DecoderOptions, EncoderOptions, Value};

fn comment_options() -> EncoderOptions {
    EncoderOptions {
        comments: true,
        ..Default::default()
    }
}

/// Re-encodes with comments and decodes again; the result must match in
/// both values and comments.
fn assert_comment_round_trip(text: &str) {
    let first = parse(text).unwrap();
    let encoded = encode_with_options(&first, &comment_options());
    let second = parse(&encoded).unwrap();
    assert_eq!(first, second, "values diverged via {:?}", encoded);
    assert_comments_equal(&first, &second, &encoded);
}

fn assert_comments_equal(a: &Value, b: &Value, context: &str) {
    assert_eq!(a.comment_before(), b.comment_before(), "before, via {:?}", context);
    assert_eq!(a.comment_key(), b.comment_key(), "key, via {:?}", context);
    assert_eq!(a.comment_after(), b.comment_after(), "after, via {:?}", context);
    assert_eq!(a.comment_inside(), b.comment_inside(), "inside, via {:?}", context);
    match (a.as_map(), b.as_map()) {
        (Some(ma), Some(mb)) => {
            for ((_, va), (_, vb)) in ma.iter().zip(mb.iter()) {
                assert_comments_equal(va, vb, context);
            }
        }
        _ => {}
    }
    if let (Some(va), Some(vb)) = (a.as_vector(), b.as_vector()) {
        for (ea, eb) in va.iter().zip(vb.iter()) {
            assert_comments_equal(ea, eb, context);
        }
    }
}

// ============================================================================
// Attachment
// ============================================================================

#[test]
fn header_comment_attaches_to_root() {
    let value = parse("# header\na: 1").unwrap();
    assert_eq!(value.comment_before(), "# header\n");
}

#[test]
fn same_line_comment_attaches_after_value() {
    let value = parse("a: 1 # inline").unwrap();
    assert_eq!(value.as_map().unwrap()["a"].comment_after(), " # inline");
}

#[test]
fn comment_between_colon_and_value_is_a_key_comment() {
    let value = parse("a: /* note */ 1").unwrap();
    assert_eq!(value.as_map().unwrap()["a"].comment_key(), " /* note */ ");
    assert_eq!(value.as_map().unwrap()["a"].comment_before(), "");
}

#[test]
fn comment_line_before_member_attaches_to_it() {
    let value = parse("b: 2\n# note\na: 1").unwrap();
    assert_eq!(value.as_map().unwrap()["a"].comment_before(), "\n# note\n");
}

#[test]
fn comment_inside_empty_containers() {
    let value = parse("{ /* nothing here */ }").unwrap();
    assert_eq!(value.comment_inside(), " /* nothing here */ ");

    let value = parse("[ # empty\n]").unwrap();
    assert_eq!(value.comment_inside(), " # empty\n");
}

#[test]
fn trailing_comment_attaches_to_last_member() {
    let value = parse("a: 1\n# bye").unwrap();
    assert_eq!(value.as_map().unwrap()["a"].comment_after(), "\n# bye");
}

#[test]
fn slash_comment_styles() {
    let value = parse("// one\na: 1 /* two */\nb: 2").unwrap();
    assert_eq!(value.comment_before(), "// one\n");
    assert_eq!(value.as_map().unwrap()["a"].comment_after(), " /* two */");
}

#[test]
fn comment_before_array_element() {
    let value = parse("[\n  # first\n  1\n  2\n]").unwrap();
    let arr = value.as_vector().unwrap();
    assert_eq!(arr[0].comment_before(), "\n  # first\n  ");
    assert_eq!(arr[1].comment_before(), "");
}

// ============================================================================
// Disabled comments
// ============================================================================

#[test]
fn comments_can_be_discarded() {
    let options = DecoderOptions { comments: false };
    let value = parse_with_options("# header\na: 1 # inline", &options).unwrap();
    assert_eq!(value.comment_before(), "");
    assert_eq!(value.as_map().unwrap()["a"].comment_after(), "");
    // with nothing stored, default encoding is clean
    assert_eq!(encode(&value), "{\n  a: 1\n}");
}

#[test]
fn encoder_ignores_comments_by_default() {
    let value = parse("# header\na: 1 # inline").unwrap();
    assert_eq!(encode(&value), "{\n  a: 1\n}");
}

// ============================================================================
// Round-trips
// ============================================================================

#[test]
fn simple_comment_round_trip() {
    assert_comment_round_trip("# header\na: 1 # inline");
}

#[test]
fn key_comment_round_trip() {
    assert_comment_round_trip("a: /* note */ 1");
}

#[test]
fn member_comment_round_trip() {
    assert_comment_round_trip("b: 2\n# note about a\na: 1");
}

#[test]
fn empty_container_round_trip() {
    assert_comment_round_trip("{ /* nothing */ }");
    assert_comment_round_trip("box: [ # empty\n]");
}

#[test]
fn array_comment_round_trip() {
    assert_comment_round_trip("[\n  1 /* one */\n  2\n]");
}

#[test]
fn block_comment_round_trip() {
    assert_comment_round_trip("/* leading */\na: 1\n/* between */\nb: 2");
}

#[test]
fn exact_text_reproduction() {
    // with comments on, a typical config document reproduces its own
    // source text
    let text = "# settings\nhost: example.com # primary\nport: 8080";
    let value = parse(text).unwrap();
    let encoded = encode_with_options(&value, &comment_options());
    assert_eq!(encoded, "# settings\n{\n  host: example.com # primary\n  port: 8080\n}");
}
