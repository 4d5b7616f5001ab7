//! Configuration options for decoding and encoding.

/// Options controlling the decoder.
#[derive(Clone, Debug)]
pub struct DecoderOptions {
    /// Keep comments from the input, storing them on the produced
    /// [`Value`](crate::Value) nodes. When `false`, scanned comments are
    /// discarded.
    pub comments: bool,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions { comments: true }
    }
}

/// Options controlling the encoder.
#[derive(Clone, Debug)]
pub struct EncoderOptions {
    /// End-of-line sequence.
    pub eol: String,
    /// Place `{` and `[` on the same line as a preceding map key.
    pub braces_same_line: bool,
    /// Always place strings in quotes, never emitting the quoteless or
    /// multiline forms.
    pub quote_always: bool,
    /// Always place keys in quotes.
    pub quote_keys: bool,
    /// One level of indentation.
    pub indent_by: String,
    /// Write `-0.0` as-is instead of `0`.
    pub allow_minus_zero: bool,
    /// Retained for option-set parity; this implementation has no
    /// undefined values, so it never takes effect.
    pub unknown_as_null: bool,
    /// Insert commas between container elements. Setting this forces
    /// `quote_always`.
    pub separator: bool,
    /// Emit map members in insertion order; when `false`, keys are
    /// emitted in sorted order.
    pub preserve_insertion_order: bool,
    /// Omit the braces around a root-level map.
    pub omit_root_braces: bool,
    /// Write the comments stored on the value nodes back out.
    pub comments: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            eol: "\n".to_string(),
            braces_same_line: true,
            quote_always: false,
            quote_keys: false,
            indent_by: "  ".to_string(),
            allow_minus_zero: false,
            unknown_as_null: false,
            separator: false,
            preserve_insertion_order: true,
            omit_root_braces: false,
            comments: false,
        }
    }
}

impl EncoderOptions {
    /// Options producing strict JSON output: quoted strings and keys,
    /// comma separators, no comments.
    pub fn json() -> Self {
        EncoderOptions {
            braces_same_line: true,
            quote_always: true,
            quote_keys: true,
            separator: true,
            comments: false,
            ..Default::default()
        }
    }
}
