//! Hjson value representation.
//!
//! A [`Value`] is a tagged tree node that additionally carries up to four
//! comment strings describing the source text that surrounded it:
//!
//! - `before`: everything between the previous sibling (or the enclosing
//!   opening brace) and this value;
//! - `key`: comments between a map key's colon and the value;
//! - `after`: everything between this value and the next sibling (or the
//!   enclosing closing brace);
//! - `inside`: the contents of an empty `[]` or `{}`.
//!
//! Comments never participate in equality: two values compare equal when
//! their tags and contents match, regardless of surrounding comments.

use indexmap::IndexMap;
use std::fmt;

/// Ordered map used for Hjson objects. Insertion order is preserved and
/// assigning to an existing key overwrites the value in place.
pub type Map = IndexMap<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Repr {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Vector(Vec<Value>),
    Map(Map),
}

#[derive(Clone, Debug, Default)]
struct Comments {
    before: String,
    key: String,
    after: String,
    inside: String,
}

/// Which comment slot an attachment targets.
#[derive(Clone, Copy, Debug)]
pub(crate) enum CommentSlot {
    Before,
    Key,
    After,
    Inside,
}

/// An Hjson value.
#[derive(Clone)]
pub struct Value {
    pub(crate) repr: Repr,
    comments: Option<Box<Comments>>,
}

impl Value {
    /// Creates a null value.
    pub fn null() -> Value {
        Value::from_repr(Repr::Null)
    }

    pub(crate) fn from_repr(repr: Repr) -> Value {
        Value {
            repr,
            comments: None,
        }
    }

    /// Returns `true` if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self.repr, Repr::Null)
    }

    /// Returns the boolean value if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self.repr {
            Repr::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Returns the integer value if this is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self.repr {
            Repr::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the floating-point value if this is a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self.repr {
            Repr::Double(f) => Some(f),
            _ => None,
        }
    }

    /// Returns a reference to the string if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match &self.repr {
            Repr::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the elements if this is a vector.
    pub fn as_vector(&self) -> Option<&Vec<Value>> {
        match &self.repr {
            Repr::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a mutable reference to the elements if this is a vector.
    pub fn as_vector_mut(&mut self) -> Option<&mut Vec<Value>> {
        match &mut self.repr {
            Repr::Vector(v) => Some(v),
            _ => None,
        }
    }

    /// Returns a reference to the map if this is a map.
    pub fn as_map(&self) -> Option<&Map> {
        match &self.repr {
            Repr::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Returns a mutable reference to the map if this is a map.
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match &mut self.repr {
            Repr::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Comment text preceding this value. Empty if none.
    pub fn comment_before(&self) -> &str {
        self.comment(CommentSlot::Before)
    }

    /// Comment text between this value and its key's colon. Empty if
    /// none, and always empty for values outside a map.
    pub fn comment_key(&self) -> &str {
        self.comment(CommentSlot::Key)
    }

    /// Comment text following this value. Empty if none.
    pub fn comment_after(&self) -> &str {
        self.comment(CommentSlot::After)
    }

    /// Comment text inside an empty container. Empty if none.
    pub fn comment_inside(&self) -> &str {
        self.comment(CommentSlot::Inside)
    }

    pub fn set_comment_before(&mut self, text: impl Into<String>) {
        self.set_comment(CommentSlot::Before, text.into());
    }

    pub fn set_comment_key(&mut self, text: impl Into<String>) {
        self.set_comment(CommentSlot::Key, text.into());
    }

    pub fn set_comment_after(&mut self, text: impl Into<String>) {
        self.set_comment(CommentSlot::After, text.into());
    }

    pub fn set_comment_inside(&mut self, text: impl Into<String>) {
        self.set_comment(CommentSlot::Inside, text.into());
    }

    pub(crate) fn comment(&self, slot: CommentSlot) -> &str {
        match &self.comments {
            Some(c) => match slot {
                CommentSlot::Before => &c.before,
                CommentSlot::Key => &c.key,
                CommentSlot::After => &c.after,
                CommentSlot::Inside => &c.inside,
            },
            None => "",
        }
    }

    pub(crate) fn set_comment(&mut self, slot: CommentSlot, text: String) {
        if text.is_empty() && self.comments.is_none() {
            return;
        }
        let c = self.comments.get_or_insert_with(Default::default);
        match slot {
            CommentSlot::Before => c.before = text,
            CommentSlot::Key => c.key = text,
            CommentSlot::After => c.after = text,
            CommentSlot::Inside => c.inside = text,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::null()
    }
}

/// Equality over tags and contents; comments are ignored.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        self.repr == other.repr
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::Null => write!(f, "null"),
            Repr::Bool(b) => write!(f, "{}", b),
            Repr::Int(n) => write!(f, "{}", n),
            Repr::Double(d) => write!(f, "{}", d),
            Repr::String(s) => write!(f, "{:?}", s),
            Repr::Vector(v) => f.debug_list().entries(v).finish(),
            Repr::Map(m) => f.debug_map().entries(m).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::from_repr(Repr::Bool(b))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::from_repr(Repr::Int(n))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::from_repr(Repr::Double(f))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::from_repr(Repr::String(s))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from_repr(Repr::String(s.to_string()))
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::from_repr(Repr::Vector(v))
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::from_repr(Repr::Map(m))
    }
}
