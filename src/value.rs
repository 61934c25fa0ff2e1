//! Semantic values and action arguments
//!
//! Every matched element produces a [`Value`]. Scalars are the `Bool`,
//! `Int`, `Float` and `Str` variants; `List` holds the results of a
//! repetition, `Tuple` the captures of one group repetition, and `Absent`
//! marks an optional reference that did not match (before default
//! substitution).
//!
//! Actions receive their captures as [`Args`]: named captures first, in
//! source order, followed by anonymous captures.
//!
//! # Example
//!
//! ```rust
//! use pegrow::value::{Args, Value};
//!
//! let mut args = Args::new();
//! args.push_named("left", Value::int(1));
//! args.push_positional(Value::int(2));
//!
//! assert_eq!(args.get("left").and_then(Value::as_int), Some(1));
//! assert_eq!(args[1].as_int(), Some(2));
//! ```

use serde::Serialize;
use std::fmt;
use std::ops::Index;

/// A semantic value produced by matching
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Optional element that did not match
    #[default]
    Absent,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating point scalar
    Float(f64),
    /// String scalar
    Str(String),
    /// Ordered, variable-length sequence
    List(Vec<Value>),
    /// Ordered, fixed-length sequence
    Tuple(Vec<Value>),
}

impl Value {
    /// Create an integer value
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    /// Create a float value
    pub fn float(f: f64) -> Self {
        Value::Float(f)
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(items)
    }

    /// Create a tuple value
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(items)
    }

    /// Check if this is `Absent`
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// Check if this is a scalar (bool, int, float or string)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Get as boolean
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get as float, widening integers
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get as string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the items of a list or tuple
    pub fn as_slice(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Get an element of a list or tuple by index
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.as_slice().and_then(|items| items.get(index))
    }

    /// Convert into a `serde_json::Value`
    ///
    /// `Absent` and non-finite floats become `null`; tuples become arrays.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::List(items) | Value::Tuple(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "absent"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::Str(s) => write!(f, "{:?}", s),
            Value::List(items) => {
                write!(f, "[")?;
                write_items(f, items)?;
                write!(f, "]")
            }
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_items(f, items)?;
                if items.len() == 1 {
                    write!(f, ",")?;
                }
                write!(f, ")")
            }
        }
    }
}

fn write_items(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", v)?;
    }
    Ok(())
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// One argument passed to an action
#[derive(Debug, Clone, PartialEq)]
pub struct Arg {
    /// Capture name (`None` for anonymous captures)
    pub name: Option<String>,
    /// Captured value
    pub value: Value,
}

/// Ordered argument list handed to `validate`, `transform` and actions
///
/// Indexing by `usize` addresses every argument in order; indexing by
/// `&str` looks up a named capture. Both panic when the argument is
/// missing, like `Vec` and `HashMap` indexing; use [`Args::get`] or
/// [`Args::value`] for the checked forms.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    items: Vec<Arg>,
}

impl Args {
    /// Create an empty argument list
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build an argument list of anonymous values
    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            items: values
                .into_iter()
                .map(|value| Arg { name: None, value })
                .collect(),
        }
    }

    /// Append a named argument
    pub fn push_named(&mut self, name: impl Into<String>, value: Value) {
        self.items.push(Arg {
            name: Some(name.into()),
            value,
        });
    }

    /// Append an anonymous argument
    pub fn push_positional(&mut self, value: Value) {
        self.items.push(Arg { name: None, value });
    }

    /// Look up a named argument
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.items
            .iter()
            .find(|arg| arg.name.as_deref() == Some(name))
            .map(|arg| &arg.value)
    }

    /// Get the argument at `index` (named and anonymous alike)
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.items.get(index).map(|arg| &arg.value)
    }

    /// Iterate over the anonymous arguments only
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.items
            .iter()
            .filter(|arg| arg.name.is_none())
            .map(|arg| &arg.value)
    }

    /// Iterate over all argument values in order
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.items.iter().map(|arg| &arg.value)
    }

    /// Iterate over all arguments in order
    pub fn iter(&self) -> impl Iterator<Item = &Arg> {
        self.items.iter()
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consume the list, returning the values in order
    pub fn into_values(self) -> Vec<Value> {
        self.items.into_iter().map(|arg| arg.value).collect()
    }
}

impl Index<usize> for Args {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        match self.value(index) {
            Some(v) => v,
            None => panic!(
                "argument index {} out of range ({} arguments)",
                index,
                self.len()
            ),
        }
    }
}

impl Index<&str> for Args {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        match self.get(name) {
            Some(v) => v,
            None => panic!("no argument named `{}`", name),
        }
    }
}

impl FromIterator<Value> for Args {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_values(iter)
    }
}
