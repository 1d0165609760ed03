//! Values that can be bound to template placeholders
//!
//! Every value has three text forms: the display text used by default, the debug
//! text selected with `!r`, and the ASCII-only debug text selected with `!a`.
//! User types take part through the [`TextForm`] capability.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::parser::ast::Accessor;

/// Text conversion capability for user-defined values
///
/// # Example
///
/// ```rust
/// use bracefmt::{render, Bindings, TextForm, Value};
///
/// struct Comedian {
///     name: String,
///     age: u32,
/// }
///
/// impl TextForm for Comedian {
///     fn display_text(&self) -> String {
///         format!("{} is {}.", self.name, self.age)
///     }
///
///     fn debug_text(&self) -> String {
///         format!("{} is {}. Surprise!!", self.name, self.age)
///     }
/// }
///
/// let comedian = Comedian { name: "Eric Idle".to_string(), age: 74 };
/// let bindings = Bindings::new().with("comedian", Value::object(comedian));
///
/// assert_eq!(render("{comedian}", &bindings).unwrap(), "Eric Idle is 74.");
/// assert_eq!(render("{comedian!r}", &bindings).unwrap(), "Eric Idle is 74. Surprise!!");
/// ```
pub trait TextForm: Send + Sync {
    /// Default text form
    fn display_text(&self) -> String;

    /// Text form selected by the `!r` conversion
    fn debug_text(&self) -> String {
        self.display_text()
    }

    /// Attribute lookup for `.name` accessors
    fn attr(&self, _name: &str) -> Option<Value> {
        None
    }
}

/// A value bound to a placeholder
#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Object(Arc<dyn TextForm>),
}

impl Value {
    /// Wrap a user type implementing [`TextForm`]
    pub fn object(value: impl TextForm + 'static) -> Self {
        Value::Object(Arc::new(value))
    }

    /// Short name of the value's kind, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Object(_) => "object",
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Default text form
    pub fn display_text(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(f) => float_text(*f),
            Value::Str(s) => s.clone(),
            Value::List(_) | Value::Map(_) => self.debug_text(),
            Value::Object(obj) => obj.display_text(),
        }
    }

    /// Unambiguous text form; strings are quoted and escaped
    pub fn debug_text(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(Value::debug_text).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(entries) => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{:?}: {}", k, v.debug_text()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Object(obj) => obj.debug_text(),
            _ => self.display_text(),
        }
    }

    /// Debug text with every non-ASCII character escaped
    pub fn ascii_text(&self) -> String {
        let debug = self.debug_text();
        let mut out = String::with_capacity(debug.len());
        for c in debug.chars() {
            if c.is_ascii() {
                out.push(c);
            } else {
                out.extend(c.escape_unicode());
            }
        }
        out
    }

    /// Apply one accessor step
    ///
    /// Maps answer `.name`, `[name]` and `[0]` (as the key `"0"`), lists answer
    /// `[0]`, objects answer `.name` through [`TextForm::attr`].
    pub fn lookup(&self, accessor: &Accessor) -> Option<Cow<'_, Value>> {
        match (self, accessor) {
            (Value::Map(entries), Accessor::Attr(key) | Accessor::Key(key)) => {
                entries.get(key).map(Cow::Borrowed)
            }
            (Value::Map(entries), Accessor::Index(index)) => {
                entries.get(&index.to_string()).map(Cow::Borrowed)
            }
            (Value::List(items), Accessor::Index(index)) => items.get(*index).map(Cow::Borrowed),
            (Value::Object(obj), Accessor::Attr(name)) => obj.attr(name).map(Cow::Owned),
            _ => None,
        }
    }
}

/// Shortest round-trip form, keeping a trailing `.0` on whole numbers
///
/// Exponents below -4 or from 16 up switch to scientific notation (`1e+16`,
/// `1.5e-05`).
fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let scientific = format!("{:e}", f);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if (-4..16).contains(&exponent) {
        if f.fract() == 0.0 {
            format!("{:.1}", f)
        } else {
            f.to_string()
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_text())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Object(obj) => f.debug_tuple("Object").field(&obj.debug_text()).finish(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
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

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

macro_rules! int_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Int(i64::from(n))
                }
            }
        )*
    };
}

int_from!(i8, i16, i32, i64, u8, u16, u32);

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(entries: BTreeMap<String, Value>) -> Self {
        Value::Map(entries)
    }
}
