//! Defines the [`Value`] type used as input when rendering templates.

mod from;
#[cfg(feature = "serde")]
mod ser;

pub use std::collections::BTreeMap as Map;
pub use std::vec::Vec as List;

#[cfg(feature = "serde")]
pub use crate::value::ser::to_value;

/// Data to be rendered, represented as a recursive enum.
///
/// The bindings passed to a render are a `Value::Map` at the root; the
/// variable names in the template select its entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(List<Value>),
    Map(Map<String, Value>),
}

impl Value {
    /// Appends the rendered form of this value.
    ///
    /// `None`, lists and maps have no textual form and render as nothing.
    pub(crate) fn render_to(&self, buf: &mut String) {
        use std::fmt::Write;
        match self {
            Value::None | Value::List(_) | Value::Map(_) => {}
            Value::Bool(b) => write!(buf, "{b}").unwrap(),
            Value::Integer(n) => write!(buf, "{n}").unwrap(),
            Value::Float(n) => write!(buf, "{n}").unwrap(),
            Value::String(s) => buf.push_str(s),
        }
    }
}
