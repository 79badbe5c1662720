//! # Element Properties
//!
//! Properties attached to a root element: plain values that become attributes
//! and callbacks that become event listeners (or the `onInsert` hook).
//!
//! ## Key Types
//!
//! - [`Props`] - Insertion-ordered property map
//! - [`PropValue`] - A single property value
//! - [`Callback`] - Shared, identity-compared callable

use std::fmt;
use std::rc::Rc;

use crate::node::NodeId;

// ============================================================================
// Callback
// ============================================================================

/// A callable property value.
///
/// Callbacks are compared by pointer identity, the same way a presentation layer
/// tells one registered listener from another. Cloning a callback yields the same
/// identity; wrapping the same closure twice does not.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(NodeId)>);

impl Callback {
    pub fn new(f: impl Fn(NodeId) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke with the node the callback is attached to.
    pub fn call(&self, node: NodeId) {
        (self.0)(node)
    }

    /// Whether both handles refer to the same callable.
    pub fn ptr_eq(&self, other: &Callback) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0) as *const ())
    }
}

// ============================================================================
// PropValue
// ============================================================================

/// A single property value
#[derive(Debug, Clone)]
pub enum PropValue {
    Str(String),
    Number(f64),
    Bool(bool),
    Callback(Callback),
}

impl PropValue {
    /// The callback, if this value is callable.
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            PropValue::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// String form used when the value is written as an attribute.
    pub fn to_attribute_value(&self) -> String {
        match self {
            PropValue::Str(s) => s.clone(),
            PropValue::Number(n) => number_to_string(*n),
            PropValue::Bool(b) => b.to_string(),
            PropValue::Callback(_) => "function".to_string(),
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<Callback> for PropValue {
    fn from(value: Callback) -> Self {
        PropValue::Callback(value)
    }
}

macro_rules! impl_number_prop {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PropValue {
                fn from(value: $t) -> Self {
                    PropValue::Number(value as f64)
                }
            }
        )*
    };
}

impl_number_prop!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Format a number the way a script engine's `String(n)` does.
///
/// Shortest round-trip digits; exponent form from `1e21` upwards and below
/// `1e-6`. Non-finite values print as `NaN`, `Infinity` and `-Infinity`, and
/// negative zero prints as `0`.
pub fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let s = if n > 0.0 { "Infinity" } else { "-Infinity" };
        s.to_string()
    } else if n == 0.0 {
        // covers -0
        "0".to_string()
    } else {
        let mut buffer = ryu_js::Buffer::new();
        buffer.format_finite(n).to_string()
    }
}

// ============================================================================
// Props
// ============================================================================

/// Insertion-ordered property map.
///
/// Setting an existing key replaces its value in place, keeping its position.
#[derive(Debug, Clone, Default)]
pub struct Props {
    entries: Vec<(String, PropValue)>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

/// Build a [`Props`] map from `key => value` pairs.
///
/// ```
/// use uirs_core::props;
/// let p = props! { "class" => "counter", "tabindex" => 0 };
/// assert_eq!(p.len(), 2);
/// ```
#[macro_export]
macro_rules! props {
    () => { $crate::Props::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut props = $crate::Props::new();
        $( props.insert($key, $value); )+
        props
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_to_string() {
        assert_eq!(number_to_string(0.0), "0");
        assert_eq!(number_to_string(-0.0), "0");
        assert_eq!(number_to_string(5.0), "5");
        assert_eq!(number_to_string(-12.0), "-12");
        assert_eq!(number_to_string(1.5), "1.5");
        assert_eq!(number_to_string(f64::NAN), "NaN");
        assert_eq!(number_to_string(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(number_to_string(f64::INFINITY), "Infinity");
    }

    #[test]
    fn test_number_to_string_exponent_and_rounding() {
        assert_eq!(number_to_string(1e21), "1e+21");
        assert_eq!(number_to_string(1.5e300), "1.5e+300");
        assert_eq!(number_to_string(-2e22), "-2e+22");
        assert_eq!(number_to_string(1e-7), "1e-7");
        assert_eq!(number_to_string(1.5e-10), "1.5e-10");
        assert_eq!(number_to_string(1e-6), "0.000001");
        assert_eq!(number_to_string(1.2345678901234568e20), "123456789012345680000");
        assert_eq!(number_to_string(1e20), "100000000000000000000");
        assert_eq!(number_to_string(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_to_string(9007199254740993.0), "9007199254740992");
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut props = Props::new().with("a", 1).with("b", "x");
        props.insert("a", 2);

        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(props.get("a").unwrap().to_attribute_value(), "2");
    }

    #[test]
    fn test_remove() {
        let mut props = props! { "id" => "x", "title" => "t" };
        assert!(props.remove("id").is_some());
        assert!(props.remove("id").is_none());
        assert_eq!(props.len(), 1);
    }

    #[test]
    fn test_attribute_values() {
        assert_eq!(PropValue::from(true).to_attribute_value(), "true");
        assert_eq!(PropValue::from(3u32).to_attribute_value(), "3");
        assert_eq!(PropValue::from("s").to_attribute_value(), "s");
    }

    #[test]
    fn test_callback_identity() {
        let a = Callback::new(|_| {});
        let b = a.clone();
        let c = Callback::new(|_| {});
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }

    #[test]
    fn test_callback_invocation() {
        use std::cell::Cell;
        let seen = Rc::new(Cell::new(None));
        let sink = seen.clone();
        let cb = Callback::new(move |node| sink.set(Some(node)));
        cb.call(NodeId::from_raw(9));
        assert_eq!(seen.get(), Some(NodeId::from_raw(9)));
    }
}
