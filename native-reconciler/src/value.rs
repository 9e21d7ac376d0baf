use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use smartstring::alias::String as SmartString;
use std::fmt;
use std::rc::Rc;

/// Property, signal and class names.
pub type Name = SmartString;

/// Insertion-ordered property map, as written by the element author.
pub type PropMap = IndexMap<Name, PropValue>;

/// Handler attached to a native signal.
///
/// Equality is identity: two callbacks are the same only when they share
/// the same allocation.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&[PropValue])>);

impl Callback {
    pub fn new(f: impl Fn(&[PropValue]) + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn call(&self, args: &[PropValue]) {
        (self.0)(args)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Callback({:p})", Rc::as_ptr(&self.0))
    }
}

/// PropValue represents one value in a virtual element's props
#[derive(Debug, Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(SmartString),
    List(Rc<[PropValue]>),
    Map(Rc<PropMap>),
    Callback(Callback),
}

impl PropValue {
    /// Compare values for change detection.
    /// Primitives compare by value, lists/maps/callbacks by reference only.
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (PropValue::String(a), PropValue::String(b)) => a == b,
            (PropValue::List(a), PropValue::List(b)) => Rc::ptr_eq(a, b),
            (PropValue::Map(a), PropValue::Map(b)) => Rc::ptr_eq(a, b),
            (PropValue::Callback(a), PropValue::Callback(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Null => "null",
            PropValue::Bool(_) => "bool",
            PropValue::Int(_) => "int",
            PropValue::Float(_) => "float",
            PropValue::String(_) => "string",
            PropValue::List(_) => "list",
            PropValue::Map(_) => "map",
            PropValue::Callback(_) => "callback",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&PropMap> {
        match self {
            PropValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Int(value as i64)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Int(value)
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Float(value)
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.into())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value.into())
    }
}

impl From<Vec<PropValue>> for PropValue {
    fn from(value: Vec<PropValue>) -> Self {
        PropValue::List(value.into())
    }
}

impl From<PropMap> for PropValue {
    fn from(value: PropMap) -> Self {
        PropValue::Map(Rc::new(value))
    }
}

impl From<Callback> for PropValue {
    fn from(value: Callback) -> Self {
        PropValue::Callback(value)
    }
}

impl From<serde_json::Value> for PropValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => PropValue::Null,
            serde_json::Value::Bool(b) => PropValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => PropValue::Int(i),
                None => PropValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => PropValue::String(s.into()),
            serde_json::Value::Array(items) => {
                PropValue::List(items.into_iter().map(PropValue::from).collect())
            }
            serde_json::Value::Object(entries) => PropValue::Map(Rc::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (Name::from(k), PropValue::from(v)))
                    .collect(),
            )),
        }
    }
}

impl<'de> Deserialize<'de> for PropValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(PropValue::from)
    }
}

/// Build a [`PropMap`] from `(name, value)` pairs, keeping their order.
pub fn props<K, V, I>(entries: I) -> PropMap
where
    K: Into<Name>,
    V: Into<PropValue>,
    I: IntoIterator<Item = (K, V)>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
