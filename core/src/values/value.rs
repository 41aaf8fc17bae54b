use core::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

use crate::types::Type;

/// A runtime value.
///
/// Values are immutable and cheap to clone: strings and containers are
/// reference counted, so the trace can keep a copy of every intermediate
/// result without deep copies.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Arc<str>),
    List(Arc<[Value]>),
    Map(Arc<MapValue>),
    /// A functional error flowing through the expression as data.
    Error(Arc<ErrorValue>),
}

/// Kinds of functional errors carried by `Value::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A key whose runtime type can never be a map key.
    UnsupportedKeyType,
    /// Field or index lookup of a key the map does not contain.
    NoSuchKey,
    /// List index that is not an integer in range.
    InvalidIndex,
    /// Operator or function applied to operands it is not defined for.
    NoMatchingOverload,
    /// Map literal repeating a key.
    DuplicateKey,
    /// Failure reported by a native function implementation.
    NativeFunction,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedKeyType => "unsupported key type",
            ErrorKind::NoSuchKey => "no such key",
            ErrorKind::InvalidIndex => "invalid index",
            ErrorKind::NoMatchingOverload => "no matching overload",
            ErrorKind::DuplicateKey => "duplicate key",
            ErrorKind::NativeFunction => "native function error",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorValue {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Keys a map can hold. Numbers are admitted only when integral.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MapKey {
    Bool(bool),
    Int(i64),
    Str(Arc<str>),
}

impl MapKey {
    /// Convert a value to a map key.
    ///
    /// Fails with an `UnsupportedKeyType` error for values that can never be
    /// keys, and passes an `Error` value through unchanged.
    pub fn from_value(value: &Value) -> Result<MapKey, ErrorValue> {
        match value {
            Value::Bool(b) => Ok(MapKey::Bool(*b)),
            Value::Str(s) => Ok(MapKey::Str(s.clone())),
            Value::Number(n) if is_integral(*n) => Ok(MapKey::Int(*n as i64)),
            Value::Error(err) => Err(err.as_ref().clone()),
            other => Err(ErrorValue {
                kind: ErrorKind::UnsupportedKeyType,
                message: format!("unsupported key type: {}", other.describe()),
            }),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            MapKey::Bool(b) => Value::Bool(*b),
            MapKey::Int(i) => Value::Number(*i as f64),
            MapKey::Str(s) => Value::Str(s.clone()),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Bool(b) => write!(f, "{}", b),
            MapKey::Int(i) => write!(f, "{}", i),
            MapKey::Str(s) => write!(f, "{}", quote_str(s)),
        }
    }
}

/// Key kinds a map can be looked up with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyDomain {
    /// Every kind `MapKey` admits.
    #[default]
    Any,
    /// Strings only, as for decoded JSON objects.
    String,
}

impl KeyDomain {
    fn admits(self, key: &MapKey) -> bool {
        match self {
            KeyDomain::Any => true,
            KeyDomain::String => matches!(key, MapKey::Str(_)),
        }
    }
}

/// Mapping from keys to values. Keys are unique.
///
/// Equality compares entries only; the key domain does not take part.
#[derive(Debug, Clone, Default)]
pub struct MapValue {
    entries: HashMap<MapKey, Value>,
    key_domain: KeyDomain,
}

impl PartialEq for MapValue {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl MapValue {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty map that only admits string keys.
    pub fn string_keyed() -> Self {
        Self {
            entries: HashMap::new(),
            key_domain: KeyDomain::String,
        }
    }

    pub fn key_domain(&self) -> KeyDomain {
        self.key_domain
    }

    /// Insert an entry. A key outside the map's domain widens it to `Any`.
    pub fn insert(&mut self, key: MapKey, value: Value) -> Option<Value> {
        if !self.key_domain.admits(&key) {
            self.key_domain = KeyDomain::Any;
        }
        self.entries.insert(key, value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look a key up.
    ///
    /// `Ok(None)` means the key is absent, which is not an error. `Err` is
    /// returned when the key itself is an error, or when its type is outside
    /// the map's key domain: a string-keyed map rejects a number or bool
    /// key rather than report it absent.
    pub fn find(&self, key: &Value) -> Result<Option<&Value>, ErrorValue> {
        let map_key = MapKey::from_value(key)?;
        if !self.key_domain.admits(&map_key) {
            return Err(ErrorValue {
                kind: ErrorKind::UnsupportedKeyType,
                message: format!("unsupported key type: {}", key.describe()),
            });
        }
        Ok(self.entries.get(&map_key))
    }

    pub fn get_str(&self, key: &str) -> Option<&Value> {
        self.entries.get(&MapKey::Str(Arc::from(key)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        self.entries.iter()
    }

    /// Entries ordered by key, for stable display.
    pub fn sorted(&self) -> Vec<(&MapKey, &Value)> {
        let mut entries: Vec<_> = self.entries.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

impl FromIterator<(MapKey, Value)> for MapValue {
    fn from_iter<I: IntoIterator<Item = (MapKey, Value)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
            key_domain: KeyDomain::Any,
        }
    }
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::Str(s.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn map(entries: impl IntoIterator<Item = (MapKey, Value)>) -> Self {
        Value::Map(Arc::new(entries.into_iter().collect()))
    }

    /// A string-keyed map, the shape of decoded JSON objects. Lookups with a
    /// key of any other kind fail with `UnsupportedKeyType`.
    pub fn object<K: Into<Arc<str>>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        let mut map = MapValue::string_keyed();
        for (key, value) in entries {
            map.insert(MapKey::Str(key.into()), value);
        }
        Value::Map(Arc::new(map))
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Value::Error(Arc::new(ErrorValue {
            kind,
            message: message.into(),
        }))
    }

    /// Error for an operator or function applied to unsupported operands.
    pub fn no_overload(function: &str, args: &[&Value]) -> Self {
        let kinds: Vec<&str> = args.iter().map(|arg| arg.describe()).collect();
        Value::error(
            ErrorKind::NoMatchingOverload,
            format!("no such overload: {}({})", function, kinds.join(", ")),
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapValue> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Name of the value's runtime kind, for messages.
    pub fn describe(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Error(_) => "error",
        }
    }

    /// The static type describing this value's outermost shape.
    ///
    /// Container element types are not inspected and come back as `Dyn`.
    pub fn type_of(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Number(_) => Type::Number,
            Value::Str(_) => Type::String,
            Value::List(_) => Type::list(Type::Dyn),
            Value::Map(_) => Type::map(Type::Dyn, Type::Dyn),
            Value::Error(_) => Type::Dyn,
        }
    }

    /// Equality as an expression operation.
    ///
    /// An error operand is returned as the result, left operand first.
    /// Values of different kinds compare unequal.
    pub fn equals(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Error(_), _) => self.clone(),
            (_, Value::Error(_)) => other.clone(),
            _ => Value::Bool(self == other),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", quote_str(s)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (i, (key, value)) in map.sorted().into_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            Value::Error(err) => write!(f, "error({})", err),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(Arc::from(s))
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items.into())
    }
}

/// Decoded JSON documents map onto values directly; objects become
/// string-keyed maps (see `Value::object`).
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(fields) => {
                Value::object(fields.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

pub(crate) fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0
}

/// Format a number the way literals are written: integral values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "nan".to_string()
    } else if n.is_infinite() {
        if n.is_sign_positive() {
            "inf".to_string()
        } else {
            "-inf".to_string()
        }
    } else if is_integral(n) {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Quote a string as a single-quoted literal the parser accepts.
pub fn quote_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
