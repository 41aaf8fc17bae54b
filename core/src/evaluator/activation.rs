use hashbrown::HashMap;

use crate::values::Value;

/// Runtime bindings of declared variables.
///
/// ```
/// use gavel_core::evaluator::Activation;
/// use gavel_core::values::Value;
///
/// let document = serde_json::json!({"properties": {"mode": "standard"}});
/// let activation = match document {
///     serde_json::Value::Object(fields) => Activation::from_json_object(fields),
///     _ => unreachable!(),
/// };
/// let properties = activation.get("properties").and_then(Value::as_map).unwrap();
/// assert_eq!(properties.get_str("mode"), Some(&Value::from("standard")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Activation {
    bindings: HashMap<String, Value>,
}

impl Activation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind each top-level field of a decoded JSON object.
    pub fn from_json_object(fields: serde_json::Map<String, serde_json::Value>) -> Self {
        fields
            .into_iter()
            .map(|(name, value)| (name, Value::from(value)))
            .collect()
    }

    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        self.bindings.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl FromIterator<(String, Value)> for Activation {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}
