//! Keyword-style construction arguments.
//!
//! Every widget is built from an [`Arguments`] map. Kinds validate the keys
//! they recognise; unrecognised keys are kept so callers can tag widgets
//! (`dict_key`, `shadow`, ...) and inspect them later through
//! [`Widget::arguments`](crate::Widget::arguments).

use crate::error::{ToppingError, ToppingResult};
use crate::value::{Value, display_value};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered map of argument name to value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(IndexMap<String, Value>);

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Raw access. An explicit `null` is reported as present.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The value for `key`, or `Value::Null` when absent.
    pub fn value(&self, key: &str) -> Value {
        self.0.get(key).cloned().unwrap_or(Value::Null)
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// A scalar argument rendered as text. Numbers and booleans are accepted
    /// and shown the way they print.
    pub fn text(&self, kind: &str, key: &'static str) -> ToppingResult<Option<String>> {
        match self.present(key) {
            None => Ok(None),
            Some(v @ (Value::String(_) | Value::Number(_) | Value::Bool(_))) => {
                Ok(Some(display_value(v)))
            }
            Some(_) => Err(invalid(kind, key, "a string or scalar")),
        }
    }

    pub fn require_text(&self, kind: &str, key: &'static str) -> ToppingResult<String> {
        self.text(kind, key)?.ok_or_else(|| missing(kind, key))
    }

    /// A numeric argument. Numeric strings are accepted.
    pub fn f64(&self, kind: &str, key: &'static str) -> ToppingResult<Option<f64>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_f64()
                .map(Some)
                .ok_or_else(|| invalid(kind, key, "a finite number")),
            Some(Value::String(s)) => s
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| invalid(kind, key, "a number")),
            Some(_) => Err(invalid(kind, key, "a number")),
        }
    }

    pub fn require_f64(&self, kind: &str, key: &'static str) -> ToppingResult<f64> {
        self.f64(kind, key)?.ok_or_else(|| missing(kind, key))
    }

    /// A non-negative integer argument.
    pub fn u32(&self, kind: &str, key: &'static str) -> ToppingResult<Option<u32>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| invalid(kind, key, "a non-negative integer")),
            Some(_) => Err(invalid(kind, key, "a non-negative integer")),
        }
    }

    pub fn bool(&self, kind: &str, key: &'static str, default: bool) -> ToppingResult<bool> {
        match self.present(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(_) => Err(invalid(kind, key, "a boolean")),
        }
    }

    pub fn object(
        &self,
        kind: &str,
        key: &'static str,
    ) -> ToppingResult<Option<serde_json::Map<String, Value>>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(_) => Err(invalid(kind, key, "an object")),
        }
    }

    /// A CSS-style map (`{"text-align": "center"}`) flattened to strings.
    pub fn style(&self, kind: &str, key: &'static str) -> ToppingResult<Option<IndexMap<String, String>>> {
        Ok(self.object(kind, key)?.map(|map| {
            map.iter()
                .map(|(k, v)| (k.clone(), display_value(v)))
                .collect()
        }))
    }

    pub fn string_list(&self, kind: &str, key: &'static str) -> ToppingResult<Option<Vec<String>>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    _ => Err(invalid(kind, key, "a list of strings")),
                })
                .collect::<ToppingResult<Vec<_>>>()
                .map(Some),
            Some(_) => Err(invalid(kind, key, "a list of strings")),
        }
    }
}

fn missing(kind: &str, argument: &'static str) -> ToppingError {
    ToppingError::MissingArgument {
        kind: kind.to_string(),
        argument,
    }
}

fn invalid(kind: &str, argument: &'static str, expected: &'static str) -> ToppingError {
    ToppingError::InvalidArgument {
        kind: kind.to_string(),
        argument,
        expected,
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Arguments {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<serde_json::Map<String, Value>> for Arguments {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        map.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_accepts_scalars() {
        let args = Arguments::new().with("title", 0).with("label", "Vol").with("bad", json!([1]));
        assert_eq!(args.text("Button", "title").unwrap(), Some("0".to_string()));
        assert_eq!(args.require_text("Slider", "label").unwrap(), "Vol");
        assert!(matches!(
            args.text("Button", "bad"),
            Err(ToppingError::InvalidArgument { argument: "bad", .. })
        ));
    }

    #[test]
    fn test_missing_argument() {
        let args = Arguments::new().with("range_min", Value::Null);
        assert_eq!(
            args.require_f64("Slider", "range_min"),
            Err(ToppingError::MissingArgument {
                kind: "Slider".to_string(),
                argument: "range_min",
            })
        );
    }

    #[test]
    fn test_numeric_strings() {
        let args = Arguments::new().with("min", "2.5").with("max", "x");
        assert_eq!(args.f64("Slider", "min").unwrap(), Some(2.5));
        assert!(args.f64("Slider", "max").is_err());
    }

    #[test]
    fn test_bool_default_and_type() {
        let args = Arguments::new().with("shadow", false).with("padding", "yes");
        assert!(!args.bool("ImageBox", "shadow", true).unwrap());
        assert!(args.bool("Row", "centering", true).unwrap());
        assert!(args.bool("Row", "padding", true).is_err());
    }

    #[test]
    fn test_keeps_insertion_order_and_unknown_keys() {
        let args: Arguments = [("b", 1), ("a", 2)].into_iter().collect();
        let keys: Vec<_> = args.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(args.value("missing"), Value::Null);
    }

    #[test]
    fn test_string_list() {
        let args = Arguments::new().with("kinds", json!(["Button", "Label"]));
        assert_eq!(
            args.string_list("ToolBox", "kinds").unwrap(),
            Some(vec!["Button".to_string(), "Label".to_string()])
        );
        let bad = Arguments::new().with("kinds", json!(["Button", 3]));
        assert!(bad.string_list("ToolBox", "kinds").is_err());
    }
}
