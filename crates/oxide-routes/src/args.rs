//! Named arguments bound to a handler action.

use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{Result, RouterError};

/// The named arguments an action is invoked with.
///
/// Built per match from the route's static extra data, overlaid with the
/// placeholder values captured from the path. A captured value wins over
/// an extra value of the same name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteArgs {
    values: Map<String, Value>,
}

impl RouteArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn bind(extra: &Map<String, Value>, captures: Vec<(String, String)>) -> Self {
        let mut values = extra.clone();
        for (name, value) in captures {
            values.insert(name, Value::String(value));
        }
        Self { values }
    }

    /// Inserts an argument.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Gets an argument value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Gets an argument that holds a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }

    /// Gets a string argument or returns an error.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidArguments`] if the argument is missing
    /// or is not a string.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| RouterError::InvalidArguments(format!("missing argument: {key}")))
    }

    /// Parses a string argument as a specific type.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.get_str(key).and_then(|v| v.parse().ok())
    }

    /// Binds all arguments into a typed struct, by name.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidArguments`] if the arguments do not
    /// deserialize into `T`.
    ///
    /// ```
    /// use oxide_routes::RouteArgs;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Docs {
    ///     item: String,
    /// }
    ///
    /// let mut args = RouteArgs::new();
    /// args.insert("item", "manual");
    /// let docs: Docs = args.deserialize().unwrap();
    /// assert_eq!(docs.item, "manual");
    /// ```
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| RouterError::InvalidArguments(e.to_string()))
    }

    /// Returns an iterator over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no arguments.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_bind_captures_over_extra() {
        let mut extra = Map::new();
        extra.insert("item".to_string(), json!("default"));
        extra.insert("format".to_string(), json!("html"));

        let args = RouteArgs::bind(&extra, vec![("item".to_string(), "manual".to_string())]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.get_str("item"), Some("manual"));
        assert_eq!(args.get_str("format"), Some("html"));
    }

    #[test]
    fn test_accessors() {
        let mut args = RouteArgs::new();
        assert!(args.is_empty());
        args.insert("id", "42");
        args.insert("limit", 10);

        assert_eq!(args.parse::<i64>("id"), Some(42));
        assert_eq!(args.get("limit"), Some(&json!(10)));
        assert_eq!(args.get_str("limit"), None);
        assert_eq!(args.require("id").unwrap(), "42");
        assert!(matches!(
            args.require("missing"),
            Err(RouterError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_deserialize() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct PostArgs {
            id: String,
            #[serde(default)]
            draft: bool,
        }

        let mut args = RouteArgs::new();
        args.insert("id", "7");
        args.insert("draft", true);
        assert_eq!(
            args.deserialize::<PostArgs>().unwrap(),
            PostArgs {
                id: "7".to_string(),
                draft: true
            }
        );

        let empty = RouteArgs::new();
        assert!(matches!(
            empty.deserialize::<PostArgs>(),
            Err(RouterError::InvalidArguments(_))
        ));
    }
}
