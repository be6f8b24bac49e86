//! Dispatcher configuration and declarative route tables.

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Result, RouterError};
use crate::request::Method;
use crate::route::RouteOptions;

/// Settings for a [`crate::Dispatcher`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatcherConfig {
    /// Path the dispatcher is mounted under, e.g. `/app`.
    ///
    /// Stripped from request paths before matching and prepended by
    /// `url_for`.
    pub mount_prefix: Option<String>,
}

impl DispatcherConfig {
    /// Sets the mount prefix.
    #[must_use]
    pub fn mount_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mount_prefix = Some(prefix.into());
        self
    }
}

/// One route declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDecl {
    /// Unique route name.
    pub name: String,
    /// Path pattern, e.g. `/docs/{item}`.
    pub pattern: String,
    /// Name of the handler group.
    pub group: String,
    /// Action to invoke on the group.
    pub action: String,
    /// Accepted methods; absent accepts any method.
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    /// Static arguments bound on every match.
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl RouteDecl {
    /// Converts the declaration's filter and extra data into route options.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Config`] if `methods` is an empty list.
    pub fn options(&self) -> Result<RouteOptions> {
        let mut options = RouteOptions::new();

        if let Some(methods) = &self.methods {
            if methods.is_empty() {
                return Err(RouterError::Config(format!(
                    "route `{}` has an empty method list",
                    self.name
                )));
            }
            options = options.methods(methods.iter().map(|m| Method::parse(m)));
        }

        options.extra.clone_from(&self.extra);
        Ok(options)
    }
}

/// A declarative route table.
///
/// ```json
/// {
///   "mount_prefix": "/app",
///   "routes": [
///     { "name": "index", "pattern": "/", "group": "site", "action": "index" },
///     { "name": "data", "pattern": "/data", "group": "site",
///       "action": "post_data", "methods": ["POST"] }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesConfig {
    /// See [`DispatcherConfig::mount_prefix`].
    pub mount_prefix: Option<String>,
    /// Routes in registration order.
    pub routes: Vec<RouteDecl>,
}

impl RoutesConfig {
    /// Parses a route table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Json`] for malformed JSON or unknown fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a route table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::Io`] if the file cannot be read and
    /// [`RouterError::Json`] if its contents do not parse.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// The dispatcher settings part of this table.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            mount_prefix: self.mount_prefix.clone(),
        }
    }
}
