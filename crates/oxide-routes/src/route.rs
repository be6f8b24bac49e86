//! A single registered route.

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::error::{Result, RouterError};
use crate::path::PathPattern;
use crate::request::Method;

/// Optional settings supplied when registering a route.
#[derive(Debug, Clone, Default)]
pub struct RouteOptions {
    /// Methods the route accepts; `None` accepts any method.
    pub methods: Option<HashSet<Method>>,
    /// Static arguments bound on every match of the route.
    pub extra: Map<String, Value>,
}

impl RouteOptions {
    /// Options accepting any method with no extra arguments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts the route to a method. Can be called repeatedly.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.methods.get_or_insert_with(HashSet::new).insert(method);
        self
    }

    /// Restricts the route to a set of methods.
    ///
    /// An empty set accepts no method at all, so registering a route with
    /// it fails with [`RouterError::Config`].
    #[must_use]
    pub fn methods(mut self, methods: impl IntoIterator<Item = Method>) -> Self {
        self.methods
            .get_or_insert_with(HashSet::new)
            .extend(methods);
        self
    }

    /// Adds a static argument.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// A compiled route: pattern and method filter mapped to a group action.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    pattern: PathPattern,
    group: String,
    action: String,
    methods: Option<HashSet<Method>>,
    extra: Map<String, Value>,
}

impl Route {
    /// Compiles a route.
    ///
    /// The group and action are not checked here; they are resolved when a
    /// request is dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`RouterError::InvalidPattern`] for a bad pattern and
    /// [`RouterError::Config`] for an empty method filter.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        group: impl Into<String>,
        action: impl Into<String>,
        options: RouteOptions,
    ) -> Result<Self> {
        let name = name.into();
        if options.methods.as_ref().is_some_and(HashSet::is_empty) {
            return Err(RouterError::Config(format!(
                "route `{name}` has an empty method filter"
            )));
        }

        Ok(Self {
            name,
            pattern: PathPattern::parse(pattern)?,
            group: group.into(),
            action: action.into(),
            methods: options.methods,
            extra: options.extra,
        })
    }

    /// The route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The compiled pattern.
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    /// Name of the handler group the route points at.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Name of the action invoked on the group.
    pub fn action(&self) -> &str {
        &self.action
    }

    /// The method filter, if any.
    pub fn methods(&self) -> Option<&HashSet<Method>> {
        self.methods.as_ref()
    }

    /// Static arguments bound on every match.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// Returns true if the method filter accepts this method.
    pub fn allows(&self, method: &Method) -> bool {
        self.methods.as_ref().is_none_or(|m| m.contains(method))
    }
}
