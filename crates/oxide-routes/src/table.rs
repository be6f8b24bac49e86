//! The ordered table of registered routes.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::args::RouteArgs;
use crate::error::Result;
use crate::path::split_path;
use crate::request::Method;
use crate::route::{Route, RouteOptions};

/// A route selected for a request, with the values captured from its path.
#[derive(Debug, Clone)]
pub struct RouteMatch<'a> {
    /// The matched route.
    pub route: &'a Route,
    /// Placeholder values captured from the path, in pattern order.
    pub captures: Vec<(String, String)>,
}

impl RouteMatch<'_> {
    /// Returns a captured placeholder value.
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Builds the arguments for the handler: the route's extra data with
    /// the captured values laid over it.
    pub fn into_args(self) -> RouteArgs {
        RouteArgs::bind(self.route.extra(), self.captures)
    }
}

/// Registered routes in registration order.
///
/// Matching is a linear scan: the first route whose pattern aligns with
/// every path segment and whose method filter accepts the request wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_name: HashMap<String, usize>,
}

impl RouteTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles and registers a route.
    ///
    /// Registering a name that already exists replaces that route in place,
    /// keeping its position in the table.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RouterError::InvalidPattern`] for a bad pattern and
    /// [`crate::RouterError::Config`] for an empty method filter. The table
    /// is left unchanged.
    pub fn register(
        &mut self,
        name: &str,
        pattern: &str,
        group: &str,
        action: &str,
        options: RouteOptions,
    ) -> Result<()> {
        let route = Route::new(name, pattern, group, action, options)?;
        self.insert(route);
        Ok(())
    }

    /// Adds an already compiled route.
    pub fn insert(&mut self, route: Route) {
        debug!(
            name = route.name(),
            pattern = route.pattern().pattern(),
            methods = ?route.methods(),
            "registering route"
        );

        if let Some(&index) = self.by_name.get(route.name()) {
            debug!(name = route.name(), "replacing existing route");
            self.routes[index] = route;
        } else {
            self.by_name.insert(route.name().to_string(), self.routes.len());
            self.routes.push(route);
        }
    }

    /// Finds the route for a request.
    ///
    /// `path` is the normalized request path. Routes whose shape matches
    /// but whose method filter rejects `method` are skipped.
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let segments = split_path(path);

        for route in &self.routes {
            if route.pattern().arity() != segments.len() {
                continue;
            }

            let Some(captures) = route.pattern().match_segments(&segments) else {
                continue;
            };

            if !route.allows(method) {
                trace!(name = route.name(), %method, "path matched but method filtered out");
                continue;
            }

            return Some(RouteMatch { route, captures });
        }

        None
    }

    /// Generates the path of a named route.
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        self.get(name).and_then(|r| r.pattern().reverse(params))
    }

    /// Looks up a route by name.
    pub fn get(&self, name: &str) -> Option<&Route> {
        self.by_name.get(name).map(|&i| &self.routes[i])
    }

    /// Iterates routes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
