//! Resolves requests to handler actions and invokes them.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::args::RouteArgs;
use crate::config::{DispatcherConfig, RouteDecl, RoutesConfig};
use crate::error::Result;
use crate::handler::{Action, HandlerGroup};
use crate::request::{Method, Request};
use crate::response::Render;
use crate::route::{Route, RouteOptions};
use crate::table::RouteTable;

/// Outcome of resolving a request against the routes and handler groups.
pub enum Resolution<'a> {
    /// A route matched and its action exists.
    Handler {
        /// The matched route.
        route: &'a Route,
        /// The action to invoke.
        action: &'a Action,
        /// Arguments to invoke it with.
        args: RouteArgs,
    },
    /// A route matched but its group or action does not exist.
    Unresolved {
        /// The matched route.
        route: &'a Route,
    },
    /// No route matched.
    NoRoute,
}

impl std::fmt::Debug for Resolution<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Handler { route, args, .. } => f
                .debug_struct("Handler")
                .field("route", &route.name())
                .field("args", args)
                .finish_non_exhaustive(),
            Self::Unresolved { route } => f
                .debug_struct("Unresolved")
                .field("route", &route.name())
                .finish(),
            Self::NoRoute => f.write_str("NoRoute"),
        }
    }
}

/// Routes requests to actions on registered handler groups.
///
/// Register everything up front, then share the dispatcher (it is
/// `Send + Sync`) between request tasks; dispatch only reads.
#[derive(Debug, Default)]
pub struct Dispatcher {
    config: DispatcherConfig,
    table: RouteTable,
    groups: HashMap<String, Arc<HandlerGroup>>,
    /// Groups passed to `register`, keyed by route name.
    bound: HashMap<String, Arc<HandlerGroup>>,
}

impl Dispatcher {
    /// Creates an empty dispatcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty dispatcher with settings.
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Builds a dispatcher from a declarative route table.
    ///
    /// Groups are matched to declarations by name when requests come in;
    /// a declaration naming an unknown group or action still registers.
    ///
    /// # Errors
    ///
    /// Fails on the first declaration with an invalid pattern or method list.
    pub fn from_config(
        config: &RoutesConfig,
        groups: impl IntoIterator<Item = Arc<HandlerGroup>>,
    ) -> Result<Self> {
        let mut dispatcher = Self::with_config(config.dispatcher_config());
        for group in groups {
            dispatcher.add_group(group);
        }
        for decl in &config.routes {
            dispatcher.register_declared(decl)?;
        }
        Ok(dispatcher)
    }

    /// Makes a handler group available to declared routes by its name.
    ///
    /// Routes added with [`Dispatcher::register`] keep the group they were
    /// registered with and are not affected.
    ///
    /// Returns the group previously added under that name, if any.
    pub fn add_group(&mut self, group: Arc<HandlerGroup>) -> Option<Arc<HandlerGroup>> {
        let previous = self.groups.insert(group.name().to_string(), group);
        if let Some(previous) = &previous {
            debug!(group = previous.name(), "replacing handler group");
        }
        previous
    }

    /// Registers a route to `action` on `group`.
    ///
    /// The route holds on to `group` itself, so another group with the
    /// same name never changes what this route invokes. The action is not
    /// checked until a request matches the route.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RouterError::InvalidPattern`] if the pattern is
    /// empty, has a malformed placeholder or repeats a placeholder name,
    /// and [`crate::RouterError::Config`] for an empty method filter.
    pub fn register(
        &mut self,
        name: &str,
        pattern: &str,
        group: Arc<HandlerGroup>,
        action: &str,
        options: RouteOptions,
    ) -> Result<()> {
        let route = Route::new(name, pattern, group.name(), action, options)?;
        self.bound.insert(name.to_string(), group);
        self.table.insert(route);
        Ok(())
    }

    /// Registers a declared route, referencing its group by name.
    ///
    /// The group is looked up among those added with
    /// [`Dispatcher::add_group`] each time the route matches.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RouterError::Config`] for an empty method list and
    /// [`crate::RouterError::InvalidPattern`] for a bad pattern.
    pub fn register_declared(&mut self, decl: &RouteDecl) -> Result<()> {
        let options = decl.options()?;
        self.table
            .register(&decl.name, &decl.pattern, &decl.group, &decl.action, options)?;
        self.bound.remove(&decl.name);
        Ok(())
    }

    fn group_for(&self, route: &Route) -> Option<&Arc<HandlerGroup>> {
        self.bound
            .get(route.name())
            .or_else(|| self.groups.get(route.group()))
    }

    /// The settings in use.
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// The registered routes.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Looks up a group added with [`Dispatcher::add_group`] by name.
    pub fn group(&self, name: &str) -> Option<&Arc<HandlerGroup>> {
        self.groups.get(name)
    }

    /// Strips the query and the mount prefix from a request path.
    ///
    /// Returns `None` for paths outside the mount prefix.
    pub fn normalize_path<'p>(&self, path: &'p str) -> Option<&'p str> {
        let path = path.split_once('?').map_or(path, |(p, _)| p);

        match self.mount_prefix() {
            None => Some(path),
            Some(prefix) => {
                let rest = path.strip_prefix(prefix)?;
                if rest.is_empty() || rest.starts_with('/') {
                    Some(rest)
                } else {
                    None
                }
            }
        }
    }

    fn mount_prefix(&self) -> Option<&str> {
        self.config
            .mount_prefix
            .as_deref()
            .map(|p| p.trim_end_matches('/'))
            .filter(|p| !p.is_empty())
    }

    /// Resolves a method and normalized path to an action.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution<'_> {
        let Some(matched) = self.table.match_route(method, path) else {
            return Resolution::NoRoute;
        };

        let route = matched.route;
        match self
            .group_for(route)
            .and_then(|g| g.action(route.action()))
        {
            Some(action) => Resolution::Handler {
                route,
                action,
                args: matched.into_args(),
            },
            None => Resolution::Unresolved { route },
        }
    }

    /// Dispatches a request.
    ///
    /// Returns whatever the matched action returns. When no route matches,
    /// or the route's group lacks the action, sets status 404 and returns
    /// [`crate::NOT_FOUND_BODY`]. Panics raised by the action are not caught.
    pub fn dispatch(&self, request: &mut Request) -> Render {
        let resolution = match self.normalize_path(&request.path) {
            Some(path) => self.resolve(&request.method, path),
            None => Resolution::NoRoute,
        };

        match resolution {
            Resolution::Handler {
                route,
                action,
                args,
            } => {
                debug!(
                    route = route.name(),
                    method = %request.method,
                    path = %request.path,
                    "dispatching"
                );
                action(request, &args)
            }
            Resolution::Unresolved { route } => {
                warn!(
                    route = route.name(),
                    group = route.group(),
                    action = route.action(),
                    "route matched but its handler could not be resolved"
                );
                Self::not_found(request)
            }
            Resolution::NoRoute => {
                debug!(
                    method = %request.method,
                    path = %request.path,
                    "no route matched"
                );
                Self::not_found(request)
            }
        }
    }

    fn not_found(request: &mut Request) -> Render {
        request.set_response_code(404);
        Render::not_found()
    }

    /// Generates the full path of a named route, mount prefix included.
    pub fn url_for(&self, name: &str, params: &HashMap<String, String>) -> Option<String> {
        let path = self.table.url_for(name, params)?;
        Some(match self.mount_prefix() {
            None => path,
            Some(prefix) if path == "/" => prefix.to_string(),
            Some(prefix) => format!("{prefix}{path}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Arc<HandlerGroup> {
        HandlerGroup::builder("site")
            .action("index", |_req, _args| Render::html("index"))
            .action("docs", |_req, args| {
                Render::html(format!("docs: {}", args.get_str("item").unwrap_or("?")))
            })
            .build()
    }

    #[test]
    fn test_normalize_path_without_prefix() {
        let d = Dispatcher::new();
        assert_eq!(d.normalize_path("/docs/a?x=1"), Some("/docs/a"));
        assert_eq!(d.normalize_path("/"), Some("/"));
    }

    #[test]
    fn test_normalize_path_with_prefix() {
        let d = Dispatcher::with_config(DispatcherConfig::default().mount_prefix("/app/"));
        assert_eq!(d.normalize_path("/app/docs/a"), Some("/docs/a"));
        assert_eq!(d.normalize_path("/app"), Some(""));
        assert_eq!(d.normalize_path("/app/"), Some("/"));
        assert_eq!(d.normalize_path("/apple"), None);
        assert_eq!(d.normalize_path("/docs"), None);
    }

    #[test]
    fn test_resolution_variants() {
        let mut d = Dispatcher::new();
        d.register("docs", "/docs/{item}", site(), "docs", RouteOptions::new())
            .unwrap();
        d.register("gone", "/gone", site(), "missing", RouteOptions::new())
            .unwrap();

        match d.resolve(&Method::Get, "/docs/manual") {
            Resolution::Handler { route, args, .. } => {
                assert_eq!(route.name(), "docs");
                assert_eq!(args.get_str("item"), Some("manual"));
            }
            other => panic!("Expected handler, got {other:?}"),
        }
        assert!(matches!(
            d.resolve(&Method::Get, "/gone"),
            Resolution::Unresolved { .. }
        ));
        assert!(matches!(
            d.resolve(&Method::Get, "/nope"),
            Resolution::NoRoute
        ));
    }

    #[test]
    fn test_registered_group_is_not_shared_by_name() {
        let group = site();
        let mut d = Dispatcher::new();
        d.register("index", "/", Arc::clone(&group), "index", RouteOptions::new())
            .unwrap();
        d.register("docs", "/docs/{item}", Arc::clone(&group), "docs", RouteOptions::new())
            .unwrap();
        assert!(d.group("site").is_none());
        assert_eq!(d.table().len(), 2);
    }

    #[test]
    fn test_same_named_groups_stay_with_their_routes() {
        let index_only = HandlerGroup::builder("site")
            .action("index", |_req, _args| Render::html("index"))
            .build();
        let about_only = HandlerGroup::builder("site")
            .action("about", |_req, _args| Render::html("about"))
            .build();

        let mut d = Dispatcher::new();
        d.register("index", "/", index_only, "index", RouteOptions::new())
            .unwrap();
        d.register("about", "/about", about_only, "about", RouteOptions::new())
            .unwrap();

        let mut req = Request::get("/");
        assert_eq!(d.dispatch(&mut req).body_string(), Some("index".to_string()));
        assert_eq!(req.response_code(), 200);

        let mut req = Request::get("/about");
        assert_eq!(d.dispatch(&mut req).body_string(), Some("about".to_string()));
    }

    #[test]
    fn test_added_group_does_not_override_registered_route() {
        let mut d = Dispatcher::new();
        d.register("index", "/", site(), "index", RouteOptions::new())
            .unwrap();
        d.add_group(
            HandlerGroup::builder("site")
                .action("index", |_req, _args| Render::html("replacement"))
                .build(),
        );

        let mut req = Request::get("/");
        assert_eq!(d.dispatch(&mut req).body_string(), Some("index".to_string()));
    }

    #[test]
    fn test_redeclared_route_uses_named_group() {
        let mut d = Dispatcher::new();
        d.register("index", "/", site(), "index", RouteOptions::new())
            .unwrap();
        d.add_group(
            HandlerGroup::builder("other")
                .action("home", |_req, _args| Render::html("home"))
                .build(),
        );
        let decl = RouteDecl {
            name: "index".to_string(),
            pattern: "/".to_string(),
            group: "other".to_string(),
            action: "home".to_string(),
            methods: None,
            extra: serde_json::Map::new(),
        };
        d.register_declared(&decl).unwrap();

        let mut req = Request::get("/");
        assert_eq!(d.dispatch(&mut req).body_string(), Some("home".to_string()));
    }

    #[test]
    fn test_url_for_with_prefix() {
        let mut d = Dispatcher::with_config(DispatcherConfig::default().mount_prefix("/app"));
        d.register("index", "/", site(), "index", RouteOptions::new())
            .unwrap();
        d.register("docs", "/docs/{item}", site(), "docs", RouteOptions::new())
            .unwrap();

        let params: HashMap<String, String> = [("item".to_string(), "manual".to_string())]
            .into_iter()
            .collect();
        assert_eq!(
            d.url_for("docs", &params),
            Some("/app/docs/manual".to_string())
        );
        assert_eq!(d.url_for("index", &params), Some("/app".to_string()));
    }

    #[test]
    fn test_dispatch_under_prefix() {
        let mut d = Dispatcher::with_config(DispatcherConfig::default().mount_prefix("/app"));
        d.register("index", "/", site(), "index", RouteOptions::new())
            .unwrap();

        let mut req = Request::get("/app");
        assert_eq!(d.dispatch(&mut req).body_string(), Some("index".to_string()));

        let mut outside = Request::get("/");
        d.dispatch(&mut outside);
        assert_eq!(outside.response_code(), 404);
    }

    #[test]
    fn test_dispatcher_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Dispatcher>();
    }
}
