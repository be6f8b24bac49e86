//! # oxide-routes
//!
//! Routes-style request dispatch: declarative URL patterns mapped to
//! named actions on handler groups.
//!
//! This crate provides:
//! - Path patterns with literal segments and `{name}` placeholders
//! - Optional per-route HTTP method filters
//! - Handler groups mapping action names to callables
//! - A dispatcher that binds captured values as named arguments
//! - Declarative route tables loaded from JSON
//! - Reverse URL generation for named routes
//!
//! The HTTP server itself is not part of this crate. A server binding
//! builds a [`Request`], calls [`Dispatcher::dispatch`], and writes out
//! the returned [`Render`] together with the status and headers left on
//! the request.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use oxide_routes::{Dispatcher, HandlerGroup, Method, Render, Request, RouteArgs, RouteOptions};
//!
//! struct Controller;
//!
//! impl Controller {
//!     fn index(&self, _req: &mut Request, _args: &RouteArgs) -> Render {
//!         Render::html("<html><body>Hello World!</body></html>")
//!     }
//!
//!     fn docs(&self, _req: &mut Request, args: &RouteArgs) -> Render {
//!         let item = args.get_str("item").unwrap_or_default();
//!         Render::html(format!("<html><body>Docs for {item}</body></html>"))
//!     }
//!
//!     fn post_data(&self, _req: &mut Request, _args: &RouteArgs) -> Render {
//!         Render::html("<html><body>OK</body></html>")
//!     }
//! }
//!
//! let c = HandlerGroup::controller("controller", Arc::new(Controller))
//!     .action("index", Controller::index)
//!     .action("docs", Controller::docs)
//!     .action("post_data", Controller::post_data)
//!     .build();
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register("index", "/", c.clone(), "index", RouteOptions::new())?;
//! dispatcher.register("docs", "/docs/{item}", c.clone(), "docs", RouteOptions::new())?;
//! dispatcher.register(
//!     "data",
//!     "/data",
//!     c,
//!     "post_data",
//!     RouteOptions::new().method(Method::Post),
//! )?;
//!
//! let mut request = Request::get("/docs/manual");
//! let body = dispatcher.dispatch(&mut request);
//! ```
//!
//! ## Matching
//!
//! A placeholder matches exactly one non-empty path segment, and a
//! pattern only matches paths with the same number of segments. Routes
//! are tried in registration order; the first one whose path shape and
//! method filter both accept the request wins. A method mismatch is not
//! reported separately: the request falls through to later routes and
//! ends in the same 404 as an unknown path.
//!
//! ## Deferred responses
//!
//! ```ignore
//! let (mut request, body) = Request::get("/wait").deferred();
//! // an action takes `request.take_stream()`, writes later, returns Render::NotDoneYet
//! let render = dispatcher.dispatch(&mut request);
//! ```

mod args;
mod config;
mod dispatcher;
mod error;
mod handler;
mod path;
mod request;
mod response;
mod route;
mod table;

pub use args::RouteArgs;
pub use config::{DispatcherConfig, RouteDecl, RoutesConfig};
pub use dispatcher::{Dispatcher, Resolution};
pub use error::{PatternErrorKind, Result, RouterError};
pub use handler::{Action, ControllerBuilder, HandlerGroup, HandlerGroupBuilder};
pub use path::{PathPattern, PathSegment, split_path};
pub use request::{Method, Request, ResponseBody, ResponseStream};
pub use response::{NOT_FOUND_BODY, Render};
pub use route::{Route, RouteOptions};
pub use table::{RouteMatch, RouteTable};
