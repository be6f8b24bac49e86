#![allow(dead_code)]

use std::sync::Arc;

use oxide_routes::{HandlerGroup, Render, Request, RouteArgs};

/// A controller with the actions used across the dispatch tests.
pub struct Controller;

impl Controller {
    pub fn index(&self, _req: &mut Request, args: &RouteArgs) -> Render {
        assert!(args.is_empty(), "index takes no arguments, got {args:?}");
        Render::html("<html><body>Hello World!</body></html>")
    }

    pub fn docs(&self, _req: &mut Request, args: &RouteArgs) -> Render {
        let item = args.require("item").expect("docs is always routed with an item");
        Render::html(format!("<html><body>Docs for {item}</body></html>"))
    }

    pub fn post_data(&self, _req: &mut Request, _args: &RouteArgs) -> Render {
        Render::html("<html><body>OK</body></html>")
    }

    pub fn echo(&self, req: &mut Request, args: &RouteArgs) -> Render {
        let mut pairs: Vec<String> = args
            .iter()
            .map(|(k, v)| format!("{k}={}", v.as_str().map_or_else(|| v.to_string(), String::from)))
            .collect();
        pairs.sort();
        Render::html(format!("{} {}", req.method, pairs.join("&")))
    }
}

pub fn controller() -> Arc<HandlerGroup> {
    HandlerGroup::controller("controller", Arc::new(Controller))
        .action("index", Controller::index)
        .action("docs", Controller::docs)
        .action("post_data", Controller::post_data)
        .action("echo", Controller::echo)
        .build()
}

/// Dispatches `method path` and returns the status and body.
pub fn send(
    dispatcher: &oxide_routes::Dispatcher,
    method: &str,
    path: &str,
) -> (u16, Option<String>) {
    let mut req = Request::new(method.into(), path);
    let render = dispatcher.dispatch(&mut req);
    (req.response_code(), render.body_string())
}
