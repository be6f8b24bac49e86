//! Handler groups: named sets of actions a route can point at.

use std::collections::HashMap;
use std::sync::Arc;

use crate::args::RouteArgs;
use crate::request::Request;
use crate::response::Render;

/// A boxed handler action.
pub type Action = Arc<dyn Fn(&mut Request, &RouteArgs) -> Render + Send + Sync>;

/// A named bundle of related actions, looked up by action name at dispatch.
///
/// # Example
///
/// ```ignore
/// struct Site;
///
/// impl Site {
///     fn index(&self, _req: &mut Request, _args: &RouteArgs) -> Render {
///         Render::html("<html><body>Hello World!</body></html>")
///     }
/// }
///
/// let site = HandlerGroup::controller("site", Arc::new(Site))
///     .action("index", Site::index)
///     .build();
/// ```
pub struct HandlerGroup {
    name: String,
    actions: HashMap<String, Action>,
}

impl HandlerGroup {
    /// Starts a group of closure or function actions.
    pub fn builder(name: impl Into<String>) -> HandlerGroupBuilder {
        HandlerGroupBuilder {
            name: name.into(),
            actions: HashMap::new(),
        }
    }

    /// Starts a group whose actions are methods on a shared controller.
    pub fn controller<T>(name: impl Into<String>, controller: Arc<T>) -> ControllerBuilder<T>
    where
        T: Send + Sync + 'static,
    {
        ControllerBuilder {
            controller,
            inner: Self::builder(name),
        }
    }

    /// Returns the group name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Looks up an action by name.
    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    /// Returns true if the group has an action with this name.
    pub fn has_action(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Returns the action names, in no particular order.
    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HandlerGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.action_names().collect();
        names.sort_unstable();
        f.debug_struct("HandlerGroup")
            .field("name", &self.name)
            .field("actions", &names)
            .finish()
    }
}

/// Builder for a [`HandlerGroup`] of closures.
pub struct HandlerGroupBuilder {
    name: String,
    actions: HashMap<String, Action>,
}

impl HandlerGroupBuilder {
    /// Adds an action. A later action with the same name replaces the earlier one.
    #[must_use]
    pub fn action<F>(mut self, name: impl Into<String>, action: F) -> Self
    where
        F: Fn(&mut Request, &RouteArgs) -> Render + Send + Sync + 'static,
    {
        self.actions.insert(name.into(), Arc::new(action));
        self
    }

    /// Finishes the group.
    pub fn build(self) -> Arc<HandlerGroup> {
        Arc::new(HandlerGroup {
            name: self.name,
            actions: self.actions,
        })
    }
}

/// Builder for a [`HandlerGroup`] backed by a controller object.
pub struct ControllerBuilder<T> {
    controller: Arc<T>,
    inner: HandlerGroupBuilder,
}

impl<T> ControllerBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Exposes a controller method under an action name.
    #[must_use]
    pub fn action<M>(mut self, name: impl Into<String>, method: M) -> Self
    where
        M: Fn(&T, &mut Request, &RouteArgs) -> Render + Send + Sync + 'static,
    {
        let controller = Arc::clone(&self.controller);
        self.inner = self
            .inner
            .action(name, move |req: &mut Request, args: &RouteArgs| {
                method(&*controller, req, args)
            });
        self
    }

    /// Finishes the group.
    pub fn build(self) -> Arc<HandlerGroup> {
        self.inner.build()
    }
}
