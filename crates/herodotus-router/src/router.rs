//! Route table API.

use http::Method;

use crate::error::RouterError;
use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::RouteMatch;

/// A radix tree route table storing one `T` per (path pattern, method).
///
/// # Example
///
/// ```rust
/// use herodotus_router::{Router, MethodRouter};
/// use http::Method;
///
/// let mut router = Router::new();
/// router
///     .insert("/v1/tasks/{id}", MethodRouter::new().get("tasks.show"))
///     .unwrap();
///
/// let m = router.match_route(&Method::GET, "/v1/tasks/9").unwrap();
/// assert_eq!(*m.route, "tasks.show");
/// assert_eq!(m.params.get("id"), Some("9"));
/// ```
///
/// # Route Priority
///
/// Static segments win over parameters, parameters over wildcards, so
/// `/tasks/export` matches before `/tasks/{id}`.
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Registers the methods for a path pattern.
    ///
    /// # Errors
    ///
    /// See [`Node::insert`].
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<(), RouterError> {
        self.root.insert(path, methods)?;
        self.route_count += 1;
        Ok(())
    }

    /// Registers a single-method route.
    ///
    /// # Errors
    ///
    /// See [`Node::insert`].
    pub fn route(&mut self, method: Method, path: &str, value: T) -> Result<(), RouterError> {
        self.insert(path, MethodRouter::new().method(method, value))
    }

    /// Matches a method and request path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_, T>> {
        let (methods, params) = self.root.match_path(path)?;
        let route = methods.get_route(method)?;
        Some(RouteMatch::new(route, params))
    }

    /// Matches a request path regardless of method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Number of `insert` calls that succeeded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
