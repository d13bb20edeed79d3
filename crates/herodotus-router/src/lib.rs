//! Radix tree route table for Herodotus.
//!
//! The documentation recorder needs a route identity for every request: the
//! declared URI pattern, not the concrete request path. This crate maps a
//! method and request path to whatever value the caller stores per route
//! (usually an `Arc<RouteDescriptor>`).
//!
//! # Example
//!
//! ```rust
//! use herodotus_router::{Router, MethodRouter};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/v1/tasks", MethodRouter::new().get("tasks.list").post("tasks.create")).unwrap();
//! router.insert("/v1/tasks/{id}", MethodRouter::new().get("tasks.show")).unwrap();
//! router.insert("/files/*path", MethodRouter::new().get("files.serve")).unwrap();
//!
//! let m = router.match_route(&Method::GET, "/files/a/b.png").unwrap();
//! assert_eq!(*m.route, "files.serve");
//! assert_eq!(m.params.get("path"), Some("a/b.png"));
//! ```
//!
//! # Layout
//!
//! ```text
//!                (root)
//!                  │
//!          ┌───────┴───────┐
//!         "v1"          "files"
//!          │               │
//!       "tasks"         "*path"
//!        │    │
//!   [GET,POST] "{id}"
//!               │
//!             [GET]
//! ```

mod error;
mod method_router;
mod node;
mod params;
mod router;

pub use error::RouterError;
pub use method_router::MethodRouter;
pub use node::{Node, SegmentKind};
pub use params::Params;
pub use router::Router;

/// A matched route value and the parameters captured on the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value registered for the route and method.
    pub route: &'a T,
    /// Captured path parameters.
    pub params: Params,
}

impl<'a, T> RouteMatch<'a, T> {
    /// Creates a route match.
    #[must_use]
    pub fn new(route: &'a T, params: Params) -> Self {
        Self { route, params }
    }
}
