//! The recorder's pipeline stages.
//!
//! 1. [`routing`] - resolve the route descriptor
//! 2. [`documentation`] - observe the response

pub mod documentation;
pub mod routing;

pub use documentation::DocumentationMiddleware;
pub use routing::{RouteTable, RoutingMiddleware};
