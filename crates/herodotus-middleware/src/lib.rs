//! # Herodotus Middleware
//!
//! Middleware pipeline that puts the documentation recorder in the request
//! path.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → Routing → Documentation → app stages → Handler
//!                          ↓
//!                   TrafficObserver
//! ```
//!
//! | Stage | Middleware    | Purpose                                        |
//! |-------|---------------|------------------------------------------------|
//! | 1     | Routing       | Resolve the `RouteDescriptor` for the request  |
//! | 2     | Documentation | Buffer the response body and observe the pair  |
//!
//! Application stages added afterwards run inside the documentation stage,
//! so the headers they set and the responses they short-circuit with are
//! recorded.
//!
//! ## Example
//!
//! ```
//! use herodotus_middleware::pipeline::Stage;
//!
//! let stages = Stage::all();
//! assert_eq!(stages[0].name(), "routing");
//! assert_eq!(stages[1].name(), "documentation");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use context::MiddlewareContext;
pub use middleware::{BoxFuture, Handler, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use types::{Request, Response, ResponseExt};
