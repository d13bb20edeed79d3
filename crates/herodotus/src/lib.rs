//! # Herodotus
//!
//! **Runtime API documentation recorder**
//!
//! Herodotus sits in the middleware pipeline, watches real request/response
//! traffic and builds an OpenAPI-style document from it:
//!
//! - Header parameters come from metadata that middleware declares in a
//!   [`MiddlewareRegistry`](docs::MiddlewareRegistry)
//! - Response bodies become examples, keyed by route, method, status and
//!   content type
//! - The document is written once, when the process winds down
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use herodotus::prelude::*;
//!
//! let mut registry = MiddlewareRegistry::new();
//! registry
//!     .register("app::Authenticate", vec![
//!         ParameterDescriptor::builder("Authorization").required(true).masked(true).build()?,
//!     ])
//!     .alias("auth", "app::Authenticate");
//!
//! let recorder = Recorder::load(registry)?;
//! recorder.init_telemetry()?;
//!
//! let mut routes = RouteTable::new();
//! routes.route(Method::POST, "/v1/tasks/create", Arc::new(
//!     RouteDescriptor::new("v1/tasks/create").with_name("tasks.create").with_middleware(["auth"]),
//! ))?;
//!
//! let pipeline = recorder.pipeline(Arc::new(routes)).build();
//! let _guard = recorder.flush_guard();
//! // serve requests through `pipeline.process(...)`
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → Routing → Documentation → app stages → Handler
//!                          ↓
//!        TrafficObserver → DocumentAggregator
//!                          ↓ (shutdown)
//!                    DocumentWriter → storage/documentation.json
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod recorder;

pub use error::{HerodotusError, HerodotusResult};
pub use recorder::{Recorder, DEFAULT_CONFIG_FILE};

pub use herodotus_config as config;
pub use herodotus_core as core;
pub use herodotus_docs as docs;
pub use herodotus_middleware as middleware;
pub use herodotus_router as router;
pub use herodotus_telemetry as telemetry;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{HerodotusError, HerodotusResult, Recorder};

    pub use herodotus_config::{ConfigLoader, HerodotusConfig};
    pub use herodotus_core::{ParameterDescriptor, RequestId, RouteDescriptor, Schema};
    pub use herodotus_docs::{
        from_fn, DeclaresParameters, FlushGuard, FlushOutcome, MiddlewareRegistry, ResolveError,
    };
    pub use herodotus_middleware::stages::RouteTable;
    pub use herodotus_middleware::{
        BoxFuture, Middleware, MiddlewareContext, Next, Pipeline, Request, Response, ResponseExt,
    };
    pub use herodotus_router::MethodRouter;
}
