//! # Herodotus Docs
//!
//! Builds an OpenAPI-style document from live traffic.
//!
//! - [`MetadataExtractor`] resolves route middleware to declared header
//!   parameters through a [`MiddlewareRegistry`]
//! - [`TrafficObserver`] merges each completed request/response into the
//!   shared [`DocumentAggregator`]
//! - [`DocumentWriter`] persists the document once, at shutdown
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use herodotus_docs::*;
//!
//! let aggregator = Arc::new(DocumentAggregator::new());
//! let extractor = Arc::new(MetadataExtractor::new(Arc::new(registry), ["auth"]));
//! let observer = TrafficObserver::new(Arc::clone(&aggregator), extractor);
//!
//! // for every completed request
//! observer.observe(Some(&route), &request_parts, &response_parts, &body);
//!
//! // at shutdown
//! let writer = DocumentWriter::new(DocumentHeader::new("Task API", "1.0.0"), "storage/documentation.json");
//! writer.flush(&aggregator)?;
//! ```
//!
//! ## Merge rules
//!
//! - One path entry per `/<uri>.<method>`, created on first observation
//!   together with its parameter list
//! - One response entry per status code
//! - Response headers are unioned, except `date` and `content-type`
//! - The first body per content type is a singular `example`; the second
//!   turns the entry into an `examples` map keyed by `urn:uuid:` ids

mod aggregator;
mod document;
mod error;
pub mod extractor;
pub mod merge;
mod observer;
mod writer;

pub use aggregator::DocumentAggregator;
pub use document::{
    Contact, ContentEntry, Document, DocumentHeader, Example, Info, PathEntry, ResponseEntry,
    Server, OPENAPI_VERSION,
};
pub use error::{DocsError, DocsResult, ResolveError};
pub use extractor::{
    from_fn, DeclaresParameters, FnSource, MetadataExtractor, MiddlewareRegistry, ParameterSource,
};
pub use merge::ExampleForm;
pub use observer::{Observation, SkipReason, TrafficObserver};
pub use writer::{DocumentWriter, FlushGuard, FlushOutcome};
