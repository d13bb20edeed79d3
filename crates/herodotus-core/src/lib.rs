//! # Herodotus Core
//!
//! Core descriptors shared by the Herodotus documentation recorder.
//!
//! - [`ParameterDescriptor`] - Declared header parameter with masking support
//! - [`Schema`] - Value-shape descriptor dumped into parameter objects
//! - [`RouteDescriptor`] - Route identity handed to the observer
//! - [`RequestId`] - UUID v7 request identifier
//! - [`CoreError`] - Construction errors

#![doc(html_root_url = "https://docs.rs/herodotus-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod context;
mod error;
pub mod parameter;
mod route;
pub mod schema;

pub use context::RequestId;
pub use error::{CoreError, CoreResult};
pub use parameter::{ParameterDescriptor, ParameterDescriptorBuilder, ParameterLocation, ParameterObject};
pub use route::RouteDescriptor;
pub use schema::{Schema, SchemaType};
