//! Declared header parameters.
//!
//! Middleware declares the headers it expects as [`ParameterDescriptor`]s.
//! The recorder never introspects middleware at runtime; descriptors are
//! registered explicitly and dumped into each documented path once.
//!
//! # Masking
//!
//! A descriptor built with [`ParameterDescriptorBuilder::masked`] always dumps
//! `"example": "<masked>"` and `"x-masked": true`. [`ParameterObject`] is
//! read-only apart from [`ParameterObject::offer_example`], which refuses
//! masked parameters.
//!
//! # Example
//!
//! ```
//! use herodotus_core::{ParameterDescriptor, Schema};
//!
//! let auth = ParameterDescriptor::builder("Authorization")
//!     .description("Bearer token")
//!     .schema(Schema::string())
//!     .required(true)
//!     .masked(true)
//!     .build()
//!     .unwrap();
//!
//! let dumped = auth.dump();
//! assert_eq!(dumped.example(), Some(&serde_json::Value::from(ParameterDescriptor::MASK)));
//! assert!(dumped.is_masked());
//! ```
//!
//! The placeholder cannot be assigned over:
//!
//! ```compile_fail
//! use herodotus_core::ParameterDescriptor;
//!
//! let mut dumped = ParameterDescriptor::builder("Authorization")
//!     .masked(true)
//!     .build()
//!     .unwrap()
//!     .dump();
//! dumped.example = Some("Bearer secret".into());
//! ```

use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use http::HeaderName;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An immutable declaration of one header parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    description: String,
    schema: Schema,
    required: bool,
    deprecated: bool,
    should_mask: bool,
}

impl ParameterDescriptor {
    /// Placeholder example written for masked parameters.
    pub const MASK: &'static str = "<masked>";

    /// Starts building a descriptor for the header `name`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> ParameterDescriptorBuilder {
        ParameterDescriptorBuilder::new(name)
    }

    /// Shorthand for an optional, unmasked string header.
    pub fn header(name: impl Into<String>, description: impl Into<String>) -> CoreResult<Self> {
        Self::builder(name).description(description).build()
    }

    /// Declared header name, as written in the declaration.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value shape.
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Whether the header is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether the header is deprecated.
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Whether example values must be hidden.
    #[must_use]
    pub fn should_mask(&self) -> bool {
        self.should_mask
    }

    /// Projects the descriptor into a documentation fragment.
    #[must_use]
    pub fn dump(&self) -> ParameterObject {
        ParameterObject {
            name: self.name.clone(),
            description: self.description.clone(),
            required: self.required,
            deprecated: self.deprecated,
            example: self
                .should_mask
                .then(|| Value::String(Self::MASK.to_string())),
            location: ParameterLocation::Header,
            schema: self.schema.dump(),
            masked: self.should_mask,
        }
    }
}

/// Builder for [`ParameterDescriptor`].
#[derive(Debug, Clone)]
pub struct ParameterDescriptorBuilder {
    name: String,
    description: String,
    schema: Schema,
    required: bool,
    deprecated: bool,
    should_mask: bool,
}

impl ParameterDescriptorBuilder {
    /// Creates a builder with a string schema and every flag off.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            schema: Schema::string(),
            required: false,
            deprecated: false,
            should_mask: false,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the value shape.
    #[must_use]
    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    /// Marks the header as required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks the header as deprecated.
    #[must_use]
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Hides example values behind [`ParameterDescriptor::MASK`].
    #[must_use]
    pub fn masked(mut self, should_mask: bool) -> Self {
        self.should_mask = should_mask;
        self
    }

    /// Validates the name and builds the descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidParameter`] if the name is not a valid
    /// HTTP header name.
    pub fn build(self) -> CoreResult<ParameterDescriptor> {
        if self.name.is_empty() {
            return Err(CoreError::invalid_parameter(&self.name, "name is empty"));
        }
        HeaderName::from_bytes(self.name.as_bytes())
            .map_err(|e| CoreError::invalid_parameter(&self.name, e.to_string()))?;

        Ok(ParameterDescriptor {
            name: self.name,
            description: self.description,
            schema: self.schema,
            required: self.required,
            deprecated: self.deprecated,
            should_mask: self.should_mask,
        })
    }
}

/// Parameter location. Only headers are declared by middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Header parameter.
    Header,
}

/// Dumped form of a [`ParameterDescriptor`], as stored in a path entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterObject {
    name: String,
    description: String,
    required: bool,
    deprecated: bool,
    example: Option<Value>,
    #[serde(rename = "in")]
    location: ParameterLocation,
    schema: Value,
    #[serde(rename = "x-masked")]
    masked: bool,
}

impl ParameterObject {
    /// Header name, as declared.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether the header is required.
    #[must_use]
    pub fn required(&self) -> bool {
        self.required
    }

    /// Whether the header is deprecated.
    #[must_use]
    pub fn deprecated(&self) -> bool {
        self.deprecated
    }

    /// Example value: the mask placeholder, an observed value, or `None`.
    #[must_use]
    pub fn example(&self) -> Option<&Value> {
        self.example.as_ref()
    }

    /// Parameter location.
    #[must_use]
    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    /// Value shape.
    #[must_use]
    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Whether example values are masked.
    #[must_use]
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Fills in an observed example value.
    ///
    /// Only unmasked parameters without an example accept one. Returns `true`
    /// if the value was stored.
    pub fn offer_example(&mut self, value: &str) -> bool {
        if self.masked || self.example.is_some() {
            return false;
        }
        self.example = Some(Value::String(value.to_string()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unmasked_dump_shape() {
        let param = ParameterDescriptor::builder("X-Request-Id")
            .description("Correlation id")
            .schema(Schema::string().with_format("uuid"))
            .build()
            .unwrap();

        let value = serde_json::to_value(param.dump()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "X-Request-Id",
                "description": "Correlation id",
                "required": false,
                "deprecated": false,
                "example": null,
                "in": "header",
                "schema": {"type": "string", "format": "uuid"},
                "x-masked": false
            })
        );
    }

    #[test]
    fn test_dump_field_order() {
        let param = ParameterDescriptor::header("Accept", "").unwrap();
        let json = serde_json::to_string(&param.dump()).unwrap();
        let order = [
            "\"name\"",
            "\"description\"",
            "\"required\"",
            "\"deprecated\"",
            "\"example\"",
            "\"in\"",
            "\"schema\"",
            "\"x-masked\"",
        ];
        let positions: Vec<usize> = order.iter().map(|k| json.find(k).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_masked_dump() {
        let param = ParameterDescriptor::builder("Authorization")
            .masked(true)
            .build()
            .unwrap();

        let dumped = param.dump();
        assert_eq!(dumped.example(), Some(&json!("<masked>")));
        assert!(dumped.is_masked());
    }

    #[test]
    fn test_masked_rejects_examples() {
        let mut dumped = ParameterDescriptor::builder("Authorization")
            .masked(true)
            .build()
            .unwrap()
            .dump();

        assert!(!dumped.offer_example("Bearer secret"));
        assert_eq!(dumped.example(), Some(&json!("<masked>")));
    }

    #[test]
    fn test_offer_example_fills_once() {
        let mut dumped = ParameterDescriptor::header("Accept-Language", "")
            .unwrap()
            .dump();

        assert!(dumped.offer_example("en"));
        assert!(!dumped.offer_example("de"));
        assert_eq!(dumped.example(), Some(&json!("en")));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let err = ParameterDescriptor::header("X Bad Header", "").unwrap_err();
        assert!(matches!(err, CoreError::InvalidParameter { .. }));

        let err = ParameterDescriptor::header("", "").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_name_keeps_declared_case() {
        let param = ParameterDescriptor::header("X-Project-Id", "").unwrap();
        assert_eq!(param.name(), "X-Project-Id");
    }
}
