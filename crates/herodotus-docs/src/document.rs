//! Document tree types.
//!
//! The persisted document has a static header block (`openapi`, `info`,
//! `servers`) followed by the accumulated `paths` map:
//!
//! ```text
//! paths["/v1/tasks/create.post"]
//!   ├── deprecated
//!   ├── operationId
//!   ├── responses["201"]
//!   │     ├── headers{name: [values]}
//!   │     └── content["application/json"] = {example} | {examples{id: ..}}
//!   └── parameters[...]
//! ```
//!
//! Maps are `IndexMap`s so the file lists paths, statuses and examples in
//! the order they were first observed.

use herodotus_core::{ParameterObject, RouteDescriptor};
use http::StatusCode;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// OpenAPI version written into every document.
pub const OPENAPI_VERSION: &str = "3.0.1";

/// The persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// OpenAPI version.
    pub openapi: String,
    /// API metadata.
    pub info: Info,
    /// Declared servers.
    pub servers: Vec<Server>,
    /// Observed paths keyed by `/<uri>.<method>`.
    pub paths: IndexMap<String, PathEntry>,
}

/// API metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    /// API title.
    pub title: String,
    /// Contact information.
    pub contact: Contact,
    /// API version.
    pub version: String,
}

/// Contact information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Contact name.
    pub name: String,
    /// Contact email.
    pub email: String,
}

/// Server information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Server {
    /// Base URL.
    pub url: String,
    /// Server description.
    pub description: String,
}

/// Static header block combined with the paths at flush time.
///
/// # Example
///
/// ```
/// use herodotus_docs::DocumentHeader;
///
/// let header = DocumentHeader::new("Task API", "1.4.0")
///     .contact("API Team", "api@example.com")
///     .server("http://localhost:8000", "Local server");
///
/// let doc = header.document(Default::default());
/// assert_eq!(doc.openapi, "3.0.1");
/// assert_eq!(doc.servers.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentHeader {
    info: Info,
    servers: Vec<Server>,
}

impl Default for DocumentHeader {
    fn default() -> Self {
        Self::new("API Documentation", env!("CARGO_PKG_VERSION"))
    }
}

impl DocumentHeader {
    /// Creates a header with an empty contact and no servers.
    #[must_use]
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: Info {
                title: title.into(),
                contact: Contact::default(),
                version: version.into(),
            },
            servers: Vec::new(),
        }
    }

    /// Sets the contact.
    #[must_use]
    pub fn contact(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.info.contact = Contact {
            name: name.into(),
            email: email.into(),
        };
        self
    }

    /// Appends a server.
    #[must_use]
    pub fn server(mut self, url: impl Into<String>, description: impl Into<String>) -> Self {
        self.servers.push(Server {
            url: url.into(),
            description: description.into(),
        });
        self
    }

    /// API metadata.
    #[must_use]
    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Declared servers.
    #[must_use]
    pub fn servers(&self) -> &[Server] {
        &self.servers
    }

    /// Combines the header with `paths`.
    #[must_use]
    pub fn document(&self, paths: IndexMap<String, PathEntry>) -> Document {
        Document {
            openapi: OPENAPI_VERSION.to_string(),
            info: self.info.clone(),
            servers: self.servers.clone(),
            paths,
        }
    }
}

/// One documented route and method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEntry {
    /// Whether the route is deprecated.
    pub deprecated: bool,
    /// Logical route name, null when the route is unnamed.
    #[serde(rename = "operationId")]
    pub operation_id: Option<String>,
    /// Responses keyed by status code.
    pub responses: IndexMap<String, ResponseEntry>,
    /// Header parameters declared by the route's middleware.
    pub parameters: Vec<ParameterObject>,
}

impl PathEntry {
    /// Creates an entry with no responses.
    #[must_use]
    pub fn new(route: &RouteDescriptor, parameters: Vec<ParameterObject>) -> Self {
        Self {
            deprecated: route.deprecated(),
            operation_id: route.name().map(str::to_string),
            responses: IndexMap::new(),
            parameters,
        }
    }

    /// Returns the response entry for `status`, creating it if missing.
    pub fn response_mut(&mut self, status: StatusCode) -> &mut ResponseEntry {
        self.responses
            .entry(status.as_str().to_string())
            .or_default()
    }
}

/// Observed responses for one status code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseEntry {
    /// Response headers, minus `date` and `content-type`.
    pub headers: IndexMap<String, Vec<String>>,
    /// Examples keyed by content type.
    pub content: IndexMap<String, ContentEntry>,
}

/// Examples recorded for one content type.
///
/// Starts singular and turns plural on the second body; never goes back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentEntry {
    /// Exactly one observed body.
    Single {
        /// The body.
        example: Example,
    },
    /// Two or more observed bodies, keyed by generated id.
    Multiple {
        /// Bodies by id.
        examples: IndexMap<String, Example>,
    },
}

impl ContentEntry {
    /// Number of recorded bodies.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single { .. } => 1,
            Self::Multiple { examples } => examples.len(),
        }
    }

    /// Always false; an entry exists only once a body was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Recorded bodies in insertion order.
    pub fn values(&self) -> Vec<&Value> {
        match self {
            Self::Single { example } => vec![&example.value],
            Self::Multiple { examples } => examples.values().map(|e| &e.value).collect(),
        }
    }
}

/// One recorded body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Example {
    /// The body, parsed JSON or a string.
    pub value: Value,
}

impl Example {
    /// Wraps a body value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}
