//! Route identity consumed by the observer.

use http::Method;
use serde_json::{Map, Value};

/// A matched route as the recorder sees it.
///
/// The URI is stored the way route tables declare it, without a leading
/// slash (`v1/tasks/create`). Arbitrary action metadata lives in `meta`; the
/// only key the recorder reads is `deprecated`.
///
/// # Example
///
/// ```
/// use herodotus_core::RouteDescriptor;
/// use http::Method;
///
/// let route = RouteDescriptor::new("/v1/tasks/create")
///     .with_name("tasks.create")
///     .with_middleware(["auth:api", "throttle:60,1"]);
///
/// assert_eq!(route.uri(), "v1/tasks/create");
/// assert_eq!(route.path_key(&Method::POST), "/v1/tasks/create.post");
/// assert!(!route.deprecated());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteDescriptor {
    uri: String,
    name: Option<String>,
    meta: Map<String, Value>,
    middleware: Vec<String>,
}

impl RouteDescriptor {
    /// Creates a descriptor for `uri`, stripping a leading slash.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let uri = uri.strip_prefix('/').map(str::to_string).unwrap_or(uri);
        Self {
            uri,
            ..Self::default()
        }
    }

    /// Sets the logical route name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets one action metadata entry.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Marks the route as deprecated in its action metadata.
    #[must_use]
    pub fn with_deprecated(self, deprecated: bool) -> Self {
        self.with_meta("deprecated", deprecated)
    }

    /// Appends middleware identifiers (e.g. `auth:api`).
    #[must_use]
    pub fn with_middleware<I, S>(mut self, middleware: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.middleware.extend(middleware.into_iter().map(Into::into));
        self
    }

    /// Route URI without a leading slash.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Logical route name, if the route is named.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Action metadata.
    #[must_use]
    pub fn meta(&self) -> &Map<String, Value> {
        &self.meta
    }

    /// Route-specific middleware identifiers, in declaration order.
    #[must_use]
    pub fn middleware(&self) -> &[String] {
        &self.middleware
    }

    /// Reads `meta["deprecated"]`; anything but `true` counts as false.
    #[must_use]
    pub fn deprecated(&self) -> bool {
        self.meta
            .get("deprecated")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Document key for this route and `method`: `/<uri>.<method>`.
    #[must_use]
    pub fn path_key(&self, method: &Method) -> String {
        format!("/{}.{}", self.uri, method.as_str().to_ascii_lowercase())
    }
}
