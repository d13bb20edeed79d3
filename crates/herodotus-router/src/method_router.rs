//! Per-path method table.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to route values for a single path.
///
/// Any method is accepted, including extension methods such as `PURGE`.
///
/// # Example
///
/// ```rust
/// use herodotus_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new()
///     .get("tasks.list")
///     .post("tasks.create");
///
/// assert_eq!(methods.get_route(&Method::GET), Some(&"tasks.list"));
/// assert_eq!(methods.get_route(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    routes: SmallVec<[(Method, T); 2]>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            routes: SmallVec::new(),
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `value` for `method`, replacing any previous value.
    #[must_use]
    pub fn method(mut self, method: Method, value: T) -> Self {
        self.set(method, value);
        self
    }

    /// Registers a GET route.
    #[must_use]
    pub fn get(self, value: T) -> Self {
        self.method(Method::GET, value)
    }

    /// Registers a POST route.
    #[must_use]
    pub fn post(self, value: T) -> Self {
        self.method(Method::POST, value)
    }

    /// Registers a PUT route.
    #[must_use]
    pub fn put(self, value: T) -> Self {
        self.method(Method::PUT, value)
    }

    /// Registers a PATCH route.
    #[must_use]
    pub fn patch(self, value: T) -> Self {
        self.method(Method::PATCH, value)
    }

    /// Registers a DELETE route.
    #[must_use]
    pub fn delete(self, value: T) -> Self {
        self.method(Method::DELETE, value)
    }

    fn set(&mut self, method: Method, value: T) {
        if let Some(slot) = self.routes.iter_mut().find(|(m, _)| *m == method) {
            slot.1 = value;
        } else {
            self.routes.push((method, value));
        }
    }

    /// Returns the value registered for `method`.
    #[must_use]
    pub fn get_route(&self, method: &Method) -> Option<&T> {
        self.routes
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, value)| value)
    }

    /// Adds the methods of `other` that are not registered here yet.
    pub fn merge(&mut self, other: MethodRouter<T>) {
        for (method, value) in other.routes {
            if self.get_route(&method).is_none() {
                self.routes.push((method, value));
            }
        }
    }

    /// Returns true if any method is registered.
    #[must_use]
    pub fn has_any_method(&self) -> bool {
        !self.routes.is_empty()
    }

    /// Returns the registered methods in registration order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        self.routes.iter().map(|(m, _)| m.clone()).collect()
    }
}
