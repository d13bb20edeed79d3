//! Per-request pipeline state.

use std::sync::Arc;
use std::time::Instant;

use herodotus_core::{RequestId, RouteDescriptor};
use herodotus_router::Params;

/// State carried through the middleware chain for one request.
///
/// The routing stage fills in the matched [`RouteDescriptor`]; the
/// documentation stage reads it back once the response is known. Requests
/// that match no route keep `route() == None` and are never documented.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use herodotus_core::RouteDescriptor;
/// use herodotus_middleware::context::MiddlewareContext;
///
/// let mut ctx = MiddlewareContext::new();
/// assert!(ctx.route().is_none());
///
/// ctx.set_route(Arc::new(RouteDescriptor::new("v1/tasks/create")));
/// assert_eq!(ctx.route().unwrap().uri(), "v1/tasks/create");
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    request_id: RequestId,
    route: Option<Arc<RouteDescriptor>>,
    params: Params,
    started_at: Instant,
}

impl MiddlewareContext {
    /// Creates a context with a fresh request ID and no route.
    #[must_use]
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            route: None,
            params: Params::new(),
            started_at: Instant::now(),
        }
    }

    /// Correlation ID attached to this request's log events.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// The matched route, if any.
    #[must_use]
    pub fn route(&self) -> Option<&RouteDescriptor> {
        self.route.as_deref()
    }

    /// Records the matched route.
    pub fn set_route(&mut self, route: Arc<RouteDescriptor>) {
        self.route = Some(route);
    }

    /// Path parameters captured by the route match.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Records captured path parameters.
    pub fn set_params(&mut self, params: Params) {
        self.params = params;
    }

    /// Time since the request entered the pipeline.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_has_no_route() {
        let ctx = MiddlewareContext::new();
        assert!(ctx.route().is_none());
        assert!(ctx.params().is_empty());
    }

    #[test]
    fn test_route_and_params() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_route(Arc::new(
            RouteDescriptor::new("/v1/tasks/{id}").with_name("tasks.show"),
        ));
        ctx.set_params(std::iter::once(("id".to_string(), "9".to_string())).collect());

        assert_eq!(ctx.route().unwrap().name(), Some("tasks.show"));
        assert_eq!(ctx.params().get("id"), Some("9"));
    }

    #[test]
    fn test_contexts_get_distinct_request_ids() {
        assert_ne!(
            MiddlewareContext::new().request_id(),
            MiddlewareContext::new().request_id()
        );
    }

    #[test]
    fn test_elapsed_grows() {
        let ctx = MiddlewareContext::new();
        let first = ctx.elapsed();
        assert!(ctx.elapsed() >= first);
    }
}
