//! Route resolution stage.

use std::sync::Arc;

use herodotus_core::RouteDescriptor;
use herodotus_router::Router;

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// Route table mapping request paths to shared route descriptors.
pub type RouteTable = Router<Arc<RouteDescriptor>>;

/// Resolves the request's [`RouteDescriptor`] and stores it in the context.
///
/// Unmatched requests pass through untouched; answering 404 or 405 is the
/// handler's job, and the documentation stage skips them.
#[derive(Debug, Clone)]
pub struct RoutingMiddleware {
    routes: Arc<RouteTable>,
}

impl RoutingMiddleware {
    /// Creates the stage over a shared route table.
    #[must_use]
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    /// The route table.
    #[must_use]
    pub fn routes(&self) -> &Arc<RouteTable> {
        &self.routes
    }
}

impl Middleware for RoutingMiddleware {
    fn name(&self) -> &'static str {
        "routing"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            match self
                .routes
                .match_route(request.method(), request.uri().path())
            {
                Some(matched) => {
                    ctx.set_route(Arc::clone(matched.route));
                    ctx.set_params(matched.params);
                }
                None => {
                    tracing::trace!(
                        request_id = %ctx.request_id(),
                        http.method = %request.method(),
                        path = request.uri().path(),
                        "No route matched"
                    );
                }
            }

            next.run(ctx, request).await
        })
    }
}
