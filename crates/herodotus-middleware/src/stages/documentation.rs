//! Traffic observation stage.
//!
//! Runs the rest of the chain, buffers the response body and hands the
//! request/response pair to the [`TrafficObserver`]. The response is rebuilt
//! from the buffered bytes with its status and headers unchanged.

use std::sync::Arc;

use bytes::Bytes;
use herodotus_docs::TrafficObserver;
use http_body_util::{BodyExt, Full};

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};

/// Records every response produced inside it.
#[derive(Debug, Clone)]
pub struct DocumentationMiddleware {
    observer: Arc<TrafficObserver>,
}

impl DocumentationMiddleware {
    /// Creates the stage around a shared observer.
    #[must_use]
    pub fn new(observer: Arc<TrafficObserver>) -> Self {
        Self { observer }
    }

    /// The observer this stage feeds.
    #[must_use]
    pub fn observer(&self) -> &Arc<TrafficObserver> {
        &self.observer
    }
}

impl Middleware for DocumentationMiddleware {
    fn name(&self) -> &'static str {
        "documentation"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let request_parts = request_head(&request);

            let response = next.run(ctx, request).await;
            let (response_parts, body) = response.into_parts();
            let body: Bytes = match body.collect().await {
                Ok(collected) => collected.to_bytes(),
                Err(never) => match never {},
            };

            let observation =
                self.observer
                    .observe(ctx.route(), &request_parts, &response_parts, &body);
            tracing::trace!(
                request_id = %ctx.request_id(),
                recorded = observation.is_recorded(),
                elapsed = ?ctx.elapsed(),
                "Documentation stage finished"
            );

            Response::from_parts(response_parts, Full::new(body))
        })
    }
}

/// Copies the request line and headers; the observer never reads the body.
fn request_head(request: &Request) -> http::request::Parts {
    let mut head = http::Request::new(());
    *head.method_mut() = request.method().clone();
    *head.uri_mut() = request.uri().clone();
    *head.version_mut() = request.version();
    *head.headers_mut() = request.headers().clone();
    head.into_parts().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResponseExt;
    use herodotus_core::RouteDescriptor;
    use herodotus_docs::{DocumentAggregator, MetadataExtractor, MiddlewareRegistry};
    use http::StatusCode;
    use serde_json::json;

    fn observer() -> Arc<TrafficObserver> {
        let extractor = MetadataExtractor::new(
            Arc::new(MiddlewareRegistry::new()),
            Vec::<String>::new(),
        );
        Arc::new(TrafficObserver::new(
            Arc::new(DocumentAggregator::new()),
            Arc::new(extractor),
        ))
    }

    fn request() -> Request {
        http::Request::builder()
            .method("POST")
            .uri("/v1/tasks/create")
            .body(Full::new(Bytes::from_static(br#"{"title":"write docs"}"#)))
            .unwrap()
    }

    fn handler<'a>() -> Next<'a> {
        Next::handler(|_ctx, _req| {
            Box::pin(async { Response::json(StatusCode::CREATED, &json!({"id": 1})) })
        })
    }

    #[tokio::test]
    async fn test_response_passes_through_unchanged() {
        let stage = DocumentationMiddleware::new(observer());
        let mut ctx = MiddlewareContext::new();
        ctx.set_route(Arc::new(RouteDescriptor::new("v1/tasks/create")));

        let response = stage.process(&mut ctx, request(), handler()).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["content-type"], "application/json");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], br#"{"id":1}"#);

        let entry = stage
            .observer()
            .aggregator()
            .get("/v1/tasks/create.post")
            .unwrap();
        assert!(entry.responses.contains_key("201"));
    }

    #[tokio::test]
    async fn test_unrouted_request_not_documented() {
        let stage = DocumentationMiddleware::new(observer());
        let mut ctx = MiddlewareContext::new();

        let response = stage.process(&mut ctx, request(), handler()).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let aggregator = stage.observer().aggregator();
        assert!(aggregator.is_empty());
        assert!(aggregator.has_observations());
    }

    #[test]
    fn test_request_head_copies_headers() {
        let mut request = request();
        request
            .headers_mut()
            .insert("authorization", http::HeaderValue::from_static("Bearer t"));

        let head = request_head(&request);
        assert_eq!(head.method, http::Method::POST);
        assert_eq!(head.uri.path(), "/v1/tasks/create");
        assert_eq!(head.headers["authorization"], "Bearer t");
    }
}
