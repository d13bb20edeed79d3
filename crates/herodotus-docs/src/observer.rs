//! Per-request observation.
//!
//! [`TrafficObserver::observe`] is called once for every completed
//! request/response cycle. It never fails from the caller's point of view;
//! the returned [`Observation`] only describes what was recorded.

use std::sync::Arc;

use bytes::Bytes;
use herodotus_core::{ParameterDescriptor, RouteDescriptor};
use herodotus_telemetry::metrics;
use http::header::CONTENT_TYPE;
use http::{request, response, HeaderMap, StatusCode};

use crate::aggregator::DocumentAggregator;
use crate::document::PathEntry;
use crate::extractor::MetadataExtractor;
use crate::merge::{merge_content, merge_headers, ExampleForm};

/// Outcome of one observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The response was merged into the document.
    Recorded {
        /// Document key, `/<uri>.<method>`.
        path_key: String,
        /// Response status.
        status: StatusCode,
        /// Content entry form after the merge.
        example: ExampleForm,
        /// Number of parameter examples filled from request headers.
        header_examples: usize,
    },
    /// Nothing was recorded.
    Skipped(SkipReason),
}

impl Observation {
    /// Returns true if the response was merged.
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }
}

/// Why an observation recorded nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The request did not match a route.
    NoRoute,
}

/// Merges observed traffic into the shared document.
#[derive(Debug, Clone)]
pub struct TrafficObserver {
    aggregator: Arc<DocumentAggregator>,
    extractor: Arc<MetadataExtractor>,
    capture_header_examples: bool,
}

impl TrafficObserver {
    /// Creates an observer that does not capture request header examples.
    #[must_use]
    pub fn new(aggregator: Arc<DocumentAggregator>, extractor: Arc<MetadataExtractor>) -> Self {
        Self {
            aggregator,
            extractor,
            capture_header_examples: false,
        }
    }

    /// Fills unmasked parameter examples from request header values.
    ///
    /// Only parameters whose example is still null take a value; masked
    /// parameters keep the placeholder.
    #[must_use]
    pub fn with_header_examples(mut self, enabled: bool) -> Self {
        self.capture_header_examples = enabled;
        self
    }

    /// The aggregator this observer writes to.
    #[must_use]
    pub fn aggregator(&self) -> &Arc<DocumentAggregator> {
        &self.aggregator
    }

    /// Records one request/response cycle.
    pub fn observe(
        &self,
        route: Option<&RouteDescriptor>,
        request: &request::Parts,
        response: &response::Parts,
        body: &Bytes,
    ) -> Observation {
        self.aggregator.mark_observed();

        let Some(route) = route else {
            metrics::record_observation("skipped");
            tracing::debug!(
                http.method = %request.method,
                uri = %request.uri,
                "No matched route, skipping observation"
            );
            return Observation::Skipped(SkipReason::NoRoute);
        };

        let path_key = route.path_key(&request.method);
        let status = response.status;
        let content_type = response
            .headers
            .get(CONTENT_TYPE)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

        let (example, header_examples) = self.aggregator.with_entry(
            &path_key,
            || {
                let parameters = self
                    .extractor
                    .extract_for_route(route)
                    .iter()
                    .map(ParameterDescriptor::dump)
                    .collect();
                PathEntry::new(route, parameters)
            },
            |entry| {
                let header_examples = if self.capture_header_examples {
                    fill_header_examples(entry, &request.headers)
                } else {
                    0
                };
                let response_entry = entry.response_mut(status);
                merge_headers(response_entry, &response.headers);
                let example = merge_content(response_entry, content_type.as_deref(), body);
                (example, header_examples)
            },
        );

        metrics::record_observation("recorded");
        metrics::record_example(example.as_str());
        tracing::debug!(
            path_key = %path_key,
            http.status_code = status.as_u16(),
            content_type = content_type.as_deref().unwrap_or("-"),
            "Observation recorded"
        );

        Observation::Recorded {
            path_key,
            status,
            example,
            header_examples,
        }
    }
}

/// Header names are case-insensitive; a name masked by any descriptor is
/// never filled for any of them.
fn fill_header_examples(entry: &mut PathEntry, headers: &HeaderMap) -> usize {
    let masked: Vec<String> = entry
        .parameters
        .iter()
        .filter(|p| p.is_masked())
        .map(|p| p.name().to_string())
        .collect();

    let mut filled = 0;
    for parameter in &mut entry.parameters {
        if masked.iter().any(|name| name.eq_ignore_ascii_case(parameter.name())) {
            continue;
        }
        let Some(value) = headers.get(parameter.name()).and_then(|v| v.to_str().ok()) else {
            continue;
        };
        if parameter.offer_example(value) {
            filled += 1;
        }
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{from_fn, MiddlewareRegistry};
    use crate::document::ContentEntry;
    use crate::merge::FALLBACK_CONTENT_TYPE;
    use http::{Method, Request, Response};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn request(method: Method, headers: &[(&'static str, &'static str)]) -> request::Parts {
        let mut builder = Request::builder().method(method).uri("/v1/tasks/create");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn response(status: u16, content_type: Option<&'static str>) -> response::Parts {
        let mut builder = Response::builder()
            .status(status)
            .header("date", "Tue, 01 Oct 2024 10:00:00 GMT")
            .header("x-ratelimit-limit", "60");
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn observer(registry: MiddlewareRegistry) -> TrafficObserver {
        let extractor = MetadataExtractor::new(Arc::new(registry), ["auth"]);
        TrafficObserver::new(Arc::new(DocumentAggregator::new()), Arc::new(extractor))
    }

    fn auth_registry() -> MiddlewareRegistry {
        let mut registry = MiddlewareRegistry::new();
        registry
            .register(
                "auth",
                vec![
                    ParameterDescriptor::builder("Authorization")
                        .masked(true)
                        .required(true)
                        .build()
                        .unwrap(),
                    ParameterDescriptor::header("X-Project-Id", "Project scope").unwrap(),
                ],
            );
        registry
    }

    fn route() -> RouteDescriptor {
        RouteDescriptor::new("v1/tasks/create").with_name("tasks.create")
    }

    #[test]
    fn test_missing_route_is_skipped_but_counts() {
        let observer = observer(MiddlewareRegistry::new());
        let outcome = observer.observe(
            None,
            &request(Method::GET, &[]),
            &response(404, None),
            &Bytes::new(),
        );

        assert_eq!(outcome, Observation::Skipped(SkipReason::NoRoute));
        assert!(observer.aggregator().has_observations());
        assert!(observer.aggregator().is_empty());
    }

    #[test]
    fn test_first_observation_creates_entry() {
        let observer = observer(auth_registry());
        let outcome = observer.observe(
            Some(&route()),
            &request(Method::POST, &[]),
            &response(201, Some("application/json")),
            &Bytes::from_static(br#"{"id":1}"#),
        );

        assert_eq!(
            outcome,
            Observation::Recorded {
                path_key: "/v1/tasks/create.post".to_string(),
                status: StatusCode::CREATED,
                example: ExampleForm::Singular,
                header_examples: 0,
            }
        );

        let entry = observer.aggregator().get("/v1/tasks/create.post").unwrap();
        assert_eq!(entry.operation_id.as_deref(), Some("tasks.create"));
        assert_eq!(entry.parameters.len(), 2);
        let response = &entry.responses["201"];
        assert_eq!(
            response.content["application/json"],
            ContentEntry::new(json!({"id": 1}))
        );
        assert!(!response.headers.contains_key("date"));
        assert_eq!(response.headers["x-ratelimit-limit"], vec!["60"]);
    }

    #[test]
    fn test_parameters_captured_once() {
        let available = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&available);
        let mut registry = MiddlewareRegistry::new();
        registry.register(
            "auth",
            from_fn(move || {
                if flag.load(Ordering::SeqCst) {
                    Ok(vec![ParameterDescriptor::header("X-Token", "").unwrap()])
                } else {
                    Ok(Vec::new())
                }
            }),
        );
        let observer = observer(registry);

        observer.observe(
            Some(&route()),
            &request(Method::POST, &[]),
            &response(201, None),
            &Bytes::new(),
        );
        available.store(false, Ordering::SeqCst);
        observer.observe(
            Some(&route()),
            &request(Method::POST, &[]),
            &response(422, None),
            &Bytes::new(),
        );

        let entry = observer.aggregator().get("/v1/tasks/create.post").unwrap();
        assert_eq!(entry.parameters.len(), 1);
        assert_eq!(entry.parameters[0].name(), "X-Token");
        assert_eq!(entry.responses.len(), 2);
    }

    #[test]
    fn test_methods_are_separate_entries() {
        let observer = observer(MiddlewareRegistry::new());
        for method in [Method::GET, Method::POST] {
            observer.observe(
                Some(&route()),
                &request(method, &[]),
                &response(200, None),
                &Bytes::new(),
            );
        }
        assert_eq!(observer.aggregator().len(), 2);
    }

    #[test]
    fn test_header_examples_disabled_by_default() {
        let observer = observer(auth_registry());
        observer.observe(
            Some(&route()),
            &request(Method::POST, &[("x-project-id", "7")]),
            &response(201, None),
            &Bytes::new(),
        );

        let entry = observer.aggregator().get("/v1/tasks/create.post").unwrap();
        assert_eq!(entry.parameters[1].example(), None);
    }

    #[test]
    fn test_header_examples_respect_mask() {
        let observer = observer(auth_registry()).with_header_examples(true);
        let outcome = observer.observe(
            Some(&route()),
            &request(
                Method::POST,
                &[("authorization", "Bearer secret"), ("x-project-id", "7")],
            ),
            &response(201, None),
            &Bytes::new(),
        );

        assert!(matches!(
            outcome,
            Observation::Recorded {
                header_examples: 1,
                ..
            }
        ));
        let entry = observer.aggregator().get("/v1/tasks/create.post").unwrap();
        assert_eq!(entry.parameters[0].example(), Some(&json!("<masked>")));
        assert!(entry.parameters[0].is_masked());
        assert_eq!(entry.parameters[1].example(), Some(&json!("7")));

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_header_examples_skip_names_masked_elsewhere() {
        let mut registry = MiddlewareRegistry::new();
        registry
            .register(
                "auth",
                vec![ParameterDescriptor::builder("Authorization")
                    .masked(true)
                    .build()
                    .unwrap()],
            )
            .register(
                "audit",
                vec![ParameterDescriptor::header("authorization", "Audited token").unwrap()],
            );
        let extractor = MetadataExtractor::new(Arc::new(registry), ["auth", "audit"]);
        let observer =
            TrafficObserver::new(Arc::new(DocumentAggregator::new()), Arc::new(extractor))
                .with_header_examples(true);

        let outcome = observer.observe(
            Some(&route()),
            &request(Method::POST, &[("authorization", "Bearer secret")]),
            &response(201, None),
            &Bytes::new(),
        );

        assert!(matches!(
            outcome,
            Observation::Recorded {
                header_examples: 0,
                ..
            }
        ));
        let entry = observer.aggregator().get("/v1/tasks/create.post").unwrap();
        assert_eq!(entry.parameters.len(), 2);
        assert_eq!(entry.parameters[1].example(), None);
        assert!(!serde_json::to_string(&entry).unwrap().contains("secret"));
    }

    #[test]
    fn test_bodyless_response_is_recorded() {
        let observer = observer(MiddlewareRegistry::new());
        let route = RouteDescriptor::new("v1/tasks/remove");

        for _ in 0..2 {
            let outcome = observer.observe(
                Some(&route),
                &request(Method::DELETE, &[]),
                &response(204, None),
                &Bytes::new(),
            );
            assert!(outcome.is_recorded());
        }

        let entry = observer.aggregator().get("/v1/tasks/remove.delete").unwrap();
        let content = &entry.responses["204"].content;
        assert_eq!(content.len(), 1);
        let ContentEntry::Multiple { examples } = &content[FALLBACK_CONTENT_TYPE] else {
            panic!("expected plural form");
        };
        assert_eq!(examples.len(), 2);
    }
}
