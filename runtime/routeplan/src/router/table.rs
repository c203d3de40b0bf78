use std::sync::Arc;

use http::Method;
use tracing::field::Empty;
use tracing::{Instrument, Span};

use crate::config::RoutingConfig;
use crate::endpoint::Endpoint;
use crate::handler::{Request, RequestContext, Response};
use crate::manifest::{EndpointManifest, Manifest};
use crate::route::PathParams;
use crate::telemetry;

use super::{AllowedMethods, default_fallback};

/// A finalized, immutable route table, built by [`Blueprint::build`](crate::Blueprint::build).
///
/// Endpoints are stored in dispatch order. The table can be shared across threads
/// and queried concurrently.
#[derive(Debug, Clone)]
pub struct RouteTable {
    endpoints: Vec<Arc<Endpoint>>,
    config: RoutingConfig,
}

/// The outcome of [`RouteTable::lookup`].
#[derive(Debug)]
pub enum RouteLookup<'a> {
    /// An endpoint accepts the request.
    Matched(RouteMatch<'a>),
    /// At least one template matched the path, but none of the corresponding endpoints
    /// accepts the request method.
    MethodNotAllowed(AllowedMethods),
    /// No template matched the path.
    NotFound,
}

/// An endpoint selected for an incoming request, with the route parameters
/// captured from its path.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    endpoint: &'a Arc<Endpoint>,
    params: PathParams,
}

impl<'a> RouteMatch<'a> {
    /// The selected endpoint.
    pub fn endpoint(&self) -> &'a Endpoint {
        self.endpoint
    }

    /// The route parameters captured from the request path.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// Consume the match and return the captured route parameters.
    pub fn into_params(self) -> PathParams {
        self.params
    }
}

impl RouteTable {
    pub(crate) fn new(endpoints: Vec<Endpoint>, config: RoutingConfig) -> Self {
        Self {
            endpoints: endpoints.into_iter().map(Arc::new).collect(),
            config,
        }
    }

    /// The endpoints in the table, in dispatch order.
    pub fn endpoints(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    /// The number of endpoints in the table.
    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    /// Returns `true` if the table doesn't contain any endpoint.
    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }

    /// The configuration used to match request paths.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// A serializable description of the table, in dispatch order.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            endpoints: self
                .endpoints
                .iter()
                .map(|e| EndpointManifest::from(e.as_ref()))
                .collect(),
        }
    }

    /// Find the endpoint that should handle a request.
    ///
    /// Endpoints are tried in dispatch order: the first one whose template matches `path`
    /// and whose method guard accepts `method` wins.
    pub fn lookup(&self, method: &Method, path: &str) -> RouteLookup<'_> {
        let mut allowed_methods: Option<AllowedMethods> = None;
        for endpoint in &self.endpoints {
            let Some(params) = endpoint.compiled_template().matches(path, &self.config) else {
                continue;
            };
            let guard = endpoint.method_guard();
            if guard.allows(method) {
                return RouteLookup::Matched(RouteMatch { endpoint, params });
            }
            if let Some(methods) = guard.methods() {
                allowed_methods.get_or_insert_default().extend(methods);
            }
        }
        match allowed_methods {
            Some(allowed) => RouteLookup::MethodNotAllowed(allowed),
            None => RouteLookup::NotFound,
        }
    }

    /// Dispatch `request` to the endpoint selected by [`RouteTable::lookup`].
    ///
    /// If no endpoint accepts the request, it responds with [`default_fallback`].
    pub async fn handle(&self, request: Request) -> Response {
        let span = dispatch_span(&request);
        self.dispatch(request).instrument(span).await
    }

    async fn dispatch(&self, request: Request) -> Response {
        let (endpoint, params) = match self.lookup(request.method(), request.uri().path()) {
            RouteLookup::Matched(m) => (Arc::clone(m.endpoint), m.params),
            RouteLookup::MethodNotAllowed(allowed) => {
                tracing::debug!(allow = ?allowed, "No endpoint accepts the request method");
                return default_fallback(Some(&allowed));
            }
            RouteLookup::NotFound => {
                tracing::debug!("No endpoint matches the request path");
                return default_fallback(None);
            }
        };

        let span = Span::current();
        span.record(telemetry::HTTP_ROUTE, endpoint.pattern());
        span.record(telemetry::ENDPOINT_NAME, endpoint.display_name());
        span.record(telemetry::ENDPOINT_ORDER, endpoint.order());

        let handler = Arc::clone(endpoint.handler());
        handler
            .call(RequestContext::new(request, endpoint, params))
            .await
    }
}

/// The span wrapping the dispatch of `request`, using the field names in [`telemetry`].
///
/// [`telemetry::HTTP_ROUTE`], [`telemetry::ENDPOINT_NAME`] and [`telemetry::ENDPOINT_ORDER`]
/// are recorded once an endpoint has been selected.
fn dispatch_span(request: &Request) -> Span {
    tracing::info_span!(
        "Dispatch request",
        { telemetry::HTTP_REQUEST_METHOD } = telemetry::http_request_method(request.method()),
        { telemetry::URL_PATH } = %request.uri().path(),
        { telemetry::HTTP_ROUTE } = Empty,
        { telemetry::ENDPOINT_NAME } = Empty,
        { telemetry::ENDPOINT_ORDER } = Empty,
    )
}
