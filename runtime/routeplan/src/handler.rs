//! Request handlers and the context they are invoked with.
use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use http::Method;

use crate::endpoint::Endpoint;
use crate::route::PathParams;

/// The incoming request type, with a fully buffered body.
pub type Request = http::Request<Bytes>;

/// The outgoing response type.
pub type Response = http::Response<Bytes>;

/// A type-erased [`Handler`], shared between the route table and in-flight requests.
pub type BoxedHandler = Arc<dyn Handler>;

/// Asynchronously turn a [`RequestContext`] into a [`Response`].
///
/// You rarely need to implement this trait yourself: it is implemented for every
/// closure or function that takes a [`RequestContext`] and returns a future resolving
/// to a [`Response`].
///
/// ```rust
/// use bytes::Bytes;
/// use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
///
/// async fn spa_shell(_ctx: RequestContext) -> Response {
///     Response::new(Bytes::from_static(b"<!doctype html><div id=\"app\"></div>"))
/// }
///
/// let mut bp = Blueprint::new();
/// bp.fallback(spa_shell);
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Handle the request.
    fn call(&self, context: RequestContext) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Handler for F
where
    F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, context: RequestContext) -> BoxFuture<'static, Response> {
        (self)(context).boxed()
    }
}

/// Everything a [`Handler`] knows about the request it is processing.
#[derive(Debug)]
pub struct RequestContext {
    request: Request,
    endpoint: Arc<Endpoint>,
    params: PathParams,
}

impl RequestContext {
    pub(crate) fn new(request: Request, endpoint: Arc<Endpoint>, params: PathParams) -> Self {
        Self {
            request,
            endpoint,
            params,
        }
    }

    /// The incoming request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Take ownership of the incoming request.
    pub fn into_request(self) -> Request {
        self.request
    }

    /// The HTTP method of the incoming request.
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// The path of the incoming request, without the query string.
    pub fn path(&self) -> &str {
        self.request.uri().path()
    }

    /// The route parameters captured from the request path.
    pub fn params(&self) -> &PathParams {
        &self.params
    }

    /// The endpoint that matched the incoming request.
    ///
    /// Use it to inspect the matched pattern (e.g. for telemetry) or
    /// the [metadata](crate::endpoint::Metadata) attached to the endpoint via conventions.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}
