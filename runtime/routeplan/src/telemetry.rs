//! Conventional field names used when logging routing activity.
//!
//! For well-known resources, this module exposes:
//!
//! - A constant holding the conventional field name used when logging that resource
//! - A function to compute the conventional log representation of that resource
//!
//! The naming follows [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/)
//! whenever possible.
use http::Method;

/// The field name for the HTTP method of the incoming request (if canonical),
/// according to [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/attributes-registry/http/).
///
/// Use [`http_request_method`] to populate the field.
pub const HTTP_REQUEST_METHOD: &str = "http.request.method";

/// The field name for the route template matched by the incoming request,
/// according to [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/attributes-registry/http/).
pub const HTTP_ROUTE: &str = "http.route";

/// The path targeted by the incoming request,
/// according to [OpenTelemetry's semantic convention](https://opentelemetry.io/docs/specs/semconv/attributes-registry/url/).
pub const URL_PATH: &str = "url.path";

/// The display name of the endpoint that handled the request.\
/// This field doesn't appear in OpenTelemetry's semantic convention specification.
pub const ENDPOINT_NAME: &str = "routeplan.endpoint.name";

/// The order of the endpoint that handled the request.\
/// This field doesn't appear in OpenTelemetry's semantic convention specification.
pub const ENDPOINT_ORDER: &str = "routeplan.endpoint.order";

/// The canonical representation for the value in [`HTTP_REQUEST_METHOD`].
///
/// If the HTTP method is not canonical, it is set to `_OTHER`.
pub fn http_request_method(method: &Method) -> &'static str {
    match *method {
        Method::GET => "GET",
        Method::POST => "POST",
        Method::PUT => "PUT",
        Method::TRACE => "TRACE",
        Method::PATCH => "PATCH",
        Method::CONNECT => "CONNECT",
        Method::HEAD => "HEAD",
        Method::DELETE => "DELETE",
        Method::OPTIONS => "OPTIONS",
        _ => "_OTHER",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_canonical_methods_are_bucketed() {
        let custom = Method::from_bytes(b"PURGE").unwrap();
        assert_eq!(http_request_method(&custom), "_OTHER");
        assert_eq!(http_request_method(&Method::PATCH), "PATCH");
    }
}
