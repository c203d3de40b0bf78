use bytes::Bytes;
use http::StatusCode;
use http::header::ALLOW;

use crate::handler::Response;

use super::AllowedMethods;

/// The response for incoming requests that don't match any of the endpoints in a
/// [`RouteTable`](super::RouteTable), fallbacks included.
///
/// It returns a `404 Not Found` response if the path doesn't match any of the
/// registered templates.\
/// It returns a `405 Method Not Allowed` response, with an `Allow` header, if the path
/// matches at least one template but the method isn't accepted by any of the
/// corresponding endpoints.
pub fn default_fallback(allowed_methods: Option<&AllowedMethods>) -> Response {
    let mut response = Response::new(Bytes::new());
    match allowed_methods.and_then(AllowedMethods::allow_header_value) {
        Some(header_value) => {
            *response.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
            response.headers_mut().insert(ALLOW, header_value);
        }
        None => {
            *response.status_mut() = StatusCode::NOT_FOUND;
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn not_found_without_allowed_methods() {
        let response = default_fallback(None);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().get(ALLOW).is_none());

        let response = default_fallback(Some(&AllowedMethods::default()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn method_not_allowed_sets_the_allow_header() {
        let mut allowed = AllowedMethods::default();
        allowed.extend(&[Method::GET]);
        let response = default_fallback(Some(&allowed));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET");
    }
}
