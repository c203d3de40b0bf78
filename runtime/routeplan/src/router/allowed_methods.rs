use http::{HeaderValue, Method};
use smallvec::SmallVec;

/// The HTTP methods accepted by the endpoints whose template matched the request path,
/// when none of them accepted the request method.
///
/// It's what you need to build a `405 Method Not Allowed` response:
///
/// ```rust
/// use routeplan::router::{RouteLookup, RouteTable};
/// use http::Method;
///
/// fn allow_header(table: &RouteTable, method: &Method, path: &str) -> Option<String> {
///     match table.lookup(method, path) {
///         RouteLookup::MethodNotAllowed(allowed) => allowed
///             .allow_header_value()
///             .and_then(|v| v.to_str().ok().map(ToOwned::to_owned)),
///         _ => None,
///     }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowedMethods {
    // 5 fits the most common case inline,
    // i.e. `GET`/`POST`/`PUT`/`DELETE`/`PATCH` on a certain route path.
    methods: SmallVec<[Method; 5]>,
}

impl AllowedMethods {
    /// Add methods to the set, skipping the ones that are already there.
    pub(crate) fn extend<'a>(&mut self, methods: impl IntoIterator<Item = &'a Method>) {
        for method in methods {
            if !self.methods.contains(method) {
                self.methods.push(method.clone());
            }
        }
    }

    /// Iterate over the allowed methods, in the order they were first encountered.
    pub fn iter(&self) -> impl Iterator<Item = &Method> {
        self.methods.iter()
    }

    /// Get the number of allowed methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Check if there are no allowed methods.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// The value that should be set for the `Allow` header
    /// in a `405 Method Not Allowed` response for this route path.
    ///
    /// It returns `None` if there are no allowed methods.
    /// It returns the comma-separated list of allowed methods otherwise.
    pub fn allow_header_value(&self) -> Option<HeaderValue> {
        if self.methods.is_empty() {
            return None;
        }
        let allow_header = self
            .methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        HeaderValue::from_str(&allow_header).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_deduplicated_and_joined() {
        let mut allowed = AllowedMethods::default();
        assert!(allowed.allow_header_value().is_none());

        allowed.extend(&[Method::GET, Method::POST]);
        allowed.extend(&[Method::POST, Method::DELETE]);
        assert_eq!(allowed.len(), 3);
        assert_eq!(
            allowed.allow_header_value().unwrap(),
            HeaderValue::from_static("GET, POST, DELETE")
        );
    }
}
