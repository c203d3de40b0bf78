use std::fmt::{Display, Formatter};

use http::Method;

/// Match incoming requests based on their HTTP method.
///
/// Used by [`Blueprint::route`] and [`RegisteredRoute::method_guard`] to specify which
/// HTTP methods an endpoint accepts.
///
/// If you want to match **any** HTTP method, use [`ANY`].\
/// If you want to match a single HTTP method, use the dedicated constants in this
/// module ([`GET`], [`POST`], [`PATCH`], [`DELETE`], etc.).\
/// If you want to match a list of HTTP methods, use [`MethodGuard::new`].
///
/// [`Blueprint::route`]: crate::Blueprint::route
/// [`RegisteredRoute::method_guard`]: crate::blueprint::RegisteredRoute::method_guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodGuard {
    allowed: AllowedMethods,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedMethods {
    All,
    Single(Method),
    // Deduplicated, in insertion order.
    Multiple(Vec<Method>),
}

impl MethodGuard {
    /// Build a new [`MethodGuard`] that matches the specified list of HTTP methods.
    ///
    /// ```rust
    /// use routeplan::blueprint::MethodGuard;
    /// use http::Method;
    ///
    /// // Using an array of methods known at compile-time..
    /// let guard = MethodGuard::new([Method::GET, Method::POST]);
    /// // ..or a dynamic vector, built at runtime.
    /// let guard = MethodGuard::new(vec![Method::GET, Method::PUT]);
    /// ```
    pub fn new(allowed_methods: impl IntoIterator<Item = Method>) -> Self {
        let mut methods: Vec<Method> = Vec::new();
        for method in allowed_methods {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        let allowed = match methods.len() {
            1 => AllowedMethods::Single(methods.remove(0)),
            _ => AllowedMethods::Multiple(methods),
        };
        Self { allowed }
    }

    /// Returns `true` if `method` is accepted by this guard.
    pub fn allows(&self, method: &Method) -> bool {
        match &self.allowed {
            AllowedMethods::All => true,
            AllowedMethods::Single(m) => m == method,
            AllowedMethods::Multiple(methods) => methods.contains(method),
        }
    }

    /// Returns `true` if every HTTP method is accepted, including custom ones.
    pub fn allows_all(&self) -> bool {
        matches!(self.allowed, AllowedMethods::All)
    }

    /// The accepted methods, or `None` if every method is accepted.
    pub fn methods(&self) -> Option<&[Method]> {
        match &self.allowed {
            AllowedMethods::All => None,
            AllowedMethods::Single(m) => Some(std::slice::from_ref(m)),
            AllowedMethods::Multiple(methods) => Some(methods),
        }
    }
}

impl Display for MethodGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.methods() {
            None => f.write_str("*"),
            Some(methods) => {
                for (i, method) in methods.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    f.write_str(method.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// A [`MethodGuard`] that matches all incoming requests, regardless of their HTTP method.
pub const ANY: MethodGuard = MethodGuard {
    allowed: AllowedMethods::All,
};

/// A [`MethodGuard`] that matches incoming requests using the `GET` HTTP method.
pub const GET: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::GET),
};

/// A [`MethodGuard`] that matches incoming requests using the `POST` HTTP method.
pub const POST: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::POST),
};

/// A [`MethodGuard`] that matches incoming requests using the `PATCH` HTTP method.
pub const PATCH: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::PATCH),
};

/// A [`MethodGuard`] that matches incoming requests using the `PUT` HTTP method.
pub const PUT: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::PUT),
};

/// A [`MethodGuard`] that matches incoming requests using the `DELETE` HTTP method.
pub const DELETE: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::DELETE),
};

/// A [`MethodGuard`] that matches incoming requests using the `HEAD` HTTP method.
pub const HEAD: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::HEAD),
};

/// A [`MethodGuard`] that matches incoming requests using the `OPTIONS` HTTP method.
pub const OPTIONS: MethodGuard = MethodGuard {
    allowed: AllowedMethods::Single(Method::OPTIONS),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guards_are_deduplicated() {
        let guard = MethodGuard::new([Method::GET, Method::POST, Method::GET]);
        assert_eq!(guard.methods().unwrap(), [Method::GET, Method::POST]);
        assert_eq!(guard.to_string(), "GET, POST");
        assert_eq!(MethodGuard::new([Method::PUT]), PUT);
    }

    #[test]
    fn any_allows_custom_methods() {
        let purge = Method::from_bytes(b"PURGE").unwrap();
        assert!(ANY.allows(&purge));
        assert!(ANY.allows_all());
        assert!(!GET.allows(&purge));
        assert_eq!(ANY.to_string(), "*");
    }
}
