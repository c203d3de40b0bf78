use crate::blueprint::MethodGuard;
use crate::endpoint::EndpointBuilder;
use crate::handler::BoxedHandler;
use crate::reflection::Location;

/// A deferred customization, applied to the endpoint when the route table is built.
pub(crate) type Convention = Box<dyn FnOnce(&mut EndpointBuilder) + Send>;

/// A route registered against a [`Blueprint`](crate::Blueprint), waiting for the route
/// table to be built.
pub struct RouteRegistration {
    pub(crate) pattern: String,
    pub(crate) display_name: String,
    pub(crate) method_guard: MethodGuard,
    pub(crate) handler: BoxedHandler,
    pub(crate) conventions: Vec<Convention>,
    pub(crate) registered_at: Location,
    // Set by `Blueprint::route`: the display name is derived from the method guard and
    // the pattern, and it's refreshed once nesting prefixes have been applied.
    pub(crate) derived_display_name: bool,
}

impl RouteRegistration {
    /// The route template, exactly as it was registered.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The name used to identify the route in logs and diagnostics.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The HTTP methods the endpoint will start from, before conventions are applied.
    pub fn method_guard(&self) -> &MethodGuard {
        &self.method_guard
    }

    /// The number of conventions queued for this route.
    pub fn n_conventions(&self) -> usize {
        self.conventions.len()
    }

    /// Where the route was registered.
    pub fn registered_at(&self) -> &Location {
        &self.registered_at
    }
}

impl std::fmt::Debug for RouteRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteRegistration")
            .field("pattern", &self.pattern)
            .field("display_name", &self.display_name)
            .field("method_guard", &self.method_guard)
            .field("n_conventions", &self.conventions.len())
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

/// The type returned by [`RouteBuilder::map`] and the methods built on top of it
/// (e.g. [`Blueprint::route`] or [`FallbackExt::fallback`]).
///
/// It allows you to further configure the registered route before the route table is built.
///
/// # Conventions
///
/// Most customizations are not applied immediately: they are queued as conventions,
/// callbacks that receive the [`EndpointBuilder`] when the route table is built.
/// Conventions run in the order they were added, therefore the last one to touch a
/// property wins.
///
/// ```rust
/// use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
///
/// #[derive(Clone)]
/// struct RequiresLogin;
///
/// # async fn shell(_ctx: RequestContext) -> Response { Response::default() }
/// let mut bp = Blueprint::new();
/// bp.fallback(shell)
///     .with_metadata(RequiresLogin)
///     .add(|endpoint| {
///         endpoint.set_display_name("SPA shell");
///     });
/// ```
///
/// [`RouteBuilder::map`]: crate::blueprint::RouteBuilder::map
/// [`Blueprint::route`]: crate::Blueprint::route
/// [`FallbackExt::fallback`]: crate::FallbackExt::fallback
#[derive(Debug)]
pub struct RegisteredRoute<'a> {
    pub(crate) registration: &'a mut RouteRegistration,
}

impl RegisteredRoute<'_> {
    /// The route template, exactly as it was registered.
    pub fn pattern(&self) -> &str {
        &self.registration.pattern
    }

    /// Restrict the HTTP methods accepted by the route.
    ///
    /// Unlike the other customizations, it takes effect immediately.
    pub fn method_guard(self, method_guard: MethodGuard) -> Self {
        self.registration.method_guard = method_guard;
        self
    }

    /// Queue a convention, to be applied to the endpoint when the route table is built.
    pub fn add<F>(self, convention: F) -> Self
    where
        F: FnOnce(&mut EndpointBuilder) + Send + 'static,
    {
        self.registration.conventions.push(Box::new(convention));
        self
    }

    /// Set the order of the endpoint: lower values are tried first.
    ///
    /// Endpoints start from order `0`.
    pub fn with_order(self, order: i32) -> Self {
        self.add(move |endpoint| {
            endpoint.set_order(order);
        })
    }

    /// Set the name used to identify the endpoint in logs and diagnostics.
    pub fn with_display_name(self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        self.add(move |endpoint| {
            endpoint.set_display_name(display_name);
        })
    }

    /// Attach a typed value to the endpoint's [`Metadata`](crate::endpoint::Metadata).
    pub fn with_metadata<T>(self, value: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        self.add(move |endpoint| {
            endpoint.metadata_mut().insert(value);
        })
    }
}
