use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::blueprint::errors::BuildError;
use crate::blueprint::registered::RouteRegistration;
use crate::blueprint::{MethodGuard, RegisteredRoute, RouteBuilder, method_guard::ANY};
use crate::config::RoutingConfig;
use crate::constraint::{Constraint, ConstraintMap};
use crate::endpoint::{Endpoint, EndpointBuilder, Metadata};
use crate::handler::{BoxedHandler, Handler};
use crate::reflection::Location;
use crate::route::RouteTemplate;
use crate::router::RouteTable;

/// The starting point for building a route table.
///
/// A blueprint collects route registrations, custom constraints and nested
/// blueprints. Nothing is validated until [`Blueprint::build`] turns it into a
/// [`RouteTable`].
///
/// ```rust
/// use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
/// use routeplan::blueprint::method_guard::GET;
///
/// # async fn get_user(_ctx: RequestContext) -> Response { Response::default() }
/// # async fn spa_shell(_ctx: RequestContext) -> Response { Response::default() }
/// let mut bp = Blueprint::new();
/// bp.route(GET, "/users/{id:int}", get_user);
/// bp.fallback(spa_shell);
///
/// let table = bp.build().expect("Invalid blueprint");
/// assert_eq!(table.len(), 2);
/// ```
pub struct Blueprint {
    creation_location: Location,
    registrations: Vec<RouteRegistration>,
    constraints: Vec<ConstraintRegistration>,
    nested: Vec<NestedBlueprint>,
}

struct ConstraintRegistration {
    name: String,
    constraint: Arc<dyn Constraint>,
    registered_at: Location,
}

struct NestedBlueprint {
    prefix: Option<String>,
    blueprint: Blueprint,
    // Number of own registrations when the blueprint was nested.
    after: usize,
    nested_at: Location,
}

impl Default for Blueprint {
    #[track_caller]
    fn default() -> Self {
        Self::new()
    }
}

impl Blueprint {
    #[track_caller]
    /// Create a new [`Blueprint`].
    pub fn new() -> Self {
        Self {
            creation_location: Location::caller(),
            registrations: Vec::new(),
            constraints: Vec::new(),
            nested: Vec::new(),
        }
    }

    /// Where the blueprint was created.
    pub fn creation_location(&self) -> &Location {
        &self.creation_location
    }

    #[track_caller]
    /// Register a route to handle incoming requests.
    ///
    /// The route only accepts the methods allowed by `method_guard`.
    /// Its display name is `HTTP: {methods} {pattern}`, or just the pattern if every
    /// method is allowed. For routes registered against a nested blueprint, the pattern
    /// in the display name of the finalized endpoint includes the nesting prefix.
    ///
    /// ```rust
    /// use routeplan::{Blueprint, RequestContext, Response};
    /// use routeplan::blueprint::method_guard::{GET, MethodGuard};
    /// use http::Method;
    ///
    /// # async fn get_order(_ctx: RequestContext) -> Response { Response::default() }
    /// # async fn update_order(_ctx: RequestContext) -> Response { Response::default() }
    /// let mut bp = Blueprint::new();
    /// bp.route(GET, "/orders/{id:int}", get_order);
    /// bp.route(
    ///     MethodGuard::new([Method::PUT, Method::PATCH]),
    ///     "/orders/{id:int}",
    ///     update_order,
    /// );
    /// ```
    pub fn route<H>(
        &mut self,
        method_guard: MethodGuard,
        pattern: &str,
        handler: H,
    ) -> RegisteredRoute<'_>
    where
        H: Handler,
    {
        let display_name = route_display_name(&method_guard, pattern);
        let mut route = self
            .map(pattern, &display_name, Arc::new(handler))
            .method_guard(method_guard);
        route.registration.derived_display_name = true;
        route
    }

    #[track_caller]
    /// Register a custom constraint, usable in route templates as `{param:name}`.
    ///
    /// Constraint names must be unique across the whole blueprint, nested blueprints and
    /// built-in constraints included: a duplicate is reported by [`Blueprint::build`].
    ///
    /// ```rust
    /// use routeplan::{Blueprint, RequestContext, Response};
    /// use routeplan::blueprint::method_guard::GET;
    ///
    /// # async fn get_post(_ctx: RequestContext) -> Response { Response::default() }
    /// let mut bp = Blueprint::new();
    /// bp.constraint("slug", |value: &str| {
    ///     value.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
    /// });
    /// bp.route(GET, "/blog/{slug:slug}", get_post);
    /// ```
    pub fn constraint<C>(&mut self, name: impl Into<String>, constraint: C)
    where
        C: Constraint,
    {
        self.constraints.push(ConstraintRegistration {
            name: name.into(),
            constraint: Arc::new(constraint),
            registered_at: Location::caller(),
        });
    }

    #[track_caller]
    /// Nest a [`Blueprint`] under the current [`Blueprint`] (the parent), adding a common prefix
    /// to all the route templates registered against it, fallbacks included.
    ///
    /// The prefix must start with a `/` and it must not end with a `/`.
    /// Violations are reported by [`Blueprint::build`].
    ///
    /// ```rust
    /// use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
    /// use routeplan::blueprint::method_guard::GET;
    ///
    /// # async fn get_invoice(_ctx: RequestContext) -> Response { Response::default() }
    /// # async fn admin_shell(_ctx: RequestContext) -> Response { Response::default() }
    /// fn admin() -> Blueprint {
    ///     let mut bp = Blueprint::new();
    ///     bp.route(GET, "/invoices/{id:int}", get_invoice);
    ///     // Matches `/admin/{*path:nonfile}` once nested.
    ///     bp.fallback(admin_shell);
    ///     bp
    /// }
    ///
    /// let mut bp = Blueprint::new();
    /// bp.nest_at("/admin", admin());
    /// ```
    pub fn nest_at(&mut self, prefix: &str, blueprint: Blueprint) {
        self.push_nested(Some(prefix.to_owned()), blueprint);
    }

    #[track_caller]
    /// Nest a [`Blueprint`] under the current [`Blueprint`] (the parent), without adding a
    /// common prefix.
    pub fn nest(&mut self, blueprint: Blueprint) {
        self.push_nested(None, blueprint);
    }

    #[track_caller]
    fn push_nested(&mut self, prefix: Option<String>, blueprint: Blueprint) {
        self.nested.push(NestedBlueprint {
            prefix,
            blueprint,
            after: self.registrations.len(),
            nested_at: Location::caller(),
        });
    }

    /// The number of routes registered against this blueprint, nested blueprints included.
    pub fn len(&self) -> usize {
        self.registrations.len()
            + self
                .nested
                .iter()
                .map(|n| n.blueprint.len())
                .sum::<usize>()
    }

    /// Returns `true` if no route has been registered, nested blueprints included.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The routes registered directly against this blueprint, in registration order.
    ///
    /// Routes registered against nested blueprints are not included.
    pub fn registrations(&self) -> &[RouteRegistration] {
        &self.registrations
    }

    /// Build a [`RouteTable`] using the default [`RoutingConfig`].
    pub fn build(self) -> Result<RouteTable, BuildError> {
        self.build_with_config(RoutingConfig::default())
    }

    /// Build a [`RouteTable`].
    ///
    /// Every route template is parsed and its constraints are resolved.
    /// Each registration is then turned into an [`Endpoint`], applying its conventions in
    /// the order they were added.\
    /// Endpoints are sorted by order, then by template specificity, then by registration
    /// sequence: that's the order in which they are tried when a request comes in.
    pub fn build_with_config(self, config: RoutingConfig) -> Result<RouteTable, BuildError> {
        let span = tracing::debug_span!(
            "Build route table",
            blueprint.created_at = %self.creation_location,
            n_registrations = self.len(),
        );
        let _guard = span.enter();

        let mut registrations = Vec::with_capacity(self.len());
        let mut constraint_registrations = Vec::new();
        self.flatten(None, &mut registrations, &mut constraint_registrations)?;

        let mut constraints = ConstraintMap::new();
        for c in constraint_registrations {
            constraints
                .insert(c.name, c.constraint)
                .map_err(|e| BuildError::DuplicateConstraint {
                    name: e.name,
                    registered_at: c.registered_at,
                })?;
        }

        let mut endpoints = Vec::with_capacity(registrations.len());
        for (sequence, registration) in registrations.into_iter().enumerate() {
            endpoints.push(build_endpoint(registration, sequence, &constraints)?);
        }
        endpoints.sort_by(|a, b| a.dispatch_cmp(b));

        tracing::info!(n_endpoints = endpoints.len(), "Route table built");
        Ok(RouteTable::new(endpoints, config))
    }

    /// Collect registrations and constraints, depth-first, in declaration order.
    fn flatten(
        self,
        prefix: Option<&str>,
        registrations: &mut Vec<RouteRegistration>,
        constraints: &mut Vec<ConstraintRegistration>,
    ) -> Result<(), BuildError> {
        let Blueprint {
            creation_location: _,
            registrations: own,
            constraints: own_constraints,
            nested,
        } = self;
        constraints.extend(own_constraints);

        let mut nested = nested.into_iter().peekable();
        for (i, mut registration) in own.into_iter().enumerate() {
            while let Some(n) = nested.next_if(|n| n.after <= i) {
                flatten_nested(n, prefix, registrations, constraints)?;
            }
            if let Some(prefix) = prefix {
                registration.pattern = join_prefix(prefix, &registration.pattern);
                if registration.derived_display_name {
                    registration.display_name =
                        route_display_name(&registration.method_guard, &registration.pattern);
                }
            }
            registrations.push(registration);
        }
        for n in nested {
            flatten_nested(n, prefix, registrations, constraints)?;
        }
        Ok(())
    }
}

fn flatten_nested(
    nested: NestedBlueprint,
    parent_prefix: Option<&str>,
    registrations: &mut Vec<RouteRegistration>,
    constraints: &mut Vec<ConstraintRegistration>,
) -> Result<(), BuildError> {
    let NestedBlueprint {
        prefix,
        blueprint,
        nested_at,
        ..
    } = nested;
    let prefix = match (parent_prefix, prefix) {
        (parent, None) => parent.map(ToOwned::to_owned),
        (parent, Some(prefix)) => {
            if !prefix.starts_with('/') || prefix.ends_with('/') {
                return Err(BuildError::InvalidNestingPrefix { prefix, nested_at });
            }
            Some(format!("{}{prefix}", parent.unwrap_or_default()))
        }
    };
    blueprint.flatten(prefix.as_deref(), registrations, constraints)
}

fn route_display_name(method_guard: &MethodGuard, pattern: &str) -> String {
    if method_guard.allows_all() {
        pattern.to_owned()
    } else {
        format!("HTTP: {method_guard} {pattern}")
    }
}

fn join_prefix(prefix: &str, pattern: &str) -> String {
    let pattern = pattern.strip_prefix('/').unwrap_or(pattern);
    if pattern.is_empty() {
        prefix.to_owned()
    } else {
        format!("{prefix}/{pattern}")
    }
}

fn build_endpoint(
    registration: RouteRegistration,
    sequence: usize,
    constraints: &ConstraintMap,
) -> Result<Endpoint, BuildError> {
    let RouteRegistration {
        pattern,
        display_name,
        method_guard,
        handler,
        conventions,
        registered_at,
        derived_display_name: _,
    } = registration;

    let template = match RouteTemplate::parse(&pattern) {
        Ok(t) => t,
        Err(source) => {
            return Err(BuildError::InvalidTemplate {
                pattern,
                registered_at,
                source,
            });
        }
    };
    let template = match template.compile(constraints) {
        Ok(t) => t,
        Err(e) => {
            return Err(BuildError::UnknownConstraint {
                pattern,
                constraint: e.name,
                registered_at,
            });
        }
    };

    let mut builder = EndpointBuilder {
        pattern,
        display_name,
        order: 0,
        method_guard,
        metadata: Metadata::default(),
        registered_at,
    };
    for convention in conventions {
        convention(&mut builder);
    }
    tracing::trace!(
        pattern = %builder.pattern,
        order = builder.order,
        display_name = %builder.display_name,
        "Endpoint finalized"
    );
    Ok(Endpoint::new(builder, template, handler, sequence))
}

impl RouteBuilder for Blueprint {
    #[track_caller]
    fn map(
        &mut self,
        pattern: &str,
        display_name: &str,
        handler: BoxedHandler,
    ) -> RegisteredRoute<'_> {
        let registered_at = Location::caller();
        tracing::debug!(pattern, display_name, %registered_at, "Route registered");
        self.registrations.push(RouteRegistration {
            pattern: pattern.to_owned(),
            display_name: display_name.to_owned(),
            method_guard: ANY,
            handler,
            conventions: Vec::new(),
            registered_at,
            derived_display_name: false,
        });
        let last = self.registrations.len() - 1;
        RegisteredRoute {
            registration: &mut self.registrations[last],
        }
    }
}

impl Debug for Blueprint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Blueprint")
            .field("creation_location", &self.creation_location)
            .field("registrations", &self.registrations)
            .field(
                "constraints",
                &self.constraints.iter().map(|c| &c.name).collect::<Vec<_>>(),
            )
            .field("n_nested", &self.nested.len())
            .finish()
    }
}
