//! Endpoints: what a route registration turns into once the route table is built.
//!
//! Registrations are customised through conventions: `FnOnce(&mut EndpointBuilder)`
//! callbacks queued via the [`RegisteredRoute`] handle (see [`RegisteredRoute::add`]).
//! They are applied, in the order they were added, when [`Blueprint::build`] assembles
//! the [`RouteTable`].
//!
//! [`RegisteredRoute`]: crate::blueprint::RegisteredRoute
//! [`RegisteredRoute::add`]: crate::blueprint::RegisteredRoute::add
//! [`Blueprint::build`]: crate::Blueprint::build
//! [`RouteTable`]: crate::RouteTable
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};

use http::Extensions;

use crate::blueprint::MethodGuard;
use crate::handler::BoxedHandler;
use crate::reflection::Location;
use crate::route::{CompiledTemplate, RouteTemplate};

/// Arbitrary typed values attached to an endpoint: authorization policies, cache
/// settings, markers for your own middleware, etc.
///
/// At most one value per type can be stored.
#[derive(Default, Clone)]
pub struct Metadata {
    values: Extensions,
}

impl Metadata {
    /// Insert a value, returning the previous value of the same type, if any.
    pub fn insert<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.values.insert(value)
    }

    /// Get a reference to the value of type `T`, if any.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.values.get::<T>()
    }

    /// Get a mutable reference to the value of type `T`, if any.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.values.get_mut::<T>()
    }

    /// Returns `true` if a value of type `T` is present.
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.get::<T>().is_some()
    }

    /// Remove the value of type `T`, returning it if it was present.
    pub fn remove<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.values.remove::<T>()
    }

    /// The number of stored values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no value has been stored.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Debug for Metadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metadata")
            .field("len", &self.values.len())
            .finish()
    }
}

/// The mutable view of an endpoint that conventions operate on.
///
/// The pattern and the registration location are fixed; everything else can be changed.
#[derive(Debug)]
pub struct EndpointBuilder {
    pub(crate) pattern: String,
    pub(crate) display_name: String,
    pub(crate) order: i32,
    pub(crate) method_guard: MethodGuard,
    pub(crate) metadata: Metadata,
    pub(crate) registered_at: Location,
}

impl EndpointBuilder {
    /// The route template of the endpoint.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The name used to identify the endpoint in logs and diagnostics.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Change the name used to identify the endpoint in logs and diagnostics.
    pub fn set_display_name(&mut self, display_name: impl Into<String>) -> &mut Self {
        self.display_name = display_name.into();
        self
    }

    /// The order of the endpoint: lower values are tried first.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Change the order of the endpoint.
    pub fn set_order(&mut self, order: i32) -> &mut Self {
        self.order = order;
        self
    }

    /// The HTTP methods accepted by the endpoint.
    pub fn method_guard(&self) -> &MethodGuard {
        &self.method_guard
    }

    /// Change the HTTP methods accepted by the endpoint.
    pub fn set_method_guard(&mut self, method_guard: MethodGuard) -> &mut Self {
        self.method_guard = method_guard;
        self
    }

    /// The metadata attached to the endpoint so far.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// A mutable reference to the metadata attached to the endpoint.
    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Where the endpoint was registered.
    pub fn registered_at(&self) -> &Location {
        &self.registered_at
    }
}

/// A finalized, read-only endpoint stored in a [`RouteTable`](crate::RouteTable).
pub struct Endpoint {
    template: CompiledTemplate,
    display_name: String,
    order: i32,
    method_guard: MethodGuard,
    metadata: Metadata,
    registered_at: Location,
    handler: BoxedHandler,
    sequence: usize,
}

impl Endpoint {
    pub(crate) fn new(
        builder: EndpointBuilder,
        template: CompiledTemplate,
        handler: BoxedHandler,
        sequence: usize,
    ) -> Self {
        let EndpointBuilder {
            pattern: _,
            display_name,
            order,
            method_guard,
            metadata,
            registered_at,
        } = builder;
        Self {
            template,
            display_name,
            order,
            method_guard,
            metadata,
            registered_at,
            handler,
            sequence,
        }
    }

    /// The route template, exactly as it was registered.
    pub fn pattern(&self) -> &str {
        self.template.template().as_str()
    }

    /// The parsed route template.
    pub fn template(&self) -> &RouteTemplate {
        self.template.template()
    }

    /// The name used to identify the endpoint in logs and diagnostics.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// The order of the endpoint: lower values are tried first.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// The HTTP methods accepted by the endpoint.
    pub fn method_guard(&self) -> &MethodGuard {
        &self.method_guard
    }

    /// The metadata attached to the endpoint.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Where the endpoint was registered.
    pub fn registered_at(&self) -> &Location {
        &self.registered_at
    }

    /// The position of the registration among all registrations in the blueprint.
    pub fn sequence(&self) -> usize {
        self.sequence
    }

    pub(crate) fn compiled_template(&self) -> &CompiledTemplate {
        &self.template
    }

    pub(crate) fn handler(&self) -> &BoxedHandler {
        &self.handler
    }

    /// Dispatch order: order first, then precedence, then registration sequence.
    pub(crate) fn dispatch_cmp(&self, other: &Self) -> Ordering {
        self.order
            .cmp(&other.order)
            .then_with(|| self.template.precedence().cmp(other.template.precedence()))
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl Debug for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("pattern", &self.pattern())
            .field("display_name", &self.display_name)
            .field("order", &self.order)
            .field("method_guard", &self.method_guard)
            .field("metadata", &self.metadata)
            .field("registered_at", &self.registered_at)
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}
