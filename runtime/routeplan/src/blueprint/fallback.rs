//! Register a route that is only selected when no other route matches.
//!
//! A fallback is a regular route with two twists: its display name is `Fallback`
//! and its order is [`i32::MAX`], therefore it's tried after every other endpoint.
//! Without an explicit template it matches any path whose last segment doesn't look like a
//! file name, see [`DEFAULT_FALLBACK_PATTERN`].
//!
//! The usual entrypoint is [`FallbackExt`], available on every [`RouteBuilder`].
//! [`map_fallback`] and [`map_fallback_to_pattern`] are the same operations with every
//! argument optional, for callers that can't guarantee their inputs are present.
use std::sync::Arc;

use crate::blueprint::{RegisteredRoute, RouteBuilder};
use crate::handler::{BoxedHandler, Handler};

/// The template used by [`FallbackExt::fallback`] and [`map_fallback`].
///
/// It matches every path, the root included, unless its last segment looks like a file
/// name (e.g. `/assets/app.js`): requests for missing static files get a `404` instead of
/// the fallback.
pub const DEFAULT_FALLBACK_PATTERN: &str = "{*path:nonfile}";

/// The order assigned to every fallback. Endpoints with a lower order are tried first.
pub const FALLBACK_ORDER: i32 = i32::MAX;

/// The display name assigned to every fallback.
pub const FALLBACK_DISPLAY_NAME: &str = "Fallback";

/// A required argument was not provided.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{argument}` is required to register a fallback route, but it was not provided")]
pub struct InvalidArgument {
    argument: &'static str,
}

impl InvalidArgument {
    /// The name of the missing argument: `builder`, `pattern` or `handler`.
    pub fn argument(&self) -> &'static str {
        self.argument
    }
}

/// Register fallback routes against a [`RouteBuilder`].
///
/// ```rust
/// use routeplan::{Blueprint, FallbackExt, RequestContext, Response};
/// use routeplan::blueprint::method_guard::GET;
///
/// # async fn get_user(_ctx: RequestContext) -> Response { Response::default() }
/// # async fn spa_shell(_ctx: RequestContext) -> Response { Response::default() }
/// # async fn api_not_found(_ctx: RequestContext) -> Response { Response::default() }
/// let mut bp = Blueprint::new();
/// bp.route(GET, "/api/users/{id:int}", get_user);
/// bp.fallback_at("/api/{*path}", api_not_found)?;
/// bp.fallback(spa_shell);
/// # Ok::<(), routeplan::blueprint::fallback::InvalidArgument>(())
/// ```
pub trait FallbackExt: RouteBuilder {
    /// Register `handler` as a fallback for [`DEFAULT_FALLBACK_PATTERN`].
    #[track_caller]
    fn fallback<H>(&mut self, handler: H) -> RegisteredRoute<'_>
    where
        H: Handler;

    /// Register `handler` as a fallback for `pattern`.
    ///
    /// The template is used verbatim: no constraint is added to it.
    /// An empty `pattern` is a valid template, matching the root path only.
    #[track_caller]
    fn fallback_at<H>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<RegisteredRoute<'_>, InvalidArgument>
    where
        H: Handler;
}

impl<B> FallbackExt for B
where
    B: RouteBuilder + ?Sized,
{
    #[track_caller]
    fn fallback<H>(&mut self, handler: H) -> RegisteredRoute<'_>
    where
        H: Handler,
    {
        register(self, DEFAULT_FALLBACK_PATTERN, Arc::new(handler))
    }

    #[track_caller]
    fn fallback_at<H>(
        &mut self,
        pattern: &str,
        handler: H,
    ) -> Result<RegisteredRoute<'_>, InvalidArgument>
    where
        H: Handler,
    {
        map_fallback_to_pattern(Some(self), Some(pattern), Some(Arc::new(handler)))
    }
}

#[track_caller]
/// Register `handler` as a fallback for [`DEFAULT_FALLBACK_PATTERN`].
///
/// It fails, without registering anything, if `builder` or `handler` is missing.
pub fn map_fallback<B>(
    builder: Option<&mut B>,
    handler: Option<BoxedHandler>,
) -> Result<RegisteredRoute<'_>, InvalidArgument>
where
    B: RouteBuilder + ?Sized,
{
    map_fallback_to_pattern(builder, Some(DEFAULT_FALLBACK_PATTERN), handler)
}

#[track_caller]
/// Register `handler` as a fallback for `pattern`.
///
/// It fails, without registering anything, if any argument is missing.
/// Arguments are checked in order: `builder`, `pattern`, `handler`.\
/// `pattern` is used verbatim: `Some("")` registers a fallback for the root path.
pub fn map_fallback_to_pattern<'b, B>(
    builder: Option<&'b mut B>,
    pattern: Option<&str>,
    handler: Option<BoxedHandler>,
) -> Result<RegisteredRoute<'b>, InvalidArgument>
where
    B: RouteBuilder + ?Sized,
{
    let builder = builder.ok_or(InvalidArgument {
        argument: "builder",
    })?;
    let pattern = pattern.ok_or(InvalidArgument {
        argument: "pattern",
    })?;
    let handler = handler.ok_or(InvalidArgument {
        argument: "handler",
    })?;
    Ok(register(builder, pattern, handler))
}

#[track_caller]
fn register<'b, B>(builder: &'b mut B, pattern: &str, handler: BoxedHandler) -> RegisteredRoute<'b>
where
    B: RouteBuilder + ?Sized,
{
    tracing::debug!(pattern, order = FALLBACK_ORDER, "Registering fallback");
    builder
        .map(pattern, FALLBACK_DISPLAY_NAME, handler)
        // Queued before the handle is returned, so caller conventions run after it.
        .with_order(FALLBACK_ORDER)
}
