use crate::blueprint::RegisteredRoute;
use crate::handler::BoxedHandler;

/// The capability to register routes.
///
/// It's the primitive everything else is built on: [`Blueprint::route`] and
/// [`FallbackExt`] are thin layers on top of [`RouteBuilder::map`].
///
/// [`Blueprint::route`]: crate::Blueprint::route
/// [`FallbackExt`]: crate::FallbackExt
pub trait RouteBuilder {
    /// Register a new route.
    ///
    /// The route starts with order `0`, it accepts every HTTP method and it doesn't
    /// carry any convention.\
    /// The template is not validated here: errors are reported when the route table is built.
    #[track_caller]
    fn map(&mut self, pattern: &str, display_name: &str, handler: BoxedHandler)
    -> RegisteredRoute<'_>;
}
