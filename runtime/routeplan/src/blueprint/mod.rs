//! Define the routes of your application using a [`Blueprint`].
//!
//! Routes are registered through the [`RouteBuilder`] capability, which [`Blueprint`]
//! implements. Each registration returns a [`RegisteredRoute`] handle to customize the
//! route further, before [`Blueprint::build`] turns everything into a
//! [`RouteTable`](crate::RouteTable).
pub use blueprint::Blueprint;
pub use builder::RouteBuilder;
pub use errors::BuildError;
pub use fallback::FallbackExt;
pub use method_guard::MethodGuard;
pub use registered::{RegisteredRoute, RouteRegistration};

#[allow(clippy::module_inception)]
mod blueprint;
mod builder;
pub mod errors;
pub mod fallback;
pub mod method_guard;
mod registered;
