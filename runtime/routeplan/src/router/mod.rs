//! Dispatch incoming requests to the endpoints of a finalized [`RouteTable`].
pub use allowed_methods::AllowedMethods;
pub use fallback::default_fallback;
pub use table::{RouteLookup, RouteMatch, RouteTable};

mod allowed_methods;
mod fallback;
mod table;
