//! Route templates: parsing, precedence and matching against request paths.
pub use errors::{DecodeError, TemplateError, UnknownConstraint};
pub use path_params::{EncodedParamValue, PathParams};
pub(crate) use template::CompiledTemplate;
pub use template::{RouteTemplate, Segment};

pub mod errors;
mod path_params;
mod template;
