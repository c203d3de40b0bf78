//! Errors that can happen when turning a [`Blueprint`](crate::Blueprint) into a route table.
use crate::reflection::Location;
use crate::route::TemplateError;

/// The error returned by [`Blueprint::build`](crate::Blueprint::build).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("`{pattern}`, registered at {registered_at}, is not a valid route template")]
    /// A route template could not be parsed.
    InvalidTemplate {
        pattern: String,
        registered_at: Location,
        #[source]
        source: TemplateError,
    },
    #[error(
        "`{pattern}`, registered at {registered_at}, uses the `{constraint}` constraint, \
but no constraint with that name has been registered"
    )]
    /// A route template refers to a constraint that doesn't exist.
    UnknownConstraint {
        pattern: String,
        constraint: String,
        registered_at: Location,
    },
    #[error(
        "A constraint named `{name}` has already been registered. \
The second registration happened at {registered_at}"
    )]
    /// Two constraints share the same name.
    DuplicateConstraint { name: String, registered_at: Location },
    #[error(
        "`{prefix}`, used to nest a blueprint at {nested_at}, is not a valid prefix: \
it must start with a `/` and it must not end with a `/`"
    )]
    /// The prefix passed to [`Blueprint::nest_at`](crate::Blueprint::nest_at) is malformed.
    InvalidNestingPrefix { prefix: String, nested_at: Location },
}
