//! Errors that can happen when parsing route templates or working with route parameters.
use std::str::Utf8Error;

/// The error returned by [`RouteTemplate::parse`] when the template is malformed.
///
/// [`RouteTemplate::parse`]: super::RouteTemplate::parse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    #[error("Route templates cannot contain empty segments (e.g. `/a//b`)")]
    /// Two consecutive `/` were found in the template.
    EmptySegment,
    #[error(
        "`{segment}` is not a valid segment: a route parameter must be wrapped in a single pair \
of braces and must span the whole segment"
    )]
    /// Braces are unbalanced, nested, or mixed with literal characters in the same segment.
    MalformedSegment { segment: String },
    #[error(
        "`{name}` is not a valid parameter name: use one or more ASCII letters, digits or underscores"
    )]
    /// The name of a route parameter is empty or contains invalid characters.
    InvalidParameterName { name: String },
    #[error(
        "`{constraint}` is not a valid constraint name for `{parameter}`: use one or more ASCII \
letters, digits or underscores"
    )]
    /// The name of a constraint is empty or contains invalid characters.
    InvalidConstraintName {
        parameter: String,
        constraint: String,
    },
    #[error("The `{name}` parameter appears more than once in the same template")]
    /// Two route parameters share the same name.
    DuplicateParameter { name: String },
    #[error("The catch-all parameter `{name}` must be the last segment of the template")]
    /// A catch-all parameter is followed by other segments.
    CatchAllNotLast { name: String },
}

/// A route template refers to a constraint that hasn't been registered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("There is no constraint named `{name}`")]
pub struct UnknownConstraint {
    pub(crate) name: String,
}

impl UnknownConstraint {
    /// The name of the missing constraint.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The error returned by [`EncodedParamValue::decode`] when the percent-decoded route parameter
/// is not a valid UTF8 string.
///
/// Route parameters must be percent-encoded whenever they contain characters that are not
/// URL safe, e.g. whitespaces.
/// This error is returned whenever the percent-decoding step fails, i.e. the decoded data is not a
/// valid UTF8 string.
///
/// [`EncodedParamValue::decode`]: super::EncodedParamValue::decode
#[derive(Debug, thiserror::Error)]
#[error("`{invalid_raw_segment}` is not a well-formed UTF8 string when percent-decoded")]
pub struct DecodeError {
    pub(super) invalid_raw_segment: String,
    #[source]
    pub(super) source: Utf8Error,
}
