use std::collections::HashSet;
use std::fmt::{Debug, Display, Formatter};
use std::sync::Arc;

use crate::config::{RoutingConfig, TrailingSlash};
use crate::constraint::{Constraint, ConstraintMap};

use super::errors::{TemplateError, UnknownConstraint};
use super::path_params::PathParams;

/// A parsed route template, e.g. `/users/{id:int}` or `{*path:nonfile}`.
///
/// # Syntax
///
/// A template is a sequence of `/`-separated segments. The leading `/` is optional.
/// Each segment is either:
///
/// - a literal, e.g. `users`
/// - a route parameter, matching exactly one non-empty segment: `{name}`
/// - a catch-all parameter, matching the rest of the path (possibly empty): `{*name}`
///
/// Both kinds of parameters can be restricted by a named [`Constraint`], e.g.
/// `{id:int}` or `{*path:nonfile}`.
///
/// A trailing `/` is optional too, but it's remembered: when trailing slashes are
/// [strict](crate::config::TrailingSlash::Strict), `/about/` only matches paths that end
/// with a `/` and `/about` only matches paths that don't.
///
/// The original template string is preserved verbatim: see [`RouteTemplate::as_str`].
#[derive(Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    raw: String,
    segments: Vec<Segment>,
    trailing_slash: bool,
}

/// A single segment of a [`RouteTemplate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A literal segment, matched (by default) ignoring ASCII case.
    Literal(String),
    /// A route parameter, matching a single non-empty path segment.
    Parameter {
        name: String,
        constraint: Option<String>,
    },
    /// A catch-all parameter, matching the remainder of the path.
    CatchAll {
        name: String,
        constraint: Option<String>,
    },
}

impl Segment {
    /// The rank used to compute the [precedence](RouteTemplate::precedence) of a template.
    /// The lower, the more specific.
    fn rank(&self) -> u8 {
        match self {
            Segment::Literal(_) => 1,
            Segment::Parameter {
                constraint: Some(_),
                ..
            } => 2,
            Segment::Parameter {
                constraint: None, ..
            } => 3,
            Segment::CatchAll {
                constraint: Some(_),
                ..
            } => 4,
            Segment::CatchAll {
                constraint: None, ..
            } => 5,
        }
    }

    fn constraint(&self) -> Option<&str> {
        match self {
            Segment::Literal(_) => None,
            Segment::Parameter { constraint, .. } | Segment::CatchAll { constraint, .. } => {
                constraint.as_deref()
            }
        }
    }
}

impl RouteTemplate {
    /// Parse a route template.
    ///
    /// ```rust
    /// use routeplan::route::{RouteTemplate, Segment};
    ///
    /// let template = RouteTemplate::parse("{*path:nonfile}").unwrap();
    /// assert_eq!(template.as_str(), "{*path:nonfile}");
    /// assert_eq!(
    ///     template.segments(),
    ///     &[Segment::CatchAll {
    ///         name: "path".into(),
    ///         constraint: Some("nonfile".into())
    ///     }]
    /// );
    /// ```
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        let trimmed = raw.strip_prefix('/').unwrap_or(raw);
        let (trimmed, trailing_slash) = match trimmed.strip_suffix('/') {
            Some(trimmed) => (trimmed, true),
            None => (trimmed, false),
        };

        let mut segments = Vec::new();
        if !trimmed.is_empty() {
            for s in trimmed.split('/') {
                segments.push(parse_segment(s)?);
            }
        }

        let mut names = HashSet::new();
        let n_segments = segments.len();
        for (i, segment) in segments.iter().enumerate() {
            let name = match segment {
                Segment::Literal(_) => continue,
                Segment::Parameter { name, .. } => name,
                Segment::CatchAll { name, .. } => {
                    if i + 1 != n_segments {
                        return Err(TemplateError::CatchAllNotLast { name: name.clone() });
                    }
                    name
                }
            };
            if !names.insert(name.as_str()) {
                return Err(TemplateError::DuplicateParameter { name: name.clone() });
            }
        }

        Ok(Self {
            raw: raw.to_owned(),
            segments,
            trailing_slash,
        })
    }

    /// The template string, exactly as it was registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The parsed segments, in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns `true` if the template ends with a `/`, the root template excluded.
    pub fn has_trailing_slash(&self) -> bool {
        self.trailing_slash
    }

    /// The names of the route parameters, in order.
    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Literal(_) => None,
            Segment::Parameter { name, .. } | Segment::CatchAll { name, .. } => {
                Some(name.as_str())
            }
        })
    }

    /// The specificity of the template, used to break ties between endpoints with the
    /// same order.
    ///
    /// Each segment is ranked, from most to least specific: literal, constrained
    /// parameter, parameter, constrained catch-all, catch-all.
    /// Templates are compared segment by segment: the lower precedence is tried first.
    pub fn precedence(&self) -> Vec<u8> {
        self.segments.iter().map(Segment::rank).collect()
    }

    /// Resolve every constraint referenced by the template against `constraints`.
    pub(crate) fn compile(
        self,
        constraints: &ConstraintMap,
    ) -> Result<CompiledTemplate, UnknownConstraint> {
        let mut resolved = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            let constraint = match segment.constraint() {
                None => None,
                Some(name) => match constraints.get(name) {
                    Some(c) => Some(Arc::clone(c)),
                    None => {
                        return Err(UnknownConstraint {
                            name: name.to_owned(),
                        });
                    }
                },
            };
            resolved.push(constraint);
        }
        Ok(CompiledTemplate {
            precedence: self.precedence(),
            template: self,
            constraints: resolved,
        })
    }
}

impl Debug for RouteTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RouteTemplate").field(&self.raw).finish()
    }
}

impl Display for RouteTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn parse_segment(s: &str) -> Result<Segment, TemplateError> {
    if s.is_empty() {
        return Err(TemplateError::EmptySegment);
    }
    let Some(inner) = s.strip_prefix('{') else {
        if s.contains(['{', '}']) {
            return Err(TemplateError::MalformedSegment { segment: s.into() });
        }
        return Ok(Segment::Literal(s.into()));
    };
    let Some(inner) = inner.strip_suffix('}') else {
        return Err(TemplateError::MalformedSegment { segment: s.into() });
    };
    if inner.contains(['{', '}']) {
        return Err(TemplateError::MalformedSegment { segment: s.into() });
    }

    let (catch_all, inner) = match inner.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let (name, constraint) = match inner.split_once(':') {
        Some((name, constraint)) => (name, Some(constraint)),
        None => (inner, None),
    };
    if !is_identifier(name) {
        return Err(TemplateError::InvalidParameterName { name: name.into() });
    }
    if let Some(constraint) = constraint {
        if !is_identifier(constraint) {
            return Err(TemplateError::InvalidConstraintName {
                parameter: name.into(),
                constraint: constraint.into(),
            });
        }
    }

    let name = name.to_owned();
    let constraint = constraint.map(str::to_owned);
    Ok(if catch_all {
        Segment::CatchAll { name, constraint }
    } else {
        Segment::Parameter { name, constraint }
    })
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

/// A [`RouteTemplate`] whose constraints have been resolved, ready for matching.
#[derive(Clone)]
pub(crate) struct CompiledTemplate {
    template: RouteTemplate,
    precedence: Vec<u8>,
    // One entry per segment.
    constraints: Vec<Option<Arc<dyn Constraint>>>,
}

impl CompiledTemplate {
    pub(crate) fn template(&self) -> &RouteTemplate {
        &self.template
    }

    pub(crate) fn precedence(&self) -> &[u8] {
        &self.precedence
    }

    /// Match `path` against the template, capturing route parameters on success.
    pub(crate) fn matches(&self, path: &str, config: &RoutingConfig) -> Option<PathParams> {
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = match config.trailing_slash {
            TrailingSlash::Ignore => path.strip_suffix('/').unwrap_or(path),
            TrailingSlash::Strict if self.template.trailing_slash => path.strip_suffix('/')?,
            TrailingSlash::Strict => path,
        };
        // `None` once every segment of the path has been consumed.
        let mut rest = if path.is_empty() { None } else { Some(path) };
        let mut params = PathParams::default();

        for (segment, constraint) in self.template.segments.iter().zip(&self.constraints) {
            let satisfies = |value: &str| constraint.as_ref().is_none_or(|c| c.matches(value));
            match segment {
                Segment::Literal(literal) => {
                    let (head, tail) = split_first(rest?);
                    let equal = if config.case_sensitive {
                        head == literal.as_str()
                    } else {
                        head.eq_ignore_ascii_case(literal)
                    };
                    if !equal {
                        return None;
                    }
                    rest = tail;
                }
                Segment::Parameter { name, .. } => {
                    let (head, tail) = split_first(rest?);
                    if head.is_empty() || !satisfies(head) {
                        return None;
                    }
                    params.push(name, head);
                    rest = tail;
                }
                Segment::CatchAll { name, .. } => {
                    let value = rest.take().unwrap_or_default();
                    if !satisfies(value) {
                        return None;
                    }
                    params.push(name, value);
                }
            }
        }

        match rest {
            None => Some(params),
            Some(_) => None,
        }
    }
}

impl Debug for CompiledTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("template", &self.template)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

fn split_first(path: &str) -> (&str, Option<&str>) {
    match path.split_once('/') {
        Some((head, tail)) => (head, Some(tail)),
        None => (path, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(raw: &str) -> CompiledTemplate {
        RouteTemplate::parse(raw)
            .unwrap()
            .compile(&ConstraintMap::new())
            .unwrap()
    }

    fn captured(raw: &str, path: &str) -> Option<Vec<(String, String)>> {
        compile(raw)
            .matches(path, &RoutingConfig::default())
            .map(|params| {
                params
                    .iter()
                    .map(|(k, v)| (k.to_owned(), v.as_str().to_owned()))
                    .collect()
            })
    }

    #[test]
    fn parse_default_fallback_pattern() {
        let template = RouteTemplate::parse("{*path:nonfile}").unwrap();
        assert_eq!(template.as_str(), "{*path:nonfile}");
        assert_eq!(template.parameter_names().collect::<Vec<_>>(), ["path"]);
        assert_eq!(template.precedence(), [4]);
    }

    #[test]
    fn parse_is_lenient_on_leading_and_trailing_slashes() {
        let a = RouteTemplate::parse("/users/{id}/").unwrap();
        let b = RouteTemplate::parse("users/{id}").unwrap();
        assert_eq!(a.segments(), b.segments());
        assert_eq!(a.as_str(), "/users/{id}/");
        assert!(a.has_trailing_slash());
        assert!(!b.has_trailing_slash());
        let root = RouteTemplate::parse("/").unwrap();
        assert!(root.segments().is_empty());
        assert!(!root.has_trailing_slash());
    }

    #[test]
    fn malformed_templates_are_rejected() {
        let err = |raw: &str| RouteTemplate::parse(raw).unwrap_err().to_string();

        insta::assert_snapshot!(err("/a//b"), @"Route templates cannot contain empty segments (e.g. `/a//b`)");
        insta::assert_snapshot!(err("/users/{id"), @"`{id` is not a valid segment: a route parameter must be wrapped in a single pair of braces and must span the whole segment");
        insta::assert_snapshot!(err("/users/id-{id}"), @"`id-{id}` is not a valid segment: a route parameter must be wrapped in a single pair of braces and must span the whole segment");
        insta::assert_snapshot!(err("/users/{}"), @"`` is not a valid parameter name: use one or more ASCII letters, digits or underscores");
        insta::assert_snapshot!(err("/users/{id:}"), @"`` is not a valid constraint name for `id`: use one or more ASCII letters, digits or underscores");
        insta::assert_snapshot!(err("/{a}/{a}"), @"The `a` parameter appears more than once in the same template");
        insta::assert_snapshot!(err("/{*rest}/tail"), @"The catch-all parameter `rest` must be the last segment of the template");
    }

    #[test]
    fn precedence_orders_by_specificity() {
        let literal = RouteTemplate::parse("/users/me").unwrap().precedence();
        let constrained = RouteTemplate::parse("/users/{id:int}").unwrap().precedence();
        let plain = RouteTemplate::parse("/users/{id}").unwrap().precedence();
        let catch_all = RouteTemplate::parse("/users/{*rest}").unwrap().precedence();
        let fallback = RouteTemplate::parse("{*path:nonfile}").unwrap().precedence();

        assert!(literal < constrained);
        assert!(constrained < plain);
        assert!(plain < catch_all);
        assert!(fallback < RouteTemplate::parse("{*path}").unwrap().precedence());
    }

    #[test]
    fn literals_ignore_case_by_default() {
        assert!(captured("/About", "/about").is_some());
        let strict = RoutingConfig {
            case_sensitive: true,
            ..Default::default()
        };
        assert!(compile("/About").matches("/about", &strict).is_none());
    }

    #[test]
    fn parameters_capture_single_segments() {
        assert_eq!(
            captured("/users/{id:int}", "/users/42"),
            Some(vec![("id".into(), "42".into())])
        );
        assert_eq!(captured("/users/{id:int}", "/users/me"), None);
        assert_eq!(captured("/users/{id}", "/users/42/posts"), None);
        assert_eq!(captured("/users/{id}", "/users"), None);
        assert_eq!(captured("/users/{id}", "/users//"), None);
    }

    #[test]
    fn catch_all_captures_the_remainder() {
        assert_eq!(
            captured("/docs/{*rest}", "/docs/guide/intro"),
            Some(vec![("rest".into(), "guide/intro".into())])
        );
        assert_eq!(
            captured("/docs/{*rest}", "/docs"),
            Some(vec![("rest".into(), "".into())])
        );
    }

    #[test]
    fn nonfile_catch_all_skips_static_files() {
        assert!(captured("{*path:nonfile}", "/").is_some());
        assert!(captured("{*path:nonfile}", "/settings/profile").is_some());
        assert!(captured("{*path:nonfile}", "/assets/app.js").is_none());
        assert!(captured("{*path:nonfile}", "/favicon.ico").is_none());
    }

    #[test]
    fn trailing_slash_handling() {
        assert!(captured("/about", "/about/").is_some());
        let strict = RoutingConfig {
            trailing_slash: TrailingSlash::Strict,
            ..Default::default()
        };
        assert!(compile("/about").matches("/about/", &strict).is_none());
        assert!(compile("/about").matches("/about", &strict).is_some());

        // The slash on the template must agree with the slash on the path.
        assert!(compile("/about/").matches("/about/", &strict).is_some());
        assert!(compile("/about/").matches("/about", &strict).is_none());
        assert!(compile("/about/").matches("/about", &RoutingConfig::default()).is_some());
        assert!(compile("/users/{id}/").matches("/users/42/", &strict).is_some());
        assert!(compile("/users/{id}/").matches("/users/42", &strict).is_none());
        assert!(compile("/").matches("/", &strict).is_some());
    }

    #[test]
    fn unknown_constraints_fail_compilation() {
        let err = RouteTemplate::parse("/posts/{slug:slug}")
            .unwrap()
            .compile(&ConstraintMap::new())
            .unwrap_err();
        assert_eq!(err.name(), "slug");
    }
}
