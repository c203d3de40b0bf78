//! Named predicates that restrict the values a route parameter can capture.
//!
//! A route template refers to a constraint by name, e.g. `nonfile` in `{*path:nonfile}`.
//! Names are resolved against a [`ConstraintMap`] when the route table is built.
//!
//! # Built-in constraints
//!
//! | name      | matches                                                                 |
//! |-----------|-------------------------------------------------------------------------|
//! | `int`     | an optional `-` followed by ASCII digits, fitting in an `i64`            |
//! | `bool`    | `true` or `false`, ignoring ASCII case                                  |
//! | `alpha`   | one or more ASCII letters                                               |
//! | `file`    | values whose last segment looks like a file name (e.g. `app.js`)        |
//! | `nonfile` | everything `file` rejects, including the empty string                   |
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use percent_encoding::percent_decode_str;

/// A predicate evaluated against the raw value captured by a route parameter.
///
/// It is implemented for every `Fn(&str) -> bool` closure that can be shared across threads:
///
/// ```rust
/// use routeplan::Blueprint;
///
/// let mut bp = Blueprint::new();
/// bp.constraint("slug", |value: &str| {
///     value.chars().all(|c| c.is_ascii_lowercase() || c == '-')
/// });
/// ```
pub trait Constraint: Send + Sync + 'static {
    /// Returns `true` if `value` satisfies the constraint.
    fn matches(&self, value: &str) -> bool;
}

impl<F> Constraint for F
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    fn matches(&self, value: &str) -> bool {
        (self)(value)
    }
}

/// Matches integers that fit in an `i64`.
#[derive(Debug, Clone, Copy, Default)]
pub struct IntConstraint;

impl Constraint for IntConstraint {
    fn matches(&self, value: &str) -> bool {
        value.parse::<i64>().is_ok() && !value.starts_with('+')
    }
}

/// Matches `true` or `false`, ignoring ASCII case.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoolConstraint;

impl Constraint for BoolConstraint {
    fn matches(&self, value: &str) -> bool {
        value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
    }
}

/// Matches one or more ASCII letters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaConstraint;

impl Constraint for AlphaConstraint {
    fn matches(&self, value: &str) -> bool {
        !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic())
    }
}

/// Matches values whose last segment looks like a file name.
///
/// See [`is_file_name`] for the exact rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConstraint;

impl Constraint for FileConstraint {
    fn matches(&self, value: &str) -> bool {
        is_file_name(value)
    }
}

/// Matches values whose last segment does **not** look like a file name.
///
/// It is the constraint used by the default fallback pattern, `{*path:nonfile}`:
/// client-side routes (`/settings/profile`) reach the fallback, while requests for
/// missing static assets (`/assets/app.js`) don't.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonFileConstraint;

impl Constraint for NonFileConstraint {
    fn matches(&self, value: &str) -> bool {
        !is_file_name(value)
    }
}

/// Returns `true` if the last `/`-separated segment of `value` contains a `.`
/// followed by at least one character that is not a `.`.
///
/// The segment is percent-decoded before looking for the `.`, so an encoded dot (`%2E`)
/// counts as a dot.
///
/// ```rust
/// use routeplan::constraint::is_file_name;
///
/// assert!(is_file_name("assets/app.js"));
/// assert!(is_file_name("assets/app%2Ejs"));
/// assert!(is_file_name(".well-known"));
/// assert!(!is_file_name("docs.v2/intro"));
/// assert!(!is_file_name("trailing."));
/// assert!(!is_file_name(""));
/// ```
pub fn is_file_name(value: &str) -> bool {
    let last_segment = match value.rfind('/') {
        Some(idx) => &value[idx + 1..],
        None => value,
    };
    let last_segment = percent_decode_str(last_segment).decode_utf8_lossy();
    match last_segment.find('.') {
        Some(dot) => last_segment[dot + 1..].bytes().any(|b| b != b'.'),
        None => false,
    }
}

/// The error returned by [`ConstraintMap::insert`] when the name is already taken.
#[derive(Debug, thiserror::Error)]
#[error("a constraint named `{name}` has already been registered")]
pub struct DuplicateConstraint {
    pub(crate) name: String,
}

impl DuplicateConstraint {
    /// The name that was registered twice.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registry of named [`Constraint`]s, in registration order.
///
/// [`ConstraintMap::new`] comes pre-populated with the built-in constraints.
#[derive(Clone)]
pub struct ConstraintMap {
    constraints: IndexMap<String, Arc<dyn Constraint>>,
}

impl ConstraintMap {
    /// A registry containing the built-in constraints.
    pub fn new() -> Self {
        let mut constraints: IndexMap<String, Arc<dyn Constraint>> = IndexMap::new();
        constraints.insert("int".into(), Arc::new(IntConstraint));
        constraints.insert("bool".into(), Arc::new(BoolConstraint));
        constraints.insert("alpha".into(), Arc::new(AlphaConstraint));
        constraints.insert("file".into(), Arc::new(FileConstraint));
        constraints.insert("nonfile".into(), Arc::new(NonFileConstraint));
        Self { constraints }
    }

    /// A registry without any constraint, not even the built-in ones.
    pub fn empty() -> Self {
        Self {
            constraints: IndexMap::new(),
        }
    }

    /// Register a new constraint under `name`.
    ///
    /// Existing constraints are never overwritten: registering a name that's already
    /// in use, built-ins included, returns an error.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        constraint: Arc<dyn Constraint>,
    ) -> Result<(), DuplicateConstraint> {
        let name = name.into();
        if self.constraints.contains_key(&name) {
            return Err(DuplicateConstraint { name });
        }
        self.constraints.insert(name, constraint);
        Ok(())
    }

    /// Look up a constraint by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Constraint>> {
        self.constraints.get(name)
    }

    /// Returns `true` if a constraint is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.constraints.contains_key(name)
    }

    /// The names of all registered constraints, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constraints.keys().map(String::as_str)
    }
}

impl Default for ConstraintMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ConstraintMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonfile_accepts_client_side_routes() {
        let c = NonFileConstraint;
        assert!(c.matches(""));
        assert!(c.matches("settings/profile"));
        assert!(c.matches("v1.2/"));
        assert!(c.matches("ellipsis..."));
    }

    #[test]
    fn nonfile_rejects_static_files() {
        let c = NonFileConstraint;
        assert!(!c.matches("favicon.ico"));
        assert!(!c.matches("assets/js/app.min.js"));
        assert!(!c.matches("archive.tar.gz"));
    }

    #[test]
    fn encoded_dots_are_decoded_before_checking() {
        let c = NonFileConstraint;
        assert!(!c.matches("assets/app%2Ejs"));
        assert!(!c.matches("assets/app%2ejs"));
        assert!(c.matches("assets%2Eold/app"));
        assert!(c.matches("trailing%2E"));
        assert!(FileConstraint.matches("assets/app%2Ejs"));
    }

    #[test]
    fn int_constraint() {
        let c = IntConstraint;
        assert!(c.matches("42"));
        assert!(c.matches("-7"));
        assert!(!c.matches("+7"));
        assert!(!c.matches("4x"));
        assert!(!c.matches("99999999999999999999"));
    }

    #[test]
    fn bool_and_alpha_constraints() {
        assert!(BoolConstraint.matches("TRUE"));
        assert!(!BoolConstraint.matches("yes"));
        assert!(AlphaConstraint.matches("abcXYZ"));
        assert!(!AlphaConstraint.matches(""));
        assert!(!AlphaConstraint.matches("abc1"));
    }

    #[test]
    fn built_ins_cannot_be_overwritten() {
        let mut map = ConstraintMap::new();
        let err = map
            .insert("nonfile", Arc::new(|_: &str| true))
            .unwrap_err();
        insta::assert_snapshot!(err, @"a constraint named `nonfile` has already been registered");
        assert!(!map.get("nonfile").unwrap().matches("app.js"));
    }

    #[test]
    fn names_are_listed_in_registration_order() {
        let mut map = ConstraintMap::new();
        map.insert("slug", Arc::new(|v: &str| !v.is_empty())).unwrap();
        let names: Vec<_> = map.names().collect();
        assert_eq!(names, ["int", "bool", "alpha", "file", "nonfile", "slug"]);
        assert!(ConstraintMap::empty().names().next().is_none());
    }
}
