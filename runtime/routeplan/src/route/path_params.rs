use std::borrow::Cow;

use percent_encoding::percent_decode_str;
use smallvec::SmallVec;

use super::errors::DecodeError;

/// The route parameters captured from the path of an incoming request.
///
/// # Example
///
/// For a request to `/users/42/files/docs/intro%20page`, matched against the
/// `/users/{id:int}/files/{*rest}` template, `PathParams` contains:
///
/// - `id`: `42`
/// - `rest`: `docs/intro%20page`
///
/// # Raw values
///
/// Values are stored exactly as they appear in the request path: no percent-decoding
/// takes place.
/// Use [`PathParams::decode`] (or [`EncodedParamValue::decode`] when iterating) to get the
/// decoded value.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathParams {
    // Most templates have a handful of parameters at most.
    params: SmallVec<[(String, String); 4]>,
}

impl PathParams {
    pub(crate) fn push(&mut self, name: &str, value: &str) {
        self.params.push((name.to_owned(), value.to_owned()));
    }

    /// Returns the number of captured route parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Returns `true` if no route parameters have been captured.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns the raw value of the route parameter named `key`, if it was captured.
    pub fn get(&self, key: impl AsRef<str>) -> Option<&str> {
        let key = key.as_ref();
        self.params
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the percent-decoded value of the route parameter named `key`,
    /// if it was captured.
    pub fn decode(&self, key: impl AsRef<str>) -> Option<Result<Cow<'_, str>, DecodeError>> {
        self.get(key).map(|raw| EncodedParamValue(raw).decode())
    }

    /// Returns an iterator over the captured parameters, in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EncodedParamValue<'_>)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), EncodedParamValue(value.as_str())))
    }
}

/// A wrapper around a percent-encoded route parameter, obtained via [`PathParams::iter`].
///
/// Use [`decode`](Self::decode) to extract the percent-encoded value.
#[derive(Debug, Clone, Copy, Hash, Ord, PartialOrd, Eq, PartialEq)]
pub struct EncodedParamValue<'a>(&'a str);

impl<'a> EncodedParamValue<'a> {
    /// Percent-decode a raw route parameter.
    ///
    /// If decoding fails, a [`DecodeError`] is returned.
    pub fn decode(&self) -> Result<Cow<'a, str>, DecodeError> {
        percent_decode_str(self.0)
            .decode_utf8()
            .map_err(|e| DecodeError {
                invalid_raw_segment: self.0.to_owned(),
                source: e,
            })
    }

    /// Get a reference to the underlying percent-encoded string.
    pub fn as_str(&self) -> &'a str {
        self.0
    }
}
