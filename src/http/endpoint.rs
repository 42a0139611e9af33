//! Endpoint paths relative to the REST API root

use crate::error::{Error, Result};
use std::fmt;
use url::form_urlencoded::byte_serialize;
use url::Url;

/// Path of the core REST API below the server root
pub const API_BASE: &str = "rest/api/1.0/";

/// A request target relative to [`API_BASE`]
///
/// The path may climb out of the API namespace with `../` segments; the
/// build-status plugin lives at `../../build-status/1.0/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    path: String,
    segments: Vec<String>,
    query: Vec<(String, Option<String>)>,
}

impl Endpoint {
    /// Create an endpoint from a relative path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            segments: Vec::new(),
            query: Vec::new(),
        }
    }

    /// Append path segments, each percent-encoded on its own
    #[must_use]
    pub fn segments<I, S>(mut self, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.segments.extend(segments.into_iter().map(Into::into));
        self
    }

    /// Add a `key=value` query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), Some(value.into())));
        self
    }

    /// Add a bare query flag such as `raw`
    #[must_use]
    pub fn flag(mut self, key: impl Into<String>) -> Self {
        self.query.push((key.into(), None));
        self
    }

    /// The relative path, without extra segments or query
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Resolve against the API root and append `extra` query parameters
    pub fn resolve(&self, base: &Url, extra: &[(String, String)]) -> Result<Url> {
        let mut url = base.join(&self.path)?;

        if !self.segments.is_empty() {
            url.path_segments_mut()
                .map_err(|()| Error::config(format!("cannot append path to {base}")))?
                .pop_if_empty()
                .extend(&self.segments);
        }

        let mut parts: Vec<String> = url
            .query()
            .filter(|q| !q.is_empty())
            .map(|q| vec![q.to_string()])
            .unwrap_or_default();
        parts.extend(self.query_parts());
        parts.extend(extra.iter().map(|(k, v)| format!("{}={}", encode(k), encode(v))));

        if parts.is_empty() {
            url.set_query(None);
        } else {
            url.set_query(Some(&parts.join("&")));
        }
        Ok(url)
    }

    fn query_parts(&self) -> impl Iterator<Item = String> + '_ {
        self.query.iter().map(|(key, value)| match value {
            Some(value) => format!("{}={}", encode(key), encode(value)),
            None => encode(key),
        })
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)?;
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        let query: Vec<String> = self.query_parts().collect();
        if !query.is_empty() {
            write!(f, "?{}", query.join("&"))?;
        }
        Ok(())
    }
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}
