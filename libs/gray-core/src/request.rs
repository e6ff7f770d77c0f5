//! Request-scoped tracking model.
//!
//! [`GrayTrackInfo`] is the opaque token correlating a request with its
//! canary cohort; [`GrayRequest`] is the semantic representation of an
//! intercepted request that routing components read. Both are captured once
//! per request and read-mostly afterward.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

/// Opaque tracking token identifying a request's gray-routing lineage.
///
/// Immutable once captured for a given request: builders consume `self`, and
/// the propagation layer only ever clones whole tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrayTrackInfo {
    pub trace_id: String,
    /// Cohort markers and upstream tags carried alongside the trace id
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl GrayTrackInfo {
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            attributes: HashMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// Knobs for what gets captured into a [`GrayRequest`].
///
/// Body capture is off by default: most routing rules match on headers and
/// parameters, and copying bodies on the interception hot path is wasted
/// work unless a rule needs them.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrayRequestSettings {
    pub load_body: bool,
}

/// Semantic representation of an inbound/outbound request.
///
/// Created once per request at the interception point; the routing decision
/// component and the propagation layer both read it, neither mutates it
/// afterward. The `attributes` bag carries protocol-specific extras (for
/// example a serialized view of the native request options) keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrayRequest {
    pub uri: String,
    pub service_id: String,
    pub method: String,
    pub parameters: HashMap<String, Vec<String>>,
    pub headers: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub body: Option<Vec<u8>>,
    #[serde(default)]
    pub attributes: HashMap<String, serde_json::Value>,
}

impl GrayRequest {
    /// Builds a request representation from a parsed URL: the host becomes
    /// the service id and the query string becomes the parameter multimap.
    pub fn from_url(url: &Url, method: impl Into<String>) -> Self {
        let mut parameters: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in url.query_pairs() {
            parameters
                .entry(name.into_owned())
                .or_default()
                .push(value.into_owned());
        }

        Self {
            uri: url.to_string(),
            service_id: url.host_str().unwrap_or_default().to_string(),
            method: method.into(),
            parameters,
            headers: HashMap::new(),
            body: None,
            attributes: HashMap::new(),
        }
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.entry(name.into()).or_default().push(value.into());
    }

    pub fn add_headers<I, K, V>(&mut self, headers: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.add_header(name, value);
        }
    }

    /// Captures the request body, honoring the capture settings.
    pub fn load_body(&mut self, body: Vec<u8>, settings: &GrayRequestSettings) {
        if settings.load_body {
            self.body = Some(body);
        }
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: serde_json::Value) {
        self.attributes.insert(name.into(), value);
    }

    pub fn attribute(&self, name: &str) -> Option<&serde_json::Value> {
        self.attributes.get(name)
    }

    pub fn header(&self, name: &str) -> Option<&[String]> {
        self.headers.get(name).map(Vec::as_slice)
    }

    pub fn parameter(&self, name: &str) -> Option<&[String]> {
        self.parameters.get(name).map(Vec::as_slice)
    }
}
