//! Request snapshot exposed to the correlation resolver.

use std::sync::RwLock;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use url::form_urlencoded;

use crate::correlation::{CorrelationSource, SourceKey, SourceLocation, SourceUnavailable};

/// Headers, query and form fields of one request, plus the response headers
/// handlers have set so far.
#[derive(Debug)]
pub struct RequestContext {
    headers: HeaderMap,
    query: Vec<(String, String)>,
    form: Option<Vec<(String, String)>>,
    response_headers: RwLock<HeaderMap>,
}

impl RequestContext {
    /// `form` is `None` when the request does not carry a url-encoded form.
    pub fn new(headers: HeaderMap, query: Option<&str>, form: Option<&[u8]>) -> Self {
        Self {
            headers,
            query: query.map(|q| parse_pairs(q.as_bytes())).unwrap_or_default(),
            form: form.map(parse_pairs),
            response_headers: RwLock::new(HeaderMap::new()),
        }
    }

    /// Record a response header; it becomes visible to correlation lookups
    /// immediately and is copied onto the response by the middleware.
    pub fn set_response_header(&self, name: HeaderName, value: HeaderValue) {
        match self.response_headers.write() {
            Ok(mut headers) => {
                headers.insert(name, value);
            }
            Err(_) => tracing::warn!(header = %name, "Response header store poisoned, header dropped"),
        }
    }

    /// Snapshot of the response headers set so far.
    pub fn response_headers(&self) -> HeaderMap {
        self.response_headers
            .read()
            .map(|headers| headers.clone())
            .unwrap_or_default()
    }

    pub fn has_form(&self) -> bool {
        self.form.is_some()
    }
}

impl CorrelationSource for RequestContext {
    fn lookup(&self, key: &SourceKey) -> Result<Option<String>, SourceUnavailable> {
        match key.location {
            SourceLocation::ResponseHeader => {
                let headers = self
                    .response_headers
                    .read()
                    .map_err(|_| SourceUnavailable::new(key.location, "response header store poisoned"))?;
                Ok(header_value(&headers, &key.name))
            }
            SourceLocation::RequestHeader => Ok(header_value(&self.headers, &key.name)),
            SourceLocation::FormField => match &self.form {
                Some(fields) => Ok(field_value(fields, &key.name)),
                None => Err(SourceUnavailable::new(
                    key.location,
                    "request has no url-encoded form body",
                )),
            },
            SourceLocation::QueryField => Ok(field_value(&self.query, &key.name)),
        }
    }
}

fn parse_pairs(input: &[u8]) -> Vec<(String, String)> {
    form_urlencoded::parse(input).into_owned().collect()
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn field_value(fields: &[(String, String)], name: &str) -> Option<String> {
    fields
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.clone())
}
