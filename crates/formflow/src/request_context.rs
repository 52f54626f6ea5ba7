// File: src/request_context.rs
// Purpose: Request snapshot and urlencoded submitted-value decoding

use anyhow::Context;
use axum::http::{header, HeaderMap, Method};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Snapshot of one inbound request as handed over by the serving layer:
/// method, path, raw query string, headers, and the raw body bytes.
///
/// The snapshot is immutable; form processing reads it but never writes.
#[derive(Clone)]
pub struct RequestContext {
    method: Method,
    path: String,
    query: String,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl std::fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestContext")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish()
    }
}

impl RequestContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        query: impl Into<String>,
        headers: HeaderMap,
        body: Vec<u8>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            query: query.into(),
            headers,
            body,
        }
    }

    /// A `POST` carrying an urlencoded form body, the common case.
    pub fn form_post(path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        Self::new(Method::POST, path, "", headers, body.into())
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::POST
    }

    /// Decodes the submitted field values from the form-encoded body and
    /// the query string, body pairs first, preserving submission order and
    /// multiplicity.
    ///
    /// The body only contributes when its content type is
    /// `application/x-www-form-urlencoded` (or no content type is set).
    /// Decode faults are errors: a body that is not UTF-8, or
    /// percent-escapes decoding to invalid UTF-8.
    pub fn submitted_values(&self) -> anyhow::Result<SubmittedValues> {
        let mut values = SubmittedValues::default();

        if !self.body.is_empty() && self.body_is_form_encoded() {
            let body =
                std::str::from_utf8(&self.body).context("form body is not valid UTF-8")?;
            decode_pairs(body, &mut values)?;
        }
        if !self.query.is_empty() {
            decode_pairs(&self.query, &mut values)?;
        }

        Ok(values)
    }

    fn body_is_form_encoded(&self) -> bool {
        match self.header(header::CONTENT_TYPE.as_str()) {
            Some(content_type) => content_type.starts_with("application/x-www-form-urlencoded"),
            None => true,
        }
    }
}

fn decode_pairs(raw: &str, values: &mut SubmittedValues) -> anyhow::Result<()> {
    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }
        // A pair without `=` submits the bare name with an empty value.
        let (name, value) = match pair.split_once('=') {
            Some((name, value)) => (name, value),
            None => (pair, ""),
        };
        values.push(decode_component(name)?, decode_component(value)?);
    }
    Ok(())
}

fn decode_component(raw: &str) -> anyhow::Result<String> {
    let spaced = raw.replace('+', " ");
    let decoded = urlencoding::decode(&spaced)
        .with_context(|| format!("invalid urlencoded component `{raw}`"))?;
    Ok(decoded.into_owned())
}

/// Ordered multi-map of submitted field values, exactly as decoded from
/// the transport. Captured once per request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedValues {
    values: IndexMap<String, Vec<String>>,
}

impl SubmittedValues {
    /// First value submitted under a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    /// All values submitted under a name, in submission order.
    pub fn all(&self, name: &str) -> &[String] {
        self.values.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn push(&mut self, name: String, value: String) {
        self.values.entry(name).or_default().push(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.values.iter().map(|(name, v)| (name.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn decodes_simple_body_pairs() {
        let ctx = RequestContext::form_post("/contact", "name=Bob&email=bob%40example.com");

        let values = ctx.submitted_values().unwrap();
        assert_eq!(values.get("name"), Some("Bob"));
        assert_eq!(values.get("email"), Some("bob@example.com"));
    }

    #[test]
    fn preserves_order_and_multiplicity() {
        let ctx = RequestContext::form_post("/tags", "tag=a&other=x&tag=b");

        let values = ctx.submitted_values().unwrap();
        assert_eq!(values.all("tag"), &["a".to_string(), "b".to_string()]);
        let names: Vec<_> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["tag", "other"]);
    }

    #[test]
    fn plus_decodes_to_space() {
        let ctx = RequestContext::form_post("/contact", "name=John+Doe");

        let values = ctx.submitted_values().unwrap();
        assert_eq!(values.get("name"), Some("John Doe"));
    }

    #[test]
    fn bare_name_submits_empty_value() {
        let ctx = RequestContext::form_post("/opts", "novalidate&a=1&&b=2");

        let values = ctx.submitted_values().unwrap();
        assert_eq!(values.get("novalidate"), Some(""));
        assert_eq!(values.get("a"), Some("1"));
        assert_eq!(values.get("b"), Some("2"));
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn query_pairs_follow_body_pairs() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        let ctx = RequestContext::new(
            Method::POST,
            "/contact",
            "source=query",
            headers,
            b"name=Bob".to_vec(),
        );

        let values = ctx.submitted_values().unwrap();
        let names: Vec<_> = values.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "source"]);
    }

    #[test]
    fn non_form_content_type_skips_the_body() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        let ctx = RequestContext::new(
            Method::POST,
            "/contact",
            "a=1",
            headers,
            br#"{"name":"Bob"}"#.to_vec(),
        );

        let values = ctx.submitted_values().unwrap();
        assert_eq!(values.get("a"), Some("1"));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn invalid_utf8_body_is_a_decode_fault() {
        let ctx = RequestContext::form_post("/contact", vec![0x66, 0xff, 0xfe]);
        assert!(ctx.submitted_values().is_err());
    }

    #[test]
    fn escape_decoding_to_invalid_utf8_is_a_decode_fault() {
        let ctx = RequestContext::form_post("/contact", "name=%FF");
        assert!(ctx.submitted_values().is_err());
    }

    #[test]
    fn get_returns_the_first_value() {
        let mut values = SubmittedValues::default();
        values.push("tag".to_string(), "a".to_string());
        values.push("tag".to_string(), "b".to_string());

        assert_eq!(values.get("tag"), Some("a"));
        assert_eq!(values.get("missing"), None);
    }
}
