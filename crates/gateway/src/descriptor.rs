//! Request descriptor value object.

use reqwest::Method;
use serde_json::Value;

/// Describes one HTTP call: method, path relative to the base URL, optional
/// flat query/body payloads, and an optional explicit cancellation key.
///
/// When no key is supplied, requests are keyed by `"{METHOD}:{path}"`, so
/// re-issuing the same call supersedes the previous one.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub cancel_key: Option<String>,
}

impl RequestDescriptor {
    /// Creates a descriptor for the given method and path.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            body: None,
            cancel_key: None,
        }
    }

    /// `GET` descriptor.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` descriptor.
    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// `PUT` descriptor. Prefer `patch` for partial field updates.
    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// `PATCH` descriptor.
    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    /// `DELETE` descriptor.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach query parameters. Must be a flat JSON object.
    #[must_use]
    pub fn with_query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Override the cancellation key for this request.
    #[must_use]
    pub fn with_cancel_key(mut self, key: impl Into<String>) -> Self {
        self.cancel_key = Some(key.into());
        self
    }

    /// The effective cancellation key: the caller-supplied key, else
    /// `"{METHOD}:{path}"`.
    #[must_use]
    pub fn effective_key(&self) -> String {
        self.cancel_key
            .clone()
            .unwrap_or_else(|| format!("{}:{}", self.method, self.path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_key_is_method_and_path() {
        let d = RequestDescriptor::get("api/v1/students/");
        assert_eq!(d.effective_key(), "GET:api/v1/students/");
    }

    #[test]
    fn test_explicit_key_wins() {
        let d = RequestDescriptor::get("api/v1/students/").with_cancel_key("students:list");
        assert_eq!(d.effective_key(), "students:list");
    }

    #[test]
    fn test_same_path_different_methods_get_distinct_keys() {
        let get = RequestDescriptor::get("api/v1/fees/");
        let post = RequestDescriptor::post("api/v1/fees/");
        assert_ne!(get.effective_key(), post.effective_key());
    }

    #[test]
    fn test_builders() {
        let d = RequestDescriptor::post("api/v1/payments/")
            .with_body(json!({"fee_id": 3, "amount_paid": "150.00"}))
            .with_query(json!({"page": 2}));
        assert_eq!(d.method, Method::POST);
        assert_eq!(d.body.as_ref().unwrap()["fee_id"], 3);
        assert_eq!(d.query.as_ref().unwrap()["page"], 2);
    }
}
