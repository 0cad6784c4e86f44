// server/response.rs - Owned HTTP response value
//
// Handlers build and return these instead of writing to the socket, so
// every route is unit-testable without binding a port. The server loop
// converts them into tiny_http responses at the boundary.

use std::io::Cursor;
use tiny_http::{Header, StatusCode};

#[derive(Debug, Clone, PartialEq)]
pub struct HubResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl HubResponse {
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
        }
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status, body.into().into_bytes())
            .with_header("Content-Type", "text/plain; charset=utf-8")
    }

    pub fn json(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::new(status, body.into()).with_header("Content-Type", "application/json")
    }

    pub fn file(content_type: &str, body: Vec<u8>) -> Self {
        Self::new(200, body).with_header("Content-Type", content_type)
    }

    /// A 302 redirect. The body carries the target for non-following clients.
    pub fn redirect(location: &str) -> Self {
        Self::text(302, format!("Redirecting to {}", location))
            .with_header("Location", location)
    }

    pub fn not_found() -> Self {
        Self::text(404, "not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "method not allowed")
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert into a tiny_http response for the accept loop.
    pub fn into_tiny(self) -> tiny_http::Response<Cursor<Vec<u8>>> {
        let mut response =
            tiny_http::Response::from_data(self.body).with_status_code(StatusCode(self.status));
        for (name, value) in self.headers {
            if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response = response.with_header(header);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_carries_location_header() {
        let response = HubResponse::redirect("https://example.com");
        assert_eq!(response.status(), 302);
        assert_eq!(response.header("Location"), Some("https://example.com"));
        assert_eq!(response.header("location"), Some("https://example.com"));
    }

    #[test]
    fn test_json_sets_content_type() {
        let response = HubResponse::json(200, r#"{"ok":true}"#.as_bytes().to_vec());
        assert_eq!(response.header("Content-Type"), Some("application/json"));
        assert_eq!(response.body(), br#"{"ok":true}"#);
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        assert_eq!(HubResponse::not_found().status(), 404);
        assert_eq!(HubResponse::method_not_allowed().status(), 405);
    }

    #[test]
    fn test_into_tiny_preserves_status() {
        let tiny = HubResponse::text(418, "teapot").into_tiny();
        assert_eq!(tiny.status_code().0, 418);
    }
}
