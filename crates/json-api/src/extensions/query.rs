//! Lenient query string parsing for listing endpoints.
//!
//! Malformed or missing values fall back to the listing defaults instead of failing the
//! request.

use salvo::Request;

use storefront_app::domain::pagination::PageRequest;

pub(crate) trait RequestQueryExt {
    /// `page` and `limit` query parameters as a [`PageRequest`].
    fn page_request(&self) -> PageRequest;

    /// A non-blank, trimmed string query parameter.
    fn query_text(&self, key: &str) -> Option<String>;
}

impl RequestQueryExt for Request {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(self.query::<u32>("page"), self.query::<u32>("limit"))
    }

    fn query_text(&self, key: &str) -> Option<String> {
        self.query::<String>(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}
