//! Named route templates of the Graylog REST API.
//!
//! Templates use `{name}` placeholders that are substituted (and
//! percent-encoded) by [`Route::resolve`].

use http::Method;

/// A server route: HTTP method plus a path template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub template: &'static str,
}

impl Route {
    pub const fn new(method: Method, template: &'static str) -> Self {
        Self { method, template }
    }

    /// Substitute `{name}` placeholders with the given values.
    ///
    /// Placeholders without a matching parameter are left untouched.
    pub fn resolve(&self, params: &[(&str, &str)]) -> String {
        let mut path = self.template.to_string();
        for (name, value) in params {
            let placeholder = format!("{{{}}}", name);
            path = path.replace(&placeholder, &urlencoding::encode(value));
        }
        path
    }
}

pub const STREAMS: Route = Route::new(Method::GET, "/streams");
pub const STREAM: Route = Route::new(Method::GET, "/streams/{streamId}");
pub const STREAM_CREATE: Route = Route::new(Method::POST, "/streams");
pub const STREAM_DELETE: Route = Route::new(Method::DELETE, "/streams/{streamId}");
pub const STREAM_PAUSE: Route = Route::new(Method::POST, "/streams/{streamId}/pause");
pub const STREAM_RESUME: Route = Route::new(Method::POST, "/streams/{streamId}/resume");
pub const STREAM_THROUGHPUT: Route = Route::new(Method::GET, "/streams/{streamId}/throughput");

pub const STREAM_ALERTS: Route = Route::new(Method::GET, "/streams/{streamId}/alerts");
pub const STREAM_ALERTS_CHECK: Route = Route::new(Method::GET, "/streams/{streamId}/alerts/check");
pub const STREAM_ALERT_HISTORY: Route =
    Route::new(Method::GET, "/streams/{streamId}/alerts/{alertId}/history");

pub const ALERT_RECEIVER_ADD: Route =
    Route::new(Method::POST, "/streams/{streamId}/alerts/receivers");
pub const ALERT_RECEIVER_REMOVE: Route =
    Route::new(Method::DELETE, "/streams/{streamId}/alerts/receivers");

pub const ALERT_CONDITIONS: Route =
    Route::new(Method::GET, "/streams/{streamId}/alerts/conditions");
pub const ALERT_CONDITION_CREATE: Route =
    Route::new(Method::POST, "/streams/{streamId}/alerts/conditions");

pub const USER: Route = Route::new(Method::GET, "/users/{username}");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_stream_id() {
        let path = STREAM_THROUGHPUT.resolve(&[("streamId", "52d6a2fde4b0f2aa8b6c3b22")]);
        assert_eq!(path, "/streams/52d6a2fde4b0f2aa8b6c3b22/throughput");
    }

    #[test]
    fn test_resolve_multiple_params() {
        let path = STREAM_ALERT_HISTORY.resolve(&[("streamId", "s1"), ("alertId", "a1")]);
        assert_eq!(path, "/streams/s1/alerts/a1/history");
    }

    #[test]
    fn test_resolve_encodes_reserved_characters() {
        let path = USER.resolve(&[("username", "jane doe/admin")]);
        assert_eq!(path, "/users/jane%20doe%2Fadmin");
    }

    #[test]
    fn test_resolve_keeps_unreserved_characters() {
        let path = USER.resolve(&[("username", "jane.doe-1_x~")]);
        assert_eq!(path, "/users/jane.doe-1_x~");
    }
}
