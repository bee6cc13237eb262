//! Backend port for the board's REST API.

use std::error::Error;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

/// Boxed future type alias used by [`Backend`] to keep the trait dyn-compatible.
pub type BackendFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ApiResponse, Box<dyn Error + Send + Sync>>> + Send + 'a>>;

/// HTTP verb of an API request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Returns `true` for verbs that change server state and need a CSRF token.
    #[must_use]
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    /// Upper-case verb as sent on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried by an [`ApiRequest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestBody {
    /// No body.
    Empty,
    /// A JSON document.
    Json(serde_json::Value),
    /// A multipart upload of a single file plus plain text fields.
    Upload {
        /// Form field name of the file part.
        field: String,
        /// Local file to send.
        file: PathBuf,
        /// Additional text fields.
        fields: Vec<(String, String)>,
    },
}

/// A request against the backend, relative to the configured API URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,
    /// Path starting with `/api/`.
    pub path: String,
    /// Request payload.
    pub body: RequestBody,
}

impl ApiRequest {
    /// Builds a body-less `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: Method::Get, path: path.into(), body: RequestBody::Empty }
    }

    /// Builds a request with a JSON body.
    #[must_use]
    pub fn json(method: Method, path: impl Into<String>, body: serde_json::Value) -> Self {
        Self { method, path: path.into(), body: RequestBody::Json(body) }
    }

    /// Builds a body-less request with the given verb.
    #[must_use]
    pub fn empty(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), body: RequestBody::Empty }
    }

    /// `"<METHOD> <path>"`, used to key recorded interactions.
    #[must_use]
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

/// A response from the backend.
///
/// Non-2xx statuses are not transport errors; the typed API classifies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body. Non-JSON text is carried as a string, empty bodies as null.
    pub body: serde_json::Value,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends requests to the board's REST backend.
///
/// Implementations attach credentials (bearer token, CSRF token, session
/// cookie). Only transport failures are reported as errors.
pub trait Backend: Send + Sync {
    /// Sends one request and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request could not be delivered or its body not read.
    fn send(&self, request: &ApiRequest) -> BackendFuture<'_>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_get_is_non_mutating() {
        assert!(!Method::Get.is_mutating());
        assert!(Method::Post.is_mutating());
        assert!(Method::Put.is_mutating());
        assert!(Method::Patch.is_mutating());
        assert!(Method::Delete.is_mutating());
    }

    #[test]
    fn route_joins_method_and_path() {
        let request = ApiRequest::json(Method::Patch, "/api/edit-task/t1", json!({}));
        assert_eq!(request.route(), "PATCH /api/edit-task/t1");
    }

    #[test]
    fn success_covers_2xx_only() {
        let ok = ApiResponse { status: 204, body: serde_json::Value::Null };
        let redirect = ApiResponse { status: 302, body: serde_json::Value::Null };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }
}
