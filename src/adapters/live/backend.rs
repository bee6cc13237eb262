//! Live adapter for the `Backend` port using reqwest.

use std::error::Error;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use crate::ports::backend::{ApiRequest, ApiResponse, Backend, BackendFuture, Method, RequestBody};

const CSRF_PATH: &str = "/api/form";
const CSRF_HEADER: &str = "CSRF-Token";

/// Live backend that talks HTTP to the board's REST API.
///
/// Keeps a cookie store for the server session, sends the persisted bearer
/// token when one is known, and fetches a fresh CSRF token before every
/// mutating request.
pub struct LiveBackend {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LiveBackend {
    /// Creates a live backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
    ) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let client = Client::builder().cookie_store(true).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url, token })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn csrf_token(&self) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self.client.get(self.url(CSRF_PATH)).send().await.map_err(
            |e| -> Box<dyn Error + Send + Sync> { format!("CSRF token request failed: {e}").into() },
        )?;
        let body: CsrfResponse = response.json().await.map_err(
            |e| -> Box<dyn Error + Send + Sync> { format!("Failed to parse CSRF token: {e}").into() },
        )?;
        Ok(body.csrf_token)
    }
}

/// Body of `GET /api/form`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsrfResponse {
    csrf_token: String,
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}

/// Parses a response body, keeping non-JSON text as a string.
fn parse_body(text: &str) -> serde_json::Value {
    if text.trim().is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.to_string()))
}

/// Multipart form with the file under `field` plus the text fields.
async fn upload_form(
    field: String,
    file: &Path,
    fields: Vec<(String, String)>,
) -> Result<Form, Box<dyn Error + Send + Sync>> {
    let bytes = tokio::fs::read(file).await.map_err(|e| -> Box<dyn Error + Send + Sync> {
        format!("Failed to read upload {}: {e}", file.display()).into()
    })?;
    let file_name = file
        .file_name()
        .map_or_else(|| "upload".to_string(), |n| n.to_string_lossy().into_owned());
    let mut form = Form::new().part(field, Part::bytes(bytes).file_name(file_name));
    for (name, value) in fields {
        form = form.text(name, value);
    }
    Ok(form)
}

impl Backend for LiveBackend {
    fn send(&self, request: &ApiRequest) -> BackendFuture<'_> {
        let request = request.clone();

        Box::pin(async move {
            let route = request.route();
            tracing::debug!(%route, "sending backend request");

            let mut builder =
                self.client.request(reqwest_method(request.method), self.url(&request.path));
            builder = match request.body {
                RequestBody::Empty => builder,
                RequestBody::Json(value) => builder.json(&value),
                RequestBody::Upload { field, file, fields } => {
                    builder.multipart(upload_form(field, &file, fields).await?)
                }
            };

            if request.method.is_mutating() {
                let csrf = self.csrf_token().await?;
                builder = builder.header(CSRF_HEADER, csrf);
            }
            if let Some(token) = &self.token {
                builder = builder.bearer_auth(token);
            }

            let response = builder.send().await.map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("Request {route} failed: {e}").into()
            })?;

            let status = response.status().as_u16();
            let text = response.text().await.map_err(|e| -> Box<dyn Error + Send + Sync> {
                format!("Failed to read response of {route}: {e}").into()
            })?;

            Ok(ApiResponse { status, body: parse_body(&text) })
        })
    }
}
