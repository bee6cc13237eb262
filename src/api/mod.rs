//! Typed access to the board's REST endpoints.
//!
//! Every function issues exactly one request through the [`Backend`] port
//! and classifies the outcome into an [`ApiError`]. Non-2xx responses
//! carry the server's `message` field when it sends one.

pub mod error;

pub use error::{ApiError, NOT_LOGGED_IN};

use std::collections::BTreeMap;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::model::{
    Account, Contact, ContactFields, Profile, Registration, Task, TaskFields, TaskPatch, TaskState,
};
use crate::ports::{ApiRequest, ApiResponse, Backend, Method, RequestBody};

/// Tasks as returned by `GET /api/tasks`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskListing {
    /// Records keyed by the backend's record key, normalized.
    pub tasks: BTreeMap<String, Task>,
    /// Total reported by the server, if any.
    pub total: Option<usize>,
}

/// Typed client over a [`Backend`].
#[derive(Clone, Copy)]
pub struct Api<'a> {
    backend: &'a dyn Backend,
}

impl<'a> Api<'a> {
    /// Wraps a backend.
    #[must_use]
    pub fn new(backend: &'a dyn Backend) -> Self {
        Self { backend }
    }

    async fn call(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let route = request.route();
        let response = self.backend.send(&request).await.map_err(|e| {
            tracing::error!(%route, error = %e, "backend request failed");
            ApiError::from(e)
        })?;
        if response.is_success() {
            Ok(response.body)
        } else {
            let err = classify(&response);
            tracing::error!(%route, status = response.status, error = %err, "backend rejected request");
            Err(err)
        }
    }

    // -- accounts --

    /// `GET /api/accounts`: all registered accounts, ordered by id.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures.
    pub async fn accounts(&self) -> Result<Vec<Account>, ApiError> {
        let body = self.call(ApiRequest::get("/api/accounts")).await?;
        keyed_records(body, "accounts")?
            .into_iter()
            .map(|(key, value)| {
                let mut account: Account = decode(value, "account")?;
                if account.id.is_empty() {
                    account.id = key;
                }
                Ok(account)
            })
            .collect()
    }

    /// `GET /api/accounts/{id}`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures.
    pub async fn account(&self, id: &str) -> Result<Account, ApiError> {
        let body = self.call(ApiRequest::get(format!("/api/accounts/{id}"))).await?;
        let mut account: Account = decode(body, "account")?;
        if account.id.is_empty() {
            account.id = id.to_string();
        }
        Ok(account)
    }

    // -- contacts --

    /// `GET /api/contacts`. Accepts an id-keyed object or an array.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures.
    pub async fn contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let body = self.call(ApiRequest::get("/api/contacts")).await?;
        keyed_records(body, "contacts")?
            .into_iter()
            .map(|(key, value)| {
                let mut contact: Contact = decode(value, "contact")?;
                if contact.id.is_empty() {
                    contact.id = key;
                }
                contact.normalize();
                Ok(contact)
            })
            .collect()
    }

    /// `GET /api/contact/{id}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport, status or parse failures.
    pub async fn contact(&self, id: &str) -> Result<Contact, ApiError> {
        let body = self
            .call(ApiRequest::get(format!("/api/contact/{id}")))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::contact_not_found(id)))?;
        let mut contact: Contact = decode(body, "contact")?;
        if contact.id.is_empty() {
            contact.id = id.to_string();
        }
        contact.normalize();
        Ok(contact)
    }

    /// `POST /api/add-contact`.
    ///
    /// # Errors
    ///
    /// Transport or status failures.
    pub async fn add_contact(&self, fields: &ContactFields) -> Result<(), ApiError> {
        self.call(ApiRequest::json(Method::Post, "/api/add-contact", to_json(fields)?)).await?;
        Ok(())
    }

    /// `PUT /api/contact/{id}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport or status failures.
    pub async fn update_contact(&self, id: &str, fields: &ContactFields) -> Result<(), ApiError> {
        self.call(ApiRequest::json(Method::Put, format!("/api/contact/{id}"), to_json(fields)?))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::contact_not_found(id)))?;
        Ok(())
    }

    /// `POST /api/delete/contact/{id}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport or status failures.
    pub async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        self.call(ApiRequest::empty(Method::Post, format!("/api/delete/contact/{id}")))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::contact_not_found(id)))?;
        Ok(())
    }

    /// `POST /api/upload-image` as multipart (`image`, `contactId`).
    /// Returns the stored `filePath`.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures.
    pub async fn upload_image(&self, contact_id: &str, file: &Path) -> Result<String, ApiError> {
        let request = ApiRequest {
            method: Method::Post,
            path: "/api/upload-image".into(),
            body: RequestBody::Upload {
                field: "image".into(),
                file: file.to_path_buf(),
                fields: vec![("contactId".into(), contact_id.to_string())],
            },
        };
        let body = self.call(request).await?;
        body.get("filePath")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ApiError::Parse("upload response has no filePath".into()))
    }

    // -- tasks --

    /// `GET /api/tasks`: `{tasks: {key: task}, total?}`.
    ///
    /// An array listing is keyed by each record's `id`. Records that cannot
    /// be decoded or keyed are logged and left out; the rest still load.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures of the listing as a whole.
    pub async fn tasks(&self) -> Result<TaskListing, ApiError> {
        let mut body = self.call(ApiRequest::get("/api/tasks")).await?;
        let total = body.get("total").and_then(lenient_count);
        let raw = body.get_mut("tasks").map(Value::take).unwrap_or(Value::Null);
        let mut tasks = BTreeMap::new();
        for (index, (key, value)) in keyed_records(raw, "tasks")?.into_iter().enumerate() {
            let mut task: Task = match decode(value, "task") {
                Ok(task) => task,
                Err(err) => {
                    tracing::warn!(task = %key, index, error = %err, "task record skipped");
                    continue;
                }
            };
            let key = if key.is_empty() { task.id.clone() } else { key };
            if key.is_empty() {
                tracing::warn!(index, title = %task.title, "task record without id skipped");
                continue;
            }
            if tasks.contains_key(&key) {
                tracing::warn!(task = %key, "duplicate task record skipped");
                continue;
            }
            task.normalize();
            tasks.insert(key, task);
        }
        Ok(TaskListing { tasks, total })
    }

    /// `POST /api/add-task`.
    ///
    /// # Errors
    ///
    /// Transport or status failures.
    pub async fn add_task(&self, fields: &TaskFields) -> Result<(), ApiError> {
        self.call(ApiRequest::json(Method::Post, "/api/add-task", to_json(fields)?)).await?;
        Ok(())
    }

    /// `PATCH /api/edit-task/{id}` with the set fields of `patch`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport or status failures.
    pub async fn edit_task(&self, id: &str, patch: &TaskPatch) -> Result<(), ApiError> {
        self.call(ApiRequest::json(Method::Patch, format!("/api/edit-task/{id}"), to_json(patch)?))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::task_not_found(id)))?;
        Ok(())
    }

    /// `PATCH /api/edit-task-state/{id}` with `{newState}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport or status failures.
    pub async fn edit_task_state(&self, id: &str, state: TaskState) -> Result<(), ApiError> {
        let body = json!({ "newState": state.as_str() });
        self.call(ApiRequest::json(Method::Patch, format!("/api/edit-task-state/{id}"), body))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::task_not_found(id)))?;
        Ok(())
    }

    /// `PATCH /api/update-subtask-status/{id}/{index}` with `{status}`.
    ///
    /// # Errors
    ///
    /// Transport or status failures.
    pub async fn update_subtask_status(
        &self,
        id: &str,
        index: usize,
        checked: bool,
    ) -> Result<(), ApiError> {
        let path = format!("/api/update-subtask-status/{id}/{index}");
        self.call(ApiRequest::json(Method::Patch, path, json!({ "status": checked }))).await?;
        Ok(())
    }

    /// `PATCH /api/remove-subtask/{id}/{index}`.
    ///
    /// # Errors
    ///
    /// Transport or status failures.
    pub async fn remove_subtask(&self, id: &str, index: usize) -> Result<(), ApiError> {
        let path = format!("/api/remove-subtask/{id}/{index}");
        self.call(ApiRequest::empty(Method::Patch, path)).await?;
        Ok(())
    }

    /// `DELETE /api/delete-task/{id}`.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] on 404, otherwise transport or status failures.
    pub async fn delete_task(&self, id: &str) -> Result<(), ApiError> {
        self.call(ApiRequest::empty(Method::Delete, format!("/api/delete-task/{id}")))
            .await
            .map_err(|e| not_found_on_404(e, || ApiError::task_not_found(id)))?;
        Ok(())
    }

    // -- session --

    /// `GET /api/status`: the current session's profile.
    ///
    /// # Errors
    ///
    /// Transport, status or parse failures.
    pub async fn status(&self) -> Result<Profile, ApiError> {
        let body = self.call(ApiRequest::get("/api/status")).await?;
        decode(body, "status")
    }

    /// `POST /api/login`. Returns the bearer token.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the credentials are rejected.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let request = ApiRequest::json(
            Method::Post,
            "/api/login",
            json!({ "email": email, "password": password }),
        );
        let body = self.call(request).await.map_err(|e| match e {
            ApiError::Status { status: 400 | 403, .. } | ApiError::Unauthorized(_) => login_rejected(),
            other => other,
        })?;
        match body.get("token").and_then(Value::as_str) {
            Some(token) if status_is(&body, "200") && !token.is_empty() => Ok(token.to_string()),
            _ => Err(login_rejected()),
        }
    }

    /// `POST /api/logout`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the backend does not confirm.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let body = self.call(ApiRequest::empty(Method::Post, "/api/logout")).await?;
        if status_is(&body, "200") {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("logout was not confirmed by the backend".into()))
        }
    }

    /// `POST /api/sign-up`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Unauthorized`] when the registration is refused.
    pub async fn sign_up(&self, registration: &Registration) -> Result<(), ApiError> {
        let body = self
            .call(ApiRequest::json(Method::Post, "/api/sign-up", to_json(registration)?))
            .await?;
        if status_is(&body, "success") {
            Ok(())
        } else {
            Err(ApiError::Unauthorized("registration failed, please try again".into()))
        }
    }
}

fn login_rejected() -> ApiError {
    ApiError::Unauthorized("login failed, check your e-mail and password".into())
}

fn classify(response: &ApiResponse) -> ApiError {
    if response.status == 401 {
        return ApiError::not_logged_in();
    }
    let message = response
        .body
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| response.body.as_str())
        .filter(|m| !m.trim().is_empty())
        .map_or_else(|| "request failed".to_string(), str::to_string);
    ApiError::Status { status: response.status, message }
}

fn not_found_on_404(err: ApiError, not_found: impl FnOnce() -> ApiError) -> ApiError {
    match err {
        ApiError::Status { status: 404, .. } => not_found(),
        other => other,
    }
}

fn decode<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Parse(format!("{what}: {e}")))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Parse(e.to_string()))
}

/// Splits an id-keyed object (or an array) into `(key, record)` pairs.
/// Array entries get an empty key; callers fall back to the record's id.
fn keyed_records(body: Value, what: &str) -> Result<Vec<(String, Value)>, ApiError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        Value::Array(items) => Ok(items.into_iter().map(|item| (String::new(), item)).collect()),
        other => Err(ApiError::Parse(format!("{what}: expected object or array, got {other}"))),
    }
}

/// `status` arrives as `"200"` or `200` depending on the endpoint.
fn status_is(body: &Value, expected: &str) -> bool {
    match body.get("status") {
        Some(Value::String(s)) => s == expected,
        Some(Value::Number(n)) => n.to_string() == expected,
        _ => false,
    }
}

fn lenient_count(value: &Value) -> Option<usize> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
