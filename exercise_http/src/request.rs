//! HTTP request types for the exercise API.
//!
//! Bodies arrive either as JSON or as HTML form posts, so every field is
//! optional here and validated by the core.

use axum::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header;
use axum::Form;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use exercise_core::{DurationInput, NewEntry};

use crate::error::ApiError;

const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

/// Request body decoded from JSON or a urlencoded form
///
/// Anything that is not declared as a form is read as JSON. An empty body
/// decodes as `{}` so missing fields surface as validation errors.
#[derive(Debug, Clone)]
pub struct Payload<T>(pub T);

fn is_form(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with(CONTENT_TYPE_FORM))
        .unwrap_or(false)
}

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_form(&req) {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            return Ok(Payload(value));
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let raw: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &body
        };
        let value =
            serde_json::from_slice(raw).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        Ok(Payload(value))
    }
}

/// Body of `POST /api/exercise/new-user`
#[derive(Debug, Default, Deserialize)]
pub struct NewUserRequest {
    pub username: Option<String>,
}

/// A numeric field posted as a JSON number or as text
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberField {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl From<NumberField> for DurationInput {
    fn from(field: NumberField) -> Self {
        match field {
            NumberField::Integer(i) => DurationInput::Minutes(i),
            NumberField::Float(f) => DurationInput::Fractional(f),
            NumberField::Text(s) => DurationInput::Text(s),
        }
    }
}

/// Body of `POST /api/exercise/add`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddExerciseRequest {
    pub user_id: Option<String>,
    pub description: Option<String>,
    pub duration: Option<NumberField>,
    /// Anything but a string is treated as an unparsable date
    pub date: Option<Value>,
}

impl AddExerciseRequest {
    /// Split into the target user id and the entry fields
    pub fn into_parts(self) -> (Option<String>, NewEntry) {
        let entry = NewEntry {
            description: self.description,
            duration: self.duration.map(DurationInput::from),
            date: match self.date {
                Some(Value::String(date)) => Some(date),
                _ => None,
            },
        };
        (self.user_id, entry)
    }
}

/// Query parameters of `GET /api/exercise/log`
///
/// Kept as raw strings so malformed filters can be ignored instead of
/// rejecting the request.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogParams {
    pub user_id: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}
