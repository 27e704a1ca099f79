//! Request boundary
//!
//! Each route is a plain function over [`Storage`](crate::storage::Storage)
//! returning an [`ApiResponse`]. Domain errors are translated here, once,
//! into a status code and the `{success, error}` envelope.

pub mod dto;
pub mod routes;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::StockbookError;
use crate::export::ExportOutput;

pub use routes::*;

/// Body of a response
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Raw file download
    Attachment {
        content_type: &'static str,
        filename: String,
        body: String,
    },
}

/// Status code plus body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
        }
    }

    /// `{success: true, data}`
    pub fn data<T: Serialize>(status: u16, data: T) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => Self::json(status, json!({ "success": true, "data": data })),
            Err(e) => Self::internal("serialize response", &e.into()),
        }
    }

    pub fn ok<T: Serialize>(data: T) -> Self {
        Self::data(200, data)
    }

    pub fn created<T: Serialize>(data: T) -> Self {
        Self::data(201, data)
    }

    /// `{success: true, message}`
    pub fn message(message: impl Into<String>) -> Self {
        Self::json(200, json!({ "success": true, "message": message.into() }))
    }

    pub fn attachment(output: ExportOutput) -> Self {
        Self {
            status: 200,
            body: ResponseBody::Attachment {
                content_type: output.content_type,
                filename: output.filename,
                body: output.body,
            },
        }
    }

    /// Translate a failed `operation` into a status and error envelope.
    ///
    /// Internal causes are logged and replaced by `Failed to <operation>`.
    pub fn from_error(operation: &str, err: StockbookError) -> Self {
        match err.public_message() {
            Some(message) => Self::json(
                err.kind().status_code(),
                json!({ "success": false, "error": message }),
            ),
            None => Self::internal(operation, &err),
        }
    }

    fn internal(operation: &str, err: &StockbookError) -> Self {
        error!(operation, error = %err, "request failed");
        Self::json(
            500,
            json!({ "success": false, "error": format!("Failed to {}", operation) }),
        )
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The JSON body, if this is not an attachment
    pub fn json_body(&self) -> Option<&Value> {
        match &self.body {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Attachment { .. } => None,
        }
    }
}
