//! Typed access to the REST API plus the view state the dashboards keep
//! around it (loading flags, filters, toasts).

pub mod api;
pub mod view;

use std::collections::HashMap;

use thiserror::Error;

pub use api::ApiClient;
pub use view::{ContactFormView, DashboardView, Keyed, ListView, Toast, ToastKind};

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api { status: u16, message: String },

    /// Rejected locally; no request was sent.
    #[error("Please fix the highlighted fields")]
    Validation(HashMap<String, String>),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ClientError {
    pub(crate) fn from_validation(errors: &validator::ValidationErrors) -> Self {
        let fields = crate::error::field_errors(errors)
            .into_iter()
            .map(|(field, message)| {
                let text = message.as_str().map(str::to_string).unwrap_or_default();
                (field, text)
            })
            .collect();
        ClientError::Validation(fields)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
