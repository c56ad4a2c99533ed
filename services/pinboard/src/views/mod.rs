//! Server-rendered web pages.

pub mod accounts;
pub mod boards;
pub mod pins;
pub mod templates;

use std::collections::HashMap;

use askama::Template;
use axum::extract::Multipart;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use tower_sessions::Session;

use crate::auth::{LOGIN_PATH, take_flashes};
use crate::domain::types::User;
use crate::error::PinboardError;
use crate::views::templates::{ErrorTemplate, Nav};

/// HTML counterpart of [`PinboardError`]: renders an error page instead of JSON.
#[derive(Debug)]
pub struct WebError(pub PinboardError);

impl From<PinboardError> for WebError {
    fn from(e: PinboardError) -> Self {
        Self(e)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let error = self.0;
        if let PinboardError::NotAuthenticated = error {
            return Redirect::to(LOGIN_PATH).into_response();
        }
        if let PinboardError::Internal(ref e) = error {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let status = error.status();
        let message = match status {
            StatusCode::INTERNAL_SERVER_ERROR => "Something went wrong.".to_owned(),
            _ => error.to_string(),
        };
        let page = ErrorTemplate {
            nav: Nav::default(),
            status: status.as_u16(),
            message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                tracing::error!(error = %e, "failed to render error page");
                status.into_response()
            }
        }
    }
}

pub type WebResult<T = Response> = Result<T, WebError>;

pub fn render<T: Template>(template: &T) -> WebResult {
    let body = template
        .render()
        .map_err(|e| PinboardError::Internal(anyhow::anyhow!("render template: {e}")))?;
    Ok(Html(body).into_response())
}

/// Navigation data for the current request; drains queued flash messages.
pub async fn nav(session: &Session, user: Option<&User>) -> Nav {
    Nav {
        username: user.map(|u| u.username.clone()),
        profile_url: user.map(|u| profile_path(&u.username)).unwrap_or_default(),
        messages: take_flashes(session).await,
    }
}

/// Only same-site absolute paths are followed after login. They must also be
/// valid `Location` values as-is.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && n.chars().all(|c| c.is_ascii_graphic())
    })
}

pub fn profile_path(username: &str) -> String {
    format!("/accounts/profile/{}", urlencoding::encode(username))
}

pub fn board_path(title: &str) -> String {
    format!("/boards/{}", urlencoding::encode(title))
}

pub fn board_edit_path(title: &str) -> String {
    format!("/boards/edit/{}", urlencoding::encode(title))
}

/// Uploaded file from a multipart form.
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus at most one non-empty file per field name.
#[derive(Default)]
pub struct MultipartForm {
    pub fields: HashMap<String, String>,
    pub files: HashMap<String, Upload>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, PinboardError> {
        let mut form = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| PinboardError::Validation(format!("Malformed form data: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_owned();
            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        PinboardError::Validation(format!("Upload failed: {e}"))
                    })?;
                    if !file_name.is_empty() && !bytes.is_empty() {
                        form.files.insert(
                            name,
                            Upload {
                                file_name,
                                bytes: bytes.to_vec(),
                            },
                        );
                    }
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        PinboardError::Validation(format!("Malformed form data: {e}"))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    pub fn optional(&self, name: &str) -> Option<String> {
        self.fields.get(name).cloned()
    }

    /// HTML checkboxes are only submitted when ticked.
    pub fn checked(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }
}
