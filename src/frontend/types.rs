use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to load templates {files:?}: {source}")]
    Load {
        files: Vec<PathBuf>,
        #[source]
        source: tera::Error,
    },
    #[error("Template group has no template named {name}")]
    MissingTemplate { name: String },
    #[error("Invalid context for template {template}: {source}")]
    Context {
        template: String,
        #[source]
        source: tera::Error,
    },
    #[error("Failed to render template {template}: {source}")]
    Render {
        template: String,
        #[source]
        source: tera::Error,
    },
    #[error("Failed to write template {template}: {source}")]
    Write {
        template: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for TemplateError {
    fn into_response(self) -> Response {
        error!("Template error: {:?}", self);

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
    }
}
