use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use std::io::Write;
use tracing::error;

use super::context::{OpensearchContext, Page, SearchContext, TrustedHtml};
use super::templates::TemplateRegistry;
use super::types::TemplateError;

pub const SEARCH_TITLE: &str = "code search";
pub const ABOUT_TITLE: &str = "about";
pub const OPENSEARCH_CONTENT_TYPE: &str = "application/opensearchdescription+xml";

/// Builds the search page: the search body wrapped in the layout, with scripts.
pub fn search_page(
    templates: &TemplateRegistry,
    context: &SearchContext,
) -> Result<Page, TemplateError> {
    let body = templates.search_page.render_html(context)?;
    Ok(Page::new(SEARCH_TITLE, body).with_js())
}

pub fn about_page(templates: &TemplateRegistry) -> Result<Page, TemplateError> {
    let body = templates.about_page.render_html(&serde_json::json!({}))?;
    Ok(Page::new(ABOUT_TITLE, body))
}

pub fn opensearch_descriptor(
    templates: &TemplateRegistry,
    context: &OpensearchContext,
) -> Result<Vec<u8>, TemplateError> {
    templates.opensearch_xml.render(context)
}

/// Streams `page` through the layout.
///
/// Failures are logged here; once bytes have reached `writer` there is
/// nothing left to recover, so callers may ignore the result.
pub fn write_page<W: Write>(
    templates: &TemplateRegistry,
    writer: W,
    mut page: Page,
    production: bool,
) -> Result<(), TemplateError> {
    let title = page.title.clone();
    templates
        .render_page(writer, &mut page, production)
        .map_err(|e| {
            error!("Failed to write page {:?}: {}", title, e);
            e
        })
}

/// Renders `page` into a `text/html` response.
///
/// A failure is logged once, by the error response.
pub fn html_response(templates: &TemplateRegistry, mut page: Page, production: bool) -> Response {
    let mut body = Vec::new();
    match templates.render_page(&mut body, &mut page, production) {
        Ok(()) => (
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => e.into_response(),
    }
}

pub fn opensearch_response(
    templates: &TemplateRegistry,
    context: &OpensearchContext,
) -> Response {
    match opensearch_descriptor(templates, context) {
        Ok(body) => ([(header::CONTENT_TYPE, OPENSEARCH_CONTENT_TYPE)], body).into_response(),
        Err(e) => e.into_response(),
    }
}

/// Wraps a body that failed to render in a minimal page.
pub fn fallback_page(title: &str) -> Page {
    Page::new(
        title,
        TrustedHtml::from_static("<p>This page could not be rendered.</p>"),
    )
}
