use serde::Serialize;
use std::fmt;
use url::Url;

use crate::config::{Backend, GithubRepo, Settings};

/// Markup that has already been escaped by a template render.
///
/// The layout inserts this unescaped, so it can only be produced by
/// [`TemplateSet::render_html`](super::templates::TemplateSet::render_html)
/// or from a compile-time literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    pub fn from_static(markup: &'static str) -> Self {
        Self(markup.to_string())
    }

    pub(crate) fn from_rendered(markup: String) -> Self {
        Self(markup)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Context for the outer layout template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Page {
    pub include_js: bool,
    // Overwritten from configuration on every layout render
    pub production: bool,
    pub title: String,
    pub body: TrustedHtml,
}

impl Page {
    pub fn new(title: impl Into<String>, body: TrustedHtml) -> Self {
        Self {
            include_js: false,
            production: false,
            title: title.into(),
            body,
        }
    }

    pub fn with_js(mut self) -> Self {
        self.include_js = true;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OpensearchContext {
    pub backend_name: String,
    pub base_url: String,
}

impl OpensearchContext {
    pub fn new(backend: &Backend, base_url: &Url) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            backend_name: backend.display_name().to_string(),
            base_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchContext {
    pub github_repos: Vec<GithubRepo>,
    pub backends: Vec<Backend>,
}

impl SearchContext {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            github_repos: settings.github_repos.clone(),
            backends: settings.backends.clone(),
        }
    }
}
