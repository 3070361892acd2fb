use serde::Serialize;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tera::{Context, Tera};
use tracing::{debug, info};

use super::context::{Page, TrustedHtml};
use super::types::TemplateError;
use crate::metrics;

pub const LAYOUT_FILES: &[&str] = &["layout.html"];
pub const SEARCH_FILES: &[&str] = &["search.html", "searchoptions.html"];
pub const ABOUT_FILES: &[&str] = &["about.html"];
pub const OPENSEARCH_FILES: &[&str] = &["opensearch.xml"];

/// A group of template files parsed together.
///
/// Every file in the group shares one namespace, so a file may include or
/// import any other file of the same group. The first file is the root that
/// gets executed.
#[derive(Debug)]
pub struct TemplateSet {
    tera: Tera,
    root: String,
}

impl TemplateSet {
    /// Resolves `files` under `<docroot>/templates/` and parses them as one group.
    pub fn load<S: AsRef<str>>(docroot: &Path, files: &[S]) -> Result<Self, TemplateError> {
        let root = files
            .first()
            .map(|f| f.as_ref().to_string())
            .ok_or_else(|| TemplateError::MissingTemplate {
                name: "<empty template group>".to_string(),
            })?;

        let template_dir = docroot.join("templates");
        let entries: Vec<(PathBuf, Option<String>)> = files
            .iter()
            .map(|f| (template_dir.join(f.as_ref()), Some(f.as_ref().to_string())))
            .collect();

        for (path, _) in &entries {
            debug!("Resolved template path {}", path.display());
        }

        let mut tera = Tera::default();
        if let Err(source) = tera.add_template_files(entries.clone()) {
            return Err(TemplateError::Load {
                files: entries.into_iter().map(|(path, _)| path).collect(),
                source,
            });
        }

        info!("Loaded template group {} ({} files)", root, files.len());
        Ok(Self { tera, root })
    }

    pub fn name(&self) -> &str {
        &self.root
    }

    fn context<C: Serialize>(&self, context: &C) -> Result<Context, TemplateError> {
        Context::from_serialize(context).map_err(|source| {
            metrics::record_render_error(&self.root);
            TemplateError::Context {
                template: self.root.clone(),
                source,
            }
        })
    }

    /// Executes the root template, buffering the whole output.
    ///
    /// Nothing is returned unless execution succeeds.
    pub fn render<C: Serialize>(&self, context: &C) -> Result<Vec<u8>, TemplateError> {
        self.render_string(context).map(String::into_bytes)
    }

    /// Buffered render whose output may be embedded unescaped in a [`Page`].
    pub fn render_html<C: Serialize>(&self, context: &C) -> Result<TrustedHtml, TemplateError> {
        self.render_string(context).map(TrustedHtml::from_rendered)
    }

    fn render_string<C: Serialize>(&self, context: &C) -> Result<String, TemplateError> {
        let context = self.context(context)?;
        let started = Instant::now();

        match self.tera.render(&self.root, &context) {
            Ok(output) => {
                metrics::record_render(&self.root, started.elapsed());
                debug!("Rendered {} ({} bytes)", self.root, output.len());
                Ok(output)
            }
            Err(source) => {
                metrics::record_render_error(&self.root);
                debug!("Failed to render {}: {:?}", self.root, source);
                Err(TemplateError::Render {
                    template: self.root.clone(),
                    source,
                })
            }
        }
    }

    /// Executes the root template straight into `writer`.
    ///
    /// Output is not rolled back on failure, so the writer may hold a
    /// truncated document afterwards.
    pub fn render_to<C: Serialize, W: Write>(
        &self,
        context: &C,
        writer: W,
    ) -> Result<(), TemplateError> {
        let context = self.context(context)?;
        let started = Instant::now();
        let mut writer = CapturingWriter::new(writer);

        let result = self.tera.render_to(&self.root, &context, &mut writer);
        let result = match (result, writer.take_error()) {
            (Ok(()), None) => {
                writer.flush().map_err(|source| TemplateError::Write {
                    template: self.root.clone(),
                    source,
                })
            }
            (_, Some(source)) => Err(TemplateError::Write {
                template: self.root.clone(),
                source,
            }),
            (Err(source), None) => Err(TemplateError::Render {
                template: self.root.clone(),
                source,
            }),
        };

        match &result {
            Ok(()) => {
                metrics::record_render(&self.root, started.elapsed());
                debug!("Streamed {}", self.root);
            }
            Err(e) => {
                metrics::record_render_error(&self.root);
                debug!("Failed to stream {}: {:?}", self.root, e);
            }
        }
        result
    }
}

/// Keeps the first I/O error seen, since tera only reports that writing failed.
struct CapturingWriter<W> {
    inner: W,
    error: Option<io::Error>,
}

impl<W: Write> CapturingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, error: None }
    }

    fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn keep<T>(&mut self, result: io::Result<T>) -> io::Result<T> {
        if let Err(e) = &result {
            if self.error.is_none() {
                self.error = Some(io::Error::new(e.kind(), e.to_string()));
            }
        }
        result
    }
}

impl<W: Write> Write for CapturingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let result = self.inner.write(buf);
        self.keep(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let result = self.inner.flush();
        self.keep(result)
    }
}

/// Every template the front end serves, compiled once at startup.
///
/// Rendering never mutates a set, so the registry can be shared read-only
/// between requests (e.g. behind an `Arc`).
#[derive(Debug)]
pub struct TemplateRegistry {
    pub layout: TemplateSet,
    pub search_page: TemplateSet,
    pub about_page: TemplateSet,
    pub opensearch_xml: TemplateSet,
}

impl TemplateRegistry {
    pub fn load(docroot: &Path) -> Result<Self, TemplateError> {
        info!("Loading templates from {}", docroot.join("templates").display());

        Ok(Self {
            layout: TemplateSet::load(docroot, LAYOUT_FILES)?,
            search_page: TemplateSet::load(docroot, SEARCH_FILES)?,
            about_page: TemplateSet::load(docroot, ABOUT_FILES)?,
            opensearch_xml: TemplateSet::load(docroot, OPENSEARCH_FILES)?,
        })
    }

    /// Renders `page` through the layout, straight into `writer`.
    ///
    /// `production` replaces whatever flag the page carried before.
    pub fn render_page<W: Write>(
        &self,
        writer: W,
        page: &mut Page,
        production: bool,
    ) -> Result<(), TemplateError> {
        page.production = production;
        self.layout.render_to(page, writer)
    }
}
