use anyhow::{anyhow, Result};
use std::collections::HashSet;
use url::Url;

use super::Settings;

pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_docroot(settings)?;
    validate_backends(settings)?;
    validate_public_url(settings)?;
    Ok(())
}

pub fn validate_docroot(settings: &Settings) -> Result<()> {
    let docroot = &settings.application.docroot;
    if !docroot.is_dir() {
        return Err(anyhow!("Document root {} is not a directory", docroot.display()));
    }

    let templates = docroot.join("templates");
    if !templates.is_dir() {
        return Err(anyhow!(
            "Document root {} has no templates directory",
            docroot.display()
        ));
    }

    Ok(())
}

pub fn validate_backends(settings: &Settings) -> Result<()> {
    let mut seen = HashSet::new();
    for backend in &settings.backends {
        if backend.id.trim().is_empty() {
            return Err(anyhow!("Backend with address {} has an empty id", backend.addr));
        }
        if backend.addr.trim().is_empty() {
            return Err(anyhow!("Backend {} has an empty address", backend.id));
        }
        if !seen.insert(backend.id.as_str()) {
            return Err(anyhow!("Backend id {} is configured more than once", backend.id));
        }
    }

    Ok(())
}

pub fn validate_public_url(settings: &Settings) -> Result<()> {
    match settings.application.public_url.as_deref() {
        Some(raw) => parse_public_url(raw).map(|_| ()),
        None => Ok(()),
    }
}

/// Parses a URL to advertise to browsers; only http and https are accepted.
pub fn parse_public_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid public URL {}: {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(anyhow!("Public URL must be http or https, got {}", scheme)),
    }
}
