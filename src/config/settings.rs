use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub backends: Vec<Backend>,
    #[serde(default)]
    pub github_repos: Vec<GithubRepo>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub docroot: PathBuf,
    #[serde(default)]
    pub production: bool,
    // Base URL advertised in the OpenSearch descriptor
    #[serde(default)]
    pub public_url: Option<String>,
}

/// A search backend the front end can route queries to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Backend {
    pub id: String,
    pub addr: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl Backend {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A repository shown in the search page's repository listing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GithubRepo {
    pub name: String,
    pub url: String,
}

pub const DEFAULT_CONFIG_NAME: &str = "config";

impl Settings {
    pub fn new(config_name: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("application.docroot", "web")?
            .set_default("application.production", false)?
            .add_source(config::File::with_name(config_name).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn backend(&self, id: Option<&str>) -> Option<&Backend> {
        match id {
            Some(id) => self.backends.iter().find(|b| b.id == id),
            None => self.backends.first(),
        }
    }
}
