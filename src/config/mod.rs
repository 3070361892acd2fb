mod settings;
pub mod validation;

pub use settings::{ApplicationSettings, Backend, GithubRepo, Settings, DEFAULT_CONFIG_NAME};
pub use validation::{parse_public_url, validate_backends, validate_docroot, validate_public_url, validate_settings};
