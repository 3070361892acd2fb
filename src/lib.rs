pub mod config;
pub mod frontend;
pub mod metrics;

pub use config::Settings;
pub use frontend::{Page, TemplateError, TemplateRegistry};
