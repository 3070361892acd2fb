pub mod context;
pub mod pages;
pub mod templates;
mod types;

#[cfg(test)]
mod test_helpers;

pub use context::{OpensearchContext, Page, SearchContext, TrustedHtml};
pub use templates::{TemplateRegistry, TemplateSet};
pub use types::TemplateError;
