use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenv::dotenv;
use std::io::{self, Write};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use search_frontend::config::{self, Settings, DEFAULT_CONFIG_NAME};
use search_frontend::frontend::{pages, OpensearchContext, SearchContext, TemplateRegistry};

#[derive(Parser)]
struct Args {
    /// Configuration file name, without extension
    #[arg(long, default_value = DEFAULT_CONFIG_NAME)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load every template and exit
    Check,
    /// Render a page to stdout
    Render {
        #[arg(value_enum)]
        page: PageKind,
        /// Backend id for the OpenSearch descriptor (defaults to the first backend)
        #[arg(long)]
        backend: Option<String>,
        /// Base URL for the OpenSearch descriptor (defaults to application.public_url)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PageKind {
    Search,
    About,
    Opensearch,
}

fn main() -> Result<()> {
    dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so rendered pages can be piped
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let settings = Settings::new(&args.config).unwrap_or_else(|e| {
        error!("Failed to load configuration: {:?}", e);
        std::process::exit(1);
    });

    info!("Loaded settings: {:?}", settings);

    if let Err(e) = config::validate_settings(&settings) {
        error!("Invalid configuration: {:#}", e);
        std::process::exit(1);
    }

    // A broken template is fatal at startup
    let templates = TemplateRegistry::load(&settings.application.docroot).unwrap_or_else(|e| {
        error!("Failed to load templates: {:?}", e);
        std::process::exit(1);
    });

    match args.command {
        Command::Check => {
            info!("All templates loaded from {}", settings.application.docroot.display());
            Ok(())
        }
        Command::Render {
            page,
            backend,
            base_url,
        } => render(&settings, &templates, page, backend.as_deref(), base_url.as_deref()),
    }
}

fn render(
    settings: &Settings,
    templates: &TemplateRegistry,
    page: PageKind,
    backend: Option<&str>,
    base_url: Option<&str>,
) -> Result<()> {
    let production = settings.application.production;
    let stdout = io::stdout();

    match page {
        PageKind::Search => {
            let context = SearchContext::from_settings(settings);
            let page = pages::search_page(templates, &context).unwrap_or_else(|e| {
                warn!("Search body failed to render, using fallback: {}", e);
                pages::fallback_page(pages::SEARCH_TITLE)
            });
            pages::write_page(templates, stdout.lock(), page, production)?;
        }
        PageKind::About => {
            let page = pages::about_page(templates).unwrap_or_else(|e| {
                warn!("About body failed to render, using fallback: {}", e);
                pages::fallback_page(pages::ABOUT_TITLE)
            });
            pages::write_page(templates, stdout.lock(), page, production)?;
        }
        PageKind::Opensearch => {
            let backend = settings
                .backend(backend)
                .ok_or_else(|| anyhow!("No matching backend configured"))?;
            let raw = base_url
                .or(settings.application.public_url.as_deref())
                .ok_or_else(|| anyhow!("--base-url is required when application.public_url is unset"))?;
            let base_url = config::parse_public_url(raw).context("Invalid OpenSearch base URL")?;

            let context = OpensearchContext::new(backend, &base_url);
            let xml = pages::opensearch_descriptor(templates, &context)?;
            let mut out = stdout.lock();
            out.write_all(&xml)?;
            out.flush()?;
        }
    }

    Ok(())
}
