//! docshelf CLI: browse the document catalog and fetch download links.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use docshelf::config::ShelfConfig;
use docshelf::error::ShelfResult;
use docshelf::library::{paginate, CatalogRecord, Page, Session};

#[derive(Parser)]
#[command(name = "docshelf", version, about = "Searchable document catalog")]
struct Cli {
    /// TOML config file. `DOCSHELF_*` environment variables override it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the catalog.
    List {
        /// Page number (1-based).
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print the page as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Search titles, ignoring case and accents.
    Search {
        /// Query text.
        query: String,

        /// Page number (1-based).
        #[arg(long, default_value = "1")]
        page: usize,

        /// Print the page as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Request download links for one or more records.
    Link {
        /// Record ids.
        #[arg(required = true)]
        ids: Vec<u64>,
    },

    /// Show catalog size and configured endpoints.
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    run(cli.command, config).await
}

/// File config (if any) with environment overrides on top.
fn load_config(path: Option<&Path>) -> ShelfResult<ShelfConfig> {
    let mut config = match path {
        Some(path) => ShelfConfig::load(path)?,
        None => ShelfConfig::default(),
    };
    config.apply_env_overrides()?;
    Ok(config)
}

async fn run(command: Commands, config: ShelfConfig) -> Result<()> {
    let mut session = Session::start(&config).await?;

    match command {
        Commands::List { page, json } => {
            let visible = session.visible();
            print_page(&session.page(&visible, page), json)?;
        }

        Commands::Search { query, page, json } => {
            let visible = session.search(&query);
            let page = paginate(&visible, page, config.page_size);
            if page.total_items == 0 && !json {
                println!("No documents match \"{query}\".");
                return Ok(());
            }
            print_page(&page, json)?;
        }

        Commands::Link { ids } => {
            let requests = ids.iter().map(|&id| {
                let session = &session;
                async move { (id, session.request_download(id).await) }
            });
            for (id, outcome) in futures_util::future::join_all(requests).await {
                match outcome {
                    Ok(link) => println!("{id}\t{link}"),
                    Err(e) => eprintln!("{id}\terror: {e}"),
                }
            }
        }

        Commands::Info => {
            println!("Documents: {}", session.catalog().len());
            println!("Feed:      {}", config.feed_url);
            println!("Backend:   {}", config.backend_url);
            println!("Logo:      {}", session.logo_url());
            println!("API key:   {}", redact(&config.api_key));
            match config.request_timeout() {
                Some(t) => println!("Timeout:   {}s", t.as_secs()),
                None => println!("Timeout:   none"),
            }
        }
    }

    Ok(())
}

fn print_page(page: &Page<'_, &CatalogRecord>, json: bool) -> Result<()> {
    if json {
        let out = serde_json::json!({
            "page": page.number,
            "total_pages": page.total_pages,
            "total_items": page.total_items,
            "records": page.items,
        });
        println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        return Ok(());
    }

    println!("{:>5}  Title", "ID");
    for record in page.items {
        println!("{:>5}  {}", record.id.get(), record.title);
    }
    println!(
        "\nPage {}/{} ({} documents)",
        page.number, page.total_pages, page.total_items
    );
    Ok(())
}

fn redact(secret: &str) -> String {
    let shown: String = secret.chars().take(3).collect();
    if secret.chars().count() <= 3 {
        "***".into()
    } else {
        format!("{shown}***")
    }
}
