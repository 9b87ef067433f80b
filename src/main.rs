use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use scholar_pmid::config::{find_config_file, load_config, save_config, Config};
use scholar_pmid::lookup::{EutilsClient, PmidLookup};
use scholar_pmid::models::ResolutionOutcome;
use scholar_pmid::orchestrator::{Annotator, LogSignal};
use scholar_pmid::render::Renderer;
use scholar_pmid::utils::HttpClient;
use scholar_pmid::{ui, Extractor, ScholarPage};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Scholar PMID - Link Google Scholar results to their PubMed records
#[derive(Parser, Debug)]
#[command(name = "scholar-pmid")]
#[command(version = scholar_pmid::VERSION)]
#[command(about = "Resolve Google Scholar results to PubMed IDs and link them to PubMed", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for annotation results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Annotated HTML when writing to a file or pipe, a report table on a terminal
    Auto,
    /// Annotated HTML document
    Html,
    /// Per-block report as JSON
    Json,
    /// Per-block report as a table
    Table,
    /// Per-block report, one tab-separated line per block
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Annotate a results page with PMIDs and PubMed links
    #[command(alias = "a")]
    Annotate {
        /// Page to annotate: a file path, an http(s) URL, or "-" for stdin
        input: String,

        /// Write output to this file instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t = OutputFormat::Auto)]
        format: OutputFormat,
    },

    /// Show the lookup key chosen for a title and optional link
    #[command(alias = "x")]
    Extract {
        /// Result title as shown on the page
        title: String,

        /// Link attached to the title
        #[arg(long, short)]
        url: Option<String>,
    },

    /// Resolve a single title and optional link to a PMID
    #[command(alias = "r")]
    Resolve {
        /// Result title as shown on the page
        title: String,

        /// Link attached to the title
        #[arg(long, short)]
        url: Option<String>,

        /// Print the outcome as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: the user configuration directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn print_env_vars() {
    println!("Scholar PMID - Environment Variables");
    println!();
    println!("API Keys:");
    println!("  NCBI_API_KEY                              NCBI E-utilities API key (used when no key is configured)");
    println!("  SCHOLAR_PMID_EUTILS__API_KEY              NCBI E-utilities API key (overrides the config file)");
    println!();
    println!("Endpoints:");
    println!("  SCHOLAR_PMID_EUTILS__ESEARCH_URL          eSearch endpoint");
    println!("  SCHOLAR_PMID_EUTILS__PUBMED_URL           Base URL for PubMed record links");
    println!();
    println!("HTTP Settings:");
    println!("  SCHOLAR_PMID_HTTP__USER_AGENT             User agent for requests");
    println!("  SCHOLAR_PMID_HTTP__CONNECT_TIMEOUT_SECS   Connection timeout (default: 10)");
    println!("  SCHOLAR_PMID_HTTP__REQUEST_TIMEOUT_SECS   Whole-request timeout (default: none)");
    println!();
    println!("Page Selectors:");
    println!("  SCHOLAR_PMID_SELECTORS__BLOCK             Result block (default: div.gs_r.gs_or.gs_scl)");
    println!("  SCHOLAR_PMID_SELECTORS__TITLE             Title element (default: h3.gs_rt)");
    println!("  SCHOLAR_PMID_SELECTORS__LINK              Title link (default: h3.gs_rt a)");
    println!("  SCHOLAR_PMID_SELECTORS__SLOT              Output slot (default: .gs_ri)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                                  Rust logging level (e.g., debug, info, warn, error)");
    std::process::exit(0);
}

fn init_tracing(cli: &Cli) {
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scholar_pmid={}", env_filter)),
    );

    if cli.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Load configuration from the given file, a discovered file, or defaults
fn load_settings(path: Option<&Path>) -> Result<Config> {
    let path = path.map(Path::to_path_buf).or_else(find_config_file);

    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }

    load_config(path.as_deref()).context("Failed to load configuration")
}

/// Read the page from stdin, a URL, or a file
async fn read_input(input: &str, client: &HttpClient) -> Result<String> {
    if input == "-" {
        let mut html = String::new();
        std::io::stdin()
            .read_to_string(&mut html)
            .context("Failed to read page from stdin")?;
        return Ok(html);
    }

    if let Ok(url) = url::Url::parse(input) {
        if matches!(url.scheme(), "http" | "https") {
            tracing::info!("Fetching page {}", url);
            return client
                .get_text(url.as_str())
                .await
                .with_context(|| format!("Failed to fetch {}", url));
        }
    }

    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))
}

fn write_output(body: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, body)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{}", body);
            Ok(())
        }
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("scholar-pmid").join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("scholar-pmid.toml"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    init_tracing(&cli);

    match &cli.command {
        Some(Commands::Annotate { input, out, format }) => {
            let config = load_settings(cli.config.as_deref())?;
            let http = Arc::new(
                HttpClient::with_config(&config.http).context("Failed to create HTTP client")?,
            );

            let html = read_input(input, &http).await?;
            let mut page = ScholarPage::parse(&html, &config.selectors)?;

            let extractor = Extractor::from_config(&config);
            let lookup = EutilsClient::new(&config.eutils, Arc::clone(&http));
            let renderer = Renderer::from_config(&config);
            let annotator = Annotator::new(&extractor, &lookup, &renderer, &LogSignal);

            let report = annotator.annotate(&mut page).await;

            let format = match format {
                OutputFormat::Auto if out.is_none() && ui::is_terminal() => OutputFormat::Table,
                OutputFormat::Auto => OutputFormat::Html,
                other => *other,
            };

            let body = match format {
                OutputFormat::Json => ui::format_report_json(&report)?,
                OutputFormat::Table => ui::format_report_table(&report),
                OutputFormat::Plain => ui::format_report_plain(&report),
                OutputFormat::Html | OutputFormat::Auto => page.html(),
            };
            write_output(&body, out.as_deref())?;

            if !cli.quiet {
                eprintln!("{}", ui::summary_line(&report, ui::stderr_is_terminal()));
            }
        }

        Some(Commands::Extract { title, url }) => {
            let config = load_settings(cli.config.as_deref())?;
            let key = Extractor::from_config(&config).extract(url.as_deref(), title);
            println!("{}", key);
        }

        Some(Commands::Resolve { title, url, json }) => {
            let config = load_settings(cli.config.as_deref())?;
            let key = Extractor::from_config(&config).extract(url.as_deref(), title);
            tracing::debug!(key = %key, "Resolving");

            let lookup =
                EutilsClient::from_config(&config).context("Failed to create lookup client")?;
            let candidates = lookup
                .resolve(&key)
                .await
                .with_context(|| format!("Lookup failed for {}", key))?;

            let outcome = ResolutionOutcome::from_candidates(candidates);
            if *json {
                let value = serde_json::json!({ "key": key, "outcome": outcome });
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                let fragment = Renderer::from_config(&config).render(&outcome, key.provenance());
                println!("{}", key);
                println!("{}", fragment.to_text());
            }
        }

        Some(Commands::InitConfig { path, force }) => {
            let path = path.clone().unwrap_or_else(default_config_path);
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }

            let mut config = Config::default();
            config.eutils.api_key = None;
            save_config(&config, &path)
                .with_context(|| format!("Failed to write {}", path.display()))?;

            if !cli.quiet {
                eprintln!("Wrote default configuration to {}", path.display());
            }
        }

        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "scholar-pmid",
                &mut std::io::stdout(),
            );
        }

        None => {
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
