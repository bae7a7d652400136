//! Showcase - portfolio client CLI
//!
//! The `showcase` command renders the project portfolio from the live API,
//! falling back to the local cache and then to the bundled project set.
//!
//! ## Commands
//!
//! - `projects`: Render the portfolio (interactive retry when degraded)
//! - `show`: Render a single project by slug
//! - `cache`: Inspect the persisted project cache
//! - `fallback`: Print the bundled fallback set

mod render;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn, Level};

use showcase_core::{
    fallback_projects, ConnectivityMonitor, DisabledStore, FetchError, FsStore,
    HttpProjectFetcher, KeyValueStore, PortfolioView, Project, ProjectCache, ProjectSource,
    Screen, ShowcaseConfig, CACHE_KEY, METRICS,
};

use render::{render_card, render_list, render_screen, to_json, OutputFormat};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(author = "Showcase Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Resilient portfolio client", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Project API base URL [env: SHOWCASE_API_BASE_URL]
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Directory holding the persistent cache [env: SHOWCASE_CACHE_DIR]
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// Request timeout in seconds [env: SHOWCASE_REQUEST_TIMEOUT_SECS]
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the project portfolio
    Projects {
        /// Treat the network as unreachable
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Never prompt, even on a terminal
        #[arg(long)]
        no_interactive: bool,
    },

    /// Render a single project
    Show {
        /// Project slug
        slug: String,

        /// Treat the network as unreachable
        #[arg(long)]
        offline: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Inspect the persisted project cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Print the bundled fallback set
    Fallback {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show the cached project list
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the cache file location
    Path,
}

/// Source used with `--offline`: every fetch fails like a dropped connection.
struct OfflineSource {
    endpoint: String,
}

#[async_trait]
impl ProjectSource for OfflineSource {
    async fn fetch(&self) -> std::result::Result<Vec<Project>, FetchError> {
        Err(FetchError::Transport {
            url: self.endpoint.clone(),
            message: "network unreachable (offline mode)".to_string(),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    showcase_core::init_tracing(cli.json, level);

    let config = build_config(&cli).context("Invalid configuration")?;

    let result = match cli.command {
        Commands::Projects {
            offline,
            format,
            no_interactive,
        } => {
            let interactive =
                !no_interactive && format == OutputFormat::Text && std::io::stdin().is_terminal();
            cmd_projects(&config, offline, format, interactive).await
        }
        Commands::Show {
            slug,
            offline,
            format,
        } => cmd_show(&config, &slug, offline, format).await,
        Commands::Cache { action } => match action {
            CacheAction::Show { format } => cmd_cache_show(&config, format),
            CacheAction::Path => cmd_cache_path(&config),
        },
        Commands::Fallback { format } => cmd_fallback(format),
    };

    METRICS.flush();
    result
}

/// Environment first, then flags on top.
fn build_config(cli: &Cli) -> Result<ShowcaseConfig> {
    apply_flags(cli, ShowcaseConfig::from_env()?)
}

fn apply_flags(cli: &Cli, mut config: ShowcaseConfig) -> Result<ShowcaseConfig> {
    if let Some(url) = &cli.api_base_url {
        config = config.with_api_base_url(url)?;
    }
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs))?;
    }
    Ok(config)
}

/// Durable store under the configured cache dir, or a disabled one when the
/// directory cannot be used.
fn open_store(config: &ShowcaseConfig) -> Arc<dyn KeyValueStore> {
    match FsStore::new(&config.cache_dir) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!(
                cache_dir = %config.cache_dir.display(),
                error = %err,
                "cache unavailable, continuing without it"
            );
            Arc::new(DisabledStore::new(err.to_string()))
        }
    }
}

fn mount_view(config: &ShowcaseConfig, offline: bool) -> Result<PortfolioView> {
    let source: Arc<dyn ProjectSource> = if offline {
        Arc::new(OfflineSource {
            endpoint: config.projects_endpoint(),
        })
    } else {
        Arc::new(HttpProjectFetcher::new(config).context("Failed to build HTTP client")?)
    };
    let monitor = ConnectivityMonitor::new(!offline);
    let cache = ProjectCache::new(open_store(config));

    info!(endpoint = %config.projects_endpoint(), offline, "mounting portfolio view");
    Ok(PortfolioView::mount(source, cache, Arc::new(monitor)))
}

/// Render the portfolio
async fn cmd_projects(
    config: &ShowcaseConfig,
    offline: bool,
    format: OutputFormat,
    interactive: bool,
) -> Result<()> {
    let view = mount_view(config, offline)?;

    if format == OutputFormat::Text && view.screen().is_loading() {
        eprintln!("{}", render_screen(&Screen::Loading));
    }
    view.settled().await;

    loop {
        let screen = view.screen();
        match format {
            OutputFormat::Text => println!("{}", render_screen(&screen)),
            OutputFormat::Json => println!("{}", to_json(&screen)?),
        }

        if !interactive || screen.banner().is_none() {
            break;
        }
        match prompt("[r]etry, [d]ismiss, [q]uit: ").await? {
            Prompt::Retry => {
                if view.retry() {
                    view.settled().await;
                }
            }
            Prompt::Dismiss => {
                view.dismiss_banner();
            }
            Prompt::Quit => break,
        }
    }

    view.flush_cache_writes().await;
    Ok(())
}

/// Render a single project by slug
async fn cmd_show(
    config: &ShowcaseConfig,
    slug: &str,
    offline: bool,
    format: OutputFormat,
) -> Result<()> {
    let view = mount_view(config, offline)?;
    view.settled().await;
    view.flush_cache_writes().await;

    let screen = view.screen();
    let Some(resolved) = screen.view() else {
        bail!("Project list is still loading");
    };
    let Some(project) = resolved.find(slug) else {
        bail!("No project with slug '{}' (source: {})", slug, resolved.source);
    };

    match format {
        OutputFormat::Text => {
            if let Some(banner) = screen.banner() {
                println!("! {}\n", banner.message);
            }
            println!("{}", render_card(project));
        }
        OutputFormat::Json => println!("{}", to_json(project)?),
    }
    Ok(())
}

/// Show the persisted cache entry
fn cmd_cache_show(config: &ShowcaseConfig, format: OutputFormat) -> Result<()> {
    let store = FsStore::new(&config.cache_dir).context("Failed to open cache directory")?;
    let cache = ProjectCache::new(Arc::new(store));

    let projects = cache.try_read().context("Failed to read cached project list")?;
    match (projects, format) {
        (Some(projects), OutputFormat::Text) => println!("{}", render_list(&projects)),
        (Some(projects), OutputFormat::Json) => println!("{}", to_json(&projects)?),
        (None, OutputFormat::Text) => println!(
            "No cached project list in {}",
            config.cache_dir.display()
        ),
        (None, OutputFormat::Json) => println!("null"),
    }
    Ok(())
}

/// Print where the cache entry lives
fn cmd_cache_path(config: &ShowcaseConfig) -> Result<()> {
    let store = FsStore::new(&config.cache_dir).context("Failed to open cache directory")?;
    let path = store
        .path_for(CACHE_KEY)
        .context("Failed to resolve cache path")?;
    println!("{}", path.display());
    Ok(())
}

/// Print the bundled fallback set
fn cmd_fallback(format: OutputFormat) -> Result<()> {
    let projects = fallback_projects();
    match format {
        OutputFormat::Text => println!("{}", render_list(projects)),
        OutputFormat::Json => println!("{}", to_json(projects)?),
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Prompt {
    Retry,
    Dismiss,
    Quit,
}

fn parse_prompt(line: &str) -> Option<Prompt> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "retry" => Some(Prompt::Retry),
        "d" | "dismiss" => Some(Prompt::Dismiss),
        "q" | "quit" | "" => Some(Prompt::Quit),
        _ => None,
    }
}

async fn prompt(question: &str) -> Result<Prompt> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        stdout.write_all(question.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            return Ok(Prompt::Quit);
        };
        if let Some(answer) = parse_prompt(&line) {
            return Ok(answer);
        }
    }
}
