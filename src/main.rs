use clap::Parser;
use refsearch::config::{Config, FilterMode};
use refsearch::headless::{self, Outcome};
use refsearch::{PostgrestSource, Searcher};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refsearch", about = "Search the NYSE 2023 reference listings")]
struct Cli {
    /// Write debug logs to $TMPDIR/refsearch-debug.log (tail -f to inspect).
    #[arg(long)]
    debug: bool,

    /// Config file to use instead of ~/.config/refsearch/config.toml.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run one search without the TUI and print the matches as CSV.
    #[arg(long, value_name = "QUERY")]
    query: Option<String>,

    /// Write the headless CSV here instead of stdout.
    #[arg(long, value_name = "PATH", requires = "query")]
    output: Option<PathBuf>,

    /// Fetch the whole table and filter locally instead of in the store.
    #[arg(long)]
    client_filter: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if cli.client_filter {
        config.store.filter_mode = FilterMode::Client;
    }

    let source = PostgrestSource::from_config(&config.store)?;
    let searcher = Searcher::new(
        source,
        config.store.filter_mode,
        config.search.columns.clone(),
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let Some(query) = cli.query else {
        return refsearch_tui::run(config, searcher, runtime.handle().clone());
    };

    let outcome = runtime.block_on(headless::run(
        &searcher,
        &query,
        config.display.lead(),
        cli.output.as_deref(),
        std::io::stdout().lock(),
    ))?;
    match outcome {
        Outcome::NoTerms => eprintln!("query has no terms, nothing searched"),
        Outcome::NoResults => eprintln!("no results found"),
        Outcome::Exported(rows) => {
            if let Some(path) = &cli.output {
                eprintln!("exported {rows} rows to {}", path.display());
            }
        }
    }
    Ok(())
}

/// `--debug` logs everything to a file so the TUI screen stays clean.
/// Headless runs without `--debug` log warnings to stderr.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    if cli.debug {
        let path = std::env::temp_dir().join("refsearch-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!(path = %path.display(), "refsearch debug log started");
    } else if cli.query.is_some() {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();
    }
    Ok(())
}
