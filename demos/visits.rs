//! Demo application simulating concurrent page navigation.
//!
//! Run with:
//! ```bash
//! cargo run --example visits --features demo -- --help
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use visitatori::catalog::InMemoryCatalog;
use visitatori::observers::json::JsonObserver;
use visitatori::observers::prometheus::PrometheusObserver;
use visitatori::observers::table::{TableObserver, TableStyle};
use visitatori::service::Services;
use visitatori::snapshot::VisitsSnapshot;
use visitatori::store::{StoreConfig, Strategy};
use visitatori::visit::Visit;

const DEFAULT_PAGES: [&str; 4] = ["/", "/about", "/blog", "/contact"];

/// Output format for the report.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Pretty table
    Table,
    /// JSON format
    Json,
    /// Prometheus exposition format
    Prometheus,
}

/// Store strategy selection.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum StrategyChoice {
    #[default]
    Locked,
    Serialized,
}

impl From<StrategyChoice> for Strategy {
    fn from(choice: StrategyChoice) -> Self {
        match choice {
            StrategyChoice::Locked => Strategy::Locked,
            StrategyChoice::Serialized => Strategy::Serialized,
        }
    }
}

/// Demo application for visitatori - unique visitors per page.
///
/// Loads a page catalog, simulates visitors navigating concurrently and
/// prints the unique-visitor count of every page.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File with one valid page per line (defaults to a small built-in catalog)
    #[arg(short, long)]
    pages: Option<PathBuf>,

    /// Store synchronization strategy
    #[arg(long, value_enum, default_value = "locked")]
    strategy: StrategyChoice,

    /// Request queue bound for the serialized strategy
    #[arg(long, default_value = "1024")]
    queue_capacity: usize,

    /// Number of concurrent navigating threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Number of distinct visitors
    #[arg(long, default_value = "100")]
    visitors: usize,

    /// Navigations performed by each thread
    #[arg(long, default_value = "10000")]
    iterations: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Pretty print JSON output
    #[arg(long)]
    pretty: bool,

    /// Prometheus metric namespace (prefix)
    #[arg(long, default_value = "demo")]
    namespace: String,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("visits=info,visitatori=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_catalog(args: &Args) -> std::io::Result<InMemoryCatalog> {
    match &args.pages {
        Some(path) => InMemoryCatalog::from_path(path),
        None => Ok(InMemoryCatalog::new(DEFAULT_PAGES)),
    }
}

/// Simulates concurrent navigation. One in eight navigations targets a page
/// that is not in the catalog; those are counted as rejected.
fn simulate_traffic(services: &Services, pages: &[String], args: &Args) -> u64 {
    let rejected = Arc::new(AtomicU64::new(0));
    let pages = Arc::new(pages.to_vec());
    let mut handles = vec![];

    for t in 0..args.threads {
        let navigation = services.navigation.clone();
        let pages = Arc::clone(&pages);
        let rejected = Arc::clone(&rejected);
        let visitors = args.visitors.max(1);
        let iterations = args.iterations;

        handles.push(thread::spawn(move || {
            for i in 0..iterations {
                let n = t * iterations + i;
                let page = if n % 8 == 7 || pages.is_empty() {
                    "/not-in-catalog".to_string()
                } else {
                    pages[n % pages.len()].clone()
                };
                let visit = Visit::new(format!("visitor-{}", (n * 7919) % visitors), page);

                match navigation.record_navigation(&visit) {
                    Ok(()) => {}
                    Err(e) if e.is_page_not_found() => {
                        rejected.fetch_add(1, Ordering::Relaxed);
                    }
                    Err(e) => warn!(error = %e, "navigation failed"),
                }
            }
        }));
    }

    for handle in handles {
        if handle.join().is_err() {
            warn!("navigation thread panicked");
        }
    }

    rejected.load(Ordering::Relaxed)
}

fn render_output(args: &Args, snapshot: &VisitsSnapshot) -> String {
    match args.format {
        OutputFormat::Table => TableObserver::new()
            .with_style(TableStyle::Rounded)
            .with_total(true)
            .render(snapshot),

        OutputFormat::Json => JsonObserver::new()
            .pretty(args.pretty)
            .wrap_in_snapshot(true)
            .include_timestamp(true)
            .to_json(snapshot)
            .unwrap_or_else(|e| format!("Error: {}", e)),

        OutputFormat::Prometheus => PrometheusObserver::new()
            .with_namespace(&args.namespace)
            .render(snapshot)
            .unwrap_or_else(|e| format!("Error: {}", e)),
    }
}

fn main() -> ExitCode {
    init_logging();
    let args = Args::parse();

    let catalog = match load_catalog(&args) {
        Ok(catalog) => Arc::new(catalog),
        Err(e) => {
            eprintln!("Error: cannot read page catalog: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let store = StoreConfig::new()
        .with_strategy(args.strategy.into())
        .with_queue_capacity(args.queue_capacity)
        .build();
    let store = match store {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let services = Services::new(store, catalog.clone());
    let pages: Vec<String> = catalog.pages().map(str::to_string).collect();

    info!(
        pages = pages.len(),
        threads = args.threads,
        iterations = args.iterations,
        strategy = ?args.strategy,
        "simulating navigation"
    );
    let rejected = simulate_traffic(&services, &pages, &args);
    info!(rejected, "simulation complete");

    match VisitsSnapshot::collect(&services.visitor_count, catalog.pages()) {
        Ok(snapshot) => {
            println!("{}", render_output(&args, &snapshot));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
