//! Hyperbard CLI: preprocess TEI plays, then derive graphs and rankings.
//!
//! Usage:
//!   hyperbard preprocess <files or directories...> [--force] [--jobs N] [--flush act|act-and-scene]
//!   hyperbard represent <play.agg.csv...> [--out dir]
//!   hyperbard rank <play.agg.csv>

use clap::{ArgAction, Parser, Subcommand};
use hyperbard::ranking::character_ranking;
use hyperbard::storage::write_csv_to;
use hyperbard::{
    read_aggregates, write_representations, Config, CorpusEngine, CsvStore, FlushPolicy, OpenStore,
    SqliteStore, StoreBackend, TableStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(
    name = "hyperbard",
    version,
    about = "Stage-presence tables and graph representations from TEI drama"
)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build cast, raw and aggregate tables from TEI files
    Preprocess {
        /// TEI files, or directories searched recursively for .xml files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Overwrite existing tables
        #[arg(short, long)]
        force: bool,
        /// Number of documents processed at once
        #[arg(short, long)]
        jobs: Option<usize>,
        /// Where the onstage tracker forgets who is on stage
        #[arg(long)]
        flush: Option<FlushPolicy>,
        /// Output directory for CSV tables
        #[arg(long)]
        out: Option<PathBuf>,
        /// Table backend: csv or sqlite
        #[arg(long)]
        store: Option<StoreBackend>,
        /// SQLite database file (implies --store sqlite)
        #[arg(long)]
        sqlite: Option<PathBuf>,
    },
    /// Write every graph representation of aggregate tables
    Represent {
        /// Aggregate tables (<play>.agg.csv)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the character ranking of one play as CSV
    Rank {
        /// Aggregate table (<play>.agg.csv)
        input: PathBuf,
    },
}

/// `RUST_LOG` if set, else `info`; each `-v` raises the level on top.
fn log_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));
    match verbose {
        0 => filter,
        1 => filter.add_directive(tracing::Level::DEBUG.into()),
        _ => filter.add_directive(tracing::Level::TRACE.into()),
    }
}

fn init_logging(verbose: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(log_filter(verbose, rust_log.as_deref()))
        .init();
}

/// XML files among `inputs`; directories are searched recursively
fn collect_xml_files(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            files.extend(
                WalkDir::new(input)
                    .into_iter()
                    .filter_map(|e| e.ok())
                    .filter(|e| e.file_type().is_file())
                    .map(|e| e.into_path())
                    .filter(|p| p.extension().is_some_and(|ext| ext == "xml")),
            );
        } else {
            files.push(input.clone());
        }
    }
    files.sort();
    files.dedup();
    files
}

fn open_store(config: &Config) -> Result<Arc<dyn TableStore>, String> {
    match config.store {
        StoreBackend::Csv => {
            let store = CsvStore::new(&config.output_dir).map_err(|e| {
                format!("Failed to create {}: {}", config.output_dir.display(), e)
            })?;
            Ok(Arc::new(store))
        }
        StoreBackend::Sqlite => {
            let path = config.sqlite_path();
            let store = SqliteStore::open(&path)
                .map_err(|e| format!("Failed to open database {}: {}", path.display(), e))?;
            Ok(Arc::new(store))
        }
    }
}

fn cmd_preprocess(config: &Config, inputs: &[PathBuf]) -> i32 {
    let files = collect_xml_files(inputs);
    if files.is_empty() {
        eprintln!("Error: no XML files found");
        return 1;
    }
    println!("Found {} files to process.", files.len());

    let store = match open_store(config) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let engine = CorpusEngine::new(store)
        .with_jobs(config.jobs)
        .with_force(config.force)
        .with_flush(config.flush);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start runtime: {}", e);
            return 1;
        }
    };
    let report = runtime.block_on(engine.process(files));

    println!(
        "{} processed, {} skipped, {} failed",
        report.processed_count(),
        report.skipped_count(),
        report.failures().len()
    );
    for (play, message) in report.failures() {
        eprintln!("Error: {}: {}", play, message);
    }
    if report.has_failures() {
        1
    } else {
        0
    }
}

/// `romeo-and-juliet.agg.csv` → `romeo-and-juliet`
fn play_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().split('.').next().unwrap_or_default().to_string())
        .unwrap_or_default()
}

fn cmd_represent(config: &Config, inputs: &[PathBuf], out: Option<&Path>) -> i32 {
    let dir = out.unwrap_or(config.graph_dir.as_path());
    let mut code = 0;
    for input in inputs {
        let play = play_name(input);
        let result = read_aggregates(input)
            .and_then(|rows| write_representations(&play, &rows, dir));
        match result {
            Ok(written) => println!("{}: wrote {} files", play, written.len()),
            Err(e) => {
                eprintln!("Error: {}: {}", input.display(), e);
                code = 1;
            }
        }
    }
    code
}

fn cmd_rank(input: &Path) -> i32 {
    let rows = match read_aggregates(input) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("Error: {}: {}", input.display(), e);
            return 1;
        }
    };
    match write_csv_to(std::io::stdout().lock(), &character_ranking(&rows)) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Preprocess {
            inputs,
            force,
            jobs,
            flush,
            out,
            store,
            sqlite,
        } => {
            config.force |= force;
            if let Some(jobs) = jobs {
                config.jobs = jobs;
            }
            if let Some(flush) = flush {
                config.flush = flush;
            }
            if let Some(out) = out {
                config.output_dir = out;
            }
            if let Some(store) = store {
                config.store = store;
            }
            if let Some(sqlite) = sqlite {
                config.store = StoreBackend::Sqlite;
                config.sqlite_path = Some(sqlite);
            }
            cmd_preprocess(&config, &inputs)
        }
        Commands::Represent { inputs, out } => cmd_represent(&config, &inputs, out.as_deref()),
        Commands::Rank { input } => cmd_rank(&input),
    };
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::filter::LevelFilter;

    #[test]
    fn rust_log_wins_without_verbose() {
        let filter = log_filter(0, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(0, None).max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn verbose_raises_the_level() {
        assert_eq!(log_filter(1, None).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(log_filter(2, Some("warn")).max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn play_name_drops_table_suffixes() {
        assert_eq!(play_name(Path::new("out/romeo-and-juliet.agg.csv")), "romeo-and-juliet");
    }
}
