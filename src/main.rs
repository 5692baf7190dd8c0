//! trine CLI: load triple files, then answer wildcard queries.

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use trine::config::TrineConfig;
use trine::engine::Engine;
use trine::import::Importer;
use trine::query::QueryEngine;

#[derive(Parser)]
#[command(name = "trine", version, about = "In-memory triple store with wildcard queries")]
struct Cli {
    /// Triple file to import before running the command (repeatable).
    #[arg(long = "triples", global = true)]
    triples: Vec<PathBuf>,

    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single query, e.g. `"? lives_in House1."`.
    Query {
        /// Pattern of three tokens terminated by a period; `?` matches anything.
        pattern: String,
    },

    /// Run every line of a query file; malformed lines are reported and skipped.
    Run {
        /// Path to the query file.
        #[arg(long)]
        queries: PathBuf,
    },

    /// Show engine statistics.
    Info,

    /// Export all triples as JSON.
    Export,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TrineConfig::load_or_default(cli.config.as_deref())?;

    let engine = Engine::new(config.to_engine_config());
    Importer::new(&engine)
        .with_parallel(config.import.parallel)
        .import_files(&cli.triples)?;

    let queries = QueryEngine::new(&engine);
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Query { pattern } => {
            let answer = queries.execute_query(&pattern)?;
            write!(stdout, "{}", answer.render(&config.output)).into_diagnostic()?;
        }

        Commands::Run { queries: path } => {
            for entry in queries.execute_query_file(&path)? {
                match entry.outcome {
                    Ok(answer) => {
                        write!(stdout, "{}", answer.render(&config.output)).into_diagnostic()?;
                    }
                    Err(e) => eprintln!("Query {}: {}", e.query(), e.cause()),
                }
            }
        }

        Commands::Info => {
            write!(stdout, "{}", engine.info()).into_diagnostic()?;
        }

        Commands::Export => {
            let json = serde_json::to_string_pretty(&engine.export_triples()).into_diagnostic()?;
            writeln!(stdout, "{json}").into_diagnostic()?;
        }
    }

    Ok(())
}
