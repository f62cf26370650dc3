//! CLI entry point for the neighborhood visits dashboard.
//!
//! Provides subcommands for serving the aggregation API over HTTP and for
//! exporting the year-over-year table as CSV.

use anyhow::{Context, Result};
use bairro_dashboard::analyzers::table::build_table;
use bairro_dashboard::analyzers::utility::parse_bairros;
use bairro_dashboard::api::{AppState, build_router};
use bairro_dashboard::dataset::Dataset;
use bairro_dashboard::output::{print_pretty, save_table};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_CSV: &str = "atendimentos_pacientes_bairro_ano.csv";

#[derive(Parser)]
#[command(name = "bairro_dashboard")]
#[command(about = "Aggregated healthcare visits by year and neighborhood", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the CSV and serve the dashboard API
    Serve {
        /// CSV file with visits per year and neighborhood
        #[arg(long, env = "DASHBOARD_CSV_PATH", default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Address to bind
        #[arg(long, env = "DASHBOARD_HOST", default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 8000)]
        port: u16,

        /// Optional: directory with the dashboard front-end to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Compute the year-over-year table and write it as CSV
    Table {
        /// CSV file with visits per year and neighborhood
        #[arg(long, env = "DASHBOARD_CSV_PATH", default_value = DEFAULT_CSV)]
        csv: PathBuf,

        /// Only include this year
        #[arg(short, long)]
        year: Option<i32>,

        /// Comma-separated neighborhood names to include
        #[arg(short, long)]
        bairros: Option<String>,

        /// CSV file to write, or "-" to log the rows instead
        #[arg(short, long, default_value = "tabela.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bairro_dashboard.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bairro_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            csv,
            host,
            port,
            static_dir,
        } => {
            serve(&csv, &host, port, static_dir.as_deref()).await?;
        }
        Commands::Table {
            csv,
            year,
            bairros,
            output,
        } => {
            let dataset = Dataset::load(&csv)?;
            let bairros = parse_bairros(bairros.as_deref());
            let rows = build_table(&dataset, year, bairros.as_ref());

            if output == "-" {
                print_pretty(&rows);
            } else {
                save_table(&output, &rows)?;
                info!(output = %output, rows = rows.len(), "Table written");
            }
        }
    }

    Ok(())
}

/// Loads the dataset once, then serves the API until the process stops.
///
/// A missing file or missing columns abort startup.
#[tracing::instrument(skip(csv, static_dir), fields(csv = %csv.display()))]
async fn serve(csv: &Path, host: &str, port: u16, static_dir: Option<&Path>) -> Result<()> {
    let dataset = Dataset::load(csv)?;
    let app = build_router(AppState::new(dataset), static_dir);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(addr = %addr, "Dashboard API listening");
    axum::serve(listener, app).await?;

    Ok(())
}
