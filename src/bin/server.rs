use std::{
    fs::OpenOptions,
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{
    EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt,
};

use moneytrace::{
    AppState, TransactionStoreConfig, build_router, graceful_shutdown, resolve_frontend_dir,
};

/// The JSON API server for MoneyTrace.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The address to listen on.
    #[arg(long, env = "MONEYTRACE_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// The port to serve the API from.
    #[arg(short, long, env = "MONEYTRACE_PORT", default_value_t = 8000)]
    port: u16,

    /// File path to a SQLite database for storing transactions.
    ///
    /// If not set, transactions are returned to the client but not stored.
    #[arg(long, env = "MONEYTRACE_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Directory containing a built frontend to serve for paths outside of the API.
    #[arg(long, env = "FRONTEND_DIST_DIR")]
    frontend_dir: Option<PathBuf>,

    /// File to write debug logs to.
    #[arg(long, env = "MONEYTRACE_LOG_PATH", default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(error) = setup_logging(&args.log_path) {
        eprintln!("Could not open log file {}: {error}", args.log_path.display());
        return ExitCode::FAILURE;
    }

    let state = match &args.db_path {
        Some(db_path) => match open_database(db_path) {
            Ok(state) => state,
            Err(error) => {
                tracing::error!("Could not set up database {}: {error}", db_path.display());
                return ExitCode::FAILURE;
            }
        },
        None => {
            tracing::info!("No database path set, transactions will not be stored");
            AppState::new(TransactionStoreConfig::Ephemeral)
        }
    };

    let frontend_dir = resolve_frontend_dir(args.frontend_dir.as_deref());
    let router = add_tracing_layer(build_router(state, frontend_dir.as_deref()));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from((args.host, args.port));
    tracing::info!("HTTP server listening on {}", addr);

    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn open_database(db_path: &Path) -> Result<AppState, Box<dyn std::error::Error>> {
    let connection = Connection::open(db_path)?;
    let state = AppState::with_sqlite(connection)?;

    tracing::info!("Storing transactions in {}", db_path.display());

    Ok(state)
}

fn setup_logging(log_path: &Path) -> Result<(), std::io::Error> {
    let stdout_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
