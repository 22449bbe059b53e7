use std::{fs::OpenOptions, net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sales_dashboard::{
    AppState, DEFAULT_SEED_URL, HttpSeedSource, PaginationConfig, build_router,
    graceful_shutdown, logging_middleware,
};

/// The REST API server for the sales dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 9000)]
    port: u16,

    /// The URL of the JSON array of transactions used by the seed endpoint.
    #[arg(long, env = "SEED_DATA_URL", default_value = DEFAULT_SEED_URL)]
    seed_url: String,

    /// The time limit in seconds for fetching the seed data.
    #[arg(long, default_value_t = 30)]
    seed_timeout_secs: u64,

    /// The time limit in seconds for computing the combined dashboard data.
    #[arg(long, default_value_t = 10)]
    fan_out_timeout_secs: u64,

    /// The number of transactions per page when a request does not say.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    default_page_size: u64,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let seed_source = HttpSeedSource::new(
        &args.seed_url,
        Duration::from_secs(args.seed_timeout_secs),
    )
    .expect("Could not create the seed data client");

    let conn = Connection::open(&args.db_path).expect("Could not open the database");
    let state = AppState::new(
        conn,
        Arc::new(seed_source),
        PaginationConfig {
            default_page_size: args.default_page_size,
            ..PaginationConfig::default()
        },
        Duration::from_secs(args.fan_out_timeout_secs),
    )
    .expect("Could not initialize the database");

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = build_router(state).layer(middleware::from_fn(logging_middleware));
    let router = add_tracing_layer(router);

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Server stopped unexpectedly");
}

fn setup_logging() {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
        )
        .init();
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
        // Errors are logged where they are turned into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
