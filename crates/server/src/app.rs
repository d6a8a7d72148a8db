use std::{
    net::{IpAddr, SocketAddr},
    path::Path,
    str::FromStr,
    sync::Arc,
};

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE},
        HeaderValue, Method,
    },
    Router,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tower_sessions::{cookie::time::Duration, Expiry, ExpiredDeletion, SessionManagerLayer};
use tracing::{debug, info, warn, Level};

use crate::{cli::Cli, db, routes, session_store::DeadpoolSqliteStore, AppState};

/// Migrate the database and build the pool and session store on top of it
pub async fn build_state(args: Cli) -> Result<(AppState, DeadpoolSqliteStore), anyhow::Error> {
    if args.debug_delete_database {
        let path = Path::new(&args.sqlite_connection_string);
        if path.exists() {
            warn!("Deleting database {path:?}");
            std::fs::remove_file(path)?;
        }
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)?;
    info!("Ran {ran} db migrations");

    let pool = db::create_pool(&args.sqlite_connection_string)?;

    let session_store = DeadpoolSqliteStore::new(pool.clone());
    session_store.migrate().await?;

    Ok((AppState { pool, args: Arc::new(args) }, session_store))
}

pub fn build_router(
    state: AppState,
    session_store: DeadpoolSqliteStore,
) -> Result<Router, anyhow::Error> {
    let args = state.args.clone();

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(args.secure_sessions)
        .with_expiry(Expiry::OnInactivity(Duration::days(args.session_expiry_days)));

    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_str(&args.cors_origin)?)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([ACCEPT, CONTENT_TYPE]);

    Ok(routes::router()
        .layer(session_layer)
        .layer(RequestBodyLimitLayer::new(args.body_limit_bytes))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state))
}

/// Periodically removes expired sessions from the store
pub fn spawn_session_sweeper(
    session_store: DeadpoolSqliteStore,
    every_seconds: u64,
) -> JoinHandle<Result<(), tower_sessions::session_store::Error>> {
    tokio::task::spawn(
        session_store.continuously_delete_expired(tokio::time::Duration::from_secs(every_seconds)),
    )
}

/// Run the server until it fails
pub async fn serve(args: Cli) -> Result<(), anyhow::Error> {
    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);
    let sweep_seconds = args.session_sweep_seconds;

    let (state, session_store) = build_state(args).await?;
    let sweeper = spawn_session_sweeper(session_store.clone(), sweep_seconds);
    let router = build_router(state, session_store)?;

    let listener = TcpListener::bind(socket).await?;
    debug!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router).await?;

    sweeper.abort();
    Ok(())
}
