use std::{
    fs::remove_file,
    io::ErrorKind,
    net::{IpAddr, SocketAddr},
    path::Path,
    str::FromStr,
};

use clap::Parser;
use server::{cli::Cli, db, routes, AppState};
use shared::utils::tracing::{configure_tracing, load_dotenv};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing()?;

    let args = Cli::parse();
    debug!(?args);

    if args.debug_delete_database {
        warn!("Deleting database {}", args.sqlite_connection_string);
        // The WAL and shared memory files go too, otherwise sqlite replays them
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{}{suffix}", args.sqlite_connection_string);
            if let Err(e) = remove_file(Path::new(&path)) {
                if e.kind() != ErrorKind::NotFound {
                    return Err(e.into());
                }
            }
        }
    }

    // Run the migrations synchronously before creating the pool or launching the server
    let ran = db::run_migrations(&args.sqlite_connection_string)?;
    info!("Ran {ran} db migrations");

    // Create a database pool to add into the app state
    let pool = db::create_pool(&args.sqlite_connection_string)?;

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, routes::app(AppState::new(pool, args))).await?;

    Ok(())
}
