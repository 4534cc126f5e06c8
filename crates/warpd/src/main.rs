//! warpd — the WarpGrid daemon.
//!
//! Loads a cluster snapshot (nodes + allocations as JSON), builds the
//! topology, and serves the dashboard routes. With `--reload-interval`,
//! the snapshot file is re-read periodically and the topology rebuilt.
//!
//! # Usage
//!
//! ```text
//! warpd dashboard --snapshot cluster.json --layout layout.toml --port 8443
//! ```

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tokio::sync::watch;
use tracing::{info, warn};

use warpgrid_dashboard::{DashboardState, dashboard_router};
use warpgrid_state::ClusterSnapshot;
use warpgrid_topology::LayoutConfig;

#[derive(Parser)]
#[command(name = "warpd", about = "WarpGrid daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the cluster topology dashboard.
    Dashboard {
        /// Snapshot file with `nodes` and `allocations` lists.
        #[arg(long)]
        snapshot: PathBuf,

        /// Layout tuning file (layout.toml). Defaults apply when omitted.
        #[arg(long)]
        layout: Option<PathBuf>,

        /// Port to listen on.
        #[arg(long, default_value = "8443")]
        port: u16,

        /// Re-read the snapshot every N seconds (0 disables).
        #[arg(long, default_value = "0")]
        reload_interval: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("warpd=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Dashboard {
            snapshot,
            layout,
            port,
            reload_interval,
        } => run_dashboard(snapshot, layout, port, reload_interval).await,
    }
}

async fn run_dashboard(
    snapshot_path: PathBuf,
    layout_path: Option<PathBuf>,
    port: u16,
    reload_interval: u64,
) -> anyhow::Result<()> {
    info!("WarpGrid dashboard starting");

    let config = match &layout_path {
        Some(path) => LayoutConfig::from_file(path)?,
        None => LayoutConfig::default(),
    };
    info!(layout = ?layout_path, "layout config loaded");

    let snapshot = ClusterSnapshot::from_file(&snapshot_path)?;
    info!(
        path = ?snapshot_path,
        nodes = snapshot.nodes.len(),
        allocations = snapshot.allocations.len(),
        "snapshot loaded"
    );

    let state = DashboardState::new(&snapshot, config);

    // ── Shutdown signal ────────────────────────────────────────

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // ── Snapshot reload loop ───────────────────────────────────

    let reload_handle = (reload_interval > 0).then(|| {
        let state = state.clone();
        let path = snapshot_path.clone();
        tokio::spawn(reload_loop(
            state,
            path,
            Duration::from_secs(reload_interval),
            shutdown_rx,
        ))
    });

    // ── Start server ───────────────────────────────────────────

    let router = dashboard_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "dashboard server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
        }
        info!("shutdown signal received");
        let _ = shutdown_tx.send(true);
    });

    server.await?;

    if let Some(handle) = reload_handle {
        let _ = handle.await;
    }

    info!("WarpGrid dashboard stopped");
    Ok(())
}

/// Periodically rebuild the topology from the snapshot file.
///
/// A snapshot that fails to load keeps the previous topology in place.
async fn reload_loop(
    state: DashboardState,
    path: PathBuf,
    interval: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    // The first tick completes immediately; the initial snapshot is already loaded.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => reload_once(&state, &path).await,
            _ = shutdown.changed() => break,
        }
    }
}

async fn reload_once(state: &DashboardState, path: &Path) {
    let json = match tokio::fs::read_to_string(path).await {
        Ok(json) => json,
        Err(e) => {
            warn!(path = ?path, error = %e, "snapshot reload failed");
            return;
        }
    };
    match ClusterSnapshot::from_json(&json) {
        Ok(snapshot) => state.replace_snapshot(&snapshot).await,
        Err(e) => warn!(path = ?path, error = %e, "snapshot reload failed"),
    }
}
