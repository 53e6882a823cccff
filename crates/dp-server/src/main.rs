use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::info;
use url::Url;

use dp_canvas_client::{AuthConfig, CanvasClient};
use dp_core::{ServiceConfig, SnapshotStore};
use dp_server::{app, AppState};

/// Command line arguments for the degree-project tools server
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Service configuration file (Canvas host, access token, LTI secret)
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Course/program/examiner reference data file
    #[arg(long, default_value = "course-data-EECS-cycle-2.json")]
    course_data: PathBuf,

    /// Program specialization tracks file
    #[arg(long)]
    specializations: Option<PathBuf>,

    /// Externally visible URL of the launch route, as Canvas signs it
    #[arg(long)]
    launch_url: Url,

    /// Listen port
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = ServiceConfig::load(&args.config)?;
    info!(host = %config.canvas.host, "loaded service configuration");

    let canvas = CanvasClient::from_host(
        &config.canvas.host,
        AuthConfig::bearer(&config.canvas.access_token),
    )?;
    let reference = SnapshotStore::open(&args.course_data, args.specializations.clone())?;

    let state = AppState::new(
        Arc::new(canvas),
        Arc::new(reference),
        config.lti,
        args.launch_url,
    );

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port)).await?;
    info!(port = args.port, "degree-project tools listening");
    axum::serve(listener, app(state)).await?;

    Ok(())
}
