use anyhow::Result;
use axum::Router;
use clap::Parser;
use lexrank_server::{build_app, load_engine};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Grouped corpus JSON file, or a directory of them
    #[arg(long, default_value = "./IRproject.json")]
    corpus: PathBuf,
    /// Optional engine config (JSON); missing keys take defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    // Indexes are fully built before the listener exists.
    let (corpus, config) = (args.corpus.clone(), args.config.clone());
    let engine = tokio::task::spawn_blocking(move || load_engine(&corpus, config.as_deref())).await??;
    let app: Router = build_app(Arc::new(engine));

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
