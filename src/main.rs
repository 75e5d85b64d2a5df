use clap::Parser;
use restrec::services::http::create_router;
use restrec::{init_tracing, AppState, Config};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing();

    let config = Config::load_or_default(&args.config)?;
    info!("Starting restaurant recommendation server with config: {:?}", config.server);

    let runtime = config.server.build_runtime()?;
    runtime.block_on(serve(config))
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let addr = config.server.socket_addr()?;
    let workers = config.server.workers;
    let state = AppState::new(config)?;
    info!("Catalog loaded with {} restaurants", state.catalog.len());

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {} with {} worker threads", addr, workers);

    axum::serve(listener, app).await?;

    Ok(())
}
