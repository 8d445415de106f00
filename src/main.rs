use std::sync::Arc;

use swan_serve::config::{AppState, Config};
use swan_serve::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // First argument is the config file (extension optional)
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config".to_string());
    let cfg = Config::load_from(&config_path)?;

    logger::init(&cfg.logging);

    // Create the Tokio runtime; thread count follows `server.workers`
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        tracing::debug!(workers, "using configured worker threads");
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;

    // Scan before binding: a bad root fails fast without touching the port
    let state = AppState::new(&cfg)?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg, state.server.asset_count());

    // Use LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(async move {
            let signals = server::SignalHandler::new();
            server::start_signal_handler(Arc::clone(&signals));
            server::start_server_loop(listener, state, signals).await
        })
        .await
}
