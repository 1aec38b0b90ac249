use dotenv::dotenv;
use env_logger;
use log::info;
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use spcomp::config::AppConfig;
use spcomp::handlers::compare::CompareState;
use spcomp::routes;
use spcomp::services::compare::Comparer;
use spcomp::services::tradier::TradierClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    // Initialize the logger
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = AppConfig::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let provider = TradierClient::new(config.tradier.clone())?;
    let comparer = Comparer::new(provider)
        .with_benchmark(config.benchmark.clone())
        .with_deadline(config.request_deadline);
    let state = Arc::new(CompareState {
        comparer,
        default_days: config.default_days,
    });

    // Bind to 0.0.0.0 for container platforms
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Will bind to: {}", addr);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(state).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
