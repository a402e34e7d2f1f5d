use clap::Parser;
use log::error;
use seat_distributor::config::Config;
use seat_distributor::server;

#[tokio::main]
async fn main() {
    // a missing .env is fine, real environment and flags still apply
    let _ = dotenvy::dotenv();
    let config = Config::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Err(e) = server::run_server(config).await {
        error!("Server stopped: {}", e);
        std::process::exit(1);
    }
}
