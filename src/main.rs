mod config;
mod data;
mod decode;
mod error;
mod model;
mod pairing;
mod server;
mod solver;
mod study;
mod tournament;

use config::ServerConfig;
use log::error;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = server::run_server(ServerConfig::from_env()).await {
        error!("server stopped: {}", e);
        std::process::exit(1);
    }
}
