use nakliye_app::config::Config;
use tracing::error;

#[tokio::main]
async fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    nakliye_server::init_tracing(config.log_json, "info");

    if let Err(e) = nakliye_server::serve(&config).await {
        error!(error = %e, "server stopped");
        std::process::exit(1);
    }
}
