use anyhow::Context;

use log::{error, info};

use fastcgi_pages::{config::read_configuration, handlers::create_handlers, server::Server};

const DEFAULT_CONFIG_FILE: &str = "./config/config.json";

async fn try_main() -> anyhow::Result<()> {
    let config_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());

    let configuration = read_configuration(config_file)
        .await
        .context("read_configuration error")?;

    let handlers = create_handlers(&configuration).context("create_handlers error")?;

    let server = Server::new(handlers, configuration.server_configuration());

    info!("starting server");

    server.run().await
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_nanos()
        .init();

    if let Err(err) = try_main().await {
        error!("fatal error in main:\n{:#}", err);
        std::process::exit(1);
    }
}
