use anyhow::Context;

use getset::Getters;

use log::info;

use serde::{Deserialize, Serialize};

use tokio::{fs::File, io::AsyncReadExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ServerType {
    TCP,
    UNIX,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct FastCGIConnectionConfiguration {
    max_concurrent_connections: u8,
    max_requests_per_connection: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct ServerConfiguration {
    server_type: ServerType,
    bind_address: String,
    fastcgi_connection_configuration: FastCGIConnectionConfiguration,
}

#[derive(Debug, Clone, Deserialize, Serialize, Getters)]
#[getset(get = "pub")]
pub struct Configuration {
    server_configuration: ServerConfiguration,

    /// Partial route configurations, merged in order over the built-in
    /// defaults.
    #[serde(default)]
    route_configurations: Vec<serde_json::Value>,
}

pub async fn read_configuration(config_file: String) -> anyhow::Result<Configuration> {
    info!("reading {}", config_file);

    let mut file = File::open(&config_file)
        .await
        .with_context(|| format!("error opening config file '{}'", config_file))?;

    let mut file_contents = Vec::new();

    file.read_to_end(&mut file_contents)
        .await
        .with_context(|| format!("error reading config file '{}'", config_file))?;

    let configuration: Configuration = ::serde_json::from_slice(&file_contents)
        .with_context(|| format!("error unmarshalling config file '{}'", config_file))?;

    info!("configuration\n{:#?}", configuration);

    Ok(configuration)
}
