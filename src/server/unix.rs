use async_trait::async_trait;

use std::{io, path::Path, sync::Arc};

use anyhow::Context;

use log::{debug, info, warn};

use tokio::net::{unix::SocketAddr, UnixListener, UnixStream};

use crate::{config::ServerConfiguration, handlers::RequestHandler};

use super::{processor::ConnectionProcessor, ConnectionIDFactory};

/// Serves pages to a web server over a unix domain socket.
pub(super) struct UnixServer {
    server_configuration: ServerConfiguration,
    handlers: Arc<dyn RequestHandler>,
    connection_id_factory: ConnectionIDFactory,
}

impl UnixServer {
    pub(super) fn new(
        server_configuration: &ServerConfiguration,
        handlers: Arc<dyn RequestHandler>,
    ) -> Self {
        Self {
            server_configuration: server_configuration.clone(),
            handlers,
            connection_id_factory: ConnectionIDFactory::new(),
        }
    }

    async fn bind_socket(&self) -> anyhow::Result<UnixListener> {
        let socket_path = Path::new(self.server_configuration.bind_address());

        remove_stale_socket(socket_path).await?;

        let listener = UnixListener::bind(socket_path)
            .with_context(|| format!("UnixListener::bind error path {:?}", socket_path))?;

        info!(
            "serving pages on unix socket {:?} max_concurrent_connections = {}",
            socket_path,
            self.server_configuration
                .fastcgi_connection_configuration()
                .max_concurrent_connections()
        );

        Ok(listener)
    }

    fn serve_connection(&self, stream: UnixStream, peer: SocketAddr) {
        let connection_id = self.connection_id_factory.new_connection_id();

        debug!("accepted {:?} peer = {:?}", connection_id, peer);

        ConnectionProcessor::new(
            connection_id,
            Arc::clone(&self.handlers),
            self.server_configuration.fastcgi_connection_configuration(),
        )
        .start(stream.into_split());
    }
}

/// A socket file left behind by an earlier run would make `bind` fail.
async fn remove_stale_socket(socket_path: &Path) -> anyhow::Result<()> {
    match tokio::fs::remove_file(socket_path).await {
        Ok(()) => {
            warn!("removed stale socket {:?}", socket_path);
            Ok(())
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => {
            Err(err).with_context(|| format!("remove_file error path {:?}", socket_path))
        }
    }
}

#[async_trait]
impl super::SocketServer for UnixServer {
    async fn run(&self) -> anyhow::Result<()> {
        let listener = self
            .bind_socket()
            .await
            .context("UnixServer::bind_socket error")?;

        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .context("UnixListener::accept error")?;

            self.serve_connection(stream, peer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stale_socket_is_removed_and_missing_one_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("pages.sock");

        remove_stale_socket(&socket_path).await.unwrap();

        std::fs::write(&socket_path, b"").unwrap();
        remove_stale_socket(&socket_path).await.unwrap();
        assert!(!socket_path.exists());
    }
}
