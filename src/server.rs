mod processor;
mod tcp;
mod unix;

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use async_trait::async_trait;

use crate::handlers::RequestHandler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionID(pub u64);

struct ConnectionIDFactory {
    next_connection_id: AtomicU64,
}

impl ConnectionIDFactory {
    fn new() -> Self {
        Self {
            next_connection_id: AtomicU64::new(1),
        }
    }

    fn new_connection_id(&self) -> ConnectionID {
        ConnectionID(self.next_connection_id.fetch_add(1, Ordering::Relaxed))
    }
}

#[async_trait]
trait SocketServer {
    async fn run(&self) -> anyhow::Result<()>;
}

pub struct Server {
    socket_server: Box<dyn SocketServer>,
}

impl Server {
    pub fn new(
        handlers: Arc<dyn RequestHandler>,
        server_configuration: &crate::config::ServerConfiguration,
    ) -> Self {
        let socket_server: Box<dyn SocketServer> = match server_configuration.server_type() {
            crate::config::ServerType::TCP => {
                Box::new(tcp::TcpServer::new(server_configuration, handlers))
            }
            crate::config::ServerType::UNIX => {
                Box::new(unix::UnixServer::new(server_configuration, handlers))
            }
        };

        Self { socket_server }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.socket_server.run().await
    }
}
