use std::sync::Arc;

use log::warn;

use tokio::io::{AsyncRead, AsyncWrite};

use tokio_fastcgi::{Request, Requests};

use crate::{
    handlers::RequestHandler, request::FastCGIRequest, response::Responder, server::ConnectionID,
};

pub(super) trait GenericAsyncWriter: AsyncWrite + Unpin {}

impl<T> GenericAsyncWriter for T where T: AsyncWrite + Unpin {}

pub(super) trait GenericAsyncReader: AsyncRead + Unpin {}

impl<T> GenericAsyncReader for T where T: AsyncRead + Unpin {}

/// Reads the FastCGI requests of one connection and runs each on its own
/// task.
pub(super) struct ConnectionProcessor {
    connection_id: ConnectionID,
    handlers: Arc<dyn RequestHandler>,
    fastcgi_connection_configuration: crate::config::FastCGIConnectionConfiguration,
}

impl ConnectionProcessor {
    pub(super) fn new(
        connection_id: ConnectionID,
        handlers: Arc<dyn RequestHandler>,
        fastcgi_connection_configuration: &crate::config::FastCGIConnectionConfiguration,
    ) -> Arc<Self> {
        Arc::new(Self {
            connection_id,
            handlers,
            fastcgi_connection_configuration: fastcgi_connection_configuration.clone(),
        })
    }

    async fn process_one_request(self: Arc<Self>, request: Request<impl GenericAsyncWriter>) {
        let connection_id = self.connection_id;

        if let Err(err) = request
            .process(|request| async move {
                let http_response = self
                    .handlers
                    .handle(FastCGIRequest::new(connection_id, request.as_ref()))
                    .await;

                Responder::new(request, http_response).respond().await
            })
            .await
        {
            warn!(
                "connection_id {:?} request.process failed: err = {}",
                connection_id, err
            );
        }
    }

    pub(super) fn start<R, W>(self: Arc<Self>, split_socket: (R, W))
    where
        R: GenericAsyncReader + Send + Sync + 'static,
        W: GenericAsyncWriter + Send + Sync + 'static,
    {
        tokio::spawn(async move {
            let mut requests = Requests::from_split_socket(
                split_socket,
                *self
                    .fastcgi_connection_configuration
                    .max_concurrent_connections(),
                *self
                    .fastcgi_connection_configuration
                    .max_requests_per_connection(),
            );

            while let Ok(Some(request)) = requests.next().await {
                tokio::spawn(Arc::clone(&self).process_one_request(request));
            }
        });
    }
}
