use std::{fmt::Write, sync::Arc};

use log::{debug, warn};

use tokio::io::AsyncWrite;

use tokio_fastcgi::{Request, RequestResult};

pub type HttpResponse = http::Response<Option<String>>;

#[derive(thiserror::Error, Debug)]
enum SendResponseError {
    #[error("build header string error: {0}")]
    BuildHeaderStringError(#[from] std::fmt::Error),

    #[error("tokio_fastcgi write error: {0}")]
    TokioFastCGIWriteError(#[from] tokio_fastcgi::Error),
}

/// Formats the CGI response head: a `Status:` line, one line per header and
/// the blank separator line.
pub fn build_header_string(response: &HttpResponse) -> Result<String, std::fmt::Error> {
    let mut header_string = String::new();

    writeln!(
        header_string,
        "Status: {} {}",
        response.status().as_u16(),
        response.status().canonical_reason().unwrap_or("[Unknown]")
    )?;

    for (key, value) in response.headers() {
        writeln!(
            header_string,
            "{}: {}",
            key.as_str(),
            value.to_str().unwrap_or("[Unknown]")
        )?;
    }

    if let Some(body) = response.body() {
        if !response.headers().contains_key(http::header::CONTENT_LENGTH) {
            writeln!(header_string, "{}: {}", http::header::CONTENT_LENGTH, body.len())?;
        }
    }

    header_string.push('\n');

    Ok(header_string)
}

pub struct Responder<W>
where
    W: AsyncWrite + Unpin,
{
    request: Arc<Request<W>>,
    response: HttpResponse,
}

impl<W> Responder<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(request: Arc<Request<W>>, response: HttpResponse) -> Self {
        Self { request, response }
    }

    async fn internal_send_response(self) -> Result<(), SendResponseError> {
        let mut stdout = self.request.get_stdout();

        let header_string = build_header_string(&self.response)?;

        stdout.write(header_string.as_bytes()).await?;

        if let Some(body_string) = self.response.into_body() {
            stdout.write(body_string.as_bytes()).await?;
        }

        Ok(())
    }

    pub async fn respond(self) -> RequestResult {
        debug!(
            "respond request_id = {} status = {}",
            self.request.get_request_id(),
            self.response.status()
        );

        match self.internal_send_response().await {
            Ok(_) => RequestResult::Complete(0),
            Err(err) => {
                warn!("send response failed: {}", err);
                RequestResult::Complete(1)
            }
        }
    }
}
