mod utils;

use std::sync::Arc;

use anyhow::Context;

use async_trait::async_trait;

use log::{debug, info, warn};

use crate::{
    dispatch::Dispatcher,
    layout::create_site_layouts,
    pages::create_site_pages,
    request::{FastCGIRequest, RequestDescriptor},
    response::HttpResponse,
    routing::{match_request, RouteTable},
};

pub use utils::{build_html_response, build_status_code_response, HTML_CONTENT_TYPE};

#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn handle(&self, request: FastCGIRequest<'_>) -> HttpResponse;
}

/// Routes each request through the route table and the page dispatcher.
pub struct PageApplication {
    route_table: Arc<RouteTable>,
    dispatcher: Dispatcher,
}

impl PageApplication {
    pub fn new(route_table: Arc<RouteTable>, dispatcher: Dispatcher) -> Self {
        Self {
            route_table,
            dispatcher,
        }
    }

    /// The built-in site served with routes merged from `route_configurations`.
    pub fn for_site<'a>(
        route_configurations: impl IntoIterator<Item = &'a serde_json::Value>,
    ) -> anyhow::Result<Self> {
        let route_table = RouteTable::from_configurations(route_configurations)
            .context("RouteTable::from_configurations error")?;

        let pages = create_site_pages().context("create_site_pages error")?;

        let layouts = create_site_layouts().context("create_site_layouts error")?;

        info!(
            "site has {} pages, not_found handler '{}'",
            pages.len(),
            route_table.not_found_handler()
        );

        let dispatcher = Dispatcher::new(pages, layouts, route_table.not_found_handler().clone());

        Ok(Self::new(Arc::new(route_table), dispatcher))
    }

    pub fn route_table(&self) -> &Arc<RouteTable> {
        &self.route_table
    }

    pub fn respond(&self, descriptor: &RequestDescriptor) -> HttpResponse {
        let route_match = match_request(descriptor, &self.route_table);

        debug!(
            "descriptor = {:?} route_match = {:?}",
            descriptor, route_match
        );

        match self
            .dispatcher
            .render(route_match.handler_id(), route_match.params())
        {
            Ok(page) => {
                let (status, body) = page.into_parts();
                build_html_response(status, body)
            }
            Err(err) => {
                warn!(
                    "{} {} failed: {:#}",
                    descriptor.method(),
                    descriptor.raw_path(),
                    err
                );
                build_status_code_response(http::StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

#[async_trait]
impl RequestHandler for PageApplication {
    async fn handle(&self, request: FastCGIRequest<'_>) -> HttpResponse {
        let descriptor = request.descriptor();

        debug!(
            "connection_id = {:?} request_id = {} role = {}",
            request.connection_id(),
            request.request_id(),
            request.role()
        );

        self.respond(&descriptor)
    }
}

pub fn create_handlers(
    configuration: &crate::config::Configuration,
) -> anyhow::Result<Arc<dyn RequestHandler>> {
    let application = PageApplication::for_site(configuration.route_configurations())?;

    Ok(Arc::new(application))
}
