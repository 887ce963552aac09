//! Turns a handler id into the final page: runs the handler unit, captures
//! its output and wraps it in the layout the unit declared.

mod not_found;

use anyhow::Context;

use getset::Getters;

use http::StatusCode;

use log::debug;

use crate::{
    layout::{LayoutBindings, LayoutComposer},
    pages::{normalize_handler_id, HandlerUnit, PageContext, PageRegistry},
    routing::RouteParams,
};

pub use not_found::respond_not_found;

#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct RenderedPage {
    status: StatusCode,
    body: String,
}

impl RenderedPage {
    pub fn new(status: StatusCode, body: String) -> Self {
        Self { status, body }
    }

    pub fn into_parts(self) -> (StatusCode, String) {
        (self.status, self.body)
    }
}

/// Dispatch only ever moves forward; `Composed` and `NotFoundFallback` are
/// terminal.
enum DispatchState<'a> {
    NotDispatched,
    UnitFound {
        unit_id: &'a str,
        unit: &'a dyn HandlerUnit,
        forced_status: Option<StatusCode>,
        context: PageContext,
    },
    UnitExecuted {
        forced_status: Option<StatusCode>,
        context: PageContext,
    },
    Composed(RenderedPage),
    NotFoundFallback(RenderedPage),
}

impl DispatchState<'_> {
    fn name(&self) -> &'static str {
        match self {
            Self::NotDispatched => "NotDispatched",
            Self::UnitFound { .. } => "UnitFound",
            Self::UnitExecuted { .. } => "UnitExecuted",
            Self::Composed(_) => "Composed",
            Self::NotFoundFallback(_) => "NotFoundFallback",
        }
    }
}

pub struct Dispatcher {
    pages: PageRegistry,
    layouts: LayoutComposer,
    not_found_handler: String,
}

impl Dispatcher {
    pub fn new(
        pages: PageRegistry,
        layouts: LayoutComposer,
        not_found_handler: impl Into<String>,
    ) -> Self {
        Self {
            pages,
            layouts,
            not_found_handler: not_found_handler.into(),
        }
    }

    /// Renders `handler_id` with `params` bound into its context.
    ///
    /// A missing unit falls back to the not-found unit, and if that is
    /// missing too to [`respond_not_found`]; both answer with 404. Errors
    /// from the executed unit are returned to the caller untouched.
    pub fn render(&self, handler_id: &str, params: &RouteParams) -> anyhow::Result<RenderedPage> {
        let mut state = DispatchState::NotDispatched;

        loop {
            state = match state {
                DispatchState::NotDispatched => self.resolve(handler_id, params),

                DispatchState::UnitFound {
                    unit_id,
                    unit,
                    forced_status,
                    mut context,
                } => {
                    unit.execute(&mut context)
                        .with_context(|| format!("handler unit '{}' failed", unit_id))?;

                    DispatchState::UnitExecuted {
                        forced_status,
                        context,
                    }
                }

                DispatchState::UnitExecuted {
                    forced_status,
                    context,
                } => DispatchState::Composed(self.compose(forced_status, context)),

                DispatchState::Composed(page) | DispatchState::NotFoundFallback(page) => {
                    return Ok(page);
                }
            };

            debug!("dispatch '{}' state = {}", handler_id, state.name());
        }
    }

    fn resolve<'a>(&'a self, handler_id: &'a str, params: &RouteParams) -> DispatchState<'a> {
        let requested_not_found =
            normalize_handler_id(handler_id) == normalize_handler_id(&self.not_found_handler);

        if let Some(unit) = self.pages.resolve(handler_id) {
            let forced_status = requested_not_found.then_some(StatusCode::NOT_FOUND);

            return DispatchState::UnitFound {
                unit_id: handler_id,
                unit,
                forced_status,
                context: PageContext::with_status(
                    params.clone(),
                    forced_status.unwrap_or(StatusCode::OK),
                ),
            };
        }

        debug!("no handler unit for '{}'", handler_id);

        match self.pages.resolve(&self.not_found_handler) {
            Some(unit) => DispatchState::UnitFound {
                unit_id: &self.not_found_handler,
                unit,
                forced_status: Some(StatusCode::NOT_FOUND),
                context: PageContext::with_status(params.clone(), StatusCode::NOT_FOUND),
            },
            None => DispatchState::NotFoundFallback(respond_not_found(handler_id)),
        }
    }

    fn compose(&self, forced_status: Option<StatusCode>, context: PageContext) -> RenderedPage {
        let status = forced_status.unwrap_or(*context.status());

        let body = match context.declared_layout().map(str::to_owned) {
            Some(layout) => self.layouts.compose(
                &layout,
                &LayoutBindings {
                    content: context.output(),
                    params: context.params(),
                    metadata: context.metadata(),
                },
            ),
            None => context.into_output(),
        };

        RenderedPage::new(status, body)
    }
}
