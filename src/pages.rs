//! Handler units: the code that renders one page for a resolved route.

mod about;
mod home;
mod news;
mod not_found;
mod users;

use std::{collections::HashMap, fmt};

use getset::Getters;

use http::StatusCode;

use crate::{layout::PageMetadata, routing::RouteParams};

/// Request-scoped state a handler unit reads from and writes to.
///
/// Output written through [`fmt::Write`] is captured here so the dispatcher
/// can still wrap it in a layout afterwards.
#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct PageContext {
    params: RouteParams,
    output: String,
    layout: Option<String>,
    metadata: PageMetadata,
    status: StatusCode,
}

impl PageContext {
    pub fn new(params: RouteParams) -> Self {
        Self::with_status(params, StatusCode::OK)
    }

    pub fn with_status(params: RouteParams, status: StatusCode) -> Self {
        Self {
            params,
            output: String::new(),
            layout: None,
            metadata: PageMetadata::default(),
            status,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Asks the dispatcher to wrap this page's output in `layout`.
    pub fn set_layout(&mut self, layout: impl Into<String>) {
        self.layout = Some(layout.into());
    }

    pub fn metadata_mut(&mut self) -> &mut PageMetadata {
        &mut self.metadata
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// The declared layout, if any non-blank one was set.
    pub fn declared_layout(&self) -> Option<&str> {
        self.layout
            .as_deref()
            .filter(|layout| !layout.trim().is_empty())
    }

    pub fn into_output(self) -> String {
        self.output
    }
}

impl fmt::Write for PageContext {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.output.push_str(s);
        Ok(())
    }
}

pub trait HandlerUnit: Send + Sync {
    fn execute(&self, context: &mut PageContext) -> anyhow::Result<()>;
}

impl<F> HandlerUnit for F
where
    F: Fn(&mut PageContext) -> anyhow::Result<()> + Send + Sync,
{
    fn execute(&self, context: &mut PageContext) -> anyhow::Result<()> {
        self(context)
    }
}

/// Handler units by id. Ids are compared after trimming surrounding slashes,
/// so `/users/detail/` and `users/detail` are the same unit.
#[derive(Default)]
pub struct PageRegistry {
    units: HashMap<String, Box<dyn HandlerUnit>>,
}

impl PageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler_id: &str, unit: Box<dyn HandlerUnit>) -> anyhow::Result<()> {
        let key = normalize_handler_id(handler_id);
        if self.units.insert(key.clone(), unit).is_some() {
            anyhow::bail!("PageRegistry::register error: collision in handler id '{}'", key);
        }
        Ok(())
    }

    pub fn resolve(&self, handler_id: &str) -> Option<&dyn HandlerUnit> {
        self.units
            .get(&normalize_handler_id(handler_id))
            .map(|unit| &**unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

pub fn normalize_handler_id(handler_id: &str) -> String {
    handler_id
        .replace('\\', "/")
        .trim_matches('/')
        .to_owned()
}

/// Registers the pages of the built-in site.
pub fn create_site_pages() -> anyhow::Result<PageRegistry> {
    let mut registry = PageRegistry::new();

    registry.register("home", Box::new(home::render))?;
    registry.register("about", Box::new(about::render))?;
    registry.register("news", Box::new(news::render))?;
    registry.register("test", Box::new(test::render))?;
    registry.register("test_param", Box::new(test::render_param))?;
    registry.register("users/index", Box::new(users::render_index))?;
    registry.register("users/detail", Box::new(users::render_detail))?;
    registry.register("users/form", Box::new(users::render_form))?;
    registry.register("404", Box::new(not_found::render))?;

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use std::fmt::Write;

    use super::*;

    #[test]
    fn ids_are_normalized() {
        assert_eq!(normalize_handler_id("/users/detail/"), "users/detail");
        assert_eq!(normalize_handler_id("\\users\\detail"), "users/detail");
        assert_eq!(normalize_handler_id("home"), "home");
    }

    #[test]
    fn registry_resolves_normalized_ids() {
        let mut registry = PageRegistry::new();
        registry
            .register(
                "users/detail",
                Box::new(|context: &mut PageContext| -> anyhow::Result<()> {
                    write!(context, "detail")?;
                    Ok(())
                }),
            )
            .unwrap();

        assert!(registry.resolve("/users/detail/").is_some());
        assert!(registry.resolve("users").is_none());

        let mut context = PageContext::new(RouteParams::new());
        registry
            .resolve("users/detail")
            .unwrap()
            .execute(&mut context)
            .unwrap();
        assert_eq!(context.output(), "detail");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = create_site_pages().unwrap();
        let result = registry.register("/home/", Box::new(home::render));
        assert!(result.is_err());
    }

    #[test]
    fn blank_layout_is_not_a_layout() {
        let mut context = PageContext::new(RouteParams::new());
        assert_eq!(context.declared_layout(), None);
        context.set_layout("  ");
        assert_eq!(context.declared_layout(), None);
        context.set_layout("main");
        assert_eq!(context.declared_layout(), Some("main"));
    }

    #[test]
    fn site_has_every_configured_page() {
        let registry = create_site_pages().unwrap();
        assert_eq!(registry.len(), 9);
        for id in ["home", "about", "news", "test", "test_param", "users/index", "users/detail", "users/form", "404"] {
            assert!(registry.resolve(id).is_some(), "missing {}", id);
        }
    }
}
