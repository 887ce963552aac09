//! Wraps rendered page content in a named layout template.

mod site;

use std::collections::HashMap;

use getset::Getters;

use indexmap::IndexMap;

use log::{debug, warn};

use serde::Serialize;

use crate::routing::RouteParams;

pub use site::{create_site_layouts, SiteLayout};

/// Page-level values a layout can use around the content.
#[derive(Clone, Debug, Default, PartialEq, Getters, Serialize)]
#[getset(get = "pub")]
pub struct PageMetadata {
    title: String,
    description: String,
    keywords: String,
    css_files: Vec<String>,
    js_files: Vec<String>,
    data: IndexMap<String, serde_json::Value>,
}

impl PageMetadata {
    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.title = title.into();
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    pub fn set_keywords(&mut self, keywords: impl Into<String>) -> &mut Self {
        self.keywords = keywords.into();
        self
    }

    pub fn add_css(&mut self, css_file: impl Into<String>) -> &mut Self {
        self.css_files.push(css_file.into());
        self
    }

    pub fn add_js(&mut self, js_file: impl Into<String>) -> &mut Self {
        self.js_files.push(js_file.into());
        self
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Merges `data` into the existing data, later values winning.
    pub fn set_all_data(
        &mut self,
        data: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> &mut Self {
        self.data.extend(data);
        self
    }
}

/// Everything a layout template is rendered with.
#[derive(Clone, Copy, Debug)]
pub struct LayoutBindings<'a> {
    pub content: &'a str,
    pub params: &'a RouteParams,
    pub metadata: &'a PageMetadata,
}

pub trait LayoutTemplate: Send + Sync {
    fn render(&self, bindings: &LayoutBindings<'_>) -> String;
}

impl<F> LayoutTemplate for F
where
    F: Fn(&LayoutBindings<'_>) -> String + Send + Sync,
{
    fn render(&self, bindings: &LayoutBindings<'_>) -> String {
        self(bindings)
    }
}

/// Named layout templates. A name that resolves to nothing leaves the content
/// unwrapped.
#[derive(Default)]
pub struct LayoutComposer {
    templates: HashMap<String, Box<dyn LayoutTemplate>>,
}

impl LayoutComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        name: &str,
        template: Box<dyn LayoutTemplate>,
    ) -> anyhow::Result<()> {
        let key = layout_key(name);
        if self.templates.insert(key.clone(), template).is_some() {
            anyhow::bail!("LayoutComposer::register error: collision in layout name '{}'", key);
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(&layout_key(name))
    }

    pub fn compose(&self, layout_name: &str, bindings: &LayoutBindings<'_>) -> String {
        let key = layout_key(layout_name);

        match self.templates.get(&key) {
            Some(template) => {
                debug!("composing with layout '{}'", key);
                template.render(bindings)
            }
            None => {
                warn!("layout '{}' not found, emitting content unwrapped", key);
                bindings.content.to_owned()
            }
        }
    }
}

/// `green_layout`, `green_layout.php` and `/green_layout/` name the same
/// layout.
fn layout_key(name: &str) -> String {
    let without_extension = match name.rfind('.') {
        Some(dot) => &name[..dot],
        None => name,
    };
    without_extension.trim_matches(['/', '\\']).to_owned()
}

/// Escapes text for use inside HTML element content or quoted attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composer() -> LayoutComposer {
        let mut composer = LayoutComposer::new();
        composer
            .register(
                "foo",
                Box::new(|bindings: &LayoutBindings<'_>| {
                    format!(
                        "<main title=\"{}\">{}</main>",
                        bindings.metadata.title(),
                        bindings.content
                    )
                }),
            )
            .unwrap();
        composer
    }

    fn compose(name: &str, content: &str, metadata: &PageMetadata) -> String {
        let params = RouteParams::new();
        composer().compose(
            name,
            &LayoutBindings {
                content,
                params: &params,
                metadata,
            },
        )
    }

    #[test]
    fn wraps_content_with_named_template() {
        let mut metadata = PageMetadata::default();
        metadata.set_title("Hi");
        assert_eq!(compose("foo", "body", &metadata), "<main title=\"Hi\">body</main>");
    }

    #[test]
    fn extension_is_ignored() {
        let metadata = PageMetadata::default();
        assert_eq!(compose("foo.php", "x", &metadata), "<main title=\"\">x</main>");
        assert_eq!(compose("foo.", "x", &metadata), "<main title=\"\">x</main>");
        assert!(composer().contains("/foo.html"));
    }

    #[test]
    fn missing_template_returns_content_unchanged() {
        let metadata = PageMetadata::default();
        assert_eq!(compose("bar", "<p>raw</p>", &metadata), "<p>raw</p>");
        assert_eq!(compose("foo.bar.baz", "raw", &metadata), "raw");
    }

    #[test]
    fn duplicate_registration_fails() {
        let mut composer = composer();
        let result = composer.register("foo.php", Box::new(|_: &LayoutBindings<'_>| String::new()));
        assert!(result.is_err());
    }

    #[test]
    fn metadata_setters_chain_and_merge() {
        let mut metadata = PageMetadata::default();
        metadata
            .set_title("t")
            .set_description("d")
            .set_keywords("k")
            .add_css("/a.css")
            .add_js("/a.js")
            .set_data("count", 1)
            .set_all_data([("count".to_owned(), 2.into()), ("name".to_owned(), "x".into())]);

        assert_eq!(metadata.css_files(), &["/a.css"]);
        assert_eq!(metadata.js_files(), &["/a.js"]);
        assert_eq!(metadata.data()["count"], 2);
        assert_eq!(metadata.data()["name"], "x");
    }

    #[test]
    fn escapes_quotes_for_attributes() {
        assert_eq!(
            escape_html("<a href=\"x\">it's & done</a>"),
            "&lt;a href=&quot;x&quot;&gt;it&#039;s &amp; done&lt;/a&gt;"
        );
    }
}
