use std::fmt::Write;

use chrono::{Datelike, Local};

use super::{escape_html, LayoutBindings, LayoutComposer, LayoutTemplate};

const SITE_NAME: &str = "FastCGI Pages";
const DEFAULT_TITLE: &str = "FastCGI Pages";
const DEFAULT_DESCRIPTION: &str = "A site served by fastcgi-pages";
const DEFAULT_KEYWORDS: &str = "fastcgi, rust";

const NAV_LINKS: [(&str, &str); 4] = [
    ("/", "Home"),
    ("/about", "About"),
    ("/news", "News"),
    ("/users", "Users"),
];

/// The page chrome shared by all built-in layouts; themes differ only in
/// their stylesheet, script and body class.
pub struct SiteLayout {
    theme_class: &'static str,
    stylesheet: &'static str,
    script: &'static str,
}

impl SiteLayout {
    pub fn new(theme_class: &'static str, stylesheet: &'static str, script: &'static str) -> Self {
        Self {
            theme_class,
            stylesheet,
            script,
        }
    }

    fn write_page(&self, out: &mut String, bindings: &LayoutBindings<'_>) -> std::fmt::Result {
        let metadata = bindings.metadata;

        let title = non_empty_or(metadata.title(), DEFAULT_TITLE);
        let description = non_empty_or(metadata.description(), DEFAULT_DESCRIPTION);
        let keywords = non_empty_or(metadata.keywords(), DEFAULT_KEYWORDS);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "    <meta charset=\"UTF-8\">")?;
        writeln!(
            out,
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">"
        )?;
        writeln!(out, "    <title>{}</title>", escape_html(title))?;
        writeln!(
            out,
            "    <meta name=\"description\" content=\"{}\">",
            escape_html(description)
        )?;
        writeln!(
            out,
            "    <meta name=\"keywords\" content=\"{}\">",
            escape_html(keywords)
        )?;
        writeln!(out, "    <link rel=\"stylesheet\" href=\"{}\">", self.stylesheet)?;
        for css in metadata.css_files() {
            writeln!(out, "    <link rel=\"stylesheet\" href=\"{}\">", escape_html(css))?;
        }
        writeln!(out, "</head>")?;

        writeln!(out, "<body class=\"{}\">", self.theme_class)?;
        writeln!(out, "    <header class=\"site-header\">")?;
        writeln!(
            out,
            "        <h1 class=\"site-title\"><a href=\"/\">{}</a></h1>",
            SITE_NAME
        )?;
        writeln!(out, "        <nav class=\"site-nav\"><ul>")?;
        for (href, label) in NAV_LINKS {
            writeln!(out, "            <li><a href=\"{}\">{}</a></li>", href, label)?;
        }
        writeln!(out, "        </ul></nav>")?;
        writeln!(out, "    </header>")?;

        writeln!(out, "    <main class=\"main-content\">")?;
        out.push_str(bindings.content);
        writeln!(out)?;
        writeln!(out, "    </main>")?;

        writeln!(out, "    <footer class=\"site-footer\">")?;
        writeln!(
            out,
            "        <p>&copy; {} {}. All rights reserved.</p>",
            Local::now().year(),
            SITE_NAME
        )?;
        writeln!(out, "    </footer>")?;

        writeln!(out, "    <script src=\"{}\"></script>", self.script)?;
        for js in metadata.js_files() {
            writeln!(out, "    <script src=\"{}\"></script>", escape_html(js))?;
        }
        writeln!(out, "</body>")?;
        writeln!(out, "</html>")?;

        Ok(())
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

impl LayoutTemplate for SiteLayout {
    fn render(&self, bindings: &LayoutBindings<'_>) -> String {
        let mut out = String::with_capacity(bindings.content.len() + 2048);
        // writing into a String cannot fail
        let _ = self.write_page(&mut out, bindings);
        out
    }
}

pub fn create_site_layouts() -> anyhow::Result<LayoutComposer> {
    let mut composer = LayoutComposer::new();

    composer.register(
        "main",
        Box::new(SiteLayout::new(
            "theme-main",
            "/static/css/main.css",
            "/static/js/main.js",
        )),
    )?;

    composer.register(
        "green_layout",
        Box::new(SiteLayout::new(
            "theme-green",
            "/static/css/green_layout.css",
            "/static/js/green_layout.js",
        )),
    )?;

    composer.register(
        "blue_layout",
        Box::new(SiteLayout::new(
            "theme-blue",
            "/static/css/blue_layout.css",
            "/static/js/blue_layout.js",
        )),
    )?;

    Ok(composer)
}
