use std::fmt::Write;

use serde_json::json;

use crate::layout::escape_html;

use super::PageContext;

const HEADLINES: [(&str, &str); 3] = [
    ("2024-03-01", "Route tables now keep configuration order"),
    ("2024-02-12", "Blue & green layouts available"),
    ("2024-01-20", "First release"),
];

pub(super) fn render(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("blue_layout");
    context
        .metadata_mut()
        .set_title("News - FastCGI Pages")
        .set_data("headline_count", json!(HEADLINES.len()));

    writeln!(context, "<section class=\"news\">")?;
    writeln!(context, "    <h1>News</h1>")?;
    writeln!(context, "    <ul>")?;
    for (date, headline) in HEADLINES {
        writeln!(
            context,
            "        <li><time>{}</time> {}</li>",
            date,
            escape_html(headline)
        )?;
    }
    writeln!(context, "    </ul>")?;
    writeln!(context, "</section>")?;

    Ok(())
}
