use std::fmt::Write;

use super::PageContext;

pub(super) fn render(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("main");
    context
        .metadata_mut()
        .set_title("About - FastCGI Pages")
        .set_description("How requests become pages")
        .set_keywords("about, routing, layouts");

    writeln!(context, "<section class=\"about\">")?;
    writeln!(context, "    <h1>About</h1>")?;
    writeln!(
        context,
        "    <p>Requests arrive over FastCGI, are matched against the route table, dispatched to a handler unit and wrapped in the layout that unit asks for.</p>"
    )?;
    writeln!(context, "</section>")?;

    Ok(())
}
