use std::fmt::Write;

use super::PageContext;

pub(super) fn render(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_layout("main");
    context
        .metadata_mut()
        .set_title("Home - FastCGI Pages")
        .set_description("Welcome page")
        .add_js("/static/js/home.js");

    writeln!(context, "<section class=\"home\">")?;
    writeln!(context, "    <h1>Welcome</h1>")?;
    writeln!(
        context,
        "    <p>Every page on this site is resolved by the route table and rendered by a handler unit.</p>"
    )?;
    writeln!(context, "    <ul>")?;
    writeln!(context, "        <li><a href=\"/users\">Users</a></li>")?;
    writeln!(context, "        <li><a href=\"/test/1/hello\">Route parameters</a></li>")?;
    writeln!(context, "        <li><a href=\"/news\">News</a></li>")?;
    writeln!(context, "    </ul>")?;
    writeln!(context, "</section>")?;

    Ok(())
}
