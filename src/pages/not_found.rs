use std::fmt::Write;

use http::StatusCode;

use super::PageContext;

pub(super) fn render(context: &mut PageContext) -> anyhow::Result<()> {
    context.set_status(StatusCode::NOT_FOUND);
    context.set_layout("main");
    context
        .metadata_mut()
        .set_title("Page not found - 404")
        .add_css("/static/css/404.css");

    writeln!(context, "<div class=\"not-found\">")?;
    writeln!(context, "    <div class=\"error-code\">404</div>")?;
    writeln!(context, "    <h1 class=\"error-title\">Page not found</h1>")?;
    writeln!(
        context,
        "    <p class=\"error-message\">The page you asked for does not exist or has been removed.</p>"
    )?;
    writeln!(context, "    <a href=\"/\" class=\"back-link\">Back to home</a>")?;
    writeln!(context, "</div>")?;

    Ok(())
}
