use http::StatusCode;

use crate::layout::escape_html;

use super::RenderedPage;

/// The last resort when neither the requested unit nor the not-found unit
/// exists. Builds its document inline and cannot fail.
pub fn respond_not_found(requested_id: &str) -> RenderedPage {
    let body = format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         \x20   <meta charset=\"UTF-8\">\n\
         \x20   <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         \x20   <title>Page not found - 404</title>\n\
         </head>\n\
         <body>\n\
         \x20   <h1>404 - Page not found</h1>\n\
         \x20   <p>The requested page does not exist: '{}'</p>\n\
         </body>\n\
         </html>\n",
        escape_html(requested_id)
    );

    RenderedPage::new(StatusCode::NOT_FOUND, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_the_requested_id() {
        let page = respond_not_found("users/missing");
        assert_eq!(page.status(), &StatusCode::NOT_FOUND);
        assert!(page.body().starts_with("<!DOCTYPE html>\n"));
        assert!(page.body().contains("'users/missing'"));
    }

    #[test]
    fn requested_id_is_escaped() {
        let page = respond_not_found("<script>");
        assert!(page.body().contains("'&lt;script&gt;'"));
        assert!(!page.body().contains("<script>"));
    }
}
