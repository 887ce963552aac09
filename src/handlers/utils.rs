use crate::response::HttpResponse;

pub const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

pub fn build_html_response(status_code: http::StatusCode, body: String) -> HttpResponse {
    http::Response::builder()
        .status(status_code)
        .header(http::header::CONTENT_TYPE, HTML_CONTENT_TYPE)
        .body(Some(body))
        .unwrap()
}

pub fn build_status_code_response(status_code: http::StatusCode) -> HttpResponse {
    http::Response::builder()
        .status(status_code)
        .body(None)
        .unwrap()
}
