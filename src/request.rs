use std::collections::HashMap;

use getset::Getters;

use percent_encoding::percent_decode_str;

use tokio::io::AsyncWrite;

use crate::server::ConnectionID;

pub type ParamKeyValue<'a> = (&'a str, &'a str);

const DEFAULT_METHOD: &str = "GET";
const DEFAULT_REQUEST_URI: &str = "/";

/// Borrowed view of one FastCGI request as handed over by the web server.
#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct FastCGIRequest<'a> {
    connection_id: ConnectionID,
    role: &'a str,
    request_id: u16,
    params: Vec<ParamKeyValue<'a>>,
}

impl<'a> FastCGIRequest<'a> {
    pub fn new<W: AsyncWrite + Unpin>(
        connection_id: ConnectionID,
        request: &'a tokio_fastcgi::Request<W>,
    ) -> Self {
        let role = match request.role {
            tokio_fastcgi::Role::Authorizer => "Authorizer",
            tokio_fastcgi::Role::Filter => "Filter",
            tokio_fastcgi::Role::Responder => "Responder",
        };

        let params: Vec<ParamKeyValue> = match request.str_params_iter() {
            Some(iter) => iter
                .map(|v| (v.0, v.1.unwrap_or("[Invalid UTF8]")))
                .collect(),
            None => Vec::new(),
        };

        Self {
            connection_id,
            role,
            request_id: request.get_request_id(),
            params,
        }
    }

    pub fn descriptor(&self) -> RequestDescriptor {
        RequestDescriptor::from_params(self.params.iter().copied())
    }
}

/// Method and path of a request, derived once and never changed afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct RequestDescriptor {
    method: String,
    raw_path: String,
    normalized_path: String,
}

impl RequestDescriptor {
    pub fn new(method: impl Into<String>, raw_path: impl Into<String>) -> Self {
        let raw_path = raw_path.into();
        let normalized_path = normalize_path(&raw_path);

        Self {
            method: method.into(),
            raw_path,
            normalized_path,
        }
    }

    /// Derives the descriptor from CGI-style server params.
    ///
    /// Param names are matched case-insensitively. The path is taken from
    /// `UNENCODED_URL`, then `ORIG_PATH_INFO` (plus `QUERY_STRING`), then
    /// `REQUEST_URI`, using the first one that is set and non-empty.
    pub fn from_params<'a>(params: impl IntoIterator<Item = ParamKeyValue<'a>>) -> Self {
        let params: HashMap<String, &str> = params
            .into_iter()
            .map(|(key, value)| (key.to_ascii_lowercase(), value))
            .collect();

        let non_empty = |key: &str| params.get(key).copied().filter(|value| !value.is_empty());

        let raw_path = if let Some(unencoded_url) = non_empty("unencoded_url") {
            unencoded_url.to_owned()
        } else if let Some(path_info) = non_empty("orig_path_info") {
            match non_empty("query_string") {
                Some(query_string) => format!("{}?{}", path_info, query_string),
                None => path_info.to_owned(),
            }
        } else {
            params
                .get("request_uri")
                .copied()
                .unwrap_or(DEFAULT_REQUEST_URI)
                .to_owned()
        };

        let method = params
            .get("request_method")
            .copied()
            .unwrap_or(DEFAULT_METHOD);

        Self::new(method, raw_path)
    }
}

fn normalize_path(raw_path: &str) -> String {
    let (path, query) = match raw_path.split_once('?') {
        Some((path, query)) => (path.to_owned(), Some(query)),
        None => (raw_path.to_owned(), None),
    };

    // a `url` query parameter overrides the path (rewrite front controllers)
    let path = query
        .and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == "url")
                .last()
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or(path);

    url_decode(&path).trim_matches('/').to_owned()
}

fn url_decode(value: &str) -> String {
    let plus_as_space = value.replace('+', " ");
    percent_decode_str(&plus_as_space)
        .decode_utf8_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from(params: &[(&str, &str)]) -> RequestDescriptor {
        RequestDescriptor::from_params(params.iter().copied())
    }

    #[test]
    fn request_uri_is_normalized() {
        let descriptor = from(&[("request_method", "GET"), ("request_uri", "/users/detail/42/")]);
        assert_eq!(descriptor.method(), "GET");
        assert_eq!(descriptor.raw_path(), "/users/detail/42/");
        assert_eq!(descriptor.normalized_path(), "users/detail/42");
    }

    #[test]
    fn defaults_without_params() {
        let descriptor = from(&[]);
        assert_eq!(descriptor.method(), "GET");
        assert_eq!(descriptor.raw_path(), "/");
        assert_eq!(descriptor.normalized_path(), "");
    }

    #[test]
    fn query_string_is_dropped() {
        let descriptor = from(&[("REQUEST_URI", "/users?page=2")]);
        assert_eq!(descriptor.normalized_path(), "users");
    }

    #[test]
    fn path_is_url_decoded() {
        let descriptor = from(&[("request_uri", "/test/hello%20world/a+b/%E7%94%A8")]);
        assert_eq!(descriptor.normalized_path(), "test/hello world/a b/用");
    }

    #[test]
    fn encoded_traversal_is_visible_after_decoding() {
        let descriptor = from(&[("request_uri", "/files/%2e%2e%2fetc")]);
        assert_eq!(descriptor.normalized_path(), "files/../etc");
    }

    #[test]
    fn unencoded_url_takes_priority() {
        let descriptor = from(&[
            ("request_uri", "/index.php"),
            ("orig_path_info", "/from-path-info"),
            ("unencoded_url", "/about"),
        ]);
        assert_eq!(descriptor.raw_path(), "/about");
        assert_eq!(descriptor.normalized_path(), "about");
    }

    #[test]
    fn orig_path_info_carries_query_string() {
        let descriptor = from(&[
            ("request_uri", "/index.php"),
            ("unencoded_url", ""),
            ("orig_path_info", "/index.php"),
            ("query_string", "url=/users/detail/7"),
        ]);
        assert_eq!(descriptor.raw_path(), "/index.php?url=/users/detail/7");
        assert_eq!(descriptor.normalized_path(), "users/detail/7");
    }

    #[test]
    fn url_query_parameter_overrides_path() {
        let descriptor = from(&[("request_uri", "/index.php?a=1&url=%2Fnews%2F&url=/about")]);
        assert_eq!(descriptor.normalized_path(), "about");

        let descriptor = from(&[("request_uri", "/index.php?url=%2Fnews%2F")]);
        assert_eq!(descriptor.normalized_path(), "news");
    }

    #[test]
    fn method_is_kept_verbatim() {
        let descriptor = from(&[("REQUEST_METHOD", "DELETE"), ("REQUEST_URI", "/x")]);
        assert_eq!(descriptor.method(), "DELETE");
    }
}
