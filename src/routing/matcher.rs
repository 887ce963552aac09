use getset::Getters;

use crate::request::RequestDescriptor;

use super::{Method, Route, RouteParams, RouteTable};

/// Paths longer than this many characters never match.
pub const MAX_PATH_LENGTH: usize = 2048;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchKind {
    /// The normalized path was empty.
    Default,
    /// A pattern equal to the path, with or without its leading slash.
    Exact,
    /// A pattern with placeholders matched.
    Parameterized,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct MatchResult {
    handler_id: String,
    params: RouteParams,
    kind: MatchKind,
}

impl MatchResult {
    fn new(handler_id: &str, params: RouteParams, kind: MatchKind) -> Self {
        Self {
            handler_id: handler_id.to_owned(),
            params,
            kind,
        }
    }

    fn not_found(table: &RouteTable) -> Self {
        Self::new(table.not_found_handler(), RouteParams::new(), MatchKind::NotFound)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == MatchKind::NotFound
    }

}

/// Resolves a request against `table`.
///
/// An empty path always yields the default handler. Otherwise literal
/// patterns are tried first, then every pattern in configuration order; the
/// first hit wins. No match, an unknown method, or a path that looks like a
/// traversal attempt all yield the not-found handler.
pub fn match_request(descriptor: &RequestDescriptor, table: &RouteTable) -> MatchResult {
    let path = descriptor.normalized_path().as_str();

    if path.is_empty() {
        return MatchResult::new(table.default_handler(), RouteParams::new(), MatchKind::Default);
    }

    if !is_safe_path(path) {
        return MatchResult::not_found(table);
    }

    let routes = match Method::parse(descriptor.method()).and_then(|method| table.routes(method)) {
        Some(routes) => routes,
        None => return MatchResult::not_found(table),
    };

    let path_with_slash = format!("/{}", path);

    if let Some(route) = find_exact(routes, path, &path_with_slash) {
        return MatchResult::new(route.handler_id(), RouteParams::new(), MatchKind::Exact);
    }

    for route in routes {
        let captured = route
            .compiled()
            .captures(&path_with_slash)
            .or_else(|| route.compiled().captures(path));

        if let Some(params) = captured {
            return MatchResult::new(route.handler_id(), params, MatchKind::Parameterized);
        }
    }

    MatchResult::not_found(table)
}

fn find_exact<'a>(routes: &'a [Route], path: &str, path_with_slash: &str) -> Option<&'a Route> {
    routes
        .iter()
        .find(|route| route.pattern() == path)
        .or_else(|| routes.iter().find(|route| route.pattern() == path_with_slash))
}

fn is_safe_path(path: &str) -> bool {
    path.chars().count() <= MAX_PATH_LENGTH && !path.contains("../") && !path.contains("..\\")
}
