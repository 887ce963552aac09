//! Maps an incoming (method, path) pair onto a handler id plus the route
//! parameters captured from the path.

mod matcher;
mod merge;
mod pattern;
mod sanitize;
mod table;

use indexmap::IndexMap;

pub use matcher::{match_request, MatchKind, MatchResult, MAX_PATH_LENGTH};
pub use merge::{default_route_configuration, merge_configuration, merge_configurations};
pub use pattern::RoutePattern;
pub use sanitize::{sanitize_param, MAX_PARAM_CHARS};
pub use table::{Method, Route, RouteTable, RouteTableError};

/// Route parameters in left-to-right pattern order, values already sanitized.
pub type RouteParams = IndexMap<String, String>;
