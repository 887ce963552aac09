use std::{collections::HashMap, fmt};

use getset::Getters;

use indexmap::IndexMap;

use log::{info, warn};

use serde::Deserialize;

use super::{merge_configurations, RoutePattern};

#[derive(thiserror::Error, Debug)]
pub enum RouteTableError {
    #[error("invalid route configuration: {0}")]
    InvalidConfiguration(#[from] serde_json::Error),

    #[error("invalid route pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// The request methods a route table can hold patterns for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn parse(method: &str) -> Option<Self> {
        match method {
            "GET" => Some(Self::Get),
            "POST" => Some(Self::Post),
            "PUT" => Some(Self::Put),
            "DELETE" => Some(Self::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Getters)]
#[getset(get = "pub")]
pub struct Route {
    pattern: String,
    handler_id: String,
    compiled: RoutePattern,
}

impl Route {
    fn new(pattern: String, handler_id: String) -> Result<Self, RouteTableError> {
        let compiled =
            RoutePattern::compile(&pattern).map_err(|source| RouteTableError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;

        Ok(Self {
            pattern,
            handler_id,
            compiled,
        })
    }
}

#[derive(Debug, Deserialize)]
struct RouteConfiguration {
    default: String,
    not_found: String,
    routes: IndexMap<String, IndexMap<String, String>>,
}

/// Method-partitioned routes plus the default and not-found handler ids.
///
/// Routes keep the order they were configured in; the first matching pattern
/// wins. A table is never modified once built.
#[derive(Debug, Getters)]
pub struct RouteTable {
    #[getset(get = "pub")]
    default_handler: String,

    #[getset(get = "pub")]
    not_found_handler: String,

    by_method: HashMap<Method, Vec<Route>>,
}

impl RouteTable {
    /// Builds a table by merging `partials` over the built-in default
    /// configuration.
    pub fn from_configurations<'a>(
        partials: impl IntoIterator<Item = &'a serde_json::Value>,
    ) -> Result<Self, RouteTableError> {
        Self::from_merged_configuration(merge_configurations(partials))
    }

    pub fn from_merged_configuration(
        configuration: serde_json::Value,
    ) -> Result<Self, RouteTableError> {
        let configuration: RouteConfiguration = serde_json::from_value(configuration)?;

        let mut by_method = HashMap::new();

        for (method_key, patterns) in configuration.routes {
            let method = match Method::parse(&method_key) {
                Some(method) => method,
                None => {
                    warn!(
                        "skipping {} routes for unsupported method '{}'",
                        patterns.len(),
                        method_key
                    );
                    continue;
                }
            };

            let routes = patterns
                .into_iter()
                .map(|(pattern, handler_id)| Route::new(pattern, handler_id))
                .collect::<Result<Vec<_>, _>>()?;

            by_method.insert(method, routes);
        }

        let table = Self {
            default_handler: configuration.default,
            not_found_handler: configuration.not_found,
            by_method,
        };

        info!(
            "route table default = '{}' not_found = '{}' routes = {}",
            table.default_handler,
            table.not_found_handler,
            table.len()
        );

        Ok(table)
    }

    /// The routes configured for `method`, in configuration order.
    pub fn routes(&self, method: Method) -> Option<&[Route]> {
        self.by_method.get(&method).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_method.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn method_parsing_is_exact() {
        assert_eq!(Method::parse("GET"), Some(Method::Get));
        assert_eq!(Method::parse("DELETE"), Some(Method::Delete));
        assert_eq!(Method::parse("get"), None);
        assert_eq!(Method::parse("PATCH"), None);
        assert_eq!(Method::Put.to_string(), "PUT");
    }

    #[test]
    fn default_table_is_empty() {
        let table = RouteTable::from_configurations(std::iter::empty()).unwrap();
        assert_eq!(table.default_handler(), "home");
        assert_eq!(table.not_found_handler(), "404");
        assert!(table.is_empty());
        assert_eq!(table.routes(Method::Get).map(<[Route]>::len), Some(0));
    }

    #[test]
    fn routes_keep_configuration_order() {
        let config = json!({
            "routes": {
                "GET": {"/b": "b", "/a/{id}": "a", "/c": "c"},
            }
        });
        let table = RouteTable::from_configurations([&config]).unwrap();

        let patterns: Vec<&str> = table
            .routes(Method::Get)
            .unwrap()
            .iter()
            .map(|route| route.pattern().as_str())
            .collect();
        assert_eq!(patterns, ["/b", "/a/{id}", "/c"]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn unsupported_methods_are_skipped() {
        let config = json!({"routes": {"PATCH": {"/a": "a"}}});
        let table = RouteTable::from_configurations([&config]).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_configuration_is_rejected() {
        let config = json!({"routes": {"GET": {"/a": 5}}});
        let result = RouteTable::from_configurations([&config]);
        assert!(matches!(
            result,
            Err(RouteTableError::InvalidConfiguration(_))
        ));
    }
}
