use regex::Regex;

use super::{sanitize_param, RouteParams};

const PLACEHOLDER_REGEX: &str = r"\{([^/}]+)\}";

/// A compiled route pattern such as `/users/detail/{id}`.
///
/// Literal text must match verbatim and each `{name}` placeholder captures
/// one or more non-`/` characters. The whole candidate must match.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    regex: Regex,
    param_names: Vec<String>,
}

impl RoutePattern {
    pub fn compile(pattern: &str) -> Result<Self, regex::Error> {
        let placeholder = Regex::new(PLACEHOLDER_REGEX)?;

        let mut regex_string = String::with_capacity(pattern.len() + 16);
        let mut param_names = Vec::new();
        let mut literal_start = 0;

        regex_string.push('^');
        for captures in placeholder.captures_iter(pattern) {
            let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
                continue;
            };
            regex_string.push_str(&regex::escape(&pattern[literal_start..whole.start()]));
            regex_string.push_str("([^/]+)");
            param_names.push(name.as_str().to_owned());
            literal_start = whole.end();
        }
        regex_string.push_str(&regex::escape(&pattern[literal_start..]));
        regex_string.push('$');

        Ok(Self {
            regex: Regex::new(&regex_string)?,
            param_names,
        })
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// Returns the sanitized parameters when `candidate` matches.
    pub fn captures(&self, candidate: &str) -> Option<RouteParams> {
        let captures = self.regex.captures(candidate)?;

        let mut params = RouteParams::with_capacity(self.param_names.len());
        for (index, name) in self.param_names.iter().enumerate() {
            if let Some(value) = captures.get(index + 1) {
                // a repeated name keeps its first position, the later value wins
                params.insert(name.clone(), sanitize_param(value.as_str()));
            }
        }

        Some(params)
    }
}
