//! Conversion of full URLs and relative paths into transport paths.
//!
//! Transports take paths relative to the client's base URL (`zaken/123`).
//! Callers often hold full resource URLs instead, sometimes pointing at a
//! different service mounted under the same path convention.

use url::Url;

use crate::types::{QueryParams, QueryValue};

/// Check if a string is a full URL (starts with http:// or https://).
pub fn is_full_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Join path segments with `/`, trimming slashes and skipping empty parts.
pub fn join_path<S: AsRef<str>>(parts: &[S]) -> String {
    parts
        .iter()
        .map(|p| p.as_ref().trim_matches('/'))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Strip `prefix` from `s` only at a path-segment boundary.
fn strip_segment_prefix<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Drop the query string and fragment.
fn strip_query(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Resolve `.` and `..` segments without climbing above the first segment.
fn remove_dot_segments(path: &str) -> String {
    if !path.split('/').any(|seg| seg == "." || seg == "..") {
        return path.to_string();
    }
    let mut segments: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(seg),
        }
    }
    segments.join("/")
}

/// Normalizes URLs against one base URL.
#[derive(Debug, Clone)]
pub struct UrlNormalizer {
    /// Base URL without trailing slash.
    base_url: String,
    /// Path component of the base URL, without surrounding slashes.
    base_path: String,
}

impl UrlNormalizer {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        let base_path = if is_full_url(&base_url) {
            Url::parse(&base_url)
                .map(|u| u.path().trim_matches('/').to_string())
                .unwrap_or_default()
        } else {
            base_url.trim_matches('/').to_string()
        };
        Self {
            base_url,
            base_path,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Path component of the base URL (`api/v1` for `https://host/api/v1/`).
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Convert a full URL or relative path into a path relative to the base URL.
    ///
    /// The query string is dropped; use [`extract_query_params`](Self::extract_query_params)
    /// to keep it. Dot segments are resolved, so the result never points
    /// above the base URL.
    pub fn normalize_to_path(&self, url: &str) -> String {
        remove_dot_segments(&self.relative_path(strip_query(url)))
    }

    fn relative_path(&self, url: &str) -> String {
        if is_full_url(url) {
            if let Some(rest) = strip_segment_prefix(url, &self.base_url) {
                return rest.trim_start_matches('/').to_string();
            }
            // Foreign host: keep the path and strip our own mount prefix.
            return match Url::parse(url) {
                Ok(parsed) => self.strip_base_path(parsed.path().trim_start_matches('/')),
                Err(_) => url.to_string(),
            };
        }

        self.strip_base_path(url.trim_start_matches('/'))
    }

    fn strip_base_path(&self, path: &str) -> String {
        if self.base_path.is_empty() {
            return path.to_string();
        }
        if path.trim_end_matches('/') == self.base_path {
            return String::new();
        }
        match strip_segment_prefix(path, &self.base_path) {
            Some(rest) => rest.trim_start_matches('/').to_string(),
            None => path.to_string(),
        }
    }

    /// Split a URL into its normalized path and parsed query parameters.
    ///
    /// Keys occurring once map to [`QueryValue::Single`], repeated keys to
    /// [`QueryValue::Multi`] in order of appearance. Blank values
    /// (`status=`) are dropped.
    pub fn extract_query_params(&self, url: &str) -> (String, QueryParams) {
        let (path_part, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut params = QueryParams::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let value = value.into_owned();
            match params.remove(key.as_ref()) {
                None => {
                    params.insert(key.into_owned(), QueryValue::Single(value));
                }
                Some(QueryValue::Single(first)) => {
                    params.insert(key.into_owned(), QueryValue::Multi(vec![first, value]));
                }
                Some(QueryValue::Multi(mut values)) => {
                    values.push(value);
                    params.insert(key.into_owned(), QueryValue::Multi(values));
                }
            }
        }

        (self.normalize_to_path(path_part), params)
    }
}
