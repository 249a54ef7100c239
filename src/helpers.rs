use crate::prelude::*;
use percent_encoding::percent_decode_str;

/// Percent-decodes a request path, the same helper the upstream router
/// calls before matching it against any route's regex.
pub(crate) fn percent_decode_request_path(path: &str) -> crate::Result<String> {
    percent_decode_str(path)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .context("Couldn't percent decode request path")
}

/// Joins a base path and a user-supplied pattern so that exactly one `/`
/// separates them, normalizing away trailing slashes on the base.
pub(crate) fn join_paths(base: &str, rest: &str) -> String {
    let base = base.trim_end_matches('/');
    let rest = rest.trim_start_matches('/');
    match (base.is_empty(), rest.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", rest),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, rest),
    }
}

/// True iff `path` is `base_path` or falls strictly under it as a path
/// segment (`base_path` followed by `/`), used by subrouter descent.
pub(crate) fn is_prefix_match(base_path: &str, path: &str) -> bool {
    if path == base_path {
        return true;
    }
    let mut prefix = base_path.to_string();
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    path.starts_with(&prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_paths_normalizes_trailing_and_leading_slashes() {
        assert_eq!(join_paths("/admin/", "/dashboard"), "/admin/dashboard");
        assert_eq!(join_paths("/admin", "dashboard"), "/admin/dashboard");
        assert_eq!(join_paths("", "/users"), "/users");
        assert_eq!(join_paths("/admin", ""), "/admin");
        assert_eq!(join_paths("", ""), "/");
    }

    #[test]
    fn prefix_match_respects_segment_boundaries() {
        assert!(is_prefix_match("/admin", "/admin"));
        assert!(is_prefix_match("/admin", "/admin/dashboard"));
        assert!(!is_prefix_match("/admin", "/administrator"));
    }
}
