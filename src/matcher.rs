use crate::pattern::{Pattern, Segment};
use crate::types::ParamMap;

/// Matches a request path against a compiled pattern. Returns the
/// parameter bindings on a match, `None` otherwise. A path segment
/// count mismatch is never a match; a trailing empty segment (from a
/// trailing `/`) is matched literally like any other segment rather than
/// silently stripped.
pub(crate) fn match_path(pattern: &Pattern, path: &str) -> Option<ParamMap> {
    let mut path_parts = path.split('/');
    path_parts.next(); // discard the leading empty element from the leading '/'
    let path_segments: Vec<&str> = path_parts.collect();

    if path_segments.len() != pattern.segments.len() {
        return None;
    }

    let mut params = ParamMap::with_capacity(pattern.segments.len());
    for (segment, value) in pattern.segments.iter().zip(path_segments.iter()) {
        match segment {
            Segment::Literal(literal) => {
                if literal.as_str() != *value {
                    return None;
                }
            }
            Segment::Param { name, regex } => {
                match regex {
                    Some(re) => {
                        if !re.is_match(value) {
                            return None;
                        }
                    }
                    None => {
                        if value.is_empty() {
                            return None;
                        }
                    }
                }
                params.set(name.clone(), *value);
            }
        }
    }

    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::compile;

    #[test]
    fn matches_literal_and_binds_params() {
        let pattern = compile("/users/{id:[0-9]+}").unwrap();
        let params = match_path(&pattern, "/users/42").unwrap();
        assert_eq!(params.get("id"), Some("42"));
        assert!(match_path(&pattern, "/users/abc").is_none());
    }

    #[test]
    fn rejects_segment_count_mismatch() {
        let pattern = compile("/users/{id}").unwrap();
        assert!(match_path(&pattern, "/users/1/extra").is_none());
        assert!(match_path(&pattern, "/users").is_none());
    }

    #[test]
    fn bare_param_rejects_empty_segment() {
        let pattern = compile("/users/{id}").unwrap();
        assert!(match_path(&pattern, "/users/").is_none());
    }

    #[test]
    fn pattern_round_trips_against_its_own_literal_substitution() {
        let pattern = compile("/orgs/{org}/repos/{repo:[a-z-]+}").unwrap();
        let params = match_path(&pattern, "/orgs/acme/repos/widgets").unwrap();
        assert_eq!(params.get("org"), Some("acme"));
        assert_eq!(params.get("repo"), Some("widgets"));
    }
}
