use crate::prelude::*;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

/// One `/`-delimited element of a compiled pattern: either a literal that
/// must match exactly, or a named parameter with an optional anchored
/// regex.
#[derive(Clone)]
pub(crate) enum Segment {
    Literal(String),
    Param { name: String, regex: Option<Regex> },
}

impl fmt::Debug for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Literal(lit) => write!(f, "Literal({:?})", lit),
            Segment::Param { name, regex } => {
                write!(f, "Param({:?}, regex={:?})", name, regex.as_ref().map(Regex::as_str))
            }
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Segment) -> bool {
        match (self, other) {
            (Segment::Literal(a), Segment::Literal(b)) => a == b,
            (
                Segment::Param { name: n1, regex: r1 },
                Segment::Param { name: n2, regex: r2 },
            ) => n1 == n2 && r1.as_ref().map(Regex::as_str) == r2.as_ref().map(Regex::as_str),
            _ => false,
        }
    }
}

/// A compiled path pattern: an ordered sequence of [`Segment`]s plus the
/// original pattern text, kept around for diagnostics and OpenAPI-style
/// collaborators. Two patterns are equal iff their segment sequences are
/// element-wise equal.
#[derive(Clone)]
pub struct Pattern {
    raw: String,
    pub(crate) segments: Vec<Segment>,
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.raw)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.segments == other.segments
    }
}

impl Pattern {
    /// The pattern text this `Pattern` was compiled from.
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

/// Compiles a `/`-rooted path pattern into a [`Pattern`].
///
/// Grammar per segment: a bare literal matches itself case-sensitively;
/// `{name}` captures any non-empty segment; `{name:regex}` captures only
/// when `regex`, anchored as `^(?:regex)$`, matches the whole segment.
pub(crate) fn compile(pattern: &str) -> crate::Result<Pattern> {
    if !pattern.starts_with('/') {
        return Err(Error::new(format!(
            "pattern '{}' must start with '/'",
            pattern
        )));
    }

    let mut seen_names: HashSet<String> = HashSet::new();
    let mut segments = Vec::new();

    let mut parts = pattern.split('/');
    parts.next(); // the leading '/' produces an empty first element, discard it

    for part in parts {
        segments.push(compile_segment(part, &mut seen_names)?);
    }

    Ok(Pattern {
        raw: pattern.to_string(),
        segments,
    })
}

fn compile_segment(part: &str, seen_names: &mut HashSet<String>) -> crate::Result<Segment> {
    if let Some(stripped) = part.strip_prefix('{') {
        let inner = stripped.strip_suffix('}').ok_or_else(|| {
            Error::new(format!("malformed parameter segment '{{{}' (missing closing brace)", stripped))
        })?;

        let (name, regex_src) = match inner.find(':') {
            Some(idx) => (&inner[..idx], Some(&inner[idx + 1..])),
            None => (inner, None),
        };

        if name.is_empty() {
            return Err(Error::new(format!("parameter name is empty in segment '{{{}}}'", inner)));
        }

        if !seen_names.insert(name.to_string()) {
            return Err(Error::new(format!("duplicate parameter name '{}' in pattern", name)));
        }

        let regex = match regex_src {
            Some(src) if !src.is_empty() => {
                let anchored = format!("^(?:{})$", src);
                let compiled = Regex::new(&anchored)
                    .context(format!("invalid regex for parameter '{}'", name))?;
                Some(compiled)
            }
            _ => None,
        };

        Ok(Segment::Param {
            name: name.to_string(),
            regex,
        })
    } else if part.contains('{') || part.contains('}') {
        Err(Error::new(format!("malformed brace pair in segment '{}'", part)))
    } else {
        Ok(Segment::Literal(part.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_literal_and_param_segments() {
        let pattern = compile("/users/{id}/posts").unwrap();
        assert_eq!(pattern.segments.len(), 3);
        assert_eq!(pattern.segments[0], Segment::Literal("users".into()));
        assert!(matches!(&pattern.segments[1], Segment::Param { name, regex } if name == "id" && regex.is_none()));
        assert_eq!(pattern.segments[2], Segment::Literal("posts".into()));
    }

    #[test]
    fn compiles_regex_param_anchored() {
        let pattern = compile("/users/{id:[0-9]+}").unwrap();
        match &pattern.segments[1] {
            Segment::Param { regex: Some(re), .. } => {
                assert!(re.is_match("42"));
                assert!(!re.is_match("4a"));
                assert!(!re.is_match("4/2"));
            }
            _ => panic!("expected a regex param segment"),
        }
    }

    #[test]
    fn rejects_duplicate_parameter_names() {
        let err = compile("/a/{x}/b/{x}").unwrap_err();
        assert!(err.to_string().contains("duplicate parameter"));
    }

    #[test]
    fn rejects_empty_parameter_name() {
        assert!(compile("/a/{}").is_err());
    }

    #[test]
    fn rejects_malformed_braces() {
        assert!(compile("/a/{oops").is_err());
        assert!(compile("/a/oops}").is_err());
    }

    #[test]
    fn rejects_invalid_regex() {
        assert!(compile("/a/{id:(}").is_err());
    }

    #[test]
    fn two_patterns_are_equal_iff_segments_match() {
        let a = compile("/users/{id:[0-9]+}").unwrap();
        let b = compile("/users/{id:[0-9]+}").unwrap();
        let c = compile("/users/{user_id:[0-9]+}").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
