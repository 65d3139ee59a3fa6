//! Path pattern compilation and extraction.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// One compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// Must match the request segment byte for byte.
    Literal(String),
    /// Matches any single non-empty segment and captures it under a name.
    Param(String),
}

/// A `/`-delimited path pattern with `:name` placeholders, compiled into
/// segment matchers at construction.
///
/// Matching requires the full path: same segment count, same literal
/// content. No prefix matching and no trailing-slash normalization.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: impl Into<String>) -> Self {
        let raw = pattern.into();
        let segments = raw
            .split('/')
            .map(|part| match part.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(part.to_string()),
            })
            .collect();
        Self { raw, segments }
    }

    /// The pattern string as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `path` (already stripped of any query string) satisfies the
    /// pattern exactly.
    pub fn matches(&self, path: &str) -> bool {
        let mut parts = path.split('/');
        let mut segments = self.segments.iter();
        loop {
            match (segments.next(), parts.next()) {
                (None, None) => return true,
                (Some(Segment::Literal(literal)), Some(part)) if literal == part => {}
                (Some(Segment::Param(_)), Some(part)) if !part.is_empty() => {}
                _ => return false,
            }
        }
    }

    /// Extract `:name` captures from a path that matches.
    ///
    /// Duplicate parameter names are not rejected; the last occurrence
    /// wins.
    pub fn capture(&self, path: &str) -> HashMap<String, String> {
        self.segments
            .iter()
            .zip(path.split('/'))
            .filter_map(|(segment, part)| match segment {
                Segment::Param(name) => Some((name.clone(), part.to_string())),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// Parse a query string into a map.
///
/// Pairs split on `&` then `=`; a key without `=` yields an empty value;
/// values are percent-decoded; duplicate keys keep the last occurrence.
pub fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(query) = query else {
        return map;
    };
    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let value = percent_decode_str(value).decode_utf8_lossy().into_owned();
        map.insert(key.to_string(), value);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern_matches_exactly() {
        let pattern = PathPattern::parse("/api/v1/machines");
        assert!(pattern.matches("/api/v1/machines"));
        assert!(!pattern.matches("/api/v1/machines/"));
        assert!(!pattern.matches("/api/v1"));
        assert!(!pattern.matches("/api/v1/machines/icht1"));
    }

    #[test]
    fn test_param_segment_matches_one_segment() {
        let pattern = PathPattern::parse("/machines/:machineId/alerts");
        assert!(pattern.matches("/machines/icht1/alerts"));
        assert!(!pattern.matches("/machines/icht1/x/alerts"));
        assert!(!pattern.matches("/machines//alerts"));
    }

    #[test]
    fn test_capture_extracts_params_by_position() {
        let pattern = PathPattern::parse("/machines/:machineId/alerts/:alertId");
        let params = pattern.capture("/machines/icht1/alerts/a-17");
        assert_eq!(params["machineId"], "icht1");
        assert_eq!(params["alertId"], "a-17");
    }

    #[test]
    fn test_duplicate_param_names_last_wins() {
        let pattern = PathPattern::parse("/pair/:id/:id");
        let params = pattern.capture("/pair/first/second");
        assert_eq!(params["id"], "second");
    }

    #[test]
    fn test_parse_query_basics() {
        let query = parse_query(Some("page=2&size=10"));
        assert_eq!(query["page"], "2");
        assert_eq!(query["size"], "10");
    }

    #[test]
    fn test_parse_query_key_without_equals() {
        let query = parse_query(Some("active&limit=5"));
        assert_eq!(query["active"], "");
        assert_eq!(query["limit"], "5");
    }

    #[test]
    fn test_parse_query_percent_decodes_values() {
        let query = parse_query(Some("from=now%2D1h&keys=voltage%2Ccosphi"));
        assert_eq!(query["from"], "now-1h");
        assert_eq!(query["keys"], "voltage,cosphi");
    }

    #[test]
    fn test_parse_query_duplicate_key_last_wins() {
        let query = parse_query(Some("page=1&page=3"));
        assert_eq!(query["page"], "3");
    }

    #[test]
    fn test_parse_query_absent() {
        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
    }
}
