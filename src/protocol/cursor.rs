//! Cursor pagination over a time-ordered feed.
//!
//! # Design Decisions
//! - Items must arrive already sorted descending by their start timestamp;
//!   the paginator filters and slices but never sorts
//! - All paging state is caller-supplied, nothing is retained between calls
//! - `after`/`before` are strict bounds, so `after = previous nextCursor`
//!   pages forward without overlap

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Items a cursor can page over: keyed by a start instant, optionally
/// open-ended.
pub trait Chronological {
    fn start(&self) -> DateTime<Utc>;
    fn end(&self) -> Option<DateTime<Utc>>;
}

/// Caller-supplied paging state.
#[derive(Debug, Clone, Copy, Default)]
pub struct CursorQuery {
    pub after: Option<DateTime<Utc>>,
    pub before: Option<DateTime<Utc>>,
    pub limit: i64,
    pub active: bool,
}

/// One slice of the feed plus the cursor to continue from.
#[derive(Debug, Serialize)]
pub struct CursorResult<T> {
    pub items: Vec<T>,
    #[serde(rename = "nextCursor", skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<DateTime<Utc>>,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Slice a descending-ordered feed by cursor.
///
/// Filtering order: `after` (strictly greater start), `before` (strictly
/// less start), then `active` (items without an end). The first `limit`
/// survivors are returned; `limit` is clamped to a minimum of 1.
pub fn paginate<T: Chronological + Clone>(query: &CursorQuery, items: &[T]) -> CursorResult<T> {
    let limit = query.limit.max(1) as usize;
    let filtered: Vec<&T> = items
        .iter()
        .filter(|item| query.after.map_or(true, |after| item.start() > after))
        .filter(|item| query.before.map_or(true, |before| item.start() < before))
        .filter(|item| !query.active || item.end().is_none())
        .collect();
    let has_more = filtered.len() > limit;
    let sliced: Vec<T> = filtered.into_iter().take(limit).cloned().collect();
    let next_cursor = sliced.last().map(Chronological::start);
    CursorResult {
        items: sliced,
        next_cursor,
        has_more,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        start: DateTime<Utc>,
        end: Option<DateTime<Utc>>,
    }

    impl Chronological for Entry {
        fn start(&self) -> DateTime<Utc> {
            self.start
        }
        fn end(&self) -> Option<DateTime<Utc>> {
            self.end
        }
    }

    fn at(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn entry(start: &str) -> Entry {
        Entry {
            start: at(start),
            end: Some(at(start) + chrono::Duration::hours(1)),
        }
    }

    /// Three days of history, newest first.
    fn feed() -> Vec<Entry> {
        vec![
            entry("2024-01-05T00:00:00Z"),
            entry("2024-01-04T00:00:00Z"),
            entry("2024-01-03T00:00:00Z"),
        ]
    }

    #[test]
    fn test_limit_slices_prefix_and_reports_more() {
        let result = paginate(
            &CursorQuery {
                limit: 2,
                ..Default::default()
            },
            &feed(),
        );
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[0].start, at("2024-01-05T00:00:00Z"));
        assert_eq!(result.items[1].start, at("2024-01-04T00:00:00Z"));
        assert_eq!(result.next_cursor, Some(at("2024-01-04T00:00:00Z")));
        assert!(result.has_more);
    }

    #[test]
    fn test_after_is_strict() {
        let result = paginate(
            &CursorQuery {
                after: Some(at("2024-01-04T00:00:00Z")),
                limit: 10,
                ..Default::default()
            },
            &feed(),
        );
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].start, at("2024-01-05T00:00:00Z"));
        assert!(!result.has_more);
    }

    #[test]
    fn test_before_is_strict() {
        let result = paginate(
            &CursorQuery {
                before: Some(at("2024-01-04T00:00:00Z")),
                limit: 10,
                ..Default::default()
            },
            &feed(),
        );
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].start, at("2024-01-03T00:00:00Z"));
    }

    #[test]
    fn test_active_keeps_only_open_ended() {
        let mut items = feed();
        items[0].end = None;
        let result = paginate(
            &CursorQuery {
                limit: 10,
                active: true,
                ..Default::default()
            },
            &items,
        );
        assert_eq!(result.items.len(), 1);
        assert!(result.items[0].end.is_none());
    }

    #[test]
    fn test_empty_slice_has_no_cursor() {
        let result = paginate(
            &CursorQuery {
                after: Some(at("2024-01-06T00:00:00Z")),
                limit: 5,
                ..Default::default()
            },
            &feed(),
        );
        assert!(result.items.is_empty());
        assert_eq!(result.next_cursor, None);
        assert!(!result.has_more);
    }

    #[test]
    fn test_limit_clamped_to_one() {
        let result = paginate(
            &CursorQuery {
                limit: -7,
                ..Default::default()
            },
            &feed(),
        );
        assert_eq!(result.items.len(), 1);
    }

    #[test]
    fn test_paging_forward_with_before_is_disjoint() {
        // Descending feeds page toward the past with before = nextCursor.
        let first = paginate(
            &CursorQuery {
                limit: 2,
                ..Default::default()
            },
            &feed(),
        );
        let second = paginate(
            &CursorQuery {
                before: first.next_cursor,
                limit: 2,
                ..Default::default()
            },
            &feed(),
        );
        assert_eq!(second.items.len(), 1);
        for older in &second.items {
            for newer in &first.items {
                assert!(older.start < newer.start);
            }
        }
        assert!(!second.has_more);
    }
}
