//! Offset pagination.

use serde::Serialize;

/// One page of a collection plus the offsets that produced it.
#[derive(Debug, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total: usize,
}

/// Slice `items` by 1-based page number and page size.
///
/// Non-positive `page` or `size` are treated as 1, not as errors. A page
/// past the end of the data yields an empty slice; `total` is always the
/// length of the full collection passed in.
pub fn paginate<T: Clone>(page: i64, size: i64, items: &[T]) -> PageResult<T> {
    let page = page.max(1) as usize;
    let size = size.max(1) as usize;
    let start = (page - 1) * size;
    PageResult {
        items: items.iter().skip(start).take(size).cloned().collect(),
        page,
        size,
        total: items.len(),
    }
}
