//! Page slicing for long listings

/// Return page `page_number` (zero-based) of `items`.
///
/// Pages past the end, and a `page_size` of zero, yield an empty slice.
pub fn paginate<T>(items: &[T], page_size: usize, page_number: usize) -> &[T] {
    let start = page_number.saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Number of pages needed to show `len` items
#[must_use]
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        0
    } else {
        len.div_ceil(page_size)
    }
}
