/// Element of a sequence ordered by an exclusive upper bound, such as spans
/// and shaped runs.
pub trait Bounded {
    /// Exclusive end offset of the element.
    fn limit(&self) -> usize;
}

/// Index of the first element whose limit exceeds `pos`.
///
/// `items` must be ordered by non-decreasing limit. Returns `items.len()`
/// when no element extends past `pos`.
pub fn find_bound<T: Bounded>(items: &[T], pos: usize) -> usize {
    items.partition_point(|item| item.limit() <= pos)
}
