//! Partitioning of the ordered page list into fixed-size groups.
//!
//! Group `g` (0-indexed) holds items `[g*size, min(g*size + size, len))`.
//! Only the final group can be shorter than `size`, and an empty list has
//! no groups at all.

/// Number of groups for `total` items: `ceil(total / group_size)`.
///
/// Returns 0 when `group_size` is 0; config validation rejects that earlier.
pub fn group_count(total: usize, group_size: usize) -> usize {
    if group_size == 0 {
        return 0;
    }
    total.div_ceil(group_size)
}

/// Split `items` into contiguous groups of at most `group_size`, in order.
pub fn partition<T>(items: &[T], group_size: usize) -> Vec<&[T]> {
    if group_size == 0 {
        return Vec::new();
    }
    items.chunks(group_size).collect()
}

/// 1-indexed page numbers held by 0-indexed group `group_index`.
pub fn pages_in_group(group_index: usize, group_len: usize, group_size: usize) -> Vec<usize> {
    let first = group_index * group_size + 1;
    (first..first + group_len).collect()
}
