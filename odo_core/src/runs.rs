//! Contiguous-run extraction over ascending index sets.

/// Split ascending `indices` into maximal runs of consecutive integers,
/// returned as inclusive `(start, end)` pairs.
pub fn contiguous_runs(indices: &[usize]) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut iter = indices.iter().copied();
    let Some(first) = iter.next() else {
        return out;
    };
    let (mut start, mut end) = (first, first);
    for i in iter {
        if end.checked_add(1) == Some(i) {
            end = i;
        } else {
            out.push((start, end));
            start = i;
            end = i;
        }
    }
    out.push((start, end));
    out
}
