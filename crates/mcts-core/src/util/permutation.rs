//! Sorting several index-aligned sequences in lockstep.

use std::cmp::Ordering;

/// Returns the permutation that stably sorts `values` by `compare`.
///
/// Element `i` of the result is the index in `values` of the element that
/// belongs at position `i`. Equal elements keep their original order.
pub fn sort_permutation<T, F>(values: &[T], mut compare: F) -> Vec<usize>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut permutation: Vec<usize> = (0..values.len()).collect();
    permutation.sort_by(|&a, &b| compare(&values[a], &values[b]));
    permutation
}

/// Reorders `values` so that `values[i]` becomes the old `values[permutation[i]]`.
///
/// Works cycle by cycle with swaps, without allocating a second buffer.
///
/// # Panics
///
/// Panics if `permutation` is shorter than `values`.
pub fn apply_permutation_in_place<T>(values: &mut [T], permutation: &[usize]) {
    debug_assert_eq!(values.len(), permutation.len());

    let mut done = vec![false; values.len()];
    for start in 0..values.len() {
        if done[start] {
            continue;
        }
        done[start] = true;
        let mut prev = start;
        let mut next = permutation[start];
        while next != start {
            values.swap(prev, next);
            done[next] = true;
            prev = next;
            next = permutation[next];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_permutation_descending() {
        let values = [0.1f32, 0.5, 0.2, 0.2];
        let p = sort_permutation(&values, |a, b| b.total_cmp(a));
        assert_eq!(p, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_sort_permutation_is_stable() {
        let values = [1, 3, 1, 3, 1];
        let p = sort_permutation(&values, |a, b| b.cmp(a));
        assert_eq!(p, vec![1, 3, 0, 2, 4]);
    }

    #[test]
    fn test_apply_permutation_lockstep() {
        let policy = [0.1f32, 0.6, 0.3];
        let p = sort_permutation(&policy, |a, b| b.total_cmp(a));

        let mut sorted_policy = policy;
        let mut names = ["a", "b", "c"];
        let mut indices = [0usize, 1, 2];
        apply_permutation_in_place(&mut sorted_policy, &p);
        apply_permutation_in_place(&mut names, &p);
        apply_permutation_in_place(&mut indices, &p);

        assert_eq!(sorted_policy, [0.6, 0.3, 0.1]);
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(indices, [1, 2, 0]);
    }

    #[test]
    fn test_apply_permutation_long_cycle() {
        let mut values = vec![10, 20, 30, 40, 50];
        apply_permutation_in_place(&mut values, &[4, 0, 1, 2, 3]);
        assert_eq!(values, vec![50, 10, 20, 30, 40]);
    }

    #[test]
    fn test_empty() {
        let values: [f32; 0] = [];
        assert!(sort_permutation(&values, |a, b| a.total_cmp(b)).is_empty());
        let mut empty: Vec<u8> = Vec::new();
        apply_permutation_in_place(&mut empty, &[]);
    }
}
