use rand::Rng;

/// Draws three donor indices `[a, b, c]` that are pairwise distinct and all
/// different from `target`.
///
/// Each index is redrawn uniformly from `[0, pool_size)` until it satisfies the
/// constraint. With `pool_size < 4` the loop cannot terminate.
pub(crate) fn distinct_donors<R: Rng + ?Sized>(
    target: usize,
    pool_size: usize,
    rng: &mut R,
) -> [usize; 3] {
    debug_assert!(pool_size >= 4, "donor selection needs at least 4 individuals");
    let mut a = target;
    while a == target {
        a = rng.random_range(0..pool_size);
    }
    let [b, c] = anchored_donors(target, a, pool_size, rng);
    [a, b, c]
}

/// Draws two indices `[b, c]` distinct from each other, from `anchor` and from
/// `target`. Passing `anchor == target` anchors the mutation on the target
/// itself (needs `pool_size >= 3`).
pub(crate) fn anchored_donors<R: Rng + ?Sized>(
    target: usize,
    anchor: usize,
    pool_size: usize,
    rng: &mut R,
) -> [usize; 2] {
    debug_assert!(pool_size >= 3, "donor selection needs at least 3 individuals");
    let mut b = target;
    while b == target || b == anchor {
        b = rng.random_range(0..pool_size);
    }
    let mut c = target;
    while c == target || c == anchor || c == b {
        c = rng.random_range(0..pool_size);
    }
    [b, c]
}
