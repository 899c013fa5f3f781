//! Integer square root.

/// Floor of the square root of `n`, by Newton iteration.
///
/// The initial guess `2^(ceil(log2(n)/2))` is always at or above the
/// root, and the iteration decreases strictly until it crosses it, so
/// the loop terminates in at most `log2(n)` steps.
pub fn isqrt(n: u128) -> u128 {
    if n < 2 {
        return n;
    }
    let mut x = 1u128 << (n.ilog2() / 2 + 1);
    loop {
        let y = (x + n / x) / 2;
        if y >= x {
            return x;
        }
        x = y;
    }
}
