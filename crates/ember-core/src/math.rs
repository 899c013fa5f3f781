//! Integer math kernels shared by the economy's components.
//!
//! All arithmetic is integer-only for determinism. Pro-rata allocation
//! multiplies two u128 amounts before dividing, which can exceed 128 bits
//! at 10^18-unit scale, so the product is carried in 256 bits.

use crate::types::Amount;

/// `floor(a * b / d)` with a 256-bit intermediate product.
///
/// Returns `None` when `d == 0` or the quotient itself exceeds 128 bits.
pub fn mul_div(a: Amount, b: Amount, d: Amount) -> Option<Amount> {
    if d == 0 {
        return None;
    }
    let (hi, lo) = widening_mul(a, b);
    if hi == 0 {
        return Some(lo / d);
    }
    if hi >= d {
        // Quotient would need more than 128 bits.
        return None;
    }

    // Shift-subtract long division of the 256-bit product by d.
    // The remainder stays below d, so `2*rem + bit - d` fits in 128 bits
    // even when the doubling itself wrapped.
    let mut rem: u128 = 0;
    let mut quo: u128 = 0;
    for i in (0..256).rev() {
        let bit = if i >= 128 {
            (hi >> (i - 128)) & 1
        } else {
            (lo >> i) & 1
        };
        let carried = rem >> 127 != 0;
        rem = (rem << 1) | bit;
        if carried || rem >= d {
            rem = rem.wrapping_sub(d);
            quo = (quo << 1) | 1;
        } else {
            quo <<= 1;
        }
    }
    Some(quo)
}

/// Full 128×128 → 256-bit product as `(hi, lo)`.
fn widening_mul(a: u128, b: u128) -> (u128, u128) {
    const MASK: u128 = (1u128 << 64) - 1;
    let (a_hi, a_lo) = (a >> 64, a & MASK);
    let (b_hi, b_lo) = (b >> 64, b & MASK);

    let ll = a_lo * b_lo;
    let lh = a_lo * b_hi;
    let hl = a_hi * b_lo;
    let hh = a_hi * b_hi;

    let mid = (ll >> 64) + (lh & MASK) + (hl & MASK);
    let lo = (mid << 64) | (ll & MASK);
    let hi = hh + (lh >> 64) + (hl >> 64) + (mid >> 64);
    (hi, lo)
}
