//! Montgomery reduction (REDC) of a double-width value to a single word.
//!
//! This is the subtractive REDC using the *positive* inverse `n^-1 mod R`:
//! with `m = u_lo * n^-1 mod R`, the product `m * n` has the same low word as
//! `u`, so `t = u - m*n` is an exact multiple of `R` and
//! `t / R ≡ u * R^-1 (mod n)` with `-n < t/R < n`. Only the high word of
//! `m * n` is ever computed.

use crate::word::Word;
use subtle::Choice;

/// Core REDC step. Returns the wrapped high word of `(u - m*n) / R` together
/// with the borrow flag (set when the signed quotient is negative).
///
/// Requires `u = u_hi * R + u_lo < n * R`, i.e. `u_hi < n`.
#[inline(always)]
pub(crate) fn redc_nonfinalized<W: Word>(u_hi: W, u_lo: W, n: W, inv_n: W) -> (W, bool) {
    debug_assert!(n & W::ONE == W::ONE);
    debug_assert!(n.wrapping_mul(&inv_n) == W::ONE);
    debug_assert!(u_hi < n);

    let m = u_lo.wrapping_mul(&inv_n);
    let (_, mn_hi) = m.widening_mul(n);
    (u_hi.wrapping_sub(&mn_hi), u_hi < mn_hi)
}

/// REDC finalized to the canonical range `[0, n)`: adds `n` back when the
/// non-finalized quotient was negative.
#[inline(always)]
pub(crate) fn redc_canonical<W: Word>(u_hi: W, u_lo: W, n: W, inv_n: W) -> W {
    let (t, borrow) = redc_nonfinalized(u_hi, u_lo, n, inv_n);
    let result = W::select(t, t.wrapping_add(&n), Choice::from(borrow as u8));
    debug_assert!(result < n);
    result
}

/// REDC finalized to `(0, 2n)` with an unconditional add of `n`.
///
/// Valid whenever `n < R/2`: the non-finalized quotient lies in `(-n, n)`, so
/// `t + n` lands in `(0, 2n)` without inspecting the borrow. The quarter-range
/// strategy (`n < R/4`) relies on this to drop the final select from its
/// multiply.
#[inline(always)]
pub(crate) fn redc_extended<W: Word>(u_hi: W, u_lo: W, n: W, inv_n: W) -> W {
    debug_assert!(n < W::ONE << ((W::BITS - 1) as usize));
    let (t, _) = redc_nonfinalized(u_hi, u_lo, n, inv_n);
    let result = t.wrapping_add(&n);
    debug_assert!(W::ZERO < result && result < n.wrapping_add(&n));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inv_mod::inverse_mod_r;

    fn reference_redc(u: u128, n: u64) -> u64 {
        // u * R^-1 mod n, via (u + k*n) / R for the k that clears the low word
        let r_inv = {
            // (2^64)^-1 mod n by modular exponentiation of 2^64 ≡ r
            let r = ((1u128 << 64) % n as u128) as u64;
            crate::inv_mod::invert_mod(r % n, n).expect("R is a unit mod odd n")
        };
        ((u % n as u128) * r_inv as u128 % n as u128) as u64
    }

    #[test]
    fn redc_matches_reference() {
        for n in [3u64, 13, (1 << 61) - 1, (1 << 62) - 1, u64::MAX - 4] {
            let inv = inverse_mod_r(n);
            for x in [0u64, 1, 2, n / 2, n - 1] {
                for y in [1u64, 2, n - 1, n / 3 + 1] {
                    let u = x as u128 * y as u128;
                    let (lo, hi) = ((u as u64), (u >> 64) as u64);
                    assert_eq!(redc_canonical(hi, lo, n, inv), reference_redc(u, n));
                }
            }
        }
    }

    #[test]
    fn extended_form_is_congruent() {
        let n = (1u64 << 61) - 1; // fits well below R/2
        let inv = inverse_mod_r(n);
        for x in [1u64, 5, n - 1] {
            for y in [2u64, n - 2] {
                let u = x as u128 * y as u128;
                let (lo, hi) = ((u as u64), (u >> 64) as u64);
                let canonical = redc_canonical(hi, lo, n, inv);
                let extended = redc_extended(hi, lo, n, inv);
                assert!(extended > 0 && extended < 2 * n);
                assert_eq!(extended % n, canonical);
            }
        }
    }
}
