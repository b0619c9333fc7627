//! `Word` abstracts the unsigned machine integer a modulus (and every residue)
//! is stored in: `u8`, `u16`, `u32`, `u64` or `u128`.
//!
//! The Montgomery radix is fixed by the choice of word: `R = 2^BITS`.

use core::fmt::Debug;
use num_traits::{ConstOne, ConstZero, PrimInt, WrappingAdd, WrappingMul, WrappingNeg, WrappingSub};
use subtle::{Choice, ConditionallySelectable};

/// Unsigned machine integer usable as the residue word of a Montgomery form.
///
/// Implemented for `u8` through `u128`. The supertraits come from
/// [`num_traits`]; the crate adds only what the REDC kernel needs on top:
/// a widening multiply, a double-width left shift and a branchless select.
pub trait Word:
    PrimInt
    + ConstZero
    + ConstOne
    + WrappingAdd
    + WrappingSub
    + WrappingMul
    + WrappingNeg
    + Debug
{
    /// Bit width of the word; the Montgomery radix is `R = 2^BITS`.
    const BITS: u32;

    /// Full multiply, returning `(low, high)` words of the double-width product.
    fn widening_mul(self, rhs: Self) -> (Self, Self);

    /// `self << shift` as a double-width `(low, high)` pair.
    ///
    /// Requires `shift < Self::BITS`.
    fn shl_wide(self, shift: u32) -> (Self, Self);

    /// Returns `a` when the choice is falsy, `b` when it is truthy.
    fn select(a: Self, b: Self, choice: Choice) -> Self;

    /// Truncating cast to `usize`, used for table indices that have already
    /// been masked down to a handful of low bits.
    fn low_usize(self) -> usize;
}

macro_rules! impl_word {
    ($t:ty, $wide:ty) => {
        impl Word for $t {
            const BITS: u32 = <$t>::BITS;

            #[inline(always)]
            fn widening_mul(self, rhs: Self) -> (Self, Self) {
                let product = (self as $wide) * (rhs as $wide);
                (product as $t, (product >> <$t>::BITS) as $t)
            }

            #[inline(always)]
            fn shl_wide(self, shift: u32) -> (Self, Self) {
                debug_assert!(shift < <$t>::BITS);
                // The two-step shift keeps `shift == 0` in range.
                ((self << shift), (self >> 1) >> (<$t>::BITS - 1 - shift))
            }

            #[inline(always)]
            fn select(a: Self, b: Self, choice: Choice) -> Self {
                <$t as ConditionallySelectable>::conditional_select(&a, &b, choice)
            }

            #[inline(always)]
            fn low_usize(self) -> usize {
                self as usize
            }
        }
    };
}

impl_word!(u8, u16);
impl_word!(u16, u32);
impl_word!(u32, u64);
impl_word!(u64, u128);

impl Word for u128 {
    const BITS: u32 = u128::BITS;

    /// Schoolbook product over 64-bit halves, since no wider native type exists.
    #[inline(always)]
    fn widening_mul(self, rhs: Self) -> (Self, Self) {
        const LO: u128 = (1 << 64) - 1;
        let (a0, a1) = (self & LO, self >> 64);
        let (b0, b1) = (rhs & LO, rhs >> 64);

        let p00 = a0 * b0;
        let p01 = a0 * b1;
        let p10 = a1 * b0;
        let p11 = a1 * b1;

        // mid <= 3 * (2^64 - 1), so it cannot overflow.
        let mid = (p00 >> 64) + (p01 & LO) + (p10 & LO);
        let lo = (p00 & LO) | (mid << 64);
        let hi = p11 + (p01 >> 64) + (p10 >> 64) + (mid >> 64);
        (lo, hi)
    }

    #[inline(always)]
    fn shl_wide(self, shift: u32) -> (Self, Self) {
        debug_assert!(shift < u128::BITS);
        ((self << shift), (self >> 1) >> (u128::BITS - 1 - shift))
    }

    /// `subtle` selects on 64-bit lanes; a 128-bit select is two of them.
    #[inline(always)]
    fn select(a: Self, b: Self, choice: Choice) -> Self {
        let lo = u64::conditional_select(&(a as u64), &(b as u64), choice);
        let hi = u64::conditional_select(&((a >> 64) as u64), &((b >> 64) as u64), choice);
        ((hi as u128) << 64) | (lo as u128)
    }

    #[inline(always)]
    fn low_usize(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::Word;
    use subtle::Choice;

    #[test]
    fn widening_mul_u64_matches_u128() {
        let a = 0xfedc_ba98_7654_3210_u64;
        let b = 0x0f1e_2d3c_4b5a_6978_u64;
        let (lo, hi) = a.widening_mul(b);
        let wide = (a as u128) * (b as u128);
        assert_eq!(lo, wide as u64);
        assert_eq!(hi, (wide >> 64) as u64);
    }

    #[test]
    fn widening_mul_u128_corners() {
        let (lo, hi) = u128::MAX.widening_mul(u128::MAX);
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        assert_eq!(lo, 1);
        assert_eq!(hi, u128::MAX - 1);

        let (lo, hi) = u128::MAX.widening_mul(0);
        assert_eq!((lo, hi), (0, 0));

        let a = 0x0123_4567_89ab_cdef_u128 << 64 | 0xfedc_ba98_7654_3210;
        let (lo, hi) = a.widening_mul(1);
        assert_eq!((lo, hi), (a, 0));
    }

    #[test]
    fn shl_wide_reassembles() {
        for shift in [0u32, 1, 7, 31, 63] {
            let x = 0x8000_0000_0000_0001_u64;
            let (lo, hi) = x.shl_wide(shift);
            let wide = (x as u128) << shift;
            assert_eq!(lo, wide as u64);
            assert_eq!(hi, (wide >> 64) as u64);
        }
    }

    #[test]
    fn select_u128() {
        let a = 1u128 << 100;
        let b = (7u128 << 64) | 3;
        assert_eq!(u128::select(a, b, Choice::from(0)), a);
        assert_eq!(u128::select(a, b, Choice::from(1)), b);
    }
}
