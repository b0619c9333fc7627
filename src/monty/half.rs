//! Half-range strategy: odd moduli below `R/2`.

use super::{Monty, MontyParams, MontyValue};
use crate::reduction::redc_canonical;
use crate::tags::SchedulingTag;
use crate::word::Word;
use subtle::Choice;

/// Montgomery arithmetic for odd moduli below `R/2`.
///
/// Values stay in `[0, n)` like [`FullRange`](super::FullRange), but since
/// `x + y` can no longer overflow the word, addition and doubling drop to a
/// plain sum followed by one select, and canonicalization is free.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfRange<W: Word> {
    params: MontyParams<W>,
}

impl<W: Word> Monty for HalfRange<W> {
    type Word = W;

    fn new(modulus: W) -> Self {
        assert!(
            modulus <= Self::max_modulus(),
            "modulus must be below R/2 for the half-range strategy"
        );
        Self {
            params: MontyParams::new(modulus),
        }
    }

    #[inline(always)]
    fn max_modulus() -> W {
        // R/2 - 1
        W::max_value() >> 1usize
    }

    #[inline(always)]
    fn params(&self) -> &MontyParams<W> {
        &self.params
    }

    #[inline(always)]
    fn value_bound(&self) -> W {
        self.params.modulus
    }

    #[inline(always)]
    fn redc<P: SchedulingTag>(&self, u_hi: W, u_lo: W) -> W {
        redc_canonical(u_hi, u_lo, self.params.modulus, self.params.inv)
    }

    #[inline(always)]
    fn canonicalize_word(&self, w: W) -> W {
        debug_assert!(w < self.params.modulus);
        w
    }

    #[inline(always)]
    fn word_is_zero_residue(&self, w: W) -> bool {
        w == W::ZERO
    }

    // n < R/2 and x, y < n: the plain sum cannot wrap.
    #[inline(always)]
    fn add(&self, x: MontyValue<W>, y: MontyValue<W>) -> MontyValue<W> {
        debug_assert!(self.is_valid(x) && self.is_valid(y));
        let n = self.params.modulus;
        let sum = x.0.wrapping_add(&y.0);
        MontyValue(W::select(
            sum,
            sum.wrapping_sub(&n),
            Choice::from((sum >= n) as u8),
        ))
    }

    #[inline(always)]
    fn two_times(&self, x: MontyValue<W>) -> MontyValue<W> {
        self.add(x, x)
    }
}
