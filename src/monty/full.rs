//! Full-range strategy: any odd modulus the word can hold.

use super::{Monty, MontyParams};
use crate::reduction::redc_canonical;
use crate::tags::SchedulingTag;
use crate::word::Word;

/// Montgomery arithmetic for any odd modulus up to `R - 1`.
///
/// Values are kept fully reduced in `[0, n)`; the multiply pays for this with
/// a conditional add after each reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FullRange<W: Word> {
    params: MontyParams<W>,
}

impl<W: Word> Monty for FullRange<W> {
    type Word = W;

    fn new(modulus: W) -> Self {
        Self {
            params: MontyParams::new(modulus),
        }
    }

    #[inline(always)]
    fn max_modulus() -> W {
        W::max_value()
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

    // Values are already in [0, n).
    #[inline(always)]
    fn canonicalize_word(&self, w: W) -> W {
        debug_assert!(w < self.params.modulus);
        w
    }

    #[inline(always)]
    fn word_is_zero_residue(&self, w: W) -> bool {
        w == W::ZERO
    }
}
