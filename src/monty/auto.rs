//! Default strategy selection at construction time.

use super::{FullRange, Monty, MontyParams, MontyValue, QuarterRange, SquaringValue};
use crate::tags::SchedulingTag;
use crate::word::Word;

/// Strategy chosen from the modulus at construction: [`QuarterRange`] when the
/// modulus fits below `R/4` (the common case, and the fastest multiply),
/// [`FullRange`] otherwise.
///
/// Use the monomorphic strategies directly when the modulus range is known
/// statically; this sum type trades a construction-time choice for one
/// enum dispatch inside each primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoRange<W: Word> {
    /// Modulus below `R/4`.
    Quarter(QuarterRange<W>),
    /// Any other odd modulus.
    Full(FullRange<W>),
}

impl<W: Word> Monty for AutoRange<W> {
    type Word = W;

    fn new(modulus: W) -> Self {
        if modulus <= QuarterRange::<W>::max_modulus() {
            Self::Quarter(QuarterRange::new(modulus))
        } else {
            Self::Full(FullRange::new(modulus))
        }
    }

    #[inline(always)]
    fn max_modulus() -> W {
        W::max_value()
    }

    #[inline(always)]
    fn params(&self) -> &MontyParams<W> {
        match self {
            Self::Quarter(m) => m.params(),
            Self::Full(m) => m.params(),
        }
    }

    #[inline(always)]
    fn value_bound(&self) -> W {
        match self {
            Self::Quarter(m) => m.value_bound(),
            Self::Full(m) => m.value_bound(),
        }
    }

    #[inline(always)]
    fn redc<P: SchedulingTag>(&self, u_hi: W, u_lo: W) -> W {
        match self {
            Self::Quarter(m) => m.redc::<P>(u_hi, u_lo),
            Self::Full(m) => m.redc::<P>(u_hi, u_lo),
        }
    }

    #[inline(always)]
    fn canonicalize_word(&self, w: W) -> W {
        match self {
            Self::Quarter(m) => m.canonicalize_word(w),
            Self::Full(m) => m.canonicalize_word(w),
        }
    }

    #[inline(always)]
    fn word_is_zero_residue(&self, w: W) -> bool {
        match self {
            Self::Quarter(m) => m.word_is_zero_residue(w),
            Self::Full(m) => m.word_is_zero_residue(w),
        }
    }

    // Forward the ops the inner strategies specialize.

    #[inline(always)]
    fn add(&self, x: MontyValue<W>, y: MontyValue<W>) -> MontyValue<W> {
        match self {
            Self::Quarter(m) => m.add(x, y),
            Self::Full(m) => m.add(x, y),
        }
    }

    #[inline(always)]
    fn two_times(&self, x: MontyValue<W>) -> MontyValue<W> {
        match self {
            Self::Quarter(m) => m.two_times(x),
            Self::Full(m) => m.two_times(x),
        }
    }

    #[inline(always)]
    fn squaring_value(&self, x: MontyValue<W>) -> SquaringValue<W> {
        match self {
            Self::Quarter(m) => m.squaring_value(x),
            Self::Full(m) => m.squaring_value(x),
        }
    }

    #[inline(always)]
    fn square_sv(&self, sv: SquaringValue<W>) -> SquaringValue<W> {
        match self {
            Self::Quarter(m) => m.square_sv(sv),
            Self::Full(m) => m.square_sv(sv),
        }
    }

    #[inline(always)]
    fn square_to_monty(&self, sv: SquaringValue<W>) -> MontyValue<W> {
        match self {
            Self::Quarter(m) => m.square_to_monty(sv),
            Self::Full(m) => m.square_to_monty(sv),
        }
    }
}
