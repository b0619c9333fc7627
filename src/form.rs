//! The user-facing Montgomery form façade.

use crate::monty::{CanonicalValue, FusingValue, Monty, MontyValue, SquaringValue};
use crate::tags::SchedulingTag;
use crate::word::Word;
use crate::{pow, two_pow};

/// Montgomery arithmetic modulo one odd modulus, fixed at construction.
///
/// The strategy parameter `M` fixes the residue range and word width; use the
/// [`MontgomeryAuto`] alias unless the modulus range is known statically.
/// Conversions in and out of the Montgomery domain cost one reduction each,
/// so the intended pattern is: convert inputs once, compose the in-domain
/// primitives at will, convert the handful of final results back out.
///
/// All operations are variable-time; this crate is not meant for secret data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontgomeryForm<M: Monty> {
    pub(crate) monty: M,
}

/// [`MontgomeryForm`] over the full-range strategy: any odd modulus.
pub type MontgomeryFull<W> = MontgomeryForm<crate::monty::FullRange<W>>;

/// [`MontgomeryForm`] over the half-range strategy: modulus below `R/2`.
pub type MontgomeryHalf<W> = MontgomeryForm<crate::monty::HalfRange<W>>;

/// [`MontgomeryForm`] over the quarter-range strategy: modulus below `R/4`.
pub type MontgomeryQuarter<W> = MontgomeryForm<crate::monty::QuarterRange<W>>;

/// [`MontgomeryForm`] with the strategy chosen from the modulus at runtime.
pub type MontgomeryAuto<W> = MontgomeryForm<crate::monty::AutoRange<W>>;

impl<M: Monty> MontgomeryForm<M> {
    /// Sets up Montgomery arithmetic modulo `modulus`.
    ///
    /// Panics when `modulus` is even, below 3, or beyond the strategy's
    /// [`max_modulus`](Self::max_modulus).
    pub fn new(modulus: M::Word) -> Self {
        Self {
            monty: M::new(modulus),
        }
    }

    /// Largest modulus the strategy `M` admits.
    pub fn max_modulus() -> M::Word {
        M::max_modulus()
    }

    /// Returns the modulus.
    #[inline]
    pub fn modulus(&self) -> M::Word {
        self.monty.modulus()
    }

    /// Converts `a` into the Montgomery domain. Requires `0 <= a < modulus`.
    ///
    /// The result may not be canonical; use [`to_canonical`](Self::to_canonical)
    /// before comparing.
    #[inline]
    pub fn convert_in(&self, a: M::Word) -> MontyValue<M::Word> {
        self.monty.convert_in(a)
    }

    /// Converts a Montgomery value back to an ordinary residue in
    /// `[0, modulus)`.
    #[inline]
    pub fn convert_out(&self, x: MontyValue<M::Word>) -> M::Word {
        self.monty.convert_out(x)
    }

    /// The unique representative of `x`'s residue class; the only value kind
    /// that supports equality tests.
    #[inline]
    pub fn to_canonical(&self, x: MontyValue<M::Word>) -> CanonicalValue<M::Word> {
        self.monty.to_canonical(x)
    }

    /// Prepares `x` for use as the addend/subtrahend of the fused operations.
    #[inline]
    pub fn to_fusing(&self, x: MontyValue<M::Word>) -> FusingValue<M::Word> {
        self.monty.to_fusing(x)
    }

    /// The canonical Montgomery form of 1.
    #[inline]
    pub fn one(&self) -> CanonicalValue<M::Word> {
        self.monty.one()
    }

    /// The canonical Montgomery form of 0.
    #[inline]
    pub fn zero(&self) -> CanonicalValue<M::Word> {
        self.monty.zero()
    }

    /// The canonical Montgomery form of `modulus - 1`.
    #[inline]
    pub fn neg_one(&self) -> CanonicalValue<M::Word> {
        self.monty.neg_one()
    }

    /// Modular sum.
    #[inline]
    pub fn add(&self, x: MontyValue<M::Word>, y: MontyValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.add(x, y)
    }

    /// Modular sum of canonical values; the result stays canonical.
    #[inline]
    pub fn add_canonical(
        &self,
        x: CanonicalValue<M::Word>,
        y: CanonicalValue<M::Word>,
    ) -> CanonicalValue<M::Word> {
        self.monty.add_canonical(x, y)
    }

    /// Modular difference `x - y`.
    #[inline]
    pub fn subtract(&self, x: MontyValue<M::Word>, y: MontyValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.subtract(x, y)
    }

    /// Modular difference of canonical values; the result stays canonical.
    #[inline]
    pub fn subtract_canonical(
        &self,
        x: CanonicalValue<M::Word>,
        y: CanonicalValue<M::Word>,
    ) -> CanonicalValue<M::Word> {
        self.monty.subtract_canonical(x, y)
    }

    /// Either `x - y` or `y - x`, unspecified which; cheaper than
    /// [`subtract`](Self::subtract) when the caller does not care.
    #[inline]
    pub fn unordered_subtract(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
    ) -> MontyValue<M::Word> {
        self.monty.unordered_subtract(x, y)
    }

    /// Modular negation.
    #[inline]
    pub fn negate(&self, x: MontyValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.negate(x)
    }

    /// Modular negation of a canonical value; the result stays canonical.
    #[inline]
    pub fn negate_canonical(&self, x: CanonicalValue<M::Word>) -> CanonicalValue<M::Word> {
        self.monty.negate_canonical(x)
    }

    /// Modular doubling.
    #[inline]
    pub fn two_times(&self, x: MontyValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.two_times(x)
    }

    /// Modular doubling of a canonical value; the result stays canonical.
    #[inline]
    pub fn two_times_canonical(&self, x: CanonicalValue<M::Word>) -> CanonicalValue<M::Word> {
        self.monty.two_times_canonical(x)
    }

    /// Modular halving: returns `y` with `y + y ≡ x`.
    #[inline]
    pub fn div_by_2(&self, x: MontyValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.div_by_2(x)
    }

    /// Modular halving of a canonical value; the result stays canonical.
    #[inline]
    pub fn div_by_2_canonical(&self, x: CanonicalValue<M::Word>) -> CanonicalValue<M::Word> {
        self.monty.div_by_2_canonical(x)
    }

    /// Division by `2^k` (multiplication by its modular inverse). Requires
    /// `k <= Word::BITS`.
    #[inline]
    pub fn div_by_2k(&self, x: CanonicalValue<M::Word>, k: u32) -> MontyValue<M::Word> {
        self.monty.div_by_2k(x, k)
    }

    /// Modular product. The tag picks among equivalent schedules; see
    /// [`LowLatency`](crate::LowLatency) and [`LowUops`](crate::LowUops).
    #[inline]
    pub fn multiply<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.multiply::<P>(x, y)
    }

    /// Modular product plus a flag that is true exactly when the product is
    /// the zero residue.
    #[inline]
    pub fn multiply_is_zero<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        _tag: P,
    ) -> (MontyValue<M::Word>, bool) {
        self.monty.multiply_is_zero::<P>(x, y)
    }

    /// Modular square.
    #[inline]
    pub fn square<P: SchedulingTag>(&self, x: MontyValue<M::Word>, _tag: P) -> MontyValue<M::Word> {
        self.monty.square::<P>(x)
    }

    /// Fused multiply-add `x * y + z` under a single reduction.
    #[inline]
    pub fn fmadd<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        z: CanonicalValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fmadd::<P>(x, y, z)
    }

    /// Fused multiply-subtract `x * y - z` under a single reduction.
    #[inline]
    pub fn fmsub<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        z: CanonicalValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fmsub::<P>(x, y, z)
    }

    /// [`fmadd`](Self::fmadd) taking a prepared fusing operand.
    #[inline]
    pub fn fmadd_fusing<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        z: FusingValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fmadd_fusing::<P>(x, y, z)
    }

    /// [`fmsub`](Self::fmsub) taking a prepared fusing operand.
    #[inline]
    pub fn fmsub_fusing<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        y: MontyValue<M::Word>,
        z: FusingValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fmsub_fusing::<P>(x, y, z)
    }

    /// Fused square-add `x^2 + z` under a single reduction.
    #[inline]
    pub fn fused_square_add<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        z: CanonicalValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fused_square_add::<P>(x, z)
    }

    /// Fused square-subtract `x^2 - z` under a single reduction.
    #[inline]
    pub fn fused_square_sub<P: SchedulingTag>(
        &self,
        x: MontyValue<M::Word>,
        z: CanonicalValue<M::Word>,
        _tag: P,
    ) -> MontyValue<M::Word> {
        self.monty.fused_square_sub::<P>(x, z)
    }

    /// Modular multiplicative inverse, or `None` when `gcd(x, modulus) != 1`.
    ///
    /// Callers that need to distinguish the non-invertible cases should use
    /// [`gcd_with_modulus`](Self::gcd_with_modulus).
    #[inline]
    pub fn inverse(&self, x: MontyValue<M::Word>) -> Option<CanonicalValue<M::Word>> {
        self.monty.inverse(x)
    }

    /// Applies the supplied gcd over plain words to `x`'s canonical
    /// representative and the modulus; equals `gcd(x_int, modulus)`.
    #[inline]
    pub fn gcd_with_modulus<F>(&self, x: MontyValue<M::Word>, gcd: F) -> M::Word
    where
        F: Fn(M::Word, M::Word) -> M::Word,
    {
        self.monty.gcd_with_modulus(x, gcd)
    }

    /// Ordinary remainder `a mod modulus`; `a` may be any word value.
    #[inline]
    pub fn remainder(&self, a: M::Word) -> M::Word {
        self.monty.remainder(a)
    }

    /// True when `x` lies in the strategy's value range.
    #[inline]
    pub fn is_valid(&self, x: MontyValue<M::Word>) -> bool {
        self.monty.is_valid(x)
    }

    /// Starts a lazily-finalized squaring chain at `x`.
    #[inline]
    pub fn squaring_value(&self, x: MontyValue<M::Word>) -> SquaringValue<M::Word> {
        self.monty.squaring_value(x)
    }

    /// One squaring inside the lazy domain.
    #[inline]
    pub fn square_sv(&self, sv: SquaringValue<M::Word>) -> SquaringValue<M::Word> {
        self.monty.square_sv(sv)
    }

    /// Final squaring of a lazy chain, back to a Montgomery value.
    #[inline]
    pub fn square_to_monty(&self, sv: SquaringValue<M::Word>) -> MontyValue<M::Word> {
        self.monty.square_to_monty(sv)
    }

    /// `base^exponent` by 2^k-ary windowed exponentiation with the default
    /// window (16 table entries) and sliding-window zero-skip enabled.
    ///
    /// See [`pow_2kary`](crate::pow_2kary) to pick the parameters per call.
    #[inline]
    pub fn pow<E: Word>(&self, base: MontyValue<M::Word>, exponent: E) -> MontyValue<M::Word> {
        pow::pow_2kary::<M, E, 16, true>(self, base, exponent)
    }

    /// `2^exponent` by the specialized base-2 engine: wide windows assembled
    /// from REDC entry points and small tables of powers of `R`, with the
    /// sliding-window zero-skip enabled.
    ///
    /// See [`two_pow_wide_window`](crate::two_pow_wide_window) and
    /// [`two_pow`](crate::two_pow) to pick the parameters per call.
    #[inline]
    pub fn two_pow<E: Word>(&self, exponent: E) -> MontyValue<M::Word> {
        two_pow::two_pow_wide_window::<M, E, true, false>(self, exponent)
    }
}
