//! Residue-range strategies backing [`MontgomeryForm`](crate::MontgomeryForm).
//!
//! A strategy owns the precomputed [`MontyParams`] for one odd modulus and
//! fixes the numeric range Montgomery values are kept in:
//!
//! - [`FullRange`]: any odd modulus up to `R - 1`, values in `[0, n)`;
//! - [`HalfRange`]: modulus below `R/2`, values in `[0, n)` with cheaper
//!   addition/doubling and a free canonicalization;
//! - [`QuarterRange`]: modulus below `R/4`, values in `[0, 2n)`, letting the
//!   multiply skip its final reduction select;
//! - [`AutoRange`]: picks Quarter when the modulus permits, Full otherwise.
//!
//! Values are not interchangeable between strategies with different ranges.

mod auto;
mod full;
mod half;
mod quarter;

pub use auto::AutoRange;
pub use full::FullRange;
pub use half::HalfRange;
pub use quarter::QuarterRange;

use crate::add_mod::{add_mod_sched, modular_add_prereduced};
use crate::div_by_2::div_by_2_mod;
use crate::inv_mod::{inverse_mod_r, invert_mod};
use crate::reduction::redc_canonical;
use crate::sub_mod::{absolute_difference, modular_sub_prereduced, sub_mod_sched};
use crate::tags::{LowLatency, SchedulingTag};
use crate::word::Word;
use core::fmt::Debug;
use num_traits::ConstZero;

/// An element of `Z/nZ` in Montgomery representation.
///
/// The stored word is `(x * R) mod b` for some strategy-dependent bound `b`;
/// two `MontyValue`s may encode the same residue, so the type deliberately
/// does not implement `PartialEq`. Convert to a [`CanonicalValue`] to compare.
#[derive(Clone, Copy, Debug)]
pub struct MontyValue<W: Word>(pub(crate) W);

/// A Montgomery value normalized to `[0, n)`; the unique representative of
/// its residue class, and therefore the only value kind with equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CanonicalValue<W: Word>(pub(crate) W);

/// A canonical-range value prepared for use as the third operand of the fused
/// multiply-add/sub operations.
#[derive(Clone, Copy, Debug)]
pub struct FusingValue<W: Word>(pub(crate) W);

/// A lazily-finalized intermediate for chains of squarings.
///
/// Produced by [`Monty::squaring_value`]; each [`Monty::square_sv`] keeps the
/// raw reduction output, and [`Monty::square_to_monty`] re-finalizes. Only
/// meaningful for the strategy instance that created it.
#[derive(Clone, Copy, Debug)]
pub struct SquaringValue<W: Word>(pub(crate) W);

impl<W: Word> From<CanonicalValue<W>> for MontyValue<W> {
    #[inline(always)]
    fn from(value: CanonicalValue<W>) -> Self {
        MontyValue(value.0)
    }
}

impl<W: Word> From<FusingValue<W>> for MontyValue<W> {
    #[inline(always)]
    fn from(value: FusingValue<W>) -> Self {
        MontyValue(value.0)
    }
}

/// Precomputed constants for one odd modulus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MontyParams<W: Word> {
    /// The modulus `n`; odd, at least 3.
    pub(crate) modulus: W,
    /// `n^-1 mod R` (the odd inverse, used by REDC).
    pub(crate) inv: W,
    /// `R mod n`: the Montgomery representation of 1.
    pub(crate) r: W,
    /// `R^2 mod n`: conversion-in factor; also the Montgomery form of `R`.
    pub(crate) r2: W,
    /// `R^3 mod n`: feeds the modular inverse and the shifted-`R` REDC entry.
    pub(crate) r3: W,
}

impl<W: Word> MontyParams<W> {
    /// Precomputes the parameter set for `modulus`.
    ///
    /// Panics when `modulus` is even or below 3.
    pub fn new(modulus: W) -> Self {
        assert!(modulus & W::ONE == W::ONE, "modulus must be odd");
        assert!(modulus > W::ONE, "modulus must be at least 3");

        let inv = inverse_mod_r(modulus);
        // R mod n == (R - n) mod n, and R - n is just the wrapped negation.
        let r = modulus.wrapping_neg() % modulus;
        let mut r2 = r;
        for _ in 0..W::BITS {
            r2 = modular_add_prereduced(r2, r2, modulus);
        }
        // REDC(r2 * r2) == R^4 / R == R^3 (mod n)
        let (lo, hi) = r2.widening_mul(r2);
        let r3 = redc_canonical(hi, lo, modulus, inv);

        Self {
            modulus,
            inv,
            r,
            r2,
            r3,
        }
    }

    /// Returns the modulus this parameter set was built for.
    #[inline(always)]
    pub fn modulus(&self) -> W {
        self.modulus
    }
}

/// The capability set shared by all residue-range strategies.
///
/// The handful of required methods fix the strategy's range and reduction
/// flavor; everything else is provided on top of them.
pub trait Monty: Copy + Clone + Debug + PartialEq + Eq {
    /// The word type residues are stored in.
    type Word: Word;

    /// Builds the strategy for `modulus`.
    ///
    /// Panics when `modulus` is even, below 3 or above [`Self::max_modulus`].
    fn new(modulus: Self::Word) -> Self;

    /// Largest modulus this strategy admits.
    fn max_modulus() -> Self::Word;

    /// The precomputed constants.
    fn params(&self) -> &MontyParams<Self::Word>;

    /// Exclusive upper bound of the value range (`n` or `2n`).
    fn value_bound(&self) -> Self::Word;

    /// REDC of the double-width input `(u_hi, u_lo)`, finalized to this
    /// strategy's value range. Requires `u_hi < n`.
    fn redc<P: SchedulingTag>(&self, u_hi: Self::Word, u_lo: Self::Word) -> Self::Word;

    /// Maps a raw in-range word to its canonical representative in `[0, n)`.
    fn canonicalize_word(&self, w: Self::Word) -> Self::Word;

    /// True when the raw in-range word encodes the zero residue.
    fn word_is_zero_residue(&self, w: Self::Word) -> bool;

    /// Returns the modulus.
    #[inline(always)]
    fn modulus(&self) -> Self::Word {
        self.params().modulus
    }

    /// True when `x` lies in this strategy's value range.
    #[inline(always)]
    fn is_valid(&self, x: MontyValue<Self::Word>) -> bool {
        x.0 < self.value_bound()
    }

    /// Converts `a` into Montgomery form. Requires `0 <= a < n`.
    #[inline]
    fn convert_in(&self, a: Self::Word) -> MontyValue<Self::Word> {
        let p = self.params();
        assert!(a < p.modulus, "convert_in input must be below the modulus");
        let (lo, hi) = a.widening_mul(p.r2);
        MontyValue(self.redc::<LowLatency>(hi, lo))
    }

    /// Converts a Montgomery value back to an ordinary residue in `[0, n)`.
    #[inline]
    fn convert_out(&self, x: MontyValue<Self::Word>) -> Self::Word {
        debug_assert!(self.is_valid(x));
        let p = self.params();
        redc_canonical(<Self::Word>::ZERO, x.0, p.modulus, p.inv)
    }

    /// Normalizes `x` to the unique representative of its residue class.
    #[inline(always)]
    fn to_canonical(&self, x: MontyValue<Self::Word>) -> CanonicalValue<Self::Word> {
        debug_assert!(self.is_valid(x));
        CanonicalValue(self.canonicalize_word(x.0))
    }

    /// Prepares `x` for use as the third operand of `fmadd`/`fmsub`.
    #[inline(always)]
    fn to_fusing(&self, x: MontyValue<Self::Word>) -> FusingValue<Self::Word> {
        debug_assert!(self.is_valid(x));
        FusingValue(self.canonicalize_word(x.0))
    }

    /// The canonical Montgomery form of 1.
    #[inline(always)]
    fn one(&self) -> CanonicalValue<Self::Word> {
        CanonicalValue(self.params().r)
    }

    /// The canonical Montgomery form of 0.
    #[inline(always)]
    fn zero(&self) -> CanonicalValue<Self::Word> {
        CanonicalValue(<Self::Word>::ZERO)
    }

    /// The canonical Montgomery form of `n - 1`.
    #[inline(always)]
    fn neg_one(&self) -> CanonicalValue<Self::Word> {
        let p = self.params();
        CanonicalValue(p.modulus - p.r)
    }

    /// The Montgomery form of `R` itself (numerically `R^2 mod n`); canonical.
    ///
    /// Multiplying a canonical value by this builds the extra factor of `R`
    /// that [`Self::two_pow_limited_times_x`] expects.
    #[inline(always)]
    fn montvalue_r(&self) -> CanonicalValue<Self::Word> {
        CanonicalValue(self.params().r2)
    }

    /// Modular sum of two Montgomery values.
    #[inline(always)]
    fn add(&self, x: MontyValue<Self::Word>, y: MontyValue<Self::Word>) -> MontyValue<Self::Word> {
        MontyValue(modular_add_prereduced(x.0, y.0, self.value_bound()))
    }

    /// Modular sum of two canonical values; stays canonical.
    #[inline(always)]
    fn add_canonical(
        &self,
        x: CanonicalValue<Self::Word>,
        y: CanonicalValue<Self::Word>,
    ) -> CanonicalValue<Self::Word> {
        CanonicalValue(modular_add_prereduced(x.0, y.0, self.params().modulus))
    }

    /// Modular difference `x - y`.
    #[inline(always)]
    fn subtract(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        MontyValue(modular_sub_prereduced(x.0, y.0, self.value_bound()))
    }

    /// Modular difference of two canonical values; stays canonical.
    #[inline(always)]
    fn subtract_canonical(
        &self,
        x: CanonicalValue<Self::Word>,
        y: CanonicalValue<Self::Word>,
    ) -> CanonicalValue<Self::Word> {
        CanonicalValue(modular_sub_prereduced(x.0, y.0, self.params().modulus))
    }

    /// Either `x - y` or `y - x`, whichever requires no reduction.
    #[inline(always)]
    fn unordered_subtract(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        MontyValue(absolute_difference(x.0, y.0))
    }

    /// Modular negation `0 - x`.
    #[inline(always)]
    fn negate(&self, x: MontyValue<Self::Word>) -> MontyValue<Self::Word> {
        MontyValue(modular_sub_prereduced(<Self::Word>::ZERO, x.0, self.value_bound()))
    }

    /// Modular negation of a canonical value; stays canonical.
    #[inline(always)]
    fn negate_canonical(&self, x: CanonicalValue<Self::Word>) -> CanonicalValue<Self::Word> {
        CanonicalValue(modular_sub_prereduced(
            <Self::Word>::ZERO,
            x.0,
            self.params().modulus,
        ))
    }

    /// Modular doubling.
    #[inline(always)]
    fn two_times(&self, x: MontyValue<Self::Word>) -> MontyValue<Self::Word> {
        self.add(x, x)
    }

    /// Modular doubling of a canonical value; stays canonical.
    #[inline(always)]
    fn two_times_canonical(&self, x: CanonicalValue<Self::Word>) -> CanonicalValue<Self::Word> {
        CanonicalValue(modular_add_prereduced(x.0, x.0, self.params().modulus))
    }

    /// Modular halving: the `y` with `y + y ≡ x (mod n)`.
    #[inline(always)]
    fn div_by_2(&self, x: MontyValue<Self::Word>) -> MontyValue<Self::Word> {
        debug_assert!(self.is_valid(x));
        MontyValue(div_by_2_mod(x.0, self.params().modulus))
    }

    /// Modular halving of a canonical value; stays canonical.
    #[inline(always)]
    fn div_by_2_canonical(&self, x: CanonicalValue<Self::Word>) -> CanonicalValue<Self::Word> {
        CanonicalValue(div_by_2_mod(x.0, self.params().modulus))
    }

    /// Division by `2^k`: `k` successive modular halvings. Requires
    /// `k <= Word::BITS`.
    #[inline]
    fn div_by_2k(&self, x: CanonicalValue<Self::Word>, k: u32) -> MontyValue<Self::Word> {
        assert!(k <= <Self::Word>::BITS, "power-of-two divisor exponent too large");
        let n = self.params().modulus;
        let mut w = x.0;
        for _ in 0..k {
            w = div_by_2_mod(w, n);
        }
        MontyValue(w)
    }

    /// Modular product `x * y`.
    #[inline(always)]
    fn multiply<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        debug_assert!(self.is_valid(x) && self.is_valid(y));
        let (lo, hi) = x.0.widening_mul(y.0);
        MontyValue(self.redc::<P>(hi, lo))
    }

    /// Modular product together with a flag that is true exactly when the
    /// result is the zero residue; lets factoring loops exit on one test.
    #[inline(always)]
    fn multiply_is_zero<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
    ) -> (MontyValue<Self::Word>, bool) {
        let product = self.multiply::<P>(x, y);
        let is_zero = self.word_is_zero_residue(product.0);
        (product, is_zero)
    }

    /// Modular square.
    #[inline(always)]
    fn square<P: SchedulingTag>(&self, x: MontyValue<Self::Word>) -> MontyValue<Self::Word> {
        self.multiply::<P>(x, x)
    }

    /// Fused multiply-add: `x * y + z` under a single reduction.
    ///
    /// The addend is folded into the high product word before REDC (adding
    /// `z` there adds `z * R` to the product), which overlaps with the
    /// reduction's own multiplies.
    #[inline(always)]
    fn fmadd<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
        z: CanonicalValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        debug_assert!(self.is_valid(x) && self.is_valid(y));
        let n = self.params().modulus;
        let (lo, hi) = x.0.widening_mul(y.0);
        let hi = add_mod_sched::<_, P>(hi, z.0, n);
        MontyValue(self.redc::<P>(hi, lo))
    }

    /// Fused multiply-subtract: `x * y - z` under a single reduction.
    #[inline(always)]
    fn fmsub<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
        z: CanonicalValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        debug_assert!(self.is_valid(x) && self.is_valid(y));
        let n = self.params().modulus;
        let (lo, hi) = x.0.widening_mul(y.0);
        let hi = sub_mod_sched::<_, P>(hi, z.0, n);
        MontyValue(self.redc::<P>(hi, lo))
    }

    /// [`Self::fmadd`] with a prepared fusing operand.
    #[inline(always)]
    fn fmadd_fusing<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
        z: FusingValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        self.fmadd::<P>(x, y, CanonicalValue(z.0))
    }

    /// [`Self::fmsub`] with a prepared fusing operand.
    #[inline(always)]
    fn fmsub_fusing<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        y: MontyValue<Self::Word>,
        z: FusingValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        self.fmsub::<P>(x, y, CanonicalValue(z.0))
    }

    /// Fused square-add: `x^2 + z` under a single reduction.
    #[inline(always)]
    fn fused_square_add<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        z: CanonicalValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        self.fmadd::<P>(x, x, z)
    }

    /// Fused square-subtract: `x^2 - z` under a single reduction.
    #[inline(always)]
    fn fused_square_sub<P: SchedulingTag>(
        &self,
        x: MontyValue<Self::Word>,
        z: CanonicalValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        self.fmsub::<P>(x, x, z)
    }

    /// Modular multiplicative inverse, or `None` when `gcd(x, n) != 1`.
    ///
    /// With `c` the canonical word of `x` (that is, `x_int * R mod n`), the
    /// extended gcd yields `c^-1 = x_int^-1 * R^-1`, and one reduction against
    /// the stored `R^3 mod n` restores the Montgomery factor:
    /// `REDC(c^-1 * R^3) = x_int^-1 * R`.
    #[inline]
    fn inverse(&self, x: MontyValue<Self::Word>) -> Option<CanonicalValue<Self::Word>> {
        let p = self.params();
        let c = self.canonicalize_word(x.0);
        let inv = invert_mod(c, p.modulus)?;
        let (lo, hi) = inv.widening_mul(p.r3);
        Some(CanonicalValue(redc_canonical(hi, lo, p.modulus, p.inv)))
    }

    /// Applies the caller's gcd to `x`'s canonical representative and the
    /// modulus. Since `gcd(R, n) == 1`, this equals `gcd(x_int, n)` without
    /// leaving the Montgomery domain.
    #[inline]
    fn gcd_with_modulus<F>(&self, x: MontyValue<Self::Word>, gcd: F) -> Self::Word
    where
        F: Fn(Self::Word, Self::Word) -> Self::Word,
    {
        gcd(self.canonicalize_word(x.0), self.params().modulus)
    }

    /// Ordinary remainder `a mod n`; accepts any word value.
    #[inline(always)]
    fn remainder(&self, a: Self::Word) -> Self::Word {
        a % self.params().modulus
    }

    /// Starts a chain of lazily-finalized squarings at `x`.
    #[inline(always)]
    fn squaring_value(&self, x: MontyValue<Self::Word>) -> SquaringValue<Self::Word> {
        SquaringValue(x.0)
    }

    /// One squaring inside the lazy domain.
    #[inline(always)]
    fn square_sv(&self, sv: SquaringValue<Self::Word>) -> SquaringValue<Self::Word> {
        SquaringValue(self.square::<LowLatency>(MontyValue(sv.0)).0)
    }

    /// Final squaring of the chain, finalized back to a Montgomery value.
    #[inline(always)]
    fn square_to_monty(&self, sv: SquaringValue<Self::Word>) -> MontyValue<Self::Word> {
        self.square::<LowLatency>(MontyValue(sv.0))
    }

    /// `2^exponent` in Montgomery form, by reducing the shifted conversion
    /// factor: `REDC(R^2 << exponent)`. Requires `exponent < Word::BITS`.
    #[inline(always)]
    fn two_pow_limited<P: SchedulingTag>(&self, exponent: u32) -> MontyValue<Self::Word> {
        debug_assert!(exponent < <Self::Word>::BITS);
        let (lo, hi) = self.params().r2.shl_wide(exponent);
        MontyValue(self.redc::<P>(hi, lo))
    }

    /// `REDC(x << exponent)`. When `x` carries an extra factor of `R` (see
    /// [`Self::montvalue_r`]), the result is the Montgomery form of
    /// `x_int * 2^exponent`. Requires `exponent < Word::BITS`.
    #[inline(always)]
    fn two_pow_limited_times_x<P: SchedulingTag>(
        &self,
        exponent: u32,
        x: CanonicalValue<Self::Word>,
    ) -> MontyValue<Self::Word> {
        debug_assert!(exponent < <Self::Word>::BITS);
        let (lo, hi) = x.0.shl_wide(exponent);
        MontyValue(self.redc::<P>(hi, lo))
    }

    /// `R * 2^exponent` in Montgomery form, by reducing the shifted
    /// `R^3 mod n`. Requires `exponent < Word::BITS`.
    #[inline(always)]
    fn r_times_two_pow_limited<P: SchedulingTag>(&self, exponent: u32) -> MontyValue<Self::Word> {
        debug_assert!(exponent < <Self::Word>::BITS);
        let (lo, hi) = self.params().r3.shl_wide(exponent);
        MontyValue(self.redc::<P>(hi, lo))
    }
}

#[cfg(feature = "zeroize")]
impl<W: Word + zeroize::Zeroize> zeroize::Zeroize for MontyValue<W> {
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}

#[cfg(feature = "zeroize")]
impl<W: Word + zeroize::Zeroize> zeroize::Zeroize for CanonicalValue<W> {
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}

#[cfg(feature = "zeroize")]
impl<W: Word + zeroize::Zeroize> zeroize::Zeroize for MontyParams<W> {
    fn zeroize(&mut self) {
        self.modulus.zeroize();
        self.inv.zeroize();
        self.r.zeroize();
        self.r2.zeroize();
        self.r3.zeroize();
    }
}
