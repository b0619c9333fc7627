//! Specialized exponentiation of base 2.
//!
//! Because the base is exactly 2, no multiplication table is needed: every
//! table entry of the windowed algorithm is `2^w` in Montgomery form, which
//! the reduction can synthesize directly by shifting the stored `R^2 mod n`
//! by `w` bits before reducing ([`Monty::two_pow_limited`]). The window width
//! is fixed at `log2(Word::BITS)` so that every window index stays a legal
//! shift amount.

use crate::form::MontgomeryForm;
use crate::monty::{Monty, MontyValue};
use crate::tags::{LowLatency, LowUops};
use crate::word::Word;
use core::array;

/// Window width: `log2(Word::BITS)`, e.g. 6 for `u64`.
#[inline(always)]
fn window_bits<W: Word>() -> u32 {
    W::BITS.trailing_zeros()
}

/// `count` squarings of `result`, routed through the lazily-finalized
/// squaring domain when `use_sv` is set.
#[inline(always)]
fn run_squarings<M: Monty>(m: &M, result: &mut MontyValue<M::Word>, count: u32, use_sv: bool) {
    if use_sv && count > 0 {
        let mut sv = m.squaring_value(*result);
        for _ in 0..count - 1 {
            sv = m.square_sv(sv);
        }
        *result = m.square_to_monty(sv);
    } else {
        for _ in 0..count {
            *result = m.square::<LowLatency>(*result);
        }
    }
}

/// `2^exponent` in Montgomery form.
///
/// Windowed exponentiation whose "table lookups" are REDC entry points
/// shifting `R^2 mod n`; with `USE_SLIDING_WINDOW`, runs of zero exponent
/// bits cost one squaring each. `USE_SQUARING_VALUE_OPTIMIZATION` amortizes
/// the reduction finalization over each run of squarings (profitable on the
/// quarter-range strategy, a no-op elsewhere).
pub fn two_pow<
    M: Monty,
    E: Word,
    const USE_SLIDING_WINDOW: bool,
    const USE_SQUARING_VALUE_OPTIMIZATION: bool,
>(
    form: &MontgomeryForm<M>,
    exponent: E,
) -> MontyValue<M::Word> {
    let m = &form.monty;
    let p2 = window_bits::<M::Word>();
    let mask = (1usize << p2) - 1;

    let numbits = E::BITS - exponent.leading_zeros();
    if numbits <= p2 {
        return m.two_pow_limited::<LowLatency>(exponent.low_usize() as u32);
    }

    let mut shift = numbits - p2;
    let mut result = m.two_pow_limited::<LowLatency>((exponent >> (shift as usize)).low_usize() as u32);

    while shift >= p2 {
        if USE_SLIDING_WINDOW {
            while shift > p2 && (exponent >> ((shift - 1) as usize)).low_usize() & 1 == 0 {
                result = m.square::<LowLatency>(result);
                shift -= 1;
            }
        }
        run_squarings(m, &mut result, p2, USE_SQUARING_VALUE_OPTIMIZATION);
        shift -= p2;
        let window = ((exponent >> (shift as usize)).low_usize() & mask) as u32;
        result = m.multiply::<LowLatency>(result, m.two_pow_limited::<LowUops>(window));
    }

    if shift == 0 {
        return result;
    }
    run_squarings(m, &mut result, shift, USE_SQUARING_VALUE_OPTIMIZATION);
    let window = (exponent.low_usize() & ((1usize << shift) - 1)) as u32;
    m.multiply::<LowLatency>(result, m.two_pow_limited::<LowUops>(window))
}

/// Number of 4-entry power-of-`R^4` tables the wide-window engine carries on
/// top of its mid table; each extends the window by two bits.
const NUM_EXTRA_TABLES: usize = 2;

/// `2^exponent` in Montgomery form, consuming `log2(Word::BITS) + 6` exponent
/// bits per outer iteration.
///
/// The shifted-REDC entry point alone cannot reach past `2^(Word::BITS - 1)`,
/// so wider windows stack small tables of powers of `R` on top of it: with
/// `R = 2^Word::BITS` and the window's low part `lo`, mid part `mid`, and
/// high parts `h_i`,
///
/// `2^w = 2^lo * R^mid * R^(4*h_0) * R^(16*h_1)`
///
/// and every factor is a table entry. The mid table rides along inside the
/// shifted REDC (its entries carry the extra factor of `R` that
/// [`Monty::two_pow_limited_times_x`] consumes), so a full window costs one
/// shifted REDC plus `NUM_EXTRA_TABLES` multiplies. Table setup is a handful
/// of squarings of `R` — no general multiplies with the base, which does not
/// exist as data.
pub fn two_pow_wide_window<
    M: Monty,
    E: Word,
    const USE_SLIDING_WINDOW: bool,
    const USE_SQUARING_VALUE_OPTIMIZATION: bool,
>(
    form: &MontgomeryForm<M>,
    exponent: E,
) -> MontyValue<M::Word> {
    let m = &form.monty;
    let p2 = window_bits::<M::Word>();
    let mask = (1usize << p2) - 1;
    let window = p2 + 2 + 2 * NUM_EXTRA_TABLES as u32;

    // table_mid[i] is the canonical form of R^(i+1); the extra tables hold
    // the forms of R^(4v), R^(16v), ... for v in 0..4.
    let r1 = m.montvalue_r();
    let r2v = m.square::<LowLatency>(r1.into());
    let r3v = m.multiply::<LowUops>(r2v, r1.into());
    let r4v = m.square::<LowLatency>(r2v);
    let table_mid = [
        r1,
        m.to_canonical(r2v),
        m.to_canonical(r3v),
        m.to_canonical(r4v),
    ];
    let one: MontyValue<M::Word> = m.one().into();
    let mut tables_extra = [[one; 4]; NUM_EXTRA_TABLES];
    let mut next = r4v;
    for table in tables_extra.iter_mut() {
        let next_sq = m.square::<LowLatency>(next);
        table[1] = next;
        table[2] = next_sq;
        table[3] = m.multiply::<LowUops>(next_sq, next);
        next = m.square::<LowLatency>(next_sq);
    }

    let assemble = |w: usize| -> MontyValue<M::Word> {
        let lo = (w & mask) as u32;
        let mid = (w >> p2) & 0b11;
        let mut v = m.two_pow_limited_times_x::<LowUops>(lo, table_mid[mid]);
        for (i, table) in tables_extra.iter().enumerate() {
            let idx = (w >> (p2 as usize + 2 + 2 * i)) & 0b11;
            v = m.multiply::<LowUops>(v, table[idx]);
        }
        v
    };

    let numbits = E::BITS - exponent.leading_zeros();
    if numbits <= window {
        return assemble(exponent.low_usize());
    }

    let mut shift = numbits - window;
    let mut result = assemble((exponent >> (shift as usize)).low_usize());

    while shift >= window {
        if USE_SLIDING_WINDOW {
            while shift > window && (exponent >> ((shift - 1) as usize)).low_usize() & 1 == 0 {
                result = m.square::<LowLatency>(result);
                shift -= 1;
            }
        }
        shift -= window;
        let val = assemble((exponent >> (shift as usize)).low_usize() & ((1usize << window) - 1));
        run_squarings(m, &mut result, window, USE_SQUARING_VALUE_OPTIMIZATION);
        result = m.multiply::<LowLatency>(result, val);
    }

    if shift == 0 {
        return result;
    }
    // Partial tail window; its absent high parts index the unity entries.
    let val = assemble(exponent.low_usize() & ((1usize << shift) - 1));
    run_squarings(m, &mut result, shift, USE_SQUARING_VALUE_OPTIMIZATION);
    m.multiply::<LowLatency>(result, val)
}

/// `N` independent computations of `2^exponents[j] mod forms[j]`, in lockstep.
///
/// The window cursor follows the longest exponent; shorter exponents multiply
/// by `2^0` on their high windows, which is a no-op. Exponents at most one
/// window wide resolve through the shifted-`R` entry point against the stored
/// Montgomery form of `R`.
pub fn two_pow_array<M: Monty, E: Word, const N: usize>(
    forms: &[MontgomeryForm<M>; N],
    exponents: &[E; N],
) -> [MontyValue<M::Word>; N] {
    const {
        assert!(N >= 1, "the batch must hold at least one exponentiation")
    };
    let p2 = window_bits::<M::Word>();
    let mask = (1usize << p2) - 1;

    let mut n_max = exponents[0];
    for &e in exponents.iter().skip(1) {
        if n_max < e {
            n_max = e;
        }
    }

    let numbits = E::BITS - n_max.leading_zeros();
    if numbits <= p2 {
        return array::from_fn(|j| {
            let monty = &forms[j].monty;
            monty.two_pow_limited_times_x::<LowUops>(
                exponents[j].low_usize() as u32,
                monty.montvalue_r(),
            )
        });
    }

    let mut shift = numbits - p2;
    let mut result: [MontyValue<M::Word>; N] = array::from_fn(|j| {
        forms[j]
            .monty
            .two_pow_limited::<LowUops>((exponents[j] >> (shift as usize)).low_usize() as u32)
    });

    while shift >= p2 {
        for _ in 0..p2 {
            for (j, r) in result.iter_mut().enumerate() {
                *r = forms[j].monty.square::<LowUops>(*r);
            }
        }
        shift -= p2;
        for (j, r) in result.iter_mut().enumerate() {
            let window = ((exponents[j] >> (shift as usize)).low_usize() & mask) as u32;
            let entry = forms[j].monty.two_pow_limited::<LowUops>(window);
            *r = forms[j].monty.multiply::<LowUops>(*r, entry);
        }
    }

    if shift == 0 {
        return result;
    }
    for _ in 0..shift {
        for (j, r) in result.iter_mut().enumerate() {
            *r = forms[j].monty.square::<LowUops>(*r);
        }
    }
    let tail_mask = (1usize << shift) - 1;
    for (j, r) in result.iter_mut().enumerate() {
        let window = (exponents[j].low_usize() & tail_mask) as u32;
        let entry = forms[j].monty.two_pow_limited::<LowUops>(window);
        *r = forms[j].monty.multiply::<LowUops>(*r, entry);
    }
    result
}
