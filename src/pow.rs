//! Modular exponentiation of Montgomery values.
//!
//! [`pow_2kary`] consumes `k` exponent bits per outer iteration against a
//! `2^k`-entry table. Even table indices are precomputed alongside the odd
//! ones, which removes two conditional branches from the main loop at the
//! cost of table size; with the sliding-window option, runs of zero bits cost
//! one squaring per bit and no multiply.
//!
//! [`pow_ladder`] is the branch-free square-and-multiply ladder; it needs no
//! table and wins for short exponents. The array variants run several
//! exponentiations in lockstep so that their dependency chains interleave.

use crate::form::MontgomeryForm;
use crate::monty::{Monty, MontyValue};
use crate::tags::{LowLatency, LowUops};
use crate::word::Word;
use core::array;

/// Bit length of `exponent`.
#[inline(always)]
fn num_bits<E: Word>(exponent: E) -> u32 {
    E::BITS - exponent.leading_zeros()
}

/// `base^exponent` by 2^k-ary windowed exponentiation.
///
/// `TABLE_SIZE` must be a power of two in `[2, 512]`; the window width is its
/// log2 (so `TABLE_SIZE = 16` consumes four exponent bits per iteration).
/// With `USE_SLIDING_WINDOW`, zero windows collapse into single squarings.
pub fn pow_2kary<M: Monty, E: Word, const TABLE_SIZE: usize, const USE_SLIDING_WINDOW: bool>(
    form: &MontgomeryForm<M>,
    base: MontyValue<M::Word>,
    exponent: E,
) -> MontyValue<M::Word> {
    const {
        assert!(
            TABLE_SIZE >= 2 && TABLE_SIZE <= 512 && TABLE_SIZE.is_power_of_two(),
            "TABLE_SIZE must be a power of two between 2 and 512; \
             2^4 to 2^6 entries are the useful range"
        )
    };
    let m = &form.monty;

    // table[i] holds base^i
    let mut table = [MontyValue::from(m.one()); TABLE_SIZE];
    table[1] = base;
    if TABLE_SIZE >= 4 {
        table[2] = m.square::<LowLatency>(base);
        table[3] = m.multiply::<LowLatency>(base, table[2]);
        let mut i = 4;
        while i < TABLE_SIZE {
            table[i] = m.square::<LowUops>(table[i / 2]);
            table[i + 1] = m.multiply::<LowUops>(table[i / 2], table[i / 2 + 1]);
            i += 2;
        }
    }

    let window_bits = TABLE_SIZE.trailing_zeros();
    let mask = TABLE_SIZE - 1;
    let numbits = num_bits(exponent);
    if numbits <= window_bits {
        return table[exponent.low_usize()];
    }

    // Seed from the most significant window; its top bit is set by choice of
    // `shift`, so the index is never zero.
    let mut shift = numbits - window_bits;
    let mut result = table[(exponent >> (shift as usize)).low_usize()];

    while shift >= window_bits {
        if USE_SLIDING_WINDOW {
            while shift > window_bits
                && (exponent >> ((shift - 1) as usize)).low_usize() & 1 == 0
            {
                result = m.square::<LowLatency>(result);
                shift -= 1;
            }
        }
        for _ in 0..window_bits {
            result = m.square::<LowLatency>(result);
        }
        shift -= window_bits;
        let index = (exponent >> (shift as usize)).low_usize() & mask;
        result = m.multiply::<LowLatency>(result, table[index]);
    }

    if shift == 0 {
        return result;
    }
    // Partial tail window of `shift` bits.
    for _ in 0..shift {
        result = m.square::<LowLatency>(result);
    }
    let index = exponent.low_usize() & ((1usize << shift) - 1);
    m.multiply::<LowLatency>(result, table[index])
}

/// `N` independent exponentiations `bases[j]^exponents[j] mod forms[j]`,
/// driven in lockstep by one window cursor.
///
/// The cursor follows the longest exponent; shorter exponents read `table[0]`
/// (unity) on their high windows, which leaves their results untouched, so
/// each output is exactly what the scalar routine produces for that triple.
pub fn pow_2kary_array<M: Monty, E: Word, const N: usize, const TABLE_SIZE: usize>(
    forms: &[MontgomeryForm<M>; N],
    bases: &[MontyValue<M::Word>; N],
    exponents: &[E; N],
) -> [MontyValue<M::Word>; N] {
    const {
        assert!(
            TABLE_SIZE >= 2 && TABLE_SIZE <= 512 && TABLE_SIZE.is_power_of_two(),
            "TABLE_SIZE must be a power of two between 2 and 512"
        )
    };
    const {
        assert!(N >= 1, "the batch must hold at least one exponentiation")
    };

    // table[i][j] holds bases[j]^i modulo forms[j]
    let mut table = [[MontyValue::from(forms[0].monty.one()); N]; TABLE_SIZE];
    for j in 0..N {
        table[0][j] = forms[j].monty.one().into();
        table[1][j] = bases[j];
    }
    if TABLE_SIZE >= 4 {
        for j in 0..N {
            table[2][j] = forms[j].monty.square::<LowUops>(bases[j]);
        }
        for j in 0..N {
            table[3][j] = forms[j].monty.multiply::<LowUops>(bases[j], table[2][j]);
        }
        let mut i = 4;
        while i < TABLE_SIZE {
            for j in 0..N {
                table[i][j] = forms[j].monty.square::<LowUops>(table[i / 2][j]);
            }
            for j in 0..N {
                table[i + 1][j] = forms[j]
                    .monty
                    .multiply::<LowUops>(table[i / 2][j], table[i / 2 + 1][j]);
            }
            i += 2;
        }
    }

    let mut n_max = exponents[0];
    for &e in exponents.iter().skip(1) {
        if n_max < e {
            n_max = e;
        }
    }

    let window_bits = TABLE_SIZE.trailing_zeros();
    let mask = TABLE_SIZE - 1;
    let numbits = num_bits(n_max);
    if numbits <= window_bits {
        return array::from_fn(|j| table[exponents[j].low_usize()][j]);
    }

    let mut shift = numbits - window_bits;
    let mut result: [MontyValue<M::Word>; N] =
        array::from_fn(|j| table[(exponents[j] >> (shift as usize)).low_usize()][j]);

    while shift >= window_bits {
        for _ in 0..window_bits {
            for (j, r) in result.iter_mut().enumerate() {
                *r = forms[j].monty.square::<LowUops>(*r);
            }
        }
        shift -= window_bits;
        for (j, r) in result.iter_mut().enumerate() {
            let index = (exponents[j] >> (shift as usize)).low_usize() & mask;
            *r = forms[j].monty.multiply::<LowUops>(*r, table[index][j]);
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
        let index = exponents[j].low_usize() & tail_mask;
        *r = forms[j].monty.multiply::<LowUops>(*r, table[index][j]);
    }
    result
}

/// `base^exponent` by the right-to-left binary ladder.
///
/// Every iteration performs both multiplies and keeps or discards the result
/// with a select: the squaring chain and the result chain run in parallel,
/// and no exponent bit introduces a branch. The squaring chain is tagged for
/// few operations, the result chain (which also carries the select) for low
/// latency.
pub fn pow_ladder<M: Monty, E: Word>(
    form: &MontgomeryForm<M>,
    base: MontyValue<M::Word>,
    exponent: E,
) -> MontyValue<M::Word> {
    let m = &form.monty;
    let mut base = base;
    let mut exponent = exponent;
    let mut result = if exponent & E::ONE == E::ONE {
        base
    } else {
        m.one().into()
    };
    while exponent > E::ONE {
        exponent = exponent >> 1usize;
        base = m.square::<LowUops>(base);
        let tmp = m.multiply::<LowLatency>(result, base);
        let keep_bit = (exponent & E::ONE == E::ONE) as u8;
        result = MontyValue(<M::Word>::select(result.0, tmp.0, keep_bit.into()));
    }
    result
}

/// The ladder applied to `N` bases sharing one modulus and exponent.
///
/// Same algorithm as [`pow_ladder`]; batching feeds the multiplier `N`
/// independent dependency chains.
pub fn pow_ladder_array<M: Monty, E: Word, const N: usize>(
    form: &MontgomeryForm<M>,
    bases: [MontyValue<M::Word>; N],
    exponent: E,
) -> [MontyValue<M::Word>; N] {
    let m = &form.monty;
    let mut bases = bases;
    let mut exponent = exponent;
    let mut result: [MontyValue<M::Word>; N] = if exponent & E::ONE == E::ONE {
        bases
    } else {
        [m.one().into(); N]
    };
    while exponent > E::ONE {
        exponent = exponent >> 1usize;
        for b in bases.iter_mut() {
            *b = m.square::<LowUops>(*b);
        }
        if exponent & E::ONE == E::ONE {
            for (r, b) in result.iter_mut().zip(bases.iter()) {
                *r = m.multiply::<LowUops>(*r, *b);
            }
        }
    }
    result
}
