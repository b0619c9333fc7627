//! Exponentiation tests: concrete end-to-end scenarios, configuration grids,
//! and scalar/batched equivalence, checked against `num-bigint` modpow.

use montyform::{
    pow_2kary, pow_2kary_array, pow_ladder, pow_ladder_array, two_pow, two_pow_array,
    two_pow_wide_window, AutoRange, FullRange, HalfRange, LowLatency, LowUops, Monty,
    MontgomeryAuto, MontgomeryForm, MontgomeryQuarter, QuarterRange, SchedulingTag,
};
use num_bigint::BigUint;
use proptest::prelude::*;

fn modpow_ref(base: u64, exponent: u64, n: u64) -> u64 {
    let result = BigUint::from(base).modpow(&BigUint::from(exponent), &BigUint::from(n));
    result.to_u64_digits().first().copied().unwrap_or(0)
}

/// A walk through small arithmetic modulo 13, checked by hand.
#[test]
fn scenario_modulo_13() {
    fn run<M: Monty<Word = u64>>() {
        let mf = MontgomeryForm::<M>::new(13);
        let x = mf.convert_in(6);
        let y = mf.convert_in(11);

        assert_eq!(mf.convert_out(mf.add(x, y)), 4);
        assert_eq!(mf.convert_out(mf.subtract(y, x)), 5);
        assert_eq!(mf.convert_out(mf.subtract(x, y)), 8);
        assert_eq!(mf.convert_out(mf.multiply(x, y, LowLatency)), 1);
        assert_eq!(mf.convert_out(mf.pow(y, 12u64)), 1);
        assert_eq!(mf.convert_out(mf.pow(y, 7u64)), 2);
        assert_eq!(mf.convert_out(mf.two_times(x)), 12);
        assert_eq!(mf.convert_out(mf.div_by_2(mf.convert_in(2))), 1);
        assert_eq!(mf.convert_out(mf.negate(mf.convert_in(6))), 7);
    }
    run::<FullRange<u64>>();
    run::<HalfRange<u64>>();
    run::<QuarterRange<u64>>();
    run::<AutoRange<u64>>();
}

/// The smallest admissible modulus.
#[test]
fn scenario_modulo_3() {
    let mf = MontgomeryAuto::<u64>::new(3);
    assert_eq!(
        mf.convert_out(mf.add(mf.convert_in(1), mf.convert_in(2))),
        0
    );
    assert_eq!(
        mf.convert_out(mf.multiply(mf.convert_in(2), mf.convert_in(2), LowLatency)),
        1
    );
    assert_eq!(mf.convert_out(mf.pow(mf.convert_in(2), 17u64)), 2);
    // 2 * 2 ≡ 1 (mod 3), so halving 1 gives 2.
    assert_eq!(mf.convert_out(mf.div_by_2(mf.convert_in(1))), 2);
}

/// The largest modulus the u64 quarter-range strategy admits.
#[test]
fn scenario_quarter_range_max() {
    let n = (1u64 << 62) - 1;
    let mf = MontgomeryQuarter::<u64>::new(n);
    let x = mf.convert_in(n - 1);
    let y = mf.convert_in(2);

    assert_eq!(mf.convert_out(mf.add(x, y)), 1);
    assert_eq!(mf.convert_out(mf.subtract(x, y)), n - 3);
    assert_eq!(mf.convert_out(mf.multiply(x, x, LowLatency)), 1);
    assert_eq!(mf.convert_out(mf.pow(y, 10u64)), 1024);
}

/// gcd pulls shared factors out of the Montgomery domain directly.
#[test]
fn scenario_gcd_modulo_35() {
    let mf = MontgomeryAuto::<u64>::new(35);
    let gcd = |a: u64, b: u64| num_integer::Integer::gcd(&a, &b);

    assert_eq!(mf.gcd_with_modulus(mf.convert_in(28), gcd), 7);
    assert_eq!(mf.gcd_with_modulus(mf.convert_in(29), gcd), 1);
    assert_eq!(mf.gcd_with_modulus(mf.convert_in(mf.remainder(70)), gcd), 35);
}

/// Scalar and batched pow agree index by index.
#[test]
fn scenario_batched_pow_modulo_11() {
    assert_eq!(modpow_ref(7, 17, 11), 6);

    let mfs: [MontgomeryAuto<u64>; 3] = core::array::from_fn(|_| MontgomeryAuto::new(11));
    let bases: [_; 3] = core::array::from_fn(|_| mfs[0].convert_in(7));
    let exponents = [17u64; 3];
    let batched = pow_2kary_array::<_, _, 3, 16>(&mfs, &bases, &exponents);
    for (j, result) in batched.iter().enumerate() {
        assert_eq!(mfs[j].convert_out(*result), 6);
        assert_eq!(
            mfs[j].convert_out(mfs[j].pow(bases[j], exponents[j])),
            6
        );
    }
}

/// `two_pow` against a Mersenne prime, scalar and batched.
#[test]
fn scenario_two_pow_mersenne() {
    let n = (1u64 << 61) - 1;
    let mf = MontgomeryQuarter::<u64>::new(n);

    assert_eq!(mf.convert_out(mf.two_pow(60u64)), 1u64 << 60);
    assert_eq!(mf.convert_out(mf.two_pow(61u64)), 1);
    let e = 1_000_000_000u64;
    assert_eq!(mf.convert_out(mf.two_pow(e)), modpow_ref(2, e, n));

    let mfs: [MontgomeryQuarter<u64>; 4] = core::array::from_fn(|_| MontgomeryQuarter::new(n));
    let exponents = [e, e - 1, e + 1, e + 7];
    let batched = two_pow_array(&mfs, &exponents);
    for (j, result) in batched.iter().enumerate() {
        let expected = modpow_ref(2, exponents[j], n);
        assert_eq!(mfs[j].convert_out(*result), expected);
        assert_eq!(mfs[j].convert_out(mfs[j].two_pow(exponents[j])), expected);
    }
}

/// Every configuration of the windowed pow produces the reference result.
fn check_pow_configs<M: Monty<Word = u64>>(n: u64, base: u64, exponent: u64) {
    let mf = MontgomeryForm::<M>::new(n);
    let base = base % n;
    let expected = modpow_ref(base, exponent, n);
    let bv = mf.convert_in(base);

    assert_eq!(mf.convert_out(mf.pow(bv, exponent)), expected);
    assert_eq!(
        mf.convert_out(pow_2kary::<M, u64, 4, false>(&mf, bv, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(pow_2kary::<M, u64, 16, false>(&mf, bv, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(pow_2kary::<M, u64, 64, true>(&mf, bv, exponent)),
        expected
    );
    assert_eq!(mf.convert_out(pow_ladder(&mf, bv, exponent)), expected);

    let ladder4 = pow_ladder_array(&mf, [bv; 4], exponent);
    for result in ladder4 {
        assert_eq!(mf.convert_out(result), expected);
    }
}

/// Every configuration of the base-2 engines produces the reference result.
fn check_two_pow_configs<M: Monty<Word = u64>>(n: u64, exponent: u64) {
    let mf = MontgomeryForm::<M>::new(n);
    let expected = modpow_ref(2, exponent, n);

    assert_eq!(
        mf.convert_out(two_pow::<M, u64, false, false>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow::<M, u64, true, false>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow::<M, u64, false, true>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow::<M, u64, true, true>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow_wide_window::<M, u64, false, false>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow_wide_window::<M, u64, true, false>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow_wide_window::<M, u64, false, true>(&mf, exponent)),
        expected
    );
    assert_eq!(
        mf.convert_out(two_pow_wide_window::<M, u64, true, true>(&mf, exponent)),
        expected
    );
}

prop_compose! {
    fn quarter_modulus()(n in 3u64..(1u64 << 62)) -> u64 { n | 1 }
}

prop_compose! {
    fn full_modulus()(n in 3u64..=u64::MAX) -> u64 { n | 1 }
}

proptest! {
    #[test]
    fn pow_matches_reference_quarter(
        n in quarter_modulus(),
        base in any::<u64>(),
        exponent in any::<u64>(),
    ) {
        check_pow_configs::<QuarterRange<u64>>(n, base, exponent);
    }

    #[test]
    fn pow_matches_reference_full(
        n in full_modulus(),
        base in any::<u64>(),
        exponent in any::<u64>(),
    ) {
        check_pow_configs::<FullRange<u64>>(n, base, exponent);
    }

    #[test]
    fn two_pow_matches_reference(n in quarter_modulus(), exponent in any::<u64>()) {
        check_two_pow_configs::<QuarterRange<u64>>(n, exponent);
        check_two_pow_configs::<FullRange<u64>>(n, exponent);
        check_two_pow_configs::<HalfRange<u64>>(n, exponent);
    }

    /// Batched pow with unrelated moduli, bases and exponent lengths matches
    /// the scalar routine index by index.
    #[test]
    fn batched_pow_is_independent(
        n0 in quarter_modulus(), n1 in quarter_modulus(), n2 in quarter_modulus(),
        b in any::<[u64; 3]>(),
        e0 in any::<u64>(), e1 in 0u64..1024, e2 in 0u64..8,
    ) {
        let moduli = [n0, n1, n2];
        let exponents = [e0, e1, e2];
        let mfs: [MontgomeryAuto<u64>; 3] = core::array::from_fn(|j| MontgomeryAuto::new(moduli[j]));
        let bases: [_; 3] = core::array::from_fn(|j| mfs[j].convert_in(b[j] % moduli[j]));

        let batched = pow_2kary_array::<_, _, 3, 16>(&mfs, &bases, &exponents);
        for j in 0..3 {
            let scalar = pow_2kary::<_, _, 16, false>(&mfs[j], bases[j], exponents[j]);
            prop_assert_eq!(
                mfs[j].convert_out(batched[j]),
                mfs[j].convert_out(scalar)
            );
            prop_assert_eq!(
                mfs[j].convert_out(batched[j]),
                modpow_ref(b[j] % moduli[j], exponents[j], moduli[j])
            );
        }
    }

    /// Batched two_pow with distinct exponents matches the scalar engine.
    #[test]
    fn batched_two_pow_is_independent(
        n in quarter_modulus(),
        e0 in any::<u64>(), e1 in 0u64..64, e2 in any::<u64>(), e3 in 0u64..2,
    ) {
        let mfs: [MontgomeryQuarter<u64>; 4] = core::array::from_fn(|_| MontgomeryQuarter::new(n));
        let exponents = [e0, e1, e2, e3];
        let batched = two_pow_array(&mfs, &exponents);
        for j in 0..4 {
            prop_assert_eq!(
                mfs[j].convert_out(batched[j]),
                modpow_ref(2, exponents[j], n)
            );
        }
    }
}

/// Tiny words stress the window logic hardest: with `u8` residues the window
/// is 3 bits wide and every shift boundary shows up quickly.
#[test]
fn two_pow_exhaustive_u8_words() {
    for n in [3u8, 13, 35, 63] {
        let mf = MontgomeryQuarter::<u8>::new(n);
        for exponent in 0u16..=300 {
            let expected = BigUint::from(2u8)
                .modpow(&BigUint::from(exponent), &BigUint::from(n));
            let expected = expected.to_u64_digits().first().copied().unwrap_or(0) as u8;
            assert_eq!(
                mf.convert_out(two_pow::<_, _, true, false>(&mf, exponent)),
                expected,
                "n = {n}, exponent = {exponent}"
            );
            assert_eq!(
                mf.convert_out(two_pow::<_, _, false, true>(&mf, exponent)),
                expected,
                "n = {n}, exponent = {exponent} (lazy squaring)"
            );
            assert_eq!(
                mf.convert_out(two_pow_wide_window::<_, _, true, true>(&mf, exponent)),
                expected,
                "n = {n}, exponent = {exponent} (wide window)"
            );
        }
        // Exponents long enough to drive the wide window through its main
        // loop on a 9-bit window (u8 words).
        for exponent in [0x3_0000u32, 0x5_a5a5, 0xdead_beef, u32::MAX, u32::MAX - 6] {
            let expected = BigUint::from(2u8)
                .modpow(&BigUint::from(exponent), &BigUint::from(n));
            let expected = expected.to_u64_digits().first().copied().unwrap_or(0) as u8;
            for result in [
                two_pow_wide_window::<_, _, true, false>(&mf, exponent),
                two_pow_wide_window::<_, _, false, true>(&mf, exponent),
                two_pow::<_, _, true, true>(&mf, exponent),
            ] {
                assert_eq!(mf.convert_out(result), expected, "n = {n}, exponent = {exponent}");
            }
        }
    }
}

#[test]
fn pow_exhaustive_u8_words() {
    for n in [13u8, 63] {
        let mf = MontgomeryQuarter::<u8>::new(n);
        for base in 0..n {
            let bv = mf.convert_in(base);
            for exponent in 0u16..=68 {
                let expected = BigUint::from(base)
                    .modpow(&BigUint::from(exponent), &BigUint::from(n));
                let expected = expected.to_u64_digits().first().copied().unwrap_or(0) as u8;
                assert_eq!(mf.convert_out(mf.pow(bv, exponent)), expected);
                assert_eq!(
                    mf.convert_out(pow_2kary::<_, _, 8, true>(&mf, bv, exponent)),
                    expected
                );
                assert_eq!(mf.convert_out(pow_ladder(&mf, bv, exponent)), expected);
            }
        }
    }
}

/// Exponents wider than the residue word.
#[test]
fn wide_exponent_narrow_word() {
    let n = 63u8; // 2^6 - 1: ord(2) divides 6
    let mf = MontgomeryQuarter::<u8>::new(n);
    let e = (1u128 << 90) + 5;
    let big_e = (BigUint::from(1u8) << 90) + 5u8;
    let expected = BigUint::from(2u8).modpow(&big_e, &BigUint::from(n));
    assert_eq!(BigUint::from(mf.convert_out(mf.two_pow(e))), expected);
    let b = mf.convert_in(5);
    let expected = BigUint::from(5u8).modpow(&big_e, &BigUint::from(n));
    assert_eq!(BigUint::from(mf.convert_out(mf.pow(b, e))), expected);
}

/// `u128` exponentiation end to end.
#[test]
fn pow_u128() {
    let n = (1u128 << 89) - 1; // Mersenne prime
    let mf = MontgomeryQuarter::<u128>::new(n);
    let base = 0xdead_beef_cafe_f00d_u128;
    let exponent = (1u128 << 100) + 987_654_321;

    let expected = BigUint::from(base).modpow(&BigUint::from(exponent), &BigUint::from(n));
    let got = BigUint::from(mf.convert_out(mf.pow(mf.convert_in(base), exponent)));
    assert_eq!(got, expected);

    let got2 = BigUint::from(mf.convert_out(mf.two_pow(exponent)));
    let expected2 = BigUint::from(2u8).modpow(&BigUint::from(exponent), &BigUint::from(n));
    assert_eq!(got2, expected2);
}

/// The REDC extension entry points behind `two_pow`.
#[test]
fn redc_extension_entry_points() {
    fn check<P: SchedulingTag>(tag_name: &str) {
        let n = (1u64 << 61) - 1;
        let monty = QuarterRange::<u64>::new(n);
        let r = ((1u128 << 64) % n as u128) as u64;

        for e in [0u32, 1, 5, 31, 63] {
            let expected_2e = ((1u128 << e) % n as u128) as u64;
            assert_eq!(
                monty.convert_out(monty.two_pow_limited::<P>(e)),
                expected_2e,
                "two_pow_limited, {tag_name}"
            );
            // R * 2^e in Montgomery form, synthesized from R^3 mod n.
            let expected_r2e = (r as u128 * expected_2e as u128 % n as u128) as u64;
            assert_eq!(
                monty.convert_out(monty.r_times_two_pow_limited::<P>(e)),
                expected_r2e,
                "r_times_two_pow_limited, {tag_name}"
            );
            // x carrying an extra factor of R turns the shifted REDC into
            // plain scaling by 2^e.
            let x = 123_456_789_u64;
            let xv = monty.convert_in(x);
            let x_extra_r = monty
                .to_canonical(monty.multiply::<P>(xv, monty.montvalue_r().into()));
            assert_eq!(
                monty.convert_out(monty.two_pow_limited_times_x::<P>(e, x_extra_r)),
                (x as u128 * expected_2e as u128 % n as u128) as u64,
                "two_pow_limited_times_x, {tag_name}"
            );
        }
    }
    check::<LowLatency>("low latency");
    check::<LowUops>("low uops");
}
