//! Modular addition of prereduced word inputs.

use crate::tags::SchedulingTag;
use crate::word::Word;
use subtle::Choice;

/// Computes `(a + b) mod modulus` for prereduced inputs `a, b < modulus`.
///
/// The naive `a + b` may overflow the word, so the comparison is made against
/// `modulus - b` instead: `(a < modulus - b) ? a + b : a - (modulus - b)`.
#[inline(always)]
pub fn modular_add_prereduced<W: Word>(a: W, b: W, modulus: W) -> W {
    debug_assert!(modulus > W::ZERO);
    debug_assert!(a < modulus && b < modulus);

    let tmp = modulus.wrapping_sub(&b);
    let result = W::select(
        a.wrapping_sub(&tmp),
        a.wrapping_add(&b),
        Choice::from((a < tmp) as u8),
    );
    debug_assert!(result < modulus);
    result
}

/// Carry-test schedule for `(a + b) mod modulus`, equivalent to
/// [`modular_add_prereduced`].
///
/// With `tmp = b - modulus` (wrapped), `a + tmp` carries exactly when
/// `a + b >= modulus`; the carried sum is already the reduced result.
#[inline(always)]
pub fn modular_add_prereduced_carry<W: Word>(a: W, b: W, modulus: W) -> W {
    debug_assert!(modulus > W::ZERO);
    debug_assert!(a < modulus && b < modulus);

    let tmp = b.wrapping_sub(&modulus);
    let sum = a.wrapping_add(&tmp);
    let result = W::select(a.wrapping_add(&b), sum, Choice::from((sum < a) as u8));
    debug_assert!(result < modulus);
    result
}

/// Tag-dispatched modular addition used by the fused multiply operations.
#[inline(always)]
pub(crate) fn add_mod_sched<W: Word, P: SchedulingTag>(a: W, b: W, modulus: W) -> W {
    if P::LOW_LATENCY {
        modular_add_prereduced_carry(a, b, modulus)
    } else {
        modular_add_prereduced(a, b, modulus)
    }
}
