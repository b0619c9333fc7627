//! Modular subtraction of prereduced word inputs.

use crate::tags::SchedulingTag;
use crate::word::Word;
use subtle::Choice;

/// Computes `(a - b) mod modulus` for prereduced inputs `a, b < modulus`.
#[inline(always)]
pub fn modular_sub_prereduced<W: Word>(a: W, b: W, modulus: W) -> W {
    debug_assert!(modulus > W::ZERO);
    debug_assert!(a < modulus && b < modulus);

    let diff = a.wrapping_sub(&b);
    let result = W::select(diff, diff.wrapping_add(&modulus), Choice::from((a < b) as u8));
    debug_assert!(result < modulus);
    result
}

/// Short-critical-path schedule for `(a - b) mod modulus`, equivalent to
/// [`modular_sub_prereduced`].
///
/// `b - modulus` is precomputed off the critical path, leaving a single
/// subtract feeding the select.
#[inline(always)]
pub fn modular_sub_prereduced_low_latency<W: Word>(a: W, b: W, modulus: W) -> W {
    debug_assert!(modulus > W::ZERO);
    debug_assert!(a < modulus && b < modulus);

    let tmp = b.wrapping_sub(&modulus);
    let result = W::select(
        a.wrapping_sub(&b),
        a.wrapping_sub(&tmp),
        Choice::from((a < b) as u8),
    );
    debug_assert!(result < modulus);
    result
}

/// Tag-dispatched modular subtraction used by the fused multiply operations.
#[inline(always)]
pub(crate) fn sub_mod_sched<W: Word, P: SchedulingTag>(a: W, b: W, modulus: W) -> W {
    if P::LOW_LATENCY {
        modular_sub_prereduced_low_latency(a, b, modulus)
    } else {
        modular_sub_prereduced(a, b, modulus)
    }
}

/// Absolute difference `|a - b|`.
///
/// For Montgomery values this is either `a - b` or `b - a` modulo the modulus,
/// whichever needs no reduction; callers that do not care which difference
/// they get (e.g. gcd accumulation in factoring loops) save a select against
/// the modulus.
#[inline(always)]
pub fn absolute_difference<W: Word>(a: W, b: W) -> W {
    W::select(
        a.wrapping_sub(&b),
        b.wrapping_sub(&a),
        Choice::from((a < b) as u8),
    )
}
