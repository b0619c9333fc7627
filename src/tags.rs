//! Scheduling tags for the multiplication-family operations.
//!
//! A tag picks between semantically identical instruction schedules: one tuned
//! for a short critical path, one for fewer issued operations. Outputs are
//! bitwise identical across tags; only the shape of the generated code may
//! differ. Where the distinction buys nothing the schedules collapse.

use core::fmt::Debug;

/// Compile-time selector between equivalent operation schedules.
pub trait SchedulingTag: Copy + Clone + Debug + Default {
    /// True when the schedule optimizes the dependency-chain length rather
    /// than the number of operations issued.
    const LOW_LATENCY: bool;
}

/// Prefer the schedule with the shortest critical path.
///
/// Use for the loop-carried dependency of an inner loop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowLatency;

impl SchedulingTag for LowLatency {
    const LOW_LATENCY: bool = true;
}

/// Prefer the schedule issuing the fewest operations.
///
/// Use for work that runs beside another dependency chain and is unlikely to
/// be the latency bottleneck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LowUops;

impl SchedulingTag for LowUops {
    const LOW_LATENCY: bool = false;
}
