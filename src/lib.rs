//! Montgomery modular arithmetic over machine-word moduli.
//!
//! # About
//! This library is built for workloads — primality testing, integer
//! factorization, number-theoretic search — that perform very large numbers
//! of modular multiplications modulo one odd modulus that fits in a machine
//! word (`u8` through `u128`). It keeps residues in Montgomery form so that
//! every multiplication costs one widening multiply plus one Montgomery
//! reduction, with no division anywhere.
//!
//! # Usage
//! ```
//! use montyform::{LowLatency, MontgomeryAuto};
//!
//! let mf = MontgomeryAuto::<u64>::new(13);
//! let x = mf.convert_in(6);
//! let y = mf.convert_in(11);
//! let product = mf.multiply(x, y, LowLatency);
//! assert_eq!(mf.convert_out(product), 66 % 13);
//! assert_eq!(mf.convert_out(mf.pow(y, 7u64)), 2);
//! ```
//!
//! # Residue-range strategies
//! The modulus range determines how much reduction each primitive can skip:
//! [`MontgomeryQuarter`] (modulus below `R/4`) drops the final select from
//! every multiply, [`MontgomeryHalf`] (below `R/2`) cheapens addition, and
//! [`MontgomeryFull`] accepts any odd modulus. [`MontgomeryAuto`] picks for
//! you at construction.
//!
//! # Variable time
//! Operations here are optimized for throughput, not side-channel
//! resistance: short-circuits and data-dependent branches are used wherever
//! they pay. Do not use this crate on secret data.

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code, clippy::unwrap_used)]
#![warn(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    rust_2018_idioms,
    trivial_casts,
    trivial_numeric_casts,
    unused_qualifications
)]

mod add_mod;
mod div_by_2;
mod form;
mod inv_mod;
mod monty;
mod pow;
mod reduction;
mod sub_mod;
mod tags;
mod two_pow;
mod word;

pub use crate::{
    add_mod::{modular_add_prereduced, modular_add_prereduced_carry},
    form::{MontgomeryAuto, MontgomeryForm, MontgomeryFull, MontgomeryHalf, MontgomeryQuarter},
    monty::{
        AutoRange, CanonicalValue, FullRange, FusingValue, HalfRange, Monty, MontyParams,
        MontyValue, QuarterRange, SquaringValue,
    },
    pow::{pow_2kary, pow_2kary_array, pow_ladder, pow_ladder_array},
    sub_mod::{absolute_difference, modular_sub_prereduced, modular_sub_prereduced_low_latency},
    tags::{LowLatency, LowUops, SchedulingTag},
    two_pow::{two_pow, two_pow_array, two_pow_wide_window},
    word::Word,
};
pub use subtle;

#[cfg(feature = "zeroize")]
#[cfg_attr(docsrs, doc(cfg(feature = "zeroize")))]
pub use zeroize;
