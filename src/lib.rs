#![forbid(unsafe_code)]
#![deny(
    unreachable_pub,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    missing_docs
)]

//! Decompositions of reversible arithmetic gates into elementary
//! permutation primitives, with an exhaustive checker that proves each
//! decomposition equal to its gate's direct semantics.
//!
//! Gates are described by [gates::ArithmeticGate] and bound to qubit
//! positions through [registers::Register]. A decomposition rule turns a
//! gate into an ordered list of [primitive_ops::PrimitiveOp], possibly
//! borrowing dirty workspace whose arbitrary contents are restored.
//! [verify::PermutationCheck] sweeps every input configuration of the
//! resulting circuit and compares it against the gate's mapping.
//!
//! # Example
//! Decompose a doubly-multiplying modular gate and check it:
//! ```
//! use qarith::prelude::*;
//! use std::num::NonZeroUsize;
//!
//! # fn main() -> DecompositionResult<()> {
//! // x -> x * 4 mod 9 on one register, y -> y * 7 mod 9 on the other.
//! let gate = ArithmeticGate::modular_bimultiplication(4, 7, 9)?;
//!
//! let mut alloc = RegisterAllocator::new();
//! let n = NonZeroUsize::new(4).unwrap();
//! let forward = alloc.register(n);
//! let inverse = alloc.register(n);
//! let ctrl = alloc.qubit();
//!
//! let ops = decompose(
//!     &gate,
//!     &[forward, inverse],
//!     None,
//!     &[ctrl.bit(0)],
//!     ResourceStrategy::MinimizeDepth,
//! )?;
//! assert_eq!(ops.len(), 5);
//!
//! // Prove it equal to the gate for every in-range input.
//! let check = PermutationCheck::for_gate(&gate, 4, 1)?
//!     .with_register_limits(vec![9, 9]);
//! assert_eq!(check.first_mismatch(), None);
//! # Ok(())
//! # }
//! ```

/// Decomposition rules from gates to primitive sequences.
pub mod decompositions;
/// Decomposition error types.
pub mod errors;
/// Arithmetic gate descriptions and their direct semantics.
pub mod gates;
/// Inversion of primitives and primitive sequences.
pub mod inverter;
/// Elementary reversible primitives and their interpreter.
pub mod primitive_ops;
/// Qubit registers over packed bit-states.
pub mod registers;
/// Helper macros for parallel iteration.
pub mod rayon_helper;
/// Flat trace export of primitive sequences.
pub mod trace;
/// Utility functions for bit and modular arithmetic.
pub mod utils;
/// Exhaustive permutation-equivalence checking.
pub mod verify;

pub use rand;

/// Commonly used types and functions.
/// ```
/// use qarith::prelude::*;
/// ```
pub mod prelude {
    pub use crate::decompositions::{decompose, ResourceStrategy};
    pub use crate::errors::*;
    pub use crate::gates::ArithmeticGate;
    pub use crate::inverter::Invertible;
    pub use crate::primitive_ops::{run_sequence, Primitive, PrimitiveOp};
    pub use crate::registers::{BitState, Register, RegisterAllocator};
    pub use crate::verify::{Mismatch, PermutationCheck};
}
