//! Decomposition of modular bimultiplication into scaled additions, a
//! rotation, and a modular negation.

use crate::errors::{DecompositionError, DecompositionResult};
use crate::primitive_ops::{Primitive, PrimitiveOp};
use crate::registers::Register;

/// Reversibly multiplies one register by a constant and another register by
/// the modular multiplicative inverse of that constant.
///
/// The sequence is an addition sandwich followed by a rotation standing in
/// for a register swap, then a sign fix:
///
/// 1. `inverse += forward * factor (mod modulus)`
/// 2. `forward += inverse * -inverse_factor (mod modulus)`
/// 3. repeat step 1
/// 4. rotate the concatenated pair by `n`, exchanging the halves
/// 5. negate the register now in the inverse position, mod `modulus`
///
/// Cost is `O(n lg n)` primitive gates at depth `O(n)`. All five steps carry
/// the caller's control set.
pub fn bimultiply(
    factor: u64,
    inverse_factor: u64,
    modulus: u64,
    forward: &Register,
    inverse: &Register,
    controls: &[usize],
) -> DecompositionResult<Vec<PrimitiveOp>> {
    let n = forward.n();
    if inverse.n() != n {
        return Err(DecompositionError::invalid(format!(
            "expected equal operand widths, got {} and {}",
            n,
            inverse.n()
        )));
    }
    if modulus == 0 || u128::from(modulus) > 1u128 << n {
        return Err(DecompositionError::invalid(format!(
            "expected 0 < modulus <= 2^{}, got {}",
            n, modulus
        )));
    }

    let scale_add = Primitive::ScaledAddMod {
        factor: factor % modulus,
        modulus,
    };
    let scale_sub = Primitive::ScaledAddMod {
        factor: (modulus - inverse_factor % modulus) % modulus,
        modulus,
    };

    let ctrls = || controls.iter().copied();
    Ok(vec![
        PrimitiveOp::new(scale_add, [forward.clone(), inverse.clone()], ctrls()),
        PrimitiveOp::new(scale_sub, [inverse.clone(), forward.clone()], ctrls()),
        PrimitiveOp::new(scale_add, [forward.clone(), inverse.clone()], ctrls()),
        PrimitiveOp::new(
            Primitive::RotateBits { amount: n },
            [forward.concat(inverse)],
            ctrls(),
        ),
        PrimitiveOp::new(Primitive::NegateMod { modulus }, [inverse.clone()], ctrls()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gates::ArithmeticGate;
    use crate::inverter::Invertible;
    use crate::primitive_ops::run_sequence;
    use crate::registers::RegisterAllocator;
    use crate::utils::mod_inverse;
    use crate::verify::PermutationCheck;
    use std::num::NonZeroUsize;

    #[test]
    fn test_rejects_mismatched_widths() {
        let mut alloc = RegisterAllocator::new();
        let ra = alloc.register(NonZeroUsize::new(3).unwrap());
        let rb = alloc.register(NonZeroUsize::new(2).unwrap());
        assert!(bimultiply(1, 1, 4, &ra, &rb, &[]).is_err());
    }

    #[test]
    fn test_rejects_oversized_modulus() {
        let mut alloc = RegisterAllocator::new();
        let ra = alloc.register(NonZeroUsize::new(2).unwrap());
        let rb = alloc.register(NonZeroUsize::new(2).unwrap());
        assert!(bimultiply(1, 1, 5, &ra, &rb, &[]).is_err());
        assert!(bimultiply(1, 1, 0, &ra, &rb, &[]).is_err());
        assert!(bimultiply(1, 1, 4, &ra, &rb, &[]).is_ok());
    }

    #[test]
    fn test_matches_oracle_exhaustively() {
        for n in 1..=4usize {
            for modulus in 1..=1u64 << n {
                for factor in 1..=modulus {
                    let inverse_factor = match mod_inverse(factor, modulus) {
                        Some(0) => modulus,
                        Some(inv) => inv,
                        None => continue,
                    };
                    for control_size in 0..=3usize {
                        let gate = ArithmeticGate::modular_bimultiplication(
                            factor,
                            inverse_factor,
                            modulus,
                        )
                        .unwrap();
                        let check = PermutationCheck::for_gate(&gate, n, control_size)
                            .unwrap()
                            .with_register_limits(vec![modulus, modulus]);
                        assert_eq!(
                            check.first_mismatch(),
                            None,
                            "n={} modulus={} factor={} controls={}",
                            n,
                            modulus,
                            factor,
                            control_size
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_round_trip_restores_inputs() {
        let n = 3usize;
        let mut alloc = RegisterAllocator::new();
        let forward = alloc.register(NonZeroUsize::new(n).unwrap());
        let inverse = alloc.register(NonZeroUsize::new(n).unwrap());
        for modulus in 1..=1u64 << n {
            for factor in 1..=modulus {
                let inverse_factor = match mod_inverse(factor, modulus) {
                    Some(0) => modulus,
                    Some(inv) => inv,
                    None => continue,
                };
                let gate =
                    ArithmeticGate::modular_bimultiplication(factor, inverse_factor, modulus)
                        .unwrap();
                let there = match gate {
                    ArithmeticGate::ModularBimultiplication {
                        factor,
                        inverse_factor,
                        modulus,
                    } => bimultiply(factor, inverse_factor, modulus, &forward, &inverse, &[])
                        .unwrap(),
                    _ => unreachable!(),
                };
                let back = match gate.inverse() {
                    ArithmeticGate::ModularBimultiplication {
                        factor,
                        inverse_factor,
                        modulus,
                    } => bimultiply(factor, inverse_factor, modulus, &forward, &inverse, &[])
                        .unwrap(),
                    _ => unreachable!(),
                };
                for f in 0..modulus {
                    for v in 0..modulus {
                        let state = inverse.write_value(forward.write_value(0, f), v);
                        let mid = run_sequence(&there, state);
                        assert_eq!(run_sequence(&back, mid), state);
                    }
                }
            }
        }
    }
}
