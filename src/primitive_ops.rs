use smallvec::SmallVec;

use crate::inverter::Invertible;
use crate::registers::{BitState, Register};
use crate::utils::{mask, mod_mul};

/// Elementary reversible primitives. Each is a permutation of its operands'
/// state space, for every setting of the other qubits.
///
/// The modular primitives act on the subspace where the target value is
/// below the modulus and leave larger values untouched, which keeps them
/// permutations of the full space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// `target <- (target + input * factor) % modulus` for targets below the
    /// modulus. Operands: `(input, target)`.
    ScaledAddMod {
        /// Scale applied to the input value, already reduced mod `modulus`.
        factor: u64,
        /// Modulus of the arithmetic.
        modulus: u64,
    },
    /// `target <- (modulus - target) % modulus` for targets below the
    /// modulus. Operands: `(target,)`.
    NegateMod {
        /// Modulus of the arithmetic.
        modulus: u64,
    },
    /// Cyclic rotation of the target's bits toward the most significant end.
    /// Operands: `(target,)`.
    RotateBits {
        /// Number of positions each bit moves up.
        amount: usize,
    },
    /// `target <- target ^ mask`. Operands: `(target,)`.
    XorConst {
        /// The constant XORed into the target.
        mask: u64,
    },
    /// `target <- (target + offset) % 2^width`. Operands: `(target,)`.
    AddConst {
        /// The constant added to the target.
        offset: u64,
    },
}

impl Primitive {
    /// Stable tag naming the primitive family, for trace export.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ScaledAddMod { .. } => "scaled_add_mod",
            Self::NegateMod { .. } => "negate_mod",
            Self::RotateBits { .. } => "rotate_bits",
            Self::XorConst { .. } => "xor_const",
            Self::AddConst { .. } => "add_const",
        }
    }

    /// Printable integer parameters, in declaration order.
    pub fn parameters(&self) -> Vec<u64> {
        match *self {
            Self::ScaledAddMod { factor, modulus } => vec![factor, modulus],
            Self::NegateMod { modulus } => vec![modulus],
            Self::RotateBits { amount } => vec![amount as u64],
            Self::XorConst { mask } => vec![mask],
            Self::AddConst { offset } => vec![offset],
        }
    }
}

/// Control bit positions attached to a primitive application.
pub type Controls = SmallVec<[usize; 4]>;

/// A primitive bound to operand registers and a control set. The operand
/// count is fixed per primitive kind; see [Primitive].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimitiveOp {
    primitive: Primitive,
    operands: SmallVec<[Register; 2]>,
    controls: Controls,
}

impl PrimitiveOp {
    /// Bind `primitive` to operand registers and control bit positions.
    pub fn new<Rs, Cs>(primitive: Primitive, operands: Rs, controls: Cs) -> Self
    where
        Rs: IntoIterator<Item = Register>,
        Cs: IntoIterator<Item = usize>,
    {
        Self {
            primitive,
            operands: operands.into_iter().collect(),
            controls: controls.into_iter().collect(),
        }
    }

    /// The bound primitive.
    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    /// Operand registers, in the order the primitive documents.
    pub fn operands(&self) -> &[Register] {
        self.operands.as_ref()
    }

    /// Control bit positions. Controls are read, never written.
    pub fn controls(&self) -> &[usize] {
        self.controls.as_ref()
    }

    /// Apply the primitive to a packed bit-state. Identity unless every
    /// control bit is 1.
    pub fn apply(&self, state: BitState) -> BitState {
        if !self.controls.iter().all(|&c| (state >> c) & 1 == 1) {
            return state;
        }
        match self.primitive {
            Primitive::ScaledAddMod { factor, modulus } => {
                let input = &self.operands[0];
                let target = &self.operands[1];
                let t = target.value_in(state);
                if t < modulus {
                    let x = input.value_in(state) % modulus;
                    let t = (t + mod_mul(x, factor, modulus)) % modulus;
                    target.write_value(state, t)
                } else {
                    state
                }
            }
            Primitive::NegateMod { modulus } => {
                let target = &self.operands[0];
                let t = target.value_in(state);
                if t < modulus {
                    target.write_value(state, (modulus - t) % modulus)
                } else {
                    state
                }
            }
            Primitive::RotateBits { amount } => {
                let target = &self.operands[0];
                let n = target.n();
                let k = amount % n;
                if k == 0 {
                    state
                } else {
                    let v = target.value_in(state);
                    let v = ((v << k) | (v >> (n - k))) & mask::<u64>(n);
                    target.write_value(state, v)
                }
            }
            Primitive::XorConst { mask: m } => {
                let target = &self.operands[0];
                let v = (target.value_in(state) ^ m) & mask::<u64>(target.n());
                target.write_value(state, v)
            }
            Primitive::AddConst { offset } => {
                let target = &self.operands[0];
                let v = target.value_in(state).wrapping_add(offset) & mask::<u64>(target.n());
                target.write_value(state, v)
            }
        }
    }
}

impl Invertible for PrimitiveOp {
    fn inverse(&self) -> Self {
        let primitive = match self.primitive {
            Primitive::ScaledAddMod { factor, modulus } => Primitive::ScaledAddMod {
                factor: (modulus - factor % modulus) % modulus,
                modulus,
            },
            Primitive::NegateMod { modulus } => Primitive::NegateMod { modulus },
            Primitive::RotateBits { amount } => {
                let n = self.operands[0].n();
                Primitive::RotateBits {
                    amount: (n - amount % n) % n,
                }
            }
            Primitive::XorConst { mask } => Primitive::XorConst { mask },
            Primitive::AddConst { offset } => {
                let n = self.operands[0].n();
                Primitive::AddConst {
                    offset: offset.wrapping_neg() & mask::<u64>(n),
                }
            }
        };
        Self {
            primitive,
            operands: self.operands.clone(),
            controls: self.controls.clone(),
        }
    }
}

/// Run an ordered primitive sequence over a packed bit-state.
pub fn run_sequence(ops: &[PrimitiveOp], state: BitState) -> BitState {
    ops.iter().fold(state, |state, op| op.apply(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inverter::invert_sequence;
    use crate::registers::RegisterAllocator;
    use std::num::NonZeroUsize;

    fn two_registers(n: usize) -> (Register, Register) {
        let mut alloc = RegisterAllocator::new();
        let n = NonZeroUsize::new(n).unwrap();
        (alloc.register(n), alloc.register(n))
    }

    #[test]
    fn test_scaled_add_mod() {
        let (ra, rb) = two_registers(3);
        let op = PrimitiveOp::new(
            Primitive::ScaledAddMod {
                factor: 3,
                modulus: 5,
            },
            [ra.clone(), rb.clone()],
            [],
        );
        for a in 0..8u64 {
            for b in 0..8u64 {
                let state = rb.write_value(ra.write_value(0, a), b);
                let out = op.apply(state);
                assert_eq!(ra.value_in(out), a);
                let expected = if b < 5 { (b + (a % 5) * 3 % 5) % 5 } else { b };
                assert_eq!(rb.value_in(out), expected);
            }
        }
    }

    #[test]
    fn test_negate_mod() {
        let mut alloc = RegisterAllocator::new();
        let r = alloc.register(NonZeroUsize::new(3).unwrap());
        let op = PrimitiveOp::new(Primitive::NegateMod { modulus: 6 }, [r.clone()], []);
        for v in 0..8u64 {
            let out = r.value_in(op.apply(r.write_value(0, v)));
            let expected = if v < 6 { (6 - v) % 6 } else { v };
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_rotate_swaps_halves() {
        let (ra, rb) = two_registers(2);
        let pair = ra.concat(&rb);
        let op = PrimitiveOp::new(Primitive::RotateBits { amount: 2 }, [pair], []);
        for a in 0..4u64 {
            for b in 0..4u64 {
                let state = rb.write_value(ra.write_value(0, a), b);
                let out = op.apply(state);
                assert_eq!(ra.value_in(out), b);
                assert_eq!(rb.value_in(out), a);
            }
        }
    }

    #[test]
    fn test_controls_gate_application() {
        let mut alloc = RegisterAllocator::new();
        let r = alloc.register(NonZeroUsize::new(2).unwrap());
        let c = alloc.qubit();
        let op = PrimitiveOp::new(Primitive::XorConst { mask: 0b11 }, [r.clone()], [c.bit(0)]);
        let off = r.write_value(0, 0b01);
        assert_eq!(op.apply(off), off);
        let on = c.write_value(off, 1);
        assert_eq!(r.value_in(op.apply(on)), 0b10);
    }

    #[test]
    fn test_add_const_wraps() {
        let mut alloc = RegisterAllocator::new();
        let r = alloc.register(NonZeroUsize::new(3).unwrap());
        let op = PrimitiveOp::new(Primitive::AddConst { offset: 6 }, [r.clone()], []);
        for v in 0..8u64 {
            assert_eq!(r.value_in(op.apply(r.write_value(0, v))), (v + 6) % 8);
        }
    }

    #[test]
    fn test_sequence_inversion_is_identity() {
        let (ra, rb) = two_registers(3);
        let pair = ra.concat(&rb);
        let ops = vec![
            PrimitiveOp::new(
                Primitive::ScaledAddMod {
                    factor: 2,
                    modulus: 7,
                },
                [ra.clone(), rb.clone()],
                [],
            ),
            PrimitiveOp::new(Primitive::RotateBits { amount: 3 }, [pair], []),
            PrimitiveOp::new(Primitive::AddConst { offset: 5 }, [ra.clone()], []),
            PrimitiveOp::new(Primitive::XorConst { mask: 0b101 }, [rb.clone()], []),
            PrimitiveOp::new(Primitive::NegateMod { modulus: 5 }, [ra.clone()], []),
        ];
        let undo = invert_sequence(&ops);
        for state in 0..1u64 << 6 {
            let forward = run_sequence(&ops, state);
            assert_eq!(run_sequence(&undo, forward), state);
        }
    }
}
