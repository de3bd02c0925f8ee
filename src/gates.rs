use crate::errors::{DecompositionError, DecompositionResult};
use crate::inverter::Invertible;
use crate::utils::{carry_signals, mod_mul};

/// A high-level reversible arithmetic gate instance.
///
/// Instances are immutable value objects; equality and hashing are by
/// family and parameters. The family set is closed, so decomposition
/// dispatch is an exhaustive match rather than a runtime registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticGate {
    /// Simultaneously maps `forward -> forward * factor % modulus` and
    /// `inverse -> inverse * inverse_factor % modulus` for operand values
    /// below the modulus.
    ModularBimultiplication {
        /// The constant multiplied into the forward register.
        factor: u64,
        /// The modular inverse of `factor`, multiplied into the inverse
        /// register.
        inverse_factor: u64,
        /// Modulus of the arithmetic.
        modulus: u64,
    },
    /// XORs into the target register the carry signal produced at each bit
    /// position by `query + offset`; the query register is unchanged.
    XorOffsetCarrySignals {
        /// The compile-time addend.
        offset: u64,
    },
    /// Flips the flag iff `query + offset` overflows the query register;
    /// the query register is unchanged.
    PredictOffsetOverflow {
        /// The compile-time addend.
        offset: u64,
    },
    /// Flips the flag iff `query < limit`; the query register is unchanged.
    LessThanConstant {
        /// The compile-time comparand.
        limit: u64,
    },
}

impl ArithmeticGate {
    /// A modular bimultiplication gate. Fails unless
    /// `factor * inverse_factor == 1 (mod modulus)` with both factors
    /// nonzero; width-dependent bounds are checked when registers are bound.
    pub fn modular_bimultiplication(
        factor: u64,
        inverse_factor: u64,
        modulus: u64,
    ) -> DecompositionResult<Self> {
        if modulus == 0 {
            return Err(DecompositionError::invalid("modulus must be positive"));
        }
        if factor == 0 || inverse_factor == 0 {
            return Err(DecompositionError::invalid("factors must be positive"));
        }
        if mod_mul(factor % modulus, inverse_factor % modulus, modulus) != 1 % modulus {
            return Err(DecompositionError::invalid(format!(
                "expected factor * inverse_factor == 1 (mod {}), got {} * {}",
                modulus, factor, inverse_factor
            )));
        }
        Ok(Self::ModularBimultiplication {
            factor,
            inverse_factor,
            modulus,
        })
    }

    /// A carry-signal gate for the given offset.
    pub fn xor_offset_carry_signals(offset: u64) -> Self {
        Self::XorOffsetCarrySignals { offset }
    }

    /// An overflow-prediction gate for the given offset.
    pub fn predict_offset_overflow(offset: u64) -> Self {
        Self::PredictOffsetOverflow { offset }
    }

    /// A less-than-constant gate for the given limit. Limits at or above
    /// the register span make the flag flip unconditionally.
    pub fn less_than_constant(limit: u64) -> Self {
        Self::LessThanConstant { limit }
    }

    /// Widths of the operand registers this gate acts on, given the width
    /// of its primary register.
    pub fn operand_sizes(&self, n: usize) -> Vec<usize> {
        match self {
            Self::ModularBimultiplication { .. } | Self::XorOffsetCarrySignals { .. } => {
                vec![n, n]
            }
            Self::PredictOffsetOverflow { .. } | Self::LessThanConstant { .. } => vec![n, 1],
        }
    }

    /// Dirty workspace width the lowest-depth decomposition of this gate
    /// borrows, given the width of its primary register. The low-workspace
    /// less-than variant uses none.
    pub fn workspace_width(&self, n: usize) -> usize {
        match self {
            Self::PredictOffsetOverflow { .. } | Self::LessThanConstant { .. } => {
                n.saturating_sub(1)
            }
            _ => 0,
        }
    }

    /// The direct input-to-output mapping of the gate: the ground truth the
    /// verification engine compares decompositions against.
    ///
    /// `sizes` and `values` describe the operand registers in order. The
    /// modular bimultiplication contract only covers operand values below
    /// the modulus; other values are returned unchanged and callers should
    /// restrict enumeration accordingly.
    pub fn mapping(&self, sizes: &[usize], values: &[u64]) -> Vec<u64> {
        match *self {
            Self::ModularBimultiplication {
                factor,
                inverse_factor,
                modulus,
            } => {
                let (f, v) = (values[0], values[1]);
                if f >= modulus || v >= modulus {
                    vec![f, v]
                } else {
                    vec![
                        mod_mul(f, factor % modulus, modulus),
                        mod_mul(v, inverse_factor % modulus, modulus),
                    ]
                }
            }
            Self::XorOffsetCarrySignals { offset } => {
                let (x, t) = (values[0], values[1]);
                vec![x, t ^ carry_signals(x, offset, sizes[0])]
            }
            Self::PredictOffsetOverflow { offset } => {
                let (x, flag) = (values[0], values[1]);
                let overflow = (u128::from(x) + u128::from(offset)) >> sizes[0];
                vec![x, flag ^ u64::from(overflow != 0)]
            }
            Self::LessThanConstant { limit } => {
                let (x, flag) = (values[0], values[1]);
                vec![x, flag ^ u64::from(x < limit)]
            }
        }
    }
}

impl Invertible for ArithmeticGate {
    fn inverse(&self) -> Self {
        match *self {
            Self::ModularBimultiplication {
                factor,
                inverse_factor,
                modulus,
            } => Self::ModularBimultiplication {
                factor: inverse_factor,
                inverse_factor: factor,
                modulus,
            },
            // The comparison gates XOR a function of the untouched query
            // register into their target, so each is its own inverse.
            gate => gate,
        }
    }
}
