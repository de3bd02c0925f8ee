//! Rules mapping each gate family to an ordered primitive sequence.
//!
//! Every rule is a pure function from gate parameters, operand registers,
//! and controls to a [PrimitiveOp](crate::primitive_ops::PrimitiveOp)
//! sequence; the host splices the sequence into its circuit. Dispatch over
//! the closed family set is an exhaustive match.

pub mod bimultiplication;
pub mod comparison;

pub use bimultiplication::bimultiply;
pub use comparison::{
    less_than_into_overflow, less_than_low_workspace, predict_overflow, xor_offset_carry_signals,
};

use crate::errors::{DecompositionError, DecompositionResult};
use crate::gates::ArithmeticGate;
use crate::primitive_ops::PrimitiveOp;
use crate::registers::Register;

/// Preference between the decomposition variants of a gate, where more than
/// one exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStrategy {
    /// Borrow no workspace, paying extra full-width adders.
    MinimizeWorkspace,
    /// Borrow dirty workspace to keep circuit depth down.
    MinimizeDepth,
}

/// Decompose `gate` onto its operand registers under `controls`.
///
/// `operands` follow the gate's documented order: `(forward, inverse)` for
/// bimultiplication, `(query, target)` for carry signals, `(query, flag)`
/// for overflow and less-than. Rules that borrow no workspace reject a
/// supplied workspace register rather than silently ignoring it.
pub fn decompose(
    gate: &ArithmeticGate,
    operands: &[Register],
    workspace: Option<&Register>,
    controls: &[usize],
    strategy: ResourceStrategy,
) -> DecompositionResult<Vec<PrimitiveOp>> {
    if operands.len() != 2 {
        return Err(DecompositionError::invalid(format!(
            "expected 2 operand registers, got {}",
            operands.len()
        )));
    }
    let (ra, rb) = (&operands[0], &operands[1]);
    match *gate {
        ArithmeticGate::ModularBimultiplication {
            factor,
            inverse_factor,
            modulus,
        } => {
            reject_workspace(workspace, "modular bimultiplication")?;
            bimultiply(factor, inverse_factor, modulus, ra, rb, controls)
        }
        ArithmeticGate::XorOffsetCarrySignals { offset } => {
            reject_workspace(workspace, "carry-signal prediction")?;
            xor_offset_carry_signals(offset, ra, rb, controls)
        }
        ArithmeticGate::PredictOffsetOverflow { offset } => {
            predict_overflow(offset, ra, rb, workspace, controls)
        }
        ArithmeticGate::LessThanConstant { limit } => match strategy {
            ResourceStrategy::MinimizeDepth => {
                less_than_into_overflow(limit, ra, rb, workspace, controls)
            }
            ResourceStrategy::MinimizeWorkspace => {
                reject_workspace(workspace, "low-workspace less-than")?;
                less_than_low_workspace(limit, ra, rb, controls)
            }
        },
    }
}

fn reject_workspace(workspace: Option<&Register>, rule: &str) -> DecompositionResult<()> {
    match workspace {
        None => Ok(()),
        Some(_) => Err(DecompositionError::not_decomposable(format!(
            "{} takes no workspace register",
            rule
        ))),
    }
}
