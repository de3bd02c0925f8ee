use crate::primitive_ops::PrimitiveOp;

/// A capability for values with an exact reversible inverse.
///
/// Gate families and primitive applications implement this directly; there
/// is no global registry or post-hoc patching of shared gate types.
pub trait Invertible {
    /// The value whose action undoes `self`.
    fn inverse(&self) -> Self;
}

/// Invert an ordered primitive sequence: reversed order, each op inverted.
pub fn invert_sequence(ops: &[PrimitiveOp]) -> Vec<PrimitiveOp> {
    ops.iter().rev().map(|op| op.inverse()).collect()
}
