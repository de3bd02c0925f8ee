//! Flat, serialization-friendly records of primitive sequences.
//!
//! External tooling consumes decompositions as plain data rather than as
//! crate types. A trace step names the primitive family by a stable string
//! tag and carries its integer parameters, operand qubit positions, and
//! control positions.

use crate::primitive_ops::PrimitiveOp;

/// One primitive application, flattened to plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// Stable tag naming the primitive family.
    pub kind: &'static str,
    /// Integer parameters in declaration order.
    pub parameters: Vec<u64>,
    /// Qubit positions of each operand register, low bit first.
    pub operands: Vec<Vec<usize>>,
    /// Control qubit positions.
    pub controls: Vec<usize>,
}

impl From<&PrimitiveOp> for TraceStep {
    fn from(op: &PrimitiveOp) -> Self {
        Self {
            kind: op.primitive().kind(),
            parameters: op.primitive().parameters(),
            operands: op.operands().iter().map(|r| r.indices().to_vec()).collect(),
            controls: op.controls().to_vec(),
        }
    }
}

/// Flatten a primitive sequence into trace steps, preserving order.
pub fn trace_of(ops: &[PrimitiveOp]) -> Vec<TraceStep> {
    ops.iter().map(TraceStep::from).collect()
}
