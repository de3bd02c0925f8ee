//! Exhaustive equivalence checking of decompositions against the direct
//! gate semantics.
//!
//! A check lays out the operand registers, the control qubits, and the
//! borrowed workspace in one shared qubit array, asks the rule for its
//! primitive sequence once, and then sweeps input configurations: the
//! interpreter output must agree with the oracle output on every bit not
//! declared garbage, with controls and workspace unchanged. Mismatches are
//! findings to report, not errors to raise.

use std::num::NonZeroUsize;

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::decompositions::{decompose, ResourceStrategy};
use crate::errors::{DecompositionError, DecompositionResult};
use crate::gates::ArithmeticGate;
use crate::primitive_ops::{run_sequence, PrimitiveOp};
use crate::registers::{BitState, Register, RegisterAllocator};

/// A single disagreement between the oracle and a decomposed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// The packed input configuration.
    pub input: BitState,
    /// What the gate's direct semantics produce.
    pub expected: BitState,
    /// What the primitive sequence produced.
    pub actual: BitState,
}

/// An exhaustive (or sampled) equivalence check of one decomposition.
#[derive(Debug)]
pub struct PermutationCheck {
    gate: ArithmeticGate,
    registers: Vec<Register>,
    register_limits: Vec<u64>,
    controls: Vec<usize>,
    workspace: Option<Register>,
    garbage_mask: BitState,
    ops: Vec<PrimitiveOp>,
}

impl PermutationCheck {
    /// Lay out a check for `gate` with the given primary register width,
    /// control count, workspace width, and rule-variant strategy.
    pub fn new(
        gate: &ArithmeticGate,
        n: usize,
        control_size: usize,
        workspace: usize,
        strategy: ResourceStrategy,
    ) -> DecompositionResult<Self> {
        let mut alloc = RegisterAllocator::new();
        let sizes = gate.operand_sizes(n);
        let registers = sizes
            .iter()
            .map(|&size| {
                NonZeroUsize::new(size)
                    .map(|size| alloc.register(size))
                    .ok_or_else(|| DecompositionError::invalid("zero-width operand register"))
            })
            .collect::<DecompositionResult<Vec<_>>>()?;
        let controls = (0..control_size)
            .map(|_| alloc.qubit().bit(0))
            .collect::<Vec<_>>();
        let workspace = NonZeroUsize::new(workspace).map(|w| alloc.register(w));

        let ops = decompose(gate, &registers, workspace.as_ref(), &controls, strategy)?;
        let register_limits = registers.iter().map(|r| 1 << r.n()).collect();
        Ok(Self {
            gate: *gate,
            registers,
            register_limits,
            controls,
            workspace,
            garbage_mask: 0,
            ops,
        })
    }

    /// A check using the gate's own workspace declaration and the
    /// lowest-depth rule variant.
    pub fn for_gate(
        gate: &ArithmeticGate,
        n: usize,
        control_size: usize,
    ) -> DecompositionResult<Self> {
        Self::new(
            gate,
            n,
            control_size,
            gate.workspace_width(n),
            ResourceStrategy::MinimizeDepth,
        )
    }

    /// Restrict enumeration of each operand register to values below the
    /// given limits, for gates whose contract only covers a subrange.
    pub fn with_register_limits(mut self, limits: Vec<u64>) -> Self {
        assert_eq!(limits.len(), self.registers.len());
        self.register_limits = limits;
        self
    }

    /// Declare don't-care output bits skipped during comparison.
    pub fn with_garbage_bits<It>(mut self, bits: It) -> Self
    where
        It: IntoIterator<Item = usize>,
    {
        for bit in bits {
            self.garbage_mask |= 1 << bit;
        }
        self
    }

    /// The primitive sequence under test.
    pub fn ops(&self) -> &[PrimitiveOp] {
        &self.ops
    }

    /// Number of input configurations the check enumerates.
    pub fn configurations(&self) -> u64 {
        let regs = self.register_limits.iter().product::<u64>();
        let workspace = self.workspace.as_ref().map(|w| w.n()).unwrap_or(0);
        regs << (self.controls.len() + workspace)
    }

    /// The packed bit-state for a configuration index, mixed-radix over
    /// register limits then control and workspace bits.
    fn state_for(&self, mut index: u64) -> BitState {
        let mut state = 0;
        for (register, limit) in self.registers.iter().zip(self.register_limits.iter()) {
            state = register.write_value(state, index % limit);
            index /= limit;
        }
        for &control in self.controls.iter() {
            state |= (index & 1) << control;
            index >>= 1;
        }
        if let Some(w) = self.workspace.as_ref() {
            state = w.write_value(state, index);
        }
        state
    }

    fn expected(&self, input: BitState) -> BitState {
        if !self.controls.iter().all(|&c| (input >> c) & 1 == 1) {
            return input;
        }
        let sizes = self.registers.iter().map(|r| r.n()).collect::<Vec<_>>();
        let values = self
            .registers
            .iter()
            .map(|r| r.value_in(input))
            .collect::<Vec<_>>();
        let outputs = self.gate.mapping(&sizes, &values);
        self.registers
            .iter()
            .zip(outputs)
            .fold(input, |state, (register, value)| {
                register.write_value(state, value)
            })
    }

    fn check_one(&self, input: BitState) -> Option<Mismatch> {
        let expected = self.expected(input);
        let actual = run_sequence(&self.ops, input);
        if (expected ^ actual) & !self.garbage_mask != 0 {
            Some(Mismatch {
                input,
                expected,
                actual,
            })
        } else {
            None
        }
    }

    /// Sweep every configuration and return the first disagreement found,
    /// if any. Under the `parallel` feature the sweep is distributed and
    /// short-circuits on the first hit in any worker.
    #[cfg(feature = "parallel")]
    pub fn first_mismatch(&self) -> Option<Mismatch> {
        (0..self.configurations())
            .into_par_iter()
            .find_map_any(|index| self.check_one(self.state_for(index)))
    }

    /// Sweep every configuration and return the first disagreement found,
    /// if any.
    #[cfg(not(feature = "parallel"))]
    pub fn first_mismatch(&self) -> Option<Mismatch> {
        (0..self.configurations()).find_map(|index| self.check_one(self.state_for(index)))
    }

    /// Sweep every configuration and collect every disagreement.
    pub fn collect_mismatches(&self) -> Vec<Mismatch> {
        crate::into_iter!(0..self.configurations())
            .filter_map(|index| self.check_one(self.state_for(index)))
            .collect()
    }

    /// Check `samples` randomly drawn configurations; for state spaces too
    /// large to enumerate.
    pub fn sample_mismatch<R: Rng>(&self, samples: usize, rng: &mut R) -> Option<Mismatch> {
        let count = self.configurations();
        (0..samples).find_map(|_| self.check_one(self.state_for(rng.gen_range(0..count))))
    }

    /// Exhaustive below `exhaustive_bound` configurations, quasi-exhaustive
    /// random sampling of that many configurations above it.
    pub fn run(&self, exhaustive_bound: u64) -> Option<Mismatch> {
        if self.configurations() <= exhaustive_bound {
            self.first_mismatch()
        } else {
            let mut rng = rand::thread_rng();
            self.sample_mismatch(exhaustive_bound as usize, &mut rng)
        }
    }
}
