use std::num::NonZeroUsize;

use crate::utils::extract_bits;

/// A packed assignment of every qubit in a layout, one bit per qubit.
pub type BitState = u64;

/// An ordered view into a shared qubit array, interpreted as an unsigned
/// integer with the first index as the least significant bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Register {
    indices: Vec<usize>,
}

impl Register {
    /// Construct a register from absolute qubit indices. Returns `None` for
    /// an empty index list.
    pub fn new<It>(indices: It) -> Option<Self>
    where
        It: Into<Vec<usize>>,
    {
        let indices = indices.into();
        if indices.is_empty() {
            None
        } else {
            Some(Self { indices })
        }
    }

    /// Width of the register in qubits.
    pub fn n(&self) -> usize {
        self.indices.len()
    }

    /// Absolute indices represented by the register.
    pub fn indices(&self) -> &[usize] {
        self.indices.as_ref()
    }

    /// Absolute index of the register's `i`th bit.
    pub fn bit(&self, i: usize) -> usize {
        self.indices[i]
    }

    /// Absolute index of the most significant bit.
    pub fn top_bit(&self) -> usize {
        self.indices[self.indices.len() - 1]
    }

    /// The register formed by the `k` least significant bits.
    pub fn low_bits(&self, k: usize) -> Option<Self> {
        Self::new(&self.indices[..k.min(self.indices.len())])
    }

    /// Concatenate with `other`, whose bits become the more significant half.
    pub fn concat(&self, other: &Self) -> Self {
        let indices = self
            .indices
            .iter()
            .chain(other.indices.iter())
            .copied()
            .collect::<Vec<_>>();
        Self { indices }
    }

    /// The value this register holds in a packed bit-state.
    pub fn value_in(&self, state: BitState) -> u64 {
        extract_bits(state, &self.indices)
    }

    /// Write `value` into this register's bits of a packed bit-state.
    pub fn write_value(&self, state: BitState, value: u64) -> BitState {
        self.indices
            .iter()
            .enumerate()
            .fold(state, |state, (i, index)| {
                let bit = (value >> i) & 1;
                (state & !(1 << *index)) | (bit << *index)
            })
    }
}

/// Hands out disjoint consecutive registers over a shared qubit array.
///
/// Operand registers of a single gate application must not alias; going
/// through one allocator guarantees it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisterAllocator {
    n: usize,
}

impl RegisterAllocator {
    /// A fresh allocator with no qubits handed out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of qubits handed out so far.
    pub fn n(&self) -> usize {
        self.n
    }

    /// Allocate a register of `n` fresh qubits.
    pub fn register(&mut self, n: NonZeroUsize) -> Register {
        let n = usize::from(n);
        assert!(self.n + n <= 64, "a packed bit-state holds at most 64 qubits");
        let indices = (self.n..self.n + n).collect::<Vec<_>>();
        self.n += n;
        Register { indices }
    }

    /// Allocate a single fresh qubit.
    pub fn qubit(&mut self) -> Register {
        self.register(NonZeroUsize::new(1).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocator_disjoint() {
        let mut alloc = RegisterAllocator::new();
        let ra = alloc.register(NonZeroUsize::new(3).unwrap());
        let rb = alloc.register(NonZeroUsize::new(2).unwrap());
        let rq = alloc.qubit();
        assert_eq!(ra.indices(), &[0, 1, 2]);
        assert_eq!(rb.indices(), &[3, 4]);
        assert_eq!(rq.indices(), &[5]);
        assert_eq!(alloc.n(), 6);
    }

    #[test]
    fn test_value_round_trip() {
        let mut alloc = RegisterAllocator::new();
        let _pad = alloc.register(NonZeroUsize::new(2).unwrap());
        let r = alloc.register(NonZeroUsize::new(3).unwrap());
        for value in 0..8 {
            let state = r.write_value(0b11, value);
            assert_eq!(r.value_in(state), value);
            // Bits outside the register are untouched.
            assert_eq!(state & 0b11, 0b11);
        }
    }

    #[test]
    fn test_concat_and_slices() {
        let mut alloc = RegisterAllocator::new();
        let ra = alloc.register(NonZeroUsize::new(2).unwrap());
        let rb = alloc.qubit();
        let pair = ra.concat(&rb);
        assert_eq!(pair.indices(), &[0, 1, 2]);
        assert_eq!(pair.top_bit(), 2);
        let low = pair.low_bits(2).unwrap();
        assert_eq!(low.indices(), ra.indices());
        assert_eq!(pair.low_bits(0), None);

        let state = pair.write_value(0, 0b101);
        assert_eq!(ra.value_in(state), 0b01);
        assert_eq!(rb.value_in(state), 1);
    }

    #[test]
    fn test_empty_register() {
        assert_eq!(Register::new([]), None);
        assert!(Register::new([4]).is_some());
    }
}
