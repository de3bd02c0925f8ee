//! Decompositions for carry-signal prediction, overflow prediction, and
//! comparison against a constant.

use crate::errors::{DecompositionError, DecompositionResult};
use crate::primitive_ops::{Primitive, PrimitiveOp};
use crate::registers::Register;
use crate::utils::mask;

fn check_flag_and_offset(
    n: usize,
    flag: &Register,
    offset: u64,
) -> DecompositionResult<()> {
    if flag.n() != 1 {
        return Err(DecompositionError::invalid(format!(
            "expected a single flag qubit, got {}",
            flag.n()
        )));
    }
    if offset > mask::<u64>(n) {
        return Err(DecompositionError::invalid(format!(
            "expected offset < 2^{}, got {}",
            n, offset
        )));
    }
    Ok(())
}

fn flag_flip<Cs>(flag: &Register, controls: Cs) -> PrimitiveOp
where
    Cs: IntoIterator<Item = usize>,
{
    PrimitiveOp::new(Primitive::XorConst { mask: 1 }, [flag.clone()], controls)
}

/// XORs into `target` the carry signals of `query + offset`, restoring
/// `query`.
///
/// The circuit XORs the offset into the query, runs a downward sweep of
/// doubly-controlled flips `target[i] ^= query[i] & target[i - 1]` to
/// propagate carries, seeds the carry chain at each set offset bit, then
/// mirrors the sweep and removes the offset again. The sweeps and offset
/// flips cancel on their own, so only the seeding section carries the
/// gate's controls.
pub fn xor_offset_carry_signals(
    offset: u64,
    query: &Register,
    target: &Register,
    controls: &[usize],
) -> DecompositionResult<Vec<PrimitiveOp>> {
    let n = query.n();
    if target.n() != n {
        return Err(DecompositionError::invalid(format!(
            "expected equal operand widths, got {} and {}",
            n,
            target.n()
        )));
    }
    if offset > mask::<u64>(n) {
        return Err(DecompositionError::invalid(format!(
            "expected offset < 2^{}, got {}",
            n, offset
        )));
    }
    if offset == 0 {
        // No carries can arise; the gate's contract is the identity.
        return Ok(vec![]);
    }

    let xor_offset = PrimitiveOp::new(Primitive::XorConst { mask: offset }, [query.clone()], []);
    let sweep = |i: usize| {
        PrimitiveOp::new(
            Primitive::XorConst { mask: 1 << i },
            [target.clone()],
            [query.bit(i), target.bit(i - 1)],
        )
    };

    let mut ops = vec![xor_offset.clone()];
    for i in (1..n).rev() {
        ops.push(sweep(i));
    }
    for i in 0..n {
        if (offset >> i) & 1 == 1 {
            // target[i] ^= !query[i], under the gate's controls; with the
            // offset folded into the query this seeds the carry at bit i.
            ops.push(PrimitiveOp::new(
                Primitive::XorConst { mask: 1 << i },
                [target.clone()],
                controls.iter().copied().chain([query.bit(i)]),
            ));
            ops.push(PrimitiveOp::new(
                Primitive::XorConst { mask: 1 << i },
                [target.clone()],
                controls.iter().copied(),
            ));
        }
    }
    for i in 1..n {
        ops.push(sweep(i));
    }
    ops.push(xor_offset);
    Ok(ops)
}

/// Flips `flag` iff `query + offset` overflows the query register, using
/// `n - 1` borrowed dirty workspace bits which are restored to their
/// arbitrary initial content.
///
/// The carry-signal sequence for the low `n - 1` bits is applied twice,
/// bracketing flag toggles controlled on the top workspace bit; the
/// bracketing cancels the workspace garbage out of the toggles, leaving
/// exactly the majority function of the top query bit, the top offset bit,
/// and the incoming carry.
pub fn predict_overflow(
    offset: u64,
    query: &Register,
    flag: &Register,
    workspace: Option<&Register>,
    controls: &[usize],
) -> DecompositionResult<Vec<PrimitiveOp>> {
    let n = query.n();
    check_flag_and_offset(n, flag, offset)?;
    match workspace {
        Some(w) if w.n() == n - 1 => {}
        None if n == 1 => {}
        _ => {
            return Err(DecompositionError::not_decomposable(format!(
                "overflow prediction needs exactly {} dirty workspace bits",
                n - 1
            )))
        }
    }
    if offset == 0 {
        return Ok(vec![]);
    }
    if n == 1 {
        // The carry out of a one-bit register is just query & offset.
        return Ok(vec![flag_flip(
            flag,
            controls.iter().copied().chain([query.bit(0)]),
        )]);
    }
    let (low, w) = match (query.low_bits(n - 1), workspace) {
        (Some(low), Some(w)) => (low, w),
        _ => unreachable!(),
    };

    let o_low = offset & mask::<u64>(n - 1);
    let o_top = (offset >> (n - 1)) & 1;
    let carry_in = w.top_bit();
    let x_top = query.top_bit();

    let inner = xor_offset_carry_signals(o_low, &low, w, &[])?;
    let mut toggles = vec![flag_flip(
        flag,
        controls.iter().copied().chain([x_top, carry_in]),
    )];
    if o_top == 1 {
        toggles.push(flag_flip(flag, controls.iter().copied().chain([carry_in])));
    }

    let mut ops = Vec::with_capacity(2 * (inner.len() + toggles.len()) + 1);
    ops.extend(inner.iter().cloned());
    ops.extend(toggles.iter().cloned());
    ops.extend(inner);
    ops.extend(toggles);
    if o_top == 1 {
        ops.push(flag_flip(flag, controls.iter().copied().chain([x_top])));
    }
    Ok(ops)
}

/// Flips `flag` iff `query < limit`, by predicting whether adding the
/// two's-complement of the limit overflows, then inverting the sense.
/// Requires the same `n - 1` dirty workspace bits as overflow prediction.
pub fn less_than_into_overflow(
    limit: u64,
    query: &Register,
    flag: &Register,
    workspace: Option<&Register>,
    controls: &[usize],
) -> DecompositionResult<Vec<PrimitiveOp>> {
    let n = query.n();
    if flag.n() != 1 {
        return Err(DecompositionError::invalid(format!(
            "expected a single flag qubit, got {}",
            flag.n()
        )));
    }
    match workspace {
        Some(w) if w.n() == n - 1 => {}
        None if n == 1 => {}
        _ => {
            return Err(DecompositionError::not_decomposable(format!(
                "less-than via overflow needs exactly {} dirty workspace bits",
                n - 1
            )))
        }
    }
    if limit == 0 {
        // Nothing is below zero; identity, not an error.
        return Ok(vec![]);
    }
    let span = 1u128 << n;
    if u128::from(limit) >= span {
        // Every register value is below the limit.
        return Ok(vec![flag_flip(flag, controls.iter().copied())]);
    }

    // query < limit iff query + (2^n - limit) does not overflow.
    let offset = (span - u128::from(limit)) as u64;
    let mut ops = predict_overflow(offset, query, flag, workspace, controls)?;
    ops.push(flag_flip(flag, controls.iter().copied()));
    Ok(ops)
}

/// Flips `flag` iff `query < limit` with zero workspace, at the cost of two
/// full-width constant adders.
///
/// Subtracting the limit from the concatenation `query ++ flag` folds the
/// borrow-out into the flag bit; adding the limit back onto `query` alone
/// restores the register.
pub fn less_than_low_workspace(
    limit: u64,
    query: &Register,
    flag: &Register,
    controls: &[usize],
) -> DecompositionResult<Vec<PrimitiveOp>> {
    let n = query.n();
    if flag.n() != 1 {
        return Err(DecompositionError::invalid(format!(
            "expected a single flag qubit, got {}",
            flag.n()
        )));
    }
    if limit == 0 {
        return Ok(vec![]);
    }
    let span = 1u128 << n;
    if u128::from(limit) >= span {
        return Ok(vec![flag_flip(flag, controls.iter().copied())]);
    }

    let combined = query.concat(flag);
    let subtract = ((span << 1) - u128::from(limit)) as u64;
    Ok(vec![
        PrimitiveOp::new(
            Primitive::AddConst { offset: subtract },
            [combined],
            controls.iter().copied(),
        ),
        PrimitiveOp::new(
            Primitive::AddConst { offset: limit },
            [query.clone()],
            controls.iter().copied(),
        ),
    ])
}
