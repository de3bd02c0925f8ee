use num_traits::PrimInt;

/// A mask covering the lowest `n` bits of `T`.
pub fn mask<T: PrimInt>(n: usize) -> T {
    let bits = T::zero().count_zeros() as usize;
    if n >= bits {
        !T::zero()
    } else {
        (T::one() << n) - T::one()
    }
}

/// Extracts bits from a number in a particular order.
///
/// # Example
///
/// ```
/// use qarith::utils::extract_bits;
///
/// assert_eq!(extract_bits(0b1010u64, &[3, 0]), 0b01);
/// ```
#[inline]
pub fn extract_bits<T: PrimInt>(num: T, indices: &[usize]) -> T {
    indices.iter().enumerate().fold(T::zero(), |acc, (i, index)| {
        let bit = (num >> *index) & T::one();
        acc | (bit << i)
    })
}

/// `(a * b) % m` without intermediate overflow.
#[inline]
pub fn mod_mul(a: u64, b: u64, m: u64) -> u64 {
    ((u128::from(a) * u128::from(b)) % u128::from(m)) as u64
}

/// The multiplicative inverse of `a` modulo `m`, if one exists.
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    if m == 1 {
        return Some(0);
    }
    // Extended Euclid over signed intermediates.
    let (mut r0, mut r1) = (i128::from(m), i128::from(a % m));
    let (mut s0, mut s1) = (0i128, 1i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (s0, s1) = (s1, s0 - q * s1);
    }
    if r0 != 1 {
        None
    } else {
        Some(s0.rem_euclid(i128::from(m)) as u64)
    }
}

/// The carry produced at each bit position when adding `offset` to `x` over
/// `n` bits: bit `i` of the result is the carry out of position `i`.
pub fn carry_signals(x: u64, offset: u64, n: usize) -> u64 {
    let mut carry = 0;
    let mut signals = 0;
    for i in 0..n {
        let xi = (x >> i) & 1;
        let oi = (offset >> i) & 1;
        // Majority of the two addend bits and the incoming carry.
        carry = (xi & oi) | (carry & (xi ^ oi));
        signals |= carry << i;
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_widths() {
        assert_eq!(mask::<u64>(0), 0);
        assert_eq!(mask::<u64>(3), 0b111);
        assert_eq!(mask::<u64>(64), u64::MAX);
        assert_eq!(mask::<u8>(8), 0xff);
    }

    #[test]
    fn test_extract_bits_orders() {
        assert_eq!(extract_bits(0b1010u64, &[1, 3]), 0b11);
        assert_eq!(extract_bits(0b1010u64, &[0, 2]), 0b00);
        assert_eq!(extract_bits(0b01u64, &[1, 0]), 0b10);
    }

    #[test]
    fn test_mod_inverse_pairs() {
        assert_eq!(mod_inverse(4, 9), Some(7));
        assert_eq!(mod_inverse(7, 9), Some(4));
        assert_eq!(mod_inverse(3, 9), None);
        assert_eq!(mod_inverse(1, 2), Some(1));
        assert_eq!(mod_inverse(5, 1), Some(0));
        assert_eq!(mod_inverse(0, 7), None);
    }

    #[test]
    fn test_mod_inverse_exhaustive_small() {
        for m in 1..32u64 {
            for a in 0..m {
                match mod_inverse(a, m) {
                    Some(inv) => assert_eq!(mod_mul(a, inv, m), 1 % m, "a={} m={}", a, m),
                    None => assert!((0..m).all(|b| mod_mul(a, b, m) != 1 % m)),
                }
            }
        }
    }

    #[test]
    fn test_carry_signals_against_direct_sum() {
        for n in 1..=6usize {
            for x in 0..1u64 << n {
                for offset in 0..1u64 << n {
                    let signals = carry_signals(x, offset, n);
                    for i in 0..n {
                        let low = mask::<u64>(i + 1);
                        let expected = ((x & low) + (offset & low)) >> (i + 1);
                        assert_eq!((signals >> i) & 1, expected & 1);
                    }
                }
            }
        }
    }
}
