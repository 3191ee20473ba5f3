#![crate_name = "lss_util"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Utilities for the lss crates.

use prime_factorization::Factorization;

/// Returns whether the number p is prime; this function is 100% accurate.
pub fn is_prime(p: u64) -> bool {
    p >= 2 && Factorization::run(p).is_prime
}

/// Decomposes `q` as `p^m` with `p` prime.
///
/// Returns `None` when `q` is not a prime power (this includes 0 and 1).
pub fn prime_power(q: u64) -> Option<(u64, u32)> {
    if q < 2 {
        return None;
    }
    let factors = Factorization::run(q).factors;
    let p = *factors.first()?;
    if factors.iter().all(|f| *f == p) {
        Some((p, factors.len() as u32))
    } else {
        None
    }
}

/// Binomial coefficient `n choose k`, saturating at `u128::MAX`.
pub fn binomial(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc * (n - i) is always divisible by (i + 1)
        acc = match acc.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    acc
}

/// Greatest common divisor.
pub fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn primes() {
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(is_prime(1153));
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(!is_prime(4));
        assert!(!is_prime(1155));
    }

    #[test]
    fn prime_powers() {
        assert_eq!(prime_power(2), Some((2, 1)));
        assert_eq!(prime_power(4), Some((2, 2)));
        assert_eq!(prime_power(8), Some((2, 3)));
        assert_eq!(prime_power(9), Some((3, 2)));
        assert_eq!(prime_power(125), Some((5, 3)));
        assert_eq!(prime_power(0), None);
        assert_eq!(prime_power(1), None);
        assert_eq!(prime_power(6), None);
        assert_eq!(prime_power(12), None);
    }

    #[test]
    fn binomials() {
        assert_eq!(binomial(6, 0), 1);
        assert_eq!(binomial(6, 2), 15);
        assert_eq!(binomial(6, 6), 1);
        assert_eq!(binomial(2, 3), 0);
        assert_eq!(binomial(60, 30), 118264581564861424);
    }

    proptest! {
        #[test]
        fn gcd_divides(a in 1u128..1_000_000, b in 1u128..1_000_000) {
            let g = gcd(a, b);
            prop_assert_eq!(a % g, 0);
            prop_assert_eq!(b % g, 0);
        }

        #[test]
        fn prime_power_roundtrip(p in prop::sample::select(vec![2u64, 3, 5, 7, 11]), m in 1u32..6) {
            prop_assert_eq!(prime_power(p.pow(m)), Some((p, m)));
        }
    }
}
