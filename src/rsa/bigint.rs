// RSA Big Integer Operations
// Helpers on top of num-bigint for primality, inverses and magnitude checks

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::thread_rng;

/// Create a big integer from u64
pub fn from_u64(n: u64) -> BigUint {
    BigUint::from(n)
}

/// Extended Euclidean Algorithm over signed integers
/// Returns (g, x, y) such that a*x + b*y = g = gcd(a, b)
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    if b.is_zero() {
        return (a.clone(), BigInt::one(), BigInt::zero());
    }

    let (g, x, y) = extended_gcd(b, &(a % b));
    let next_y = x - (a / b) * &y;

    (g, y, next_y)
}

/// Compute modular inverse: a^(-1) mod m
/// Returns None if gcd(a, m) != 1
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    let a_signed = BigInt::from(a.clone());
    let m_signed = BigInt::from(m.clone());
    let (g, x, _) = extended_gcd(&a_signed, &m_signed);

    if !g.is_one() {
        return None;
    }

    // Normalize the Bezout coefficient into [0, m)
    let reduced = ((x % &m_signed) + &m_signed) % &m_signed;
    reduced.to_biguint()
}

/// Miller-Rabin primality test
/// Each round cuts the error probability by at least a factor of 4
pub fn is_probable_prime(n: &BigUint, rounds: u32) -> bool {
    let two = BigUint::from(2u8);
    let three = BigUint::from(3u8);

    if n < &two {
        return false;
    }
    if n == &two || n == &three {
        return true;
    }
    if n.is_even() {
        return false;
    }

    // Write n-1 as d * 2^s with d odd
    let n_minus_one = n - 1u8;
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let mut rng = thread_rng();
    let n_minus_two = n - &two;

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(&two, &n_minus_two);
        let mut x = a.modpow(&d, n);

        if x.is_one() || x == n_minus_one {
            continue;
        }

        for _ in 1..s {
            x = (&x * &x) % n;
            if x == n_minus_one {
                continue 'witness;
            }
        }

        // Composite
        return false;
    }

    true
}

/// Exact magnitude predicate: x >= sqrt(2) * 2^(bits-1)
/// Squaring both sides avoids any decimal approximation of sqrt(2):
/// the condition holds iff x^2 >= 2^(2*bits - 1)
pub fn at_least_sqrt2_shifted(x: &BigUint, bits: u64) -> bool {
    let threshold = BigUint::one() << (2 * bits - 1);
    x * x >= threshold
}

/// Generate a random probable prime of exactly `bits` bits that additionally
/// occupies its full bit width: p >= sqrt(2) * 2^(bits-1)
pub fn random_full_width_prime(bits: u64, rounds: u32) -> BigUint {
    debug_assert!(bits >= 2);
    let mut rng = thread_rng();

    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);

        if at_least_sqrt2_shifted(&candidate, bits) && is_probable_prime(&candidate, rounds) {
            return candidate;
        }
    }
}

/// Greatest common divisor
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

/// Least common multiple
pub fn lcm(a: &BigUint, b: &BigUint) -> BigUint {
    if a.is_zero() || b.is_zero() {
        return BigUint::zero();
    }
    (a * b) / a.gcd(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_inverse() {
        // 3 * 5 = 15 ≡ 1 mod 7, so inverse of 3 mod 7 is 5
        let inv = mod_inverse(&from_u64(3), &from_u64(7)).unwrap();
        assert_eq!(inv, from_u64(5));

        // 65537 is invertible mod any odd prime product not containing it
        let m = from_u64(3 * 5 * 7 * 11 * 13);
        let e = from_u64(65537);
        let d = mod_inverse(&e, &m).unwrap();
        assert_eq!((e * d) % &m, from_u64(1));
    }

    #[test]
    fn test_mod_inverse_none_when_not_coprime() {
        assert!(mod_inverse(&from_u64(6), &from_u64(9)).is_none());
        assert!(mod_inverse(&from_u64(0), &from_u64(7)).is_none());
    }

    #[test]
    fn test_is_probable_prime() {
        assert!(is_probable_prime(&from_u64(2), 5));
        assert!(is_probable_prime(&from_u64(3), 5));
        assert!(is_probable_prime(&from_u64(65537), 20));
        assert!(!is_probable_prime(&from_u64(1), 5));
        assert!(!is_probable_prime(&from_u64(4), 5));
        assert!(!is_probable_prime(&from_u64(65536), 20));
        // Carmichael number, defeats Fermat but not Miller-Rabin
        assert!(!is_probable_prime(&from_u64(561), 20));
    }

    #[test]
    fn test_at_least_sqrt2_shifted() {
        // sqrt(2) * 2^7 ≈ 181.02, so 181 fails and 182 passes for 8-bit values
        assert!(!at_least_sqrt2_shifted(&from_u64(181), 8));
        assert!(at_least_sqrt2_shifted(&from_u64(182), 8));
        assert!(at_least_sqrt2_shifted(&from_u64(255), 8));
    }

    #[test]
    fn test_random_full_width_prime() {
        for _ in 0..5 {
            let p = random_full_width_prime(12, 20);
            assert_eq!(p.bits(), 12);
            assert!(at_least_sqrt2_shifted(&p, 12));
            assert!(is_probable_prime(&p, 20));
        }
        // Smallest supported width: the only qualifying prime is 3
        assert_eq!(random_full_width_prime(2, 20), from_u64(3));
    }

    #[test]
    fn test_gcd_lcm() {
        assert_eq!(gcd(&from_u64(12), &from_u64(18)), from_u64(6));
        assert_eq!(lcm(&from_u64(4), &from_u64(6)), from_u64(12));
        assert_eq!(lcm(&from_u64(0), &from_u64(6)), from_u64(0));
    }
}
