// Universal Key Recovery
// Precomputes the product of all small primes and derives a private exponent
// for any modulus whose totients are smooth under the bound, without factoring

use log::{debug, info};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use thiserror::Error;

use crate::rsa::bigint::{gcd, mod_inverse};

#[derive(Debug, Error, PartialEq)]
pub enum RecoveryError {
    #[error("public exponent does not divide the universal value exactly")]
    InexactDivision,
    #[error("public exponent has no inverse modulo the reduced universal value")]
    NoInverse,
}

/// All primes strictly below `bound`, by sieve of Eratosthenes
pub fn small_primes(bound: u64) -> Vec<u64> {
    if bound <= 2 {
        return Vec::new();
    }

    let limit = bound as usize;
    let mut composite = vec![false; limit];
    let mut primes = Vec::new();

    for i in 2..limit {
        if composite[i] {
            continue;
        }
        primes.push(i as u64);
        let mut multiple = i * i;
        while multiple < limit {
            composite[multiple] = true;
            multiple += i;
        }
    }

    primes
}

// Balanced product of a slice; sequential multiplication would be quadratic
// in the total bit length at bound 2^24
fn balanced_product(values: &[BigUint]) -> BigUint {
    match values.len() {
        0 => BigUint::one(),
        1 => values[0].clone(),
        len => balanced_product(&values[..len / 2]) * balanced_product(&values[len / 2..]),
    }
}

/// The universal value for `bound`: the product of all primes strictly below
/// `bound`. Computed once and persisted; immutable thereafter.
///
/// Any modulus built from primes whose totients are `bound`-smooth and
/// squarefree has lcm(q-1, p-1) dividing this value.
pub fn build_universal_value(bound: u64) -> BigUint {
    let primes: Vec<BigUint> = small_primes(bound).into_iter().map(BigUint::from).collect();
    info!("multiplying {} primes below {bound}", primes.len());
    balanced_product(&primes)
}

/// Derive a private exponent for public exponent `e` from the universal
/// value: d = e^(-1) mod (U / e).
///
/// The division must be exact, which holds exactly when `e` is one of the
/// primes multiplied into `U`; an inexact division is reported instead of
/// silently truncating.
pub fn recover_private_exponent(universal: &BigUint, e: &BigUint) -> Result<BigUint, RecoveryError> {
    let (reduced, remainder) = universal.div_rem(e);
    if !remainder.is_zero() {
        return Err(RecoveryError::InexactDivision);
    }

    // Expected to be 1 when e is prime and appears once in the product
    info!("gcd(e, U/e) = {}", gcd(e, &reduced));

    mod_inverse(e, &reduced).ok_or(RecoveryError::NoInverse)
}

/// The universal value plus the derived-exponent cache, injected explicitly
/// so the read/derive/reuse decision is testable without a filesystem
#[derive(Debug, Clone)]
pub struct UniversalKeyCache {
    universal: BigUint,
    derived: Option<BigUint>,
}

impl UniversalKeyCache {
    pub fn new(universal: BigUint) -> Self {
        Self {
            universal,
            derived: None,
        }
    }

    pub fn with_derived(universal: BigUint, derived: BigUint) -> Self {
        Self {
            universal,
            derived: Some(derived),
        }
    }

    pub fn universal(&self) -> &BigUint {
        &self.universal
    }

    pub fn derived(&self) -> Option<&BigUint> {
        self.derived.as_ref()
    }

    /// Return the cached private exponent for `e`, deriving and caching it on
    /// first use
    pub fn derived_or_recover(&mut self, e: &BigUint) -> Result<&BigUint, RecoveryError> {
        if self.derived.is_none() {
            let d = recover_private_exponent(&self.universal, e)?;
            debug!("derived private exponent of {} bits", d.bits());
            self.derived = Some(d);
        }
        Ok(self.derived.as_ref().expect("just populated"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::bigint::from_u64;

    #[test]
    fn test_small_primes() {
        assert_eq!(small_primes(2), Vec::<u64>::new());
        assert_eq!(small_primes(3), vec![2]);
        assert_eq!(small_primes(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        // pi(10000) = 1229
        assert_eq!(small_primes(10000).len(), 1229);
    }

    #[test]
    fn test_universal_value_is_primorial() {
        // Product of primes below 20: 2*3*5*7*11*13*17*19 = 9699690
        assert_eq!(build_universal_value(20), from_u64(9_699_690));
        // The bound is strict: 11 itself is excluded
        assert_eq!(build_universal_value(11), from_u64(210));
        assert_eq!(build_universal_value(2), BigUint::one());
    }

    #[test]
    fn test_recover_requires_exact_division() {
        let universal = build_universal_value(10); // 210
        assert_eq!(
            recover_private_exponent(&universal, &from_u64(11)),
            Err(RecoveryError::InexactDivision)
        );
    }

    #[test]
    fn test_recover_is_idempotent() {
        let universal = build_universal_value(32);
        let e = from_u64(7);
        let first = recover_private_exponent(&universal, &e).unwrap();
        let second = recover_private_exponent(&universal, &e).unwrap();
        assert_eq!(first, second);

        // e * d ≡ 1 modulo the reduced universal value
        let reduced = &universal / &e;
        assert_eq!((e * first) % reduced, BigUint::one());
    }

    #[test]
    fn test_end_to_end_decryption_without_factoring() {
        // q = 59 and p = 23 have 32-smooth squarefree totients:
        // q - 1 = 2 * 29, p - 1 = 2 * 11, lcm = 2 * 11 * 29 = 638
        let q = from_u64(59);
        let p = from_u64(23);
        let n = &q * &p;
        let e = from_u64(7);

        let universal = build_universal_value(32);
        let d = recover_private_exponent(&universal, &e).unwrap();

        let m = from_u64(42);
        let c = m.modpow(&e, &n);
        assert_eq!(c.modpow(&d, &n), m);

        // A second plaintext through the same exponent
        let m2 = from_u64(1234);
        let c2 = m2.modpow(&e, &n);
        assert_eq!(c2.modpow(&d, &n), m2);
    }

    #[test]
    fn test_cache_derives_once_and_reuses() {
        let mut cache = UniversalKeyCache::new(build_universal_value(32));
        assert!(cache.derived().is_none());

        let e = from_u64(7);
        let d = cache.derived_or_recover(&e).unwrap().clone();
        assert_eq!(cache.derived(), Some(&d));

        // Second call reuses the cached value
        let again = cache.derived_or_recover(&e).unwrap().clone();
        assert_eq!(again, d);

        // A preloaded cache never derives at all
        let preloaded = UniversalKeyCache::with_derived(from_u64(210), from_u64(99));
        assert_eq!(preloaded.derived(), Some(&from_u64(99)));
    }
}
