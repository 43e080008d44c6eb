// Smooth RSA Key Generation
// Builds primes whose totient p-1 is a product of bounded-size prime factors,
// then assembles a key pair satisfying the usual RSA modulus conditions

use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

use super::bigint::{
    at_least_sqrt2_shifted, is_probable_prime, lcm, mod_inverse, random_full_width_prime,
};

/// Miller-Rabin rounds for accepting a chain product + 1 as prime
pub const DEFAULT_MR_ROUNDS: u32 = 64;

/// Default cap on joint generation attempts before the parameters are
/// reported as infeasible
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10_000;

// Chain rebuilds allowed per candidate before giving the slot back to the
// outer attempt loop
const MAX_CHAIN_REBUILDS: u32 = 64;

// Candidate constructions per prime slot within a single attempt
const MAX_CANDIDATE_ROUNDS: u32 = 4_096;

#[derive(Debug, Error, PartialEq)]
pub enum KeyGenError {
    #[error("prime bit size must be at least 16, got {0}")]
    PrimeSizeTooSmall(u64),
    #[error("totient factor bound must be at least 3 bits, got {0}")]
    FactorBoundTooSmall(u64),
    #[error("no valid key pair found within {attempts} attempts, parameters look infeasible")]
    InfeasibleParameters { attempts: u32 },
}

/// A prime together with the recorded factor chain of its totient:
/// value - 1 is exactly the product of `chain`
#[derive(Debug, Clone)]
pub struct SmoothPrime {
    pub value: BigUint,
    pub chain: Vec<BigUint>,
}

/// RSA Public Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPublicKey {
    pub n: BigUint,
    pub e: BigUint,
}

/// RSA Private Key
#[derive(Debug, Clone, PartialEq)]
pub struct RsaPrivateKey {
    pub n: BigUint,
    pub d: BigUint,
    pub q: BigUint,
    pub p: BigUint,
}

/// RSA Key Pair, keeping the totient factor chains of both primes so the
/// smoothness bound can be audited after the fact
#[derive(Debug, Clone)]
pub struct RsaKeyPair {
    pub public_key: RsaPublicKey,
    pub private_key: RsaPrivateKey,
    pub q_chain: Vec<BigUint>,
    pub p_chain: Vec<BigUint>,
}

/// Build one smooth candidate chain: multiply full-width primes of at most
/// `max_factor_bits` bits onto an accumulator starting at 2 until it spans
/// exactly `prime_bits` bits, then test accumulator + 1 for primality.
fn build_smooth_candidate(
    max_factor_bits: u64,
    prime_bits: u64,
    mr_rounds: u32,
) -> Option<SmoothPrime> {
    let mut accumulator = BigUint::from(2u8);
    let mut chain = vec![BigUint::from(2u8)];
    let mut rebuilds = 0u32;

    while accumulator.bits() < prime_bits {
        let remaining = prime_bits - accumulator.bits();

        if remaining <= 2 {
            // Too little room left to place a useful factor, rebuild the chain
            rebuilds += 1;
            if rebuilds > MAX_CHAIN_REBUILDS {
                return None;
            }
            accumulator = BigUint::from(2u8);
            chain.clear();
            chain.push(BigUint::from(2u8));
            continue;
        }

        let factor = random_full_width_prime(remaining.min(max_factor_bits), mr_rounds);
        accumulator *= &factor;
        chain.push(factor);
    }

    if accumulator.bits() != prime_bits {
        return None;
    }

    let candidate = &accumulator + 1u8;
    if is_probable_prime(&candidate, mr_rounds) {
        Some(SmoothPrime {
            value: candidate,
            chain,
        })
    } else {
        None
    }
}

/// Generate a smooth-totient prime of exactly `prime_bits` bits whose
/// totient factors each span at most `max_factor_bits` bits
pub fn generate_smooth_prime(
    max_factor_bits: u64,
    prime_bits: u64,
    mr_rounds: u32,
) -> Option<SmoothPrime> {
    for _ in 0..MAX_CANDIDATE_ROUNDS {
        if let Some(prime) = build_smooth_candidate(max_factor_bits, prime_bits, mr_rounds) {
            return Some(prime);
        }
    }
    None
}

/// Check the RSA modulus conditions on a candidate prime pair and, when they
/// hold, return the private exponent:
///
///   1. sqrt(2) * 2^(n/2 - 1) <= q <= 2^(n/2) - 1
///   2. sqrt(2) * 2^(n/2 - 1) <= p <= 2^(n/2) - 1
///   3. |p - q| > 2^(n/2 - 100)
///   4. 2^(n/2) < d < lcm(q - 1, p - 1), where d = e^(-1) mod lcm(q-1, p-1)
///
/// For n/2 <= 100 the separation threshold drops below 1, so condition 3
/// degenerates to p != q.
fn check_rsa_conditions(q: &BigUint, p: &BigUint, half_bits: u64, e: &BigUint) -> Option<BigUint> {
    // Upper bound 2^(n/2) - 1 is exactly "spans half_bits bits"
    if q.bits() != half_bits || p.bits() != half_bits {
        return None;
    }
    if !at_least_sqrt2_shifted(q, half_bits) || !at_least_sqrt2_shifted(p, half_bits) {
        return None;
    }

    let difference = if p > q { p - q } else { q - p };
    let separation_ok = if half_bits > 100 {
        difference > (BigUint::one() << (half_bits - 100))
    } else {
        !difference.is_zero()
    };
    if !separation_ok {
        return None;
    }

    let lambda = lcm(&(q - 1u8), &(p - 1u8));
    let d = mod_inverse(e, &lambda)?;
    if d <= (BigUint::one() << half_bits) || d >= lambda {
        return None;
    }

    Some(d)
}

/// Generate a pair of smooth-totient primes (q, p) for a modulus of
/// 2 * `prime_bits` bits and assemble the key pair for public exponent `e`.
///
/// Both primes are regenerated from scratch whenever the joint validation
/// fails; after `max_attempts` failed attempts the parameters are reported
/// as infeasible rather than looping forever.
pub fn generate_pair(
    max_factor_bits: u64,
    prime_bits: u64,
    e: &BigUint,
    max_attempts: u32,
) -> Result<RsaKeyPair, KeyGenError> {
    if prime_bits < 16 {
        return Err(KeyGenError::PrimeSizeTooSmall(prime_bits));
    }
    if max_factor_bits < 3 {
        return Err(KeyGenError::FactorBoundTooSmall(max_factor_bits));
    }

    for attempt in 1..=max_attempts {
        let Some(q) = generate_smooth_prime(max_factor_bits, prime_bits, DEFAULT_MR_ROUNDS) else {
            continue;
        };
        let Some(p) = generate_smooth_prime(max_factor_bits, prime_bits, DEFAULT_MR_ROUNDS) else {
            continue;
        };

        match check_rsa_conditions(&q.value, &p.value, prime_bits, e) {
            Some(d) => {
                info!("smooth key pair accepted on attempt {attempt}");
                let n = &q.value * &p.value;
                return Ok(RsaKeyPair {
                    public_key: RsaPublicKey { n: n.clone(), e: e.clone() },
                    private_key: RsaPrivateKey {
                        n,
                        d,
                        q: q.value,
                        p: p.value,
                    },
                    q_chain: q.chain,
                    p_chain: p.chain,
                });
            }
            None => {
                debug!("attempt {attempt}: joint validation failed, discarding both candidates");
            }
        }
    }

    Err(KeyGenError::InfeasibleParameters {
        attempts: max_attempts,
    })
}
