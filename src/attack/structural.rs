// Structural Factorization
// Recovers q, p from N = q*p when q - 1 = A*C and p - 1 = B*C for small
// cofactors A, B and an unknown shared factor C

use log::info;
use num_bigint::{BigInt, BigUint};
use num_traits::One;

use crate::rsa::quadratic::solve_for_integer;

// Inner-loop iterations between progress lines
const PROGRESS_INTERVAL: u64 = 1000;

/// Brute-force search for the cofactor pair (A, B) with A < 2^max_bits_a and
/// B < 2^max_bits_b. For each pair, N = (A*C + 1)(B*C + 1) is a quadratic in
/// C with coefficients (A*B, A + B, 1 - N); an exact integer root gives the
/// factorization q = A*C + 1, p = B*C + 1.
///
/// The first pair that yields an integer root wins and the search halts.
/// None means the search space was exhausted without a match, not that N
/// lacks the structure: a shared factor may still exist beyond the bounds.
/// Runtime is O(2^max_bits_a * 2^max_bits_b) quadratic solves by design.
pub fn factor(n: &BigUint, max_bits_a: u32, max_bits_b: u32) -> Option<(BigUint, BigUint)> {
    let one_minus_n = BigInt::one() - BigInt::from(n.clone());
    let limit_a = 1u64 << max_bits_a;
    let limit_b = 1u64 << max_bits_b;

    for a in 1..limit_a {
        for b in 1..limit_b {
            if b % PROGRESS_INTERVAL == 0 {
                info!("structural search at a = {a}, b = {b}");
            }

            let quad_a = BigInt::from(a as u128 * b as u128);
            let quad_b = BigInt::from(a + b);

            if let Some(c) = solve_for_integer(&quad_a, &quad_b, &one_minus_n) {
                // The negative branch of the ± can surface first; only a
                // positive shared factor describes a factorization
                if c < BigInt::one() {
                    continue;
                }

                let q = (BigInt::from(a) * &c + 1u32).to_biguint()?;
                let p = (BigInt::from(b) * &c + 1u32).to_biguint()?;
                info!("structural match at a = {a}, b = {b}");
                return Some((q, p));
            }
        }
    }

    None
}
