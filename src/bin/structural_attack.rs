// Structural attack driver: brute-forces the cofactor pair of a modulus
// known to have the shared-totient-factor structure

use anyhow::{anyhow, Result};
use num_bigint::BigUint;

use smooth_rsa::attack::structural;

// 2048-bit modulus built from two primes with 24-bit-smooth shared structure
const TARGET_MODULUS: &str = "18369583373607319524848230962864856788641872197252249438510296626216984019007677702311097233452292800473780549833857255316215760088065227188397682289515575253632392397154509976661652110491280121945920658057741810958542678894186440036821454425304791711282798209813170929253634748758078024559105723170657056597590907448619311520601807972190177072206898115185040151891234092197380308491753453831541747105318516636718409456228079194323214814365300355951159745383220310112790585573021538809712101420219793936813969140292008646607866839526754976413947326170794193769109782049514397188341708331264800385010840190811956595297";

const COFACTOR_BITS_A: u32 = 24;
const COFACTOR_BITS_B: u32 = 24;

fn main() -> Result<()> {
    env_logger::init();

    let n = BigUint::parse_bytes(TARGET_MODULUS.as_bytes(), 10)
        .ok_or_else(|| anyhow!("target modulus is not a decimal integer"))?;

    match structural::factor(&n, COFACTOR_BITS_A, COFACTOR_BITS_B) {
        Some((q, p)) => {
            println!("N : {n}");
            println!("Q : {q}");
            println!("P : {p}");
            println!("qp: {}", &q * &p);
        }
        None => {
            println!("[+] Could not factorize within {COFACTOR_BITS_A}/{COFACTOR_BITS_B} bit cofactor bounds");
        }
    }

    Ok(())
}
