// End-to-end demonstration: generate a smooth key pair, encrypt a fixed
// plaintext, then decrypt with a private exponent recovered from the
// universal value alone (no factorization of N)

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use num_bigint::BigUint;

use smooth_rsa::rsa::keygen::{generate_pair, DEFAULT_MAX_ATTEMPTS};
use smooth_rsa::util::store;

const PRIME_BITS: u64 = 1024;
const MAX_TOTIENT_FACTOR_BITS: u64 = 20;
const PUBLIC_EXPONENT: u32 = 65537;
const PLAINTEXT: &str = "111000222000333000444000555000666000777000888000999000111000";

fn main() -> Result<()> {
    env_logger::init();

    let e = BigUint::from(PUBLIC_EXPONENT);

    println!("[+] Generating primes.");
    let pair = generate_pair(MAX_TOTIENT_FACTOR_BITS, PRIME_BITS, &e, DEFAULT_MAX_ATTEMPTS)?;
    let n = &pair.public_key.n;
    println!("[+] Primes have been generated.");
    println!("e : {e}");
    println!("q : {}", pair.private_key.q);
    println!("p : {}", pair.private_key.p);
    println!("N : {n}");

    println!("[+] Encrypting some data.");
    let m = BigUint::parse_bytes(PLAINTEXT.as_bytes(), 10)
        .ok_or_else(|| anyhow!("plaintext is not a decimal integer"))?;
    let cipher = m.modpow(&e, n);
    println!("m : {m}");
    println!("c : {cipher}");

    println!("[+] Recovering a private exponent from the universal value.");
    let dir = Path::new(".");
    let mut cache = store::load_cache(dir)
        .with_context(|| format!("run universal_gen first to produce {}", store::UNIVERSAL_VALUE_FILE))?;

    let had_derived = cache.derived().is_some();
    let d = cache.derived_or_recover(&e)?.clone();
    println!("[+] d size: {} bits", d.bits());

    if !had_derived {
        store::store_derived(dir, &d)?;
        println!("[+] Derived exponent written to {}", store::DERIVED_EXPONENT_FILE);
    }

    println!("m : {}", cipher.modpow(&d, n));
    println!("[+] Finished successfully.");

    Ok(())
}
