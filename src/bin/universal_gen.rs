// One-shot generation utility: multiplies all primes below 2^24 and writes
// the universal value to uniKey_24.txt in the working directory

use std::path::Path;

use anyhow::Result;

use smooth_rsa::attack::universal::build_universal_value;
use smooth_rsa::util::store::{write_value, UNIVERSAL_VALUE_FILE};

const SMOOTHNESS_BOUND: u64 = 1 << 24;

fn main() -> Result<()> {
    env_logger::init();

    println!("[+] Building the universal value (product of all primes below 2^24)");
    let universal = build_universal_value(SMOOTHNESS_BOUND);
    println!("[+] Built, {} bits", universal.bits());

    write_value(Path::new(UNIVERSAL_VALUE_FILE), &universal)?;
    println!("[+] Written to {UNIVERSAL_VALUE_FILE}");

    Ok(())
}
