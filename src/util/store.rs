// Universal Value Persistence
// Decimal-string files for the universal value and the derived exponent;
// kept separate from the derive/reuse decision, which lives on the cache

use std::fs;
use std::io;
use std::path::Path;

use num_bigint::BigUint;
use thiserror::Error;

use crate::attack::universal::UniversalKeyCache;

/// Decimal string of the product of all primes below 2^24
pub const UNIVERSAL_VALUE_FILE: &str = "uniKey_24.txt";

/// Decimal string of the derived private exponent
pub const DERIVED_EXPONENT_FILE: &str = "uniKey_24d.txt";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("{path} does not start with a decimal integer")]
    Parse { path: String },
}

/// Write a big integer as a decimal string
pub fn write_value(path: &Path, value: &BigUint) -> Result<(), StoreError> {
    fs::write(path, value.to_string())?;
    Ok(())
}

/// Read a big integer from the first line of a decimal-string file
pub fn read_value(path: &Path) -> Result<BigUint, StoreError> {
    let text = fs::read_to_string(path)?;
    let first_line = text.lines().next().unwrap_or("").trim();
    BigUint::parse_bytes(first_line.as_bytes(), 10).ok_or_else(|| StoreError::Parse {
        path: path.display().to_string(),
    })
}

/// Load the universal value from `dir`, together with the derived exponent
/// when one has been persisted already
pub fn load_cache(dir: &Path) -> Result<UniversalKeyCache, StoreError> {
    let universal = read_value(&dir.join(UNIVERSAL_VALUE_FILE))?;

    let derived_path = dir.join(DERIVED_EXPONENT_FILE);
    if derived_path.exists() {
        let derived = read_value(&derived_path)?;
        Ok(UniversalKeyCache::with_derived(universal, derived))
    } else {
        Ok(UniversalKeyCache::new(universal))
    }
}

/// Persist a freshly derived exponent next to the universal value
pub fn store_derived(dir: &Path, derived: &BigUint) -> Result<(), StoreError> {
    write_value(&dir.join(DERIVED_EXPONENT_FILE), derived)
}
