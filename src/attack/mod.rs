// Attack Module - Main module file
// Structural factorization and universal key recovery against smooth moduli

pub mod structural;
pub mod universal;

pub use structural::factor;
pub use universal::{
    build_universal_value, recover_private_exponent, RecoveryError, UniversalKeyCache,
};
