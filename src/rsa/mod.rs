// RSA Module - Main module file
// Exports key generation and the arithmetic it is built on

pub mod bigint;
pub mod keygen;
pub mod quadratic;

pub use keygen::{generate_pair, KeyGenError, RsaKeyPair, RsaPrivateKey, RsaPublicKey, SmoothPrime};
pub use quadratic::{solve, solve_for_integer};
