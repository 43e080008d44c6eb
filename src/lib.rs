// Smooth-Totient RSA Laboratory
// Generation of RSA primes with bounded totient factors, and the matching
// structural factorization / universal key recovery attacks

pub mod attack;
pub mod rsa;
pub mod util;
