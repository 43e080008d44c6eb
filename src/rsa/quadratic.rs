// Quadratic Solver
// Exact integer-root detection for a*x^2 + b*x + c = 0 over big integers

use log::debug;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{Signed, Zero};

/// Divide exactly, or None when the divisor does not divide the numerator
fn exact_div(numerator: BigInt, divisor: &BigInt) -> Option<BigInt> {
    let (quotient, remainder) = numerator.div_rem(divisor);
    if remainder.is_zero() {
        Some(quotient)
    } else {
        None
    }
}

/// Discriminant and its integer square root, when the roots are real.
/// Returns None for a degenerate (a = 0) or negative-discriminant equation.
fn real_discriminant_sqrt(a: &BigInt, b: &BigInt, c: &BigInt) -> Option<(BigInt, BigInt)> {
    if a.is_zero() {
        debug!("quadratic solve: leading coefficient is zero");
        return None;
    }

    let discriminant = b * b - BigInt::from(4) * a * c;
    if discriminant.is_negative() {
        debug!("quadratic solve: negative discriminant, no real roots");
        return None;
    }

    let sqrt = discriminant.sqrt();
    Some((discriminant, sqrt))
}

/// Solve a*x^2 + b*x + c = 0 via (-b ± sqrt(b^2 - 4ac)) / 2a.
///
/// All arithmetic is exact: the pair of roots is returned only when the
/// discriminant is a perfect square and both numerators divide by 2a, i.e.
/// when the roots are themselves integers. Irrational or fractional roots
/// yield None, which is all the structural search ever needs.
pub fn solve(a: &BigInt, b: &BigInt, c: &BigInt) -> Option<(BigInt, BigInt)> {
    let (discriminant, sqrt) = real_discriminant_sqrt(a, b, c)?;
    if &sqrt * &sqrt != discriminant {
        return None;
    }

    let two_a = a * 2;
    let first = exact_div(-b + &sqrt, &two_a)?;
    let second = exact_div(-b - &sqrt, &two_a)?;
    Some((first, second))
}

/// The first root of a*x^2 + b*x + c = 0 (by the ± ordering) that is an
/// exact integer, or None when neither root is.
pub fn solve_for_integer(a: &BigInt, b: &BigInt, c: &BigInt) -> Option<BigInt> {
    let (discriminant, sqrt) = real_discriminant_sqrt(a, b, c)?;

    // A non-square discriminant means both roots are irrational
    if &sqrt * &sqrt != discriminant {
        return None;
    }

    let two_a = a * 2;
    exact_div(-b + &sqrt, &two_a).or_else(|| exact_div(-b - &sqrt, &two_a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    fn int(n: i64) -> BigInt {
        BigInt::from(n)
    }

    #[test]
    fn test_two_integer_roots() {
        // x^2 - 5x + 6 = 0 has roots 3 and 2
        let roots = solve(&int(1), &int(-5), &int(6)).unwrap();
        assert_eq!(roots, (int(3), int(2)));

        let x = solve_for_integer(&int(1), &int(-5), &int(6)).unwrap();
        assert!(x == int(2) || x == int(3));
    }

    #[test]
    fn test_no_real_roots() {
        // x^2 + 1 = 0
        assert!(solve(&int(1), &int(0), &int(1)).is_none());
        assert!(solve_for_integer(&int(1), &int(0), &int(1)).is_none());
    }

    #[test]
    fn test_double_root() {
        // x^2 - 4x + 4 = 0 has the double root 2
        assert_eq!(solve(&int(1), &int(-4), &int(4)), Some((int(2), int(2))));
        assert_eq!(solve_for_integer(&int(1), &int(-4), &int(4)), Some(int(2)));
    }

    #[test]
    fn test_irrational_roots_rejected() {
        // x^2 - 2 = 0: floor(sqrt(8)) = 2 must not be reported as a root
        assert!(solve_for_integer(&int(1), &int(0), &int(-2)).is_none());
        // x^2 - 3x + 1 = 0, discriminant 5
        assert!(solve_for_integer(&int(1), &int(-3), &int(1)).is_none());
    }

    #[test]
    fn test_fractional_roots_rejected() {
        // 2x^2 - x - 1 = 0 has roots 1 and -1/2; only 1 is an integer
        assert_eq!(solve_for_integer(&int(2), &int(-1), &int(-1)), Some(int(1)));
        // 4x^2 - 4x + 1 = 0 has the double root 1/2
        assert!(solve_for_integer(&int(4), &int(-4), &int(1)).is_none());
        assert!(solve(&int(4), &int(-4), &int(1)).is_none());
    }

    #[test]
    fn test_degenerate_leading_coefficient() {
        assert!(solve(&int(0), &int(3), &int(-6)).is_none());
        assert!(solve_for_integer(&int(0), &int(3), &int(-6)).is_none());
    }

    #[test]
    fn test_large_structured_coefficients() {
        // Coefficients taken from the cofactor model with A=5, B=9 and a
        // 150-bit shared factor: A*B*C^2 + (A+B)*C + (1 - N) = 0 at C
        let c_shared = (BigInt::from(1) << 150) + 3;
        let n = (int(5) * &c_shared + 1) * (int(9) * &c_shared + 1);
        let recovered = solve_for_integer(&int(45), &int(14), &(int(1) - n)).unwrap();
        assert_eq!(recovered, c_shared);
    }
}
