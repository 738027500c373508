//! Special functions backing the continuous forecast models
//!
//! - `erf` / `erfc`: positive-term power series below [`SERIES_CUTOFF`],
//!   Laplace continued fraction above it (|error| well under 1e-12)
//! - `erfinv` / `erfcinv`: closed-form initial guess refined with Newton steps
//! - `regularized_incomplete_beta`: Lentz continued fraction (Beta CDF)
//!
//! Every loop here has a fixed iteration cap, so worst-case latency per call
//! is bounded regardless of the input.

use std::f64::consts::{FRAC_2_SQRT_PI, PI};

use crate::{Error, Result};

/// Below this |x| the erf power series is used, above it the erfc continued fraction.
const SERIES_CUTOFF: f64 = 3.0;

/// erfc(x) underflows to zero past this point.
const ERFC_UNDERFLOW: f64 = 27.0;

const MAX_SERIES_TERMS: usize = 200;
const MAX_FRACTION_TERMS: usize = 300;
const NEWTON_STEPS: usize = 6;

/// Winitzki's constant for the closed-form erfinv approximation.
const WINITZKI_A: f64 = 0.147;

/// Guard against division by zero inside the Lentz recurrences.
const LENTZ_TINY: f64 = 1e-300;

/// erf(x) for 0 <= x < `SERIES_CUTOFF`.
///
/// erf(x) = 2/sqrt(pi) * exp(-x^2) * sum 2^n x^(2n+1) / (2n+1)!!
/// All terms are positive, so there is no cancellation.
fn erf_series(x: f64) -> f64 {
    let x2 = x * x;
    let mut term = x;
    let mut sum = x;
    for n in 1..MAX_SERIES_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let denom = 2.0 * n as f64 + 1.0;
        term *= 2.0 * x2 / denom;
        sum += term;
        if term <= sum * f64::EPSILON {
            break;
        }
    }
    FRAC_2_SQRT_PI * (-x2).exp() * sum
}

/// erfc(x) for x >= `SERIES_CUTOFF` via the Laplace continued fraction
/// erfc(x) = exp(-x^2)/sqrt(pi) * 1/(x + (1/2)/(x + 1/(x + (3/2)/(x + ...)))).
fn erfc_fraction(x: f64) -> f64 {
    if x >= ERFC_UNDERFLOW {
        return 0.0;
    }
    let mut f = x;
    let mut c = x;
    let mut d = 0.0;
    for i in 1..MAX_FRACTION_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let a = i as f64 / 2.0;
        d = a.mul_add(d, x);
        if d.abs() < LENTZ_TINY {
            d = LENTZ_TINY;
        }
        d = 1.0 / d;
        c = x + a / c;
        if c.abs() < LENTZ_TINY {
            c = LENTZ_TINY;
        }
        let delta = c * d;
        f *= delta;
        if (delta - 1.0).abs() < f64::EPSILON {
            break;
        }
    }
    (-x * x).exp() / (PI.sqrt() * f)
}

/// Gaussian error function.
///
/// Odd by construction: `erf(-x) == -erf(x)` and `erf(0) == 0` exactly.
#[must_use]
pub fn erf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    let z = x.abs();
    let value = if z < SERIES_CUTOFF {
        erf_series(z)
    } else {
        1.0 - erfc_fraction(z)
    };
    value.copysign(x)
}

/// Complementary error function, `1 - erf(x)`, without cancellation in the upper tail.
#[must_use]
pub fn erfc(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x < 0.0 {
        return 2.0 - erfc(-x);
    }
    if x < SERIES_CUTOFF {
        1.0 - erf_series(x)
    } else {
        erfc_fraction(x)
    }
}

/// Inverse error function on the open interval (-1, 1).
///
/// # Errors
///
/// Returns [`Error::DomainError`] if `y` is not strictly inside (-1, 1).
pub fn erfinv(y: f64) -> Result<f64> {
    if !(y > -1.0 && y < 1.0) {
        return Err(Error::DomainError(format!(
            "erfinv is only defined on (-1, 1), got {y}"
        )));
    }
    if y == 0.0 {
        return Ok(0.0);
    }
    let a = y.abs();
    Ok(erf_inverse_positive(a, 1.0 - a).copysign(y))
}

/// Inverse complementary error function on the open interval (0, 2).
///
/// Works from `q` directly, so `erfcinv(2p)` keeps full precision for
/// probabilities `p` far below machine epsilon where `2p - 1` would round
/// to -1.
///
/// # Errors
///
/// Returns [`Error::DomainError`] if `q` is not strictly inside (0, 2).
pub fn erfcinv(q: f64) -> Result<f64> {
    if !(q > 0.0 && q < 2.0) {
        return Err(Error::DomainError(format!(
            "erfcinv is only defined on (0, 2), got {q}"
        )));
    }
    if q == 1.0 {
        return Ok(0.0);
    }
    if q < 1.0 {
        Ok(erf_inverse_positive(1.0 - q, q))
    } else {
        Ok(-erf_inverse_positive(q - 1.0, 2.0 - q))
    }
}

/// Solve erf(x) = a for x > 0, given `a` and its complement `tail = 1 - a`
/// computed without cancellation.
fn erf_inverse_positive(a: f64, tail: f64) -> f64 {
    let ln = (tail * (1.0 + a)).ln();
    let s = 2.0 / (PI * WINITZKI_A) + ln / 2.0;
    let mut x = (s.mul_add(s, -ln / WINITZKI_A).sqrt() - s).max(0.0).sqrt();

    // Newton on erf(x) = a. The residual is taken from erfc in the upper half
    // so it keeps relative precision as a approaches 1.
    for _ in 0..NEWTON_STEPS {
        let residual = if a < 0.5 { a - erf(x) } else { erfc(x) - tail };
        let slope = FRAC_2_SQRT_PI * (-x * x).exp();
        if slope == 0.0 {
            break;
        }
        let step = residual / slope;
        x += step;
        if step.abs() <= x.abs() * f64::EPSILON {
            break;
        }
    }
    x
}

/// Natural log of the gamma function (Lanczos, g = 7, n = 9).
#[must_use]
#[allow(clippy::excessive_precision, clippy::unreadable_literal)]
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_93,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_13,
        -176.615_029_162_140_59,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_571_6e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let lnpi_sin = (PI * x).sin().abs().ln();
        PI.ln() - lnpi_sin - ln_gamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut ag = COEFFS[0];
        for (i, &c) in COEFFS[1..].iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let denom = x + (i as f64) + 1.0;
            ag += c / denom;
        }
        let t = x + 7.5;
        0.5f64.mul_add((2.0 * PI).ln(), (x + 0.5) * t.ln()) - t + ag.ln()
    }
}

/// ln B(a, b) = ln Gamma(a) + ln Gamma(b) - ln Gamma(a + b).
#[must_use]
pub fn ln_beta(a: f64, b: f64) -> f64 {
    ln_gamma(a) + ln_gamma(b) - ln_gamma(a + b)
}

/// Continued fraction for the incomplete beta function (modified Lentz).
fn beta_fraction(x: f64, a: f64, b: f64) -> f64 {
    let qab = a + b;
    let qap = a + 1.0;
    let qam = a - 1.0;

    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < LENTZ_TINY {
        d = LENTZ_TINY;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=MAX_FRACTION_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let m = m as f64;
        let m2 = 2.0 * m;

        // Even step
        let aa = m * (b - m) * x / ((qam + m2) * (a + m2));
        d = aa.mul_add(d, 1.0);
        if d.abs() < LENTZ_TINY {
            d = LENTZ_TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < LENTZ_TINY {
            c = LENTZ_TINY;
        }
        d = 1.0 / d;
        h *= d * c;

        // Odd step
        let aa = -(a + m) * (qab + m) * x / ((a + m2) * (qap + m2));
        d = aa.mul_add(d, 1.0);
        if d.abs() < LENTZ_TINY {
            d = LENTZ_TINY;
        }
        c = 1.0 + aa / c;
        if c.abs() < LENTZ_TINY {
            c = LENTZ_TINY;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;

        if (del - 1.0).abs() < f64::EPSILON {
            break;
        }
    }

    h
}

/// Regularized incomplete beta for shapes already known to be positive.
///
/// `x` outside [0, 1] is clamped.
pub(crate) fn incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let front = a.mul_add(x.ln(), b * (-x).ln_1p()) - ln_beta(a, b);
    let front = front.exp();

    // Symmetry I_x(a, b) = 1 - I_{1-x}(b, a) keeps the fraction in its fast region
    let value = if x < (a + 1.0) / (a + b + 2.0) {
        front * beta_fraction(x, a, b) / a
    } else {
        1.0 - front * beta_fraction(1.0 - x, b, a) / b
    };
    value.clamp(0.0, 1.0)
}

/// Regularized incomplete beta function `I_x(a, b)`, i.e. the Beta(a, b) CDF at `x`.
///
/// Returns exactly 0 at `x = 0` and exactly 1 at `x = 1`.
///
/// # Errors
///
/// Returns [`Error::DomainError`] if `x` is NaN or either shape is not a
/// positive finite number.
pub fn regularized_incomplete_beta(x: f64, a: f64, b: f64) -> Result<f64> {
    if x.is_nan() {
        return Err(Error::DomainError("incomplete beta argument is NaN".to_string()));
    }
    if !(a > 0.0 && a.is_finite() && b > 0.0 && b.is_finite()) {
        return Err(Error::DomainError(format!(
            "incomplete beta shapes must be positive, got a={a}, b={b}"
        )));
    }
    Ok(incomplete_beta(x, a, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn test_erf_known_values() {
        // Reference values from A&S Table 7.1
        let cases = [
            (0.1, 0.112_462_916_018_284_9),
            (0.5, 0.520_499_877_813_046_5),
            (1.0, 0.842_700_792_949_714_9),
            (2.0, 0.995_322_265_018_952_7),
            (3.5, 0.999_999_256_901_627_7),
        ];
        for (x, expected) in cases {
            assert!(
                (erf(x) - expected).abs() < TOL,
                "erf({x}) = {} expected {expected}",
                erf(x)
            );
        }
    }

    #[test]
    fn test_erf_odd_symmetry() {
        for x in [0.01, 0.3, 1.7, 2.99, 3.01, 6.0] {
            assert_eq!(erf(-x), -erf(x));
        }
        assert_eq!(erf(0.0), 0.0);
    }

    #[test]
    fn test_erf_saturates() {
        assert_eq!(erf(f64::INFINITY), 1.0);
        assert_eq!(erf(f64::NEG_INFINITY), -1.0);
        assert!(erf(f64::NAN).is_nan());
    }

    #[test]
    fn test_erfc_tail() {
        // erfc(4) = 1.541725790028002e-8
        let expected = 1.541_725_790_028_002e-8;
        assert!(((erfc(4.0) - expected) / expected).abs() < 1e-9);
        assert!((erfc(-1.0) - (1.0 + erf(1.0))).abs() < TOL);
    }

    #[test]
    fn test_erf_continuous_at_cutoff() {
        let below = erf(SERIES_CUTOFF - 1e-12);
        let above = erf(SERIES_CUTOFF + 1e-12);
        assert!((above - below).abs() < 1e-12);
    }

    #[test]
    fn test_erfinv_inverts_erf() {
        for y in [-0.999_999, -0.9, -0.5, -1e-6, 1e-12, 0.2, 0.7, 0.95, 0.999_999_9] {
            let x = erfinv(y).unwrap();
            assert!(
                ((erf(x) - y) / y).abs() < 1e-9,
                "erf(erfinv({y})) = {}",
                erf(x)
            );
        }
    }

    #[test]
    fn test_erfinv_known_value() {
        // erfinv(0.5) = 0.4769362762044699
        assert!((erfinv(0.5).unwrap() - 0.476_936_276_204_469_9).abs() < TOL);
        assert_eq!(erfinv(0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_erfinv_domain() {
        for y in [-1.0, 1.0, 1.5, -2.0, f64::NAN] {
            assert!(matches!(erfinv(y), Err(Error::DomainError(_))));
        }
    }

    #[test]
    fn test_erfcinv_inverts_erfc() {
        for q in [1e-300, 1e-20, 1e-10, 0.3, 0.999, 1.2, 1.9, 2.0 - 1e-12] {
            let x = erfcinv(q).unwrap();
            assert!(
                ((erfc(x) - q) / q).abs() < 1e-9,
                "erfc(erfcinv({q})) = {}",
                erfc(x)
            );
        }
        assert_eq!(erfcinv(1.0).unwrap(), 0.0);
    }

    #[test]
    fn test_erfcinv_matches_erfinv() {
        for y in [-0.9, -0.25, 0.5, 0.8] {
            assert!((erfcinv(1.0 - y).unwrap() - erfinv(y).unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_erfcinv_domain() {
        for q in [0.0, 2.0, -1.0, 3.0, f64::NAN] {
            assert!(matches!(erfcinv(q), Err(Error::DomainError(_))));
        }
    }

    #[test]
    fn test_ln_gamma_integers() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!(ln_gamma(2.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn test_incomplete_beta_endpoints() {
        assert_eq!(regularized_incomplete_beta(0.0, 2.0, 5.0).unwrap(), 0.0);
        assert_eq!(regularized_incomplete_beta(1.0, 2.0, 5.0).unwrap(), 1.0);
        assert_eq!(regularized_incomplete_beta(-0.5, 2.0, 5.0).unwrap(), 0.0);
        assert_eq!(regularized_incomplete_beta(1.5, 2.0, 5.0).unwrap(), 1.0);
    }

    #[test]
    fn test_incomplete_beta_closed_forms() {
        // I_x(1, 1) = x
        assert!((regularized_incomplete_beta(0.3, 1.0, 1.0).unwrap() - 0.3).abs() < TOL);
        // I_x(2, 1) = x^2
        assert!((regularized_incomplete_beta(0.6, 2.0, 1.0).unwrap() - 0.36).abs() < TOL);
        // I_x(1, 3) = 1 - (1 - x)^3
        let expected = 1.0 - 0.8_f64.powi(3);
        assert!((regularized_incomplete_beta(0.2, 1.0, 3.0).unwrap() - expected).abs() < TOL);
        // Symmetric shapes: I_0.5(a, a) = 0.5
        assert!((regularized_incomplete_beta(0.5, 3.0, 3.0).unwrap() - 0.5).abs() < TOL);
    }

    #[test]
    fn test_incomplete_beta_monotone() {
        let mut previous = 0.0;
        for i in 0..=1000 {
            let x = f64::from(i) / 1000.0;
            let value = regularized_incomplete_beta(x, 1.36, 4.64).unwrap();
            assert!(value + 1e-15 >= previous, "not monotone at x={x}");
            previous = value;
        }
        assert_eq!(previous, 1.0);
    }

    #[test]
    fn test_incomplete_beta_rejects_bad_shapes() {
        assert!(regularized_incomplete_beta(0.5, 0.0, 1.0).is_err());
        assert!(regularized_incomplete_beta(0.5, 1.0, -2.0).is_err());
        assert!(regularized_incomplete_beta(f64::NAN, 1.0, 1.0).is_err());
    }
}
