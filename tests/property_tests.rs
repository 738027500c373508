//! Property-based tests for forecast-score
//!
//! - Test mathematical invariants of the fitted models
//! - Test scoring bounds
//! - Run with ProptestConfig::with_cases(100)

use forecast_score::forecast::ChoiceForecast;
use forecast_score::special::{erf, erfinv, regularized_incomplete_beta};
use forecast_score::{brier_score, Distribution, LogNormal, Pareto, Pert};
use proptest::prelude::*;

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate (min, mode, max) with the mode away from the edges
fn arb_pert() -> impl Strategy<Value = Pert> {
    (-1000.0f64..1000.0, 0.1f64..1000.0, 0.1f64..0.9).prop_map(|(min, width, fraction)| {
        Pert::new(min, fraction.mul_add(width, min), min + width).unwrap()
    })
}

/// Generate increasing positive (p5, p50, p95)
fn arb_lognormal() -> impl Strategy<Value = LogNormal> {
    (0.01f64..100.0, 1.1f64..10.0, 1.1f64..10.0).prop_map(|(p5, low, high)| {
        LogNormal::new(p5, p5 * low, p5 * low * high).unwrap()
    })
}

/// Generate positive p90 < p99
fn arb_pareto() -> impl Strategy<Value = Pareto> {
    (0.01f64..1000.0, 1.1f64..100.0)
        .prop_map(|(p90, ratio)| Pareto::new(p90, p90 * ratio).unwrap())
}

/// Generate PERT fits over wide magnitudes, mode anywhere including the edges
fn arb_wide_pert() -> impl Strategy<Value = Pert> {
    (-1e6f64..1e6, 1e-3f64..1e6, 0.0f64..=1.0).prop_map(|(min, width, fraction)| {
        Pert::new(min, fraction.mul_add(width, min), min + width).unwrap()
    })
}

/// Generate log-normal fits from very narrow to very wide spreads
fn arb_wide_lognormal() -> impl Strategy<Value = LogNormal> {
    (1e-3f64..1e6, 1.001f64..100.0, 1.001f64..100.0).prop_map(|(p5, low, high)| {
        LogNormal::new(p5, p5 * low, p5 * low * high).unwrap()
    })
}

/// Generate Pareto fits up to very large tail indices (alpha ~= 2300)
fn arb_wide_pareto() -> impl Strategy<Value = Pareto> {
    (1e-3f64..1e20, 1.001f64..100.0)
        .prop_map(|(p90, ratio)| Pareto::new(p90, p90 * ratio).unwrap())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // PERT Properties
    // ========================================================================

    /// Property: cdf is 0 at min, 1 at max, within [0, 1] and non-decreasing
    #[test]
    fn prop_pert_cdf_bounds_and_monotone(pert in arb_pert(), steps in 2usize..50) {
        prop_assert_eq!(pert.cdf(pert.min()), 0.0);
        prop_assert_eq!(pert.cdf(pert.max()), 1.0);

        let mut previous = 0.0;
        for i in 0..=steps {
            #[allow(clippy::cast_precision_loss)]
            let x = pert.min() + pert.range() * (i as f64) / (steps as f64);
            let cdf = pert.cdf(x);
            prop_assert!((0.0..=1.0).contains(&cdf));
            prop_assert!(cdf >= previous - 1e-12, "cdf dropped at {}: {} < {}", x, cdf, previous);
            previous = cdf;
        }
    }

    /// Property: ppf inverts cdf inside the support
    #[test]
    fn prop_pert_ppf_inverts_cdf(pert in arb_pert(), fraction in 0.1f64..0.9) {
        let x = fraction.mul_add(pert.range(), pert.min());
        let back = pert.ppf(pert.cdf(x)).unwrap();
        prop_assert!((back - x).abs() < 1e-5 * pert.range(), "x={} back={}", x, back);
    }

    /// Property: mean follows the weighted-mode formula and lies in the support
    #[test]
    fn prop_pert_mean_in_support(pert in arb_pert()) {
        let mean = pert.mean();
        prop_assert!(mean >= pert.min() && mean <= pert.max());
        let expected = (pert.min() + pert.max() + 4.0 * pert.mode()) / 6.0;
        prop_assert!((mean - expected).abs() < 1e-9 * pert.range().max(1.0));
    }

    // ========================================================================
    // LogNormal / Pareto Properties
    // ========================================================================

    /// Property: the log-normal median is p50 and ppf inverts cdf
    #[test]
    fn prop_lognormal_ppf_inverts_cdf(model in arb_lognormal(), fraction in 0.0f64..1.0) {
        prop_assert!((model.cdf(model.p50()) - 0.5).abs() < 1e-12);

        let x = fraction.mul_add(model.p95() - model.p5(), model.p5());
        let back = model.ppf(model.cdf(x)).unwrap();
        prop_assert!((back - x).abs() < 1e-8 * x, "x={} back={}", x, back);
    }

    /// Property: the Pareto fit reproduces both elicited quantiles
    #[test]
    fn prop_pareto_fit_self_consistent(model in arb_pareto()) {
        prop_assert!(model.alpha() > 0.0);
        prop_assert!((model.cdf(model.p90()) - 0.90).abs() < 1e-9);
        prop_assert!((model.cdf(model.p99()) - 0.99).abs() < 1e-9);
    }

    /// Property: Pareto ppf inverts cdf above xmin
    #[test]
    fn prop_pareto_ppf_inverts_cdf(model in arb_pareto(), q in 0.01f64..0.99) {
        let x = model.ppf(q).unwrap();
        prop_assert!(x >= model.xmin());
        let back = model.ppf(model.cdf(x)).unwrap();
        prop_assert!((back - x).abs() < 1e-8 * x, "x={} back={}", x, back);
    }

    /// Property: every model's pdf is finite and non-negative at its quantiles
    #[test]
    fn prop_pdf_is_valid_density(
        pert in arb_wide_pert(),
        lognormal in arb_wide_lognormal(),
        pareto in arb_wide_pareto(),
        q in 0.001f64..0.999,
    ) {
        let points = [
            (pert.ppf(q).unwrap(), pert.pdf(pert.ppf(q).unwrap())),
            (lognormal.ppf(q).unwrap(), lognormal.pdf(lognormal.ppf(q).unwrap())),
            (pareto.ppf(q).unwrap(), pareto.pdf(pareto.ppf(q).unwrap())),
            (pareto.p90(), pareto.pdf(pareto.p90())),
            (pareto.p99(), pareto.pdf(pareto.p99())),
        ];
        for (x, density) in points {
            prop_assert!(density.is_finite() && density >= 0.0, "pdf({}) = {}", x, density);
        }
    }

    /// Property: windowed probability is a probability
    #[test]
    fn prop_window_probability_in_unit_interval(
        model in arb_lognormal(),
        x in -10.0f64..1000.0,
        epsilon in 1e-6f64..100.0,
    ) {
        let p = model.pdf_to_probability(x, Some(epsilon));
        prop_assert!((0.0..=1.0).contains(&p));
    }

    // ========================================================================
    // Scoring Properties
    // ========================================================================

    /// Property: binary Brier score equals 2(1 - p)^2
    #[test]
    fn prop_binary_brier(p in 0.0f64..=1.0) {
        let score = brier_score(&[1.0, 0.0], &[p, 1.0 - p]).unwrap();
        prop_assert!((score - 2.0 * (1.0 - p).powi(2)).abs() < 1e-12);
    }

    /// Property: normalized choice forecasts score within [0, 2]
    #[test]
    fn prop_choice_score_bounded(weights in prop::collection::vec(0.01f64..1.0, 1..8), pick in 0usize..8) {
        let total: f64 = weights.iter().sum();
        let options: Vec<(String, f64)> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| (format!("option_{i}"), w / total))
            .collect();
        let outcome = options[pick % options.len()].0.clone();
        let choice = ChoiceForecast::new(options).unwrap();
        let score = choice.score(&outcome).unwrap();
        prop_assert!((0.0..=2.0 + 1e-12).contains(&score));
    }

    // ========================================================================
    // Special Function Properties
    // ========================================================================

    /// Property: erf is odd and erfinv inverts it
    #[test]
    fn prop_erf_odd_and_invertible(x in -2.5f64..2.5) {
        prop_assert_eq!(erf(-x), -erf(x));
        let back = erfinv(erf(x)).unwrap();
        prop_assert!((back - x).abs() < 1e-9, "x={} back={}", x, back);
    }

    /// Property: I_x(a, b) + I_{1-x}(b, a) = 1
    #[test]
    fn prop_incomplete_beta_reflection(x in 0.0f64..=1.0, a in 0.5f64..20.0, b in 0.5f64..20.0) {
        let left = regularized_incomplete_beta(x, a, b).unwrap();
        let right = regularized_incomplete_beta(1.0 - x, b, a).unwrap();
        prop_assert!((left + right - 1.0).abs() < 1e-9);
    }
}
