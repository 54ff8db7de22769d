use betadecay::{IntegrationError, Method, MonteCarloIntegrator, NeutronBetaDecay};

mod common;

use common::{assert_relative_close, mean, sample_variance};

#[test]
fn mean_value_of_constant_is_exact() {
    let mut mc = MonteCarloIntegrator::seeded(1);
    for &n in &[1_000, 10_000, 100_000] {
        let estimate = mc.mean_value(&|_: f64| 2.5, -1.0, 3.0, n).unwrap();
        assert_relative_close(estimate.value, 10.0, 1e-12);
        assert_eq!(estimate.samples, n);
        assert_eq!(estimate.max_density, 2.5);
    }
}

#[test]
fn mean_value_converges_as_samples_grow() {
    let mut mc = MonteCarloIntegrator::seeded(2024);
    for &(n, tolerance) in &[(1_000, 0.1), (10_000, 0.03), (100_000, 0.01)] {
        let estimate = mc.mean_value(&|x: f64| x, 0.0, 1.0, n).unwrap();
        assert_relative_close(estimate.value, 0.5, tolerance);
        assert!(estimate.std_error > 0.0);
    }
}

#[test]
fn rejection_of_constant_converges_with_valid_bound() {
    let mut mc = MonteCarloIntegrator::seeded(99);
    for &(n, tolerance) in &[(1_000, 0.2), (10_000, 0.06), (100_000, 0.02)] {
        let estimate = mc.rejection(&|_: f64| 2.0, 1.0, 3.0, 4.0, n).unwrap();
        assert_relative_close(estimate.value, 4.0, tolerance);
        assert!(!estimate.exceeds(4.0));
    }
}

#[test]
fn rejection_with_small_bound_underestimates() {
    let mut mc = MonteCarloIntegrator::seeded(5);
    let trials: Vec<f64> = (0..20)
        .map(|_| {
            let estimate = mc.rejection(&|_: f64| 2.0, 1.0, 3.0, 1.0, 1_000).unwrap();
            assert!(estimate.exceeds(1.0));
            estimate.value
        })
        .collect();

    assert!(trials.iter().all(|&value| value < 4.0));
    assert_relative_close(mean(&trials), 2.0, 1e-12);
}

#[test]
fn integrate_dispatches_on_method() {
    let f = |x: f64| 3.0 * x * x;
    let mut via_method = MonteCarloIntegrator::seeded(17);
    let mut direct = MonteCarloIntegrator::seeded(17);

    let a = via_method
        .integrate(Method::Rejection { upper_bound: 3.0 }, &f, 0.0, 1.0, 5_000)
        .unwrap();
    let b = direct.rejection(&f, 0.0, 1.0, 3.0, 5_000).unwrap();
    assert_eq!(a, b);

    let a = via_method.integrate(Method::MeanValue, &f, 0.0, 1.0, 5_000).unwrap();
    let b = direct.mean_value(&f, 0.0, 1.0, 5_000).unwrap();
    assert_eq!(a, b);
}

#[test]
fn partitioned_spends_the_whole_budget() {
    let mut mc = MonteCarloIntegrator::seeded(3);
    let estimate = mc
        .partitioned(Method::MeanValue, &|x: f64| x, 0.0, 1.0, 10_000, 10)
        .unwrap();
    assert_eq!(estimate.samples, 10_000);
    assert_relative_close(estimate.value, 0.5, 0.005);

    let uneven = mc
        .partitioned(Method::MeanValue, &|x: f64| x, 0.0, 1.0, 1_005, 10)
        .unwrap();
    assert_eq!(uneven.samples, 1_000);
}

#[test]
fn partitioning_keeps_expectation_and_reduces_variance() {
    let f = |x: f64| x * x;
    let trials = 400;
    let n = 1_000;

    for method in [Method::MeanValue, Method::Rejection { upper_bound: 1.0 }] {
        let mut mc = MonteCarloIntegrator::seeded(42);
        let whole: Vec<f64> = (0..trials)
            .map(|_| mc.integrate(method, &f, 0.0, 1.0, n).unwrap().value)
            .collect();
        let split: Vec<f64> = (0..trials)
            .map(|_| mc.partitioned(method, &f, 0.0, 1.0, n, 10).unwrap().value)
            .collect();

        assert_relative_close(mean(&whole), 1.0 / 3.0, 0.01);
        assert_relative_close(mean(&split), 1.0 / 3.0, 0.01);
        assert!(
            sample_variance(&split) < sample_variance(&whole),
            "{}: partitioned variance {} not below {}",
            method.label(),
            sample_variance(&split),
            sample_variance(&whole)
        );
    }
}

#[test]
fn same_seed_gives_identical_estimates() {
    let decay = NeutronBetaDecay::default();
    let mut first = MonteCarloIntegrator::seeded(123);
    let mut second = MonteCarloIntegrator::seeded(123);

    for method in [
        Method::MeanValue,
        Method::Rejection {
            upper_bound: decay.upper_bound(),
        },
    ] {
        let a = first.partitioned(method, &decay, 0.511, 1.29, 20_000, 10).unwrap();
        let b = second.partitioned(method, &decay, 0.511, 1.29, 20_000, 10).unwrap();
        assert_eq!(a.value.to_bits(), b.value.to_bits());
    }
}

#[test]
fn invalid_preconditions_trigger_informative_errors() {
    let mut mc = MonteCarloIntegrator::seeded(0);
    let f = |x: f64| x;

    assert!(matches!(
        mc.mean_value(&f, 1.0, 1.0, 10).unwrap_err(),
        IntegrationError::InvalidInterval { .. }
    ));
    assert!(matches!(
        mc.mean_value(&f, 2.0, 1.0, 10).unwrap_err(),
        IntegrationError::InvalidInterval { .. }
    ));
    assert!(matches!(
        mc.mean_value(&f, 0.0, f64::INFINITY, 10).unwrap_err(),
        IntegrationError::InvalidInterval { .. }
    ));
    assert_eq!(
        mc.mean_value(&f, 0.0, 1.0, 0).unwrap_err(),
        IntegrationError::ZeroSamples
    );
    assert_eq!(
        mc.rejection(&f, 0.0, 1.0, 1.0, 0).unwrap_err(),
        IntegrationError::ZeroSamples
    );
    for bound in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            mc.rejection(&f, 0.0, 1.0, bound, 10).unwrap_err(),
            IntegrationError::InvalidUpperBound { .. }
        ));
    }
    assert_eq!(
        mc.partitioned(Method::MeanValue, &f, 0.0, 1.0, 100, 0)
            .unwrap_err(),
        IntegrationError::ZeroPartitions
    );
    assert_eq!(
        mc.partitioned(Method::MeanValue, &f, 0.0, 1.0, 5, 10)
            .unwrap_err(),
        IntegrationError::TooFewSamplesPerPartition {
            samples: 5,
            partitions: 10
        }
    );
    assert!(matches!(
        mc.mean_value(&f, -f64::MAX, f64::MAX, 10).unwrap_err(),
        IntegrationError::InvalidInterval { .. }
    ));
    assert!(matches!(
        mc.rejection(&f, -f64::MAX, f64::MAX, 1.0, 10).unwrap_err(),
        IntegrationError::InvalidInterval { .. }
    ));
    assert!(matches!(
        mc.rejection(&f, 0.0, 10.0, f64::MAX, 10).unwrap_err(),
        IntegrationError::UnboundedArea { .. }
    ));
}

#[test]
fn unresolvable_partitions_report_the_caller_interval() {
    let mut mc = MonteCarloIntegrator::seeded(0);
    let b = 1.0 + 4e-16;
    assert_eq!(
        mc.partitioned(Method::MeanValue, &|x: f64| x, 1.0, b, 1_000, 10)
            .unwrap_err(),
        IntegrationError::PartitionTooNarrow {
            a: 1.0,
            b,
            partitions: 10
        }
    );
}

#[test]
fn reported_standard_error_matches_empirical_spread() {
    let f = |x: f64| x * x;
    let trials = 400;
    let n = 1_000;

    for method in [Method::MeanValue, Method::Rejection { upper_bound: 1.0 }] {
        for partitions in [1, 10] {
            let mut mc = MonteCarloIntegrator::seeded(2718);
            let (values, errors): (Vec<f64>, Vec<f64>) = (0..trials)
                .map(|_| {
                    let estimate = mc.partitioned(method, &f, 0.0, 1.0, n, partitions).unwrap();
                    (estimate.value, estimate.std_error)
                })
                .unzip();

            let empirical = sample_variance(&values).sqrt();
            let reported = mean(&errors);
            assert!(
                ((reported - empirical) / empirical).abs() < 0.15,
                "{} with {partitions} partitions: reported {reported}, empirical {empirical}",
                method.label()
            );
        }
    }
}

#[test]
fn interval_outside_physical_domain_is_rejected() {
    let decay = NeutronBetaDecay::default();
    let mut mc = MonteCarloIntegrator::seeded(0);

    assert!(matches!(
        mc.mean_value(&decay, 0.5, 1.29, 100).unwrap_err(),
        IntegrationError::OutsideDomain { .. }
    ));
    assert!(matches!(
        mc.rejection(&decay, 0.511, 1.3, decay.upper_bound(), 100)
            .unwrap_err(),
        IntegrationError::OutsideDomain { .. }
    ));
}

#[test]
fn error_messages_name_the_problem() {
    let err = IntegrationError::TooFewSamplesPerPartition {
        samples: 5,
        partitions: 10,
    };
    assert_eq!(
        err.to_string(),
        "5 samples cannot be split over 10 partitions"
    );
    assert!(
        IntegrationError::InvalidInterval { a: 2.0, b: 1.0 }
            .to_string()
            .contains("a < b")
    );
}
