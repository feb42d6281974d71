use logodds_explorer::{
    error::AnalysisError,
    interval::{self, Interval},
};

#[test]
fn unit_standard_error_gives_classic_bounds() {
    let ci = interval::wald(0.0, 1.0, 0.05).unwrap();
    assert!((ci.lower + 1.95996).abs() < 1e-4);
    assert!((ci.upper - 1.95996).abs() < 1e-4);
}

#[test]
fn critical_value_follows_alpha() {
    assert!((interval::critical_value(0.10).unwrap() - 1.644854).abs() < 1e-4);
    assert!((interval::critical_value(0.01).unwrap() - 2.575829).abs() < 1e-4);
}

#[test]
fn interval_is_centred_on_estimate() {
    let ci = interval::wald(-0.7, 0.25, 0.05).unwrap();
    assert!(ci.lower < -0.7 && -0.7 < ci.upper);
    assert!(((ci.upper + 0.7) - (-0.7 - ci.lower)).abs() < 1e-12);
}

#[test]
fn alpha_outside_unit_interval_is_rejected() {
    for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
        assert!(matches!(
            interval::critical_value(alpha),
            Err(AnalysisError::InvalidAlpha(_))
        ));
    }
}

#[test]
fn exponentiated_interval_moves_to_odds_scale() {
    let ci = Interval { lower: 0.0, upper: 1.0 }.exp();
    assert_eq!(ci.lower, 1.0);
    assert!((ci.upper - std::f64::consts::E).abs() < 1e-12);
    assert!(ci.contains(2.0));
}
