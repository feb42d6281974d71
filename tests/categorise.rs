mod common;

use common::{frame_with_sentinel, uniform_frame, SortedQuantileBreaks};
use logodds_explorer::{
    categorise::{Breaks, CategoriseOptions, Categoriser, Method, DEFAULT_SAMPLE_SIZE},
    data,
    error::AnalysisError,
};
use polars::prelude::*;

fn options(column: &str, categories: usize, method: Method) -> CategoriseOptions {
    CategoriseOptions {
        column: column.to_string(),
        missing: "missing".to_string(),
        categories,
        new_column: "grp".to_string(),
        method,
        sample_size: DEFAULT_SAMPLE_SIZE,
        sample_seed: None,
        verbose: false,
    }
}

#[test]
fn natural_breaks_label_every_observation() {
    let frame = uniform_frame(200);
    let provider = SortedQuantileBreaks;
    let categorised = Categoriser::new(Some(&provider))
        .categorise(&frame, &options("age years", 4, Method::NaturalBreaks))
        .unwrap()
        .expect("provider available");

    assert_eq!(categorised.breaks.as_slice(), &[0.0, 24.5, 49.5, 74.5, 99.5]);
    let labels = data::category_labels(&categorised.frame, "grp").unwrap();
    assert!(labels.iter().all(|label| matches!(label, Some(0..=3))));
    assert_eq!(labels.iter().filter(|label| **label == Some(0)).count(), 50);
    assert_eq!(labels[0], Some(0));
    assert_eq!(labels[199], Some(3));
}

#[test]
fn input_frame_is_left_untouched() {
    let frame = uniform_frame(20);
    let provider = SortedQuantileBreaks;
    let categorised = Categoriser::new(Some(&provider))
        .categorise(&frame, &options("age years", 2, Method::NaturalBreaks))
        .unwrap()
        .unwrap();
    assert!(frame.column("grp").is_err());
    assert_eq!(categorised.frame.width(), frame.width() + 1);
    assert_eq!(categorised.column, "grp");
}

#[test]
fn missing_sentinel_rows_keep_a_null_label() {
    let frame = frame_with_sentinel();
    let categorised = Categoriser::new(None)
        .categorise(&frame, &options("dose", 2, Method::Quantile))
        .unwrap()
        .unwrap();
    let labels = data::category_labels(&categorised.frame, "grp").unwrap();
    assert_eq!(labels.len(), 12);
    assert_eq!(labels[2], None);
    assert_eq!(labels[6], None);
    assert_eq!(labels.iter().flatten().count(), 10);
}

#[test]
fn quantile_bins_have_equal_width() {
    let frame = df! { "x" => (0..=10).map(f64::from).collect::<Vec<_>>() }.unwrap();
    let categorised = Categoriser::new(None)
        .categorise(&frame, &options("x", 5, Method::Quantile))
        .unwrap()
        .unwrap();

    let breaks = categorised.breaks.as_slice();
    assert!((breaks[0] + 0.01).abs() < 1e-12);
    assert_eq!(&breaks[1..], &[2.0, 4.0, 6.0, 8.0, 10.0]);

    let labels = data::category_labels(&categorised.frame, "grp").unwrap();
    assert_eq!(labels[0], Some(0));
    assert_eq!(labels[2], Some(0));
    assert_eq!(labels[3], Some(1));
    assert_eq!(labels[10], Some(4));
}

#[test]
fn constant_series_is_widened() {
    let frame = df! { "x" => [5.0f64, 5.0, 5.0] }.unwrap();
    let categorised = Categoriser::new(None)
        .categorise(&frame, &options("x", 2, Method::Quantile))
        .unwrap()
        .unwrap();
    let breaks = categorised.breaks.as_slice();
    assert!(breaks[0] < 5.0 && breaks[2] > 5.0);
}

#[test]
fn cutoffs_define_the_categories() {
    let frame = df! { "x" => [0.0f64, 5.0, 10.0, 15.0, 30.0, 31.0] }.unwrap();
    let categorised = Categoriser::new(None)
        .categorise(&frame, &options("x", 5, Method::Cutoffs(vec![0.0, 10.0, 20.0, 30.0])))
        .unwrap()
        .unwrap();
    assert_eq!(categorised.breaks.categories(), 3);
    let labels = data::category_labels(&categorised.frame, "grp").unwrap();
    assert_eq!(labels, vec![Some(0), Some(0), Some(0), Some(1), Some(2), None]);
}

#[test]
fn natural_breaks_without_backend_is_not_categorised() {
    let frame = uniform_frame(10);
    let outcome = Categoriser::new(None)
        .categorise(&frame, &options("age years", 3, Method::NaturalBreaks))
        .unwrap();
    assert!(outcome.is_none());
}

#[test]
fn unknown_method_name_is_rejected() {
    assert!(matches!(
        "bogus".parse::<Method>(),
        Err(AnalysisError::UnknownMethod(name)) if name == "bogus"
    ));
    assert_eq!("jenks".parse::<Method>().unwrap(), Method::NaturalBreaks);
    assert_eq!("Quantile".parse::<Method>().unwrap(), Method::Quantile);
}

#[test]
fn all_missing_fails_fast() {
    let frame = df! { "x" => ["missing", "missing"] }.unwrap();
    let err = Categoriser::new(Some(&SortedQuantileBreaks))
        .categorise(&frame, &options("x", 2, Method::NaturalBreaks))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::NoObservations(column) if column == "x"));
}

#[test]
fn single_category_is_rejected() {
    let frame = uniform_frame(10);
    let err = Categoriser::new(None)
        .categorise(&frame, &options("age years", 1, Method::Quantile))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::TooFewCategories(1)));
}

#[test]
fn text_that_is_not_a_number_is_an_error() {
    let frame = df! { "x" => ["1.5", "abc"] }.unwrap();
    let err = Categoriser::new(None)
        .categorise(&frame, &options("x", 2, Method::Quantile))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::NonNumeric { value, .. } if value == "abc"));
}

#[test]
fn unknown_column_is_reported() {
    let frame = uniform_frame(10);
    let err = Categoriser::new(None)
        .categorise(&frame, &options("height", 2, Method::Quantile))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::MissingColumn(column) if column == "height"));
}

#[test]
fn sampled_breaks_cover_the_full_range() {
    let values: Vec<f64> = (0..5000).map(|i| (i as f64 * 7.3) % 1000.0 + 1.0).collect();
    let (lo, hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let frame = df! { "x" => values }.unwrap();
    let mut opts = options("x", 5, Method::NaturalBreaks);
    opts.sample_seed = Some(7);

    let categorised = Categoriser::new(Some(&SortedQuantileBreaks))
        .categorise(&frame, &opts)
        .unwrap()
        .unwrap();

    assert!(categorised.breaks.first() <= lo);
    assert!(categorised.breaks.last() >= hi);
    assert!((categorised.breaks.first() - lo * 0.999).abs() < 1e-12);
    assert!((categorised.breaks.last() - hi * 1.001).abs() < 1e-9);
    let labels = data::category_labels(&categorised.frame, "grp").unwrap();
    assert!(labels.iter().all(Option::is_some));
}

#[test]
fn repeated_runs_give_identical_breaks() {
    let provider = SortedQuantileBreaks;
    let small = uniform_frame(300);
    let first = Categoriser::new(Some(&provider))
        .categorise(&small.clone(), &options("age years", 4, Method::NaturalBreaks))
        .unwrap()
        .unwrap();
    let second = Categoriser::new(Some(&provider))
        .categorise(&small.clone(), &options("age years", 4, Method::NaturalBreaks))
        .unwrap()
        .unwrap();
    assert_eq!(first.breaks, second.breaks);

    let large = uniform_frame(2500);
    let mut seeded = options("age years", 4, Method::NaturalBreaks);
    seeded.sample_seed = Some(42);
    let first = Categoriser::new(Some(&provider))
        .categorise(&large.clone(), &seeded)
        .unwrap()
        .unwrap();
    let second = Categoriser::new(Some(&provider))
        .categorise(&large.clone(), &seeded)
        .unwrap()
        .unwrap();
    assert_eq!(first.breaks, second.breaks);
}

#[test]
fn breaks_reject_bad_shapes() {
    assert!(Breaks::new(vec![0.0, 1.0], 2).is_err());
    assert!(Breaks::new(vec![0.0, 1.0, 1.0], 2).is_err());
    assert!(Breaks::new(vec![0.0, f64::NAN, 2.0], 2).is_err());
    let breaks = Breaks::new(vec![0.0, 1.0, 2.0], 2).unwrap();
    assert_eq!(breaks.bin(0.0), Some(0));
    assert_eq!(breaks.bin(1.0), Some(0));
    assert_eq!(breaks.bin(1.5), Some(1));
    assert_eq!(breaks.bin(2.5), None);
    assert_eq!(breaks.bin(-0.1), None);
}
