//! Pixel-level segmentation invariants: the worked two-segment example,
//! contiguity of returned segments, and rejection of non-monotonic time.

use chrono::NaiveDate;
use proptest::prelude::*;
use terrabreak::prelude::*;

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap() + chrono::Duration::days(offset)
}

fn record_from(values: &[f64]) -> TimeseriesRecord {
    let observations = values
        .iter()
        .enumerate()
        .map(|(i, &v)| Observation {
            date: day(16 * i as i64),
            bands: vec![v],
            usable: true,
        })
        .collect();
    TimeseriesRecord::new(0, 0, observations).unwrap()
}

fn pointwise_config() -> ModelConfig {
    ModelConfig::default()
        .min_obs(12)
        .min_rmse(0.1)
        .confidence(0.99)
        .test(BreakTest::Mosum { window: 1 })
        .design(DesignSpec::intercept_only())
}

/// Forty usable observations, `min_obs = 12`; residuals stay well inside the
/// envelope through index 30, then jump far outside it at index 31. Exactly
/// two segments: 0..=30 confirmed, 31..=39 open.
#[test]
fn jump_at_observation_31_yields_two_segments() {
    let values: Vec<f64> = (0..40)
        .map(|i| {
            let noise = if i % 2 == 0 { 0.01 } else { -0.01 };
            if i <= 30 {
                10.0 + noise
            } else {
                10.0 + 5.0 + noise
            }
        })
        .collect();
    let record = record_from(&values);
    let config = pointwise_config();
    let processor = PixelProcessor::new(&config).unwrap();

    let segments = processor.process(&record).unwrap();

    assert_eq!(segments.len(), 2);
    assert_eq!(
        (segments[0].start_index, segments[0].end_index),
        (0, 30)
    );
    assert!(segments[0].break_confirmed);
    assert_eq!(
        (segments[1].start_index, segments[1].end_index),
        (31, 39)
    );
    assert!(!segments[1].break_confirmed);
}

#[test]
fn non_monotonic_time_is_rejected_before_processing() {
    let observations = vec![
        Observation {
            date: day(32),
            bands: vec![10.0],
            usable: true,
        },
        Observation {
            date: day(16),
            bands: vec![11.0],
            usable: true,
        },
    ];
    assert!(matches!(
        TimeseriesRecord::new(0, 0, observations),
        Err(BreakError::Timestamp(_))
    ));
}

/// Piecewise-constant series with arbitrary level shifts and noise.
fn piecewise_series() -> impl Strategy<Value = Vec<f64>> {
    (
        20usize..120,
        prop::collection::vec((25usize..60, -500.0..500.0f64), 0..3),
    )
        .prop_map(|(base_len, shifts)| {
            let mut values: Vec<f64> = (0..base_len)
                .map(|i| 1000.0 + if i % 2 == 0 { 0.5 } else { -0.5 })
                .collect();
            let mut level = 1000.0;
            for (len, delta) in shifts {
                level += delta;
                values.extend(
                    (0..len).map(|i| level + if i % 2 == 0 { 0.5 } else { -0.5 }),
                );
            }
            values
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn segments_are_contiguous_with_one_trailing_open_segment(
        values in piecewise_series()
    ) {
        let record = record_from(&values);
        let config = pointwise_config().min_rmse(5.0);
        let processor = PixelProcessor::new(&config).unwrap();

        let segments = processor.process(&record).unwrap();

        for pair in segments.windows(2) {
            prop_assert_eq!(pair[0].end_index + 1, pair[1].start_index);
        }
        let open_count = segments.iter().filter(|s| s.is_open()).count();
        prop_assert!(open_count <= 1);
        if let Some(last) = segments.last() {
            prop_assert_eq!(last.end_index, record.len() - 1);
        }
        for seg in &segments[..segments.len().saturating_sub(1)] {
            prop_assert!(seg.break_confirmed);
        }
    }

    #[test]
    fn segment_indices_stay_within_the_record(values in piecewise_series()) {
        let record = record_from(&values);
        let config = pointwise_config().min_rmse(5.0);
        let processor = PixelProcessor::new(&config).unwrap();

        let segments = processor.process(&record).unwrap();
        for seg in &segments {
            prop_assert!(seg.start_index <= seg.end_index);
            prop_assert!(seg.end_index < record.len());
        }
    }
}
