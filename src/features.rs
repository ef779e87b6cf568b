//! Time-domain EMG features computed over a window of conditioned samples.

/// Root mean square amplitude.
pub fn rms(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.;
    }
    let sum_squared: f32 = signal.iter().map(|sample| sample * sample).sum();
    (sum_squared / signal.len() as f32).sqrt()
}

/// Mean absolute value.
pub fn mean_absolute_value(signal: &[f32]) -> f32 {
    if signal.is_empty() {
        return 0.;
    }
    signal.iter().map(|sample| sample.abs()).sum::<f32>() / signal.len() as f32
}

/// Cumulative length of the waveform, sum of absolute consecutive differences.
pub fn waveform_length(signal: &[f32]) -> f32 {
    signal
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).abs())
        .sum()
}

/// Number of sign changes around `threshold`.
///
/// Samples equal to the threshold count as below it. A pair with a NaN on
/// either side counts as a crossing.
pub fn zero_crossings(signal: &[f32], threshold: f32) -> usize {
    let above = |sample: f32| (!sample.is_nan()).then_some(sample > threshold);
    signal
        .windows(2)
        .filter(|pair| match (above(pair[0]), above(pair[1])) {
            (Some(a), Some(b)) => a != b,
            _ => true,
        })
        .count()
}

#[test]
fn empty_windows_yield_zero() {
    assert_eq!(rms(&[]), 0.);
    assert_eq!(mean_absolute_value(&[]), 0.);
    assert_eq!(waveform_length(&[1.]), 0.);
    assert_eq!(zero_crossings(&[1.], 0.), 0);
}

#[test]
fn amplitude_features() {
    let signal: [f32; 4] = [3., -4., 3., -4.];
    assert!((rms(&signal) - 12.5f32.sqrt()).abs() < 1e-6);
    assert_eq!(mean_absolute_value(&signal), 3.5);
    assert_eq!(waveform_length(&signal), 21.);
}

#[test]
fn zero_crossings_treat_threshold_as_negative() {
    assert_eq!(zero_crossings(&[1., -1., 1., -1.], 0.), 3);
    assert_eq!(zero_crossings(&[1., 0., 1.], 0.), 2);
    assert_eq!(zero_crossings(&[0., 0., -1.], 0.), 0);
    assert_eq!(zero_crossings(&[0.2, 0.6, 0.4], 0.5), 2);
}

#[test]
fn zero_crossings_count_nan_pairs() {
    assert_eq!(zero_crossings(&[1., f32::NAN, 1.], 0.), 2);
    assert_eq!(zero_crossings(&[-1., f32::NAN, -1., 1.], 0.), 3);
    assert_eq!(zero_crossings(&[f32::NAN, f32::NAN], 0.), 1);
}
