//! Frequency-domain EMG features.
//!
//! [`WelchPsd`] estimates a one-sided power spectral density (Hann window,
//! constant detrend, density scaling) and the free functions compute the
//! usual fatigue and activation descriptors over `(frequencies, psd)` slices.

use std::{f32::consts::PI, sync::Arc};

use rustfft::{num_complex::Complex32, Fft, FftPlanner};

use crate::{FilterError, Result};

/// Surface EMG band, in Hz.
pub const EMG_BAND: (f32, f32) = (20., 450.);
pub const LOW_BAND: (f32, f32) = (20., 60.);
pub const MID_BAND: (f32, f32) = (60., 150.);
pub const HIGH_BAND: (f32, f32) = (150., 450.);

const EPS: f32 = 1e-12;
const MIN_TIMESTAMP_STEPS: usize = 10;

/// Infers the sample rate from timestamps in microseconds using the median step.
///
/// Non-finite and non-increasing steps are ignored; at least 10 valid steps are required.
pub fn infer_sample_rate(timestamps_us: &[f64]) -> Result<f32> {
    let mut steps = timestamps_us
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .filter(|step| step.is_finite() && *step > 0.)
        .collect::<Vec<f64>>();
    if steps.len() < MIN_TIMESTAMP_STEPS {
        return Err(FilterError::NotEnoughTimestamps(steps.len()));
    }
    steps.sort_by(|a, b| a.total_cmp(b));
    let middle = steps.len() / 2;
    let median_us = if steps.len() % 2 == 0 {
        (steps[middle - 1] + steps[middle]) / 2.
    } else {
        steps[middle]
    };
    Ok((1. / (median_us * 1e-6)) as f32)
}

/// One-sided power spectral density.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Default)]
pub struct Spectrum {
    /// Bin frequencies in Hz.
    pub frequencies: Vec<f32>,
    /// Power per bin, in signal units squared per Hz.
    pub psd: Vec<f32>,
}
impl Spectrum {
    /// Keeps the bins inside `[low, high]`, both ends included.
    pub fn band(&self, low: f32, high: f32) -> Spectrum {
        let (frequencies, psd) = self
            .frequencies
            .iter()
            .zip(self.psd.iter())
            .filter(|(f, _)| **f >= low && **f <= high)
            .map(|(f, p)| (*f, *p))
            .unzip();
        Spectrum { frequencies, psd }
    }
    /// Frequency of the strongest bin, the first one on ties.
    pub fn peak_frequency(&self) -> Option<f32> {
        self.psd
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, best_p)) if *p <= best_p => best,
                _ => Some((i, *p)),
            })
            .map(|(i, _)| self.frequencies[i])
    }
    /// Sum of the bin powers.
    pub fn total_power(&self) -> f32 {
        self.psd.iter().sum()
    }
    pub fn is_empty(&self) -> bool {
        self.psd.is_empty()
    }
}

/// Welch power spectral density estimator.
pub struct WelchPsd {
    segment_len: usize,
    overlap: usize,
    window: Vec<f32>,
    window_s2: f32,
    fft: Arc<dyn Fft<f32>>,
}
impl WelchPsd {
    /// Creates an estimator using `segment_len` samples per segment, `overlap` of them shared
    /// between consecutive segments.
    pub fn new(segment_len: usize, overlap: usize) -> Result<Self> {
        if segment_len == 0 {
            return Err(FilterError::InvalidSegment("segment length is zero"));
        }
        if overlap >= segment_len {
            return Err(FilterError::InvalidSegment(
                "overlap must be shorter than the segment",
            ));
        }
        Ok(Self::build(segment_len, overlap))
    }
    /// Segment size for a recording, about half a second of samples with 50% overlap.
    pub fn for_sample_rate(sample_rate: f32) -> Self {
        let segment_len = if sample_rate >= 1500. { 1024 } else { 512 };
        Self::build(segment_len, segment_len / 2)
    }
    fn build(segment_len: usize, overlap: usize) -> Self {
        let window = Self::new_hann_window(segment_len);
        let window_s2 = window.iter().map(|w| w * w).sum();
        let fft = FftPlanner::<f32>::new().plan_fft_forward(segment_len);
        WelchPsd {
            segment_len,
            overlap,
            window,
            window_s2,
            fft,
        }
    }
    // periodic hann, a single sample segment keeps a unit window
    fn new_hann_window(segment_len: usize) -> Vec<f32> {
        if segment_len == 1 {
            return vec![1.];
        }
        (0..segment_len)
            .map(|i| 0.5 - 0.5 * (2. * PI * i as f32 / segment_len as f32).cos())
            .collect()
    }
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }
    /// Number of whole segments averaged for a signal of `signal_len` samples.
    pub fn num_segments(&self, signal_len: usize) -> usize {
        if signal_len < self.segment_len {
            return 0;
        }
        (signal_len - self.segment_len) / (self.segment_len - self.overlap) + 1
    }
    /// Estimates the spectrum of `signal`.
    ///
    /// Signals shorter than a segment are analysed as a single segment of
    /// their own length; an empty signal gives an empty spectrum.
    pub fn estimate(&self, signal: &[f32], sample_rate: f32) -> Spectrum {
        if signal.is_empty() {
            return Spectrum::default();
        }
        if signal.len() < self.segment_len {
            let overlap = self.overlap.min(signal.len() - 1);
            return Self::build(signal.len(), overlap).estimate(signal, sample_rate);
        }
        let n = self.segment_len;
        let bins = n / 2 + 1;
        let hop = n - self.overlap;
        let num_segments = self.num_segments(signal.len());
        let mut psd = vec![0f32; bins];
        let mut buffer = vec![Complex32::new(0., 0.); n];
        for segment in (0..num_segments).map(|s| &signal[s * hop..s * hop + n]) {
            let mean = segment.iter().sum::<f32>() / n as f32;
            for ((value, sample), w) in buffer.iter_mut().zip(segment).zip(&self.window) {
                *value = Complex32::new((sample - mean) * w, 0.);
            }
            self.fft.process(&mut buffer);
            for (power, value) in psd.iter_mut().zip(&buffer) {
                *power += value.norm_sqr();
            }
        }
        let scale = 1. / (sample_rate * self.window_s2 * num_segments as f32);
        for (k, power) in psd.iter_mut().enumerate() {
            *power *= scale;
            // dc and the nyquist bin have no mirrored counterpart
            if k != 0 && !(n % 2 == 0 && k == n / 2) {
                *power *= 2.;
            }
        }
        let frequencies = (0..bins)
            .map(|k| k as f32 * sample_rate / n as f32)
            .collect();
        Spectrum { frequencies, psd }
    }
}

/// Power-weighted mean frequency.
pub fn mean_frequency(frequencies: &[f32], psd: &[f32]) -> f32 {
    spectral_moment(frequencies, psd, 1)
}

/// Frequency splitting the cumulative power in two halves, linearly interpolated
/// between bins and clamped to the first and last bin.
pub fn median_frequency(frequencies: &[f32], psd: &[f32]) -> f32 {
    if frequencies.is_empty() || psd.is_empty() {
        return 0.;
    }
    let cumulative = psd
        .iter()
        .scan(0f32, |acc, p| {
            *acc += p;
            Some(*acc)
        })
        .collect::<Vec<f32>>();
    let half = cumulative[cumulative.len() - 1] / 2.;
    // a NaN total falls through to the last bin
    let idx = cumulative.partition_point(|c| half.is_nan() || *c < half);
    if idx == 0 {
        return frequencies[0];
    }
    if idx >= frequencies.len() {
        return frequencies[frequencies.len() - 1];
    }
    let (f0, f1) = (frequencies[idx - 1], frequencies[idx]);
    let (c0, c1) = (cumulative[idx - 1], cumulative[idx]);
    if c1 == c0 {
        return f1;
    }
    f0 + (half - c0) * (f1 - f0) / (c1 - c0)
}

/// Normalized spectral moment of order `k`, `sum(f^k * P) / sum(P)`.
pub fn spectral_moment(frequencies: &[f32], psd: &[f32], k: i32) -> f32 {
    let weighted: f32 = frequencies
        .iter()
        .zip(psd)
        .map(|(f, p)| f.powi(k) * p)
        .sum();
    weighted / (psd.iter().sum::<f32>() + EPS)
}

/// Spectral moment ratio, `m[k_num] / m[k_den]`.
pub fn smr(frequencies: &[f32], psd: &[f32], k_num: i32, k_den: i32) -> f32 {
    spectral_moment(frequencies, psd, k_num)
        / (spectral_moment(frequencies, psd, k_den) + EPS)
}

/// Power inside `[low, high]`, trapezoidal integration over the bins in the band.
pub fn bandpower(frequencies: &[f32], psd: &[f32], low: f32, high: f32) -> f32 {
    let band = frequencies
        .iter()
        .zip(psd)
        .filter(|(f, _)| **f >= low && **f <= high)
        .map(|(f, p)| (*f, *p))
        .collect::<Vec<(f32, f32)>>();
    band.windows(2)
        .map(|pair| (pair[1].0 - pair[0].0) * (pair[0].1 + pair[1].1) / 2.)
        .sum()
}

/// Ratio between the power of two bands.
pub fn power_ratio(
    frequencies: &[f32],
    psd: &[f32],
    num_band: (f32, f32),
    den_band: (f32, f32),
) -> f32 {
    bandpower(frequencies, psd, num_band.0, num_band.1)
        / (bandpower(frequencies, psd, den_band.0, den_band.1) + EPS)
}

/// Shannon entropy of the normalized band spectrum, scaled to 0..1.
///
/// Bands with less than two bins give 0.
pub fn spectral_entropy(frequencies: &[f32], psd: &[f32], low: f32, high: f32) -> f32 {
    let band = frequencies
        .iter()
        .zip(psd)
        .filter(|(f, _)| **f >= low && **f <= high)
        .map(|(_, p)| *p)
        .collect::<Vec<f32>>();
    if band.len() < 2 {
        return 0.;
    }
    let total = band.iter().sum::<f32>() + EPS;
    let entropy: f32 = -band
        .iter()
        .map(|p| {
            let probability = p / total;
            probability * (probability + EPS).ln()
        })
        .sum::<f32>();
    entropy / (band.len() as f32).ln()
}

/// Spectral descriptors of one analysis window.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Default)]
pub struct SpectralFeatures {
    pub mean_frequency: f32,
    pub median_frequency: f32,
    pub peak_frequency: f32,
    /// Summed bin power inside [`EMG_BAND`].
    pub band_power: f32,
    /// Second to first moment ratio.
    pub smr: f32,
    pub low_high_ratio: f32,
    pub low_mid_ratio: f32,
    pub high_total_ratio: f32,
    pub entropy: f32,
}
impl SpectralFeatures {
    /// Computes the descriptors; frequency features are 0 when the band holds no power.
    pub fn from_spectrum(spectrum: &Spectrum) -> Self {
        let (f, p) = (&spectrum.frequencies[..], &spectrum.psd[..]);
        let band = spectrum.band(EMG_BAND.0, EMG_BAND.1);
        let band_power = band.total_power();
        let silent = band_power <= 0. || band.psd.iter().all(|p| p.abs() <= 1e-8);
        let (mean_frequency, median_frequency, peak_frequency) = if silent {
            (0., 0., 0.)
        } else {
            (
                mean_frequency(&band.frequencies, &band.psd),
                median_frequency(&band.frequencies, &band.psd),
                band.peak_frequency().unwrap_or(0.),
            )
        };
        SpectralFeatures {
            mean_frequency,
            median_frequency,
            peak_frequency,
            band_power,
            smr: smr(&band.frequencies, &band.psd, 2, 1),
            low_high_ratio: power_ratio(f, p, LOW_BAND, HIGH_BAND),
            low_mid_ratio: power_ratio(f, p, LOW_BAND, MID_BAND),
            high_total_ratio: power_ratio(f, p, HIGH_BAND, EMG_BAND),
            entropy: spectral_entropy(f, p, EMG_BAND.0, EMG_BAND.1),
        }
    }
}

#[cfg(test)]
fn sine(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (2. * PI * freq * i as f32 / sample_rate).sin())
        .collect()
}

#[test]
fn infers_sample_rate_from_microseconds() {
    let timestamps = (0..50).map(|i| i as f64 * 500.).collect::<Vec<f64>>();
    assert!((infer_sample_rate(&timestamps).unwrap() - 2000.).abs() < 1e-3);
    // a repeated timestamp and a gap do not move the median
    let mut jittered = (0..20).map(|i| i as f64 * 1000.).collect::<Vec<f64>>();
    jittered.insert(5, 4000.);
    jittered.push(40000.);
    assert!((infer_sample_rate(&jittered).unwrap() - 1000.).abs() < 1e-3);
}

#[test]
fn needs_enough_timestamps() {
    let timestamps = [0., 1000., 2000., f64::NAN, 3000.];
    assert!(matches!(
        infer_sample_rate(&timestamps),
        Err(FilterError::NotEnoughTimestamps(2))
    ));
}

#[test]
fn welch_finds_the_sine_peak() {
    let welch = WelchPsd::new(256, 128).unwrap();
    let spectrum = welch.estimate(&sine(100., 1000., 4000), 1000.);
    assert_eq!(spectrum.frequencies.len(), 129);
    assert_eq!(spectrum.frequencies[128], 500.);
    let peak = spectrum.peak_frequency().unwrap();
    assert!((peak - 100.).abs() < 4., "peak at {}", peak);
    // a unit sine carries 0.5 of power
    let power = bandpower(&spectrum.frequencies, &spectrum.psd, 0., 500.);
    assert!((power - 0.5).abs() < 0.05, "power {}", power);
}

#[test]
fn welch_detrends_segments() {
    let welch = WelchPsd::new(64, 32).unwrap();
    let spectrum = welch.estimate(&[3.; 256], 1000.);
    assert!(spectrum.psd.iter().all(|p| p.abs() < 1e-9));
    assert_eq!(welch.num_segments(256), 7);
}

#[test]
fn welch_shrinks_to_short_signals() {
    let welch = WelchPsd::for_sample_rate(1000.);
    assert_eq!(welch.segment_len(), 512);
    let spectrum = welch.estimate(&sine(100., 1000., 100), 1000.);
    assert_eq!(spectrum.frequencies.len(), 51);
    assert!(welch.estimate(&[], 1000.).is_empty());
    assert!(WelchPsd::new(0, 0).is_err());
    assert!(WelchPsd::new(64, 64).is_err());
}

#[test]
fn moments_and_mean_frequency() {
    let (f, p) = ([1f32, 2.], [1f32, 1.]);
    assert!((mean_frequency(&f, &p) - 1.5).abs() < 1e-6);
    assert!((spectral_moment(&f, &p, 2) - 2.5).abs() < 1e-6);
    assert!((smr(&f, &p, 2, 1) - 2.5 / 1.5).abs() < 1e-5);
}

#[test]
fn median_frequency_interpolates_and_clamps() {
    assert!((median_frequency(&[0., 1., 2., 3.], &[1., 1., 1., 1.]) - 1.).abs() < 1e-6);
    assert!((median_frequency(&[0., 10.], &[1., 3.]) - 10. / 3.).abs() < 1e-5);
    assert_eq!(median_frequency(&[5., 6., 7.], &[10., 0., 0.]), 5.);
    assert_eq!(median_frequency(&[5., 6., 7.], &[0., 0., 0.]), 5.);
    assert_eq!(median_frequency(&[5., 6., 7.], &[f32::NAN, 1., 1.]), 7.);
    assert_eq!(median_frequency(&[], &[]), 0.);
}

#[test]
fn bandpower_integrates_inside_the_band() {
    let (f, p) = ([0f32, 10., 20., 30.], [1f32, 1., 1., 1.]);
    assert_eq!(bandpower(&f, &p, 5., 30.), 20.);
    assert_eq!(bandpower(&f, &p, 40., 50.), 0.);
    assert_eq!(bandpower(&f, &p, 10., 10.), 0.);
    assert!((power_ratio(&f, &p, (0., 10.), (5., 30.)) - 0.5).abs() < 1e-6);
}

#[test]
fn entropy_is_normalized() {
    let f = [20f32, 30., 40., 50.];
    assert!((spectral_entropy(&f, &[1., 1., 1., 1.], 20., 450.) - 1.).abs() < 1e-4);
    assert!(spectral_entropy(&f, &[1., 0., 0., 0.], 20., 450.) < 1e-4);
    assert_eq!(spectral_entropy(&f, &[1., 1., 1., 1.], 100., 450.), 0.);
}

#[test]
fn features_of_a_band_limited_window() {
    let welch = WelchPsd::new(256, 128).unwrap();
    let spectrum = welch.estimate(&sine(100., 1000., 1000), 1000.);
    let features = SpectralFeatures::from_spectrum(&spectrum);
    assert!((features.peak_frequency - 100.).abs() < 4.);
    assert!((features.mean_frequency - 100.).abs() < 10.);
    assert!((features.median_frequency - 100.).abs() < 10.);
    assert!(features.low_mid_ratio < 0.01);
    assert!(features.entropy > 0. && features.entropy < 0.7);

    let silent = SpectralFeatures::from_spectrum(&welch.estimate(&[0.; 1000], 1000.));
    assert_eq!(silent.mean_frequency, 0.);
    assert_eq!(silent.median_frequency, 0.);
    assert_eq!(silent.peak_frequency, 0.);
}
