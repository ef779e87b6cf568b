use emg_filters::{
    features,
    spectral::{SpectralFeatures, WelchPsd},
    EmgFilters, EmgFiltersConfig, SampleFilter,
};

#[test]
fn it_measures_a_conditioned_window() {
    let mut filters = EmgFilters::from(&EmgFiltersConfig::default());
    let mut window: Vec<f32> = (0..4000)
        .map(|i| (2. * std::f32::consts::PI * 97. * i as f32 / 1000.).sin())
        .collect();
    filters.filter(&mut window);
    let settled = &window[3000..];
    let rms = features::rms(settled);
    let mav = features::mean_absolute_value(settled);
    // a sine keeps its rms / mav ratio through linear filtering
    assert!(rms > 0.5 && rms < 0.8, "rms {}", rms);
    assert!((rms / mav - 1.1107).abs() < 0.02, "rms / mav {}", rms / mav);
    let crossings = features::zero_crossings(settled, 0.);
    assert!((192..=196).contains(&crossings), "crossings {}", crossings);
    assert!(features::waveform_length(settled) > 0.);
}

#[test]
fn it_moves_spectral_power_out_of_the_mains_band() {
    let mut filters = EmgFilters::from(&EmgFiltersConfig::default());
    let raw: Vec<f32> = (0..6000)
        .map(|i| {
            let t = i as f32 / 1000.;
            (2. * std::f32::consts::PI * 97. * t).sin()
                + (2. * std::f32::consts::PI * 50. * t).sin()
                + 0.3
        })
        .collect();
    let mut conditioned = raw.clone();
    filters.filter(&mut conditioned);
    let welch = WelchPsd::for_sample_rate(1000.);
    assert_eq!(welch.segment_len(), 512);
    let before = SpectralFeatures::from_spectrum(&welch.estimate(&raw[3000..], 1000.));
    let after = SpectralFeatures::from_spectrum(&welch.estimate(&conditioned[3000..], 1000.));
    assert!(
        (after.peak_frequency - 97.).abs() < 2.,
        "peak {}",
        after.peak_frequency
    );
    assert!(
        after.low_mid_ratio < before.low_mid_ratio / 10.,
        "low / mid {} -> {}",
        before.low_mid_ratio,
        after.low_mid_ratio
    );
    assert!(after.mean_frequency > before.mean_frequency);
}
