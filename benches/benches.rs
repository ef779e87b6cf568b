#[macro_use]
extern crate bencher;

use bencher::Bencher;
use emg_filters::{
    spectral::{SpectralFeatures, WelchPsd},
    EmgFilters, SampleFilter,
};

fn emg_signal(len: usize, sample_rate: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / sample_rate;
            (2. * std::f32::consts::PI * 50. * t).sin() * 0.3
                + (2. * std::f32::consts::PI * 120. * t).sin()
        })
        .collect()
}

fn filter_samples_1000hz(bench: &mut Bencher) {
    let mut filters = EmgFilters::new();
    filters.init(1000, 50, true, true, true);
    let signal = emg_signal(1000, 1000.);
    bench.iter(|| {
        signal
            .iter()
            .map(|sample| filters.update(*sample))
            .sum::<f32>()
    });
}

fn filter_block_2000hz(bench: &mut Bencher) {
    let mut filters = EmgFilters::new();
    filters.init(2000, 60, true, true, true);
    let signal = emg_signal(2000, 2000.);
    let mut block = signal.clone();
    bench.iter(|| {
        block.copy_from_slice(&signal);
        filters.filter(&mut block);
    });
}

fn spectral_features_2000hz(bench: &mut Bencher) {
    let welch = WelchPsd::for_sample_rate(2000.);
    let signal = emg_signal(4000, 2000.);
    bench.iter(|| SpectralFeatures::from_spectrum(&welch.estimate(&signal, 2000.)));
}

benchmark_group!(
    benches,
    filter_samples_1000hz,
    filter_block_2000hz,
    spectral_features_2000hz
);
benchmark_main!(benches);
