#[cfg(feature = "log")]
use log::{debug, warn};

use crate::{
    EmgFiltersConfig, FilterType, FourthOrderFilter, NotchFrequency, SampleFilter,
    SampleFrequency, SecondOrderFilter,
};

/// EMG conditioning chain: anti-hum notch, then low-pass, then high-pass.
///
/// Configuration problems never raise errors. When the sample rate or the
/// mains frequency has no coefficient table the chain switches to bypass and
/// `update` returns its input unchanged until `init` is called again; use
/// [`EmgFilters::is_bypassed`] to detect it.
/// ```
/// use emg_filters::EmgFilters;
/// let mut filters = EmgFilters::new();
/// filters.init(1000, 50, true, true, true);
/// assert!(!filters.is_bypassed());
/// let filtered = filters.update(0.5);
/// assert!(filtered.is_finite());
/// ```
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct EmgFilters {
    lpf: SecondOrderFilter,
    hpf: SecondOrderFilter,
    ahf: FourthOrderFilter,
    sample_rate: u32,
    notch_frequency: u32,
    bypass_enabled: bool,
    notch_filter_enabled: bool,
    lowpass_filter_enabled: bool,
    highpass_filter_enabled: bool,
}
impl Default for EmgFilters {
    fn default() -> Self {
        EmgFilters {
            lpf: SecondOrderFilter::new(),
            hpf: SecondOrderFilter::new(),
            ahf: FourthOrderFilter::new(),
            sample_rate: 0,
            notch_frequency: 0,
            bypass_enabled: true,
            notch_filter_enabled: false,
            lowpass_filter_enabled: false,
            highpass_filter_enabled: false,
        }
    }
}
impl EmgFilters {
    /// Creates an unconfigured chain, it stays in bypass until `init` succeeds.
    pub fn new() -> Self {
        Self::default()
    }
    /// Configures the chain and clears the state of every stage.
    ///
    /// All three stages are reinitialized regardless of the enable flags.
    pub fn init(
        &mut self,
        sample_rate: u32,
        notch_frequency: u32,
        enable_notch_filter: bool,
        enable_lowpass_filter: bool,
        enable_highpass_filter: bool,
    ) {
        self.sample_rate = sample_rate;
        self.notch_frequency = notch_frequency;
        self.bypass_enabled = SampleFrequency::from_hz(sample_rate).is_none()
            || NotchFrequency::from_hz(notch_frequency).is_none();
        self.lpf.init(FilterType::LowPass, sample_rate);
        self.hpf.init(FilterType::HighPass, sample_rate);
        self.ahf.init(sample_rate, notch_frequency);
        self.notch_filter_enabled = enable_notch_filter;
        self.lowpass_filter_enabled = enable_lowpass_filter;
        self.highpass_filter_enabled = enable_highpass_filter;
        #[cfg(feature = "log")]
        if self.bypass_enabled {
            warn!(
                "unsupported configuration ({} Hz sample rate, {} Hz notch), filters bypassed",
                sample_rate, notch_frequency
            );
        } else {
            debug!(
                "filters ready: {} Hz sample rate, {} Hz notch, notch={} lowpass={} highpass={}",
                sample_rate,
                notch_frequency,
                enable_notch_filter,
                enable_lowpass_filter,
                enable_highpass_filter
            );
        }
    }
    pub fn init_with_config(&mut self, config: &EmgFiltersConfig) {
        self.init(
            config.sample_rate,
            config.notch_frequency,
            config.notch,
            config.lowpass,
            config.highpass,
        );
    }
    /// Filters one sample, calls must follow sample order.
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        if self.bypass_enabled {
            return input;
        }
        let mut output = input;
        if self.notch_filter_enabled {
            output = self.ahf.update(output);
        }
        if self.lowpass_filter_enabled {
            output = self.lpf.update(output);
        }
        if self.highpass_filter_enabled {
            output = self.hpf.update(output);
        }
        output
    }
    /// Clears the state of every stage, keeps the configuration.
    pub fn reset(&mut self) {
        self.ahf.reset();
        self.lpf.reset();
        self.hpf.reset();
    }
    /// True when the last `init` got an unsupported configuration (or none yet).
    pub fn is_bypassed(&self) -> bool {
        self.bypass_enabled
    }
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
    pub fn notch_frequency(&self) -> u32 {
        self.notch_frequency
    }
    pub fn is_notch_enabled(&self) -> bool {
        self.notch_filter_enabled
    }
    pub fn is_lowpass_enabled(&self) -> bool {
        self.lowpass_filter_enabled
    }
    pub fn is_highpass_enabled(&self) -> bool {
        self.highpass_filter_enabled
    }
}
impl SampleFilter for EmgFilters {
    fn update(&mut self, input: f32) -> f32 {
        EmgFilters::update(self, input)
    }
    fn reset(&mut self) {
        EmgFilters::reset(self)
    }
}
impl From<&EmgFiltersConfig> for EmgFilters {
    fn from(config: &EmgFiltersConfig) -> Self {
        let mut filters = EmgFilters::new();
        filters.init_with_config(config);
        filters
    }
}

#[test]
fn new_chain_is_bypassed() {
    let mut filters = EmgFilters::new();
    assert!(filters.is_bypassed());
    assert_eq!(filters.update(0.75), 0.75);
}

#[test]
fn init_keeps_selectors_and_flags() {
    let mut filters = EmgFilters::new();
    filters.init(2000, 60, false, true, false);
    assert!(!filters.is_bypassed());
    assert_eq!(filters.sample_rate(), 2000);
    assert_eq!(filters.notch_frequency(), 60);
    assert!(!filters.is_notch_enabled());
    assert!(filters.is_lowpass_enabled());
    assert!(!filters.is_highpass_enabled());
}

#[test]
fn unsupported_notch_bypasses_every_stage() {
    let mut filters = EmgFilters::new();
    filters.init(1000, 55, true, true, true);
    assert!(filters.is_bypassed());
    assert_eq!(filters.sample_rate(), 1000);
    for x in [1., -2., 0.5, 1e3] {
        assert_eq!(filters.update(x), x);
    }
    filters.init(1000, 50, true, true, true);
    assert!(!filters.is_bypassed());
}

#[test]
fn disabled_stages_do_not_advance() {
    let mut filters = EmgFilters::new();
    filters.init(1000, 50, false, true, false);
    for x in [1., 0.3, -0.7] {
        filters.update(x);
    }
    // the notch was skipped so it still holds its initial zero state
    let mut fresh = FourthOrderFilter::new();
    fresh.init(1000, 50);
    assert_eq!(filters.ahf.update(1.), fresh.update(1.));
}

#[test]
fn reset_matches_fresh_chain() {
    let config = EmgFiltersConfig::default();
    let mut filters = EmgFilters::from(&config);
    let mut signal: [f32; 5] = [0.1, -0.4, 0.9, 0.0, 0.3];
    filters.filter(&mut signal);
    filters.reset();
    let mut fresh = EmgFilters::from(&config);
    assert_eq!(filters.update(0.6), fresh.update(0.6));
}
