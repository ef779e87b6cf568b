use crate::{
    constants::{
        AHF_DENOMINATOR_COEF_50HZ, AHF_DENOMINATOR_COEF_60HZ, AHF_NUMERATOR_COEF_50HZ,
        AHF_NUMERATOR_COEF_60HZ, AHF_OUTPUT_GAIN_COEF_50HZ, AHF_OUTPUT_GAIN_COEF_60HZ,
    },
    FilterError, NotchFrequency, SampleFilter, SampleFrequency,
};

/// Fourth order anti-hum filter made of two cascaded biquads in transposed form.
///
/// Coefficients 0..3 belong to the first section and 3..6 to the second one,
/// the output of the second section is scaled by `gain`.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Default)]
pub struct FourthOrderFilter {
    // options
    num: [f32; 6],
    den: [f32; 6],
    gain: f32,
    // state, two values per section
    states: [f32; 4],
}
impl FourthOrderFilter {
    /// Creates a filter with zero gain, it outputs 0 until initialized.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a filter from custom coefficients.
    pub fn with_coefficients(num: [f32; 6], den: [f32; 6], gain: f32) -> Result<Self, FilterError> {
        if !gain.is_finite() || num.iter().chain(den.iter()).any(|c| !c.is_finite()) {
            return Err(FilterError::InvalidCoefficients("coefficients must be finite"));
        }
        if den[0] == 0. || den[3] == 0. {
            return Err(FilterError::InvalidCoefficients(
                "leading denominator coefficient is zero",
            ));
        }
        Ok(Self {
            num,
            den,
            gain,
            states: [0.; 4],
        })
    }
    /// Loads the table coefficients for the sample rate and mains frequency.
    ///
    /// State and gain are always cleared, so an unsupported pair leaves a
    /// filter that outputs 0.
    pub fn init(&mut self, sample_rate: u32, notch_frequency: u32) {
        self.gain = 0.;
        self.states = [0.; 4];
        let (Some(sample_freq), Some(notch_freq)) = (
            SampleFrequency::from_hz(sample_rate),
            NotchFrequency::from_hz(notch_frequency),
        ) else {
            return;
        };
        // tables ordered like NOTCH_FREQUENCIES_HZ
        let tables = [
            (
                &AHF_NUMERATOR_COEF_50HZ,
                &AHF_DENOMINATOR_COEF_50HZ,
                &AHF_OUTPUT_GAIN_COEF_50HZ,
            ),
            (
                &AHF_NUMERATOR_COEF_60HZ,
                &AHF_DENOMINATOR_COEF_60HZ,
                &AHF_OUTPUT_GAIN_COEF_60HZ,
            ),
        ];
        let (num, den, gain) = tables[notch_freq.index()];
        let idx = sample_freq.index();
        self.num = num[idx];
        self.den = den[idx];
        self.gain = gain[idx];
    }
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        // first section
        let stage_in = input;
        let stage_out = self.num[0] * stage_in + self.states[0];
        self.states[0] = (self.num[1] * stage_in + self.states[1]) - self.den[1] * stage_out;
        self.states[1] = self.num[2] * stage_in - self.den[2] * stage_out;
        // second section
        let stage_in = stage_out;
        let stage_out = self.num[3] * stage_in + self.states[2];
        self.states[2] = (self.num[4] * stage_in + self.states[3]) - self.den[4] * stage_out;
        self.states[3] = self.num[5] * stage_in - self.den[5] * stage_out;
        self.gain * stage_out
    }
    pub fn reset(&mut self) {
        self.states = [0.; 4];
    }
    pub fn numerator(&self) -> &[f32; 6] {
        &self.num
    }
    pub fn denominator(&self) -> &[f32; 6] {
        &self.den
    }
    pub fn gain(&self) -> f32 {
        self.gain
    }
}
impl SampleFilter for FourthOrderFilter {
    fn update(&mut self, input: f32) -> f32 {
        FourthOrderFilter::update(self, input)
    }
    fn reset(&mut self) {
        FourthOrderFilter::reset(self)
    }
}

#[cfg(test)]
fn measure_amplitude(filter: &mut FourthOrderFilter, freq: f32, sample_rate: f32) -> f32 {
    let sample = |i: usize| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin();
    for i in 0..8000 {
        filter.update(sample(i));
    }
    (8000..9000)
        .map(|i| filter.update(sample(i)).abs())
        .fold(0., f32::max)
}

#[test]
fn uninitialized_filter_outputs_zero() {
    let mut filter = FourthOrderFilter::new();
    assert_eq!(filter.gain(), 0.);
    assert_eq!(filter.update(1.), 0.);
    assert_eq!(filter.update(-2.), 0.);
}

#[test]
fn init_selects_table_by_mains_frequency() {
    let mut filter = FourthOrderFilter::new();
    filter.init(1000, 60);
    assert_eq!(filter.gain(), 1.4206);
    assert_eq!(filter.numerator()[3], 1.0736);
    filter.init(500, 50);
    assert_eq!(filter.gain(), 1.3422);
    assert_eq!(filter.denominator()[4], -1.1187);
}

#[test]
fn init_covers_every_rate_and_mains_pair() {
    use crate::constants::{NOTCH_FREQUENCIES_HZ, SAMPLE_FREQUENCIES_HZ};
    let mut filter = FourthOrderFilter::new();
    for (idx, rate) in SAMPLE_FREQUENCIES_HZ.into_iter().enumerate() {
        filter.init(rate, NOTCH_FREQUENCIES_HZ[0]);
        assert_eq!(filter.numerator(), &AHF_NUMERATOR_COEF_50HZ[idx]);
        assert_eq!(filter.denominator(), &AHF_DENOMINATOR_COEF_50HZ[idx]);
        assert_eq!(filter.gain(), AHF_OUTPUT_GAIN_COEF_50HZ[idx]);
        filter.init(rate, NOTCH_FREQUENCIES_HZ[1]);
        assert_eq!(filter.numerator(), &AHF_NUMERATOR_COEF_60HZ[idx]);
        assert_eq!(filter.denominator(), &AHF_DENOMINATOR_COEF_60HZ[idx]);
        assert_eq!(filter.gain(), AHF_OUTPUT_GAIN_COEF_60HZ[idx]);
    }
}

#[test]
fn unsupported_pair_clears_gain() {
    let mut filter = FourthOrderFilter::new();
    filter.init(2000, 50);
    filter.init(2000, 55);
    assert_eq!(filter.gain(), 0.);
    assert_eq!(filter.update(1.), 0.);
    filter.init(48000, 60);
    assert_eq!(filter.update(1.), 0.);
}

#[test]
fn impulse_response_follows_cascaded_sections() {
    let mut filter = FourthOrderFilter::new();
    filter.init(1000, 60);
    // first output only goes through the direct paths of both sections
    assert_eq!(filter.update(1.), 1.4206f32 * (1.0736f32 * (0.5824f32 * 1.)));
    let second = filter.update(0.);
    let s0 = -1.0810 - -1.8407 * 0.5824f32;
    let out1 = s0;
    let s2 = -2.0 * 0.5824 - -1.8584 * (1.0736 * 0.5824f32);
    let expected = 1.4206f32 * (1.0736 * out1 + s2);
    assert!((second - expected).abs() < 1e-5, "{} != {}", second, expected);
}

#[test]
fn notch_removes_mains_frequency() {
    for rate in [500u32, 1000, 2000] {
        for mains in [50u32, 60] {
            let mut filter = FourthOrderFilter::new();
            filter.init(rate, mains);
            let hum = measure_amplitude(&mut filter, mains as f32, rate as f32);
            assert!(hum < 0.2, "{} Hz at {} Hz got {}", mains, rate, hum);
            filter.reset();
            let signal = measure_amplitude(&mut filter, 151., rate as f32);
            assert!(signal > 0.8, "151 Hz at {} Hz got {}", rate, signal);
        }
    }
}

#[test]
fn rejects_zero_leading_denominator() {
    let num = [1., 0., 0., 1., 0., 0.];
    assert!(FourthOrderFilter::with_coefficients(num, [1., 0., 0., 0., 0., 0.], 1.).is_err());
    assert!(FourthOrderFilter::with_coefficients(num, [1., 0., 0., 1., 0., 0.], f32::INFINITY).is_err());
    let mut passthrough =
        FourthOrderFilter::with_coefficients(num, [1., 0., 0., 1., 0., 0.], 1.).unwrap();
    let mut signal: [f32; 3] = [0.25, 4., -1.];
    passthrough.filter(&mut signal);
    assert_eq!(signal, [0.25, 4., -1.]);
}
