use crate::{
    constants::{
        HPF_DENOMINATOR_COEF, HPF_NUMERATOR_COEF, LPF_DENOMINATOR_COEF, LPF_NUMERATOR_COEF,
    },
    FilterError, FilterType, SampleFilter, SampleFrequency,
};

/// Second order IIR section (Direct-Form II), used for the low-pass and high-pass stages.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct SecondOrderFilter {
    // options
    num: [f32; 3],
    den: [f32; 3],
    // state
    states: [f32; 2],
}
impl Default for SecondOrderFilter {
    fn default() -> Self {
        // den[0] stays at 1 so an uninitialized filter outputs 0 instead of NaN
        Self {
            num: [0.; 3],
            den: [1., 0., 0.],
            states: [0.; 2],
        }
    }
}
impl SecondOrderFilter {
    /// Creates a filter with zeroed numerator, it outputs 0 until initialized.
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a filter from custom coefficients.
    ///
    /// `den[0]` divides every intermediate value so it must not be zero.
    pub fn with_coefficients(num: [f32; 3], den: [f32; 3]) -> Result<Self, FilterError> {
        if num.iter().chain(den.iter()).any(|c| !c.is_finite()) {
            return Err(FilterError::InvalidCoefficients("coefficients must be finite"));
        }
        if den[0] == 0. {
            return Err(FilterError::InvalidCoefficients(
                "leading denominator coefficient is zero",
            ));
        }
        Ok(Self {
            num,
            den,
            states: [0.; 2],
        })
    }
    /// Loads the table coefficients for the filter type and sample rate.
    ///
    /// The state is always cleared. Coefficients are kept as they were when
    /// there is no table for `sample_rate`.
    pub fn init(&mut self, filter_type: FilterType, sample_rate: u32) {
        self.states = [0.; 2];
        if let Some(sample_freq) = SampleFrequency::from_hz(sample_rate) {
            let idx = sample_freq.index();
            let (num, den) = match filter_type {
                FilterType::LowPass => (&LPF_NUMERATOR_COEF[idx], &LPF_DENOMINATOR_COEF[idx]),
                FilterType::HighPass => (&HPF_NUMERATOR_COEF[idx], &HPF_DENOMINATOR_COEF[idx]),
            };
            self.num = *num;
            self.den = *den;
        }
    }
    #[inline]
    pub fn update(&mut self, input: f32) -> f32 {
        let tmp = (input - self.den[1] * self.states[0] - self.den[2] * self.states[1]) / self.den[0];
        let output = self.num[0] * tmp + self.num[1] * self.states[0] + self.num[2] * self.states[1];
        self.states[1] = self.states[0];
        self.states[0] = tmp;
        output
    }
    pub fn reset(&mut self) {
        self.states = [0.; 2];
    }
    pub fn numerator(&self) -> &[f32; 3] {
        &self.num
    }
    pub fn denominator(&self) -> &[f32; 3] {
        &self.den
    }
}
impl SampleFilter for SecondOrderFilter {
    fn update(&mut self, input: f32) -> f32 {
        SecondOrderFilter::update(self, input)
    }
    fn reset(&mut self) {
        SecondOrderFilter::reset(self)
    }
}

#[cfg(test)]
fn measure_amplitude(filter: &mut SecondOrderFilter, freq: f32, sample_rate: f32) -> f32 {
    let sample = |i: usize| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin();
    for i in 0..4000 {
        filter.update(sample(i));
    }
    (4000..5000)
        .map(|i| filter.update(sample(i)).abs())
        .fold(0., f32::max)
}

#[test]
fn zeroed_filter_outputs_zero() {
    let mut filter = SecondOrderFilter::new();
    assert_eq!(filter.numerator(), &[0.; 3]);
    assert_eq!(filter.denominator(), &[1., 0., 0.]);
    for x in [1., -3.5, 1e6] {
        assert_eq!(filter.update(x), 0.);
    }
}

#[test]
fn init_loads_table_coefficients() {
    let mut filter = SecondOrderFilter::new();
    filter.init(FilterType::HighPass, 2000);
    assert_eq!(filter.numerator(), &[0.9565, -1.9131, 0.9565]);
    assert_eq!(filter.denominator(), &[1.0, -1.9112, 0.9150]);
    filter.init(FilterType::LowPass, 500);
    assert_eq!(filter.numerator(), &[0.3913, 0.7827, 0.3913]);
}

#[test]
fn init_with_unsupported_rate_keeps_coefficients() {
    let mut filter = SecondOrderFilter::new();
    filter.init(FilterType::LowPass, 1000);
    filter.update(1.);
    filter.init(FilterType::LowPass, 44100);
    assert_eq!(filter.numerator(), &[0.1311, 0.2622, 0.1311]);
    // state is still cleared
    assert_eq!(filter.update(1.), 0.1311);
}

#[test]
fn direct_form_two_recursion() {
    let mut filter = SecondOrderFilter::new();
    filter.init(FilterType::LowPass, 1000);
    let (b, a) = ([0.1311f32, 0.2622, 0.1311], [1.0f32, -0.7478, 0.2722]);
    let (mut s0, mut s1) = (0f32, 0f32);
    for x in [1.0f32, -0.5, 0.25, 0.0, 2.0, 0.0, 0.0] {
        let w = (x - a[1] * s0 - a[2] * s1) / a[0];
        let expected = b[0] * w + b[1] * s0 + b[2] * s1;
        s1 = s0;
        s0 = w;
        assert_eq!(filter.update(x), expected);
    }
}

#[test]
fn lowpass_rejects_high_frequencies() {
    for (rate, pass, stop) in [(500, 47., 240.), (1000, 47., 450.), (2000, 103., 900.)] {
        let mut filter = SecondOrderFilter::new();
        filter.init(FilterType::LowPass, rate);
        assert!(measure_amplitude(&mut filter, pass, rate as f32) > 0.9);
        filter.reset();
        let amplitude = measure_amplitude(&mut filter, stop, rate as f32);
        assert!(amplitude < 0.05, "{} Hz at {} Hz got {}", stop, rate, amplitude);
    }
}

#[test]
fn highpass_rejects_dc() {
    for rate in [500, 1000, 2000] {
        let mut filter = SecondOrderFilter::new();
        filter.init(FilterType::HighPass, rate);
        let mut output = 1.;
        for _ in 0..2000 {
            output = filter.update(1.);
        }
        assert!(output.abs() < 0.05, "dc at {} Hz got {}", rate, output);
        filter.reset();
        assert!(measure_amplitude(&mut filter, 103., rate as f32) > 0.9);
    }
}

#[test]
fn rejects_zero_leading_denominator() {
    assert_eq!(
        SecondOrderFilter::with_coefficients([1., 0., 0.], [0., 0., 0.]).err(),
        Some(FilterError::InvalidCoefficients(
            "leading denominator coefficient is zero"
        ))
    );
    assert!(SecondOrderFilter::with_coefficients([f32::NAN, 0., 0.], [1., 0., 0.]).is_err());
    let mut passthrough = SecondOrderFilter::with_coefficients([1., 0., 0.], [1., 0., 0.]).unwrap();
    let mut signal: [f32; 3] = [0.5, -1., 3.];
    passthrough.filter(&mut signal);
    assert_eq!(signal, [0.5, -1., 3.]);
}
