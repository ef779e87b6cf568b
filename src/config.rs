use crate::{
    constants::{NOTCH_FREQUENCIES_HZ, SAMPLE_FREQUENCIES_HZ},
    FilterError,
};

/// Supported input sample rates.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum SampleFrequency {
    Hz500,
    Hz1000,
    Hz2000,
}
impl SampleFrequency {
    /// Resolves a rate in Hz, `None` if there are no coefficients for it.
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            500 => Some(SampleFrequency::Hz500),
            1000 => Some(SampleFrequency::Hz1000),
            2000 => Some(SampleFrequency::Hz2000),
            _ => None,
        }
    }
    pub fn hz(&self) -> u32 {
        SAMPLE_FREQUENCIES_HZ[self.index()]
    }
    pub(crate) fn index(&self) -> usize {
        match self {
            SampleFrequency::Hz500 => 0,
            SampleFrequency::Hz1000 => 1,
            SampleFrequency::Hz2000 => 2,
        }
    }
}
impl TryFrom<u32> for SampleFrequency {
    type Error = FilterError;
    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        SampleFrequency::from_hz(hz).ok_or(FilterError::UnsupportedSampleRate(hz))
    }
}
#[cfg(feature = "display")]
impl std::fmt::Display for SampleFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hz", self.hz())
    }
}
#[cfg(feature = "display")]
impl std::str::FromStr for SampleFrequency {
    type Err = FilterError;
    fn from_str(s: &str) -> std::result::Result<Self, FilterError> {
        Self::try_from(parse_hz(s)?)
    }
}

/// Mains (power line) frequency removed by the notch stage.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum NotchFrequency {
    Hz50,
    Hz60,
}
impl NotchFrequency {
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            50 => Some(NotchFrequency::Hz50),
            60 => Some(NotchFrequency::Hz60),
            _ => None,
        }
    }
    pub fn hz(&self) -> u32 {
        NOTCH_FREQUENCIES_HZ[self.index()]
    }
    pub(crate) fn index(&self) -> usize {
        match self {
            NotchFrequency::Hz50 => 0,
            NotchFrequency::Hz60 => 1,
        }
    }
}
impl TryFrom<u32> for NotchFrequency {
    type Error = FilterError;
    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        NotchFrequency::from_hz(hz).ok_or(FilterError::UnsupportedNotchFrequency(hz))
    }
}
#[cfg(feature = "display")]
impl std::fmt::Display for NotchFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}hz", self.hz())
    }
}
#[cfg(feature = "display")]
impl std::str::FromStr for NotchFrequency {
    type Err = FilterError;
    fn from_str(s: &str) -> std::result::Result<Self, FilterError> {
        Self::try_from(parse_hz(s)?)
    }
}

/// Response of a second order stage.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
}
#[cfg(feature = "display")]
impl std::fmt::Display for FilterType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            FilterType::LowPass => write!(f, "lowpass"),
            FilterType::HighPass => write!(f, "highpass"),
        }
    }
}
#[cfg(feature = "display")]
impl std::str::FromStr for FilterType {
    type Err = FilterError;
    fn from_str(s: &str) -> std::result::Result<Self, FilterError> {
        match s.trim().to_lowercase().as_str() {
            "lowpass" | "low-pass" | "lpf" => Ok(Self::LowPass),
            "highpass" | "high-pass" | "hpf" => Ok(Self::HighPass),
            _ => Err(FilterError::UnknownFilterType(s.to_string())),
        }
    }
}

/// Accepts "1000", "1000hz" or "1000 Hz".
#[cfg(feature = "display")]
fn parse_hz(s: &str) -> std::result::Result<u32, FilterError> {
    let value = s.trim().to_lowercase();
    value
        .strip_suffix("hz")
        .unwrap_or(&value)
        .trim()
        .parse::<u32>()
        .map_err(|_| FilterError::InvalidFrequency(s.to_string()))
}

/// Configures the filter chain.
///
/// Rates are kept as raw Hz values; anything without a coefficient table
/// puts the chain in bypass mode instead of failing.
#[cfg_attr(feature = "debug", derive(Debug))]
#[derive(Clone)]
pub struct EmgFiltersConfig {
    /// Sample rate of the input signal, one of 500, 1000 or 2000.
    pub sample_rate: u32,
    /// Mains frequency to remove, 50 or 60.
    pub notch_frequency: u32,
    /// Enables the anti-hum notch stage.
    pub notch: bool,
    /// Enables the low-pass stage.
    pub lowpass: bool,
    /// Enables the high-pass stage.
    pub highpass: bool,
}
impl Default for EmgFiltersConfig {
    fn default() -> EmgFiltersConfig {
        EmgFiltersConfig {
            sample_rate: SampleFrequency::Hz1000.hz(),
            notch_frequency: NotchFrequency::Hz50.hz(),
            notch: true,
            lowpass: true,
            highpass: true,
        }
    }
}

#[test]
fn resolves_supported_frequencies() {
    for hz in SAMPLE_FREQUENCIES_HZ {
        let rate = SampleFrequency::from_hz(hz).expect("supported rate");
        assert_eq!(rate.hz(), hz);
        assert_eq!(SAMPLE_FREQUENCIES_HZ[rate.index()], hz);
    }
    for hz in NOTCH_FREQUENCIES_HZ {
        let notch = NotchFrequency::from_hz(hz).expect("supported notch");
        assert_eq!(notch.hz(), hz);
        assert_eq!(NOTCH_FREQUENCIES_HZ[notch.index()], hz);
    }
}

#[test]
fn rejects_unsupported_frequencies() {
    assert!(SampleFrequency::from_hz(250).is_none());
    assert!(SampleFrequency::from_hz(0).is_none());
    assert!(NotchFrequency::from_hz(55).is_none());
    assert_eq!(
        SampleFrequency::try_from(44100).err(),
        Some(FilterError::UnsupportedSampleRate(44100))
    );
    assert_eq!(
        NotchFrequency::try_from(100).err(),
        Some(FilterError::UnsupportedNotchFrequency(100))
    );
}

#[cfg(feature = "display")]
#[test]
fn parses_frequencies_and_filter_types() {
    assert!("1000".parse::<SampleFrequency>() == Ok(SampleFrequency::Hz1000));
    assert!("2000 Hz".parse::<SampleFrequency>() == Ok(SampleFrequency::Hz2000));
    assert!("60hz".parse::<NotchFrequency>() == Ok(NotchFrequency::Hz60));
    assert!("Low-Pass".parse::<FilterType>() == Ok(FilterType::LowPass));
    assert_eq!(
        "fast".parse::<SampleFrequency>().err(),
        Some(FilterError::InvalidFrequency("fast".to_string()))
    );
    assert_eq!(SampleFrequency::Hz500.to_string(), "500hz");
}
