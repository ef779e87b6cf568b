use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("Unsupported sample rate: {0} Hz")]
    UnsupportedSampleRate(u32),

    #[error("Unsupported notch frequency: {0} Hz")]
    UnsupportedNotchFrequency(u32),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Invalid filter coefficients: {0}")]
    InvalidCoefficients(&'static str),

    #[error("Not enough valid timestamps to infer the sample rate: {0}")]
    NotEnoughTimestamps(usize),

    #[error("Invalid spectral segment: {0}")]
    InvalidSegment(&'static str),

    #[error("Unknown filter type: {0}")]
    UnknownFilterType(String),
}

pub type Result<T> = std::result::Result<T, FilterError>;
