mod config;
mod constants;
mod emg_filters;
mod error;
pub mod features;
mod filters;
pub mod spectral;
pub use config::EmgFiltersConfig;
pub use config::FilterType;
pub use config::NotchFrequency;
pub use config::SampleFrequency;
pub use emg_filters::EmgFilters;
pub use error::{FilterError, Result};
pub use filters::FourthOrderFilter;
pub use filters::SampleFilter;
pub use filters::SecondOrderFilter;
