mod fourth_order_filter;
mod second_order_filter;
pub use fourth_order_filter::FourthOrderFilter;
pub use second_order_filter::SecondOrderFilter;

/// Per-sample recursive filter.
///
/// Calls must follow sample order, each `update` advances the filter state.
pub trait SampleFilter {
    fn update(&mut self, input: f32) -> f32;
    /// Clears the delay line, keeps the coefficients.
    fn reset(&mut self);
    /// Filters a chunk of consecutive samples in place.
    fn filter(&mut self, signal: &mut [f32]) {
        for sample in signal.iter_mut() {
            *sample = self.update(*sample);
        }
    }
}
