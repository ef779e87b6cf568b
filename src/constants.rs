// Coefficient tables, indexed by `SampleFrequency::index()`: 500 Hz, 1000 Hz, 2000 Hz.

pub(crate) const SAMPLE_FREQUENCIES_HZ: [u32; 3] = [500, 1000, 2000];
pub(crate) const NOTCH_FREQUENCIES_HZ: [u32; 2] = [50, 60];

// low-pass, 2nd order
pub(crate) const LPF_NUMERATOR_COEF: [[f32; 3]; 3] = [
    [0.3913, 0.7827, 0.3913],
    [0.1311, 0.2622, 0.1311],
    [0.2483, 0.4967, 0.2483],
];
pub(crate) const LPF_DENOMINATOR_COEF: [[f32; 3]; 3] = [
    [1.0000, 0.3695, 0.1958],
    [1.0000, -0.7478, 0.2722],
    [1.0000, -0.1842, 0.1776],
];

// high-pass, 2nd order
pub(crate) const HPF_NUMERATOR_COEF: [[f32; 3]; 3] = [
    [0.8371, -1.6742, 0.8371],
    [0.9150, -1.8299, 0.9150],
    [0.9565, -1.9131, 0.9565],
];
pub(crate) const HPF_DENOMINATOR_COEF: [[f32; 3]; 3] = [
    [1.0000, -1.6475, 0.7009],
    [1.0000, -1.8227, 0.8372],
    [1.0000, -1.9112, 0.9150],
];

// anti-hum, 4th order (two biquads), 50 Hz mains
pub(crate) const AHF_NUMERATOR_COEF_50HZ: [[f32; 6]; 3] = [
    [0.9522, -1.5407, 0.9522, 0.8158, -0.8045, 0.0855],
    [0.5869, -1.1146, 0.5869, 1.0499, -2.0000, 1.0499],
    [0.9969, -1.9692, 0.9969, 0.9969, -1.9692, 0.9969],
];
pub(crate) const AHF_DENOMINATOR_COEF_50HZ: [[f32; 6]; 3] = [
    [1.0000, -1.5395, 0.9056, 1.0000, -1.1187, 0.3129],
    [1.0000, -1.8844, 0.9893, 1.0000, -1.8991, 0.9892],
    [1.0000, -1.9692, 0.9937, 1.0000, -1.9692, 0.9937],
];
pub(crate) const AHF_OUTPUT_GAIN_COEF_50HZ: [f32; 3] = [1.3422, 1.4399, 1.0000];

// anti-hum, 4th order (two biquads), 60 Hz mains
pub(crate) const AHF_NUMERATOR_COEF_60HZ: [[f32; 6]; 3] = [
    [0.9528, -1.3891, 0.9528, 0.8272, -0.7225, 0.0264],
    [0.5824, -1.0810, 0.5824, 1.0736, -2.0000, 1.0736],
    [0.9969, -1.9584, 0.9969, 0.9969, -1.9584, 0.9969],
];
pub(crate) const AHF_DENOMINATOR_COEF_60HZ: [[f32; 6]; 3] = [
    [1.0000, -1.3880, 0.9066, 1.0000, -0.9739, 0.2371],
    [1.0000, -1.8407, 0.9894, 1.0000, -1.8584, 0.9891],
    [1.0000, -1.9584, 0.9937, 1.0000, -1.9584, 0.9937],
];
pub(crate) const AHF_OUTPUT_GAIN_COEF_60HZ: [f32; 3] = [1.3430, 1.4206, 1.0000];
