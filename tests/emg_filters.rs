use emg_filters::{EmgFilters, EmgFiltersConfig, FilterType, FourthOrderFilter, SecondOrderFilter};

const SUPPORTED_RATES: [u32; 3] = [500, 1000, 2000];
const SUPPORTED_NOTCHES: [u32; 2] = [50, 60];

fn init_logger() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .ok();
}

fn test_signal(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / 1000.;
            (2. * std::f32::consts::PI * 60. * t).sin() * 0.5
                + (2. * std::f32::consts::PI * 95. * t).sin()
                + if i % 17 == 0 { 0.8 } else { 0. }
        })
        .collect()
}

fn run(filters: &mut EmgFilters, input: &[f32]) -> Vec<f32> {
    input.iter().map(|x| filters.update(*x)).collect()
}

#[test]
fn it_accepts_every_supported_configuration() {
    init_logger();
    for rate in SUPPORTED_RATES {
        for notch in SUPPORTED_NOTCHES {
            let mut filters = EmgFilters::new();
            filters.init(rate, notch, true, true, true);
            assert!(!filters.is_bypassed(), "{} Hz / {} Hz", rate, notch);
        }
    }
}

#[test]
fn it_bypasses_unsupported_configurations() {
    init_logger();
    for (rate, notch) in [(250, 50), (44100, 60), (1000, 0), (2000, 100), (0, 0), (500, 55)] {
        let mut filters = EmgFilters::new();
        filters.init(rate, notch, true, true, true);
        assert!(filters.is_bypassed(), "{} Hz / {} Hz", rate, notch);
        for x in test_signal(200) {
            assert_eq!(filters.update(x), x);
        }
    }
}

#[test]
fn it_is_deterministic() {
    let input = test_signal(2000);
    for rate in SUPPORTED_RATES {
        for notch in SUPPORTED_NOTCHES {
            let mut first = EmgFilters::new();
            first.init(rate, notch, true, true, true);
            let mut second = EmgFilters::new();
            second.init(rate, notch, true, true, true);
            assert_eq!(run(&mut first, &input), run(&mut second, &input));
        }
    }
}

#[test]
fn it_settles_to_zero_without_input() {
    for rate in SUPPORTED_RATES {
        for notch in SUPPORTED_NOTCHES {
            let mut filters = EmgFilters::new();
            filters.init(rate, notch, true, true, true);
            filters.update(1.);
            let mut output = 1.;
            for _ in 0..20000 {
                output = filters.update(0.);
            }
            assert!(output.abs() < 1e-4, "{} Hz / {} Hz got {}", rate, notch, output);
        }
    }
}

#[test]
fn it_passes_the_signal_with_every_stage_disabled() {
    let mut filters = EmgFilters::new();
    filters.init(1000, 60, false, false, false);
    assert!(!filters.is_bypassed());
    for x in test_signal(100) {
        assert_eq!(filters.update(x), x);
    }
}

#[test]
fn it_matches_each_stage_in_isolation() {
    let input = test_signal(1000);
    for rate in SUPPORTED_RATES {
        let mut notch_only = EmgFilters::new();
        notch_only.init(rate, 50, true, false, false);
        let mut notch = FourthOrderFilter::new();
        notch.init(rate, 50);

        let mut lowpass_only = EmgFilters::new();
        lowpass_only.init(rate, 50, false, true, false);
        let mut lowpass = SecondOrderFilter::new();
        lowpass.init(FilterType::LowPass, rate);

        let mut highpass_only = EmgFilters::new();
        highpass_only.init(rate, 50, false, false, true);
        let mut highpass = SecondOrderFilter::new();
        highpass.init(FilterType::HighPass, rate);

        for x in input.iter().copied() {
            assert_eq!(notch_only.update(x), notch.update(x));
            assert_eq!(lowpass_only.update(x), lowpass.update(x));
            assert_eq!(highpass_only.update(x), highpass.update(x));
        }
    }
}

#[test]
fn it_applies_notch_then_lowpass_then_highpass() {
    let input = test_signal(1000);
    for rate in SUPPORTED_RATES {
        for mains in SUPPORTED_NOTCHES {
            let mut filters = EmgFilters::new();
            filters.init(rate, mains, true, true, true);
            let mut notch = FourthOrderFilter::new();
            notch.init(rate, mains);
            let mut lowpass = SecondOrderFilter::new();
            lowpass.init(FilterType::LowPass, rate);
            let mut highpass = SecondOrderFilter::new();
            highpass.init(FilterType::HighPass, rate);
            for x in input.iter().copied() {
                let expected = highpass.update(lowpass.update(notch.update(x)));
                assert_eq!(filters.update(x), expected);
            }
        }
    }
}

#[test]
fn it_filters_an_impulse_at_1000hz_with_60hz_notch() {
    let mut filters = EmgFilters::new();
    filters.init(1000, 60, true, true, true);
    let output = run(&mut filters, &[1., 0., 0., 0., 0.]);

    // reference built from the 1000 Hz / 60 Hz table entries
    let (ahf_num, ahf_den, ahf_gain): ([f32; 6], [f32; 6], f32) = (
        [0.5824, -1.0810, 0.5824, 1.0736, -2.0000, 1.0736],
        [1.0000, -1.8407, 0.9894, 1.0000, -1.8584, 0.9891],
        1.4206,
    );
    let (lpf_num, lpf_den): ([f32; 3], [f32; 3]) = ([0.1311, 0.2622, 0.1311], [1.0, -0.7478, 0.2722]);
    let (hpf_num, hpf_den): ([f32; 3], [f32; 3]) = ([0.9150, -1.8299, 0.9150], [1.0, -1.8227, 0.8372]);
    let mut ahf_states = [0f32; 4];
    let mut lpf_states = [0f32; 2];
    let mut hpf_states = [0f32; 2];
    let biquad = |x: f32, num: &[f32; 3], den: &[f32; 3], s: &mut [f32; 2]| {
        let w = (x - den[1] * s[0] - den[2] * s[1]) / den[0];
        let y = num[0] * w + num[1] * s[0] + num[2] * s[1];
        s[1] = s[0];
        s[0] = w;
        y
    };
    let expected: Vec<f32> = [1f32, 0., 0., 0., 0.]
        .iter()
        .map(|&x| {
            let s = &mut ahf_states;
            let out1 = ahf_num[0] * x + s[0];
            s[0] = ahf_num[1] * x + s[1] - ahf_den[1] * out1;
            s[1] = ahf_num[2] * x - ahf_den[2] * out1;
            let out2 = ahf_num[3] * out1 + s[2];
            s[2] = ahf_num[4] * out1 + s[3] - ahf_den[4] * out2;
            s[3] = ahf_num[5] * out1 - ahf_den[5] * out2;
            let notched = ahf_gain * out2;
            let lowpassed = biquad(notched, &lpf_num, &lpf_den, &mut lpf_states);
            biquad(lowpassed, &hpf_num, &hpf_den, &mut hpf_states)
        })
        .collect();

    assert!((output[0] - 0.1065515).abs() < 1e-6, "first output {}", output[0]);
    for (actual, expected) in output.iter().zip(expected.iter()) {
        let tolerance = 1e-6 * expected.abs().max(1.);
        assert!((actual - expected).abs() <= tolerance, "{} != {}", actual, expected);
    }
}

#[test]
fn it_resets_state_on_init() {
    let input = test_signal(300);
    let mut filters = EmgFilters::new();
    filters.init(2000, 50, true, true, true);
    run(&mut filters, &input);
    filters.init(2000, 50, true, true, true);
    let mut fresh = EmgFilters::new();
    fresh.init(2000, 50, true, true, true);
    assert_eq!(filters.update(0.42), fresh.update(0.42));
}

#[test]
fn it_recovers_from_bypass_on_init() {
    let mut filters = EmgFilters::new();
    filters.init(3000, 50, true, true, true);
    assert!(filters.is_bypassed());
    filters.init(500, 50, true, true, true);
    assert!(!filters.is_bypassed());
    let input = test_signal(300);
    assert_ne!(run(&mut filters, &input), input);
    filters.init(500, 70, true, true, true);
    assert!(filters.is_bypassed());
    for x in input {
        assert_eq!(filters.update(x), x);
    }
}

#[test]
fn it_can_be_built_from_config() {
    let mut config = EmgFiltersConfig::default();
    assert_eq!(config.sample_rate, 1000);
    assert_eq!(config.notch_frequency, 50);
    config.notch_frequency = 60;
    config.highpass = false;
    let mut from_config = EmgFilters::from(&config);
    let mut from_args = EmgFilters::new();
    from_args.init(1000, 60, true, true, false);
    assert!(!from_config.is_highpass_enabled());
    let input = test_signal(500);
    assert_eq!(run(&mut from_config, &input), run(&mut from_args, &input));
}

#[test]
fn it_removes_mains_hum_and_baseline() {
    // 60 Hz hum riding on a dc offset
    let rate = 1000.;
    let mut filters = EmgFilters::new();
    filters.init(1000, 60, true, true, true);
    let sample = |i: usize, freq: f32| (2. * std::f32::consts::PI * freq * i as f32 / rate).sin();
    for i in 0..8000 {
        filters.update(sample(i, 60.) + 2.);
    }
    let hum = (8000..9000)
        .map(|i| filters.update(sample(i, 60.) + 2.).abs())
        .fold(0f32, f32::max);
    assert!(hum < 0.2, "hum amplitude {}", hum);
}
