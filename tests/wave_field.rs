use ripple_wasm::field::{BAND_WIDTH, CORE_RADIUS};
use ripple_wasm::{Palette, RippleBuffer, RippleConfig, RippleEvent, WaveParams};

fn params() -> WaveParams {
    WaveParams {
        speed: 600.0,
        frequency: 0.045,
        damping: 2.2,
        max_radius: 0.0,
        ripple_alpha: 0.8,
        intensity: 1.0,
    }
}

#[test]
fn envelope_peaks_on_wavefront() {
    let p = params();
    for age in [0.05_f32, 0.1, 0.25, 0.5] {
        let front = p.wavefront_radius(age);
        let peak = p.envelope(front, age);
        assert!(peak > 0.0);
        for offset in [0.5_f32, 2.0, 8.0, 20.0] {
            assert!(p.envelope(front + offset, age) < peak, "age {age} +{offset}");
            assert!(p.envelope(front - offset, age) < peak, "age {age} -{offset}");
        }
    }
}

#[test]
fn envelope_decays_after_wavefront_passes() {
    let p = params();
    let r = 120.0;
    let passed_at = r / p.speed;

    let mut prev = p.envelope(r, passed_at);
    for step in 1..=30 {
        let age = passed_at + step as f32 * 0.01;
        let next = p.envelope(r, age);
        assert!(next < prev, "step {step}: {next} !< {prev}");
        prev = next;
    }
}

#[test]
fn contribution_decays_over_each_ring_period() {
    let p = params();
    let r = 120.0;
    let passed_at = r / p.speed;
    let period = p.ring_period();

    for offset in [0.0_f32, 0.02] {
        let age = passed_at + offset;
        let now = p.contribution(r, age);
        let later = p.contribution(r, age + period);
        assert!(now > 0.0);
        assert!(later < now, "offset {offset}: {later} !< {now}");
    }
}

#[test]
fn nothing_beyond_max_radius() {
    for max_radius in [10.0_f32, 50.0, 200.0, 333.3] {
        let p = WaveParams {
            max_radius,
            ..params()
        };
        for extra in [0.0_f32, 0.001, 0.5, 10.0, 150.0] {
            for step in 0..=40 {
                let age = step as f32 * 0.05;
                assert_eq!(
                    p.contribution(max_radius + extra, age),
                    0.0,
                    "M={max_radius} r=M+{extra} age={age}"
                );
            }
        }
    }
}

#[test]
fn max_radius_keeps_inner_ripples() {
    let p = WaveParams {
        max_radius: 200.0,
        ..params()
    };
    let unbounded = params();
    assert_eq!(p.contribution(120.0, 0.2), unbounded.contribution(120.0, 0.2));
    assert!(p.contribution(120.0, 0.2) > 0.0);
}

#[test]
fn origin_is_always_suppressed() {
    let p = params();
    for step in 0..=200 {
        let age = step as f32 * 0.01;
        assert_eq!(p.contribution(0.0, age), 0.0);
    }
    assert!(p.envelope(CORE_RADIUS * 0.5, 0.0) < p.envelope(CORE_RADIUS, 0.0));
}

#[test]
fn pointer_ripple_scenario() {
    let p = params();
    let mut buf = RippleBuffer::new(12);
    buf.push(100.0, 100.0, 0.0);
    let snap = buf.snapshot();
    let now = 0.1;

    assert!((p.wavefront_radius(now) - 60.0).abs() < 1e-4);

    let at = |dist: f32| p.intensity_at([100.0 + dist, 100.0], snap.events(), now);
    let on_front = at(60.0);

    // Scan outwards; the brightest ring sits within one band of the wavefront.
    let (best_r, best) = (0..=240)
        .map(|r| (r as f32, at(r as f32)))
        .fold((0.0, 0.0), |acc, x| if x.1 > acc.1 { x } else { acc });
    assert!((best_r - 60.0).abs() <= BAND_WIDTH, "peak at {best_r}");
    assert!(on_front >= 0.7 * best, "{on_front} vs peak {best}");

    assert!(on_front > 10.0 * at(60.0 + 4.0 * BAND_WIDTH));
    assert_eq!(at(0.0), 0.0);
    for step in 0..50 {
        let later = step as f32 * 0.04;
        assert_eq!(p.intensity_at([100.0, 100.0], snap.events(), later), 0.0);
    }
}

#[test]
fn total_is_clamped_to_unit() {
    let p = WaveParams {
        intensity: 25.0,
        ..params()
    };
    let events: Vec<_> = (0..32).map(|_| RippleEvent::new(0.0, 0.0, 0.0)).collect();
    let v = p.intensity_at([60.0, 0.0], events.iter().copied(), 0.1);
    assert_eq!(v, 1.0);

    let none = p.intensity_at([60.0, 0.0], std::iter::empty(), 0.1);
    assert_eq!(none, 0.0);
}

#[test]
fn shade_tint_alpha_follows_field() {
    let cfg = RippleConfig::default();
    let p = WaveParams::from(&cfg);
    let mut buf = RippleBuffer::new(cfg.max_ripples);
    buf.push(0.0, 0.0, 0.0);
    let snap = buf.snapshot();

    let lit = p.shade([60.0, 0.0], &snap, 0.1, Palette::Tint, cfg.color);
    assert_eq!(&lit[..3], &cfg.color);
    assert!(lit[3] > 0.0);

    let dark = p.shade([2_000.0, 2_000.0], &snap, 0.1, Palette::Tint, cfg.color);
    assert_eq!(dark[3], 0.0);
}
