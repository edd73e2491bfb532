use ripple_wasm::{
    DriverState, FrameDriver, FrameUniforms, RenderBackend, RippleBuffer, Viewport,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Resize(u32, u32),
    Draw {
        time: f32,
        resolution: [f32; 2],
        ripples: usize,
    },
    Release,
}

/// Records every GPU-facing call the driver makes.
#[derive(Default)]
struct Recorder {
    calls: Vec<Call>,
}

impl Recorder {
    fn draws(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Draw { .. }))
            .collect()
    }

    fn releases(&self) -> usize {
        self.calls.iter().filter(|c| **c == Call::Release).count()
    }
}

impl RenderBackend for Recorder {
    fn resize(&mut self, viewport: &Viewport) {
        self.calls
            .push(Call::Resize(viewport.width_px, viewport.height_px));
    }

    fn draw(&mut self, frame: &FrameUniforms<'_>) {
        self.calls.push(Call::Draw {
            time: frame.time,
            resolution: frame.resolution,
            ripples: frame.ripples.count(),
        });
    }

    fn release(&mut self) {
        self.calls.push(Call::Release);
    }
}

fn viewport(w: f64, h: f64, dpr: f64) -> Viewport {
    Viewport::from_css(w, h, dpr).expect("valid viewport")
}

fn running_driver() -> FrameDriver<Recorder> {
    let mut driver = FrameDriver::new(Recorder::default(), viewport(800.0, 600.0, 1.0));
    assert!(driver.start(1_000.0));
    driver
}

#[test]
fn idle_driver_draws_nothing() {
    let mut driver = FrameDriver::new(Recorder::default(), viewport(800.0, 600.0, 1.0));
    let buf = RippleBuffer::new(4);
    assert_eq!(driver.state(), DriverState::Idle);
    assert!(!driver.tick(1_000.0, &buf));
    assert!(driver.backend().calls.is_empty());
}

#[test]
fn running_tick_draws_with_elapsed_time() {
    let mut driver = running_driver();
    let buf = RippleBuffer::new(4);

    assert!(driver.is_running());
    assert!(driver.tick(1_250.0, &buf));
    assert_eq!(
        driver.backend().calls,
        vec![Call::Draw {
            time: 0.25,
            resolution: [800.0, 600.0],
            ripples: 0,
        }]
    );
    assert_eq!(driver.frames(), 1);
}

#[test]
fn start_only_leaves_idle_once() {
    let mut driver = running_driver();
    assert!(!driver.start(5_000.0));
    assert_eq!(driver.clock().unwrap().start_ms(), 1_000.0);
}

#[test]
fn each_frame_sees_buffer_as_of_tick() {
    let mut driver = running_driver();
    let mut buf = RippleBuffer::new(4);

    buf.push(10.0, 10.0, 0.0);
    driver.tick(1_016.0, &buf);
    buf.push(20.0, 20.0, 0.016);
    buf.push(30.0, 30.0, 0.016);
    driver.tick(1_032.0, &buf);

    let counts: Vec<usize> = driver
        .backend()
        .draws()
        .iter()
        .map(|c| match c {
            Call::Draw { ripples, .. } => *ripples,
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(counts, vec![1, 3]);
}

#[test]
fn resize_updates_resolution_before_next_draw() {
    let mut driver = FrameDriver::new(Recorder::default(), viewport(800.0, 600.0, 1.5));
    driver.start(0.0);
    let buf = RippleBuffer::new(4);
    driver.tick(16.0, &buf);

    // Raw ratio 3.0 is clamped to 2.0.
    assert!(driver.resize(viewport(1024.0, 768.0, 3.0)));
    driver.tick(32.0, &buf);

    let calls = &driver.backend().calls;
    assert_eq!(calls[1], Call::Resize(2048, 1536));
    match &calls[0] {
        Call::Draw { resolution, .. } => assert_eq!(*resolution, [1200.0, 900.0]),
        other => panic!("unexpected {other:?}"),
    }
    match &calls[2] {
        Call::Draw { resolution, .. } => assert_eq!(*resolution, [2048.0, 1536.0]),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(driver.viewport().device_pixel_ratio, 2.0);
}

#[test]
fn unchanged_size_is_not_reapplied() {
    let mut driver = running_driver();
    assert!(!driver.resize(viewport(800.0, 600.0, 1.0)));
    assert!(!driver.resize(viewport(400.0, 300.0, 2.0)));
    assert!(driver.backend().calls.is_empty());
}

#[test]
fn dispose_is_idempotent_and_final() {
    let mut driver = running_driver();
    let mut buf = RippleBuffer::new(4);
    buf.push(1.0, 1.0, 0.0);
    driver.tick(1_016.0, &buf);

    driver.dispose();
    driver.dispose();
    assert_eq!(driver.state(), DriverState::Disposed);
    assert_eq!(driver.backend().releases(), 1);

    // A frame callback that was already queued fires after disposal.
    assert!(!driver.tick(1_032.0, &buf));
    assert!(!driver.resize(viewport(1920.0, 1080.0, 1.0)));
    assert!(!driver.start(2_000.0));

    assert_eq!(driver.backend().draws().len(), 1);
    assert_eq!(driver.backend().calls.last(), Some(&Call::Release));
}

#[test]
fn dispose_before_start() {
    let mut driver = FrameDriver::new(Recorder::default(), viewport(800.0, 600.0, 1.0));
    driver.dispose();
    assert!(!driver.start(0.0));
    assert_eq!(driver.backend().calls, vec![Call::Release]);
}
