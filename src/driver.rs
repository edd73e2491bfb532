//! Frame loop as an explicit state machine.
//!
//! ```text
//! Idle --start--> Running --dispose--> Disposed
//!   \________________dispose_____________^
//! ```
//!
//! The browser's `requestAnimationFrame` only decides *when* `tick` runs; all
//! decisions about *whether* anything is drawn live here, so a callback that
//! fires after `dispose` can never reach the GPU.

use crate::clock::AnimationClock;
use crate::ripple::{RippleBuffer, RippleSnapshot};
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    Disposed,
}

/// Everything the program needs for one draw.
#[derive(Debug)]
pub struct FrameUniforms<'a> {
    pub time: f32,
    pub resolution: [f32; 2],
    pub ripples: &'a RippleSnapshot,
}

/// GPU side of the layer. Implemented by the WebGL program in the browser and
/// by recording fakes in tests.
pub trait RenderBackend {
    /// Resize the backing store and the resolution uniform.
    fn resize(&mut self, viewport: &Viewport);

    /// Upload `frame` and issue one draw call.
    fn draw(&mut self, frame: &FrameUniforms<'_>);

    /// Free every GPU object. Called exactly once.
    fn release(&mut self);
}

pub struct FrameDriver<B: RenderBackend> {
    backend: B,
    state: DriverState,
    clock: Option<AnimationClock>,
    viewport: Viewport,
    snapshot: RippleSnapshot,
    frames: u64,
}

impl<B: RenderBackend> FrameDriver<B> {
    /// The backend is expected to already be sized to `viewport`.
    pub fn new(backend: B, viewport: Viewport) -> Self {
        Self {
            backend,
            state: DriverState::Idle,
            clock: None,
            viewport,
            snapshot: RippleSnapshot::default(),
            frames: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == DriverState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn clock(&self) -> Option<AnimationClock> {
        self.clock
    }

    /// Frames drawn so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// `Idle -> Running`. Returns whether the caller should schedule the first
    /// frame.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.state != DriverState::Idle {
            return false;
        }
        self.clock = Some(AnimationClock::start_at(now_ms));
        self.state = DriverState::Running;
        true
    }

    /// Draw one frame from the buffer as it stands right now. Returns whether
    /// the caller should schedule another frame.
    pub fn tick(&mut self, now_ms: f64, ripples: &RippleBuffer) -> bool {
        let clock = match (self.state, self.clock) {
            (DriverState::Running, Some(clock)) => clock,
            _ => return false,
        };

        ripples.snapshot_into(&mut self.snapshot);
        let frame = FrameUniforms {
            time: clock.elapsed(now_ms),
            resolution: self.viewport.resolution(),
            ripples: &self.snapshot,
        };
        self.backend.draw(&frame);
        self.frames += 1;
        true
    }

    /// Apply a new viewport. Returns `true` if the backend was resized.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.state == DriverState::Disposed || self.viewport.same_size(&viewport) {
            return false;
        }
        log::debug!(
            "ripple surface resized to {}x{} (dpr {})",
            viewport.width_px,
            viewport.height_px,
            viewport.device_pixel_ratio
        );
        self.viewport = viewport;
        self.backend.resize(&viewport);
        true
    }

    /// Stop for good and release GPU resources. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if self.state == DriverState::Disposed {
            return;
        }
        self.state = DriverState::Disposed;
        self.backend.release();
    }
}
