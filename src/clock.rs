/// Animation time base. Captured once when the layer starts running; every
/// frame and every ripple spawn reads time through it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    start_ms: f64,
}

impl AnimationClock {
    /// `now_ms` is a `performance.now()` style millisecond timestamp.
    pub fn start_at(now_ms: f64) -> Self {
        Self { start_ms: now_ms }
    }

    pub fn start_ms(&self) -> f64 {
        self.start_ms
    }

    /// Seconds since start. Timestamps from before the start read as 0.
    pub fn elapsed(&self, now_ms: f64) -> f32 {
        ((now_ms - self.start_ms).max(0.0) / 1000.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_seconds() {
        let clock = AnimationClock::start_at(1_000.0);
        assert_eq!(clock.elapsed(1_000.0), 0.0);
        assert!((clock.elapsed(1_250.0) - 0.25).abs() < 1e-6);
        assert_eq!(clock.elapsed(500.0), 0.0);
    }
}
