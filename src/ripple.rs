//! Ripple events and the fixed-capacity, most-recent-first buffer that holds
//! them between input and rendering.

use std::collections::VecDeque;

use crate::config::MAX_RIPPLES;

/// One input-triggered wave: where it started and when.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleEvent {
    /// Surface pixels, bottom-left origin
    pub origin: [f32; 2],
    /// Seconds since the layer's clock started
    pub spawn_time: f32,
}

impl RippleEvent {
    pub fn new(x: f32, y: f32, spawn_time: f32) -> Self {
        Self {
            origin: [x, y],
            spawn_time,
        }
    }

    pub fn age(&self, now: f32) -> f32 {
        now - self.spawn_time
    }
}

/// Fixed-capacity ripple store. Index 0 is always the newest event; pushing at
/// capacity evicts the oldest.
#[derive(Debug, Clone)]
pub struct RippleBuffer {
    events: VecDeque<RippleEvent>,
    capacity: usize,
}

impl RippleBuffer {
    /// `capacity` is clamped to `1..=MAX_RIPPLES`.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, MAX_RIPPLES);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, x: f32, y: f32, t: f32) {
        if self.events.len() == self.capacity {
            self.events.pop_back();
        }
        self.events.push_front(RippleEvent::new(x, y, t));
    }

    pub fn count(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RippleEvent> {
        self.events.get(index)
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &RippleEvent> {
        self.events.iter()
    }

    pub fn newest(&self) -> Option<&RippleEvent> {
        self.events.front()
    }

    pub fn oldest(&self) -> Option<&RippleEvent> {
        self.events.back()
    }

    pub fn reset(&mut self) {
        self.events.clear();
    }

    /// Copies the live events into `out`, zeroing the unused tail so stale
    /// slots never reach the shader.
    pub fn snapshot_into(&self, out: &mut RippleSnapshot) {
        out.positions.fill(0.0);
        out.spawn_times.fill(0.0);
        let slots = out
            .positions
            .chunks_exact_mut(2)
            .zip(out.spawn_times.iter_mut());
        let mut count = 0;
        for (ev, (pos, time)) in self.events.iter().zip(slots) {
            pos.copy_from_slice(&ev.origin);
            *time = ev.spawn_time;
            count += 1;
        }
        out.count = count;
    }

    pub fn snapshot(&self) -> RippleSnapshot {
        let mut out = RippleSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }
}

/// Per-frame copy of the buffer laid out the way the shader uniforms want it.
///
/// Storage is sized for `MAX_RIPPLES` and only reachable through accessors, so
/// a buffer can always be copied in without bounds checks failing.
#[derive(Debug, Clone, PartialEq)]
pub struct RippleSnapshot {
    positions: [f32; MAX_RIPPLES * 2],
    spawn_times: [f32; MAX_RIPPLES],
    count: usize,
}

impl Default for RippleSnapshot {
    fn default() -> Self {
        Self {
            positions: [0.0; MAX_RIPPLES * 2],
            spawn_times: [0.0; MAX_RIPPLES],
            count: 0,
        }
    }
}

impl RippleSnapshot {
    /// Flattened `[x0, y0, x1, y1, ...]`, `2 * MAX_RIPPLES` long.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// `MAX_RIPPLES` long.
    pub fn spawn_times(&self) -> &[f32] {
        &self.spawn_times
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn event(&self, index: usize) -> Option<RippleEvent> {
        (index < self.count).then(|| {
            RippleEvent::new(
                self.positions[index * 2],
                self.positions[index * 2 + 1],
                self.spawn_times[index],
            )
        })
    }

    pub fn events(&self) -> impl Iterator<Item = RippleEvent> + '_ {
        (0..self.count).filter_map(|i| self.event(i))
    }
}
