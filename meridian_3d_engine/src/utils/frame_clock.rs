/// Frame clock - turns host timestamps into per-frame timing.
///
/// The host scheduler (requestAnimationFrame, a vsync callback, a game loop)
/// calls `on_frame` once per displayed frame with its own millisecond
/// timestamp. The clock never reads the system time itself, so frames can
/// be replayed deterministically.

/// Timing of one frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    /// Frame number, starting at 0
    pub frame: u64,
    /// Milliseconds since the previous frame (0 on the first frame)
    pub delta_ms: f64,
    /// Milliseconds since the first frame
    pub elapsed_ms: f64,
}

impl FrameTime {
    pub fn delta_secs(&self) -> f32 {
        (self.delta_ms / 1000.0) as f32
    }

    pub fn elapsed_secs(&self) -> f32 {
        (self.elapsed_ms / 1000.0) as f32
    }
}

/// Per-frame tick counter
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    frames: u64,
    /// First and latest timestamps seen
    span_ms: Option<(f64, f64)>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at `timestamp_ms`.
    ///
    /// A timestamp earlier than the previous one (host clock reset, bad
    /// input) yields a zero delta; time never runs backwards.
    pub fn on_frame(&mut self, timestamp_ms: f64) -> FrameTime {
        let (first, last) = self.span_ms.unwrap_or((timestamp_ms, timestamp_ms));
        let delta_ms = (timestamp_ms - last).max(0.0);
        let latest = last.max(timestamp_ms);
        self.span_ms = Some((first, latest));

        let time = FrameTime {
            frame: self.frames,
            delta_ms,
            elapsed_ms: latest - first,
        };
        self.frames += 1;
        time
    }

    /// Frames registered so far
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Start over; the next frame is frame 0 again
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[path = "frame_clock_tests.rs"]
mod tests;
