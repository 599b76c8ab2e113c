use std::time::Duration;

/// Ring buffer of recent frame durations, for the FPS readout.
#[derive(Debug, Clone)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new(60)
    }
}

impl FrameTimer {
    /// A timer keeping the last `capacity` frames. Capacity is at least 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let count = self.count();
        if count == 0 {
            return Duration::ZERO;
        }
        let total: Duration = self.recorded().iter().sum();
        total / count as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled {
            self.capacity
        } else {
            self.index
        }
    }

    /// Frames per second from the average frame time; 0 before any frame.
    pub fn fps(&self) -> f32 {
        let avg = self.average().as_secs_f32();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }

    /// One-line stats, e.g. `60.0 fps (16.7 ms, min 16.1, max 18.0)`.
    pub fn stats_line(&self) -> String {
        format!(
            "{:.1} fps ({:.1} ms, min {:.1}, max {:.1})",
            self.fps(),
            self.average().as_secs_f64() * 1000.0,
            self.min().as_secs_f64() * 1000.0,
            self.max().as_secs_f64() * 1000.0,
        )
    }
}
